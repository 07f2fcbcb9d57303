use log::trace;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// A many-readers/one-writer lock built from a mutex-guarded reader count and a condition
/// variable that is signaled whenever the count drops to zero.
///
/// Readers only hold the internal mutex long enough to bump the count, so `read` never waits on
/// another reader. A writer takes the mutex, waits until the count is zero, and then keeps the
/// mutex for as long as its guard lives, which stops new readers from registering.
///
/// # Fairness
///
/// Pending writers are not queued ahead of new readers. If readers keep arriving faster than
/// they leave, the count never reaches zero and a writer can wait indefinitely. This weak
/// fairness is part of the lock's contract.
///
/// # Examples
///
/// ```
/// use concurrent_treap::sync::ReadWriteLock;
///
/// let lock = ReadWriteLock::new(5);
/// {
///     let first = lock.read();
///     let second = lock.read();
///     assert_eq!(*first + *second, 10);
/// }
/// *lock.write() += 1;
/// assert_eq!(*lock.read(), 6);
/// ```
pub struct ReadWriteLock<T> {
    readers: Mutex<usize>,
    no_readers: Condvar,
    data: UnsafeCell<T>,
}

unsafe impl<T: Send> Send for ReadWriteLock<T> {}
unsafe impl<T: Send + Sync> Sync for ReadWriteLock<T> {}

impl<T> ReadWriteLock<T> {
    /// Constructs a new, unlocked `ReadWriteLock<T>` protecting `data`.
    pub fn new(data: T) -> Self {
        ReadWriteLock {
            readers: Mutex::new(0),
            no_readers: Condvar::new(),
            data: UnsafeCell::new(data),
        }
    }

    /// Registers a reader and returns a guard that unregisters it when dropped.
    pub fn read(&self) -> ReadGuard<'_, T> {
        *self.readers.lock() += 1;
        ReadGuard { lock: self }
    }

    /// Waits until there are no active readers and returns a guard granting exclusive access.
    pub fn write(&self) -> WriteGuard<'_, T> {
        let mut readers = self.readers.lock();
        while *readers > 0 {
            trace!("writer waiting for {} active readers", *readers);
            self.no_readers.wait(&mut readers);
        }
        WriteGuard {
            lock: self,
            _readers: readers,
        }
    }

    /// Returns the number of readers currently holding the lock.
    pub fn reader_count(&self) -> usize {
        *self.readers.lock()
    }

    /// Returns a mutable reference to the protected data. No locking is needed because the
    /// borrow checker guarantees exclusive access.
    pub fn get_mut(&mut self) -> &mut T {
        unsafe { &mut *self.data.get() }
    }

    /// Consumes the lock and returns the protected data.
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }

    fn release_read(&self) {
        let mut readers = self.readers.lock();
        *readers -= 1;
        if *readers == 0 {
            self.no_readers.notify_all();
        }
    }
}

impl<T: Default> Default for ReadWriteLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for ReadWriteLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ReadWriteLock")
            .field("readers", &self.reader_count())
            .finish()
    }
}

/// Shared access to the data behind a `ReadWriteLock<T>`.
pub struct ReadGuard<'a, T> {
    lock: &'a ReadWriteLock<T>,
}

impl<'a, T> Deref for ReadGuard<'a, T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.lock.data.get() }
    }
}

impl<'a, T> Drop for ReadGuard<'a, T> {
    fn drop(&mut self) {
        self.lock.release_read();
    }
}

/// Exclusive access to the data behind a `ReadWriteLock<T>`. The lock's internal mutex is held
/// until the guard is dropped.
pub struct WriteGuard<'a, T> {
    lock: &'a ReadWriteLock<T>,
    _readers: MutexGuard<'a, usize>,
}

impl<'a, T> Deref for WriteGuard<'a, T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.lock.data.get() }
    }
}

impl<'a, T> DerefMut for WriteGuard<'a, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.lock.data.get() }
    }
}

#[cfg(test)]
mod tests {
    use super::ReadWriteLock;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_readers_share_access() {
        let lock = ReadWriteLock::new(vec![1, 2, 3]);
        let first = lock.read();
        let second = lock.read();
        assert_eq!(lock.reader_count(), 2);
        assert_eq!(first.len() + second.len(), 6);
        drop(first);
        drop(second);
        assert_eq!(lock.reader_count(), 0);
    }

    #[test]
    fn test_write_then_read() {
        let lock = ReadWriteLock::new(0);
        *lock.write() = 5;
        assert_eq!(*lock.read(), 5);
        assert_eq!(lock.into_inner(), 5);
    }

    #[test]
    fn test_get_mut() {
        let mut lock = ReadWriteLock::new(String::from("a"));
        lock.get_mut().push('b');
        assert_eq!(&*lock.read(), "ab");
    }

    #[test]
    fn test_writer_waits_for_readers() {
        let lock = Arc::new(ReadWriteLock::new(0));
        let acquired = Arc::new(AtomicBool::new(false));

        let reader = lock.read();
        let handle = {
            let lock = Arc::clone(&lock);
            let acquired = Arc::clone(&acquired);
            thread::spawn(move || {
                let mut value = lock.write();
                acquired.store(true, Ordering::SeqCst);
                *value += 1;
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!acquired.load(Ordering::SeqCst));
        assert_eq!(*reader, 0);

        drop(reader);
        handle.join().unwrap();
        assert!(acquired.load(Ordering::SeqCst));
        assert_eq!(*lock.read(), 1);
    }

    #[test]
    fn test_writer_blocks_new_readers() {
        let lock = Arc::new(ReadWriteLock::new(0));
        let barrier = Arc::new(Barrier::new(2));

        let mut writer = lock.write();
        let handle = {
            let lock = Arc::clone(&lock);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                *lock.read()
            })
        };

        barrier.wait();
        thread::sleep(Duration::from_millis(50));
        *writer = 42;
        drop(writer);

        assert_eq!(handle.join().unwrap(), 42);
    }

    #[test]
    fn test_concurrent_writers_are_serialized() {
        let lock = Arc::new(ReadWriteLock::new(0u64));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lock = Arc::clone(&lock);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        let mut value = lock.write();
                        let read = *value;
                        *value = read + 1;
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*lock.read(), 8000);
    }
}
