use concurrent_treap::{Entry, RandomizedTreap, Treap};
use log::{error, info, LevelFilter};
use simplelog::{Config, SimpleLogger};

fn main() {
    if let Err(err) = SimpleLogger::init(LevelFilter::Debug, Config::default()) {
        eprintln!("unable to install logger: {}", err);
    }

    let treap = Treap::new();
    for &(key, priority) in &[(50, 30), (30, 20), (70, 40), (20, 10), (40, 25)] {
        treap.add(Entry::new(key, priority));
    }

    info!("size: {}", treap.size());
    info!("height: {}", treap.height());
    info!("min: {:?}", treap.min());
    info!("max: {:?}", treap.max());
    info!("search 30: {:?}", treap.search(&30));
    info!("peek: {:?}", treap.peek());

    match treap.update_priority(&Entry::new(40, 25), Entry::new(40, 5)) {
        Ok(updated) => info!("raised 40: {}, peek: {:?}", updated, treap.peek()),
        Err(err) => error!("{}", err),
    }

    info!("top: {:?}", treap.top());
    info!("size after top: {}", treap.size());
    info!("invariants hold: {}", treap.check_treap_invariants());
    treap.clear();

    let randomized = RandomizedTreap::new();
    for element in 0..10_000 {
        randomized.add(element);
    }
    info!(
        "randomized treap of {} elements has height {}",
        randomized.size(),
        randomized.height(),
    );
}
