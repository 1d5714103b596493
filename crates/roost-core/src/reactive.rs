use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

pub type SignalId = usize;
pub type ObserverId = usize;

thread_local! {
    static CURRENT_OBSERVER: RefCell<Option<ObserverId>> = const { RefCell::new(None) };
    static GRAPH: RefCell<DepGraph> = RefCell::new(DepGraph::default());
}

#[derive(Default)]
struct DepGraph {
    next_signal: SignalId,
    next_observer: ObserverId,
    // signal_id -> observers that read it during their last run
    edges: HashMap<SignalId, HashSet<ObserverId>>,
    // observer_id -> signals it read during its last run
    back: HashMap<ObserverId, HashSet<SignalId>>,
    observers: HashMap<ObserverId, Rc<dyn Fn()>>,
    running: HashSet<ObserverId>,
}

impl DepGraph {
    fn clear_edges_of(&mut self, obs: ObserverId) {
        if let Some(signals) = self.back.remove(&obs) {
            for sig in signals {
                if let Some(set) = self.edges.get_mut(&sig) {
                    set.remove(&obs);
                }
            }
        }
    }

    fn remove(&mut self, obs: ObserverId) {
        self.observers.remove(&obs);
        self.clear_edges_of(obs);
        // scrub forward maps
        for set in self.edges.values_mut() {
            set.remove(&obs);
        }
        self.running.remove(&obs);
    }
}

pub fn next_signal_id() -> SignalId {
    GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        let id = g.next_signal;
        g.next_signal += 1;
        id
    })
}

/// Records an edge from `sig` to the observer currently running, if any.
pub fn register_signal_read(sig: SignalId) {
    CURRENT_OBSERVER.with(|co| {
        if let Some(obs) = *co.borrow() {
            GRAPH.with(|g| {
                let mut g = g.borrow_mut();
                g.edges.entry(sig).or_default().insert(obs);
                g.back.entry(obs).or_default().insert(sig);
            });
        }
    });
}

/// Re-runs every observer that read `sig` during its last run.
pub fn signal_changed(sig: SignalId) {
    let mut queue: VecDeque<ObserverId> = GRAPH.with(|g| {
        g.borrow()
            .edges
            .get(&sig)
            .map(|obs| obs.iter().copied().collect())
            .unwrap_or_default()
    });

    while let Some(obs) = queue.pop_front() {
        let f = GRAPH.with(|g| {
            let mut g = g.borrow_mut();
            if g.running.contains(&obs) {
                return None;
            }
            g.running.insert(obs);
            g.observers.get(&obs).cloned()
        });
        let Some(f) = f else { continue };

        with_observer(obs, || f());

        GRAPH.with(|g| {
            g.borrow_mut().running.remove(&obs);
        });
    }
}

pub fn new_observer(f: impl Fn() + 'static) -> ObserverId {
    GRAPH.with(|g| {
        let mut g = g.borrow_mut();
        let id = g.next_observer;
        g.next_observer += 1;
        g.observers.insert(id, Rc::new(f));
        id
    })
}

/// Remove an observer and all of its dependency edges.
pub fn remove_observer(id: ObserverId) {
    GRAPH.with(|g| {
        g.borrow_mut().remove(id);
    });
}

/// Runs `f` with `id` as the current observer, so signal reads inside it
/// register fresh edges. Previous edges of `id` are cleared first.
pub fn with_observer<R>(id: ObserverId, f: impl FnOnce() -> R) -> R {
    GRAPH.with(|g| g.borrow_mut().clear_edges_of(id));
    CURRENT_OBSERVER.with(|co| {
        let prev = *co.borrow();
        *co.borrow_mut() = Some(id);
        let result = f();
        *co.borrow_mut() = prev;
        result
    })
}
