//! Rate limiting for noisy window events.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::scheduler::SharedScheduler;

/// Runs only the last call of a burst, `wait` after that call.
pub struct Debounce {
    scheduler: SharedScheduler,
    wait: Duration,
    latest: Rc<Cell<u64>>,
}

impl Debounce {
    pub fn new(scheduler: SharedScheduler, wait: Duration) -> Self {
        Self {
            scheduler,
            wait,
            latest: Rc::new(Cell::new(0)),
        }
    }

    pub fn call(&self, f: impl FnOnce() + 'static) {
        let ticket = self.latest.get() + 1;
        self.latest.set(ticket);

        let latest = self.latest.clone();
        self.scheduler.set_timeout(
            self.wait,
            Box::new(move || {
                if latest.get() == ticket {
                    f();
                }
            }),
        );
    }
}

/// Runs a call immediately, then drops calls until `limit` has passed.
pub struct Throttle {
    scheduler: SharedScheduler,
    limit: Duration,
    blocked: Rc<Cell<bool>>,
}

impl Throttle {
    pub fn new(scheduler: SharedScheduler, limit: Duration) -> Self {
        Self {
            scheduler,
            limit,
            blocked: Rc::new(Cell::new(false)),
        }
    }

    /// Returns whether `f` ran.
    pub fn call(&self, f: impl FnOnce()) -> bool {
        if self.blocked.get() {
            return false;
        }
        f();
        self.blocked.set(true);

        let blocked = self.blocked.clone();
        self.scheduler
            .set_timeout(self.limit, Box::new(move || blocked.set(false)));
        true
    }
}
