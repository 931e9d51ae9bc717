use std::collections::HashMap;
use std::hash::Hash;

/// Pending scheduled tasks, at most one per owner.
///
/// Handles cancel themselves on drop, so replacing or removing a slot cancels
/// whatever was pending there. Once closed, late arrivals are dropped on the
/// spot instead of being stored.
pub struct TaskSlots<K, H> {
    slots: HashMap<K, H>,
    closed: bool,
}

impl<K: Eq + Hash, H> Default for TaskSlots<K, H> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            closed: false,
        }
    }
}

impl<K: Eq + Hash, H> TaskSlots<K, H> {
    /// Returns `true` when an earlier task for `owner` was replaced.
    pub fn schedule(&mut self, owner: K, handle: H) -> bool {
        if self.closed {
            drop(handle);
            return false;
        }
        self.slots.insert(owner, handle).is_some()
    }

    pub fn cancel(&mut self, owner: &K) -> bool {
        self.slots.remove(owner).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.slots.clear();
    }

    /// Cancels everything pending and refuses further tasks until reopened.
    pub fn close(&mut self) {
        self.closed = true;
        self.cancel_all();
    }

    pub fn reopen(&mut self) {
        self.closed = false;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeTimer {
        name: &'static str,
        cancelled: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Drop for FakeTimer {
        fn drop(&mut self) {
            self.cancelled.borrow_mut().push(self.name);
        }
    }

    fn timer(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> FakeTimer {
        FakeTimer {
            name,
            cancelled: log.clone(),
        }
    }

    #[test]
    fn rescheduling_cancels_the_pending_task_for_that_owner_only() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slots = TaskSlots::default();

        assert!(!slots.schedule(0u32, timer("first-click", &log)));
        assert!(!slots.schedule(1u32, timer("other-button", &log)));
        assert!(slots.schedule(0u32, timer("second-click", &log)));

        assert_eq!(*log.borrow(), vec!["first-click"]);
    }

    #[test]
    fn cancel_drops_the_handle() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slots = TaskSlots::default();
        slots.schedule("copy-btn", timer("restore", &log));

        assert!(slots.cancel(&"copy-btn"));
        assert!(!slots.cancel(&"copy-btn"));
        assert_eq!(*log.borrow(), vec!["restore"]);
    }

    #[test]
    fn cancel_all_clears_every_owner() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slots = TaskSlots::default();
        slots.schedule(1u8, timer("a", &log));
        slots.schedule(2u8, timer("b", &log));

        slots.cancel_all();
        let mut cancelled = log.borrow().clone();
        cancelled.sort_unstable();
        assert_eq!(cancelled, vec!["a", "b"]);
    }

    #[test]
    fn tasks_arriving_after_close_are_cancelled_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slots = TaskSlots::default();
        slots.schedule(0usize, timer("pending", &log));

        slots.close();
        assert!(slots.is_closed());
        assert_eq!(*log.borrow(), vec!["pending"]);

        assert!(!slots.schedule(0usize, timer("late-restore", &log)));
        assert_eq!(*log.borrow(), vec!["pending", "late-restore"]);
        assert!(!slots.cancel(&0));
    }

    #[test]
    fn reopened_slots_accept_tasks_again() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slots = TaskSlots::default();
        slots.close();
        slots.reopen();

        assert!(!slots.schedule(3usize, timer("restore", &log)));
        assert!(log.borrow().is_empty());
        assert!(slots.cancel(&3));
    }
}
