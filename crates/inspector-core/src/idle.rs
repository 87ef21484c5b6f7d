//! Idle task queue
//!
//! A single-threaded FIFO drained by the host once per idle tick. Handles are cheap clones of
//! the same queue, so listeners can post work without borrowing its owner.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Shared handle to a queue of deferred tasks.
#[derive(Debug)]
pub struct IdleQueue<T> {
    tasks: Rc<RefCell<VecDeque<T>>>,
}

impl<T> Clone for IdleQueue<T> {
    fn clone(&self) -> Self {
        Self {
            tasks: Rc::clone(&self.tasks),
        }
    }
}

impl<T> Default for IdleQueue<T> {
    fn default() -> Self {
        Self {
            tasks: Rc::new(RefCell::new(VecDeque::new())),
        }
    }
}

impl<T: PartialEq> IdleQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task.
    pub fn post(&self, task: T) {
        self.tasks.borrow_mut().push_back(task);
    }

    /// Append a task unless an equal one is already pending. Returns whether it was queued.
    pub fn post_coalesced(&self, task: T) -> bool {
        let mut tasks = self.tasks.borrow_mut();
        if tasks.contains(&task) {
            return false;
        }
        tasks.push_back(task);
        true
    }

    /// Returns `true` if a task equal to `task` is pending.
    pub fn is_pending(&self, task: &T) -> bool {
        self.tasks.borrow().contains(task)
    }

    /// Remove the oldest task.
    pub fn pop(&self) -> Option<T> {
        self.tasks.borrow_mut().pop_front()
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Task {
        Refresh,
        Other,
    }

    #[test]
    fn test_coalesced_posts_keep_one_pending() {
        let queue = IdleQueue::new();
        assert!(queue.post_coalesced(Task::Refresh));
        assert!(!queue.post_coalesced(Task::Refresh));
        assert!(queue.post_coalesced(Task::Other));
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.pop(), Some(Task::Refresh));
        assert!(!queue.is_pending(&Task::Refresh));
        assert!(queue.post_coalesced(Task::Refresh));
    }

    #[test]
    fn test_clones_share_the_queue() {
        let queue = IdleQueue::new();
        let handle = queue.clone();
        handle.post(Task::Other);
        handle.post(Task::Other);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(Task::Other));
        assert_eq!(queue.pop(), Some(Task::Other));
        assert!(queue.is_empty());
    }
}
