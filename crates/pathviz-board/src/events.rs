//! Timer queue for scheduled playback callbacks.
//!
//! Entries live in a min-heap keyed by `(due, insertion_order)`. Earlier
//! due times pop first; entries due at the same time pop in the order they
//! were pushed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Entry<E> {
    event: E,
    due: u64,
    /// Monotonic push counter, breaks ties FIFO.
    seq: u64,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Natural order; the heap wraps entries in `Reverse`.
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A queue of events ordered by due time.
#[derive(Debug)]
pub struct EventQueue<E> {
    heap: BinaryHeap<Reverse<Entry<E>>>,
    seq: u64,
}

impl<E> EventQueue<E> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Schedule `event` at time `due`.
    pub fn push(&mut self, event: E, due: u64) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Entry { event, due, seq }));
    }

    /// Due time of the next event, if any.
    pub fn peek_due(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(entry)| entry.due)
    }

    /// Pop the earliest event together with its due time.
    pub fn pop_with_due(&mut self) -> Option<(E, u64)> {
        self.heap
            .pop()
            .map(|Reverse(entry)| (entry.event, entry.due))
    }

    /// Pop the earliest event if it is due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(E, u64)> {
        if self.peek_due()? > now {
            return None;
        }
        self.pop_with_due()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Iterate the scheduled events in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.heap.iter().map(|Reverse(entry)| &entry.event)
    }

    /// Drop every scheduled event.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_due_order() {
        let mut q = EventQueue::new();
        q.push("a", 30);
        q.push("b", 10);
        q.push("c", 20);

        assert_eq!(q.pop_with_due(), Some(("b", 10)));
        assert_eq!(q.pop_with_due(), Some(("c", 20)));
        assert_eq!(q.pop_with_due(), Some(("a", 30)));
        assert_eq!(q.pop_with_due(), None);
    }

    #[test]
    fn same_due_is_fifo() {
        let mut q = EventQueue::new();
        q.push("first", 5);
        q.push("second", 5);
        q.push("third", 5);

        let order: Vec<_> = std::iter::from_fn(|| q.pop_with_due().map(|(e, _)| e)).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn pop_due_respects_now() {
        let mut q = EventQueue::new();
        q.push(1, 10);
        q.push(2, 20);

        assert_eq!(q.pop_due(9), None);
        assert_eq!(q.pop_due(10), Some((1, 10)));
        assert_eq!(q.pop_due(15), None);
        assert_eq!(q.peek_due(), Some(20));
        assert_eq!(q.pop_due(100), Some((2, 20)));
        assert_eq!(q.pop_due(100), None);
    }

    #[test]
    fn len_and_clear() {
        let mut q = EventQueue::<i32>::new();
        assert!(q.is_empty());
        q.push(1, 1);
        q.push(2, 1);
        assert_eq!(q.len(), 2);
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.peek_due(), None);
    }
}
