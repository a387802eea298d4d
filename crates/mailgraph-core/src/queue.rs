//! Priority queue of messages awaiting processing.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::debug;

use crate::message::MessageRef;

/// Heap entry ordered by priority ordinal, then insertion sequence.
#[derive(Debug)]
struct Entry {
    ordinal: u8,
    sequence: u64,
    message: MessageRef,
}

impl Entry {
    const fn key(&self) -> (u8, u64) {
        (self.ordinal, self.sequence)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Min-heap of messages keyed by priority.
///
/// High comes out before Medium before Low. Messages of equal priority come
/// out in the order they were added.
#[derive(Debug, Default)]
pub struct PriorityQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    next_sequence: u64,
}

impl PriorityQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message, keyed by its priority at this moment.
    pub fn push(&mut self, message: MessageRef) {
        let ordinal = message.priority().ordinal();
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        debug!(message = %message.id(), ordinal, "queued message");
        self.heap.push(Reverse(Entry {
            ordinal,
            sequence,
            message,
        }));
    }

    /// Removes and returns the most urgent message.
    pub fn pop(&mut self) -> Option<MessageRef> {
        self.heap.pop().map(|Reverse(entry)| entry.message)
    }

    /// Returns the most urgent message without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&MessageRef> {
        self.heap.peek().map(|Reverse(entry)| &entry.message)
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of queued messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Empties the queue, yielding messages in processing order.
    pub fn drain(&mut self) -> impl Iterator<Item = MessageRef> + '_ {
        std::iter::from_fn(move || self.pop())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone)]
mod tests {
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;
    use crate::message::{Message, Priority};

    fn message(subject: &str, priority: Priority) -> MessageRef {
        Message::new("luis@a.com", "ana@b.com", subject, "", priority)
            .unwrap()
            .into_shared()
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = PriorityQueue::new();
        assert!(queue.is_empty());
        assert!(queue.pop().is_none());
        assert!(queue.peek().is_none());
    }

    #[test]
    fn test_pops_by_priority() {
        let mut queue = PriorityQueue::new();
        queue.push(message("low", Priority::Low));
        queue.push(message("high", Priority::High));
        queue.push(message("medium", Priority::Medium));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek().unwrap().subject(), "high");
        let subjects: Vec<_> = queue.drain().map(|m| m.subject().to_string()).collect();
        assert_eq!(subjects, ["high", "medium", "low"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_equal_priority_is_fifo() {
        let mut queue = PriorityQueue::new();
        for subject in ["a", "b", "c", "d"] {
            queue.push(message(subject, Priority::Medium));
        }
        queue.push(message("urgent", Priority::High));

        let subjects: Vec<_> = queue.drain().map(|m| m.subject().to_string()).collect();
        assert_eq!(subjects, ["urgent", "a", "b", "c", "d"]);
    }

    #[test]
    fn test_pop_returns_same_handle() {
        let mut queue = PriorityQueue::new();
        let original = message("shared", Priority::High);
        queue.push(original.clone());

        let popped = queue.pop().unwrap();
        assert!(Rc::ptr_eq(&popped, &original));
        assert_eq!(popped.priority(), Priority::High);
    }

    #[test]
    fn test_ordering_fixed_at_push_time() {
        let mut queue = PriorityQueue::new();
        let demoted = message("demoted", Priority::High);
        queue.push(demoted.clone());
        queue.push(message("plain", Priority::Medium));

        demoted.set_priority(Priority::Low);

        assert_eq!(queue.pop().unwrap().subject(), "demoted");
    }

    fn priority() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::High),
            Just(Priority::Medium),
            Just(Priority::Low),
        ]
    }

    proptest! {
        #[test]
        fn drains_in_non_decreasing_ordinal(priorities in prop::collection::vec(priority(), 0..64)) {
            let mut queue = PriorityQueue::new();
            for (i, p) in priorities.iter().enumerate() {
                queue.push(message(&i.to_string(), *p));
            }

            let drained: Vec<_> = queue.drain().collect();
            prop_assert_eq!(drained.len(), priorities.len());

            for pair in drained.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.priority().ordinal() <= b.priority().ordinal());
                if a.priority() == b.priority() {
                    let ia: usize = a.subject().parse().unwrap();
                    let ib: usize = b.subject().parse().unwrap();
                    prop_assert!(ia < ib);
                }
            }
        }
    }
}
