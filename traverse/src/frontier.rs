use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Pending expansions, in the order a traversal strategy wants them.
/// Items may be pushed while the frontier is being drained.
pub trait Frontier<T> {
    fn push(&mut self, item: T);
    fn pop(&mut self) -> Option<T>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Items that can be ordered by importance.
pub trait Ranked {
    /// Importance of this item; larger magnitudes are popped first.
    fn rank(&self) -> f64;
}

/// Which frontier a traversal drains its pending edges from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Largest absolute impact first.
    #[default]
    ImportanceFirst,
    /// Most recently discovered edge first.
    DepthFirst,
}

struct HeapEntry<T> {
    rank: f64,
    seq: u64,
    item: T,
}

impl<T> PartialEq for HeapEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for HeapEntry<T> {}

impl<T> PartialOrd for HeapEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for HeapEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // bigger magnitude wins; on ties, the earlier push wins.
        self.rank
            .abs()
            .total_cmp(&other.rank.abs())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Max-heap keyed by `|rank|`, stable w.r.t. insertion order.
pub struct ImpactHeap<T> {
    heap: BinaryHeap<HeapEntry<T>>,
    next_seq: u64,
}

impl<T> Default for ImpactHeap<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::with_capacity(32),
            next_seq: 0,
        }
    }
}

impl<T: Ranked> Frontier<T> for ImpactHeap<T> {
    fn push(&mut self, item: T) {
        let entry = HeapEntry {
            rank: item.rank(),
            seq: self.next_seq,
            item,
        };
        self.next_seq += 1;
        self.heap.push(entry);
    }

    fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|entry| entry.item)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Last in, first out.
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self {
            items: Vec::with_capacity(32),
        }
    }
}

impl<T> Frontier<T> for Stack<T> {
    fn push(&mut self, item: T) {
        self.items.push(item);
    }

    fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item(&'static str, f64);

    impl Ranked for Item {
        fn rank(&self) -> f64 {
            self.1
        }
    }

    fn drain<F: Frontier<Item>>(mut frontier: F) -> Vec<&'static str> {
        let mut out = Vec::new();
        while let Some(item) = frontier.pop() {
            out.push(item.0);
        }
        out
    }

    #[test]
    fn test_heap_orders_by_magnitude() {
        let mut heap = ImpactHeap::default();
        heap.push(Item("small", 0.1));
        heap.push(Item("negative", -5.0));
        heap.push(Item("mid", 2.0));
        assert_eq!(heap.len(), 3);
        assert_eq!(drain(heap), vec!["negative", "mid", "small"]);
    }

    #[test]
    fn test_heap_ties_are_stable() {
        let mut heap = ImpactHeap::default();
        heap.push(Item("first", 1.0));
        heap.push(Item("second", -1.0));
        heap.push(Item("third", 1.0));
        assert_eq!(drain(heap), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_heap_push_while_popping() {
        let mut heap = ImpactHeap::default();
        heap.push(Item("parent", 3.0));
        heap.push(Item("sibling", 2.0));
        assert_eq!(heap.pop(), Some(Item("parent", 3.0)));
        heap.push(Item("child", 2.5));
        heap.push(Item("grandchild", 0.5));
        assert_eq!(drain(heap), vec!["child", "sibling", "grandchild"]);
    }

    #[test]
    fn test_stack_is_lifo() {
        let mut stack = Stack::default();
        stack.push(Item("a", 10.0));
        stack.push(Item("b", 0.0));
        assert_eq!(stack.pop(), Some(Item("b", 0.0)));
        stack.push(Item("c", 1.0));
        assert!(!stack.is_empty());
        assert_eq!(drain(stack), vec!["c", "a"]);
    }
}
