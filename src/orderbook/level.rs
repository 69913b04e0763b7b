//! Price level: the FIFO queue of orders resting at one price.
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> ... <-> tail (newest)
//! ```
//!
//! New orders append at the tail; matching consumes from the head; any
//! member can be unlinked in O(1) given its slab key. `total_qty` is kept
//! equal to the sum of member quantities at all times. Neither operation
//! allocates.

use slab::Slab;

use crate::orderbook::OrderNode;
use crate::types::{Price, Qty};

/// All orders resting at a single price on one side.
///
/// The order data lives in the book's slab arena; the level holds only the
/// queue endpoints and aggregates. An empty level must never stay in its
/// ladder; the book erases it the moment its last order leaves.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price of every order in this level, in ticks.
    pub price: Price,

    /// Sum of remaining quantities of all queued orders.
    pub total_qty: Qty,

    /// Oldest order (first to match), as a slab key.
    pub head: Option<usize>,

    /// Newest order, as a slab key.
    pub tail: Option<usize>,

    /// Number of orders in the queue.
    pub order_count: usize,
}

impl PriceLevel {
    /// Create an empty level at `price`.
    pub fn new(price: Price) -> Self {
        Self {
            price,
            total_qty: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    /// True when the queue holds no orders. head is null iff tail is null
    /// iff the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Append the order at `key` to the tail of the queue.
    ///
    /// Older orders stay closer to the head, which is what gives equal
    /// prices their time priority.
    pub fn push_back(&mut self, key: usize, arena: &mut Slab<OrderNode>) {
        let node = arena.get_mut(key).expect("push_back: key not in arena");
        debug_assert_eq!(node.price, self.price);
        debug_assert!(node.qty > 0);
        let qty = node.qty;

        node.prev = self.tail;
        node.next = None;

        if let Some(tail_key) = self.tail {
            let tail_node = arena.get_mut(tail_key).expect("push_back: stale tail key");
            tail_node.next = Some(key);
        } else {
            self.head = Some(key);
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_qty += qty;
    }

    /// Unlink the order at `key` from anywhere in the queue.
    ///
    /// Repairs the neighbors' links, updates head/tail when the order sat
    /// at an end, subtracts its remaining quantity from `total_qty`, and
    /// clears the node's own links so it cannot be mistaken for resident.
    /// Returns the unlinked quantity.
    pub fn remove(&mut self, key: usize, arena: &mut Slab<OrderNode>) -> Qty {
        let node = arena.get(key).expect("remove: key not in arena");
        debug_assert_eq!(node.price, self.price);
        let qty = node.qty;
        let prev_key = node.prev;
        let next_key = node.next;

        match prev_key {
            Some(prev) => arena.get_mut(prev).expect("remove: stale prev key").next = next_key,
            None => self.head = next_key,
        }
        match next_key {
            Some(next) => arena.get_mut(next).expect("remove: stale next key").prev = prev_key,
            None => self.tail = prev_key,
        }

        let node = arena.get_mut(key).expect("remove: key not in arena");
        node.prev = None;
        node.next = None;

        self.order_count -= 1;
        self.total_qty -= qty;
        debug_assert!(self.total_qty >= 0);

        qty
    }

    /// Subtract `delta` from the aggregate after a partial fill or an
    /// in-place shrink; the member's own quantity is adjusted by the
    /// caller.
    #[inline]
    pub fn reduce_total(&mut self, delta: Qty) {
        self.total_qty -= delta;
        debug_assert!(self.total_qty >= 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    fn insert_node(arena: &mut Slab<OrderNode>, id: u64, qty: Qty) -> usize {
        arena.insert(OrderNode::new(id, Side::Buy, 1000, qty, 0))
    }

    #[test]
    fn test_new_level_is_empty() {
        let level = PriceLevel::new(1000);

        assert_eq!(level.price, 1000);
        assert_eq!(level.total_qty, 0);
        assert!(level.head.is_none());
        assert!(level.tail.is_none());
        assert_eq!(level.order_count, 0);
        assert!(level.is_empty());
    }

    #[test]
    fn test_push_back_single() {
        let mut arena = Slab::new();
        let mut level = PriceLevel::new(1000);

        let key = insert_node(&mut arena, 1, 50);
        level.push_back(key, &mut arena);

        assert_eq!(level.head, Some(key));
        assert_eq!(level.tail, Some(key));
        assert_eq!(level.total_qty, 50);
        assert_eq!(level.order_count, 1);

        let node = &arena[key];
        assert!(node.prev.is_none());
        assert!(node.next.is_none());
    }

    #[test]
    fn test_push_back_preserves_arrival_order() {
        let mut arena = Slab::new();
        let mut level = PriceLevel::new(1000);

        let k1 = insert_node(&mut arena, 1, 10);
        let k2 = insert_node(&mut arena, 2, 20);
        let k3 = insert_node(&mut arena, 3, 30);
        level.push_back(k1, &mut arena);
        level.push_back(k2, &mut arena);
        level.push_back(k3, &mut arena);

        assert_eq!(level.head, Some(k1));
        assert_eq!(level.tail, Some(k3));
        assert_eq!(level.total_qty, 60);
        assert_eq!(level.order_count, 3);

        // k1 <-> k2 <-> k3
        assert_eq!(arena[k1].prev, None);
        assert_eq!(arena[k1].next, Some(k2));
        assert_eq!(arena[k2].prev, Some(k1));
        assert_eq!(arena[k2].next, Some(k3));
        assert_eq!(arena[k3].prev, Some(k2));
        assert_eq!(arena[k3].next, None);
    }

    #[test]
    fn test_remove_middle_repairs_links() {
        let mut arena = Slab::new();
        let mut level = PriceLevel::new(1000);

        let k1 = insert_node(&mut arena, 1, 10);
        let k2 = insert_node(&mut arena, 2, 20);
        let k3 = insert_node(&mut arena, 3, 30);
        level.push_back(k1, &mut arena);
        level.push_back(k2, &mut arena);
        level.push_back(k3, &mut arena);

        assert_eq!(level.remove(k2, &mut arena), 20);

        assert_eq!(level.head, Some(k1));
        assert_eq!(level.tail, Some(k3));
        assert_eq!(level.total_qty, 40);
        assert_eq!(level.order_count, 2);
        assert_eq!(arena[k1].next, Some(k3));
        assert_eq!(arena[k3].prev, Some(k1));
        assert!(arena[k2].prev.is_none());
        assert!(arena[k2].next.is_none());
    }

    #[test]
    fn test_remove_head_and_tail() {
        let mut arena = Slab::new();
        let mut level = PriceLevel::new(1000);

        let k1 = insert_node(&mut arena, 1, 10);
        let k2 = insert_node(&mut arena, 2, 20);
        let k3 = insert_node(&mut arena, 3, 30);
        level.push_back(k1, &mut arena);
        level.push_back(k2, &mut arena);
        level.push_back(k3, &mut arena);

        level.remove(k1, &mut arena);
        assert_eq!(level.head, Some(k2));
        assert!(arena[k2].prev.is_none());

        level.remove(k3, &mut arena);
        assert_eq!(level.tail, Some(k2));
        assert!(arena[k2].next.is_none());
        assert_eq!(level.head, Some(k2));
        assert_eq!(level.total_qty, 20);
    }

    #[test]
    fn test_remove_only_member_empties_level() {
        let mut arena = Slab::new();
        let mut level = PriceLevel::new(1000);

        let key = insert_node(&mut arena, 1, 10);
        level.push_back(key, &mut arena);
        level.remove(key, &mut arena);

        assert!(level.is_empty());
        assert!(level.head.is_none());
        assert!(level.tail.is_none());
        assert_eq!(level.total_qty, 0);
        assert_eq!(level.order_count, 0);
    }

    #[test]
    fn test_reduce_total() {
        let mut level = PriceLevel::new(1000);
        level.total_qty = 100;

        level.reduce_total(30);
        assert_eq!(level.total_qty, 70);
    }
}
