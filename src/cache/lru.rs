//! Recency List Module
//!
//! Doubly linked list of cache slots ordered from most to least recently used.
//!
//! Nodes live in a `Vec` arena and link to each other by index, so there are no
//! ownership cycles. Two sentinel nodes without payload bound the list:
//! - `HEAD` sits before the most recently used entry
//! - `TAIL` sits after the least recently used entry
//!
//! The node adjacent to `TAIL` is always the eviction candidate.

const HEAD: usize = 0;
const TAIL: usize = 1;

/// Stable handle of a node in the arena.
pub type SlotId = usize;

#[derive(Debug)]
struct Node<T> {
    item: Option<T>,
    prev: usize,
    next: usize,
}

// == Recency List ==
#[derive(Debug)]
pub struct RecencyList<T> {
    nodes: Vec<Node<T>>,
    /// Slots released by `remove`, reused before the arena grows
    free: Vec<SlotId>,
    len: usize,
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates an empty list with room for `capacity` entries plus the sentinels.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 2);
        nodes.push(Node {
            item: None,
            prev: HEAD,
            next: TAIL,
        });
        nodes.push(Node {
            item: None,
            prev: HEAD,
            next: TAIL,
        });
        Self {
            nodes,
            free: Vec::new(),
            len: 0,
        }
    }

    // == Push Front ==
    /// Links `item` right after `HEAD` and returns its slot.
    pub fn push_front(&mut self, item: T) -> SlotId {
        let node = Node {
            item: Some(item),
            prev: HEAD,
            next: HEAD,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        self.link_after_head(slot);
        self.len += 1;
        slot
    }

    // == Move To Front ==
    /// Relinks a live slot right after `HEAD`.
    pub fn move_to_front(&mut self, slot: SlotId) {
        if !self.is_live(slot) || self.nodes[HEAD].next == slot {
            return;
        }
        self.unlink(slot);
        self.link_after_head(slot);
    }

    // == Remove ==
    /// Unlinks a slot and hands back its item. Stale or sentinel slots yield `None`.
    pub fn remove(&mut self, slot: SlotId) -> Option<T> {
        if !self.is_live(slot) {
            return None;
        }
        self.unlink(slot);
        self.free.push(slot);
        self.len -= 1;
        self.nodes[slot].item.take()
    }

    // == Pop Back ==
    /// Removes the least recently used item.
    pub fn pop_back(&mut self) -> Option<T> {
        let victim = self.nodes[TAIL].prev;
        if victim == HEAD {
            return None;
        }
        self.remove(victim)
    }

    pub fn get(&self, slot: SlotId) -> Option<&T> {
        self.nodes.get(slot).and_then(|node| node.item.as_ref())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Iterates from most to least recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.nodes[HEAD].next,
        }
    }

    fn is_live(&self, slot: SlotId) -> bool {
        slot > TAIL && self.get(slot).is_some()
    }

    fn link_after_head(&mut self, slot: SlotId) {
        let first = self.nodes[HEAD].next;
        self.nodes[slot].prev = HEAD;
        self.nodes[slot].next = first;
        self.nodes[first].prev = slot;
        self.nodes[HEAD].next = slot;
    }

    fn unlink(&mut self, slot: SlotId) {
        let prev = self.nodes[slot].prev;
        let next = self.nodes[slot].next;
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }
}

// == Iterator ==
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == TAIL {
            return None;
        }
        let node = &self.list.nodes[self.cursor];
        self.cursor = node.next;
        node.item.as_ref()
    }
}
