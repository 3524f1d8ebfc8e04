//! Nodes and the arena that owns them.
//!
//! Nodes never point at each other directly. Each link is a [`NodeId`] into
//! the [`Arena`], so unlinking a node from every level and reclaiming its slot
//! both happen through the same `&mut Arena`, and a stale link can never
//! outlive the storage it refers to without the arena noticing.

use std::fmt;

// ////////////////////////////////////////////////////////////////////////////
// NodeId
// ////////////////////////////////////////////////////////////////////////////

/// Stable handle to a node slot inside an [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(usize);

impl NodeId {
    /// The head sentinel always lives in the first slot.
    pub const HEAD: NodeId = NodeId(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Node
// ////////////////////////////////////////////////////////////////////////////

/// A single record in the skiplist.
///
/// A node of `level` n has (n + 1) links to next nodes, stored in `forward`.
/// `forward[i]` is the next node at level i, or `None` at the tail of that
/// level.
#[derive(Debug)]
pub struct Node<K, V> {
    // The entry should never be None, with the sole exception being the head
    // node.
    entry: Option<(K, V)>,
    // Links to the next node at the respective level.  This vector *must* be
    // of length `self.level() + 1`.
    pub forward: Vec<Option<NodeId>>,
}

impl<K, V> Node<K, V> {
    /// Create a new head node linked into every level `0..=max_level`.
    pub fn head(max_level: usize) -> Self {
        Node {
            entry: None,
            forward: vec![None; max_level + 1],
        }
    }

    /// Create a new node with the given key and value.
    /// All links default to `None`.
    pub fn new(key: K, value: V, level: usize) -> Self {
        Node {
            entry: Some((key, value)),
            forward: vec![None; level + 1],
        }
    }

    /// The highest level this node is linked into.
    pub fn level(&self) -> usize {
        self.forward.len() - 1
    }

    pub fn key(&self) -> Option<&K> {
        self.entry.as_ref().map(|(k, _)| k)
    }

    pub fn value(&self) -> Option<&V> {
        self.entry.as_ref().map(|(_, v)| v)
    }

    pub fn entry(&self) -> Option<(&K, &V)> {
        self.entry.as_ref().map(|(k, v)| (k, v))
    }

    /// Consumes the node returning the entry it contains.
    pub fn into_entry(self) -> Option<(K, V)> {
        self.entry
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Arena
// ////////////////////////////////////////////////////////////////////////////

/// Owner of every node of a skiplist, including the head sentinel.
///
/// Freed slots are recycled before the backing vector grows.
#[derive(Debug)]
pub struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
}

impl<K, V> Arena<K, V> {
    /// Create an arena holding only a head sentinel spanning `0..=max_level`.
    pub fn new(max_level: usize) -> Self {
        Arena {
            slots: vec![Some(Node::head(max_level))],
            free: Vec::new(),
        }
    }

    /// Number of live nodes, excluding the head.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len() - 1
    }

    /// Store `node` and return its handle.
    pub fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.0] = Some(node);
            id
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    /// Release the slot behind `id`, handing the node back.
    ///
    /// # Panics
    ///
    /// Panics when asked to free the head sentinel or an already free slot;
    /// both indicate a corrupted link structure.
    pub fn free(&mut self, id: NodeId) -> Node<K, V> {
        assert_ne!(id, NodeId::HEAD, "The head node can never be freed!");
        let node = self.slots[id.0]
            .take()
            .unwrap_or_else(|| panic!("Node {id} freed twice"));
        self.free.push(id);
        node
    }

    /// Drop every node and reset the head to an unlinked sentinel.
    pub fn clear(&mut self, max_level: usize) {
        self.slots.clear();
        self.free.clear();
        self.slots.push(Some(Node::head(max_level)));
    }

    /// The next node after `id` at `level`, if any.
    #[inline]
    pub fn next(&self, id: NodeId, level: usize) -> Option<NodeId> {
        self[id].forward[level]
    }

    /// Iterate over the nodes linked at `level`, starting after the head.
    pub fn walk(&self, level: usize) -> Walk<'_, K, V> {
        Walk {
            arena: self,
            level,
            next: self.next(NodeId::HEAD, level),
        }
    }
}

impl<K, V> std::ops::Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Node<K, V> {
        self.slots[id.0]
            .as_ref()
            .unwrap_or_else(|| panic!("Dangling link to freed node {id}"))
    }
}

impl<K, V> std::ops::IndexMut<NodeId> for Arena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.slots[id.0]
            .as_mut()
            .unwrap_or_else(|| panic!("Dangling link to freed node {id}"))
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Walk
// ////////////////////////////////////////////////////////////////////////////

/// Iterator over the nodes linked at a single level, in key order.
pub struct Walk<'a, K, V> {
    arena: &'a Arena<K, V>,
    level: usize,
    next: Option<NodeId>,
}

impl<'a, K, V> Iterator for Walk<'a, K, V> {
    type Item = (NodeId, &'a Node<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = &self.arena[id];
        self.next = node.forward[self.level];
        Some((id, node))
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////
