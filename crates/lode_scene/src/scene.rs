//! Scene graph arena
//!
//! Nodes and primitives live in two slotmaps. A node owns an ordered list of
//! primitives and child nodes; removing a node removes its whole subtree and
//! every primitive attached to it. Keys stay valid-or-absent: a stale
//! [`NodeId`] or [`PrimitiveId`] simply misses on lookup.
//!
//! The scene is shared between components through [`SharedScene`]. Borrows
//! are short and never held across an `.await`.
//!
//! A component disposed while the scene is borrowed cannot detach its
//! primitive directly. It pushes the id onto the scene's [`DetachQueue`]
//! instead, and the next mutation (or [`Scene::flush_detached`]) removes it.

use std::cell::RefCell;
use std::rc::Rc;

use lode_core::Point;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{Result, SceneError};
use crate::primitive::RenderPrimitive;

new_key_type! {
    pub struct NodeId;
    pub struct PrimitiveId;
}

/// Scene shared by every component of one render context
pub type SharedScene = Rc<RefCell<Scene>>;

/// Primitives waiting to be detached once the scene is free
///
/// Cloned handles share one queue.
#[derive(Clone, Debug, Default)]
pub struct DetachQueue {
    pending: Rc<RefCell<Vec<PrimitiveId>>>,
}

impl DetachQueue {
    pub fn push(&self, id: PrimitiveId) {
        self.pending.borrow_mut().push(id);
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    fn take(&self) -> Vec<PrimitiveId> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

/// A positioned node in the scene tree
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub position: Point,
    pub active: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    primitives: SmallVec<[PrimitiveId; 2]>,
}

impl SceneNode {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            position: Point::ZERO,
            active: true,
            parent,
            children: Vec::new(),
            primitives: SmallVec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Primitives in draw order
    pub fn primitives(&self) -> &[PrimitiveId] {
        &self.primitives
    }
}

#[derive(Clone, Debug)]
struct PrimitiveSlot {
    owner: NodeId,
    primitive: RenderPrimitive,
}

/// Arena-backed scene tree
#[derive(Debug)]
pub struct Scene {
    nodes: SlotMap<NodeId, SceneNode>,
    primitives: SlotMap<PrimitiveId, PrimitiveSlot>,
    root: NodeId,
    detached: DetachQueue,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new("root".to_string(), None));
        Self {
            nodes,
            primitives: SlotMap::with_key(),
            root,
            detached: DetachQueue::default(),
        }
    }

    /// Create a new scene wrapped for sharing
    pub fn shared() -> SharedScene {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Handle for deferring primitive removal while the scene is borrowed
    pub fn detach_queue(&self) -> DetachQueue {
        self.detached.clone()
    }

    /// Remove every primitive queued through [`DetachQueue`]
    ///
    /// Returns how many were still attached. Called at the start of every
    /// structural mutation.
    pub fn flush_detached(&mut self) -> usize {
        let mut removed = 0;
        for id in self.detached.take() {
            if self.detach_slot(id).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!(removed, "flushed deferred primitive detaches");
        }
        removed
    }

    // =========================================================================
    // NODES
    // =========================================================================

    /// Create a child node under `parent`
    pub fn create_node(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        self.flush_detached();
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::MissingNode(parent));
        }
        let id = self.nodes.insert(SceneNode::new(name.into(), Some(parent)));
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Remove a node, its descendants and all their primitives
    pub fn remove_node(&mut self, id: NodeId) -> Result<()> {
        self.flush_detached();
        if id == self.root {
            return Err(SceneError::RootRemoval);
        }
        let parent = self
            .nodes
            .get(id)
            .ok_or(SceneError::MissingNode(id))?
            .parent;
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|child| *child != id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                for prim in node.primitives {
                    self.primitives.remove(prim);
                }
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// First direct child of `parent` with the given name
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes
            .get(parent)?
            .children
            .iter()
            .copied()
            .find(|child| self.nodes.get(*child).is_some_and(|n| n.name == name))
    }

    pub fn set_active(&mut self, id: NodeId, active: bool) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(SceneError::MissingNode(id))?;
        node.active = active;
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: Point) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(SceneError::MissingNode(id))?;
        node.position = position;
        Ok(())
    }

    /// Number of nodes, including the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // =========================================================================
    // PRIMITIVES
    // =========================================================================

    /// Attach a primitive to the end of `node`'s draw list
    pub fn attach_primitive(
        &mut self,
        node: NodeId,
        primitive: RenderPrimitive,
    ) -> Result<PrimitiveId> {
        self.flush_detached();
        if !self.nodes.contains_key(node) {
            return Err(SceneError::MissingNode(node));
        }
        let id = self.primitives.insert(PrimitiveSlot {
            owner: node,
            primitive,
        });
        self.nodes[node].primitives.push(id);
        Ok(id)
    }

    /// Swap a primitive for a fresh one at the same draw position
    ///
    /// The old id becomes invalid; the returned id refers to the new
    /// primitive.
    pub fn replace_primitive(
        &mut self,
        id: PrimitiveId,
        primitive: RenderPrimitive,
    ) -> Result<PrimitiveId> {
        self.flush_detached();
        let owner = self
            .primitives
            .remove(id)
            .ok_or(SceneError::MissingPrimitive(id))?
            .owner;
        let new_id = self.primitives.insert(PrimitiveSlot { owner, primitive });
        if let Some(node) = self.nodes.get_mut(owner) {
            if let Some(slot) = node.primitives.iter_mut().find(|p| **p == id) {
                *slot = new_id;
            }
        }
        Ok(new_id)
    }

    /// Detach and return a primitive
    pub fn detach_primitive(&mut self, id: PrimitiveId) -> Result<RenderPrimitive> {
        self.flush_detached();
        self.detach_slot(id).ok_or(SceneError::MissingPrimitive(id))
    }

    fn detach_slot(&mut self, id: PrimitiveId) -> Option<RenderPrimitive> {
        let slot = self.primitives.remove(id)?;
        if let Some(node) = self.nodes.get_mut(slot.owner) {
            node.primitives.retain(|p| *p != id);
        }
        Some(slot.primitive)
    }

    pub fn primitive(&self, id: PrimitiveId) -> Option<&RenderPrimitive> {
        self.primitives.get(id).map(|slot| &slot.primitive)
    }

    pub fn primitive_mut(&mut self, id: PrimitiveId) -> Option<&mut RenderPrimitive> {
        self.primitives.get_mut(id).map(|slot| &mut slot.primitive)
    }

    /// Node a primitive is attached to
    pub fn owner_of(&self, id: PrimitiveId) -> Option<NodeId> {
        self.primitives.get(id).map(|slot| slot.owner)
    }

    pub fn contains_primitive(&self, id: PrimitiveId) -> bool {
        self.primitives.contains_key(id)
    }

    /// Number of attached primitives, including queued detaches not yet flushed
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }
}
