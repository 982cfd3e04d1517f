use crate::fog::Fog;
use crate::node::{Light, Node, NodeKind};
use glam::Mat4;
use haunted_common::{Color, NodeId};
use std::collections::BTreeMap;

/// The scene container.
///
/// Holds every node keyed by id plus the global atmosphere. Uses BTreeMap so
/// iteration follows insertion order, which keeps draw order and debug output
/// stable between runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u32,
    pub fog: Fog,
    pub background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with default fog and a black background.
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 0,
            fog: Fog::default(),
            background: Color::BLACK,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Read-only access to all nodes in insertion order.
    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    /// Insert a top-level node. Returns its id.
    pub fn add(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        self.insert(node)
    }

    /// Insert a node under `parent`.
    ///
    /// An unknown parent is a programming error in the builder; the node is
    /// attached at the root instead and a warning is logged.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        if self.nodes.contains_key(&parent) {
            node.parent = Some(parent);
        } else {
            tracing::warn!(%parent, name = %node.name, "parent not found, attaching at root");
            node.parent = None;
        }
        self.insert(node)
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        tracing::trace!(%id, name = %node.name, "node added");
        self.nodes.insert(id, node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn light(&self, id: NodeId) -> Option<&Light> {
        self.get(id).and_then(Node::as_light)
    }

    pub fn light_mut(&mut self, id: NodeId) -> Option<&mut Light> {
        self.get_mut(id).and_then(Node::as_light_mut)
    }

    /// Direct children of `parent`, in insertion order.
    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .filter(move |(_, n)| n.parent == Some(parent))
            .map(|(id, n)| (*id, n))
    }

    /// Local-to-world matrix of a node, composed through its parents.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.get(id)?;
        let mut m = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = self.get(parent)?;
            m = node.transform.matrix() * m;
        }
        Some(m)
    }

    /// All mesh nodes with their world matrices.
    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &Node, Mat4)> {
        self.nodes.iter().filter_map(|(id, n)| match n.kind {
            NodeKind::Mesh { .. } => Some((*id, n, self.world_matrix(*id)?)),
            _ => None,
        })
    }

    /// All lights with their world-space positions.
    pub fn lights(&self) -> impl Iterator<Item = (NodeId, &Light, glam::Vec3)> {
        self.nodes.iter().filter_map(|(id, n)| {
            let light = n.as_light()?;
            let pos = self.world_matrix(*id)?.w_axis.truncate();
            Some((*id, light, pos))
        })
    }
}
