use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type NodeId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeColor {
    Primary,
    Secondary,
    Muted,
    Custom(String),
}

impl NodeColor {
    /// Default color token for a node parsed at `level`.
    pub fn for_level(level: u32) -> Self {
        match level {
            0 => NodeColor::Primary,
            1 => NodeColor::Secondary,
            _ => NodeColor::Muted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub text: String,
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    // Center of the node in layout units
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub lines: Vec<String>,
    pub color: NodeColor,
}

impl Node {
    /// An unmeasured, unpositioned node.
    pub fn new(id: NodeId, text: String, level: u32, parent_id: Option<NodeId>) -> Self {
        Self {
            id,
            text,
            level,
            parent_id,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            lines: Vec::new(),
            color: NodeColor::for_level(level),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Half the diagonal of the node's bounding box.
    pub fn half_diagonal(&self) -> f64 {
        self.width.hypot(self.height) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapData {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    pub title: String,
}

impl MindMapData {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            connections: Vec::new(),
            title: title.into(),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_root())
    }

    /// Children of `id` in insertion order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.nodes
            .iter()
            .filter(move |n| n.parent_id == Some(id))
    }

    /// Next free id: one past the largest id in use.
    pub fn next_id(&self) -> NodeId {
        self.nodes
            .iter()
            .map(|n| n.id)
            .max()
            .map_or(0, |max| max + 1)
    }
}

/// Children of every node, in node order, keyed by parent id.
pub fn children_index(nodes: &[Node]) -> HashMap<NodeId, Vec<NodeId>> {
    let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for node in nodes {
        if let Some(parent_id) = node.parent_id {
            children.entry(parent_id).or_default().push(node.id);
        }
    }
    children
}
