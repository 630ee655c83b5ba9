use crate::config::AppConfig;
use crate::measure::{calculate_node_dimensions, MeasureSurface};
use crate::model::{children_index, MindMapData, Node, NodeId};
use crate::parser::parse_outline;
use std::collections::HashMap;
use std::f64::consts::TAU;

/// Floor for a parent's total subtree angle when dividing its window
const MIN_TOTAL_ANGLE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Radial placement of a node tree.
///
/// The engine runs two passes over a children index built from the flat node
/// table: a bottom-up pass that works out how much angle every subtree needs,
/// and a top-down pass that splits each parent's angular window among its
/// children and places them around it.
pub struct LayoutEngine<'a> {
    config: &'a AppConfig,
    nodes: &'a [Node],
    index: HashMap<NodeId, usize>,
    children: HashMap<NodeId, Vec<NodeId>>,
    subtree_angles: HashMap<NodeId, f64>,
    windows: HashMap<NodeId, (f64, f64)>,
    positions: HashMap<NodeId, (f64, f64)>,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(nodes: &'a [Node], config: &'a AppConfig) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id, i))
            .collect();

        Self {
            config,
            nodes,
            index,
            children: children_index(nodes),
            subtree_angles: HashMap::new(),
            windows: HashMap::new(),
            positions: HashMap::new(),
        }
    }

    pub fn calculate_layout(nodes: &'a [Node], config: &'a AppConfig) -> Self {
        let mut engine = Self::new(nodes, config);

        if let Some(root) = nodes.iter().find(|n| n.is_root()) {
            // First pass: angular budget per subtree
            engine.calculate_subtree_angles(root.id);

            // Second pass: positions, root at the origin
            engine.position_nodes(root.id);
        }

        engine
    }

    /// Angle (radians) the subtree rooted at `id` needs.
    pub fn subtree_angle(&self, id: NodeId) -> Option<f64> {
        self.subtree_angles.get(&id).copied()
    }

    /// Angular window `[start, end)` handed to `id` for its own children.
    pub fn window(&self, id: NodeId) -> Option<(f64, f64)> {
        self.windows.get(&id).copied()
    }

    pub fn position(&self, id: NodeId) -> Option<(f64, f64)> {
        self.positions.get(&id).copied()
    }

    pub fn into_positions(self) -> HashMap<NodeId, (f64, f64)> {
        self.positions
    }

    fn node(&self, id: NodeId) -> Option<&'a Node> {
        let nodes = self.nodes;
        self.index.get(&id).and_then(|&i| nodes.get(i))
    }

    fn leaf_angle(&self, node: &Node) -> f64 {
        (node.width / self.config.width_to_angle_divisor).max(self.config.min_leaf_angle)
    }

    fn calculate_subtree_angles(&mut self, root: NodeId) {
        // Post-order walk; a node is revisited once all its children are known
        let mut stack = vec![(root, false)];

        while let Some((id, children_done)) = stack.pop() {
            if self.subtree_angles.contains_key(&id) {
                continue;
            }
            let children = self.children.get(&id).cloned().unwrap_or_default();

            let angle = if children.is_empty() {
                match self.node(id) {
                    Some(node) => self.leaf_angle(node),
                    None => self.config.min_leaf_angle,
                }
            } else if !children_done {
                stack.push((id, true));
                stack.extend(children.iter().rev().map(|&child| (child, false)));
                continue;
            } else {
                let sum: f64 = children
                    .iter()
                    .map(|child| self.subtree_angles.get(child).copied().unwrap_or(0.0))
                    .sum();
                sum + (children.len() - 1) as f64 * self.config.sibling_gap
            };

            self.subtree_angles.insert(id, angle);
        }
    }

    fn position_nodes(&mut self, root: NodeId) {
        // The root always has at least the full circle to share out
        let root_window = self.subtree_angle(root).unwrap_or(TAU).max(TAU);
        self.positions.insert(root, (0.0, 0.0));
        self.windows.insert(root, (0.0, root_window));

        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let Some(children) = self.children.get(&id).cloned() else {
                continue;
            };
            let (Some(parent), Some((parent_x, parent_y)), Some((start, end))) =
                (self.node(id), self.position(id), self.window(id))
            else {
                continue;
            };

            let total = self.subtree_angle(id).unwrap_or(0.0).max(MIN_TOTAL_ANGLE);
            let available = end - start;
            let mut current = start;

            for child_id in children {
                let Some(child) = self.node(child_id) else {
                    continue;
                };
                let slice = self.subtree_angle(child_id).unwrap_or(0.0) / total * available;
                let angle = current + slice / 2.0;
                let radius = parent.level as f64 * self.config.level_spacing
                    + parent.half_diagonal()
                    + child.half_diagonal()
                    + self.config.clearance;

                self.positions.insert(
                    child_id,
                    (
                        parent_x + angle.cos() * radius,
                        parent_y + angle.sin() * radius,
                    ),
                );
                self.windows.insert(child_id, (current, current + slice));
                stack.push(child_id);
                current += slice;
            }
        }
    }
}

/// Measure every node's label in place.
pub fn measure_nodes<S: MeasureSurface + ?Sized>(
    nodes: &mut [Node],
    surface: &mut S,
    config: &AppConfig,
) {
    for node in nodes.iter_mut() {
        let dims = calculate_node_dimensions(&node.text, surface, config);
        node.width = dims.width;
        node.height = dims.height;
        node.lines = dims.lines;
    }
}

/// Place measured nodes radially and center the result on the origin.
pub fn layout_nodes(nodes: &mut [Node], config: &AppConfig) {
    let positions = LayoutEngine::calculate_layout(nodes, config).into_positions();

    for node in nodes.iter_mut() {
        if let Some(&(x, y)) = positions.get(&node.id) {
            node.x = x;
            node.y = y;
        }
    }

    normalize_bounds(nodes);
}

/// Axis-aligned box around every node's rectangle.
pub fn bounds(nodes: &[Node]) -> Option<Bounds> {
    if nodes.is_empty() {
        return None;
    }

    let mut b = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    for n in nodes {
        b.min_x = b.min_x.min(n.x - n.width / 2.0);
        b.max_x = b.max_x.max(n.x + n.width / 2.0);
        b.min_y = b.min_y.min(n.y - n.height / 2.0);
        b.max_y = b.max_y.max(n.y + n.height / 2.0);
    }

    Some(b)
}

/// Translate all nodes so their bounding box is centered on the origin.
pub fn normalize_bounds(nodes: &mut [Node]) {
    let Some(b) = bounds(nodes) else {
        return;
    };
    let (center_x, center_y) = b.center();
    if !(center_x.is_finite() && center_y.is_finite()) {
        return;
    }

    for node in nodes.iter_mut() {
        node.x -= center_x;
        node.y -= center_y;
    }
}

/// Full pipeline: parse, measure, place, center.
///
/// Total over all inputs; empty text yields a lone root named after `title`.
pub fn generate_mind_map<S: MeasureSurface + ?Sized>(
    content: &str,
    title: &str,
    surface: &mut S,
    config: &AppConfig,
) -> MindMapData {
    let mut data = parse_outline(content, title);
    layout_map(&mut data, surface, config);
    data
}

/// Measure and place every node of a freshly parsed map.
pub fn layout_map<S: MeasureSurface + ?Sized>(
    data: &mut MindMapData,
    surface: &mut S,
    config: &AppConfig,
) {
    measure_nodes(&mut data.nodes, surface, config);
    layout_nodes(&mut data.nodes, config);

    tracing::debug!(title = %data.title, nodes = data.nodes.len(), "laid out mind map");
}
