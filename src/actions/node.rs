use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::measure::{calculate_node_dimensions, MeasureSurface};
use crate::model::{Connection, MindMapData, Node, NodeColor, NodeId};

pub const NEW_NODE_TEXT: &str = "New Idea";

/// Distance from a parent's edge at which a manually added child appears
const NEW_NODE_OFFSET: f64 = 100.0;

/// Append a `"New Idea"` child to `parent_id`, placed at `angle` around it.
///
/// Interactive hosts usually pick `angle` at random. Returns the new id.
pub fn add_child_node<S: MeasureSurface + ?Sized>(
    data: &mut MindMapData,
    parent_id: NodeId,
    angle: f64,
    surface: &mut S,
    config: &AppConfig,
) -> AppResult<NodeId> {
    let parent = data
        .node(parent_id)
        .ok_or(AppError::NodeNotFound(parent_id))?;

    let id = data.next_id();
    let dims = calculate_node_dimensions(NEW_NODE_TEXT, surface, config);
    let radius = NEW_NODE_OFFSET + parent.width / 2.0;

    let mut node = Node::new(id, NEW_NODE_TEXT.to_string(), parent.level + 1, Some(parent_id));
    node.x = parent.x + angle.cos() * radius;
    node.y = parent.y + angle.sin() * radius;
    node.width = dims.width;
    node.height = dims.height;
    node.lines = dims.lines;
    node.color = NodeColor::Muted;

    data.nodes.push(node);
    data.connections.push(Connection {
        from: parent_id,
        to: id,
    });

    tracing::debug!(id, parent_id, "node added");
    Ok(id)
}

pub fn set_node_color(data: &mut MindMapData, id: NodeId, color: NodeColor) -> AppResult<()> {
    let node = data.node_mut(id).ok_or(AppError::NodeNotFound(id))?;
    node.color = color;
    Ok(())
}

/// Move a node's center, e.g. at the end of a drag.
pub fn move_node(data: &mut MindMapData, id: NodeId, x: f64, y: f64) -> AppResult<()> {
    let node = data.node_mut(id).ok_or(AppError::NodeNotFound(id))?;
    node.x = x;
    node.y = y;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::generate_mind_map;
    use crate::measure::CellMetricsSurface;
    use std::f64::consts::FRAC_PI_2;

    fn setup() -> (MindMapData, CellMetricsSurface, AppConfig) {
        let config = AppConfig::default();
        let mut surface = CellMetricsSurface::from_config(&config);
        let data = generate_mind_map("Root\n- A\n  - A1\n- B", "doc", &mut surface, &config);
        (data, surface, config)
    }

    #[test]
    fn test_add_child_node() {
        let (mut data, mut surface, config) = setup();
        let parent = data.node(1).unwrap().clone();

        let id = add_child_node(&mut data, 1, FRAC_PI_2, &mut surface, &config).unwrap();

        assert_eq!(id, 4);
        let node = data.node(id).unwrap();
        assert_eq!(node.text, NEW_NODE_TEXT);
        assert_eq!(node.level, parent.level + 1);
        assert_eq!(node.parent_id, Some(1));
        assert_eq!(node.color, NodeColor::Muted);
        assert!(node.width > 0.0);

        // Straight below the parent
        let radius = 100.0 + parent.width / 2.0;
        assert!((node.x - parent.x).abs() < 1e-9);
        assert!((node.y - (parent.y + radius)).abs() < 1e-9);

        assert_eq!(data.connections.last(), Some(&Connection { from: 1, to: 4 }));
    }

    #[test]
    fn test_added_ids_keep_growing() {
        let (mut data, mut surface, config) = setup();

        let first = add_child_node(&mut data, 0, 0.0, &mut surface, &config).unwrap();
        let second = add_child_node(&mut data, first, 1.0, &mut surface, &config).unwrap();

        assert_eq!(second, first + 1);
        assert_eq!(data.node(second).unwrap().level, 2);
        assert_eq!(data.nodes.len(), data.connections.len() + 1);
    }

    #[test]
    fn test_add_child_to_unknown_parent() {
        let (mut data, mut surface, config) = setup();
        let before = data.clone();

        let result = add_child_node(&mut data, 42, 0.0, &mut surface, &config);

        assert!(matches!(result, Err(AppError::NodeNotFound(42))));
        assert_eq!(data, before);
    }

    #[test]
    fn test_set_node_color() {
        let (mut data, _, _) = setup();

        set_node_color(&mut data, 2, NodeColor::Custom("#4ade80".to_string())).unwrap();
        assert_eq!(
            data.node(2).unwrap().color,
            NodeColor::Custom("#4ade80".to_string())
        );

        assert!(set_node_color(&mut data, 9, NodeColor::Primary).is_err());
    }

    #[test]
    fn test_move_node() {
        let (mut data, _, _) = setup();
        let other = data.node(2).unwrap().clone();

        move_node(&mut data, 1, 12.5, -40.0).unwrap();

        let node = data.node(1).unwrap();
        assert_eq!((node.x, node.y), (12.5, -40.0));
        assert_eq!(data.node(2).unwrap(), &other);
    }
}
