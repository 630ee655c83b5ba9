// Not every test binary uses every helper
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use visualmind::{generate_mind_map, AppConfig, CellMetricsSurface, MindMapData};

/// Run the full pipeline with the default configuration.
pub fn layout(content: &str, title: &str) -> MindMapData {
    let config = AppConfig::default();
    let mut surface = CellMetricsSurface::from_config(&config);
    generate_mind_map(content, title, &mut surface, &config)
}

/// Check the structural invariants every generated map must satisfy.
pub fn assert_tree_invariants(data: &MindMapData) {
    let roots: Vec<_> = data.nodes.iter().filter(|n| n.is_root()).collect();
    assert_eq!(roots.len(), 1, "exactly one root expected");
    assert_eq!(roots[0].level, 0);

    let ids: HashSet<_> = data.nodes.iter().map(|n| n.id).collect();
    assert_eq!(ids.len(), data.nodes.len(), "ids must be unique");

    let levels: HashMap<_, _> = data.nodes.iter().map(|n| (n.id, n.level)).collect();
    for node in data.nodes.iter().filter(|n| !n.is_root()) {
        let parent_id = node.parent_id.unwrap();
        assert_eq!(
            node.level,
            levels[&parent_id] + 1,
            "node {} is not one level below its parent",
            node.id
        );
    }

    assert_eq!(data.connections.len(), data.nodes.len() - 1);
    for conn in &data.connections {
        assert!(ids.contains(&conn.from) && ids.contains(&conn.to));
        let child = data.node(conn.to).unwrap();
        assert_eq!(child.parent_id, Some(conn.from));
    }
}

/// Build an outline from `(depth, label)` pairs under a root line.
pub fn outline_from(root: &str, entries: &[(usize, String)]) -> String {
    let mut outline = format!("{root}\n");
    for (depth, label) in entries {
        outline.push_str(&"  ".repeat(*depth));
        outline.push_str("- ");
        outline.push_str(label);
        outline.push('\n');
    }
    outline
}

/// Center of the bounding box around every node.
pub fn layout_center(data: &MindMapData) -> (f64, f64) {
    visualmind::layout::bounds(&data.nodes)
        .map(|b| b.center())
        .unwrap_or((0.0, 0.0))
}
