use crate::errors::AppResult;
use crate::model::{children_index, Connection, MindMapData, Node, NodeId};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[*-]\s*").unwrap());
static EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.[^/.]+$").unwrap());

/// Read an outline file. The file name is the fallback title unless one is given.
pub fn load_file(path: &Path, title: Option<&str>) -> AppResult<MindMapData> {
    let content = fs::read_to_string(path)?;
    let title = match title {
        Some(title) => title.to_string(),
        None => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    Ok(parse_outline(&content, &title))
}

/// Parse an indented outline into an unmeasured, unpositioned tree.
///
/// The first non-blank line labels the root. Every later line becomes a node
/// whose depth is `leading_whitespace / 2 + 1`. Open ancestors are popped
/// until the top's tree level is below that depth, and the node hangs from
/// the top one level deeper than it.
pub fn parse_outline(content: &str, title: &str) -> MindMapData {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    let root_text = lines
        .next()
        .map(strip_bullet)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            tracing::debug!(title, "outline has no root line, using title");
            strip_extension(title)
        });

    let mut data = MindMapData::new(title);
    data.nodes.push(Node::new(0, root_text, 0, None));

    // (node id, tree level)
    let mut level_stack: Vec<(NodeId, u32)> = vec![(0, 0)];
    let mut next_id: NodeId = 1;

    for line in lines {
        let indent_depth = leading_whitespace(line) / 2 + 1;
        let text = strip_bullet(line);

        if text.is_empty() {
            continue;
        }

        // The root sits at level 0 and is never popped
        while level_stack.len() > 1
            && level_stack.last().is_some_and(|&(_, level)| level as usize >= indent_depth)
        {
            level_stack.pop();
        }

        let (parent_id, parent_level) = level_stack[level_stack.len() - 1];
        let level = parent_level + 1;
        let id = next_id;
        next_id += 1;

        data.nodes
            .push(Node::new(id, text.to_string(), level, Some(parent_id)));
        data.connections.push(Connection {
            from: parent_id,
            to: id,
        });
        level_stack.push((id, level));
    }

    tracing::debug!(
        nodes = data.nodes.len(),
        connections = data.connections.len(),
        "parsed outline"
    );

    data
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim();
    match BULLET.find(trimmed) {
        Some(bullet) => &trimmed[bullet.end()..],
        None => trimmed,
    }
}

/// `"My Doc.txt"` becomes `"My Doc"`.
pub fn strip_extension(title: &str) -> String {
    EXTENSION.replace(title, "").into_owned()
}

/// Render a map back into an indented outline that parses to the same tree.
pub fn to_outline(data: &MindMapData) -> String {
    let mut result = String::new();
    let Some(root) = data.root() else {
        return result;
    };
    result.push_str(&root.text);
    result.push('\n');

    let children = children_index(&data.nodes);
    let texts: HashMap<NodeId, &str> = data
        .nodes
        .iter()
        .map(|n| (n.id, n.text.as_str()))
        .collect();

    let mut stack: Vec<(NodeId, usize)> = children
        .get(&root.id)
        .map(|ids| ids.iter().rev().map(|&id| (id, 0)).collect())
        .unwrap_or_default();

    while let Some((id, depth)) = stack.pop() {
        result.push_str(&"  ".repeat(depth));
        result.push_str("- ");
        result.push_str(texts.get(&id).copied().unwrap_or_default());
        result.push('\n');

        if let Some(ids) = children.get(&id) {
            stack.extend(ids.iter().rev().map(|&child| (child, depth + 1)));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeColor;
    use insta::assert_snapshot;

    fn texts(data: &MindMapData) -> Vec<&str> {
        data.nodes.iter().map(|n| n.text.as_str()).collect()
    }

    fn child_texts(data: &MindMapData, id: NodeId) -> Vec<&str> {
        data.children(id).map(|n| n.text.as_str()).collect()
    }

    #[test]
    fn test_parse_empty_content() {
        let data = parse_outline("", "My Doc.txt");

        assert_eq!(data.nodes.len(), 1);
        assert_eq!(data.nodes[0].text, "My Doc");
        assert_eq!(data.nodes[0].level, 0);
        assert!(data.connections.is_empty());
        assert_eq!(data.title, "My Doc.txt");
    }

    #[test]
    fn test_parse_whitespace_only_content() {
        let data = parse_outline("   \n\t\n  \n", "notes.md");

        assert_eq!(texts(&data), vec!["notes"]);
        assert!(data.connections.is_empty());
    }

    #[test]
    fn test_parse_single_node() {
        let data = parse_outline("Root Node", "ignored.txt");

        assert_eq!(data.nodes.len(), 1);
        assert_eq!(data.nodes[0].text, "Root Node");
    }

    #[test]
    fn test_parse_simple_tree() {
        let data = parse_outline("Root\n- A\n  - A1\n- B", "doc.txt");

        assert_eq!(data.nodes.len(), 4);
        assert_eq!(data.connections.len(), 3);
        assert_eq!(texts(&data), vec!["Root", "A", "A1", "B"]);

        assert_eq!(child_texts(&data, 0), vec!["A", "B"]);
        assert_eq!(child_texts(&data, 1), vec!["A1"]);

        let levels: Vec<_> = data.nodes.iter().map(|n| n.level).collect();
        assert_eq!(levels, vec![0, 1, 2, 1]);
        assert_eq!(
            data.connections,
            vec![
                Connection { from: 0, to: 1 },
                Connection { from: 1, to: 2 },
                Connection { from: 0, to: 3 },
            ]
        );
    }

    #[test]
    fn test_ids_are_sequential() {
        let data = parse_outline("Root\n- A\n- B\n- C", "doc");
        let ids: Vec<_> = data.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_root_bullet_is_stripped() {
        let data = parse_outline("  * Topic\n- Sub", "doc");
        assert_eq!(data.nodes[0].text, "Topic");
        assert_eq!(data.nodes[1].parent_id, Some(0));
    }

    #[test]
    fn test_bare_bullet_root_falls_back_to_title() {
        let data = parse_outline("-\n- Child", "Plan.v2.md");
        assert_eq!(texts(&data), vec!["Plan.v2", "Child"]);
    }

    #[test]
    fn test_parse_with_bullets() {
        let data = parse_outline("Root\n* Child with asterisk\n- Child with dash\n-NoSpace", "doc");

        assert_eq!(
            child_texts(&data, 0),
            vec!["Child with asterisk", "Child with dash", "NoSpace"]
        );
    }

    #[test]
    fn test_empty_bullet_lines_are_skipped() {
        let data = parse_outline("Root\n- A\n  -\n  - A1", "doc");

        assert_eq!(texts(&data), vec!["Root", "A", "A1"]);
        assert_eq!(data.nodes[2].parent_id, Some(1));
    }

    #[test]
    fn test_parse_with_empty_lines() {
        let data = parse_outline("Root\n\n- Child 1\n   \n\n- Child 2", "doc");

        assert_eq!(data.nodes.len(), 3);
        assert_eq!(child_texts(&data, 0), vec!["Child 1", "Child 2"]);
    }

    #[test]
    fn test_unindented_lines_are_first_level() {
        let data = parse_outline("Root\nAlpha\nBeta", "doc");

        assert_eq!(child_texts(&data, 0), vec!["Alpha", "Beta"]);
        assert!(data.nodes[1..].iter().all(|n| n.level == 1));
    }

    #[test]
    fn test_depth_drops_several_levels_at_once() {
        let content = "Root\n- A\n  - B\n    - C\n      - D\n- E";
        let data = parse_outline(content, "doc");

        let e = data.nodes.iter().find(|n| n.text == "E").unwrap();
        assert_eq!(e.parent_id, Some(0));
        assert_eq!(e.level, 1);
    }

    #[test]
    fn test_skipped_depth_attaches_to_stack_top() {
        // "Deep" is indented three levels below "A" but can only be its child
        let content = "Root\n- A\n      - Deep\n      - Deeper sibling\n  - A2";
        let data = parse_outline(content, "doc");

        let deep = &data.nodes[2];
        assert_eq!(deep.parent_id, Some(1));
        assert_eq!(deep.level, 2);

        // Same indentation, but "Deep" only sits at level 2
        let next = &data.nodes[3];
        assert_eq!(next.parent_id, Some(2));
        assert_eq!(next.level, 3);

        let a2 = &data.nodes[4];
        assert_eq!(a2.parent_id, Some(1));
        assert_eq!(a2.level, 2);
    }

    #[test]
    fn test_shallower_line_after_skipped_depth() {
        let data = parse_outline("Root\n- A\n      - Deep\n    - X", "doc");

        assert_eq!(texts(&data), vec!["Root", "A", "Deep", "X"]);
        assert_eq!(data.nodes[2].parent_id, Some(1));
        assert_eq!(data.nodes[3].parent_id, Some(2));
        assert_eq!(data.nodes[3].level, 3);
    }

    #[test]
    fn test_equal_depth_after_skip_pops_to_level() {
        // Depth 2 pops "Deep" (level 2) and hangs from "A"
        let data = parse_outline("Root\n- A\n      - Deep\n  - B", "doc");

        assert_eq!(child_texts(&data, 1), vec!["Deep", "B"]);
    }

    #[test]
    fn test_odd_indentation_rounds_down() {
        // Three spaces is depth 2, one space is still depth 1
        let data = parse_outline("Root\nA\n   A1\n B", "doc");

        assert_eq!(child_texts(&data, 0), vec!["A", "B"]);
        assert_eq!(child_texts(&data, 1), vec!["A1"]);
    }

    #[test]
    fn test_tabs_count_as_single_characters() {
        // Two and three tabs both land on depth 2
        let data = parse_outline("Root\n\tA\n\t\tA1\n\t\t\tA2", "doc");

        assert_eq!(child_texts(&data, 0), vec!["A"]);
        assert_eq!(child_texts(&data, 1), vec!["A1", "A2"]);
    }

    #[test]
    fn test_windows_line_endings() {
        let data = parse_outline("Root\r\n- A\r\n  - A1\r\n", "doc");

        assert_eq!(texts(&data), vec!["Root", "A", "A1"]);
        assert_eq!(data.nodes[2].parent_id, Some(1));
    }

    #[test]
    fn test_parse_with_unicode() {
        let data = parse_outline("Root ✓\n- 子节点 🎯\n- ✗ Failed node", "doc");

        assert_eq!(texts(&data), vec!["Root ✓", "子节点 🎯", "✗ Failed node"]);
    }

    #[test]
    fn test_colors_follow_level() {
        let data = parse_outline("Root\n- A\n  - A1", "doc");

        assert_eq!(data.nodes[0].color, NodeColor::Primary);
        assert_eq!(data.nodes[1].color, NodeColor::Secondary);
        assert_eq!(data.nodes[2].color, NodeColor::Muted);
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("My Doc.txt"), "My Doc");
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_extension("README"), "README");
        assert_eq!(strip_extension("dir.d/notes"), "dir.d/notes");
    }

    #[test]
    fn test_to_outline() {
        let content = "Business Strategy\n- Market Analysis\n  - Competitive landscape\n  - Market size\n- Financial Planning\n      - Revenue projections";
        let data = parse_outline(content, "strategy.pdf");

        assert_snapshot!(to_outline(&data).trim_end(), @r"
        Business Strategy
        - Market Analysis
          - Competitive landscape
          - Market size
        - Financial Planning
          - Revenue projections
        ");
    }

    #[test]
    fn test_round_trip() {
        let original = "Root\n- Child 1\n  - Grandchild 1\n- Child 2\n  - Grandchild 2";
        let data = parse_outline(original, "doc");

        let exported = to_outline(&data);
        let reparsed = parse_outline(&exported, "doc");

        assert_eq!(data, reparsed);
    }

    #[test]
    fn test_load_file_uses_file_name_as_title() {
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let path = dir.path().join("Quarterly Plan.txt");
        std::fs::write(&path, "").unwrap();

        let data = load_file(&path, None).unwrap();
        assert_eq!(data.title, "Quarterly Plan.txt");
        assert_eq!(data.nodes[0].text, "Quarterly Plan");

        let data = load_file(&path, Some("Override")).unwrap();
        assert_eq!(data.title, "Override");
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_file(Path::new("/nonexistent/outline.txt"), None);
        assert!(result.is_err());
    }
}
