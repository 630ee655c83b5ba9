use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::measure::{calculate_node_dimensions, MeasureSurface};
use crate::model::{MindMapData, NodeId};

/// Replace a node's label and re-measure it.
///
/// Returns `false` without touching the map when the trimmed text is empty or
/// unchanged. The node keeps its position.
pub fn update_node_text<S: MeasureSurface + ?Sized>(
    data: &mut MindMapData,
    id: NodeId,
    text: &str,
    surface: &mut S,
    config: &AppConfig,
) -> AppResult<bool> {
    let node = data.node_mut(id).ok_or(AppError::NodeNotFound(id))?;
    let new_text = text.trim();

    if new_text.is_empty() || new_text == node.text {
        return Ok(false);
    }

    let dims = calculate_node_dimensions(new_text, surface, config);
    node.text = new_text.to_string();
    node.width = dims.width;
    node.height = dims.height;
    node.lines = dims.lines;

    tracing::debug!(id, "node text updated");
    Ok(true)
}
