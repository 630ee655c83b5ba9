//! Node explanations from an external text service.
//!
//! The crate never talks to a service itself. Hosts plug one in through
//! [`Explainer`]; any failure degrades to a fixed message.

use crate::errors::{AppError, AppResult};
use crate::model::{MindMapData, NodeId};
use thiserror::Error;

pub const DISABLED_MESSAGE: &str = "AI features are disabled. API key not found.";
pub const FAILURE_MESSAGE: &str = "Sorry, I couldn't generate an explanation for this topic.";

#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("Explanation service unavailable: {0}")]
    Unavailable(String),
    #[error("Explanation request failed: {0}")]
    Request(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainRequest {
    /// Title of the whole map
    pub title: String,
    /// Label of the node to explain
    pub concept: String,
    /// Labels of the node's siblings (itself included), parent and children
    pub related: Vec<String>,
}

pub trait Explainer {
    fn explain(&self, request: &ExplainRequest) -> Result<String, ExplainError>;
}

/// Labels near `id`: nodes sharing its parent, the parent itself, and its children.
pub fn related_texts(data: &MindMapData, id: NodeId) -> AppResult<Vec<String>> {
    let node = data.node(id).ok_or(AppError::NodeNotFound(id))?;

    Ok(data
        .nodes
        .iter()
        .filter(|n| {
            n.parent_id == node.parent_id || Some(n.id) == node.parent_id || n.parent_id == Some(id)
        })
        .map(|n| n.text.clone())
        .collect())
}

pub fn build_request(data: &MindMapData, id: NodeId) -> AppResult<ExplainRequest> {
    let node = data.node(id).ok_or(AppError::NodeNotFound(id))?;

    Ok(ExplainRequest {
        title: data.title.clone(),
        concept: node.text.clone(),
        related: related_texts(data, id)?,
    })
}

/// Ask `explainer` about a node. Never fails for a known node.
pub fn explain_node(
    data: &MindMapData,
    id: NodeId,
    explainer: Option<&dyn Explainer>,
) -> AppResult<String> {
    let request = build_request(data, id)?;

    let Some(explainer) = explainer else {
        return Ok(DISABLED_MESSAGE.to_string());
    };

    match explainer.explain(&request) {
        Ok(text) => Ok(text.trim().to_string()),
        Err(err) => {
            tracing::warn!(id, error = %err, "failed to get explanation");
            Ok(FAILURE_MESSAGE.to_string())
        }
    }
}
