//! Error types for document operations
//!
//! Simple, flat error hierarchy. No over-engineering.

use crate::types::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    /// The element-name mini-grammar yielded no tag. The only way element
    /// construction can fail.
    #[error("failed to create element for: {0:?}")]
    InvalidName(String),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
}
