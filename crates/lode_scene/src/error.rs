//! Scene errors

use thiserror::Error;

use crate::scene::{NodeId, PrimitiveId};

/// Errors raised by [`Scene`](crate::Scene) mutations
///
/// Renderer components check their lifecycle before touching the scene, so
/// these only surface from direct scene use. Components log them instead of
/// returning them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} is not in the scene")]
    MissingNode(NodeId),

    #[error("primitive {0:?} is not in the scene")]
    MissingPrimitive(PrimitiveId),

    #[error("the scene root cannot be removed")]
    RootRemoval,
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
