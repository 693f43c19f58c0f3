use crate::rig::BoneId;
use thiserror::Error;

/// Structural failures reported to the editing surface. None of them are
/// fatal; the render loop keeps running after any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("parent bone {0} does not exist")]
    InvalidParent(BoneId),
    #[error("no sprite mesh is loaded")]
    NoMeshLoaded,
    #[error("skeleton has no bones")]
    EmptySkeleton,
    #[error("unknown bone {0}")]
    UnknownBoneId(BoneId),
    #[error("export not ready: {0}")]
    ExportNotReady(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
