//! Bone forest and the forward-kinematics solver.
//!
//! Bones live in a flat arena keyed by [`BoneId`]; parents are resolved by id
//! on every query so no transform is ever cached between calls.

mod bone;
mod document;
mod skeleton;

pub use bone::{Bone, BoneId, BonePatch, WorldTransform, DEFAULT_RADIUS};
pub use document::{BoneRecord, PoseRecord, RigDocument};
pub use skeleton::Skeleton;
