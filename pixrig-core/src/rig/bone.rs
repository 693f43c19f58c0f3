use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Influence hint carried on every bone. Binding ignores it.
pub const DEFAULT_RADIUS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoneId(pub u32);

impl fmt::Display for BoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub id: BoneId,
    pub name: String,
    pub parent: Option<BoneId>,
    /// Offset from the parent's frame, expressed in the parent's rotated space.
    pub position: Vec2,
    /// Radians, relative to the parent's accumulated world rotation.
    pub rotation: f32,
    /// Zero means a bare joint.
    pub length: f32,
    pub radius: f32,
}

impl Bone {
    pub fn is_root(&self) -> bool { self.parent.is_none() }
    pub fn is_joint(&self) -> bool { self.length <= 0.0 }
    pub fn rotation_degrees(&self) -> f32 { self.rotation.to_degrees() }
}

/// Position and rotation of a bone in the shared scene frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldTransform {
    pub position: Vec2,
    pub rotation: f32,
}

impl WorldTransform {
    pub const IDENTITY: Self = Self { position: Vec2::ZERO, rotation: 0.0 };

    /// Map a point from this frame into the scene frame.
    pub fn apply(&self, local: Vec2) -> Vec2 {
        self.position + Vec2::from_angle(self.rotation).rotate(local)
    }

    /// Map a scene point into this frame: translate, then de-rotate.
    pub fn inverse_apply(&self, world: Vec2) -> Vec2 {
        Vec2::from_angle(-self.rotation).rotate(world - self.position)
    }
}

/// Partial update for [`Skeleton::update_bone`](super::Skeleton::update_bone).
/// The property panel edits one field at a time through this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BonePatch {
    pub name: Option<String>,
    pub position: Option<Vec2>,
    pub rotation: Option<f32>,
    pub length: Option<f32>,
    pub radius: Option<f32>,
}

impl BonePatch {
    pub fn new() -> Self { Self::default() }
    pub fn name(mut self, name: impl Into<String>) -> Self { self.name = Some(name.into()); self }
    pub fn position(mut self, position: Vec2) -> Self { self.position = Some(position); self }
    pub fn rotation(mut self, radians: f32) -> Self { self.rotation = Some(radians); self }
    /// Panel-facing rotation in degrees, stored as radians.
    pub fn rotation_degrees(mut self, degrees: f32) -> Self { self.rotation = Some(degrees.to_radians()); self }
    pub fn length(mut self, length: f32) -> Self { self.length = Some(length); self }
    pub fn radius(mut self, radius: f32) -> Self { self.radius = Some(radius); self }

    pub(crate) fn apply_to(self, bone: &mut Bone) {
        if let Some(name) = self.name { bone.name = name; }
        if let Some(position) = self.position { bone.position = position; }
        if let Some(rotation) = self.rotation { bone.rotation = rotation; }
        if let Some(length) = self.length { bone.length = length.max(0.0); }
        if let Some(radius) = self.radius { bone.radius = radius; }
    }
}
