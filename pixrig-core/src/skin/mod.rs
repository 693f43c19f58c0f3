//! Rigid one-bone-per-vertex skinning.
//!
//! [`bind`] is the transition into the bound state: it snapshots the pose and
//! records, for every vertex, its offset in the frame of the nearest bone. The
//! returned [`Binding`] is immutable until it is released. Bones are referenced
//! by id only; world transforms are re-resolved through the skeleton on every
//! [`Binding::deform`].

use crate::error::{Error, Result};
use crate::render::Mesh;
use crate::rig::{BoneId, BonePatch, Skeleton, WorldTransform};
use glam::Vec2;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BindEntry {
    pub bone: BoneId,
    /// Vertex position at bind time, in the bone's bind-time frame.
    pub offset: Vec2,
    pub vertex: usize,
}

/// Local pose of one bone at bind time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    pub position: Vec2,
    pub rotation: f32,
}

pub type BindPose = HashMap<BoneId, PoseSample>;

#[derive(Debug, Clone)]
pub struct Binding {
    entries: Vec<BindEntry>,
    bind_pose: BindPose,
    rest: Vec<Vec2>,
}

/// Bind `mesh` to the skeleton's current pose.
pub fn bind(skeleton: &Skeleton, mesh: Option<&Mesh>) -> Result<Binding> {
    let mesh = mesh.ok_or(Error::NoMeshLoaded)?;
    if skeleton.is_empty() {
        return Err(Error::EmptySkeleton);
    }

    let bind_pose: BindPose = skeleton
        .bones()
        .iter()
        .map(|b| (b.id, PoseSample { position: b.position, rotation: b.rotation }))
        .collect();

    // The pose is fixed for the duration of the bind, so one pass of world
    // transforms serves every vertex.
    let transforms = skeleton.world_transforms();
    let rest: Vec<Vec2> = mesh.positions().collect();
    let entries = rest
        .iter()
        .enumerate()
        .filter_map(|(vertex, &p)| {
            nearest_bone(&transforms, p).map(|(bone, wt)| BindEntry { bone, offset: wt.inverse_apply(p), vertex })
        })
        .collect::<Vec<_>>();

    log::info!("bound {} vertices to {} bones", entries.len(), skeleton.len());
    Ok(Binding { entries, bind_pose, rest })
}

// Strict comparison: the first bone scanned wins exact ties.
fn nearest_bone(transforms: &[(BoneId, WorldTransform)], p: Vec2) -> Option<(BoneId, WorldTransform)> {
    let mut best: Option<(BoneId, WorldTransform)> = None;
    let mut best_d = f32::INFINITY;
    for &(id, wt) in transforms {
        let d = wt.position.distance_squared(p);
        if d < best_d {
            best_d = d;
            best = Some((id, wt));
        }
    }
    best
}

impl Binding {
    pub fn entries(&self) -> &[BindEntry] { &self.entries }
    pub fn bind_pose(&self) -> &BindPose { &self.bind_pose }

    /// Re-project every bound vertex from the live pose. Vertices whose bone
    /// has since been deleted stay where they are.
    pub fn deform(&self, skeleton: &Skeleton, mesh: &mut Mesh) {
        let transforms: HashMap<BoneId, WorldTransform> = skeleton.world_transforms().into_iter().collect();
        for entry in &self.entries {
            if let Some(wt) = transforms.get(&entry.bone) {
                mesh.set_position(entry.vertex, wt.apply(entry.offset));
            }
        }
    }

    /// Leave the bound state, putting every vertex back at its pre-bind
    /// position.
    pub fn release(self, mesh: &mut Mesh) {
        for (i, p) in self.rest.into_iter().enumerate() {
            mesh.set_position(i, p);
        }
        log::info!("unbound; mesh restored to rest layout");
    }

    /// Restore every snapshotted bone's local pose. Bones created after the
    /// bind are not in the snapshot and keep their current values.
    pub fn reset_pose(&self, skeleton: &mut Skeleton) {
        let mut restored = 0;
        for (&id, sample) in &self.bind_pose {
            if skeleton.update_bone(id, BonePatch::new().position(sample.position).rotation(sample.rotation)) {
                restored += 1;
            }
        }
        log::debug!("reset {restored} bone(s) to bind pose");
    }
}
