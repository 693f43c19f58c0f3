//! JSON rig description used by hosts to save and restore a skeleton plus a
//! set of pose overrides.

use super::bone::{BoneId, BonePatch, DEFAULT_RADIUS};
use super::skeleton::Skeleton;
use crate::error::{Error, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RigDocument {
    pub bones: Vec<BoneRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pose: Vec<PoseRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoneRecord {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent: Option<u32>,
    pub position: [f32; 2],
    #[serde(default)]
    pub rotation_deg: f32,
    #[serde(default)]
    pub length: f32,
    #[serde(default = "default_radius")]
    pub radius: f32,
}

/// Override applied after binding, keyed by the document's bone ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseRecord {
    pub bone: u32,
    #[serde(default)]
    pub position: Option<[f32; 2]>,
    #[serde(default)]
    pub rotation_deg: Option<f32>,
}

fn default_radius() -> f32 { DEFAULT_RADIUS }

impl RigDocument {
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let doc: RigDocument = serde_json::from_str(s)?;
        Ok(doc)
    }

    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn to_json_string(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Capture a live skeleton. Pose overrides are left empty.
    pub fn from_skeleton(skeleton: &Skeleton) -> Self {
        let bones = skeleton
            .bones()
            .iter()
            .map(|b| BoneRecord {
                id: b.id.0,
                name: Some(b.name.clone()),
                parent: b.parent.map(|p| p.0),
                position: b.position.to_array(),
                rotation_deg: b.rotation.to_degrees(),
                length: b.length,
                radius: b.radius,
            })
            .collect();
        Self { bones, pose: Vec::new() }
    }

    /// Replay the records through [`Skeleton::add_bone`]. Records must list
    /// parents before children. Returns the skeleton and the mapping from
    /// document ids to live ids.
    pub fn build(&self) -> Result<(Skeleton, HashMap<u32, BoneId>)> {
        let mut skeleton = Skeleton::new();
        let mut ids = HashMap::new();
        for rec in &self.bones {
            let parent = match rec.parent {
                Some(p) => Some(*ids.get(&p).ok_or(Error::InvalidParent(BoneId(p)))?),
                None => None,
            };
            let id = skeleton.add_bone(parent, Vec2::from(rec.position), rec.rotation_deg.to_radians(), rec.length)?;
            let mut patch = BonePatch::new().radius(rec.radius);
            if let Some(name) = &rec.name {
                patch = patch.name(name.clone());
            }
            skeleton.update_bone(id, patch);
            ids.insert(rec.id, id);
        }
        Ok((skeleton, ids))
    }

    /// Apply the pose overrides to a skeleton built by [`RigDocument::build`].
    pub fn apply_pose(&self, skeleton: &mut Skeleton, ids: &HashMap<u32, BoneId>) -> Result<()> {
        for rec in &self.pose {
            let id = ids.get(&rec.bone).copied().ok_or(Error::UnknownBoneId(BoneId(rec.bone)))?;
            let mut patch = BonePatch::new();
            if let Some(p) = rec.position {
                patch = patch.position(Vec2::from(p));
            }
            if let Some(deg) = rec.rotation_deg {
                patch = patch.rotation_degrees(deg);
            }
            if !skeleton.update_bone(id, patch) {
                return Err(Error::UnknownBoneId(id));
            }
        }
        Ok(())
    }
}
