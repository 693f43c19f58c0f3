use super::bone::{Bone, BoneId, BonePatch, WorldTransform, DEFAULT_RADIUS};
use crate::error::{Error, Result};
use glam::Vec2;
use std::collections::HashMap;

/// Owns every bone. Insertion order is preserved and doubles as the scan
/// order for picking and binding.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
    index: HashMap<BoneId, usize>,
    next_id: u32,
    active: Option<BoneId>,
}

impl Skeleton {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.bones.len() }
    pub fn is_empty(&self) -> bool { self.bones.is_empty() }
    pub fn bones(&self) -> &[Bone] { &self.bones }
    pub fn contains(&self, id: BoneId) -> bool { self.index.contains_key(&id) }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.index.get(&id).map(|&i| &self.bones[i])
    }

    pub fn bone_checked(&self, id: BoneId) -> Result<&Bone> {
        self.bone(id).ok_or(Error::UnknownBoneId(id))
    }

    pub fn children(&self, id: BoneId) -> impl Iterator<Item = &Bone> + '_ {
        self.bones.iter().filter(move |b| b.parent == Some(id))
    }

    pub fn active(&self) -> Option<BoneId> { self.active }

    /// Unknown ids clear the selection.
    pub fn set_active(&mut self, id: Option<BoneId>) {
        self.active = id.filter(|id| self.contains(*id));
    }

    /// Append a bone. The parent, if any, must already exist, which keeps the
    /// collection a forest.
    pub fn add_bone(&mut self, parent: Option<BoneId>, position: Vec2, rotation: f32, length: f32) -> Result<BoneId> {
        if let Some(p) = parent {
            if !self.contains(p) {
                return Err(Error::InvalidParent(p));
            }
        }
        self.next_id += 1;
        let id = BoneId(self.next_id);
        self.index.insert(id, self.bones.len());
        self.bones.push(Bone {
            id,
            name: format!("Bone {}", id.0),
            parent,
            position,
            rotation,
            length: length.max(0.0),
            radius: DEFAULT_RADIUS,
        });
        log::debug!("added bone {id} (parent {parent:?}, length {length:.1})");
        Ok(id)
    }

    /// Remove a bone together with its whole subtree. Returns the removed ids,
    /// root of the subtree first.
    pub fn remove_bone(&mut self, id: BoneId) -> Vec<BoneId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut doomed = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            doomed.push(cur);
            // Reverse so siblings come off the stack in insertion order.
            let kids: Vec<BoneId> = self.children(cur).map(|b| b.id).collect();
            stack.extend(kids.into_iter().rev());
        }

        self.bones.retain(|b| !doomed.contains(&b.id));
        self.reindex();
        if self.active.is_some_and(|a| doomed.contains(&a)) {
            self.active = None;
        }
        log::debug!("removed {} bone(s) under {id}", doomed.len());
        doomed
    }

    /// Merge `patch` into the bone. Returns `false` for an unknown id.
    pub fn update_bone(&mut self, id: BoneId, patch: BonePatch) -> bool {
        match self.index.get(&id) {
            Some(&i) => {
                patch.apply_to(&mut self.bones[i]);
                true
            }
            None => false,
        }
    }

    /// Compose the chain root-first. Unknown ids give the identity.
    pub fn world_transform(&self, id: BoneId) -> WorldTransform {
        let mut chain = Vec::new();
        let mut cursor = self.bone(id);
        while let Some(bone) = cursor {
            chain.push(bone);
            cursor = bone.parent.and_then(|p| self.bone(p));
        }

        chain.iter().rev().fold(WorldTransform::IDENTITY, |acc, bone| WorldTransform {
            position: acc.apply(bone.position),
            rotation: acc.rotation + bone.rotation,
        })
    }

    /// World position of the bone's tip.
    pub fn end_point(&self, id: BoneId) -> Vec2 {
        let length = self.bone(id).map_or(0.0, |b| b.length);
        let wt = self.world_transform(id);
        wt.position + Vec2::from_angle(wt.rotation) * length
    }

    /// Fresh world transforms for every bone, in insertion order.
    pub fn world_transforms(&self) -> Vec<(BoneId, WorldTransform)> {
        // Parents always precede children, so one forward pass suffices.
        let mut out: Vec<(BoneId, WorldTransform)> = Vec::with_capacity(self.bones.len());
        for bone in &self.bones {
            let parent = bone
                .parent
                .and_then(|p| self.index.get(&p))
                .map_or(WorldTransform::IDENTITY, |&i| out[i].1);
            out.push((
                bone.id,
                WorldTransform {
                    position: parent.apply(bone.position),
                    rotation: parent.rotation + bone.rotation,
                },
            ));
        }
        out
    }

    fn reindex(&mut self) {
        self.index = self.bones.iter().enumerate().map(|(i, b)| (b.id, i)).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::normalize_angle;
    use std::f32::consts::FRAC_PI_2;

    fn v(x: f32, y: f32) -> Vec2 { Vec2::new(x, y) }

    fn arm() -> (Skeleton, BoneId, BoneId) {
        let mut s = Skeleton::new();
        let root = s.add_bone(None, v(100.0, 100.0), 0.0, 50.0).unwrap();
        let child = s.add_bone(Some(root), v(50.0, 0.0), FRAC_PI_2, 30.0).unwrap();
        (s, root, child)
    }

    #[test]
    fn two_bone_arm_world_transforms() {
        let (s, _, child) = arm();
        let wt = s.world_transform(child);
        assert!(wt.position.abs_diff_eq(v(150.0, 100.0), 1e-3));
        assert!((wt.rotation - FRAC_PI_2).abs() < 1e-6);
        assert!(s.end_point(child).abs_diff_eq(v(150.0, 130.0), 1e-3));
    }

    #[test]
    fn root_world_transform_is_its_local_transform() {
        let mut s = Skeleton::new();
        let id = s.add_bone(None, v(7.0, -2.0), 0.3, 0.0).unwrap();
        let wt = s.world_transform(id);
        assert_eq!(wt.position, v(7.0, -2.0));
        assert_eq!(wt.rotation, 0.3);
    }

    #[test]
    fn child_composes_with_parent() {
        let mut s = Skeleton::new();
        let a = s.add_bone(None, v(3.0, 4.0), 0.4, 10.0).unwrap();
        let b = s.add_bone(Some(a), v(10.0, 2.0), -1.1, 5.0).unwrap();
        let c = s.add_bone(Some(b), v(5.0, 0.0), 2.9, 5.0).unwrap();
        for (child, parent) in [(b, a), (c, b)] {
            let pw = s.world_transform(parent);
            let cw = s.world_transform(child);
            let local = s.bone(child).unwrap();
            let expected_rot = normalize_angle(pw.rotation + local.rotation);
            assert!((normalize_angle(cw.rotation) - expected_rot).abs() < 1e-5);
            let expected_pos = pw.position + Vec2::from_angle(pw.rotation).rotate(local.position);
            assert!(cw.position.abs_diff_eq(expected_pos, 1e-4));
        }
    }

    #[test]
    fn rotating_parent_reorients_descendants() {
        let (mut s, root, child) = arm();
        s.update_bone(root, BonePatch::new().rotation(FRAC_PI_2));
        let wt = s.world_transform(child);
        assert!(wt.position.abs_diff_eq(v(100.0, 150.0), 1e-3));
        assert!((wt.rotation - std::f32::consts::PI).abs() < 1e-5);
    }

    #[test]
    fn batch_transforms_match_single_queries() {
        let (mut s, root, _) = arm();
        let tip = s.add_bone(Some(root), v(50.0, 0.0), -0.5, 12.0).unwrap();
        s.add_bone(Some(tip), v(12.0, 0.0), 0.25, 4.0).unwrap();
        for (id, wt) in s.world_transforms() {
            let single = s.world_transform(id);
            assert!(wt.position.abs_diff_eq(single.position, 1e-4));
            assert!((wt.rotation - single.rotation).abs() < 1e-6);
        }
    }

    #[test]
    fn unknown_ids_degrade_to_defaults() {
        let (mut s, _, _) = arm();
        assert_eq!(s.world_transform(BoneId(99)), WorldTransform::IDENTITY);
        assert!(!s.update_bone(BoneId(99), BonePatch::new().length(3.0)));
        assert_eq!(s.bone_checked(BoneId(99)).unwrap_err(), Error::UnknownBoneId(BoneId(99)));
    }

    #[test]
    fn add_bone_rejects_missing_parent() {
        let mut s = Skeleton::new();
        assert_eq!(s.add_bone(Some(BoneId(4)), Vec2::ZERO, 0.0, 0.0), Err(Error::InvalidParent(BoneId(4))));
        assert!(s.is_empty());
    }

    #[test]
    fn ids_are_never_reused_and_names_are_sequential() {
        let mut s = Skeleton::new();
        let a = s.add_bone(None, Vec2::ZERO, 0.0, 0.0).unwrap();
        s.remove_bone(a);
        let b = s.add_bone(None, Vec2::ZERO, 0.0, 0.0).unwrap();
        assert_ne!(a, b);
        assert_eq!(s.bone(b).unwrap().name, "Bone 2");
    }

    #[test]
    fn remove_takes_exactly_the_subtree() {
        let mut s = Skeleton::new();
        let root = s.add_bone(None, Vec2::ZERO, 0.0, 10.0).unwrap();
        let left = s.add_bone(Some(root), v(10.0, 0.0), 0.5, 10.0).unwrap();
        let left_tip = s.add_bone(Some(left), v(10.0, 0.0), 0.5, 10.0).unwrap();
        let right = s.add_bone(Some(root), v(10.0, 0.0), -0.5, 10.0).unwrap();
        let other = s.add_bone(None, v(50.0, 50.0), 0.0, 0.0).unwrap();

        let mut removed = s.remove_bone(left);
        removed.sort();
        assert_eq!(removed, vec![left, left_tip]);
        let left_over: Vec<BoneId> = s.bones().iter().map(|b| b.id).collect();
        assert_eq!(left_over, vec![root, right, other]);
        // Index stays consistent after the arena shifts.
        assert_eq!(s.bone(other).unwrap().position, v(50.0, 50.0));
        assert!(s.world_transform(right).position.abs_diff_eq(v(10.0, 0.0), 1e-4));
    }

    #[test]
    fn removing_active_bone_clears_selection_but_siblings_do_not() {
        let mut s = Skeleton::new();
        let root = s.add_bone(None, Vec2::ZERO, 0.0, 10.0).unwrap();
        let a = s.add_bone(Some(root), v(10.0, 0.0), 0.0, 10.0).unwrap();
        let b = s.add_bone(Some(root), v(10.0, 0.0), 1.0, 10.0).unwrap();

        s.set_active(Some(a));
        s.remove_bone(b);
        assert_eq!(s.active(), Some(a));

        s.remove_bone(root);
        assert_eq!(s.active(), None);
        assert!(s.is_empty());
    }
}
