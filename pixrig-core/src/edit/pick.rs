use crate::rig::{BoneId, Skeleton};
use glam::Vec2;

/// Pointer tolerance around joints and tips, in canvas pixels.
pub const DEFAULT_PICK_RADIUS: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorPoint {
    Origin,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    pub bone: BoneId,
    pub point: AnchorPoint,
    pub distance: f32,
}

/// Closest bone origin or tip strictly within `radius` of `point`.
///
/// Bones are scanned in insertion order, origin before tip, and a candidate
/// only replaces the current best when strictly closer. On an exact tie the
/// bone encountered first therefore wins. That tie-break is incidental but
/// kept stable so picking stays reproducible.
pub fn find_closest_bone(skeleton: &Skeleton, point: Vec2, radius: f32) -> Option<Pick> {
    let mut best: Option<Pick> = None;
    let mut best_distance = radius;

    for (bone, (id, wt)) in skeleton.bones().iter().zip(skeleton.world_transforms()) {
        let mut consider = |at: Vec2, which: AnchorPoint| {
            let d = at.distance(point);
            if d < best_distance {
                best_distance = d;
                best = Some(Pick { bone: id, point: which, distance: d });
            }
        };
        consider(wt.position, AnchorPoint::Origin);
        if bone.length > 0.0 {
            consider(wt.position + Vec2::from_angle(wt.rotation) * bone.length, AnchorPoint::End);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_roots() -> (Skeleton, BoneId, BoneId) {
        let mut s = Skeleton::new();
        let a = s.add_bone(None, Vec2::new(0.0, 0.0), 0.0, 40.0).unwrap();
        let b = s.add_bone(None, Vec2::new(100.0, 0.0), 0.0, 0.0).unwrap();
        (s, a, b)
    }

    #[test]
    fn picks_tip_when_closer_than_origin() {
        let (s, a, _) = two_roots();
        let pick = find_closest_bone(&s, Vec2::new(38.0, 1.0), DEFAULT_PICK_RADIUS).unwrap();
        assert_eq!(pick.bone, a);
        assert_eq!(pick.point, AnchorPoint::End);
    }

    #[test]
    fn nothing_outside_radius() {
        let (s, _, _) = two_roots();
        assert!(find_closest_bone(&s, Vec2::new(70.0, 0.0), DEFAULT_PICK_RADIUS).is_none());
        // Exactly on the radius does not count.
        assert!(find_closest_bone(&s, Vec2::new(100.0, 20.0), DEFAULT_PICK_RADIUS).is_none());
    }

    #[test]
    fn joints_have_no_tip() {
        let (s, _, b) = two_roots();
        let pick = find_closest_bone(&s, Vec2::new(101.0, 0.0), DEFAULT_PICK_RADIUS).unwrap();
        assert_eq!((pick.bone, pick.point), (b, AnchorPoint::Origin));
    }

    #[test]
    fn exact_tie_goes_to_first_scanned() {
        let mut s = Skeleton::new();
        let first = s.add_bone(None, Vec2::new(0.0, 0.0), 0.0, 0.0).unwrap();
        s.add_bone(None, Vec2::new(10.0, 0.0), 0.0, 0.0).unwrap();
        let pick = find_closest_bone(&s, Vec2::new(5.0, 0.0), DEFAULT_PICK_RADIUS).unwrap();
        assert_eq!(pick.bone, first);
    }
}
