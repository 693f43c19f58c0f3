//! Bone overlay drawn on top of the deformed sprite. Always computed from
//! fresh world transforms.

use super::raster::Frame;
use crate::rig::Skeleton;
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub bone_rgba: [u8; 4],
    pub active_rgba: [u8; 4],
    pub joint_rgba: [u8; 4],
    pub joint_radius_px: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            bone_rgba: [80, 160, 255, 255],
            active_rgba: [255, 200, 40, 255],
            joint_rgba: [255, 255, 255, 255],
            joint_radius_px: 3.0,
        }
    }
}

pub fn draw_skeleton(frame: &mut Frame, skeleton: &Skeleton, style: &OverlayStyle) {
    let active = skeleton.active();
    for (bone, (id, wt)) in skeleton.bones().iter().zip(skeleton.world_transforms()) {
        let color = if Some(id) == active { style.active_rgba } else { style.bone_rgba };
        if bone.length > 0.0 {
            let tip = wt.position + Vec2::from_angle(wt.rotation) * bone.length;
            draw_line(frame, wt.position, tip, color);
        }
        let joint = if Some(id) == active { style.active_rgba } else { style.joint_rgba };
        draw_disc(frame, wt.position, style.joint_radius_px, joint);
    }
}

pub fn draw_line(frame: &mut Frame, a: Vec2, b: Vec2, rgba: [u8; 4]) {
    let bounds = Vec2::new(frame.width as f32, frame.height as f32);
    let Some((a, b)) = clip_segment(a, b, bounds) else {
        return;
    };
    let steps = (b - a).abs().max_element().ceil().max(1.0) as u32;
    for i in 0..=steps {
        let p = a.lerp(b, i as f32 / steps as f32);
        plot(frame, p, rgba);
    }
}

pub fn draw_disc(frame: &mut Frame, center: Vec2, radius: f32, rgba: [u8; 4]) {
    if !center.is_finite() || radius.is_nan() {
        return;
    }
    let r = radius.max(0.0);
    let bounds = Vec2::new(frame.width as f32, frame.height as f32);
    let min = (center - Vec2::splat(r)).floor().max(Vec2::ZERO);
    let max = (center + Vec2::splat(r)).ceil().min(bounds - Vec2::ONE);
    if min.x > max.x || min.y > max.y {
        return;
    }
    for y in min.y as u32..=max.y as u32 {
        for x in min.x as u32..=max.x as u32 {
            let c = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if c.distance(center) <= r + 0.5 {
                plot(frame, c, rgba);
            }
        }
    }
}

/// Liang-Barsky clip of `a..b` against `[0, bounds]`. `None` when the segment
/// misses the frame or is not finite.
fn clip_segment(a: Vec2, b: Vec2, bounds: Vec2) -> Option<(Vec2, Vec2)> {
    if !a.is_finite() || !b.is_finite() {
        return None;
    }
    let d = b - a;
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [(-d.x, a.x), (d.x, bounds.x - a.x), (-d.y, a.y), (d.y, bounds.y - a.y)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((a + d * t0, a + d * t1))
}

fn plot(frame: &mut Frame, p: Vec2, rgba: [u8; 4]) {
    if p.x < 0.0 || p.y < 0.0 {
        return;
    }
    frame.blend(p.x as u32, p.y as u32, rgba);
}
