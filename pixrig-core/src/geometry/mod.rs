//! Planar angle and distance helpers shared by the rig, editor and skinning code.
//! All angles are radians; the scene frame is y-down like the canvas.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Wrap an angle into `(-PI, PI]`.
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/// Direction of the ray from `from` to `to`.
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Shortest signed turn that takes `from` onto `to`.
pub fn angle_delta(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < EPS);
        assert!((normalize_angle(-PI) - PI).abs() < EPS);
        assert!((normalize_angle(PI / 2.0 + TAU) - PI / 2.0).abs() < EPS);
        assert!((normalize_angle(TAU + 0.25) - 0.25).abs() < EPS);
        assert!((normalize_angle(-0.25) + 0.25).abs() < EPS);
    }

    #[test]
    fn angle_delta_takes_short_way_across_seam() {
        let d = angle_delta(PI - 0.1, -PI + 0.1);
        assert!((d - 0.2).abs() < EPS, "got {d}");
        let d = angle_delta(-PI + 0.1, PI - 0.1);
        assert!((d + 0.2).abs() < EPS, "got {d}");
    }

    #[test]
    fn angle_between_points_down_in_screen_space() {
        let a = angle_between(Vec2::new(10.0, 10.0), Vec2::new(10.0, 20.0));
        assert!((a - PI / 2.0).abs() < EPS);
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < EPS);
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = rotate(Vec2::new(10.0, 0.0), PI / 2.0);
        assert!(v.abs_diff_eq(Vec2::new(0.0, 10.0), 1e-4));
    }
}
