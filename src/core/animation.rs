use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::f64::consts::TAU;

use super::control_polygon::ControlPolygon;
use crate::math::{sawtooth, Transform};

/// Body size relative to the unit quad
pub const BAT_SCALE: Vec3 = Vec3::new(0.2, 0.2, 1.0);

/// Wing flap frequency multiplier
const FLAP_RATE: f32 = 3.0;

/// Timing knobs for the bat animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationParams {
    /// Curve loops per second; one lap takes `1 / bezier_speed` seconds
    pub bezier_speed: f32,
    /// Multiplier applied to time for body spin and wing flapping
    pub speed_factor: f32,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            bezier_speed: 0.1,
            speed_factor: 1.0,
        }
    }
}

/// Everything the composer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransforms {
    pub background: Transform,
    pub body: Transform,
    pub left_wing: Transform,
    pub right_wing: Transform,
    /// Curve parameter the bat sits at
    pub bezier_t: f32,
    pub bat_position: Vec2,
}

/// Position along the curve at `time`, looping every `1 / bezier_speed` seconds
pub fn bezier_parameter(time: f64, bezier_speed: f32) -> f32 {
    sawtooth(time, bezier_speed)
}

/// Body transform: translate to the curve, spin by `t`, shrink to bat size
pub fn bat_transform(position: Vec2, t: f32) -> Transform {
    Transform::IDENTITY
        .translate(position.extend(0.0))
        .rotate_z(t)
        .scale(BAT_SCALE)
}

/// Left wing in the body's frame, mirrored horizontally
pub fn left_wing_transform(body: Transform, t: f32) -> Transform {
    let flap = (t * FLAP_RATE).cos();
    body.translate(Vec3::new(flap.cos(), flap.sin(), 0.0))
        .rotate_z(flap)
        .scale(Vec3::new(-1.0, 1.0, 1.0))
}

/// Right wing in the body's frame, half a flap period behind the left
pub fn right_wing_transform(body: Transform, t: f32) -> Transform {
    let flap = (t * FLAP_RATE + PI).cos();
    body.translate(Vec3::new(-flap.cos(), -flap.sin(), 0.0))
        .rotate_z(flap)
        .scale(Vec3::ONE)
}

/// Build all per-frame transforms from the clock and the current polygon
pub fn build_transforms(
    time: f64,
    polygon: &ControlPolygon,
    params: &AnimationParams,
) -> SceneTransforms {
    // Spin and flap both repeat every 2π of `t`
    let t = (time * f64::from(params.speed_factor)).rem_euclid(TAU) as f32;
    let bezier_t = bezier_parameter(time, params.bezier_speed);
    let bat_position = polygon.evaluate(bezier_t);

    let body = bat_transform(bat_position, t);

    SceneTransforms {
        background: Transform::IDENTITY,
        body,
        left_wing: left_wing_transform(body, t),
        right_wing: right_wing_transform(body, t),
        bezier_t,
        bat_position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_params() {
        let params = AnimationParams::default();
        assert_eq!(params.bezier_speed, 0.1);
        assert_eq!(params.speed_factor, 1.0);
    }

    #[test]
    fn body_origin_follows_curve() {
        let polygon = ControlPolygon::default();
        let frame = build_transforms(15.0, &polygon, &AnimationParams::default());

        assert_abs_diff_eq!(frame.bezier_t, 0.5, epsilon = 1e-5);
        let expected = polygon.evaluate(0.5);
        let origin = frame.body.transform_point(Vec3::ZERO);
        assert_abs_diff_eq!(origin.x, expected.x, epsilon = 1e-5);
        assert_abs_diff_eq!(origin.y, expected.y, epsilon = 1e-5);
    }

    #[test]
    fn body_at_time_zero_is_scaled_quad_at_first_point() {
        let polygon = ControlPolygon::default();
        let frame = build_transforms(0.0, &polygon, &AnimationParams::default());

        let corner = frame.body.transform_point(Vec3::new(1.0, 1.0, 0.0));
        assert_abs_diff_eq!(corner.x, -0.7 + 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(corner.y, -0.2 + 0.2, epsilon = 1e-6);
    }

    #[test]
    fn left_wing_offset_at_time_zero() {
        // cos(0) = 1, so the wing sits at (cos 1, sin 1) rotated by 1 rad
        let left = left_wing_transform(Transform::IDENTITY, 0.0);
        let origin = left.transform_point(Vec3::ZERO);
        assert_abs_diff_eq!(origin.x, 1.0f32.cos(), epsilon = 1e-6);
        assert_abs_diff_eq!(origin.y, 1.0f32.sin(), epsilon = 1e-6);

        // Mirrored: +X of the quad points back toward the body
        let tip = left.transform_point(Vec3::X) - origin;
        assert_abs_diff_eq!(tip.x, -(1.0f32.cos()), epsilon = 1e-6);
        assert_abs_diff_eq!(tip.y, -(1.0f32.sin()), epsilon = 1e-6);
    }

    #[test]
    fn right_wing_offset_at_time_zero() {
        // cos(pi) = -1, offset is (-cos(-1), -sin(-1))
        let right = right_wing_transform(Transform::IDENTITY, 0.0);
        let origin = right.transform_point(Vec3::ZERO);
        assert_abs_diff_eq!(origin.x, -(1.0f32.cos()), epsilon = 1e-6);
        assert_abs_diff_eq!(origin.y, 1.0f32.sin(), epsilon = 1e-6);
    }

    #[test]
    fn wings_are_attached_to_body_frame() {
        let polygon = ControlPolygon::default();
        let params = AnimationParams::default();
        let time = 3.7;
        let frame = build_transforms(time, &polygon, &params);

        let local = left_wing_transform(Transform::IDENTITY, time as f32);
        let expected = (frame.body * local).matrix();
        assert!(frame.left_wing.matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn speed_factor_scales_spin() {
        let polygon = ControlPolygon::default();
        let fast = AnimationParams {
            speed_factor: 2.0,
            ..AnimationParams::default()
        };
        let a = build_transforms(1.0, &polygon, &fast);
        let b = bat_transform(a.bat_position, 2.0);
        assert!(a.body.matrix().abs_diff_eq(b.matrix(), 1e-6));
    }

    #[test]
    fn background_is_identity() {
        let frame = build_transforms(42.0, &ControlPolygon::default(), &AnimationParams::default());
        assert_eq!(frame.background, Transform::IDENTITY);
    }

    #[test]
    fn spin_stays_smooth_after_a_day() {
        let polygon = ControlPolygon::default();
        let params = AnimationParams::default();
        let day = 86_400.0;

        let a = build_transforms(day, &polygon, &params);
        let b = build_transforms(day + 1.0 / 60.0, &polygon, &params);
        assert!(a.body != b.body);
        assert_abs_diff_eq!(b.bezier_t - a.bezier_t, 0.1 / 60.0, epsilon = 1e-5);
    }

    #[test]
    fn spin_wraps_every_full_turn() {
        let polygon = ControlPolygon::default();
        let params = AnimationParams {
            bezier_speed: 0.0,
            ..AnimationParams::default()
        };
        let a = build_transforms(1.0, &polygon, &params);
        let b = build_transforms(1.0 + std::f64::consts::TAU, &polygon, &params);
        assert!(a.body.matrix().abs_diff_eq(b.body.matrix(), 1e-5));
        assert!(a.left_wing.matrix().abs_diff_eq(b.left_wing.matrix(), 1e-5));
    }
}
