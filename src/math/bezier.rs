use glam::Vec2;

/// Evaluate a cubic Bezier curve at `t`
///
/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3
///
/// `t` is not clamped; values outside [0, 1] extrapolate along the cubic.
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let inv = 1.0 - t;
    inv * inv * inv * p0 + 3.0 * inv * inv * t * p1 + 3.0 * inv * t * t * p2 + t * t * t * p3
}

/// Sawtooth wave of `time * speed`, i.e. its fractional part
///
/// Computed in `f64` and narrowed afterwards, so long-running clocks keep
/// sub-millisecond resolution. Truncates toward zero, so negative inputs
/// produce values in (-1, 0].
pub fn sawtooth(time: f64, speed: f32) -> f32 {
    let x = time * f64::from(speed);
    (x - x.trunc()) as f32
}
