//! Interpolation helpers:
//! - lerp_f32 / lerp_vec4 (component-wise blends)
//! - power_in / power_out / power_in_out (polynomial easing families)
//! - back_out (overshoot-then-settle)
//! - bezier_ease_t (cubic-bezier timing, x inverted by bisection)

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ]
}

/// `t^(p+1)`: power1 is quadratic, power2 cubic.
#[inline]
pub fn power_in(t: f32, power: i32) -> f32 {
    t.powi(power + 1)
}

#[inline]
pub fn power_out(t: f32, power: i32) -> f32 {
    1.0 - (1.0 - t).powi(power + 1)
}

#[inline]
pub fn power_in_out(t: f32, power: i32) -> f32 {
    if t < 0.5 {
        power_in(t * 2.0, power) * 0.5
    } else {
        1.0 - power_in((1.0 - t) * 2.0, power) * 0.5
    }
}

/// Back-out easing: overshoots past 1 then settles. `1.70158` is the classic
/// ~10% overshoot; the original site uses `back.out(1.7)`.
#[inline]
pub fn back_out(t: f32, overshoot: f32) -> f32 {
    let u = t - 1.0;
    1.0 + (overshoot + 1.0) * u * u * u + overshoot * u * u
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
#[inline]
pub fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}
