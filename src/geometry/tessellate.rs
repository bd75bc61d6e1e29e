//! Approximating curves with straight segments

use crate::types::{Vector2, Vector3};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Angular step between generated vertices, in degrees
pub const ARC_STEP_DEGREES: f64 = 4.0;

/// Upper bound on the vertices produced for a single spline
const MAX_SPLINE_SEGMENTS: usize = 2048;

fn segment_count(sweep_degrees: f64) -> usize {
    let steps = (sweep_degrees.abs() / ARC_STEP_DEGREES - 1e-9).ceil();
    if steps.is_finite() {
        (steps as usize).clamp(1, 360 / ARC_STEP_DEGREES as usize * 4)
    } else {
        1
    }
}

/// Counter-clockwise arc sweep in degrees, normalised to (0, 360]
fn ccw_sweep(start: f64, end: f64) -> f64 {
    let sweep = (end - start).rem_euclid(360.0);
    if sweep <= f64::EPSILON {
        360.0
    } else {
        sweep
    }
}

/// Points of a counter-clockwise circular arc, both endpoints included
///
/// Angles are in degrees; `end <= start` wraps around, equal angles give a
/// full circle.
pub fn arc_points(center: Vector2, radius: f64, start_deg: f64, end_deg: f64) -> Vec<Vector2> {
    let sweep_deg = ccw_sweep(start_deg, end_deg);
    let n = segment_count(sweep_deg);
    let sweep = sweep_deg.to_radians();
    let start = start_deg.to_radians();

    (0..=n)
        .map(|i| {
            let angle = start + sweep * i as f64 / n as f64;
            Vector2::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Points of a clockwise or counter-clockwise arc (hatch boundary edges)
pub fn directed_arc_points(
    center: Vector2,
    radius: f64,
    start_deg: f64,
    end_deg: f64,
    counter_clockwise: bool,
) -> Vec<Vector2> {
    if counter_clockwise {
        arc_points(center, radius, start_deg, end_deg)
    } else {
        // Clockwise edges store their angles negated
        let mut points = arc_points(center, radius, -end_deg, -start_deg);
        points.reverse();
        points
    }
}

/// Points of an ellipse arc in 3D, parameters in radians
///
/// `major_axis` is relative to `center`; the minor axis is
/// `normal × major_axis` scaled by `ratio`.
pub fn ellipse_points(
    center: Vector3,
    major_axis: Vector3,
    ratio: f64,
    normal: Vector3,
    start_param: f64,
    end_param: f64,
) -> Vec<Vector3> {
    let minor_axis = normal.normalize().cross(&major_axis) * ratio;
    let mut sweep = (end_param - start_param).rem_euclid(TAU);
    if sweep <= f64::EPSILON {
        sweep = TAU;
    }
    let n = segment_count(sweep.to_degrees());

    (0..=n)
        .map(|i| {
            let t = start_param + sweep * i as f64 / n as f64;
            center + major_axis * t.cos() + minor_axis * t.sin()
        })
        .collect()
}

/// Intermediate points of a bulged polyline segment
///
/// The bulge is the tangent of a quarter of the included angle; positive
/// values sweep counter-clockwise. Neither endpoint is returned.
pub fn bulge_points(p1: Vector2, p2: Vector2, bulge: f64) -> Vec<Vector2> {
    let chord = p1.distance(&p2);
    if bulge.abs() < 1e-12 || chord < 1e-12 || !bulge.is_finite() {
        return Vec::new();
    }

    let theta = 4.0 * bulge.atan();
    let radius = chord / (2.0 * (theta / 2.0).sin());
    let chord_angle = (p2.y - p1.y).atan2(p2.x - p1.x);
    let to_center = chord_angle + FRAC_PI_2 - theta / 2.0;
    let center = Vector2::new(
        p1.x + radius * to_center.cos(),
        p1.y + radius * to_center.sin(),
    );

    let start = (p1.y - center.y).atan2(p1.x - center.x);
    let radius = radius.abs();
    let n = segment_count(theta.to_degrees());

    (1..n)
        .map(|i| {
            let angle = start + theta * i as f64 / n as f64;
            Vector2::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Evaluate a (possibly rational) B-spline
///
/// A knot vector of the wrong length is replaced by a clamped uniform one.
/// Weights are ignored unless there is one per control point.
pub fn nurbs_points(
    degree: usize,
    knots: &[f64],
    control_points: &[Vector3],
    weights: &[f64],
) -> Vec<Vector3> {
    let n = control_points.len();
    if n < 2 {
        return control_points.to_vec();
    }
    let degree = degree.clamp(1, n - 1);

    let knots = if knots.len() == n + degree + 1 && knots.windows(2).all(|w| w[0] <= w[1]) {
        knots.to_vec()
    } else {
        clamped_uniform_knots(n, degree)
    };

    let homogeneous: Vec<[f64; 4]> = control_points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let w = if weights.len() == n && weights[i] > 0.0 {
                weights[i]
            } else {
                1.0
            };
            [p.x * w, p.y * w, p.z * w, w]
        })
        .collect();

    let t_start = knots[degree];
    let t_end = knots[n];
    if !(t_end > t_start) {
        return control_points.to_vec();
    }

    let segments = (n * 8).clamp(8, MAX_SPLINE_SEGMENTS);
    (0..=segments)
        .filter_map(|i| {
            let t = t_start + (t_end - t_start) * i as f64 / segments as f64;
            let span = find_span(&knots, degree, n, t);
            let [x, y, z, w] = de_boor(span, t, &knots, &homogeneous, degree);
            (w.abs() > f64::EPSILON).then(|| Vector3::new(x / w, y / w, z / w))
        })
        .collect()
}

fn clamped_uniform_knots(n: usize, degree: usize) -> Vec<f64> {
    let interior = n - degree;
    let mut knots = vec![0.0; degree + 1];
    knots.extend((1..interior).map(|i| i as f64));
    knots.extend(std::iter::repeat(interior as f64).take(degree + 1));
    knots
}

/// Index `k` with `knots[k] <= t < knots[k + 1]`, limited to `degree..n`
fn find_span(knots: &[f64], degree: usize, n: usize, t: f64) -> usize {
    (degree..n)
        .rev()
        .find(|&k| knots[k] <= t && knots[k] < knots[k + 1])
        .unwrap_or(degree)
}

fn de_boor(k: usize, t: f64, knots: &[f64], points: &[[f64; 4]], p: usize) -> [f64; 4] {
    let mut d: Vec<[f64; 4]> = (0..=p).map(|j| points[j + k - p]).collect();

    for r in 1..=p {
        for j in (r..=p).rev() {
            let lo = knots[j + k - p];
            let hi = knots[j + 1 + k - r];
            let alpha = if hi - lo > 0.0 { (t - lo) / (hi - lo) } else { 0.0 };
            for c in 0..4 {
                d[j][c] = (1.0 - alpha) * d[j - 1][c] + alpha * d[j][c];
            }
        }
    }
    d[p]
}
