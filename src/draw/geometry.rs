use crate::draw::model::Point;

pub const DEFAULT_SIMPLIFY_TOLERANCE: f32 = 0.5;

pub fn distance(a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Midpoint of two samples; carries the trailing sample's pressure.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
        pressure: b.pressure,
    }
}

/// Cumulative-density point filter.
///
/// Endpoints are always kept. An interior point survives when the distance
/// from the last kept point plus the distance to its successor in the input
/// exceeds `tolerance`. Runs in O(n), never reorders or duplicates points.
pub fn simplify_points(points: &[Point], tolerance: f32) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut kept = Vec::with_capacity(points.len());
    let mut last_kept = points[0];
    kept.push(last_kept);

    for window in points.windows(2).skip(1) {
        let (point, next) = (window[0], window[1]);
        if distance(last_kept, point) + distance(point, next) > tolerance {
            kept.push(point);
            last_kept = point;
        }
    }

    kept.push(points[points.len() - 1]);
    kept
}
