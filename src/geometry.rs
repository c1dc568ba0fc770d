//! Geometric primitives for region polygons.
//!
//! Region shapes are stored as polygon vertex lists in document space. This
//! module provides the few operations the data model needs: area computation
//! for degeneracy checks and a convex union hull for inferring a parent
//! polygon from its children.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A 2D point in document space.
///
/// Serializes as a two-element array `[x, y]`, matching the persisted
/// project shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "(f64, f64)", from = "(f64, f64)")]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Compute the unsigned area of a polygon via the shoelace formula.
///
/// Returns 0.0 for polygons with fewer than 3 vertices.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum.abs() / 2.0
}

/// Validate a finalized region polygon.
///
/// A polygon is rejected with [`Error::InvalidGeometry`] when it has fewer
/// than 3 vertices or its area falls below `min_area`.
pub fn validate_polygon(points: &[Point], min_area: f64) -> Result<()> {
    if points.len() < 3 {
        return Err(Error::InvalidGeometry(format!(
            "polygon needs at least 3 vertices, got {}",
            points.len()
        )));
    }
    let area = polygon_area(points);
    if area < min_area {
        return Err(Error::InvalidGeometry(format!(
            "polygon area {:.4} below minimum {:.4}",
            area, min_area
        )));
    }
    Ok(())
}

/// Compute the convex hull of a point set (Andrew's monotone chain).
///
/// Used to infer the bounding polygon of a partition whose extractor output
/// carries no explicit coordinates, as the union hull of its children's
/// vertices. Returns the hull vertices in counterclockwise order; inputs
/// with fewer than 3 distinct points are returned as-is.
pub fn convex_hull(mut points: Vec<Point>) -> Vec<Point> {
    points.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    points.dedup_by(|a, b| a.x == b.x && a.y == b.y);
    if points.len() < 3 {
        return points;
    }

    fn cross(o: Point, a: Point, b: Point) -> f64 {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    }

    let mut hull: Vec<Point> = Vec::with_capacity(points.len() * 2);
    // Lower hull
    for &p in &points {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    // Upper hull
    let lower_len = hull.len() + 1;
    for &p in points.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop(); // last point equals the first
    hull
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_roundtrip_json() {
        let p = Point::new(10.5, 20.25);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[10.5,20.25]");
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_polygon_area_square() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert_eq!(polygon_area(&square), 100.0);
    }

    #[test]
    fn test_polygon_area_degenerate() {
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(polygon_area(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]), 0.0);
        // Collinear points enclose no area
        let line = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0)];
        assert_eq!(polygon_area(&line), 0.0);
    }

    #[test]
    fn test_validate_polygon_rejects_too_few_vertices() {
        let err = validate_polygon(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)], 1.0);
        assert!(matches!(err, Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_validate_polygon_rejects_small_area() {
        let tiny = vec![
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(0.5, 0.5),
        ];
        assert!(validate_polygon(&tiny, 1.0).is_err());
        assert!(validate_polygon(&tiny, 0.1).is_ok());
    }

    #[test]
    fn test_convex_hull_of_two_boxes() {
        // Two unit boxes side by side; hull is the enclosing rectangle.
        let mut pts = Vec::new();
        for (ox, oy) in [(0.0, 0.0), (2.0, 0.0)] {
            pts.extend([
                Point::new(ox, oy),
                Point::new(ox + 1.0, oy),
                Point::new(ox + 1.0, oy + 1.0),
                Point::new(ox, oy + 1.0),
            ]);
        }
        let hull = convex_hull(pts);
        assert_eq!(hull.len(), 4);
        assert_eq!(polygon_area(&hull), 3.0);
    }

    #[test]
    fn test_convex_hull_interior_points_dropped() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
            Point::new(2.0, 2.0), // interior
        ];
        let hull = convex_hull(pts);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&Point::new(2.0, 2.0)));
    }

    #[test]
    fn test_convex_hull_degenerate_inputs() {
        assert!(convex_hull(vec![]).is_empty());
        let single = convex_hull(vec![Point::new(1.0, 1.0)]);
        assert_eq!(single.len(), 1);
    }
}
