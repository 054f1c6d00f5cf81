use std::cmp::Ordering;

use super::{Point2, TOLERANCE};

/// Computes the signed area of a 2D polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// 2D cross product of `(a - o)` and `(b - o)`.
#[inline]
fn cross_2d(o: &Point2, a: &Point2, b: &Point2) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Computes the convex hull of a 2D point set (Andrew's monotone chain).
///
/// Returns indices into `points`, in counter-clockwise order, starting at the
/// lexicographically smallest point. Points lying on a hull edge (collinear
/// within `tolerance` of cross product) and coincident points are dropped.
///
/// With fewer than three non-collinear points the hull is degenerate and the
/// returned list has fewer than three entries.
#[must_use]
pub fn convex_hull_2d(points: &[Point2], tolerance: f64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| {
        let (pa, pb) = (&points[a], &points[b]);
        pa.x
            .partial_cmp(&pb.x)
            .unwrap_or(Ordering::Equal)
            .then(pa.y.partial_cmp(&pb.y).unwrap_or(Ordering::Equal))
    });
    order.dedup_by(|a, b| (points[*a] - points[*b]).norm() < tolerance.max(TOLERANCE));

    if order.len() < 3 {
        return order;
    }

    let mut hull: Vec<usize> = Vec::with_capacity(order.len() * 2);

    // Lower chain
    for &i in &order {
        while hull.len() >= 2
            && cross_2d(
                &points[hull[hull.len() - 2]],
                &points[hull[hull.len() - 1]],
                &points[i],
            ) <= tolerance
        {
            hull.pop();
        }
        hull.push(i);
    }

    // Upper chain
    let lower_len = hull.len() + 1;
    for &i in order.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross_2d(
                &points[hull[hull.len() - 2]],
                &points[hull[hull.len() - 1]],
                &points[i],
            ) <= tolerance
        {
            hull.pop();
        }
        hull.push(i);
    }

    // Last point repeats the first
    hull.pop();
    hull
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn signed_area_ccw_square() {
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        assert!((signed_area_2d(&pts) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let pts = vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
        assert!((signed_area_2d(&pts) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[p(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn hull_of_shuffled_square_is_ccw() {
        let pts = vec![p(1.0, 1.0), p(0.0, 0.0), p(0.0, 1.0), p(1.0, 0.0)];
        let hull = convex_hull_2d(&pts, 1e-12);
        assert_eq!(hull, vec![1, 3, 0, 2]);

        let ordered: Vec<Point2> = hull.iter().map(|&i| pts[i]).collect();
        assert!(signed_area_2d(&ordered) > 0.0);
    }

    #[test]
    fn hull_drops_interior_and_collinear_points() {
        let pts = vec![
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(1.0, 0.0), // on an edge
            p(2.0, 2.0),
            p(1.0, 1.0), // interior
            p(0.0, 2.0),
        ];
        let hull = convex_hull_2d(&pts, 1e-12);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&2));
        assert!(!hull.contains(&4));
    }

    #[test]
    fn hull_merges_coincident_points() {
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1e-14)];
        let hull = convex_hull_2d(&pts, 1e-9);
        assert_eq!(hull.len(), 3);
    }

    #[test]
    fn hull_of_collinear_points_is_degenerate() {
        let pts = vec![p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)];
        assert!(convex_hull_2d(&pts, 1e-12).len() < 3);
    }
}
