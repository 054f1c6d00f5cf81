use crate::geometry::Plane;

use super::{Matrix3, Point3, Vector3, TOLERANCE};

/// Computes the single point shared by three planes.
///
/// Solves `N x = -d` where the rows of `N` are the plane normals and `d`
/// the plane constants. Returns `None` when the normals are (nearly)
/// linearly dependent, i.e. `|det N| < singular_tolerance`.
#[must_use]
pub fn three_plane_intersect(
    a: &Plane,
    b: &Plane,
    c: &Plane,
    singular_tolerance: f64,
) -> Option<Point3> {
    let rows = Matrix3::from_rows(&[
        a.normal().transpose(),
        b.normal().transpose(),
        c.normal().transpose(),
    ]);
    if rows.determinant().abs() < singular_tolerance {
        return None;
    }
    let rhs = Vector3::new(-a.constant(), -b.constant(), -c.constant());
    rows.lu().solve(&rhs).map(Point3::from)
}

/// Classification of a point relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointPlaneClassification {
    /// Point is on the positive side (in the direction of the normal).
    Front,
    /// Point is on the negative side (opposite the normal).
    Back,
    /// Point lies on the plane (within tolerance).
    On,
}

/// Classifies a point relative to a plane.
#[must_use]
pub fn classify_point_plane(
    point: &Point3,
    plane: &Plane,
    tolerance: f64,
) -> PointPlaneClassification {
    let dist = plane.signed_distance(point);
    let tol = tolerance.max(TOLERANCE);

    if dist > tol {
        PointPlaneClassification::Front
    } else if dist < -tol {
        PointPlaneClassification::Back
    } else {
        PointPlaneClassification::On
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn plane(point: Point3, normal: Vector3) -> Plane {
        Plane::from_point_normal(&point, normal).unwrap()
    }

    // ── three_plane_intersect ──

    #[test]
    fn orthogonal_planes_meet_at_corner() {
        let a = plane(p(1.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        let b = plane(p(0.0, 2.0, 0.0), v(0.0, 1.0, 0.0));
        let c = plane(p(0.0, 0.0, -3.0), v(0.0, 0.0, -1.0));

        let corner = three_plane_intersect(&a, &b, &c, TOLERANCE).unwrap();
        assert_relative_eq!(corner, p(1.0, 2.0, -3.0), epsilon = 1e-12);
    }

    #[test]
    fn oblique_planes_meet_on_all_three() {
        let a = plane(p(0.0, 0.0, 1.0), v(1.0, 1.0, 1.0));
        let b = plane(p(0.5, 0.0, 0.0), v(1.0, -1.0, 0.5));
        let c = plane(p(0.0, -1.0, 0.0), v(-0.2, 0.3, 1.0));

        let x = three_plane_intersect(&a, &b, &c, TOLERANCE).unwrap();
        for pl in [&a, &b, &c] {
            assert!(pl.signed_distance(&x).abs() < 1e-12);
        }
    }

    #[test]
    fn dependent_normals_have_no_point() {
        let a = plane(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0));
        let b = plane(p(0.0, 0.0, 1.0), v(0.0, 0.0, 1.0));
        let c = plane(p(0.0, 0.0, 0.0), v(1.0, 0.0, 0.0));
        assert!(three_plane_intersect(&a, &b, &c, TOLERANCE).is_none());

        // Three planes sharing a common line
        let d = plane(p(0.0, 0.0, 0.0), v(1.0, 1.0, 0.0));
        let e = plane(p(0.0, 0.0, 0.0), v(0.0, 1.0, 0.0));
        assert!(three_plane_intersect(&c, &d, &e, TOLERANCE).is_none());
    }

    // ── classify_point_plane ──

    #[test]
    fn classify_sides() {
        let pl = plane(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0));
        assert_eq!(
            classify_point_plane(&p(0.0, 0.0, 1.0), &pl, 1e-9),
            PointPlaneClassification::Front
        );
        assert_eq!(
            classify_point_plane(&p(0.0, 0.0, -1.0), &pl, 1e-9),
            PointPlaneClassification::Back
        );
        assert_eq!(
            classify_point_plane(&p(5.0, 5.0, 1e-12), &pl, 1e-9),
            PointPlaneClassification::On
        );
    }
}
