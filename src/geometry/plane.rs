use crate::error::{GeometryError, Result};
use crate::math::{Point2, Point3, Vector3, TOLERANCE};

/// An oriented plane in 3D space.
///
/// Stored in implicit form `normal · x + constant = 0` with a unit normal.
/// Points with a positive [`signed_distance`](Self::signed_distance) lie on
/// the side the normal points to; the closed half-space bounded by the plane
/// is `{ x : normal · x + constant <= 0 }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vector3,
    constant: f64,
}

impl Plane {
    /// Creates a plane from a normal and the implicit constant.
    ///
    /// The normal is normalized and the constant rescaled to match.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn new(normal: Vector3, constant: f64) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            normal: normal / len,
            constant: constant / len,
        })
    }

    /// Creates the plane through `point` with the given normal.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_point_normal(point: &Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;
        Ok(Self {
            normal,
            constant: -normal.dot(&point.coords),
        })
    }

    /// Returns the unit normal of the plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Returns the implicit constant `d` of `normal · x + d = 0`.
    #[must_use]
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Signed distance from a point to the plane.
    /// Positive = on the normal side, negative = opposite.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        self.normal.dot(&point.coords) + self.constant
    }

    /// Returns this plane translated by `delta` along its normal.
    #[must_use]
    pub fn offset(&self, delta: f64) -> Self {
        Self {
            normal: self.normal,
            constant: self.constant - delta,
        }
    }

    /// Returns the point of the plane closest to the origin.
    #[must_use]
    pub fn origin(&self) -> Point3 {
        Point3::from(self.normal * -self.constant)
    }

    /// Computes an orthonormal in-plane basis `(u, v)` with `u × v = normal`.
    ///
    /// `u` is the normal crossed with the world axis least aligned with it,
    /// so the frame is stable for axis-aligned normals.
    #[must_use]
    pub fn basis(&self) -> (Vector3, Vector3) {
        let n = &self.normal;
        let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
        let axis = if ax <= ay && ax <= az {
            Vector3::x()
        } else if ay <= az {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let u = n.cross(&axis).normalize();
        let v = n.cross(&u);
        (u, v)
    }

    /// Projects a point onto the plane's `(u, v)` coordinates.
    ///
    /// Counter-clockwise order about the normal in 3D maps to
    /// counter-clockwise order in the projected 2D frame.
    #[must_use]
    pub fn project(&self, point: &Point3) -> Point2 {
        let (u, v) = self.basis();
        let diff = point - self.origin();
        Point2::new(diff.dot(&u), diff.dot(&v))
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

    #[test]
    fn from_point_normal_normalizes() {
        let plane = Plane::from_point_normal(&p(0.0, 0.0, 2.0), v(0.0, 0.0, 5.0)).unwrap();
        assert_relative_eq!(plane.normal().norm(), 1.0);
        assert_relative_eq!(plane.constant(), -2.0);
        assert_relative_eq!(plane.signed_distance(&p(3.0, -1.0, 2.0)), 0.0);
        assert_relative_eq!(plane.signed_distance(&p(0.0, 0.0, 3.0)), 1.0);
    }

    #[test]
    fn new_rescales_constant() {
        let plane = Plane::new(v(0.0, 2.0, 0.0), -4.0).unwrap();
        assert_relative_eq!(plane.constant(), -2.0);
        assert_relative_eq!(plane.origin(), p(0.0, 2.0, 0.0));
    }

    #[test]
    fn zero_normal_is_rejected() {
        assert!(Plane::new(Vector3::zeros(), 1.0).is_err());
        assert!(Plane::from_point_normal(&Point3::origin(), Vector3::zeros()).is_err());
    }

    #[test]
    fn offset_moves_along_normal() {
        let plane = Plane::from_point_normal(&p(1.0, 0.0, 0.0), v(1.0, 0.0, 0.0)).unwrap();
        let moved = plane.offset(0.25);
        assert_relative_eq!(moved.signed_distance(&p(1.25, 7.0, -3.0)), 0.0);
        assert_relative_eq!(*moved.normal(), *plane.normal());
    }

    #[test]
    fn basis_is_right_handed_about_normal() {
        for normal in [
            v(0.0, 0.0, 1.0),
            v(1.0, 0.0, 0.0),
            v(0.0, -1.0, 0.0),
            v(1.0, 2.0, 3.0),
            v(-0.3, 0.1, -0.9),
        ] {
            let plane = Plane::new(normal, 0.0).unwrap();
            let (u, w) = plane.basis();
            assert_relative_eq!(u.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(w.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(u.dot(&w), 0.0, epsilon = 1e-12);
            assert_relative_eq!(u.cross(&w), *plane.normal(), epsilon = 1e-12);
        }
    }

    #[test]
    fn project_preserves_distances_in_plane() {
        let plane = Plane::from_point_normal(&p(0.0, 0.0, 1.0), v(0.0, 0.0, 1.0)).unwrap();
        let a = plane.project(&p(0.0, 0.0, 1.0));
        let b = plane.project(&p(3.0, 4.0, 1.0));
        assert_relative_eq!((b - a).norm(), 5.0, epsilon = 1e-12);
    }
}
