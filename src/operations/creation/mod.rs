mod make_box;
mod make_octahedron;
mod make_prism;
mod make_tetrahedron;

pub use make_box::MakeBox;
pub use make_octahedron::MakeOctahedron;
pub use make_prism::MakePrism;
pub use make_tetrahedron::MakeTetrahedron;

use crate::math::polygon_3d::{centroid, newell_normal};
use crate::math::Point3;

/// Reverses `face` if its winding points toward `center` rather than away.
fn wind_outward(positions: &[Point3], mut face: Vec<usize>, center: &Point3) -> Vec<usize> {
    let points: Vec<Point3> = face.iter().map(|&v| positions[v]).collect();
    if newell_normal(&points).dot(&(centroid(&points) - center)) < 0.0 {
        face.reverse();
    }
    face
}
