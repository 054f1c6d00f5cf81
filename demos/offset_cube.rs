//! Offsets a unit cube and a regular tetrahedron, logging the resulting
//! polyhedra.
//!
//! Usage:
//! ```text
//! cargo run --example offset_cube
//! RUST_LOG=facet_offset=debug cargo run --example offset_cube
//! ```

use facet_offset::math::Point3;
use facet_offset::operations::creation::{MakeBox, MakeTetrahedron};
use facet_offset::operations::query::{BoundingBox, Volume};
use facet_offset::{Result, Session};
use tracing::info;

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for this demo and the library.
    // Override with RUST_LOG env var (e.g. RUST_LOG=facet_offset=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("offset_cube=info".parse().unwrap_or_default())
        .add_directive("facet_offset=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut session = Session::new();
    let cube = session.add_object(
        MakeBox::new(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5)).execute()?,
    )?;
    let tetra = session.add_object(MakeTetrahedron::new(Point3::origin(), 1.0).execute()?)?;

    // Uniform offset of every cube face.
    session.hover(cube, 0)?;
    session.begin_drag(true)?;
    let report = session.drag_to(0.1)?;
    session.end_drag();

    let engine = session.object(cube)?.engine();
    let aabb = BoundingBox::new(engine.vertices()).execute()?;
    info!(
        vertices = report.vertex_count,
        volume = Volume::new(&engine.face_polygons()).execute()?,
        min = ?aabb.min,
        max = ?aabb.max,
        "cube offset by 0.1"
    );

    // Push one tetrahedron face out in small steps.
    session.hover(tetra, 0)?;
    session.begin_drag(false)?;
    for step in 1..=4 {
        let amount = 0.05 * f64::from(step);
        session.drag_to(amount)?;
        let engine = session.object(tetra)?.engine();
        info!(
            amount,
            volume = Volume::new(&engine.face_polygons()).execute()?,
            centroid = ?engine.face_centroid(0, false)?,
            "tetrahedron face 0 dragged"
        );
    }
    session.end_drag();

    for v in 0..4 {
        let engine = session.object(tetra)?.engine();
        if let Some(p) = engine.closed_form_vertex(v) {
            info!(vertex = v, position = ?p, "closed-form vertex");
        }
    }

    info!(generation = session.generation(), "done");
    Ok(())
}
