use glam::{Quat, Vec3};
use jelly_rs::{DeformedMesh, JellyBody, JellyConfig, RestMesh, SlideConfig, SlideController};

const DT: f32 = 1.0 / 60.0;

/// Stand-in for the pointer collaborator: given a surface point that was
/// "clicked", aim the impulse at the bounds center, the way a ray hit
/// against the collider would.
fn poke(body: &mut JellyBody, mesh: &DeformedMesh, hit_point: Vec3, magnitude: f32) {
    let direction = (mesh.bounds_center() - hit_point).normalize_or_zero();
    body.apply_impact(direction, magnitude);
}

fn main() {
    let mesh = RestMesh::subdivided_cube(1.0, 8);
    let mut deformed = DeformedMesh::from_rest(&mesh);
    let mut body = JellyBody::attach(&mesh, 7, Vec3::ZERO, JellyConfig::default())
        .expect("cube template has vertices");
    let mut slide = SlideController::new(SlideConfig::default(), Vec3::ZERO, 7);

    println!("frame   position.x   wobble   charge");

    slide.move_right();
    for frame in 0..600 {
        // Poke the top face once while sliding, and twice in quick
        // succession while parked to show the charge compounding.
        match frame {
            90 => poke(&mut body, &deformed, Vec3::new(0.0, 1.0, 0.0), 1.0),
            300 | 310 => poke(&mut body, &deformed, Vec3::new(0.5, 1.0, 0.5), 1.0),
            420 => slide.move_to_random(),
            _ => {}
        }

        let position = slide.update(DT);
        body.update(position, Quat::IDENTITY, DT);
        body.commit_to(&mut deformed).expect("vertex counts match");

        if deformed.take_dirty() && frame % 30 == 0 {
            println!(
                "{frame:>5}   {:>10.3}   {:>6.3}   {:>6.3}",
                position.x,
                body.max_displacement(),
                body.accumulated_impact(),
            );
        }
    }

    println!(
        "final wobble {:.5} (settled: {})",
        body.max_displacement(),
        body.max_displacement() < 1e-3,
    );
}
