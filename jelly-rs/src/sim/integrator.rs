use glam::Vec3;
use noise::Perlin;

use crate::config::JellyConfig;

use super::{
    forces::{self, ForceFrame},
    vertex::VertexSet,
};

/// Speed above which even bottom vertices get the full spring treatment.
const ACTIVE_VELOCITY_THRESHOLD: f32 = 0.5;
/// Impact charge above which the whole body stays active.
const ACTIVE_IMPACT_THRESHOLD: f32 = 0.5;
/// Relaxation rate of the settling branch, in units of 1/second.
const SETTLE_RATE: f32 = 5.0;

/// One semi-implicit Euler step over the whole vertex set.
///
/// Every vertex is classified fresh each call: top vertices, fast frames,
/// and charged-up bodies take the spring branch; everything else relaxes
/// straight toward rest. Spring-simulating resting vertices leaves them
/// buzzing on floating-point residue and noise samples forever, so the
/// settling branch exists to force exact convergence.
pub fn integrate(
    vertices: &mut VertexSet,
    noise: &Perlin,
    config: &JellyConfig,
    frame: &ForceFrame,
    dt: f32,
) {
    let time_scale = (1.0 + config.speed).clamp(1.0, 3.0);
    let dt_scaled = dt * time_scale;
    let settle = (dt * SETTLE_RATE).min(1.0);

    // Return force fades as motion picks up, pulling hardest when the
    // body is nearly still.
    let return_strength = if config.blend_return_force {
        config.return_strength * (1.0 - (frame.velocity_magnitude * 0.5).min(1.0))
    } else {
        config.return_strength
    };

    let body_active = frame.velocity_magnitude > ACTIVE_VELOCITY_THRESHOLD
        || frame.accumulated_impact > ACTIVE_IMPACT_THRESHOLD;

    for i in 0..vertices.len() {
        let is_top = vertices.is_top[i];
        let rest = vertices.rest[i];

        if !is_top && config.anchor_bottom_vertices {
            vertices.working[i] = rest;
            vertices.velocities[i] = Vec3::ZERO;
            continue;
        }

        if is_top || body_active {
            let movement_factor = if is_top {
                1.0
            } else {
                config.bottom_vertex_movement_factor
            };

            let target = forces::compose_target(
                noise,
                config,
                frame,
                vertices.center,
                rest,
                vertices.seeds[i],
                vertices.jitter_directions[i],
                movement_factor,
            );

            let spring_force = (target - vertices.working[i]) * config.spring_stiffness;
            let return_force = (rest - vertices.working[i]) * return_strength;
            let damping_force = -vertices.velocities[i] * config.damping;
            let force = spring_force + damping_force + return_force;

            let mut velocity = vertices.velocities[i] + force * dt_scaled;
            let velocity_ceiling = if is_top {
                config.top_velocity_ceiling
            } else {
                config.bottom_velocity_ceiling
            };
            let speed = velocity.length();
            if speed > velocity_ceiling {
                velocity = velocity / speed * velocity_ceiling;
            }
            vertices.velocities[i] = velocity;

            let mut working = vertices.working[i] + velocity * dt_scaled;
            let displacement_ceiling = if is_top {
                config.top_displacement_ceiling
            } else {
                config.bottom_displacement_ceiling
            };
            let displacement = working - rest;
            let distance = displacement.length();
            if distance > displacement_ceiling {
                working = rest + displacement / distance * displacement_ceiling;
            }
            vertices.working[i] = working;
        } else {
            vertices.working[i] = vertices.working[i].lerp(rest, settle);
            vertices.velocities[i] = vertices.velocities[i].lerp(Vec3::ZERO, settle);
        }
    }
}
