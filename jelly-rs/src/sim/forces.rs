use glam::{vec2, Vec3};
use noise::{NoiseFn, Perlin};

use crate::config::JellyConfig;

/// Seed-axis phase offsets keeping the three jitter axes decorrelated.
const AXIS_PHASES: [f32; 3] = [0.0, 100.0, 200.0];
/// Below this speed the body counts as resting and gets no jitter.
const JITTER_VELOCITY_THRESHOLD: f32 = 0.01;

/// The per-frame values shared by every vertex of one composition pass.
/// Built once from a motion sample or an impact impulse, then applied
/// across the whole vertex set.
#[derive(Clone, Copy, Debug)]
pub struct ForceFrame {
    pub local_velocity: Vec3,
    pub movement_direction: Vec3,
    pub velocity_magnitude: f32,
    pub smoothed_magnitude: f32,
    pub accumulated_impact: f32,
    pub wave_offset: f32,
    pub time: f32,
}

impl ForceFrame {
    pub fn new(
        local_velocity: Vec3,
        smoothed_magnitude: f32,
        accumulated_impact: f32,
        wave_offset: f32,
        time: f32,
    ) -> Self {
        ForceFrame {
            local_velocity,
            movement_direction: local_velocity.normalize_or_zero(),
            velocity_magnitude: local_velocity.length(),
            smoothed_magnitude,
            accumulated_impact,
            wave_offset,
            time,
        }
    }
}

/// The position the spring pulls one vertex toward this frame:
/// rest + counter-motion + jitter, plus stretch and wave stacked on the
/// up axis.
pub fn compose_target(
    noise: &Perlin,
    config: &JellyConfig,
    frame: &ForceFrame,
    center: Vec3,
    rest: Vec3,
    seed: u32,
    jitter_direction: Vec3,
    movement_factor: f32,
) -> Vec3 {
    let counter_motion = -frame.local_velocity
        * (config.wobble_strength * config.overshoot_multiplier * movement_factor);
    let jitter = jitter_offset(noise, config, frame, seed, jitter_direction);
    let stretch = stretch_amount(config, frame, center, rest, movement_factor);
    let wave = wave_amount(config, frame, center, rest);

    rest + counter_motion + jitter + Vec3::new(0.0, stretch + wave, 0.0)
}

// Perlin output is nominally [-1, 1] but can overshoot slightly, so clamp
// before scaling.
fn sample_signed(noise: &Perlin, x: f32, y: f32) -> f32 {
    (noise.get([x as f64, y as f64]) as f32).clamp(-1.0, 1.0)
}

/// Smooth per-vertex wander while the body moves. Weighted by the average
/// of the smoothed and instantaneous magnitudes so it neither spikes on a
/// single fast frame nor snaps off the moment motion stops.
pub fn jitter_offset(
    noise: &Perlin,
    config: &JellyConfig,
    frame: &ForceFrame,
    seed: u32,
    jitter_direction: Vec3,
) -> Vec3 {
    if frame.velocity_magnitude < JITTER_VELOCITY_THRESHOLD {
        return Vec3::ZERO;
    }

    let seed_coord = seed as f32 * 0.01;
    let t = frame.time * config.random_smoothness;

    let offset = Vec3::new(
        sample_signed(noise, seed_coord + AXIS_PHASES[0], t)
            * config.x_axis_randomness
            * jitter_direction.x,
        sample_signed(noise, seed_coord + AXIS_PHASES[1], t)
            * config.y_axis_randomness
            * jitter_direction.y,
        sample_signed(noise, seed_coord + AXIS_PHASES[2], t)
            * config.z_axis_randomness
            * jitter_direction.z,
    );

    offset * (frame.smoothed_magnitude * 0.5 + frame.velocity_magnitude * 0.5)
}

/// Vertical squash/stretch. Vertices on the leading and trailing edges
/// relative to the object center stretch the most; side vertices barely
/// move. A vertex sitting on the center axis contributes nothing.
pub fn stretch_amount(
    config: &JellyConfig,
    frame: &ForceFrame,
    center: Vec3,
    rest: Vec3,
    movement_factor: f32,
) -> f32 {
    let mut to_center = center - rest;
    to_center.y = 0.0;

    let alignment = frame.movement_direction.dot(to_center.normalize_or_zero());
    alignment * config.stretch_factor * frame.velocity_magnitude * movement_factor
}

/// Radial ripple centered on the object, strengthened by sustained motion
/// or (when enabled) recent impact charge.
pub fn wave_amount(config: &JellyConfig, frame: &ForceFrame, center: Vec3, rest: Vec3) -> f32 {
    let horizontal_distance = vec2(rest.x, rest.z).distance(vec2(center.x, center.z));
    let wave = (horizontal_distance + frame.wave_offset).sin() * config.wave_amplitude;

    let strength = if config.impact_drives_wave {
        frame
            .smoothed_magnitude
            .max(frame.accumulated_impact * 0.1)
    } else {
        frame.smoothed_magnitude
    };

    wave * strength
}
