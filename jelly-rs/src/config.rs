use glam::{vec2, vec3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Tuning knobs for one jelly body. All values are set at attach time and
/// constant afterwards. Multipliers may be zero to disable a term.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct JellyConfig {
    /// How far vertices lean away from the direction of motion.
    pub wobble_strength: f32,
    pub spring_stiffness: f32,
    pub damping: f32,
    /// Scales raw positional delta down to visual displacement range.
    pub horizontal_multiplier: f32,
    pub overshoot_multiplier: f32,
    /// Overall responsiveness. Also feeds the integration time scale.
    pub speed: f32,
    /// Vertical squash/stretch on the leading and trailing edges.
    pub stretch_factor: f32,
    pub return_strength: f32,

    /// Per-axis jitter amplitude while the body is moving.
    pub x_axis_randomness: f32,
    pub y_axis_randomness: f32,
    pub z_axis_randomness: f32,
    pub random_smoothness: f32,

    pub wave_speed: f32,
    pub wave_amplitude: f32,

    /// Ceiling on the local motion velocity fed into the force field.
    pub max_velocity_magnitude: f32,
    pub click_impact_multiplier: f32,
    pub max_accumulated_impact: f32,
    /// How strongly vertices below the local y = 0 plane participate.
    pub bottom_vertex_movement_factor: f32,

    pub top_velocity_ceiling: f32,
    pub bottom_velocity_ceiling: f32,
    pub top_displacement_ceiling: f32,
    pub bottom_displacement_ceiling: f32,

    /// Pin bottom vertices to their rest positions instead of weakly
    /// simulating them.
    pub anchor_bottom_vertices: bool,
    /// Let accumulated impact charge strengthen the radial wave, so a hard
    /// hit ripples even when the body is not translating.
    pub impact_drives_wave: bool,
    /// Fade the return-to-rest force out as motion picks up.
    pub blend_return_force: bool,
}

impl Default for JellyConfig {
    fn default() -> Self {
        JellyConfig {
            wobble_strength: 0.25,
            spring_stiffness: 10.0,
            damping: 0.5,
            horizontal_multiplier: 0.01,
            overshoot_multiplier: 1.0,
            speed: 4.0,
            stretch_factor: 0.1,
            return_strength: 0.5,

            x_axis_randomness: 0.05,
            y_axis_randomness: 0.05,
            z_axis_randomness: 0.05,
            random_smoothness: 0.5,

            wave_speed: 3.0,
            wave_amplitude: 0.8,

            max_velocity_magnitude: 6.0,
            click_impact_multiplier: 5.0,
            max_accumulated_impact: 15.0,
            bottom_vertex_movement_factor: 0.1,

            top_velocity_ceiling: 1.0,
            bottom_velocity_ceiling: 0.2,
            top_displacement_ceiling: 0.5,
            bottom_displacement_ceiling: 0.1,

            anchor_bottom_vertices: false,
            impact_drives_wave: true,
            blend_return_force: true,
        }
    }
}

/// Settings for the discrete slide controller that moves a whole body
/// between fixed points. Bounds are on the horizontal (x, z) plane.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    pub bounds_min: Vec2,
    pub bounds_max: Vec2,
    pub left_slot: Vec3,
    pub right_slot: Vec3,
    pub move_speed: f32,
}

impl Default for SlideConfig {
    fn default() -> Self {
        SlideConfig {
            bounds_min: vec2(-7.0, -3.0),
            bounds_max: vec2(7.0, 7.0),
            left_slot: vec3(-7.0, 0.0, 0.0),
            right_slot: vec3(7.0, 0.0, 0.0),
            move_speed: 30.0,
        }
    }
}
