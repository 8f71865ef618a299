mod forces;
mod impact;
mod integrator;
mod motion;
mod vertex;

use glam::{Quat, Vec3};
use log::{debug, trace};
use noise::Perlin;

use crate::{
    config::JellyConfig,
    mesh::{DeformedMesh, RestMesh},
    JellyError,
};

use self::{
    forces::ForceFrame, impact::ImpactState, motion::MotionEstimator, vertex::VertexSet,
};

/// Timestep assumed for an impact pass that lands before the first
/// regular update has recorded a frame delta.
const FALLBACK_TIMESTEP: f32 = 1.0 / 60.0;

/// One jelly object: the per-vertex spring simulation plus the motion and
/// impact state driving it. Owns its state exclusively; the host passes
/// the object's pose in every frame and pulls the working positions back
/// out for rendering.
pub struct JellyBody {
    config: JellyConfig,
    vertices: VertexSet,
    motion: MotionEstimator,
    impact: ImpactState,
    noise: Perlin,
    world_rotation: Quat,
    /// Explicit simulation clock, advanced by the host's dt. Feeds the
    /// jitter noise so identical input sequences replay identically.
    time: f32,
    last_dt: f32,
}

impl JellyBody {
    /// Clones the rest template into per-vertex simulation state. The
    /// object seed keys every random decision, so attaching the same mesh
    /// with the same seed reproduces the same jitter phases run to run.
    pub fn attach(
        mesh: &RestMesh,
        object_seed: u64,
        world_position: Vec3,
        config: JellyConfig,
    ) -> Result<Self, JellyError> {
        if mesh.positions.is_empty() {
            return Err(JellyError::EmptyMesh);
        }

        let vertices = VertexSet::from_rest(mesh, object_seed);
        debug!(
            "jelly attached: {} vertices ({} top), seed {}",
            vertices.len(),
            vertices.is_top.iter().filter(|top| **top).count(),
            object_seed,
        );

        Ok(JellyBody {
            config,
            vertices,
            motion: MotionEstimator::new(world_position),
            impact: ImpactState::new(),
            noise: Perlin::new(object_seed as u32),
            world_rotation: Quat::IDENTITY,
            time: 0.0,
            last_dt: FALLBACK_TIMESTEP,
        })
    }

    /// Advances the simulation one frame. One call per rendered frame;
    /// the update is atomic from the simulation's point of view.
    pub fn update(&mut self, world_position: Vec3, world_rotation: Quat, dt: f32) {
        self.world_rotation = world_rotation;
        self.time += dt;
        self.last_dt = dt;

        let sample = self
            .motion
            .sample(world_position, world_rotation, dt, &self.config);
        self.impact
            .advance_wave(dt, sample.world_speed, &self.config);

        let frame = ForceFrame::new(
            sample.local_velocity,
            sample.smoothed_magnitude,
            self.impact.accumulated(),
            self.impact.wave_offset(),
            self.time,
        );
        integrator::integrate(&mut self.vertices, &self.noise, &self.config, &frame, dt);

        self.impact.decay(dt);
    }

    /// Absorbs a discrete hit and runs one extra integration pass with the
    /// resulting impulse velocity, fully applied before returning. The
    /// direction is a world-space unit vector, typically from the hit
    /// point toward the collider bounds center.
    pub fn apply_impact(&mut self, world_direction: Vec3, magnitude: f32) {
        let impulse_magnitude = self.impact.absorb(magnitude, &self.config);

        let local_direction =
            (self.world_rotation.inverse() * world_direction).normalize_or_zero();
        let mut impulse = local_direction * impulse_magnitude;
        impulse.x *= self.config.horizontal_multiplier * 2.0;
        impulse.z *= self.config.horizontal_multiplier * 2.0;

        trace!(
            "impact: impulse magnitude {impulse_magnitude:.3}, charge {:.3}",
            self.impact.accumulated(),
        );

        let frame = ForceFrame::new(
            impulse,
            self.motion.smoothed_magnitude(),
            self.impact.accumulated(),
            self.impact.wave_offset(),
            self.time,
        );
        let dt = if self.last_dt > 0.0 {
            self.last_dt
        } else {
            FALLBACK_TIMESTEP
        };
        integrator::integrate(&mut self.vertices, &self.noise, &self.config, &frame, dt);
    }

    /// Writes the working vertex buffer into the renderable mesh and marks
    /// its geometry dirty.
    pub fn commit_to(&self, mesh: &mut DeformedMesh) -> Result<(), JellyError> {
        mesh.commit(&self.vertices.working)
    }

    pub fn config(&self) -> &JellyConfig {
        &self.config
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.vertices.rest
    }

    pub fn working_positions(&self) -> &[Vec3] {
        &self.vertices.working
    }

    pub fn vertex_velocities(&self) -> &[Vec3] {
        &self.vertices.velocities
    }

    pub fn is_top_vertex(&self) -> &[bool] {
        &self.vertices.is_top
    }

    pub fn object_center(&self) -> Vec3 {
        self.vertices.center
    }

    pub fn accumulated_impact(&self) -> f32 {
        self.impact.accumulated()
    }

    pub fn wave_offset(&self) -> f32 {
        self.impact.wave_offset()
    }

    pub fn smoothed_movement(&self) -> f32 {
        self.motion.smoothed_magnitude()
    }

    /// Largest current deviation from the rest pose.
    pub fn max_displacement(&self) -> f32 {
        self.vertices.max_displacement()
    }
}
