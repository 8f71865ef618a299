use glam::{Quat, Vec3};

use crate::config::JellyConfig;

/// Blend rate for the exponentially smoothed movement magnitude, in units
/// of 1/second.
const SMOOTHING_RATE: f32 = 5.0;

/// Turns frame-to-frame world position deltas into the clamped local
/// horizontal velocity the force field runs on.
#[derive(Clone, Debug)]
pub struct MotionEstimator {
    prev_world_position: Vec3,
    smoothed_magnitude: f32,
}

/// One frame's worth of motion signal.
#[derive(Clone, Copy, Debug)]
pub struct MotionSample {
    /// Horizontal velocity in object-local space, scaled and clamped.
    pub local_velocity: Vec3,
    /// Raw world-space speed before any scaling. Gates the wave phase rate.
    pub world_speed: f32,
    pub smoothed_magnitude: f32,
}

impl MotionEstimator {
    pub fn new(world_position: Vec3) -> Self {
        MotionEstimator {
            prev_world_position: world_position,
            smoothed_magnitude: 0.0,
        }
    }

    pub fn smoothed_magnitude(&self) -> f32 {
        self.smoothed_magnitude
    }

    pub fn sample(
        &mut self,
        world_position: Vec3,
        world_rotation: Quat,
        dt: f32,
        config: &JellyConfig,
    ) -> MotionSample {
        let velocity = if dt > 0.0 {
            (world_position - self.prev_world_position) / dt
        } else {
            Vec3::ZERO
        };
        self.prev_world_position = world_position;
        let world_speed = velocity.length();

        // Deformation is driven by horizontal translation only. The raw
        // positional delta is huge next to the displacement we want, hence
        // the separate horizontal multiplier.
        let mut local = world_rotation.inverse() * velocity;
        local.y = 0.0;
        local *= config.speed;
        local.x *= config.horizontal_multiplier;
        local.z *= config.horizontal_multiplier;

        // Clamp by rescale: the direction survives, only the magnitude is
        // capped.
        let magnitude = local.length();
        if magnitude > config.max_velocity_magnitude {
            local = local / magnitude * config.max_velocity_magnitude;
        }

        let blend = (dt * SMOOTHING_RATE).min(1.0);
        self.smoothed_magnitude += (local.length() - self.smoothed_magnitude) * blend;

        MotionSample {
            local_velocity: local,
            world_speed,
            smoothed_magnitude: self.smoothed_magnitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn stationary_body_produces_zero_signal() {
        let mut estimator = MotionEstimator::new(Vec3::ONE);
        let sample = estimator.sample(Vec3::ONE, Quat::IDENTITY, DT, &JellyConfig::default());
        assert_eq!(sample.local_velocity, Vec3::ZERO);
        assert_eq!(sample.world_speed, 0.0);
        assert_eq!(sample.smoothed_magnitude, 0.0);
    }

    #[test]
    fn vertical_motion_is_ignored() {
        let mut estimator = MotionEstimator::new(Vec3::ZERO);
        let sample = estimator.sample(
            Vec3::new(0.0, 5.0, 0.0),
            Quat::IDENTITY,
            DT,
            &JellyConfig::default(),
        );
        assert_eq!(sample.local_velocity, Vec3::ZERO);
        assert!(sample.world_speed > 0.0);
    }

    #[test]
    fn clamp_rescales_but_keeps_direction() {
        let config = JellyConfig::default();
        let mut estimator = MotionEstimator::new(Vec3::ZERO);
        // A teleport-sized delta blows well past the velocity ceiling.
        let sample = estimator.sample(
            Vec3::new(3000.0, 0.0, 4000.0),
            Quat::IDENTITY,
            DT,
            &config,
        );
        let magnitude = sample.local_velocity.length();
        assert!((magnitude - config.max_velocity_magnitude).abs() < 1e-3);
        let direction = sample.local_velocity / magnitude;
        assert!((direction - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-4);
    }

    #[test]
    fn rotation_maps_velocity_into_local_space() {
        let config = JellyConfig::default();
        // Body yawed 90 degrees: world +x shows up as local +z.
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let mut estimator = MotionEstimator::new(Vec3::ZERO);
        let sample = estimator.sample(Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY, 1.0, &config);
        let mut rotated = MotionEstimator::new(Vec3::ZERO);
        let rotated_sample = rotated.sample(Vec3::new(1.0, 0.0, 0.0), rotation, 1.0, &config);
        assert!((rotated_sample.local_velocity.z - sample.local_velocity.x).abs() < 1e-5);
        assert!(rotated_sample.local_velocity.x.abs() < 1e-5);
    }

    #[test]
    fn smoothed_magnitude_approaches_the_clamped_speed() {
        let config = JellyConfig::default();
        let mut estimator = MotionEstimator::new(Vec3::ZERO);
        let mut position = Vec3::ZERO;
        let mut last = 0.0;
        for _ in 0..120 {
            position.x += 2.0 * DT;
            let sample = estimator.sample(position, Quat::IDENTITY, DT, &config);
            last = sample.smoothed_magnitude;
        }
        // Steady speed 2.0 scaled by speed * horizontal multiplier.
        let expected = 2.0 * config.speed * config.horizontal_multiplier;
        assert!((last - expected).abs() < expected * 0.05);
    }
}
