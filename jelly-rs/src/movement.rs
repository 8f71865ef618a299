use glam::Vec3;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::SlideConfig;

/// Distance at which the controller snaps onto its target and stops.
const ARRIVAL_EPSILON: f32 = 1e-3;

/// Discrete position controller: slides the whole object between fixed
/// points at constant speed. Supplies the translation the jelly's motion
/// estimator observes; contains no deformation logic of its own.
pub struct SlideController {
    config: SlideConfig,
    position: Vec3,
    target: Vec3,
    moving: bool,
    rng: StdRng,
}

impl SlideController {
    pub fn new(config: SlideConfig, start: Vec3, rng_seed: u64) -> Self {
        SlideController {
            config,
            position: start,
            target: start,
            moving: false,
            rng: StdRng::seed_from_u64(rng_seed),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn move_to(&mut self, target: Vec3) {
        self.target = target;
        self.moving = true;
    }

    pub fn move_left(&mut self) {
        self.move_to(self.config.left_slot);
    }

    pub fn move_right(&mut self) {
        self.move_to(self.config.right_slot);
    }

    pub fn reset(&mut self) {
        self.move_to(Vec3::ZERO);
    }

    /// Picks a target inside the configured horizontal bounds, keeping the
    /// current height.
    pub fn move_to_random(&mut self) {
        let x = self
            .rng
            .gen_range(self.config.bounds_min.x..=self.config.bounds_max.x);
        let z = self
            .rng
            .gen_range(self.config.bounds_min.y..=self.config.bounds_max.y);
        self.move_to(Vec3::new(x, self.position.y, z));
    }

    /// Steps toward the target and returns the new position for the host
    /// to feed into the jelly update.
    pub fn update(&mut self, dt: f32) -> Vec3 {
        if self.moving {
            let step = self.config.move_speed * dt;
            self.position = move_towards(self.position, self.target, step);
            if self.position.distance(self.target) < ARRIVAL_EPSILON {
                self.position = self.target;
                self.moving = false;
            }
        }
        self.position
    }
}

fn move_towards(from: Vec3, to: Vec3, max_step: f32) -> Vec3 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max_step || distance < f32::EPSILON {
        to
    } else {
        from + delta / distance * max_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn controller() -> SlideController {
        SlideController::new(SlideConfig::default(), Vec3::ZERO, 5)
    }

    #[test]
    fn reaches_the_target_and_stops() {
        let mut slide = controller();
        slide.move_right();
        assert!(slide.is_moving());

        for _ in 0..120 {
            slide.update(DT);
        }
        assert!(!slide.is_moving());
        assert_eq!(slide.position(), SlideConfig::default().right_slot);

        // Idle updates hold position.
        let held = slide.update(DT);
        assert_eq!(held, SlideConfig::default().right_slot);
    }

    #[test]
    fn steps_at_constant_speed() {
        let mut slide = controller();
        slide.move_to(Vec3::new(100.0, 0.0, 0.0));
        let before = slide.position();
        let after = slide.update(DT);
        let step = before.distance(after);
        assert!((step - SlideConfig::default().move_speed * DT).abs() < 1e-4);
    }

    #[test]
    fn random_targets_stay_inside_bounds() {
        let config = SlideConfig::default();
        let mut slide = SlideController::new(config, Vec3::new(0.0, 2.0, 0.0), 9);
        for _ in 0..50 {
            slide.move_to_random();
            // Drive all the way there.
            for _ in 0..600 {
                slide.update(DT);
            }
            let position = slide.position();
            assert!(position.x >= config.bounds_min.x && position.x <= config.bounds_max.x);
            assert!(position.z >= config.bounds_min.y && position.z <= config.bounds_max.y);
            // Height is preserved on random moves.
            assert_eq!(position.y, 2.0);
        }
    }

    #[test]
    fn reset_returns_to_origin() {
        let mut slide = controller();
        slide.move_left();
        for _ in 0..120 {
            slide.update(DT);
        }
        slide.reset();
        for _ in 0..120 {
            slide.update(DT);
        }
        assert_eq!(slide.position(), Vec3::ZERO);
    }
}
