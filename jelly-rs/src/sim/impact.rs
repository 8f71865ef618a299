use crate::config::JellyConfig;

/// Charge lost per second, independent of how the charge was gained.
const DECAY_RATE: f32 = 2.0;
/// Fraction of the configured wave speed used while the body is idle.
const IDLE_WAVE_RATE: f32 = 0.2;
/// World-space speed above which the wave phase runs at full rate.
const MOVING_SPEED_THRESHOLD: f32 = 0.1;

/// Discrete hits become a decaying scalar charge. The charge compounds the
/// force of rapid follow-up hits and feeds the wave strength, so a hard
/// poke ripples visibly even while the body stands still.
#[derive(Clone, Debug, Default)]
pub struct ImpactState {
    accumulated: f32,
    wave_offset: f32,
}

impl ImpactState {
    pub fn new() -> Self {
        ImpactState::default()
    }

    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    pub fn wave_offset(&self) -> f32 {
        self.wave_offset
    }

    /// Folds one hit into the charge and returns the impulse magnitude to
    /// integrate with. Repeated rapid hits compound up to the charge clamp,
    /// and the returned force is capped at three times the velocity clamp.
    pub fn absorb(&mut self, magnitude: f32, config: &JellyConfig) -> f32 {
        let mut magnitude = magnitude * config.click_impact_multiplier;

        self.accumulated = (self.accumulated + magnitude * 0.2).min(config.max_accumulated_impact);
        magnitude *= 1.0 + self.accumulated * 0.1;

        magnitude.min(config.max_velocity_magnitude * 3.0)
    }

    /// Advances the wave phase, faster while the body translates.
    pub fn advance_wave(&mut self, dt: f32, world_speed: f32, config: &JellyConfig) {
        let rate = if world_speed > MOVING_SPEED_THRESHOLD {
            1.0
        } else {
            IDLE_WAVE_RATE
        };
        self.wave_offset += dt * config.wave_speed * rate;
    }

    /// Linear decay toward zero, floored at zero. Runs once per frame
    /// after integration.
    pub fn decay(&mut self, dt: f32) {
        if self.accumulated > 0.0 {
            self.accumulated = (self.accumulated - DECAY_RATE * dt).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_multiplier() -> JellyConfig {
        JellyConfig {
            click_impact_multiplier: 1.0,
            ..JellyConfig::default()
        }
    }

    #[test]
    fn single_unit_hit_charges_a_fifth() {
        let mut impact = ImpactState::new();
        impact.absorb(1.0, &unit_multiplier());
        assert!((impact.accumulated() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn charge_never_exceeds_the_configured_maximum() {
        let config = JellyConfig::default();
        let mut impact = ImpactState::new();
        for _ in 0..100 {
            impact.absorb(10.0, &config);
            assert!(impact.accumulated() <= config.max_accumulated_impact);
        }
        assert!((impact.accumulated() - config.max_accumulated_impact).abs() < 1e-6);
    }

    #[test]
    fn rapid_hits_compound_the_returned_force() {
        let config = unit_multiplier();
        let mut impact = ImpactState::new();
        let first = impact.absorb(1.0, &config);
        let second = impact.absorb(1.0, &config);
        assert!(second > first);
    }

    #[test]
    fn force_is_capped_at_three_velocity_clamps() {
        let config = JellyConfig::default();
        let mut impact = ImpactState::new();
        let force = impact.absorb(1000.0, &config);
        assert_eq!(force, config.max_velocity_magnitude * 3.0);
    }

    #[test]
    fn decay_is_monotone_and_floors_at_zero() {
        let config = unit_multiplier();
        let mut impact = ImpactState::new();
        impact.absorb(2.0, &config);

        let mut previous = impact.accumulated();
        for _ in 0..60 {
            impact.decay(1.0 / 60.0);
            assert!(impact.accumulated() <= previous);
            assert!(impact.accumulated() >= 0.0);
            previous = impact.accumulated();
        }
        assert_eq!(impact.accumulated(), 0.0);
    }

    #[test]
    fn wave_phase_runs_slower_at_rest() {
        let config = JellyConfig::default();
        let mut idle = ImpactState::new();
        let mut moving = ImpactState::new();
        idle.advance_wave(1.0, 0.0, &config);
        moving.advance_wave(1.0, 1.0, &config);
        assert!((idle.wave_offset() - config.wave_speed * IDLE_WAVE_RATE).abs() < 1e-6);
        assert!((moving.wave_offset() - config.wave_speed).abs() < 1e-6);
    }
}
