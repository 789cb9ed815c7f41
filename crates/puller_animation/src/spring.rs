//! Spring physics
//!
//! RK4-integrated damped springs. Used to drive under-damped sheet
//! settling; timed curves cover the critically damped cases.

use std::f32::consts::PI;

/// Physical parameters of a spring
#[derive(Clone, Copy, Debug)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Derive parameters from a response time and damping fraction
    ///
    /// `response` is the approximate duration of one oscillation period in
    /// seconds; `damping_fraction` of 1.0 is critically damped, values
    /// below 1.0 overshoot. This is the parameterization the sheet's
    /// animation strategies use.
    pub fn with_response(response: f32, damping_fraction: f32) -> Self {
        let mass = 1.0;
        let stiffness = (2.0 * PI / response.max(0.01)).powi(2) * mass;
        let damping = 4.0 * PI * damping_fraction * mass / response.max(0.01);
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// A snappy spring for sheet settling
    pub fn sheet() -> Self {
        Self {
            stiffness: 400.0,
            damping: 34.0,
            mass: 1.0,
        }
    }

    /// A gentle spring for backdrop and indicator moves
    pub fn gentle() -> Self {
        Self {
            stiffness: 120.0,
            damping: 14.0,
            mass: 1.0,
        }
    }

    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::sheet()
    }
}

/// A one-dimensional spring animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Retarget the spring; current velocity carries over
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    /// Whether the spring is close enough to the target to stop
    pub fn is_settled(&self) -> bool {
        // Half a pixel and 5 px/s are below perception for sheet movement
        const EPSILON: f32 = 0.5;
        const VELOCITY_EPSILON: f32 = 5.0;

        (self.value - self.target).abs() < EPSILON && self.velocity.abs() < VELOCITY_EPSILON
    }

    /// Advance the simulation by `dt` seconds using RK4 integration
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_settles_to_target() {
        let mut spring = Spring::new(SpringConfig::sheet(), 0.0);
        spring.set_target(100.0);

        for _ in 0..240 {
            spring.step(1.0 / 60.0);
        }

        assert!(spring.is_settled());
        assert!((spring.value() - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_spring_inherits_velocity_on_retarget() {
        let mut spring = Spring::new(SpringConfig::gentle(), 0.0);
        spring.set_target(100.0);

        for _ in 0..10 {
            spring.step(1.0 / 60.0);
        }

        let velocity = spring.velocity();
        assert!(velocity > 0.0);

        spring.set_target(50.0);
        assert_eq!(spring.velocity(), velocity);
    }

    #[test]
    fn test_with_response_damping_fraction() {
        // Fraction 1.0 is critical damping, below 1.0 oscillates
        let critical = SpringConfig::with_response(0.5, 1.0);
        assert!((critical.damping - critical.critical_damping()).abs() < 0.01);

        let bouncy = SpringConfig::with_response(0.5, 0.8);
        assert!(bouncy.is_underdamped());
    }

    #[test]
    fn test_spring_stable_with_large_steps() {
        let mut spring = Spring::new(SpringConfig::sheet(), 0.0);
        spring.set_target(1000.0);

        for _ in 0..100 {
            spring.step(0.1);
            assert!(spring.value().is_finite());
            assert!(spring.value() > -500.0 && spring.value() < 2000.0);
        }
    }
}
