//! Single-vehicle kinematics and guidance state machine.
//!
//! A vehicle flies at constant speed and changes heading at a rate bounded
//! by its turning radius. Guidance is one of three modes: straight flight
//! with no target, turn-rate-limited transit toward a target, or a
//! clockwise holding orbit entered on arrival.

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use uav_domain::{FlightMode, Position, TrackPoint, VehicleId, normalize_deg, signed_delta_deg};

/// Arrival threshold around a target, in position units.
pub const ARRIVAL_EPSILON: f64 = 1.0;

/// Guidance state. The holding center only exists while holding, so the
/// illegal "holding with no target" combination is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Guidance {
    Unassigned,
    Transiting {
        target_x: f64,
        target_y: f64,
    },
    Holding {
        target_x: f64,
        target_y: f64,
        center_x: f64,
        center_y: f64,
    },
}

/// One fixed-wing UAV in the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
    position: Position,
    /// Constant speed for the vehicle's lifetime, position units per second.
    velocity: f64,
    /// Heading in degrees, kept in `[0, 360)` after every update.
    azimuth_deg: f64,
    turning_radius: f64,
    guidance: Guidance,
}

impl Vehicle {
    pub fn new(
        id: VehicleId,
        position: Position,
        velocity: f64,
        azimuth_deg: f64,
        turning_radius: f64,
    ) -> Self {
        Self {
            id,
            position,
            velocity,
            azimuth_deg: normalize_deg(azimuth_deg),
            turning_radius,
            guidance: Guidance::Unassigned,
        }
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn azimuth_deg(&self) -> f64 {
        self.azimuth_deg
    }

    pub fn guidance(&self) -> Guidance {
        self.guidance
    }

    pub fn mode(&self) -> FlightMode {
        match self.guidance {
            Guidance::Unassigned => FlightMode::Unassigned,
            Guidance::Transiting { .. } => FlightMode::Transiting,
            Guidance::Holding { .. } => FlightMode::Holding,
        }
    }

    /// Assign a new waypoint, leaving any current loiter to pursue it.
    ///
    /// Re-assigning the exact coordinates of an established loiter is a
    /// no-op: the holding center must stay put when the same command is
    /// delivered again.
    pub fn assign_target(&mut self, x: f64, y: f64) {
        if let Guidance::Holding { target_x, target_y, .. } = self.guidance {
            if target_x == x && target_y == y {
                return;
            }
        }
        self.guidance = Guidance::Transiting { target_x: x, target_y: y };
    }

    /// Advance the vehicle by one tick of duration `dt`. Infallible.
    pub fn advance(&mut self, dt: f64) {
        match self.guidance {
            Guidance::Unassigned => self.fly_straight(dt),
            Guidance::Transiting { target_x, target_y } => {
                self.steer_toward(target_x, target_y, dt);
            }
            Guidance::Holding { center_x, center_y, .. } => self.orbit(center_x, center_y, dt),
        }
    }

    /// Trajectory sample for the current tick.
    pub fn sample(&self, time: f64) -> TrackPoint {
        TrackPoint {
            time,
            x: self.position.x,
            y: self.position.y,
            azimuth_deg: self.azimuth_deg,
        }
    }

    /// Straight flight along the current azimuth.
    fn fly_straight(&mut self, dt: f64) {
        let azimuth = self.azimuth_deg.to_radians();
        self.position.x += self.velocity * dt * azimuth.cos();
        self.position.y += self.velocity * dt * azimuth.sin();
    }

    /// Turn-rate-limited transit toward the target, with the arrival check
    /// ahead of any motion so the holding transition happens at the start
    /// of the tick it is detected in.
    fn steer_toward(&mut self, target_x: f64, target_y: f64, dt: f64) {
        if self.position.distance_to(target_x, target_y) <= ARRIVAL_EPSILON {
            let (center_x, center_y) = self.holding_center(target_x, target_y);
            self.guidance = Guidance::Holding { target_x, target_y, center_x, center_y };
            // first holding step happens in the same tick
            self.orbit(center_x, center_y, dt);
            return;
        }

        let bearing = self.position.bearing_to_deg(target_x, target_y);
        let turn_ratio = self.velocity / self.turning_radius;
        let max_turn_deg = (turn_ratio * dt).to_degrees();
        let delta = signed_delta_deg(self.azimuth_deg, bearing).clamp(-max_turn_deg, max_turn_deg);

        // Heading responds at the clamped delta scaled by v/r, not the raw
        // rate limit; the effective per-tick turn is (v/r)^2 * dt.
        self.azimuth_deg = normalize_deg(self.azimuth_deg + delta * turn_ratio);
        self.fly_straight(dt);
    }

    /// Clockwise orbit on the circle of `turning_radius` around the fixed
    /// holding center, azimuth tangent to the circle.
    fn orbit(&mut self, center_x: f64, center_y: f64, dt: f64) {
        let mut angle = (self.position.y - center_y).atan2(self.position.x - center_x);
        angle -= (self.velocity / self.turning_radius) * dt;

        self.position.x = center_x + self.turning_radius * angle.cos();
        self.position.y = center_y + self.turning_radius * angle.sin();
        self.azimuth_deg = normalize_deg(angle.to_degrees() - 90.0);
    }

    /// Loiter circle center: the target offset by one turning radius, 90
    /// degrees clockwise of the arrival azimuth.
    fn holding_center(&self, target_x: f64, target_y: f64) -> (f64, f64) {
        let offset = self.azimuth_deg.to_radians() - FRAC_PI_2;
        (
            target_x + self.turning_radius * offset.cos(),
            target_y + self.turning_radius * offset.sin(),
        )
    }
}
