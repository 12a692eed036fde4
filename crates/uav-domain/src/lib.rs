//! # UAV Fleet Simulator - Domain Model
//!
//! Core domain types shared between the simulation engine and its
//! consumers: planar kinematic value objects, azimuth math, time-triggered
//! waypoint commands, and per-tick trajectory samples. These types are the
//! single source of truth across the engine, the log sink, and reporting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fleet-local vehicle identifier, assigned sequentially at fleet creation.
pub type VehicleId = u32;

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// Position in the planar simulation frame. `z` is carried for completeness
/// but no motion primitive updates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar Euclidean distance to another point, ignoring `z`.
    #[must_use]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (x - self.x).hypot(y - self.y)
    }

    /// Planar bearing toward a point, in degrees in `(-180, 180]`
    /// (mathematical convention: 0 along +x, counterclockwise positive).
    #[must_use]
    pub fn bearing_to_deg(&self, x: f64, y: f64) -> f64 {
        (y - self.y).atan2(x - self.x).to_degrees()
    }
}

/// Normalize an angle in degrees to `[0, 360)`.
#[must_use]
pub fn normalize_deg(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid of a tiny negative can round up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shortest signed angular difference `to - from` in degrees, wrapped to
/// `(-180, 180]`. Positive means a counterclockwise turn from `from`.
#[must_use]
pub fn signed_delta_deg(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

// =============================================================================
// ENUMS
// =============================================================================

/// Vehicle guidance mode. Exactly one of these holds at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightMode {
    /// No target assigned; flying straight on the current azimuth.
    Unassigned,
    /// Steering toward an assigned target not yet reached.
    Transiting,
    /// Loitering clockwise on a fixed circle after reaching a target.
    Holding,
}

impl FlightMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unassigned => "UNASSIGNED",
            Self::Transiting => "TRANSITING",
            Self::Holding => "HOLDING",
        }
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Time-triggered waypoint command: at `time`, send vehicle `vehicle_id`
/// toward `(target_x, target_y)`. Loaded once at startup, read-only after.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Trigger time in simulation-clock units. Non-negative.
    pub time: f64,
    pub vehicle_id: VehicleId,
    pub target_x: f64,
    pub target_y: f64,
}

impl Command {
    /// Check record-level invariants: finite non-negative trigger time,
    /// finite target coordinates.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.time.is_finite() || self.time < 0.0 {
            return Err(DomainError::InvalidTriggerTime(self.time));
        }
        if !self.target_x.is_finite() || !self.target_y.is_finite() {
            return Err(DomainError::InvalidTargetCoordinates {
                x: self.target_x,
                y: self.target_y,
            });
        }
        Ok(())
    }
}

// =============================================================================
// TRAJECTORY SAMPLES
// =============================================================================

/// One per-tick trajectory sample for a single vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub azimuth_deg: f64,
}

impl fmt::Display for TrackPoint {
    /// Fixed two-decimal log-line format: `time x y azimuth`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} {:.2} {:.2} {:.2}",
            self.time, self.x, self.y, self.azimuth_deg
        )
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("invalid trigger time: {0}")]
    InvalidTriggerTime(f64),

    #[error("non-finite target coordinates: x={x}, y={y}")]
    InvalidTargetCoordinates { x: f64, y: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_deg() {
        assert_eq!(normalize_deg(0.0), 0.0);
        assert_eq!(normalize_deg(360.0), 0.0);
        assert_eq!(normalize_deg(-90.0), 270.0);
        assert_eq!(normalize_deg(725.0), 5.0);
        assert!(normalize_deg(-1e-13) < 360.0);
    }

    #[test]
    fn test_signed_delta_wraps_short_way() {
        assert_eq!(signed_delta_deg(350.0, 10.0), 20.0);
        assert_eq!(signed_delta_deg(10.0, 350.0), -20.0);
        assert_eq!(signed_delta_deg(0.0, 180.0), 180.0);
        assert_eq!(signed_delta_deg(90.0, 90.0), 0.0);
    }

    #[test]
    fn test_bearing_and_distance() {
        let origin = Position::new(0.0, 0.0, 100.0);
        assert_eq!(origin.bearing_to_deg(10.0, 0.0), 0.0);
        assert!((origin.bearing_to_deg(0.0, 10.0) - 90.0).abs() < 1e-9);
        assert!((origin.distance_to(3.0, 4.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_command_validation() {
        let cmd = Command { time: 5.0, vehicle_id: 0, target_x: 1.0, target_y: 2.0 };
        assert!(cmd.validate().is_ok());

        let negative = Command { time: -1.0, ..cmd };
        assert!(negative.validate().is_err());

        let nan_target = Command { target_x: f64::NAN, ..cmd };
        assert!(nan_target.validate().is_err());
    }

    #[test]
    fn test_track_point_log_line() {
        let point = TrackPoint { time: 1.5, x: 10.25, y: -3.0, azimuth_deg: 347.5 };
        assert_eq!(point.to_string(), "1.50 10.25 -3.00 347.50");
    }
}
