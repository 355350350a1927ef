//! Math utilities for world text placement
//!
//! Provides the vector/angle types shared across the crate, the compass
//! bucketing used to nudge spawns away from an actor, and the strict
//! `"x y z"` string codecs the persisted config format relies on.

use std::fmt;
use std::str::FromStr;

use crate::error::WorldTextError;

/// 3D vector type
pub type Vec3 = nalgebra::Vector3<f32>;

/// Yaw snap increment applied before a facing angle is used for placement
pub const YAW_SNAP_STEP: f32 = 10.0;

/// Euler rotation in degrees: `x` = pitch, `y` = yaw, `z` = roll
///
/// Host engines key world text orientation on yaw, so rotations stay in
/// Euler form end to end; this is also the persisted wire format.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Angles {
    /// Pitch in degrees
    pub x: f32,
    /// Yaw in degrees, -180..180
    pub y: f32,
    /// Roll in degrees
    pub z: f32,
}

impl Angles {
    /// Zero rotation
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Create a rotation from pitch/yaw/roll degrees
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Copy of this rotation with yaw rounded to the nearest snap step
    ///
    /// Keeps nearby spawns axis-aligned instead of drifting by sub-degree
    /// differences in the actor's view angle.
    pub fn with_snapped_yaw(self) -> Self {
        Self {
            y: (self.y / YAW_SNAP_STEP).round() * YAW_SNAP_STEP,
            ..self
        }
    }
}

impl fmt::Display for Angles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

impl FromStr for Angles {
    type Err = WorldTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_components(s)
            .map(|[x, y, z]| Self::new(x, y, z))
            .ok_or_else(|| WorldTextError::MalformedAngles(s.to_string()))
    }
}

/// Format a vector as the persisted `"x y z"` form
///
/// Uses the shortest float representation that round-trips, so a saved
/// origin re-parses to exactly the value it was formatted from.
pub fn format_vector(v: &Vec3) -> String {
    format!("{} {} {}", v.x, v.y, v.z)
}

/// Parse a persisted `"x y z"` vector string
///
/// # Errors
/// Returns [`WorldTextError::MalformedVector`] unless the input is exactly
/// three whitespace-separated numeric components.
pub fn parse_vector(s: &str) -> Result<Vec3, WorldTextError> {
    parse_components(s)
        .map(|[x, y, z]| Vec3::new(x, y, z))
        .ok_or_else(|| WorldTextError::MalformedVector(s.to_string()))
}

fn parse_components(s: &str) -> Option<[f32; 3]> {
    let mut parts = s.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let z = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some([x, y, z])
}

/// Coarse 8-way compass bucket of a yaw angle
///
/// Buckets are half-open 45-degree octants covering the full -180..180
/// domain with no gaps or overlaps; the wraparound seam at +/-180 belongs
/// to [`Octant::MinusX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Octant {
    /// Facing +X
    PlusX,
    /// Facing the +X/+Y diagonal
    PlusXPlusY,
    /// Facing +Y
    PlusY,
    /// Facing the -X/+Y diagonal
    MinusXPlusY,
    /// Facing -X
    MinusX,
    /// Facing the -X/-Y diagonal
    MinusXMinusY,
    /// Facing -Y
    MinusY,
    /// Facing the +X/-Y diagonal
    PlusXMinusY,
}

impl Octant {
    /// Classify a yaw angle in degrees into its compass octant
    pub fn from_yaw(yaw: f32) -> Self {
        if (-22.5..22.5).contains(&yaw) {
            Self::PlusX
        } else if (22.5..67.5).contains(&yaw) {
            Self::PlusXPlusY
        } else if (67.5..112.5).contains(&yaw) {
            Self::PlusY
        } else if (112.5..157.5).contains(&yaw) {
            Self::MinusXPlusY
        } else if yaw >= 157.5 || yaw < -157.5 {
            Self::MinusX
        } else if (-157.5..-112.5).contains(&yaw) {
            Self::MinusXMinusY
        } else if (-112.5..-67.5).contains(&yaw) {
            Self::MinusY
        } else {
            Self::PlusXMinusY
        }
    }

    /// Offset vector of the given magnitude in this octant's direction
    ///
    /// Diagonal octants offset along both axes unnormalized; Z is always
    /// zero.
    pub fn offset(self, magnitude: f32) -> Vec3 {
        match self {
            Self::PlusX => Vec3::new(magnitude, 0.0, 0.0),
            Self::MinusX => Vec3::new(-magnitude, 0.0, 0.0),
            Self::PlusY => Vec3::new(0.0, magnitude, 0.0),
            Self::MinusY => Vec3::new(0.0, -magnitude, 0.0),
            Self::PlusXPlusY => Vec3::new(magnitude, magnitude, 0.0),
            Self::MinusXPlusY => Vec3::new(-magnitude, magnitude, 0.0),
            Self::PlusXMinusY => Vec3::new(magnitude, -magnitude, 0.0),
            Self::MinusXMinusY => Vec3::new(-magnitude, -magnitude, 0.0),
        }
    }
}
