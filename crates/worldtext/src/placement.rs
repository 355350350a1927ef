//! Placement modes and actor-relative spawn pose calculation

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geometry::{Angles, Octant, Vec3};
use crate::host::ActorState;
use crate::line::TextLine;

/// Distance a command-driven spawn is nudged away from the actor
pub const ACTOR_OFFSET: f32 = 15.0;

/// Vertical lift keeping floor text clear of the ground plane
const FLOOR_LIFT: f32 = 1.0;

/// Yaw applied on top of the snapped facing so the text reads toward the actor
const FACING_YAW: f32 = 270.0;

/// Roll turning wall text perpendicular to the actor's gaze
const WALL_ROLL: f32 = 90.0;

/// Orientation policy of a world text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPlacement {
    /// Flat on the ground, facing up
    Floor,
    /// Vertical, facing the viewer
    Wall,
}

impl fmt::Display for TextPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Floor => write!(f, "Floor"),
            Self::Wall => write!(f, "Wall"),
        }
    }
}

impl FromStr for TextPlacement {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "floor" => Ok(Self::Floor),
            "wall" => Ok(Self::Wall),
            _ => Err(()),
        }
    }
}

// Existing config files carry the integer encoding (0 = Floor, 1 = Wall),
// so that stays the serialized form; the string form is accepted on read.
impl Serialize for TextPlacement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Self::Floor => 0,
            Self::Wall => 1,
        })
    }
}

impl<'de> Deserialize<'de> for TextPlacement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PlacementVisitor;

        impl Visitor<'_> for PlacementVisitor {
            type Value = TextPlacement;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("0, 1, \"Floor\" or \"Wall\"")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                match value {
                    0 => Ok(TextPlacement::Floor),
                    1 => Ok(TextPlacement::Wall),
                    other => Err(E::custom(format!("unknown placement {other}"))),
                }
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                u64::try_from(value)
                    .map_err(|_| E::custom(format!("unknown placement {value}")))
                    .and_then(|value| self.visit_u64(value))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value
                    .parse()
                    .map_err(|()| E::custom(format!("unknown placement {value:?}")))
            }
        }

        deserializer.deserialize_any(PlacementVisitor)
    }
}

/// Spawn position and rotation for a text anchored to the given actor
///
/// The facing yaw is snapped to the nearest 10 degrees before use; the
/// origin is then nudged [`ACTOR_OFFSET`] units along the compass octant of
/// the actor's raw yaw so the text does not spawn inside the actor.
///
/// - `Floor`: feet position lifted slightly, facing rotated to read up.
/// - `Wall`: eye height plus the summed vertical extent of `lines`, rolled
///   perpendicular to the gaze.
pub fn spawn_pose(
    actor: &dyn ActorState,
    placement: TextPlacement,
    lines: &[TextLine],
) -> (Vec3, Angles) {
    let feet = actor.origin();
    let facing = actor.rotation();
    let snapped = facing.with_snapped_yaw();

    let (origin, rotation) = match placement {
        TextPlacement::Floor => (
            Vec3::new(feet.x, feet.y, feet.z + FLOOR_LIFT),
            Angles::new(snapped.x, snapped.y + FACING_YAW, snapped.z),
        ),
        TextPlacement::Wall => {
            let stack: f32 = lines.iter().map(TextLine::height).sum();
            (
                Vec3::new(feet.x, feet.y, feet.z + actor.eye_offset_z() + stack),
                Angles::new(snapped.x, snapped.y + FACING_YAW, snapped.z + WALL_ROLL),
            )
        }
    };

    let nudge = Octant::from_yaw(facing.y).offset(ACTOR_OFFSET);
    (origin + nudge, rotation)
}
