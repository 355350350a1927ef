//! # WorldText
//!
//! In-world multiline text for game servers: spawning, updating,
//! repositioning, persisting, and removing 3D text anchored to map
//! coordinates.
//!
//! The crate owns the registry of live text objects and their per-map JSON
//! persistence; the host engine's entity primitives and actor state are
//! consumed through the narrow traits in [`host`].
//!
//! ## Quick Start
//!
//! ```rust
//! use worldtext::prelude::*;
//!
//! let mut service = WorldTextService::new(MemoryTextBackend::new(), "data");
//!
//! let id = service.add_world_text(
//!     TextPlacement::Wall,
//!     vec![TextLine::new("welcome", Color::YELLOW, 24)],
//!     Vec3::new(0.0, 0.0, 100.0),
//!     Angles::ZERO,
//!     false,
//! );
//! assert_eq!(service.line_entities(id).unwrap().len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod line;
pub mod multiline;
pub mod placement;
pub mod registry;
pub mod service;

pub use error::WorldTextError;
pub use service::{WorldTextApi, WorldTextService};

/// Common imports for service consumers
pub mod prelude {
    pub use crate::error::WorldTextError;
    pub use crate::geometry::{Angles, Vec3};
    pub use crate::host::{ActorState, EntityHandle, MemoryTextBackend, TextEntityBackend};
    pub use crate::line::{Color, TextLine};
    pub use crate::multiline::TextId;
    pub use crate::placement::TextPlacement;
    pub use crate::registry::WorldTextInfo;
    pub use crate::service::{WorldTextApi, WorldTextService};
}
