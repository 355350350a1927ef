//! # Host Engine Abstraction
//!
//! Narrow interfaces over the game host that owns the actual entities.
//! The registry and text objects only ever touch the host through
//! [`TextEntityBackend`] and [`ActorState`], so the core stays independent
//! of any particular engine binding.
//!
//! Handles are owned by the host: an entity can disappear underneath us
//! (round reset, external kill), so every field update reports whether the
//! handle was still live and callers treat a stale handle as a skip, not an
//! error.

use thiserror::Error;

use crate::geometry::{Angles, Vec3};
use crate::line::{Color, TextLine};

pub mod memory;

pub use memory::MemoryTextBackend;

/// Opaque reference to a host-owned text entity
///
/// Invalidated when the host destroys the entity; holders must tolerate
/// staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle(u64);

impl EntityHandle {
    /// Wrap a raw host key
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw host key backing this handle
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Host-side entity creation failure
#[derive(Debug, Error)]
#[error("host failed to create text entity: {0}")]
pub struct HostError(pub String);

/// Interface to the host's text entity primitives
///
/// One method per host capability the core consumes: create, destroy, and
/// per-field update. Update methods return `false` when the handle no
/// longer refers to a live entity.
pub trait TextEntityBackend {
    /// Create a text entity at the given pose
    ///
    /// # Errors
    /// Returns [`HostError`] when the host cannot realize the entity.
    fn create_text(
        &mut self,
        origin: Vec3,
        rotation: Angles,
        line: &TextLine,
    ) -> Result<EntityHandle, HostError>;

    /// Destroy an entity; a stale handle is a no-op
    fn destroy(&mut self, handle: EntityHandle);

    /// Replace the displayed string, returning `false` if the handle is stale
    fn set_text(&mut self, handle: EntityHandle, text: &str) -> bool;

    /// Replace the render color, returning `false` if the handle is stale
    fn set_color(&mut self, handle: EntityHandle, color: Color) -> bool;

    /// Replace the font size, returning `false` if the handle is stale
    fn set_font_size(&mut self, handle: EntityHandle, font_size: u32) -> bool;

    /// Whether the handle still refers to a live entity
    fn is_valid(&self, handle: EntityHandle) -> bool;
}

/// Introspection of the reference actor a command-driven spawn is anchored to
pub trait ActorState {
    /// Feet position in world space
    fn origin(&self) -> Vec3;

    /// Facing rotation
    fn rotation(&self) -> Angles;

    /// Vertical offset from the feet to the eyes
    fn eye_offset_z(&self) -> f32;

    /// Whether the actor is currently alive
    fn is_alive(&self) -> bool;
}
