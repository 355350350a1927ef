//! In-memory host backend
//!
//! A headless [`TextEntityBackend`] over a slotmap. Used by the demo binary
//! and by tests; generational keys mean a destroyed entity's handle never
//! aliases a later one, which models host-side invalidation faithfully.

use slotmap::{Key, KeyData, SlotMap};

use super::{EntityHandle, HostError, TextEntityBackend};
use crate::geometry::{Angles, Vec3};
use crate::line::{Color, TextLine};

slotmap::new_key_type! {
    /// Slot key for a spawned text entity
    pub struct TextEntityKey;
}

/// A text entity as realized by the in-memory host
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedText {
    /// World position the entity was created at
    pub origin: Vec3,
    /// World rotation the entity was created at
    pub rotation: Angles,
    /// Current displayed string
    pub text: String,
    /// Current render color
    pub color: Color,
    /// Current font size
    pub font_size: u32,
}

/// Headless host keeping entities in a slotmap
#[derive(Debug, Default)]
pub struct MemoryTextBackend {
    entities: SlotMap<TextEntityKey, SpawnedText>,
}

impl MemoryTextBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    fn key(handle: EntityHandle) -> TextEntityKey {
        TextEntityKey::from(KeyData::from_ffi(handle.raw()))
    }

    /// Look up a live entity by handle
    pub fn get(&self, handle: EntityHandle) -> Option<&SpawnedText> {
        self.entities.get(Self::key(handle))
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entities are live
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Destroy every entity, invalidating all outstanding handles
    ///
    /// Simulates a host-side teardown such as a round reset.
    pub fn destroy_all(&mut self) {
        self.entities.clear();
    }
}

impl TextEntityBackend for MemoryTextBackend {
    fn create_text(
        &mut self,
        origin: Vec3,
        rotation: Angles,
        line: &TextLine,
    ) -> Result<EntityHandle, HostError> {
        let key = self.entities.insert(SpawnedText {
            origin,
            rotation,
            text: line.text.clone(),
            color: line.color,
            font_size: line.font_size,
        });
        Ok(EntityHandle::new(key.data().as_ffi()))
    }

    fn destroy(&mut self, handle: EntityHandle) {
        self.entities.remove(Self::key(handle));
    }

    fn set_text(&mut self, handle: EntityHandle, text: &str) -> bool {
        match self.entities.get_mut(Self::key(handle)) {
            Some(entity) => {
                entity.text = text.to_owned();
                true
            }
            None => false,
        }
    }

    fn set_color(&mut self, handle: EntityHandle, color: Color) -> bool {
        match self.entities.get_mut(Self::key(handle)) {
            Some(entity) => {
                entity.color = color;
                true
            }
            None => false,
        }
    }

    fn set_font_size(&mut self, handle: EntityHandle, font_size: u32) -> bool {
        match self.entities.get_mut(Self::key(handle)) {
            Some(entity) => {
                entity.font_size = font_size;
                true
            }
            None => false,
        }
    }

    fn is_valid(&self, handle: EntityHandle) -> bool {
        self.entities.contains_key(Self::key(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_line() -> TextLine {
        TextLine::new("sample", Color::WHITE, 20)
    }

    #[test]
    fn test_create_and_get() {
        let mut backend = MemoryTextBackend::new();
        let handle = backend
            .create_text(Vec3::new(1.0, 2.0, 3.0), Angles::ZERO, &sample_line())
            .unwrap();
        let entity = backend.get(handle).unwrap();
        assert_eq!(entity.text, "sample");
        assert_eq!(entity.origin, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_stale_handle_after_destroy() {
        let mut backend = MemoryTextBackend::new();
        let handle = backend
            .create_text(Vec3::zeros(), Angles::ZERO, &sample_line())
            .unwrap();
        backend.destroy(handle);
        assert!(!backend.is_valid(handle));
        assert!(!backend.set_text(handle, "gone"));
        // Destroying again is a no-op.
        backend.destroy(handle);
    }

    #[test]
    fn test_handle_does_not_alias_after_reuse() {
        let mut backend = MemoryTextBackend::new();
        let first = backend
            .create_text(Vec3::zeros(), Angles::ZERO, &sample_line())
            .unwrap();
        backend.destroy(first);
        let second = backend
            .create_text(Vec3::zeros(), Angles::ZERO, &sample_line())
            .unwrap();
        assert_ne!(first, second);
        assert!(!backend.is_valid(first));
        assert!(backend.is_valid(second));
    }
}
