//! # Multiline Text Object
//!
//! One logical world text rendered as vertically stacked line entities.
//! The object owns its line primitives exclusively; every host entity it
//! creates is released through [`MultilineText::dispose`] before the object
//! is discarded.

use log::{debug, warn};

use crate::geometry::{Angles, Vec3};
use crate::host::TextEntityBackend;
use crate::line::{LinePrimitive, TextLine};
use crate::placement::TextPlacement;

/// Unique id of a multiline text within the current map's lifetime
pub type TextId = u32;

/// A group of stacked line primitives sharing one placement and origin
///
/// Lifecycle: constructed, spawned exactly once, then updated or teleported
/// any number of times, and finally disposed. A disposed object ignores
/// further operations.
#[derive(Debug)]
pub struct MultilineText {
    id: TextId,
    lines: Vec<TextLine>,
    primitives: Vec<LinePrimitive>,
    placement: TextPlacement,
    save_to_config: bool,
    origin: Vec3,
    rotation: Angles,
    disposed: bool,
}

impl MultilineText {
    pub(crate) fn new(id: TextId, lines: Vec<TextLine>, save_to_config: bool) -> Self {
        Self {
            id,
            lines,
            primitives: Vec::new(),
            placement: TextPlacement::Floor,
            save_to_config,
            origin: Vec3::zeros(),
            rotation: Angles::ZERO,
            disposed: false,
        }
    }

    /// Unique id of this text
    pub fn id(&self) -> TextId {
        self.id
    }

    /// Current line contents in display order
    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Line primitives in display order; one per line once spawned
    pub fn primitives(&self) -> &[LinePrimitive] {
        &self.primitives
    }

    /// Placement mode the text was spawned with
    pub fn placement(&self) -> TextPlacement {
        self.placement
    }

    /// Whether this text is persisted to the per-map config
    pub fn save_to_config(&self) -> bool {
        self.save_to_config
    }

    /// Spawn origin; the first primitive sits exactly here
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Spawn rotation shared by every primitive
    pub fn rotation(&self) -> Angles {
        self.rotation
    }

    /// Whether the text has been disposed
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Handles of the live line entities, in display order
    pub fn entities(&self) -> Vec<crate::host::EntityHandle> {
        self.primitives
            .iter()
            .filter_map(|primitive| primitive.entity)
            .collect()
    }

    /// Realize every line as a host entity at the given pose
    ///
    /// Callable exactly once per productive lifetime; repeated or
    /// post-dispose calls are ignored.
    pub(crate) fn spawn(
        &mut self,
        backend: &mut dyn TextEntityBackend,
        origin: Vec3,
        rotation: Angles,
        placement: TextPlacement,
    ) {
        if self.disposed || !self.primitives.is_empty() {
            warn!("world text {} spawn ignored: already spawned or disposed", self.id);
            return;
        }
        self.origin = origin;
        self.rotation = rotation;
        self.placement = placement;
        self.spawn_primitives(backend);
    }

    /// Replace or re-render line contents
    ///
    /// `None` re-applies the current contents to the existing entities.
    /// A same-length replacement updates each primitive in place; a
    /// different-length replacement destroys and respawns every primitive
    /// at the stored pose so the count always matches the line count.
    pub(crate) fn update(
        &mut self,
        backend: &mut dyn TextEntityBackend,
        new_lines: Option<Vec<TextLine>>,
    ) {
        if self.disposed {
            debug!("world text {} update ignored: disposed", self.id);
            return;
        }
        match new_lines {
            None => self.apply_lines(backend),
            Some(lines) if lines.len() == self.lines.len() => {
                self.lines = lines;
                for (primitive, line) in self.primitives.iter_mut().zip(&self.lines) {
                    primitive.line = line.clone();
                }
                self.apply_lines(backend);
            }
            Some(lines) => {
                self.destroy_primitives(backend);
                self.lines = lines;
                self.spawn_primitives(backend);
            }
        }
    }

    /// Rigidly move the whole text to a new pose
    ///
    /// Destroys and respawns every primitive so the vertical stacking is
    /// recomputed from the new origin.
    pub(crate) fn teleport(
        &mut self,
        backend: &mut dyn TextEntityBackend,
        origin: Vec3,
        rotation: Angles,
    ) {
        if self.disposed {
            debug!("world text {} teleport ignored: disposed", self.id);
            return;
        }
        self.destroy_primitives(backend);
        self.origin = origin;
        self.rotation = rotation;
        self.spawn_primitives(backend);
    }

    /// Release every host entity; idempotent
    pub(crate) fn dispose(&mut self, backend: &mut dyn TextEntityBackend) {
        self.destroy_primitives(backend);
        self.disposed = true;
    }

    fn spawn_primitives(&mut self, backend: &mut dyn TextEntityBackend) {
        debug_assert!(self.primitives.is_empty());
        let mut drop = 0.0;
        for line in &self.lines {
            let origin = Vec3::new(self.origin.x, self.origin.y, self.origin.z - drop);
            let entity = match backend.create_text(origin, self.rotation, line) {
                Ok(handle) => Some(handle),
                Err(err) => {
                    warn!("world text {}: line entity creation failed: {err}", self.id);
                    None
                }
            };
            self.primitives.push(LinePrimitive {
                line: line.clone(),
                origin,
                rotation: self.rotation,
                entity,
            });
            drop += line.height();
        }
    }

    /// Push the current line contents onto the live entities, skipping stale
    /// handles.
    fn apply_lines(&mut self, backend: &mut dyn TextEntityBackend) {
        for primitive in &self.primitives {
            let Some(handle) = primitive.entity else {
                continue;
            };
            if !backend.set_text(handle, &primitive.line.text) {
                debug!("world text {}: stale line entity skipped", self.id);
                continue;
            }
            backend.set_color(handle, primitive.line.color);
            backend.set_font_size(handle, primitive.line.font_size);
        }
    }

    fn destroy_primitives(&mut self, backend: &mut dyn TextEntityBackend) {
        for primitive in &mut self.primitives {
            if let Some(handle) = primitive.entity.take() {
                backend.destroy(handle);
            }
        }
        self.primitives.clear();
    }
}
