/// Input event types the backdrop understands.
/// Pointer coordinates are already normalized to [0, 1] by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse or first touch point moved to normalized viewport coordinates (x, y).
    PointerMove { x: f32, y: f32 },
    /// The viewport changed size (CSS pixels plus device-pixel-ratio).
    Resize { width: f32, height: f32, dpr: f32 },
    /// The `prefers-reduced-motion` preference changed.
    ReducedMotion { enabled: bool },
}

/// A queue of input events.
/// Host listeners push events; the backdrop drains them at the start of each tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event.
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
