/// Logical keys the game loop understands. The host maps physical keys
/// (arrows, space, WASD...) onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    RotateLeft,
    RotateRight,
    /// Hold to charge, release to strike.
    Charge,
    OffsetLeft,
    OffsetRight,
    OffsetUp,
    OffsetDown,
    /// Re-rack the table.
    Reset,
}

impl Key {
    pub const COUNT: usize = 8;

    fn index(self) -> usize {
        self as usize
    }
}

/// Input event types the game loop consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown { key: Key },
    KeyUp { key: Key },
    /// A custom event from the UI layer.
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// The host pushes events as they arrive; the game reads them each frame
/// and the host drains them afterwards.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

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

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Which keys are currently held, folded from key events.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeldKeys {
    held: [bool; Key::COUNT],
}

impl HeldKeys {
    /// Fold one event in. Returns the key if it was just released.
    pub fn apply(&mut self, event: &InputEvent) -> Option<Key> {
        match *event {
            InputEvent::KeyDown { key } => {
                self.held[key.index()] = true;
                None
            }
            InputEvent::KeyUp { key } => {
                let was_held = std::mem::replace(&mut self.held[key.index()], false);
                was_held.then_some(key)
            }
            InputEvent::Custom { .. } => None,
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held[key.index()]
    }

    pub fn clear(&mut self) {
        self.held = [false; Key::COUNT];
    }
}
