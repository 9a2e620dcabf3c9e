use bytemuck::{Pod, Zeroable};

/// Stable index of a ball in the session's ball list. Index 0 is the cue ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BallId(pub usize);

impl BallId {
    pub const CUE: BallId = BallId(0);
}

/// A sound event emitted by the game loop.
/// The numeric value maps to a host-defined sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

impl SoundEvent {
    pub const CUE_STRIKE: SoundEvent = SoundEvent(1);
    pub const BALL_CLICK: SoundEvent = SoundEvent(2);
    pub const CUSHION: SoundEvent = SoundEvent(3);
    pub const POCKET: SoundEvent = SoundEvent(4);
}

/// A game event for the host UI.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_event_is_four_floats() {
        assert_eq!(std::mem::size_of::<GameEvent>(), GameEvent::FLOATS * 4);
        let events = [GameEvent { kind: 1.0, a: 2.0, b: 3.0, c: 4.0 }];
        let floats: &[f32] = bytemuck::cast_slice(&events);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
    }
}
