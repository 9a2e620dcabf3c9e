use bytemuck::{Pod, Zeroable};

/// Per-ball render data. 12 floats = 48 bytes stride.
///
/// Pocketed balls are still written (so slot `i` is always ball `i`) with
/// `visible = 0.0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub radius: f32,
    /// Orientation quaternion (x, y, z, w).
    pub rotation: [f32; 4],
    /// Ball number (0 = cue ball).
    pub number: f32,
    /// 1.0 for striped balls.
    pub striped: f32,
    /// 0.0 once pocketed.
    pub visible: f32,
    pub _pad: f32,
}

impl BallInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Cue stick and aim line. 12 floats = 48 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CueInstance {
    /// Butt end of the stick.
    pub start: [f32; 3],
    pub radius: f32,
    /// Tip of the stick.
    pub end: [f32; 3],
    /// Charge in [0, 1].
    pub power: f32,
    /// Predicted first contact along the aim ray.
    pub impact: [f32; 3],
    /// 0.0 while balls are moving.
    pub visible: f32,
}

impl CueInstance {
    pub const FLOATS: usize = 12;
}

/// Everything the renderer reads after a frame.
pub struct InstanceBuffer {
    pub balls: Vec<BallInstance>,
    pub cue: CueInstance,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    pub fn with_capacity(balls: usize) -> Self {
        Self {
            balls: Vec::with_capacity(balls),
            cue: CueInstance::default(),
        }
    }

    pub fn clear(&mut self) {
        self.balls.clear();
        self.cue = CueInstance::default();
    }

    pub fn push(&mut self, instance: BallInstance) {
        self.balls.push(instance);
    }

    pub fn ball_count(&self) -> u32 {
        self.balls.len() as u32
    }

    /// Ball instances as a flat float slice.
    pub fn ball_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.balls)
    }
}

impl Default for InstanceBuffer {
    fn default() -> Self {
        Self::new()
    }
}
