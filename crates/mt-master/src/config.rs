//! Player configuration.

/// Output and mixing settings shared by real-time and offline rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    /// Offline render rate. Real-time output uses the device rate.
    pub sample_rate: u32,
    /// Frames rendered per lock of the session
    pub block_frames: usize,
    /// Ring buffer length between the render thread and the device
    pub buffer_ms: u32,
    /// Output gain, 0.0 to 1.0
    pub master_volume: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            block_frames: 256,
            buffer_ms: 100,
            master_volume: 0.7,
        }
    }
}
