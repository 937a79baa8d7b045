//! CPAL output: a ring buffer of frames drained by the device callback.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use mt_engine::Frame;
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::traits::{AudioError, AudioOutput};

/// Smallest ring the device callback is given, in frames.
const MIN_RING_FRAMES: usize = 64;

/// Output on the default device.
///
/// The render thread pushes frames into a lock-free ring; the device
/// callback pops one frame per device frame. When the ring runs dry the
/// callback plays silence for the missing frames and counts them as
/// underruns rather than blocking.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    producer: HeapProd<Frame>,
    running: Arc<AtomicBool>,
    underruns: Arc<AtomicU64>,
}

/// Ring size for `buffer_ms` of audio at `sample_rate`. Requests under
/// 10 ms are raised to 10 ms.
pub fn ring_capacity(sample_rate: u32, buffer_ms: u32) -> usize {
    (sample_rate as usize * buffer_ms.max(10) as usize / 1000).max(MIN_RING_FRAMES)
}

/// Write frames from `next` into an interleaved device buffer of
/// `channels` channels. Left and right go to the first two channels and
/// any further channels are zeroed. Returns the number of device frames
/// that `next` could not supply; those are written as silence.
pub fn fill_interleaved(
    data: &mut [f32],
    channels: usize,
    mut next: impl FnMut() -> Option<Frame>,
) -> usize {
    let mut missing = 0;
    for chunk in data.chunks_mut(channels.max(1)) {
        let frame = next().unwrap_or_else(|| {
            missing += 1;
            Frame::silence()
        });
        let left = frame.left as f32 / 32768.0;
        let right = frame.right as f32 / 32768.0;
        for (i, sample) in chunk.iter_mut().enumerate() {
            *sample = match i {
                0 => left,
                1 => right,
                _ => 0.0,
            };
        }
    }
    missing
}

impl CpalOutput {
    /// Open the default output device with a ring buffer holding
    /// `buffer_ms` milliseconds of audio.
    pub fn new(buffer_ms: u32) -> Result<(Self, HeapCons<Frame>), AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;
        let mut config: StreamConfig = supported.into();
        config.channels = 2;

        let capacity = ring_capacity(config.sample_rate.0, buffer_ms);
        let (producer, consumer) = HeapRb::<Frame>::new(capacity).split();
        log::debug!(
            "audio device '{}' at {} Hz, {} frame ring",
            device.name().unwrap_or_default(),
            config.sample_rate.0,
            capacity
        );

        let output = Self {
            device,
            config,
            stream: None,
            producer,
            running: Arc::new(AtomicBool::new(false)),
            underruns: Arc::new(AtomicU64::new(0)),
        };
        Ok((output, consumer))
    }

    /// Build the device stream that drains `consumer`.
    pub fn build_stream(&mut self, mut consumer: HeapCons<Frame>) -> Result<(), AudioError> {
        let running = Arc::clone(&self.running);
        let underruns = Arc::clone(&self.underruns);
        let channels = self.config.channels as usize;

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !running.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }
                    let missing = fill_interleaved(data, channels, || consumer.try_pop());
                    if missing > 0 {
                        underruns.fetch_add(missing as u64, Ordering::Relaxed);
                    }
                },
                |err| log::error!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Device frames played as silence because the ring was empty.
    pub fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }

    /// Push one frame, spinning while the ring buffer is full.
    pub fn write_spin(&mut self, frame: Frame) {
        while self.producer.try_push(frame).is_err() {
            std::hint::spin_loop();
        }
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn write(&mut self, frames: &[Frame]) {
        for &frame in frames {
            self.write_spin(frame);
        }
    }

    fn start(&mut self) -> Result<(), AudioError> {
        self.running.store(true, Ordering::Relaxed);
        if let Some(stream) = self.stream.as_ref() {
            stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        if let Some(stream) = self.stream.as_ref() {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }
}
