//! 16-bit stereo WAV encoding.

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use mt_engine::Frame;

fn spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Encode frames into any seekable writer.
pub fn write_wav<W: Write + Seek>(
    writer: W,
    frames: &[Frame],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let mut wav = hound::WavWriter::new(writer, spec(sample_rate))?;
    write_frames(&mut wav, frames)?;
    wav.finalize()
}

/// Encode frames into an in-memory WAV file.
pub fn frames_to_wav(frames: &[Frame], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let mut cursor = Cursor::new(Vec::new());
    write_wav(&mut cursor, frames, sample_rate)?;
    Ok(cursor.into_inner())
}

/// Encode frames into a WAV file at `path`.
pub fn write_wav_file(path: &Path, frames: &[Frame], sample_rate: u32) -> Result<(), hound::Error> {
    let mut wav = hound::WavWriter::create(path, spec(sample_rate))?;
    write_frames(&mut wav, frames)?;
    wav.finalize()
}

fn write_frames<W: Write + Seek>(
    wav: &mut hound::WavWriter<W>,
    frames: &[Frame],
) -> Result<(), hound::Error> {
    for frame in frames {
        wav.write_sample(frame.left)?;
        wav.write_sample(frame.right)?;
    }
    Ok(())
}
