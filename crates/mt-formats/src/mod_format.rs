//! ProTracker-style MOD decoder (31 samples, 4/6/8 channels).

use log::{debug, warn};
use mt_ir::{
    FormatTag, Note, Pattern, Sample, Song, MAX_SONG_LENGTH, NUM_SAMPLES, ROWS_PER_PATTERN,
};

use crate::byte_reader::ByteReader;
use crate::FormatError;

/// Title + sample records + song length + pattern table + format tag.
pub const HEADER_SIZE: usize = 1084;
/// Offset of the first 30-byte sample record.
pub const SAMPLE_TABLE_OFFSET: usize = 20;
pub const SAMPLE_RECORD_SIZE: usize = 30;
pub const SONG_LENGTH_OFFSET: usize = 950;
pub const PATTERN_TABLE_OFFSET: usize = 952;
pub const FORMAT_TAG_OFFSET: usize = 1080;
/// Bytes per pattern cell.
pub const CELL_SIZE: usize = 4;

const TITLE_LEN: usize = 20;
const SAMPLE_NAME_LEN: usize = 22;

/// Size of one stored pattern, which depends on the channel count.
pub const fn pattern_stride(channels: u8) -> usize {
    ROWS_PER_PATTERN * channels as usize * CELL_SIZE
}

/// Decode a MOD buffer. `fallback_name` becomes the title when the stored
/// title is blank.
pub fn load_mod(data: &[u8], fallback_name: &str) -> Result<Song, FormatError> {
    if data.len() < HEADER_SIZE {
        return Err(FormatError::TooShort { len: data.len() });
    }
    let reader = ByteReader::new(data);

    let title = match reader.ascii(0, TITLE_LEN)? {
        t if t.is_empty() => fallback_name.to_string(),
        t => t,
    };

    let format = FormatTag::from_bytes(reader.array::<4>(FORMAT_TAG_OFFSET)?);
    if !format.is_recognized() {
        warn!(
            "unrecognized format tag {:?}, decoding as 4 channels",
            format.bytes()
        );
    }
    let channels = format.channel_count();

    let mut samples = (0..NUM_SAMPLES)
        .map(|i| parse_sample_header(&reader, SAMPLE_TABLE_OFFSET + i * SAMPLE_RECORD_SIZE))
        .collect::<Result<Vec<_>, _>>()?;

    let song_length = reader.u8(SONG_LENGTH_OFFSET)?;
    if song_length == 0 || song_length as usize > MAX_SONG_LENGTH {
        return Err(FormatError::InvalidSongLength(song_length));
    }
    let pattern_table = reader
        .bytes(PATTERN_TABLE_OFFSET, song_length as usize)?
        .to_vec();

    // Patterns beyond the highest referenced index are not stored
    let num_patterns = pattern_table.iter().max().copied().unwrap_or(0) as usize + 1;
    let stride = pattern_stride(channels);

    let patterns = (0..num_patterns)
        .map(|index| {
            let offset = HEADER_SIZE + index * stride;
            let block = reader
                .bytes(offset, stride)
                .map_err(|_| FormatError::PatternOutOfBounds {
                    pattern: index,
                    offset,
                    len: data.len(),
                })?;
            Ok(parse_pattern(block, channels))
        })
        .collect::<Result<Vec<_>, FormatError>>()?;

    let pcm_start = HEADER_SIZE + num_patterns * stride;
    load_sample_data(&reader, pcm_start, &mut samples)?;

    debug!(
        "decoded '{}' ({}): {} channels, {} positions, {} patterns",
        title,
        format.label(),
        channels,
        pattern_table.len(),
        patterns.len()
    );

    Ok(Song {
        title,
        format,
        pattern_table,
        patterns,
        samples,
    })
}

/// Read one 30-byte sample record.
fn parse_sample_header(reader: &ByteReader<'_>, offset: usize) -> Result<Sample, FormatError> {
    let name = reader.ascii(offset, SAMPLE_NAME_LEN)?;
    let mut sample = Sample::new(&name);
    sample.length = reader.u16_be(offset + 22)? as u32 * 2;
    sample.finetune = reader.u8(offset + 24)? & 0x0F;
    sample.volume = reader.u8(offset + 25)?.min(64);
    sample.loop_start = reader.u16_be(offset + 26)? as u32 * 2;
    sample.loop_length = reader.u16_be(offset + 28)? as u32 * 2;
    Ok(sample)
}

/// Fill in PCM for every non-empty sample, in declaration order.
fn load_sample_data(
    reader: &ByteReader<'_>,
    start: usize,
    samples: &mut [Sample],
) -> Result<(), FormatError> {
    let mut offset = start;
    for (index, sample) in samples.iter_mut().enumerate() {
        let len = sample.length as usize;
        if len == 0 {
            continue;
        }
        if offset >= reader.len() {
            return Err(FormatError::SampleOutOfBounds {
                sample: index + 1,
                offset,
                len: reader.len(),
            });
        }

        let available = reader.tail(offset);
        let bytes = &available[..len.min(available.len())];
        let mut pcm = Sample::decode_pcm(bytes);
        if pcm.len() < len {
            warn!(
                "sample {} truncated: {} of {} bytes present, padding with silence",
                index + 1,
                pcm.len(),
                len
            );
            pcm.resize(len, 0.0);
        }
        sample.data = pcm;
        offset += len;
    }
    Ok(())
}

/// Decode one pattern block of `64 × channels` cells.
fn parse_pattern(block: &[u8], channels: u8) -> Pattern {
    let notes = block
        .chunks_exact(CELL_SIZE)
        .map(|c| parse_cell([c[0], c[1], c[2], c[3]]))
        .collect();
    Pattern::from_notes(channels, notes).unwrap_or_else(|| Pattern::new(channels))
}

/// Unpack a 4-byte cell.
///
/// ```text
/// byte 0: sample hi nibble | period bits 8-11
/// byte 1: period bits 0-7
/// byte 2: sample lo nibble | effect command
/// byte 3: effect parameter
/// ```
pub fn parse_cell(bytes: [u8; 4]) -> Note {
    Note {
        sample: (bytes[0] & 0xF0) | (bytes[2] >> 4),
        period: ((bytes[0] & 0x0F) as u16) << 8 | bytes[1] as u16,
        command: bytes[2] & 0x0F,
        param: bytes[3],
    }
}

/// Inverse of [`parse_cell`].
pub fn encode_cell(note: &Note) -> [u8; 4] {
    [
        (note.sample & 0xF0) | ((note.period >> 8) as u8 & 0x0F),
        note.period as u8,
        (note.sample << 4) | (note.command & 0x0F),
        note.param,
    ]
}
