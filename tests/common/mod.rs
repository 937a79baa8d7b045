//! Synthetic MOD modules for integration tests.

#![allow(dead_code)]

use mt_formats::{
    encode_cell, pattern_stride, CELL_SIZE, FORMAT_TAG_OFFSET, HEADER_SIZE, PATTERN_TABLE_OFFSET,
    SAMPLE_RECORD_SIZE, SAMPLE_TABLE_OFFSET, SONG_LENGTH_OFFSET,
};
use mt_ir::{FormatTag, Note};

/// Builds a module byte buffer one cell and sample at a time.
pub struct ModuleBuilder {
    title: String,
    tag: [u8; 4],
    table: Vec<u8>,
    cells: Vec<(usize, usize, usize, Note)>,
    samples: Vec<(String, Vec<u8>, u8, u16, u16)>,
}

impl ModuleBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            tag: *b"M.K.",
            table: vec![0],
            cells: Vec::new(),
            samples: Vec::new(),
        }
    }

    pub fn tag(mut self, tag: &[u8; 4]) -> Self {
        self.tag = *tag;
        self
    }

    pub fn table(mut self, table: &[u8]) -> Self {
        self.table = table.to_vec();
        self
    }

    pub fn cell(mut self, pattern: usize, row: usize, channel: usize, note: Note) -> Self {
        self.cells.push((pattern, row, channel, note));
        self
    }

    /// Append a sample whose PCM is a square wave of `len` bytes.
    pub fn square_sample(mut self, name: &str, len: u16, volume: u8, looped: bool) -> Self {
        let pcm = (0..len).map(|i| if i % 16 < 8 { 0x60 } else { 0xA0 }).collect();
        let loop_len = if looped { len } else { 0 };
        self.samples.push((name.to_string(), pcm, volume, 0, loop_len));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let channels = FormatTag::from_bytes(self.tag).channel_count();
        let mut data = vec![0u8; HEADER_SIZE];
        data[..self.title.len()].copy_from_slice(self.title.as_bytes());

        for (i, (name, pcm, volume, loop_start, loop_len)) in self.samples.iter().enumerate() {
            let rec = SAMPLE_TABLE_OFFSET + i * SAMPLE_RECORD_SIZE;
            data[rec..rec + name.len()].copy_from_slice(name.as_bytes());
            data[rec + 22..rec + 24].copy_from_slice(&(pcm.len() as u16 / 2).to_be_bytes());
            data[rec + 25] = *volume;
            data[rec + 26..rec + 28].copy_from_slice(&(loop_start / 2).to_be_bytes());
            data[rec + 28..rec + 30].copy_from_slice(&(loop_len / 2).to_be_bytes());
        }

        data[SONG_LENGTH_OFFSET] = self.table.len() as u8;
        data[PATTERN_TABLE_OFFSET..PATTERN_TABLE_OFFSET + self.table.len()]
            .copy_from_slice(&self.table);
        data[FORMAT_TAG_OFFSET..HEADER_SIZE].copy_from_slice(&self.tag);

        let stride = pattern_stride(channels);
        let patterns = self.table.iter().copied().max().unwrap_or(0) as usize + 1;
        data.resize(HEADER_SIZE + patterns * stride, 0);
        for &(pattern, row, channel, note) in &self.cells {
            let at = HEADER_SIZE + pattern * stride + (row * channels as usize + channel) * CELL_SIZE;
            data[at..at + CELL_SIZE].copy_from_slice(&encode_cell(&note));
        }

        for (_, pcm, _, _, _) in &self.samples {
            data.extend_from_slice(pcm);
        }
        data
    }
}

pub fn note(sample: u8, period: u16) -> Note {
    Note { sample, period, command: 0, param: 0 }
}

pub fn effect(command: u8, param: u8) -> Note {
    Note { sample: 0, period: 0, command, param }
}

/// Two positions, a looped lead on channel 0 and a one-shot on channel 1,
/// a tempo change and a pattern break.
pub fn demo_module() -> Vec<u8> {
    ModuleBuilder::new("demo tune")
        .table(&[0, 1])
        .square_sample("lead", 64, 64, true)
        .square_sample("", 256, 40, false)
        .cell(0, 0, 0, note(1, 428))
        .cell(0, 0, 1, note(2, 214))
        .cell(0, 4, 2, effect(0xF, 0x03))
        .cell(0, 8, 3, effect(0xD, 0x00))
        .cell(1, 0, 0, note(1, 320))
        .cell(1, 0, 3, effect(0xF, 150))
        .build()
}
