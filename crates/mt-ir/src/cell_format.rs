//! Text rendering of pattern cells for pattern viewers.

use alloc::format;
use alloc::string::{String, ToString};

use crate::pattern::Note;
use crate::period::nearest_note_name;

/// `"C-2 01 C40"`: note name, sample number, effect.
pub fn format_cell(note: &Note) -> String {
    format!(
        "{} {} {}",
        nearest_note_name(note.period),
        format_sample_number(note.sample),
        format_effect(note),
    )
}

pub fn format_sample_number(sample: u8) -> String {
    if sample > 0 {
        format!("{:02}", sample)
    } else {
        "--".to_string()
    }
}

pub fn format_effect(note: &Note) -> String {
    if note.command == 0 && note.param == 0 {
        "---".to_string()
    } else {
        format!("{:X}{:02X}", note.command, note.param)
    }
}

/// `"<position>:<row>"` with a two-digit row.
pub fn format_position(position: usize, row: usize) -> String {
    format!("{}:{:02}", position, row)
}
