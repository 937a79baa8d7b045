//! Amiga period table.

/// Lowest period in the standard table (B-3).
pub const PERIOD_MIN: u16 = 113;

/// Highest period in the standard table (C-1).
pub const PERIOD_MAX: u16 = 856;

/// Standard ProTracker periods for octaves 1-3, finetune 0, with note names.
pub const AMIGA_PERIODS: [(u16, &str); 36] = [
    (856, "C-1"), (808, "C#1"), (762, "D-1"), (720, "D#1"), (678, "E-1"), (640, "F-1"),
    (604, "F#1"), (570, "G-1"), (538, "G#1"), (508, "A-1"), (480, "A#1"), (453, "B-1"),
    (428, "C-2"), (404, "C#2"), (381, "D-2"), (360, "D#2"), (339, "E-2"), (320, "F-2"),
    (302, "F#2"), (285, "G-2"), (269, "G#2"), (254, "A-2"), (240, "A#2"), (226, "B-2"),
    (214, "C-3"), (202, "C#3"), (190, "D-3"), (180, "D#3"), (170, "E-3"), (160, "F-3"),
    (151, "F#3"), (143, "G-3"), (135, "G#3"), (127, "A-3"), (120, "A#3"), (113, "B-3"),
];

/// Name of the table note closest to `period`. Period 0 is `---`.
///
/// Ties resolve to the higher-pitched (shorter) period.
pub fn nearest_note_name(period: u16) -> &'static str {
    if period == 0 {
        return "---";
    }
    let mut best = "---";
    let mut best_diff = u32::MAX;
    for &(p, name) in AMIGA_PERIODS.iter().rev() {
        let diff = (period as i32 - p as i32).unsigned_abs();
        if diff < best_diff {
            best_diff = diff;
            best = name;
        }
    }
    best
}
