//! Effect commands interpreted by the sequencer.

/// A pattern effect, decoded from its 4-bit command and 8-bit parameter.
///
/// Only the historically common subset has its own variant; every other
/// command lands in [`Effect::Unsupported`] and plays as a no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Effect {
    /// Command 0 with parameter 0
    #[default]
    None,
    /// `Axy` volume slide (recognized, not implemented)
    VolumeSlide(u8),
    /// `Bxx` jump to pattern-table position
    PositionJump(u8),
    /// `Cxx` set channel volume (values above 64 are ignored)
    SetVolume(u8),
    /// `Dxx` break to row 0 of the next position
    PatternBreak(u8),
    /// `Fxx` with xx <= 0x1F: ticks per row
    SetSpeed(u8),
    /// `Fxx` with xx > 0x1F: tempo in BPM
    SetTempo(u8),
    /// Any other command
    Unsupported { command: u8, param: u8 },
}

impl Effect {
    /// Decode a command nibble and parameter byte.
    pub fn parse(command: u8, param: u8) -> Self {
        match command & 0x0F {
            0x0 if param == 0 => Effect::None,
            0xA => Effect::VolumeSlide(param),
            0xB => Effect::PositionJump(param),
            0xC => Effect::SetVolume(param),
            0xD => Effect::PatternBreak(param),
            0xF if param <= 0x1F => Effect::SetSpeed(param),
            0xF => Effect::SetTempo(param),
            command => Effect::Unsupported { command, param },
        }
    }

    /// The command nibble this effect was decoded from.
    pub fn command(&self) -> u8 {
        match self {
            Effect::None => 0x0,
            Effect::VolumeSlide(_) => 0xA,
            Effect::PositionJump(_) => 0xB,
            Effect::SetVolume(_) => 0xC,
            Effect::PatternBreak(_) => 0xD,
            Effect::SetSpeed(_) | Effect::SetTempo(_) => 0xF,
            Effect::Unsupported { command, .. } => *command,
        }
    }

    /// The parameter byte this effect was decoded from.
    pub fn param(&self) -> u8 {
        match self {
            Effect::None => 0,
            Effect::VolumeSlide(p)
            | Effect::PositionJump(p)
            | Effect::SetVolume(p)
            | Effect::PatternBreak(p)
            | Effect::SetSpeed(p)
            | Effect::SetTempo(p) => *p,
            Effect::Unsupported { param, .. } => *param,
        }
    }

    /// Returns true if this effect moves the song position.
    pub fn alters_position(&self) -> bool {
        matches!(self, Effect::PositionJump(_) | Effect::PatternBreak(_))
    }
}
