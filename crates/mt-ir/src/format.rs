//! Module format tags.

/// The 4-byte signature stored at offset 1080 of a MOD file.
///
/// Unrecognized signatures are kept verbatim and played as 4-channel modules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatTag {
    /// `M.K.` (ProTracker)
    MK,
    /// `FLT4` (StarTrekker)
    Flt4,
    /// `4CHN`
    FourChn,
    /// `6CHN` (FastTracker)
    SixChn,
    /// `8CHN` (FastTracker)
    EightChn,
    /// Anything else, including legacy files with no signature
    Unknown([u8; 4]),
}

impl FormatTag {
    /// Classify a signature.
    pub fn from_bytes(sig: [u8; 4]) -> Self {
        match &sig {
            b"M.K." => FormatTag::MK,
            b"FLT4" => FormatTag::Flt4,
            b"4CHN" => FormatTag::FourChn,
            b"6CHN" => FormatTag::SixChn,
            b"8CHN" => FormatTag::EightChn,
            _ => FormatTag::Unknown(sig),
        }
    }

    /// Number of channels implied by the tag.
    pub const fn channel_count(self) -> u8 {
        match self {
            FormatTag::SixChn => 6,
            FormatTag::EightChn => 8,
            _ => 4,
        }
    }

    /// Human-readable tracker family.
    pub const fn label(self) -> &'static str {
        match self {
            FormatTag::MK | FormatTag::Flt4 | FormatTag::FourChn => "ProTracker",
            FormatTag::SixChn | FormatTag::EightChn => "FastTracker",
            FormatTag::Unknown(_) => "MOD",
        }
    }

    /// The raw signature bytes.
    pub const fn bytes(self) -> [u8; 4] {
        match self {
            FormatTag::MK => *b"M.K.",
            FormatTag::Flt4 => *b"FLT4",
            FormatTag::FourChn => *b"4CHN",
            FormatTag::SixChn => *b"6CHN",
            FormatTag::EightChn => *b"8CHN",
            FormatTag::Unknown(sig) => sig,
        }
    }

    pub fn is_recognized(self) -> bool {
        !matches!(self, FormatTag::Unknown(_))
    }
}
