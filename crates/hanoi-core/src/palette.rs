#![forbid(unsafe_code)]

//! Disc palette.

use std::fmt;

/// Named disc colours, in palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Orange,
    Gold,
    SpringGreen,
    SkyBlue,
    Magenta,
    LightGray,
    Brown,
    Purple,
    White,
}

/// Fixed palette; disc `rank` uses `PALETTE[rank % PALETTE.len()]`.
pub const PALETTE: [Color; 10] = [
    Color::Red,
    Color::Orange,
    Color::Gold,
    Color::SpringGreen,
    Color::SkyBlue,
    Color::Magenta,
    Color::LightGray,
    Color::Brown,
    Color::Purple,
    Color::White,
];

impl Color {
    /// Palette entry for a disc rank.
    #[must_use]
    pub const fn for_rank(rank: u32) -> Self {
        PALETTE[rank as usize % PALETTE.len()]
    }

    /// CSS colour keyword.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Gold => "gold",
            Self::SpringGreen => "springGreen",
            Self::SkyBlue => "skyBlue",
            Self::Magenta => "magenta",
            Self::LightGray => "lightGray",
            Self::Brown => "brown",
            Self::Purple => "purple",
            Self::White => "white",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
