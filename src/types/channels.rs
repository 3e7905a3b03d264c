// Copyright (c) 2024 Mike Tsao

//! Output channel layouts and the speaker-position bitmask that describes them
//! in a WAVE_FORMAT_EXTENSIBLE header.

use core::ops::BitOr;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter, FromRepr, IntoStaticStr};

/// A bitset of speaker positions, one bit per channel present in the stream.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ChannelMask(pub u32);
#[allow(missing_docs)]
impl ChannelMask {
    pub const FRONT_LEFT: Self = Self(0x1);
    pub const FRONT_RIGHT: Self = Self(0x2);
    pub const FRONT_CENTER: Self = Self(0x4);
    pub const LOW_FREQUENCY: Self = Self(0x8);
    pub const BACK_LEFT: Self = Self(0x10);
    pub const BACK_RIGHT: Self = Self(0x20);
    pub const SIDE_LEFT: Self = Self(0x200);
    pub const SIDE_RIGHT: Self = Self(0x400);

    /// The number of speaker positions set.
    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Whether every position in `other` is also set here.
    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}
impl BitOr for ChannelMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// The supported arrangements of stimulation channels.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumCount,
    EnumIter,
    Eq,
    FromRepr,
    IntoStaticStr,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[repr(usize)]
pub enum ChannelLayout {
    /// Front left/right plus back (or side) left/right. All four carry
    /// stimulation.
    #[default]
    Quad = 4,
    /// Front left/right, center, LFE, then back (or side) left/right. Center
    /// and LFE stay silent.
    FivePointOne = 6,
}
impl ChannelLayout {
    /// Index of the center channel in the 5.1 layout.
    pub const CENTER_INDEX: usize = 2;
    /// Index of the low-frequency channel in the 5.1 layout.
    pub const LFE_INDEX: usize = 3;

    /// Maps a channel count onto a layout, if one exists.
    pub fn from_channel_count(channel_count: usize) -> Option<Self> {
        Self::from_repr(channel_count)
    }

    /// The number of interleaved channels.
    pub fn channel_count(&self) -> usize {
        *self as usize
    }

    /// Whether a channel never carries stimulation.
    pub fn is_silent_channel(&self, channel: usize) -> bool {
        matches!(self, Self::FivePointOne)
            && (channel == Self::CENTER_INDEX || channel == Self::LFE_INDEX)
    }

    /// The speaker mask for this layout. `use_side_channels` only changes the
    /// declared positions of the rear pair; the audio they carry is the same.
    pub fn channel_mask(&self, use_side_channels: bool) -> ChannelMask {
        let rear = if use_side_channels {
            ChannelMask::SIDE_LEFT | ChannelMask::SIDE_RIGHT
        } else {
            ChannelMask::BACK_LEFT | ChannelMask::BACK_RIGHT
        };
        let mask = ChannelMask::FRONT_LEFT | ChannelMask::FRONT_RIGHT | rear;
        match self {
            Self::Quad => mask,
            Self::FivePointOne => mask | ChannelMask::FRONT_CENTER | ChannelMask::LOW_FREQUENCY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn layouts_from_channel_counts() {
        assert_eq!(
            ChannelLayout::from_channel_count(4),
            Some(ChannelLayout::Quad)
        );
        assert_eq!(
            ChannelLayout::from_channel_count(6),
            Some(ChannelLayout::FivePointOne)
        );
        assert_eq!(ChannelLayout::from_channel_count(2), None);
        assert_eq!(ChannelLayout::from_channel_count(5), None);
    }

    #[test]
    fn masks_match_channel_counts() {
        for layout in ChannelLayout::iter() {
            for side in [false, true] {
                assert_eq!(
                    layout.channel_mask(side).count() as usize,
                    layout.channel_count()
                );
            }
        }
        assert_eq!(ChannelLayout::Quad.channel_mask(false), ChannelMask(0x33));
        assert_eq!(ChannelLayout::Quad.channel_mask(true), ChannelMask(0x603));
        assert_eq!(
            ChannelLayout::FivePointOne.channel_mask(false),
            ChannelMask(0x3f)
        );
        assert!(ChannelLayout::FivePointOne
            .channel_mask(true)
            .contains(ChannelMask::SIDE_LEFT | ChannelMask::LOW_FREQUENCY));
    }

    #[test]
    fn only_center_and_lfe_are_silent() {
        let silent: Vec<_> = (0..6)
            .filter(|c| ChannelLayout::FivePointOne.is_silent_channel(*c))
            .collect();
        assert_eq!(silent, vec![2, 3]);
        assert!((0..4).all(|c| !ChannelLayout::Quad.is_silent_channel(c)));
    }
}
