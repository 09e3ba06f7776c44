//! Filter configuration: masks, ranges, channel remap and transpose tables.
//!
//! Settings are immutable for the duration of one filter call and carry no
//! interior mutability, so a single instance can be shared read-only across
//! concurrent filters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::event::{ChannelMask, EventTypeMask};

/// Inclusive range over 7-bit values, validated at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SevenBitRange {
    lower: u8,
    higher: u8,
}

impl SevenBitRange {
    pub const FULL: Self = Self {
        lower: 0,
        higher: 127,
    };

    pub fn new(lower: u8, higher: u8) -> Result<Self> {
        if lower > 127 {
            return Err(Error::ValueOutOfRange(lower));
        }
        if higher > 127 {
            return Err(Error::ValueOutOfRange(higher));
        }
        if lower > higher {
            return Err(Error::InvalidRange { lower, higher });
        }
        Ok(Self { lower, higher })
    }

    #[inline]
    pub fn lower(self) -> u8 {
        self.lower
    }

    #[inline]
    pub fn higher(self) -> u8 {
        self.higher
    }

    #[inline]
    pub fn contains(self, value: u8) -> bool {
        value >= self.lower && value <= self.higher
    }
}

impl Default for SevenBitRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Redirects each channel to the channel stored at its index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMap([u8; 16]);

impl ChannelMap {
    pub fn new(map: [u8; 16]) -> Result<Self> {
        for &target in &map {
            if target > 15 {
                return Err(Error::InvalidChannel(target));
            }
        }
        Ok(Self(map))
    }

    pub fn identity() -> Self {
        Self([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15])
    }

    #[inline]
    pub fn get(&self, channel: u8) -> u8 {
        self.0[(channel & 0x0F) as usize]
    }
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self::identity()
    }
}

/// Per-channel transposition in semitones, added to the global transpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTranspose([i16; 16]);

impl ChannelTranspose {
    pub fn new(transpose: [i16; 16]) -> Self {
        Self(transpose)
    }

    pub fn zero() -> Self {
        Self([0; 16])
    }

    #[inline]
    pub fn get(&self, channel: u8) -> i16 {
        self.0[(channel & 0x0F) as usize]
    }
}

impl Default for ChannelTranspose {
    fn default() -> Self {
        Self::zero()
    }
}

/// Full configuration of one filter pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Channels let through.
    pub channels: ChannelMask,
    /// Event categories let through.
    pub event_types: EventTypeMask,
    /// Note-ons outside this range are dropped (checked before transpose).
    pub note_range: SevenBitRange,
    /// Note-ons outside this velocity range are dropped.
    pub velocity_range: SevenBitRange,
    /// Output channel for each input channel.
    pub channel_map: ChannelMap,
    pub channel_transpose: ChannelTranspose,
    pub global_transpose: i16,
    /// Resolve bank select from the LSB only, ignoring the MSB half.
    pub limit_banks_to_127: bool,
    pub track_activated_channels: bool,
    pub track_note_span: bool,
}

impl FilterSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the settings neither drop, rewrite, nor observe anything:
    /// the output stream is then byte-identical to the input.
    pub fn is_pass_through(&self) -> bool {
        self.channels == ChannelMask::ALL
            && self.event_types == EventTypeMask::ALL
            && self.note_range == SevenBitRange::FULL
            && self.velocity_range == SevenBitRange::FULL
            && self.channel_map == ChannelMap::identity()
            && self.channel_transpose == ChannelTranspose::zero()
            && self.global_transpose == 0
            && !(self.track_activated_channels || self.track_note_span)
    }

    /// Transposed and clamped note number. The note-range filter applies to
    /// the original value, not this one.
    #[inline]
    pub(crate) fn transposed_note(&self, channel: u8, note: u8) -> u8 {
        let shifted = note as i32
            + self.global_transpose as i32
            + self.channel_transpose.get(channel) as i32;
        shifted.clamp(0, 127) as u8
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            channels: ChannelMask::ALL,
            event_types: EventTypeMask::ALL,
            note_range: SevenBitRange::FULL,
            velocity_range: SevenBitRange::FULL,
            channel_map: ChannelMap::identity(),
            channel_transpose: ChannelTranspose::zero(),
            global_transpose: 0,
            limit_banks_to_127: true,
            track_activated_channels: true,
            track_note_span: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_validation() {
        assert!(SevenBitRange::new(0, 127).is_ok());
        assert!(SevenBitRange::new(60, 60).is_ok());
        assert_eq!(
            SevenBitRange::new(64, 32),
            Err(Error::InvalidRange {
                lower: 64,
                higher: 32
            })
        );
        assert_eq!(
            SevenBitRange::new(5, 200),
            Err(Error::ValueOutOfRange(200))
        );
        assert_eq!(
            SevenBitRange::new(130, 140),
            Err(Error::ValueOutOfRange(130))
        );
    }

    #[test]
    fn test_range_contains() {
        let range = SevenBitRange::new(10, 20).unwrap();
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(9));
        assert!(!range.contains(21));
    }

    #[test]
    fn test_channel_map_validation() {
        assert!(ChannelMap::new([0; 16]).is_ok());
        let mut map = [0u8; 16];
        map[4] = 16;
        assert_eq!(ChannelMap::new(map), Err(Error::InvalidChannel(16)));
    }

    #[test]
    fn test_pass_through_detection() {
        // Tracking flags are on by default, so defaults are not pass-through.
        let mut settings = FilterSettings::default();
        assert!(!settings.is_pass_through());

        settings.track_activated_channels = false;
        settings.track_note_span = false;
        assert!(settings.is_pass_through());

        settings.global_transpose = 1;
        assert!(!settings.is_pass_through());
    }

    #[test]
    fn test_transposed_note_clamps() {
        let mut settings = FilterSettings::default();
        settings.global_transpose = -10;
        assert_eq!(settings.transposed_note(0, 2), 0);

        settings.global_transpose = 0;
        settings.channel_transpose = ChannelTranspose::new([10; 16]);
        assert_eq!(settings.transposed_note(3, 125), 127);
        assert_eq!(settings.transposed_note(3, 60), 70);

        // Extreme transposes must not wrap.
        settings.global_transpose = i16::MAX;
        assert_eq!(settings.transposed_note(3, 127), 127);
        settings.global_transpose = i16::MIN;
        settings.channel_transpose = ChannelTranspose::new([i16::MIN; 16]);
        assert_eq!(settings.transposed_note(3, 0), 0);
    }

    #[test]
    fn test_settings_serde_roundtrip() {
        let mut settings = FilterSettings::default();
        settings.channels = ChannelMask::single(2) | ChannelMask::single(9);
        settings.event_types = EventTypeMask::NOTE | EventTypeMask::CONTROL;
        settings.note_range = SevenBitRange::new(24, 96).unwrap();
        settings.global_transpose = -12;

        let encoded = bincode::serialize(&settings).unwrap();
        let decoded: FilterSettings = bincode::deserialize(&encoded).unwrap();
        assert_eq!(settings, decoded);
    }
}
