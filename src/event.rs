//! Wire-level MIDI 1.0 primitives: status classification, data lengths,
//! channel and event-type masks.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Channel-voice and system message kinds, tagged with their status nibble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventKind {
    NoteOff = 0x80,
    NoteOn = 0x90,
    PolyAftertouch = 0xA0,
    Control = 0xB0,
    ProgramChange = 0xC0,
    ChannelPressure = 0xD0,
    PitchBend = 0xE0,
    /// 0xF0 status nibble. Real-time bytes (>= 0xF8) are channel-less;
    /// 0xF0-0xF7 (SysEx and system common) are not handled.
    System = 0xF0,
}

impl EventKind {
    /// Splits a status byte into kind and channel nibble.
    /// Returns `None` for data bytes (high bit clear).
    #[inline]
    pub fn classify(status: u8) -> Option<(EventKind, u8)> {
        let kind = match status & 0xF0 {
            0x80 => EventKind::NoteOff,
            0x90 => EventKind::NoteOn,
            0xA0 => EventKind::PolyAftertouch,
            0xB0 => EventKind::Control,
            0xC0 => EventKind::ProgramChange,
            0xD0 => EventKind::ChannelPressure,
            0xE0 => EventKind::PitchBend,
            0xF0 => EventKind::System,
            _ => return None,
        };
        let channel = if kind == EventKind::System {
            0
        } else {
            status & 0x0F
        };
        Some((kind, channel))
    }

    /// Number of data bytes following the status byte.
    #[inline]
    pub fn data_len(self) -> usize {
        match self {
            EventKind::NoteOff
            | EventKind::NoteOn
            | EventKind::PolyAftertouch
            | EventKind::Control
            | EventKind::PitchBend => 2,
            EventKind::ProgramChange | EventKind::ChannelPressure => 1,
            EventKind::System => 0,
        }
    }
}

/// System real-time messages (status >= 0xF8).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RealTimeMessage {
    Clock = 0xF8,
    Start = 0xFA,
    Continue = 0xFB,
    Stop = 0xFC,
    ActiveSensing = 0xFE,
    Reset = 0xFF,
}

impl RealTimeMessage {
    /// Returns `None` for anything below 0xF8 and for the undefined
    /// real-time bytes 0xF9 and 0xFD.
    #[inline]
    pub fn from_status(status: u8) -> Option<Self> {
        match status {
            0xF8 => Some(RealTimeMessage::Clock),
            0xFA => Some(RealTimeMessage::Start),
            0xFB => Some(RealTimeMessage::Continue),
            0xFC => Some(RealTimeMessage::Stop),
            0xFE => Some(RealTimeMessage::ActiveSensing),
            0xFF => Some(RealTimeMessage::Reset),
            _ => None,
        }
    }
}

impl fmt::Display for RealTimeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RealTimeMessage::Clock => "Clock",
            RealTimeMessage::Start => "Start",
            RealTimeMessage::Continue => "Continue",
            RealTimeMessage::Stop => "Stop",
            RealTimeMessage::ActiveSensing => "Active Sensing",
            RealTimeMessage::Reset => "System Reset",
        };
        f.write_str(name)
    }
}

/// Bit-per-category event mask for fast filtering decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeMask(u8);

impl EventTypeMask {
    pub const NOTE_ON: Self = Self(0x01);
    pub const NOTE_OFF: Self = Self(0x02);
    pub const NOTE: Self = Self(0x03);
    pub const POLY_AFTERTOUCH: Self = Self(0x04);
    pub const CHANNEL_PRESSURE: Self = Self(0x08);
    pub const AFTERTOUCH: Self = Self(0x0C);
    pub const CONTROL: Self = Self(0x10);
    pub const PITCH_BEND: Self = Self(0x20);
    pub const PROGRAM_CHANGE: Self = Self(0x40);
    pub const REAL_TIME: Self = Self(0x80);
    pub const NONE: Self = Self(0x00);
    pub const ALL: Self = Self(0xFF);
    pub const ALL_EXCEPT_REAL_TIME: Self = Self(0x7F);

    #[inline]
    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// The mask bit guarding a wire event kind.
    #[inline]
    pub fn allows(self, kind: EventKind) -> bool {
        let bit = match kind {
            EventKind::NoteOff => Self::NOTE_OFF,
            EventKind::NoteOn => Self::NOTE_ON,
            EventKind::PolyAftertouch => Self::POLY_AFTERTOUCH,
            EventKind::Control => Self::CONTROL,
            EventKind::ProgramChange => Self::PROGRAM_CHANGE,
            EventKind::ChannelPressure => Self::CHANNEL_PRESSURE,
            EventKind::PitchBend => Self::PITCH_BEND,
            EventKind::System => Self::REAL_TIME,
        };
        self.contains(bit)
    }
}

impl BitOr for EventTypeMask {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for EventTypeMask {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for EventTypeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(EventTypeMask, &str); 8] = [
            (EventTypeMask::NOTE_OFF, "NoteOff"),
            (EventTypeMask::NOTE_ON, "NoteOn"),
            (EventTypeMask::POLY_AFTERTOUCH, "PolyAftertouch"),
            (EventTypeMask::CONTROL, "Control"),
            (EventTypeMask::PROGRAM_CHANGE, "ProgramChange"),
            (EventTypeMask::CHANNEL_PRESSURE, "ChannelPressure"),
            (EventTypeMask::PITCH_BEND, "PitchBend"),
            (EventTypeMask::REAL_TIME, "RealTime"),
        ];
        let mut first = true;
        f.write_str("[")?;
        for (bit, name) in NAMES {
            if self.contains(bit) {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        f.write_str("]")
    }
}

/// 16-bit mask, one bit per MIDI channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMask(u16);

impl ChannelMask {
    pub const NONE: Self = Self(0x0000);
    pub const ALL: Self = Self(0xFFFF);

    #[inline]
    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[inline]
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Mask with a single channel bit set. Channels above 15 wrap via masking.
    #[inline]
    pub fn single(channel: u8) -> Self {
        Self(1 << (channel & 0x0F))
    }

    #[inline]
    pub fn contains(self, channel: u8) -> bool {
        self.0 & (1 << (channel & 0x0F)) != 0
    }

    #[inline]
    pub fn insert(&mut self, channel: u8) {
        self.0 |= 1 << (channel & 0x0F);
    }

    #[inline]
    pub fn remove(&mut self, channel: u8) {
        self.0 &= !(1 << (channel & 0x0F));
    }
}

impl BitOr for ChannelMask {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ChannelMask {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ChannelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("|")?;
        for channel in 0..16u8 {
            if self.contains(channel) {
                write!(f, "{channel:02}|")?;
            } else {
                f.write_str("  |")?;
            }
        }
        Ok(())
    }
}
