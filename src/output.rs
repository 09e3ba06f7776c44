//! Per-call output summary: filtered bytes plus the state captured while
//! walking the stream.

use std::time::Duration;

use crate::event::{ChannelMask, RealTimeMessage};

/// Lowest and highest notes seen on a channel.
///
/// Starts inverted (lower = 127, higher = 0) so the first observed note
/// tightens both bounds; `is_empty` is true until then.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteSpan {
    pub lower: u8,
    pub higher: u8,
}

impl NoteSpan {
    #[inline]
    pub fn include(&mut self, note: u8) {
        if note < self.lower {
            self.lower = note;
        }
        if note > self.higher {
            self.higher = note;
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower > self.higher
    }
}

impl Default for NoteSpan {
    fn default() -> Self {
        Self {
            lower: 127,
            higher: 0,
        }
    }
}

/// Last seen value per controller number, 0-119.
///
/// Controllers 0 and 32 (bank select) go through the bank state machine
/// instead, and 120-127 are channel-mode messages, so none of those ever
/// populate a slot here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerTable([Option<u8>; 128]);

impl ControllerTable {
    #[inline]
    pub fn get(&self, number: u8) -> Option<u8> {
        self.0.get(number as usize).copied().flatten()
    }

    #[inline]
    pub(crate) fn set(&mut self, number: u8, value: u8) {
        if let Some(slot) = self.0.get_mut(number as usize) {
            *slot = Some(value);
        }
    }
}

impl Default for ControllerTable {
    fn default() -> Self {
        Self([None; 128])
    }
}

/// Everything one filter call produced.
///
/// All fields are written during the call and handed to the caller on
/// return; `bytes` is `None` when no event survived filtering.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterOutput {
    /// The filtered, running-status-compressed stream.
    pub bytes: Option<Vec<u8>>,
    /// Channels that carried at least one kept-type, kept-channel event.
    pub activated_channels: ChannelMask,
    /// Note extrema per channel, post-transpose. Only meaningful for
    /// channels whose bit is set in `activated_channels`.
    pub note_span: [NoteSpan; 16],
    pub controllers: [ControllerTable; 16],
    /// Last program change per channel.
    pub program: [Option<u8>; 16],
    /// Last resolved bank select per channel.
    pub bank: [Option<u16>; 16],
    /// Last raw 14-bit pitch bend per channel.
    pub pitch_bend: [Option<u16>; 16],
    /// Last non-clock real-time message.
    pub last_real_time: Option<RealTimeMessage>,
    /// Clock ticks received. Normally at most one per buffer, more after
    /// a stall.
    pub ticks: u32,
    /// Timestamp of the last packet walked.
    pub timestamp: u64,
    /// Time spent in the filter call.
    pub processing_time: Duration,
}

impl FilterOutput {
    pub(crate) fn new() -> Self {
        Self {
            bytes: None,
            activated_channels: ChannelMask::NONE,
            note_span: [NoteSpan::default(); 16],
            controllers: [ControllerTable::default(); 16],
            program: [None; 16],
            bank: [None; 16],
            pitch_bend: [None; 16],
            last_real_time: None,
            ticks: 0,
            timestamp: 0,
            processing_time: Duration::ZERO,
        }
    }

    /// Pitch bend mapped to [-1, 1], 0x2000 being (almost) center.
    #[inline]
    pub fn pitch_bend_fraction(&self, channel: u8) -> Option<f32> {
        self.pitch_bend[(channel & 0x0F) as usize]
            .map(|value| value as f32 / 0x3FFF as f32 * 2.0 - 1.0)
    }
}
