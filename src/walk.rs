//! Byte-walking state machine shared by the preflight and encode passes.
//!
//! Both passes must agree exactly on which events survive, or the encode
//! pass would not fit the buffer the preflight pass sized. Keeping every
//! filtering decision here and letting each pass supply only a sink is
//! what enforces that agreement.

use crate::event::{EventKind, EventTypeMask};
use crate::settings::FilterSettings;

/// Receives the events the walker decided to keep.
///
/// `fresh_status` is true when no earlier event of the current status-byte
/// run was kept: the sink must then account for one status byte before the
/// data bytes (running-status compression).
pub(crate) trait WalkSink {
    /// A kept real-time byte (status >= 0xF8). Written verbatim, channel-less.
    fn real_time(&mut self, status: u8);

    /// First data byte of a run whose kind and channel both pass the masks.
    /// Fires once per status-byte run, before any range filtering.
    fn run_start(&mut self, kind: EventKind, channel: u8);

    /// A kept event carrying one data byte.
    fn one_byte_event(&mut self, kind: EventKind, channel: u8, data: u8, fresh_status: bool);

    /// A kept event carrying two data bytes.
    fn two_byte_event(
        &mut self,
        kind: EventKind,
        channel: u8,
        data1: u8,
        data2: u8,
        fresh_status: bool,
    );
}

/// Explicit per-stream scan state.
///
/// One instance survives across the packets of a single filter call, so
/// running status spans packet boundaries. Any status byte resets the
/// machine, which is what makes truncated or malformed trains harmless:
/// their leftover data bytes are consumed without effect.
#[derive(Debug, Default)]
pub(crate) struct Walker {
    /// Kind and channel of the running status, `None` before the first
    /// status byte (stray data bytes are dropped).
    current: Option<(EventKind, u8)>,
    /// False: next data byte is the first of an event.
    byte_selector: bool,
    /// Discard every data byte until the next status byte.
    skip_train: bool,
    /// Current note failed the note-range filter; drop it and its velocity.
    skip_note: bool,
    /// Masks already checked for this status-byte run.
    checked_status: bool,
    /// An event of this run was kept, so its status byte is accounted for.
    keep_status: bool,
    data1: u8,
}

impl Walker {
    pub fn walk(&mut self, bytes: &[u8], settings: &FilterSettings, sink: &mut impl WalkSink) {
        for &byte in bytes {
            if byte >= 0x80 {
                self.begin_run(byte, settings, sink);
                continue;
            }
            if self.skip_train {
                continue;
            }
            let Some((kind, channel)) = self.current else {
                // Data byte with no running status: malformed, drop the train.
                self.skip_train = true;
                continue;
            };
            if !self.checked_status {
                self.checked_status = true;
                if kind == EventKind::System
                    || !settings.event_types.allows(kind)
                    || !settings.channels.contains(channel)
                {
                    self.skip_train = true;
                    continue;
                }
                sink.run_start(kind, channel);
            }
            match kind.data_len() {
                2 => self.push_two_byte(kind, channel, byte, settings, sink),
                1 => {
                    let fresh = !self.keep_status;
                    self.keep_status = true;
                    sink.one_byte_event(kind, channel, byte, fresh);
                }
                _ => {}
            }
        }
    }

    fn begin_run(&mut self, status: u8, settings: &FilterSettings, sink: &mut impl WalkSink) {
        self.byte_selector = false;
        self.skip_train = false;
        self.skip_note = false;
        self.checked_status = false;
        self.keep_status = false;
        self.data1 = 0;
        if status >= 0xF8 {
            self.current = Some((EventKind::System, 0));
            if settings.event_types.contains(EventTypeMask::REAL_TIME) {
                sink.real_time(status);
            }
            return;
        }
        // 0xF0-0xF7 classify as System and get dropped at the mask check.
        self.current = EventKind::classify(status);
    }

    fn push_two_byte(
        &mut self,
        kind: EventKind,
        channel: u8,
        byte: u8,
        settings: &FilterSettings,
        sink: &mut impl WalkSink,
    ) {
        if !self.byte_selector {
            self.data1 = byte;
            if kind == EventKind::NoteOn {
                self.skip_note = !settings.note_range.contains(byte);
            }
            self.byte_selector = true;
            return;
        }
        self.byte_selector = false;
        if kind == EventKind::NoteOn {
            if self.skip_note {
                // Only this note is dropped; the run stays alive.
                self.skip_note = false;
                return;
            }
            if !settings.velocity_range.contains(byte) {
                return;
            }
        }
        let fresh = !self.keep_status;
        self.keep_status = true;
        sink.two_byte_event(kind, channel, self.data1, byte, fresh);
    }
}
