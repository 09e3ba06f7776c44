//! The two-pass filtering engine: an exact size preflight over the input
//! packets, then a transform-and-encode pass into a buffer of exactly that
//! size.

use std::time::Instant;

use tracing::{debug, error};

use crate::event::{EventKind, RealTimeMessage};
use crate::output::FilterOutput;
use crate::packet::Packet;
use crate::settings::FilterSettings;
use crate::state::{FilterState, BANK_SELECT_LSB, BANK_SELECT_MSB};
use crate::walk::{WalkSink, Walker};

/// First channel-mode controller number; 120-127 pass through the stream
/// but are never captured into the controller table.
const FIRST_CHANNEL_MODE_CONTROLLER: u8 = 120;

/// Result of the preflight pass: how many events survive the settings and
/// how many output bytes they need once re-encoded with running status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Preflight {
    pub events: u32,
    pub bytes: u32,
}

/// Counting sink: mirrors exactly what `EncodeSink` will write.
#[derive(Default)]
struct CountSink {
    events: u32,
    bytes: u32,
}

impl WalkSink for CountSink {
    fn real_time(&mut self, _status: u8) {
        self.events += 1;
        self.bytes += 1;
    }

    fn run_start(&mut self, _kind: EventKind, _channel: u8) {}

    fn one_byte_event(&mut self, _kind: EventKind, _channel: u8, _data: u8, fresh_status: bool) {
        self.events += 1;
        self.bytes += 1 + fresh_status as u32;
    }

    fn two_byte_event(
        &mut self,
        _kind: EventKind,
        _channel: u8,
        _data1: u8,
        _data2: u8,
        fresh_status: bool,
    ) {
        self.events += 1;
        self.bytes += 2 + fresh_status as u32;
    }
}

/// Bounds-checked output cursor.
///
/// The capacity comes from the preflight pass; exceeding it is an internal
/// contract violation, never a user-facing error. Debug builds assert,
/// release builds log once and drop the remaining writes so the buffer can
/// never overrun or reallocate.
struct BoundedWriter {
    buf: Vec<u8>,
    cap: usize,
    overrun: bool,
}

impl BoundedWriter {
    fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
            cap,
            overrun: false,
        }
    }

    #[inline]
    fn push(&mut self, byte: u8) {
        if self.buf.len() == self.cap {
            debug_assert!(false, "encode pass exceeded the preflight byte count");
            if !self.overrun {
                error!(
                    cap = self.cap,
                    "encode pass exceeded the preflight byte count, dropping remainder"
                );
                self.overrun = true;
            }
            return;
        }
        self.buf.push(byte);
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Writing sink: emits the filtered stream and fills the output summary.
struct EncodeSink<'a> {
    settings: &'a FilterSettings,
    state: &'a mut FilterState,
    output: &'a mut FilterOutput,
    writer: BoundedWriter,
}

impl EncodeSink<'_> {
    #[inline]
    fn write_status(&mut self, kind: EventKind, channel: u8) {
        self.writer
            .push(kind as u8 | self.settings.channel_map.get(channel));
    }
}

impl WalkSink for EncodeSink<'_> {
    fn real_time(&mut self, status: u8) {
        if status == RealTimeMessage::Clock as u8 {
            self.output.ticks += 1;
        } else if let Some(message) = RealTimeMessage::from_status(status) {
            self.output.last_real_time = Some(message);
        }
        // Channel-less: the remap never applies.
        self.writer.push(status);
    }

    fn run_start(&mut self, _kind: EventKind, channel: u8) {
        if self.settings.track_activated_channels {
            self.output.activated_channels.insert(channel);
        }
    }

    fn one_byte_event(&mut self, kind: EventKind, channel: u8, data: u8, fresh_status: bool) {
        if kind == EventKind::ProgramChange {
            self.output.program[channel as usize] = Some(data);
        }
        if fresh_status {
            self.write_status(kind, channel);
        }
        self.writer.push(data);
    }

    fn two_byte_event(
        &mut self,
        kind: EventKind,
        channel: u8,
        data1: u8,
        data2: u8,
        fresh_status: bool,
    ) {
        let mut data1 = data1;
        match kind {
            EventKind::NoteOn | EventKind::NoteOff => {
                data1 = self.settings.transposed_note(channel, data1);
                if kind == EventKind::NoteOn && self.settings.track_note_span {
                    self.output.note_span[channel as usize].include(data1);
                }
            }
            EventKind::Control => match data1 {
                BANK_SELECT_MSB | BANK_SELECT_LSB => {
                    if let Some(bank) = self.state.apply_controller(
                        channel,
                        data1,
                        data2,
                        self.settings.limit_banks_to_127,
                    ) {
                        self.output.bank[channel as usize] = Some(bank);
                    }
                }
                number if number < FIRST_CHANNEL_MODE_CONTROLLER => {
                    self.output.controllers[channel as usize].set(number, data2);
                }
                _ => {}
            },
            EventKind::PitchBend => {
                self.output.pitch_bend[channel as usize] =
                    Some(data1 as u16 | (data2 as u16) << 7);
            }
            _ => {}
        }
        if fresh_status {
            self.write_status(kind, channel);
        }
        self.writer.push(data1);
        self.writer.push(data2);
    }
}

/// Single-pass (size preflight + write) MIDI stream filter.
///
/// Allocation-free apart from the output buffer and summary, both sized
/// exactly once per call, so it is safe to run inside a real-time MIDI
/// input callback.
#[derive(Clone, Debug)]
pub struct MidiPacketFilter {
    pub settings: FilterSettings,
}

impl MidiPacketFilter {
    pub fn new(settings: FilterSettings) -> Self {
        Self { settings }
    }

    /// Read-only sizing pass.
    ///
    /// `filter` produces exactly `Preflight::bytes` output bytes for the
    /// same packets and settings; callers sizing their own downstream
    /// buffers can rely on that.
    pub fn preflight(&self, packets: &[Packet<'_>]) -> Preflight {
        let mut walker = Walker::default();
        let mut sink = CountSink::default();
        for packet in packets {
            walker.walk(packet.bytes, &self.settings, &mut sink);
        }
        Preflight {
            events: sink.events,
            bytes: sink.bytes,
        }
    }

    /// Filters a batch of packets, returning the re-encoded stream and the
    /// captured summary.
    ///
    /// `state` must be the one dedicated to this input stream: bank select
    /// halves pending from an earlier call resolve here.
    pub fn filter(&self, packets: &[Packet<'_>], state: &mut FilterState) -> FilterOutput {
        let start = Instant::now();

        let plan = self.preflight(packets);
        let mut output = FilterOutput::new();
        if let Some(last) = packets.last() {
            output.timestamp = last.timestamp;
        }
        if plan.events == 0 {
            debug!("no events survived filtering");
            output.processing_time = start.elapsed();
            return output;
        }

        let mut sink = EncodeSink {
            settings: &self.settings,
            state,
            output: &mut output,
            writer: BoundedWriter::with_capacity(plan.bytes as usize),
        };
        let mut walker = Walker::default();
        for packet in packets {
            walker.walk(packet.bytes, &self.settings, &mut sink);
        }

        let bytes = sink.writer.into_bytes();
        debug_assert_eq!(
            bytes.len(),
            plan.bytes as usize,
            "encode pass disagreed with preflight"
        );
        output.bytes = Some(bytes);
        output.processing_time = start.elapsed();
        output
    }
}
