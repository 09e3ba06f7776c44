//! Real-time MIDI packet filtering and transformation.
//!
//! Walks a batch of timestamped raw MIDI 1.0 packets, reconstructs events
//! across running status, applies channel/type/range filters, channel
//! remap and transpose, and re-emits a running-status-compressed stream
//! while capturing summary state (activated channels, note extrema,
//! controllers, program/bank/pitch-bend, clock ticks).
//!
//! The engine is two-pass: a read-only preflight computes the exact output
//! size, then the encode pass fills a buffer of exactly that size. Apart
//! from that buffer and the summary, nothing allocates, so a filter can run
//! inside a real-time MIDI input callback.
//!
//! System Exclusive messages are not supported and their byte trains are
//! dropped.
//!
//! ```
//! use midi_packet_filter::{FilterSettings, FilterState, MidiPacketFilter, Packet};
//!
//! let filter = MidiPacketFilter::new(FilterSettings::default());
//! let mut state = FilterState::new();
//! let output = filter.filter(&[Packet::new(0, &[0x90, 60, 100])], &mut state);
//! assert_eq!(output.bytes.as_deref(), Some(&[0x90, 60, 100][..]));
//! ```

pub mod error;
pub use error::{Error, Result};

mod event;
pub use event::{ChannelMask, EventKind, EventTypeMask, RealTimeMessage};

mod settings;
pub use settings::{ChannelMap, ChannelTranspose, FilterSettings, SevenBitRange};

mod state;
pub use state::{FilterState, BANK_SELECT_LSB, BANK_SELECT_MSB};

mod packet;
pub use packet::Packet;

mod output;
pub use output::{ControllerTable, FilterOutput, NoteSpan};

mod walk;

mod filter;
pub use filter::{MidiPacketFilter, Preflight};
