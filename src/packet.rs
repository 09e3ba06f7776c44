//! Timestamped input packets.

/// A borrowed buffer of raw MIDI 1.0 bytes with its host timestamp.
///
/// Timestamps are expected to be monotonically nondecreasing across a
/// batch, but out-of-order or repeated stamps are tolerated; the summary
/// records the last one seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Packet<'a> {
    pub timestamp: u64,
    pub bytes: &'a [u8],
}

impl<'a> Packet<'a> {
    #[inline]
    pub fn new(timestamp: u64, bytes: &'a [u8]) -> Self {
        Self { timestamp, bytes }
    }
}
