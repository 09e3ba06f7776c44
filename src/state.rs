//! Cross-call filter state: bank-select reconstruction.
//!
//! A bank number is assembled from two controller messages (MSB on
//! controller 0, LSB on controller 32) that may arrive in separate filter
//! calls, so the pending halves live here rather than in the per-call
//! output. One `FilterState` must be owned exclusively by one logical
//! input stream.

use serde::{Deserialize, Serialize};

/// Controller number carrying the bank select MSB half.
pub const BANK_SELECT_MSB: u8 = 0;
/// Controller number carrying the bank select LSB half.
pub const BANK_SELECT_LSB: u8 = 32;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pending_bank_msb: [Option<u8>; 16],
    pending_bank_lsb: [Option<u8>; 16],
    bank: [Option<u16>; 16],
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last resolved bank number for a channel.
    #[inline]
    pub fn bank(&self, channel: u8) -> Option<u16> {
        self.bank[(channel & 0x0F) as usize]
    }

    /// Pending MSB half awaiting its LSB.
    #[inline]
    pub fn pending_bank_msb(&self, channel: u8) -> Option<u8> {
        self.pending_bank_msb[(channel & 0x0F) as usize]
    }

    /// Pending LSB half awaiting its MSB.
    #[inline]
    pub fn pending_bank_lsb(&self, channel: u8) -> Option<u8> {
        self.pending_bank_lsb[(channel & 0x0F) as usize]
    }

    /// Feeds a controller message into the bank state machine.
    ///
    /// Controllers 0 and 32 update the pending halves (last write wins);
    /// once both halves are present the bank resolves, both halves are
    /// cleared and the bank number is returned. Any other controller
    /// number leaves the state untouched and returns `None`.
    pub fn apply_controller(
        &mut self,
        channel: u8,
        number: u8,
        value: u8,
        limit_to_127: bool,
    ) -> Option<u16> {
        let slot = (channel & 0x0F) as usize;
        match number {
            BANK_SELECT_MSB => self.pending_bank_msb[slot] = Some(value),
            BANK_SELECT_LSB => self.pending_bank_lsb[slot] = Some(value),
            _ => return None,
        }
        let (msb, lsb) = (self.pending_bank_msb[slot]?, self.pending_bank_lsb[slot]?);
        let bank = if limit_to_127 {
            lsb as u16
        } else {
            (msb as u16) << 7 | lsb as u16
        };
        self.pending_bank_msb[slot] = None;
        self.pending_bank_lsb[slot] = None;
        self.bank[slot] = Some(bank);
        Some(bank)
    }
}
