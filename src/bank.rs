//! Relay bank state and the output driver behind it.
//!
//! [`RelayBank`] holds the protocol-visible state of the 8-slot switch bank:
//! a *live* bit per slot (the actual on/off command state) and a *sync
//! shadow* bit per slot (a separately-weighted copy consumed only by the
//! heartbeat encoding). The two fields use different bit weights:
//!
//! ```text
//! slot:        1     2     3     4       5      6      7      8
//! live weight: 0x01  0x02  0x04  0x08 | 0x0100 0x0200 0x0400 0x0800
//! sync weight: 0x01  0x04  0x10  0x40 | 0x0100 0x0400 0x1000 0x4000
//! ```
//!
//! Slot 2 is the bank's virtual slot: it participates fully in protocol
//! state and outbound rebroadcasts but drives no hardware.
//!
//! [`RelayDriver`] pairs the bank with a [`RelayOutputs`] implementation and
//! performs the pin writes (skipped for the virtual slot). Writes are
//! fire-and-forget: no retries, no read-back verification.

use crate::config::BankConfig;
use crate::protocol::BANK_SIZE;
use crate::traits::RelayOutputs;

/// The bank slot (1-based) that exists only in protocol state.
pub const VIRTUAL_SLOT: u8 = 2;

/// Where a bank slot's output goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotOutput {
    /// Drives a physical output channel (GPIO number).
    Pin(i32),
    /// Protocol-only slot; no hardware behind it.
    Virtual,
}

/// Protocol-visible state of the 8-slot switch bank.
#[derive(Clone, Copy, Debug)]
pub struct RelayBank {
    live: u16,
    sync: u16,
    outputs: [SlotOutput; BANK_SIZE as usize],
}

impl RelayBank {
    /// Creates a bank with every slot off.
    pub fn new(outputs: [SlotOutput; BANK_SIZE as usize]) -> Self {
        Self {
            live: 0,
            sync: 0,
            outputs,
        }
    }

    /// Builds the bank from configuration (slot 2 forced virtual).
    pub fn from_config(config: &BankConfig) -> Self {
        Self::new(config.slot_outputs())
    }

    /// Live command state of one slot (1-based index).
    pub fn is_on(&self, index: u8) -> bool {
        match Self::live_mask(index) {
            Some(mask) => self.live & mask != 0,
            None => false,
        }
    }

    /// The live status word (change-weighted).
    #[inline]
    pub fn live_field(&self) -> u16 {
        self.live
    }

    /// The sync-shadow word consumed by the heartbeat encoding.
    #[inline]
    pub fn sync_field(&self) -> u16 {
        self.sync
    }

    /// Output mapping of one slot (1-based index).
    pub fn output(&self, index: u8) -> Option<SlotOutput> {
        if (1..=BANK_SIZE).contains(&index) {
            Some(self.outputs[index as usize - 1])
        } else {
            None
        }
    }

    /// Set one slot's command state. Both the live bit and its sync shadow
    /// follow the new value.
    pub fn set(&mut self, index: u8, on: bool) {
        let (Some(live), Some(sync)) = (Self::live_mask(index), Self::sync_mask(index)) else {
            return;
        };
        if on {
            self.live |= live;
            self.sync |= sync;
        } else {
            self.live &= !live;
            self.sync &= !sync;
        }
    }

    /// Flip one slot's live bit and its paired sync-shadow bit.
    ///
    /// Returns the new live value; flipping twice restores the original.
    pub fn toggle(&mut self, index: u8) -> bool {
        let (Some(live), Some(sync)) = (Self::live_mask(index), Self::sync_mask(index)) else {
            return false;
        };
        self.live ^= live;
        self.sync ^= sync;
        self.live & live != 0
    }

    fn live_mask(index: u8) -> Option<u16> {
        if !(1..=BANK_SIZE).contains(&index) {
            return None;
        }
        let i = (index - 1) as u16;
        Some(1 << (i % 4 + 8 * (i / 4)))
    }

    fn sync_mask(index: u8) -> Option<u16> {
        if !(1..=BANK_SIZE).contains(&index) {
            return None;
        }
        let i = (index - 1) as u16;
        Some(1 << (2 * (i % 4) + 8 * (i / 4)))
    }
}

/// Maps bank slots to physical outputs and keeps the bank state current.
///
/// # Type Parameter
///
/// - `R`: The relay output implementation ([`RelayOutputs`] trait)
pub struct RelayDriver<R: RelayOutputs> {
    bank: RelayBank,
    outputs: R,
}

impl<R: RelayOutputs> RelayDriver<R> {
    /// Creates a driver over the given bank state and output hardware.
    pub fn new(bank: RelayBank, outputs: R) -> Self {
        Self { bank, outputs }
    }

    /// Read-only view of the bank state.
    #[inline]
    pub fn bank(&self) -> &RelayBank {
        &self.bank
    }

    /// Borrow the output hardware (useful for inspecting mocks in tests).
    pub fn outputs(&self) -> &R {
        &self.outputs
    }

    /// Set one slot to a known state.
    ///
    /// Writes the mapped pin (skipped for the virtual slot) and updates the
    /// bank's live bit.
    pub fn set_switch(&mut self, index: u8, on: bool) -> Result<(), R::Error> {
        if let Some(SlotOutput::Pin(channel)) = self.bank.output(index) {
            self.outputs.write(channel, on)?;
        }
        self.bank.set(index, on);
        Ok(())
    }

    /// Flip one slot and return its new live state.
    pub fn toggle_switch(&mut self, index: u8) -> Result<bool, R::Error> {
        let Some(output) = self.bank.output(index) else {
            return Ok(false);
        };
        let on = self.bank.toggle(index);
        if let SlotOutput::Pin(channel) = output {
            self.outputs.write(channel, on)?;
        }
        Ok(on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockRelays;

    fn test_bank() -> RelayBank {
        RelayBank::from_config(&BankConfig::default())
    }

    // =========================================================================
    // Bit weights
    // =========================================================================

    #[test]
    fn live_weights_per_group_of_four() {
        let mut bank = test_bank();
        bank.set(1, true);
        assert_eq!(bank.live_field(), 0x0001);
        bank.set(3, true);
        assert_eq!(bank.live_field(), 0x0005);
        bank.set(5, true);
        assert_eq!(bank.live_field(), 0x0105);
        bank.set(8, true);
        assert_eq!(bank.live_field(), 0x0905);
    }

    #[test]
    fn sync_weights_differ_from_live() {
        let mut bank = test_bank();
        bank.set(3, true);
        assert_eq!(bank.live_field(), 0x0004);
        assert_eq!(bank.sync_field(), 0x0010);

        bank.set(3, false);
        bank.set(7, true);
        assert_eq!(bank.live_field(), 0x0400);
        assert_eq!(bank.sync_field(), 0x1000);
    }

    #[test]
    fn toggle_parity_flips_each_call() {
        let mut bank = test_bank();
        assert!(bank.toggle(4));
        assert_eq!(bank.sync_field(), 0x0040);
        assert!(!bank.toggle(4));
        assert_eq!(bank.live_field(), 0);
        assert_eq!(bank.sync_field(), 0);
    }

    #[test]
    fn out_of_range_indices_are_inert() {
        let mut bank = test_bank();
        bank.set(0, true);
        bank.set(9, true);
        assert!(!bank.toggle(0));
        assert_eq!(bank.live_field(), 0);
        assert!(!bank.is_on(9));
    }

    // =========================================================================
    // RelayDriver
    // =========================================================================

    #[test]
    fn set_switch_writes_the_mapped_pin() {
        let config = BankConfig::default();
        let mut driver = RelayDriver::new(RelayBank::from_config(&config), MockRelays::new());
        driver.set_switch(1, true).unwrap();

        assert!(driver.bank().is_on(1));
        assert_eq!(driver.outputs().writes, vec![(config.relay_pins[0], true)]);
    }

    #[test]
    fn virtual_slot_updates_state_without_pin_writes() {
        let mut driver = RelayDriver::new(test_bank(), MockRelays::new());
        let on = driver.toggle_switch(VIRTUAL_SLOT).unwrap();

        assert!(on);
        assert!(driver.bank().is_on(VIRTUAL_SLOT));
        assert!(driver.outputs().writes.is_empty());
    }

    #[test]
    fn toggle_switch_issues_exactly_one_write() {
        let mut driver = RelayDriver::new(test_bank(), MockRelays::new());
        driver.toggle_switch(3).unwrap();
        assert_eq!(driver.outputs().writes.len(), 1);

        driver.toggle_switch(3).unwrap();
        assert_eq!(driver.outputs().writes.len(), 2);
        assert!(!driver.bank().is_on(3));
    }
}
