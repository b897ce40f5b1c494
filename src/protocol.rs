//! Switch-bank protocol codec for the shared marine control bus.
//!
//! Models an 8-member switch bank using the bus's binary-status convention:
//! 2 bits per switch (Off / On / Unavailable) packed into a 16-bit field.
//! Two message identifiers (PGNs) are involved:
//!
//! - [`PGN_BANK_STATUS`] (127501) - periodic status broadcast ("heartbeat")
//!   and the post-toggle status rebroadcast. The status field carries the
//!   bank's sync-shadow bits.
//! - [`PGN_BANK_CONTROL`] (127502) - a switch change command. The target
//!   switch's 2-bit field holds the desired value; every other field reads
//!   Unavailable, so a receiver acts on the first available field it finds.
//!
//! A [`BankFrame`] carries the bank instance in byte 0 and the 16-bit status
//! field in bytes 1-2 (little endian). Bytes 3-7 are `0xFF`: every switch
//! position beyond the 8 modeled here reads Unavailable on the wire.
//!
//! # Example
//!
//! ```rust
//! use rs_winch::protocol::{decode_change, encode_change};
//!
//! let frame = encode_change(0, 3, true);
//! let change = decode_change(&frame, 0).unwrap();
//! assert_eq!((change.index, change.on), (3, true));
//!
//! // A different configured instance ignores the frame entirely.
//! assert!(decode_change(&frame, 1).is_none());
//! ```

/// PGN of the periodic bank status broadcast.
pub const PGN_BANK_STATUS: u32 = 127_501;

/// PGN of the switch change command.
pub const PGN_BANK_CONTROL: u32 = 127_502;

/// Number of switches in one bank.
pub const BANK_SIZE: u8 = 8;

/// Tri-state value of one switch position on the wire.
///
/// Bit patterns follow the bus convention: `00` = Off, `01` = On, anything
/// else reads as Unavailable (the `11` pattern is what senders use for
/// "no change here").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchState {
    /// Load commanded off.
    Off,
    /// Load commanded on.
    On,
    /// Position carries no information.
    Unavailable,
}

impl SwitchState {
    /// Decode a 2-bit field.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => SwitchState::Off,
            0b01 => SwitchState::On,
            _ => SwitchState::Unavailable,
        }
    }

    /// Encode to a 2-bit field.
    #[inline]
    pub const fn bits(&self) -> u8 {
        match self {
            SwitchState::Off => 0b00,
            SwitchState::On => 0b01,
            SwitchState::Unavailable => 0b11,
        }
    }
}

impl From<bool> for SwitchState {
    fn from(on: bool) -> Self {
        if on {
            SwitchState::On
        } else {
            SwitchState::Off
        }
    }
}

/// One switch-bank frame as exchanged with the bus adapter.
///
/// Byte 0 is the bank instance, bytes 1-2 the 16-bit status field (little
/// endian), bytes 3-7 the Unavailable fill for switch positions 9..28.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BankFrame {
    /// Message identifier.
    pub pgn: u32,
    /// Raw 8-byte payload.
    pub data: [u8; 8],
}

impl BankFrame {
    /// Builds a frame for the given instance and status field.
    pub fn new(pgn: u32, instance: u8, status: u16) -> Self {
        let mut data = [0xFF; 8];
        data[0] = instance;
        data[1..3].copy_from_slice(&status.to_le_bytes());
        Self { pgn, data }
    }

    /// The bank instance this frame addresses.
    #[inline]
    pub fn instance(&self) -> u8 {
        self.data[0]
    }

    /// The 16-bit status field.
    #[inline]
    pub fn status(&self) -> u16 {
        u16::from_le_bytes([self.data[1], self.data[2]])
    }
}

/// A single switch change decoded from an inbound command frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwitchChange {
    /// Switch index, 1-based (1..=8).
    pub index: u8,
    /// Desired value carried by the command.
    pub on: bool,
}

/// Encodes the periodic status broadcast.
///
/// The status field is the bank's sync-shadow word: switches 1-4 weighted
/// `0x01, 0x04, 0x10, 0x40` in the low byte, switches 5-8 the same weights
/// in the high byte (see [`RelayBank::sync_field`]). Emitted once per
/// heartbeat interval regardless of intervening activity, so downstream
/// displays resynchronize even when nobody touches anything.
///
/// [`RelayBank::sync_field`]: crate::bank::RelayBank::sync_field
pub fn encode_heartbeat(instance: u8, sync_field: u16) -> BankFrame {
    BankFrame::new(PGN_BANK_STATUS, instance, sync_field)
}

/// Encodes a single-switch change message.
///
/// The target switch's 2-bit field carries the desired value; every other
/// field is Unavailable. This is the frame emitted as the change
/// acknowledgment after a toggle is applied.
///
/// `index` is 1-based and must be in `1..=8`.
pub fn encode_change(instance: u8, index: u8, on: bool) -> BankFrame {
    debug_assert!((1..=BANK_SIZE).contains(&index));
    let shift = 2 * (index - 1) as u16;
    let mut status: u16 = 0xFFFF;
    status &= !(0b11 << shift);
    status |= (SwitchState::from(on).bits() as u16) << shift;
    BankFrame::new(PGN_BANK_CONTROL, instance, status)
}

/// Decodes an inbound switch command frame.
///
/// Frames whose PGN is not [`PGN_BANK_CONTROL`] or whose instance byte does
/// not match the configured bank instance are ignored (returns `None`, no
/// error). Otherwise the 2-bit fields are scanned from switch position 0
/// upward and the **first** available (Off or On) field is taken as the
/// single change event; one active change per message is assumed, this is
/// not a full 8-switch decode.
pub fn decode_change(frame: &BankFrame, instance: u8) -> Option<SwitchChange> {
    if frame.pgn != PGN_BANK_CONTROL || frame.instance() != instance {
        return None;
    }
    let status = frame.status();
    for position in 0..BANK_SIZE as u16 {
        let field = ((status >> (2 * position)) & 0b11) as u8;
        match SwitchState::from_bits(field) {
            SwitchState::Off => {
                return Some(SwitchChange {
                    index: position as u8 + 1,
                    on: false,
                })
            }
            SwitchState::On => {
                return Some(SwitchChange {
                    index: position as u8 + 1,
                    on: true,
                })
            }
            SwitchState::Unavailable => continue,
        }
    }
    None
}
