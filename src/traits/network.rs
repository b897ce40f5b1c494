//! Channel traits for the UI transport and the marine control bus.
//!
//! Both channels are thin transports with no failure semantics of their own:
//! the UI side delivers command text and accepts state snapshots, the bus
//! side delivers and emits raw switch-bank frames. Anything dropped in
//! transit is never retried - the periodic heartbeat eventually brings
//! observers back in sync.
//!
//! # Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`UiChannel`] | Text commands in, JSON state snapshots out |
//! | [`BusPort`] | Switch-bank frame receive/send primitives |
//!
//! # UI Command Vocabulary
//!
//! ```text
//! down             - run the winch forward (chain out)
//! up               - run the winch in reverse (chain in)
//! stop             - stop the winch
//! switchHigh       - close the main switch
//! switchLow        - open the main switch
//! slider-<0..255>  - set the speed duty value
//! getStatus        - request a state snapshot
//! ```
//!
//! Any other text is accepted without error and still answered with a
//! snapshot.

use crate::messages::StatusSnapshot;
use crate::protocol::BankFrame;

/// Maximum accepted UI command length in bytes.
pub const UI_COMMAND_MAX: usize = 32;

/// Inbound UI command text, bounded for `no_std` use.
pub type UiText = heapless::String<UI_COMMAND_MAX>;

/// Bidirectional text channel to the operator UI.
///
/// The transport invokes its receive callback on its own schedule; that
/// callback must only enqueue the text, never act on it. The coordinator
/// drains the queue from its own thread via [`try_recv`](Self::try_recv).
///
/// # Implementation Notes
///
/// - `try_recv` must never block
/// - `broadcast` fans a snapshot out to every live connection
/// - `prune` drops connections the transport has detected as dead; the
///   coordinator calls it once per loop iteration
pub trait UiChannel {
    /// Drop dead connections.
    fn prune(&mut self);

    /// Pop the next enqueued command, if any (non-blocking).
    fn try_recv(&mut self) -> Option<UiText>;

    /// Push a state snapshot to all connected clients.
    fn broadcast(&mut self, snapshot: &StatusSnapshot);
}

/// Frame-level port to the shared control bus.
///
/// The adapter behind this trait owns addressing, arbitration, and the
/// physical layer. rs-winch only ever sees whole switch-bank frames.
///
/// # Implementation Notes
///
/// - `try_receive` must never block
/// - `send` is fire-and-forget; a frame the adapter fails to put on the
///   wire is simply lost (the heartbeat resynchronizes observers)
pub trait BusPort {
    /// Pop the next received frame, if any (non-blocking).
    fn try_receive(&mut self) -> Option<BankFrame>;

    /// Queue a frame for transmission.
    fn send(&mut self, frame: &BankFrame);
}
