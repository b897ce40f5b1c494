//! Integration tests for the switch-bank protocol path: inbound commands,
//! heartbeat timing, and the virtual slot.

use rs_winch::config::{BankConfig, Config};
use rs_winch::coordinator::Coordinator;
use rs_winch::hal::{MockButtons, MockBus, MockMotor, MockRelays, MockTacho, MockUi};
use rs_winch::protocol::{
    decode_change, encode_change, encode_heartbeat, PGN_BANK_CONTROL, PGN_BANK_STATUS,
};
use rs_winch::{MotorState, VIRTUAL_SLOT};

type TestCoordinator = Coordinator<MockMotor, MockRelays, MockButtons, MockTacho>;

fn coordinator(config: &Config) -> TestCoordinator {
    Coordinator::new(
        MockMotor::new(),
        MockRelays::new(),
        MockButtons::new(),
        MockTacho::new(),
        config,
    )
}

// ============================================================================
// Scenario 2: inbound command for switch 3
// ============================================================================

#[test]
fn scenario_inbound_command_for_switch_3() {
    let config = Config::default();
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    bus.push_frame(encode_change(config.bank.instance, 3, true));
    assert!(c.poll(0, &mut ui, &mut bus).unwrap());

    // live-bit group-1 weight 0x04 and sync-shadow weight 0x10 flipped
    assert_eq!(c.relays().bank().live_field(), 0x0004);
    assert_eq!(c.relays().bank().sync_field(), 0x0010);

    // the mapped pin toggled exactly once
    let pin = config.bank.relay_pins[2];
    assert_eq!(c.relays().outputs().writes, vec![(pin, true)]);

    // heartbeat + acknowledgment emitted
    let pgns: Vec<u32> = bus.sent.iter().map(|f| f.pgn).collect();
    assert!(pgns.contains(&PGN_BANK_STATUS));
    assert!(pgns.contains(&PGN_BANK_CONTROL));

    // the ack itself round-trips back to (3, on)
    let ack = bus.sent.iter().find(|f| f.pgn == PGN_BANK_CONTROL).unwrap();
    let change = decode_change(ack, config.bank.instance).unwrap();
    assert_eq!((change.index, change.on), (3, true));
}

#[test]
fn double_toggle_restores_the_original_live_state() {
    let config = Config::default();
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    bus.push_frame(encode_change(config.bank.instance, 5, true));
    c.poll(0, &mut ui, &mut bus).unwrap();
    assert!(c.relays().bank().is_on(5));

    // the command's desired value is irrelevant; a second command flips back
    bus.push_frame(encode_change(config.bank.instance, 5, true));
    c.poll(20, &mut ui, &mut bus).unwrap();
    assert!(!c.relays().bank().is_on(5));
    assert_eq!(c.relays().bank().live_field(), 0);
    assert_eq!(c.relays().bank().sync_field(), 0);
}

#[test]
fn foreign_instance_frames_are_ignored() {
    let config = Config::default().with_bank(BankConfig::default().with_instance(2));
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    bus.push_frame(encode_change(3, 1, true));
    assert!(!c.poll(0, &mut ui, &mut bus).unwrap());

    assert_eq!(c.relays().bank().live_field(), 0);
    assert!(c.relays().outputs().writes.is_empty());
    assert!(bus.sent.is_empty());
    assert!(ui.broadcasts.is_empty());
}

// ============================================================================
// Virtual slot
// ============================================================================

#[test]
fn virtual_slot_toggles_without_pin_writes() {
    let config = Config::default();
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    bus.push_frame(encode_change(config.bank.instance, VIRTUAL_SLOT, true));
    assert!(c.poll(0, &mut ui, &mut bus).unwrap());

    assert!(c.relays().bank().is_on(VIRTUAL_SLOT));
    assert!(c.relays().outputs().writes.is_empty());
    // rebroadcast happened exactly like for a physical slot
    assert_eq!(bus.sent.len(), 2);
}

#[test]
fn physical_slot_toggle_issues_exactly_one_pin_write() {
    let config = Config::default();
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    bus.push_frame(encode_change(config.bank.instance, 6, true));
    c.poll(0, &mut ui, &mut bus).unwrap();
    assert_eq!(c.relays().outputs().writes.len(), 1);
}

// ============================================================================
// Main switch over the bus
// ============================================================================

#[test]
fn bus_toggle_of_the_main_switch_arms_the_fsm() {
    let config = Config::default();
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    bus.push_frame(encode_change(
        config.bank.instance,
        config.bank.main_switch,
        true,
    ));
    c.poll(0, &mut ui, &mut bus).unwrap();
    assert_eq!(c.motor().state(), MotorState::Braked);

    bus.push_frame(encode_change(
        config.bank.instance,
        config.bank.main_switch,
        false,
    ));
    c.poll(20, &mut ui, &mut bus).unwrap();
    assert_eq!(c.motor().state(), MotorState::Off);
}

// ============================================================================
// Heartbeat
// ============================================================================

#[test]
fn heartbeat_fires_at_least_once_per_interval_despite_toggles() {
    let config = Config::default();
    let interval = config.bank.heartbeat_ms;
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    c.poll(1, &mut ui, &mut bus).unwrap(); // nothing due yet
    assert!(bus.sent.is_empty());

    // intervening toggles do not reset the heartbeat schedule
    bus.push_frame(encode_change(config.bank.instance, 4, true));
    c.poll(interval / 2, &mut ui, &mut bus).unwrap();
    let toggle_traffic = bus.sent.len();

    c.poll(interval + 1, &mut ui, &mut bus).unwrap();
    let beats: Vec<_> = bus.sent[toggle_traffic..]
        .iter()
        .filter(|f| f.pgn == PGN_BANK_STATUS)
        .collect();
    assert_eq!(beats.len(), 1);
    // the beat carries the sync shadow of the toggled bank
    assert_eq!(beats[0].status(), c.relays().bank().sync_field());
}

#[test]
fn heartbeat_schedule_survives_tick_wraparound() {
    let config = Config::default();
    let interval = config.bank.heartbeat_ms;
    let mut c = coordinator(&config);
    let (mut ui, mut bus) = (MockUi::new(), MockBus::new());

    // First beat just before the counter wraps
    let start = u32::MAX - interval / 2;
    c.poll(start, &mut ui, &mut bus).unwrap();
    let after_first = bus.sent.len();
    assert_eq!(after_first, 1);

    // Not due yet, 1 ms after the wrap
    c.poll(start.wrapping_add(interval / 2 + 1), &mut ui, &mut bus)
        .unwrap();
    assert_eq!(bus.sent.len(), after_first);

    // Due again a full interval after the first beat
    c.poll(start.wrapping_add(interval + 5), &mut ui, &mut bus)
        .unwrap();
    assert_eq!(bus.sent.len(), after_first + 1);
}

#[test]
fn heartbeat_encoding_matches_bank_sync_shadow() {
    // direct codec-level check: switches 1..=8 all on
    let mut bank = rs_winch::RelayBank::from_config(&BankConfig::default());
    for i in 1..=8 {
        bank.set(i, true);
    }
    let frame = encode_heartbeat(0, bank.sync_field());
    assert_eq!(frame.status(), 0x5555);
    assert_eq!(&frame.data[3..], &[0xFF; 5]);
}
