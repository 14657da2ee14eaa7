//! End-to-end indicator core: edge capture → monitor → command channel →
//! LED manager, on a simulated millisecond clock.

use crate::mock_hw::{MockLeds, MockSensor, RecordingSink};
use firenode::app::events::AppEvent;
use firenode::app::ports::MonitoredInput;
use firenode::channels::{CommandChannel, CommandSink, submit};
use firenode::drivers::edge_source::capture_edge;
use firenode::error::{Channel, Error};
use firenode::events::EdgeQueue;
use firenode::led::{LedCommand, LedId, LedManager, LedRegistry, LedState, StateKind};
use firenode::monitor::{EventMonitor, MonitorState, SourceKind};
use firenode::pins;

const WINDOW_MS: u32 = 200;
const SLICE_MS: u32 = 10;

fn fire_monitor() -> EventMonitor {
    EventMonitor::new(LedId::Fire, SourceKind::Latched, WINDOW_MS, 200)
}

fn manager() -> LedManager<MockLeds> {
    LedManager::new(LedRegistry::board_default(), MockLeds::new())
}

/// Run the manager loop from `from` to `to` (inclusive) at the LED slice,
/// draining one command per iteration.
fn run_manager<const N: usize>(
    m: &mut LedManager<MockLeds>,
    ch: &CommandChannel<N>,
    from: u32,
    to: u32,
) {
    let mut t = from;
    while t <= to {
        m.step(ch.try_receive(), t);
        t += SLICE_MS;
    }
}

#[test]
fn manager_configures_each_led_pin_once() {
    firenode::drivers::hw_init::init_peripherals().unwrap();
    let m = manager();

    let mut configured = m.driver().configured.clone();
    configured.sort_unstable();
    let mut expected = vec![
        pins::LED_BLUE_GPIO,
        pins::LED_SIM_GPIO,
        pins::LED_FAULT_GPIO,
        pins::LED_FIRE_GPIO,
    ];
    expected.sort_unstable();
    assert_eq!(configured, expected);
    assert!(LedId::ALL.iter().all(|id| m.level(*id) == Some(false)));
}

// ── Scenario A: debounce ──────────────────────────────────────

#[test]
fn edge_inside_window_is_rejected() {
    let ch: CommandChannel<8> = CommandChannel::new();
    let mut sensor = MockSensor::new();
    let mut events = RecordingSink::default();
    let mut mon = EventMonitor::new(LedId::Blue, SourceKind::Momentary, WINDOW_MS, 500);

    assert!(mon.on_edge(0, &ch, &mut sensor, &mut events));
    assert!(!mon.on_edge(150, &ch, &mut sensor, &mut events));

    assert_eq!(mon.accepted(), 1);
    assert_eq!(mon.last_accepted(), Some(0));
    assert_eq!(ch.len(), 1, "only the t=0 edge issued a command");
}

// ── Scenario B: blink cadence ─────────────────────────────────

#[test]
fn fire_blink_toggles_five_times_per_second() {
    let ch: CommandChannel<8> = CommandChannel::new();
    let mut m = manager();

    submit(&ch, LedId::Fire as u8, StateKind::Blink, 200).unwrap();
    run_manager(&mut m, &ch, 0, 1000);

    assert_eq!(m.driver().toggles(pins::LED_FIRE_GPIO), 5);
    assert_eq!(m.state(LedId::Fire), Some(LedState::blink(200)));
}

// ── Scenario C: clearance ─────────────────────────────────────

#[test]
fn clearance_issues_one_off_and_rearms_once() {
    let ch: CommandChannel<8> = CommandChannel::new();
    let mut sensor = MockSensor::new();
    let mut events = RecordingSink::default();
    let mut mon = fire_monitor();

    sensor.asserted = true;
    mon.on_edge(0, &ch, &mut sensor, &mut events);
    assert_eq!(ch.try_receive(), Some(LedCommand::blink(LedId::Fire, 200)));
    assert!(!sensor.armed);

    sensor.asserted = false;
    for t in [100, 200, 300, 400, 500] {
        mon.on_level(t, &ch, &mut sensor, &mut events);
    }

    assert_eq!(ch.try_receive(), Some(LedCommand::off(LedId::Fire)));
    assert_eq!(ch.try_receive(), None);
    assert_eq!(sensor.arm_calls, 1);
    assert_eq!(mon.state(), MonitorState::Idle);
    assert_eq!(
        events.events.last(),
        Some(&AppEvent::ConditionCleared {
            indicator: LedId::Fire
        })
    );
}

// ── Scenario D: command channel overflow ──────────────────────

#[test]
fn full_channel_rejects_submit_and_leaves_registry_alone() {
    let ch: CommandChannel<2> = CommandChannel::new();
    let m = manager();
    let before: Vec<_> = m.registry().iter().copied().collect();

    submit(&ch, LedId::Blue as u8, StateKind::On, 0).unwrap();
    submit(&ch, LedId::Sim as u8, StateKind::On, 0).unwrap();
    assert_eq!(
        submit(&ch, LedId::Fire as u8, StateKind::Blink, 200),
        Err(Error::TransientDrop(Channel::LedCommand))
    );

    let after: Vec<_> = m.registry().iter().copied().collect();
    assert_eq!(before, after);
    assert_eq!(ch.dropped(), 1);
}

// ── Full pipeline ─────────────────────────────────────────────

#[test]
fn fire_alarm_round_trip() {
    let edges: EdgeQueue<8> = EdgeQueue::new();
    let ch: CommandChannel<8> = CommandChannel::new();
    let mut sensor = MockSensor::new();
    let mut events = RecordingSink::default();
    let mut mon = fire_monitor();
    let mut m = manager();

    // Sensor trips at t=1000; the ISR stamps the edge and disarms itself.
    sensor.asserted = true;
    let mut isr_disarms = 0;
    assert!(capture_edge(&edges, 1000, SourceKind::Latched, || isr_disarms += 1));
    assert_eq!(isr_disarms, 1);

    while let Some(t) = edges.pop() {
        mon.on_edge(t, &ch, &mut sensor, &mut events);
    }
    mon.on_level(1000, &ch, &mut sensor, &mut events);
    run_manager(&mut m, &ch, 1000, 1600);

    assert_eq!(m.driver().toggles(pins::LED_FIRE_GPIO), 3);
    assert!(m.state(LedId::Fire).is_some_and(|s| s.is_blinking()));

    // Condition clears; the next poll turns the LED off.
    sensor.asserted = false;
    mon.on_level(1610, &ch, &mut sensor, &mut events);
    run_manager(&mut m, &ch, 1610, 2000);

    assert_eq!(m.state(LedId::Fire), Some(LedState::Off));
    assert_eq!(m.level(LedId::Fire), Some(false));
    assert_eq!(sensor.arm_calls, 1);
    assert!(matches!(
        events.events.first(),
        Some(AppEvent::ConditionRaised {
            indicator: LedId::Fire,
            at_ms: 1000
        })
    ));
}

#[test]
fn retrip_inside_window_still_raises_alarm() {
    let edges: EdgeQueue<8> = EdgeQueue::new();
    let ch: CommandChannel<8> = CommandChannel::new();
    let mut sensor = MockSensor::new();
    let mut events = RecordingSink::default();
    let mut mon = fire_monitor();
    let mut m = manager();

    // Short trip at t=0, cleared on the next poll.
    sensor.asserted = true;
    capture_edge(&edges, 0, SourceKind::Latched, || sensor.disarm());
    while let Some(t) = edges.pop() {
        mon.on_edge(t, &ch, &mut sensor, &mut events);
    }
    sensor.asserted = false;
    assert!(mon.on_level(100, &ch, &mut sensor, &mut events));
    assert!(sensor.armed);
    while ch.try_receive().is_some() {}

    // Real fire at t=150: the ISR disarms, the monitor rejects the edge.
    sensor.asserted = true;
    capture_edge(&edges, 150, SourceKind::Latched, || sensor.disarm());
    while let Some(t) = edges.pop() {
        assert!(!mon.on_edge(t, &ch, &mut sensor, &mut events));
    }
    assert_eq!(mon.state(), MonitorState::Idle);
    assert!(sensor.armed, "line re-armed after the rejected edge");

    // The condition persists: the first poll past the window raises it.
    let mut raised_at = None;
    for t in (160..=1000).step_by(100) {
        if mon.on_level(t, &ch, &mut sensor, &mut events) {
            raised_at = Some(t);
            break;
        }
    }
    assert_eq!(raised_at, Some(260));
    assert_eq!(mon.state(), MonitorState::Active);
    assert!(!sensor.armed);

    run_manager(&mut m, &ch, 260, 660);
    assert_eq!(m.driver().toggles(pins::LED_FIRE_GPIO), 2);
    assert!(m.state(LedId::Fire).is_some_and(|s| s.is_blinking()));
}

#[test]
fn independent_producers_share_channel() {
    let ch: CommandChannel<8> = CommandChannel::new();
    let mut m = manager();

    ch.send(LedCommand::blink(LedId::Fire, 200)).unwrap();
    ch.send(LedCommand::on(LedId::Sim)).unwrap();
    run_manager(&mut m, &ch, 0, 400);

    assert_eq!(m.state(LedId::Sim), Some(LedState::On));
    assert_eq!(m.level(LedId::Sim), Some(true));
    assert!(m.state(LedId::Fire).is_some_and(|s| s.is_blinking()));
}

#[test]
fn unknown_identity_rejected_at_submit() {
    let ch: CommandChannel<2> = CommandChannel::new();
    assert_eq!(
        submit(&ch, 9, StateKind::On, 0),
        Err(Error::UnknownIdentity(9))
    );
    assert!(ch.is_empty());
}
