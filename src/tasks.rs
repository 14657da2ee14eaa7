//! Firmware runtime — cooperative indicator tasks plus the network thread.
//!
//! ```text
//!  ┌─────────────────────────────── Core 1 ───────────────────────────────┐
//!  │  indicator thread                                                    │
//!  │  futures_lite::block_on ── edge_executor::LocalExecutor              │
//!  │    ┌───────────────────────────┐   ┌──────────────────────────────┐  │
//!  │    │ event monitor             │   │ LED manager                  │  │
//!  │    │ FIRE_EDGES ≤100ms wait    │   │ LED_COMMANDS try_receive     │  │
//!  │    │ level poll, 100ms slice   │   │ blink tick, 10ms slice       │  │
//!  │    └───────────────────────────┘   └──────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────────────────────┘
//!  ┌─────────────────────────────── Core 0 ───────────────────────────────┐
//!  │  netprobe thread: blocking probe → one LED command → sleep(delay)    │
//!  └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No loop here terminates.  Every wait is bounded: a timed receive or a
//! fixed-duration sleep.

use core::time::Duration;

use log::info;

use crate::adapters::time::{TickClock, ticks_to_ms};
use crate::app::ports::{EventSink, LedDriver, MonitoredInput, ProbePort};
use crate::channels::{CommandChannel, CommandSink};
use crate::config::NodeConfig;
use crate::connectivity::ConnectivityWatchdog;
use crate::diagnostics;
use crate::drivers::task_pin::{self, CONNECTIVITY_TASK, INDICATOR_TASK};
use crate::events::EdgeQueue;
use crate::led::LedManager;
use crate::monitor::EventMonitor;

/// LED manager loop: drain at most one command, advance blink timers,
/// sleep one slice.
pub async fn led_manager_task<D: LedDriver, const N: usize>(
    mut manager: LedManager<D>,
    commands: &CommandChannel<N>,
    clock: &TickClock,
    slice: Duration,
) {
    info!("LED: manager running ({}ms slice)", slice.as_millis());
    loop {
        manager.step(commands.try_receive(), clock.now_ms());
        if let Some(total) = manager.unreported_rejections() {
            diagnostics::report_rejected(total);
        }
        async_io_mini::Timer::after(slice).await;
    }
}

/// Event monitor loop: bounded wait for an edge, level poll, sleep one
/// slice.
pub async fn event_monitor_task<I, E, S, const N: usize>(
    mut monitor: EventMonitor,
    mut input: I,
    mut events: E,
    edges: &EdgeQueue<N>,
    sink: &S,
    clock: &TickClock,
    config: &NodeConfig,
) where
    I: MonitoredInput,
    E: EventSink,
    S: CommandSink,
{
    let wait = config.monitor_wait();
    let slice = config.monitor_slice();
    let task = monitor.indicator().name();
    info!("MON: {} monitor running ({:?})", task, monitor.kind());
    loop {
        if let Some(ticks) = edges.receive_timeout(wait).await {
            if monitor.on_edge(ticks_to_ms(ticks), sink, &mut input, &mut events) {
                diagnostics::report_stack(task);
            }
        }
        if monitor.on_level(clock.now_ms(), sink, &mut input, &mut events) {
            diagnostics::report_stack(task);
            diagnostics::report_drops();
        }
        async_io_mini::Timer::after(slice).await;
    }
}

/// Run the LED manager and one event monitor on a local executor.  Never
/// returns.
pub fn run_indicator<D, I, E, const N: usize, const M: usize>(
    config: &NodeConfig,
    manager: LedManager<D>,
    monitor: EventMonitor,
    input: I,
    events: E,
    edges: &'static EdgeQueue<N>,
    commands: &'static CommandChannel<M>,
) where
    D: LedDriver,
    I: MonitoredInput,
    E: EventSink,
{
    let clock = TickClock::new();
    let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();

    executor
        .spawn(led_manager_task(manager, commands, &clock, config.led_slice()))
        .detach();
    executor
        .spawn(event_monitor_task(
            monitor,
            input,
            events,
            edges,
            commands,
            &clock,
            config,
        ))
        .detach();

    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
}

/// Spawn [`run_indicator`] on its own pinned thread.
pub fn spawn_indicator<D, I, E, const N: usize, const M: usize>(
    config: NodeConfig,
    manager: LedManager<D>,
    monitor: EventMonitor,
    input: I,
    events: E,
    edges: &'static EdgeQueue<N>,
    commands: &'static CommandChannel<M>,
) -> std::thread::JoinHandle<()>
where
    D: LedDriver + Send + 'static,
    I: MonitoredInput + Send + 'static,
    E: EventSink + Send + 'static,
{
    task_pin::spawn_on_core(INDICATOR_TASK, move || {
        run_indicator(&config, manager, monitor, input, events, edges, commands);
    })
}

/// Connectivity watchdog loop.  Blocking; runs on its own thread.
pub fn run_connectivity<P, E, S>(mut watchdog: ConnectivityWatchdog<P>, sink: &S, mut events: E) -> !
where
    P: ProbePort,
    E: EventSink,
    S: CommandSink,
{
    info!("PROBE: watchdog running");
    loop {
        let delay = watchdog.run_once(sink, &mut events);
        diagnostics::report_stack("netprobe");
        std::thread::sleep(delay);
    }
}

pub fn spawn_connectivity<P, E, const M: usize>(
    watchdog: ConnectivityWatchdog<P>,
    commands: &'static CommandChannel<M>,
    events: E,
) -> std::thread::JoinHandle<()>
where
    P: ProbePort + Send + 'static,
    E: EventSink + Send + 'static,
{
    task_pin::spawn_on_core(CONNECTIVITY_TASK, move || {
        run_connectivity(watchdog, commands, events);
    })
}
