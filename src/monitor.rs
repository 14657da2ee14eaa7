//! Event monitor — debounced onset, polled clearance.
//!
//! ```text
//!            accepted edge / Blink(alarm), disarm if latched
//!   ┌──────┐ ─────────────────────────────────────────────▶ ┌────────┐
//!   │ Idle │                                                │ Active │
//!   └──────┘ ◀───────────────────────────────────────────── └────────┘
//!            level reads clear / Off, re-arm if latched
//! ```
//!
//! Onset comes from the edge channel; clearance is detected by reading the
//! input level.  Edges inside the debounce window and repeated reads of an
//! unchanged level are no-ops.
//!
//! A command the channel refuses is not lost: the transition still happens
//! and the command is re-sent on the next level poll.
//!
//! The ISR disarms a latched line on every edge, including edges the
//! monitor later rejects or that never reach it because the edge queue was
//! full.  While Idle, a rejected edge re-arms the line, and a level poll
//! that finds a latched input asserted outside the debounce window raises
//! the condition as if its edge had arrived.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, MonitoredInput};
use crate::channels::CommandSink;
use crate::led::{LedCommand, LedId};

/// `true` if an edge at `t` (ms) is far enough from the last accepted one.
///
/// Strict: an edge exactly `window` after the previous one is rejected.
/// Wrapping arithmetic keeps the comparison valid across tick rollover.
pub fn debounce_accepts(last_accepted: Option<u32>, t: u32, window: u32) -> bool {
    match last_accepted {
        None => true,
        Some(last) => t.wrapping_sub(last) > window,
    }
}

/// How the monitored input behaves while its condition persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Stays asserted until the physical condition clears (fire sensor).
    /// The edge interrupt is disarmed while Active.
    Latched,
    /// Short pulse (push button).  The interrupt stays armed; the debounce
    /// window alone filters repeats.
    Momentary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Active,
}

pub struct EventMonitor {
    indicator: LedId,
    kind: SourceKind,
    window_ms: u32,
    blink_ms: u32,
    state: MonitorState,
    last_accepted: Option<u32>,
    /// Command for the current state still has to reach the channel.
    resend: bool,
    accepted: u32,
    bounced: u32,
}

impl EventMonitor {
    pub fn new(indicator: LedId, kind: SourceKind, window_ms: u32, blink_ms: u32) -> Self {
        Self {
            indicator,
            kind,
            window_ms,
            blink_ms,
            state: MonitorState::Idle,
            last_accepted: None,
            resend: false,
            accepted: 0,
            bounced: 0,
        }
    }

    /// The fire sensor: latched source, FIRE indicator.
    pub fn fire(config: &crate::config::NodeConfig) -> Self {
        Self::new(
            LedId::Fire,
            SourceKind::Latched,
            config.debounce_ms,
            config.alarm_blink_ms,
        )
    }

    /// Handle one edge timestamp (ms).  Returns `true` if it was accepted.
    pub fn on_edge(
        &mut self,
        at_ms: u32,
        sink: &impl CommandSink,
        input: &mut impl MonitoredInput,
        events: &mut impl EventSink,
    ) -> bool {
        if !debounce_accepts(self.last_accepted, at_ms, self.window_ms) {
            self.bounced = self.bounced.wrapping_add(1);
            debug!("MON: edge at {}ms inside debounce window", at_ms);
            if self.kind == SourceKind::Latched && self.state == MonitorState::Idle {
                // The ISR disarmed the line for an edge that raised nothing.
                input.arm();
            }
            return false;
        }
        self.last_accepted = Some(at_ms);
        self.accepted = self.accepted.wrapping_add(1);

        if self.state == MonitorState::Active {
            // Already flagged and indicated.
            return true;
        }

        self.raise(at_ms, sink, input, events);
        true
    }

    /// Poll the input level at `now_ms`.  Returns `true` when the state
    /// changed on this call.
    ///
    /// Active: a cleared input issues `Off` and moves to Idle.  Idle: a
    /// latched input found asserted outside the debounce window is raised,
    /// covering edges the ISR captured but the monitor never acted on.
    pub fn on_level(
        &mut self,
        now_ms: u32,
        sink: &impl CommandSink,
        input: &mut impl MonitoredInput,
        events: &mut impl EventSink,
    ) -> bool {
        if self.state == MonitorState::Idle {
            return self.recover_onset(now_ms, sink, input, events);
        }

        if input.is_asserted() {
            if self.resend {
                self.resend =
                    !self.send(LedCommand::blink(self.indicator, self.blink_ms), sink, events);
            }
            return false;
        }

        if !self.send(LedCommand::off(self.indicator), sink, events) {
            // Stay Active; the next poll retries the Off.
            return false;
        }
        self.state = MonitorState::Idle;
        self.resend = false;
        if self.kind == SourceKind::Latched {
            input.arm();
        }
        info!("MON: {} cleared", self.indicator);
        events.emit(&AppEvent::ConditionCleared {
            indicator: self.indicator,
        });
        true
    }

    fn recover_onset(
        &mut self,
        now_ms: u32,
        sink: &impl CommandSink,
        input: &mut impl MonitoredInput,
        events: &mut impl EventSink,
    ) -> bool {
        if self.kind != SourceKind::Latched
            || !debounce_accepts(self.last_accepted, now_ms, self.window_ms)
            || !input.is_asserted()
        {
            return false;
        }
        warn!("MON: {} asserted without a handled edge", self.indicator);
        self.last_accepted = Some(now_ms);
        self.accepted = self.accepted.wrapping_add(1);
        self.raise(now_ms, sink, input, events);
        true
    }

    /// Idle → Active: disarm if latched, report, request the alarm blink.
    fn raise(
        &mut self,
        at_ms: u32,
        sink: &impl CommandSink,
        input: &mut impl MonitoredInput,
        events: &mut impl EventSink,
    ) {
        if self.kind == SourceKind::Latched {
            input.disarm();
        }
        self.state = MonitorState::Active;
        info!("MON: {} raised at {}ms", self.indicator, at_ms);
        events.emit(&AppEvent::ConditionRaised {
            indicator: self.indicator,
            at_ms,
        });
        self.resend = !self.send(LedCommand::blink(self.indicator, self.blink_ms), sink, events);
    }

    fn send(&self, cmd: LedCommand, sink: &impl CommandSink, events: &mut impl EventSink) -> bool {
        match sink.send(cmd) {
            Ok(()) => true,
            Err(error) => {
                warn!("MON: {} command dropped: {}", self.indicator, error);
                events.emit(&AppEvent::CommandDropped {
                    indicator: self.indicator,
                    error,
                });
                false
            }
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn indicator(&self) -> LedId {
        self.indicator
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn last_accepted(&self) -> Option<u32> {
        self.last_accepted
    }

    /// Edges accepted since boot.
    pub fn accepted(&self) -> u32 {
        self.accepted
    }

    /// Edges rejected by the debounce window since boot.
    pub fn bounced(&self) -> u32 {
        self.bounced
    }
}
