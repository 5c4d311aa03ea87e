//! Focus / break session state machine.
//!
//! A [`SessionTimer`] owns the only [`SessionState`] in the program and the
//! [`Metronome`] that drives it. Collaborators never mutate the state; they
//! read it through [`SessionTimer::state`] or receive snapshots by
//! subscribing a [`TimerListener`].
//!
//! ```text
//! Focus --(expiry, cycle < N)--> ShortBreak --(expiry)--> Focus
//! Focus --(expiry, cycle >= N)--> LongBreak --(expiry)--> Focus
//! ```

use std::sync::mpsc::Sender;
use std::time::Instant;

use tracing::{debug, info};

use crate::ticker::Metronome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Focus,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Focus, Mode::ShortBreak, Mode::LongBreak];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Focus => "🎯 FOCUS",
            Self::ShortBreak => "☕ SHORT BREAK",
            Self::LongBreak => "🌴 LONG BREAK",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Focus => "Focus",
            Self::ShortBreak => "Short Break",
            Self::LongBreak => "Long Break",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Focus => 0,
            Self::ShortBreak => 1,
            Self::LongBreak => 2,
        }
    }
}

/// Durations (minutes) and flags the state machine reads.
///
/// Values are expected to be in range already; see [`crate::prefs::FieldSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub cycles_to_long_break: u32,
    pub auto_start_next: bool,
    pub sound_enabled: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            cycles_to_long_break: 4,
            auto_start_next: false,
            sound_enabled: true,
        }
    }
}

impl TimerConfig {
    pub fn duration_secs(&self, mode: Mode) -> u32 {
        let minutes = match mode {
            Mode::Focus => self.focus_minutes,
            Mode::ShortBreak => self.short_break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        };
        minutes.saturating_mul(60)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub mode: Mode,
    pub remaining_secs: u32,
    pub is_running: bool,
    /// Focus sessions completed since the last long break, starting at 1.
    pub cycle_index: u32,
    pub completed_focus: u32,
}

impl SessionState {
    fn new(config: &TimerConfig) -> Self {
        Self {
            mode: Mode::Focus,
            remaining_secs: config.duration_secs(Mode::Focus),
            is_running: false,
            cycle_index: 1,
            completed_focus: 0,
        }
    }

    /// `mm:ss`; minutes keep counting past 59.
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Mode, remaining time or the running flag changed.
    Changed(SessionState),
    FocusCompleted { total: u32 },
    /// Only sent when sound is enabled.
    EndSound,
    SessionEnded { finished: Mode, next: Mode },
}

pub trait TimerListener {
    fn on_event(&mut self, event: &TimerEvent);
}

impl<F: FnMut(&TimerEvent)> TimerListener for F {
    fn on_event(&mut self, event: &TimerEvent) {
        self(event)
    }
}

impl TimerListener for Sender<TimerEvent> {
    fn on_event(&mut self, event: &TimerEvent) {
        if let Err(e) = self.send(event.clone()) {
            debug!(error = %e, "timer event receiver gone");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub struct SessionTimer {
    config: TimerConfig,
    state: SessionState,
    metronome: Metronome,
    listeners: Vec<(ListenerId, Box<dyn TimerListener>)>,
    next_listener: u64,
}

impl SessionTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            state: SessionState::new(&config),
            config,
            metronome: Metronome::default(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn metronome(&self) -> &Metronome {
        &self.metronome
    }

    pub fn total_secs(&self) -> u32 {
        self.config.duration_secs(self.state.mode)
    }

    /// Elapsed fraction of the current session, 0.0 ..= 1.0.
    pub fn progress_ratio(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 1.0;
        }
        (1.0 - self.state.remaining_secs as f64 / total as f64).clamp(0.0, 1.0)
    }

    // ── Listeners ────────────────────────────────────────────────────

    pub fn subscribe<L: TimerListener + 'static>(&mut self, listener: L) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: TimerEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener.on_event(&event);
        }
    }

    fn changed(&mut self) {
        let snapshot = self.state;
        self.emit(TimerEvent::Changed(snapshot));
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the configuration. The running countdown is not touched; new
    /// durations apply on the next `select_mode` or `reset`.
    pub fn configure(&mut self, config: TimerConfig) {
        self.config = config;
    }

    pub fn select_mode(&mut self, mode: Mode) {
        self.metronome.cancel();
        self.state.is_running = false;
        self.state.mode = mode;
        self.state.remaining_secs = self.config.duration_secs(mode);
        debug!(?mode, remaining = self.state.remaining_secs, "mode selected");
        self.changed();
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Start counting with the first tick due one period after `at`.
    pub fn start_at(&mut self, at: Instant) {
        if self.state.is_running {
            return;
        }
        self.state.is_running = true;
        self.metronome.arm(at);
        debug!(mode = ?self.state.mode, remaining = self.state.remaining_secs, "timer started");
        self.changed();
    }

    pub fn stop(&mut self) {
        if !self.state.is_running {
            return;
        }
        self.metronome.cancel();
        self.state.is_running = false;
        debug!(remaining = self.state.remaining_secs, "timer paused");
        self.changed();
    }

    /// Start/pause button.
    pub fn toggle(&mut self) {
        if self.state.is_running {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn reset(&mut self) {
        self.stop();
        self.state.remaining_secs = self.total_secs();
        self.changed();
    }

    /// One second of countdown. Ignored while paused.
    pub fn tick(&mut self) {
        if self.state.is_running {
            self.fire(Instant::now());
        }
    }

    /// Fire every tick the metronome has due at `now`, in order.
    pub fn advance_to(&mut self, now: Instant) {
        while let Some(at) = self.metronome.take_due(now) {
            self.fire(at);
        }
    }

    fn fire(&mut self, at: Instant) {
        if self.state.remaining_secs == 0 {
            self.session_end(at);
            return;
        }
        self.state.remaining_secs -= 1;
        self.changed();
    }

    fn session_end(&mut self, at: Instant) {
        let finished = self.state.mode;
        self.stop();

        if self.config.sound_enabled {
            self.emit(TimerEvent::EndSound);
        }

        let next = match finished {
            Mode::Focus => {
                self.state.completed_focus += 1;
                let total = self.state.completed_focus;
                self.emit(TimerEvent::FocusCompleted { total });

                if self.state.cycle_index >= self.config.cycles_to_long_break {
                    self.state.cycle_index = 1;
                    Mode::LongBreak
                } else {
                    self.state.cycle_index += 1;
                    Mode::ShortBreak
                }
            }
            Mode::ShortBreak | Mode::LongBreak => Mode::Focus,
        };
        self.select_mode(next);

        info!(
            finished = finished.label(),
            next = next.label(),
            completed = self.state.completed_focus,
            cycle = self.state.cycle_index,
            "session ended"
        );
        self.emit(TimerEvent::SessionEnded { finished, next });

        if self.config.auto_start_next {
            self.start_at(at);
        }
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}
