use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::alert::Alert;
use crate::form::{FormChange, SettingsForm};
use crate::prefs::{Overrides, PreferenceStore, Preferences, persist};
use crate::progress::Progress;
use crate::timer::{Mode, SessionTimer, TimerEvent};

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum View {
    Timer,
    Settings,
    Help,
}

/// Terminal front end: owns the timer and routes keys, timer events and
/// preference changes between it and its collaborators.
pub struct App<S: PreferenceStore> {
    pub timer: SessionTimer,
    /// What is saved. Per-run overrides are layered on top by [`App::effective`].
    pub prefs: Preferences,
    pub overrides: Overrides,
    pub form: SettingsForm,
    pub view: View,
    pub progress: Progress,
    pub needs_redraw: bool,
    store: S,
    alert: Box<dyn Alert>,
    events: Receiver<TimerEvent>,
}

impl<S: PreferenceStore> App<S> {
    pub fn new(prefs: Preferences, store: S, alert: Box<dyn Alert>) -> Self {
        Self::with_overrides(prefs, Overrides::default(), store, alert)
    }

    pub fn with_overrides(prefs: Preferences, overrides: Overrides, store: S, alert: Box<dyn Alert>) -> Self {
        let prefs = prefs.clamped();
        let effective = overrides.apply(&prefs);
        let mut timer = SessionTimer::new(effective.timer_config());

        let (tx, events) = mpsc::channel();
        timer.subscribe(tx);

        Self {
            progress: Progress::new(0, effective.daily_goal),
            timer,
            prefs,
            overrides,
            form: SettingsForm::default(),
            view: View::Timer,
            needs_redraw: true,
            store,
            alert,
            events,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Preferences in force for this run: stored values plus overrides.
    pub fn effective(&self) -> Preferences {
        self.overrides.apply(&self.prefs)
    }

    /// Fire due ticks and dispatch whatever the timer emitted.
    pub fn update(&mut self, now: Instant) {
        self.timer.advance_to(now);
        self.drain_events();
    }

    /// How long the loop may block before the next tick is due.
    pub fn poll_timeout(&self, now: Instant, frame: Duration) -> Duration {
        match self.timer.metronome().time_until_due(now) {
            Some(due) => due.min(frame),
            None => frame,
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                TimerEvent::Changed(_) => self.needs_redraw = true,
                TimerEvent::FocusCompleted { total } => {
                    self.progress = Progress::new(total, self.effective().daily_goal);
                    self.needs_redraw = true;
                }
                TimerEvent::EndSound => self.alert.play_end_sound(),
                TimerEvent::SessionEnded { finished, next } => {
                    self.alert.session_ended(finished, next)
                }
            }
        }
    }

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        self.needs_redraw = true;

        let quit = match self.view {
            View::Settings => {
                self.handle_settings_view(key);
                false
            }
            View::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q' | 'h' | '?')) {
                    self.view = View::Timer;
                }
                false
            }
            View::Timer => self.handle_timer_view(key),
        };
        self.drain_events();
        quit
    }

    fn handle_timer_view(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(' ') => self.timer.toggle(),
            KeyCode::Char('r') => self.timer.reset(),
            KeyCode::Char('f' | '1') => self.timer.select_mode(Mode::Focus),
            KeyCode::Char('s' | '2') => self.timer.select_mode(Mode::ShortBreak),
            KeyCode::Char('l' | '3') => self.timer.select_mode(Mode::LongBreak),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('d') => self.view = View::Settings,
            KeyCode::Char('h' | '?') => self.view = View::Help,
            _ => {}
        }
        false
    }

    fn handle_settings_view(&mut self, key: KeyEvent) {
        if self.form.editing {
            match key.code {
                KeyCode::Char(c) => self.form.push(c),
                KeyCode::Backspace => self.form.pop(),
                KeyCode::Enter => {
                    self.overrides.adopt(self.form.field, &mut self.prefs);
                    let change = self.form.commit(&mut self.prefs);
                    self.apply(change);
                }
                KeyCode::Esc => self.form.cancel(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q' | 'd') => self.view = View::Timer,
            KeyCode::Down | KeyCode::Char('j') => self.form.next(),
            KeyCode::Up | KeyCode::Char('k') => self.form.prev(),
            KeyCode::Enter | KeyCode::Char('e') => {
                let effective = self.effective();
                self.form.begin_edit(&effective);
            }
            KeyCode::Char(' ') => {
                self.overrides.adopt(self.form.field, &mut self.prefs);
                let change = self.form.toggle(&mut self.prefs);
                self.apply(change);
            }
            _ => {}
        }
    }

    /// The theme is fixed; the toggle only re-saves it.
    pub fn toggle_theme(&mut self) {
        self.prefs.theme = crate::prefs::THEME.into();
        self.apply(FormChange::Theme);
    }

    fn apply(&mut self, change: FormChange) {
        match change {
            FormChange::None => return,
            FormChange::Duration => {
                let effective = self.effective();
                self.timer.configure(effective.timer_config());
                if !self.timer.state().is_running {
                    self.timer.reset();
                }
                self.progress = Progress::new(self.timer.state().completed_focus, effective.daily_goal);
            }
            FormChange::Flag => self.timer.configure(self.effective().timer_config()),
            FormChange::Theme => {}
        }
        info!(?change, "preferences changed");
        persist(&self.store, &self.prefs);
        debug!(prefs = ?self.prefs, "preferences saved");
    }
}
