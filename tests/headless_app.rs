use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::tempdir;

use pomodoer::alert::Alert;
use pomodoer::app::{App, View};
use pomodoer::form::SettingsField;
use pomodoer::prefs::{JsonFileStore, Overrides, PreferenceStore, Preferences};
use pomodoer::Mode;

// Headless runs of the terminal front end: keys go straight into App, time is
// simulated through App::update, and preferences live in a temp dir.

#[derive(Clone, Default)]
struct RecordingAlert {
    calls: Rc<RefCell<Vec<String>>>,
}

impl Alert for RecordingAlert {
    fn play_end_sound(&self) {
        self.calls.borrow_mut().push("sound".into());
    }

    fn session_ended(&self, finished: Mode, next: Mode) {
        self.calls
            .borrow_mut()
            .push(format!("{} -> {}", finished.label(), next.label()));
    }
}

fn press(app: &mut App<JsonFileStore>, code: KeyCode) -> bool {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_str(app: &mut App<JsonFileStore>, s: &str) {
    for c in s.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn select_field(app: &mut App<JsonFileStore>, field: SettingsField) {
    while app.form.field != field {
        press(app, KeyCode::Down);
    }
}

#[test]
fn non_numeric_focus_input_falls_back_to_default() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::with_path(dir.path().join("prefs.json"));
    let prefs = Preferences {
        focus_duration: 40,
        ..Preferences::default()
    };
    let mut app = App::new(prefs, store, Box::new(RecordingAlert::default()));
    assert_eq!(app.timer.state().remaining_secs, 2400);

    press(&mut app, KeyCode::Char('d'));
    assert_eq!(app.view, View::Settings);
    press(&mut app, KeyCode::Enter);
    assert!(app.form.editing);
    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Backspace);
    type_str(&mut app, "abc");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.prefs.focus_duration, 25);
    assert_eq!(app.timer.state().remaining_secs, 1500);
    assert_eq!(app.store().load().focus_duration, 25);
}

#[test]
fn committed_values_are_clamped_and_persisted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let mut app = App::new(
        Preferences::default(),
        JsonFileStore::with_path(&path),
        Box::new(RecordingAlert::default()),
    );

    press(&mut app, KeyCode::Char('d'));
    select_field(&mut app, SettingsField::ShortBreakDuration);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Backspace);
    type_str(&mut app, "45");
    press(&mut app, KeyCode::Enter);

    select_field(&mut app, SettingsField::AutoStartNext);
    press(&mut app, KeyCode::Char(' '));

    let stored = JsonFileStore::with_path(&path).load();
    assert_eq!(stored.short_break_duration, 30);
    assert!(stored.auto_start_next);
    assert!(app.timer.config().auto_start_next);
}

#[test]
fn duration_change_while_running_waits_for_reset() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::with_path(dir.path().join("prefs.json"));
    let mut app = App::new(Preferences::default(), store, Box::new(RecordingAlert::default()));

    let t0 = Instant::now();
    app.timer.start_at(t0);
    app.update(t0 + Duration::from_secs(3));
    assert_eq!(app.timer.state().remaining_secs, 1497);

    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Backspace);
    type_str(&mut app, "50");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.timer.state().remaining_secs, 1497);
    assert!(app.timer.state().is_running);

    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('r'));
    assert_eq!(app.timer.state().remaining_secs, 3000);
    assert!(!app.timer.state().is_running);
}

#[test]
fn session_end_reaches_alert_and_progress() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::with_path(dir.path().join("prefs.json"));
    let alert = RecordingAlert::default();
    let calls = Rc::clone(&alert.calls);
    let prefs = Preferences {
        daily_goal: 2,
        ..Preferences::default()
    };
    let mut app = App::new(prefs, store, Box::new(alert));

    // Three focus sessions against a goal of two.
    for _ in 0..3 {
        app.timer.select_mode(Mode::Focus);
        app.timer.start();
        for _ in 0..=1500 {
            app.timer.tick();
        }
        app.update(Instant::now());
    }

    assert_eq!(app.timer.state().completed_focus, 3);
    assert_eq!(app.progress.label(), "2 / 2");
    assert_eq!(app.progress.percent(), 100);
    assert_eq!(calls.borrow()[0], "sound");
    assert_eq!(calls.borrow()[1], "Focus -> Short Break");
    assert_eq!(calls.borrow().len(), 6);
}

#[test]
fn muted_sessions_only_notify() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::with_path(dir.path().join("prefs.json"));
    let alert = RecordingAlert::default();
    let calls = Rc::clone(&alert.calls);
    let mut app = App::new(Preferences::default(), store, Box::new(alert));

    press(&mut app, KeyCode::Char('d'));
    select_field(&mut app, SettingsField::SoundEnabled);
    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Esc);

    press(&mut app, KeyCode::Char('2'));
    press(&mut app, KeyCode::Char(' '));
    for _ in 0..=300 {
        app.timer.tick();
    }
    app.update(Instant::now());

    assert_eq!(*calls.borrow(), vec!["Short Break -> Focus".to_string()]);
}

#[test]
fn keys_drive_mode_and_start_pause() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::with_path(dir.path().join("prefs.json"));
    let mut app = App::new(Preferences::default(), store, Box::new(RecordingAlert::default()));

    press(&mut app, KeyCode::Char('l'));
    assert_eq!(app.timer.state().mode, Mode::LongBreak);
    assert_eq!(app.timer.state().remaining_secs, 900);

    press(&mut app, KeyCode::Char(' '));
    assert!(app.timer.state().is_running);
    press(&mut app, KeyCode::Char(' '));
    assert!(!app.timer.state().is_running);

    press(&mut app, KeyCode::Char(' '));
    press(&mut app, KeyCode::Char('f'));
    assert_eq!(app.timer.state().mode, Mode::Focus);
    assert!(!app.timer.state().is_running);
    assert!(!app.timer.metronome().is_armed());
}

#[test]
fn theme_toggle_keeps_dark_and_saves() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, r#"{"theme": "light", "dailyGoal": 3}"#).unwrap();
    let store = JsonFileStore::with_path(&path);
    let prefs = store.load();
    assert_eq!(prefs.theme, "dark");

    let mut app = App::new(prefs, store, Box::new(RecordingAlert::default()));
    press(&mut app, KeyCode::Char('t'));
    assert_eq!(app.prefs.theme, "dark");

    let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["theme"], "dark");
    assert_eq!(raw["dailyGoal"], 3);
}

#[test]
fn command_line_overrides_are_not_saved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let store = JsonFileStore::with_path(&path);
    store.save(&Preferences::default()).unwrap();

    let overrides = Overrides {
        focus_duration: Some(50),
        auto_start_next: Some(true),
        ..Overrides::default()
    };
    let mut app = App::with_overrides(store.load(), overrides, store, Box::new(RecordingAlert::default()));
    assert_eq!(app.timer.state().remaining_secs, 3000);
    assert!(app.timer.config().auto_start_next);

    press(&mut app, KeyCode::Char('t'));

    let stored = JsonFileStore::with_path(&path).load();
    assert_eq!(stored.focus_duration, 25);
    assert!(!stored.auto_start_next);
    assert_eq!(app.timer.config().focus_minutes, 50);
}

#[test]
fn editing_an_overridden_field_saves_the_edit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let overrides = Overrides {
        focus_duration: Some(50),
        short_break_duration: Some(10),
        ..Overrides::default()
    };
    let mut app = App::with_overrides(
        Preferences::default(),
        overrides,
        JsonFileStore::with_path(&path),
        Box::new(RecordingAlert::default()),
    );

    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.form.input, "50");
    press(&mut app, KeyCode::Backspace);
    type_str(&mut app, "5");
    press(&mut app, KeyCode::Enter);

    let stored = JsonFileStore::with_path(&path).load();
    assert_eq!(stored.focus_duration, 55);
    assert_eq!(stored.short_break_duration, 5);
    assert_eq!(app.timer.config().short_break_minutes, 10);
    assert_eq!(app.timer.state().remaining_secs, 3300);
}

#[test]
fn toggling_sound_while_paused_keeps_the_countdown() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::with_path(dir.path().join("prefs.json"));
    let mut app = App::new(Preferences::default(), store, Box::new(RecordingAlert::default()));

    let t0 = Instant::now();
    app.timer.start_at(t0);
    app.update(t0 + Duration::from_secs(7));
    press(&mut app, KeyCode::Char(' '));
    assert!(!app.timer.state().is_running);
    assert_eq!(app.timer.state().remaining_secs, 1493);

    press(&mut app, KeyCode::Char('d'));
    select_field(&mut app, SettingsField::SoundEnabled);
    press(&mut app, KeyCode::Char(' '));

    assert!(!app.timer.config().sound_enabled);
    assert_eq!(app.timer.state().remaining_secs, 1493);
}

#[test]
fn lowering_the_goal_caps_progress() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::with_path(dir.path().join("prefs.json"));
    let mut app = App::new(Preferences::default(), store, Box::new(RecordingAlert::default()));

    for _ in 0..3 {
        app.timer.select_mode(Mode::Focus);
        app.timer.start();
        for _ in 0..=1500 {
            app.timer.tick();
        }
        app.update(Instant::now());
    }
    assert_eq!(app.progress.label(), "3 / 8");

    press(&mut app, KeyCode::Char('d'));
    select_field(&mut app, SettingsField::DailyGoal);
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Backspace);
    type_str(&mut app, "2");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.timer.state().completed_focus, 3);
    assert_eq!(app.progress.label(), "2 / 2");
    assert_eq!(app.progress.percent(), 100);
}
