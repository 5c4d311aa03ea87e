//! Persisted preferences and the clamping rules for every numeric field.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{PrefsError, Result};
use crate::form::SettingsField;
use crate::timer::TimerConfig;

pub const STORAGE_KEY: &str = "pomodoer_prefs_v1";
pub const THEME: &str = "dark";

/// Allowed range and fallback of one numeric setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl FieldSpec {
    pub const FOCUS: FieldSpec = FieldSpec { min: 5, max: 120, default: 25 };
    pub const SHORT_BREAK: FieldSpec = FieldSpec { min: 1, max: 30, default: 5 };
    pub const LONG_BREAK: FieldSpec = FieldSpec { min: 5, max: 60, default: 15 };
    pub const CYCLES: FieldSpec = FieldSpec { min: 1, max: 12, default: 4 };
    pub const DAILY_GOAL: FieldSpec = FieldSpec { min: 1, max: 48, default: 8 };

    pub fn clamp(&self, value: f64) -> u32 {
        if value.is_nan() {
            return self.default;
        }
        value.round().clamp(self.min as f64, self.max as f64) as u32
    }

    /// Parse raw form input. Anything that is not a number gets the default.
    pub fn parse(&self, raw: &str) -> u32 {
        match raw.trim().parse::<f64>() {
            Ok(v) => self.clamp(v),
            Err(_) => self.default,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub focus_duration: u32,
    pub short_break_duration: u32,
    pub long_break_duration: u32,
    pub cycles_to_long_break: u32,
    pub daily_goal: u32,
    pub auto_start_next: bool,
    pub sound_enabled: bool,
    pub theme: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            focus_duration: FieldSpec::FOCUS.default,
            short_break_duration: FieldSpec::SHORT_BREAK.default,
            long_break_duration: FieldSpec::LONG_BREAK.default,
            cycles_to_long_break: FieldSpec::CYCLES.default,
            daily_goal: FieldSpec::DAILY_GOAL.default,
            auto_start_next: false,
            sound_enabled: true,
            theme: THEME.into(),
        }
    }
}

impl Preferences {
    /// Build from a stored JSON document. Keys with the wrong type are skipped
    /// individually so one bad value doesn't discard the rest.
    pub fn from_json(value: &Value) -> Self {
        let mut prefs = Self::default();
        let number = |key: &str, spec: FieldSpec, slot: &mut u32| {
            if let Some(v) = value.get(key).and_then(Value::as_f64) {
                *slot = spec.clamp(v);
            }
        };
        number("focusDuration", FieldSpec::FOCUS, &mut prefs.focus_duration);
        number("shortBreakDuration", FieldSpec::SHORT_BREAK, &mut prefs.short_break_duration);
        number("longBreakDuration", FieldSpec::LONG_BREAK, &mut prefs.long_break_duration);
        number("cyclesToLongBreak", FieldSpec::CYCLES, &mut prefs.cycles_to_long_break);
        number("dailyGoal", FieldSpec::DAILY_GOAL, &mut prefs.daily_goal);

        if let Some(b) = value.get("autoStartNext").and_then(Value::as_bool) {
            prefs.auto_start_next = b;
        }
        if let Some(b) = value.get("soundEnabled").and_then(Value::as_bool) {
            prefs.sound_enabled = b;
        }
        // Only one theme exists; whatever was stored is ignored.
        prefs.theme = THEME.into();
        prefs
    }

    pub fn clamped(mut self) -> Self {
        self.focus_duration = FieldSpec::FOCUS.clamp(self.focus_duration as f64);
        self.short_break_duration = FieldSpec::SHORT_BREAK.clamp(self.short_break_duration as f64);
        self.long_break_duration = FieldSpec::LONG_BREAK.clamp(self.long_break_duration as f64);
        self.cycles_to_long_break = FieldSpec::CYCLES.clamp(self.cycles_to_long_break as f64);
        self.daily_goal = FieldSpec::DAILY_GOAL.clamp(self.daily_goal as f64);
        self.theme = THEME.into();
        self
    }

    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            focus_minutes: self.focus_duration,
            short_break_minutes: self.short_break_duration,
            long_break_minutes: self.long_break_duration,
            cycles_to_long_break: self.cycles_to_long_break,
            auto_start_next: self.auto_start_next,
            sound_enabled: self.sound_enabled,
        }
    }
}

/// Values given for this run only. They shadow the stored preferences but
/// are never saved, unless the user edits the same field in the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub focus_duration: Option<u32>,
    pub short_break_duration: Option<u32>,
    pub long_break_duration: Option<u32>,
    pub cycles_to_long_break: Option<u32>,
    pub daily_goal: Option<u32>,
    pub auto_start_next: Option<bool>,
    pub sound_enabled: Option<bool>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Stored preferences with the overrides laid on top, clamped.
    pub fn apply(&self, stored: &Preferences) -> Preferences {
        let mut prefs = stored.clone();
        if let Some(v) = self.focus_duration { prefs.focus_duration = v; }
        if let Some(v) = self.short_break_duration { prefs.short_break_duration = v; }
        if let Some(v) = self.long_break_duration { prefs.long_break_duration = v; }
        if let Some(v) = self.cycles_to_long_break { prefs.cycles_to_long_break = v; }
        if let Some(v) = self.daily_goal { prefs.daily_goal = v; }
        if let Some(v) = self.auto_start_next { prefs.auto_start_next = v; }
        if let Some(v) = self.sound_enabled { prefs.sound_enabled = v; }
        prefs.clamped()
    }

    /// Move the override for `field` into `stored` and drop it, so a form
    /// edit starts from the value the user sees.
    pub fn adopt(&mut self, field: SettingsField, stored: &mut Preferences) {
        match field {
            SettingsField::FocusDuration => {
                if let Some(v) = self.focus_duration.take() { stored.focus_duration = v; }
            }
            SettingsField::ShortBreakDuration => {
                if let Some(v) = self.short_break_duration.take() { stored.short_break_duration = v; }
            }
            SettingsField::LongBreakDuration => {
                if let Some(v) = self.long_break_duration.take() { stored.long_break_duration = v; }
            }
            SettingsField::CyclesToLongBreak => {
                if let Some(v) = self.cycles_to_long_break.take() { stored.cycles_to_long_break = v; }
            }
            SettingsField::DailyGoal => {
                if let Some(v) = self.daily_goal.take() { stored.daily_goal = v; }
            }
            SettingsField::AutoStartNext => {
                if let Some(v) = self.auto_start_next.take() { stored.auto_start_next = v; }
            }
            SettingsField::SoundEnabled => {
                if let Some(v) = self.sound_enabled.take() { stored.sound_enabled = v; }
            }
            SettingsField::Theme => {}
        }
    }
}

pub trait PreferenceStore {
    /// Stored preferences, or defaults when nothing usable is stored.
    fn load(&self) -> Preferences;
    fn save(&self, prefs: &Preferences) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new() -> Self {
        let file = format!("{STORAGE_KEY}.json");
        let path = match ProjectDirs::from("", "", "pomodoer") {
            Some(pd) => pd.config_dir().join(file),
            None => PathBuf::from(file),
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<Value>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PrefsError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self) -> Preferences {
        match self.read() {
            Ok(Some(value)) => Preferences::from_json(&value),
            Ok(None) => {
                debug!(path = %self.path.display(), "no stored preferences");
                Preferences::default()
            }
            Err(e) => {
                warn!(error = %e, "ignoring unreadable preferences");
                Preferences::default()
            }
        }
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        let io_err = |source| PrefsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let data = serde_json::to_vec_pretty(&prefs.clone().clamped())?;
        fs::write(&self.path, data).map_err(io_err)
    }
}

/// Save, keeping the in-memory preferences authoritative if the write fails.
pub fn persist<S: PreferenceStore + ?Sized>(store: &S, prefs: &Preferences) {
    if let Err(e) = store.save(prefs) {
        warn!(error = %e, "failed to save preferences");
    }
}
