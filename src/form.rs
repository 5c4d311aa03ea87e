use crate::prefs::{FieldSpec, Preferences, THEME};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SettingsField {
    FocusDuration,
    ShortBreakDuration,
    LongBreakDuration,
    CyclesToLongBreak,
    DailyGoal,
    AutoStartNext,
    SoundEnabled,
    Theme,
}

impl SettingsField {
    pub const ALL: [SettingsField; 8] = [
        Self::FocusDuration,
        Self::ShortBreakDuration,
        Self::LongBreakDuration,
        Self::CyclesToLongBreak,
        Self::DailyGoal,
        Self::AutoStartNext,
        Self::SoundEnabled,
        Self::Theme,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::FocusDuration => Self::ShortBreakDuration,
            Self::ShortBreakDuration => Self::LongBreakDuration,
            Self::LongBreakDuration => Self::CyclesToLongBreak,
            Self::CyclesToLongBreak => Self::DailyGoal,
            Self::DailyGoal => Self::AutoStartNext,
            Self::AutoStartNext => Self::SoundEnabled,
            Self::SoundEnabled => Self::Theme,
            Self::Theme => Self::FocusDuration,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::FocusDuration => Self::Theme,
            Self::ShortBreakDuration => Self::FocusDuration,
            Self::LongBreakDuration => Self::ShortBreakDuration,
            Self::CyclesToLongBreak => Self::LongBreakDuration,
            Self::DailyGoal => Self::CyclesToLongBreak,
            Self::AutoStartNext => Self::DailyGoal,
            Self::SoundEnabled => Self::AutoStartNext,
            Self::Theme => Self::SoundEnabled,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FocusDuration => "🎯 Focus",
            Self::ShortBreakDuration => "☕ Short Break",
            Self::LongBreakDuration => "🌴 Long Break",
            Self::CyclesToLongBreak => "🔄 Cycles Before Long Break",
            Self::DailyGoal => "🏁 Daily Goal",
            Self::AutoStartNext => "▶️  Auto-Start Next",
            Self::SoundEnabled => "🔔 Sound",
            Self::Theme => "🎨 Theme",
        }
    }

    /// Clamping rule for numeric fields; `None` for checkboxes and the theme.
    pub fn spec(self) -> Option<FieldSpec> {
        match self {
            Self::FocusDuration => Some(FieldSpec::FOCUS),
            Self::ShortBreakDuration => Some(FieldSpec::SHORT_BREAK),
            Self::LongBreakDuration => Some(FieldSpec::LONG_BREAK),
            Self::CyclesToLongBreak => Some(FieldSpec::CYCLES),
            Self::DailyGoal => Some(FieldSpec::DAILY_GOAL),
            _ => None,
        }
    }

    pub fn value(self, prefs: &Preferences) -> String {
        let on_off = |b: bool| String::from(if b { "ON" } else { "OFF" });
        match self {
            Self::FocusDuration => format!("{} min", prefs.focus_duration),
            Self::ShortBreakDuration => format!("{} min", prefs.short_break_duration),
            Self::LongBreakDuration => format!("{} min", prefs.long_break_duration),
            Self::CyclesToLongBreak => format!("{} sessions", prefs.cycles_to_long_break),
            Self::DailyGoal => format!("{} sessions", prefs.daily_goal),
            Self::AutoStartNext => on_off(prefs.auto_start_next),
            Self::SoundEnabled => on_off(prefs.sound_enabled),
            Self::Theme => format!("< {} >", prefs.theme),
        }
    }

    fn raw(self, prefs: &Preferences) -> Option<u32> {
        match self {
            Self::FocusDuration => Some(prefs.focus_duration),
            Self::ShortBreakDuration => Some(prefs.short_break_duration),
            Self::LongBreakDuration => Some(prefs.long_break_duration),
            Self::CyclesToLongBreak => Some(prefs.cycles_to_long_break),
            Self::DailyGoal => Some(prefs.daily_goal),
            _ => None,
        }
    }

    fn slot(self, prefs: &mut Preferences) -> Option<&mut u32> {
        match self {
            Self::FocusDuration => Some(&mut prefs.focus_duration),
            Self::ShortBreakDuration => Some(&mut prefs.short_break_duration),
            Self::LongBreakDuration => Some(&mut prefs.long_break_duration),
            Self::CyclesToLongBreak => Some(&mut prefs.cycles_to_long_break),
            Self::DailyGoal => Some(&mut prefs.daily_goal),
            _ => None,
        }
    }
}

/// What a form interaction changed.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FormChange {
    None,
    /// A numeric value was committed (possibly clamped).
    Duration,
    /// A checkbox flipped.
    Flag,
    Theme,
}

#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub field: SettingsField,
    pub editing: bool,
    pub input: String,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self {
            field: SettingsField::FocusDuration,
            editing: false,
            input: String::new(),
        }
    }
}

impl SettingsForm {
    pub fn next(&mut self) {
        self.field = self.field.next();
    }

    pub fn prev(&mut self) {
        self.field = self.field.prev();
    }

    /// Open the selected numeric field for editing, pre-filled with its value.
    pub fn begin_edit(&mut self, prefs: &Preferences) -> bool {
        match self.field.raw(prefs) {
            Some(v) => {
                self.input = v.to_string();
                self.editing = true;
                true
            }
            None => false,
        }
    }

    pub fn push(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop(&mut self) {
        self.input.pop();
    }

    pub fn cancel(&mut self) {
        self.editing = false;
        self.input.clear();
    }

    /// Clamp the edit buffer into the selected field.
    pub fn commit(&mut self, prefs: &mut Preferences) -> FormChange {
        if !self.editing {
            return FormChange::None;
        }
        let field = self.field;
        let change = match (field.spec(), field.slot(prefs)) {
            (Some(spec), Some(slot)) => {
                *slot = spec.parse(&self.input);
                FormChange::Duration
            }
            _ => FormChange::None,
        };
        self.cancel();
        change
    }

    /// Space on a checkbox or the theme row.
    pub fn toggle(&mut self, prefs: &mut Preferences) -> FormChange {
        match self.field {
            SettingsField::AutoStartNext => {
                prefs.auto_start_next = !prefs.auto_start_next;
                FormChange::Flag
            }
            SettingsField::SoundEnabled => {
                prefs.sound_enabled = !prefs.sound_enabled;
                FormChange::Flag
            }
            SettingsField::Theme => {
                prefs.theme = THEME.into();
                FormChange::Theme
            }
            _ => FormChange::None,
        }
    }
}
