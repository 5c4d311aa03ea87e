use ratatui::{prelude::*, widgets::*};

use crate::app::{App, View};
use crate::form::SettingsField;
use crate::prefs::PreferenceStore;
use crate::timer::Mode;

#[derive(Clone, Copy)]
pub struct Theme {
    pub focus_color: Color,
    pub short_break_color: Color,
    pub long_break_color: Color,
    pub border_color: Color,
    pub accent_color: Color,
}

impl Theme {
    /// The only theme there is.
    pub fn dark() -> Self {
        Self {
            focus_color: Color::Rgb(100, 181, 246),
            short_break_color: Color::Rgb(255, 0, 100),
            long_break_color: Color::Rgb(0, 255, 150),
            border_color: Color::Rgb(0, 200, 255),
            accent_color: Color::Rgb(255, 100, 0),
        }
    }

    pub fn mode_color(&self, mode: Mode) -> Color {
        match mode {
            Mode::Focus => self.focus_color,
            Mode::ShortBreak => self.short_break_color,
            Mode::LongBreak => self.long_break_color,
        }
    }
}

pub fn render_ui<S: PreferenceStore>(f: &mut Frame, app: &App<S>) {
    let theme = Theme::dark();
    match app.view {
        View::Timer => render_timer(f, app, &theme),
        View::Settings => render_settings(f, app, &theme),
        View::Help => render_help(f, &theme),
    }
}

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_color))
}

fn render_timer<S: PreferenceStore>(f: &mut Frame, app: &App<S>, theme: &Theme) {
    let state = app.timer.state();
    let color = theme.mode_color(state.mode);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(f.size());

    // Header
    let now = chrono::Local::now();
    let header = Paragraph::new(Line::from(Span::styled(
        now.format("%A, %B %d  •  %H:%M").to_string(),
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border_color))
            .title(Span::styled(
                " 🍅 POMODOER ",
                Style::default().fg(theme.accent_color).add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(header, chunks[0]);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(3), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(3), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Percentage(10),
        ])
        .split(chunks[1]);

    // Mode tabs
    let titles: Vec<Line> = Mode::ALL.iter().map(|m| Line::from(m.label())).collect();
    f.render_widget(
        Tabs::new(titles)
            .select(state.mode.index())
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(Style::default().fg(color).add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
            .divider("•"),
        centered_rect(60, 100, sections[1]),
    );

    // Countdown
    let clock = vec![
        Line::from(Span::styled(state.mode.name(), Style::default().fg(color).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(state.clock(), Style::default().fg(color).add_modifier(Modifier::BOLD))),
    ];
    f.render_widget(Paragraph::new(clock).alignment(Alignment::Center), sections[3]);

    // Start/pause button label
    let (label, label_color) = if state.is_running {
        ("⏸  Pause", Color::Yellow)
    } else {
        ("▶  Start", Color::Green)
    };
    f.render_widget(
        Paragraph::new(label)
            .style(Style::default().fg(label_color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[5],
    );

    // Session gauge
    f.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .percent((app.timer.progress_ratio() * 100.0) as u16),
        centered_rect(70, 100, sections[7]),
    );

    // Counters
    let counters = format!(
        "Cycle {} of {}  •  {} completed",
        state.cycle_index, app.timer.config().cycles_to_long_break, state.completed_focus
    );
    f.render_widget(
        Paragraph::new(counters).style(Style::default().fg(Color::Gray)).alignment(Alignment::Center),
        sections[9],
    );

    // Daily goal
    f.render_widget(
        Gauge::default()
            .block(
                Block::default()
                    .title(" Daily goal ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .gauge_style(Style::default().fg(theme.accent_color).bg(Color::Black))
            .percent(app.progress.percent())
            .label(app.progress.label()),
        centered_rect(70, 100, sections[11]),
    );

    // Controls
    let controls = vec![
        Line::from(vec![
            span_key("Space", theme), Span::raw(format!(" {}  •  ", if state.is_running { "Pause" } else { "Start" })),
            span_key("R", theme), Span::raw(" Reset  •  "),
            span_key("F/S/L", theme), Span::raw(" Focus/Short/Long"),
        ]),
        Line::from(vec![
            span_key("D", theme), Span::raw(" Settings  •  "),
            span_key("T", theme), Span::raw(" Theme  •  "),
            span_key("H", theme), Span::raw(" Help  •  "),
            span_key("Q", theme), Span::raw(" Quit"),
        ]),
    ];
    f.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn span_key<'a>(text: &'a str, theme: &Theme) -> Span<'a> {
    Span::styled(text, Style::default().fg(theme.accent_color).add_modifier(Modifier::BOLD))
}

fn render_settings<S: PreferenceStore>(f: &mut Frame, app: &App<S>, theme: &Theme) {
    let area = centered_rect(70, 85, f.size());
    let effective = app.effective();

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("⚙️  SETTINGS", Style::default().fg(theme.accent_color).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(
            "  ↑↓/jk: Navigate  •  Enter: Edit  •  Space: Toggle  •  Esc: Back",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    for field in SettingsField::ALL {
        let selected = app.form.field == field;
        let editing = selected && app.form.editing;

        lines.push(Line::from(""));

        if editing {
            let range = field
                .spec()
                .map(|s| format!("  ({}–{})", s.min, s.max))
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled("  > ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(field.label(), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(range, Style::default().fg(Color::DarkGray)),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(app.form.input.as_str(), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled("█", Style::default().fg(Color::Green)),
            ]));
        } else {
            let (prefix, label_style, value_style) = if selected {
                (
                    "  > ",
                    Style::default().fg(theme.accent_color).add_modifier(Modifier::BOLD),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )
            } else {
                ("    ", Style::default().fg(Color::Gray), Style::default().fg(Color::DarkGray))
            };
            lines.push(Line::from(vec![Span::styled(prefix, label_style), Span::styled(field.label(), label_style)]));
            lines.push(Line::from(vec![Span::raw("    "), Span::styled(field.value(&effective), value_style)]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  💾 Saved on change",
        Style::default().fg(Color::Green).add_modifier(Modifier::ITALIC),
    )));

    f.render_widget(Paragraph::new(lines).block(panel(" Settings ", theme)), area);
}

fn render_help(f: &mut Frame, theme: &Theme) {
    let area = centered_rect(70, 85, f.size());

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled("⌨️  KEYBOARD SHORTCUTS", Style::default().fg(theme.accent_color).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("  Timer:"),
        help_line("Space", "Start / pause"),
        help_line("R", "Reset current session"),
        help_line("F / 1", "Focus"),
        help_line("S / 2", "Short break"),
        help_line("L / 3", "Long break"),
        Line::from(""),
        Line::from("  Navigation:"),
        help_line("D", "Open settings"),
        help_line("T", "Toggle theme"),
        help_line("H / ?", "Toggle help"),
        Line::from(""),
        Line::from("  General:"),
        help_line("Q / Esc", "Exit / Go back"),
        help_line("Ctrl+C", "Force quit"),
    ];

    f.render_widget(Paragraph::new(help_text).alignment(Alignment::Left).block(panel(" Help ", theme)), area);
}

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("    "),
        Span::styled(key, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}", desc)),
    ])
}

fn centered_rect(w: u16, h: u16, r: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h) / 2),
            Constraint::Percentage(h),
            Constraint::Percentage((100 - h) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w) / 2),
            Constraint::Percentage(w),
            Constraint::Percentage((100 - w) / 2),
        ])
        .split(v[1])[1]
}
