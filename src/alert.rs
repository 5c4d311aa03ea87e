use std::path::Path;
use std::io;
use std::process::{Command, ExitStatus, Stdio};

use notify_rust::{Notification, Urgency};
use tracing::debug;

use crate::timer::Mode;

const SOUNDS: [(&str, &str); 3] = [
    ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
    ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
    ("aplay", "/usr/share/sounds/generic.wav"),
];

/// Audio and notification side of a session ending. Implementations must not
/// fail loudly: the countdown carries on regardless.
pub trait Alert {
    fn play_end_sound(&self);
    fn session_ended(&self, finished: Mode, next: Mode);
}

/// Run the player to completion so the child is reaped.
fn play(cmd: &str, file: &str) -> io::Result<ExitStatus> {
    Command::new(cmd)
        .arg(file)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopAlert;

impl Alert for DesktopAlert {
    fn play_end_sound(&self) {
        std::thread::spawn(|| {
            let Some((cmd, file)) = SOUNDS.iter().find(|(_, f)| Path::new(f).exists()) else {
                debug!("no end-of-session sound file found");
                return;
            };
            match play(cmd, file) {
                Ok(status) if !status.success() => debug!(%status, cmd, "sound player exited with failure"),
                Ok(_) => {}
                Err(e) => debug!(error = %e, cmd, "sound playback failed"),
            }
        });
    }

    fn session_ended(&self, finished: Mode, next: Mode) {
        let (title, body) = match (finished, next) {
            (Mode::Focus, Mode::LongBreak) => ("Long Break Time! 🌴", "Great work! Take a longer break."),
            (Mode::Focus, _) => ("Break Time! ☕", "Time for a short break."),
            _ => ("Back to Work! 🎯", "Let's focus on your next session."),
        };
        if let Err(e) = Notification::new()
            .summary(title)
            .body(body)
            .appname("pomodoer")
            .icon("alarm-clock")
            .urgency(Urgency::Critical)
            .show()
        {
            debug!(error = %e, "desktop notification failed");
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlert;

impl Alert for SilentAlert {
    fn play_end_sound(&self) {}
    fn session_ended(&self, _finished: Mode, _next: Mode) {}
}
