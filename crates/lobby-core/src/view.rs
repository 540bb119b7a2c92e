//! View panels and the fade transitions between them.
//!
//! Exactly one view is the target at a time. Switching starts a fade-out on
//! the previous view and a fade-in on the new one; neither is cancelled if
//! another switch happens mid-animation.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// How long a fade in or out takes.
pub const FADE_DURATION: Duration = Duration::from_millis(400);

/// The closed set of view panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    ChooseGameType,
    JoinGame,
    Game,
}

impl View {
    pub const ALL: [View; 4] = [View::Login, View::ChooseGameType, View::JoinGame, View::Game];

    /// Panel name, as used by the original page markup.
    pub fn name(self) -> &'static str {
        match self {
            View::Login => "login",
            View::ChooseGameType => "choose-game-type",
            View::JoinGame => "join-game",
            View::Game => "game",
        }
    }

    fn index(self) -> usize {
        match self {
            View::Login => 0,
            View::ChooseGameType => 1,
            View::JoinGame => 2,
            View::Game => 3,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| format!("unknown view '{s}'"))
    }
}

/// Per-panel animation state. A fade runs from `from` toward the target
/// opacity (1 when `shown`, 0 otherwise), starting at `since`.
#[derive(Debug, Clone, Copy, Default)]
struct Panel {
    shown: bool,
    from: f32,
    since: Option<Instant>,
}

impl Panel {
    fn opacity(&self, now: Instant) -> f32 {
        let target = if self.shown { 1.0 } else { 0.0 };
        let Some(start) = self.since else {
            return target;
        };
        let elapsed = now.saturating_duration_since(start);
        let progress = elapsed.as_secs_f32() / FADE_DURATION.as_secs_f32();
        if progress >= 1.0 {
            return target;
        }
        self.from + (target - self.from) * progress
    }

    /// Begin fading toward `shown` from wherever the panel is right now.
    fn fade(&mut self, shown: bool, now: Instant) {
        *self = Panel {
            shown,
            from: self.opacity(now),
            since: Some(now),
        };
    }
}

/// Shows one view at a time and tracks in-flight fades.
#[derive(Debug, Clone, Default)]
pub struct ViewSwitcher {
    current: Option<View>,
    panels: [Panel; 4],
}

impl ViewSwitcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<View> {
        self.current
    }

    /// Fade out the current view (if any), fade in `view`, and make it current.
    pub fn switch_to(&mut self, view: View, now: Instant) {
        if let Some(previous) = self.current {
            self.panels[previous.index()].fade(false, now);
        }
        self.panels[view.index()].fade(true, now);
        self.current = Some(view);
    }

    /// Switch by panel name. Unknown names are ignored.
    pub fn switch_to_named(&mut self, name: &str, now: Instant) {
        if let Ok(view) = name.parse() {
            self.switch_to(view, now);
        }
    }

    /// Whether `view` is shown once its animation settles.
    pub fn is_visible(&self, view: View) -> bool {
        self.panels[view.index()].shown
    }

    /// Current opacity of `view`, from 0 (hidden) to 1 (fully shown).
    pub fn opacity(&self, view: View, now: Instant) -> f32 {
        self.panels[view.index()].opacity(now)
    }

    /// Whether any fade is still running.
    pub fn animating(&self, now: Instant) -> bool {
        self.panels.iter().any(|p| {
            p.since
                .is_some_and(|start| now.saturating_duration_since(start) < FADE_DURATION)
        })
    }

    /// The most opaque view, i.e. the one a single-panel frontend should draw.
    pub fn frontmost(&self, now: Instant) -> Option<View> {
        View::ALL
            .into_iter()
            .map(|v| (v, self.opacity(v, now)))
            .filter(|(_, o)| *o > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(v, _)| v)
    }
}
