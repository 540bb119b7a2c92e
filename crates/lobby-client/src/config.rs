//! Client configuration.
//!
//! The historical page variants differed only in view flow and labels; each
//! difference is a switch here. [`ClientOptions::default`] enables all of
//! them.

use lobby_core::render::Locale;
use lobby_core::view::View;

/// API base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Show the "choose game type" view between login and joining.
    pub choose_game_type_step: bool,
    /// Call `players/getMe` after registering.
    pub fetch_identity: bool,
    /// Offer a leave control in the game view.
    pub leave_enabled: bool,
    /// Include each player's hand in the rendered state.
    pub show_hands: bool,
    /// Switch to the game view when a start request succeeds.
    pub switch_view_on_start: bool,
    pub locale: Locale,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            choose_game_type_step: true,
            fetch_identity: true,
            leave_enabled: true,
            show_hands: true,
            switch_view_on_start: true,
            locale: Locale::En,
        }
    }
}

impl ClientOptions {
    /// The view shown after login and after leaving a game.
    pub fn lobby_view(&self) -> View {
        if self.choose_game_type_step {
            View::ChooseGameType
        } else {
            View::JoinGame
        }
    }
}
