//! Text rendering of a [`GameSnapshot`].
//!
//! Output is a pure function of the snapshot and labels, so re-rendering an
//! unchanged snapshot yields identical text.

use crate::protocol::{GameSnapshot, Id};

/// Section labels used in the rendered block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub room: &'static str,
    pub status: &'static str,
    pub players: &'static str,
    pub hand: &'static str,
    pub host: &'static str,
}

/// Label language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub fn labels(self) -> Labels {
        match self {
            Locale::En => Labels {
                room: "Room",
                status: "Status",
                players: "Players",
                hand: "Hand",
                host: "Host ID",
            },
            Locale::Ru => Labels {
                room: "Номер комнаты",
                status: "Статус",
                players: "ИГРОКИ",
                hand: "КОЛОДА",
                host: "ХОСТА ID",
            },
        }
    }
}

/// Render the snapshot as a multi-line text block.
///
/// Players are listed in server order; with `show_hands` each player's cards
/// follow their name, also in server order.
pub fn render_game_state(snapshot: &GameSnapshot, labels: &Labels, show_hands: bool) -> String {
    let mut lines = vec![
        format!("{}: {}", labels.room, snapshot.id),
        format!("{}: {}", labels.status, snapshot.status),
        format!("{}:", labels.players),
    ];

    for player in &snapshot.players {
        lines.push(format!("  {}", player.name));
        if show_hands && !player.hand.is_empty() {
            lines.push(format!("    {}:", labels.hand));
            for card in &player.hand {
                lines.push(format!("      {}", card.text));
            }
        }
    }

    let host = snapshot.host_id.as_ref().map_or("-", Id::as_str);
    lines.push(format!("{}: {}", labels.host, host));
    lines.join("\n")
}

/// Whether the start control should be offered to `user_id`.
///
/// Ids are compared in their normalized form. Without a known user id there
/// is nothing to compare against, so the control stays available.
pub fn can_start(user_id: Option<&Id>, snapshot: &GameSnapshot) -> bool {
    match user_id {
        Some(me) => snapshot.host_id.as_ref() == Some(me),
        None => true,
    }
}
