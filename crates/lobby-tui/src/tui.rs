//! Ratatui TUI frontend for the lobby client.
//!
//! Pure UI module: terminal lifecycle, rendering, and input → command mapping.
//! Session state lives in [`lobby_client::ClientController`]; this module
//! only reads it and returns [`UserIntent`]s.

use std::io::{self, Stdout};
use std::time::Instant;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use lobby_client::{ClientController, ClientOptions, Command};
use lobby_core::transport::LobbyApi;
use lobby_core::view::View;

// ---------------------------------------------------------------------------
// UserIntent - result of processing user input
// ---------------------------------------------------------------------------

/// The result of processing a user input event.
#[derive(Debug, PartialEq, Eq)]
pub enum UserIntent {
    /// No action needed (e.g. the event was purely cosmetic).
    None,
    /// The user wants to quit.
    Quit,
    /// Hand a command to the controller.
    Send(Command),
}

// ---------------------------------------------------------------------------
// Text input
// ---------------------------------------------------------------------------

/// Single-line input buffer with a character cursor.
#[derive(Debug, Default)]
struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    fn with_value(value: String) -> Self {
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    fn move_cursor_left(&mut self) {
        self.cursor = self.clamp_cursor(self.cursor.saturating_sub(1));
    }

    fn move_cursor_right(&mut self) {
        self.cursor = self.clamp_cursor(self.cursor.saturating_add(1));
    }

    fn enter_char(&mut self, new_char: char) {
        let index = self.byte_index();
        self.value.insert(index, new_char);
        self.move_cursor_right();
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor)
            .unwrap_or(self.value.len())
    }

    fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let before = self.value.chars().take(self.cursor - 1);
        let after = self.value.chars().skip(self.cursor);
        self.value = before.chain(after).collect();
        self.move_cursor_left();
    }

    fn clamp_cursor(&self, pos: usize) -> usize {
        pos.clamp(0, self.value.chars().count())
    }

    fn trimmed(&self) -> &str {
        self.value.trim()
    }
}

// ---------------------------------------------------------------------------
// TUI-only state
// ---------------------------------------------------------------------------

/// UI-layer state that lives alongside (but separate from) the session.
#[derive(Debug, Default)]
struct TuiState {
    name_input: TextInput,
    game_id_input: TextInput,
    selected_button: usize,
    show_help: bool,
}

impl TuiState {
    fn input_mut(&mut self, view: View) -> Option<&mut TextInput> {
        match view {
            View::Login => Some(&mut self.name_input),
            View::JoinGame => Some(&mut self.game_id_input),
            View::ChooseGameType | View::Game => None,
        }
    }

    fn input(&self, view: View) -> Option<&TextInput> {
        match view {
            View::Login => Some(&self.name_input),
            View::JoinGame => Some(&self.game_id_input),
            View::ChooseGameType | View::Game => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Button model
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Button {
    Login,
    Create,
    ChooseJoin,
    Join,
    Start,
    Leave,
}

impl Button {
    fn label(self) -> &'static str {
        match self {
            Button::Login => "Login",
            Button::Create => "Create game",
            Button::ChooseJoin => "Join game",
            Button::Join => "Join",
            Button::Start => "Start",
            Button::Leave => "Leave",
        }
    }
}

/// Buttons offered on `view`, left to right.
fn view_buttons(view: View, options: &ClientOptions, start_visible: bool) -> Vec<Button> {
    match view {
        View::Login => vec![Button::Login],
        View::ChooseGameType => vec![Button::Create, Button::ChooseJoin],
        View::JoinGame if options.choose_game_type_step => vec![Button::Join],
        View::JoinGame => vec![Button::Join, Button::Create],
        View::Game => {
            let mut buttons = Vec::new();
            if start_visible {
                buttons.push(Button::Start);
            }
            if options.leave_enabled {
                buttons.push(Button::Leave);
            }
            buttons
        }
    }
}

fn activate(tui: &TuiState, button: Button) -> UserIntent {
    let command = match button {
        Button::Login => {
            let name = tui.name_input.trimmed();
            if name.is_empty() {
                return UserIntent::None;
            }
            Command::Register {
                name: name.to_string(),
            }
        }
        Button::Create => Command::CreateGame,
        Button::ChooseJoin => Command::ChooseGameType,
        Button::Join => Command::JoinGame {
            id: tui.game_id_input.trimmed().to_string(),
        },
        Button::Start => Command::StartGame,
        Button::Leave => Command::LeaveGame,
    };
    UserIntent::Send(command)
}

fn clamp_selected_button(tui: &mut TuiState, count: usize) {
    if count == 0 {
        tui.selected_button = 0;
    } else if tui.selected_button >= count {
        tui.selected_button = count - 1;
    }
}

// ---------------------------------------------------------------------------
// Public API - Tui struct
// ---------------------------------------------------------------------------

/// Owns the ratatui terminal and all UI-layer state.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    state: TuiState,
}

impl Tui {
    /// Set up the terminal (raw mode, alternate screen) and return a ready `Tui`.
    pub fn setup(name: String) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            state: TuiState {
                name_input: TextInput::with_value(name),
                ..TuiState::default()
            },
        })
    }

    /// Restore the terminal to its original state.
    pub fn teardown(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Draw the current frame.
    pub fn render<A: LobbyApi>(&mut self, ctrl: &ClientController<A>) -> io::Result<()> {
        let count = current_buttons(ctrl).len();
        clamp_selected_button(&mut self.state, count);
        self.terminal.draw(|f| ui(f, ctrl, &self.state))?;
        Ok(())
    }

    /// Poll for a keyboard event without blocking and translate it into a
    /// [`UserIntent`].
    pub fn poll_and_handle_input<A: LobbyApi>(
        &mut self,
        ctrl: &ClientController<A>,
    ) -> io::Result<UserIntent> {
        if !event::poll(std::time::Duration::from_millis(0))? {
            return Ok(UserIntent::None);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(UserIntent::None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(UserIntent::None);
        }
        let Some(view) = ctrl.current_view() else {
            return Ok(UserIntent::None);
        };
        let buttons = current_buttons(ctrl);
        let fading = ctrl.views().animating(Instant::now());
        Ok(route_key(&mut self.state, key, view, &buttons, fading))
    }

    /// Reset button focus after a view switch.
    pub fn on_view_changed(&mut self) {
        self.state.selected_button = 0;
    }
}

fn current_buttons<A: LobbyApi>(ctrl: &ClientController<A>) -> Vec<Button> {
    match ctrl.current_view() {
        Some(view) => view_buttons(view, ctrl.options(), ctrl.start_visible()),
        None => Vec::new(),
    }
}

/// While a view switch is fading, the drawn panel is not yet `view`, so only
/// quit and help keys get through.
fn route_key(
    tui: &mut TuiState,
    key: KeyEvent,
    view: View,
    buttons: &[Button],
    fading: bool,
) -> UserIntent {
    if fading && !tui.show_help && !matches!(key.code, KeyCode::Esc | KeyCode::F(1)) {
        return UserIntent::None;
    }
    handle_key_event(tui, key, view, buttons)
}

fn handle_key_event(tui: &mut TuiState, key: KeyEvent, view: View, buttons: &[Button]) -> UserIntent {
    if tui.show_help {
        return match key.code {
            KeyCode::Esc | KeyCode::F(1) => {
                tui.show_help = false;
                UserIntent::None
            }
            _ => UserIntent::None,
        };
    }

    match key.code {
        KeyCode::Esc => UserIntent::Quit,
        KeyCode::F(1) => {
            tui.show_help = true;
            UserIntent::None
        }
        KeyCode::Enter => match buttons.get(tui.selected_button).or(buttons.first()) {
            Some(button) => activate(tui, *button),
            None => UserIntent::None,
        },
        KeyCode::Char(c) => {
            if let Some(input) = tui.input_mut(view) {
                input.enter_char(c);
            }
            UserIntent::None
        }
        KeyCode::Backspace => {
            if let Some(input) = tui.input_mut(view) {
                input.delete_char();
            }
            UserIntent::None
        }
        KeyCode::Tab | KeyCode::Right => {
            if !buttons.is_empty() {
                tui.selected_button = (tui.selected_button + 1) % buttons.len();
            }
            UserIntent::None
        }
        KeyCode::BackTab | KeyCode::Left => {
            if !buttons.is_empty() {
                let len = buttons.len();
                tui.selected_button = (tui.selected_button + len - 1) % len;
            }
            UserIntent::None
        }
        _ => UserIntent::None,
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn ui<A: LobbyApi>(frame: &mut Frame, ctrl: &ClientController<A>, tui: &TuiState) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // View panel
            Constraint::Length(3), // Controls
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let now = Instant::now();
    if let Some(view) = ctrl.views().frontmost(now) {
        let faded = ctrl.views().opacity(view, now) < 1.0;
        let cursor = render_view_panel(frame, ctrl, tui, view, faded, main_layout[0]);
        if let Some(position) = cursor
            && !faded
            && !tui.show_help
        {
            frame.set_cursor_position(position);
        }
    }

    render_controls_bar(frame, &current_buttons(ctrl), tui, main_layout[1]);
    render_status_bar(frame, ctrl, main_layout[2]);

    if tui.show_help {
        render_help_popup(frame);
    }
}

fn view_title(view: View) -> &'static str {
    match view {
        View::Login => " Login ",
        View::ChooseGameType => " Choose game type ",
        View::JoinGame => " Join game ",
        View::Game => " Game ",
    }
}

/// Draw the panel for `view`; returns the input cursor position, if any.
fn render_view_panel<A: LobbyApi>(
    frame: &mut Frame,
    ctrl: &ClientController<A>,
    tui: &TuiState,
    view: View,
    faded: bool,
    area: Rect,
) -> Option<(u16, u16)> {
    let (accent, text) = if faded {
        (Color::DarkGray, Color::DarkGray)
    } else {
        (Color::Magenta, Color::White)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(view_title(view))
        .title_style(Style::default().fg(accent).bold());
    let inner = block.inner(area);

    let mut lines = Vec::new();
    let mut prompt: Option<&str> = None;
    match view {
        View::Login => {
            lines.push(Line::from(Span::styled(
                "Enter your name and press Enter.",
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(""));
            prompt = Some("Name: ");
        }
        View::ChooseGameType => {
            lines.push(Line::from(Span::styled(
                "Create a new game, or join one by id.",
                Style::default().fg(text),
            )));
        }
        View::JoinGame => {
            lines.push(Line::from(Span::styled(
                "Enter the id of the game to join.",
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(""));
            prompt = Some("Game ID: ");
        }
        View::Game => {
            let rendered = ctrl.rendered_text();
            if rendered.is_empty() {
                lines.push(Line::from(Span::styled(
                    "Waiting for game state...",
                    Style::default().fg(Color::Gray),
                )));
            } else {
                lines.extend(
                    rendered
                        .lines()
                        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(text)))),
                );
            }
        }
    }

    let mut cursor = None;
    if let (Some(prompt), Some(input)) = (prompt, tui.input(view)) {
        let row = lines.len() as u16;
        lines.push(Line::from(vec![
            Span::styled(prompt, Style::default().fg(Color::Cyan)),
            Span::styled(input.value.clone(), Style::default().fg(text).bold()),
        ]));
        let x = inner.x + prompt.chars().count() as u16 + input.cursor as u16;
        let y = inner.y + row;
        if x < inner.x + inner.width && y < inner.y + inner.height {
            cursor = Some((x, y));
        }
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(panel, area);
    cursor
}

fn render_controls_bar(frame: &mut Frame, buttons: &[Button], tui: &TuiState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Controls ")
        .title_style(Style::default().fg(Color::Blue).bold());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = Vec::with_capacity(buttons.len() * 2);
    let mut row_width = 0usize;
    for (index, button) in buttons.iter().enumerate() {
        let style = if index == tui.selected_button {
            Style::default().bg(Color::Blue).fg(Color::Black).bold()
        } else {
            Style::default().fg(Color::White)
        };
        let label = format!(" {} ", button.label());
        row_width += label.chars().count();
        spans.push(Span::styled(label, style));
        if index + 1 < buttons.len() {
            spans.push(Span::raw(" "));
            row_width += 1;
        }
    }

    let pad = (inner.width as usize).saturating_sub(row_width) / 2;
    if pad > 0 {
        spans.insert(0, Span::raw(" ".repeat(pad)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_status_bar<A: LobbyApi>(frame: &mut Frame, ctrl: &ClientController<A>, area: Rect) {
    let session = ctrl.session();
    let (status_text, status_color) = if session.auth_token().is_some() {
        ("● Registered", Color::Green)
    } else {
        ("● Not registered", Color::Red)
    };

    let mut spans = vec![
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw(" | "),
        Span::styled("F1", Style::default().fg(Color::Cyan).bold()),
        Span::raw(": Help | "),
        Span::styled("ESC", Style::default().fg(Color::Cyan).bold()),
        Span::raw(": Quit"),
    ];
    if let Some(id) = session.user_id() {
        spans.push(Span::raw(" | You: #"));
        spans.push(Span::styled(id.to_string(), Style::default().fg(Color::Cyan)));
    }
    if let Some(id) = session.game_id() {
        spans.push(Span::raw(" | Game: "));
        spans.push(Span::styled(id.to_string(), Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::styled(
        format!(" | {}", session.api_base_url()),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());

    frame.render_widget(Clear, area);

    let help_text = Text::from(vec![
        Line::from(vec![Span::styled(
            "CONTROLS",
            Style::default().fg(Color::Yellow).bold(),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  NAVIGATION",
            Style::default().fg(Color::Cyan).bold(),
        )]),
        Line::from("  Left/Right    Select button"),
        Line::from("  Tab           Next button"),
        Line::from("  Enter         Activate selected button"),
        Line::from("  Typing        Edit name / game id"),
        Line::from("  Backspace     Delete character"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  SYSTEM",
            Style::default().fg(Color::Cyan).bold(),
        )]),
        Line::from("  F1            Toggle this help"),
        Line::from("  ESC           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press ESC or F1 to close",
            Style::default().fg(Color::DarkGray),
        )]),
    ]);

    let help = Paragraph::new(help_text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help ")
            .title_style(Style::default().fg(Color::Cyan).bold())
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn text_input_edits_at_cursor() {
        let mut input = TextInput::with_value("Ан".to_string());
        input.enter_char('я');
        assert_eq!(input.value, "Аня");
        input.delete_char();
        input.delete_char();
        assert_eq!(input.value, "А");
        input.delete_char();
        input.delete_char();
        assert_eq!(input.value, "");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn buttons_follow_options() {
        let all = ClientOptions::default();
        assert_eq!(
            view_buttons(View::ChooseGameType, &all, true),
            vec![Button::Create, Button::ChooseJoin]
        );
        assert_eq!(view_buttons(View::JoinGame, &all, true), vec![Button::Join]);
        assert_eq!(
            view_buttons(View::Game, &all, true),
            vec![Button::Start, Button::Leave]
        );
        assert_eq!(view_buttons(View::Game, &all, false), vec![Button::Leave]);

        let flat = ClientOptions {
            choose_game_type_step: false,
            leave_enabled: false,
            ..ClientOptions::default()
        };
        assert_eq!(
            view_buttons(View::JoinGame, &flat, true),
            vec![Button::Join, Button::Create]
        );
        assert_eq!(view_buttons(View::Game, &flat, false), Vec::new());
    }

    #[test]
    fn typing_a_name_then_enter_registers() {
        let mut tui = TuiState::default();
        let buttons = [Button::Login];
        for c in "Ann".chars() {
            handle_key_event(&mut tui, press(KeyCode::Char(c)), View::Login, &buttons);
        }
        assert_eq!(
            handle_key_event(&mut tui, press(KeyCode::Enter), View::Login, &buttons),
            UserIntent::Send(Command::Register {
                name: "Ann".to_string()
            })
        );
    }

    #[test]
    fn blank_name_does_nothing() {
        let mut tui = TuiState {
            name_input: TextInput::with_value("   ".to_string()),
            ..TuiState::default()
        };
        assert_eq!(
            handle_key_event(&mut tui, press(KeyCode::Enter), View::Login, &[Button::Login]),
            UserIntent::None
        );
    }

    #[test]
    fn join_sends_typed_id_and_arrows_cycle_buttons() {
        let mut tui = TuiState::default();
        let buttons = [Button::Join, Button::Create];
        for c in "42".chars() {
            handle_key_event(&mut tui, press(KeyCode::Char(c)), View::JoinGame, &buttons);
        }
        assert_eq!(
            handle_key_event(&mut tui, press(KeyCode::Enter), View::JoinGame, &buttons),
            UserIntent::Send(Command::JoinGame {
                id: "42".to_string()
            })
        );

        handle_key_event(&mut tui, press(KeyCode::Left), View::JoinGame, &buttons);
        assert_eq!(tui.selected_button, 1);
        assert_eq!(
            handle_key_event(&mut tui, press(KeyCode::Enter), View::JoinGame, &buttons),
            UserIntent::Send(Command::CreateGame)
        );
        handle_key_event(&mut tui, press(KeyCode::Tab), View::JoinGame, &buttons);
        assert_eq!(tui.selected_button, 0);
    }

    #[test]
    fn help_swallows_keys_and_escape_quits() {
        let mut tui = TuiState::default();
        let buttons = [Button::Create, Button::ChooseJoin];
        handle_key_event(&mut tui, press(KeyCode::F(1)), View::ChooseGameType, &buttons);
        assert!(tui.show_help);
        assert_eq!(
            handle_key_event(&mut tui, press(KeyCode::Enter), View::ChooseGameType, &buttons),
            UserIntent::None
        );
        assert_eq!(
            handle_key_event(&mut tui, press(KeyCode::Esc), View::ChooseGameType, &buttons),
            UserIntent::None
        );
        assert!(!tui.show_help);
        assert_eq!(
            handle_key_event(&mut tui, press(KeyCode::Esc), View::ChooseGameType, &buttons),
            UserIntent::Quit
        );
    }

    #[test]
    fn keys_during_a_fade_do_not_reach_the_next_view() {
        let mut tui = TuiState::default();
        let buttons = [Button::Join];
        assert_eq!(
            route_key(&mut tui, press(KeyCode::Char('4')), View::JoinGame, &buttons, true),
            UserIntent::None
        );
        assert_eq!(
            route_key(&mut tui, press(KeyCode::Enter), View::JoinGame, &buttons, true),
            UserIntent::None
        );
        assert_eq!(tui.game_id_input.value, "");

        route_key(&mut tui, press(KeyCode::Char('4')), View::JoinGame, &buttons, false);
        assert_eq!(tui.game_id_input.value, "4");
        assert_eq!(
            route_key(&mut tui, press(KeyCode::Esc), View::JoinGame, &buttons, true),
            UserIntent::Quit
        );
    }

    #[test]
    fn game_view_ignores_typing() {
        let mut tui = TuiState::default();
        handle_key_event(&mut tui, press(KeyCode::Char('x')), View::Game, &[Button::Leave]);
        assert_eq!(tui.name_input.value, "");
        assert_eq!(tui.game_id_input.value, "");
    }
}
