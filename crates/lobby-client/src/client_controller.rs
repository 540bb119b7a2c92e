//! Framework-agnostic client controller.
//!
//! Owns the [`Session`], the [`ViewSwitcher`], and the last rendered game
//! state, and turns user commands into fire-and-forget API requests:
//!
//! - Each request runs in its own task; the caller never waits on it.
//! - Completions come back over a channel and are applied in arrival order,
//!   which is not necessarily issue order.
//! - A failed request changes nothing. It is logged and reported as
//!   [`PollResult::Failed`] so callers can ignore it.
//!
//! Frontends only need to:
//! 1. Call [`ClientController::dispatch`] for user actions and
//!    [`ClientController::poll_tick`] on every poller tick.
//! 2. Call [`ClientController::recv`] (or [`ClientController::try_recv`]) to
//!    apply completions, then redraw.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::sync::mpsc;

use lobby_core::protocol::{
    DecodeError, Endpoint, GameSnapshot, Id, decode_id, decode_me, decode_snapshot, decode_token,
};
use lobby_core::render::{can_start, render_game_state};
use lobby_core::session::Session;
use lobby_core::transport::{LobbyApi, TransportError};
use lobby_core::view::{View, ViewSwitcher};

use crate::config::ClientOptions;

/// Why a request had no effect.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A user action, as produced by a frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register { name: String },
    CreateGame,
    JoinGame { id: String },
    /// Move from the game-type choice to the join view. Purely local.
    ChooseGameType,
    LeaveGame,
    StartGame,
}

/// Describes what changed after applying a completion. All flags default to
/// `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateChanged {
    /// A view switch started.
    pub view: bool,
    /// Token, user id, or game id changed.
    pub session: bool,
    /// The game snapshot (and its rendered text) changed.
    pub game: bool,
}

impl StateChanged {
    pub fn any(self) -> bool {
        self.view || self.session || self.game
    }
}

/// Outcome of processing one completion.
#[derive(Debug)]
pub enum PollResult {
    Updated(StateChanged),
    /// The request failed or its body was unusable; nothing was changed.
    Failed(ApiError),
    /// No completion was available.
    Empty,
}

/// Which call a completion belongs to. Join carries the id the user typed,
/// since that (not the response body) becomes the game id.
#[derive(Debug, Clone)]
enum Request {
    Register,
    FetchSelf,
    CreateGame,
    JoinGame { id: Id },
    LeaveGame,
    StartGame,
    FetchState,
}

impl Request {
    fn name(&self) -> &'static str {
        match self {
            Request::Register => "register",
            Request::FetchSelf => "fetch self",
            Request::CreateGame => "create game",
            Request::JoinGame { .. } => "join game",
            Request::LeaveGame => "leave game",
            Request::StartGame => "start game",
            Request::FetchState => "fetch state",
        }
    }
}

#[derive(Debug)]
struct Completion {
    request: Request,
    result: Result<String, TransportError>,
}

/// Owns the session and view state and dispatches API calls.
pub struct ClientController<A: LobbyApi> {
    api: Arc<A>,
    options: ClientOptions,
    session: Session,
    views: ViewSwitcher,
    snapshot: Option<GameSnapshot>,
    rendered: String,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
}

impl<A: LobbyApi> ClientController<A> {
    /// Create a controller talking to `api_base_url` and show the login view.
    pub fn new(api: A, api_base_url: impl Into<String>, options: ClientOptions) -> Self {
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let mut views = ViewSwitcher::new();
        views.switch_to(View::Login, Instant::now());
        Self {
            api: Arc::new(api),
            options,
            session: Session::new(api_base_url),
            views,
            snapshot: None,
            rendered: String::new(),
            completions_tx,
            completions,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn views(&self) -> &ViewSwitcher {
        &self.views
    }

    pub fn current_view(&self) -> Option<View> {
        self.views.current()
    }

    /// The last game snapshot received, if any.
    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    /// Text of the last rendered snapshot (empty before the first poll).
    pub fn rendered_text(&self) -> &str {
        &self.rendered
    }

    /// Whether the start control should be shown to this user.
    pub fn start_visible(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_none_or(|snap| can_start(self.session.user_id(), snap))
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::Register { name } => self.register(&name),
            Command::CreateGame => self.create_game(),
            Command::JoinGame { id } => self.join_game(&id),
            Command::ChooseGameType => self.choose_game_type(),
            Command::LeaveGame => self.leave_game(),
            Command::StartGame => self.start_game(),
        }
    }

    pub fn register(&mut self, name: &str) {
        self.issue(
            Request::Register,
            Endpoint::Register {
                name: name.to_string(),
            },
        );
    }

    pub fn fetch_self(&mut self) {
        if let Some(auth_token) = self.token_for("fetch self") {
            self.issue(Request::FetchSelf, Endpoint::FetchSelf { auth_token });
        }
    }

    pub fn create_game(&mut self) {
        if let Some(auth_token) = self.token_for("create game") {
            self.issue(Request::CreateGame, Endpoint::CreateGame { auth_token });
        }
    }

    pub fn join_game(&mut self, id: &str) {
        let id = id.trim();
        if id.is_empty() {
            tracing::debug!("empty game id; not joining");
            return;
        }
        if let Some(auth_token) = self.token_for("join game") {
            let id = Id::from(id);
            self.issue(
                Request::JoinGame { id: id.clone() },
                Endpoint::JoinGame { id, auth_token },
            );
        }
    }

    pub fn leave_game(&mut self) {
        if !self.options.leave_enabled {
            return;
        }
        if let Some(auth_token) = self.token_for("leave game") {
            self.issue(Request::LeaveGame, Endpoint::LeaveGame { auth_token });
        }
    }

    pub fn start_game(&mut self) {
        if let Some(auth_token) = self.token_for("start game") {
            self.issue(Request::StartGame, Endpoint::StartGame { auth_token });
        }
    }

    pub fn choose_game_type(&mut self) {
        self.views.switch_to(View::JoinGame, Instant::now());
    }

    /// One poller tick: fetch the game state if a game and token are set.
    pub fn poll_tick(&mut self) {
        let Some((id, token)) = self.session.poll_target() else {
            return;
        };
        let endpoint = Endpoint::FetchState {
            id: id.clone(),
            auth_token: token.to_string(),
        };
        self.issue(Request::FetchState, endpoint);
    }

    // ------------------------------------------------------------------
    // Completions
    // ------------------------------------------------------------------

    /// Try to apply one completion (non-blocking).
    pub fn try_recv(&mut self) -> PollResult {
        match self.completions.try_recv() {
            Ok(completion) => self.handle_completion(completion),
            Err(_) => PollResult::Empty,
        }
    }

    /// Await the next completion and apply it. Useful in `tokio::select!`.
    pub async fn recv(&mut self) -> PollResult {
        match self.completions.recv().await {
            Some(completion) => self.handle_completion(completion),
            None => PollResult::Empty,
        }
    }

    // -- private -----------------------------------------------------------

    fn token_for(&self, op: &'static str) -> Option<String> {
        let token = self.session.auth_token().map(str::to_string);
        if token.is_none() {
            tracing::debug!(op, "no auth token; request skipped");
        }
        token
    }

    fn issue(&self, request: Request, endpoint: Endpoint) {
        let url = self.session.method_url(endpoint.path());
        let query = endpoint.query();
        let api = Arc::clone(&self.api);
        let tx = self.completions_tx.clone();
        tracing::debug!(op = request.name(), %url, "request issued");
        tokio::spawn(async move {
            let result = api.get(&url, &query).await;
            let _ = tx.send(Completion { request, result });
        });
    }

    fn handle_completion(&mut self, completion: Completion) -> PollResult {
        let Completion { request, result } = completion;
        let op = request.name();
        match result
            .map_err(ApiError::from)
            .and_then(|body| self.apply(request, &body))
        {
            Ok(changed) => PollResult::Updated(changed),
            Err(e) => {
                tracing::warn!(op, error = %e, "request failed");
                PollResult::Failed(e)
            }
        }
    }

    fn apply(&mut self, request: Request, body: &str) -> Result<StateChanged, ApiError> {
        let now = Instant::now();
        let mut changed = StateChanged::default();
        match request {
            Request::Register => {
                let token = decode_token(body)?;
                tracing::info!("registered");
                self.session.set_auth_token(token);
                changed.session = true;
                if self.options.fetch_identity {
                    self.fetch_self();
                } else {
                    self.views.switch_to(self.options.lobby_view(), now);
                    changed.view = true;
                }
            }
            Request::FetchSelf => {
                let me = decode_me(body)?;
                tracing::info!(user_id = %me.id, "identity fetched");
                self.session.set_user_id(me.id);
                self.views.switch_to(self.options.lobby_view(), now);
                changed.session = true;
                changed.view = true;
            }
            Request::CreateGame => {
                let id = decode_id(body)?;
                tracing::info!(game_id = %id, "game created");
                self.enter_game(id, now);
                changed = StateChanged {
                    view: true,
                    session: true,
                    game: true,
                };
            }
            Request::JoinGame { id } => {
                tracing::info!(game_id = %id, "game joined");
                self.enter_game(id, now);
                changed = StateChanged {
                    view: true,
                    session: true,
                    game: true,
                };
            }
            Request::LeaveGame => {
                tracing::info!("left game");
                self.session.clear_game_id();
                self.snapshot = None;
                self.rendered.clear();
                self.views.switch_to(self.options.lobby_view(), now);
                changed = StateChanged {
                    view: true,
                    session: true,
                    game: true,
                };
            }
            Request::StartGame => {
                tracing::info!("game started");
                if self.options.switch_view_on_start {
                    self.views.switch_to(View::Game, now);
                    changed.view = true;
                }
            }
            Request::FetchState => {
                let snapshot = decode_snapshot(body)?;
                self.rendered = render_game_state(
                    &snapshot,
                    &self.options.locale.labels(),
                    self.options.show_hands,
                );
                self.snapshot = Some(snapshot);
                changed.game = true;
            }
        }
        Ok(changed)
    }

    fn enter_game(&mut self, id: Id, now: Instant) {
        if self.session.game_id() != Some(&id) {
            self.snapshot = None;
            self.rendered.clear();
        }
        self.session.set_game_id(id);
        self.views.switch_to(View::Game, now);
    }
}
