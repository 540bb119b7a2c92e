//! Client orchestrator: connects the controller, the poller, and the TUI.
//!
//! This module owns the event loop and drives:
//! - [`lobby_client::ClientController`] for session state and API calls
//! - [`lobby_client::poller::Poller`] for the periodic game-state fetch
//! - [`crate::tui::Tui`] for drawing and keyboard input

use std::time::Duration;

use crate::tui::{Tui, UserIntent};
use lobby_client::net_client::NetClient;
use lobby_client::poller::Poller;
use lobby_client::{ClientController, ClientOptions, PollResult};

/// Start the client against `api_url` and run until the user quits.
pub async fn start_client(
    api_url: &str,
    options: ClientOptions,
    poll_period: Duration,
    name: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctrl = ClientController::new(NetClient::new(), api_url, options);
    let mut poller = Poller::start(poll_period);

    let mut tui = Tui::setup(name)?;
    let result = run_event_loop(&mut tui, &mut ctrl, &mut poller).await;
    poller.stop();
    tui.teardown()?;
    result
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

async fn run_event_loop(
    tui: &mut Tui,
    ctrl: &mut ClientController<NetClient>,
    poller: &mut Poller,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        tui.render(ctrl)?;

        let timeout = tokio::time::Duration::from_millis(50);

        tokio::select! {
            poll = ctrl.recv() => {
                // Failures are already logged by the controller; the UI stays put.
                if let PollResult::Updated(changed) = poll
                    && changed.view
                {
                    tui.on_view_changed();
                }
            }

            Some(()) = poller.tick() => {
                ctrl.poll_tick();
            }

            _ = tokio::time::sleep(timeout) => {
                match tui.poll_and_handle_input(ctrl)? {
                    UserIntent::Quit => break,
                    UserIntent::Send(command) => {
                        let before = ctrl.current_view();
                        ctrl.dispatch(command);
                        if ctrl.current_view() != before {
                            tui.on_view_changed();
                        }
                    }
                    UserIntent::None => {}
                }
            }
        }
    }

    Ok(())
}
