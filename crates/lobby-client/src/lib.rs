pub mod client_controller;
pub mod config;
pub mod net_client;
pub mod poller;

pub use client_controller::{ApiError, ClientController, Command, PollResult, StateChanged};
pub use config::ClientOptions;
