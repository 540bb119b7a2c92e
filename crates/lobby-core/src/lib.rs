pub mod protocol;
pub mod render;
pub mod session;
pub mod transport;
pub mod view;
