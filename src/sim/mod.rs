pub mod event;
pub mod generate;
pub mod message_log;
pub mod placement;
pub mod session;
pub mod step;
pub mod world;
