pub mod event;
pub mod phase;
pub mod session;
pub mod snapshot;
