//! Test doubles for the dispatcher boundary

mod mock_dispatcher;

pub use mock_dispatcher::{MockBehaviour, MockDispatcher};
