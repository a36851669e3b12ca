//! Request coordination: the single in-flight slot and submission flow.

pub mod coordinator;

pub use coordinator::{KeyDispatch, PendingRequest, RequestCoordinator, RequestState};
