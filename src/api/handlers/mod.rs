//! API request handlers.

/// Agent listing.
pub mod agents;
/// Liveness and service status.
pub mod health;
/// Runtime-compatible agent entrypoint.
pub mod invocations;
/// One-shot trip generation.
pub mod trips;
/// Step-by-step trip wizard.
pub mod wizard;
