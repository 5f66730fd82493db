//! Event bus and notification infrastructure for the revision workflow.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`WorkflowEvent`] — the canonical domain event envelope.
//! - [`Notifier`] — the best-effort notification contract consumed by the
//!   orchestration services.
//! - [`EventNotifier`] — implementation that persists a notification row
//!   per recipient and publishes the matching event on the bus.

pub mod bus;
pub mod notifier;

pub use bus::{EventBus, WorkflowEvent};
pub use notifier::{notification_types, EventNotifier, Notifier, NotifyError};
