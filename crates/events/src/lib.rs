//! `adminhub-events`: notification events and the pub/sub channel they travel on.
//!
//! There is no process-wide bus: whoever publishes owns (or is handed) an
//! [`EventBus`] and subscribers obtain their [`Subscription`] from that same
//! instance through explicit wiring.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
