use chrono::{DateTime, Utc};

/// A notification about something that already happened.
///
/// Events are immutable facts; consumers must not rely on delivery order
/// across publishers.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "user.created").
    fn event_type(&self) -> &'static str;

    /// When the event occurred.
    fn occurred_at(&self) -> DateTime<Utc>;
}
