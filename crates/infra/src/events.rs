//! Notifications published by the directories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adminhub_core::UserId;
use adminhub_events::Event;

/// A user was added to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreated {
    pub user_id: UserId,
    pub phone: String,
    pub occurred_at: DateTime<Utc>,
}

impl Event for UserCreated {
    fn event_type(&self) -> &'static str {
        "user.created"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
