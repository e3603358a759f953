//! Infrastructure layer: configuration, in-memory stores and the user and
//! role directories backing authorization.

pub mod config;
pub mod directory;
pub mod events;
pub mod roles;
pub mod store;
pub mod users;

pub use config::{AppConfig, ConfigError};
pub use directory::{AdminDirectory, UserProfile};
pub use events::UserCreated;
pub use roles::{ADMIN_ROLE, RoleService};
pub use store::{InMemoryStore, KeyValueStore};
pub use users::{NewUserInput, UpdateUserInfo, UserEvents, UserInfo, UserRecord, UserService};
