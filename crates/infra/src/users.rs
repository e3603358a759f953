//! User directory.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adminhub_auth::{Role, Subject};
use adminhub_core::{DomainError, DomainResult, Page, PageArgs, UserId, paginate};
use adminhub_events::{EventBus, InMemoryEventBus};

use crate::events::UserCreated;
use crate::store::{InMemoryStore, KeyValueStore};

/// Bus carrying [`UserCreated`] notifications.
pub type UserEvents = InMemoryEventBus<UserCreated>;

/// Profile details a user maintains about themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: Option<String>,
    pub address: Option<String>,
    pub age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub phone: String,
    pub info: Option<UserInfo>,
    /// Role names in assignment order.
    pub roles: Vec<Role>,
    pub create_date: DateTime<Utc>,
}

impl UserRecord {
    /// Identity handed to the authorization layer.
    pub fn subject(&self) -> Subject {
        Subject::new(self.id, self.phone.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserInput {
    pub phone: String,
}

impl NewUserInput {
    pub fn validate(&self) -> DomainResult<()> {
        if self.phone.trim().is_empty() {
            return Err(DomainError::validation("phone must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
}

/// Users keyed by id, with phone as the natural key.
pub struct UserService {
    store: Arc<dyn KeyValueStore<UserId, UserRecord>>,
    bus: Arc<UserEvents>,
    // Serializes read-check-write sequences (duplicate phone, info updates).
    writes: Mutex<()>,
}

impl core::fmt::Debug for UserService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserService")
            .field("subscribers", &self.bus.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl UserService {
    pub fn new(store: Arc<dyn KeyValueStore<UserId, UserRecord>>, bus: Arc<UserEvents>) -> Self {
        Self {
            store,
            bus,
            writes: Mutex::new(()),
        }
    }

    pub fn in_memory(bus: Arc<UserEvents>) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), bus)
    }

    /// The bus `create` publishes on.
    pub fn events(&self) -> &Arc<UserEvents> {
        &self.bus
    }

    pub fn create(&self, input: NewUserInput) -> DomainResult<UserRecord> {
        input.validate()?;
        let phone = input.phone.trim().to_string();

        let record = {
            let _writes = self.lock_writes()?;
            if self.by_phone(&phone)?.is_some() {
                return Err(DomainError::already_exists("user already exists"));
            }

            let record = UserRecord {
                id: UserId::new(),
                phone,
                info: None,
                roles: Vec::new(),
                create_date: Utc::now(),
            };
            self.store.upsert(record.id, record.clone())?;
            record
        };

        tracing::info!(user_id = %record.id, "user created");

        let event = UserCreated {
            user_id: record.id,
            phone: record.phone.clone(),
            occurred_at: record.create_date,
        };
        if let Err(err) = self.bus.publish(event) {
            tracing::warn!(user_id = %record.id, error = %err, "user.created notification dropped");
        }

        Ok(record)
    }

    /// Every user, newest first.
    pub fn find_all(&self) -> DomainResult<Vec<UserRecord>> {
        let mut users = self.store.list()?;
        // v7 ids are time ordered, which breaks create_date ties.
        users.sort_by(|a, b| {
            b.create_date
                .cmp(&a.create_date)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(users)
    }

    /// One page of users, newest first.
    pub fn users(&self, args: PageArgs) -> DomainResult<Page<UserRecord>> {
        paginate(self.find_all()?, args)
    }

    pub fn find_one_by_id(&self, id: UserId) -> DomainResult<UserRecord> {
        self.store.get(&id)?.ok_or(DomainError::NotFound)
    }

    pub fn find_one_by_phone(&self, phone: &str) -> DomainResult<UserRecord> {
        self.by_phone(phone.trim())?.ok_or(DomainError::NotFound)
    }

    /// Create or replace the profile of `current`.
    pub fn update_user_info(&self, current: UserId, input: UpdateUserInfo) -> DomainResult<UserRecord> {
        let _writes = self.lock_writes()?;
        let mut record = self.find_one_by_id(current)?;
        record.info = Some(UserInfo {
            name: input.name,
            address: input.address,
            age: input.age,
        });
        self.store.upsert(record.id, record.clone())?;
        Ok(record)
    }

    /// Replace the user's role assignments. Duplicates collapse, first wins.
    pub fn assign_roles(&self, id: UserId, roles: Vec<Role>) -> DomainResult<UserRecord> {
        let _writes = self.lock_writes()?;
        let mut record = self.find_one_by_id(id)?;

        let mut assigned: Vec<Role> = Vec::with_capacity(roles.len());
        for role in roles {
            if !assigned.contains(&role) {
                assigned.push(role);
            }
        }
        record.roles = assigned;

        self.store.upsert(record.id, record.clone())?;
        tracing::info!(user_id = %id, roles = record.roles.len(), "user roles assigned");
        Ok(record)
    }

    pub fn assigned_roles(&self, id: UserId) -> DomainResult<Vec<Role>> {
        Ok(self.find_one_by_id(id)?.roles)
    }

    fn by_phone(&self, phone: &str) -> DomainResult<Option<UserRecord>> {
        Ok(self.store.list()?.into_iter().find(|u| u.phone == phone))
    }

    fn lock_writes(&self) -> DomainResult<std::sync::MutexGuard<'_, ()>> {
        self.writes
            .lock()
            .map_err(|_| DomainError::unavailable("user directory lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn service() -> UserService {
        UserService::in_memory(Arc::new(UserEvents::new()))
    }

    fn add(users: &UserService, phone: &str) -> UserRecord {
        users
            .create(NewUserInput {
                phone: phone.to_string(),
            })
            .unwrap()
    }

    #[test]
    fn duplicate_phone_is_rejected() {
        let users = service();
        add(&users, "13800000000");

        let err = users
            .create(NewUserInput {
                phone: " 13800000000 ".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, DomainError::AlreadyExists("user already exists".to_string()));
        assert_eq!(err.to_string(), "user already exists");
    }

    #[test]
    fn blank_phone_is_rejected() {
        let err = service()
            .create(NewUserInput {
                phone: "  ".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_publishes_user_created() {
        let users = service();
        let subscription = users.events().subscribe();

        let record = add(&users, "13800000001");

        let event = subscription.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(event.user_id, record.id);
        assert_eq!(event.phone, "13800000001");
    }

    #[test]
    fn listing_is_newest_first_and_paginated() {
        let users = service();
        let first = add(&users, "1");
        let second = add(&users, "2");
        let third = add(&users, "3");

        let all: Vec<UserId> = users.find_all().unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(all, vec![third.id, second.id, first.id]);

        let page = users.users(PageArgs::new(2, 2)).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, first.id);
    }

    #[test]
    fn lookups_report_not_found() {
        let users = service();
        assert_eq!(users.find_one_by_phone("404").unwrap_err(), DomainError::NotFound);
        assert_eq!(users.find_one_by_id(UserId::new()).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn update_user_info_replaces_profile() {
        let users = service();
        let user = add(&users, "13800000002");

        users
            .update_user_info(
                user.id,
                UpdateUserInfo {
                    name: Some("ann".to_string()),
                    address: Some("1 Main St".to_string()),
                    age: Some(30),
                },
            )
            .unwrap();
        let updated = users
            .update_user_info(
                user.id,
                UpdateUserInfo {
                    name: Some("annie".to_string()),
                    address: None,
                    age: Some(31),
                },
            )
            .unwrap();

        assert_eq!(
            updated.info,
            Some(UserInfo {
                name: Some("annie".to_string()),
                address: None,
                age: Some(31),
            })
        );
        assert_eq!(users.find_one_by_phone("13800000002").unwrap().info, updated.info);
    }

    #[test]
    fn role_assignment_collapses_duplicates() {
        let users = service();
        let user = add(&users, "13800000003");

        users
            .assign_roles(
                user.id,
                vec![Role::from_static("admin"), Role::from_static("viewer"), Role::from_static("admin")],
            )
            .unwrap();

        assert_eq!(
            users.assigned_roles(user.id).unwrap(),
            vec![Role::from_static("admin"), Role::from_static("viewer")]
        );
    }
}
