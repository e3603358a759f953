use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize, Serializer};

use adminhub_core::UserId;

use crate::permissions::Permission;
use crate::roles::RoleDefinition;

/// An authenticated caller, as resolved by the authentication layer.
///
/// Carries identity only. Role assignments are read from role storage at
/// evaluation time so a change in assignments is seen by the next request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    pub user_id: UserId,
    pub phone: String,
}

impl Subject {
    pub fn new(user_id: UserId, phone: impl Into<String>) -> Self {
        Self {
            user_id,
            phone: phone.into(),
        }
    }
}

/// Tokens held by one subject for one evaluation (request or render).
///
/// Set semantics: granting a token twice (through two roles) holds it once.
/// Built fresh per evaluation and never cached across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectPermissionSet {
    granted: HashSet<Permission>,
}

impl SubjectPermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Flatten the tokens of every given role.
    pub fn from_roles<'a>(roles: impl IntoIterator<Item = &'a RoleDefinition>) -> Self {
        roles
            .into_iter()
            .flat_map(|role| role.permissions.iter().cloned())
            .collect()
    }

    pub fn contains<Q>(&self, token: &Q) -> bool
    where
        Permission: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.granted.contains(token)
    }

    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.granted.iter()
    }

    /// Tokens sorted, for stable output.
    pub fn to_sorted_vec(&self) -> Vec<Permission> {
        let mut tokens: Vec<Permission> = self.granted.iter().cloned().collect();
        tokens.sort();
        tokens
    }
}

impl FromIterator<Permission> for SubjectPermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().collect(),
        }
    }
}

impl Extend<Permission> for SubjectPermissionSet {
    fn extend<I: IntoIterator<Item = Permission>>(&mut self, iter: I) {
        self.granted.extend(iter);
    }
}

impl Serialize for SubjectPermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_sorted_vec())
    }
}
