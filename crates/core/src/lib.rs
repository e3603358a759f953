//! `adminhub-core`: shared domain building blocks.
//!
//! Pure types only: identifiers, the domain error model and the pagination
//! contract used by list operations. No infrastructure concerns.

pub mod error;
pub mod id;
pub mod page;

pub use error::{DomainError, DomainResult};
pub use id::{RoleId, UserId};
pub use page::{Page, PageArgs, paginate};
