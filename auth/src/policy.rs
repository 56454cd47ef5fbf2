//! The access policy.
//!
//! Decisions are computed from the identity snapshot of the current request
//! and never cached beyond it; group membership may change between calls.

use crate::{AuthError, Identity};
use std::borrow::Cow;
use uuid::Uuid;

/// Members of this group may view and manage every asset.
pub const MANAGER_GROUP: &str = "manager";

/// The outcome of a policy check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Forbidden(Cow<'static, str>),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    /// Turn a denial into an error, for use with `?`.
    pub fn require(self) -> Result<(), AuthError> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::Forbidden(reason) => Err(AuthError::Forbidden(reason)),
        }
    }
}

/// The set of assets a user may see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Everything.
    All,
    /// Only assets assigned to this user.
    AssignedOnly(Uuid),
}

/// May `user` view an asset assigned to `assigned_to`?
///
/// Allowed for superusers, members of the manager group, and the assignee.
/// A missing manager group simply means nobody qualifies through it.
pub fn can_view(user: &Identity, assigned_to: Option<Uuid>) -> Decision {
    if user.superuser || user.is_manager() || assigned_to == Some(user.id) {
        Decision::Allowed
    } else {
        Decision::Forbidden("not permitted to view this asset".into())
    }
}

pub fn can_create(user: &Identity) -> Decision {
    if user.superuser || user.is_manager() {
        Decision::Allowed
    } else {
        Decision::Forbidden("not permitted to create assets".into())
    }
}

/// Update and delete share the same rule as creation.
pub fn can_manage(user: &Identity) -> Decision {
    if user.superuser || user.is_manager() {
        Decision::Allowed
    } else {
        Decision::Forbidden("not permitted to manage this asset".into())
    }
}

/// The set form of [`can_view`]: an asset is in scope exactly when
/// [`can_view`] would allow it.
pub fn list_scope(user: &Identity) -> Scope {
    if user.superuser || user.is_manager() {
        Scope::All
    } else {
        Scope::AssignedOnly(user.id)
    }
}
