//! Ownership checks run before any record or goal is edited or removed.

use crate::models::{Goal, MoneyRecord, RecordKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Edit,
    Delete,
}

impl Action {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum AccessError {
    #[error("You are not authorized to {action} this {kind}.")]
    NotOwner {
        action: &'static str,
        kind: &'static str,
    },
    #[error("No {kind} with id {id}.")]
    NotFound { kind: &'static str, id: i64 },
}

/// Anything that belongs to exactly one owner.
pub(crate) trait Owned {
    fn owner_id(&self) -> i64;
    fn kind_label(&self) -> &'static str;
}

impl Owned for MoneyRecord {
    fn owner_id(&self) -> i64 {
        self.owner_id
    }

    fn kind_label(&self) -> &'static str {
        match self.kind {
            RecordKind::Expense => "expense",
            RecordKind::Income => "income",
        }
    }
}

impl Owned for Goal {
    fn owner_id(&self) -> i64 {
        self.owner_id
    }

    fn kind_label(&self) -> &'static str {
        "goal"
    }
}

pub(crate) fn authorize<T: Owned>(
    requester_id: i64,
    item: &T,
    action: Action,
) -> Result<(), AccessError> {
    if item.owner_id() == requester_id {
        return Ok(());
    }
    tracing::warn!(
        requester_id,
        owner_id = item.owner_id(),
        kind = item.kind_label(),
        action = action.as_str(),
        "Access denied"
    );
    Err(AccessError::NotOwner {
        action: action.as_str(),
        kind: item.kind_label(),
    })
}

/// Resolve a lookup result and check ownership in one step.
pub(crate) fn authorize_found<T: Owned>(
    requester_id: i64,
    found: Option<T>,
    kind: &'static str,
    id: i64,
    action: Action,
) -> Result<T, AccessError> {
    let item = found.ok_or(AccessError::NotFound { kind, id })?;
    authorize(requester_id, &item, action)?;
    Ok(item)
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod access_tests;
