//! Caller identity and record ownership.
//!
//! Every mutation receives an explicit [`CallerContext`] and runs
//! [`authorize`] against the loaded record before writing. Ownership is a
//! direct equality check on the record's `user_id`.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// The resolved identity of whoever issued the current call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallerContext {
    pub user_id: DbId,
}

impl CallerContext {
    pub fn new(user_id: DbId) -> Self {
        Self { user_id }
    }
}

/// A record owned by exactly one user account.
pub trait Owned {
    /// Entity name used in error messages (e.g. `"Idea"`).
    const ENTITY: &'static str;

    fn id(&self) -> DbId;

    fn owner_id(&self) -> DbId;
}

/// Verify that `caller` owns `record`.
pub fn authorize<T: Owned>(record: &T, caller: &CallerContext) -> Result<(), CoreError> {
    if record.owner_id() == caller.user_id {
        Ok(())
    } else {
        Err(CoreError::AccessDenied(format!(
            "{} {} does not belong to the current user",
            T::ENTITY,
            record.id()
        )))
    }
}

/// Resolve an optional record for a mutation.
///
/// A missing record is `NotFound`; a record owned by someone else is
/// `AccessDenied`.
pub fn require_owned<T: Owned>(
    record: Option<T>,
    id: DbId,
    caller: &CallerContext,
) -> Result<T, CoreError> {
    let record = record.ok_or(CoreError::NotFound {
        entity: T::ENTITY,
        id,
    })?;
    authorize(&record, caller)?;
    Ok(record)
}

/// Filter an optional record for a read path.
///
/// Reads never error on missing or foreign records; both collapse to `None`
/// so presentation layers can render an empty state.
pub fn visible_to<T: Owned>(record: Option<T>, caller: &CallerContext) -> Option<T> {
    record.filter(|r| r.owner_id() == caller.user_id)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[derive(Debug)]
    struct Note {
        id: DbId,
        user_id: DbId,
    }

    impl Owned for Note {
        const ENTITY: &'static str = "Note";

        fn id(&self) -> DbId {
            self.id
        }

        fn owner_id(&self) -> DbId {
            self.user_id
        }
    }

    #[test]
    fn owner_is_authorized() {
        let note = Note { id: 1, user_id: 7 };
        assert!(authorize(&note, &CallerContext::new(7)).is_ok());
    }

    #[test]
    fn other_user_is_denied() {
        let note = Note { id: 1, user_id: 7 };
        let err = authorize(&note, &CallerContext::new(8)).unwrap_err();
        assert_matches!(err, CoreError::AccessDenied(msg) if msg.contains("Note 1"));
    }

    #[test]
    fn require_owned_reports_missing_record() {
        let err = require_owned::<Note>(None, 42, &CallerContext::new(1)).unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "Note", id: 42 });
    }

    #[test]
    fn visible_to_hides_foreign_records() {
        let caller = CallerContext::new(2);
        assert!(visible_to(Some(Note { id: 1, user_id: 3 }), &caller).is_none());
        assert!(visible_to(Some(Note { id: 1, user_id: 2 }), &caller).is_some());
        assert!(visible_to::<Note>(None, &caller).is_none());
    }
}
