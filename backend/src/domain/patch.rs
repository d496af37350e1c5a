//! Explicit field markers for partial updates.
//!
//! A partial update must distinguish "leave this field alone" from "set this
//! field", and for clearable fields also from "set this field to empty".
//! [`Patch`] makes the first distinction a type rather than a null check;
//! clearable fields use `Patch<Option<T>>`, where `Set(None)` clears.

use crate::domain::task::{TaskDescription, TaskTitle};
use crate::domain::user::{EmailAddress, Username};

/// A single updatable field: either untouched or staged with a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Leave the current value in place.
    #[default]
    Keep,
    /// Replace the current value.
    Set(T),
}

impl<T> Patch<T> {
    /// Borrow the staged value, if any.
    pub fn staged(&self) -> Option<&T> {
        match self {
            Self::Keep => None,
            Self::Set(value) => Some(value),
        }
    }

    /// Write the staged value into `slot`, or leave it untouched.
    pub fn apply_to(self, slot: &mut T) {
        if let Self::Set(value) = self {
            *slot = value;
        }
    }
}

/// Partial update of a task.
///
/// `description` is the one clearable field: `Set(None)` removes it, `Keep`
/// preserves whatever is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Patch<TaskTitle>,
    pub description: Patch<Option<TaskDescription>>,
    pub completed: Patch<bool>,
}

/// Partial update of a user. Both fields are required on the entity, so
/// neither can be cleared, only replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Patch<Username>,
    pub email: Patch<EmailAddress>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_patch_keeps_every_field() {
        let patch = TaskPatch::default();
        assert_eq!(patch.title, Patch::Keep);
        assert_eq!(patch.description, Patch::Keep);
        assert_eq!(patch.completed, Patch::Keep);
    }

    #[test]
    fn apply_to_overwrites_only_when_set() {
        let mut flag = false;
        Patch::Keep.apply_to(&mut flag);
        assert!(!flag);

        Patch::Set(true).apply_to(&mut flag);
        assert!(flag);
    }

    #[test]
    fn staged_exposes_the_pending_value() {
        assert_eq!(Patch::<bool>::Keep.staged(), None);
        assert_eq!(Patch::Set(7).staged(), Some(&7));
    }
}
