use std::fmt;

use thiserror::Error;

/// Which side of a call a marshalled value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Argument,
    Result,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Argument => f.write_str("argument"),
            Self::Result => f.write_str("result"),
        }
    }
}

/// Errors from registration, casting, and dispatch.
///
/// A failed cast is not an error: the cast engine reports it as `None`.
/// Everything here stems from incorrect usage and is never retried.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LineageError {
    /// The object's real type was requested before it was registered.
    #[error("object of type {type_name} used before registration")]
    UninitializedObject { type_name: &'static str },

    /// The value's embedding chain does not end in a root marker.
    #[error("{type_name} does not embed a root marker")]
    MissingRootMarker { type_name: &'static str },

    /// The object is already bound to a different real type.
    #[error("object already registered as {registered}, refusing to re-register as {requested}")]
    ConflictingRegistration {
        registered: &'static str,
        requested: &'static str,
    },

    /// Neither the real type nor any ancestor implements the behavior.
    #[error("behavior '{behavior}' not found on {real_type} or any of its ancestors")]
    BehaviorNotFound {
        behavior: &'static str,
        real_type: &'static str,
    },

    /// A result slot did not hold the type the caller expected.
    #[error("behavior '{behavior}' result {slot}: expected {expected}, found {found}")]
    ResultTypeMismatch {
        behavior: &'static str,
        slot: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// An argument slot did not hold the type the implementation expected.
    #[error("behavior '{behavior}' argument {slot}: expected {expected}, found {found}")]
    ArgumentTypeMismatch {
        behavior: &'static str,
        slot: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// The number of marshalled values differs from the signature.
    #[error("behavior '{behavior}' {kind} count mismatch: expected {expected}, found {found}")]
    ArityMismatch {
        behavior: &'static str,
        kind: SlotKind,
        expected: usize,
        found: usize,
    },

    /// The implementation's declaring type is not embedded in the receiver.
    #[error("behavior '{behavior}' is declared on {declared_on}, which {real_type} does not embed")]
    ReceiverMismatch {
        behavior: &'static str,
        declared_on: &'static str,
        real_type: &'static str,
    },

    /// A shared body invoked a behavior that needs the object exclusively.
    #[error("behavior '{behavior}' needs an exclusive receiver, but was invoked from a shared one")]
    ExclusiveReceiverUnavailable { behavior: &'static str },
}

impl LineageError {
    /// Build the type-mismatch variant matching `kind`.
    pub fn type_mismatch(
        kind: SlotKind,
        behavior: &'static str,
        slot: usize,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        match kind {
            SlotKind::Argument => Self::ArgumentTypeMismatch {
                behavior,
                slot,
                expected,
                found,
            },
            SlotKind::Result => Self::ResultTypeMismatch {
                behavior,
                slot,
                expected,
                found,
            },
        }
    }

    /// Returns `true` for [`LineageError::UninitializedObject`].
    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Self::UninitializedObject { .. })
    }
}

/// Result alias for Lineage operations.
pub type LineageResult<T> = Result<T, LineageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninitialized_names_the_type() {
        let err = LineageError::UninitializedObject {
            type_name: "app::Sub",
        };
        assert!(err.is_uninitialized());
        assert_eq!(err.to_string(), "object of type app::Sub used before registration");
    }

    #[test]
    fn type_mismatch_picks_variant_by_slot_kind() {
        let arg = LineageError::type_mismatch(SlotKind::Argument, "f", 0, "i32", "String");
        assert!(matches!(arg, LineageError::ArgumentTypeMismatch { slot: 0, .. }));

        let res = LineageError::type_mismatch(SlotKind::Result, "f", 1, "i32", "String");
        assert_eq!(
            res.to_string(),
            "behavior 'f' result 1: expected i32, found String"
        );
    }

    #[test]
    fn arity_message_names_the_side() {
        let err = LineageError::ArityMismatch {
            behavior: "f",
            kind: SlotKind::Argument,
            expected: 2,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "behavior 'f' argument count mismatch: expected 2, found 1"
        );
    }
}
