//! Model-specific error types.

use os_core::{Handle, OsError};

use crate::object_kind::ObjectKind;

pub type ModelResult<T> = Result<T, ModelError>;

/// Errors from low-level model mutation and consistency checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The handle is not registered in this model.
    UnknownHandle { handle: Handle },

    /// The field index is not a port slot for the object's kind.
    NotAPort {
        handle: Handle,
        kind: ObjectKind,
        port: usize,
    },

    /// A connection must run from an outbound slot to an inbound slot.
    WrongDirection { handle: Handle, port: usize },

    /// An object may not be connected to itself.
    SelfConnection { handle: Handle },

    /// The field is a port slot and can only be written through `connect`.
    PortField { handle: Handle, field: usize },

    /// A half-edge without its mirror on the peer.
    InconsistentConnection { handle: Handle, port: usize },

    /// A pointer to an object that is no longer registered.
    DanglingPointer { handle: Handle, field: usize },

    /// Numeric fields only hold finite values.
    NonFinite { handle: Handle, field: usize },
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::UnknownHandle { handle } => {
                write!(f, "Object {} is not part of this model", handle)
            }
            ModelError::NotAPort { handle, kind, port } => {
                write!(f, "Field {} of {} {} is not a port", port, kind, handle)
            }
            ModelError::WrongDirection { handle, port } => {
                write!(
                    f,
                    "Port {} of object {} has the wrong direction for this connection",
                    port, handle
                )
            }
            ModelError::SelfConnection { handle } => {
                write!(f, "Object {} cannot be connected to itself", handle)
            }
            ModelError::PortField { handle, field } => {
                write!(
                    f,
                    "Field {} of object {} is a port; use connect/disconnect",
                    field, handle
                )
            }
            ModelError::InconsistentConnection { handle, port } => {
                write!(
                    f,
                    "Port {} of object {} has no matching connection on its peer",
                    port, handle
                )
            }
            ModelError::DanglingPointer { handle, field } => {
                write!(
                    f,
                    "Field {} of object {} points to a removed object",
                    field, handle
                )
            }
            ModelError::NonFinite { handle, field } => {
                write!(f, "Field {} of object {} must be finite", field, handle)
            }
        }
    }
}

impl std::error::Error for ModelError {}

impl From<ModelError> for OsError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownHandle { handle } => OsError::NotFound {
                what: handle.to_string(),
            },
            other => OsError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_mentions_port() {
        let err = ModelError::NotAPort {
            handle: Handle::new(),
            kind: ObjectKind::Node,
            port: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("Field 7"));
        assert!(msg.contains("OS:Node"));
    }

    #[test]
    fn unknown_handle_converts_to_not_found() {
        let err: OsError = ModelError::UnknownHandle {
            handle: Handle::new(),
        }
        .into();
        assert!(matches!(err, OsError::NotFound { .. }));
    }
}
