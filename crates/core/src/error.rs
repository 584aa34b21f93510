//! Error type shared by registration, rendering and emission.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while building a world or emitting TypeScript.
///
/// None of these are retried: input is fully in memory, so every failure is
/// deterministic and carries the offending name or type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two distinct host types were registered under the same name.
    #[error("name {name:?} is already taken by {existing}, cannot register {incoming}")]
    NameCollision {
        name: String,
        existing: String,
        incoming: String,
    },

    /// Name lookup for a host type that was never registered.
    #[error("type {path} is not registered in the world")]
    UnknownType { path: String },

    /// No rendering rule applies and the type is not registered.
    #[error("unable to refer to the type {ty}; if it's a struct, register it in the world")]
    Unreferrable { ty: String },

    /// A generic origin the engine has no case for.
    #[error("unknown origin {origin:?} (args: {args})")]
    UnknownOrigin { origin: String, args: String },

    /// A shape that violates its own invariants (empty literal, misplaced `...`).
    #[error("invalid type shape: {message}")]
    InvalidShape { message: String },

    /// Malformed override, malformed enum label source, or conflicting options.
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    /// A framework field the model adapter cannot map.
    #[error("unsupported model field type ({field_type}) for field {field:?}: {repr}")]
    UnsupportedField {
        field: String,
        field_type: String,
        repr: String,
    },

    /// Malformed type-graph document or options file.
    #[error("invalid document: {message}")]
    Document { message: String },

    /// The emitted code was rejected by an external syntax checker.
    #[error("emitted TypeScript failed the syntax check: {message}")]
    SyntaxCheck { message: String },
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_shape(message: impl Into<String>) -> Self {
        Self::InvalidShape {
            message: message.into(),
        }
    }

    pub(crate) fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreferrable_message_hints_registration() {
        let err = Error::Unreferrable {
            ty: "app.Widget".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("app.Widget"));
        assert!(msg.contains("register it in the world"));
    }

    #[test]
    fn test_unsupported_field_message_names_field() {
        let err = Error::UnsupportedField {
            field: "geom".into(),
            field_type: "PolygonField".into(),
            repr: "ModelField { name: \"geom\" }".into(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported model field type (PolygonField) for field \"geom\": ModelField { name: \"geom\" }"
        );
    }
}
