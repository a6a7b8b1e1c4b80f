//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`PlantError`]
//! via `#[from]` at port boundaries.

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum PlantError {
    /// A store path failed validation.
    #[error("invalid path")]
    InvalidPath(#[from] PathError),

    /// A user command was refused by the control rules.
    #[error("command rejected")]
    Rejected(#[from] ControlError),

    /// The remote store (or its transport) failed.
    #[error("store error")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons a [`StorePath`](crate::path::StorePath) cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Two slashes in a row, or a leading/trailing slash around nothing.
    #[error("path {path:?} contains an empty segment")]
    EmptySegment { path: String },

    /// A segment contains one of `.`, `#`, `$`, `[`, `]`.
    #[error("path segment {segment:?} contains forbidden character {character:?}")]
    ForbiddenCharacter { segment: String, character: char },
}

/// Reasons a user toggle is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// The master switch is off (or, for mode changes, not known to be on).
    #[error("system is powered off")]
    SystemDisabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_path_error_into_plant_error() {
        let err: PlantError = PathError::EmptySegment {
            path: "a//b".to_string(),
        }
        .into();
        assert!(matches!(err, PlantError::InvalidPath(_)));
    }

    #[test]
    fn should_convert_control_error_into_plant_error() {
        let err: PlantError = ControlError::SystemDisabled.into();
        assert!(matches!(
            err,
            PlantError::Rejected(ControlError::SystemDisabled)
        ));
    }

    #[test]
    fn should_display_forbidden_character() {
        let err = PathError::ForbiddenCharacter {
            segment: "a.b".to_string(),
            character: '.',
        };
        assert_eq!(
            err.to_string(),
            "path segment \"a.b\" contains forbidden character '.'"
        );
    }
}
