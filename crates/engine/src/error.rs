use thiserror::Error;

/// Wiring mistakes. Raised, never folded into a [`crate::Status`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    #[error("Duplicate preference key '{key}'")]
    DuplicateKey { key: String },

    #[error("{class_name} '{key}' is not managed by this PreferenceManager")]
    UnknownPreference { class_name: &'static str, key: String },

    #[error("{dependent} depends on '{target}', which is not managed by this PreferenceManager")]
    UnknownDependency { dependent: String, target: String },
}
