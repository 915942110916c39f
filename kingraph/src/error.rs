//! Error types shared by merge, layout, persistence and the session.

use crate::model::PersonId;

/// Errors raised by the kin graph core.
#[derive(Debug, thiserror::Error)]
pub enum KinError {
    #[error("unrecognized relation tag `{tag}` in snapshot")]
    InvalidRelationTag { tag: String },
    #[error("unrecognized sex tag `{tag}` in snapshot")]
    InvalidSexTag { tag: String },
    #[error("person {id} appears more than once in snapshot")]
    DuplicatePersonId { id: PersonId },
    #[error("layout root {id} is not in the graph store")]
    RootNotFound { id: PersonId },
    #[error("person {id} is not in the graph store")]
    PersonNotFound { id: PersonId },
    #[error("invalid view config: {0}")]
    InvalidConfig(String),
    #[error("unsupported export version: {0}")]
    UnsupportedVersion(u8),
    #[error(transparent)]
    Engine(#[from] anyhow::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("binary encoding error: {0}")]
    Binary(#[from] bincode::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = KinError> = std::result::Result<T, E>;
