//! KinGraph view core
//!
//! Reconciles name-less relation graphs from an external inference engine
//! into a locally owned, name-bearing graph store, and lays that store out on
//! a plane with a single deterministic depth-first walk.

pub mod config;
pub mod error;
pub mod model;
pub mod persistence;
pub mod relation_engine;
pub mod session;
pub mod snapshot;
pub mod systems;

#[cfg(feature = "napi")]
pub mod napi_bindings;

pub use config::{MergeStrategy, ViewConfig};
pub use error::{KinError, Result};
pub use model::*;
pub use persistence::{ExportData, ImportResult};
pub use relation_engine::{DescriptiveResult, EnginePerson, RelationEngine, StaticEngine};
pub use session::{KinSession, Presentation, PresentedNode};
pub use snapshot::{RelationEngineSnapshot, SnapshotNode, SnapshotRelation};
pub use systems::{EdgePath, Layout, LayoutEdge, MergeReport};
