//! Core module - storage, persistence and project plumbing

pub mod category;
pub mod config;
pub mod error;
pub mod identity;
pub mod project;
pub mod scenario_store;
pub mod storage;

pub use category::DataCategory;
pub use config::Config;
pub use error::ValidationError;
pub use identity::{IdParseError, SegmentId, SegmentIdGenerator};
pub use project::{Project, ProjectError};
pub use scenario_store::{
    ExportDocument, ImportSummary, ScenarioComparison, ScenarioFigures, ScenarioStore, StoreError,
};
pub use storage::{MemoryStorage, SqliteStorage, StorageError, StoragePort};
