//! Migration core - matches source entities in the destination and replicates them.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - Entities, queries, match outcomes, failure records
//! - **Traits** (`traits.rs`) - Source/destination seams, with mocks for tests
//! - **QueryBuilder** (`query.rs`) - Entity → search string
//! - **MatchResolver** (`resolver.rs`) - Search with limit 1, classify the outcome
//! - **CollectionAssembler** (`assembler.rs`) - Create playlists, append in order
//! - **FailureRecorder** (`recorder.rs`) - Append-only failure log
//! - **Pipeline** (`pipeline.rs`) - Orchestrates everything per collection
//!
//! # Usage
//!
//! ```ignore
//! use migration::{FailureRecorder, MigrationOptions, MigrationPipeline, RunMode};
//!
//! let recorder = FailureRecorder::open_append("errored-tracks.log")?;
//! let pipeline = MigrationPipeline::new(&export, &spotify, &recorder, MigrationOptions::default());
//! let summary = pipeline.run(RunMode::Playlists, None).await?;
//! println!("{} added, {} failed", summary.appended(), summary.failed());
//! ```

pub mod assembler;
pub mod domain;
pub mod pipeline;
pub mod query;
pub mod recorder;
pub mod resolver;
pub mod traits;

pub use domain::{
    DestinationError, DestinationId, EntityKind, FailureReason, FailureRecord, MatchResult,
    MigrationError, Query, SourceCollection, SourceEntity, SourceError, UnresolvedReason,
    Visibility,
};
pub use pipeline::{CollectionReport, CollectionState, MigrationOptions, MigrationPipeline, RunMode, RunSummary};
pub use recorder::FailureRecorder;
pub use traits::{DestinationCatalog, SourceCatalog};
