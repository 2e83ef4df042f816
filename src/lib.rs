//! lcibridge turns raw life-cycle-inventory process sheets into entries
//! ready for a Brightway-style database import.
//!
//! The pipeline runs in stages: sheet ingest and by-product consolidation,
//! deterministic name/unit/classification rules (or alternatively an
//! LLM-backed semantic mapping pass with before/after reconciliation),
//! activity-template population, and the final merge into one composite
//! table.

pub mod config;
pub mod llm;
pub mod mapping;
pub mod merge;
pub mod model;
pub mod orchestrator;
pub mod reconcile;
pub mod sheet;
pub mod table;

pub use config::LlmConfig;
pub use llm::{LlmClient, MockLlmClient, OpenAiClient};
pub use model::{Entry, EntryType, ProcessSheet, ProductRegistry, RawRow, RawSheet};
pub use orchestrator::{transform_sheets, PipelineError, PipelineOptions, TransformOutput};
pub use table::{Cell, Table};
