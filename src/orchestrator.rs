//! End-to-end transformation: registry pass → per-sheet classification
//! (rule chain or LLM pipeline) → database resolution → template
//! population → merge.

use thiserror::Error;

use crate::llm::{
    build_classification_request, format_user_inputs, parse_classification_response,
    partition_entries, recombine, structure_results, LlmClient, LlmError,
    DEFAULT_PROMPT_TEMPLATE,
};
use crate::mapping::{
    apply_version_names, assign_category, assign_database, assign_type, canonical_unit_name,
    convert_units, ensure_default_unit, normalize_name, resolve_location,
};
use crate::merge::{merge_sheets, MergeError};
use crate::model::{Entry, ProcessSheet, ProductRegistry, RawSheet};
use crate::reconcile::{
    compare_tables, mapping_snapshot, Reconciliation, ReconcileError, DEFAULT_FLOAT_TOLERANCE,
};
use crate::sheet::build_product_registry;
use crate::table::Table;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("classification failed: {0}")]
    Llm(#[from] LlmError),

    #[error("reconciliation failed: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("merge failed: {0}")]
    Merge(#[from] MergeError),
}

/// Settings for one transformation run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Name of the activity database receiving the modeled processes.
    pub activity_database: String,
    /// Name of the background database technosphere entries map onto.
    pub background_database: String,
    /// Ecoinvent version the output targets; "3.10" enables the
    /// version-specific name substitutions.
    pub ecoinvent_version: String,
    /// Background-database activity names offered to the classifier.
    pub activities: Vec<String>,
    /// Biosphere-flow categories offered to the classifier.
    pub biosphere_flows: Vec<String>,
    /// Prompt template; the built-in default is used when `None`.
    pub prompt_template: Option<String>,
}

impl PipelineOptions {
    pub fn new(activity_database: &str, background_database: &str) -> Self {
        Self {
            activity_database: activity_database.to_string(),
            background_database: background_database.to_string(),
            ecoinvent_version: "3.10".to_string(),
            activities: Vec::new(),
            biosphere_flows: Vec::new(),
            prompt_template: None,
        }
    }
}

/// Mapping quality for one sheet's LLM pass.
#[derive(Debug, Clone)]
pub struct SheetReconciliation {
    pub sheet: String,
    pub reconciliation: Reconciliation,
}

/// Result of a full transformation run.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// The composite output table.
    pub table: Table,
    /// The fully classified per-process sheets, in processing order.
    pub sheets: Vec<ProcessSheet>,
    /// Per-sheet mapping statistics; populated only in the LLM branch.
    pub reconciliations: Vec<SheetReconciliation>,
}

/// Transform all process sheets into one composite output table.
///
/// With an `llm` client, unmapped entries go through the semantic
/// classification pipeline; without one, the deterministic rule chain runs.
/// Sheets process sequentially; the product registry is completed over all
/// sheets before any classification begins.
pub fn transform_sheets(
    sheets: Vec<RawSheet>,
    options: &PipelineOptions,
    llm: Option<&dyn LlmClient>,
) -> Result<TransformOutput, PipelineError> {
    let (consolidated, registry) = build_product_registry(sheets);
    tracing::info!(
        sheets = consolidated.len(),
        products = registry.len(),
        "product registry built"
    );

    let mut processed = Vec::with_capacity(consolidated.len());
    let mut reconciliations = Vec::new();

    for raw_sheet in consolidated {
        let entries: Vec<Entry> = raw_sheet.rows.iter().map(Entry::from_raw).collect();
        tracing::info!(sheet = %raw_sheet.name, rows = entries.len(), "classifying sheet");

        let entries = match llm {
            Some(client) => {
                let (entries, reconciliation) =
                    classify_with_llm(entries, &registry, options, client)?;
                if let Some(reconciliation) = reconciliation {
                    reconciliations.push(SheetReconciliation {
                        sheet: raw_sheet.name.clone(),
                        reconciliation,
                    });
                }
                entries
            }
            None => entries
                .into_iter()
                .map(|e| classify_with_rules(e, &options.ecoinvent_version))
                .collect(),
        };

        let entries = entries
            .into_iter()
            .map(assign_category)
            .map(resolve_location)
            .map(assign_type)
            .map(|e| {
                assign_database(e, &options.background_database, &options.activity_database)
            })
            .collect();

        processed.push(ProcessSheet {
            name: raw_sheet.name,
            description: raw_sheet.description,
            entries,
        });
    }

    let table = merge_sheets(&processed, &options.activity_database)?;
    Ok(TransformOutput {
        table,
        sheets: processed,
        reconciliations,
    })
}

/// Deterministic branch: name rules, version substitutions, canonical unit
/// names, and the substance conversion chain.
fn classify_with_rules(entry: Entry, ecoinvent_version: &str) -> Entry {
    let mut entry = normalize_name(entry);
    if ecoinvent_version == "3.10" {
        entry = apply_version_names(entry);
    }
    entry.unit = canonical_unit_name(&entry.unit);
    ensure_default_unit(convert_units(entry))
}

/// LLM branch: partition, classify the unmapped remainder through the
/// external service, reconcile before/after, and recombine the sheet.
fn classify_with_llm(
    entries: Vec<Entry>,
    registry: &ProductRegistry,
    options: &PipelineOptions,
    client: &dyn LlmClient,
) -> Result<(Vec<Entry>, Option<Reconciliation>), PipelineError> {
    let partitioned = partition_entries(&entries, registry);

    let (structured, reconciliation) = if partitioned.unclassified.is_empty() {
        (Vec::new(), None)
    } else {
        let user_inputs = format_user_inputs(&partitioned.unclassified);
        let before = mapping_snapshot(&partitioned.unclassified);

        let template = options
            .prompt_template
            .as_deref()
            .unwrap_or(DEFAULT_PROMPT_TEMPLATE);
        let request = build_classification_request(
            template,
            &options.activities,
            &options.biosphere_flows,
            &user_inputs,
        );
        let response = client.classify(&request)?;
        let results = parse_classification_response(&response, &user_inputs);
        let structured = structure_results(&results);

        let after = mapping_snapshot(&structured);
        let reconciliation = compare_tables(&before, &after, DEFAULT_FLOAT_TOLERANCE)?;
        (structured, Some(reconciliation))
    };

    let mut combined = recombine(partitioned.product, structured, partitioned.internal);
    for entry in combined.iter_mut() {
        entry.unit = canonical_unit_name(&entry.unit);
    }
    Ok((combined, reconciliation))
}
