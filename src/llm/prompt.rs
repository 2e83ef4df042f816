//! Classification request construction: pipe-delimited input lines,
//! bulleted reference lists, and template filling.

use crate::model::Entry;

/// Placeholder names understood by [`build_classification_request`].
pub const ACTIVITIES_PLACEHOLDER: &str = "{process_list_text}";
pub const BIOSPHERE_PLACEHOLDER: &str = "{biosphere_list_text}";
pub const INPUTS_PLACEHOLDER: &str = "{inputs_text}";

/// Default prompt template, used when the caller supplies none. Callers may
/// instead load a template from an external text resource as long as it
/// carries the three placeholders.
pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"You receive a numbered list of life-cycle-inventory entries, one per line, in the form
name | origin | unit | quantity.

Map every entry to exactly one known background-database activity or one known
biosphere flow, converting the unit and quantity where the mapped activity uses
a different unit.

Known activities:
{process_list_text}

Known biosphere flows:
{biosphere_list_text}

Entries to map:
{inputs_text}

Answer with exactly one line per entry, in the form
<number>. name | location or category | unit | quantity
keeping the input numbering. If no listed activity or flow fits an entry,
answer "<number>. unknown" for that entry.
"#;

/// Format one entry as a pipe-delimited input line.
pub fn format_input_line(entry: &Entry) -> String {
    format!(
        "{} | {} | {} | {}",
        entry.name, entry.origin, entry.unit, entry.amount
    )
}

/// Format the unclassified entries as pipe-delimited input lines.
pub fn format_user_inputs(entries: &[Entry]) -> Vec<String> {
    entries.iter().map(format_input_line).collect()
}

/// Number the input lines 1-based, one per line.
pub fn numbered_inputs(inputs: &[String]) -> String {
    inputs
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a reference list as bulleted lines.
pub fn bulleted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fill the prompt template with the three reference blocks.
pub fn build_classification_request(
    template: &str,
    activities: &[String],
    biosphere_flows: &[String],
    user_inputs: &[String],
) -> String {
    template
        .replace(ACTIVITIES_PLACEHOLDER, &bulleted_list(activities))
        .replace(BIOSPHERE_PLACEHOLDER, &bulleted_list(biosphere_flows))
        .replace(INPUTS_PLACEHOLDER, &numbered_inputs(user_inputs))
}
