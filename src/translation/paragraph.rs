/*!
 * Run aggregation and redistribution within one paragraph.
 *
 * Translation backends do much better on whole sentences than on fragments,
 * so a paragraph's runs are concatenated, translated as one unit, and the
 * result is written back into the original run structure.
 */

use crate::presentation::Paragraph;

/// Aggregated source text of one paragraph, with the indices of the runs
/// that contributed to it. Ephemeral: built, used for one write-back,
/// discarded.
#[derive(Debug, Clone)]
pub struct RunAggregate {
    /// Indices of the retained (non-whitespace) runs, in order
    pub run_indices: Vec<usize>,
    /// Concatenation of the retained runs' text, no separator
    pub text: String,
}

/// Collect the paragraph's translatable text.
///
/// Runs that are empty or whitespace-only are excluded: they keep their
/// text and never receive a share of the translation. Returns `None` when
/// nothing remains, which callers treat as "skip this paragraph".
pub fn aggregate_runs(paragraph: &Paragraph) -> Option<RunAggregate> {
    let mut run_indices = Vec::new();
    let mut text = String::new();

    for (index, run) in paragraph.runs.iter().enumerate() {
        if run.text.trim().is_empty() {
            continue;
        }
        text.push_str(&run.text);
        run_indices.push(index);
    }

    if run_indices.is_empty() {
        return None;
    }

    Some(RunAggregate { run_indices, text })
}

/// Write one translated string back across the retained runs.
///
/// There is no reliable alignment from the translated string back to the
/// original runs' character spans, so the whole translation goes into the
/// first retained run and the remaining retained runs are emptied. Their
/// elements stay in place, preserving run count and formatting slots.
/// Runs that were excluded from aggregation are not touched.
pub fn redistribute(paragraph: &mut Paragraph, run_indices: &[usize], translated: &str) {
    let mut indices = run_indices.iter();

    if let Some(&first) = indices.next() {
        if let Some(run) = paragraph.runs.get_mut(first) {
            run.text = translated.to_string();
        }
    }

    for &index in indices {
        if let Some(run) = paragraph.runs.get_mut(index) {
            run.text.clear();
        }
    }
}
