use repochunk_indexer::BatchOutput;
use std::collections::BTreeMap;
use std::path::Path;

/// Markdown summary of a batch run
pub fn render_batch_report(root: &Path, output: &BatchOutput) -> String {
    let stats = &output.stats;

    let mut md = String::new();
    md.push_str("# Repochunk extraction report\n\n");
    md.push_str(&format!("- Root: `{}`\n", root.display()));
    md.push_str(&format!(
        "- Files: `{}` seen, `{}` chunked, `{}` skipped, `{}` failed\n",
        stats.files_seen, stats.files_chunked, stats.files_skipped, stats.files_failed
    ));
    md.push_str(&format!(
        "- Records: `{}` chunks, `{}` context\n",
        stats.chunks, stats.context_chunks
    ));
    md.push_str(&format!("- Lines: `{}`\n", stats.total_lines));
    md.push_str(&format!("- Time: `{} ms`\n\n", stats.time_ms));

    if !stats.grammars.is_empty() {
        md.push_str("## Grammars\n\n");
        md.push_str("| grammar | files |\n");
        md.push_str("|---|---:|\n");
        for (grammar, files) in &stats.grammars {
            md.push_str(&format!("| `{grammar}` | `{files}` |\n"));
        }
        md.push('\n');
    }

    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for chunk in &output.chunks {
        *by_type.entry(chunk.node_type.as_str()).or_insert(0) += 1;
    }
    if !by_type.is_empty() {
        md.push_str("## Chunk types\n\n");
        md.push_str("| type | chunks |\n");
        md.push_str("|---|---:|\n");
        let mut rows: Vec<_> = by_type.into_iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        for (node_type, count) in rows {
            md.push_str(&format!("| `{node_type}` | `{count}` |\n"));
        }
        md.push('\n');
    }

    let mut by_relationship: BTreeMap<&str, usize> = BTreeMap::new();
    for context in &output.context_chunks {
        *by_relationship
            .entry(context.relationship.as_str())
            .or_insert(0) += 1;
    }
    if !by_relationship.is_empty() {
        md.push_str("## Context relationships\n\n");
        md.push_str("| relationship | records |\n");
        md.push_str("|---|---:|\n");
        for (relationship, count) in by_relationship {
            md.push_str(&format!("| `{relationship}` | `{count}` |\n"));
        }
        md.push('\n');
    }

    if !output.failures.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| path | reason |\n");
        md.push_str("|---|---|\n");
        for failure in &output.failures {
            md.push_str(&format!(
                "| `{}` | {} |\n",
                escape_cell(&failure.path),
                escape_cell(&truncate_one_line(&failure.reason, 160))
            ));
        }
        md.push('\n');
    }

    md
}

fn truncate_one_line(text: &str, max_chars: usize) -> String {
    let mut s = text.replace(['\n', '\r', '\t'], " ");
    s = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.chars().count() <= max_chars {
        return s;
    }
    let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}…")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
