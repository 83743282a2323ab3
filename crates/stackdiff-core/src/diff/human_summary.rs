//! Human-readable summary renderer for structural diffs.

use crate::diff::model::StructuralDiff;

/// Render a Markdown summary of a [`StructuralDiff`].
///
/// Used by the CLI. Matching paths are only counted, never listed.
pub fn render_human_summary(diff: &StructuralDiff) -> String {
    let mut out = String::new();

    out.push_str("## Structural Diff\n\n");

    let status = if diff.is_identical() {
        "Identical"
    } else if diff.has_differences() {
        "Changed"
    } else {
        "Empty"
    };
    out.push_str(&format!(
        "**Status**: {status}  \n**Paths compared**: {}\n\n",
        diff.total_paths()
    ));

    if !diff.has_differences() {
        out.push_str("_No differences detected._\n");
        return out;
    }

    section(&mut out, "Only in A", &diff.left_not_right);
    section(&mut out, "Only in B", &diff.right_not_left);
    section(&mut out, "Different values", &diff.same_key_diff_value);

    out.push_str(&format!(
        "_{} matching path(s)._\n",
        diff.same_key_same_value.len()
    ));
    out
}

fn section(out: &mut String, title: &str, paths: &[String]) {
    if paths.is_empty() {
        return;
    }
    out.push_str(&format!("### {} ({})\n\n", title, paths.len()));
    for path in paths {
        out.push_str(&format!("- `{}`\n", path));
    }
    out.push('\n');
}
