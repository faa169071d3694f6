//! Column-aligned help lines.

use crate::spec::{ArgSpec, HelpRow};

const COLUMN_GAP: &str = "   ";

/// Column widths for one rendering of a spec list.
///
/// Widths come from the specs passed in, so two parsers with different
/// argument sets never influence each other's layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HelpLayout {
    short_width: usize,
    long_width: usize,
}

impl HelpLayout {
    pub fn from_specs(specs: &[ArgSpec]) -> Self {
        Self::from_rows(specs.iter().map(ArgSpec::display_row))
    }

    pub fn from_rows(rows: impl IntoIterator<Item = HelpRow>) -> Self {
        let mut layout = Self::default();
        for row in rows {
            if let Some(s) = &row.short_flag {
                layout.short_width = layout.short_width.max(s.chars().count());
            }
            if let Some(l) = &row.long_flag {
                layout.long_width = layout.long_width.max(l.chars().count());
            }
        }
        layout
    }

    pub fn render(&self, spec: &ArgSpec) -> String {
        self.render_row(&spec.display_row())
    }

    /// `\t<short>   <long>   <description>[ (Required)]`, plus an indented
    /// `(default = ...)` line when the spec has a default.
    pub fn render_row(&self, row: &HelpRow) -> String {
        let short = row.short_flag.as_deref().unwrap_or("");
        let long = row.long_flag.as_deref().unwrap_or("");
        let flags = format!(
            "{short:<sw$}{COLUMN_GAP}{long:<lw$}{COLUMN_GAP}",
            sw = self.short_width,
            lw = self.long_width,
        );

        let mut out = format!("\t{flags}{}", row.description);
        if row.required {
            out.push_str(" (Required)");
        }
        if let Some(default) = &row.default_text {
            let indent = flags.chars().count();
            out.push_str(&format!("\n\t{:indent$}(default = {default})", ""));
        }
        out
    }
}
