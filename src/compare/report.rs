use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// One structural difference between two datasets
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    /// Where the difference was found (e.g. `section 'peaks' / item 3`)
    pub path: String,
    /// What differs
    pub detail: String,
}

/// Outcome of a comparison
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonReport {
    /// Differences in discovery order
    pub differences: Vec<Difference>,
    /// Item differences left out of the list to keep it readable
    pub omitted: usize,
}

impl ComparisonReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, path: impl Into<String>, detail: impl Into<String>) {
        self.differences.push(Difference {
            path: path.into(),
            detail: detail.into(),
        });
    }

    /// Whether no difference was found
    pub fn is_equal(&self) -> bool {
        self.differences.is_empty() && self.omitted == 0
    }

    /// Total number of differences, including omitted ones
    pub fn difference_count(&self) -> usize {
        self.differences.len() + self.omitted
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static SAME: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static DIFF: Emoji<'_, '_> = Emoji("✗", "[DIFF]");

            let mut output = String::new();
            output.push_str(&format!("{}\n", style("Comparison Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("=================").cyan()));

            if self.is_equal() {
                output.push_str(&format!("[{}] {}\n", SAME, style("Datasets are equal").green().bold()));
                return output;
            }

            for diff in &self.differences {
                output.push_str(&format!(
                    "[{}] {}: {}\n",
                    DIFF,
                    style(&diff.path).red(),
                    diff.detail
                ));
            }
            if self.omitted > 0 {
                output.push_str(&format!(
                    "{}\n",
                    style(format!("... and {} more", self.omitted)).dim()
                ));
            }
            output.push('\n');
            output.push_str(&format!(
                "{}: {} differences\n",
                style("Summary").bold(),
                style(self.difference_count()).red()
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Comparison Report")?;
        writeln!(f, "=================")?;
        if self.is_equal() {
            return writeln!(f, "[✓] Datasets are equal");
        }
        for diff in &self.differences {
            writeln!(f, "[✗] {}: {}", diff.path, diff.detail)?;
        }
        if self.omitted > 0 {
            writeln!(f, "... and {} more", self.omitted)?;
        }
        writeln!(f)?;
        writeln!(f, "Summary: {} differences", self.difference_count())
    }
}
