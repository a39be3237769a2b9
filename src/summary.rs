//! Condensed views of a [`DiffReport`] for reviewers and narrative services.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::diff::{ComponentBucketKind, NetBucketKind};
use crate::report::DiffReport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestCounts {
    pub net_mismatches: usize,
    pub added_nets: usize,
    pub removed_nets: usize,
    pub unconnected_nets: usize,
    pub added_comps: usize,
    pub removed_comps: usize,
    pub footprint_changes: usize,
    pub value_changes: usize,
    pub pn_changes: usize,
}

/// Bucket counts plus the first few samples of the riskiest lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDigest {
    pub counts: DigestCounts,
    /// Names of the first mismatched nets
    pub top_mismatches: Vec<String>,
    /// First footprint changes, as `REF: old -> new`
    pub top_footprints: Vec<String>,
}

impl ReportDigest {
    pub fn new(report: &DiffReport, top: usize) -> Self {
        let (net, comp) = (&report.net.stats, &report.component.stats);
        Self {
            counts: DigestCounts {
                net_mismatches: net.mismatch,
                added_nets: net.added,
                removed_nets: net.deleted,
                unconnected_nets: net.unconnected,
                added_comps: comp.added,
                removed_comps: comp.removed,
                footprint_changes: comp.footprint_diff,
                value_changes: comp.value_diff,
                pn_changes: comp.pn_diff,
            },
            top_mismatches: report
                .net
                .mismatch
                .iter()
                .take(top)
                .map(|m| m.name.clone())
                .collect(),
            top_footprints: report
                .component
                .footprint_diff
                .iter()
                .take(top)
                .map(|c| format!("{}: {} -> {}", c.reference, c.old.footprint, c.new.footprint))
                .collect(),
        }
    }
}

/// A service that turns a digest into a narrative, such as a risk review.
///
/// Hosts pass their implementation in; the crate ships none.
pub trait Summarizer {
    type Summary;
    type Error;

    fn summarize(&self, digest: &ReportDigest) -> Result<Self::Summary, Self::Error>;
}

impl DiffReport {
    pub fn digest(&self, top: usize) -> ReportDigest {
        ReportDigest::new(self, top)
    }

    pub fn summarize_with<S: Summarizer>(
        &self,
        summarizer: &S,
        top: usize,
    ) -> Result<S::Summary, S::Error> {
        summarizer.summarize(&self.digest(top))
    }
}

/// Markdown summary of a report: bucket counts, then up to `top` entries per bucket.
#[derive(Debug, Clone, Copy)]
pub struct TextSummary<'a> {
    report: &'a DiffReport,
    top: usize,
}

impl<'a> TextSummary<'a> {
    pub fn new(report: &'a DiffReport, top: usize) -> Self {
        Self { report, top }
    }
}

impl<'a> Display for TextSummary<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "## Schematic Diff\n")?;
        if self.report.is_unchanged() {
            writeln!(f, "_No topology or component changes._")?;
        }

        writeln!(f, "### Nets\n")?;
        for kind in NetBucketKind::ALL {
            let bucket = self.report.net.bucket(kind);
            writeln!(f, "- **{}**: {}", kind.label(), bucket.len())?;
            for entry in bucket.entries().iter().take(self.top) {
                writeln!(f, "  - {}", entry.name())?;
            }
        }

        writeln!(f, "\n### Components\n")?;
        for kind in ComponentBucketKind::ALL {
            let bucket = self.report.component.bucket(kind);
            writeln!(f, "- **{}**: {}", kind.label(), bucket.len())?;
            for entry in bucket.entries().iter().take(self.top) {
                writeln!(f, "  - {}", entry.reference())?;
            }
        }
        Ok(())
    }
}

pub fn render_text_summary(report: &DiffReport, top: usize) -> String {
    TextSummary::new(report, top).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Part;

    fn report() -> DiffReport {
        let old = vec![
            Part::new("U1").with_pin("1", "", "A").with_pin("2", "", "B"),
            Part::new("R1").with_footprint("R0402").with_pin("1", "", "A"),
            Part::new("R2").with_footprint("R0402").with_pin("1", "", "B"),
        ];
        let new = vec![
            Part::new("U1").with_pin("1", "", "A").with_pin("2", "", "B"),
            Part::new("R1").with_footprint("R0603").with_pin("1", "", "B"),
            Part::new("R2").with_footprint("R0603").with_pin("1", "", "A"),
        ];
        DiffReport::compare(&old, &new)
    }

    #[test]
    fn digest_counts_and_samples() {
        let digest = report().digest(1);
        assert_eq!(digest.counts.net_mismatches, 2);
        assert_eq!(digest.counts.footprint_changes, 2);
        assert_eq!(digest.top_mismatches, ["A"]);
        assert_eq!(digest.top_footprints, ["R1: R0402 -> R0603"]);
    }

    struct Headline;

    impl Summarizer for Headline {
        type Summary = String;
        type Error = std::convert::Infallible;

        fn summarize(&self, digest: &ReportDigest) -> Result<String, Self::Error> {
            Ok(format!("{} nets changed", digest.counts.net_mismatches))
        }
    }

    #[test]
    fn summarizer_receives_digest() {
        let summary = report().summarize_with(&Headline, 5).unwrap();
        assert_eq!(summary, "2 nets changed");
    }

    #[test]
    fn text_summary_lists_buckets() {
        let text = render_text_summary(&report(), 5);
        assert!(text.contains("- **Mismatches**: 2\n  - A\n  - B\n"));
        assert!(text.contains("- **Footprints**: 2\n  - R1\n  - R2\n"));
        assert!(!text.contains("No topology"));

        let clean = DiffReport::compare(&[], &[]);
        assert!(render_text_summary(&clean, 5).contains("No topology"));
    }

    #[test]
    fn summary_respects_top() {
        let text = TextSummary::new(&report(), 1).to_string();
        assert!(text.starts_with("## Schematic Diff\n\n### Nets\n\n"));
        assert!(text.contains("- **Mismatches**: 2\n  - A\n- **Added**: 0\n"));
        assert!(text.contains("\n### Components\n\n"));
    }
}
