//! Compare two revisions of an electrical schematic.
//!
//! A schematic export is ingested into a [`Snapshot`] of [`Part`]s. For a pair
//! of snapshots the crate derives
//!
//! - a net-level diff ([`diff_nets`] over two [`NetIndex`]es): nets whose
//!   connections changed, appeared or disappeared, plus single-part nets;
//! - a component-level diff ([`diff_components`]): parts added or removed,
//!   and footprint, value and part-number changes per reference designator.
//!
//! [`DiffReport`] bundles both.
//!
//! ```no_run
//! use schematic_diff::{ingest, DiffReport, ExportFormat, IngestOptions, PartNumberClassifier};
//!
//! # fn main() -> Result<(), schematic_diff::ParseError> {
//! let options = IngestOptions::default();
//! let old = ingest::load(r#"{"lstPage": []}"#, ExportFormat::OrcadJson, &options, &PartNumberClassifier)?;
//! let new = ingest::load(r#"{"lstPage": []}"#, ExportFormat::OrcadJson, &options, &PartNumberClassifier)?;
//! let report = DiffReport::compare(&old.parts, &new.parts);
//! println!("{} mismatched nets", report.net.stats.mismatch);
//! # Ok(())
//! # }
//! ```

mod classify;
pub mod diff;
mod error;
pub mod index;
pub mod ingest;
mod model;
mod report;
pub mod sexpr;
mod summary;

pub use classify::{Classifier, PartNumberClassifier};
pub use diff::{
    diff_components, diff_nets, ComponentBucket, ComponentBucketKind, ComponentDiff,
    ComponentDiffStats, ComponentEntry, NetBucket, NetBucketKind, NetDiff, NetDiffStats, NetEntry,
    NetMismatch, PartChange, PartProperty,
};
pub use error::{ParseError, Span};
pub use index::{Connection, IndexOptions, Net, NetIndex};
pub use ingest::{ExportFormat, IngestOptions};
pub use model::{is_do_not_install, Classification, Meta, Part, Pin, Snapshot, Stats, NO_CONNECT};
pub use report::{Comparison, DiffReport};
pub use summary::{render_text_summary, DigestCounts, ReportDigest, Summarizer, TextSummary};
