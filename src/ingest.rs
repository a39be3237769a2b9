//! Turning vendor exports into [`Snapshot`]s.
//!
//! This is the only fallible layer of the crate. Whatever comes out of it is
//! accepted by the comparison engine as-is.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classify::Classifier;
use crate::error::ParseError;
use crate::model::{default_no_connect_markers, is_bound_net, Meta, Part, Snapshot, Stats};

pub mod kicad;
pub mod orcad;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngestOptions {
    /// Reject exports that repeat a reference designator
    pub strict_references: bool,
    /// Net names that mean "no connect"; such pins are dropped
    pub no_connect_markers: Vec<String>,
    /// Label carried into [`Meta::encoding`]
    pub encoding: String,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            strict_references: false,
            no_connect_markers: default_no_connect_markers(),
            encoding: "UTF-8".to_owned(),
        }
    }
}

impl IngestOptions {
    pub(crate) fn is_bound(&self, net_name: &str) -> bool {
        is_bound_net(net_name, &self.no_connect_markers)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportFormat {
    /// OrCAD design JSON (`objDsn`/`lstSche`/`lstPage`)
    OrcadJson,
    /// KiCad S-expression netlist
    KicadNetlist,
}

impl ExportFormat {
    /// Guess the format from the file extension, falling back to the first
    /// non-blank character of the content.
    pub fn detect(path: Option<&Path>, input: &str) -> Option<Self> {
        let by_extension = path
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_ascii_lowercase().as_str() {
                "json" => Some(Self::OrcadJson),
                "net" => Some(Self::KicadNetlist),
                _ => None,
            });
        by_extension.or_else(|| match input.trim_start().chars().next() {
            Some('{') => Some(Self::OrcadJson),
            Some('(') => Some(Self::KicadNetlist),
            _ => None,
        })
    }
}

/// Parse an export of a known format.
pub fn load(
    input: &str,
    format: ExportFormat,
    options: &IngestOptions,
    classifier: &dyn Classifier,
) -> Result<Snapshot, ParseError> {
    match format {
        ExportFormat::OrcadJson => orcad::parse(input, options, classifier),
        ExportFormat::KicadNetlist => kicad::parse(input, options, classifier),
    }
}

/// Fail on the first reference designator seen twice.
pub fn check_unique_references(parts: &[Part]) -> Result<(), ParseError> {
    match duplicate_references(parts).into_iter().next() {
        Some(reference) => Err(ParseError::DuplicateReference {
            reference: reference.to_owned(),
        }),
        None => Ok(()),
    }
}

/// Reference designators that occur more than once, in order of their second occurrence.
pub fn duplicate_references(parts: &[Part]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    parts
        .iter()
        .map(|p| p.reference.as_str())
        .filter(|r| !seen.insert(*r) && reported.insert(*r))
        .collect()
}

/// Shared tail of every ingestor: reference policy, stats, logging.
pub(crate) fn finish(
    parts: Vec<Part>,
    meta: Meta,
    pin_count: usize,
    options: &IngestOptions,
) -> Result<Snapshot, ParseError> {
    if options.strict_references {
        check_unique_references(&parts)?;
    } else {
        for reference in duplicate_references(&parts) {
            warn!(%reference, "duplicate reference designator, last one wins");
        }
    }

    let nets: HashSet<&str> = parts
        .iter()
        .flat_map(|part| part.net_names(&options.no_connect_markers))
        .collect();
    let stats = Stats {
        parts: parts.len(),
        pins: pin_count,
        nets: nets.len(),
    };
    info!(
        design = %meta.name,
        parts = stats.parts,
        pins = stats.pins,
        nets = stats.nets,
        "loaded snapshot"
    );
    Ok(Snapshot { parts, meta, stats })
}
