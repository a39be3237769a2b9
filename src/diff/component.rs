use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Part;

/// A part property compared between snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartProperty {
    Footprint,
    Value,
    PartNumber,
}

impl PartProperty {
    pub const ALL: [PartProperty; 3] = [Self::Footprint, Self::Value, Self::PartNumber];

    pub fn of(self, part: &Part) -> &str {
        match self {
            Self::Footprint => &part.footprint,
            Self::Value => &part.value,
            Self::PartNumber => &part.part_number,
        }
    }
}

/// A reference present in both snapshots with one property changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartChange {
    pub reference: String,
    /// Page of the part in the new snapshot
    pub page: String,
    pub old: Part,
    pub new: Part,
}

impl PartChange {
    fn new(old: &Part, new: &Part) -> Self {
        Self {
            reference: new.reference.clone(),
            page: new.page_name.clone(),
            old: old.clone(),
            new: new.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDiffStats {
    pub added: usize,
    pub removed: usize,
    pub footprint_diff: usize,
    pub value_diff: usize,
    pub pn_diff: usize,
}

/// Result of [`diff_components`].
///
/// The three property lists are independent: one reference may appear in
/// several of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDiff {
    pub added: Vec<Part>,
    pub removed: Vec<Part>,
    pub footprint_diff: Vec<PartChange>,
    pub value_diff: Vec<PartChange>,
    pub pn_diff: Vec<PartChange>,
    pub stats: ComponentDiffStats,
}

impl ComponentDiff {
    pub fn changes(&self, property: PartProperty) -> &[PartChange] {
        match property {
            PartProperty::Footprint => &self.footprint_diff,
            PartProperty::Value => &self.value_diff,
            PartProperty::PartNumber => &self.pn_diff,
        }
    }

    fn changes_mut(&mut self, property: PartProperty) -> &mut Vec<PartChange> {
        match property {
            PartProperty::Footprint => &mut self.footprint_diff,
            PartProperty::Value => &mut self.value_diff,
            PartProperty::PartNumber => &mut self.pn_diff,
        }
    }

    pub(crate) fn recount(&mut self) {
        self.stats = ComponentDiffStats {
            added: self.added.len(),
            removed: self.removed.len(),
            footprint_diff: self.footprint_diff.len(),
            value_diff: self.value_diff.len(),
            pn_diff: self.pn_diff.len(),
        };
    }

    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && PartProperty::ALL
                .iter()
                .all(|&property| self.changes(property).is_empty())
    }
}

fn by_reference(parts: &[Part]) -> HashMap<&str, &Part> {
    // Later duplicates replace earlier ones.
    parts.iter().map(|p| (p.reference.as_str(), p)).collect()
}

/// Compare two part lists keyed by reference designator.
///
/// Property comparison is exact string equality. When a snapshot repeats a
/// reference, the last part with that reference is the one matched against.
pub fn diff_components(old: &[Part], new: &[Part]) -> ComponentDiff {
    let old_map = by_reference(old);
    let new_map = by_reference(new);
    let mut diff = ComponentDiff::default();

    for part in new {
        let Some(prev) = old_map.get(part.reference.as_str()) else {
            diff.added.push(part.clone());
            continue;
        };
        for property in PartProperty::ALL {
            if property.of(prev) != property.of(part) {
                diff.changes_mut(property).push(PartChange::new(prev, part));
            }
        }
    }

    diff.removed = old
        .iter()
        .filter(|part| !new_map.contains_key(part.reference.as_str()))
        .cloned()
        .collect();

    diff.recount();
    debug!(stats = ?diff.stats, "component diff");
    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Vec<Part> {
        vec![
            Part::new("R5")
                .with_part_number("1000001")
                .with_value("10k")
                .with_footprint("R0402")
                .with_page("Main", "Power"),
            Part::new("C1")
                .with_part_number("1100001")
                .with_value("100n")
                .with_footprint("C0402"),
            Part::new("J1")
                .with_part_number("1600001")
                .with_footprint("CONN-4"),
        ]
    }

    #[test]
    fn self_diff_is_empty() {
        let diff = diff_components(&board(), &board());
        assert!(diff.is_unchanged());
        assert_eq!(diff.stats, ComponentDiffStats::default());
    }

    #[test]
    fn footprint_change_is_reported_alone() {
        let mut new = board();
        new[0].footprint = "R0603".to_owned();
        let diff = diff_components(&board(), &new);

        assert_eq!(diff.footprint_diff.len(), 1);
        assert_eq!(diff.footprint_diff[0].reference, "R5");
        assert_eq!(diff.footprint_diff[0].page, "Power");
        assert_eq!(diff.footprint_diff[0].old.footprint, "R0402");
        assert_eq!(diff.footprint_diff[0].new.footprint, "R0603");
        assert!(diff.value_diff.is_empty());
        assert!(diff.pn_diff.is_empty());
    }

    #[test]
    fn one_reference_can_change_on_every_axis() {
        let mut new = board();
        new[1].footprint = "C0603".to_owned();
        new[1].value = "1u".to_owned();
        new[1].part_number = "1100002".to_owned();
        let diff = diff_components(&board(), &new);
        for property in PartProperty::ALL {
            let changes = diff.changes(property);
            assert_eq!(changes.len(), 1, "{property:?}");
            assert_eq!(changes[0].reference, "C1");
        }
    }

    #[test]
    fn comparison_is_exact() {
        let mut new = board();
        new[0].value = "10K".to_owned();
        new[1].value = "100n ".to_owned();
        let diff = diff_components(&board(), &new);
        assert_eq!(diff.stats.value_diff, 2);
    }

    #[test]
    fn added_and_removed() {
        let mut new = board();
        new.retain(|p| p.reference != "J1");
        new.push(Part::new("U99"));
        let diff = diff_components(&board(), &new);

        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].reference, "U99");
        assert_eq!(diff.removed.len(), 1);
        assert_eq!(diff.removed[0].reference, "J1");
        assert_eq!(diff.stats.footprint_diff + diff.stats.value_diff + diff.stats.pn_diff, 0);
    }

    #[test]
    fn duplicate_reference_matches_last_old_part() {
        let old = vec![
            Part::new("R1").with_value("1k"),
            Part::new("R1").with_value("2k"),
        ];
        let new = vec![Part::new("R1").with_value("2k")];
        let diff = diff_components(&old, &new);
        assert!(diff.value_diff.is_empty());
        assert!(diff.removed.is_empty());
    }
}
