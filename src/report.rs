//! Both diffs of one snapshot pair, bundled for consumers.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::diff::{diff_components, diff_nets, ComponentDiff, NetDiff};
use crate::index::{IndexOptions, NetIndex};
use crate::model::{Part, Snapshot};

/// Net and component diffs of one old/new pair, verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    pub net: NetDiff,
    pub component: ComponentDiff,
}

impl DiffReport {
    pub fn compare(old: &[Part], new: &[Part]) -> Self {
        Self::compare_with(old, new, &IndexOptions::default())
    }

    pub fn compare_with(old: &[Part], new: &[Part], options: &IndexOptions) -> Self {
        let net = diff_nets(
            &NetIndex::build_with(old, options),
            &NetIndex::build_with(new, options),
        );
        let component = diff_components(old, new);
        info!(net = ?net.stats, component = ?component.stats, "compared snapshots");
        Self { net, component }
    }

    /// Both diffs narrowed to net names and references containing `text`,
    /// ignoring case. Entries keep their content; stats are recounted.
    pub fn filtered(&self, text: &str) -> Self {
        Self {
            net: self.net.filtered(text),
            component: self.component.filtered(text),
        }
    }

    /// Nothing was added, removed or changed. Single-pin nets do not count.
    pub fn is_unchanged(&self) -> bool {
        self.net.is_unchanged() && self.component.is_unchanged()
    }
}

/// An old/new pair and its report, recomputed only when a side changes.
#[derive(Debug, Clone, Default)]
pub struct Comparison {
    old: Option<Snapshot>,
    new: Option<Snapshot>,
    options: IndexOptions,
    report: Option<DiffReport>,
}

impl Comparison {
    pub fn new(options: IndexOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn old_snapshot(&self) -> Option<&Snapshot> {
        self.old.as_ref()
    }

    pub fn new_snapshot(&self) -> Option<&Snapshot> {
        self.new.as_ref()
    }

    pub fn set_old(&mut self, snapshot: Option<Snapshot>) {
        self.old = snapshot;
        self.report = None;
    }

    pub fn set_new(&mut self, snapshot: Option<Snapshot>) {
        self.new = snapshot;
        self.report = None;
    }

    /// `None` until both sides are loaded.
    pub fn report(&mut self) -> Option<&DiffReport> {
        let (old, new) = (self.old.as_ref()?, self.new.as_ref()?);
        if self.report.is_none() {
            self.report = Some(DiffReport::compare_with(&old.parts, &new.parts, &self.options));
        }
        self.report.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(parts: Vec<Part>) -> Snapshot {
        Snapshot {
            parts,
            ..Default::default()
        }
    }

    fn board() -> Vec<Part> {
        vec![
            Part::new("U1").with_pin("1", "", "A").with_pin("2", "", "B"),
            Part::new("R1").with_value("1k").with_pin("1", "", "A"),
        ]
    }

    #[test]
    fn self_compare_is_unchanged() {
        let report = DiffReport::compare(&board(), &board());
        assert!(report.is_unchanged());
        assert_eq!(report.net.stats.unconnected, 1);
    }

    #[test]
    fn filter_narrows_both_diffs() {
        let mut changed = board();
        changed[1].value = "2k".to_owned();
        changed.push(Part::new("R2").with_pin("1", "", "B"));
        let report = DiffReport::compare(&board(), &changed);

        let r1 = report.filtered("r1");
        assert_eq!(r1.component.value_diff.len(), 1);
        assert_eq!(r1.component.value_diff[0].new.value, "2k");
        assert!(r1.component.added.is_empty());
        assert_eq!(r1.component.stats.added, 0);
        assert!(r1.net.mismatch.is_empty());

        let b = report.filtered("B");
        assert_eq!(b.net.stats.mismatch, 1);
        assert_eq!(b.net.mismatch[0].new.connections.len(), 2);
    }

    #[test]
    fn comparison_waits_for_both_sides() {
        let mut cmp = Comparison::default();
        assert!(cmp.report().is_none());
        cmp.set_old(Some(snapshot(board())));
        assert!(cmp.report().is_none());
        cmp.set_new(Some(snapshot(board())));
        assert!(cmp.report().unwrap().is_unchanged());
    }

    #[test]
    fn replacing_a_side_recomputes() {
        let mut cmp = Comparison::default();
        cmp.set_old(Some(snapshot(board())));
        cmp.set_new(Some(snapshot(board())));
        assert!(cmp.report().unwrap().is_unchanged());

        let mut changed = board();
        changed[1].value = "2k".to_owned();
        cmp.set_new(Some(snapshot(changed)));
        assert_eq!(cmp.report().unwrap().component.stats.value_diff, 1);

        cmp.set_old(None);
        assert!(cmp.report().is_none());
        assert!(cmp.old_snapshot().is_none());
        assert!(cmp.new_snapshot().is_some());
    }
}
