//! Typed access to the individual lists of a diff.

use serde::{Deserialize, Serialize};

use super::component::{ComponentDiff, PartChange};
use super::net::{NetDiff, NetMismatch};
use crate::index::Net;
use crate::model::Part;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NetBucketKind {
    Mismatch,
    Added,
    Deleted,
    Unconnected,
}

impl NetBucketKind {
    pub const ALL: [NetBucketKind; 4] = [
        Self::Mismatch,
        Self::Added,
        Self::Deleted,
        Self::Unconnected,
    ];

    /// Field name of the list in a serialized [`NetDiff`]
    pub fn key(self) -> &'static str {
        match self {
            Self::Mismatch => "mismatch",
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Unconnected => "unconnected",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mismatch => "Mismatches",
            Self::Added => "Added",
            Self::Deleted => "Deleted",
            Self::Unconnected => "Single-Pin",
        }
    }
}

/// One list of a [`NetDiff`]
#[derive(Debug, Clone, Copy)]
pub enum NetBucket<'a> {
    Mismatch(&'a [NetMismatch]),
    Added(&'a [Net]),
    Deleted(&'a [Net]),
    Unconnected(&'a [Net]),
}

/// One item of a [`NetBucket`]
#[derive(Debug, Clone, Copy)]
pub enum NetEntry<'a> {
    Mismatch(&'a NetMismatch),
    Net(&'a Net),
}

impl<'a> NetEntry<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            NetEntry::Mismatch(m) => &m.name,
            NetEntry::Net(n) => &n.name,
        }
    }
}

impl<'a> NetBucket<'a> {
    pub fn kind(&self) -> NetBucketKind {
        match self {
            NetBucket::Mismatch(_) => NetBucketKind::Mismatch,
            NetBucket::Added(_) => NetBucketKind::Added,
            NetBucket::Deleted(_) => NetBucketKind::Deleted,
            NetBucket::Unconnected(_) => NetBucketKind::Unconnected,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NetBucket::Mismatch(items) => items.len(),
            NetBucket::Added(nets) | NetBucket::Deleted(nets) | NetBucket::Unconnected(nets) => {
                nets.len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Vec<NetEntry<'a>> {
        match *self {
            NetBucket::Mismatch(items) => items.iter().map(NetEntry::Mismatch).collect(),
            NetBucket::Added(nets) | NetBucket::Deleted(nets) | NetBucket::Unconnected(nets) => {
                nets.iter().map(NetEntry::Net).collect()
            }
        }
    }

    /// Entries whose net name contains `text`, ignoring case.
    pub fn filter(&self, text: &str) -> Vec<NetEntry<'a>> {
        let needle = text.to_lowercase();
        self.entries()
            .into_iter()
            .filter(|entry| contains_ignore_case(entry.name(), &needle))
            .collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn keep<T: Clone>(items: &[T], pred: impl Fn(&T) -> bool) -> Vec<T> {
    items.iter().filter(|item| pred(*item)).cloned().collect()
}

impl NetDiff {
    /// Copy holding only nets whose name contains `text`, ignoring case.
    /// Stats count what is left.
    pub fn filtered(&self, text: &str) -> NetDiff {
        let needle = text.to_lowercase();
        let by_name = |net: &Net| contains_ignore_case(&net.name, &needle);
        let mut diff = NetDiff {
            mismatch: keep(&self.mismatch, |m| contains_ignore_case(&m.name, &needle)),
            added: keep(&self.added, by_name),
            deleted: keep(&self.deleted, by_name),
            unconnected: keep(&self.unconnected, by_name),
            stats: Default::default(),
        };
        diff.recount();
        diff
    }

    pub fn bucket(&self, kind: NetBucketKind) -> NetBucket<'_> {
        match kind {
            NetBucketKind::Mismatch => NetBucket::Mismatch(&self.mismatch),
            NetBucketKind::Added => NetBucket::Added(&self.added),
            NetBucketKind::Deleted => NetBucket::Deleted(&self.deleted),
            NetBucketKind::Unconnected => NetBucket::Unconnected(&self.unconnected),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentBucketKind {
    Added,
    Removed,
    FootprintDiff,
    ValueDiff,
    PnDiff,
}

impl ComponentBucketKind {
    pub const ALL: [ComponentBucketKind; 5] = [
        Self::Added,
        Self::Removed,
        Self::FootprintDiff,
        Self::ValueDiff,
        Self::PnDiff,
    ];

    /// Field name of the list in a serialized [`ComponentDiff`]
    pub fn key(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::FootprintDiff => "footprintDiff",
            Self::ValueDiff => "valueDiff",
            Self::PnDiff => "pnDiff",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Removed => "Removed",
            Self::FootprintDiff => "Footprints",
            Self::ValueDiff => "Values",
            Self::PnDiff => "Part Numbers",
        }
    }
}

/// One list of a [`ComponentDiff`]
#[derive(Debug, Clone, Copy)]
pub enum ComponentBucket<'a> {
    Added(&'a [Part]),
    Removed(&'a [Part]),
    FootprintDiff(&'a [PartChange]),
    ValueDiff(&'a [PartChange]),
    PnDiff(&'a [PartChange]),
}

/// One item of a [`ComponentBucket`]
#[derive(Debug, Clone, Copy)]
pub enum ComponentEntry<'a> {
    Part(&'a Part),
    Change(&'a PartChange),
}

impl<'a> ComponentEntry<'a> {
    pub fn reference(&self) -> &'a str {
        match *self {
            ComponentEntry::Part(p) => &p.reference,
            ComponentEntry::Change(c) => &c.reference,
        }
    }
}

impl<'a> ComponentBucket<'a> {
    pub fn kind(&self) -> ComponentBucketKind {
        match self {
            ComponentBucket::Added(_) => ComponentBucketKind::Added,
            ComponentBucket::Removed(_) => ComponentBucketKind::Removed,
            ComponentBucket::FootprintDiff(_) => ComponentBucketKind::FootprintDiff,
            ComponentBucket::ValueDiff(_) => ComponentBucketKind::ValueDiff,
            ComponentBucket::PnDiff(_) => ComponentBucketKind::PnDiff,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ComponentBucket::Added(parts) | ComponentBucket::Removed(parts) => parts.len(),
            ComponentBucket::FootprintDiff(changes)
            | ComponentBucket::ValueDiff(changes)
            | ComponentBucket::PnDiff(changes) => changes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Vec<ComponentEntry<'a>> {
        match *self {
            ComponentBucket::Added(parts) | ComponentBucket::Removed(parts) => {
                parts.iter().map(ComponentEntry::Part).collect()
            }
            ComponentBucket::FootprintDiff(changes)
            | ComponentBucket::ValueDiff(changes)
            | ComponentBucket::PnDiff(changes) => {
                changes.iter().map(ComponentEntry::Change).collect()
            }
        }
    }

    /// Entries whose reference designator contains `text`, ignoring case.
    pub fn filter(&self, text: &str) -> Vec<ComponentEntry<'a>> {
        let needle = text.to_lowercase();
        self.entries()
            .into_iter()
            .filter(|entry| contains_ignore_case(entry.reference(), &needle))
            .collect()
    }
}

impl ComponentDiff {
    /// Copy holding only entries whose reference designator contains `text`,
    /// ignoring case. Stats count what is left.
    pub fn filtered(&self, text: &str) -> ComponentDiff {
        let needle = text.to_lowercase();
        let part = |p: &Part| contains_ignore_case(&p.reference, &needle);
        let change = |c: &PartChange| contains_ignore_case(&c.reference, &needle);
        let mut diff = ComponentDiff {
            added: keep(&self.added, part),
            removed: keep(&self.removed, part),
            footprint_diff: keep(&self.footprint_diff, change),
            value_diff: keep(&self.value_diff, change),
            pn_diff: keep(&self.pn_diff, change),
            stats: Default::default(),
        };
        diff.recount();
        diff
    }

    pub fn bucket(&self, kind: ComponentBucketKind) -> ComponentBucket<'_> {
        match kind {
            ComponentBucketKind::Added => ComponentBucket::Added(&self.added),
            ComponentBucketKind::Removed => ComponentBucket::Removed(&self.removed),
            ComponentBucketKind::FootprintDiff => ComponentBucket::FootprintDiff(&self.footprint_diff),
            ComponentBucketKind::ValueDiff => ComponentBucket::ValueDiff(&self.value_diff),
            ComponentBucketKind::PnDiff => ComponentBucket::PnDiff(&self.pn_diff),
        }
    }
}
