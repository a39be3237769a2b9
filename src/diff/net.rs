use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::index::{Net, NetIndex};

/// A net present in both snapshots whose connections differ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetMismatch {
    pub name: String,
    pub old: Net,
    pub new: Net,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetDiffStats {
    pub mismatch: usize,
    pub added: usize,
    pub deleted: usize,
    pub unconnected: usize,
}

/// Result of [`diff_nets`].
///
/// A net lands in at most one of `mismatch`, `added` and `deleted`. Nets of
/// the new snapshot touching fewer than two parts are also listed in
/// `unconnected`, whatever else happened to them. Unchanged nets are not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetDiff {
    pub mismatch: Vec<NetMismatch>,
    pub added: Vec<Net>,
    pub deleted: Vec<Net>,
    pub unconnected: Vec<Net>,
    pub stats: NetDiffStats,
}

impl NetDiff {
    /// No net gained, lost or changed connections.
    pub fn is_unchanged(&self) -> bool {
        self.mismatch.is_empty() && self.added.is_empty() && self.deleted.is_empty()
    }

    pub(crate) fn recount(&mut self) {
        self.stats = NetDiffStats {
            mismatch: self.mismatch.len(),
            added: self.added.len(),
            deleted: self.deleted.len(),
            unconnected: self.unconnected.len(),
        };
    }
}

/// Compare two indexes net by net, matching on literal net name and
/// deciding equality on [`Net::signature`] alone.
pub fn diff_nets(old: &NetIndex, new: &NetIndex) -> NetDiff {
    let mut diff = NetDiff::default();

    for net in new {
        if net.is_unconnected() {
            diff.unconnected.push(net.clone());
        }
        match old.get(&net.name) {
            None => diff.added.push(net.clone()),
            Some(prev) if prev.signature != net.signature => {
                trace!(net = %net.name, old = %prev.signature, new = %net.signature, "net mismatch");
                diff.mismatch.push(NetMismatch {
                    name: net.name.clone(),
                    old: prev.clone(),
                    new: net.clone(),
                });
            }
            Some(_) => {}
        }
    }

    diff.deleted = old
        .iter()
        .filter(|net| !new.contains(&net.name))
        .cloned()
        .collect();

    diff.recount();
    debug!(stats = ?diff.stats, "net diff");
    diff
}
