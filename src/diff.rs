//! Net-level and component-level comparison of two snapshots.
//!
//! Both engines are pure: they only read their inputs and return fresh values,
//! so rerunning on the same inputs yields identical output.

mod bucket;
mod component;
mod net;

pub use bucket::{
    ComponentBucket, ComponentBucketKind, ComponentEntry, NetBucket, NetBucketKind, NetEntry,
};
pub use component::{diff_components, ComponentDiff, ComponentDiffStats, PartChange, PartProperty};
pub use net::{diff_nets, NetDiff, NetDiffStats, NetMismatch};
