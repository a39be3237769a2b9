use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Net name used by exports to mark a pin as explicitly unconnected
pub const NO_CONNECT: &str = "NC";

/// Category attached to a part by a [`Classifier`](crate::Classifier).
///
/// Opaque to the comparison engine, it is only carried through to the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    #[serde(rename = "type")]
    pub kind: String,
    pub tag: String,
    pub priority: u8,
}

/// A named terminal of a part
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub number: String,
    pub name: String,
    pub net_name: String,
}

impl Pin {
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        net_name: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            net_name: net_name.into(),
        }
    }

    /// Whether the pin takes part in a net, given the names that mean "no connect".
    pub fn is_bound(&self, no_connect_markers: &[String]) -> bool {
        is_bound_net(&self.net_name, no_connect_markers)
    }
}

pub(crate) fn is_bound_net(net_name: &str, no_connect_markers: &[String]) -> bool {
    !net_name.is_empty() && !no_connect_markers.iter().any(|m| m == net_name)
}

pub(crate) fn default_no_connect_markers() -> Vec<String> {
    vec![NO_CONNECT.to_owned()]
}

/// A placed component instance within one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Reference designator, e.g. `U12`
    pub reference: String,
    pub part_number: String,
    pub value: String,
    pub footprint: String,
    pub schematic_name: String,
    pub page_name: String,
    pub do_not_install: bool,
    pub classification: Classification,
    pub pins: Vec<Pin>,
}

impl Part {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            ..Default::default()
        }
    }

    pub fn with_part_number(mut self, part_number: impl Into<String>) -> Self {
        self.part_number = part_number.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.do_not_install = is_do_not_install(&self.value, &self.footprint);
        self
    }

    pub fn with_footprint(mut self, footprint: impl Into<String>) -> Self {
        self.footprint = footprint.into();
        self.do_not_install = is_do_not_install(&self.value, &self.footprint);
        self
    }

    pub fn with_page(mut self, schematic: impl Into<String>, page: impl Into<String>) -> Self {
        self.schematic_name = schematic.into();
        self.page_name = page.into();
        self
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    pub fn with_pin(
        mut self,
        number: impl Into<String>,
        name: impl Into<String>,
        net_name: impl Into<String>,
    ) -> Self {
        self.pins.push(Pin::new(number, name, net_name));
        self
    }

    /// Sorted, de-duplicated names of the nets this part's bound pins touch.
    pub fn net_names(&self, no_connect_markers: &[String]) -> BTreeSet<&str> {
        self.pins
            .iter()
            .filter(|pin| pin.is_bound(no_connect_markers))
            .map(|pin| pin.net_name.as_str())
            .collect()
    }
}

/// Do-not-install marker check on the value and footprint text
pub fn is_do_not_install(value: &str, footprint: &str) -> bool {
    let value = value.to_uppercase();
    value.contains("NL") || value.contains("DNI") || footprint.to_uppercase().contains("DNI")
}

/// Provenance of a parsed export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub name: String,
    pub version: String,
    pub encoding: String,
}

/// Size of a parsed export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub parts: usize,
    pub pins: usize,
    pub nets: usize,
}

/// One parsed schematic export, old or new
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub parts: Vec<Part>,
    pub meta: Meta,
    pub stats: Stats,
}
