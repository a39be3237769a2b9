//! Net-keyed view of one snapshot.
//!
//! [`NetIndex::build`] walks every pin of every part and groups the bound ones
//! by net name. Each [`Net`] carries a denormalised copy of its connections, so
//! the index does not borrow from the parts it was built from.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{default_no_connect_markers, Part};

/// Separates `reference.pin` pairs inside a [`Net::signature`]
pub const SIGNATURE_DELIMITER: char = '|';

/// Options for [`NetIndex::build_with`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexOptions {
    /// Net names that mean "no connect"; pins bound to them join no net
    pub no_connect_markers: Vec<String>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            no_connect_markers: default_no_connect_markers(),
        }
    }
}

/// One pin's membership in a net, copied out of its part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub reference: String,
    pub pin_number: String,
    pub pin_name: String,
    pub part_type: String,
    pub part_number: String,
    pub value: String,
    pub footprint: String,
}

impl Connection {
    fn new(part: &Part, pin_number: &str, pin_name: &str) -> Self {
        Self {
            reference: part.reference.clone(),
            pin_number: pin_number.to_owned(),
            pin_name: pin_name.to_owned(),
            part_type: part.classification.kind.clone(),
            part_number: part.part_number.clone(),
            value: part.value.clone(),
            footprint: part.footprint.clone(),
        }
    }
}

/// Natural order on reference designator, then pin number: `R2` before `R10`.
///
/// Falls back to plain byte order so distinct connections never compare equal.
pub fn compare_connections(a: &Connection, b: &Connection) -> Ordering {
    natord::compare(&a.reference, &b.reference)
        .then_with(|| natord::compare(&a.pin_number, &b.pin_number))
        .then_with(|| a.reference.cmp(&b.reference))
        .then_with(|| a.pin_number.cmp(&b.pin_number))
}

/// All connections sharing one net name within a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Net {
    pub name: String,
    #[serde(rename = "pins")]
    pub connections: Vec<Connection>,
    pub pages: BTreeSet<String>,
    pub signature: String,
}

impl Net {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            connections: Vec::new(),
            pages: BTreeSet::new(),
            signature: String::new(),
        }
    }

    fn seal(&mut self) {
        self.connections.sort_by(compare_connections);
        self.signature = signature_of(&self.connections);
    }

    /// Distinct reference designators on this net
    pub fn references(&self) -> BTreeSet<&str> {
        self.connections
            .iter()
            .map(|c| c.reference.as_str())
            .collect()
    }

    /// A net touching fewer than two distinct parts bridges nothing.
    pub fn is_unconnected(&self) -> bool {
        self.references().len() < 2
    }
}

fn signature_of(connections: &[Connection]) -> String {
    let mut signature = String::new();
    for (i, c) in connections.iter().enumerate() {
        if i > 0 {
            signature.push(SIGNATURE_DELIMITER);
        }
        signature.push_str(&c.reference);
        signature.push('.');
        signature.push_str(&c.pin_number);
    }
    signature
}

/// Nets of one snapshot keyed by name, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetIndex {
    nets: IndexMap<String, Net>,
}

impl NetIndex {
    pub fn build(parts: &[Part]) -> Self {
        Self::build_with(parts, &IndexOptions::default())
    }

    /// Pins with an empty or no-connect net name are skipped silently.
    pub fn build_with(parts: &[Part], options: &IndexOptions) -> Self {
        let mut nets: IndexMap<String, Net> = IndexMap::new();
        let mut skipped = 0usize;

        for part in parts {
            for pin in &part.pins {
                if !pin.is_bound(&options.no_connect_markers) {
                    skipped += 1;
                    continue;
                }
                let net = nets
                    .entry(pin.net_name.clone())
                    .or_insert_with(|| Net::new(&pin.net_name));
                net.connections
                    .push(Connection::new(part, &pin.number, &pin.name));
                net.pages.insert(part.page_name.clone());
            }
        }

        for net in nets.values_mut() {
            net.seal();
        }

        debug!(
            parts = parts.len(),
            nets = nets.len(),
            skipped_pins = skipped,
            "built net index"
        );
        Self { nets }
    }

    pub fn get(&self, name: &str) -> Option<&Net> {
        self.nets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Net> {
        self.nets.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nets.keys().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a NetIndex {
    type Item = &'a Net;
    type IntoIter = indexmap::map::Values<'a, String, Net>;

    fn into_iter(self) -> Self::IntoIter {
        self.nets.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn parts() -> Vec<Part> {
        vec![
            Part::new("U1")
                .with_page("Main", "Power")
                .with_pin("5", "VDD", "VCC3V3")
                .with_pin("6", "GND", "GND")
                .with_pin("7", "NC", "NC"),
            Part::new("C10")
                .with_page("Main", "Power")
                .with_pin("1", "1", "VCC3V3")
                .with_pin("2", "2", "GND"),
            Part::new("C2")
                .with_page("Main", "Decoupling")
                .with_pin("1", "1", "VCC3V3")
                .with_pin("2", "2", ""),
        ]
    }

    #[test]
    fn groups_pins_by_net() {
        let index = NetIndex::build(&parts());
        assert_eq!(index.len(), 2);
        assert_eq!(index.names().collect::<Vec<_>>(), ["VCC3V3", "GND"]);

        let vcc = index.get("VCC3V3").unwrap();
        assert_eq!(vcc.connections.len(), 3);
        assert_eq!(
            vcc.pages.iter().collect::<Vec<_>>(),
            ["Decoupling", "Power"]
        );
    }

    #[test]
    fn skips_no_connect_and_empty_nets() {
        let index = NetIndex::build(&parts());
        assert!(!index.contains("NC"));
        assert!(!index.contains(""));
    }

    #[test]
    fn custom_no_connect_markers() {
        let parts = vec![
            Part::new("U1").with_pin("1", "A", "N/C"),
            Part::new("U2").with_pin("1", "A", "N/C"),
        ];
        let options = IndexOptions {
            no_connect_markers: vec!["N/C".to_owned()],
        };
        assert!(NetIndex::build_with(&parts, &options).is_empty());
        assert_eq!(NetIndex::build(&parts).len(), 1);
    }

    #[test]
    fn signature_uses_natural_order() {
        let index = NetIndex::build(&parts());
        assert_eq!(index.get("VCC3V3").unwrap().signature, "C2.1|C10.1|U1.5");
        assert_eq!(index.get("GND").unwrap().signature, "C10.2|U1.6");
    }

    #[test]
    fn signature_ignores_input_order() {
        let mut reversed = parts();
        reversed.reverse();
        for part in reversed.iter_mut() {
            part.pins.reverse();
        }

        let a = NetIndex::build(&parts());
        let b = NetIndex::build(&reversed);
        for net in &a {
            assert_eq!(net.signature, b.get(&net.name).unwrap().signature);
        }
    }

    #[test]
    fn pins_of_one_part_on_one_net_sort_by_number() {
        let forward = vec![Part::new("U1")
            .with_pin("10", "A", "X")
            .with_pin("2", "B", "X")];
        let backward = vec![Part::new("U1")
            .with_pin("2", "B", "X")
            .with_pin("10", "A", "X")];
        let a = NetIndex::build(&forward);
        let b = NetIndex::build(&backward);
        assert_eq!(a.get("X").unwrap().signature, "U1.2|U1.10");
        assert_eq!(a.get("X").unwrap().signature, b.get("X").unwrap().signature);
    }

    #[test]
    fn connections_copy_part_properties() {
        let parts = vec![Part::new("R5")
            .with_part_number("1000001")
            .with_value("10k")
            .with_footprint("R0402")
            .with_pin("1", "1", "SIG")];
        let index = NetIndex::build(&parts);
        let c = &index.get("SIG").unwrap().connections[0];
        assert_eq!(c.part_number, "1000001");
        assert_eq!(c.value, "10k");
        assert_eq!(c.footprint, "R0402");
    }

    #[rstest]
    #[case(&[("U1", "1"), ("U1", "2")], true)]
    #[case(&[("U1", "1"), ("R2", "1")], false)]
    #[case(&[("U1", "1")], true)]
    fn unconnected_counts_distinct_references(
        #[case] pins: &[(&str, &str)],
        #[case] expected: bool,
    ) {
        let parts: Vec<Part> = pins
            .iter()
            .map(|(reference, number)| Part::new(*reference).with_pin(*number, "", "N1"))
            .collect();
        let index = NetIndex::build(&parts);
        assert_eq!(index.get("N1").unwrap().is_unconnected(), expected);
    }
}
