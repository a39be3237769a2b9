//! KiCad S-expression netlists (`.net`).
//!
//! KiCad lists components and nets separately; pins are recovered by walking
//! every net's nodes and attaching them to the component they reference.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::classify::Classifier;
use crate::error::ParseError;
use crate::model::{is_do_not_install, Meta, Part, Pin, Snapshot};
use crate::sexpr::SExpr;

use super::{finish, IngestOptions};

mod raw;

/// Field names searched, in order, for a component's part number
pub const PART_NUMBER_FIELDS: &[&str] = &["Part_Number", "Part Number", "PartNumber", "MPN"];

/// Parse a KiCad netlist into a [`Snapshot`].
pub fn parse(
    input: &str,
    options: &IngestOptions,
    classifier: &dyn Classifier,
) -> Result<Snapshot, ParseError> {
    let root = SExpr::try_from(input)?;
    let netlist = raw::NetList::try_from(&root)?;

    let mut pins: IndexMap<&str, Vec<Pin>> = netlist
        .components
        .iter()
        .map(|comp| (comp.ref_des, Vec::new()))
        .collect();
    let mut pin_count = 0;

    for net in &netlist.nets {
        for node in &net.nodes {
            pin_count += 1;
            if node.is_no_connect() || !options.is_bound(net.name) {
                continue;
            }
            let Some(component_pins) = pins.get_mut(node.ref_des) else {
                debug!(reference = node.ref_des, net = net.name, "node without component");
                continue;
            };
            component_pins.push(Pin {
                number: node.num.to_owned(),
                name: node.function.unwrap_or("").to_owned(),
                net_name: net.name.to_owned(),
            });
        }
    }

    // Nodes only name a reference, so a repeated reference gets its pins
    // on the last component carrying it.
    let owner: HashMap<&str, usize> = netlist
        .components
        .iter()
        .enumerate()
        .map(|(i, comp)| (comp.ref_des, i))
        .collect();

    let parts = netlist
        .components
        .iter()
        .enumerate()
        .map(|(i, comp)| {
            let own_pins = if owner.get(comp.ref_des) == Some(&i) {
                pins.swap_remove(comp.ref_des).unwrap_or_default()
            } else {
                Vec::new()
            };
            let part_number = comp.property(PART_NUMBER_FIELDS).unwrap_or("N/A").trim();
            Part {
                reference: comp.ref_des.to_owned(),
                part_number: part_number.to_owned(),
                value: comp.value.to_owned(),
                footprint: comp.footprint.to_owned(),
                schematic_name: netlist.source.to_owned(),
                page_name: comp.sheet.to_owned(),
                do_not_install: is_do_not_install(comp.value, comp.footprint),
                classification: classifier.classify(part_number),
                pins: own_pins,
            }
        })
        .collect();

    let meta = Meta {
        name: netlist.source.to_owned(),
        version: netlist.version.to_owned(),
        encoding: options.encoding.clone(),
    };
    finish(parts, meta, pin_count, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::PartNumberClassifier;
    use crate::index::NetIndex;
    use crate::report::DiffReport;

    macro_rules! test_data {
        ($fname:expr) => {
            std::fs::read_to_string(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/resources/test/",
                $fname
            ))
            .unwrap()
        };
    }

    #[test]
    fn netlist_to_parts() {
        let input = test_data!("old.net");
        let snapshot = parse(&input, &IngestOptions::default(), &PartNumberClassifier).unwrap();

        assert_eq!(snapshot.meta.name, "/home/hw/board/board.kicad_sch");
        assert_eq!(snapshot.meta.version, "E");
        assert_eq!(snapshot.stats.parts, 4);
        assert_eq!(snapshot.stats.nets, 3);
        assert_eq!(snapshot.stats.pins, 8);

        let u1 = &snapshot.parts[0];
        assert_eq!(u1.reference, "U1");
        assert_eq!(u1.part_number, "14CP0001");
        assert_eq!(u1.classification.kind, "CP(CHIP)");
        assert_eq!(u1.page_name, "/");
        assert_eq!(
            u1.pins,
            [
                Pin::new("5", "VDD", "VCC3V3"),
                Pin::new("6", "GND", "GND"),
            ]
        );

        let c10 = snapshot.parts.iter().find(|p| p.reference == "C10").unwrap();
        assert_eq!(c10.page_name, "/Power/");
        assert_eq!(c10.footprint, "Capacitor_SMD:C_0402_1005Metric");

        let j1 = snapshot.parts.iter().find(|p| p.reference == "J1").unwrap();
        assert_eq!(j1.part_number, "N/A");
        assert_eq!(j1.classification.kind, "Other");
    }

    #[test]
    fn node_for_unknown_component_is_skipped() {
        let input = r#"(export (version "E")
            (components (comp (ref "R1")))
            (nets (net (code "1") (name "A")
                (node (ref "R1") (pin "1"))
                (node (ref "R9") (pin "1")))))"#;
        let snapshot = parse(input, &IngestOptions::default(), &PartNumberClassifier).unwrap();
        assert_eq!(snapshot.parts.len(), 1);
        assert_eq!(snapshot.parts[0].pins.len(), 1);
    }

    #[test]
    fn repeated_reference_gets_each_node_once() {
        let twice = r#"(export (version "E")
            (components (comp (ref "R1") (value "1k")) (comp (ref "R1") (value "2k")) (comp (ref "U1")))
            (nets (net (code "1") (name "A")
                (node (ref "R1") (pin "1"))
                (node (ref "U1") (pin "1")))))"#;
        let once = r#"(export (version "E")
            (components (comp (ref "R1") (value "2k")) (comp (ref "U1")))
            (nets (net (code "1") (name "A")
                (node (ref "R1") (pin "1"))
                (node (ref "U1") (pin "1")))))"#;
        let twice = parse(twice, &IngestOptions::default(), &PartNumberClassifier).unwrap();
        let once = parse(once, &IngestOptions::default(), &PartNumberClassifier).unwrap();

        assert_eq!(twice.parts.len(), 3);
        assert!(twice.parts[0].pins.is_empty());
        assert_eq!(twice.parts[1].value, "2k");
        assert_eq!(twice.parts[1].pins, [Pin::new("1", "", "A")]);

        let index = NetIndex::build(&twice.parts);
        let net = index.get("A").unwrap();
        assert_eq!(net.signature, "R1.1|U1.1");
        assert_eq!(net.connections.len(), 2);
        assert!(DiffReport::compare(&once.parts, &twice.parts).net.is_unchanged());
    }

    #[test]
    fn missing_sections_are_errors() {
        let err = parse("(export (nets))", &IngestOptions::default(), &PartNumberClassifier)
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingChild(label) if label == "components"));
    }
}
