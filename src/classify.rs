use crate::model::Classification;

/// Maps a part number onto a [`Classification`].
///
/// Ingestion takes a classifier explicitly; nothing in the crate holds one globally.
pub trait Classifier {
    fn classify(&self, part_number: &str) -> Classification;
}

impl<F> Classifier for F
where
    F: Fn(&str) -> Classification,
{
    fn classify(&self, part_number: &str) -> Classification {
        self(part_number)
    }
}

/// Prefix table over in-house part numbers. First matching prefix wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartNumberClassifier;

struct Rule {
    prefix: &'static str,
    kind: &'static str,
    tag: &'static str,
    priority: u8,
}

const fn rule(prefix: &'static str, kind: &'static str, tag: &'static str, priority: u8) -> Rule {
    Rule {
        prefix,
        kind,
        tag,
        priority,
    }
}

const RULES: &[Rule] = &[
    // ICs and CPUs
    rule("14CP", "CP(CHIP)", "purple-100", 3),
    rule("14MP", "MP(BGA CPU)", "purple-200", 3),
    rule("141", "IC/Part", "purple-50", 3),
    rule("14", "CPU", "purple-100", 3),
    // Magnetics, timing, power
    rule("1211", "Inductor", "orange-100", 3),
    rule("1212", "Bead", "orange-50", 2),
    rule("1231", "Crystal", "teal-50", 2),
    rule("1233", "Oscillator", "teal-100", 2),
    rule("1252", "Transformer", "orange-200", 3),
    rule("125", "Converter", "orange-100", 3),
    rule("129", "Protection", "red-50", 2),
    // Discrete semiconductors
    rule("1304", "LED", "yellow-50", 1),
    rule("130", "Diode", "cyan-50", 2),
    rule("131", "Transistor", "cyan-100", 3),
    rule("132", "Thyristor", "cyan-200", 2),
    // Connectors and basic passives
    rule("16", "Conn/Mech", "pink-50", 0),
    rule("10", "Resistor", "blue-50", 1),
    rule("11", "Capacitor", "yellow-50", 1),
    rule("180", "Var Resistor", "blue-100", 1),
    rule("15", "NETR", "gray-100", 0),
    rule("003", "Test Pad", "gray-50", 0),
];

fn classification(kind: &str, tag: &str, priority: u8) -> Classification {
    Classification {
        kind: kind.to_owned(),
        tag: tag.to_owned(),
        priority,
    }
}

impl Classifier for PartNumberClassifier {
    fn classify(&self, part_number: &str) -> Classification {
        if part_number.is_empty() {
            return classification("Unknown", "slate-100", 0);
        }
        RULES
            .iter()
            .find(|rule| part_number.starts_with(rule.prefix))
            .map(|rule| classification(rule.kind, rule.tag, rule.priority))
            .unwrap_or_else(|| classification("Other", "slate-100", 0))
    }
}
