//! OrCAD design JSON.
//!
//! Exports come in three layouts, tried in order:
//! `{"objDsn": {"Name", "lstSche": [..]}}`, `{"lstSche": [..]}` and a bare
//! `{"lstPage": [..]}`. Field names vary between tool versions, so each part
//! property is looked up under all of its known spellings.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::classify::Classifier;
use crate::error::ParseError;
use crate::model::{is_do_not_install, Meta, Part, Pin, Snapshot};

use super::{finish, IngestOptions};

/// JSON scalar that may arrive as a string, number or bool
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Num(serde_json::Number),
    Bool(bool),
}

impl Scalar {
    fn text(&self) -> String {
        match self {
            Scalar::Str(s) => s.clone(),
            Scalar::Num(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn text(field: &Option<Scalar>) -> String {
    field.as_ref().map(Scalar::text).unwrap_or_default()
}

/// First spelling with non-empty text
fn first_text(fields: &[&Option<Scalar>]) -> Option<String> {
    fields.iter().map(|f| text(f)).find(|s| !s.is_empty())
}

/// Lists that are missing, null or not arrays read as `None`; elements that
/// do not fit the expected shape are skipped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

#[derive(Debug, Default, Deserialize)]
struct Export {
    #[serde(rename = "objDsn", default)]
    design: Option<Design>,
    #[serde(rename = "lstSche", default, deserialize_with = "lenient_list")]
    schematics: Option<Vec<Schematic>>,
    #[serde(rename = "lstPage", default, deserialize_with = "lenient_list")]
    pages: Option<Vec<Page>>,
    #[serde(default)]
    version: Option<Scalar>,
    #[serde(default)]
    pin_count: Option<Scalar>,
}

#[derive(Debug, Default, Deserialize)]
struct Design {
    #[serde(rename = "Name", default)]
    name: Option<Scalar>,
    #[serde(rename = "lstSche", default, deserialize_with = "lenient_list")]
    schematics: Option<Vec<Schematic>>,
}

#[derive(Debug, Default, Deserialize)]
struct Schematic {
    #[serde(rename = "Name", default)]
    name: Option<Scalar>,
    #[serde(rename = "lstPage", default, deserialize_with = "lenient_list")]
    pages: Option<Vec<Page>>,
}

#[derive(Debug, Default, Deserialize)]
struct Page {
    #[serde(rename = "Name", default)]
    name: Option<Scalar>,
    #[serde(rename = "lstPart", default, deserialize_with = "lenient_list")]
    parts: Option<Vec<RawPart>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPart {
    #[serde(rename = "Reference", default)]
    reference: Option<Scalar>,
    #[serde(rename = "Part_Reference", default)]
    part_reference: Option<Scalar>,
    #[serde(rename = "Part_Number", default)]
    part_number: Option<Scalar>,
    #[serde(rename = "PART_NUMBER", default)]
    part_number_upper: Option<Scalar>,
    #[serde(rename = "Value", default)]
    value: Option<Scalar>,
    #[serde(rename = "VALUE", default)]
    value_upper: Option<Scalar>,
    #[serde(rename = "PCB Footprint", default)]
    footprint: Option<Scalar>,
    #[serde(rename = "PCB_Footprint", default)]
    footprint_underscore: Option<Scalar>,
    #[serde(rename = "lstPin", default, deserialize_with = "lenient_list")]
    pins: Option<Vec<RawPin>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPin {
    #[serde(rename = "Number", default)]
    number: Option<Scalar>,
    #[serde(rename = "Name", default)]
    name: Option<Scalar>,
    #[serde(rename = "objNet", default)]
    net: Option<NetRef>,
}

#[derive(Debug, Default, Deserialize)]
struct NetRef {
    #[serde(rename = "Net Name", default)]
    name: Option<Scalar>,
}

/// Leading integer of the text, like a lenient `parseInt`
fn leading_count(field: &Option<Scalar>) -> usize {
    let text = text(field);
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

impl RawPart {
    fn into_part(
        self,
        schematic: &str,
        page: &str,
        options: &IngestOptions,
        classifier: &dyn Classifier,
    ) -> Part {
        let reference = first_text(&[&self.reference, &self.part_reference])
            .unwrap_or_else(|| "Unk".to_owned());
        let part_number = first_text(&[&self.part_number, &self.part_number_upper])
            .unwrap_or_else(|| "N/A".to_owned())
            .trim()
            .to_owned();
        let value = first_text(&[&self.value, &self.value_upper]).unwrap_or_default();
        let footprint =
            first_text(&[&self.footprint, &self.footprint_underscore]).unwrap_or_default();

        let pins = self
            .pins
            .unwrap_or_default()
            .into_iter()
            .filter_map(|pin| {
                let net_name = pin.net.as_ref().map(|n| text(&n.name)).unwrap_or_default();
                options.is_bound(&net_name).then(|| Pin {
                    number: text(&pin.number),
                    name: text(&pin.name),
                    net_name,
                })
            })
            .collect();

        Part {
            do_not_install: is_do_not_install(&value, &footprint),
            classification: classifier.classify(&part_number),
            reference,
            part_number,
            value,
            footprint,
            schematic_name: schematic.to_owned(),
            page_name: page.to_owned(),
            pins,
        }
    }
}

/// Parse an OrCAD JSON export into a [`Snapshot`].
pub fn parse(
    input: &str,
    options: &IngestOptions,
    classifier: &dyn Classifier,
) -> Result<Snapshot, ParseError> {
    let export: Export = serde_json::from_str(input)?;
    let version = text(&export.version);

    let (schematics, name) = match (export.design, export.schematics, export.pages) {
        (Some(Design {
            name,
            schematics: Some(schematics),
        }), _, _) => (schematics, text(&name)),
        (_, Some(schematics), _) => (schematics, "Standard Export".to_owned()),
        (_, _, Some(pages)) => {
            let single = Schematic {
                name: Some(Scalar::Str("Single".to_owned())),
                pages: Some(pages),
            };
            (vec![single], "Single Page".to_owned())
        }
        _ => return Err(ParseError::UnknownLayout),
    };

    let mut parts = Vec::new();
    for schematic in schematics {
        let schematic_name = text(&schematic.name);
        for page in schematic.pages.unwrap_or_default() {
            let page_name = text(&page.name);
            let raw_parts = page.parts.unwrap_or_default();
            debug!(schematic = %schematic_name, page = %page_name, parts = raw_parts.len(), "page");
            parts.extend(
                raw_parts
                    .into_iter()
                    .map(|raw| raw.into_part(&schematic_name, &page_name, options, classifier)),
            );
        }
    }

    let meta = Meta {
        name,
        version,
        encoding: options.encoding.clone(),
    };
    finish(parts, meta, leading_count(&export.pin_count), options)
}
