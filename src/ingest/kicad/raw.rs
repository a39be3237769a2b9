//! Borrowed view of the parts of a KiCad netlist the comparison needs.

use crate::error::ParseError;
use crate::sexpr::SExpr;

/// The full netlist
#[derive(Debug, Clone)]
pub(super) struct NetList<'a> {
    pub(super) source: &'a str,
    pub(super) version: &'a str,
    pub(super) components: Vec<Component<'a>>,
    pub(super) nets: Vec<Net<'a>>,
}

/// A component in the schematic
#[derive(Debug, Clone)]
pub(super) struct Component<'a> {
    pub(super) ref_des: &'a str,
    pub(super) value: &'a str,
    pub(super) footprint: &'a str,
    /// `(fields (field (name ..) ..))` and `(property (name ..) (value ..))` entries
    pub(super) properties: Vec<(&'a str, &'a str)>,
    pub(super) sheet: &'a str,
}

impl<'a> Component<'a> {
    pub(super) fn property(&self, names: &[&str]) -> Option<&'a str> {
        names.iter().find_map(|name| {
            self.properties
                .iter()
                .find(|(key, value)| key == name && !value.is_empty())
                .map(|(_, value)| *value)
        })
    }
}

/// A node connects a net to a pin
#[derive(Debug, Clone)]
pub(super) struct Node<'a> {
    pub(super) ref_des: &'a str,
    pub(super) num: &'a str,
    pub(super) function: Option<&'a str>,
    pub(super) typ: &'a str,
}

impl<'a> Node<'a> {
    /// KiCad marks these as `no_connect` or `passive+no_connect`
    pub(super) fn is_no_connect(&self) -> bool {
        self.typ.ends_with("no_connect")
    }
}

/// A net
#[derive(Debug, Clone)]
pub(super) struct Net<'a> {
    pub(super) name: &'a str,
    pub(super) nodes: Vec<Node<'a>>,
}

impl<'a, 'b> TryFrom<&'b SExpr<'a>> for Component<'a> {
    type Error = ParseError;

    fn try_from(comp: &'b SExpr<'a>) -> Result<Self, Self::Error> {
        let fields = comp
            .children("fields")
            .flat_map(|fields| fields.children("field"))
            .filter_map(|field| Some((field.opt_value("name")?, field.first_atom().unwrap_or(""))));
        let properties = comp
            .children("property")
            .filter_map(|prop| Some((prop.opt_value("name")?, prop.opt_value("value").unwrap_or(""))));

        Ok(Component {
            ref_des: comp.value("ref")?,
            value: comp.opt_value("value").unwrap_or(""),
            footprint: comp.opt_value("footprint").unwrap_or(""),
            properties: fields.chain(properties).collect(),
            sheet: comp
                .children("sheetpath")
                .next()
                .and_then(|path| path.opt_value("names"))
                .unwrap_or("/"),
        })
    }
}

impl<'a, 'b> TryFrom<&'b SExpr<'a>> for Node<'a> {
    type Error = ParseError;

    fn try_from(node: &'b SExpr<'a>) -> Result<Self, Self::Error> {
        Ok(Node {
            ref_des: node.value("ref")?,
            num: node.value("pin")?,
            function: node.opt_value("pinfunction"),
            typ: node.opt_value("pintype").unwrap_or(""),
        })
    }
}

impl<'a, 'b> TryFrom<&'b SExpr<'a>> for Net<'a> {
    type Error = ParseError;

    fn try_from(net: &'b SExpr<'a>) -> Result<Self, Self::Error> {
        let nodes = net
            .children("node")
            .map(Node::try_from)
            .collect::<Result<_, _>>()?;
        Ok(Net {
            name: net.value("name")?,
            nodes,
        })
    }
}

impl<'a, 'b> TryFrom<&'b SExpr<'a>> for NetList<'a> {
    type Error = ParseError;

    fn try_from(root: &'b SExpr<'a>) -> Result<Self, Self::Error> {
        let design = root.children("design").next();
        let components = root
            .child("components")?
            .children("comp")
            .map(Component::try_from)
            .collect::<Result<_, _>>()?;
        let nets = root
            .child("nets")?
            .children("net")
            .map(Net::try_from)
            .collect::<Result<_, _>>()?;

        Ok(NetList {
            source: design.and_then(|d| d.opt_value("source")).unwrap_or(""),
            version: root.opt_value("version").unwrap_or(""),
            components,
            nets,
        })
    }
}
