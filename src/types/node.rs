//! The Figma scene graph.
//!
//! A [`SceneNode`] carries the fields every node type may have, plus a
//! [`NodeKind`] discriminated by the JSON `type` tag. Type-specific payloads
//! (text content, component properties) live on the matching variant, so
//! narrowing is a pattern match rather than field sniffing.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::core::{Effect, Paint, Rectangle, Transform, TypeStyle, Vector};

/// A single node of a design document. Children are owned by their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_bounding_box: Option<Rectangle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Vector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_transform: Option<Transform>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl SceneNode {
    /// A bare node of the given kind, mostly useful for building fixtures.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: None,
            visible: None,
            children: Vec::new(),
            absolute_bounding_box: None,
            size: None,
            relative_transform: None,
            fills: Vec::new(),
            strokes: Vec::new(),
            effects: Vec::new(),
            opacity: None,
            kind,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_children(mut self, children: Vec<SceneNode>) -> Self {
        self.children = children;
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }
}

/// Node variants keyed by Figma's `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Vector,
    BooleanOperation,
    Star,
    Line,
    Ellipse,
    RegularPolygon,
    Rectangle,
    Table,
    TableCell,
    Text(TextProps),
    Slice,
    Component(ComponentProps),
    ComponentSet(ComponentProps),
    Instance(InstanceProps),
    Sticky,
    ShapeWithText,
    Connector,
    WashiTape,
    Widget,
    Embed,
    LinkUnfurl,
    Media,
    /// A tag this crate does not know yet.
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Document => NodeType::Document,
            NodeKind::Canvas => NodeType::Canvas,
            NodeKind::Frame => NodeType::Frame,
            NodeKind::Group => NodeType::Group,
            NodeKind::Section => NodeType::Section,
            NodeKind::Vector => NodeType::Vector,
            NodeKind::BooleanOperation => NodeType::BooleanOperation,
            NodeKind::Star => NodeType::Star,
            NodeKind::Line => NodeType::Line,
            NodeKind::Ellipse => NodeType::Ellipse,
            NodeKind::RegularPolygon => NodeType::RegularPolygon,
            NodeKind::Rectangle => NodeType::Rectangle,
            NodeKind::Table => NodeType::Table,
            NodeKind::TableCell => NodeType::TableCell,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Slice => NodeType::Slice,
            NodeKind::Component(_) => NodeType::Component,
            NodeKind::ComponentSet(_) => NodeType::ComponentSet,
            NodeKind::Instance(_) => NodeType::Instance,
            NodeKind::Sticky => NodeType::Sticky,
            NodeKind::ShapeWithText => NodeType::ShapeWithText,
            NodeKind::Connector => NodeType::Connector,
            NodeKind::WashiTape => NodeType::WashiTape,
            NodeKind::Widget => NodeType::Widget,
            NodeKind::Embed => NodeType::Embed,
            NodeKind::LinkUnfurl => NodeType::LinkUnfurl,
            NodeKind::Media => NodeType::Media,
            NodeKind::Unknown => NodeType::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    #[serde(default)]
    pub characters: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TypeStyle>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentProps {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub component_property_definitions: HashMap<String, ComponentPropertyDefinition>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceProps {
    #[serde(default)]
    pub component_id: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub component_properties: HashMap<String, ComponentProperty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentPropertyType {
    Boolean,
    InstanceSwap,
    Text,
    Variant,
}

/// A boolean or string property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPropertyDefinition {
    #[serde(rename = "type")]
    pub property_type: ComponentPropertyType,
    pub default_value: PropertyValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variant_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentProperty {
    #[serde(rename = "type")]
    pub property_type: ComponentPropertyType,
    pub value: PropertyValue,
}

/// Field-less discriminant of [`NodeKind`], rendered as the Figma tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Vector,
    BooleanOperation,
    Star,
    Line,
    Ellipse,
    RegularPolygon,
    Rectangle,
    Table,
    TableCell,
    Text,
    Slice,
    Component,
    ComponentSet,
    Instance,
    Sticky,
    ShapeWithText,
    Connector,
    WashiTape,
    Widget,
    Embed,
    LinkUnfurl,
    Media,
    Unknown,
}

impl NodeType {
    pub const ALL: [NodeType; 28] = [
        NodeType::Document,
        NodeType::Canvas,
        NodeType::Frame,
        NodeType::Group,
        NodeType::Section,
        NodeType::Vector,
        NodeType::BooleanOperation,
        NodeType::Star,
        NodeType::Line,
        NodeType::Ellipse,
        NodeType::RegularPolygon,
        NodeType::Rectangle,
        NodeType::Table,
        NodeType::TableCell,
        NodeType::Text,
        NodeType::Slice,
        NodeType::Component,
        NodeType::ComponentSet,
        NodeType::Instance,
        NodeType::Sticky,
        NodeType::ShapeWithText,
        NodeType::Connector,
        NodeType::WashiTape,
        NodeType::Widget,
        NodeType::Embed,
        NodeType::LinkUnfurl,
        NodeType::Media,
        NodeType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Document => "DOCUMENT",
            NodeType::Canvas => "CANVAS",
            NodeType::Frame => "FRAME",
            NodeType::Group => "GROUP",
            NodeType::Section => "SECTION",
            NodeType::Vector => "VECTOR",
            NodeType::BooleanOperation => "BOOLEAN_OPERATION",
            NodeType::Star => "STAR",
            NodeType::Line => "LINE",
            NodeType::Ellipse => "ELLIPSE",
            NodeType::RegularPolygon => "REGULAR_POLYGON",
            NodeType::Rectangle => "RECTANGLE",
            NodeType::Table => "TABLE",
            NodeType::TableCell => "TABLE_CELL",
            NodeType::Text => "TEXT",
            NodeType::Slice => "SLICE",
            NodeType::Component => "COMPONENT",
            NodeType::ComponentSet => "COMPONENT_SET",
            NodeType::Instance => "INSTANCE",
            NodeType::Sticky => "STICKY",
            NodeType::ShapeWithText => "SHAPE_WITH_TEXT",
            NodeType::Connector => "CONNECTOR",
            NodeType::WashiTape => "WASHI_TAPE",
            NodeType::Widget => "WIDGET",
            NodeType::Embed => "EMBED",
            NodeType::LinkUnfurl => "LINK_UNFURL",
            NodeType::Media => "MEDIA",
            NodeType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        NodeType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown node type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_node_deserializes_into_text_variant() {
        let node: SceneNode = serde_json::from_str(
            r#"{
                "id": "1:2",
                "name": "Title",
                "type": "TEXT",
                "characters": "Hello",
                "style": { "fontFamily": "Inter", "fontSize": 24 },
                "absoluteBoundingBox": { "x": 10, "y": 20, "width": 100, "height": 30 },
                "blendMode": "PASS_THROUGH"
            }"#,
        )
        .unwrap();

        assert_eq!(node.node_type(), NodeType::Text);
        match &node.kind {
            NodeKind::Text(text) => {
                assert_eq!(text.characters, "Hello");
                assert_eq!(text.style.as_ref().unwrap().font_size, Some(24.0));
            }
            other => panic!("expected text, got {:?}", other),
        }
        assert_eq!(node.absolute_bounding_box.unwrap().width, 100.0);
    }

    #[test]
    fn nested_children_and_instance_props() {
        let node: SceneNode = serde_json::from_str(
            r#"{
                "id": "0:1",
                "type": "FRAME",
                "children": [
                    {
                        "id": "0:2",
                        "type": "INSTANCE",
                        "componentId": "5:9",
                        "componentProperties": {
                            "Disabled": { "type": "BOOLEAN", "value": true }
                        }
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(node.kind, NodeKind::Frame);
        let NodeKind::Instance(instance) = &node.children[0].kind else {
            panic!("expected instance");
        };
        assert_eq!(instance.component_id, "5:9");
        assert_eq!(
            instance.component_properties["Disabled"].value,
            PropertyValue::Bool(true)
        );
    }

    #[test]
    fn unknown_type_tag_falls_back() {
        let node: SceneNode =
            serde_json::from_str(r#"{"id":"9:9","type":"HOLOGRAM","name":"x"}"#).unwrap();
        assert_eq!(node.kind, NodeKind::Unknown);
        assert_eq!(node.name.as_deref(), Some("x"));
    }

    #[test]
    fn serialize_keeps_type_tag() {
        let node = SceneNode::new("1:1", NodeKind::Frame).with_name("Card");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "FRAME");
        assert_eq!(value["name"], "Card");

        let back: SceneNode = serde_json::from_value(value).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn node_type_parses_from_cli_spelling() {
        assert_eq!("text".parse::<NodeType>().unwrap(), NodeType::Text);
        assert_eq!(
            "component-set".parse::<NodeType>().unwrap(),
            NodeType::ComponentSet
        );
        assert!("blob".parse::<NodeType>().is_err());
        assert_eq!(NodeType::BooleanOperation.to_string(), "BOOLEAN_OPERATION");
    }
}
