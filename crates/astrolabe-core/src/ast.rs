//! AST node shapes produced by the diagram grammars.
//!
//! The root is a [`Diagram`], discriminated by its [`DiagramKind`] and
//! carrying the position of its header token. Only four diagram types model
//! their content ([`Flowchart`], [`Sequence`], [`XyChart`], [`BlockDiagram`]);
//! every other type is recognized and consumed without a modeled body.
//!
//! All types serialize with camelCase field names and `type` as the
//! discriminator, which is the shape external consumers match on.

use serde::Serialize;

use crate::kind::DiagramKind;

/// A location in the source text.
///
/// `line` and `column` are 1-based (columns count codepoints); `offset` is the
/// 0-based byte offset of the same point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// The root node of a parsed diagram.
///
/// # Examples
///
/// ```
/// use astrolabe_core::{
///     ast::{BlockDiagram, Diagram, DiagramBody, Position},
///     kind::DiagramKind,
/// };
///
/// let diagram = Diagram::new(
///     DiagramKind::Block,
///     Position::new(1, 1, 0),
///     DiagramBody::Block(BlockDiagram::default()),
/// );
/// assert_eq!(diagram.kind(), DiagramKind::Block);
/// assert_eq!(diagram.line(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagram {
    #[serde(rename = "type")]
    kind: DiagramKind,
    line: usize,
    column: usize,
    #[serde(flatten)]
    body: DiagramBody,
}

impl Diagram {
    /// Create a diagram root at the position of its header token.
    pub fn new(kind: DiagramKind, header: Position, body: DiagramBody) -> Self {
        Self {
            kind,
            line: header.line,
            column: header.column,
            body,
        }
    }

    /// Returns the diagram type.
    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    /// Returns the 1-based line of the header token.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the 1-based column of the header token.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns the diagram-specific payload.
    pub fn body(&self) -> &DiagramBody {
        &self.body
    }

    /// Returns the flowchart payload, if this is a flowchart.
    pub fn as_flowchart(&self) -> Option<&Flowchart> {
        match &self.body {
            DiagramBody::Flowchart(flowchart) => Some(flowchart),
            _ => None,
        }
    }

    /// Returns the sequence payload, if this is a sequence diagram.
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match &self.body {
            DiagramBody::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    /// Returns the chart payload, if this is an XY chart.
    pub fn as_xy_chart(&self) -> Option<&XyChart> {
        match &self.body {
            DiagramBody::XyChart(chart) => Some(chart),
            _ => None,
        }
    }

    /// Returns the block payload, if this is a block diagram.
    pub fn as_block(&self) -> Option<&BlockDiagram> {
        match &self.body {
            DiagramBody::Block(block) => Some(block),
            _ => None,
        }
    }
}

/// Per-type payload of a [`Diagram`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DiagramBody {
    Flowchart(Flowchart),
    Sequence(Sequence),
    XyChart(XyChart),
    Block(BlockDiagram),
    /// Header recognized and content consumed, structure not modeled.
    Opaque {},
}

// -----------------------------------------------------------------------------
// Flowchart
// -----------------------------------------------------------------------------

/// Flow direction declared on a flowchart header or `direction` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    TD,
    TB,
    BT,
    RL,
    LR,
}

impl Direction {
    /// Parse a direction keyword. Matching is exact: `td` is not a direction.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "TD" => Some(Direction::TD),
            "TB" => Some(Direction::TB),
            "BT" => Some(Direction::BT),
            "RL" => Some(Direction::RL),
            "LR" => Some(Direction::LR),
            _ => None,
        }
    }
}

/// A flowchart: an optional direction and a flat, ordered element list.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Flowchart {
    pub direction: Option<Direction>,
    pub elements: Vec<FlowElement>,
}

/// One item of a flowchart's flat content list.
///
/// Arrows do not record their source: the element preceding an arrow in the
/// list is its origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlowElement {
    Node(Node),
    Arrow(Arrow),
    Subgraph(Subgraph),
}

impl FlowElement {
    /// Returns the source position of the element's first token.
    pub fn position(&self) -> Position {
        match self {
            FlowElement::Node(node) => node.position,
            FlowElement::Arrow(arrow) => arrow.position,
            FlowElement::Subgraph(subgraph) => subgraph.position,
        }
    }
}

/// Outline of a flowchart node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Rectangle,
    Round,
    Diamond,
    Circle,
    Subroutine,
    Hexagon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    pub label: Option<String>,
    pub shape: NodeShape,
    #[serde(flatten)]
    pub position: Position,
}

/// Stroke of a flowchart link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStroke {
    /// `-->`
    Plain,
    /// `-.->`
    Dotted,
    /// `==>`
    Thick,
    /// `---`
    Open,
}

/// A link to the next node. `to` is `None` when the destination is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrow {
    pub to: Option<String>,
    pub label: Option<String>,
    pub stroke: LinkStroke,
    #[serde(flatten)]
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subgraph {
    pub id: String,
    pub label: Option<String>,
    pub elements: Vec<FlowElement>,
    #[serde(flatten)]
    pub position: Position,
}

// -----------------------------------------------------------------------------
// Sequence
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Sequence {
    /// Declared participants, then the ones first used in a message.
    pub participants: Vec<Participant>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowType {
    Solid,
    Dotted,
    Thick,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub from: String,
    pub to: String,
    pub message: String,
    pub arrow_type: ArrowType,
}

// -----------------------------------------------------------------------------
// XY chart
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XyChart {
    pub title: Option<String>,
    pub horizontal: bool,
    pub x_axis: Vec<String>,
    pub y_axis: Option<YAxis>,
    pub series: Vec<Series>,
}

/// The value axis. Bounds are absent when the renderer picks the range.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct YAxis {
    pub label: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    pub values: Vec<f64>,
}

// -----------------------------------------------------------------------------
// Block
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BlockDiagram {
    pub columns: Option<u32>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub id: String,
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_keyword() {
        assert_eq!(Direction::from_keyword("LR"), Some(Direction::LR));
        assert_eq!(Direction::from_keyword("lr"), None);
        assert_eq!(Direction::from_keyword("XY"), None);
    }

    #[test]
    fn test_flowchart_serializes_with_type_discriminators() {
        let diagram = Diagram::new(
            DiagramKind::Flowchart,
            Position::new(1, 1, 0),
            DiagramBody::Flowchart(Flowchart {
                direction: Some(Direction::TD),
                elements: vec![
                    FlowElement::Node(Node {
                        id: "A".to_string(),
                        label: None,
                        shape: NodeShape::Rectangle,
                        position: Position::new(2, 1, 13),
                    }),
                    FlowElement::Arrow(Arrow {
                        to: Some("B".to_string()),
                        label: None,
                        stroke: LinkStroke::Plain,
                        position: Position::new(2, 3, 15),
                    }),
                ],
            }),
        );

        let json = serde_json::to_value(&diagram).unwrap();
        assert_eq!(json["type"], "flowchart");
        assert_eq!(json["direction"], "TD");
        assert_eq!(json["elements"][0]["type"], "node");
        assert_eq!(json["elements"][0]["line"], 2);
        assert_eq!(json["elements"][1]["type"], "arrow");
        assert_eq!(json["elements"][1]["to"], "B");
    }

    #[test]
    fn test_xy_chart_uses_camel_case_axes() {
        let chart = XyChart {
            x_axis: vec!["Q1".to_string()],
            y_axis: Some(YAxis {
                label: Some("Revenue".to_string()),
                min: Some(0.0),
                max: Some(10.0),
            }),
            series: vec![Series {
                kind: SeriesKind::Bar,
                values: vec![1.0],
            }],
            ..XyChart::default()
        };

        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["xAxis"][0], "Q1");
        assert_eq!(json["yAxis"]["max"], 10.0);
        assert_eq!(json["series"][0]["type"], "bar");
    }

    #[test]
    fn test_opaque_body_adds_no_fields() {
        let diagram = Diagram::new(
            DiagramKind::Pie,
            Position::new(3, 1, 20),
            DiagramBody::Opaque {},
        );

        let json = serde_json::to_value(&diagram).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(json["type"], "pie");
        assert_eq!(json["line"], 3);
    }

    #[test]
    fn test_accessors_match_body() {
        let diagram = Diagram::new(
            DiagramKind::Sequence,
            Position::new(1, 1, 0),
            DiagramBody::Sequence(Sequence::default()),
        );

        assert!(diagram.as_sequence().is_some());
        assert!(diagram.as_flowchart().is_none());
        assert!(diagram.as_xy_chart().is_none());
        assert!(diagram.as_block().is_none());
    }
}
