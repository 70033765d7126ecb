//! The closed set of diagram types understood by the validator.

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

/// The diagram type recognized from a source header.
///
/// [`DiagramKind::Unknown`] is used whenever no header matched; it is never
/// absent from a validation result.
///
/// # Examples
///
/// ```
/// use astrolabe_core::kind::DiagramKind;
///
/// let kind: DiagramKind = "xychart".parse().unwrap();
/// assert_eq!(kind, DiagramKind::XyChart);
/// assert_eq!(kind.to_string(), "xychart");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Flowchart,
    Sequence,
    Class,
    State,
    Er,
    Pie,
    Journey,
    Gantt,
    #[serde(rename = "gitgraph")]
    GitGraph,
    Mindmap,
    Timeline,
    #[serde(rename = "xychart")]
    XyChart,
    Block,
    #[default]
    Unknown,
}

impl DiagramKind {
    /// Every kind, in declaration order.
    pub const ALL: [DiagramKind; 14] = [
        DiagramKind::Flowchart,
        DiagramKind::Sequence,
        DiagramKind::Class,
        DiagramKind::State,
        DiagramKind::Er,
        DiagramKind::Pie,
        DiagramKind::Journey,
        DiagramKind::Gantt,
        DiagramKind::GitGraph,
        DiagramKind::Mindmap,
        DiagramKind::Timeline,
        DiagramKind::XyChart,
        DiagramKind::Block,
        DiagramKind::Unknown,
    ];

    /// Returns the stable lowercase tag used in results.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::Sequence => "sequence",
            DiagramKind::Class => "class",
            DiagramKind::State => "state",
            DiagramKind::Er => "er",
            DiagramKind::Pie => "pie",
            DiagramKind::Journey => "journey",
            DiagramKind::Gantt => "gantt",
            DiagramKind::GitGraph => "gitgraph",
            DiagramKind::Mindmap => "mindmap",
            DiagramKind::Timeline => "timeline",
            DiagramKind::XyChart => "xychart",
            DiagramKind::Block => "block",
            DiagramKind::Unknown => "unknown",
        }
    }

    /// Returns `true` for [`DiagramKind::Unknown`].
    pub fn is_unknown(&self) -> bool {
        matches!(self, DiagramKind::Unknown)
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the diagram type tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown diagram type tag `{0}`")]
pub struct ParseDiagramKindError(String);

impl FromStr for DiagramKind {
    type Err = ParseDiagramKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiagramKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseDiagramKindError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_from_str() {
        for kind in DiagramKind::ALL {
            assert_eq!(kind.as_str().parse::<DiagramKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = "flow".parse::<DiagramKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown diagram type tag `flow`");
    }

    #[test]
    fn test_serialized_tag_matches_as_str() {
        for kind in DiagramKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_default_is_unknown() {
        assert!(DiagramKind::default().is_unknown());
    }
}
