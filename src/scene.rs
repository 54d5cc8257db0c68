//! Renderer-independent chart scene graph
//!
//! Chart renderers build a [`Scene`]; the SVG serializer and tests consume it.

use crate::svg::PathData;

/// Fill or stroke color, resolved against a theme palette at serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// Theme text color
    Text,
    /// Theme muted color (grid lines, empty ring)
    Muted,
    Pass,
    Fail,
    /// Tooltip background
    Tooltip,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Paint,
        opacity: f64,
        dashed: bool,
    },
    Path {
        d: PathData,
        stroke: Paint,
        width: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Paint,
        stroke: Paint,
        radius: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Paint,
    },
    /// Ring segment starting at `start` degrees clockwise from 12 o'clock
    Arc {
        cx: f64,
        cy: f64,
        r: f64,
        start: f64,
        sweep: f64,
        width: f64,
        stroke: Paint,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        anchor: Anchor,
        size: f64,
        bold: bool,
    },
    Group {
        dx: f64,
        dy: f64,
        children: Vec<Node>,
    },
}

impl Node {
    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Node::Line {
            x1,
            y1,
            x2,
            y2,
            stroke: Paint::Text,
            opacity: 1.0,
            dashed: false,
        }
    }

    pub fn text(x: f64, y: f64, content: impl Into<String>, anchor: Anchor, size: f64) -> Self {
        Node::Text {
            x,
            y,
            content: content.into(),
            anchor,
            size,
            bold: false,
        }
    }

    pub fn group(dx: f64, dy: f64, children: Vec<Node>) -> Self {
        Node::Group { dx, dy, children }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<Node>,
    /// Set when the renderer had no rows and drew its placeholder
    pub empty: bool,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Scene {
            width,
            height,
            nodes: Vec::new(),
            empty: false,
        }
    }

    /// "No data" scene with a single message in the top-left corner
    pub fn placeholder(width: f64, height: f64, message: &str) -> Self {
        Scene {
            width,
            height,
            nodes: vec![Node::text(16.0, 24.0, message, Anchor::Start, 14.0)],
            empty: true,
        }
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Every text node in drawing order, groups flattened
    pub fn texts(&self) -> Vec<&str> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a str>) {
            for node in nodes {
                match node {
                    Node::Text { content, .. } => out.push(content),
                    Node::Group { children, .. } => walk(children, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_flagged_empty() {
        let scene = Scene::placeholder(100.0, 50.0, "No XP yet");
        assert!(scene.empty);
        assert_eq!(scene.texts(), vec!["No XP yet"]);
    }

    #[test]
    fn test_texts_flatten_groups() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(Node::text(0.0, 0.0, "a", Anchor::Start, 10.0));
        scene.push(Node::group(
            1.0,
            1.0,
            vec![Node::group(
                0.0,
                0.0,
                vec![Node::text(0.0, 0.0, "b", Anchor::End, 10.0)],
            )],
        ));
        assert_eq!(scene.texts(), vec!["a", "b"]);
        assert!(!scene.empty);
    }
}
