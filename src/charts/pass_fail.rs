//! Pass/fail donut

use crate::aggregate::PassFail;
use crate::scene::{Anchor, Node, Paint, Scene};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassFailDonut {
    pub width: f64,
    pub height: f64,
}

impl Default for PassFailDonut {
    fn default() -> Self {
        PassFailDonut {
            width: 280.0,
            height: 220.0,
        }
    }
}

/// Ring measurements derived from the smaller chart dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub size: f64,
    pub radius: f64,
    pub stroke: f64,
}

/// Degrees of the ring covered by each segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segments {
    pub pass: f64,
    pub fail: f64,
}

impl PassFailDonut {
    pub fn ring(&self) -> Ring {
        let size = self.width.min(self.height).max(0.0);
        Ring {
            size,
            radius: size * 0.34,
            stroke: (size * 0.12).max(10.0),
        }
    }

    /// Both zero when nothing was classified
    pub fn segments(counts: PassFail) -> Segments {
        if counts.total() == 0 {
            return Segments {
                pass: 0.0,
                fail: 0.0,
            };
        }
        let pass = counts.pass_rate() * 360.0;
        Segments {
            pass,
            fail: 360.0 - pass,
        }
    }

    pub fn render(&self, counts: PassFail) -> Scene {
        let ring = self.ring();
        let segments = Self::segments(counts);
        let c = ring.size / 2.0;

        let mut children = vec![Node::Arc {
            cx: c,
            cy: c,
            r: ring.radius,
            start: 0.0,
            sweep: 360.0,
            width: ring.stroke,
            stroke: Paint::Muted,
        }];
        if segments.pass > 0.0 {
            children.push(Node::Arc {
                cx: c,
                cy: c,
                r: ring.radius,
                start: 0.0,
                sweep: segments.pass,
                width: ring.stroke,
                stroke: Paint::Pass,
            });
        }
        if segments.fail > 0.0 {
            children.push(Node::Arc {
                cx: c,
                cy: c,
                r: ring.radius,
                start: segments.pass,
                sweep: segments.fail,
                width: ring.stroke,
                stroke: Paint::Fail,
            });
        }

        children.push(Node::Text {
            x: c,
            y: c,
            content: format!("{}%", counts.percent()),
            anchor: Anchor::Middle,
            size: 18.0,
            bold: true,
        });
        children.push(Node::text(c, c + 18.0, "Pass rate", Anchor::Middle, 12.0));

        let legend_y = ring.size - 4.0;
        children.push(Node::Rect {
            x: 0.0,
            y: legend_y - 10.0,
            width: 10.0,
            height: 10.0,
            fill: Paint::Pass,
            stroke: Paint::None,
            radius: 2.0,
        });
        children.push(Node::text(
            14.0,
            legend_y,
            format!("Pass: {}", counts.pass),
            Anchor::Start,
            12.0,
        ));
        children.push(Node::Rect {
            x: c + 10.0,
            y: legend_y - 10.0,
            width: 10.0,
            height: 10.0,
            fill: Paint::Fail,
            stroke: Paint::None,
            radius: 2.0,
        });
        children.push(Node::text(
            c + 24.0,
            legend_y,
            format!("Fail: {}", counts.fail),
            Anchor::Start,
            12.0,
        ));

        let mut scene = Scene::new(self.width, self.height);
        scene.push(Node::group(
            (self.width - ring.size) / 2.0,
            (self.height - ring.size) / 2.0,
            children,
        ));
        scene.empty = counts.total() == 0;
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arcs(scene: &Scene) -> Vec<(Paint, f64, f64)> {
        fn walk(nodes: &[Node], out: &mut Vec<(Paint, f64, f64)>) {
            for node in nodes {
                match node {
                    Node::Arc {
                        stroke,
                        start,
                        sweep,
                        ..
                    } => out.push((*stroke, *start, *sweep)),
                    Node::Group { children, .. } => walk(children, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&scene.nodes, &mut out);
        out
    }

    #[test]
    fn test_ring_dimensions() {
        let ring = PassFailDonut::default().ring();
        assert_eq!(ring.size, 220.0);
        assert!((ring.radius - 74.8).abs() < 1e-9);
        assert!((ring.stroke - 26.4).abs() < 1e-9);

        let tiny = PassFailDonut {
            width: 40.0,
            height: 40.0,
        };
        assert_eq!(tiny.ring().stroke, 10.0);
    }

    #[test]
    fn test_segments_are_proportional() {
        let scene = PassFailDonut::default().render(PassFail { pass: 3, fail: 1 });
        let arcs = arcs(&scene);
        assert_eq!(arcs.len(), 3);
        assert_eq!(arcs[0], (Paint::Muted, 0.0, 360.0));
        assert_eq!(arcs[1], (Paint::Pass, 0.0, 270.0));
        assert_eq!(arcs[2], (Paint::Fail, 270.0, 90.0));

        let texts = scene.texts();
        assert!(texts.contains(&"75%"));
        assert!(texts.contains(&"Pass rate"));
        assert!(texts.contains(&"Pass: 3"));
        assert!(texts.contains(&"Fail: 1"));
        assert!(!scene.empty);
    }

    #[test]
    fn test_zero_total_renders_zero_percent() {
        let scene = PassFailDonut::default().render(PassFail::default());
        assert!(scene.empty);
        assert_eq!(arcs(&scene).len(), 1);
        let texts = scene.texts();
        assert!(texts.contains(&"0%"));
        assert!(texts.contains(&"Pass: 0"));
        assert!(texts.contains(&"Fail: 0"));
    }

    #[test]
    fn test_all_failed_draws_only_fail_segment() {
        let segments = PassFailDonut::segments(PassFail { pass: 0, fail: 4 });
        assert_eq!(segments.pass, 0.0);
        assert_eq!(segments.fail, 360.0);
    }
}
