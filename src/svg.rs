//! Path building and SVG serialization of scenes

use std::f64::consts::PI;
use std::fmt::Write;

use crate::scene::{Anchor, Node, Paint, Scene};
use crate::theme::{Palette, Theme};
use crate::utils::fmt_coord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Polyline descriptor in SVG path syntax; empty draws nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathData(String);

impl PathData {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Move to the first point, then a line to each following point
pub fn line_path(points: &[Point]) -> PathData {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let command = if i == 0 { "M" } else { " L" };
        let _ = write!(d, "{} {} {}", command, fmt_coord(p.x), fmt_coord(p.y));
    }
    PathData(d)
}

fn paint(palette: &Palette, paint: Paint) -> &'static str {
    match paint {
        Paint::Text => palette.text,
        Paint::Muted => palette.muted,
        Paint::Pass => palette.pass,
        Paint::Fail => palette.fail,
        Paint::Tooltip => palette.tooltip,
        Paint::None => "none",
    }
}

fn anchor(anchor: Anchor) -> &'static str {
    match anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
        Anchor::End => "end",
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Serialize a scene as a standalone SVG document
pub fn to_svg(scene: &Scene, theme: Theme) -> String {
    let palette = theme.palette();
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = fmt_coord(scene.width),
        h = fmt_coord(scene.height),
    );
    let _ = writeln!(
        out,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        palette.background
    );
    for node in &scene.nodes {
        write_node(&mut out, node, &palette, 1);
    }
    out.push_str("</svg>\n");
    out
}

fn write_node(out: &mut String, node: &Node, palette: &Palette, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            opacity,
            dashed,
        } => {
            let _ = write!(
                out,
                r#"{}<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}""#,
                indent,
                fmt_coord(*x1),
                fmt_coord(*y1),
                fmt_coord(*x2),
                fmt_coord(*y2),
                paint(palette, *stroke)
            );
            if *opacity < 1.0 {
                let _ = write!(out, r#" stroke-opacity="{}""#, fmt_coord(*opacity));
            }
            if *dashed {
                out.push_str(r#" stroke-dasharray="3,3""#);
            }
            out.push_str("/>\n");
        }
        Node::Path { d, stroke, width } => {
            if d.is_empty() {
                return;
            }
            let _ = writeln!(
                out,
                r#"{}<path d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                indent,
                d.as_str(),
                paint(palette, *stroke),
                fmt_coord(*width)
            );
        }
        Node::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
            radius,
        } => {
            let _ = write!(
                out,
                r#"{}<rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
                indent,
                fmt_coord(*x),
                fmt_coord(*y),
                fmt_coord(width.max(0.0)),
                fmt_coord(height.max(0.0)),
                paint(palette, *fill)
            );
            if *stroke != Paint::None {
                let _ = write!(out, r#" stroke="{}""#, paint(palette, *stroke));
            }
            if *radius > 0.0 {
                let _ = write!(
                    out,
                    r#" rx="{r}" ry="{r}""#,
                    r = fmt_coord(*radius)
                );
            }
            out.push_str("/>\n");
        }
        Node::Circle { cx, cy, r, fill } => {
            let _ = writeln!(
                out,
                r#"{}<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                indent,
                fmt_coord(*cx),
                fmt_coord(*cy),
                fmt_coord(*r),
                paint(palette, *fill)
            );
        }
        Node::Arc {
            cx,
            cy,
            r,
            start,
            sweep,
            width,
            stroke,
        } => {
            // Dash a full circle so a 360 degree sweep still draws
            let circumference = 2.0 * PI * r;
            let length = circumference * (sweep.clamp(0.0, 360.0) / 360.0);
            if length <= 0.0 {
                return;
            }
            let _ = writeln!(
                out,
                r#"{}<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="{}" stroke-dasharray="{} {}" transform="rotate({} {} {})"/>"#,
                indent,
                fmt_coord(*cx),
                fmt_coord(*cy),
                fmt_coord(*r),
                paint(palette, *stroke),
                fmt_coord(*width),
                fmt_coord(length),
                fmt_coord(circumference - length),
                fmt_coord(start - 90.0),
                fmt_coord(*cx),
                fmt_coord(*cy)
            );
        }
        Node::Text {
            x,
            y,
            content,
            anchor: text_anchor,
            size,
            bold,
        } => {
            let _ = write!(
                out,
                r#"{}<text x="{}" y="{}" text-anchor="{}" font-size="{}" fill="{}""#,
                indent,
                fmt_coord(*x),
                fmt_coord(*y),
                anchor(*text_anchor),
                fmt_coord(*size),
                palette.text
            );
            if *bold {
                out.push_str(r#" font-weight="600""#);
            }
            let _ = writeln!(out, ">{}</text>", escape_text(content));
        }
        Node::Group { dx, dy, children } => {
            let _ = writeln!(
                out,
                r#"{}<g transform="translate({},{})">"#,
                indent,
                fmt_coord(*dx),
                fmt_coord(*dy)
            );
            for child in children {
                write_node(out, child, palette, depth + 1);
            }
            let _ = writeln!(out, "{}</g>", indent);
        }
    }
}
