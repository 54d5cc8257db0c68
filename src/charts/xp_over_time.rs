//! Cumulative XP line chart with a nearest-point hover readout

use chrono::{DateTime, Duration, Utc};

use super::{tick_fractions, Padding};
use crate::aggregate::CumulativePoint;
use crate::scale::{LinearScale, TimeScale};
use crate::scene::{Anchor, Node, Paint, Scene};
use crate::svg::{line_path, Point};
use crate::utils::fmt_date;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XpOverTimeChart {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    pub time_ticks: usize,
    pub value_ticks: usize,
}

impl Default for XpOverTimeChart {
    fn default() -> Self {
        XpOverTimeChart {
            width: 760.0,
            height: 320.0,
            padding: Padding::new(20.0, 20.0, 40.0, 48.0),
            time_ticks: 6,
            value_ticks: 5,
        }
    }
}

/// What the hover overlay shows for one plotted point
#[derive(Debug, Clone, PartialEq)]
pub struct HoverReadout {
    pub index: usize,
    /// Absolute scene coordinates of the point
    pub x: f64,
    pub y: f64,
    pub at: DateTime<Utc>,
    pub total: i64,
    pub label: String,
}

/// Transient pointer position over the plot area
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HoverState {
    pointer_x: Option<f64>,
}

impl HoverState {
    /// Pointer x relative to the left edge of the plot area
    pub fn point_at(&mut self, x: f64) {
        self.pointer_x = Some(x);
    }

    pub fn clear(&mut self) {
        self.pointer_x = None;
    }

    pub fn pointer(&self) -> Option<f64> {
        self.pointer_x
    }
}

/// Scales fitted to one series
struct Layout {
    x: TimeScale,
    y: LinearScale,
    max_total: i64,
    first: DateTime<Utc>,
    last: DateTime<Utc>,
}

impl XpOverTimeChart {
    fn layout(&self, points: &[CumulativePoint]) -> Option<Layout> {
        let first = points.first()?.at;
        let last = points.last()?.at;
        let (inner_w, inner_h) = self.padding.inner(self.width, self.height);
        let max_total = points.iter().map(|p| p.total).max().unwrap_or(0);

        Some(Layout {
            x: TimeScale::new((first, last), (0.0, inner_w)),
            y: LinearScale::new((0.0, max_total as f64), (inner_h, 0.0)),
            max_total,
            first,
            last,
        })
    }

    /// Points in absolute scene coordinates
    pub fn plotted(&self, points: &[CumulativePoint]) -> Vec<Point> {
        let Some(layout) = self.layout(points) else {
            return Vec::new();
        };
        points
            .iter()
            .map(|p| {
                Point::new(
                    self.padding.left + layout.x.map(p.at),
                    self.padding.top + layout.y.map(p.total as f64),
                )
            })
            .collect()
    }

    /// Evenly spaced by elapsed time between the first and last point
    pub fn time_ticks(&self, points: &[CumulativePoint]) -> Vec<DateTime<Utc>> {
        let Some(layout) = self.layout(points) else {
            return Vec::new();
        };
        let span_ms = (layout.last - layout.first).num_milliseconds() as f64;
        tick_fractions(self.time_ticks)
            .into_iter()
            .map(|f| layout.first + Duration::milliseconds((f * span_ms).round() as i64))
            .collect()
    }

    /// Evenly spaced from 0 to the largest running total, rounded
    pub fn value_ticks(&self, points: &[CumulativePoint]) -> Vec<i64> {
        let Some(layout) = self.layout(points) else {
            return Vec::new();
        };
        tick_fractions(self.value_ticks)
            .into_iter()
            .map(|f| (f * layout.max_total as f64).round() as i64)
            .collect()
    }

    /// Nearest point by horizontal distance to `pointer_x` (plot-relative)
    pub fn hover_at(&self, points: &[CumulativePoint], pointer_x: f64) -> Option<HoverReadout> {
        let layout = self.layout(points)?;

        let (index, point) = points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let da = (layout.x.map(a.at) - pointer_x).abs();
                let db = (layout.x.map(b.at) - pointer_x).abs();
                da.total_cmp(&db)
            })?;

        Some(HoverReadout {
            index,
            x: self.padding.left + layout.x.map(point.at),
            y: self.padding.top + layout.y.map(point.total as f64),
            at: point.at,
            total: point.total,
            label: format!("{} • {} XP", fmt_date(&point.at), point.total),
        })
    }

    pub fn readout(&self, points: &[CumulativePoint], hover: &HoverState) -> Option<HoverReadout> {
        hover.pointer().and_then(|x| self.hover_at(points, x))
    }

    pub fn render(&self, points: &[CumulativePoint], hover: &HoverState) -> Scene {
        let Some(layout) = self.layout(points) else {
            return Scene::placeholder(self.width, self.height, "No XP yet");
        };
        let pad = self.padding;
        let (inner_w, inner_h) = pad.inner(self.width, self.height);
        let baseline = pad.top + inner_h;

        let mut scene = Scene::new(self.width, self.height);

        // Axes
        scene.push(Node::line(pad.left, baseline, pad.left + inner_w, baseline));
        scene.push(Node::line(pad.left, pad.top, pad.left, baseline));

        for tick in self.time_ticks(points) {
            let x = pad.left + layout.x.map(tick);
            scene.push(Node::group(
                x,
                0.0,
                vec![
                    Node::line(0.0, baseline, 0.0, baseline + 6.0),
                    Node::text(0.0, baseline + 20.0, fmt_date(&tick), Anchor::Middle, 10.0),
                ],
            ));
        }

        for value in self.value_ticks(points) {
            let y = pad.top + layout.y.map(value as f64);
            scene.push(Node::group(
                0.0,
                y,
                vec![
                    Node::line(pad.left - 6.0, 0.0, pad.left, 0.0),
                    Node::text(pad.left - 10.0, 3.0, value.to_string(), Anchor::End, 10.0),
                    Node::Line {
                        x1: pad.left,
                        y1: 0.0,
                        x2: pad.left + inner_w,
                        y2: 0.0,
                        stroke: Paint::Text,
                        opacity: 0.1,
                        dashed: false,
                    },
                ],
            ));
        }

        scene.push(Node::Path {
            d: line_path(&self.plotted(points)),
            stroke: Paint::Text,
            width: 2.0,
        });

        if let Some(readout) = self.readout(points, hover) {
            scene.push(Node::Line {
                x1: readout.x,
                y1: pad.top,
                x2: readout.x,
                y2: baseline,
                stroke: Paint::Text,
                opacity: 1.0,
                dashed: true,
            });
            scene.push(Node::Circle {
                cx: readout.x,
                cy: readout.y,
                r: 4.0,
                fill: Paint::Text,
            });
            scene.push(Node::Rect {
                x: readout.x + 8.0,
                y: readout.y - 18.0,
                width: 140.0,
                height: 22.0,
                fill: Paint::Tooltip,
                stroke: Paint::Text,
                radius: 4.0,
            });
            scene.push(Node::text(
                readout.x + 12.0,
                readout.y - 3.0,
                readout.label,
                Anchor::Start,
                12.0,
            ));
        }

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn series() -> Vec<CumulativePoint> {
        vec![
            CumulativePoint { at: day(1), total: 100 },
            CumulativePoint { at: day(6), total: 400 },
            CumulativePoint { at: day(11), total: 800 },
        ]
    }

    #[test]
    fn test_empty_renders_placeholder() {
        let chart = XpOverTimeChart::default();
        let scene = chart.render(&[], &HoverState::default());
        assert!(scene.empty);
        assert_eq!(scene.texts(), vec!["No XP yet"]);
        assert!(chart.hover_at(&[], 10.0).is_none());
        assert!(chart.time_ticks(&[]).is_empty());
    }

    #[test]
    fn test_ticks() {
        let chart = XpOverTimeChart::default();
        let ticks = chart.time_ticks(&series());
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0], day(1));
        assert_eq!(ticks[5], day(11));
        assert_eq!(ticks[1], day(3));

        assert_eq!(chart.value_ticks(&series()), vec![0, 200, 400, 600, 800]);
    }

    #[test]
    fn test_plotted_points_span_plot_area() {
        let chart = XpOverTimeChart::default();
        let points = chart.plotted(&series());
        let close = |a: f64, b: f64| (a - b).abs() < 1e-6;
        // Plot area is 692 x 260 starting at (48, 20)
        assert!(close(points[0].x, 48.0));
        assert!(close(points[2].x, 48.0 + 692.0));
        assert!(close(points[2].y, 20.0));
        assert!(close(points[1].x, 48.0 + 346.0));
        assert!(close(points[0].y, 20.0 + 260.0 - 260.0 * 100.0 / 800.0));
    }

    #[test]
    fn test_hover_finds_nearest_point() {
        let chart = XpOverTimeChart::default();
        let readout = chart.hover_at(&series(), 300.0).unwrap();
        assert_eq!(readout.index, 1);
        assert_eq!(readout.total, 400);
        assert_eq!(readout.label, "2024-01-06 • 400 XP");

        assert_eq!(chart.hover_at(&series(), -50.0).unwrap().index, 0);
        assert_eq!(chart.hover_at(&series(), 10_000.0).unwrap().index, 2);
    }

    #[test]
    fn test_hover_state_drives_overlay() {
        let chart = XpOverTimeChart::default();
        let mut hover = HoverState::default();

        hover.point_at(690.0);
        let scene = chart.render(&series(), &hover);
        assert!(scene.texts().contains(&"2024-01-11 • 800 XP"));

        hover.clear();
        assert!(chart.readout(&series(), &hover).is_none());
        let scene = chart.render(&series(), &hover);
        assert!(!scene.texts().iter().any(|t| t.contains("• ")));
    }

    #[test]
    fn test_single_point_is_finite() {
        let chart = XpOverTimeChart::default();
        let single = vec![CumulativePoint { at: day(3), total: 0 }];
        for p in chart.plotted(&single) {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
        assert_eq!(chart.value_ticks(&single), vec![0, 0, 0, 0, 0]);
        assert!(!chart.render(&single, &HoverState::default()).empty);
    }
}
