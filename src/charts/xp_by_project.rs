//! Horizontal ranked-bar chart of XP per project

use super::{tick_fractions, Padding};
use crate::aggregate::RankedRow;
use crate::scale::LinearScale;
use crate::scene::{Anchor, Node, Paint, Scene};
use crate::utils::format_number;

/// Share of each row slot taken by its bar
pub const BAR_FRACTION: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XpByProjectChart {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    pub value_ticks: usize,
}

impl Default for XpByProjectChart {
    fn default() -> Self {
        XpByProjectChart {
            width: 760.0,
            height: 360.0,
            padding: Padding::new(20.0, 20.0, 40.0, 160.0),
            value_ticks: 5,
        }
    }
}

/// Position of one bar inside the plot area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub y: f64,
    pub length: f64,
    pub thickness: f64,
}

impl XpByProjectChart {
    /// Largest row value, 0 when there are no rows or every row is negative
    fn max_amount(rows: &[RankedRow]) -> i64 {
        rows.iter().map(|r| r.amount).max().unwrap_or(0).max(0)
    }

    /// One bar per row; lengths are clamped at zero for negative totals
    pub fn bars(&self, rows: &[RankedRow]) -> Vec<BarGeometry> {
        if rows.is_empty() {
            return Vec::new();
        }
        let (inner_w, inner_h) = self.padding.inner(self.width, self.height);
        let x = LinearScale::new((0.0, Self::max_amount(rows) as f64), (0.0, inner_w));

        let n = rows.len() as f64;
        let thickness = inner_h / n * BAR_FRACTION;
        let gap = (inner_h - thickness * n) / (n - 1.0).max(1.0);

        rows.iter()
            .enumerate()
            .map(|(i, row)| BarGeometry {
                y: i as f64 * (thickness + gap),
                length: x.map(row.amount as f64).max(0.0),
                thickness,
            })
            .collect()
    }

    pub fn render(&self, rows: &[RankedRow]) -> Scene {
        if rows.is_empty() {
            return Scene::placeholder(self.width, self.height, "No project XP yet");
        }
        let pad = self.padding;
        let (inner_w, inner_h) = pad.inner(self.width, self.height);
        let baseline = pad.top + inner_h;
        let max = Self::max_amount(rows);
        let x = LinearScale::new((0.0, max as f64), (0.0, inner_w));

        let mut scene = Scene::new(self.width, self.height);
        scene.push(Node::line(pad.left, baseline, pad.left + inner_w, baseline));
        scene.push(Node::line(pad.left, pad.top, pad.left, baseline));

        for fraction in tick_fractions(self.value_ticks) {
            let value = (fraction * max as f64).round();
            let tx = pad.left + x.map(value);
            scene.push(Node::group(
                tx,
                0.0,
                vec![
                    Node::line(0.0, baseline, 0.0, baseline + 6.0),
                    Node::text(
                        0.0,
                        baseline + 20.0,
                        format_number(value as i64),
                        Anchor::Middle,
                        10.0,
                    ),
                ],
            ));
        }

        for (row, bar) in rows.iter().zip(self.bars(rows)) {
            let mid = bar.thickness / 2.0 + 4.0;
            scene.push(Node::group(
                pad.left,
                pad.top + bar.y,
                vec![
                    Node::Rect {
                        x: 0.0,
                        y: 0.0,
                        width: bar.length,
                        height: bar.thickness,
                        fill: Paint::Pass,
                        stroke: Paint::None,
                        radius: 3.0,
                    },
                    Node::text(-10.0, mid, row.name.clone(), Anchor::End, 12.0),
                    Node::text(
                        bar.length + 6.0,
                        mid,
                        format_number(row.amount),
                        Anchor::Start,
                        12.0,
                    ),
                ],
            ));
        }

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Category;

    fn row(id: i64, name: &str, amount: i64) -> RankedRow {
        RankedRow {
            category: Category::Object(id),
            name: name.to_string(),
            amount,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_empty_renders_placeholder() {
        let chart = XpByProjectChart::default();
        let scene = chart.render(&[]);
        assert!(scene.empty);
        assert_eq!(scene.texts(), vec!["No project XP yet"]);
        assert!(chart.bars(&[]).is_empty());
    }

    #[test]
    fn test_bar_thickness_is_seventy_percent_of_slot() {
        let chart = XpByProjectChart::default();
        let rows = vec![row(1, "a", 40), row(2, "b", 20), row(3, "c", 10), row(4, "d", 5)];
        let bars = chart.bars(&rows);
        // Plot area height is 300, four slots of 75
        for bar in &bars {
            assert!(close(bar.thickness, 52.5));
        }
        // First bar at the top, last bar flush with the bottom
        assert!(close(bars[0].y, 0.0));
        assert!(close(bars[3].y + bars[3].thickness, 300.0));
    }

    #[test]
    fn test_bar_lengths_are_proportional() {
        let chart = XpByProjectChart::default();
        let rows = vec![
            row(1, "a", 1000),
            row(2, "b", 500),
            RankedRow {
                category: Category::Others,
                name: "Others".to_string(),
                amount: 250,
            },
        ];
        let bars = chart.bars(&rows);
        // Plot area width is 580
        assert!(close(bars[0].length, 580.0));
        assert!(close(bars[1].length, 290.0));
        assert!(close(bars[2].length, 145.0));
    }

    #[test]
    fn test_render_labels_rows() {
        let chart = XpByProjectChart::default();
        let scene = chart.render(&[row(7, "go-reloaded", 12_500), row(8, "ascii-art", 900)]);
        let texts = scene.texts();
        assert!(texts.contains(&"go-reloaded"));
        assert!(texts.contains(&"12,500"));
        assert!(texts.contains(&"ascii-art"));
        assert!(!scene.empty);
    }

    #[test]
    fn test_negative_and_zero_totals_stay_finite() {
        let chart = XpByProjectChart::default();
        let bars = chart.bars(&[row(1, "a", 0), row(2, "b", -30)]);
        for bar in bars {
            assert!(bar.length.is_finite());
            assert!(bar.length >= 0.0);
        }
    }
}
