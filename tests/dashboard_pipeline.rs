// Backend rows through the reductions into chart scenes, SVG and text

use serde_json::json;
use std::collections::HashMap;
use tempfile::TempDir;

use xpboard::aggregate::{dedup_recent, Category, PassFail};
use xpboard::charts::{HoverState, PassFailDonut, XpByProjectChart, XpOverTimeChart};
use xpboard::dashboard::DashboardView;
use xpboard::hooks::XpData;
use xpboard::models::{LearningObject, ProgressEntry, Transaction, User};
use xpboard::report;
use xpboard::scene::{Node, Scene};
use xpboard::svg::to_svg;
use xpboard::theme::Theme;

fn user() -> User {
    serde_json::from_value(json!({
        "id": 7, "login": "jdoe", "firstName": "Jane", "lastName": "Doe",
        "email": "jane@example.com"
    }))
    .unwrap()
}

fn xp_data() -> XpData {
    let transactions: Vec<Transaction> = serde_json::from_value(json!([
        {"id": 1, "amount": 500, "objectId": 10, "userId": 7, "createdAt": "2024-01-01T10:00:00Z", "path": "/school/go-reloaded"},
        {"id": 2, "amount": 300, "objectId": "20", "userId": 7, "createdAt": "2024-01-03T10:00:00Z", "path": "/school/ascii-art"},
        {"id": 3, "amount": 200, "objectId": 10, "userId": 7, "createdAt": "2024-01-02T10:00:00Z", "path": "/school/go-reloaded"},
        {"id": 4, "amount": 100, "objectId": 30, "userId": 7, "createdAt": "2024-01-05T10:00:00Z", "path": "/school/quest-01"}
    ]))
    .unwrap();
    let objects: Vec<LearningObject> = serde_json::from_value(json!([
        {"id": 10, "name": "go-reloaded", "type": "project"},
        {"id": 20, "name": "ascii-art", "type": "project"}
    ]))
    .unwrap();

    XpData {
        transactions,
        objects: objects.into_iter().map(|o| (o.id, o)).collect::<HashMap<_, _>>(),
    }
}

/// Newest first, as the backend orders them
fn progress() -> Vec<ProgressEntry> {
    serde_json::from_value(json!([
        {"id": 1, "grade": 1, "createdAt": "2024-01-06T09:00:00Z", "updatedAt": "2024-01-06T12:00:00Z",
         "path": "/school/go-reloaded", "objectId": 10, "object": {"id": 10, "name": "go-reloaded", "type": "project"}},
        {"id": 2, "grade": 0, "createdAt": "2024-01-04T09:00:00Z",
         "path": "/school/go-reloaded", "objectId": 10},
        {"id": 3, "grade": "0.5", "createdAt": "2024-01-03T09:00:00Z",
         "path": "/school/ascii-art", "objectId": 20},
        {"id": 4, "grade": 2, "createdAt": "2024-01-02T09:00:00Z",
         "path": "/school/quest-01", "objectId": 30},
        {"id": 5, "grade": null, "createdAt": "2024-01-01T09:00:00Z",
         "path": "/school/piscine/checkpoint", "objectId": 40}
    ]))
    .unwrap()
}

fn view() -> DashboardView {
    let results = dedup_recent(&progress(), 100);
    DashboardView::from_parts(Some(&user()), &xp_data(), &results, 2, 3)
}

fn texts(scene: &Scene) -> Vec<String> {
    fn walk(nodes: &[Node], out: &mut Vec<String>) {
        for node in nodes {
            match node {
                Node::Text { content, .. } => out.push(content.clone()),
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
fn test_reductions_feed_the_view() {
    let view = view();

    let totals: Vec<i64> = view.cumulative.iter().map(|p| p.total).collect();
    assert_eq!(totals, vec![500, 700, 1000, 1100]);

    let ranked: Vec<(Category, &str, i64)> = view
        .ranked
        .iter()
        .map(|r| (r.category, r.name.as_str(), r.amount))
        .collect();
    assert_eq!(
        ranked,
        vec![
            (Category::Object(10), "go-reloaded", 700),
            (Category::Object(20), "ascii-art", 300),
            (Category::Others, "Others", 100),
        ]
    );

    // The older go-reloaded attempt is dropped before counting
    assert_eq!(view.pass_fail, PassFail { pass: 2, fail: 2 });
    assert_eq!(view.recent.len(), 3);
    assert_eq!(view.recent[0].id, 1);

    assert_eq!(view.tiles.welcome.as_deref(), Some("Jane"));
    assert_eq!(view.tiles.total_xp, 1100);
    assert_eq!(view.tiles.transaction_count, 4);
    assert_eq!(view.tiles.pass_rate_percent, 50);
}

#[test]
fn test_scenes_and_svg() {
    let view = view();

    let line = view.xp_over_time_scene(&XpOverTimeChart::default(), &HoverState::default());
    assert!(!line.empty);
    let svg = to_svg(&line, Theme::Light);
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<path d=\"M"));
    assert!(svg.trim_end().ends_with("</svg>"));

    let bars = view.xp_by_project_scene(&XpByProjectChart::default());
    let labels = texts(&bars);
    for expected in ["go-reloaded", "ascii-art", "Others", "700"] {
        assert!(labels.iter().any(|t| t == expected), "missing {}", expected);
    }

    let donut = view.pass_fail_scene(&PassFailDonut::default());
    let labels = texts(&donut);
    assert!(labels.iter().any(|t| t == "50%"));
    assert!(labels.iter().any(|t| t == "Pass: 2"));
    assert!(labels.iter().any(|t| t == "Fail: 2"));

    // Same scene, different palette
    assert_ne!(to_svg(&donut, Theme::Light), to_svg(&donut, Theme::Dark));
}

#[test]
fn test_hover_snaps_to_nearest_point() {
    let view = view();
    let chart = XpOverTimeChart::default();
    let (inner_w, _) = chart.padding.inner(chart.width, chart.height);

    let mut hover = HoverState::default();
    hover.point_at(inner_w);
    let readout = chart.readout(&view.cumulative, &hover).unwrap();
    assert_eq!(readout.index, 3);
    assert_eq!(readout.label, "2024-01-05 • 1100 XP");

    hover.point_at(0.0);
    let readout = chart.readout(&view.cumulative, &hover).unwrap();
    assert_eq!(readout.total, 500);

    hover.clear();
    assert!(chart.readout(&view.cumulative, &hover).is_none());
}

#[test]
fn test_empty_dashboard_uses_placeholders() {
    let view = DashboardView::from_parts(None, &XpData::default(), &[], 10, 8);

    assert!(view
        .xp_over_time_scene(&XpOverTimeChart::default(), &HoverState::default())
        .empty);
    assert!(view.xp_by_project_scene(&XpByProjectChart::default()).empty);
    let donut = view.pass_fail_scene(&PassFailDonut::default());
    assert!(donut.empty);
    assert!(texts(&donut).iter().any(|t| t == "0%"));

    let mut out = Vec::new();
    report::write_summary(&mut out, &view, 10, 8).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("No user data."));
    assert!(text.contains("No project XP yet"));
    assert!(text.contains("No results yet"));
}

#[test]
fn test_summary_and_export() {
    let view = view();

    let mut out = Vec::new();
    report::write_summary(&mut out, &view, 10, 8).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Welcome, Jane"));
    assert!(text.contains("Total XP:      1,100"));
    assert!(text.contains("Pass rate:     50% (2 passed, 2 failed)"));
    assert!(text.contains("go-reloaded"));

    let dir = TempDir::new().unwrap();
    let written = report::export_svgs(&view, Theme::Dark, dir.path()).unwrap();
    assert_eq!(written.len(), 3);
    for name in [
        report::XP_OVER_TIME_FILE,
        report::XP_BY_PROJECT_FILE,
        report::PASS_FAIL_FILE,
    ] {
        let svg = std::fs::read_to_string(dir.path().join(name)).unwrap();
        assert!(svg.starts_with("<svg"), "{} is not an SVG", name);
    }
}
