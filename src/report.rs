//! Plain-text summary and SVG export for the one-shot commands

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::charts::{HoverState, PassFailDonut, XpByProjectChart, XpOverTimeChart};
use crate::dashboard::DashboardView;
use crate::error::AppError;
use crate::svg::to_svg;
use crate::theme::Theme;
use crate::utils::{fmt_date, format_number, truncate_to_width};

pub const XP_OVER_TIME_FILE: &str = "xp-over-time.svg";
pub const XP_BY_PROJECT_FILE: &str = "xp-by-project.svg";
pub const PASS_FAIL_FILE: &str = "pass-fail.svg";

const NAME_WIDTH: usize = 32;

/// Write the profile, tiles, top projects and recent results
pub fn write_summary<W: Write>(
    out: &mut W,
    view: &DashboardView,
    top: usize,
    recent: usize,
) -> io::Result<()> {
    match &view.user {
        Some(user) => {
            writeln!(out, "Welcome, {}", user.display_name())?;
            writeln!(out, "Login: {}", user.login)?;
            if let Some(email) = &user.email {
                writeln!(out, "Email: {}", email)?;
            }
        }
        None => writeln!(out, "No user data.")?,
    }

    let tiles = &view.tiles;
    writeln!(out)?;
    writeln!(out, "=== Summary ===")?;
    writeln!(out, "Total XP:      {}", format_number(tiles.total_xp))?;
    writeln!(out, "Projects:      {}", tiles.project_count)?;
    writeln!(out, "Transactions:  {}", tiles.transaction_count)?;
    writeln!(
        out,
        "Pass rate:     {}% ({} passed, {} failed)",
        tiles.pass_rate_percent, view.pass_fail.pass, view.pass_fail.fail
    )?;
    writeln!(
        out,
        "Last activity: {}",
        tiles
            .last_activity
            .as_ref()
            .map(fmt_date)
            .unwrap_or_else(|| "-".to_string())
    )?;

    writeln!(out)?;
    writeln!(out, "=== XP by Project ===")?;
    if view.ranked.is_empty() {
        writeln!(out, "No project XP yet")?;
    }
    for row in view.ranked.iter().take(top) {
        writeln!(
            out,
            "{:<width$} {:>10}",
            truncate_to_width(&row.name, NAME_WIDTH),
            format_number(row.amount),
            width = NAME_WIDTH
        )?;
    }

    writeln!(out)?;
    writeln!(out, "=== Recent Results ===")?;
    if view.recent.is_empty() {
        writeln!(out, "No results yet")?;
    }
    for entry in view.recent.iter().take(recent) {
        writeln!(
            out,
            "{} {:<width$} {}",
            if entry.is_pass() { "✅" } else { "❌" },
            truncate_to_width(entry.title(), NAME_WIDTH),
            fmt_date(&entry.last_touched()),
            width = NAME_WIDTH
        )?;
    }

    Ok(())
}

/// Render the three charts as standalone SVG files in `dir`
pub fn export_svgs(view: &DashboardView, theme: Theme, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir)?;

    let scenes = [
        (
            XP_OVER_TIME_FILE,
            view.xp_over_time_scene(&XpOverTimeChart::default(), &HoverState::default()),
        ),
        (
            XP_BY_PROJECT_FILE,
            view.xp_by_project_scene(&XpByProjectChart::default()),
        ),
        (PASS_FAIL_FILE, view.pass_fail_scene(&PassFailDonut::default())),
    ];

    let mut written = Vec::with_capacity(scenes.len());
    for (name, scene) in scenes {
        let path = dir.join(name);
        fs::write(&path, to_svg(&scene, theme))?;
        tracing::debug!(path = %path.display(), empty = scene.empty, "Wrote chart");
        written.push(path);
    }
    tracing::info!(count = written.len(), dir = %dir.display(), "Exported charts");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::XpData;
    use crate::models::{Grade, LearningObject, ProgressEntry, Transaction, User};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn sample_view() -> DashboardView {
        let at = |d: u32| Utc.with_ymd_and_hms(2024, 4, d, 12, 0, 0).unwrap();
        let transactions = vec![
            Transaction {
                id: 1,
                amount: 1200,
                object_id: 1,
                user_id: 9,
                created_at: at(1),
                path: "/school/go-reloaded".to_string(),
            },
            Transaction {
                id: 2,
                amount: 800,
                object_id: 2,
                user_id: 9,
                created_at: at(3),
                path: "/school/ascii-art".to_string(),
            },
        ];
        let mut objects = HashMap::new();
        objects.insert(
            1,
            LearningObject {
                id: 1,
                name: "go-reloaded".to_string(),
                kind: "project".to_string(),
            },
        );
        let results = vec![ProgressEntry {
            id: 4,
            grade: Some(Grade::Number(1.0)),
            created_at: at(2),
            updated_at: None,
            path: "/school/go-reloaded".to_string(),
            object_id: Some(1),
            user: None,
            object: None,
        }];
        let user = User {
            id: 9,
            login: "jdoe".to_string(),
            first_name: None,
            last_name: None,
            email: Some("jdoe@example.org".to_string()),
        };
        DashboardView::from_parts(
            Some(&user),
            &XpData {
                transactions,
                objects,
            },
            &results,
            10,
            8,
        )
    }

    #[test]
    fn test_summary_text() {
        let mut out = Vec::new();
        write_summary(&mut out, &sample_view(), 10, 8).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Welcome, jdoe"));
        assert!(text.contains("Email: jdoe@example.org"));
        assert!(text.contains("Total XP:      2,000"));
        assert!(text.contains("Pass rate:     100% (1 passed, 0 failed)"));
        assert!(text.contains("Last activity: 2024-04-03"));
        assert!(text.contains("go-reloaded"));
        assert!(text.contains("#2"));
    }

    #[test]
    fn test_summary_of_empty_view() {
        let view = DashboardView::from_parts(None, &XpData::default(), &[], 10, 8);
        let mut out = Vec::new();
        write_summary(&mut out, &view, 10, 8).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("No user data."));
        assert!(text.contains("No project XP yet"));
        assert!(text.contains("No results yet"));
    }

    #[test]
    fn test_export_writes_three_files() {
        let dir = TempDir::new().unwrap();
        let written = export_svgs(&sample_view(), Theme::Dark, dir.path()).unwrap();
        assert_eq!(written.len(), 3);

        let bars = fs::read_to_string(dir.path().join(XP_BY_PROJECT_FILE)).unwrap();
        assert!(bars.starts_with("<svg"));
        assert!(bars.contains("go-reloaded"));
        assert!(bars.contains(Theme::Dark.palette().background));

        let donut = fs::read_to_string(dir.path().join(PASS_FAIL_FILE)).unwrap();
        assert!(donut.contains("100%"));
    }
}
