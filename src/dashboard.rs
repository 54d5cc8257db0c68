//! Everything the dashboard shows, derived from the fetched resources

use crate::aggregate::{
    cumulative_series, pass_fail_counts, rank_by_object, CumulativePoint, PassFail, RankedRow,
};
use crate::charts::{HoverState, PassFailDonut, XpByProjectChart, XpOverTimeChart};
use crate::client::{ApiClient, HttpTransport};
use crate::config::Config;
use crate::hooks::{
    fetch_me, fetch_recent_results, fetch_xp, DashboardResources, FetchOutcome, XpData,
};
use crate::models::{ProgressEntry, User};
use crate::scene::Scene;
use crate::summary::SummaryTiles;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub user: Option<User>,
    pub tiles: SummaryTiles,
    pub cumulative: Vec<CumulativePoint>,
    pub ranked: Vec<RankedRow>,
    pub pass_fail: PassFail,
    /// Head of the deduplicated results, newest first
    pub recent: Vec<ProgressEntry>,
}

impl DashboardView {
    pub fn build(resources: &DashboardResources, config: &Config) -> Self {
        let empty = XpData::default();
        let xp = resources.xp.data().unwrap_or(&empty);
        let results = resources.results.data().map(Vec::as_slice).unwrap_or(&[]);
        Self::from_parts(
            resources.user(),
            xp,
            results,
            config.top_projects,
            config.recent_results,
        )
    }

    pub fn from_parts(
        user: Option<&User>,
        xp: &XpData,
        results: &[ProgressEntry],
        top_n: usize,
        recent_count: usize,
    ) -> Self {
        let pass_fail = pass_fail_counts(results);
        DashboardView {
            user: user.cloned(),
            tiles: SummaryTiles::compute(user, &xp.transactions, results, pass_fail),
            cumulative: cumulative_series(&xp.transactions),
            ranked: rank_by_object(&xp.transactions, &xp.objects, top_n),
            pass_fail,
            recent: results.iter().take(recent_count).cloned().collect(),
        }
    }

    pub fn xp_over_time_scene(&self, chart: &XpOverTimeChart, hover: &HoverState) -> Scene {
        chart.render(&self.cumulative, hover)
    }

    pub fn xp_by_project_scene(&self, chart: &XpByProjectChart) -> Scene {
        chart.render(&self.ranked)
    }

    pub fn pass_fail_scene(&self, chart: &PassFailDonut) -> Scene {
        chart.render(self.pass_fail)
    }
}

/// Run the three fetches one after another, for the non-interactive commands
///
/// Uses the same tickets and commit rules as the interactive loop.
pub async fn load_dashboard<T: HttpTransport>(
    client: &ApiClient<T>,
    token: &str,
    config: &Config,
) -> DashboardResources {
    let mut resources = DashboardResources::new();

    if let Some(ticket) = resources.start_me(Some(token)) {
        let result = fetch_me(client, token).await;
        resources.apply(FetchOutcome::Me(ticket, result));
    }
    if let Some(ticket) = resources.start_xp(Some(token)) {
        let result = fetch_xp(client, token, config.xp_limit).await;
        resources.apply(FetchOutcome::Xp(ticket, result));
    }
    if let Some((ticket, user_id)) = resources.start_results(Some(token)) {
        let result = fetch_recent_results(client, token, user_id, config.results_window).await;
        resources.apply(FetchOutcome::Results(ticket, result));
    }

    resources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Category;
    use crate::client::testing::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn test_empty_view() {
        let view = DashboardView::build(&DashboardResources::new(), &Config::default());
        assert!(view.cumulative.is_empty());
        assert!(view.ranked.is_empty());
        assert_eq!(view.pass_fail.total(), 0);
        assert!(view.xp_over_time_scene(&XpOverTimeChart::default(), &HoverState::default()).empty);
        assert!(view.xp_by_project_scene(&XpByProjectChart::default()).empty);
        assert!(view.pass_fail_scene(&PassFailDonut::default()).empty);
    }

    #[tokio::test]
    async fn test_load_dashboard_runs_all_fetches() {
        let transport = ScriptedTransport::new()
            .reply(200, json!({"data": {"user": [{"id": 5, "login": "jdoe"}]}}))
            .reply(
                200,
                json!({"data": {"transaction": [
                    {"id": 1, "amount": 700, "objectId": 3, "userId": 5,
                     "createdAt": "2024-01-01T00:00:00Z", "path": "/p"}
                ]}}),
            )
            .reply(200, json!({"data": {"object": [{"id": 3, "name": "lem-in", "type": "project"}]}}))
            .reply(
                200,
                json!({"data": {"progress": [
                    {"id": 9, "grade": 1, "createdAt": "2024-01-02T00:00:00Z",
                     "path": "/p", "objectId": 3}
                ]}}),
            );
        let client = ApiClient::with_transport("http://backend", transport);

        let resources = load_dashboard(&client, "tok", &Config::default()).await;
        assert!(resources.first_error().is_none());
        assert!(!resources.is_loading());

        let view = DashboardView::build(&resources, &Config::default());
        assert_eq!(view.tiles.welcome.as_deref(), Some("jdoe"));
        assert_eq!(view.tiles.total_xp, 700);
        assert_eq!(view.ranked[0].category, Category::Object(3));
        assert_eq!(view.ranked[0].name, "lem-in");
        assert_eq!(view.pass_fail, PassFail { pass: 1, fail: 0 });
        assert_eq!(view.recent.len(), 1);
    }

    #[tokio::test]
    async fn test_load_dashboard_skips_results_without_user() {
        let transport = ScriptedTransport::new()
            .reply(200, json!({"data": {"user": []}}))
            .reply(200, json!({"data": {"transaction": []}}));
        let client = ApiClient::with_transport("http://backend", transport);

        let resources = load_dashboard(&client, "tok", &Config::default()).await;
        assert!(resources.user().is_none());
        assert!(resources.results.data().is_none());
        assert!(resources.first_error().is_none());
    }
}
