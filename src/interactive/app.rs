//! Application state and logic for the interactive UI

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::charts::{HoverReadout, HoverState, XpOverTimeChart};
use crate::client::{ApiClient, Authenticator, HttpTransport, ReqwestTransport};
use crate::config::Config;
use crate::dashboard::DashboardView;
use crate::error::{ApiError, AppError};
use crate::hooks::{
    fetch_me, fetch_recent_results, fetch_xp, DashboardResources, FetchOutcome, RequestTicket,
};
use crate::report;
use crate::session::{validate_credentials, Screen, Session};
use crate::storage::DynStore;
use crate::theme::{Theme, ThemeState};

use super::events::AppEvent;
use super::login_form::LoginForm;
use super::messages::MessageLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
}

/// Background work reported back to the draw loop
pub enum Outcome {
    Fetch(FetchOutcome),
    Signin {
        identity: String,
        result: Result<String, ApiError>,
    },
}

pub struct App<T: HttpTransport + 'static = ReqwestTransport> {
    pub config: Config,
    client: Arc<ApiClient<T>>,
    pub session: Session<DynStore>,
    pub theme: ThemeState<DynStore>,
    pub resources: DashboardResources,
    /// Derived from `resources` after every committed fetch
    pub view: DashboardView,
    pub chart: XpOverTimeChart,
    pub hover: HoverState,
    pub login: LoginForm,
    pub mode: AppMode,
    pub messages: MessageLog,
    pub export_dir: PathBuf,
    /// Where the XP line chart was last drawn, for mouse hover
    pub chart_area: Option<Rect>,
    outcomes_tx: UnboundedSender<Outcome>,
    outcomes_rx: UnboundedReceiver<Outcome>,
}

impl<T: HttpTransport + 'static> App<T> {
    pub fn new(
        config: Config,
        client: ApiClient<T>,
        session: Session<DynStore>,
        theme: ThemeState<DynStore>,
        export_dir: PathBuf,
    ) -> Self {
        let (outcomes_tx, outcomes_rx) = unbounded_channel();
        let resources = DashboardResources::new();
        let view = DashboardView::build(&resources, &config);

        let mut app = App {
            config,
            client: Arc::new(client),
            session,
            theme,
            resources,
            view,
            chart: XpOverTimeChart::default(),
            hover: HoverState::default(),
            login: LoginForm::new(),
            mode: AppMode::Normal,
            messages: MessageLog::default(),
            export_dir,
            chart_area: None,
            outcomes_tx,
            outcomes_rx,
        };

        if app.session.is_authenticated() {
            app.messages.info("Restored session");
            app.refresh();
        } else {
            app.messages.info("Sign in to load your dashboard");
        }
        app
    }

    pub fn screen(&self) -> Screen {
        self.session.screen()
    }

    pub fn current_theme(&self) -> Theme {
        self.theme.theme()
    }

    /// Start all fetches the current state allows
    pub fn refresh(&mut self) {
        let token = self.session.token().map(str::to_string);
        let Some(token) = token else {
            return;
        };

        if let Some(ticket) = self.resources.start_me(Some(&token)) {
            self.spawn_me(ticket, token.clone());
        }
        if let Some(ticket) = self.resources.start_xp(Some(&token)) {
            self.spawn_xp(ticket, token.clone());
        }
        // Needs the user id; otherwise started once `me` lands
        self.start_results();
    }

    fn start_results(&mut self) {
        let token = self.session.token().map(str::to_string);
        if let Some((ticket, user_id)) = self.resources.start_results(token.as_deref()) {
            if let Some(token) = token {
                self.spawn_results(ticket, token, user_id);
            }
        }
    }

    fn spawn_me(&self, ticket: RequestTicket, token: String) {
        let client = Arc::clone(&self.client);
        let tx = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let result = fetch_me(&client, &token).await;
            let _ = tx.send(Outcome::Fetch(FetchOutcome::Me(ticket, result)));
        });
    }

    fn spawn_xp(&self, ticket: RequestTicket, token: String) {
        let client = Arc::clone(&self.client);
        let tx = self.outcomes_tx.clone();
        let limit = self.config.xp_limit;
        tokio::spawn(async move {
            let result = fetch_xp(&client, &token, limit).await;
            let _ = tx.send(Outcome::Fetch(FetchOutcome::Xp(ticket, result)));
        });
    }

    fn spawn_results(&self, ticket: RequestTicket, token: String, user_id: i64) {
        let client = Arc::clone(&self.client);
        let tx = self.outcomes_tx.clone();
        let count = self.config.results_window;
        tokio::spawn(async move {
            let result = fetch_recent_results(&client, &token, user_id, count).await;
            let _ = tx.send(Outcome::Fetch(FetchOutcome::Results(ticket, result)));
        });
    }

    /// Commit one finished piece of background work
    pub fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Fetch(fetch) => self.apply_fetch(fetch),
            Outcome::Signin { identity, result } => self.finish_login(identity, result),
        }
    }

    fn apply_fetch(&mut self, outcome: FetchOutcome) {
        if self.resources.apply(outcome) {
            self.start_results();
        }
        self.rebuild_view();
        if !self.resources.is_loading() {
            if let Some(error) = self.resources.first_error() {
                let error = error.to_string();
                if self.messages.last().map(|m| m.text.as_str()) != Some(error.as_str()) {
                    self.messages.error(error);
                }
            }
        }
    }

    /// Apply everything that finished since the last frame
    pub fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    /// Wait for the next finished task, if any are still owed
    pub async fn next_outcome(&mut self) -> Option<Outcome> {
        self.outcomes_rx.recv().await
    }

    fn rebuild_view(&mut self) {
        self.view = DashboardView::build(&self.resources, &self.config);
        if self.view.cumulative.is_empty() {
            self.hover.clear();
        }
    }

    pub fn readout(&self) -> Option<HoverReadout> {
        self.chart.readout(&self.view.cumulative, &self.hover)
    }

    /// Move the hover to the neighbouring point; starts at the latest point
    pub fn step_hover(&mut self, forward: bool) {
        let points = self.chart.plotted(&self.view.cumulative);
        if points.is_empty() {
            return;
        }
        let last = points.len() - 1;
        let index = match self.readout().map(|r| r.index) {
            None => last,
            Some(i) if forward => (i + 1).min(last),
            Some(i) => i.saturating_sub(1),
        };
        self.hover.point_at(points[index].x - self.chart.padding.left);
    }

    /// Hover at a fraction (0..=1) of the plot width
    pub fn hover_at_fraction(&mut self, fraction: f64) {
        let (inner_w, _) = self.chart.padding.inner(self.chart.width, self.chart.height);
        self.hover.point_at(fraction.clamp(0.0, 1.0) * inner_w);
    }

    pub async fn handle_event(&mut self, event: AppEvent) -> Result<bool> {
        match event {
            AppEvent::Key(key) => {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(false);
                }
                match (self.screen(), self.mode) {
                    (_, AppMode::Help) => Ok(self.handle_help_mode(key)),
                    (Screen::Login, AppMode::Normal) => Ok(self.handle_login_key(key)),
                    (Screen::Dashboard, AppMode::Normal) => Ok(self.handle_dashboard_key(key)),
                }
            }
            AppEvent::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Ok(true)
            }
            AppEvent::Tick => {
                self.messages.prune();
                Ok(true)
            }
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) -> bool {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')
        ) {
            self.mode = AppMode::Normal;
        }
        true
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Esc {
            return false;
        }
        if self.login.submitting {
            return true;
        }
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.focus_next();
            }
            KeyCode::Enter => self.submit_login(),
            _ => self.login.handle_key(key),
        }
        true
    }

    /// Start signin in the background; the form stays locked until it reports
    fn submit_login(&mut self) {
        let (identity, password) = self.login.credentials();
        if let Err(e) = validate_credentials(&identity, &password) {
            self.messages.error(e.to_string());
            return;
        }

        self.login.submitting = true;
        let client = Arc::clone(&self.client);
        let tx = self.outcomes_tx.clone();
        tokio::spawn(async move {
            let result = client.signin(&identity, &password).await;
            let _ = tx.send(Outcome::Signin { identity, result });
        });
    }

    fn finish_login(&mut self, identity: String, result: Result<String, ApiError>) {
        if !self.login.submitting {
            return;
        }
        self.login.submitting = false;

        let adopted = result
            .map_err(AppError::from)
            .and_then(|token| self.session.adopt_token(&identity, token));
        match adopted {
            Ok(()) => {
                self.login.reset();
                self.messages.success(format!("Signed in as {}", identity));
                self.refresh();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sign in failed");
                self.login.clear_password();
                self.messages.error(e.to_string());
            }
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return false,
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.messages.info("Refreshing...");
                self.refresh();
            }
            KeyCode::Char('t') | KeyCode::Char('T') => self.toggle_theme(),
            KeyCode::Char('l') | KeyCode::Char('L') => self.logout(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export(),
            KeyCode::Left => self.step_hover(false),
            KeyCode::Right => self.step_hover(true),
            KeyCode::Esc => self.hover.clear(),
            _ => {}
        }
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.screen() != Screen::Dashboard {
            return;
        }
        let Some(area) = self.chart_area else {
            return;
        };
        let inside = mouse.column >= area.x
            && mouse.column < area.x + area.width
            && mouse.row >= area.y
            && mouse.row < area.y + area.height;

        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_)
                if inside =>
            {
                let span = area.width.saturating_sub(1).max(1) as f64;
                self.hover_at_fraction((mouse.column - area.x) as f64 / span);
            }
            MouseEventKind::Moved if !inside => self.hover.clear(),
            _ => {}
        }
    }

    pub fn toggle_theme(&mut self) {
        match self.theme.toggle() {
            Ok(theme) => self.messages.info(format!("Theme: {}", theme)),
            Err(e) => self.messages.error(e.to_string()),
        }
    }

    pub fn logout(&mut self) {
        let result = self.session.logout();
        self.resources.reset();
        self.rebuild_view();
        self.hover.clear();
        self.login.reset();
        match result {
            Ok(()) => self.messages.info("Signed out"),
            Err(e) => self.messages.error(e.to_string()),
        }
    }

    pub fn export(&mut self) {
        match report::export_svgs(&self.view, self.current_theme(), &self.export_dir) {
            Ok(paths) => self.messages.success(format!(
                "Exported {} charts to {}",
                paths.len(),
                self.export_dir.display()
            )),
            Err(e) => self.messages.error(format!("Export failed: {}", e)),
        }
    }
}
