//! Data-fetch hooks
//!
//! Each dashboard resource owns a [`FetchState`]. Starting a request bumps the
//! state's generation and hands out a [`RequestTicket`]; a finished request is
//! committed only if its ticket still carries the current generation, so
//! superseded requests and requests that outlive a logout are dropped.

use serde::Deserialize;
use serde_json::json;
use std::collections::{BTreeSet, HashMap};

use crate::aggregate::{dedup_recent, over_fetch_limit};
use crate::client::{ApiClient, HttpTransport};
use crate::error::ApiError;
use crate::models::{LearningObject, ProgressEntry, Transaction, User};
use crate::queries;

/// Identifies one request against a [`FetchState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState {
            data: None,
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

impl<T> FetchState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a new request as pending; any earlier ticket becomes stale
    pub fn begin(&mut self) -> RequestTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        RequestTicket {
            generation: self.generation,
        }
    }

    /// Drop interest in whatever is in flight
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    /// Forget data and errors, and invalidate in-flight requests
    pub fn reset(&mut self) {
        self.invalidate();
        self.data = None;
        self.error = None;
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Commit a finished request. Returns false when the ticket is stale and
    /// the result was discarded.
    ///
    /// A failure keeps whatever data an earlier request stored.
    pub fn complete(&mut self, ticket: RequestTicket, result: Result<T, ApiError>) -> bool {
        if !self.is_current(ticket) {
            tracing::warn!(
                ticket = ticket.generation,
                current = self.generation,
                "Discarding stale fetch result"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Fetch failed");
                self.error = Some(err.to_string());
            }
        }
        true
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Debug, Deserialize)]
struct UsersPayload {
    #[serde(default)]
    user: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct TransactionsPayload {
    #[serde(default)]
    transaction: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
struct ObjectsPayload {
    #[serde(default)]
    object: Vec<LearningObject>,
}

#[derive(Debug, Deserialize)]
struct ProgressPayload {
    #[serde(default)]
    progress: Vec<ProgressEntry>,
}

/// Current user, if the backend returned one
pub async fn fetch_me<T: HttpTransport>(
    client: &ApiClient<T>,
    token: &str,
) -> Result<Option<User>, ApiError> {
    let payload: UsersPayload = client.graphql(token, queries::ME, json!({})).await?;
    Ok(payload.user.into_iter().next())
}

/// XP transactions plus the learning objects they reference
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XpData {
    pub transactions: Vec<Transaction>,
    pub objects: HashMap<i64, LearningObject>,
}

pub async fn fetch_xp<T: HttpTransport>(
    client: &ApiClient<T>,
    token: &str,
    limit: usize,
) -> Result<XpData, ApiError> {
    let payload: TransactionsPayload = client
        .graphql(token, queries::XP_TRANSACTIONS, json!({ "limit": limit }))
        .await?;
    let transactions = payload.transaction;

    let ids: BTreeSet<i64> = transactions.iter().map(|tx| tx.object_id).collect();
    tracing::debug!(
        transactions = transactions.len(),
        objects = ids.len(),
        "Fetched XP transactions"
    );

    let mut objects = HashMap::new();
    if !ids.is_empty() {
        let ids: Vec<i64> = ids.into_iter().collect();
        let payload: ObjectsPayload = client
            .graphql(token, queries::OBJECT_BY_IDS, json!({ "ids": ids }))
            .await?;
        objects = payload
            .object
            .into_iter()
            .map(|object| (object.id, object))
            .collect();
    }

    Ok(XpData {
        transactions,
        objects,
    })
}

/// Up to `count` distinct results, newest first
pub async fn fetch_recent_results<T: HttpTransport>(
    client: &ApiClient<T>,
    token: &str,
    user_id: i64,
    count: usize,
) -> Result<Vec<ProgressEntry>, ApiError> {
    let limit = over_fetch_limit(count);
    let payload: ProgressPayload = client
        .graphql(
            token,
            queries::PROGRESS,
            json!({ "userId": user_id, "limit": limit }),
        )
        .await?;

    let recent = dedup_recent(&payload.progress, count);
    tracing::debug!(
        fetched = payload.progress.len(),
        kept = recent.len(),
        "Fetched results"
    );
    Ok(recent)
}

/// A finished fetch, tagged with the resource and ticket it belongs to
#[derive(Debug)]
pub enum FetchOutcome {
    Me(RequestTicket, Result<Option<User>, ApiError>),
    Xp(RequestTicket, Result<XpData, ApiError>),
    Results(RequestTicket, Result<Vec<ProgressEntry>, ApiError>),
}

/// The dashboard's three resources
#[derive(Debug, Default)]
pub struct DashboardResources {
    pub me: FetchState<Option<User>>,
    pub xp: FetchState<XpData>,
    pub results: FetchState<Vec<ProgressEntry>>,
    /// User id the results were requested for
    results_user: Option<i64>,
}

impl DashboardResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for the `me` fetch, or `None` without a token
    pub fn start_me(&mut self, token: Option<&str>) -> Option<RequestTicket> {
        token?;
        Some(self.me.begin())
    }

    pub fn start_xp(&mut self, token: Option<&str>) -> Option<RequestTicket> {
        token?;
        Some(self.xp.begin())
    }

    /// Needs a token and the current user's id
    pub fn start_results(&mut self, token: Option<&str>) -> Option<(RequestTicket, i64)> {
        token?;
        let user_id = self.user_id()?;
        self.results_user = Some(user_id);
        Some((self.results.begin(), user_id))
    }

    pub fn user(&self) -> Option<&User> {
        self.me.data().and_then(Option::as_ref)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user().map(|user| user.id)
    }

    /// Commit an outcome. Returns true when a newly known user id means the
    /// results fetch should be (re)started.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        match outcome {
            FetchOutcome::Me(ticket, result) => {
                if !self.me.complete(ticket, result) {
                    return false;
                }
                let user_id = self.user_id();
                if user_id != self.results_user {
                    // Results for a different user are no longer wanted
                    self.results.reset();
                    self.results_user = None;
                }
                user_id.is_some() && self.results_user.is_none()
            }
            FetchOutcome::Xp(ticket, result) => {
                self.xp.complete(ticket, result);
                false
            }
            FetchOutcome::Results(ticket, result) => {
                self.results.complete(ticket, result);
                false
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.me.is_loading() || self.xp.is_loading() || self.results.is_loading()
    }

    /// First error among the resources, in display order
    pub fn first_error(&self) -> Option<&str> {
        self.me
            .error()
            .or_else(|| self.xp.error())
            .or_else(|| self.results.error())
    }

    /// Logout or teardown: drop all data and ignore in-flight requests
    pub fn reset(&mut self) {
        self.me.reset();
        self.xp.reset();
        self.results.reset();
        self.results_user = None;
    }
}
