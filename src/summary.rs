//! Headline numbers shown above the charts

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::aggregate::PassFail;
use crate::models::{ProgressEntry, Transaction, User};

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTiles {
    /// `firstName`, else `login`; `None` before the profile loads
    pub welcome: Option<String>,
    pub total_xp: i64,
    pub project_count: usize,
    pub transaction_count: usize,
    pub pass_rate_percent: u32,
    /// Newest transaction or result timestamp
    pub last_activity: Option<DateTime<Utc>>,
}

impl SummaryTiles {
    pub fn compute(
        user: Option<&User>,
        transactions: &[Transaction],
        results: &[ProgressEntry],
        pass_fail: PassFail,
    ) -> Self {
        let projects: HashSet<i64> = transactions.iter().map(|tx| tx.object_id).collect();

        let last_tx = transactions.iter().map(|tx| tx.created_at).max();
        let last_result = results.iter().map(ProgressEntry::last_touched).max();

        SummaryTiles {
            welcome: user.map(|u| u.display_name().to_string()),
            total_xp: transactions.iter().map(|tx| tx.amount).sum(),
            project_count: projects.len(),
            transaction_count: transactions.len(),
            pass_rate_percent: pass_fail.percent(),
            last_activity: last_tx.max(last_result),
        }
    }
}
