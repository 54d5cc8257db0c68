//! Reductions from raw backend rows to chart-ready series

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::models::{LearningObject, ProgressEntry, Transaction};

/// Running XP total after one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CumulativePoint {
    pub at: DateTime<Utc>,
    pub total: i64,
}

/// Prefix sums of `amount` in ascending `created_at` order
///
/// The sort is stable, so transactions sharing a timestamp keep arrival order.
pub fn cumulative_series(transactions: &[Transaction]) -> Vec<CumulativePoint> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|tx| tx.created_at);

    let mut total = 0i64;
    sorted
        .into_iter()
        .map(|tx| {
            total += tx.amount;
            CumulativePoint {
                at: tx.created_at,
                total,
            }
        })
        .collect()
}

/// What a ranked row stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Object(i64),
    /// Every group past the top N, collapsed
    Others,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRow {
    pub category: Category,
    pub name: String,
    pub amount: i64,
}

pub const DEFAULT_TOP_N: usize = 10;

/// XP summed per object, largest first, with the tail past `top_n` collapsed
/// into a single [`Category::Others`] row
pub fn rank_by_object(
    transactions: &[Transaction],
    objects: &HashMap<i64, LearningObject>,
    top_n: usize,
) -> Vec<RankedRow> {
    // Vec keeps first-encountered order for the stable sort below
    let mut groups: Vec<(i64, i64)> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();
    for tx in transactions {
        match index.get(&tx.object_id) {
            Some(&i) => groups[i].1 += tx.amount,
            None => {
                index.insert(tx.object_id, groups.len());
                groups.push((tx.object_id, tx.amount));
            }
        }
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));

    let rest: i64 = groups.iter().skip(top_n).map(|(_, amount)| amount).sum();
    let has_rest = groups.len() > top_n;

    let mut rows: Vec<RankedRow> = groups
        .into_iter()
        .take(top_n)
        .map(|(id, amount)| RankedRow {
            category: Category::Object(id),
            name: objects
                .get(&id)
                .map(|object| object.name.clone())
                .unwrap_or_else(|| format!("#{}", id)),
            amount,
        })
        .collect();

    if has_rest {
        rows.push(RankedRow {
            category: Category::Others,
            name: "Others".to_string(),
            amount: rest,
        });
    }
    rows
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassFail {
    pub pass: usize,
    pub fail: usize,
}

impl PassFail {
    pub fn total(&self) -> usize {
        self.pass + self.fail
    }

    /// Passes over total, 0 when nothing was classified
    pub fn pass_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.pass as f64 / total as f64,
        }
    }

    /// Pass rate as a rounded whole percentage
    pub fn percent(&self) -> u32 {
        (self.pass_rate() * 100.0).round() as u32
    }
}

pub fn pass_fail_counts<'a, I>(entries: I) -> PassFail
where
    I: IntoIterator<Item = &'a ProgressEntry>,
{
    entries
        .into_iter()
        .fold(PassFail::default(), |mut counts, entry| {
            if entry.is_pass() {
                counts.pass += 1;
            } else {
                counts.fail += 1;
            }
            counts
        })
}

/// Rows to request so that `count` unique results survive deduplication
pub fn over_fetch_limit(count: usize) -> usize {
    count.saturating_mul(4).max(count.saturating_add(10))
}

/// First `limit` entries with distinct `(object_id, path)` keys, in input order
///
/// Input is expected newest first, so each key keeps its latest attempt.
pub fn dedup_recent(entries: &[ProgressEntry], limit: usize) -> Vec<ProgressEntry> {
    let mut seen: HashSet<(Option<i64>, &str)> = HashSet::new();
    let mut recent = Vec::with_capacity(limit.min(entries.len()));

    for entry in entries {
        if recent.len() >= limit {
            break;
        }
        if seen.insert((entry.object_id, entry.path.as_str())) {
            recent.push(entry.clone());
        }
    }

    recent
}
