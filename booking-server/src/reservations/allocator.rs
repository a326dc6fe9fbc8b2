//! Table allocator
//!
//! 评分规则：
//!
//! ```text
//! score = |capacity - party| * 10
//!       + 20 * (capacity - party)     // 仅高峰时段且 capacity > party
//! ```
//!
//! 高峰：本地 11:00-14:00、18:00-21:00（不含结束）。分数越低越好，同分取先出现的。

use chrono::{DateTime, Timelike};
use chrono_tz::Tz;
use shared::models::{DiningTable, TableStatus};

/// Peak windows as `[start_hour, end_hour)`
pub const PEAK_WINDOWS: [(u32, u32); 2] = [(11, 14), (18, 21)];

/// Selected table and its score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableChoice {
    pub table: DiningTable,
    pub score: i32,
}

pub fn is_peak(local: DateTime<Tz>) -> bool {
    let hour = local.hour();
    PEAK_WINDOWS
        .iter()
        .any(|&(start, end)| hour >= start && hour < end)
}

/// `party <= capacity <= party + max_overflow`
pub fn fits_party(table: &DiningTable, party_size: i32, max_overflow: i32) -> bool {
    table.capacity >= party_size && table.capacity <= party_size.saturating_add(max_overflow)
}

/// AVAILABLE right now and [`fits_party`]
pub fn is_table_suitable(table: &DiningTable, party_size: i32, max_overflow: i32) -> bool {
    table.status == TableStatus::Available && fits_party(table, party_size, max_overflow)
}

pub fn efficiency_score(capacity: i32, party_size: i32, peak: bool) -> i32 {
    let waste = capacity - party_size;
    let mut score = waste.abs() * 10;
    if peak && waste > 0 {
        score += 20 * waste;
    }
    score
}

/// Lowest-scoring suitable candidate, first one on ties
pub fn find_optimal_table<'a, I>(
    candidates: I,
    party_size: i32,
    at_local: DateTime<Tz>,
    max_overflow: i32,
) -> Option<TableChoice>
where
    I: IntoIterator<Item = &'a DiningTable>,
{
    let peak = is_peak(at_local);
    let mut best: Option<(&DiningTable, i32)> = None;
    for table in candidates {
        if !is_table_suitable(table, party_size, max_overflow) {
            continue;
        }
        let score = efficiency_score(table.capacity, party_size, peak);
        // 严格小于，保证同分时先到先得
        if best.is_none_or(|(_, s)| score < s) {
            best = Some((table, score));
        }
    }
    best.map(|(table, score)| TableChoice {
        table: table.clone(),
        score,
    })
}

/// Candidates that fit the party, ordered by score (stable on ties).
///
/// Ignores the current status; callers pass tables already known to be free
/// for the slot they rank for.
pub fn rank_tables(
    candidates: Vec<DiningTable>,
    party_size: i32,
    at_local: DateTime<Tz>,
    max_overflow: i32,
) -> Vec<TableChoice> {
    let peak = is_peak(at_local);
    let mut ranked: Vec<TableChoice> = candidates
        .into_iter()
        .filter(|t| fits_party(t, party_size, max_overflow))
        .map(|table| TableChoice {
            score: efficiency_score(table.capacity, party_size, peak),
            table,
        })
        .collect();
    ranked.sort_by_key(|c| c.score);
    ranked
}
