//! Per-day reduction of message analyses and call logs

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{CallRecord, CallStatus, DailyCallSummary, DailySummary, Direction, Message, MessageAnalysis};

/// Minimum number of silent days reported as a gap
pub const MIN_GAP_DAYS: i64 = 3;

#[derive(Debug, Default)]
struct DayAccumulator {
    msg_count: u32,
    sentiment_total: f64,
    hurtful_count: u32,
    labels: BTreeSet<String>,
}

impl DayAccumulator {
    fn add(&mut self, analysis: Option<&MessageAnalysis>) {
        self.msg_count += 1;
        let Some(analysis) = analysis else { return };
        self.sentiment_total += analysis.sentiment_score;
        if analysis.is_hurtful {
            self.hurtful_count += 1;
        }
        self.labels.extend(analysis.patterns.iter().cloned());
    }

    fn finish(self, case_id: i64, date: NaiveDate) -> DailySummary {
        let avg_sentiment = if self.msg_count == 0 {
            0.0
        } else {
            self.sentiment_total / f64::from(self.msg_count)
        };
        DailySummary {
            case_id,
            date,
            msg_count: self.msg_count,
            avg_sentiment,
            hurtful_count: self.hurtful_count,
            #[allow(clippy::cast_possible_truncation)]
            patterns_count: self.labels.len() as u32,
        }
    }
}

/// Reduce analyses into one summary per calendar date, ordered by date.
///
/// Analyses are joined to messages by id; a message without an analysis
/// still counts toward `msg_count` as neutral and not hurtful.
#[must_use]
pub fn aggregate(messages: &[Message], analyses: &[MessageAnalysis]) -> Vec<DailySummary> {
    let by_id: HashMap<i64, &MessageAnalysis> =
        analyses.iter().map(|a| (a.message_id, a)).collect();

    let mut days: BTreeMap<(NaiveDate, i64), DayAccumulator> = BTreeMap::new();
    for message in messages {
        days.entry((message.date, message.case_id))
            .or_default()
            .add(by_id.get(&message.id).copied());
    }

    days.into_iter()
        .map(|((date, case_id), acc)| acc.finish(case_id, date))
        .collect()
}

/// Merge summaries produced by independent date partitions.
///
/// Partitions cover disjoint dates, so this is a union sorted by date.
#[must_use]
pub fn merge_disjoint(parts: Vec<Vec<DailySummary>>) -> Vec<DailySummary> {
    let mut merged: Vec<DailySummary> = parts.into_iter().flatten().collect();
    merged.sort_by_key(|s| (s.date, s.case_id));
    merged
}

/// Count calls per day
#[must_use]
pub fn summarize_calls(calls: &[CallRecord]) -> Vec<DailyCallSummary> {
    let mut days: BTreeMap<NaiveDate, DailyCallSummary> = BTreeMap::new();
    for call in calls {
        let day = days.entry(call.date).or_insert_with(|| DailyCallSummary {
            date: call.date,
            ..DailyCallSummary::default()
        });
        match call.status {
            CallStatus::Missed | CallStatus::Declined => day.missed += 1,
            CallStatus::Answered => match call.direction {
                Direction::Sent => day.outgoing += 1,
                Direction::Received => day.incoming += 1,
            },
        }
        day.total_seconds += call.duration.max(0);
    }
    days.into_values().collect()
}

/// A run of days with no contact at all
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationGap {
    /// First silent day
    pub start: NaiveDate,
    /// Last silent day
    pub end: NaiveDate,
    /// Number of silent days
    pub days: i64,
    /// The last day with contact before the gap had hurtful messages
    pub after_conflict: bool,
}

/// Find silences of at least [`MIN_GAP_DAYS`] between days with contact.
///
/// A day has contact when it has messages or calls. Gaps are sorted longest
/// first; ties keep chronological order.
#[must_use]
pub fn find_gaps(summaries: &[DailySummary], calls: &[DailyCallSummary]) -> Vec<CommunicationGap> {
    let mut contact: BTreeMap<NaiveDate, bool> = BTreeMap::new();
    for summary in summaries.iter().filter(|s| s.msg_count > 0) {
        *contact.entry(summary.date).or_default() |= summary.hurtful_count > 0;
    }
    for call in calls {
        contact.entry(call.date).or_default();
    }

    let dates: Vec<(NaiveDate, bool)> = contact.into_iter().collect();
    let mut gaps: Vec<CommunicationGap> = dates
        .windows(2)
        .filter_map(|pair| {
            let (before, heated) = pair[0];
            let (after, _) = pair[1];
            let days = (after - before).num_days() - 1;
            (days >= MIN_GAP_DAYS).then(|| CommunicationGap {
                start: before + Duration::days(1),
                end: after - Duration::days(1),
                days,
                after_conflict: heated,
            })
        })
        .collect();

    gaps.sort_by(|a, b| b.days.cmp(&a.days));
    gaps
}
