use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    ItemType, LearningItem, Problem, RevisionAgenda, RevisionItem, RevisionStats,
};

/// Days until the next review, indexed by revision cycle (1-based).
/// Cycles past the end of the table keep using the last interval.
pub const REVISION_INTERVALS: [u32; 5] = [1, 3, 7, 15, 30];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("invalid calendar date: '{0}'")]
    InvalidDate(String),

    #[error("invalid revision cycle {0}: cycles start at 1")]
    InvalidCycle(u32),

    #[error("date {date} plus {days} days is out of range")]
    DateOutOfRange { date: NaiveDate, days: u32 },
}

/// Anything that can be put on the revision schedule.
pub trait RevisionSource {
    fn source_id(&self) -> Uuid;
    fn owner_id(&self) -> &str;
    fn logged_date(&self) -> NaiveDate;
    fn item_type(&self) -> ItemType;
}

impl RevisionSource for Problem {
    fn source_id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn logged_date(&self) -> NaiveDate {
        self.date
    }

    fn item_type(&self) -> ItemType {
        ItemType::Problem
    }
}

impl RevisionSource for LearningItem {
    fn source_id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn logged_date(&self) -> NaiveDate {
        self.date
    }

    fn item_type(&self) -> ItemType {
        ItemType::Learning
    }
}

/// Fixed-interval spaced repetition over in-memory revision items.
///
/// Every method is pure: inputs are never mutated and "today" is always
/// passed in by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct RevisionScheduler;

impl RevisionScheduler {
    pub fn new() -> Self {
        Self
    }

    pub fn interval_for_cycle(&self, cycle: u32) -> Result<u32, SchedulerError> {
        if cycle < 1 {
            return Err(SchedulerError::InvalidCycle(cycle));
        }

        let index = (cycle as usize - 1).min(REVISION_INTERVALS.len() - 1);
        Ok(REVISION_INTERVALS[index])
    }

    pub fn compute_next_revision_date(
        &self,
        reference_date: NaiveDate,
        cycle: u32,
    ) -> Result<NaiveDate, SchedulerError> {
        let days = self.interval_for_cycle(cycle)?;

        reference_date
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or(SchedulerError::DateOutOfRange {
                date: reference_date,
                days,
            })
    }

    /// Build the first-cycle revision record for a source item. The caller
    /// persists it.
    pub fn create_revision_item<S: RevisionSource>(
        &self,
        source: &S,
    ) -> Result<RevisionItem, SchedulerError> {
        let original_date = source.logged_date();
        let next_revision_date = self.compute_next_revision_date(original_date, 1)?;

        Ok(RevisionItem {
            id: Uuid::new_v4(),
            user_id: source.owner_id().to_string(),
            item_id: source.source_id(),
            item_type: source.item_type(),
            subject: None,
            original_date,
            next_revision_date,
            revision_cycle: 1,
            is_completed: false,
            completed_date: None,
        })
    }

    /// Pending items due exactly on `target_date`, in input order.
    pub fn select_due_items(&self, items: &[RevisionItem], target_date: NaiveDate) -> Vec<RevisionItem> {
        items
            .iter()
            .filter(|item| item.next_revision_date == target_date && !item.is_completed)
            .cloned()
            .collect()
    }

    /// Sparse agenda: one entry per day in `[start_date, end_date]` that has
    /// at least one due item. Items keep their input order within a day.
    pub fn build_agenda(
        &self,
        items: &[RevisionItem],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Vec<RevisionAgenda> {
        let mut by_day: BTreeMap<NaiveDate, Vec<RevisionItem>> = BTreeMap::new();
        for item in items.iter().filter(|item| !item.is_completed) {
            if (start_date..=end_date).contains(&item.next_revision_date) {
                by_day.entry(item.next_revision_date).or_default().push(item.clone());
            }
        }

        by_day
            .into_iter()
            .map(|(day, due)| {
                // Due items are pending by construction, so this stays 0.
                let completed_items = due.iter().filter(|item| item.is_completed).count();
                RevisionAgenda {
                    date: day,
                    total_items: due.len(),
                    completed_items,
                    items: due,
                }
            })
            .collect()
    }

    /// Mark a review done on `today` and schedule the next cycle from `today`.
    ///
    /// There is no guard against completing the same item twice; every call
    /// advances the cycle again.
    pub fn complete_revision_item(
        &self,
        item: &RevisionItem,
        today: NaiveDate,
    ) -> Result<RevisionItem, SchedulerError> {
        let next_cycle = item.revision_cycle.saturating_add(1).max(1);
        let next_revision_date = self.compute_next_revision_date(today, next_cycle)?;

        Ok(RevisionItem {
            is_completed: true,
            completed_date: Some(today),
            revision_cycle: next_cycle,
            next_revision_date,
            ..item.clone()
        })
    }

    pub fn compute_stats(&self, items: &[RevisionItem], today: NaiveDate) -> RevisionStats {
        let completed_revisions = items.iter().filter(|item| item.is_completed).count();
        let upcoming_revisions = items
            .iter()
            .filter(|item| !item.is_completed && item.next_revision_date >= today)
            .count();
        let overdue_revisions = items
            .iter()
            .filter(|item| !item.is_completed && item.next_revision_date < today)
            .count();

        RevisionStats {
            total_revisions: items.len(),
            completed_revisions,
            upcoming_revisions,
            overdue_revisions,
            current_streak: self.current_streak(items, today),
        }
    }

    /// Consecutive days with a completion, ending today or yesterday.
    /// Several completions on one day count once.
    fn current_streak(&self, items: &[RevisionItem], today: NaiveDate) -> u32 {
        let mut days: Vec<NaiveDate> = items
            .iter()
            .filter(|item| item.is_completed)
            .filter_map(|item| item.completed_date)
            .collect();
        days.sort_unstable();
        days.dedup();

        let Some(&last) = days.last() else {
            return 0;
        };
        if (today - last).num_days() > 1 {
            return 0;
        }

        let mut streak = 1;
        let mut newer = last;
        for &day in days.iter().rev().skip(1) {
            if (newer - day).num_days() != 1 {
                break;
            }
            streak += 1;
            newer = day;
        }

        streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn pending(due: &str) -> RevisionItem {
        RevisionItem {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            item_id: Uuid::new_v4(),
            item_type: ItemType::Problem,
            subject: None,
            original_date: date("2025-01-01"),
            next_revision_date: date(due),
            revision_cycle: 1,
            is_completed: false,
            completed_date: None,
        }
    }

    fn completed_on(day: &str) -> RevisionItem {
        RevisionItem {
            is_completed: true,
            completed_date: Some(date(day)),
            revision_cycle: 2,
            ..pending("2030-01-01")
        }
    }

    #[test]
    fn test_interval_lookup() {
        let scheduler = RevisionScheduler::new();
        let expected = [(1, 1), (2, 3), (3, 7), (4, 15), (5, 30), (6, 30), (42, 30)];

        for (cycle, days) in expected {
            assert_eq!(scheduler.interval_for_cycle(cycle).unwrap(), days, "cycle {}", cycle);
        }
    }

    #[test]
    fn test_cycle_zero_is_rejected() {
        let scheduler = RevisionScheduler::new();
        assert_eq!(scheduler.interval_for_cycle(0), Err(SchedulerError::InvalidCycle(0)));
        assert!(scheduler.compute_next_revision_date(date("2025-01-01"), 0).is_err());
    }

    #[test]
    fn test_next_date_crosses_month_and_leap_day() {
        let scheduler = RevisionScheduler::new();
        assert_eq!(
            scheduler.compute_next_revision_date(date("2024-02-28"), 1).unwrap(),
            date("2024-02-29")
        );
        assert_eq!(
            scheduler.compute_next_revision_date(date("2025-12-20"), 4).unwrap(),
            date("2026-01-04")
        );
    }

    #[test]
    fn test_next_date_overflow() {
        let scheduler = RevisionScheduler::new();
        let result = scheduler.compute_next_revision_date(NaiveDate::MAX, 1);
        assert!(matches!(result, Err(SchedulerError::DateOutOfRange { days: 1, .. })));
    }

    #[test]
    fn test_same_day_completions_count_once() {
        let scheduler = RevisionScheduler::new();
        let items = vec![
            completed_on("2025-01-02"),
            completed_on("2025-01-03"),
            completed_on("2025-01-03"),
        ];

        assert_eq!(scheduler.current_streak(&items, date("2025-01-03")), 2);
    }

    #[test]
    fn test_streak_expired() {
        let scheduler = RevisionScheduler::new();
        let items = vec![completed_on("2025-01-01"), completed_on("2025-01-02")];

        assert_eq!(scheduler.current_streak(&items, date("2025-01-03")), 2);
        assert_eq!(scheduler.current_streak(&items, date("2025-01-04")), 0);
    }

    #[test]
    fn test_completed_without_date_ignored_by_streak() {
        let scheduler = RevisionScheduler::new();
        let mut undated = completed_on("2025-01-01");
        undated.completed_date = None;

        assert_eq!(scheduler.current_streak(&[undated], date("2025-01-01")), 0);
    }

    #[test]
    fn test_stats_on_empty_collection() {
        let scheduler = RevisionScheduler::new();
        assert_eq!(scheduler.compute_stats(&[], date("2025-01-01")), RevisionStats::default());
    }

    #[test]
    fn test_agenda_single_day_range() {
        let scheduler = RevisionScheduler::new();
        let items = vec![pending("2025-05-05")];

        let agenda = scheduler.build_agenda(&items, date("2025-05-05"), date("2025-05-05"));
        assert_eq!(agenda.len(), 1);
        assert_eq!(agenda[0].total_items, 1);
    }
}
