use chrono::NaiveDate;
use practice_tracker::{
    Difficulty, ItemType, LearningItem, LearningStatus, LearningType, Outcome, Problem,
    RevisionItem, RevisionScheduler, SchedulerError,
};
use uuid::Uuid;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn pending(next: &str) -> RevisionItem {
    RevisionItem {
        id: Uuid::new_v4(),
        user_id: "user-1".to_string(),
        item_id: Uuid::new_v4(),
        item_type: ItemType::Problem,
        subject: None,
        original_date: date("2025-01-01"),
        next_revision_date: date(next),
        revision_cycle: 1,
        is_completed: false,
        completed_date: None,
    }
}

fn completed_on(next: &str, completed: &str) -> RevisionItem {
    RevisionItem {
        is_completed: true,
        completed_date: Some(date(completed)),
        ..pending(next)
    }
}

fn problem_logged_on(day: &str) -> Problem {
    Problem {
        id: Uuid::new_v4(),
        user_id: "user-1".to_string(),
        title: "Two Sum".to_string(),
        platform: "LeetCode".to_string(),
        difficulty: Difficulty::Easy,
        topic: "Arrays".to_string(),
        subtopic: None,
        time_spent: 15,
        outcome: Outcome::Solved,
        date: date(day),
        link: None,
        tags: "hash-map".to_string(),
        approach_notes: None,
        code_link: None,
        is_revision: true,
    }
}

#[test]
fn test_interval_table_fidelity() {
    let scheduler = RevisionScheduler::new();
    let d = date("2025-02-27");

    let expected = [(1, "2025-02-28"), (2, "2025-03-02"), (3, "2025-03-06"), (4, "2025-03-14"), (5, "2025-03-29")];
    for (cycle, next) in expected {
        assert_eq!(
            scheduler.compute_next_revision_date(d, cycle).unwrap(),
            date(next),
            "cycle {} from {}",
            cycle,
            d
        );
    }

    // Cycles past the table reuse the last interval.
    assert_eq!(
        scheduler.compute_next_revision_date(d, 6).unwrap(),
        scheduler.compute_next_revision_date(d, 5).unwrap()
    );
    assert_eq!(
        scheduler.compute_next_revision_date(d, 42).unwrap(),
        date("2025-03-29")
    );
}

#[test]
fn test_cycle_zero_is_rejected() {
    let scheduler = RevisionScheduler::new();
    assert_eq!(
        scheduler.compute_next_revision_date(date("2025-01-10"), 0),
        Err(SchedulerError::InvalidCycle(0))
    );
}

#[test]
fn test_out_of_range_date_is_reported() {
    let scheduler = RevisionScheduler::new();
    assert!(matches!(
        scheduler.compute_next_revision_date(NaiveDate::MAX, 1),
        Err(SchedulerError::DateOutOfRange { days: 1, .. })
    ));
}

#[test]
fn test_creation_invariant() {
    let scheduler = RevisionScheduler::new();
    let problem = problem_logged_on("2025-01-10");

    let item = scheduler.create_revision_item(&problem).unwrap();
    assert_eq!(item.revision_cycle, 1);
    assert!(!item.is_completed);
    assert_eq!(item.completed_date, None);
    assert_eq!(item.original_date, date("2025-01-10"));
    assert_eq!(item.next_revision_date, date("2025-01-11"));
    assert_eq!(item.item_id, problem.id);
    assert_eq!(item.item_type, ItemType::Problem);
    assert_eq!(item.user_id, "user-1");
}

#[test]
fn test_creation_from_learning_item() {
    let scheduler = RevisionScheduler::new();
    let learning = LearningItem {
        id: Uuid::new_v4(),
        user_id: "user-2".to_string(),
        title: "Designing Data-Intensive Applications".to_string(),
        kind: LearningType::Book,
        category: "System Design".to_string(),
        subtopic: None,
        time_spent: 90,
        progress: 40,
        status: LearningStatus::InProgress,
        date: date("2025-01-10"),
        link: None,
        tags: String::new(),
        notes: None,
        resource_link: None,
        is_revision: true,
        difficulty: None,
        platform: None,
    };

    let item = scheduler.create_revision_item(&learning).unwrap();
    assert_eq!(item.item_type, ItemType::Learning);
    assert_eq!(item.next_revision_date, date("2025-01-11"));
    assert_eq!(item.user_id, "user-2");
}

#[test]
fn test_completion_reschedules_from_completion_date() {
    let scheduler = RevisionScheduler::new();
    let item = RevisionItem {
        original_date: date("2024-11-03"),
        revision_cycle: 2,
        ..pending("2025-05-20")
    };

    let done = scheduler.complete_revision_item(&item, date("2025-06-01")).unwrap();
    assert_eq!(done.revision_cycle, 3);
    assert_eq!(done.next_revision_date, date("2025-06-08"));
    assert!(done.is_completed);
    assert_eq!(done.completed_date, Some(date("2025-06-01")));
    assert_eq!(done.original_date, item.original_date);
    assert_eq!(done.id, item.id);

    // The input record is untouched.
    assert_eq!(item.revision_cycle, 2);
    assert!(!item.is_completed);
}

#[test]
fn test_due_filter_excludes_completed_items() {
    let scheduler = RevisionScheduler::new();
    let open = pending("2025-03-01");
    let items = vec![completed_on("2025-03-01", "2025-02-28"), open.clone(), pending("2025-03-02")];

    let due = scheduler.select_due_items(&items, date("2025-03-01"));
    assert_eq!(due, vec![open]);
}

#[test]
fn test_sparse_agenda() {
    let scheduler = RevisionScheduler::new();
    let items = vec![
        pending("2025-04-02"),
        pending("2025-04-07"),
        pending("2025-04-07"),
        completed_on("2025-04-05", "2025-04-01"),
        pending("2025-04-20"),
    ];

    let agenda = scheduler.build_agenda(&items, date("2025-04-01"), date("2025-04-10"));
    assert_eq!(agenda.len(), 2);

    assert_eq!(agenda[0].date, date("2025-04-02"));
    assert_eq!(agenda[0].total_items, 1);
    assert_eq!(agenda[1].date, date("2025-04-07"));
    assert_eq!(agenda[1].total_items, 2);
    assert_eq!(agenda[1].items.len(), 2);
}

#[test]
fn test_agenda_completed_count_stays_zero() {
    // Only pending items are ever due, so the per-day completed count is
    // always 0. Completion history lives in the revision event log.
    let scheduler = RevisionScheduler::new();
    let items = vec![pending("2025-04-02"), completed_on("2025-04-02", "2025-04-02")];

    let agenda = scheduler.build_agenda(&items, date("2025-04-01"), date("2025-04-03"));
    assert_eq!(agenda.len(), 1);
    assert_eq!(agenda[0].total_items, 1);
    assert_eq!(agenda[0].completed_items, 0);
}

#[test]
fn test_agenda_spanning_whole_calendar_stays_sparse() {
    let scheduler = RevisionScheduler::new();
    let items = vec![
        pending("0001-01-01"),
        pending("2025-04-07"),
        completed_on("2025-04-08", "2025-04-01"),
        pending("2025-04-07"),
        pending("9999-12-31"),
    ];

    let agenda = scheduler.build_agenda(&items, NaiveDate::MIN, NaiveDate::MAX);
    let days: Vec<NaiveDate> = agenda.iter().map(|entry| entry.date).collect();
    assert_eq!(days, vec![date("0001-01-01"), date("2025-04-07"), date("9999-12-31")]);
    assert_eq!(agenda[1].items, vec![items[1].clone(), items[3].clone()]);

    // Bounds are inclusive on both ends.
    let agenda = scheduler.build_agenda(&items, date("2025-04-07"), date("2025-04-07"));
    assert_eq!(agenda.len(), 1);
    assert_eq!(agenda[0].total_items, 2);
}

#[test]
fn test_agenda_with_inverted_range_is_empty() {
    let scheduler = RevisionScheduler::new();
    let items = vec![pending("2025-04-02")];

    assert!(scheduler.build_agenda(&items, date("2025-04-10"), date("2025-04-01")).is_empty());
    assert!(scheduler.build_agenda(&[], date("2025-04-01"), date("2025-04-10")).is_empty());
}

#[test]
fn test_streak_over_consecutive_days() {
    let scheduler = RevisionScheduler::new();
    let items = vec![
        completed_on("2025-01-10", "2025-01-01"),
        completed_on("2025-01-11", "2025-01-02"),
        completed_on("2025-01-12", "2025-01-03"),
    ];

    let stats = scheduler.compute_stats(&items, date("2025-01-04"));
    assert_eq!(stats.current_streak, 3);
}

#[test]
fn test_streak_breaks_on_gap() {
    let scheduler = RevisionScheduler::new();
    let items = vec![
        completed_on("2025-01-10", "2025-01-01"),
        completed_on("2025-01-12", "2025-01-03"),
    ];

    let stats = scheduler.compute_stats(&items, date("2025-01-04"));
    assert_eq!(stats.current_streak, 1);
}

#[test]
fn test_streak_expires_after_a_missed_day() {
    let scheduler = RevisionScheduler::new();
    let items = vec![
        completed_on("2025-01-10", "2025-01-01"),
        completed_on("2025-01-11", "2025-01-02"),
    ];

    assert_eq!(scheduler.compute_stats(&items, date("2025-01-02")).current_streak, 2);
    assert_eq!(scheduler.compute_stats(&items, date("2025-01-05")).current_streak, 0);
}

#[test]
fn test_streak_counts_days_not_completions() {
    let scheduler = RevisionScheduler::new();
    let items = vec![
        completed_on("2025-01-10", "2025-01-02"),
        completed_on("2025-01-11", "2025-01-02"),
        completed_on("2025-01-12", "2025-01-03"),
    ];

    assert_eq!(
        scheduler.compute_stats(&items, date("2025-01-03")).current_streak,
        2,
        "two completions on 01-02 count as one streak day; a walk over raw completions would stop at the repeated day and give 1"
    );
}

#[test]
fn test_stats_buckets() {
    let scheduler = RevisionScheduler::new();
    let today = date("2025-03-10");
    let items = vec![
        pending("2025-03-08"),
        pending("2025-03-10"),
        pending("2025-03-15"),
        completed_on("2025-03-20", "2025-03-09"),
    ];

    let stats = scheduler.compute_stats(&items, today);
    assert_eq!(stats.total_revisions, 4);
    assert_eq!(stats.completed_revisions, 1);
    assert_eq!(stats.upcoming_revisions, 2);
    assert_eq!(stats.overdue_revisions, 1);
    assert_eq!(stats.current_streak, 1);

    let empty = scheduler.compute_stats(&[], today);
    assert_eq!(empty, Default::default());
}

#[test]
fn test_pure_computations_are_repeatable() {
    let scheduler = RevisionScheduler::new();
    let items = vec![
        pending("2025-03-08"),
        completed_on("2025-03-20", "2025-03-09"),
        completed_on("2025-03-21", "2025-03-10"),
    ];
    let snapshot = items.clone();
    let today = date("2025-03-10");

    assert_eq!(scheduler.compute_stats(&items, today), scheduler.compute_stats(&items, today));
    assert_eq!(
        scheduler.compute_next_revision_date(today, 4),
        scheduler.compute_next_revision_date(today, 4)
    );
    assert_eq!(items, snapshot);
}
