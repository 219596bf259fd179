use chrono::{Days, NaiveDate};
use whatnow_core::{
    CollectionStore, Filters, FixedClock, Level, MemoryStore, Suggestion, Task, WhatNow, find_matching_tasks,
    next_due_date,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

#[test]
fn ranking_fixture_has_exact_order() {
    let tasks = vec![
        Task::new("a", "no due, skipped twice").with_counters(4, 2, 0),
        Task::new("b", "overdue").with_due_date(today().checked_sub_days(Days::new(1)).unwrap()),
        Task::new("c", "no due, fresh").with_counters(0, 0, 0),
        Task::new("d", "due in 2").with_due_date(today().checked_add_days(Days::new(2)).unwrap()),
        Task::new("e", "no due, skipped twice, shown less").with_counters(2, 2, 0),
    ];

    let out = find_matching_tasks(&Filters::default(), &tasks, today());
    let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "d", "e", "a", "c"]);
}

#[test]
fn energy_filter_asymmetry() {
    let tasks = vec![
        Task::new("hi", "needs high energy").with_energy(Level::High),
        Task::new("lo", "needs low energy").with_energy(Level::Low),
    ];

    let low = find_matching_tasks(&Filters::new(Some(Level::Low), None, None), &tasks, today());
    assert!(low.iter().all(|t| t.id != "hi"));

    let high = find_matching_tasks(&Filters::new(Some(Level::High), None, None), &tasks, today());
    assert!(high.iter().any(|t| t.id == "lo"));
}

#[test]
fn skipping_surfaces_a_task_sooner() {
    let mut svc = WhatNow::new(MemoryStore::new(), FixedClock::on(today()));
    let first = svc.add_task(Task::new("", "first")).unwrap();
    let second = svc.add_task(Task::new("", "second")).unwrap();

    svc.skip(&Suggestion::Owned(second.clone())).unwrap();

    let ranked = find_matching_tasks(&Filters::default(), &svc.tasks().unwrap(), today());
    assert_eq!(ranked[0].id, second.id);
    assert_eq!(ranked[1].id, first.id);
}

#[test]
fn next_due_date_is_stable_across_calls() {
    let t: Task = serde_json::from_str(
        r#"{"id":"t","name":"rent","time":15,"social":"low","energy":"low","dueDate":"2025-06-15","recurring":"monthly"}"#,
    )
    .unwrap();
    let a = next_due_date(&t, today());
    let b = next_due_date(&t, today());
    assert_eq!(a, b);
    assert_eq!(a.map(|d| d.to_string()).as_deref(), Some("2025-07-15"));
}

#[test]
fn malformed_imported_record_does_not_block_the_collection() {
    let mut store = MemoryStore::new();
    store
        .put_collection(
            "tasks",
            serde_json::json!([
                {"id": "ok", "name": "Tidy desk", "type": "Chores", "time": 15, "social": "low", "energy": "low"},
                {"id": "bad", "name": "Imported", "type": null, "time": null, "social": "low", "energy": "low",
                 "timesShown": null, "timesSkipped": null, "timesCompleted": null}
            ]),
        )
        .unwrap();
    let mut svc = WhatNow::new(store, FixedClock::on(today()));

    let all = svc.suggest(&Filters::default()).unwrap();
    assert_eq!(all.len(), 2);

    // Unknown time never fits a budget, so only the well-formed task is offered.
    let budgeted = svc.suggest(&Filters::new(None, None, Some(30))).unwrap();
    let ids: Vec<&str> = budgeted.iter().map(Suggestion::id).collect();
    assert_eq!(ids, vec!["ok"]);

    let bad = svc.owned("bad").unwrap().expect("record loads");
    svc.skip(&bad).unwrap();
    let report = svc.complete(&bad, None).unwrap().expect("completes");
    assert_eq!(report.completion.points, 20);
    assert_eq!(report.completion.log_entry.time_spent, None);

    let stored = svc.task("bad").unwrap().unwrap();
    assert_eq!((stored.times_shown, stored.times_skipped, stored.times_completed), (1, 1, 1));
}
