use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use study_core::{
    Assignment, AssignmentFilter, AssignmentStore, InMemoryAssignmentStore, StoreError,
    STATUS_COMPLETED, STATUS_IN_PROGRESS,
};

fn record(title: &str, course: Option<&str>, due_date: Option<i64>) -> Assignment {
    let mut assignment = Assignment::new(title);
    assignment.course = course.map(str::to_string);
    assignment.due_date = due_date;
    assignment
}

fn titles(records: &[Assignment]) -> Vec<&str> {
    records.iter().map(|record| record.title.as_str()).collect()
}

#[test]
fn save_assigns_sequential_ids_and_timestamps() {
    let store = InMemoryAssignmentStore::new();

    let first = store.save(record("a", None, Some(10))).unwrap();
    let second = store.save(record("b", None, Some(20))).unwrap();

    assert_eq!(first.id(), Some(1));
    assert_eq!(second.id(), Some(2));
    assert!(first.created_at <= first.updated_at);
    assert_eq!(store.count(), 2);
    assert_eq!(store.find_by_id(2).unwrap().title, "b");
    assert!(store.find_by_id(3).is_none());
}

#[test]
fn save_with_existing_id_replaces_and_keeps_created_at() {
    let store = InMemoryAssignmentStore::new();
    let mut saved = store.save(record("draft", None, Some(10))).unwrap();
    let created_at = saved.created_at;

    saved.title = "final".to_string();
    saved.created_at = 0;
    let replaced = store.save(saved).unwrap();

    assert_eq!(replaced.id(), Some(1));
    assert_eq!(replaced.created_at, created_at);
    assert_eq!(store.count(), 1);
    assert_eq!(store.find_by_id(1).unwrap().title, "final");
}

#[test]
fn ids_are_not_reused_after_delete() {
    let store = InMemoryAssignmentStore::new();
    store.save(record("a", None, None)).unwrap();
    store.save(record("b", None, None)).unwrap();

    assert!(store.delete(2));
    assert!(!store.delete(2));

    let next = store.save(record("c", None, None)).unwrap();
    assert_eq!(next.id(), Some(3));
    assert_eq!(store.count(), 2);
}

#[test]
fn caller_supplied_id_is_never_issued_again() {
    let store = InMemoryAssignmentStore::new();
    store
        .save(Assignment::with_id(10, "imported"))
        .unwrap();

    let next = store.save(record("fresh", None, None)).unwrap();
    assert_eq!(next.id(), Some(11));
}

#[test]
fn caller_supplied_max_id_exhausts_generation_without_overwriting() {
    let store = InMemoryAssignmentStore::new();
    let mut pinned = Assignment::with_id(u64::MAX, "pinned");
    pinned.course = Some("CS101".to_string());
    store.save(pinned).unwrap();

    assert_eq!(
        store.save(record("fresh", None, None)),
        Err(StoreError::IdSpaceExhausted)
    );
    assert_eq!(
        store.save(record("again", None, None)),
        Err(StoreError::IdSpaceExhausted)
    );
    assert_eq!(store.count(), 1);
    let kept = store.find_by_id(u64::MAX).unwrap();
    assert_eq!(kept.title, "pinned");
    assert_eq!(kept.course.as_deref(), Some("CS101"));
    assert!(store.find_by_id(0).is_none());

    // Replacing the pinned record still works, and clear frees the space.
    store.save(Assignment::with_id(u64::MAX, "renamed")).unwrap();
    assert_eq!(store.find_by_id(u64::MAX).unwrap().title, "renamed");
    store.clear();
    assert_eq!(store.save(record("restart", None, None)).unwrap().id(), Some(1));
}

#[test]
fn clear_resets_records_and_counter() {
    let store = InMemoryAssignmentStore::new();
    store.save(record("a", None, None)).unwrap();
    store.save(record("b", None, None)).unwrap();

    store.clear();
    assert_eq!(store.count(), 0);
    assert!(store.find_all().is_empty());

    let fresh = store.save(record("c", None, None)).unwrap();
    assert_eq!(fresh.id(), Some(1));
}

#[test]
fn returned_records_are_detached_copies() {
    let store = InMemoryAssignmentStore::new();
    store.save(record("original", None, None)).unwrap();

    let mut copies = store.find_all();
    copies[0].title = "mutated".to_string();
    copies.clear();

    assert_eq!(store.find_by_id(1).unwrap().title, "original");
    assert_eq!(store.count(), 1);
}

#[test]
fn update_assignment_requires_existing_id() {
    let store = InMemoryAssignmentStore::new();

    assert!(store.update_assignment(record("no id", None, None)).is_none());

    assert!(store
        .update_assignment(Assignment::with_id(99, "unknown"))
        .is_none());
    assert_eq!(store.count(), 0);

    let mut saved = store.save(record("known", None, None)).unwrap();
    saved.set_status(STATUS_IN_PROGRESS);
    let updated = store.update_assignment(saved).unwrap();
    assert_eq!(updated.status, STATUS_IN_PROGRESS);
    assert!(updated.created_at <= updated.updated_at);
    assert_eq!(store.find_by_id(1).unwrap().status, STATUS_IN_PROGRESS);
}

#[test]
fn find_by_course_and_status_match_exactly() {
    let store = InMemoryAssignmentStore::new();
    store.save(record("a", Some("CS101"), Some(1))).unwrap();
    store.save(record("b", Some("cs101"), Some(2))).unwrap();
    store.save(record("c", None, Some(3))).unwrap();
    let mut done = record("d", Some("CS101"), Some(4));
    done.status = STATUS_COMPLETED.to_string();
    store.save(done).unwrap();

    assert_eq!(titles(&store.find_by_course("CS101")), vec!["a", "d"]);
    assert_eq!(titles(&store.find_by_status(STATUS_COMPLETED)), vec!["d"]);
    assert!(store.find_by_status("Completed").is_empty());
}

#[test]
fn due_date_range_is_inclusive_and_skips_undated() {
    let store = InMemoryAssignmentStore::new();
    store.save(record("before", None, Some(99))).unwrap();
    store.save(record("start", None, Some(100))).unwrap();
    store.save(record("end", None, Some(200))).unwrap();
    store.save(record("after", None, Some(201))).unwrap();
    store.save(record("undated", None, None)).unwrap();

    assert_eq!(titles(&store.find_by_due_date_range(100, 200)), vec!["start", "end"]);
    assert!(store.find_by_due_date_range(200, 100).is_empty());
}

#[test]
fn overdue_excludes_completed_future_and_undated() {
    let store = InMemoryAssignmentStore::new();
    store.save(record("late", None, Some(50))).unwrap();
    let mut done = record("late but done", None, Some(50));
    done.status = STATUS_COMPLETED.to_string();
    store.save(done).unwrap();
    store.save(record("exactly now", None, Some(100))).unwrap();
    store.save(record("future", None, Some(150))).unwrap();
    store.save(record("undated", None, None)).unwrap();

    assert_eq!(titles(&store.find_overdue(100)), vec!["late"]);
}

#[test]
fn sorted_by_due_date_puts_undated_last_and_keeps_insertion_order_on_ties() {
    let store = InMemoryAssignmentStore::new();
    store.save(record("undated first", None, None)).unwrap();
    store.save(record("d3", None, Some(300))).unwrap();
    store.save(record("d1", None, Some(100))).unwrap();
    store.save(record("tie a", None, Some(200))).unwrap();
    store.save(record("tie b", None, Some(200))).unwrap();
    store.save(record("undated second", None, None)).unwrap();

    let sorted = store.find_all_sorted_by_due_date();
    assert_eq!(
        titles(&sorted),
        vec!["d1", "tie a", "tie b", "d3", "undated first", "undated second"]
    );
}

#[test]
fn filters_combine_as_conjunction_in_due_date_order() {
    let store = InMemoryAssignmentStore::new();
    store.save(record("cs late", Some("CS101"), Some(300))).unwrap();
    store.save(record("cs early", Some("CS101"), Some(100))).unwrap();
    store.save(record("math", Some("MATH200"), Some(150))).unwrap();
    store.save(record("cs undated", Some("CS101"), None)).unwrap();
    let mut started = record("cs started", Some("CS101"), Some(200));
    started.status = STATUS_IN_PROGRESS.to_string();
    store.save(started).unwrap();

    let by_course = store.find_with_filters(&AssignmentFilter {
        course: Some("CS101".to_string()),
        ..AssignmentFilter::default()
    });
    assert_eq!(
        titles(&by_course),
        vec!["cs early", "cs started", "cs late", "cs undated"]
    );

    let by_course_and_status = store.find_with_filters(&AssignmentFilter {
        course: Some("CS101".to_string()),
        status: Some("todo".to_string()),
        ..AssignmentFilter::default()
    });
    assert_eq!(
        titles(&by_course_and_status),
        vec!["cs early", "cs late", "cs undated"]
    );

    let by_range = store.find_with_filters(&AssignmentFilter {
        due_from: Some(150),
        due_until: Some(300),
        ..AssignmentFilter::default()
    });
    assert_eq!(titles(&by_range), vec!["math", "cs started", "cs late"]);

    let open_upper = store.find_with_filters(&AssignmentFilter {
        course: Some(String::new()),
        due_from: Some(200),
        ..AssignmentFilter::default()
    });
    assert_eq!(titles(&open_upper), vec!["cs started", "cs late"]);

    let everything = store.find_with_filters(&AssignmentFilter::default());
    assert_eq!(everything.len(), 5);
}

#[test]
fn concurrent_saves_never_duplicate_ids() {
    let store = Arc::new(InMemoryAssignmentStore::new());
    let threads: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..50)
                    .map(|n| {
                        store
                            .save(record(&format!("w{worker}-{n}"), None, Some(n)))
                            .unwrap()
                            .id()
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in threads {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "duplicate id {id}");
        }
    }

    assert_eq!(ids.len(), 400);
    assert_eq!(store.count(), 400);
    assert_eq!(ids, (1..=400).collect::<HashSet<u64>>());
}

#[test]
fn concurrent_readers_see_whole_records() {
    let store = Arc::new(InMemoryAssignmentStore::new());
    let saved = store.save(record("shared", Some("CS101"), Some(10))).unwrap();
    let id = saved.id().unwrap();

    thread::scope(|scope| {
        let writer = Arc::clone(&store);
        scope.spawn(move || {
            for n in 0..200 {
                let mut next = writer.find_by_id(id).unwrap();
                next.set_status(format!("step-{n}"));
                next.course = Some(format!("course-{n}"));
                writer.update_assignment(next).unwrap();
            }
        });

        for _ in 0..4 {
            let reader = Arc::clone(&store);
            scope.spawn(move || {
                for _ in 0..200 {
                    let current = reader.find_by_id(id).unwrap();
                    if let Some(step) = current.status.strip_prefix("step-") {
                        assert_eq!(current.course, Some(format!("course-{step}")));
                    }
                    assert_eq!(reader.find_all().len(), 1);
                }
            });
        }
    });
}
