use tokio_stream::StreamExt;

use super::*;
use crate::test_support::{course, sample_courses};

fn seq_nos(courses: &[Course]) -> Vec<i64> {
    courses.iter().map(|course| course.seq_no).collect()
}

fn load_into(store: &CoursesStore, courses: Vec<Course>) {
    let ticket = store.begin_load();
    assert!(store.complete(ticket, Ok(Arc::new(courses))));
    assert!(store.finish_load(ticket));
}

#[test]
fn starts_pending_with_no_views() {
    let store = CoursesStore::new();
    assert_eq!(store.snapshot().collection, Collection::Pending);
    assert!(store.courses().is_none());
    assert!(store.courses_in(Category::Beginner).is_none());
}

#[test]
fn category_views_partition_the_collection_and_are_sorted() {
    let store = CoursesStore::new();
    let courses = sample_courses();
    load_into(&store, courses.clone());

    let beginner = store
        .courses_in(Category::Beginner)
        .expect("loaded")
        .expect("ok");
    let advanced = store
        .courses_in(Category::Advanced)
        .expect("loaded")
        .expect("ok");

    assert_eq!(seq_nos(&beginner), vec![1, 2, 3]);
    assert_eq!(seq_nos(&advanced), vec![1, 2]);
    assert!(beginner.iter().all(|c| c.category == Category::Beginner));
    assert!(advanced.iter().all(|c| c.category == Category::Advanced));
    assert!(beginner.iter().chain(advanced.iter()).all(|c| courses.contains(c)));
    assert_eq!(beginner.len() + advanced.len(), courses.len());
}

#[tokio::test]
async fn by_category_recomputes_after_replacement() {
    let store = CoursesStore::new();
    let mut beginner = store.by_category(Category::Beginner);

    load_into(&store, vec![course("a", Category::Beginner, 5)]);
    let first = beginner.next().await.expect("item").expect("ok");
    assert_eq!(seq_nos(&first), vec![5]);

    load_into(&store, vec![
        course("b", Category::Beginner, 9),
        course("c", Category::Beginner, 4),
        course("d", Category::Advanced, 1),
    ]);
    let second = beginner.next().await.expect("item").expect("ok");
    assert_eq!(seq_nos(&second), vec![4, 9]);
}

#[tokio::test]
async fn late_subscribers_get_the_current_view() {
    let store = CoursesStore::new();
    load_into(&store, sample_courses());

    let mut advanced = store.by_category(Category::Advanced);
    let view = advanced.next().await.expect("item").expect("ok");
    assert_eq!(seq_nos(&view), vec![1, 2]);
}

#[tokio::test]
async fn failed_load_is_visible_to_views() {
    let store = CoursesStore::new();
    let ticket = store.begin_load();
    assert!(store.complete(ticket, Err(NetworkError::http(500, "boom"))));

    let mut beginner = store.by_category(Category::Beginner);
    let err = beginner.next().await.expect("item").expect_err("failed");
    assert_eq!(err.status, Some(500));
    assert!(store.courses().is_none());
}

#[test]
fn stale_ticket_cannot_overwrite_newer_load() {
    let store = CoursesStore::new();
    let older = store.begin_load();
    let newer = store.begin_load();
    assert_eq!(store.loads_in_flight(), 2);

    assert!(store.complete(newer, Ok(Arc::new(vec![course("new", Category::Beginner, 1)]))));
    assert!(store.is_superseded(older));
    assert!(!store.is_superseded(newer));
    assert!(!store.complete(older, Ok(Arc::new(vec![course("old", Category::Beginner, 1)]))));

    let held = store.courses().expect("loaded");
    assert_eq!(held[0].id.as_str(), "new");
    assert_eq!(store.snapshot().generation, newer.generation());
}

#[test]
fn older_ticket_publishes_until_a_newer_one_does() {
    let store = CoursesStore::new();
    let older = store.begin_load();
    let newer = store.begin_load();

    assert!(store.complete(older, Ok(Arc::new(vec![course("old", Category::Beginner, 1)]))));
    assert!(store.complete(newer, Ok(Arc::new(vec![course("new", Category::Beginner, 1)]))));
    assert_eq!(store.courses().expect("loaded")[0].id.as_str(), "new");
}

#[test]
fn abandoned_newer_ticket_does_not_strand_the_older_load() {
    let store = CoursesStore::new();
    let older = store.begin_load();
    let newer = store.begin_load();

    assert!(!store.finish_load(newer));
    assert!(store.complete(older, Ok(Arc::new(sample_courses()))));
    assert!(store.finish_load(older));

    assert_eq!(store.courses().expect("loaded").len(), 5);
    assert_eq!(store.loads_in_flight(), 0);
}

#[test]
fn filter_by_category_on_empty_input() {
    assert!(filter_by_category(&[], Category::Advanced).is_empty());
}
