mod common;

use chrono::Duration;
use common::{arb_tasks, completed, created, event, task, texts, ymd};
use proptest::prelude::*;
use taskdeck_core::view::calendar::YearMonth;
use taskdeck_core::view::progress::{
    category_stats, donut_segments, recent_completed, CategoryStats, DEFAULT_RECENT_LIMIT,
};
use taskdeck_core::view::todo::is_overdue;
use taskdeck_core::{derive_category_view, Category};

fn stats_for(stats: &[CategoryStats], category: Category) -> &CategoryStats {
    stats
        .iter()
        .find(|entry| entry.category == category)
        .unwrap()
}

#[test]
fn mixed_work_tasks_report_half_complete() {
    let today = ymd(2024, 2, 15);
    let a = task("A", Category::Work, 0, Some(ymd(2024, 3, 1)));
    let b = completed(task("B", Category::Work, 1, Some(ymd(2024, 2, 1))), created(60));

    assert!(!is_overdue(&a, today));
    assert!(!is_overdue(&b, today));

    let stats = category_stats(&[a, b]);
    let work = stats_for(&stats, Category::Work);
    assert_eq!(work.completed_tasks, 1);
    assert_eq!(work.total_tasks, 2);
    assert_eq!(work.percentage, 50.0);
    assert_eq!(work.color, "#ff4444");
}

#[test]
fn stats_cover_tracked_categories_in_order_and_skip_events() {
    let tasks = vec![
        event("meetup", 0, ymd(2024, 3, 1)),
        task("read", Category::Study, 1, None),
    ];
    let stats = category_stats(&tasks);

    let order: Vec<Category> = stats.iter().map(|entry| entry.category).collect();
    assert_eq!(order, Category::TRACKED.to_vec());
    assert_eq!(stats_for(&stats, Category::Study).total_tasks, 1);
    assert_eq!(stats_for(&stats, Category::Work).percentage, 0.0);
}

#[test]
fn empty_list_yields_zero_stats_and_zero_spans() {
    let view = derive_category_view(&[]);

    assert!(view
        .per_category_stats
        .iter()
        .all(|entry| entry.percentage == 0.0 && entry.total_tasks == 0));
    assert!(view
        .donut_segments
        .iter()
        .all(|segment| segment.span == 0.0 && !segment.large_arc));
    assert!(view.recent_completed.is_empty());
}

#[test]
fn donut_segments_accumulate_and_flag_large_arcs() {
    let tasks = vec![
        completed(task("w1", Category::Work, 0, None), created(10)),
        completed(task("p1", Category::Personal, 1, None), created(11)),
        task("p2", Category::Personal, 2, None),
        task("s1", Category::Study, 3, None),
    ];
    let stats = category_stats(&tasks);
    let segments = donut_segments(&stats);

    // Work 100%, Personal 50%, Study 0% of a 150 total.
    assert_eq!(segments.len(), 3);
    assert!((segments[0].span - 240.0).abs() < 1e-9);
    assert!(segments[0].large_arc);
    assert_eq!(segments[1].start_angle, segments[0].end_angle);
    assert!((segments[1].span - 120.0).abs() < 1e-9);
    assert!(!segments[1].large_arc);
    assert_eq!(segments[2].span, 0.0);
    assert!((segments[2].end_angle - 360.0).abs() < 1e-9);
}

#[test]
fn recent_completed_is_newest_first_and_limited() {
    let mut tasks = Vec::new();
    for index in 0..7 {
        let item = task(&format!("done-{index}"), Category::Work, index, None);
        tasks.push(completed(item, created(100 + index)));
    }
    tasks.push(task("open", Category::Work, 50, None));

    let recent = recent_completed(&tasks, DEFAULT_RECENT_LIMIT);
    assert_eq!(
        texts(&recent),
        vec!["done-6", "done-5", "done-4", "done-3", "done-2"]
    );
    assert!(recent_completed(&tasks, 0).is_empty());
    assert_eq!(recent_completed(&tasks, 20).len(), 7);
}

#[test]
fn category_view_serializes_stats_and_segments() {
    let tasks = vec![completed(task("w", Category::Work, 0, None), created(1))];
    let value = serde_json::to_value(derive_category_view(&tasks)).unwrap();

    assert_eq!(value["per_category_stats"][0]["category"], "Work");
    assert_eq!(value["per_category_stats"][0]["percentage"], 100.0);
    assert_eq!(value["donut_segments"][0]["span"], 360.0);
    assert_eq!(value["recent_completed"][0]["text"], "w");
}

#[test]
fn events_in_the_selected_month_do_not_change_progress() {
    let month = YearMonth::new(2024, 3).unwrap();
    let date = ymd(2024, 3, 3);
    assert!(month.contains(date));

    let base = vec![task("t", Category::Work, 0, None)];
    let mut with_event = base.clone();
    with_event.push(event("show", 1, date));
    assert_eq!(category_stats(&base), category_stats(&with_event));
}

proptest! {
    #[test]
    fn percentages_stay_in_range_and_spans_close_the_circle(tasks in arb_tasks()) {
        let stats = category_stats(&tasks);
        for entry in &stats {
            prop_assert!((0.0..=100.0).contains(&entry.percentage));
            prop_assert!(entry.completed_tasks <= entry.total_tasks);
        }

        let segments = donut_segments(&stats);
        let total_span: f64 = segments.iter().map(|segment| segment.span).sum();
        if stats.iter().any(|entry| entry.percentage > 0.0) {
            prop_assert!((total_span - 360.0).abs() < 1e-6);
        } else {
            prop_assert_eq!(total_span, 0.0);
        }
    }

    #[test]
    fn recent_completed_respects_limit_and_order(tasks in arb_tasks(), limit in 0usize..10) {
        let recent = recent_completed(&tasks, limit);
        let done = tasks.iter().filter(|task| task.completed).count();
        prop_assert_eq!(recent.len(), done.min(limit));
        prop_assert!(recent.iter().all(|task| task.completed));
        prop_assert!(recent
            .windows(2)
            .all(|pair| pair[0].completed_at >= pair[1].completed_at));
    }
}

#[test]
fn one_day_completion_gap_orders_recent_list() {
    let earlier = completed(task("earlier", Category::Study, 0, None), created(0));
    let later = completed(
        task("later", Category::Study, 1, None),
        created(0) + Duration::days(1),
    );
    let recent = recent_completed(&[earlier, later], DEFAULT_RECENT_LIMIT);
    assert_eq!(texts(&recent), vec!["later", "earlier"]);
}
