//! Per-category completion statistics and donut chart geometry.
//!
//! # Invariants
//! - `percentage` is within `[0, 100]` and exactly `0.0` for empty categories.
//! - Segment spans sum to 360 degrees whenever the percentage sum is positive,
//!   and are all zero otherwise.

use crate::model::task::{Category, Task};
use serde::Serialize;

/// Number of completed items shown by default in the recent list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

const FULL_CIRCLE_DEGREES: f64 = 360.0;
// Divisor used when every percentage is zero.
const EMPTY_PERCENTAGE_SUM: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: Category,
    pub color: &'static str,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub percentage: f64,
}

/// Stats for each tracked category, in [`Category::TRACKED`] order.
pub fn category_stats(tasks: &[Task]) -> Vec<CategoryStats> {
    Category::TRACKED
        .iter()
        .map(|&category| {
            let (completed_tasks, total_tasks) = tasks
                .iter()
                .filter(|task| task.category == category)
                .fold((0, 0), |(completed, total), task| {
                    (completed + usize::from(task.completed), total + 1)
                });
            let percentage = if total_tasks == 0 {
                0.0
            } else {
                completed_tasks as f64 / total_tasks as f64 * 100.0
            };
            CategoryStats {
                category,
                color: category.color(),
                completed_tasks,
                total_tasks,
                percentage,
            }
        })
        .collect()
}

/// Completed items, most recently completed first, at most `limit`.
pub fn recent_completed(tasks: &[Task], limit: usize) -> Vec<Task> {
    let mut completed: Vec<Task> = tasks.iter().filter(|task| task.completed).cloned().collect();
    completed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    completed.truncate(limit);
    completed
}

/// One arc of the donut chart, in degrees clockwise from the chart origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSegment {
    pub category: Category,
    pub color: &'static str,
    pub start_angle: f64,
    pub end_angle: f64,
    pub span: f64,
    /// SVG `large-arc-flag`.
    pub large_arc: bool,
}

pub fn donut_segments(stats: &[CategoryStats]) -> Vec<DonutSegment> {
    let sum: f64 = stats.iter().map(|entry| entry.percentage).sum();
    let divisor = if sum > 0.0 { sum } else { EMPTY_PERCENTAGE_SUM };

    let mut start_angle = 0.0;
    stats
        .iter()
        .map(|entry| {
            let span = entry.percentage / divisor * FULL_CIRCLE_DEGREES;
            let segment = DonutSegment {
                category: entry.category,
                color: entry.color,
                start_angle,
                end_angle: start_angle + span,
                span,
                large_arc: span > 180.0,
            };
            start_angle += span;
            segment
        })
        .collect()
}

/// Progress page projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    pub per_category_stats: Vec<CategoryStats>,
    pub donut_segments: Vec<DonutSegment>,
    pub recent_completed: Vec<Task>,
}

pub fn derive_category_view(tasks: &[Task]) -> CategoryView {
    derive_category_view_with_limit(tasks, DEFAULT_RECENT_LIMIT)
}

pub fn derive_category_view_with_limit(tasks: &[Task], recent_limit: usize) -> CategoryView {
    let per_category_stats = category_stats(tasks);
    let donut_segments = donut_segments(&per_category_stats);
    CategoryView {
        per_category_stats,
        donut_segments,
        recent_completed: recent_completed(tasks, recent_limit),
    }
}
