//! Plain-text rendering of core projections.

use chrono::NaiveDate;
use taskdeck_core::view::todo::is_overdue;
use taskdeck_core::{CalendarView, CategoryView, Task};

const WEEKDAY_HEADER: &str = " Su Mo Tu We Th Fr Sa";

pub fn print_todo(tasks: &[Task], today: NaiveDate) {
    println!("To-do ({})", tasks.len());
    for task in tasks {
        let mark = if task.completed { "x" } else { " " };
        let due = task
            .deadline
            .map(|deadline| format!(" due {deadline}"))
            .unwrap_or_default();
        let overdue = if is_overdue(task, today) {
            " OVERDUE"
        } else {
            ""
        };
        println!(
            "  [{mark}] {} ({}, {}){due}{overdue}",
            task.text,
            task.category,
            task.priority.as_str()
        );
    }
}

pub fn print_calendar(view: &CalendarView) {
    println!("{}-{:02}", view.month.year(), view.month.month());
    println!("{WEEKDAY_HEADER}");
    let mut line = String::new();
    for (index, cell) in view.cells.iter().enumerate() {
        let rendered = match cell.as_day() {
            None => "   ".to_string(),
            Some(day) if day.is_today => format!("[{:>2}", day.day),
            Some(day) if day.has_items => format!("*{:>2}", day.day),
            Some(day) => format!(" {:>2}", day.day),
        };
        line.push_str(&rendered);
        if index % 7 == 6 {
            println!("{line}");
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{line}");
    }

    println!("Upcoming ({})", view.upcoming.len());
    for item in &view.upcoming {
        if let Some(deadline) = item.deadline {
            println!("  {deadline} {} [{}]", item.text, item.category);
        }
    }
}

pub fn print_progress(view: &CategoryView) {
    println!("Progress");
    for (stats, segment) in view.per_category_stats.iter().zip(&view.donut_segments) {
        println!(
            "  {:<9}{:>3}/{:<3}{:>6.1}%  arc {:>5.1}..{:>5.1}",
            stats.category.as_str(),
            stats.completed_tasks,
            stats.total_tasks,
            stats.percentage,
            segment.start_angle,
            segment.end_angle
        );
    }
    println!("Recently completed ({})", view.recent_completed.len());
    for task in &view.recent_completed {
        if let Some(completed_at) = task.completed_at {
            println!("  {} {}", completed_at.format("%Y-%m-%d %H:%M"), task.text);
        }
    }
}
