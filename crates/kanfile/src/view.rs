//! Rendering helpers for board output.

use std::borrow::Cow;

use anyhow::Result;
use kanfile_core::stats::BoardStats;
use kanfile_core::view::{is_due_soon, is_overdue};
use kanfile_core::{Status, Task};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

const TITLE_WIDTH: usize = 48;
const SHORT_ID_WIDTH: usize = 8;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub(crate) fn truncate_with_ellipsis(input: &str, max_graphemes: usize) -> Cow<'_, str> {
    const ELLIPSIS: &str = "…";

    if max_graphemes == 0 {
        return Cow::Owned(String::new());
    }

    let grapheme_count = UnicodeSegmentation::graphemes(input, true).count();
    if grapheme_count <= max_graphemes {
        return Cow::Borrowed(input);
    }

    let mut truncated: String = UnicodeSegmentation::graphemes(input, true)
        .take(max_graphemes - 1)
        .collect();
    truncated.push_str(ELLIPSIS);
    Cow::Owned(truncated)
}

pub(crate) const fn status_marker(status: Status) -> &'static str {
    match status {
        Status::Todo => "□",
        Status::InProgress => "→",
        Status::Done => "✓",
    }
}

fn short_id(task: &Task) -> Cow<'_, str> {
    truncate_with_ellipsis(task.id.as_str(), SHORT_ID_WIDTH)
}

fn due_note(task: &Task, due_soon_days: i64, now: OffsetDateTime) -> Result<String> {
    let Some(due) = task.due_date else {
        return Ok(String::new());
    };
    let date = due.format(DATE_FORMAT)?;
    if is_overdue(task, now) {
        Ok(format!("  overdue {date}"))
    } else if is_due_soon(task, due_soon_days, now) {
        Ok(format!("  due soon {date}"))
    } else {
        Ok(format!("  due {date}"))
    }
}

/// Render the filtered board grouped by column.
pub(crate) fn render_board(
    tasks: &[&Task],
    due_soon_days: i64,
    now: OffsetDateTime,
) -> Result<String> {
    let mut out = String::new();
    for status in Status::COLUMNS {
        let bucket: Vec<&&Task> = tasks.iter().filter(|task| task.status == status).collect();
        out.push_str(&format!("{} ({})\n", status.display_name(), bucket.len()));
        for task in bucket {
            out.push_str(&format!(
                "  {} {} {:<width$} {}{}\n",
                status_marker(task.status),
                short_id(task),
                truncate_with_ellipsis(&task.title, TITLE_WIDTH),
                task.priority.emoji(),
                due_note(task, due_soon_days, now)?,
                width = TITLE_WIDTH,
            ));
        }
        out.push('\n');
    }
    Ok(out)
}

/// Render one task in full.
pub(crate) fn render_detail(task: &Task, due_soon_days: i64, now: OffsetDateTime) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", status_marker(task.status), task.title));
    out.push_str(&format!("id:        {}\n", task.id));
    out.push_str(&format!("status:    {}\n", task.status.display_name()));
    out.push_str(&format!(
        "priority:  {} {}\n",
        task.priority.emoji(),
        task.priority.display_name()
    ));
    out.push_str(&format!("created:   {}\n", task.created_at.format(DATE_FORMAT)?));
    if let Some(due) = task.due_date {
        let qualifier = if is_overdue(task, now) {
            " (overdue)"
        } else if is_due_soon(task, due_soon_days, now) {
            " (due soon)"
        } else {
            ""
        };
        out.push_str(&format!("due:       {}{qualifier}\n", due.format(DATE_FORMAT)?));
    }
    if !task.tags.is_empty() {
        let tags: Vec<&str> = task.tags.iter().map(String::as_str).collect();
        out.push_str(&format!("tags:      {}\n", tags.join(", ")));
    }
    if let Some(description) = &task.description {
        out.push('\n');
        out.push_str(description);
        out.push('\n');
    }
    Ok(out)
}

/// Render aggregate statistics as aligned rows.
pub(crate) fn render_stats(stats: &BoardStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("total:            {}\n", stats.total));
    out.push_str(&format!(
        "columns:          {} todo / {} in progress / {} done\n",
        stats.todo, stats.in_progress, stats.done
    ));
    out.push_str(&format!(
        "priorities:       {} high / {} medium / {} low\n",
        stats.high_priority, stats.medium_priority, stats.low_priority
    ));
    out.push_str(&format!("overdue:          {}\n", stats.overdue));
    out.push_str(&format!("due soon:         {}\n", stats.due_soon));
    out.push_str(&format!("completion rate:  {:.1}%\n", stats.completion_rate));
    out.push_str(&format!(
        "avg completion:   {:.1} day(s)\n",
        stats.avg_completion_days
    ));
    out
}
