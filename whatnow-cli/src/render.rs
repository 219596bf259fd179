use chrono::NaiveDate;
use whatnow_core::scoring::{get_next_rank, get_rank, rank_progress, task_comparison, time_comparison};
use whatnow_core::{CompletedEntry, CompletionReport, DueStatus, Stats, Suggestion, Task, Template, due_status};

pub fn due_label(task: &Task, today: NaiveDate) -> Option<String> {
    Some(match due_status(task, today)? {
        DueStatus::Overdue(1) => "overdue by 1 day".to_string(),
        DueStatus::Overdue(d) => format!("overdue by {d} days"),
        DueStatus::DueToday => "due today".to_string(),
        DueStatus::DueTomorrow => "due tomorrow".to_string(),
        DueStatus::DueIn(d) => format!("due in {d} days"),
    })
}

/// `15m`, or `?m` when the time cost is unknown.
pub fn minutes(time: Option<u32>) -> String {
    time.map_or_else(|| "?m".to_string(), |m| format!("{m}m"))
}

fn level(l: Option<whatnow_core::Level>) -> &'static str {
    l.map(|l| l.as_str()).unwrap_or("-")
}

pub fn task_line(task: &Task, today: NaiveDate) -> String {
    let mut line = format!(
        "{} | {} | {} social={} energy={}",
        task.id,
        task.name,
        minutes(task.time),
        level(task.social),
        level(task.energy)
    );
    if !task.kind.is_empty() {
        line.push_str(&format!(" [{}]", task.kind));
    }
    if task.recurring.is_recurring() {
        line.push_str(&format!(" ({:?})", task.recurring).to_lowercase());
    }
    if let Some(due) = due_label(task, today) {
        line.push_str(&format!(" - {due}"));
    }
    line
}

pub fn suggestion_line(s: &Suggestion, today: NaiveDate) -> String {
    match s {
        Suggestion::Owned(t) => task_line(t, today),
        Suggestion::Fallback(t) => format!(
            "(built-in) {} | {} social={} energy={}  -> whatnow accept --fallback \"{}\"",
            t.name,
            minutes(t.time),
            level(t.social),
            level(t.energy),
            t.name
        ),
    }
}

pub fn template_line(tpl: &Template) -> String {
    let mut line = format!(
        "{} | {} | {} social={} energy={}",
        tpl.id,
        tpl.name,
        minutes(tpl.time),
        level(tpl.social),
        level(tpl.energy)
    );
    if !tpl.kind.is_empty() {
        line.push_str(&format!(" [{}]", tpl.kind));
    }
    line
}

/// `[#####-----] 50%`
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent.min(100) as usize * width) / 100;
    format!("[{}{}] {}%", "#".repeat(filled), "-".repeat(width - filled), percent.min(100))
}

pub fn stats_lines(stats: &Stats, overdue: usize) -> Vec<String> {
    let rank = get_rank(stats.total_points);
    let mut out = vec![format!("Rank: {} ({} points)", rank.name, stats.total_points)];

    match (get_next_rank(stats.total_points), rank_progress(stats.total_points)) {
        (Some(next), Some(pct)) => out.push(format!(
            "Next: {} at {} points {}",
            next.name,
            next.min_points,
            progress_bar(pct, 20)
        )),
        _ => out.push("Max rank reached.".to_string()),
    }

    out.push(format!("Completed: {}  Skipped: {}", stats.completed, stats.skipped));
    out.push(format!(
        "Time spent: {}h {}m",
        stats.total_time_spent / 60,
        stats.total_time_spent % 60
    ));
    if let Some(m) = time_comparison(stats.total_time_spent) {
        out.push(format!("  That's {}.", m.text));
    }
    if let Some(m) = task_comparison(stats.completed) {
        out.push(format!("  {} tasks: {}.", stats.completed, m.text));
    }
    if overdue > 0 {
        out.push(format!("Overdue tasks: {overdue}"));
    }
    out
}

pub fn completion_lines(report: &CompletionReport) -> Vec<String> {
    let c = &report.completion;
    let mut out = vec![format!("Done: {} (+{} points)", c.log_entry.name, c.points)];
    if let Some(t) = c.outcome.updated() {
        if let Some(due) = t.due_date {
            out.push(format!("Next due {due}"));
        }
    }
    if report.leveled_up() {
        out.push(format!("Rank up! You are now {}.", report.rank.name));
    }
    out
}

pub fn history_line(e: &CompletedEntry) -> String {
    let spent = e.time_spent.map(|m| format!("{m}m")).unwrap_or_else(|| "-".to_string());
    format!(
        "{} | {} | +{} | {}",
        e.completed_at.format("%Y-%m-%d %H:%M"),
        e.name,
        e.points,
        spent
    )
}
