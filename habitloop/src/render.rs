//! Text rendering of the stats snapshot.

use habitloop_core::format::{format_day, format_rate};
use habitloop_core::refresh::StatsReport;
use habitloop_core::stats::ChartSeries;
use habitloop_core::types::StatsFilter;

const BAR_WIDTH: usize = 30;

pub fn print_report(report: &StatsReport, filter: &StatsFilter) {
    let snapshot = &report.snapshot;

    println!(
        "Stats for {} .. {}",
        format_day(snapshot.window.0),
        format_day(snapshot.window.1)
    );
    if let Some(frequency) = filter.frequency {
        println!("  frequency: {frequency}");
    }
    if let Some(tags) = &filter.tags {
        println!("  tags: {}", tags.join(", "));
    }
    println!();

    println!(
        "  {} habits: {} completed, {} pending, {} missed ({} done)",
        snapshot.total,
        snapshot.completed,
        snapshot.pending,
        snapshot.not_completed,
        format_rate(snapshot.completion_rate)
    );
    println!("  longest streak: {} days", snapshot.longest_streak);
    match snapshot.best_day {
        Some(best) => println!(
            "  best day:  {} ({})",
            format_day(best.day),
            format_rate(best.rate)
        ),
        None => println!("  best day:  none yet"),
    }
    if let Some(worst) = snapshot.worst_day {
        println!(
            "  worst day: {} ({})",
            format_day(worst.day),
            format_rate(worst.rate)
        );
    }
    println!();

    let breakdowns: Vec<_> = snapshot
        .per_frequency
        .iter()
        .filter(|b| b.habits > 0)
        .collect();
    if !breakdowns.is_empty() {
        println!("By frequency:");
        for b in breakdowns {
            println!(
                "  {:<8} {:>2} habits, {}/{} occurrences ({})",
                b.frequency.to_string(),
                b.habits,
                b.observed,
                b.expected,
                format_rate(b.rate)
            );
        }
        println!();
    }

    if snapshot.activity.iter().any(|d| d.total > 0) {
        println!("Daily activity:");
        for entry in &snapshot.activity {
            println!(
                "  {}  {} {:>2}/{}",
                format_day(entry.day),
                bar(entry.rate as f64, 100.0),
                entry.completed,
                entry.total
            );
        }
        println!();
    }

    print_series("By weekday (completions)", &snapshot.weekday_chart);
    print_series("Habits per frequency", &snapshot.frequency_totals);
    print_series("Completion rate per frequency", &snapshot.frequency_rates);

    if let Some(server) = &report.server {
        println!(
            "Server rollup: {} habits, {} completed, {} pending, {} missed",
            server.total, server.completed, server.pending, server.not_completed
        );
        if server.total != snapshot.total || server.completed != snapshot.completed {
            println!("  (differs from the local snapshot; windows may not match)");
        }
    }
}

/// Print a labeled bar per series entry, scaled to the series maximum.
fn print_series(title: &str, series: &ChartSeries) {
    if series.values.iter().all(|v| *v == 0.0) {
        return;
    }
    let max = series.values.iter().cloned().fold(0.0_f64, f64::max);

    println!("{title}:");
    for (label, value) in series.labels.iter().zip(&series.values) {
        println!("  {:<8} {} {:.0}", label, bar(*value, max), value);
    }
    println!();
}

fn bar(value: f64, max: f64) -> String {
    let filled = if max > 0.0 {
        ((value / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0.0, 10.0), ".".repeat(BAR_WIDTH));
        assert_eq!(bar(10.0, 10.0), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(5.0, 0.0), ".".repeat(BAR_WIDTH));
        let half = bar(5.0, 10.0);
        assert_eq!(half.matches('#').count(), BAR_WIDTH / 2);
    }
}
