use crate::aggregator::{derive, format_active_time};
use crate::config::StepTuning;
use crate::models::{ChartSeries, Dashboard, HistoryEntry, Snapshot};

pub fn build_snapshot(dashboard: &Dashboard, tuning: &StepTuning, version: u64) -> Snapshot {
    let steps = dashboard.counter.step_count;
    let metrics = derive(steps, dashboard.goal, tuning);
    let badges: Vec<String> = metrics.badges.iter().map(|badge| badge.label().to_string()).collect();

    Snapshot {
        version,
        step_count: steps,
        calories: format!("{:.2}", metrics.calories),
        distance_km: format!("{:.2}", metrics.distance_km),
        active_seconds: dashboard.counter.active_seconds,
        active_time: format_active_time(dashboard.counter.active_seconds),
        progress_percent: metrics.progress_percent,
        motivation: metrics.motivation.to_string(),
        badge_text: badges.join(" "),
        badges,
        goal: dashboard.goal,
        dark_mode: dashboard.dark_mode,
        history: dashboard.history.clone(),
        history_lines: dashboard.history.iter().map(history_line).collect(),
        chart: build_chart(&dashboard.history),
        panel: dashboard.panel,
        sampler: dashboard.sampler,
    }
}

pub fn history_line(entry: &HistoryEntry) -> String {
    format!("{}: {} steps", entry.date, entry.steps)
}

pub fn build_chart(history: &[HistoryEntry]) -> ChartSeries {
    ChartSeries {
        labels: history.iter().map(|entry| entry.date.clone()).collect(),
        values: history.iter().map(|entry| entry.steps).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard(steps: u64, goal: u64) -> Dashboard {
        let mut dashboard = Dashboard::with_goal(goal);
        dashboard.counter.step_count = steps;
        dashboard
    }

    #[test]
    fn snapshot_formats_metrics() {
        let mut board = dashboard(100, 1000);
        board.counter.active_seconds = 61;
        let snapshot = build_snapshot(&board, &StepTuning::default(), 3);
        assert_eq!(snapshot.version, 3);
        assert_eq!(snapshot.calories, "5.00");
        assert_eq!(snapshot.distance_km, "0.08");
        assert_eq!(snapshot.active_time, "1m 1s");
        assert_eq!(snapshot.progress_percent, 10.0);
        assert_eq!(snapshot.motivation, "");
        assert!(snapshot.badges.is_empty());
        assert_eq!(snapshot.badge_text, "");
    }

    #[test]
    fn snapshot_over_goal() {
        let snapshot = build_snapshot(&dashboard(2000, 1000), &StepTuning::default(), 0);
        assert_eq!(snapshot.progress_percent, 100.0);
        assert_eq!(snapshot.motivation, "Goal achieved!");
        assert_eq!(snapshot.badge_text, "✨ 1K Steps Badge!");
    }

    #[test]
    fn ten_thousand_steps_hold_every_badge() {
        let snapshot = build_snapshot(&dashboard(10000, 1000), &StepTuning::default(), 0);
        assert_eq!(
            snapshot.badges,
            vec!["✨ 1K Steps Badge!", "✨ 5K Steps Master!", "✨ 10K Pro Walker!"]
        );
    }

    #[test]
    fn history_feeds_list_and_chart() {
        let mut board = dashboard(0, 1000);
        board.history = vec![
            HistoryEntry { date: "2026-10-15".into(), steps: 900 },
            HistoryEntry { date: "2026-10-14".into(), steps: 12 },
        ];
        let snapshot = build_snapshot(&board, &StepTuning::default(), 0);
        assert_eq!(snapshot.history_lines, vec!["2026-10-15: 900 steps", "2026-10-14: 12 steps"]);
        assert_eq!(snapshot.chart.labels, vec!["2026-10-15", "2026-10-14"]);
        assert_eq!(snapshot.chart.values, vec![900, 12]);
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let board = dashboard(4321, 5000);
        let tuning = StepTuning::default();
        assert_eq!(build_snapshot(&board, &tuning, 1), build_snapshot(&board, &tuning, 1));
    }
}
