//! Chart series projected from the snapshot for the chart renderer.

use chrono::{DateTime, NaiveDate};
use contracts::{ChartKind, ChartSeries, Snapshot};

/// `YYYY-MM-DD` (or RFC 3339) as `M/D/YYYY`; anything else passes through.
pub fn date_label(raw: &str) -> String {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|at| at.date_naive()));
    match date {
        Some(date) => date.format("%-m/%-d/%Y").to_string(),
        None => raw.to_string(),
    }
}

pub fn active_users_series(snapshot: &Snapshot) -> ChartSeries {
    let points = &snapshot.active_users_time_series;
    ChartSeries {
        chart_id: "activeUsers".to_string(),
        kind: ChartKind::Line,
        label: "Active Users".to_string(),
        labels: points.iter().map(|point| date_label(&point.date)).collect(),
        values: points.iter().map(|point| point.users).collect(),
        colors: Vec::new(),
    }
}

pub fn daily_revenue_series(snapshot: &Snapshot) -> ChartSeries {
    let points = &snapshot.daily_revenue;
    ChartSeries {
        chart_id: "revenue".to_string(),
        kind: ChartKind::Bar,
        label: "Daily Revenue".to_string(),
        labels: points.iter().map(|point| date_label(&point.date)).collect(),
        values: points.iter().map(|point| point.revenue).collect(),
        colors: Vec::new(),
    }
}

pub fn user_roles_series(snapshot: &Snapshot) -> ChartSeries {
    let shares = &snapshot.user_roles;
    ChartSeries {
        chart_id: "userRoles".to_string(),
        kind: ChartKind::Doughnut,
        label: "User Roles".to_string(),
        labels: shares.iter().map(|share| share.role.clone()).collect(),
        values: shares.iter().map(|share| share.count).collect(),
        colors: shares.iter().map(|share| share.color.clone()).collect(),
    }
}

pub fn all_series(snapshot: &Snapshot) -> Vec<ChartSeries> {
    vec![
        active_users_series(snapshot),
        daily_revenue_series(snapshot),
        user_roles_series(snapshot),
    ]
}
