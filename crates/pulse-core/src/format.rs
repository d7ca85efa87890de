//! Display projection of metrics. Never parsed back into engine state.

use contracts::{Metrics, MetricsDisplay};

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

pub fn currency(value: u64) -> String {
    format!("${}", group_thousands(value))
}

pub fn percent(value: f64) -> String {
    format!("{value}%")
}

pub fn metrics_display(metrics: &Metrics) -> MetricsDisplay {
    MetricsDisplay {
        active_users: group_thousands(metrics.active_users),
        revenue: currency(metrics.revenue),
        conversion_rate: percent(metrics.conversion_rate),
        total_sessions: group_thousands(metrics.total_sessions),
    }
}
