//! Bounded random walk applied to the headline metrics on every fire.

use contracts::Metrics;

use crate::rng::RandomSource;

pub const ACTIVE_USERS_SPAN: u64 = 20;
pub const REVENUE_SPAN: u64 = 1_000;
pub const SESSIONS_SPAN: u64 = 100;

fn drift_value(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta as u64)
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}

/// Returns drifted metrics. Draw order: active users, revenue, sessions.
/// Conversion rate never drifts.
pub fn tick(current: &Metrics, rng: &mut impl RandomSource) -> Metrics {
    let users_delta = rng.centred_delta(ACTIVE_USERS_SPAN);
    let revenue_delta = rng.centred_delta(REVENUE_SPAN);
    let sessions_delta = rng.centred_delta(SESSIONS_SPAN);

    Metrics {
        active_users: drift_value(current.active_users, users_delta),
        revenue: drift_value(current.revenue, revenue_delta),
        conversion_rate: current.conversion_rate,
        total_sessions: drift_value(current.total_sessions, sessions_delta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;

    fn metrics(active_users: u64, revenue: u64, total_sessions: u64) -> Metrics {
        Metrics {
            active_users,
            revenue,
            conversion_rate: 3.24,
            total_sessions,
        }
    }

    #[test]
    fn lowest_draw_subtracts_half_span() {
        let mut rng = ScriptedRandom::new(vec![0.0]);
        let next = tick(&metrics(100, 1_000, 100), &mut rng);
        assert_eq!(next, metrics(90, 500, 50));
    }

    #[test]
    fn highest_draw_adds_half_span_minus_one() {
        let mut rng = ScriptedRandom::new(vec![0.999_999]);
        let next = tick(&metrics(100, 1_000, 100), &mut rng);
        assert_eq!(next, metrics(109, 1_499, 149));
    }

    #[test]
    fn clamps_at_zero() {
        let mut rng = ScriptedRandom::new(vec![0.0]);
        let next = tick(&metrics(3, 10, 0), &mut rng);
        assert_eq!(next, metrics(0, 0, 0));
    }

    #[test]
    fn conversion_rate_is_untouched() {
        let mut rng = ScriptedRandom::new(vec![0.3, 0.7, 0.1]);
        let mut current = metrics(5, 5, 5);
        current.conversion_rate = 9.75;
        assert_eq!(tick(&current, &mut rng).conversion_rate, 9.75);
    }
}
