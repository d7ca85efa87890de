use contracts::{
    ActivityEvent, ActivityKind, DashboardConfig, Metrics, SimulationMode, Snapshot, SortDirection,
    UserRecord, FEED_CAPACITY,
};
use pulse_core::feed::ActivityFeed;
use pulse_core::generator::{classify_template, generate};
use pulse_core::{drift, sorter, Dashboard, SimRng};
use proptest::prelude::*;

fn populated_snapshot() -> Snapshot {
    let mut snapshot = Snapshot::fallback();
    snapshot.users = vec![
        UserRecord::new("Sarah Wilson", "sarah@example.com", "admin", "Active"),
        UserRecord::new("John Doe", "john@example.com", "user", "Active"),
    ];
    snapshot.activity_templates = vec![
        "User {name} logged in".to_string(),
        "Payment of ${amount} received from {name}".to_string(),
        "Scheduled maintenance finished".to_string(),
    ];
    snapshot
}

fn event(sequence: u64) -> ActivityEvent {
    ActivityEvent {
        sequence,
        text: format!("event {sequence}"),
        time: "Just now".to_string(),
        kind: ActivityKind::System,
        emitted_at_ms: sequence,
    }
}

#[test]
fn fallback_initialize_shows_exactly_four_events() {
    let mut dashboard = Dashboard::new(DashboardConfig::default(), Snapshot::fallback());
    dashboard.initialize();
    dashboard.initialize();

    assert_eq!(dashboard.feed().len(), 4);
    assert_eq!(dashboard.notifications().len(), 4);
    assert_eq!(dashboard.users().len(), 0);
}

#[test]
fn template_kind_is_decided_by_text_alone() {
    assert_eq!(classify_template("Payment of ${amount} received"), ActivityKind::Payment);
    assert_eq!(classify_template("User {name} logged in"), ActivityKind::User);
    assert_eq!(classify_template("Payment from User {name}"), ActivityKind::Payment);
    assert_eq!(classify_template("Backup completed"), ActivityKind::System);
}

proptest! {
    #[test]
    fn feed_keeps_the_ten_most_recent(inserts in 0_u64..60) {
        let mut feed = ActivityFeed::new();
        for sequence in 1..=inserts {
            feed.insert(event(sequence));
        }

        let expected: Vec<u64> = (1..=inserts).rev().take(FEED_CAPACITY).collect();
        let shown: Vec<u64> = feed.iter().map(|event| event.sequence).collect();
        prop_assert_eq!(shown, expected);
        prop_assert!(feed.len() <= FEED_CAPACITY);
    }

    #[test]
    fn drift_never_goes_negative(
        seed in any::<u64>(),
        active_users in 0_u64..50,
        revenue in 0_u64..2_000,
        total_sessions in 0_u64..200,
        ticks in 1_usize..200,
    ) {
        let mut rng = SimRng::new(seed);
        let mut metrics = Metrics {
            active_users,
            revenue,
            conversion_rate: 3.24,
            total_sessions,
        };
        for _ in 0..ticks {
            let next = drift::tick(&metrics, &mut rng);
            prop_assert!(next.active_users.abs_diff(metrics.active_users) <= 10);
            prop_assert!(next.revenue.abs_diff(metrics.revenue) <= 500);
            prop_assert!(next.total_sessions.abs_diff(metrics.total_sessions) <= 50);
            prop_assert_eq!(next.conversion_rate, metrics.conversion_rate);
            metrics = next;
        }
    }

    #[test]
    fn paused_dashboard_never_inserts(seed in any::<u64>(), horizon_ms in 0_u64..600_000) {
        let config = DashboardConfig { seed, ..DashboardConfig::default() };
        let (mut dashboard, started) = Dashboard::boot(config, populated_snapshot());
        prop_assert!(started.is_ok());
        prop_assert_eq!(dashboard.pause_simulation(), SimulationMode::Paused);

        let report = dashboard.advance_to(horizon_ms).expect("clock advances");
        prop_assert_eq!(report.fires, 0);
        prop_assert_eq!(dashboard.feed().len(), 4);
        prop_assert_eq!(dashboard.status().next_fire_at_ms, None);
    }

    #[test]
    fn running_dashboard_fires_at_least_once_per_twelve_seconds(seed in any::<u64>(), windows in 1_u64..30) {
        let config = DashboardConfig { seed, ..DashboardConfig::default() };
        let (mut dashboard, started) = Dashboard::boot(config, populated_snapshot());
        prop_assert!(started.is_ok());

        let report = dashboard.advance_to(windows * 12_000).expect("clock advances");
        prop_assert!(report.fires >= windows);
        prop_assert!(report.fires <= windows * 12_000 / 8_000);
        prop_assert!(dashboard.feed().len() <= FEED_CAPACITY);
    }

    #[test]
    fn generated_kind_follows_the_template(seed in any::<u64>(), sequence in 1_u64..1_000) {
        let snapshot = populated_snapshot();
        let mut rng = SimRng::new(seed);
        let generated = generate(
            &snapshot.activity_templates,
            &snapshot.users,
            &mut rng,
            sequence,
            0,
        ).expect("pools are populated");

        let expected = if generated.text.starts_with("Payment") {
            ActivityKind::Payment
        } else if generated.text.starts_with("User") {
            ActivityKind::User
        } else {
            ActivityKind::System
        };
        prop_assert_eq!(generated.kind, expected);
        prop_assert!(
            !generated.text.contains('{'),
            "unfilled placeholder left in {:?}",
            generated.text
        );
        prop_assert_eq!(generated.time.as_str(), "Just now");
    }

    #[test]
    fn repeated_header_clicks_alternate_direction(clicks in 1_usize..12) {
        let mut users = populated_snapshot().users;
        let mut state = None;
        for click in 0..clicks {
            let applied = sorter::sort_users(&mut users, "email", &mut state);
            let expected = if click % 2 == 0 { SortDirection::Asc } else { SortDirection::Desc };
            prop_assert_eq!(applied.direction, expected);
        }
    }
}
