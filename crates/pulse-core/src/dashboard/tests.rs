use super::*;
use contracts::{NotificationKind, NotificationPhase, SortDirection};

fn sample_snapshot() -> Snapshot {
    let mut snapshot = Snapshot::fallback();
    snapshot.users = vec![
        UserRecord::new("Sarah Wilson", "sarah@example.com", "admin", "Active"),
        UserRecord::new("john doe", "john@example.com", "user", "Active"),
        UserRecord::new("Mike Johnson", "mike@example.com", "user", "Inactive"),
    ];
    snapshot.activity_templates = vec![
        "User {name} logged in".to_string(),
        "Payment of ${amount} received from {name}".to_string(),
        "Report generated for {role} team".to_string(),
    ];
    snapshot
}

fn feed_texts(dashboard: &Dashboard) -> Vec<String> {
    dashboard.feed().iter().map(|event| event.text.clone()).collect()
}

#[test]
fn initialize_with_fallback_shows_seed_activity_newest_first() {
    let mut dashboard = Dashboard::new(DashboardConfig::default(), Snapshot::fallback());
    dashboard.initialize();

    assert_eq!(
        feed_texts(&dashboard),
        vec![
            "User Mike Johnson updated their profile",
            "Payment of $1,250 received from John Doe",
            "New user Sarah Wilson registered",
            "System backup completed successfully",
        ]
    );
    let times: Vec<&str> = dashboard.feed().iter().map(|event| event.time.as_str()).collect();
    assert_eq!(times, vec!["12 minutes ago", "8 minutes ago", "5 minutes ago", "2 minutes ago"]);

    let kinds: Vec<NotificationKind> = dashboard.notifications().iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NotificationKind::Info,
            NotificationKind::Success,
            NotificationKind::Warning,
            NotificationKind::Success,
        ]
    );

    dashboard.initialize();
    assert_eq!(dashboard.feed().len(), 4, "initialize must not seed twice");
}

#[test]
fn empty_pools_surface_at_boot_and_keep_simulation_paused() {
    let (mut dashboard, started) = Dashboard::boot(DashboardConfig::default(), Snapshot::fallback());

    assert_eq!(
        started,
        Err(DashboardError::Precondition(PreconditionViolation::EmptyTemplatePool))
    );
    assert_eq!(dashboard.mode(), SimulationMode::Paused);
    assert_eq!(dashboard.status().next_fire_at_ms, None);

    let report = dashboard.advance_to(120_000).expect("clock advances");
    assert_eq!(report.fires, 0);
    assert_eq!(dashboard.feed().len(), 4);
    assert!(dashboard.toggle_simulation().is_err());
}

#[test]
fn running_simulation_fires_within_twelve_seconds() {
    let (mut dashboard, started) = Dashboard::boot(DashboardConfig::default(), sample_snapshot());
    started.expect("pools are populated");
    assert_eq!(dashboard.mode(), SimulationMode::Running);

    let next = dashboard.status().next_fire_at_ms.expect("armed");
    assert!((8_000..12_000).contains(&next));

    let report = dashboard.advance_to(12_000).expect("advance");
    assert_eq!(report.fires, 1);
    assert_eq!(dashboard.feed().len(), 5);
    let latest = dashboard.feed().latest().expect("feed has events");
    assert_eq!(latest.time, "Just now");
    assert_eq!(latest.emitted_at_ms, next);
}

#[test]
fn paused_simulation_inserts_nothing_until_resumed() {
    let (mut dashboard, started) = Dashboard::boot(DashboardConfig::default(), sample_snapshot());
    started.expect("pools are populated");

    assert_eq!(dashboard.toggle_simulation(), Ok(SimulationMode::Paused));
    dashboard.advance_to(600_000).expect("advance");
    assert_eq!(dashboard.feed().len(), 4);
    assert_eq!(dashboard.status().fired, 0);

    assert_eq!(dashboard.toggle_simulation(), Ok(SimulationMode::Running));
    let armed = dashboard.status().next_fire_at_ms.expect("re-armed on resume");
    assert!(armed >= 608_000 && armed < 612_000);

    dashboard.advance_by(12_000).expect("advance");
    assert!(dashboard.feed().len() >= 5);
}

#[test]
fn long_run_keeps_feed_bounded_and_metrics_non_negative() {
    let mut snapshot = sample_snapshot();
    snapshot.metrics.active_users = 3;
    snapshot.metrics.revenue = 10;
    snapshot.metrics.total_sessions = 0;
    let (mut dashboard, started) = Dashboard::boot(DashboardConfig::default(), snapshot);
    started.expect("pools are populated");

    let report = dashboard.advance_to(3_600_000).expect("advance an hour");
    assert!(report.fires >= 300, "an hour holds at least 300 fires, got {}", report.fires);
    assert_eq!(dashboard.feed().len(), contracts::FEED_CAPACITY);

    let sequences: Vec<u64> = dashboard.feed().iter().map(|event| event.sequence).collect();
    let mut expected = sequences.clone();
    expected.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(sequences, expected, "feed must be most-recent-first");
    assert_eq!(sequences[0], 4 + report.fires);

    assert_eq!(dashboard.metrics().conversion_rate, 3.24);
    assert_eq!(dashboard.status().fired, report.fires);
}

#[test]
fn notifications_expire_on_the_virtual_clock() {
    let (mut dashboard, started) = Dashboard::boot(DashboardConfig::default(), sample_snapshot());
    started.expect("pools are populated");
    dashboard.pause_simulation();

    dashboard.advance_to(100).expect("advance");
    assert!(dashboard
        .notifications()
        .iter()
        .all(|n| n.phase == NotificationPhase::Visible));

    dashboard.advance_to(5_000).expect("advance");
    assert!(dashboard
        .notifications()
        .iter()
        .all(|n| n.phase == NotificationPhase::Leaving));

    dashboard.advance_to(5_300).expect("advance");
    assert!(dashboard.notifications().is_empty());
}

#[test]
fn dismiss_removes_once() {
    let mut dashboard = Dashboard::new(DashboardConfig::default(), sample_snapshot());
    dashboard.initialize();
    let id = dashboard.notifications()[0].id;

    assert!(dashboard.dismiss_notification(id));
    assert!(!dashboard.dismiss_notification(id));
    assert_eq!(dashboard.notifications().len(), 3);
}

#[test]
fn clock_never_rewinds() {
    let mut dashboard = Dashboard::new(DashboardConfig::default(), sample_snapshot());
    dashboard.advance_to(1_000).expect("advance");
    assert_eq!(
        dashboard.advance_to(999),
        Err(DashboardError::ClockRewind {
            now_ms: 1_000,
            requested_ms: 999
        })
    );
}

#[test]
fn sorting_by_name_toggles_direction() {
    let mut dashboard = Dashboard::new(DashboardConfig::default(), sample_snapshot());
    let names = |dashboard: &Dashboard| -> Vec<String> {
        dashboard
            .users()
            .iter()
            .filter_map(|user| user.name.clone())
            .collect()
    };

    assert_eq!(dashboard.sort_users("name").direction, SortDirection::Asc);
    assert_eq!(names(&dashboard), vec!["john doe", "Mike Johnson", "Sarah Wilson"]);

    assert_eq!(dashboard.sort_users("name").direction, SortDirection::Desc);
    assert_eq!(names(&dashboard), vec!["Sarah Wilson", "Mike Johnson", "john doe"]);

    assert_eq!(dashboard.sort_users("name").direction, SortDirection::Asc);
    assert_eq!(names(&dashboard), vec!["john doe", "Mike Johnson", "Sarah Wilson"]);
}

#[test]
fn updates_describe_each_fire_in_order() {
    let (mut dashboard, started) = Dashboard::boot(DashboardConfig::default(), sample_snapshot());
    started.expect("pools are populated");
    dashboard.drain_updates();
    let fire_at = dashboard.status().next_fire_at_ms.expect("armed");

    dashboard.advance_to(12_000).expect("advance");
    let updates = dashboard.drain_updates();
    let types: Vec<&str> = updates
        .iter()
        .filter(|update| update.at_ms == fire_at)
        .map(|update| update.change.message_type())
        .collect();
    assert_eq!(types, vec!["activity.appended", "notification.shown", "metrics.updated"]);

    let sequences: Vec<u64> = updates.iter().map(|update| update.sequence).collect();
    assert!(sequences.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(dashboard.drain_updates().is_empty());
}

#[test]
fn same_seed_replays_same_feed() {
    let run = |seed: u64| {
        let config = DashboardConfig {
            seed,
            ..DashboardConfig::default()
        };
        let (mut dashboard, started) = Dashboard::boot(config, sample_snapshot());
        started.expect("pools are populated");
        dashboard.advance_to(200_000).expect("advance");
        (feed_texts(&dashboard), *dashboard.metrics())
    };

    assert_eq!(run(42), run(42));
}
