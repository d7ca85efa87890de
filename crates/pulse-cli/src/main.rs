use std::env;
use std::net::SocketAddr;

use contracts::DashboardConfig;
use pulse_api::{serve, DashboardApi};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SNAPSHOT_PATH_ENV: &str = "PULSEBOARD_SNAPSHOT_PATH";
const SESSION_PATH_ENV: &str = "PULSEBOARD_SESSION_PATH";
const SEED_ENV: &str = "PULSEBOARD_SEED";

fn print_usage() {
    println!("pulse-cli [--config <path>] <command>");
    println!("commands:");
    println!("  status");
    println!("  serve [addr]");
    println!("    default addr: 127.0.0.1:8080");
    println!("  simulate <seed> <duration_ms> [snapshot_path]");
    println!("    runs the dashboard on a virtual clock and prints every update as a JSON line");
    println!("  sort <key> [key...]");
    println!("    applies column header clicks in order and prints the user table");
    println!("environment: {SNAPSHOT_PATH_ENV}, {SESSION_PATH_ENV}, {SEED_ENV}, RUST_LOG");
}

fn parse_u64(value: Option<&String>, label: &str) -> Result<u64, String> {
    let raw = value.ok_or_else(|| format!("missing {label}"))?;
    raw.trim()
        .parse::<u64>()
        .map_err(|_| format!("invalid {label}: {raw}"))
}

fn parse_socket_addr(value: Option<&String>) -> Result<SocketAddr, String> {
    let raw = value.map(String::as_str).unwrap_or("127.0.0.1:8080");
    raw.parse::<SocketAddr>()
        .map_err(|_| format!("invalid addr: {raw}"))
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Splits a leading `--config <path>` off the argument list.
fn split_config_flag(args: &[String]) -> Result<(Option<String>, Vec<String>), String> {
    let mut rest = Vec::with_capacity(args.len());
    let mut config_path = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter
                .next()
                .ok_or_else(|| "missing path after --config".to_string())?;
            config_path = Some(path.clone());
        } else {
            rest.push(arg.clone());
        }
    }
    Ok((config_path, rest))
}

fn load_config(path: Option<&str>) -> Result<DashboardConfig, String> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|err| format!("failed to read config {path}: {err}"))?;
            serde_json::from_str::<DashboardConfig>(&raw)
                .map_err(|err| format!("invalid config {path}: {err}"))?
        }
        None => DashboardConfig::default(),
    };

    if let Some(path) = non_empty_env(SNAPSHOT_PATH_ENV) {
        config.snapshot_path = Some(path);
    }
    if let Some(path) = non_empty_env(SESSION_PATH_ENV) {
        config.session_path = Some(path);
    }
    if let Some(seed) = non_empty_env(SEED_ENV) {
        config.seed = parse_u64(Some(&seed), SEED_ENV)?;
    }
    if config.min_fire_delay_ms > config.max_fire_delay_ms {
        return Err(format!(
            "min_fire_delay_ms={} exceeds max_fire_delay_ms={}",
            config.min_fire_delay_ms, config.max_fire_delay_ms
        ));
    }

    Ok(config)
}

fn run_simulation(args: &[String], mut config: DashboardConfig) -> Result<(), String> {
    config.seed = parse_u64(args.get(1), "seed")?;
    let duration_ms = parse_u64(args.get(2), "duration_ms")?;
    if let Some(path) = args.get(3).filter(|path| !path.trim().is_empty()) {
        config.snapshot_path = Some(path.clone());
    }

    let mut api = DashboardApi::from_config(config);
    if let Some(err) = api.startup_error() {
        tracing::warn!(error = %err, "simulation will not fire");
    }

    let report = api
        .advance_to(duration_ms)
        .map_err(|err| format!("simulation failed: {}", err.message))?;
    for update in api.drain_updates() {
        let line = serde_json::to_string(&update)
            .map_err(|err| format!("failed to encode update: {err}"))?;
        println!("{line}");
    }

    tracing::info!(
        fires = report.fires,
        notification_transitions = report.notification_transitions,
        status = %api.status(),
        "simulation finished"
    );
    Ok(())
}

fn run_sort(args: &[String], config: DashboardConfig) -> Result<(), String> {
    let keys = &args[1..];
    if keys.is_empty() {
        return Err("missing sort key".to_string());
    }

    let mut api = DashboardApi::from_config(config);
    for key in keys {
        api.sort_users(key).map_err(|err| err.message)?;
    }

    let (users, sort) = api.users();
    let output = serde_json::json!({ "sort": sort, "users": users });
    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|err| format!("failed to encode users: {err}"))?;
    println!("{rendered}");
    Ok(())
}

fn exit_with_usage(err: &str) -> ! {
    eprintln!("error: {err}");
    print_usage();
    std::process::exit(2);
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let raw_args: Vec<String> = env::args().skip(1).collect();
    let (config_path, args) = match split_config_flag(&raw_args) {
        Ok(split) => split,
        Err(err) => exit_with_usage(&err),
    };
    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => exit_with_usage(&err),
    };

    match args.first().map(String::as_str) {
        Some("status") => {
            let api = DashboardApi::from_config(config);
            println!("{}", api.status());
            if let Some(err) = api.startup_error() {
                println!("simulation unavailable: {err}");
            }
        }
        Some("serve") => match parse_socket_addr(args.get(1)) {
            Ok(addr) => {
                println!("serving api on http://{addr}");
                if let Err(err) = serve(addr, config).await {
                    eprintln!("server error: {err}");
                    std::process::exit(1);
                }
            }
            Err(err) => exit_with_usage(&err),
        },
        Some("simulate") => {
            if let Err(err) = run_simulation(&args, config) {
                exit_with_usage(&err);
            }
        }
        Some("sort") => {
            if let Err(err) = run_sort(&args, config) {
                exit_with_usage(&err);
            }
        }
        _ => {
            print_usage();
        }
    }
}
