//! Fleet charging report CLI — config loading, report assembly, export.

use std::path::Path;
use std::process;

use ev_fleet_sim::battery::profile::{ProfileParams, simulate};
use ev_fleet_sim::config::ScenarioConfig;
use ev_fleet_sim::io::export::export_csv;
use ev_fleet_sim::report::Report;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    profile_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("ev-fleet-sim — EV fleet charging cost and profile simulator");
    eprintln!();
    eprintln!("Usage: ev-fleet-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline)");
    eprintln!("  --profile-out <path>     Export the daily charge profile to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the report");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        profile_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--profile-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --profile-out requires a path argument");
                    process::exit(1);
                }
                cli.profile_out = Some(args[i].clone());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Assemble the report
    let input = scenario.fleet_input();
    let report = match Report::from_input(
        &input,
        &scenario.tariff,
        scenario.charging.charge_efficiency,
    ) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    println!("{report}");

    // Export the charge profile if requested
    if let Some(ref path) = cli.profile_out {
        let params = ProfileParams::from_fleet(&input, &scenario.charging);
        let profile = match simulate(&params) {
            Ok(profile) => profile,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = export_csv(&profile, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Charge profile written to {path}");
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        use ev_fleet_sim::store::InMemoryReportStore;

        let state = Arc::new(ev_fleet_sim::api::AppState {
            config: scenario,
            store: Box::new(InMemoryReportStore::new()),
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(ev_fleet_sim::api::serve(state, addr));
    }
}
