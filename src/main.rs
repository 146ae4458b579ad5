//! Retrofit estimator entry point. CLI wiring, parameter loading, and
//! result printing.

use std::path::Path;
use std::process;

use retrofit_sim::config::ReferenceData;
use retrofit_sim::engine::evaluate;
use retrofit_sim::io::export::{export_scenarios_csv, export_series_csv};
use retrofit_sim::params::HouseholdParameters;
use retrofit_sim::series::simulate_year;

/// Parsed CLI arguments.
struct CliArgs {
    params_path: Option<String>,
    preset: Option<String>,
    reference_path: Option<String>,
    csv_out: Option<String>,
    series_out: Option<String>,
    series_scenario: usize,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("retrofit-sim — Household energy retrofit scenario estimator");
    eprintln!();
    eprintln!("Usage: retrofit-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --params <path>           Load household parameters from TOML file");
    eprintln!("  --preset <name>           Use a built-in preset (starter, family)");
    eprintln!("  --reference <path>        Load reference data from TOML file");
    eprintln!("  --csv-out <path>          Export the scenario comparison to CSV");
    eprintln!("  --series-out <path>       Export a monthly series to CSV");
    eprintln!("  --series-scenario <0-2>   Scenario for the series export (default: 0)");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                   Start REST API server after evaluation");
        eprintln!("  --port <u16>              API server port (default: 3000)");
    }
    eprintln!("  --help                    Show this help message");
    eprintln!();
    eprintln!("If no --params or --preset is given, the starter preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        params_path: None,
        preset: None,
        reference_path: None,
        csv_out: None,
        series_out: None,
        series_scenario: 0,
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
            "--params" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --params requires a path argument");
                    process::exit(1);
                }
                cli.params_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--reference" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --reference requires a path argument");
                    process::exit(1);
                }
                cli.reference_path = Some(args[i].clone());
            }
            "--csv-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --csv-out requires a path argument");
                    process::exit(1);
                }
                cli.csv_out = Some(args[i].clone());
            }
            "--series-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --series-out requires a path argument");
                    process::exit(1);
                }
                cli.series_out = Some(args[i].clone());
            }
            "--series-scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --series-scenario requires an index argument");
                    process::exit(1);
                }
                match args[i].parse::<usize>() {
                    Ok(n) if n < 3 => cli.series_scenario = n,
                    _ => {
                        eprintln!(
                            "error: --series-scenario value \"{}\" is not 0, 1, or 2",
                            args[i]
                        );
                        process::exit(1);
                    }
                }
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

    // Load parameters: --params takes priority, then --preset, then starter
    let params = if let Some(ref path) = cli.params_path {
        match HouseholdParameters::from_toml_file(Path::new(path)) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match HouseholdParameters::from_preset(name) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        HouseholdParameters::starter()
    };

    // Load reference data; a bad file blocks everything
    let reference = if let Some(ref path) = cli.reference_path {
        match ReferenceData::from_toml_file(Path::new(path)) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ReferenceData::default()
    };
    let reference_errors = reference.validate();
    if !reference_errors.is_empty() {
        for e in &reference_errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Evaluate; invalid input blocks with field-specific messages
    let evaluation = match evaluate(&params, &reference) {
        Ok(eval) => eval,
        Err(errors) => {
            for e in &errors {
                eprintln!("{e}");
            }
            process::exit(1);
        }
    };

    for scenario in &evaluation.scenarios {
        println!("{scenario}");
        println!();
    }
    for warning in &evaluation.warnings {
        eprintln!("{warning}");
    }

    if let Some(ref path) = cli.csv_out {
        if let Err(e) = export_scenarios_csv(&evaluation.scenarios, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Scenario comparison written to {path}");
    }

    if let Some(ref path) = cli.series_out {
        let points = simulate_year(&evaluation.scenarios[cli.series_scenario]);
        if let Err(e) = export_series_csv(&points, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Monthly series written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(retrofit_sim::api::AppState { params, evaluation });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(retrofit_sim::api::serve(state, addr));
    }
}
