//! Command-line front end: plans a scenario file and prints the result as
//! JSON on stdout.
//!
//! ```text
//! rrt-planner <scenario-file> [--params <file>] [--seed <u64>] [--shortcut]
//! ```
//!
//! Scenarios with two start/goal pairs are planned with the coordinated
//! two-agent pipeline, otherwise single-agent. Log verbosity follows
//! `RUST_LOG` (default `info`).

use std::process::ExitCode;

use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rrt_star_2d::{
    optimize_path, plan_path, plan_two_agent_paths, PlanResult, PlannerError, PlannerParams,
    SamplingConfig, Workspace,
};

#[derive(Debug, Serialize)]
struct Report {
    agents: Vec<PlanResult>,
}

struct Args {
    scenario: String,
    params_file: Option<String>,
    seed: Option<u64>,
    shortcut: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut scenario = None;
    let mut params_file = None;
    let mut seed = None;
    let mut shortcut = false;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--params" => {
                params_file = Some(args.next().ok_or("--params needs a file argument")?);
            }
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("invalid seed '{value}'"))?,
                );
            }
            "--shortcut" => shortcut = true,
            other if scenario.is_none() && !other.starts_with('-') => {
                scenario = Some(other.to_string());
            }
            other => return Err(format!("unexpected argument '{other}'")),
        }
    }
    Ok(Args {
        scenario: scenario.ok_or("usage: rrt-planner <scenario-file> [--params <file>] [--seed <u64>] [--shortcut]")?,
        params_file,
        seed,
        shortcut,
    })
}

fn run(args: &Args) -> Result<Report, PlannerError> {
    let workspace = Workspace::from_file(&args.scenario)?;
    let params = match &args.params_file {
        Some(file) => PlannerParams::from_file(file)?,
        None => PlannerParams::default(),
    };
    info!(
        scenario = args.scenario.as_str(),
        agents = workspace.agents.len(),
        obstacles = workspace.obstacles.len(),
        "scenario loaded"
    );
    let mut agents = if workspace.agents.len() >= 2 {
        let (first, second) =
            plan_two_agent_paths(&workspace, params, SamplingConfig::default(), args.seed)?;
        vec![first, second]
    } else {
        vec![plan_path(
            &workspace,
            0,
            params,
            SamplingConfig::default(),
            args.seed,
        )?]
    };
    if args.shortcut {
        for result in agents.iter_mut().filter(|r| r.reached) {
            let (waypoints, cost) = optimize_path(&workspace, &result.waypoints);
            result.waypoints = waypoints;
            result.cost = cost;
        }
    }
    Ok(Report { agents })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    match run(&args) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!("could not serialize result: {err}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            error!("planning failed: {err}");
            ExitCode::FAILURE
        }
    }
}
