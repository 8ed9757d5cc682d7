// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod paths;
pub mod registry;
pub mod session;
pub mod types;
pub mod watch;

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{config_root_dir, load_and_validate};
use crate::paths::RequestedPathSet;
use crate::registry::WatchPointRegistry;
use crate::session::{DryRunFacility, WatchSession};
use crate::types::MergePolicy;

pub use crate::paths::{collapse_roots, FilteredTree};
pub use crate::registry::IncrementalUpdate;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - request → path set conversion
/// - either a dry-run plan or the live watcher
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let base_dir = config_root_dir(&config_path)?;
    let requests = cfg.path_sets(&base_dir)?;
    let policy = args.policy.unwrap_or(cfg.config.merge_policy);

    info!(?policy, requests = requests.len(), base = ?base_dir, "loaded watch requests");

    if args.dry_run {
        let plan = plan_requests(policy, &requests)?;
        print_plan(policy, &plan);
        return Ok(());
    }

    watch::run_watch(policy, requests).await
}

/// What registering one request did, as reported by `--dry-run`.
#[derive(Debug, Clone)]
pub struct PlannedRequest {
    pub name: String,
    pub new_watch_points: Vec<PathBuf>,
    pub directories: Vec<PathBuf>,
}

/// Register every request against the real filesystem without watching
/// anything, recording what each registration would hand to the facility.
pub fn plan_requests(
    policy: MergePolicy,
    requests: &[(String, RequestedPathSet)],
) -> errors::Result<Vec<PlannedRequest>> {
    let mut session = WatchSession::new(
        WatchPointRegistry::with_policy(policy),
        DryRunFacility::default(),
    );

    let mut plan = Vec::with_capacity(requests.len());
    for (name, path_set) in requests {
        let registration = session.register(path_set)?;
        plan.push(PlannedRequest {
            name: name.clone(),
            new_watch_points: registration.update.new_watch_points().to_vec(),
            directories: registration.directories,
        });
    }
    Ok(plan)
}

/// Simple dry-run output: per request, its new watch points and directories.
fn print_plan(policy: MergePolicy, plan: &[PlannedRequest]) {
    println!("watchpoints dry-run");
    println!("  config.merge_policy = {:?}", policy);
    println!();

    println!("requests ({}):", plan.len());
    for request in plan {
        println!("  - {}", request.name);
        if !request.new_watch_points.is_empty() {
            println!("      new watch points: {:?}", request.new_watch_points);
        }
        for dir in &request.directories {
            println!("      watch: {}", dir.display());
        }
    }

    debug!("dry-run complete (no watching)");
}
