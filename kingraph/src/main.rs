//! kinview
//!
//! Merges a relation engine snapshot into a persisted graph store and prints
//! the resulting layout as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kingraph::{GraphStore, KinSession, PersonId, RelationEngineSnapshot, StaticEngine, ViewConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "kinview", about = "Kin graph merge and layout")]
struct Cli {
    /// Snapshot JSON as produced by the relation engine
    snapshot: PathBuf,

    /// Graph store to merge into; created if missing, written back afterwards
    #[arg(long, env = "KINVIEW_STORE")]
    store: Option<PathBuf>,

    /// View config JSON
    #[arg(long, env = "KINVIEW_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 0)]
    root: u32,

    /// Overrides the configured step distance
    #[arg(long)]
    step: Option<f64>,

    /// Name edits as ID=NAME, applied after the merge
    #[arg(long = "name", value_parser = parse_name)]
    names: Vec<(u32, String)>,

    /// Also report links the walk did not take
    #[arg(long)]
    cross_links: bool,

    /// Print edge polylines instead of the bare layout
    #[arg(long)]
    paths: bool,

    #[arg(long, short)]
    verbose: bool,
}

fn parse_name(arg: &str) -> Result<(u32, String), String> {
    let (id, name) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ID=NAME, got `{arg}`"))?;
    let id = id
        .trim()
        .parse()
        .map_err(|e| format!("invalid person id `{id}`: {e}"))?;
    Ok((id, name.to_string()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let output = run(cli)?;
    println!("{output}");
    Ok(())
}

/// Merge, rename, persist, then lay out. The store is written back before
/// the layout runs, so a bad root never loses a merge.
fn run(cli: Cli) -> anyhow::Result<String> {
    let mut config = match &cli.config {
        Some(path) => ViewConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => ViewConfig::default(),
    };
    if let Some(step) = cli.step {
        config.step_distance = step;
    }
    config.cross_links |= cli.cross_links;

    let store = match &cli.store {
        Some(path) if path.exists() => {
            let (store, result) =
                GraphStore::load(path).with_context(|| format!("loading store {}", path.display()))?;
            info!(people = result.people, named = result.named, "store loaded");
            store
        }
        _ => GraphStore::new(),
    };

    let snapshot_json = std::fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("reading snapshot {}", cli.snapshot.display()))?;
    let snapshot = RelationEngineSnapshot::from_json_str(&snapshot_json)?;

    let mut session = KinSession::with_store(StaticEngine::new(snapshot), store, config)?;
    session.refresh()?;

    let renamed = cli
        .names
        .into_iter()
        .try_for_each(|(id, name)| session.set_name(PersonId(id), Some(name)));

    if let Some(path) = &cli.store {
        session
            .store()
            .save(path)
            .with_context(|| format!("saving store {}", path.display()))?;
        info!(path = %path.display(), "store saved");
    }
    renamed?;

    let root = PersonId(cli.root);
    let output = if cli.paths {
        serde_json::to_string_pretty(&session.present(root)?)?
    } else {
        serde_json::to_string_pretty(&session.layout(root)?)?
    };
    Ok(output)
}
