//! Run a scripted navigation walkthrough and print the resulting tree.

use anyhow::Result;
use clap::Parser;
use flowtree::dump::{dump, dump_plain};
use flowtree_demos::scenario::{Scenario, run};
use tracing::Level;

/// CLI flags for the walkthrough example.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Scenario to run.
    #[clap(short, long, value_enum, default_value_t = Scenario::BackSwipe)]
    scenario: Scenario,

    /// Log lifecycle events at debug level.
    #[clap(short, long)]
    verbose: bool,

    /// Print the tree without color.
    #[clap(long)]
    plain: bool,
}

/// Run the walkthrough example.
fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .without_time()
        .compact()
        .init();

    let outcome = run(args.scenario)?;
    if !outcome.flows.contains(outcome.app) {
        println!("all flows stopped");
        return Ok(());
    }
    let tree = if args.plain {
        dump_plain(&outcome.flows, outcome.app)?
    } else {
        dump(&outcome.flows, outcome.app)?
    };
    print!("{tree}");
    println!("popped by back navigation: {}", outcome.popped.len());
    Ok(())
}
