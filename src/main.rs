use std::error::Error;
use std::fs;
use std::str::FromStr;

use clap::Parser;

use volcanium::{best_release, best_release_pair, SearchLimits, Volcano};

/// Search a valve scan for the best pressure release: one agent over the
/// full horizon, then two agents splitting the valves over the shorter one.
#[derive(Debug, Parser)]
struct Args {
    /// Scan file; reads stdin when omitted
    file: Option<String>,

    /// Valve the agents start from
    #[arg(long, default_value = "AA")]
    start: String,

    /// Time units for the lone agent
    #[arg(long, default_value_t = 30)]
    horizon: u32,

    /// Time units when two agents split the work
    #[arg(long, default_value_t = 26)]
    pair_horizon: u32,

    /// Most openable valves the search will take on
    #[arg(long, default_value_t = 16)]
    max_openable: usize,

    /// Most search states to expand before giving up
    #[arg(long, default_value_t = 1 << 26)]
    max_states: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let input = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => std::io::read_to_string(std::io::stdin().lock())?,
    };

    let volcano = Volcano::from_str(&input)?;
    let limits = SearchLimits {
        max_openable: args.max_openable,
        max_states: args.max_states,
    };
    println!("{}", best_release(&volcano, &args.start, args.horizon, limits)?);
    println!(
        "{}",
        best_release_pair(&volcano, &args.start, args.pair_horizon, limits)?
    );
    Ok(())
}
