mod participants;
mod plot;
mod report;

use std::error::Error;
use std::path::Path;

use clap::Parser;
use cylinder_histories::Campaign;
use participants::default_roster;
use plot::{figure_path, save_figure};
use report::render_summary;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Results parser for the high-fidelity CFD verification workshop: mesh motion test suite.
#[derive(Parser, Debug)]
#[command(name = "cylinder-histories")]
#[command(about = "Compare participant time-histories for the mesh-motion cylinder case")]
struct Args {
    /// Save time-histories to image files.
    #[arg(long)]
    save: bool,
}

/// Install the log subscriber; `RUST_LOG` overrides the default `info` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let args = Args::parse();

    // Group directories are looked up relative to where the tool is run, the
    // same place the figures are written to.
    let root = Path::new(".");
    let campaign = default_roster()
        .into_iter()
        .fold(Campaign::new(root), Campaign::with_participant);

    let report = campaign.reduce().map_err(|err| {
        error!("{err}");
        err
    })?;

    print!("{}", render_summary(&report));

    if args.save {
        for reduction in &report.motions {
            let path = figure_path(root, campaign.geometry(), reduction);
            match save_figure(reduction, &path) {
                Ok(()) => info!("wrote {}", path.display()),
                Err(err) => error!("failed to write {}: {err}", path.display()),
            }
        }
    } else {
        info!("figures not saved; pass --save to write them");
    }

    Ok(())
}
