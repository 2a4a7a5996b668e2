pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use bvol_core::Result;
use clap::Parser;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            file,
            exclude,
            z_axis,
            fallback,
            sterimol,
            map,
            spacing,
        } => handlers::handle_analyze(file, exclude, z_axis, fallback, sterimol, map, spacing),
        Commands::Batch {
            files,
            z_axis,
            fallback,
            spacing,
        } => handlers::handle_batch(files, z_axis, fallback, spacing),
        Commands::Center { file, fallback } => handlers::handle_center(file, fallback),
        Commands::Sterimol {
            file,
            dummy,
            attached,
        } => handlers::handle_sterimol(file, dummy, attached),
    }
}
