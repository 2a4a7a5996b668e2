use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "bvoldev CLI (alpha)", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Measure the buried volume of an XYZ file
    Analyze {
        file: PathBuf,

        /// Atom indices left out of the measurement (0-based, comma separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<usize>,

        /// Atoms whose centroid defines the steric-map axis
        #[arg(long = "z-axis", value_delimiter = ',')]
        z_axis: Vec<usize>,

        /// Center candidates used when no metallic atom is present
        #[arg(long, value_delimiter = ',')]
        fallback: Vec<usize>,

        /// Derive the sphere radius from Sterimol parameters
        #[arg(long)]
        sterimol: bool,

        /// Write the steric map here (requires --z-axis)
        #[arg(long)]
        map: Option<PathBuf>,

        /// Grid spacing in Å
        #[arg(long)]
        spacing: Option<f64>,
    },

    /// Analyze several files into one in-memory registry and list the records
    Batch {
        files: Vec<PathBuf>,

        #[arg(long = "z-axis", value_delimiter = ',')]
        z_axis: Vec<usize>,

        #[arg(long, value_delimiter = ',')]
        fallback: Vec<usize>,

        #[arg(long)]
        spacing: Option<f64>,
    },

    /// Print the resolved center atom
    Center {
        file: PathBuf,

        #[arg(long, value_delimiter = ',')]
        fallback: Vec<usize>,
    },

    /// Print Sterimol L, B1 and B5 along the dummy -> attached axis
    Sterimol {
        file: PathBuf,

        #[arg(long, default_value_t = 0)]
        dummy: usize,

        #[arg(long, default_value_t = 1)]
        attached: usize,
    },
}
