use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "CHART_BRIDGE",
    about = "Convert VSB note charts and read the VSD song catalog!"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert one or more `.vsb` charts into JSON note lists.
    Convert {
        /// Chart files to convert, e.g. `Charts/0042/FINALE.vsb`.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory the converted charts are written to.
        #[arg(short, long, default_value = "out")]
        out_dir: PathBuf,

        /// Pretty-print the JSON output.
        #[arg(short, long, default_value_t = false)]
        pretty: bool,

        /// Dry run (log the first dry_run_max notes of each chart and write nothing).
        #[arg(short, long, default_value_t = false)]
        dry_run: bool,

        /// Maximum notes to print per chart in dry run.
        #[arg(long, default_value_t = 20)]
        dry_run_max: usize,
    },

    /// Print the decoded raw note events of a chart as JSON.
    Dump {
        /// Path to the `.vsb` chart.
        file: PathBuf,
    },

    /// Decode the song catalog into a JSON list of records.
    Catalog {
        /// Path to the `.vsd` catalog.
        file: PathBuf,

        /// Write the JSON here instead of printing it.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output.
        #[arg(short, long, default_value_t = false)]
        pretty: bool,
    },
}
