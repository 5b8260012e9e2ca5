//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "reweigh",
    version,
    about = "Compare a dataset against reference distributions and compute correction weights",
    long_about = "Compare a tabular dataset's categorical distributions (zip/area code,\n\
                  gender, ...) against a reference source such as the US Census and compute\n\
                  per-row weights that rebalance the data toward the reference."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include category values in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate a dataset and write the bias report.
    Evaluate(EvaluateArgs),

    /// List built-in reference sources and their attributes.
    Sources,

    /// List the attributes the detector looks for.
    Attributes(AttributesArgs),
}

#[derive(Parser)]
pub struct EvaluateArgs {
    /// Delimited text file with a header row (.csv, .tsv).
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// Reference source label.
    #[arg(long = "reference", value_name = "LABEL", default_value = "US Census")]
    pub reference: String,

    /// Reference CSV (attribute,label,category,value[,aliases]) overlaid on the source.
    #[arg(long = "reference-file", value_name = "CSV")]
    pub reference_file: Option<PathBuf>,

    /// TOML file with [engine] settings and [[attribute]] entries.
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Reference proportion for categories missing from the reference table.
    #[arg(long = "floor", value_name = "P")]
    pub floor: Option<f64>,

    /// Markdown report path.
    #[arg(long = "output", value_name = "MD", default_value = "bias_report.md")]
    pub output: PathBuf,

    /// Also write the report as JSON.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Write the weights as a JSON array in row order.
    #[arg(long = "weights-json", value_name = "PATH")]
    pub weights_json: Option<PathBuf>,

    /// Write the dataset with an added Weights column.
    #[arg(long = "weighted-output", value_name = "CSV")]
    pub weighted_output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct AttributesArgs {
    /// Show the registry defined by this config file instead of the default.
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
