//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::Parser;

/// Removes TypeScript type annotations and declarations while keeping the
/// original formatting. Vue single-file components are supported.
#[derive(Debug, Parser)]
#[command(name = "detype")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Input file or directory
    pub input: Utf8PathBuf,

    /// Output file or directory (inferred from the input file name when omitted)
    pub output: Option<Utf8PathBuf>,

    /// Keep the typed code of magic-comment blocks and remove the comments
    #[arg(short = 'm', long = "remove-magic-comments")]
    pub remove_magic_comments: bool,

    /// Remove @ts-ignore and @ts-expect-error comments
    #[arg(long = "remove-ts-comments")]
    pub remove_ts_comments: bool,

    /// Write the output as erased instead of formatting it with prettier
    #[arg(long = "no-format")]
    pub no_format: bool,

    /// Path to a detype.config.json file
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Glob patterns to ignore when walking a directory
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Log every processed file
    #[arg(short, long)]
    pub verbose: bool,
}
