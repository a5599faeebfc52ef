use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Compiler output levels, ordered from most to least chatty. Comparing
/// levels follows that order: `output <= OutputLevel::Verbose` is true
/// for debug and verbose runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutputLevel {
    Debug,
    Verbose,
    Default,
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    /// The final tree as a Graphviz digraph
    Graphviz,
}

#[derive(Parser)]
#[command(name = "minic")]
#[command(about = "Front end of the minic compiler", version)]
pub struct Cli {
    /// Path to the source file to compile
    pub file: PathBuf,

    /// Print all diagnostic and debug output
    #[arg(long, conflicts_with_all = ["verbose", "silent"])]
    pub debug: bool,

    /// Print phase progress messages
    #[arg(long, conflicts_with = "silent")]
    pub verbose: bool,

    /// Print nothing, not even errors; failures still exit non-zero
    #[arg(long)]
    pub silent: bool,

    /// Dump the final tree in the given format after a successful run
    #[arg(long, value_enum)]
    pub dump: Option<DumpFormat>,
}

impl Cli {
    pub fn output_level(&self) -> OutputLevel {
        if self.debug {
            OutputLevel::Debug
        } else if self.verbose {
            OutputLevel::Verbose
        } else if self.silent {
            OutputLevel::Silent
        } else {
            OutputLevel::Default
        }
    }
}
