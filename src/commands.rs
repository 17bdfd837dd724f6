//! CLI command definitions

use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::build::BuildKind;

#[derive(Subcommand)]
pub enum Commands {
    /// Show the testing configuration governing a directory
    Config {
        /// Directory to start the search from (default: current directory)
        dir: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List test files under the configuration root
    Discover {
        /// Directory to start the search from (default: current directory)
        dir: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the test binary in a directory with make
    Build {
        /// Directory holding the Makefile (default: current directory)
        dir: Option<PathBuf>,

        /// Debug information flavour
        #[arg(long, value_enum, default_value = "default")]
        kind: KindArg,

        /// Target platform: darwin, linux, windows (default: host)
        #[arg(long)]
        platform: Option<String>,

        /// Compiler passed to make as CC
        #[arg(long)]
        compiler: Option<String>,

        /// Echo build commands and output
        #[arg(long)]
        trace: bool,
    },

    /// Convert a stop reason between its name and integer code
    StopReason {
        /// A name such as "Breakpoint" or a code such as 3
        value: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Default,
    Dsym,
    Dwarf,
}

impl From<KindArg> for BuildKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Default => BuildKind::Default,
            KindArg::Dsym => BuildKind::Dsym,
            KindArg::Dwarf => BuildKind::Dwarf,
        }
    }
}
