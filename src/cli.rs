use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mcm")]
#[command(version)]
#[command(about = "Compile resource declarations into a catalog", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile a declaration document (TOML or JSON) into a catalog
    Compile(CompileArgs),

    /// Print the resource id derived from each label
    Hash(HashArgs),

    /// Render a compiled catalog as a Graphviz digraph
    Dot(DotArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Compile
// ============================================================================

#[derive(Args)]
pub struct CompileArgs {
    /// Declaration document (.toml or .json)
    pub input: PathBuf,

    /// Write the catalog here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the catalog JSON
    #[arg(long)]
    pub pretty: bool,

    /// Digest used to derive ids (overrides config)
    #[arg(long, value_enum)]
    pub hash: Option<HashArg>,
}

// ============================================================================
// Hash
// ============================================================================

#[derive(Args)]
pub struct HashArgs {
    /// Labels to hash
    #[arg(required = true)]
    pub labels: Vec<String>,

    /// Digest used to derive ids (overrides config)
    #[arg(long, value_enum)]
    pub hash: Option<HashArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum HashArg {
    Sha1,
    Blake3,
}

impl From<HashArg> for catalog::HashAlgorithm {
    fn from(arg: HashArg) -> Self {
        match arg {
            HashArg::Sha1 => Self::Sha1,
            HashArg::Blake3 => Self::Blake3,
        }
    }
}

// ============================================================================
// Dot
// ============================================================================

#[derive(Args)]
pub struct DotArgs {
    /// Catalog JSON file (reads stdin when omitted)
    pub catalog: Option<PathBuf>,
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Print the config file location
    Path,
}
