mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hydra", version, about = "Evaluate Hydra terms against the standard primitive library")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered primitives with their signatures
    Prims {
        /// Only show primitives whose name starts with this prefix
        #[arg(long = "prefix")]
        prefix: Option<String>,
    },
    /// Show one primitive's signature and arity
    Show { name: String },
    /// Parse and evaluate a term
    Eval {
        /// Expression in term syntax (omit when using --file)
        expr: Option<String>,
        /// Read the expression from a file instead
        #[arg(long = "file", value_name = "PATH", conflicts_with = "expr")]
        file: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Apply a single primitive to parsed arguments
    Call {
        /// Primitive name, e.g. hydra/lib/math.add
        name: String,
        /// Argument in term syntax; repeat for each parameter
        #[arg(long = "arg", value_name = "VALUE")]
        args: Vec<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
    /// Print trace messages to stderr
    #[arg(long)]
    trace: bool,
    /// Maximum trace depth before evaluation fails
    #[arg(long = "max-depth", value_name = "N")]
    max_depth: Option<usize>,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Prims { prefix } => commands::cmd_prims(prefix.as_deref()),
        Command::Show { name } => commands::cmd_show(&name),
        Command::Eval { expr, file, output } => {
            commands::cmd_eval(expr.as_deref(), file.as_deref(), &output)
        }
        Command::Call { name, args, output } => commands::cmd_call(&name, &args, &output),
    }
}
