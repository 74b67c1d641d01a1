//! jmlx CLI
//!
//! Command-line interface for parsing, printing and checking Java files
//! with JML specifications

mod commands;

use clap::{Args, Parser, Subcommand};
use jmlx_core::init_tracing;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "jmlx")]
#[command(about = "jmlx: comment-preserving syntax tools for Java and JML")]
#[command(version = jmlx_core::VERSION)]
#[command(
    long_about = "jmlx parses Java sources with embedded JML specifications into mutable syntax trees\n\
that keep every comment, and prints them back.\n\
\n\
Examples:\n  \
jmlx print Counter.java               # Pretty-print with comments in place\n  \
jmlx print --jml-key esc A.java       # Also activate //+esc@ comments\n  \
jmlx sanitize Counter.java            # Show the activated modeling text\n  \
jmlx tokens --json Counter.java       # Dump the token list\n  \
jmlx check src/*.java                 # Parse, print and re-parse"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.jmlx.toml/.jmlx.json)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Modeling comment activation
#[derive(Args, Debug, Default, Clone)]
struct JmlArgs {
    #[arg(
        long = "jml-key",
        value_name = "KEY",
        help = "Activate modeling comments tagged +KEY (can be used multiple times)"
    )]
    jml_keys: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and pretty-print it
    Print {
        file: PathBuf,

        #[command(flatten)]
        jml: JmlArgs,

        #[arg(long, value_name = "N", help = "Spaces per indentation level")]
        indent: Option<usize>,

        #[arg(long, help = "Do not print comments")]
        no_comments: bool,

        #[arg(long, help = "Print orphan comments after their siblings instead of in place")]
        no_interleave: bool,
    },

    /// Print the activated modeling-comment text of a file
    Sanitize {
        file: PathBuf,

        #[command(flatten)]
        jml: JmlArgs,
    },

    /// Dump the token list of a file
    Tokens {
        file: PathBuf,

        #[arg(long, help = "Output JSON instead of one token per line")]
        json: bool,
    },

    /// Check that files survive parse, print and re-parse unchanged
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        jml: JmlArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "jmlx=error",
        1 => "jmlx=warn",
        2 => "jmlx=info",
        3 => "jmlx=debug",
        _ => "jmlx=trace",
    };
    // SAFETY: single-threaded at this point, before any logging starts
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    match run_command(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}

/// Run the selected command; `Ok(false)` means it ran but found problems
fn run_command(cli: Cli) -> anyhow::Result<bool> {
    let mut config = commands::load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Print {
            file,
            jml,
            indent,
            no_comments,
            no_interleave,
        } => {
            config.parser.jml_keys.extend(jml.jml_keys);
            if let Some(indent) = indent {
                config.printer.indent_size = indent;
            }
            if no_comments {
                config.printer.print_comments = false;
            }
            if no_interleave {
                config.printer.position_interleaving = false;
            }
            commands::print(&file, &config)?;
            Ok(true)
        }
        Commands::Sanitize { file, jml } => {
            config.parser.jml_keys.extend(jml.jml_keys);
            commands::sanitize(&file, &config)?;
            Ok(true)
        }
        Commands::Tokens { file, json } => {
            commands::tokens(&file, &config, json)?;
            Ok(true)
        }
        Commands::Check { files, jml } => {
            config.parser.jml_keys.extend(jml.jml_keys);
            commands::check(&files, &config)
        }
    }
}
