use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use mjc::ast::{AstPrinter, GraphPrinter};
use mjc::Error;

#[derive(Parser)]
#[command(name = "mjc")]
#[command(about = "MiniJava compiler front end")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full middle end and report diagnostics
    Check {
        /// Input source file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Parse a source file and print the AST back as source
    Parse {
        /// Input source file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the AST in GraphViz format
        #[arg(short, long)]
        graph: bool,

        /// Show the raw AST structure
        #[arg(short, long)]
        detailed: bool,
    },

    /// Lexically analyze a source file
    Lex {
        /// Input source file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show token locations
        #[arg(short, long)]
        locations: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Check { input } => check_file(input)?,
        Commands::Parse { input, graph, detailed } => parse_file(input, *graph, *detailed)?,
        Commands::Lex { input, locations } => lex_file(input, *locations)?,
    }

    Ok(())
}

/// Print a fatal lexical or parse diagnostic and exit non-zero
fn report_fatal(input: &PathBuf, error: Error) -> Result<()> {
    match error {
        Error::Lexical(diagnostic) | Error::Parse(diagnostic) => {
            eprintln!("{}:{}", input.display(), diagnostic);
            process::exit(1);
        }
        other => Err(other.into()),
    }
}

fn check_file(input: &PathBuf) -> Result<()> {
    let source = fs::read_to_string(input)?;

    let analysis = match mjc::analyze(&source) {
        Ok(analysis) => analysis,
        Err(error) => return report_fatal(input, error),
    };

    for diagnostic in &analysis.diagnostics {
        eprintln!("{}:{}", input.display(), diagnostic);
    }
    if analysis.has_errors() {
        process::exit(1);
    }
    Ok(())
}

fn parse_file(input: &PathBuf, graph: bool, detailed: bool) -> Result<()> {
    let source = fs::read_to_string(input)?;

    let program = match mjc::parser::parse(&source) {
        Ok(program) => program,
        Err(error) => return report_fatal(input, error),
    };

    if detailed {
        println!("{:#?}", program);
    } else if graph {
        print!("{}", GraphPrinter::new().print(&program));
    } else {
        print!("{}", AstPrinter::new().print(&program));
    }
    Ok(())
}

fn lex_file(input: &PathBuf, locations: bool) -> Result<()> {
    let source = fs::read_to_string(input)?;

    let tokens = match mjc::parser::lex(&source) {
        Ok(tokens) => tokens,
        Err(error) => return report_fatal(input, error),
    };

    for token in tokens {
        if locations {
            println!(
                "{:?} at {}:{}",
                token.token_type(),
                token.location().line,
                token.location().column
            );
        } else {
            println!("{:?}: '{}'", token.token_type(), token.lexeme());
        }
    }
    Ok(())
}
