//! xlate: Transpile annotated syntax trees to V or SMT-LIB.
//!
//! Usage:
//!   xlate [options] <FILE.json>...
//!
//! Each input file holds one serde-JSON `Module` tree. Options come from
//! `xlate.json` (or `--config`), with command-line flags taking precedence.

mod tracing_config;

use clap::Parser as ClapParser;
use miette::Report;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use xlate_ast::Module;
use xlate_emitter::Emitter;
use xlate_options::{ConfigError, Target, TranspilerOptions, CONFIG_FILE_NAME};

#[derive(ClapParser, Debug)]
#[command(name = "xlate", version, about = "xlate - transpile annotated syntax trees to V or SMT-LIB")]
struct Cli {
    /// Syntax tree files (serde JSON) to transpile.
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Output language: v or smt.
    #[arg(short, long)]
    target: Option<Target>,

    /// Path to the configuration file (default: ./xlate.json when present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for output files.
    #[arg(long = "out-dir")]
    out_dir: Option<PathBuf>,

    /// Indentation width in spaces.
    #[arg(long)]
    indent: Option<usize>,

    /// Prepend a comment banner naming the source module.
    #[arg(long)]
    header: bool,

    /// Print output to stdout instead of writing files.
    #[arg(long)]
    stdout: bool,
}

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
enum CliError {
    #[error(transparent)]
    #[diagnostic(code(xlate::config))]
    Config(#[from] ConfigError),

    #[error("cannot read {}: {source}", path.display())]
    #[diagnostic(code(xlate::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a syntax tree: {source}", path.display())]
    #[diagnostic(code(xlate::input), help("input files hold one serde-JSON `Module` each"))]
    Input {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write output: {0}")]
    #[diagnostic(code(xlate::write))]
    Write(#[source] std::io::Error),
}

fn main() {
    tracing_config::init_tracing();
    let cli = Cli::parse();
    process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let options = match load_options(cli) {
        Ok(options) => options,
        Err(error) => {
            report(error);
            return 1;
        }
    };
    debug!(backend = %options.target(), indent = options.indent_width(), "resolved options");

    let mut failed = false;
    let mut modules = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        match load_module(path) {
            Ok(module) => modules.push(module),
            Err(error) => {
                report(error);
                failed = true;
            }
        }
    }

    let emitter = Emitter::new(options);
    let (results, diagnostics) = emitter.emit_all(modules);
    for diagnostic in diagnostics.diagnostics() {
        eprintln!("{:?}", Report::new(diagnostic.clone()));
    }
    failed |= !diagnostics.is_empty();

    if cli.stdout {
        for result in &results {
            print!("{}", result.text);
        }
    } else if let Err(error) = emitter.write_output_files(&results) {
        report(CliError::Write(error));
        failed = true;
    }

    if failed {
        1
    } else {
        0
    }
}

/// File options, if any, with command-line flags applied on top.
fn load_options(cli: &Cli) -> Result<TranspilerOptions, CliError> {
    let file_options = match &cli.config {
        Some(path) => TranspilerOptions::from_file(path)?,
        None if Path::new(CONFIG_FILE_NAME).exists() => TranspilerOptions::from_file(Path::new(CONFIG_FILE_NAME))?,
        None => TranspilerOptions::default(),
    };
    let overrides = TranspilerOptions {
        target: cli.target,
        indent_width: cli.indent,
        emit_header: cli.header.then_some(true),
        out_dir: cli.out_dir.clone(),
    };
    Ok(file_options.merge(overrides))
}

fn load_module(path: &Path) -> Result<Module, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })
}

fn report(error: CliError) {
    eprintln!("{:?}", Report::new(error));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_defaults() {
        let cli = Cli::parse_from(["xlate", "--target", "smt2", "--indent", "4", "--header", "a.json"]);
        let options = load_options(&cli).unwrap();
        assert_eq!(options.target(), Target::Smt);
        assert_eq!(options.indent_width(), 4);
        assert!(options.emit_header());
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        assert!(Cli::try_parse_from(["xlate", "--target", "rust", "a.json"]).is_err());
    }

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["xlate"]).is_err());
    }
}
