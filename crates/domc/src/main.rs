//! domc: compile single-file components into dependency-free DOM modules.

mod cli;
mod output;

use std::fs;

use clap::Parser;
use cli::{Args, Emit};
use domc_compiler::{compile, CompileOptions};
use miette::{IntoDiagnostic, Result, WrapErr};
use output::{NodesDump, Reporter};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let source = fs::read_to_string(&args.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", args.input))?;

    let options = CompileOptions {
        filename: Some(args.input.to_string()),
        unresolved: args.unresolved.into(),
    };
    let reporter = Reporter::new(args.diagnostics, &args.input, &source);

    let output = match compile(&source, &options) {
        Ok(output) => output,
        Err(e) => {
            reporter.error(&e);
            std::process::exit(1);
        }
    };
    reporter.warnings(&output.warnings);

    match args.emit {
        Emit::Js => print!("{}", output.code),
        Emit::Nodes => {
            let dump = NodesDump {
                properties: &output.properties,
                table: &output.table,
            };
            let json = serde_json::to_string_pretty(&dump).into_diagnostic()?;
            println!("{}", json);
        }
    }

    tracing::debug!(warnings = output.warnings.len(), "compiled {}", args.input);
    Ok(())
}
