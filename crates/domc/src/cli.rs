//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use domc_compiler::UnresolvedPolicy;

/// Compile a single-file component into a dependency-free DOM module.
#[derive(Debug, Parser)]
#[command(name = "domc")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Component file to compile
    pub input: Utf8PathBuf,

    /// What to print on stdout
    #[arg(long, value_enum, default_value = "js")]
    pub emit: Emit,

    /// How to treat `{name}` bindings that name no exported property
    #[arg(long, value_enum, default_value = "error")]
    pub unresolved: Unresolved,

    /// Diagnostic format on stderr
    #[arg(long, value_enum, default_value = "human")]
    pub diagnostics: DiagnosticFormat,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Output selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Emit {
    /// The compiled JavaScript module (default)
    #[default]
    Js,
    /// The node table, listeners and properties as JSON
    Nodes,
}

/// Policy for unresolved bindings.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Unresolved {
    /// Fail compilation (default)
    #[default]
    Error,
    /// Compile and report a warning
    Warn,
    /// Compile silently
    Allow,
}

impl From<Unresolved> for UnresolvedPolicy {
    fn from(value: Unresolved) -> Self {
        match value {
            Unresolved::Error => UnresolvedPolicy::Error,
            Unresolved::Warn => UnresolvedPolicy::Warn,
            Unresolved::Allow => UnresolvedPolicy::Allow,
        }
    }
}

/// Diagnostic format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum DiagnosticFormat {
    /// Annotated source snippets (default)
    #[default]
    Human,
    /// One JSON object per line
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["domc", "Counter.domc"]);
        assert_eq!(args.input.as_str(), "Counter.domc");
        assert_eq!(args.emit, Emit::Js);
        assert_eq!(args.unresolved, Unresolved::Error);
        assert_eq!(args.diagnostics, DiagnosticFormat::Human);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["domc"]).is_err());
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "domc",
            "App.domc",
            "--emit",
            "nodes",
            "--unresolved",
            "warn",
            "--diagnostics",
            "json",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.emit, Emit::Nodes);
        assert_eq!(UnresolvedPolicy::from(args.unresolved), UnresolvedPolicy::Warn);
        assert_eq!(args.diagnostics, DiagnosticFormat::Json);
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(Args::try_parse_from(["domc", "a.domc", "--unresolved", "ignore"]).is_err());
    }
}
