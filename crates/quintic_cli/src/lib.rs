use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use quintic_core::{integrate_to_file, IntegrationConfig, RunSummary};
use tracing::info;

/// Integrates the repeated-root quintic ODE with fixed-step RK4 and writes
/// `time, numerical, exact, |error|` per step. With no arguments the
/// compiled-in run (t in [0, 5], h = 0.01, into result.txt) is reproduced.
#[derive(Debug, Parser)]
#[command(name = "quintic", version, about, long_about = None)]
pub struct Cli {
    /// Result file, one tab-separated record per line
    #[arg(short, long, default_value = "result.txt")]
    pub output: PathBuf,

    /// Initial time
    #[arg(long, allow_negative_numbers = true)]
    pub t0: Option<f64>,

    /// Final time
    #[arg(long, allow_negative_numbers = true)]
    pub t1: Option<f64>,

    /// Fixed step size
    #[arg(long, allow_negative_numbers = true)]
    pub step: Option<f64>,

    /// Also write the run summary as JSON
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn config(&self) -> IntegrationConfig {
        let defaults = IntegrationConfig::default();
        IntegrationConfig {
            initial_time: self.t0.unwrap_or(defaults.initial_time),
            final_time: self.t1.unwrap_or(defaults.final_time),
            step_size: self.step.unwrap_or(defaults.step_size),
            ..defaults
        }
    }
}

pub fn run(cli: &Cli) -> Result<RunSummary> {
    let config = cli.config();
    let summary = integrate_to_file(config, &cli.output)
        .with_context(|| format!("integration into {} failed", cli.output.display()))?;
    info!(path = %cli.output.display(), records = summary.records, "results written");

    if let Some(path) = &cli.summary {
        let json = serde_json::to_string_pretty(&summary).context("failed to encode summary")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        info!(path = %path.display(), "summary written");
    }
    Ok(summary)
}

/// Maps the outcome of [`run`] to a process exit status, printing the error
/// notice to `stderr` on failure.
pub fn exit_status(outcome: &Result<RunSummary>, stderr: &mut impl Write) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(err) => {
            // Nothing left to report to if stderr itself is gone.
            let _ = writeln!(stderr, "\nError! {err:#}\n");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{exit_status, run, Cli};
    use clap::Parser;
    use quintic_core::IntegrationError;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("quintic").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn no_arguments_reproduce_default_run() {
        let cli = parse(&[]);
        assert_eq!(cli.output.to_str(), Some("result.txt"));
        assert_eq!(cli.config(), quintic_core::IntegrationConfig::default());
        assert!(cli.summary.is_none());
    }

    #[test]
    fn flags_override_individual_fields() {
        let cli = parse(&["--t0", "1", "--t1", "2", "--step", "0.05"]);
        let config = cli.config();
        assert_eq!(config.initial_time, 1.0);
        assert_eq!(config.final_time, 2.0);
        assert_eq!(config.step_size, 0.05);
        assert_eq!(config.initial_state, [0.0, 3.0, -9.0, -8.0, 0.0]);
    }

    #[test]
    fn writes_results_and_summary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("result.txt");
        let summary_path = dir.path().join("summary.json");
        let cli = parse(&[
            "--output",
            output.to_str().expect("utf8 path"),
            "--summary",
            summary_path.to_str().expect("utf8 path"),
        ]);

        let summary = run(&cli).expect("run succeeds");
        assert_eq!(summary.records, 501);

        let text = std::fs::read_to_string(&output).expect("result file");
        assert_eq!(text.lines().count(), 501);
        assert_eq!(
            text.lines().next(),
            Some("0.000000e+00\t0.000000e+00\t0.000000e+00\t0.000000e+00")
        );

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&summary_path).expect("summary"))
                .expect("valid json");
        assert_eq!(json["records"], 501);
        assert_eq!(json["config"]["step_size"], 0.01);
    }

    #[test]
    fn unwritable_output_reports_sink_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("no_such_dir").join("result.txt");
        let cli = parse(&["--output", output.to_str().expect("utf8 path")]);

        let err = run(&cli).unwrap_err();
        let cause = err
            .downcast_ref::<IntegrationError>()
            .expect("core error preserved");
        assert!(matches!(cause, IntegrationError::CreateSink { .. }));
        assert!(format!("{err:#}").contains("no_such_dir"));
    }

    #[test]
    fn bad_step_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("result.txt");
        let cli = parse(&["--output", output.to_str().expect("utf8 path"), "--step=-1"]);
        assert!(run(&cli).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn exit_status_is_zero_only_on_success() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = parse(&["--output", dir.path().join("ok.txt").to_str().expect("utf8 path")]);
        let mut stderr = Vec::new();
        assert_eq!(exit_status(&run(&good), &mut stderr), 0);
        assert!(stderr.is_empty());

        let missing = dir.path().join("missing").join("result.txt");
        let bad = parse(&["--output", missing.to_str().expect("utf8 path")]);
        assert_eq!(exit_status(&run(&bad), &mut stderr), 1);
        let notice = String::from_utf8(stderr).expect("utf8");
        assert!(notice.starts_with("\nError! integration into"), "{notice:?}");
        assert!(notice.contains("missing"));
    }
}
