use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use schedlab_config::{PolicyConfig, WorkloadConfig};
use schedlab_engine::{run_workload, RunOutcome, RunReport, SimulationError};
use schedlab_telemetry::logging::EventLogger;
use schedlab_telemetry::metrics::MetricsRecorder;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a workload and print its outcome, metrics, and trace hash
    Simulate(SimulateArgs),
    /// Run a workload and print only the per-process metrics table
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Workload YAML file
    #[arg(short, long)]
    pub workload: PathBuf,

    /// Write the full replay trace as YAML to this path
    #[arg(long)]
    pub trace_out: Option<PathBuf>,

    /// Expected trace hash; exits non-zero on mismatch (grading mode)
    #[arg(long)]
    pub validate_hash: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Workload YAML file
    #[arg(short, long)]
    pub workload: PathBuf,
}

pub fn run_command(cli: Cli, metrics: MetricsRecorder) -> Result<(), SimulationError> {
    match cli.command {
        Commands::Simulate(args) => run_simulate(args, metrics),
        Commands::Report(args) => run_report(args, metrics),
    }
}

fn policy_name(policy: &PolicyConfig) -> &'static str {
    match policy {
        PolicyConfig::Fcfs => "fcfs",
        PolicyConfig::Stcf => "stcf",
        PolicyConfig::Mlfq { .. } => "mlfq",
    }
}

fn load_and_run(
    workload: &PathBuf,
    metrics: &MetricsRecorder,
) -> Result<RunReport, SimulationError> {
    let config = WorkloadConfig::load_from_path(workload)?;
    EventLogger::log_run(policy_name(&config.policy), config.processes.len());
    let report = run_workload(&config);
    metrics.record_run(report.is_complete(), report.steps.len());
    Ok(report)
}

fn run_simulate(args: SimulateArgs, metrics: MetricsRecorder) -> Result<(), SimulationError> {
    let report = load_and_run(&args.workload, &metrics)?;

    match report.outcome {
        RunOutcome::Completed => println!("run completed in {} trace steps", report.steps.len()),
        RunOutcome::Aborted { at_tick } => {
            println!("run aborted at tick {at_tick} (safety bound); trace is partial")
        }
    }
    print_metrics(&report);

    let hash = report.trace_hash()?;
    println!("trace hash: {hash}");

    if let Some(path) = &args.trace_out {
        std::fs::write(path, serde_yaml::to_string(&report)?)?;
        println!("trace written to {}", path.display());
    }

    if let Some(expected) = &args.validate_hash {
        if expected != &hash {
            return Err(SimulationError::Validation(format!(
                "trace hash mismatch: expected {expected}, got {hash}"
            )));
        }
        println!("trace hash validated");
    }
    Ok(())
}

fn run_report(args: ReportArgs, metrics: MetricsRecorder) -> Result<(), SimulationError> {
    let report = load_and_run(&args.workload, &metrics)?;
    print_metrics(&report);
    Ok(())
}

fn print_metrics(report: &RunReport) {
    println!("pid  arrival  scheduled  waiting  turnaround  end");
    for row in &report.metrics {
        println!(
            "{:<4} {:<8} {:<10} {:<8} {:<11} {}",
            row.pid,
            row.arrival,
            fmt_opt(row.scheduled),
            fmt_opt(row.waiting),
            fmt_opt(row.turnaround),
            fmt_opt(row.end),
        );
    }
    if let Some(avg) = report.average_waiting() {
        println!("average waiting: {avg:.2}");
    }
    if let Some(avg) = report.average_turnaround() {
        println!("average turnaround: {avg:.2}");
    }
}

fn fmt_opt(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_name() {
        assert_eq!(policy_name(&PolicyConfig::Fcfs), "fcfs");
        assert_eq!(policy_name(&PolicyConfig::Stcf), "stcf");
    }

    #[test]
    fn test_missing_workload_is_a_config_error() {
        let metrics = MetricsRecorder::new();
        let path = PathBuf::from("/nonexistent/workload.yaml");
        let err = load_and_run(&path, &metrics).unwrap_err();
        assert!(matches!(err, SimulationError::Config(_)));
    }

    #[test]
    fn test_hash_mismatch_fails_validation() {
        let path = std::env::temp_dir().join("schedlab_cli_test_hash_mismatch.yaml");
        std::fs::write(
            &path,
            "processes:\n  - arrival: 0\n    burst: 2\npolicy:\n  kind: fcfs\n",
        )
        .unwrap();
        let args = SimulateArgs {
            workload: path.clone(),
            trace_out: None,
            validate_hash: Some("not-a-real-hash".to_string()),
        };
        let err = run_simulate(args, MetricsRecorder::new()).unwrap_err();
        assert!(matches!(err, SimulationError::Validation(_)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_simulate_round_trip_from_file() {
        let path = std::env::temp_dir().join("schedlab_cli_test_workload.yaml");
        std::fs::write(
            &path,
            "processes:\n  - arrival: 0\n    burst: 2\npolicy:\n  kind: fcfs\n",
        )
        .unwrap();
        let metrics = MetricsRecorder::new();
        let report = load_and_run(&path, &metrics).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.metrics[0].end, Some(2));
        std::fs::remove_file(&path).ok();
    }
}
