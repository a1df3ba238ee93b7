//! Prometheus counters for simulator hosts.

use prometheus::{Counter, Histogram, HistogramOpts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub completed_runs: Counter,
    pub aborted_runs: Counter,
    pub run_steps: Histogram,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let completed_runs =
            Counter::new("schedlab_runs_completed_total", "Simulation runs that completed").unwrap();
        let aborted_runs = Counter::new(
            "schedlab_runs_aborted_total",
            "Simulation runs that tripped the safety bound",
        )
        .unwrap();
        let run_steps = Histogram::with_opts(
            HistogramOpts::new("schedlab_run_steps", "Trace steps per simulation run")
                .buckets(vec![10.0, 100.0, 1_000.0, 10_000.0]),
        )
        .unwrap();

        registry.register(Box::new(completed_runs.clone())).unwrap();
        registry.register(Box::new(aborted_runs.clone())).unwrap();
        registry.register(Box::new(run_steps.clone())).unwrap();

        Self {
            registry,
            completed_runs,
            aborted_runs,
            run_steps,
        }
    }

    pub fn record_run(&self, completed: bool, steps: usize) {
        if completed {
            self.completed_runs.inc();
        } else {
            self.aborted_runs.inc();
        }
        self.run_steps.observe(steps as f64);
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap())
    }
}
