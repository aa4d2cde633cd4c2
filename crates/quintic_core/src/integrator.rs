use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::IntegrationConfig;
use crate::error::{IntegrationError, Result};
use crate::exact::exact_state;
use crate::record::{Record, RecordWriter};
use crate::solvers::RK4;
use crate::system::{QuinticSystem, DIMENSION};
use crate::traits::Steppable;
use crate::vector::max_abs_diff;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Finished,
}

/// Owns everything one integration run mutates: the state vector, the time
/// cursor and the stepper's scratch buffers.
pub struct IntegrationContext {
    config: IntegrationConfig,
    state: [f64; DIMENSION],
    time: f64,
    stepper: RK4<f64>,
    phase: Phase,
}

impl IntegrationContext {
    pub fn new(config: IntegrationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: config.initial_state,
            time: config.initial_time,
            stepper: RK4::try_new(DIMENSION)?,
            phase: Phase::NotStarted,
        })
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    pub fn state(&self) -> &[f64; DIMENSION] {
        &self.state
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn record(&self) -> Record {
        Record::new(self.time, self.state[0])
    }

    fn has_next_step(&self) -> bool {
        self.time <= self.config.final_time - self.config.step_size
    }

    fn step(&mut self) {
        let mut t = self.time;
        self.stepper.step(
            &QuinticSystem,
            &mut t,
            &mut self.state,
            self.config.step_size,
        );
        // The cursor advances by exactly one step size, independent of the
        // stepper's own time bookkeeping.
        self.time += self.config.step_size;
    }

    /// Drives the state machine one transition and returns the record it
    /// emits, if any.
    pub fn advance(&mut self) -> Option<Record> {
        match self.phase {
            Phase::NotStarted => {
                self.phase = Phase::Running;
                Some(self.record())
            }
            Phase::Running if self.has_next_step() => {
                self.step();
                Some(self.record())
            }
            Phase::Running => {
                self.phase = Phase::Finished;
                None
            }
            Phase::Finished => None,
        }
    }

    pub fn records(&mut self) -> Records<'_> {
        Records { context: self }
    }
}

/// Iterator over the records of a run, initial condition first.
pub struct Records<'a> {
    context: &'a mut IntegrationContext,
}

impl Iterator for Records<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        self.context.advance()
    }
}

/// Accuracy figures collected while writing a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub config: IntegrationConfig,
    pub records: usize,
    pub final_time_reached: f64,
    pub max_abs_error: f64,
    pub max_abs_error_time: f64,
    pub final_abs_error: f64,
    /// Max-norm of (numerical state - exact state) at the last record.
    pub final_state_error: f64,
}

/// Runs the integration to completion, writing every record to `sink`.
pub fn integrate<W: Write>(config: IntegrationConfig, sink: W) -> Result<RunSummary> {
    let mut context = IntegrationContext::new(config)?;
    info!(
        initial_time = config.initial_time,
        final_time = config.final_time,
        step_size = config.step_size,
        expected_records = config.expected_records(),
        "starting integration"
    );

    let mut writer = RecordWriter::new(sink);
    let mut max_abs_error = 0.0;
    let mut max_abs_error_time = config.initial_time;
    let mut last = context.record();

    for record in context.records() {
        writer.write(&record)?;
        if record.abs_error > max_abs_error {
            max_abs_error = record.abs_error;
            max_abs_error_time = record.time;
        }
        last = record;
    }
    let records = writer.written();
    writer.finish()?;

    let summary = RunSummary {
        config,
        records,
        final_time_reached: last.time,
        max_abs_error,
        max_abs_error_time,
        final_abs_error: last.abs_error,
        final_state_error: max_abs_diff(context.state(), &exact_state(context.time())),
    };
    debug!(phase = ?context.phase(), "integration loop finished");
    info!(
        records = summary.records,
        max_abs_error = summary.max_abs_error,
        final_abs_error = summary.final_abs_error,
        "integration complete"
    );
    Ok(summary)
}

/// Creates (or truncates) `path` and integrates into it.
pub fn integrate_to_file(config: IntegrationConfig, path: &Path) -> Result<RunSummary> {
    // Validate first so a bad configuration never touches the filesystem.
    config.validate()?;
    let file = File::create(path).map_err(|source| IntegrationError::CreateSink {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "opened output file");
    integrate(config, BufWriter::new(file))
}
