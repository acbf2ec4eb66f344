use std::time::{Duration, Instant};

use log::{error, info};
use uuid::Uuid;

use crate::BatchError;

use super::{build_name, step::Step};

type JobResult<T> = Result<T, BatchError>;

/// Represents a job that can be executed.
///
/// A job is a sequence of steps executed in order. The first failing step
/// ends the job and its error is returned unchanged, so callers still see
/// which row or field caused the failure.
pub trait Job {
    /// Runs the job and returns the result of the job execution.
    ///
    /// # Returns
    /// - `Ok(JobExecution)` when every step succeeded
    /// - `Err(BatchError)` from the first failing step
    fn run(&self) -> JobResult<JobExecution>;
}

/// Timing information about a job run.
#[derive(Debug)]
pub struct JobExecution {
    /// The time when the job started executing
    pub start: Instant,
    /// The time when the job finished executing
    pub end: Instant,
    /// The total duration of the job execution
    pub duration: Duration,
}

/// A configured job, created through [`JobBuilder`].
pub struct JobInstance<'a> {
    id: Uuid,
    name: String,
    steps: Vec<&'a dyn Step>,
}

impl Job for JobInstance<'_> {
    fn run(&self) -> JobResult<JobExecution> {
        let start = Instant::now();

        info!("Start of job: {}, id: {}", self.name, self.id);

        for step in &self.steps {
            if let Err(err) = step.execute() {
                error!(
                    "Job {} aborted in step {}: {}",
                    self.name,
                    step.get_name(),
                    err
                );
                return Err(err);
            }
        }

        info!("End of job: {}, id: {}", self.name, self.id);

        Ok(JobExecution {
            start,
            end: Instant::now(),
            duration: start.elapsed(),
        })
    }
}

impl JobInstance<'_> {
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

/// Builder for creating a job instance.
///
/// # Example
///
/// ```rust,no_run,compile_fail
/// use phrase_batch::core::job::JobBuilder;
///
/// let job = JobBuilder::new()
///     .name("convert-phrases".to_string())
///     .start(&convert_step)
///     .build();
/// ```
#[derive(Default)]
pub struct JobBuilder<'a> {
    /// Optional name for the job (generated randomly if not specified)
    name: Option<String>,
    steps: Vec<&'a dyn Step>,
}

impl<'a> JobBuilder<'a> {
    /// Creates a builder with no name and no steps.
    pub fn new() -> Self {
        Self {
            name: None,
            steps: Vec::new(),
        }
    }

    /// Names the job.
    ///
    /// # Parameters
    /// - `name`: Name used in the job's log lines
    ///
    /// # Returns
    /// The updated builder
    pub fn name(mut self, name: String) -> JobBuilder<'a> {
        self.name = Some(name);
        self
    }

    /// Sets the first step of the job. Same as `next`, reads better first.
    ///
    /// # Parameters
    /// - `step`: Step run before any other
    ///
    /// # Returns
    /// The updated builder
    pub fn start(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    /// Appends a step, run after every step added before it.
    ///
    /// # Parameters
    /// - `step`: Step to run next
    ///
    /// # Returns
    /// The updated builder
    pub fn next(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    /// Builds the job.
    ///
    /// # Returns
    /// A [`JobInstance`] named after `name`, or a random name when none was set
    pub fn build(self) -> JobInstance<'a> {
        JobInstance {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(build_name),
            steps: self.steps,
        }
    }
}
