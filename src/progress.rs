//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Stages of a delta run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Classify,
    Write,
    Store,
    Report,
}

impl Stage {
    fn message(self) -> &'static str {
        match self {
            Self::Load => "Loading snapshots...",
            Self::Classify => "Classifying records...",
            Self::Write => "Writing master and delta files...",
            Self::Store => "Storing master snapshot...",
            Self::Report => "Rendering trend chart...",
        }
    }
}

/// Progress reporter for delta runs
#[derive(Debug)]
pub struct ProgressReporter {
    pub stage_pb: Option<ProgressBar>,
    current: Option<Stage>,
    show_progress: bool,
    start_time: std::time::Instant,
}

impl ProgressReporter {
    /// Create progress reporter that shows a spinner per stage
    pub fn new_for_run() -> Self {
        Self {
            stage_pb: None,
            current: None,
            show_progress: true,
            start_time: std::time::Instant::now(),
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            stage_pb: None,
            current: None,
            show_progress: false,
            start_time: std::time::Instant::now(),
        }
    }

    pub fn new(show_progress: bool) -> Self {
        if show_progress {
            Self::new_for_run()
        } else {
            Self::new_minimal()
        }
    }

    /// Begin a stage, clearing any spinner left from the previous one
    pub fn start_stage(&mut self, stage: Stage) {
        if let Some(pb) = self.stage_pb.take() {
            pb.finish_and_clear();
        }
        self.current = Some(stage);
        if self.show_progress {
            self.stage_pb = Some(create_spinner(stage.message()));
        }
    }

    /// Finish the current stage with a message
    pub fn finish_stage(&mut self, message: &str) {
        if let Some(pb) = self.stage_pb.take() {
            pb.finish_with_message(message.to_string());
        }
        self.current = None;
    }

    pub fn current_stage(&self) -> Option<Stage> {
        self.current
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(pb) = self.stage_pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
