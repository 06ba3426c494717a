//! Progress reporting for the strip pipeline.
//!
//! Solving the integer program can take a long time on large meshes, so the
//! pipeline reports each stage it enters through a caller-supplied callback.
//!
//! # Example
//!
//! ```
//! use optistrip::algo::{Progress, Stage};
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! progress.stage(Stage::Solve);
//! ```

/// Stages of a strip-building run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Dual graph construction.
    DualGraph,
    /// Variable and constraint emission.
    Formulate,
    /// Integer program solve.
    Solve,
    /// Strip extraction from the edge selection.
    Extract,
}

impl Stage {
    /// Number of stages.
    pub const COUNT: usize = 4;

    /// Zero-based position of the stage.
    pub fn index(self) -> usize {
        match self {
            Stage::DualGraph => 0,
            Stage::Formulate => 1,
            Stage::Solve => 2,
            Stage::Extract => 3,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Stage::DualGraph => "Building dual graph",
            Stage::Formulate => "Formulating integer program",
            Stage::Solve => "Solving integer program",
            Stage::Extract => "Extracting strips",
        }
    }
}

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives:
/// - `current`: Current step (0-based; equal to `total` when finished)
/// - `total`: Total number of steps
/// - `message`: Description of the current operation
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Report that a pipeline stage has started.
    #[inline]
    pub fn stage(&self, stage: Stage) {
        self.report(stage.index(), Stage::COUNT, stage.label());
    }

    /// Report that the whole pipeline has finished.
    #[inline]
    pub fn finish(&self) {
        self.report(Stage::COUNT, Stage::COUNT, "Done");
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
