//! Progress reporting for capture, matching, and resynthesis loops

/// Number of vertices processed between progress reports
pub const PROGRESS_BATCH: usize = 100;

/// Trait for receiving progress updates during long-running vertex loops
///
/// Capture, vertex sampling, and resynthesis report after every
/// [`PROGRESS_BATCH`] vertices and once more at completion. Reporting is
/// advisory and never changes results.
pub trait ProgressHandler {
    /// Called to report progress
    ///
    /// # Parameters
    /// - `current`: Number of vertices processed so far
    /// - `total`: Total number of vertices in the loop
    ///
    /// # Returns
    /// Return `true` to continue the operation, `false` to cancel. A
    /// cancelled operation fails with [`Error::Cancelled`](crate::Error::Cancelled)
    /// before mutating any destination state.
    fn update(&mut self, current: usize, total: usize) -> bool;
}

/// A progress handler that ignores updates and never cancels
pub struct NullProgressHandler;

impl ProgressHandler for NullProgressHandler {
    fn update(&mut self, _current: usize, _total: usize) -> bool {
        true
    }
}

/// A simple progress handler that prints to stdout
pub struct PrintProgressHandler {
    last_percentage: i32,
}

impl PrintProgressHandler {
    /// Create a new print progress handler
    pub fn new() -> Self {
        Self {
            last_percentage: -1,
        }
    }
}

impl Default for PrintProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressHandler for PrintProgressHandler {
    fn update(&mut self, current: usize, total: usize) -> bool {
        let percentage = if total == 0 {
            100
        } else {
            ((current as f64 / total as f64) * 100.0) as i32
        };

        // Only print when percentage changes
        if percentage != self.last_percentage {
            println!("Progress: {}% ({}/{} vertices)", percentage, current, total);
            self.last_percentage = percentage;
        }

        true // Continue operation
    }
}

/// A progress handler that stores progress information without printing
pub struct SilentProgressHandler {
    current: usize,
    total: usize,
    cancelled: bool,
}

impl SilentProgressHandler {
    /// Create a new silent progress handler
    pub fn new() -> Self {
        Self {
            current: 0,
            total: 0,
            cancelled: false,
        }
    }

    /// Get the last reported vertex count
    pub fn current(&self) -> usize {
        self.current
    }

    /// Get the last reported total
    pub fn total(&self) -> usize {
        self.total
    }

    /// Check if the operation was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Cancel the operation
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

impl Default for SilentProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressHandler for SilentProgressHandler {
    fn update(&mut self, current: usize, total: usize) -> bool {
        self.current = current;
        self.total = total;
        !self.cancelled
    }
}

/// A progress handler that calls a closure
pub struct ClosureProgressHandler<F>
where
    F: FnMut(usize, usize) -> bool,
{
    closure: F,
}

impl<F> ClosureProgressHandler<F>
where
    F: FnMut(usize, usize) -> bool,
{
    /// Create a new closure-based progress handler
    pub fn new(closure: F) -> Self {
        Self { closure }
    }
}

impl<F> ProgressHandler for ClosureProgressHandler<F>
where
    F: FnMut(usize, usize) -> bool,
{
    fn update(&mut self, current: usize, total: usize) -> bool {
        (self.closure)(current, total)
    }
}

/// Report after each batch boundary and at the end of a loop
///
/// Returns `false` as soon as the handler requests cancellation.
pub(crate) fn report_batched(
    handler: &mut dyn ProgressHandler,
    current: usize,
    total: usize,
) -> bool {
    if current == total || current % PROGRESS_BATCH == 0 {
        handler.update(current, total)
    } else {
        true
    }
}
