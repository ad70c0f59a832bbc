//! Progress bar display for multi-component installations

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display over the requested components
///
/// Safe to share between the install workers. The bar is hidden when
/// stderr is not a terminal.
pub struct ProgressDisplay {
    requests_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display with total request count
    pub fn new(total_requests: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());

        let requests_pb = ProgressBar::new(total_requests);
        requests_pb.set_style(style);

        Self { requests_pb }
    }

    /// Show the component a worker started on
    pub fn start_request(&self, identifier: &str) {
        self.requests_pb.set_message(identifier.to_string());
    }

    /// Count a finished request
    pub fn finish_request(&self, identifier: &str, success: bool) {
        if !success {
            self.requests_pb.println(format!("failed: {identifier}"));
        }
        self.requests_pb.inc(1);
    }

    /// Finish the bar, or leave it in place when something failed
    pub fn finish(&self, success: bool) {
        if success {
            self.requests_pb.finish_and_clear();
        } else {
            self.requests_pb.abandon();
        }
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.requests_pb.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_are_counted() {
        let progress = ProgressDisplay::new(2);
        progress.start_request("part_ui");
        progress.finish_request("part_ui", true);
        progress.start_request("part_web");
        progress.finish_request("part_web", false);
        assert_eq!(progress.position(), 2);
        progress.finish(false);
    }
}
