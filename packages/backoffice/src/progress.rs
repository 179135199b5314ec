//! Spinner shown while requests are in flight.

use std::{future::Future, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(100);

/// A spinner on stderr.
///
/// In non-interactive environments (pipes, CI) the spinner is hidden.
#[derive(Debug)]
pub struct Spinner {
    progress: ProgressBar,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        let progress = if is_interactive() {
            let progress = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            progress.set_style(style);
            progress.enable_steady_tick(TICK);
            progress
        } else {
            ProgressBar::hidden()
        };
        progress.set_message(message.into());
        Self { progress }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.progress.set_message(message.into());
    }

    /// Remove the spinner from the terminal.
    pub fn finish(self) {
        self.progress.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.progress.is_finished() {
            self.progress.finish_and_clear();
        }
    }
}

/// Show a spinner with the message until the future completes.
pub async fn spin<T>(message: impl Into<String>, work: impl Future<Output = T>) -> T {
    let spinner = Spinner::start(message);
    let output = work.await;
    spinner.finish();
    output
}

fn is_interactive() -> bool {
    console::Term::stderr().is_term()
}
