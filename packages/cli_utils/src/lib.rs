#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the `summit_map` binary.
//!
//! [`IndicatifProgress`] draws the data-loading and assignment bars behind
//! [`ProgressCallback`]. [`init_logger`] routes `log` output through the same
//! [`MultiProgress`] so messages print above the bars.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use summit_map_geography::progress::ProgressCallback;

pub use indicatif::MultiProgress;

const READ_TEMPLATE: &str = "{prefix:>9.cyan.bold} {bar:30.cyan/blue} {pos}/{len} files  {wide_msg:.dim}";
const ASSIGN_WAITING_TEMPLATE: &str = "{prefix:>9.magenta.bold} {spinner} {msg}";
const ASSIGN_TEMPLATE: &str =
    "{prefix:>9.magenta.bold} {bar:30.magenta/white} {pos}/{len} mountains ({per_sec})  {wide_msg:.dim}";

/// Progress bar for one loading stage, reported through [`ProgressCallback`].
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Applied once the mountain total is known.
    counted_style: ProgressStyle,
}

impl IndicatifProgress {
    /// Bar for reading `total` province and mountain files. The message
    /// shows the file being read.
    #[must_use]
    pub fn files_bar(multi: &MultiProgress, message: &str, total: u64) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new(total));
        bar.set_style(
            ProgressStyle::with_template(READ_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_prefix(message.to_string());

        let counted_style = bar.style();

        Arc::new(Self { bar, counted_style })
    }

    /// Bar for attributing mountains to provinces. Spins until the
    /// assigner reports how many mountains it will process.
    #[must_use]
    pub fn batch_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(120));
        bar.set_style(
            ProgressStyle::with_template(ASSIGN_WAITING_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix(message.to_string());

        let counted_style = ProgressStyle::with_template(ASSIGN_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("^^.");

        Arc::new(Self { bar, counted_style })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.disable_steady_tick();
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(self.counted_style.clone());
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs the global logger and returns the [`MultiProgress`] the bars
/// must be added to.
///
/// Logs at `info` unless `RUST_LOG` says otherwise.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // Fails only if a logger is already installed.
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}
