use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use sensorplace::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders core [`Progress`] events as an `indicatif` spinner or bar on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(target);
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb.reset();
                    pb.set_length(0);
                    pb.set_style(Self::spinner_style());
                    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb.set_message(name.to_string());
                }
                Progress::PhaseFinish => {
                    pb.disable_steady_tick();
                    pb.finish_with_message("✓ Done");
                }
                Progress::TaskStart { total_steps } => {
                    pb.disable_steady_tick();
                    pb.reset();
                    pb.set_length(total_steps);
                    pb.set_position(0);
                    pb.set_style(Self::bar_style());
                }
                Progress::TaskIncrement => {
                    pb.inc(1);
                }
                Progress::TaskFinish => {
                    // The descent usually stops well before its iteration cap.
                    let done = pb.position();
                    pb.set_length(done);
                    pb.finish();
                }
                Progress::StatusUpdate { text } => {
                    pb.set_message(text);
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<24} [{bar:40.cyan/blue}] {pos}/{len} ({secs})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "secs",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.elapsed().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
