use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use mutascan::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Renders core scan progress events as an indicatif bar on stderr.
#[derive(Clone)]
pub struct ScanProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl ScanProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
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
                Progress::ScanStart { total_variants } => {
                    pb.reset();
                    pb.set_length(total_variants);
                    pb.set_position(0);
                    pb.set_style(Self::bar_style());
                    pb.set_message("scanning variants");
                }
                Progress::VariantFinish { label, succeeded } => {
                    if !succeeded {
                        pb.println(format!("  ✗ {label} failed"));
                    }
                    pb.inc(1);
                }
                Progress::ScanFinish => {
                    pb.finish_with_message("scan done");
                }
                Progress::Message(msg) => {
                    pb.println(format!("  {msg}"));
                }
            }
        })
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<18} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Failed to create bar style template")
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for ScanProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
