/// Progress events emitted while a scan runs.
///
/// The library never draws UI; consumers install a callback and render these
/// however they like (the CLI maps them onto an indicatif bar).
#[derive(Debug, Clone)]
pub enum Progress {
    /// The variant loop is about to start.
    ScanStart { total_variants: u64 },
    /// One variant finished (successfully or not); `label` is its
    /// `<chain><number><orig>-><sub>` tag.
    VariantFinish { label: String, succeeded: bool },
    /// The variant loop is done (or was cancelled).
    ScanFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
