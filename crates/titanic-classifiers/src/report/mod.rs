pub mod console;
pub mod plots;
pub mod report;
pub mod samples;

pub use report::{Report, ReportSection};
pub use samples::{predict_samples, SamplePredictions};
