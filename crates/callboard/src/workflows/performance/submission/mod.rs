pub mod router;
pub mod service;
pub mod store;

pub use router::performance_router;
pub use service::{
    CountInput, PerformanceService, SubmissionError, SubmissionReceipt, SubmissionRequest,
    SubmissionSettings, MAX_DAILY_COUNT,
};
pub use store::{PerformanceStore, RecordListener, StoreError};
