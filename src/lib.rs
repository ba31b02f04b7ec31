//! ScanBrief - AI security summaries for host-scan data
//!
//! Takes arbitrary scan data, wraps it in an analysis prompt and sends it to
//! one of several chat-completion providers, shaping each request to what the
//! chosen model accepts.

pub mod analysis;
pub mod config;
pub mod error;
pub mod gateway;
pub mod providers;
pub mod utils;

pub use analysis::{AnalysisMetadata, AnalysisReport, AnalysisRequest, Analyzer};
pub use config::Config;
pub use error::{AnalysisError, ErrorKind, Result, ScanbriefError};
pub use providers::{HttpInvoker, LogicalModel, ModelCatalog, ProviderFamily, ProviderInvoker};
