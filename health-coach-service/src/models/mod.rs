pub mod analysis;

pub use analysis::{AnalysisRequest, AnalysisResult, MessageResponse};
