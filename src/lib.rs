pub mod config;
pub mod decode;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;

pub use config::ReaderConfig;
pub use decode::{decode, decode_reading};
pub use error::{BandRole, ReaderError};
pub use models::{BandColor, BoundingBox, Moments, Outline, Reading, ResistanceValue};
pub use pipeline::{BandAnalysis, DebugConfig, NormalizedFrame, PipelineContext, ReadingReport, ResistorReader};
