mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from resistor_reader for tests
pub use resistor_reader::config::{ClassifierConfig, ReaderConfig, RotationMode, SegmentationConfig};
pub use resistor_reader::detection::{ColorClassifier, ReferenceOutlines};
pub use resistor_reader::{BandColor, Outline, Reading, ReaderError, ResistorReader};
