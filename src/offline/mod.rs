pub mod dataset;
pub mod record;
pub mod sequencer;
pub mod timeline;

pub use dataset::{build_dataset, DatasetOptions, DatasetReport};
pub use record::MatchRecord;
pub use sequencer::{label_match, LabeledRow};
pub use timeline::MatchTimeline;
