use crate::classifier::classify;
use crate::error::{AegisError, Result};
use crate::features::FeatureVector;
use crate::label::MacroLabel;
use crate::offline::record::MatchRecord;
use crate::offline::timeline::MatchTimeline;
use crate::Side;

pub const DEFAULT_STEP_SECONDS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledRow {
    pub match_id: u64,
    pub t: i64,
    pub features: FeatureVector,
    pub label: MacroLabel,
}

impl LabeledRow {
    pub fn csv_header() -> Vec<&'static str> {
        let mut header = vec!["match_id", "t"];
        header.extend(FeatureVector::COLUMNS);
        header.push("label");
        header
    }

    pub fn csv_record(&self) -> Vec<String> {
        let mut record = vec![self.match_id.to_string(), self.t.to_string()];
        record.extend(self.features.values().iter().map(|value| value.to_string()));
        record.push(self.label.as_str().to_string());
        record
    }
}

pub fn label_match(
    record: &MatchRecord,
    step_seconds: u32,
    own_side: Side,
) -> Result<Vec<LabeledRow>> {
    if step_seconds == 0 {
        return Err(AegisError::InvalidStep);
    }

    let timeline = MatchTimeline::new(record, own_side);
    let rows = (0..record.duration.max(0))
        .step_by(step_seconds as usize)
        .map(|t| {
            let features = timeline.features_at(t);
            LabeledRow {
                match_id: record.match_id,
                t,
                features,
                label: classify(&features),
            }
        })
        .collect();

    Ok(rows)
}
