use chrono::{DateTime, Utc};
use lauread_analysis::feature_builder::FeatureVector;
use lauread_training::{OffsetModel, TrainerConfig, TrainingReport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelFile {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub config: TrainerConfig,
    pub report: TrainingReport,
    pub feature_names: Vec<String>,
    pub model: OffsetModel,
}

impl ModelFile {
    pub(crate) fn new(
        name: String,
        config: TrainerConfig,
        report: TrainingReport,
        model: OffsetModel,
    ) -> Self {
        Self {
            name,
            trained_at: Utc::now(),
            config,
            report,
            feature_names: FeatureVector::NAMES.map(str::to_owned).to_vec(),
            model,
        }
    }

    pub(crate) fn check_features(&self) -> anyhow::Result<()> {
        if self.feature_names != FeatureVector::NAMES {
            anyhow::bail!(
                "model was trained on features {:?}, expected {:?}",
                self.feature_names,
                FeatureVector::NAMES
            );
        }
        Ok(())
    }
}
