use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

use crate::error::{AegisError, Result};
use crate::features::FeatureVector;
use crate::label::MacroLabel;

pub trait TacticalModel: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    action: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpModel {
    client: reqwest::Client,
    url: String,
}

impl HttpModel {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl TacticalModel for HttpModel {
    async fn predict(&self, features: &FeatureVector) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .json(&features.to_json_map())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AegisError::Model(format!("model service returned {status}")));
        }

        let body = response.json::<PredictResponse>().await?;
        Ok(body
            .action
            .unwrap_or_else(|| MacroLabel::DEFAULT.as_str().to_string()))
    }
}

pub async fn resolve_label<M: TacticalModel>(
    model: &M,
    features: &FeatureVector,
    timeout: Duration,
) -> MacroLabel {
    match tokio::time::timeout(timeout, model.predict(features)).await {
        Ok(Ok(raw_label)) => MacroLabel::parse(&raw_label).unwrap_or_else(|| {
            tracing::debug!(label = %raw_label, "Model returned an unknown label");
            MacroLabel::DEFAULT
        }),
        Ok(Err(error)) => {
            tracing::debug!(model_error = %error, "Model prediction failed");
            MacroLabel::DEFAULT
        }
        Err(_) => {
            tracing::debug!(timeout_ms = timeout.as_millis() as u64, "Model prediction timed out");
            MacroLabel::DEFAULT
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{resolve_label, TacticalModel};
    use crate::error::{AegisError, Result};
    use crate::features::FeatureVector;
    use crate::label::MacroLabel;
    use std::time::Duration;

    pub(crate) enum StubModel {
        Answer(&'static str),
        Fail,
        Hang,
    }

    impl TacticalModel for StubModel {
        async fn predict(&self, _features: &FeatureVector) -> Result<String> {
            match self {
                StubModel::Answer(label) => Ok(label.to_string()),
                StubModel::Fail => Err(AegisError::Model("unavailable".to_string())),
                StubModel::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok("SIEGE".to_string())
                }
            }
        }
    }

    const TIMEOUT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn uses_the_model_label_when_recognized() {
        let label =
            resolve_label(&StubModel::Answer("push"), &FeatureVector::default(), TIMEOUT).await;
        assert_eq!(label, MacroLabel::Push);
    }

    #[tokio::test]
    async fn unknown_label_falls_back_to_default() {
        let label =
            resolve_label(&StubModel::Answer("RETREAT"), &FeatureVector::default(), TIMEOUT).await;
        assert_eq!(label, MacroLabel::Farm);
    }

    #[tokio::test]
    async fn model_error_falls_back_to_default() {
        let label = resolve_label(&StubModel::Fail, &FeatureVector::default(), TIMEOUT).await;
        assert_eq!(label, MacroLabel::Farm);
    }

    #[tokio::test]
    async fn slow_model_times_out_to_default() {
        let started = std::time::Instant::now();
        let label = resolve_label(&StubModel::Hang, &FeatureVector::default(), TIMEOUT).await;

        assert_eq!(label, MacroLabel::Farm);
        assert!(started.elapsed() < Duration::from_secs(5), "timeout should cut the call short");
    }
}
