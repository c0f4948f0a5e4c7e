//! Service builders over mock judges and a mock local model.

use std::sync::Arc;
use std::time::Duration;

use credence::{
    DetectionService, Judge, JudgePool, JudgeSpec, LocalClassifierAdapter, MockJudgeClient,
    MockProbabilityModel, Modality, WeightConfig,
};

pub const JUDGE_TIMEOUT: Duration = Duration::from_secs(30);

/// One configured judge with its mock transport.
pub struct MockJudge {
    pub id: &'static str,
    pub modality: Modality,
    pub weight: f64,
    pub client: MockJudgeClient,
}

impl MockJudge {
    pub fn text(id: &'static str, weight: f64, client: MockJudgeClient) -> Self {
        Self {
            id,
            modality: Modality::Text,
            weight,
            client,
        }
    }

    pub fn vision(id: &'static str, weight: f64, client: MockJudgeClient) -> Self {
        Self {
            id,
            modality: Modality::TextImage,
            weight,
            client,
        }
    }
}

pub fn judge_pool(judges: &[MockJudge]) -> JudgePool {
    JudgePool::new(
        judges
            .iter()
            .map(|j| {
                Judge::new(
                    JudgeSpec::new(j.id, j.modality, j.weight),
                    Arc::new(j.client.clone()),
                )
            })
            .collect(),
        JUDGE_TIMEOUT,
        Duration::from_millis(50),
    )
}

pub fn local_model(probability: f64) -> LocalClassifierAdapter {
    LocalClassifierAdapter::new(Arc::new(MockProbabilityModel::returning(probability)))
}

pub fn broken_local_model() -> LocalClassifierAdapter {
    LocalClassifierAdapter::new(Arc::new(MockProbabilityModel::failing(
        "shape mismatch: expected [1, 1], got [1, 2]",
    )))
}

pub fn service(local: LocalClassifierAdapter, judges: &[MockJudge]) -> DetectionService {
    DetectionService::new(local, Some(judge_pool(judges)), WeightConfig::default())
        .expect("service should build")
}
