use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tracing::{debug, info, instrument, warn};

use super::client::{GenaiJudgeClient, JudgeClient, JudgeEndpoint, OpenRouterJudgeClient};
use super::error::TransportError;
use super::types::{JudgeQuery, JudgeSpec};
use crate::config::{Config, ConfigError, JudgeTransport};
use crate::constants::MAX_JUDGE_STAGGER_MS;
use crate::parsing::{JudgeResponse, ResponseParser};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A configured judge: its static spec plus the transport used to reach it.
#[derive(Clone)]
pub struct Judge {
    pub spec: JudgeSpec,
    pub client: Arc<dyn JudgeClient>,
}

impl Judge {
    pub fn new(spec: JudgeSpec, client: Arc<dyn JudgeClient>) -> Self {
        Self { spec, client }
    }
}

impl std::fmt::Debug for Judge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Judge").field("spec", &self.spec).finish()
    }
}

/// Concurrent fan-out over the configured judges.
///
/// Every eligible judge gets exactly one attempt bounded by `timeout`. Launches are
/// staggered by `stagger` and the pool waits for all calls to settle; a failing or
/// slow judge is recorded as a failed [`JudgeResponse`] and never affects the others.
#[derive(Debug, Clone)]
pub struct JudgePool {
    judges: Vec<Judge>,
    timeout: Duration,
    stagger: Duration,
}

impl JudgePool {
    /// `stagger` is capped at [`MAX_JUDGE_STAGGER_MS`].
    pub fn new(judges: Vec<Judge>, timeout: Duration, stagger: Duration) -> Self {
        let max_stagger = Duration::from_millis(MAX_JUDGE_STAGGER_MS);
        if stagger > max_stagger {
            warn!(?stagger, ?max_stagger, "Judge stagger too large, capping");
        }
        Self {
            judges,
            timeout,
            stagger: stagger.min(max_stagger),
        }
    }

    /// Builds the pool and its transports from configuration.
    ///
    /// Fails with [`ConfigError`] when no judge is configured or the OpenRouter transport
    /// has no credential; callers treat that as "judge path disabled".
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        if config.judges.is_empty() {
            return Err(ConfigError::NoJudgesConfigured);
        }

        let judges = match config.judge_transport {
            JudgeTransport::OpenRouter => {
                let api_key = config
                    .api_key
                    .clone()
                    .filter(|k| !k.trim().is_empty())
                    .ok_or(ConfigError::MissingEnvVar {
                        name: Config::ENV_OPENROUTER_API_KEY,
                    })?;

                let endpoint = Arc::new(JudgeEndpoint {
                    base_url: config.judge_base_url.clone(),
                    api_key,
                    site_url: config.site_url.clone(),
                    site_name: config.site_name.clone(),
                });

                let http = reqwest::Client::builder()
                    .connect_timeout(CONNECT_TIMEOUT)
                    .build()
                    .map_err(|e| ConfigError::HttpClient {
                        reason: e.to_string(),
                    })?;

                config
                    .judges
                    .iter()
                    .map(|spec| {
                        let client =
                            OpenRouterJudgeClient::new(http.clone(), endpoint.clone(), &spec.id);
                        Judge::new(spec.clone(), Arc::new(client))
                    })
                    .collect()
            }
            JudgeTransport::Native => {
                let client = genai::Client::default();
                config
                    .judges
                    .iter()
                    .map(|spec| {
                        let judge_client = GenaiJudgeClient::new(client.clone(), &spec.id);
                        Judge::new(spec.clone(), Arc::new(judge_client))
                    })
                    .collect()
            }
        };

        info!(
            judges = config.judges.len(),
            transport = ?config.judge_transport,
            timeout_secs = config.judge_timeout.as_secs(),
            "Judge pool configured"
        );

        Ok(Self::new(judges, config.judge_timeout, config.judge_stagger))
    }

    pub fn len(&self) -> usize {
        self.judges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.judges.is_empty()
    }

    pub fn specs(&self) -> impl Iterator<Item = &JudgeSpec> {
        self.judges.iter().map(|j| &j.spec)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// One query per judge able to handle the supplied inputs.
    ///
    /// With text, every judge is eligible and image-capable judges also receive the
    /// image. Without text, only image-capable judges are eligible. With neither, none.
    pub fn build_queries(&self, text: Option<&str>, image: Option<&[u8]>) -> Vec<JudgeQuery> {
        self.eligible(text, image)
            .into_iter()
            .map(|(_, query)| query)
            .collect()
    }

    fn eligible(&self, text: Option<&str>, image: Option<&[u8]>) -> Vec<(&Judge, JudgeQuery)> {
        let text = text.map(str::trim).filter(|t| !t.is_empty());
        let image: Option<Arc<[u8]>> = image.filter(|b| !b.is_empty()).map(Arc::from);

        self.judges
            .iter()
            .filter_map(|judge| {
                let supports_image = judge.spec.modality.supports_image();
                let attached = image.clone().filter(|_| supports_image);

                if text.is_none() && attached.is_none() {
                    return None;
                }
                if attached.is_none() && image.is_some() {
                    debug!(judge_id = %judge.spec.id, "Judge is text only, image not sent");
                }

                Some((
                    judge,
                    JudgeQuery {
                        judge_id: judge.spec.id.clone(),
                        subject_text: text.unwrap_or_default().to_string(),
                        image: attached,
                        supports_image,
                    },
                ))
            })
            .collect()
    }

    /// Queries every eligible judge concurrently and returns one response per judge,
    /// in configuration order. An empty result means no judge was eligible.
    #[instrument(skip(self, text, image), fields(judges = self.judges.len()))]
    pub async fn query(&self, text: Option<&str>, image: Option<&[u8]>) -> Vec<JudgeResponse> {
        let eligible = self.eligible(text, image);
        if eligible.is_empty() {
            info!("No eligible judges for this input, judge verification skipped");
            return Vec::new();
        }

        info!(requests = eligible.len(), "Sending judge requests concurrently");

        let timeout = self.timeout;
        let calls = eligible.into_iter().enumerate().map(|(idx, (judge, query))| {
            let launch_delay = self
                .stagger
                .saturating_mul(u32::try_from(idx).unwrap_or(u32::MAX));
            async move {
                if !launch_delay.is_zero() {
                    tokio::time::sleep(launch_delay).await;
                }
                ask_one(judge, query, timeout).await
            }
        });

        let responses = join_all(calls).await;

        let failed = responses.iter().filter(|r| !r.succeeded).count();
        info!(
            received = responses.len(),
            failed, "Judge responses received"
        );

        responses
    }
}

async fn ask_one(judge: &Judge, query: JudgeQuery, timeout: Duration) -> JudgeResponse {
    let prompt = query.prompt();
    let started = Instant::now();

    let outcome = tokio::time::timeout(timeout, judge.client.ask(&prompt, query.image())).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(Ok(raw_text)) => {
            debug!(judge_id = %query.judge_id, elapsed_ms, raw = %raw_text, "Judge answered");
            ResponseParser::parse(&query.judge_id, &raw_text)
        }
        Ok(Err(e)) => {
            warn!(judge_id = %query.judge_id, elapsed_ms, error = %e, "Judge call failed");
            JudgeResponse::transport_error(&query.judge_id, e.to_string())
        }
        Err(_) => {
            let e = TransportError::Timeout { timeout };
            warn!(judge_id = %query.judge_id, elapsed_ms, error = %e, "Judge call timed out");
            JudgeResponse::transport_error(&query.judge_id, e.to_string())
        }
    }
}
