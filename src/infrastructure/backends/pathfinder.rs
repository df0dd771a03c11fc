#[cfg(test)]
#[path = "pathfinder_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use serde_json::Value;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AnalyzedResume;
use crate::domain::models::Backend;
use crate::domain::models::ClientError;
use crate::domain::models::MarketData;
use crate::domain::models::Resource;
use crate::domain::models::StudentProfile;
use crate::domain::models::StudentRecord;
use crate::domain::models::FALLBACK_REJECTION;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AnalyzeRequest {
    text: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ProgressRequest {
    student_id: String,
    skill: String,
}

/// Pulls a human readable `detail` out of an error body. FastAPI sends a
/// string for `HTTPException` and a list for validation errors; only the
/// former is worth showing.
fn rejection_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|e| return e.as_str()) {
            if !detail.is_empty() {
                return detail.to_string();
            }
        }
    }

    return FALLBACK_REJECTION.to_string();
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    return serde_json::from_str::<T>(body).map_err(|err| {
        tracing::error!(error = ?err, "Malformed response body");
        return ClientError::Transport(err.to_string());
    });
}

pub struct Pathfinder {
    url: String,
    timeout: Duration,
    health_check_timeout: Duration,
    client: reqwest::Client,
}

impl Pathfinder {
    pub fn new(url: &str, timeout: Duration, health_check_timeout: Duration) -> Pathfinder {
        return Pathfinder {
            url: url.to_string(),
            timeout,
            health_check_timeout,
            client: reqwest::Client::new(),
        };
    }

    pub fn from_config() -> Result<Pathfinder> {
        return Ok(Pathfinder::new(
            &Config::get(ConfigKey::ApiURL),
            Duration::from_millis(Config::get_millis(ConfigKey::RequestTimeout)?),
            Duration::from_millis(Config::get_millis(ConfigKey::HealthCheckTimeout)?),
        ));
    }

    /// Joins path segments onto the base URL, percent encoding each one so
    /// ids and skill names can't escape their segment.
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, ClientError> {
        let mut url = reqwest::Url::parse(&self.url)
            .map_err(|err| return ClientError::Transport(err.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| return ClientError::Transport(format!("{} can't be a base URL", self.url)))?
            .pop_if_empty()
            .extend(segments);

        return Ok(url);
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<(u16, String), ClientError> {
        let res = req.timeout(self.timeout).send().await.map_err(|err| {
            tracing::error!(error = ?err, "Request to Pathfinder failed");
            return ClientError::from(err);
        })?;

        let status = res.status().as_u16();
        let body = res.text().await?;
        tracing::debug!(status, body, "Pathfinder response");

        return Ok((status, body));
    }

    /// Shared handling for the write endpoints: 404 means the student no
    /// longer exists, any other failure is the backend refusing the change.
    fn check_update(student_id: &str, status: u16, body: &str) -> Result<(), ClientError> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        if status == 404 {
            return Err(ClientError::InvalidSession(student_id.to_string()));
        }

        return Err(ClientError::BackendRejected(rejection_detail(body)));
    }
}

#[async_trait]
impl Backend for Pathfinder {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        let url = self.endpoint(&[])?;
        let res = self
            .client
            .get(url)
            .timeout(self.health_check_timeout)
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Pathfinder API is not running");
                bail!("Pathfinder API is not running at {}", self.url);
            }
        };

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Pathfinder health check failed");
            bail!("Pathfinder health check failed with status {}", res.status());
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn get_student(&self, student_id: &str) -> Result<StudentRecord, ClientError> {
        let url = self.endpoint(&["student", student_id])?;
        let (status, body) = self.send(self.client.get(url)).await?;

        if !(200..300).contains(&status) {
            tracing::warn!(status, student_id, "Student lookup rejected");
            return Err(ClientError::InvalidSession(student_id.to_string()));
        }

        return parse_body::<StudentRecord>(&body);
    }

    #[allow(clippy::implicit_return)]
    async fn analyze_resume(&self, text: &str) -> Result<AnalyzedResume, ClientError> {
        let url = self.endpoint(&["analyze_resume"])?;
        let req = AnalyzeRequest {
            text: text.to_string(),
        };
        let (status, body) = self.send(self.client.post(url).json(&req)).await?;

        if !(200..300).contains(&status) {
            tracing::warn!(status, "Resume analysis rejected");
            return Err(ClientError::BackendRejected(rejection_detail(&body)));
        }

        let value = parse_body::<Value>(&body)?;
        if value.get("success").and_then(|e| return e.as_bool()) == Some(false) {
            tracing::warn!("Resume analysis reported success=false");
            return Err(ClientError::BackendRejected(rejection_detail(&body)));
        }

        return serde_json::from_value::<AnalyzedResume>(value)
            .map_err(|err| return ClientError::Transport(err.to_string()));
    }

    #[allow(clippy::implicit_return)]
    async fn update_progress(&self, student_id: &str, skill: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["update_progress"])?;
        let req = ProgressRequest {
            student_id: student_id.to_string(),
            skill: skill.to_string(),
        };
        let (status, body) = self.send(self.client.post(url).json(&req)).await?;

        return Pathfinder::check_update(student_id, status, &body);
    }

    #[allow(clippy::implicit_return)]
    async fn update_profile(
        &self,
        student_id: &str,
        profile: &StudentProfile,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&["update_profile", student_id])?;
        let (status, body) = self.send(self.client.post(url).json(profile)).await?;

        return Pathfinder::check_update(student_id, status, &body);
    }

    #[allow(clippy::implicit_return)]
    async fn get_resources(&self, skill: &str) -> Result<Vec<Resource>, ClientError> {
        let url = self.endpoint(&["resources", skill])?;
        let (status, body) = self.send(self.client.get(url)).await?;

        if !(200..300).contains(&status) {
            return Err(ClientError::BackendRejected(rejection_detail(&body)));
        }

        return parse_body::<Vec<Resource>>(&body);
    }

    #[allow(clippy::implicit_return)]
    async fn get_market_data(&self) -> Result<MarketData, ClientError> {
        let url = self.endpoint(&["market_data"])?;
        let (status, body) = self.send(self.client.get(url)).await?;

        if !(200..300).contains(&status) {
            return Err(ClientError::BackendRejected(rejection_detail(&body)));
        }

        return parse_body::<MarketData>(&body);
    }
}
