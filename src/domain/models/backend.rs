use anyhow::Result;
use async_trait::async_trait;

use super::AnalyzedResume;
use super::ClientError;
use super::MarketData;
use super::Resource;
use super::StudentProfile;
use super::StudentRecord;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Used at startup to warn early when the API isn't reachable.
    async fn health_check(&self) -> Result<()>;

    /// Looks up a student by id. Any non-success status means the backend
    /// doesn't know the id, and is reported as `ClientError::InvalidSession`.
    async fn get_student(&self, student_id: &str) -> Result<StudentRecord, ClientError>;

    /// Submits raw resume text for analysis. On success the backend has
    /// created a new student and returns its id with the initial record.
    async fn analyze_resume(&self, text: &str) -> Result<AnalyzedResume, ClientError>;

    /// Marks a learning pathway skill as completed.
    async fn update_progress(&self, student_id: &str, skill: &str) -> Result<(), ClientError>;

    /// Replaces the stored profile with the fields provided.
    async fn update_profile(
        &self,
        student_id: &str,
        profile: &StudentProfile,
    ) -> Result<(), ClientError>;

    async fn get_resources(&self, skill: &str) -> Result<Vec<Resource>, ClientError>;

    async fn get_market_data(&self) -> Result<MarketData, ClientError>;
}

pub type BackendBox = Box<dyn Backend>;
