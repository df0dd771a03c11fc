pub mod pathfinder;

use anyhow::Result;

use crate::domain::models::BackendBox;

pub struct BackendManager {}

impl BackendManager {
    /// Builds the API client from the loaded configuration.
    pub fn get() -> Result<BackendBox> {
        return Ok(Box::new(pathfinder::Pathfinder::from_config()?));
    }
}
