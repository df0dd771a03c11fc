#[cfg(test)]
#[path = "session_store_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

#[derive(Serialize, Deserialize)]
struct PersistedSession {
    #[serde(rename = "studentId")]
    student_id: String,
}

/// The one piece of state that survives a restart: which student this
/// client currently represents. The file on disk and the in-memory value are
/// only ever changed together, disk first.
#[derive(Debug)]
pub struct SessionStore {
    file_path: path::PathBuf,
    student_id: Option<String>,
}

impl SessionStore {
    pub async fn load(file_path: path::PathBuf) -> SessionStore {
        let student_id = match SessionStore::read(&file_path).await {
            Ok(student_id) => student_id,
            Err(err) => {
                tracing::warn!(
                    error = ?err,
                    path = ?file_path,
                    "Ignoring unreadable session file"
                );
                None
            }
        };

        tracing::debug!(restored = student_id.is_some(), "Session loaded");

        return SessionStore {
            file_path,
            student_id,
        };
    }

    pub async fn load_default() -> SessionStore {
        let file_path = path::PathBuf::from(Config::get(ConfigKey::SessionFile));
        return SessionStore::load(file_path).await;
    }

    async fn read(file_path: &path::Path) -> Result<Option<String>> {
        if !file_path.exists() {
            return Ok(None);
        }

        let payload = fs::read_to_string(file_path).await?;
        let session: PersistedSession = serde_yaml::from_str(&payload)?;
        if session.student_id.is_empty() {
            return Ok(None);
        }

        return Ok(Some(session.student_id));
    }

    pub fn file_path(&self) -> &path::Path {
        return &self.file_path;
    }

    pub fn get(&self) -> Option<&str> {
        return self.student_id.as_deref();
    }

    pub fn is_active(&self) -> bool {
        return self.student_id.is_some();
    }

    pub async fn set(&mut self, student_id: &str) -> Result<()> {
        if student_id.trim().is_empty() {
            bail!("Refusing to store an empty student id");
        }

        let payload = serde_yaml::to_string(&PersistedSession {
            student_id: student_id.to_string(),
        })?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        // Write a sibling then rename so a crash never leaves a half written
        // session behind.
        let tmp_path = self.file_path.with_extension("yaml.tmp");
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(payload.as_bytes()).await?;
        file.sync_all().await?;
        fs::rename(&tmp_path, &self.file_path).await?;

        self.student_id = Some(student_id.to_string());
        tracing::info!(student_id, "Session established");

        return Ok(());
    }

    pub async fn clear(&mut self) -> Result<()> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path).await?;
        }

        if let Some(student_id) = self.student_id.take() {
            tracing::info!(student_id, "Session cleared");
        }

        return Ok(());
    }
}
