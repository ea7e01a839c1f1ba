use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted token bundle, in the "authorized user" shape Google's own
/// tooling writes, so a pre-existing token.json keeps working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    #[serde(rename = "token")]
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredCredential {
    /// Loads a credential from `path`. A missing file is "no credential",
    /// not an error; an unreadable or malformed file is.
    pub fn load(path: &Path) -> anyhow::Result<Option<StoredCredential>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read token file {}", path.display()))?;
        let creds = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse token file {}", path.display()))?;
        Ok(Some(creds))
    }

    /// Overwrites the token file with this credential.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)
            .with_context(|| format!("failed to write token file {}", path.display()))?;
        Ok(())
    }

    /// A credential is valid while its expiry lies in the future. No expiry
    /// on record means nothing contradicts the token, so it counts as valid.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry > now,
            None => true,
        }
    }
}

/// The `installed` stanza of a Google client-secret file, as downloaded from
/// the cloud console for a desktop app.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    installed: ClientSecrets,
}

impl ClientSecrets {
    pub fn load(path: &Path) -> anyhow::Result<ClientSecrets> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read client secrets {}", path.display()))?;
        let file: ClientSecretsFile = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse client secrets {}", path.display()))?;
        Ok(file.installed)
    }
}
