use std::collections::HashMap;

use serde::Deserialize;
use tracing::{error, info, info_span, instrument};

use crate::error::BotError;

/// Whole-file text storage backing a ledger. There is no row-level update:
/// `write` replaces everything `read` returned.
pub trait LedgerStore {
    fn read(&self) -> Result<String, BotError>;
    fn write(&self, content: &str) -> Result<(), BotError>;
}

pub const GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct GistDocument {
    #[serde(default)]
    files: HashMap<String, GistFile>,
}

#[derive(Debug, Deserialize)]
struct GistFile {
    #[serde(default)]
    content: Option<String>,
}

/// A single file inside a GitHub Gist.
#[derive(Debug, Clone)]
pub struct GistStore {
    api_base: String,
    gist_id: String,
    filename: String,
    token: String,
}

impl GistStore {
    pub fn new(gist_id: String, filename: String, token: String) -> Self {
        Self::with_api_base(GITHUB_API.to_string(), gist_id, filename, token)
    }

    pub fn with_api_base(api_base: String, gist_id: String, filename: String, token: String) -> Self {
        Self { api_base, gist_id, filename, token }
    }

    fn url(&self) -> String {
        format!("{}/gists/{}", self.api_base.trim_end_matches('/'), self.gist_id)
    }

    /// Pull our file's content out of a gist API document (no network).
    pub fn content_from_json(&self, body: &str) -> Result<String, String> {
        let doc: GistDocument = serde_json::from_str(body).map_err(|e| format!("invalid gist document: {}", e))?;
        doc.files
            .get(&self.filename)
            .and_then(|f| f.content.clone())
            .ok_or_else(|| format!("gist {} has no file {}", self.gist_id, self.filename))
    }
}

impl LedgerStore for GistStore {
    #[instrument(level = "info", skip(self), fields(gist = %self.gist_id, file = %self.filename))]
    fn read(&self) -> Result<String, BotError> {
        let url = self.url();
        let response = {
            let _span = info_span!("gist_fetch", url = %url).entered();
            ureq::get(&url)
                .header("Authorization", format!("token {}", self.token))
                .header("Accept", "application/vnd.github.v3+json")
                .header("User-Agent", "nfl-gamethread-bot")
                .call()
        };
        let body = response
            .and_then(|resp| resp.into_body().read_to_string())
            .map_err(|e| {
                error!(error = %e, url = %url, "Failed to read gist");
                BotError::http(&url, e)
            })?;
        let content = self.content_from_json(&body).map_err(BotError::Ledger)?;
        info!(bytes = content.len(), "Loaded ledger from gist");
        Ok(content)
    }

    #[instrument(level = "info", skip(self, content), fields(gist = %self.gist_id, file = %self.filename, bytes = content.len()))]
    fn write(&self, content: &str) -> Result<(), BotError> {
        let url = self.url();
        let payload = serde_json::json!({
            "files": { (self.filename.as_str()): { "content": content } }
        });
        match ureq::patch(&url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "nfl-gamethread-bot")
            .send_json(payload)
        {
            Ok(resp) => {
                info!(status = resp.status().as_u16(), "Wrote ledger to gist");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, url = %url, "Failed to write gist");
                Err(BotError::http(&url, e))
            }
        }
    }
}
