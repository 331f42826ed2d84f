use serde::Deserialize;
use tracing::{error, info, instrument};

use crate::error::BotError;
use crate::model::game::ThreadHandle;

/// Write side of the discussion platform.
pub trait ThreadPoster {
    /// Create a post and return its handle.
    fn create(&self, community: &str, title: &str, body: &str) -> Result<ThreadHandle, BotError>;
    /// Replace the body of an existing post.
    fn patch(&self, handle: &ThreadHandle, body: &str) -> Result<(), BotError>;
}

pub const SQUABBLR_BASE: &str = "https://squabblr.co";

#[derive(Debug, Deserialize)]
struct NewPostResponse {
    #[serde(default)]
    data: Vec<CreatedPost>,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    hash_id: String,
}

/// Squabblr API client authenticated with a bearer token.
#[derive(Debug, Clone)]
pub struct Squabblr {
    base_url: String,
    token: String,
}

impl Squabblr {
    pub fn new(token: String) -> Self {
        Self::with_base_url(SQUABBLR_BASE.to_string(), token)
    }

    pub fn with_base_url(base_url: String, token: String) -> Self {
        Self { base_url, token }
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Extract the new post's handle from a `new-post` response body.
    pub fn handle_from_json(body: &str) -> Result<ThreadHandle, BotError> {
        let parsed: NewPostResponse = serde_json::from_str(body).map_err(|e| BotError::Post {
            action: "create post",
            reason: format!("unreadable response: {}", e),
        })?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|p| ThreadHandle::new(p.hash_id))
            .filter(|h| !h.as_str().is_empty())
            .ok_or_else(|| BotError::Post { action: "create post", reason: "response carried no hash_id".to_string() })
    }
}

impl ThreadPoster for Squabblr {
    #[instrument(level = "info", skip(self, body), fields(bytes = body.len()))]
    fn create(&self, community: &str, title: &str, body: &str) -> Result<ThreadHandle, BotError> {
        let url = format!("{}/api/new-post", self.base());
        let form = [("community_name", community), ("title", title), ("content", body)];
        let response = ureq::post(&url)
            .header("Authorization", self.bearer())
            .send_form(form)
            .and_then(|resp| resp.into_body().read_to_string());
        match response {
            Ok(text) => {
                let handle = Self::handle_from_json(&text)?;
                info!(handle = %handle, "Created Squabblr post");
                Ok(handle)
            }
            Err(e) => {
                error!(error = %e, "Failed to create Squabblr post");
                Err(BotError::http(&url, e))
            }
        }
    }

    #[instrument(level = "info", skip(self, body), fields(handle = %handle, bytes = body.len()))]
    fn patch(&self, handle: &ThreadHandle, body: &str) -> Result<(), BotError> {
        let url = format!("{}/api/posts/{}", self.base(), handle);
        let payload = serde_json::json!({ "content": body });
        match ureq::patch(&url).header("Authorization", self.bearer()).send_json(payload) {
            Ok(resp) => {
                info!(status = resp.status().as_u16(), "Patched Squabblr post");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to patch Squabblr post");
                Err(BotError::http(&url, e))
            }
        }
    }
}
