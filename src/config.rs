use std::time::Duration;

use crate::error::BotError;
use crate::handler::{Mode, Request};

pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const SQUABBLR_TOKEN_VAR: &str = "SQUABBLR_TOKEN";

/// Longest publish window a request may ask for: one week.
pub const MAX_LOOKAHEAD_HOURS: i64 = 7 * 24;

/// Thread Publisher settings.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub community: String,
    /// Games kicking off within this window from now get a thread.
    pub lookahead: chrono::Duration,
    /// Pause between consecutive post creations.
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct DigestConfig {
    pub community: String,
    pub season: i32,
}

#[derive(Debug, Clone)]
pub struct GistConfig {
    pub gist_id: String,
    pub filename: String,
}

/// Everything a run needs, resolved once from the request and environment.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub season: i32,
    pub season_type: u8,
    pub weeks: Vec<u8>,
    pub schedule_gist: GistConfig,
    pub standings_gist: GistConfig,
    pub github_token: String,
    pub squabblr_token: String,
    pub publisher: PublisherConfig,
    pub updater: UpdaterConfig,
    pub digest: DigestConfig,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn secret(
    given: Option<&str>,
    var: &str,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<String, BotError> {
    non_empty(given)
        .or_else(|| non_empty(env(var).as_deref()))
        .ok_or_else(|| BotError::Config(format!("{} not given in request or environment", var)))
}

fn required(value: &str, name: &str) -> Result<String, BotError> {
    non_empty(Some(value)).ok_or_else(|| BotError::Config(format!("{} must be set", name)))
}

impl BotConfig {
    /// Build from the process environment for any tokens the request omits.
    pub fn from_request(req: &Request) -> Result<Self, BotError> {
        Self::from_request_with_env(req, &|name| std::env::var(name).ok())
    }

    pub fn from_request_with_env(req: &Request, env: &dyn Fn(&str) -> Option<String>) -> Result<Self, BotError> {
        if req.lookahead_hours <= 0 || req.lookahead_hours > MAX_LOOKAHEAD_HOURS {
            return Err(BotError::Config(format!(
                "lookahead_hours must be between 1 and {}, got {}",
                MAX_LOOKAHEAD_HOURS, req.lookahead_hours
            )));
        }
        let lookahead = chrono::Duration::try_hours(req.lookahead_hours)
            .ok_or_else(|| BotError::Config(format!("lookahead_hours out of range: {}", req.lookahead_hours)))?;
        if req.weeks.is_empty() {
            return Err(BotError::Config("weeks must name at least one week".to_string()));
        }

        // Select destination community based on request mode
        let community = match req.mode {
            Mode::Test => required(&req.test_community, "test_community")?,
            Mode::Production => required(&req.community, "community")?,
        };

        Ok(Self {
            season: req.season,
            season_type: req.season_type,
            weeks: req.weeks.clone(),
            schedule_gist: GistConfig {
                gist_id: required(&req.schedule_gist_id, "schedule_gist_id")?,
                filename: crate::schedule::SCHEDULE_FILENAME.to_string(),
            },
            standings_gist: GistConfig {
                gist_id: required(&req.standings_gist_id, "standings_gist_id")?,
                filename: crate::standings::STANDINGS_FILENAME.to_string(),
            },
            github_token: secret(req.github_token.as_deref(), GITHUB_TOKEN_VAR, env)?,
            squabblr_token: secret(req.squabblr_token.as_deref(), SQUABBLR_TOKEN_VAR, env)?,
            publisher: PublisherConfig {
                community: community.clone(),
                lookahead,
                delay: Duration::from_secs(req.post_delay_secs),
            },
            updater: UpdaterConfig { delay: Duration::from_secs(req.update_delay_secs) },
            digest: DigestConfig { community, season: req.season },
        })
    }
}
