use chrono::{DateTime, Utc};
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::BotConfig;
use crate::digest::Digest;
use crate::error::BotError;
use crate::espn::Espn;
use crate::ledger::GistStore;
use crate::publisher::Publisher;
use crate::report::RunSummary;
use crate::squabblr::Squabblr;
use crate::sync::{ScheduleSync, StandingsSync};
use crate::updater::Updater;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Test,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Workflow {
    Schedule,
    Standings,
    Publish,
    Update,
    Digest,
}

fn default_workflows() -> Vec<Workflow> {
    vec![Workflow::Publish, Workflow::Update]
}

fn default_community() -> String {
    "NFL".to_string()
}

fn default_test_community() -> String {
    "test".to_string()
}

fn default_season_type() -> u8 {
    2
}

fn default_weeks() -> Vec<u8> {
    (1..=18).collect()
}

fn default_lookahead_hours() -> i64 {
    3
}

fn default_post_delay_secs() -> u64 {
    15
}

fn default_update_delay_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub mode: Mode,
    /// Run in order; empty means publish then update.
    #[serde(default)]
    pub workflows: Vec<Workflow>,
    pub schedule_gist_id: String,
    pub standings_gist_id: String,
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default)]
    pub squabblr_token: Option<String>,
    #[serde(default = "default_community")]
    pub community: String,
    #[serde(default = "default_test_community")]
    pub test_community: String,
    pub season: i32,
    #[serde(default = "default_season_type")]
    pub season_type: u8,
    #[serde(default = "default_weeks")]
    pub weeks: Vec<u8>,
    #[serde(default = "default_lookahead_hours")]
    pub lookahead_hours: i64,
    #[serde(default = "default_post_delay_secs")]
    pub post_delay_secs: u64,
    #[serde(default = "default_update_delay_secs")]
    pub update_delay_secs: u64,
}

impl Request {
    pub fn workflows(&self) -> Vec<Workflow> {
        if self.workflows.is_empty() {
            default_workflows()
        } else {
            self.workflows.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
}

/// Run one workflow against the live services.
pub fn run_workflow(workflow: Workflow, config: &BotConfig, now_utc: DateTime<Utc>) -> Result<RunSummary, BotError> {
    let espn = Espn::new(config.season, config.season_type);
    let squabblr = Squabblr::new(config.squabblr_token.clone());
    let schedule = GistStore::new(
        config.schedule_gist.gist_id.clone(),
        config.schedule_gist.filename.clone(),
        config.github_token.clone(),
    );
    let standings = GistStore::new(
        config.standings_gist.gist_id.clone(),
        config.standings_gist.filename.clone(),
        config.github_token.clone(),
    );

    match workflow {
        Workflow::Schedule => ScheduleSync::new(&espn, &schedule, config.weeks.clone()).run(),
        Workflow::Standings => StandingsSync::new(&espn, &standings).run(),
        Workflow::Publish => Publisher::new(config.publisher.clone(), &squabblr, &schedule, &standings).run(now_utc),
        Workflow::Update => {
            Updater::new(config.updater.clone(), &espn, &squabblr, &schedule, &standings).run(now_utc)
        }
        Workflow::Digest => Digest::new(config.digest.clone(), &squabblr, &schedule, &standings).run(now_utc),
    }
}

#[instrument(skip(event))]
pub async fn handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    let payload = event.payload; // Derived from the Lambda event
    let config = BotConfig::from_request(&payload).inspect_err(|e| error!(error = %e, "Invalid configuration"))?;

    // Workflows share the ledgers, so each one finishes before the next starts.
    let mut summaries: Vec<String> = Vec::new();
    for wf in payload.workflows() {
        let config = config.clone();
        let handle = tokio::task::spawn_blocking(move || run_workflow(wf, &config, Utc::now()));
        match handle.await {
            Ok(Ok(summary)) => summaries.push(summary.to_string()),
            Ok(Err(e)) => {
                error!(workflow = ?wf, error = %e, "Workflow aborted");
                summaries.push(format!("{:?} aborted: {}", wf, e));
            }
            Err(e) => summaries.push(format!("Workflow task join error: {}", e)),
        }
    }

    let summary = if summaries.is_empty() {
        "No workflows executed".to_string()
    } else {
        summaries.join("; ")
    };
    info!(summary = %summary, "Invocation finished");

    Ok(Response { message: summary })
}
