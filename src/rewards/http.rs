//! Blocking HTTP client for the results and gamification services

use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{
    Achievement, Badge, ExperienceUpdate, GamificationService, QuestProgress, StreakUpdate,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::QuizResult;

pub const RESULTS_PATH: &str = "/api/results";
pub const USERS_PATH: &str = "/api/gamification/users";

#[derive(Debug, Serialize, Deserialize)]
pub struct ExperienceRequest {
    pub amount: u32,
    pub reason: String,
}

pub struct HttpGamification {
    client: Client,
    results_url: String,
    gamification_url: String,
}

impl HttpGamification {
    pub fn new(results_url: &str, gamification_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quiz_quest/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            results_url: trim_trailing_slashes(results_url),
            gamification_url: trim_trailing_slashes(gamification_url),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.results_url,
            &config.gamification_url,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn user_url(&self, user_id: &str, action: &str) -> String {
        format!(
            "{}{USERS_PATH}/{}/{action}",
            self.gamification_url,
            urlencoding::encode(user_id)
        )
    }

    fn post<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {url}");
        let response = check_status(url, self.client.post(url).json(body).send()?)?;
        Ok(response.json::<T>()?)
    }
}

fn check_status(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(Error::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}

impl GamificationService for HttpGamification {
    fn save_result(&self, result: &QuizResult) -> Result<()> {
        let url = format!("{}{RESULTS_PATH}", self.results_url);
        debug!("POST {url}");
        check_status(&url, self.client.post(&url).json(result).send()?)?;
        Ok(())
    }

    fn add_experience(
        &self,
        user_id: &str,
        amount: u32,
        reason: &str,
    ) -> Result<ExperienceUpdate> {
        let body = ExperienceRequest {
            amount,
            reason: reason.to_string(),
        };
        self.post(&self.user_url(user_id, "experience"), &body)
    }

    fn update_streak(&self, user_id: &str) -> Result<StreakUpdate> {
        self.post(&self.user_url(user_id, "streak"), &serde_json::json!({}))
    }

    fn check_achievements(&self, user_id: &str, result: &QuizResult) -> Result<Vec<Achievement>> {
        self.post(&self.user_url(user_id, "achievements/check"), result)
    }

    fn check_badges(&self, user_id: &str, result: &QuizResult) -> Result<Vec<Badge>> {
        self.post(&self.user_url(user_id, "badges/check"), result)
    }

    fn update_quest_progress(
        &self,
        user_id: &str,
        result: &QuizResult,
    ) -> Result<Vec<QuestProgress>> {
        self.post(&self.user_url(user_id, "quests/progress"), result)
    }
}

fn trim_trailing_slashes(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}
