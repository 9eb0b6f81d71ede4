//! Client for the scenario service's project API.
//!
//! The dashboard only forwards: it lists existing movie projects and creates
//! a new one when a workflow is kicked off. Generation itself happens inside
//! the scenario service.

use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Genre {
    #[serde(rename = "drama")]
    Drama,
    #[serde(rename = "comedy")]
    Comedy,
    #[serde(rename = "action")]
    Action,
    #[serde(rename = "sci-fi")]
    SciFi,
    #[serde(rename = "documentary")]
    Documentary,
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::Drama,
        Genre::Comedy,
        Genre::Action,
        Genre::SciFi,
        Genre::Documentary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Drama => "drama",
            Genre::Comedy => "comedy",
            Genre::Action => "action",
            Genre::SciFi => "sci-fi",
            Genre::Documentary => "documentary",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Genre::Drama => "Drama",
            Genre::Comedy => "Comedy",
            Genre::Action => "Action",
            Genre::SciFi => "Science fiction",
            Genre::Documentary => "Documentary",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|genre| genre.as_str() == value.trim())
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST {scenario}/api/movies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub genre: Genre,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub initial_idea: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[async_trait::async_trait]
pub trait ScenarioClient: Send + Sync {
    async fn list_movies(&self) -> Result<Vec<MovieSummary>, String>;
    async fn create_movie(&self, movie: &NewMovie) -> Result<MovieSummary, String>;
}

pub struct ReqwestScenarioClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestScenarioClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn movies_url(&self) -> String {
        format!("{}/api/movies", self.base_url)
    }
}

#[async_trait::async_trait]
impl ScenarioClient for ReqwestScenarioClient {
    async fn list_movies(&self) -> Result<Vec<MovieSummary>, String> {
        let response = self
            .client
            .get(self.movies_url())
            .send()
            .await
            .map_err(|err| format!("request failed: {err}"))?;

        if !response.status().is_success() {
            return Err(format!("request failed: status {}", response.status()));
        }

        response
            .json()
            .await
            .map_err(|err| format!("failed to read movies: {err}"))
    }

    async fn create_movie(&self, movie: &NewMovie) -> Result<MovieSummary, String> {
        let response = self
            .client
            .post(self.movies_url())
            .json(movie)
            .send()
            .await
            .map_err(|err| format!("request failed: {err}"))?;

        if !response.status().is_success() {
            return Err(format!("request failed: status {}", response.status()));
        }

        response
            .json()
            .await
            .map_err(|err| format!("failed to read created movie: {err}"))
    }
}
