//! Blocking HTTP access to the institution's timetable endpoint.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::{error::FetchError, semester::SemesterType, types::Participant};

const DEFAULT_BASE_URL: &str = "https://isu.uust.ru/";
const SCHEDULE_ENDPOINT: &str = "api/new_schedule_api";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Performs the single GET request against the timetable endpoint.
///
/// Holds no state between calls beyond the reusable HTTP client; one
/// outbound network call per [`HttpFetcher::fetch`] invocation, no retries.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// Fetcher against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Fetcher against a custom base URL, e.g. a mirror or a test server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("uust-schedule/", env!("CARGO_PKG_VERSION")))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert("Accept", "*/*".parse().unwrap());
                headers
            })
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch the raw timetable HTML for one participant and semester.
    pub fn fetch(
        &self,
        participant: Participant,
        academic_year: i32,
        semester: SemesterType,
    ) -> Result<String, FetchError> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            SCHEDULE_ENDPOINT
        );
        tracing::info!(
            "Fetching timetable for {} ({} {})",
            participant,
            semester,
            academic_year
        );

        let response = self
            .client
            .get(&url)
            .query(&query_params(participant, academic_year, semester))
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().map_err(FetchError::Http)?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(body)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Remote semester id: last two digits of the academic year plus the
/// semester digit, e.g. autumn 2023 -> "231".
pub fn schedule_semester_id(academic_year: i32, semester: SemesterType) -> String {
    format!(
        "{:02}{}",
        academic_year.rem_euclid(100),
        semester.semester_id_digit()
    )
}

fn query_params(
    participant: Participant,
    academic_year: i32,
    semester: SemesterType,
) -> [(&'static str, String); 4] {
    [
        ("WhatShow", participant.kind.what_show().to_string()),
        (
            "schedule_semestr_id",
            schedule_semester_id(academic_year, semester),
        ),
        ("weeks", "0".to_string()),
        (participant.kind.id_query_key(), participant.id.to_string()),
    ]
}
