use reqwest::blocking::Client;
use serde::Serialize;
use spdlog::info;

use crate::error::Result;
use crate::publish::dry_run::{write_draft, BODY_PLACEHOLDER};
use crate::publish::{publish_err, require_token, Platform, PublishMode, Publisher, Receipt, Submission};

const DASHBOARD: &str = "https://dev.to/dashboard";

#[derive(Serialize)]
struct Article<'a> {
    title: &'a str,
    published: bool,
    body_markdown: &'a str,
    tags: &'a [String],
    description: &'a str,
    main_image: &'a str,
    canonical_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    series: Option<&'a str>,
}

#[derive(Serialize)]
struct ArticleRequest<'a> {
    article: Article<'a>,
}

fn article_request<'a>(submission: &'a Submission, body: &'a str) -> ArticleRequest<'a> {
    ArticleRequest {
        article: Article {
            title: &submission.title,
            published: false,
            body_markdown: body,
            tags: &submission.tags,
            description: &submission.description,
            main_image: &submission.main_image,
            canonical_url: &submission.canonical_url,
            series: submission.series.as_deref(),
        }
    }
}

pub struct DevToPublisher {
    api_url: String,
    token: Option<String>,
    client: Client,
}

impl DevToPublisher {
    pub fn new(api_url: &str, token: Option<String>, client: Client) -> Self {
        DevToPublisher {
            api_url: api_url.to_string(),
            token,
            client,
        }
    }
}

impl Publisher for DevToPublisher {
    fn platform(&self) -> Platform {
        Platform::DevTo
    }

    fn publish(&self, submission: &Submission, mode: &PublishMode) -> Result<Receipt> {
        if let PublishMode::DryRun(cache_dir) = mode {
            let payload = serde_json::to_value(article_request(submission, BODY_PLACEHOLDER))
                .map_err(|e| publish_err(Platform::DevTo, e))?;
            let draft_path = write_draft(cache_dir, Platform::DevTo, &submission.body, &self.api_url, &payload)?;
            return Ok(Receipt::DryRun { platform: Platform::DevTo, draft_path });
        }

        let token = require_token(&self.token, Platform::DevTo)?;
        let response = self.client.post(&self.api_url)
            .header("api-key", token)
            .json(&article_request(submission, &submission.body))
            .send()
            .map_err(|e| publish_err(Platform::DevTo, e))?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().unwrap_or_default();
            return Err(publish_err(Platform::DevTo, format!("creating the article failed with {} {}", status, detail)));
        }

        info!("Posted to Dev.to: {}", DASHBOARD);
        Ok(Receipt::Published { platform: Platform::DevTo, dashboard: DASHBOARD.to_string() })
    }
}
