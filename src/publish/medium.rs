use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, ACCEPT_CHARSET};
use serde::{Deserialize, Serialize};
use spdlog::info;

use crate::error::{PostError, Result};
use crate::publish::dry_run::{write_draft, BODY_PLACEHOLDER};
use crate::publish::{publish_err, require_token, Platform, PublishMode, Publisher, Receipt, Submission};
use crate::rehost::ImageStore;

const DRAFTS_DASHBOARD: &str = "https://medium.com/me/stories/drafts";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MediumPost<'a> {
    title: &'a str,
    content_format: &'a str,
    content: &'a str,
    canonical_url: &'a str,
    tags: &'a [String],
    publish_status: &'a str,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct Me {
    id: String,
}

#[derive(Deserialize)]
struct HostedImage {
    url: String,
}

pub struct MediumPublisher {
    api_url: String,
    token: Option<String>,
    client: Client,
}

impl MediumPublisher {
    pub fn new(api_url: &str, token: Option<String>, client: Client) -> Self {
        MediumPublisher {
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            client,
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = require_token(&self.token, Platform::Medium)?;
        Ok(builder.bearer_auth(token).header(ACCEPT, "application/json"))
    }

    fn author_id(&self) -> Result<String> {
        let response = self.authorized(self.client.get(format!("{}/me", self.api_url)))?
            .send()
            .map_err(|e| publish_err(Platform::Medium, e))?;
        if !response.status().is_success() {
            return Err(publish_err(Platform::Medium, format!("resolving the author failed with {}", response.status())));
        }

        let me: Envelope<Me> = response.json().map_err(|e| publish_err(Platform::Medium, e))?;
        Ok(me.data.id)
    }
}

fn medium_post<'a>(submission: &'a Submission, content: &'a str) -> MediumPost<'a> {
    MediumPost {
        title: &submission.title,
        content_format: "markdown",
        content,
        canonical_url: &submission.canonical_url,
        tags: &submission.tags,
        publish_status: "draft",
    }
}

impl Publisher for MediumPublisher {
    fn platform(&self) -> Platform {
        Platform::Medium
    }

    fn publish(&self, submission: &Submission, mode: &PublishMode) -> Result<Receipt> {
        if let PublishMode::DryRun(cache_dir) = mode {
            let url = format!("{}/users/{{author_id}}/posts", self.api_url);
            let payload = serde_json::to_value(medium_post(submission, BODY_PLACEHOLDER))
                .map_err(|e| publish_err(Platform::Medium, e))?;
            let draft_path = write_draft(cache_dir, Platform::Medium, &submission.body, &url, &payload)?;
            return Ok(Receipt::DryRun { platform: Platform::Medium, draft_path });
        }

        let author_id = self.author_id()?;
        let url = format!("{}/users/{}/posts", self.api_url, author_id);
        let response = self.authorized(self.client.post(&url))?
            .json(&medium_post(submission, &submission.body))
            .send()
            .map_err(|e| publish_err(Platform::Medium, e))?;
        if !response.status().is_success() {
            return Err(publish_err(Platform::Medium, format!("creating the draft failed with {}", response.status())));
        }

        info!("Posted to Medium: {}", DRAFTS_DASHBOARD);
        Ok(Receipt::Published { platform: Platform::Medium, dashboard: DRAFTS_DASHBOARD.to_string() })
    }
}

impl ImageStore for MediumPublisher {
    fn upload(&self, file_name: &str, jpeg: Vec<u8>) -> Result<String> {
        let upload_err = |reason: String| PostError::ImageUpload { name: file_name.to_string(), reason };

        let part = Part::bytes(jpeg)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")
            .map_err(|e| upload_err(e.to_string()))?;
        let form = Form::new().part("image", part);

        let response = self.authorized(self.client.post(format!("{}/images", self.api_url)))?
            .header(ACCEPT_CHARSET, "utf-8")
            .multipart(form)
            .send()
            .map_err(|e| upload_err(e.to_string()))?;
        if !response.status().is_success() {
            return Err(upload_err(format!("server answered {}", response.status())));
        }

        let hosted: Envelope<HostedImage> = response.json().map_err(|e| upload_err(e.to_string()))?;
        Ok(hosted.data.url)
    }
}
