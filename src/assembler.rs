use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use spdlog::{error, info, warn};
use url::Url;

use crate::config::{credential, Config};
use crate::content::rewrite::{collapse_figcaption_whitespace, remove_curly_brace_content};
use crate::content::BlogPost;
use crate::error::{PostError, Result};
use crate::publish::devto::DevToPublisher;
use crate::publish::medium::MediumPublisher;
use crate::publish::{Platform, PublishMode, Publisher, Receipt, Submission};
use crate::rehost::{HttpImageSource, ImageRehoster};

/// One platform's own copy of the post. Nothing is shared between variants.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformVariant {
    pub platform: Platform,
    pub post: BlogPost,
}

pub struct Variants {
    pub medium: PlatformVariant,
    pub dev: PlatformVariant,
    pub manual: PlatformVariant,
}

impl Variants {
    pub fn from_post(post: BlogPost) -> Variants {
        Variants {
            medium: PlatformVariant { platform: Platform::Medium, post: post.clone() },
            dev: PlatformVariant { platform: Platform::DevTo, post: post.clone() },
            manual: PlatformVariant { platform: Platform::Manual, post },
        }
    }
}

pub fn assemble(raw: &str, delimiter: &str) -> Result<Variants> {
    let post = BlogPost::parse_with_delimiter(raw, delimiter)?;
    info!("Parsed '{}' ({} tags)", post.meta.title, post.meta.tags.len());
    Ok(Variants::from_post(post))
}

impl PlatformVariant {
    /// For sites that take no title metadata, the title goes on top of the body.
    pub fn add_title(&mut self) {
        self.post.content = format!("# {}\n{}", self.post.meta.title, self.post.content);
    }

    /// Caption on the line right after its figure, and no attribute lists.
    pub fn strip_extended_syntax(&mut self) {
        let content = collapse_figcaption_whitespace(&self.post.content);
        self.post.content = remove_curly_brace_content(&content);
    }

    pub fn add_canonical_footer(&mut self, canonical_url: &str) {
        self.post.content.push_str(&format!("\n\n---\n*Originally published on my [blog]({})*", canonical_url));
    }

    /// Medium: title in the body, plain markdown images moved to Medium's own store, attribution footer.
    pub fn prepare_medium(&mut self, canonical_url: &str, rehoster: Option<&ImageRehoster>) -> Result<()> {
        self.add_title();
        self.strip_extended_syntax();
        match rehoster {
            Some(rehoster) => self.post.content = rehoster.rehost(&self.post.content)?,
            None => info!("Skipping image rehosting for {}", self.platform),
        }
        self.add_canonical_footer(canonical_url);
        Ok(())
    }

    /// Dev.to takes title, description and cover image as metadata.
    pub fn prepare_dev(&mut self) {
        self.strip_extended_syntax();
    }

    pub fn submission(&self, canonical_url: &str) -> Submission {
        let meta = &self.post.meta;
        Submission {
            title: meta.title.clone(),
            body: self.post.content.clone(),
            tags: meta.tags.clone(),
            description: meta.description.clone(),
            main_image: meta.main_image.clone(),
            canonical_url: canonical_url.to_string(),
            series: meta.series.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Targets {
    pub medium: bool,
    pub dev: bool,
}

impl Targets {
    pub fn from_flags(only_medium: bool, only_dev: bool) -> Result<Targets> {
        if only_medium && only_dev {
            return Err(PostError::Usage("--only-dev and --only-medium cannot be called together.".to_string()));
        }
        Ok(Targets { medium: !only_dev, dev: !only_medium })
    }

    pub fn platforms(&self) -> Vec<Platform> {
        let mut platforms = vec![];
        if self.medium {
            platforms.push(Platform::Medium);
        }
        if self.dev {
            platforms.push(Platform::DevTo);
        }
        platforms
    }
}

pub struct PublishRequest {
    pub source: String,
    pub canonical_url: String,
    pub dry_run: bool,
    pub targets: Targets,
}

#[derive(Debug)]
pub struct PublishReport {
    pub receipts: Vec<Receipt>,
    pub failures: Vec<(Platform, PostError)>,
    pub manual_copy: PathBuf,
}

impl PublishReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn validate_canonical_url(canonical_url: &str) -> Result<Url> {
    let url = Url::parse(canonical_url).map_err(|_| PostError::InvalidUrl(canonical_url.to_string()))?;
    match (url.scheme(), url.host_str()) {
        ("http" | "https", Some(_)) => Ok(url),
        _ => Err(PostError::InvalidUrl(canonical_url.to_string())),
    }
}

/// The platform side of a publish run. `None` skips the platform.
pub struct Destinations<'a> {
    pub medium: Option<&'a dyn Publisher>,
    pub medium_images: Option<&'a ImageRehoster<'a>>,
    pub dev: Option<&'a dyn Publisher>,
}

/// Specializes each variant and hands it to its publisher. A failing platform is logged and
/// reported, the others still run.
pub fn publish_variants(variants: Variants, canonical_url: &str, mode: &PublishMode,
                        destinations: &Destinations, cache_dir: &Path) -> Result<PublishReport> {
    let Variants { mut medium, mut dev, manual } = variants;
    let mut receipts = vec![];
    let mut failures = vec![];

    if let Some(publisher) = destinations.medium {
        let rehoster = if mode.is_dry_run() { None } else { destinations.medium_images };
        let outcome = medium.prepare_medium(canonical_url, rehoster)
            .and_then(|_| publisher.publish(&medium.submission(canonical_url), mode));
        record(publisher.platform(), outcome, &mut receipts, &mut failures);
    }

    if let Some(publisher) = destinations.dev {
        dev.prepare_dev();
        let outcome = publisher.publish(&dev.submission(canonical_url), mode);
        record(publisher.platform(), outcome, &mut receipts, &mut failures);
    }

    fs::create_dir_all(cache_dir)?;
    let manual_copy = cache_dir.join(Platform::Manual.draft_file_name());
    fs::write(&manual_copy, &manual.post.content)?;
    info!("Copy for {} written to {}", Platform::Manual, manual_copy.display());

    Ok(PublishReport { receipts, failures, manual_copy })
}

fn record(platform: Platform, outcome: Result<Receipt>, receipts: &mut Vec<Receipt>, failures: &mut Vec<(Platform, PostError)>) {
    match outcome {
        Ok(receipt) => receipts.push(receipt),
        Err(e) => {
            error!("{} failed: {}", platform, e);
            failures.push((platform, e));
        }
    }
}

/// Validates the request, checks credentials for every platform that will be called, parses
/// the post and publishes it. Credentials come from the environment.
pub fn publish_post(config: &Config, request: &PublishRequest) -> Result<PublishReport> {
    publish_post_with(config, request, &credential)
}

/// Same as [`publish_post`], with `lookup` resolving a credential variable name to its value.
pub fn publish_post_with(config: &Config, request: &PublishRequest,
                         lookup: &dyn Fn(&str) -> Result<String>) -> Result<PublishReport> {
    validate_canonical_url(&request.canonical_url)?;

    let platforms = request.targets.platforms();
    let mut medium_token = None;
    let mut dev_token = None;
    if !request.dry_run {
        for platform in &platforms {
            let var = platform.credential_var().ok_or_else(|| PostError::Usage(format!("{} cannot be published", platform)))?;
            let token = lookup(var)?;
            match platform {
                Platform::Medium => medium_token = Some(token),
                Platform::DevTo => dev_token = Some(token),
                Platform::Manual => {}
            }
        }
    }

    let variants = assemble(&request.source, &config.parser.delimiter)?;

    let cache_dir = config.cache_dir();
    let mode = if request.dry_run {
        warn!("Dry run: nothing is sent, drafts go to {}", cache_dir.display());
        PublishMode::DryRun(cache_dir.clone())
    } else {
        PublishMode::Live
    };

    let client = Client::new();
    let medium = MediumPublisher::new(&config.medium.api_url, medium_token, client.clone());
    let dev = DevToPublisher::new(&config.dev.api_url, dev_token, client.clone());
    let image_source = HttpImageSource::new(client);
    let rehoster = ImageRehoster::new(&image_source, &medium);

    let destinations = Destinations {
        medium: if request.targets.medium { Some(&medium as &dyn Publisher) } else { None },
        medium_images: Some(&rehoster),
        dev: if request.targets.dev { Some(&dev as &dyn Publisher) } else { None },
    };

    publish_variants(variants, &request.canonical_url, &mode, &destinations, &cache_dir)
}
