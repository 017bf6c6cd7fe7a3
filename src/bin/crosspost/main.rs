use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use reqwest::blocking::Client;
use spdlog::{info, warn};

use crosspost::assembler::{publish_post, PublishRequest, Targets};
use crosspost::config::{credential, Config, OPENAI_API_KEY};
use crosspost::content::front_matter::split_front_matter;
use crosspost::content::BlogPost;
use crosspost::error::PostError;
use crosspost::logger::configure_logger;
use crosspost::publish::Receipt;
use crosspost::suggest::openai::OpenAiClient;
use crosspost::suggest::prompts::TaskKind;
use crosspost::suggest::{Suggester, TextSuggester};

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "crosspost.toml";

#[derive(Parser, Debug)]
#[command(version, about = "Cross-posts a blog article to Medium and Dev.to", long_about = None)]
struct Cli {
    /// Config path
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Publish a post as a draft on Medium and Dev.to
    Publish(PublishArgs),
    /// Ask a model to rate the post
    Review(SuggestArgs),
    /// Suggest titles for the post
    Title(SuggestArgs),
    /// Suggest descriptions for the post
    Describe(SuggestArgs),
    /// Suggest an introduction for the post
    Introduce(SuggestArgs),
    /// Print the resolved front matter of the post
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct PublishArgs {
    /// Markdown file of the post
    file_path: PathBuf,

    /// URL where the post lives on the blog
    canonical_url: String,

    /// Write what would be sent under the cache directory instead of posting
    #[arg(long)]
    dry_run: bool,

    /// Publish to Medium only
    #[arg(long)]
    only_medium: bool,

    /// Publish to Dev.to only
    #[arg(long)]
    only_dev: bool,
}

#[derive(Args, Debug)]
struct SuggestArgs {
    /// Markdown file of the post
    file_path: PathBuf,

    /// Model to use instead of the configured default
    #[arg(short, long)]
    model: Option<String>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Markdown file of the post
    file_path: PathBuf,
}

fn read_post_file(file_path: &Path) -> Result<String> {
    if !file_path.is_file() {
        return Err(PostError::Usage(format!("The file {} does not exist", file_path.display())).into());
    }
    fs::read_to_string(file_path)
        .with_context(|| format!("Cannot read {}", file_path.display()))
}

fn publish_cmd(config: &Config, args: PublishArgs) -> Result<()> {
    // flags first, nothing is read before they are known to be valid
    let targets = Targets::from_flags(args.only_medium, args.only_dev)?;
    let source = read_post_file(&args.file_path)?;

    let request = PublishRequest {
        source,
        canonical_url: args.canonical_url,
        dry_run: args.dry_run,
        targets,
    };
    let report = publish_post(config, &request)?;

    for receipt in &report.receipts {
        match receipt {
            Receipt::Published { platform, dashboard } => println!("Posted to {}: {}", platform, dashboard),
            Receipt::DryRun { platform, draft_path } => println!("{} draft written to {}", platform, draft_path.display()),
        }
    }
    println!("LinkedIn copy written to {}", report.manual_copy.display());
    if !request.dry_run {
        println!("Remember to post the article on LinkedIn by hand.");
    }

    if let Some((_, err)) = report.failures.into_iter().next() {
        return Err(err.into());
    }
    Ok(())
}

/// Body text for the model. Drafts need no cover image or finished admonitions for this.
fn load_body(config: &Config, file_path: &Path) -> Result<String> {
    let source = read_post_file(file_path)?;
    let (_, body) = split_front_matter(&source, &config.parser.delimiter)?;
    Ok(body)
}

fn suggester(config: &Config, model: Option<&str>) -> Result<Suggester<OpenAiClient>> {
    if let Some(model) = model {
        config.validate_model(model)?;
    }
    let api_key = credential(OPENAI_API_KEY)?;
    let client = OpenAiClient::new(&config.openai.api_url, api_key, Client::new());
    Ok(Suggester::new(client, &config.openai.default_model))
}

fn review_cmd(config: &Config, args: SuggestArgs) -> Result<()> {
    let suggester = suggester(config, args.model.as_deref())?;
    let body = load_body(config, &args.file_path)?;

    let report = suggester.review(&body, args.model.as_deref())?;
    print!("{}", report);
    Ok(())
}

fn suggest_cmd(config: &Config, args: SuggestArgs, task: TaskKind) -> Result<()> {
    let suggester = suggester(config, args.model.as_deref())?;
    let body = load_body(config, &args.file_path)?;

    let candidates = suggester.suggest(&body, task, args.model.as_deref())?;
    match prompt_selection(&task.to_string(), &candidates)? {
        Some(choice) => println!("{}", choice),
        None => info!("No {} selected", task),
    }
    Ok(())
}

fn inspect_cmd(config: &Config, args: InspectArgs) -> Result<()> {
    let source = read_post_file(&args.file_path)?;
    let post = BlogPost::parse_with_delimiter(&source, &config.parser.delimiter)?;
    print!("{}", post.meta.to_yaml()?);
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Selection {
    Pick(usize),
    Abort,
    Invalid,
}

/// `1..=count` picks a candidate, `0` or `none` aborts.
fn parse_selection(input: &str, count: usize) -> Selection {
    let input = input.trim();
    if input.eq_ignore_ascii_case("none") {
        return Selection::Abort;
    }
    match input.parse::<usize>() {
        Ok(0) => Selection::Abort,
        Ok(n) if n <= count => Selection::Pick(n - 1),
        _ => Selection::Invalid,
    }
}

fn prompt_selection<'a>(label: &str, candidates: &'a [String]) -> Result<Option<&'a String>> {
    println!("{} suggestions:", label);
    for (idx, candidate) in candidates.iter().enumerate() {
        println!("  {}) {}", idx + 1, candidate);
    }

    let stdin = io::stdin();
    loop {
        print!("Pick one (0 or 'none' to skip): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match parse_selection(&line, candidates.len()) {
            Selection::Pick(idx) => return Ok(candidates.get(idx)),
            Selection::Abort => return Ok(None),
            Selection::Invalid => println!("Please enter a number between 0 and {}", candidates.len()),
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = open_config(cli.config_path.map(PathBuf::from))?;

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    match cli.command {
        Command::Publish(args) => publish_cmd(&config, args),
        Command::Review(args) => review_cmd(&config, args),
        Command::Title(args) => suggest_cmd(&config, args, TaskKind::Title),
        Command::Describe(args) => suggest_cmd(&config, args, TaskKind::Description),
        Command::Introduce(args) => suggest_cmd(&config, args, TaskKind::Excerpt),
        Command::Inspect(args) => inspect_cmd(&config, args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<PostError>() {
                Some(post_err) => eprintln!("Error [{}]: {}", post_err.category(), post_err),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}
