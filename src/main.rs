mod app;
mod config;
mod domain;
mod logging;
mod notify;
mod repo;
mod usecase;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::info;

use app::App;
use config::{Config, RawConfig};
use domain::report::Summary;
use notify::Delivery;
use notify::teams::TeamsWebhook;
use repo::gitlab::GitlabClient;
use repo::memory::{DEMO_NOW, InMemoryPlatform};

#[derive(Parser, Debug)]
#[command(author, version, about = "review-reminder: nudge reviewers about open GitLab merge requests", long_about = None)]
struct Args {
    /// GitLab API base URL, including `/api/v4`
    #[arg(long, env = "GITLAB_API_URL")]
    api_url: Option<String>,

    /// GitLab access token
    #[arg(long, env = "GITLAB_PRIVATE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Comma-separated project names, paths or ids
    #[arg(long, env = "GITLAB_PROJECT")]
    projects: Option<String>,

    /// Teams incoming webhook URL
    #[arg(long, env = "TEAMS_WEBHOOK_URL", hide_env_values = true)]
    webhook_url: Option<String>,

    /// JSON object mapping usernames to emails, for users without a public email
    #[arg(long, env = "USER_EMAILS")]
    user_emails: Option<String>,

    /// Weekdays without activity before a merge request is flagged as old
    #[arg(long, env = "STALE_AFTER_DAYS", default_value_t = 2)]
    stale_after_days: u32,

    /// Print the card instead of posting it
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Run against built-in sample data (implies --dry-run)
    #[arg(long, default_value_t = false)]
    demo: bool,

    /// Debug logging for this tool
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn raw_config(&self) -> RawConfig {
        RawConfig {
            api_url: self.api_url.clone(),
            token: self.token.clone(),
            projects: self.projects.clone(),
            webhook_url: self.webhook_url.clone(),
            user_emails: self.user_emails.clone(),
            stale_after_days: self.stale_after_days,
            dry_run: self.dry_run,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::configure_logging(args.verbose)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow!("failed to build tokio runtime: {e}"))?;
    let summary = rt.block_on(run(&args))?;

    println!("{summary}");
    Ok(())
}

async fn run(args: &Args) -> Result<Summary> {
    if args.demo {
        info!("running against demo data");
        return App::new(InMemoryPlatform::demo(), Delivery::Stdout, Config::demo())
            .with_now(DEMO_NOW)
            .run()
            .await;
    }

    let config = Config::from_raw(args.raw_config())?;
    let delivery = match &config.webhook_url {
        Some(url) if !args.dry_run => Delivery::Webhook(TeamsWebhook::new(url.as_str())),
        _ => Delivery::Stdout,
    };
    let gitlab = GitlabClient::new(&config.api_url, &config.token)?;

    App::new(gitlab, delivery, config).run().await
}
