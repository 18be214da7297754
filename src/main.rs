use anyhow::Context;
use clap::Parser;
use headless::{Browser, Config, FormField, HtmlPage, Page};
use reqwest::StatusCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Browse to a url the way a test would and report what came back.
#[derive(Parser, Debug)]
#[command(name = "headless", version)]
struct Args {
    /// Address to request
    url: Url,

    /// Status the final response must have
    #[arg(long, default_value_t = 200)]
    expect: u16,

    /// Maximum redirect hops to follow
    #[arg(long)]
    max_redirects: Option<usize>,

    #[arg(long)]
    user_agent: Option<String>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Config::from_json(&json)?
        }
        None => Config::default(),
    };
    if args.max_redirects.is_some() {
        config.navigation.max_redirects = args.max_redirects;
    }
    if args.user_agent.is_some() {
        config.browser.user_agent = args.user_agent.clone();
    }

    let expected = StatusCode::from_u16(args.expect).context("invalid expected status")?;
    let mut browser = Browser::new(config)?;

    info!(url = %args.url, "browsing");
    let page = match browser
        .browse_to(&args.url, expected, HtmlPage::from_response)
        .await
    {
        Ok(page) => page,
        Err(err) => {
            error!(error = %err, "navigation failed");
            return Err(err.into());
        }
    };

    println!("{}", page.result());
    println!();
    println!("Title: {}", page.title());
    for form in page.forms()? {
        println!(
            "Form '{}' posts to {}",
            form.name(),
            form.post_location()?
        );
        for field in form.fields()? {
            if let Some(field) = field.as_field() {
                println!("  {} = {:?}", field.name(), field.value());
            }
        }
    }

    browser.dispose();
    Ok(())
}
