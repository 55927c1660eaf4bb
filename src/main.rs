use std::path::PathBuf;

use anyhow::Context;

use transcript_watch::{Config, Message, Scraper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (info and above unless RUST_LOG says otherwise)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let config_path = flag_value(&args, "--config").map(PathBuf::from);
    let config = match &config_path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    let scraper = Scraper::open(&config).context("failed to load scraper state")?;

    // --scrape: one scrape, print the candidates, exit
    if args.iter().any(|a| a == "--scrape") {
        scraper.scrape_now().await?;
        print_messages(&scraper.messages().await)?;
        return Ok(());
    }

    // --list: print the stored candidates, exit
    if args.iter().any(|a| a == "--list") {
        print_messages(&scraper.messages().await)?;
        return Ok(());
    }

    // --use <id>: consume one candidate, exit
    if let Some(raw) = flag_value(&args, "--use") {
        let id: u64 = raw
            .parse()
            .with_context(|| format!("invalid message id {:?}", raw))?;
        let message = scraper.use_message(id).await?;
        println!("{}", serde_json::to_string_pretty(&message)?);
        return Ok(());
    }

    scraper.start()?;
    tracing::info!(
        "Watching {} (Ctrl-C to stop)",
        scraper.settings().await.transcript_url()
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    scraper.close().await;

    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn print_messages(messages: &[Message]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(messages)?);
    Ok(())
}
