//! news-tldr CLI - quick digests of news articles
//!
//! The application logic is contained in lib.rs, and this file is
//! responsible for parsing arguments, wiring the configuration, and
//! handling top-level errors.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use news_tldr::model::HfModel;
use news_tldr::{feed, scraper, Config, Summariser, SummaryResult};

#[derive(Parser)]
#[command(name = "news-tldr")]
#[command(author, version, about = "TL;DR and bullet-point digests of news articles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a news article or web page by URL
    Url {
        /// URL of the page to summarise
        url: String,
        /// Approximate maximum number of characters to keep in the TL;DR
        #[arg(long = "max_chars")]
        max_chars: Option<usize>,
    },
    /// Summarise a local text or markdown file
    File {
        /// Path to the .txt or .md file to summarise
        filepath: PathBuf,
        /// Approximate maximum number of characters to keep in the TL;DR
        #[arg(long = "max_chars")]
        max_chars: Option<usize>,
    },
    /// Fetch the configured news feeds and summarise items matching a query
    Digest {
        /// Keyword or phrase to search for in news items (e.g. 'Colchester')
        query: String,
        /// Maximum number of matching articles to summarise
        #[arg(long = "max_articles")]
        max_articles: Option<usize>,
        /// Approximate maximum number of characters to keep in the TL;DR
        #[arg(long = "max_chars")]
        max_chars: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Url { url, max_chars } => {
            let max_chars = max_chars.unwrap_or(config.summary.max_chars);

            println!("Fetching page: {}\n", url);
            let text = scraper::fetch_page_text(&url)
                .await
                .context("error fetching URL")?;

            let summariser = Summariser::new(HfModel::new(&config.model)?);
            let result = summariser.summarise(&text, max_chars).await?;

            print_summary(&result);
        }
        Commands::File { filepath, max_chars } => {
            let max_chars = max_chars.unwrap_or(config.summary.max_chars);

            let bytes = std::fs::read(&filepath)
                .with_context(|| format!("file not found: {}", filepath.display()))?;
            // tolerate invalid UTF-8 rather than refusing the file
            let text = String::from_utf8_lossy(&bytes);

            if text.trim().is_empty() {
                anyhow::bail!("the file is empty or unreadable: {}", filepath.display());
            }

            let summariser = Summariser::new(HfModel::new(&config.model)?);
            let result = summariser.summarise(&text, max_chars).await?;

            print_summary(&result);
        }
        Commands::Digest {
            query,
            max_articles,
            max_chars,
        } => {
            let query = query.trim().to_string();
            if query.is_empty() {
                anyhow::bail!("query must not be empty");
            }
            let max_articles = max_articles.unwrap_or(config.summary.max_articles);
            let max_chars = max_chars.unwrap_or(config.summary.max_chars);

            run_digest(&config, &query, max_articles, max_chars).await?;
        }
    }

    Ok(())
}

/// The digest flow: fetch every configured feed in order, keyword-match
/// the concatenated items, then fetch and summarise the top matches.
///
/// A failing feed or article is a warning, not a fatal error; the digest
/// moves on to the next one.
async fn run_digest(
    config: &Config,
    query: &str,
    max_articles: usize,
    max_chars: usize,
) -> anyhow::Result<()> {
    println!("\n[news-digest] Starting digest");
    println!("Query       : {:?}", query);
    println!("Max articles: {}", max_articles);
    println!("Max chars   : {}", max_chars);
    println!("\nFetching feeds...\n");

    let mut all_items = Vec::new();
    for feed_url in &config.feeds.urls {
        println!("- Fetching feed: {}", feed_url);
        match feed::fetch_feed_items(feed_url).await {
            Ok(items) => {
                println!("  -> {} items retrieved", items.len());
                all_items.extend(items);
            }
            Err(e) => eprintln!("[warning] Failed to fetch feed {}: {}", feed_url, e),
        }
    }

    println!("\nTotal items from all feeds: {}", all_items.len());

    let matches = feed::matching_items(query, &all_items);
    if matches.is_empty() {
        println!("\nNo items matched query {:?}.", query);
        if !all_items.is_empty() {
            println!("Here are a few recent headlines from the feeds:");
            for item in all_items.iter().take(5) {
                println!("- {}", item.title);
            }
        }
        return Ok(());
    }

    println!("\nFound {} matching items.", matches.len());
    println!("Summarising up to {} article(s):\n", max_articles);

    let summariser = Summariser::new(HfModel::new(&config.model)?);

    for (i, item) in matches.iter().take(max_articles).enumerate() {
        println!("================ Article {} ================", i + 1);
        println!("Title: {}", item.title.bold());
        if item.link.is_empty() {
            println!("No link available; skipping summarisation.\n");
            continue;
        }
        println!("Link : {}", item.link);

        let page_text = match scraper::fetch_page_text(&item.link).await {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error fetching article text: {}\n", e);
                continue;
            }
        };

        let result = summariser.summarise(&page_text, max_chars).await?;
        print_summary(&result);
        println!("\n============================================\n");
    }

    Ok(())
}

/// Print a summary result to stdout: TL;DR paragraph, then numbered bullets.
fn print_summary(result: &SummaryResult) {
    println!("\n--- {} ---\n", "TL;DR".bold());
    println!("{}", result.tldr);

    println!("\n--- {} ---\n", "Bullet Points".bold());
    if result.bullet_points.is_empty() {
        println!("No bullet points generated.");
    } else {
        for (i, bullet) in result.bullet_points.iter().enumerate() {
            println!("{}. {}", i + 1, bullet);
        }
    }
}
