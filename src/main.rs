//! # Weekly Dispatch
//!
//! Assembles the raw material for a weekly energy storage newsletter
//! edition (Europe, US or Australia). Research articles come from the Modo
//! Energy content API and are labelled with a region; industry news comes
//! from RSS/Atom feeds and is filtered for battery and storage relevance.
//! Near-duplicate headlines are flagged for the editor, never removed.
//!
//! ## Usage
//!
//! ```sh
//! weekly_dispatch -j ./json -e us
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Articles**: featured candidates, "more" and "around the world" articles
//! 2. **News**: feeds for the edition's scope plus any custom URLs
//! 3. **Review**: ISO tags, duplicate detection, terminal listings
//! 4. **Output**: the JSON digest for downstream copy generation

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod classify;
mod cli;
mod config;
mod http;
mod models;
mod outputs;
mod scrapers;
mod utils;

use classify::{find_duplicates, tag_isos};
use cli::Cli;
use config::{NewsSources, edition_profile, load_config};
use models::{Digest, NewsScope};
use outputs::newsletter::format_for_newsletter;
use outputs::{json, terminal};
use scrapers::custom::fetch_custom_urls;
use scrapers::modo::ModoClient;
use scrapers::rss::NewsScraper;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("weekly_dispatch starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.json_output_dir, edition = %args.edition, "Parsed CLI arguments");

    // Early check: ensure JSON output dir is writable
    if let Err(e) = ensure_writable_dir(&args.json_output_dir).await {
        error!(
            path = %args.json_output_dir,
            error = %e,
            "JSON output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Config & profile ----
    let sources = match args.config.as_deref() {
        Some(path) => load_config(path)?.news_sources.unwrap_or_else(NewsSources::defaults),
        None => NewsSources::defaults(),
    };
    let profile = edition_profile(args.edition);
    info!(
        edition = %args.edition,
        profile = profile.name,
        feed = profile.article_feed.as_str(),
        covered_isos = ?profile.covered_isos,
        "Edition profile"
    );

    let fetcher = http::default_fetcher(args.max_retries.into())?;
    let modo = ModoClient::new(&fetcher, &args.modo_api_url, &args.modo_article_url);

    // ---- Articles ----
    let featured_candidates = modo
        .get_articles(profile.article_feed, args.days, args.limit)
        .await;
    if featured_candidates.is_empty() {
        warn!(days = args.days, "No featured candidates in the lookback window");
    }
    let featured_articles: Vec<_> = featured_candidates
        .iter()
        .take(args.featured)
        .cloned()
        .collect();
    let more_articles = modo
        .more_articles(profile.article_feed, args.world_days, &featured_articles)
        .await;
    let world_articles = modo.world_articles(args.edition, args.world_days).await;

    // ---- News ----
    let scraper = NewsScraper::new(&fetcher, &sources);
    let scopes: Vec<NewsScope> = if args.news_regions.is_empty() {
        vec![profile.news_scope]
    } else {
        args.news_regions.clone()
    };
    let mut news = match scopes.as_slice() {
        [scope] => scraper.get_news(args.news_days, args.news_limit, *scope).await,
        _ => scraper.get_news_multi(args.news_days, &scopes).await,
    };
    let mut custom_news = fetch_custom_urls(&fetcher, &args.custom_urls).await;

    if profile.show_isos {
        tag_isos(&mut news);
        tag_isos(&mut custom_news);
    }

    // ---- Review ----
    let news_duplicates = find_duplicates(&news, args.threshold);
    let article_duplicates = find_duplicates(&featured_candidates, args.threshold);
    if !news_duplicates.is_empty() {
        warn!(pairs = news_duplicates.len(), "Potential duplicate news headlines");
    }

    println!(
        "{}",
        terminal::render_article_listing(
            &featured_candidates,
            &article_duplicates,
            &format!("Featured candidates ({})", profile.name),
            args.explain
        )
    );
    println!(
        "{}",
        terminal::render_article_listing(&more_articles, &[], "More articles", args.explain)
    );
    println!(
        "{}",
        terminal::render_article_listing(&world_articles, &[], "Around the world", args.explain)
    );
    println!(
        "{}",
        terminal::render_news_listing(&news, &news_duplicates, "Industry news", profile.show_isos)
    );
    if !custom_news.is_empty() {
        println!(
            "{}",
            terminal::render_news_listing(&custom_news, &[], "Custom news", profile.show_isos)
        );
    }

    // Editor picks lead the newsletter section
    let newsletter_news = format_for_newsletter(
        &custom_news.iter().chain(news.iter()).cloned().collect::<Vec<_>>(),
        args.news_items,
    );

    // ---- JSON output ----
    let digest = Digest {
        local_date: Local::now().date_naive().to_string(),
        edition: args.edition,
        featured_candidates,
        featured_articles,
        more_articles,
        world_articles,
        news,
        custom_news,
        newsletter_news,
        news_duplicates,
        article_duplicates,
    };
    match json::write_digest(&digest, &args.json_output_dir).await {
        Ok(path) => info!(path = %path.display(), "Digest ready"),
        Err(e) => {
            error!(error = %e, "Failed to write JSON digest");
            return Err(e);
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
