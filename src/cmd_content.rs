//! Content subcommands: query, upload, similar, delete, fetch.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use forgor_config::Config;
use forgor_runloop::PageContext;

use crate::context::build_session;
use crate::sink::LogBadgeSink;

pub(crate) async fn query(config: &Config, text: &str) -> anyhow::Result<()> {
    let session = build_session(config, Arc::new(LogBadgeSink))?;
    let outcome = session.poller().has_results_for(text).await;
    let Some(data) = outcome.data else {
        anyhow::bail!("Relevance check failed; run with RUST_LOG=debug for details");
    };
    if outcome.has {
        println!("{} relevant item(s)", data.len());
        println!("{}", serde_json::to_string_pretty(&data.to_value())?);
    } else {
        println!("Nothing relevant");
    }
    Ok(())
}

pub(crate) async fn upload(
    config: &Config,
    source: &str,
    page_url: &str,
    page_title: &str,
) -> anyhow::Result<()> {
    let session = build_session(config, Arc::new(LogBadgeSink))?;
    let page = PageContext::new(page_url, page_title);
    let source = if is_remote(source) {
        source.to_string()
    } else {
        file_data_url(Path::new(source)).await?
    };
    let reply = session.actions().upload_image(&source, &page).await?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

pub(crate) async fn similar(
    config: &Config,
    image: &Path,
    page_url: &str,
    page_title: &str,
) -> anyhow::Result<()> {
    let session = build_session(config, Arc::new(LogBadgeSink))?;
    let data_url = file_data_url(image).await?;
    let page = PageContext::new(page_url, page_title);
    let results = session.actions().search_similar(&data_url, &page).await?;
    if let Some(query) = &results.query_content {
        println!("Interpreted as: {}", query);
    }
    println!("{} similar item(s)", results.results.len());
    for item in &results.results {
        println!("{}", item);
    }
    Ok(())
}

pub(crate) async fn delete(config: &Config, file_name: &str) -> anyhow::Result<()> {
    let session = build_session(config, Arc::new(LogBadgeSink))?;
    session.actions().delete_file(file_name).await?;
    println!("Deleted {}", file_name);
    Ok(())
}

pub(crate) async fn fetch(config: &Config, name: &str, output: &Path, thumbnail: bool) -> anyhow::Result<()> {
    let session = build_session(config, Arc::new(LogBadgeSink))?;
    let bytes = if thumbnail {
        session.actions().get_thumbnail(name).await?
    } else {
        session.actions().get_file(name).await?
    };
    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

fn is_remote(source: &str) -> bool {
    source.starts_with("data:") || source.starts_with("http://") || source.starts_with("https://")
}

async fn file_data_url(path: &Path) -> anyhow::Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(format!("data:{};base64,{}", mime_for(path), STANDARD.encode(bytes)))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}
