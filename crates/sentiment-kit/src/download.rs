//! Resource downloading from Hugging Face and the VADER repository.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::config::ResourceConfig;
use crate::error::SentimentError;

/// Files needed for the sentiment classifier
pub const CLASSIFIER_FILES: &[&str] = &["config.json", "model.safetensors"];

/// Files needed for the subword tokenizer
pub const TOKENIZER_FILES: &[&str] = &["tokenizer.json", "tokenizer_config.json", "vocab.txt"];

/// Anything smaller is treated as a truncated or error-page download.
const MIN_VALID_SIZE: u64 = 100;

/// Download every resource the adapters need into the configured cache.
///
/// Already-downloaded files are kept.
pub async fn prepare_all(config: &ResourceConfig) -> crate::Result<()> {
    download_pattern_lexicon(&config.pattern_lexicon_url, &config.pattern_lexicon_path())
        .await
        .map_err(|e| SentimentError::Download(format!("{:#}", e)))?;

    download_model(&config.tokenizer_model, TOKENIZER_FILES, &config.tokenizer_dir())
        .await
        .map_err(|e| SentimentError::Download(format!("{:#}", e)))?;

    download_model(&config.classifier_model, CLASSIFIER_FILES, &config.classifier_dir())
        .await
        .map_err(|e| SentimentError::Download(format!("{:#}", e)))?;

    download_lexicon(&config.lexicon_url, &config.lexicon_path())
        .await
        .map_err(|e| SentimentError::Download(format!("{:#}", e)))?;

    Ok(())
}

/// Download `files` from a Hugging Face model repository.
///
/// Returns the path to the model directory.
pub async fn download_model(repo: &str, files: &[&str], model_dir: &Path) -> Result<PathBuf> {
    if !model_dir.exists() {
        fs::create_dir_all(model_dir).await?;
        tracing::info!("Created model directory: {}", model_dir.display());
    }

    if check_model_files(model_dir, files).await {
        tracing::info!("{} already downloaded", repo);
        return Ok(model_dir.to_path_buf());
    }

    tracing::info!("Downloading {} from Hugging Face...", repo);
    let client = http_client()?;

    for file in files {
        let dest_path = model_dir.join(file);
        if is_valid_file(&dest_path).await {
            tracing::debug!("{} already exists, skipping", file);
            continue;
        }

        let url = format!("https://huggingface.co/{}/resolve/main/{}", repo, file);
        download_file(&client, &url, &dest_path)
            .await
            .with_context(|| format!("Failed to download {} from {}", file, repo))?;
    }

    if files.contains(&"tokenizer.json") {
        optimize_tokenizer(model_dir).await?;
    }

    tracing::info!("{} download complete", repo);
    Ok(model_dir.to_path_buf())
}

/// Download the VADER lexicon to `dest` unless a valid copy is already there.
pub async fn download_lexicon(url: &str, dest: &Path) -> Result<PathBuf> {
    download_resource("VADER lexicon", url, dest).await
}

/// Download the full pattern lexicon (`en-sentiment.xml`) to `dest` unless a
/// valid copy is already there.
pub async fn download_pattern_lexicon(url: &str, dest: &Path) -> Result<PathBuf> {
    download_resource("pattern lexicon", url, dest).await
}

async fn download_resource(name: &str, url: &str, dest: &Path) -> Result<PathBuf> {
    if is_valid_file(dest).await {
        tracing::info!("{} already downloaded", name);
        return Ok(dest.to_path_buf());
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).await?;
    }

    tracing::info!("Downloading {} from {}...", name, url);
    download_file(&http_client()?, url, dest)
        .await
        .with_context(|| format!("Failed to download {} from {}", name, url))?;

    Ok(dest.to_path_buf())
}

fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?)
}

async fn is_valid_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.len() > MIN_VALID_SIZE)
}

/// Check if all files exist and are valid.
async fn check_model_files(model_dir: &Path, files: &[&str]) -> bool {
    for file in files {
        if !is_valid_file(&model_dir.join(file)).await {
            return false;
        }
    }
    true
}

/// Stream `url` to `dest` through a `.part` file, renamed once complete.
async fn download_file(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    let response = client
        .get(url)
        .send()
        .await?
        .error_for_status()
        .with_context(|| format!("HTTP error downloading {}", url))?;

    let label = dest
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| url.to_string());
    let bar = byte_progress(response.content_length(), label);

    let partial = dest.with_extension(match dest.extension() {
        Some(ext) => format!("{}.part", ext.to_string_lossy()),
        None => "part".to_string(),
    });

    let mut file = File::create(&partial).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                bar.abandon();
                return Err(e.into());
            }
        };
        file.write_all(&chunk).await?;
        bar.inc(chunk.len() as u64);
    }

    file.flush().await?;
    drop(file);
    fs::rename(&partial, dest).await?;

    bar.finish_and_clear();
    tracing::debug!("Saved {} ({} bytes)", dest.display(), bar.position());
    Ok(())
}

fn byte_progress(total: Option<u64>, label: String) -> ProgressBar {
    let (bar, template) = match total {
        Some(total) => (
            ProgressBar::new(total),
            "{msg} [{bar:40}] {bytes}/{total_bytes} ({eta})",
        ),
        None => (ProgressBar::no_length(), "{msg} {spinner} {bytes}"),
    };
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(label);
    bar
}

/// Remove fixed padding and truncation from tokenizer.json.
///
/// Hugging Face tokenizer files may carry `padding: { strategy: { Fixed: N } }`
/// or a truncation length. Width is decided per call by the adapters, so
/// stored settings are dropped.
async fn optimize_tokenizer(model_dir: &Path) -> Result<()> {
    let tokenizer_path = model_dir.join("tokenizer.json");

    let content = fs::read_to_string(&tokenizer_path).await?;
    let mut data: serde_json::Value = serde_json::from_str(&content)?;

    let mut changed = false;
    if let Some(obj) = data.as_object_mut() {
        for key in ["padding", "truncation"] {
            if obj.get(key).is_some_and(|v| !v.is_null()) {
                obj.insert(key.to_string(), serde_json::Value::Null);
                changed = true;
            }
        }
    }

    if changed {
        tracing::info!("Optimizing tokenizer.json - removing stored padding/truncation");
        let optimized = serde_json::to_string_pretty(&data)?;
        fs::write(&tokenizer_path, optimized).await?;
    } else {
        tracing::debug!("Tokenizer already optimized");
    }

    Ok(())
}
