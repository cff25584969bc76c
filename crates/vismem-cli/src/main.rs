mod tui;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use vismem_core::auth::provider_from_config;
use vismem_core::backend::{create_backend, HttpBackend};
use vismem_core::config::VismemConfig;
use vismem_core::controller::GalleryController;
use vismem_core::model::{Notice, Screenshot, Severity, UploadFile};
use vismem_core::search::SortKey;
use vismem_core::suggest;

#[derive(Parser)]
#[command(name = "vismem", about = "Vismem: AI screenshot memory client", version)]
enum Cli {
    /// List screenshots in the remote gallery
    List {
        /// Output raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Upload screenshot files to the gallery
    Upload {
        /// Image files to upload (non-image files are skipped)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Search screenshots with a natural-language query
    Search {
        /// Search query
        query: String,
        /// Drop results scored below this threshold (0.0 disables)
        #[arg(long, default_value = "0.0")]
        min_confidence: f32,
        /// Sort order: relevance, date, filename, confidence
        #[arg(short, long, default_value = "relevance")]
        sort: String,
        /// Output raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Delete a screenshot by filename
    Delete {
        /// Exact filename as shown by `vismem list`
        filename: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Backfill image data for screenshots stored without it
    Migrate,
    /// Show keyword suggestions for a query fragment
    Suggest {
        /// Partial query text
        query: String,
    },
    /// Launch the interactive TUI gallery
    Tui,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = VismemConfig::load(Some(&std::env::current_dir()?)).unwrap_or_default();

    let result = run(cli, &config).await;
    if let Err(ref err) = result {
        let friendly = format_connection_error(err, &config);
        if friendly != format!("{}", err) {
            eprintln!("{}", friendly);
            std::process::exit(1);
        }
    }
    result
}

async fn run(cli: Cli, config: &VismemConfig) -> Result<()> {
    match cli {
        Cli::List { json } => {
            let mut gallery = make_gallery(config)?;
            cmd_list(&mut gallery, json).await
        }
        Cli::Upload { files } => {
            let mut gallery = make_gallery(config)?;
            cmd_upload(&mut gallery, &files).await
        }
        Cli::Search {
            query,
            min_confidence,
            sort,
            json,
        } => {
            let mut gallery = make_gallery(config)?;
            cmd_search(&mut gallery, &query, min_confidence, &sort, json).await
        }
        Cli::Delete { filename, yes } => {
            let mut gallery = make_gallery(config)?;
            cmd_delete(&mut gallery, &filename, yes).await
        }
        Cli::Migrate => {
            let mut gallery = make_gallery(config)?;
            cmd_migrate(&mut gallery).await
        }
        Cli::Suggest { query } => cmd_suggest(&query),
        Cli::Tui => tui::run_tui(config).await,
    }
}

fn make_gallery(config: &VismemConfig) -> Result<GalleryController<HttpBackend>> {
    let backend = create_backend(config).context("failed to create backend client")?;
    Ok(GalleryController::new(
        backend,
        provider_from_config(&config.auth),
    ))
}

/// Format connection failures with a pointer at the configured backend.
fn format_connection_error(err: &anyhow::Error, config: &VismemConfig) -> String {
    let msg = format!("{:#}", err);
    let is_connection = msg.contains("connection refused")
        || msg.contains("Connection refused")
        || msg.contains("timed out")
        || msg.contains("connect error")
        || msg.contains("dns error");
    if is_connection {
        format!(
            "{}\n\n  Cannot reach the visual memory service at {}.\n  Check [backend].base_url in your config.\n",
            "Error: backend unavailable".red(),
            config.backend.base_url,
        )
    } else {
        format!("{}", err)
    }
}

fn print_notice(notice: Option<&Notice>) {
    if let Some(n) = notice {
        match n.severity {
            Severity::Info => println!("{}", n.text.green()),
            Severity::Error => eprintln!("{}", n.text.red()),
        }
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

async fn cmd_list(gallery: &mut GalleryController<HttpBackend>, json: bool) -> Result<()> {
    gallery.load_screenshots().await?;

    let screenshots = gallery.screenshots();
    if screenshots.is_empty() {
        if json {
            println!("[]");
        } else {
            println!("{}", "No screenshots uploaded yet.".dimmed());
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(screenshots)?);
        return Ok(());
    }

    println!(
        "{:<40} {:<20} {:<12} {}",
        "Filename".dimmed(),
        "Uploaded".dimmed(),
        "Preview".dimmed(),
        "Text".dimmed()
    );
    for shot in screenshots {
        let preview = gallery
            .previews()
            .get(&shot.filename)
            .map(|p| {
                if p.source.is_real() {
                    "image".green().to_string()
                } else {
                    "placeholder".yellow().to_string()
                }
            })
            .unwrap_or_else(|| "none".dimmed().to_string());
        println!(
            "{:<40} {:<20} {:<21} {}",
            shot.filename.cyan(),
            shot.upload_time.format("%Y-%m-%d %H:%M"),
            preview,
            text_snippet(shot)
        );
    }
    println!(
        "\n{} screenshots.",
        screenshots.len().to_string().cyan()
    );
    Ok(())
}

fn text_snippet(shot: &Screenshot) -> String {
    let text = shot.text_content.as_deref().unwrap_or("-");
    let mut snippet: String = text.chars().take(50).collect();
    if text.chars().count() > 50 {
        snippet.push('…');
    }
    snippet.replace('\n', " ")
}

// ---------------------------------------------------------------------------
// upload
// ---------------------------------------------------------------------------

async fn cmd_upload(gallery: &mut GalleryController<HttpBackend>, paths: &[PathBuf]) -> Result<()> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no filename", path.display()))?;
        files.push(UploadFile {
            content_type: guess_content_type(path).to_string(),
            name,
            bytes,
        });
    }
    tracing::debug!(count = files.len(), "upload selection read");

    gallery.upload(files).await?;
    print_notice(gallery.notice());
    Ok(())
}

/// Map a file extension to a MIME type for the multipart upload.
fn guess_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

async fn cmd_search(
    gallery: &mut GalleryController<HttpBackend>,
    query: &str,
    min_confidence: f32,
    sort: &str,
    json: bool,
) -> Result<()> {
    let sort_key: SortKey = sort.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;
    gallery.set_min_confidence(min_confidence);
    gallery.set_sort_key(sort_key);
    gallery.query_changed(query);
    gallery.search().await?;

    let results = gallery.results();
    if results.is_empty() {
        if json {
            println!("[]");
        } else {
            print_notice(gallery.notice());
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    println!(
        "{:<6} {:<40} {:<20} {}",
        "Score".dimmed(),
        "Filename".dimmed(),
        "Uploaded".dimmed(),
        "Description".dimmed()
    );
    for result in results {
        let score_colored = if result.confidence_score >= 0.7 {
            format!("{:<6.2}", result.confidence_score).green().to_string()
        } else if result.confidence_score >= 0.4 {
            format!("{:<6.2}", result.confidence_score).yellow().to_string()
        } else {
            format!("{:<6.2}", result.confidence_score).red().to_string()
        };
        println!(
            "{} {:<40} {:<20} {}",
            score_colored,
            result.filename().cyan(),
            result.screenshot.upload_time.format("%Y-%m-%d %H:%M"),
            result.visual_description
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

async fn cmd_delete(
    gallery: &mut GalleryController<HttpBackend>,
    filename: &str,
    yes: bool,
) -> Result<()> {
    // Deletion resolves against the current gallery listing.
    gallery.load_screenshots().await?;

    if !yes {
        print!("Delete \"{}\" from the remote gallery? [y/N] ", filename);
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        let answer = answer.trim().to_lowercase();
        if answer != "y" && answer != "yes" {
            println!("{}", "Aborted.".dimmed());
            return Ok(());
        }
    }

    gallery.delete(filename).await?;
    print_notice(gallery.notice());
    Ok(())
}

// ---------------------------------------------------------------------------
// migrate
// ---------------------------------------------------------------------------

async fn cmd_migrate(gallery: &mut GalleryController<HttpBackend>) -> Result<()> {
    gallery.migrate().await?;
    print_notice(gallery.notice());
    Ok(())
}

// ---------------------------------------------------------------------------
// suggest
// ---------------------------------------------------------------------------

fn cmd_suggest(query: &str) -> Result<()> {
    let suggestions = suggest::suggestions_for(query);
    if suggestions.is_empty() {
        println!("{}", "No suggestions.".dimmed());
        return Ok(());
    }
    for s in suggestions {
        println!("{}", s);
    }
    Ok(())
}
