//! # CLI Layer
//!
//! The **only** place in the workspace that:
//! - Knows about terminal I/O (stdout, stderr, prompts)
//! - Decides the process exit code
//! - Installs the tracing subscriber
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: clap (see `setup.rs`)
//! 2. **Context Setup**: data directory, config, API, first-run initialization
//! 3. **Dispatch**: one handler per subcommand, each a thin call into the API
//! 4. **Output Formatting**: `print.rs`
//! 5. **Policy**: rules the engine leaves to its caller, such as keeping at
//!    least one note

use super::print;
use super::setup::{parse_cli, Cli, Commands};
use anyhow::{anyhow, bail, Context, Result};
use directories::ProjectDirs;
use sidenotes::api::NotesApi;
use sidenotes::autosave::AutoSaver;
use sidenotes::cache::{CacheRouter, HttpFetcher, Request, RouteOutcome};
use sidenotes::commands::{DirSink, InitOutcome};
use sidenotes::config::SidenotesConfig;
use sidenotes::model::{NoteDraft, NoteUpdate, Theme};
use sidenotes::store::FsBackend;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type Api = NotesApi<FsBackend>;

struct AppContext {
    api: Arc<Api>,
    config: SidenotesConfig,
}

pub async fn run() -> Result<()> {
    let cli = parse_cli();
    init_tracing(cli.verbose);

    let ctx = create_context(&cli).await?;
    match cli.command.unwrap_or(Commands::List) {
        Commands::List => handle_list(&ctx).await,
        Commands::Show { id } => handle_show(&ctx, &id).await,
        Commands::New {
            title,
            content,
            tags,
        } => handle_new(&ctx, title, content, tags).await,
        Commands::Edit {
            id,
            title,
            content,
            tags,
            clear_tags,
            stdin,
        } => {
            let mut update = NoteUpdate::new();
            if let Some(title) = title {
                update = update.title(title);
            }
            if let Some(content) = content {
                update = update.content(content);
            }
            if clear_tags {
                update = update.tags(Vec::<String>::new());
            } else if !tags.is_empty() {
                update = update.tags(tags);
            }
            handle_edit(&ctx, &id, update, stdin).await
        }
        Commands::Delete { id, force } => handle_delete(&ctx, &id, force).await,
        Commands::Search { query } => {
            print::print_notes(&ctx.api.search_notes(&query).await);
            Ok(())
        }
        Commands::Tags => {
            print::print_tags(&ctx.api.all_tags().await);
            Ok(())
        }
        Commands::Tagged { tag } => {
            print::print_notes(&ctx.api.notes_by_tag(&tag).await);
            Ok(())
        }
        Commands::Export { dir } => handle_export(&ctx, dir).await,
        Commands::Import { file } => handle_import(&ctx, &file).await,
        Commands::Info => {
            print::print_info(&ctx.api.storage_info().await?);
            Ok(())
        }
        Commands::Settings { theme, autosave_ms } => {
            handle_settings(&ctx, theme, autosave_ms).await
        }
        Commands::Reset { yes } => handle_reset(&ctx, yes).await,
        Commands::Fetch { path, origin } => handle_fetch(&ctx, &path, origin).await,
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug for sidenotes with -v.
fn init_tracing(verbose: bool) {
    let default = if verbose { "sidenotes=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    let dirs = ProjectDirs::from("com", "sidenotes", "sidenotes")
        .ok_or_else(|| anyhow!("Could not determine a data directory; pass --data-dir"))?;
    Ok(dirs.data_dir().to_path_buf())
}

async fn create_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    debug!(data_dir = %data_dir.display(), "Using data directory");

    let config = SidenotesConfig::load(&data_dir)?;
    let api = Arc::new(NotesApi::with_backend(FsBackend::new(&data_dir)));

    match api.initialize().await? {
        InitOutcome::Seeded => debug!("Seeded sample notes"),
        InitOutcome::Migrated { from } => {
            print::print_warning(&format!("Upgraded note collection from schema {from}"))
        }
        InitOutcome::Current => {}
        InitOutcome::Unreadable => print::print_warning(
            "Stored notes could not be read; showing sample notes. The original file is untouched \
             and changes are refused until it is repaired or replaced with `import`.",
        ),
    }

    Ok(AppContext { api, config })
}

async fn handle_list(ctx: &AppContext) -> Result<()> {
    print::print_notes(&ctx.api.list_notes().await);
    Ok(())
}

async fn handle_show(ctx: &AppContext, id: &str) -> Result<()> {
    let note = ctx
        .api
        .get_note(id)
        .await
        .ok_or_else(|| anyhow!("Note not found: {id}"))?;
    print::print_full_note(&note);
    Ok(())
}

async fn handle_new(
    ctx: &AppContext,
    title: Option<String>,
    content: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    let mut draft = NoteDraft::new().tags(tags);
    if let Some(title) = title {
        draft = draft.title(title);
    }
    if let Some(content) = content {
        draft = draft.content(content);
    }
    let note = ctx.api.create_note(draft).await?;
    print::print_success(&format!("Created note {}: {}", note.id, note.title));
    Ok(())
}

async fn handle_edit(ctx: &AppContext, id: &str, update: NoteUpdate, stdin: bool) -> Result<()> {
    if stdin {
        if !update.is_empty() {
            ctx.api.update_note(id, update).await?;
        }
        return stream_content(ctx, id).await;
    }
    if update.is_empty() {
        bail!("Nothing to change: pass --title, --content, --tag, --clear-tags or --stdin");
    }
    let note = ctx.api.update_note(id, update).await?;
    print::print_success(&format!("Updated note {}: {}", note.id, note.title));
    Ok(())
}

/// Feed stdin into the note's content through the debounced saver, one line
/// at a time. Whatever is pending at EOF is flushed.
async fn stream_content(ctx: &AppContext, id: &str) -> Result<()> {
    if ctx.api.get_note(id).await.is_none() {
        bail!("Note not found: {id}");
    }
    let window = ctx.api.settings().await.autosave_window();
    let saver = AutoSaver::new(Arc::clone(&ctx.api), window);

    let mut content = String::new();
    let mut read = 0usize;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if read > 0 {
            content.push('\n');
        }
        read += 1;
        content.push_str(&line);
        saver.edit(id, NoteUpdate::new().content(content.clone())).await;
    }
    saver.flush().await;

    if let Some(error) = saver.last_error() {
        bail!("Failed to save note {id}: {error}");
    }
    print::print_success(&format!(
        "Saved {} bytes to note {} ({} writes)",
        content.len(),
        id,
        saver.commits()
    ));
    Ok(())
}

async fn handle_delete(ctx: &AppContext, id: &str, force: bool) -> Result<()> {
    let notes = ctx.api.list_notes().await;
    if !force && notes.len() == 1 && notes[0].id == id {
        bail!("Refusing to delete the last note; use --force to delete it anyway");
    }
    let note = ctx.api.delete_note(id).await?;
    print::print_success(&format!("Deleted note {}: {}", note.id, note.title));
    Ok(())
}

async fn handle_export(ctx: &AppContext, dir: Option<PathBuf>) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };
    let sink = DirSink::new(&dir);
    let filename = ctx.api.export_backup(&sink).await?;
    let count = ctx.api.list_notes().await.len();
    print::print_success(&format!(
        "Exported {} notes to {}",
        count,
        sink.dir().join(filename).display()
    ));
    Ok(())
}

async fn handle_import(ctx: &AppContext, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let count = ctx.api.import_backup(&raw).await?;
    print::print_success(&format!("Imported {count} notes"));
    Ok(())
}

async fn handle_settings(
    ctx: &AppContext,
    theme: Option<Theme>,
    autosave_ms: Option<u64>,
) -> Result<()> {
    let mut settings = ctx.api.settings().await;
    if theme.is_some() || autosave_ms.is_some() {
        if let Some(theme) = theme {
            settings.theme = theme;
        }
        if let Some(ms) = autosave_ms {
            settings.autosave_ms = ms;
        }
        ctx.api.save_settings(&settings).await?;
    }
    println!("theme       {}", settings.theme);
    println!("autosave    {} ms", settings.autosave_ms);
    Ok(())
}

async fn handle_reset(ctx: &AppContext, yes: bool) -> Result<()> {
    if !yes && !confirm("Delete all notes and settings? [y/N] ")? {
        println!("Aborted.");
        return Ok(());
    }
    ctx.api.clear_all_data().await?;
    print::print_success("All data cleared. Sample notes return on the next run.");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn handle_fetch(ctx: &AppContext, path: &str, origin: Option<String>) -> Result<()> {
    let mut cache = ctx.config.cache.clone();
    if let Some(origin) = origin {
        cache.origin = origin;
    }
    let fetcher = HttpFetcher::from_config(&cache)?;
    let router = CacheRouter::new(cache, fetcher)?;

    // The partitions live for this invocation only; warm them the way a fresh
    // install would so cache-first routes can answer.
    match router.install().await {
        Ok(assets) => debug!(assets, "Install manifest cached"),
        Err(e) => print::print_warning(&format!("Install skipped: {e}")),
    }

    let request = Request::get(router.url(path)?);
    let outcome = router.handle(request).await;
    router.drain_refreshes().await;

    match outcome {
        RouteOutcome::Respond(response) => print::print_response(&response),
        RouteOutcome::Passthrough => println!("Not routed: request bypasses the cache"),
        RouteOutcome::NoResponse => bail!("No response: network unavailable and nothing cached"),
    }
    Ok(())
}
