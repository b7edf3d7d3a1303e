use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use client_core::{CatalogContext, CourseDialog, DialogOutcome, HomeView, MessagesNotifier};
use shared::domain::{Category, CourseId};
use tokio_stream::StreamExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::load_settings;
use render::render_list;

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Browse and edit the course catalog")]
struct Args {
    /// Backend base URL; overrides config file and environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true, default_value = "catalog.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the beginner and advanced course lists.
    List,
    /// Edit one course and save it.
    Edit(EditArgs),
}

#[derive(clap::Args, Debug)]
struct EditArgs {
    id: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<Category>,
    #[arg(long)]
    long_description: Option<String>,
    /// RFC 3339 timestamp, e.g. 2024-03-01T09:00:00Z.
    #[arg(long)]
    released_at: Option<DateTime<Utc>>,
}

impl EditArgs {
    fn has_changes(&self) -> bool {
        self.description.is_some()
            || self.category.is_some()
            || self.long_description.is_some()
            || self.released_at.is_some()
    }

    fn apply(&self, dialog: &mut CourseDialog) -> Result<()> {
        let form = dialog.form_mut()?;
        if let Some(description) = &self.description {
            form.description = description.clone();
        }
        if let Some(category) = self.category {
            form.category = Some(category);
        }
        if let Some(long_description) = &self.long_description {
            form.long_description = long_description.clone();
        }
        if let Some(released_at) = self.released_at {
            form.released_at = Some(released_at);
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }
    let base_url = settings.base_url()?;
    info!(%base_url, "catalog: using backend");

    let ctx = CatalogContext::http(base_url, settings.request_timeout())
        .context("failed to build http client")?;
    spawn_loading_line(&ctx);
    let home = HomeView::new(ctx);

    let outcome = match args.command.unwrap_or(Command::List) {
        Command::List => match load(&home).await {
            Ok(()) => print_lists(&home),
            Err(err) => Err(err),
        },
        Command::Edit(edit) => edit_course(&home, &edit).await,
    };
    if let Some(banner) = banner_line(&home.context().messages) {
        eprintln!("{banner}");
    }
    outcome
}

/// Mirrors the loading flag onto stderr.
fn spawn_loading_line(ctx: &CatalogContext) {
    let mut loading = ctx.loading.stream();
    tokio::spawn(async move {
        while let Some(is_loading) = loading.next().await {
            if is_loading {
                eprintln!("Loading...");
            }
        }
    });
}

/// The error banner as printed before exit, if one is showing.
fn banner_line(messages: &MessagesNotifier) -> Option<String> {
    messages.latest().map(|message| format!("Error: {message}"))
}

async fn load(home: &HomeView) -> Result<()> {
    home.init()
        .await
        .map(|_| ())
        .map_err(|err| anyhow!(err).context(client_core::LOAD_COURSES_ERROR))
}

fn print_lists(home: &HomeView) -> Result<()> {
    for category in Category::ALL {
        let courses = home
            .context()
            .store
            .courses_in(category)
            .ok_or_else(|| anyhow!("courses have not been loaded"))??;
        print!("{}", render_list(category, &courses));
    }
    Ok(())
}

async fn edit_course(home: &HomeView, edit: &EditArgs) -> Result<()> {
    load(home).await?;

    let id = CourseId::new(edit.id.clone());
    let course = home
        .context()
        .store
        .courses()
        .and_then(|courses| courses.iter().find(|course| course.id == id).cloned())
        .with_context(|| format!("course {id} not found"))?;

    let mut dialog = home.edit_course(course);
    if !edit.has_changes() {
        warn!(course = %id, "catalog: nothing to change, closing dialog");
        dialog.close()?;
        return Ok(());
    }

    edit.apply(&mut dialog)?;
    let saved = dialog.save().await?;
    println!("Saved course {}: {}", saved.id, saved.description);

    let outcome = dialog
        .outcome()
        .cloned()
        .unwrap_or(DialogOutcome::Saved(saved));
    home.handle_dialog_outcome(&outcome)
        .await
        .map_err(|err| anyhow!(err).context(client_core::LOAD_COURSES_ERROR))?;
    print_lists(home)
}
