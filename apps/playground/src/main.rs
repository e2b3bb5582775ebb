use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use plan_canvas::palette::Locale;
use plan_canvas::persistence::ImportPolicy;
use plan_canvas::{ProjectId, templates};
use programplan_sdk::{EditorSession, SessionConfig};
use programplan_store::{ProjectRepository, ProjectStore};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATABASE_URL: &str = "sqlite:programplan.db";

#[derive(Parser)]
#[command(author, version, about = "Program-plan projects from the terminal", long_about = None)]
struct Cli {
    /// Overrides PROGRAMPLAN_DATABASE_URL
    #[arg(long, global = true)]
    database: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Lang {
    Zh,
    En,
}

impl From<Lang> for Locale {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Zh => Locale::Zh,
            Lang::En => Locale::En,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// List projects, most recently updated first
    List,
    /// Create an empty project
    New { name: String },
    /// Delete a project
    Delete { id: String },
    /// Write every project to a backup file
    Backup { file: PathBuf },
    /// Load every project from a backup file
    Restore { file: PathBuf },
    /// Export a project as a markdown wireframe document
    ExportMd {
        id: String,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Lang::Zh)]
        lang: Lang,
    },
    /// Export a project's graph as JSON
    ExportJson {
        id: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace a project's graph with an exported JSON file
    Import {
        id: String,
        file: PathBuf,
        /// Accept files without an `edges` array
        #[arg(long)]
        snapshot: bool,
    },
    /// Replace a project's graph with a starter template
    Template {
        id: String,
        /// One of: landing, crm, game, mindmap, flowchart, sitemap
        template: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let db_url = cli.database.clone().unwrap_or_else(|| {
        std::env::var("PROGRAMPLAN_DATABASE_URL").unwrap_or(DEFAULT_DATABASE_URL.to_string())
    });
    let store = ProjectStore::new(&db_url)
        .await
        .with_context(|| format!("opening {db_url}"))?;
    tracing::info!(database = %db_url, "Opened project store");
    let repo: Arc<dyn ProjectRepository> = Arc::new(store);

    match cli.command {
        Command::List => {
            let projects = repo.list_summaries().await?;
            if projects.is_empty() {
                println!("No projects.");
            }
            for p in projects {
                println!("{}  {:<30}  updated {}", p.id, p.name, format_millis(p.updated_at));
            }
        }
        Command::New { name } => {
            let session = EditorSession::create(repo, &name, SessionConfig::default()).await?;
            println!("{}", session.project_id().await);
            session.close().await?;
        }
        Command::Delete { id } => {
            repo.delete(&ProjectId::from(id.as_str())).await?;
        }
        Command::Backup { file } => {
            let payload = repo.export_all().await?;
            write(&file, payload.as_bytes()).await?;
        }
        Command::Restore { file } => {
            let payload = read(&file).await?;
            let count = repo.import_all(&payload).await?;
            println!("Restored {count} projects");
        }
        Command::ExportMd { id, out, lang } => {
            let mut config = SessionConfig::default();
            config.export.locale = lang.into();
            let session = open(repo, &id, config).await?;
            match session.export_markdown().await {
                Some(doc) => {
                    let path = out.unwrap_or_else(|| PathBuf::from(&doc.file_name));
                    write(&path, doc.contents.as_bytes()).await?;
                }
                None => println!("Project has no nodes; nothing to export."),
            }
            session.close().await?;
        }
        Command::ExportJson { id, out } => {
            let session = open(repo, &id, SessionConfig::default()).await?;
            let doc = session.export_json().await?;
            let path = out.unwrap_or_else(|| PathBuf::from(&doc.file_name));
            write(&path, doc.contents.as_bytes()).await?;
            session.close().await?;
        }
        Command::Import { id, file, snapshot } => {
            let text = read(&file).await?;
            let policy = if snapshot {
                ImportPolicy::Snapshot
            } else {
                ImportPolicy::Backup
            };
            let session = open(repo, &id, SessionConfig::default()).await?;
            session.import_json(&text, policy).await?;
            let graph = session.graph().await;
            println!("Imported {} nodes, {} edges", graph.nodes.len(), graph.edges.len());
            session.close().await?;
        }
        Command::Template { id, template } => {
            let session = open(repo, &id, SessionConfig::default()).await?;
            if !session.load_template(&template).await {
                let keys: Vec<_> = templates::TEMPLATES.iter().map(|t| t.key).collect();
                session.close().await?;
                bail!("unknown template `{template}` (expected one of {})", keys.join(", "));
            }
            session.close().await?;
        }
    }

    Ok(())
}

fn format_millis(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

async fn open(repo: Arc<dyn ProjectRepository>, id: &str, config: SessionConfig) -> Result<EditorSession> {
    Ok(EditorSession::open(repo, &ProjectId::from(id), config).await?)
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

async fn write(path: &Path, contents: &[u8]) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
