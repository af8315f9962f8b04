mod analyze;
mod board;
mod filter;
mod jobs;
mod kanban;
mod models;
mod seed;
mod server;
mod stats;
mod store;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analyze::{AnalysisClient, AnalysisOutcome};
use crate::jobs::JobRepository;
use crate::kanban::KanbanStore;
use crate::models::{JobDraft, JobFilter, JobStatus, SortDirection, SortKey, TaskStatus};
use crate::store::JsonStore;

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Track job applications, a kanban board, and AI resume feedback")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new job application
    Add {
        /// Company name
        #[arg(short, long)]
        company: String,

        /// Job title
        #[arg(short, long)]
        title: String,

        /// Date applied (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Link to the posting
        #[arg(short, long)]
        link: Option<String>,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,

        /// Scheduled follow-up date (YYYY-MM-DD)
        #[arg(short, long)]
        follow_up: Option<String>,

        /// Path to the resume text used for this application
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Initial status
        #[arg(short, long, value_enum, default_value_t = JobStatus::Interested)]
        status: JobStatus,
    },

    /// List applications, filtered and sorted
    List {
        /// Keep only this status
        #[arg(short, long, value_enum)]
        status: Option<JobStatus>,

        /// Case-insensitive substring over company and title
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Sort key
        #[arg(long, value_enum, default_value_t = SortKey::DateApplied)]
        sort: SortKey,

        /// Sort direction
        #[arg(long, value_enum, default_value_t = SortDirection::Desc)]
        direction: SortDirection,
    },

    /// Show one application in full
    Show {
        /// Application id
        id: String,
    },

    /// Edit fields of an existing application
    Edit {
        /// Application id
        id: String,

        #[arg(short, long)]
        company: Option<String>,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long)]
        link: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,

        #[arg(short, long)]
        follow_up: Option<String>,

        #[arg(short, long, value_enum)]
        status: Option<JobStatus>,
    },

    /// Delete an application
    Delete {
        /// Application id
        id: String,
    },

    /// Dashboard aggregates and upcoming reminders
    Stats,

    /// Open the interactive kanban board
    Board,

    /// Manage kanban tasks from the command line
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Get AI feedback on a resume
    Analyze {
        /// Path to a plain-text resume
        file: PathBuf,

        /// Optional job description to tailor against
        #[arg(short, long)]
        job_description: Option<String>,
    },

    /// Run the resume-analysis HTTP proxy
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8787)]
        port: u16,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Add a task to the "todo" column
    Add {
        /// Task text
        text: String,
    },

    /// List tasks by column
    List,

    /// Move a task to another column
    Move {
        /// Task id
        id: String,

        /// Target column
        #[arg(value_enum)]
        to: TaskStatus,
    },

    /// Delete a task
    Delete {
        /// Task id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Add {
            company,
            title,
            date,
            link,
            notes,
            follow_up,
            resume,
            status,
        } => {
            // Input validation lives here at the boundary; the repository
            // accepts any well-formed draft.
            if company.trim().is_empty() {
                bail!("Company name must not be empty");
            }
            if title.trim().is_empty() {
                bail!("Job title must not be empty");
            }

            let resume_text = match resume {
                Some(path) => Some(std::fs::read_to_string(&path).with_context(|| {
                    format!("Failed to read resume file: {}", path.display())
                })?),
                None => None,
            };

            let mut repo = JobRepository::load(JsonStore::open()?)?;
            let draft = JobDraft {
                company_name: company.trim().to_string(),
                job_title: title.trim().to_string(),
                date_applied: date.unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string()),
                job_link: link,
                resume_text,
                status,
                notes,
                follow_up_date: follow_up,
            };
            let job = repo.add(draft)?;
            println!("Added {}: {} at {}", job.id, job.job_title, job.company_name);
        }

        Commands::List {
            status,
            search,
            sort,
            direction,
        } => {
            let repo = JobRepository::load(JsonStore::open()?)?;
            let query = JobFilter {
                status,
                search,
                sort_by: sort,
                sort_direction: direction,
            };
            let rows = filter::apply(repo.list(), &query);

            if rows.is_empty() {
                println!("No job applications found.");
            } else {
                println!(
                    "{:<24} {:<12} {:<28} {:<22} {:<12}",
                    "ID", "STATUS", "TITLE", "COMPANY", "APPLIED"
                );
                println!("{}", "-".repeat(100));
                for job in rows {
                    println!(
                        "{:<24} {:<12} {:<28} {:<22} {:<12}",
                        truncate(&job.id, 22),
                        job.status.to_string(),
                        truncate(&job.job_title, 26),
                        truncate(&job.company_name, 20),
                        truncate(&job.date_applied, 10)
                    );
                }
            }
        }

        Commands::Show { id } => {
            let repo = JobRepository::load(JsonStore::open()?)?;
            match repo.get(&id) {
                Some(job) => {
                    println!("{}", job.id);
                    println!("Title: {}", job.job_title);
                    println!("Company: {}", job.company_name);
                    println!("Status: {}", job.status);
                    println!("Applied: {}", job.date_applied);
                    if let Some(link) = &job.job_link {
                        println!("Link: {link}");
                    }
                    if let Some(follow_up) = &job.follow_up_date {
                        println!("Follow up: {follow_up}");
                    }
                    if let Some(notes) = &job.notes {
                        println!("Notes: {notes}");
                    }
                    if let Some(resume) = &job.resume_text {
                        println!("\n--- Resume Text ---\n{resume}");
                    }
                    println!("Last updated: {}", job.last_updated);
                }
                None => println!("Application '{id}' not found."),
            }
        }

        Commands::Edit {
            id,
            company,
            title,
            date,
            link,
            notes,
            follow_up,
            status,
        } => {
            let mut repo = JobRepository::load(JsonStore::open()?)?;
            let Some(existing) = repo.get(&id) else {
                println!("Application '{id}' not found.");
                return Ok(());
            };

            let mut edited = existing.clone();
            if let Some(company) = company {
                if company.trim().is_empty() {
                    bail!("Company name must not be empty");
                }
                edited.company_name = company.trim().to_string();
            }
            if let Some(title) = title {
                if title.trim().is_empty() {
                    bail!("Job title must not be empty");
                }
                edited.job_title = title.trim().to_string();
            }
            if let Some(date) = date {
                edited.date_applied = date;
            }
            if let Some(link) = link {
                edited.job_link = Some(link);
            }
            if let Some(notes) = notes {
                edited.notes = Some(notes);
            }
            if let Some(follow_up) = follow_up {
                edited.follow_up_date = Some(follow_up);
            }
            if let Some(status) = status {
                edited.status = status;
            }

            if repo.update(edited)? {
                println!("Updated {id}.");
            } else {
                println!("Application '{id}' not found.");
            }
        }

        Commands::Delete { id } => {
            let mut repo = JobRepository::load(JsonStore::open()?)?;
            if repo.delete(&id)? {
                println!("Deleted {id}.");
            } else {
                println!("Application '{id}' not found.");
            }
        }

        Commands::Stats => {
            let repo = JobRepository::load(JsonStore::open()?)?;
            let now = Utc::now();
            let summary = stats::dashboard_stats(repo.list(), now);

            println!("Total applications: {}", summary.total);
            println!("Applied in the last 7 days: {}", summary.recent);
            println!();
            for (status, count) in &summary.by_status {
                println!("{:<12} {}", status.to_string(), count);
            }

            let reminders = stats::upcoming_reminders(repo.list(), now);
            if !reminders.is_empty() {
                println!("\nUpcoming reminders:");
                for reminder in reminders {
                    println!(
                        "  {}  {}",
                        reminder.date.format("%Y-%m-%d"),
                        reminder.title
                    );
                }
            }
        }

        Commands::Board => {
            let mut board = KanbanStore::load(JsonStore::open()?);
            board::run_board(&mut board)?;
        }

        Commands::Task { command } => {
            let mut board = KanbanStore::load(JsonStore::open()?);
            match command {
                TaskCommands::Add { text } => match board.add_task(&text)? {
                    Some(task) => println!("Added {} to To Do", task.id),
                    None => bail!("Task text must not be empty"),
                },
                TaskCommands::List => {
                    for status in TaskStatus::COLUMNS {
                        let tasks = board.column(status);
                        println!("{} ({})", status.label(), tasks.len());
                        for task in tasks {
                            println!("  {:<24} {}", task.id, task.text);
                        }
                    }
                }
                TaskCommands::Move { id, to } => {
                    if board.move_task(&id, to)? {
                        println!("Moved {id} to {}", to.label());
                    } else {
                        println!("Nothing to do for '{id}'.");
                    }
                }
                TaskCommands::Delete { id } => {
                    if board.delete_task(&id)? {
                        println!("Deleted {id}.");
                    } else {
                        println!("Task '{id}' not found.");
                    }
                }
            }
        }

        Commands::Analyze {
            file,
            job_description,
        } => {
            let resume_text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read resume file: {}", file.display()))?;
            if resume_text.trim().is_empty() {
                bail!("Resume file is empty");
            }

            let Some(client) = AnalysisClient::from_env() else {
                bail!(
                    "OPENAI_API_KEY environment variable not set. \
                     Set it with: export OPENAI_API_KEY=your-key-here"
                );
            };

            println!("Analyzing resume...");
            let outcome = client
                .analyze(resume_text.trim(), job_description.as_deref().unwrap_or(""))
                .await?;

            match outcome {
                AnalysisOutcome::Ready(analysis) => {
                    print_section("Strengths", &analysis.strengths);
                    print_section("Improvements", &analysis.improvements);
                    print_section("Tailoring", &analysis.tailoring);
                }
                AnalysisOutcome::Unavailable => {
                    println!("Analysis unavailable: the model response could not be parsed.");
                }
            }
        }

        Commands::Serve { port } => {
            tracing_subscriber::registry()
                .with(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("jobtrack=info,tower_http=info")),
                )
                .with(tracing_subscriber::fmt::layer())
                .init();

            server::serve(port).await?;
        }
    }

    Ok(())
}

fn print_section(title: &str, items: &[String]) {
    println!("\n{title}:");
    if items.is_empty() {
        println!("  (none)");
    }
    for item in items {
        println!("  - {item}");
    }
}

/// Caps a display string at `max` characters, cutting on char boundaries
/// so multibyte company names cannot land mid-code-point.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
