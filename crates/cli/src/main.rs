//! Stride CLI - adaptive progression engine for educational support.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use stride_core::{Outcome, ProgressOwner, ProgressUnit, StudentId, UnitId};
use stride_engine::ProgressionEngine;
use stride_generation::{HttpGenerator, TemplateGenerator, UnitGenerator};
use stride_storage::{BreakdownStore, JsonStorage, PathStore, Storage};
use tokio::sync::Mutex;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "stride")]
#[command(about = "Adaptive progression engine for educational support", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a learning path for a subject
    CreatePath {
        /// Subject to cover
        subject: String,
        /// Student ID (a new one is minted if omitted)
        #[arg(long)]
        student: Option<String>,
    },
    /// Break an assignment down into micro-tasks
    Breakdown {
        /// Reference to the original assignment
        task_id: String,
        /// What the assignment is
        description: String,
        /// Student ID (a new one is minted if omitted)
        #[arg(long)]
        student: Option<String>,
    },
    /// Show an owner (path or breakdown)
    Show {
        /// Owner ID
        id: String,
    },
    /// List an owner's units
    Units {
        /// Owner ID
        id: String,
    },
    /// Mark a unit as started
    Start {
        /// Unit ID
        unit: String,
    },
    /// Complete a unit with a mastery outcome
    Complete {
        /// Unit ID
        unit: String,
        /// Mastery score, 0-100
        score: u8,
        /// Minutes spent
        #[arg(long, default_value = "0")]
        minutes: u32,
    },
    /// Record a non-completing attempt against a unit
    Attempt {
        /// Unit ID
        unit: String,
        /// Score, 0-100
        score: u8,
        /// Minutes spent
        #[arg(long, default_value = "0")]
        minutes: u32,
    },
    /// Skip a unit
    Skip {
        /// Unit ID
        unit: String,
    },
    /// Pause an owner
    Pause {
        /// Owner ID
        id: String,
    },
    /// Resume a paused owner
    Resume {
        /// Owner ID
        id: String,
    },
    /// Re-run propagation and aggregation for an owner
    Repair {
        /// Owner ID
        id: String,
    },
    /// List a student's paths and breakdowns
    List {
        /// Student ID
        student: String,
    },
    /// Show recorded engine events
    Events,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    let storage_path = std::path::PathBuf::from(".stride");
    let storage = Arc::new(Mutex::new(JsonStorage::new(&storage_path).await?));

    // An external content service takes over generation when configured;
    // the deterministic templates cover everything else.
    let (path_generator, steps_generator): (Arc<dyn UnitGenerator>, Arc<dyn UnitGenerator>) =
        match std::env::var("STRIDE_CONTENT_URL") {
            Ok(url) => {
                info!("using content service at {}", url);
                let shared: Arc<dyn UnitGenerator> = Arc::new(HttpGenerator::new(url));
                (shared.clone(), shared)
            }
            Err(_) => (
                Arc::new(TemplateGenerator::concept_path()),
                Arc::new(TemplateGenerator::task_steps()),
            ),
        };

    let paths = ProgressionEngine::new(PathStore::new(storage.clone()), path_generator);
    let breakdowns = ProgressionEngine::new(BreakdownStore::new(storage.clone()), steps_generator);

    match cli.command {
        Commands::CreatePath { subject, student } => {
            let student_id = parse_student(student)?;
            let path = paths.create_path(student_id, &subject).await?;
            println!("Created path: {} ({})", path.id, path.subject);
            println!("  Student: {}", path.student_id);
            println!("  Difficulty: {}", path.difficulty_level);
            print_units(&paths.get_units(path.id).await?);
        }
        Commands::Breakdown {
            task_id,
            description,
            student,
        } => {
            let student_id = parse_student(student)?;
            let breakdown = breakdowns
                .create_breakdown(&task_id, student_id, &description)
                .await?;
            println!("Created breakdown: {}", breakdown.id);
            println!("  Student: {}", breakdown.student_id);
            println!("  Difficulty score: {}", breakdown.difficulty_score);
            println!("  Estimated: {} min", breakdown.total_estimated_minutes);
            println!("  Rationale: {}", breakdown.rationale);
            print_units(&breakdowns.get_units(breakdown.id).await?);
        }
        Commands::Show { id } => {
            if let Ok(path_id) = id.parse() {
                if let Ok(path) = paths.get_owner(path_id).await {
                    print_owner(&path, "Path");
                    return Ok(());
                }
            }
            let breakdown_id = id.parse().map_err(|_| anyhow::anyhow!("Invalid owner ID"))?;
            let breakdown = breakdowns.get_owner(breakdown_id).await?;
            print_owner(&breakdown, "Breakdown");
        }
        Commands::Units { id } => {
            if let Ok(path_id) = id.parse() {
                if let Ok(units) = paths.get_units(path_id).await {
                    print_units(&units);
                    return Ok(());
                }
            }
            let breakdown_id = id.parse().map_err(|_| anyhow::anyhow!("Invalid owner ID"))?;
            print_units(&breakdowns.get_units(breakdown_id).await?);
        }
        Commands::Start { unit } => {
            let unit_id = parse_unit(&unit)?;
            match family_of(&storage, unit_id).await? {
                Family::Path => {
                    let node = paths.start_unit(unit_id).await?;
                    println!("Started: {} ({})", node.id, node.concept);
                }
                Family::Breakdown => {
                    let task = breakdowns.start_unit(unit_id).await?;
                    println!("Started: {} ({})", task.id, task.title);
                }
            }
        }
        Commands::Complete {
            unit,
            score,
            minutes,
        } => {
            let unit_id = parse_unit(&unit)?;
            let outcome = Outcome::new(score, minutes);
            match family_of(&storage, unit_id).await? {
                Family::Path => {
                    let node = paths.complete_unit(unit_id, outcome).await?;
                    println!(
                        "Completed: {} ({}) score {} after {} attempt(s)",
                        node.id,
                        node.concept,
                        score,
                        node.attempts_count
                    );
                    print_owner(&paths.get_owner(node.path_id).await?, "Path");
                }
                Family::Breakdown => {
                    let task = breakdowns.complete_unit(unit_id, outcome).await?;
                    println!(
                        "Completed: {} ({}) score {} after {} attempt(s)",
                        task.id,
                        task.title,
                        score,
                        task.attempts_count
                    );
                    print_owner(&breakdowns.get_owner(task.breakdown_id).await?, "Breakdown");
                }
            }
        }
        Commands::Attempt {
            unit,
            score,
            minutes,
        } => {
            let unit_id = parse_unit(&unit)?;
            let outcome = Outcome::new(score, minutes);
            match family_of(&storage, unit_id).await? {
                Family::Path => {
                    let node = paths.record_attempt(unit_id, outcome).await?;
                    println!("Attempt {} recorded on {}", node.attempts_count, node.id);
                }
                Family::Breakdown => {
                    let task = breakdowns.record_attempt(unit_id, outcome).await?;
                    println!("Attempt {} recorded on {}", task.attempts_count, task.id);
                }
            }
        }
        Commands::Skip { unit } => {
            let unit_id = parse_unit(&unit)?;
            match family_of(&storage, unit_id).await? {
                Family::Path => {
                    let node = paths.skip_unit(unit_id).await?;
                    println!("Skipped: {} ({})", node.id, node.concept);
                }
                Family::Breakdown => {
                    let task = breakdowns.skip_unit(unit_id).await?;
                    println!("Skipped: {} ({})", task.id, task.title);
                }
            }
        }
        Commands::Pause { id } => match resolve_owner(&paths, &breakdowns, &id).await? {
            Family::Path => {
                let path = paths.pause(id.parse()?).await?;
                print_owner(&path, "Path");
            }
            Family::Breakdown => {
                let breakdown = breakdowns.pause(id.parse()?).await?;
                print_owner(&breakdown, "Breakdown");
            }
        },
        Commands::Resume { id } => match resolve_owner(&paths, &breakdowns, &id).await? {
            Family::Path => {
                let path = paths.resume(id.parse()?).await?;
                print_owner(&path, "Path");
            }
            Family::Breakdown => {
                let breakdown = breakdowns.resume(id.parse()?).await?;
                print_owner(&breakdown, "Breakdown");
            }
        },
        Commands::Repair { id } => match resolve_owner(&paths, &breakdowns, &id).await? {
            Family::Path => {
                let path = paths.repair(id.parse()?).await?;
                println!("Repaired.");
                print_owner(&path, "Path");
            }
            Family::Breakdown => {
                let breakdown = breakdowns.repair(id.parse()?).await?;
                println!("Repaired.");
                print_owner(&breakdown, "Breakdown");
            }
        },
        Commands::List { student } => {
            let student_id: StudentId = student
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid student ID"))?;

            let student_paths = paths.owners_for_student(student_id).await?;
            println!("Paths ({})", student_paths.len());
            for path in student_paths {
                println!(
                    "  {} | {} | {} | {:.1}%",
                    path.id,
                    path.status,
                    path.subject,
                    path.completion_percentage
                );
            }

            let student_breakdowns = breakdowns.owners_for_student(student_id).await?;
            println!("Breakdowns ({})", student_breakdowns.len());
            for breakdown in student_breakdowns {
                println!(
                    "  {} | {} | {} | {:.1}%",
                    breakdown.id,
                    breakdown.status,
                    breakdown.description,
                    breakdown.completion_percentage
                );
            }
        }
        Commands::Events => {
            let events = storage.lock().await.list_events().await?;
            println!("Events ({})", events.len());
            for event in events {
                println!(
                    "  {} | {} | owner {} | {}",
                    event.timestamp,
                    event.action.as_str(),
                    event.owner,
                    event.detail
                );
            }
        }
    }

    Ok(())
}

/// Which graph family a unit or owner belongs to.
enum Family {
    Path,
    Breakdown,
}

fn parse_student(student: Option<String>) -> Result<StudentId> {
    match student {
        Some(s) => s
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid student ID")),
        None => {
            let id = StudentId::new();
            println!("Minted student: {}", id);
            Ok(id)
        }
    }
}

fn parse_unit(unit: &str) -> Result<UnitId> {
    unit.parse().map_err(|_| anyhow::anyhow!("Invalid unit ID"))
}

async fn family_of(storage: &Arc<Mutex<JsonStorage>>, unit: UnitId) -> Result<Family> {
    let guard = storage.lock().await;
    if guard.load_node(unit).await?.is_some() {
        return Ok(Family::Path);
    }
    if guard.load_micro_task(unit).await?.is_some() {
        return Ok(Family::Breakdown);
    }
    anyhow::bail!("Unit not found: {}", unit)
}

async fn resolve_owner<S: Storage + 'static>(
    paths: &ProgressionEngine<PathStore<S>>,
    breakdowns: &ProgressionEngine<BreakdownStore<S>>,
    id: &str,
) -> Result<Family> {
    if let Ok(path_id) = id.parse() {
        if paths.get_owner(path_id).await.is_ok() {
            return Ok(Family::Path);
        }
    }
    if let Ok(breakdown_id) = id.parse() {
        if breakdowns.get_owner(breakdown_id).await.is_ok() {
            return Ok(Family::Breakdown);
        }
    }
    anyhow::bail!("Owner not found: {}", id)
}

fn print_owner<O: ProgressOwner>(owner: &O, kind: &str) {
    println!("{}: {}", kind, owner.id());
    println!("  Label: {}", owner.label());
    println!("  Status: {}", owner.status());
    println!("  Completion: {:.1}%", owner.completion_percentage());
    println!("  Difficulty: {}", owner.difficulty_level());
    println!("  Adaptations: {}", owner.adaptation_count());
    if let Some(unit) = owner.current_unit() {
        println!("  Current unit: {}", unit);
    }
}

fn print_units<U: ProgressUnit>(units: &[U]) {
    println!("Units ({})", units.len());
    for unit in units {
        let score = unit
            .mastery_score()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} | #{} | {} | score {} | {} attempt(s)",
            unit.id(),
            unit.sequence(),
            unit.status(),
            score,
            unit.attempts_count()
        );
    }
}
