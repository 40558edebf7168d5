use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use jobtrail::filter::FilterState;
use jobtrail::models::{ApplicationPatch, ApplicationStatus, EventType, NewApplication, Profile};
use jobtrail::storage::JsonFileStorage;
use jobtrail::store::AppStore;
use jobtrail::views;
use jobtrail::workflow::{
    WORKFLOW_NODES, can_transition, is_terminal, next_possible_statuses, outgoing_labels,
};

#[derive(Parser)]
#[command(name = "jobtrail")]
#[command(about = "Track job applications - record, filter, and visualize your pipeline")]
struct Cli {
    /// Override the data directory (defaults to the user data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List applications
    List {
        /// Filter by status (e.g. "Applied", "Phone Screen")
        #[arg(short, long)]
        status: Option<String>,

        /// Filter by location (case-insensitive substring)
        #[arg(short, long)]
        location: Option<String>,

        /// Search company, position, and location
        #[arg(short = 'q', long)]
        search: Option<String>,
    },

    /// Show one application with its notes and timeline
    Show {
        /// Application ID
        id: String,
    },

    /// Add an application
    Add {
        /// Company name
        company: String,

        /// Position title
        position: String,

        /// Initial status (defaults to Applied)
        #[arg(short, long)]
        status: Option<String>,

        /// Date applied, yyyy-MM-dd (defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        /// e.g. full-time, contract
        #[arg(short, long)]
        job_type: Option<String>,

        #[arg(long)]
        salary: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        url: Option<String>,

        #[arg(long)]
        contact_name: Option<String>,

        #[arg(long)]
        contact_email: Option<String>,

        #[arg(long)]
        contact_phone: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Update fields on an application
    Update {
        /// Application ID
        id: String,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        position: Option<String>,

        /// New status; off-workflow transitions are allowed but warned about
        #[arg(short, long)]
        status: Option<String>,

        /// Date applied, yyyy-MM-dd
        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(short, long)]
        job_type: Option<String>,

        #[arg(long)]
        salary: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        url: Option<String>,

        #[arg(long)]
        contact_name: Option<String>,

        #[arg(long)]
        contact_email: Option<String>,

        #[arg(long)]
        contact_phone: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete an application and its notes and timeline events
    Delete {
        /// Application ID
        id: String,
    },

    /// Manage notes on an application
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },

    /// Manage timeline events on an application
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },

    /// Dashboard summary: distribution, active pipeline, success rates
    Stats,

    /// Calendar of applications and events for one month
    Calendar {
        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Show the status workflow, or the next stages from one status
    Workflow {
        /// Status to show transitions from
        status: Option<String>,
    },

    /// Show or edit the user profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Browse applications interactively
    Browse,

    /// Print the data directory
    Path,
}

#[derive(Subcommand)]
enum NoteCommands {
    /// Add a note
    Add {
        /// Application ID
        application_id: String,
        title: String,
        content: String,
    },

    /// List notes for an application
    List {
        /// Application ID
        application_id: String,
    },

    /// Replace a note's title and content
    Edit {
        /// Note ID
        id: String,
        title: String,
        content: String,
    },

    /// Delete a note
    Delete {
        /// Note ID
        id: String,
    },
}

#[derive(Subcommand)]
enum EventCommands {
    /// Add a timeline event
    Add {
        /// Application ID
        application_id: String,

        /// Event type (e.g. "Phone Screen", "Offer")
        event_type: String,

        /// Event date, yyyy-MM-dd (defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List timeline events for an application
    List {
        /// Application ID
        application_id: String,
    },

    /// Delete a timeline event
    Delete {
        /// Event ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show the saved profile
    Show,

    /// Set profile fields (only supplied fields change)
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        bio: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let storage = match &cli.data_dir {
        Some(dir) => JsonFileStorage::with_dir(dir.clone()),
        None => JsonFileStorage::open(),
    };
    let data_dir = storage.dir().clone();
    let mut store = AppStore::open(Box::new(storage));

    match cli.command {
        Commands::List { status, location, search } => {
            let mut filter = FilterState::new();
            if let Some(status) = status {
                filter.set_status_filter(Some(status.parse()?));
            }
            filter.set_location_filter(location);
            if let Some(term) = search {
                filter.set_search_term(&term);
            }

            let apps = views::filtered(store.applications(), &filter);
            if apps.is_empty() {
                if filter.is_active() {
                    println!("No applications match the current filters.");
                } else {
                    println!("No applications found.");
                }
            } else {
                println!(
                    "{:<15} {:<20} {:<25} {:<20} {:<12}",
                    "ID", "STATUS", "COMPANY", "POSITION", "APPLIED"
                );
                println!("{}", "-".repeat(94));
                for app in apps {
                    println!(
                        "{:<15} {:<20} {:<25} {:<20} {:<12}",
                        app.id,
                        app.status.to_string(),
                        truncate(&app.company, 23),
                        truncate(&app.position, 18),
                        app.date_applied
                    );
                }
            }
        }

        Commands::Show { id } => match store.get(&id) {
            Some(app) => {
                println!("{} - {}", app.company, app.position);
                println!("ID: {}", app.id);
                println!("Status: {}", app.status);
                println!("Applied: {}", app.date_applied);
                if let Some(location) = &app.location {
                    println!("Location: {location}");
                }
                if let Some(job_type) = &app.job_type {
                    println!("Type: {job_type}");
                }
                if let Some(salary) = &app.salary {
                    println!("Salary: {salary}");
                }
                if let Some(url) = &app.url {
                    println!("URL: {url}");
                }
                if let Some(name) = &app.contact_name {
                    println!("Contact: {name}");
                }
                if let Some(email) = &app.contact_email {
                    println!("Contact email: {email}");
                }
                if let Some(phone) = &app.contact_phone {
                    println!("Contact phone: {phone}");
                }
                if let Some(description) = &app.description {
                    println!("\n{description}");
                }
                if let Some(notes) = &app.notes {
                    println!("\nNotes: {notes}");
                }

                let next = next_possible_statuses(app.status);
                if !next.is_empty() {
                    let names: Vec<&str> = next.iter().map(|s| s.as_str()).collect();
                    println!("\nNext possible: {}", names.join(", "));
                }

                let events = store.events_for(&id);
                if !events.is_empty() {
                    println!("\nTimeline:");
                    for event in events {
                        match &event.notes {
                            Some(notes) => {
                                println!("  {} {} - {}", event.date, event.event_type, notes)
                            }
                            None => println!("  {} {}", event.date, event.event_type),
                        }
                    }
                }

                let notes = store.notes_for(&id);
                if !notes.is_empty() {
                    println!("\nNotes:");
                    for note in notes {
                        println!("  [{}] {} ({})", note.id, note.title, note.date);
                        println!("      {}", note.content);
                    }
                }
            }
            None => println!("Application {id} not found."),
        },

        Commands::Add {
            company,
            position,
            status,
            date,
            location,
            job_type,
            salary,
            description,
            url,
            contact_name,
            contact_email,
            contact_phone,
            notes,
        } => {
            if company.trim().is_empty() {
                bail!("Company must not be empty");
            }
            if position.trim().is_empty() {
                bail!("Position must not be empty");
            }
            let status = status.map(|s| s.parse()).transpose()?;
            if let Some(date) = &date {
                parse_date(date)?;
            }

            let id = store.add(NewApplication {
                company,
                position,
                status,
                date_applied: date,
                location,
                job_type,
                salary,
                description,
                url,
                contact_name,
                contact_email,
                contact_phone,
                notes,
            });
            println!("Added application {id}");
        }

        Commands::Update {
            id,
            company,
            position,
            status,
            date,
            location,
            job_type,
            salary,
            description,
            url,
            contact_name,
            contact_email,
            contact_phone,
            notes,
        } => {
            let status: Option<ApplicationStatus> = status.map(|s| s.parse()).transpose()?;
            if let Some(date) = &date {
                parse_date(date)?;
            }

            if let (Some(new_status), Some(app)) = (status, store.get(&id)) {
                if new_status != app.status && !can_transition(app.status, new_status) {
                    eprintln!(
                        "Warning: {} -> {} is not a workflow transition (applying anyway)",
                        app.status, new_status
                    );
                }
            }

            let patch = ApplicationPatch {
                company,
                position,
                status,
                date_applied: date,
                location,
                job_type,
                salary,
                description,
                url,
                contact_name,
                contact_email,
                contact_phone,
                notes,
            };
            if patch.is_empty() {
                println!("Nothing to update.");
            } else if store.update(&id, &patch) {
                println!("Application updated.");
            } else {
                println!("Application {id} not found.");
            }
        }

        Commands::Delete { id } => {
            if store.delete(&id) {
                println!("Application deleted.");
            } else {
                println!("Application {id} not found.");
            }
        }

        Commands::Note { command } => match command {
            NoteCommands::Add { application_id, title, content } => {
                if store.get(&application_id).is_none() {
                    bail!("Application {} not found", application_id);
                }
                let id = store.add_note(&application_id, &title, &content);
                println!("Added note {id}");
            }

            NoteCommands::List { application_id } => {
                let notes = store.notes_for(&application_id);
                if notes.is_empty() {
                    println!("No notes found.");
                } else {
                    for note in notes {
                        println!("[{}] {} ({})", note.id, note.title, note.date);
                        println!("    {}", note.content);
                    }
                }
            }

            NoteCommands::Edit { id, title, content } => {
                if store.update_note(&id, &title, &content) {
                    println!("Note updated.");
                } else {
                    println!("Note {id} not found.");
                }
            }

            NoteCommands::Delete { id } => {
                if store.delete_note(&id) {
                    println!("Note deleted.");
                } else {
                    println!("Note {id} not found.");
                }
            }
        },

        Commands::Event { command } => match command {
            EventCommands::Add { application_id, event_type, date, notes } => {
                if store.get(&application_id).is_none() {
                    bail!("Application {} not found", application_id);
                }
                let event_type: EventType = event_type.parse()?;
                let date = match date {
                    Some(date) => {
                        parse_date(&date)?;
                        date
                    }
                    None => chrono::Local::now().format("%Y-%m-%d").to_string(),
                };
                let id = store.add_event(&application_id, &date, event_type, notes);
                println!("Added event {id}");
            }

            EventCommands::List { application_id } => {
                let events = store.events_for(&application_id);
                if events.is_empty() {
                    println!("No events found.");
                } else {
                    for event in events {
                        match &event.notes {
                            Some(notes) => {
                                println!("[{}] {} {} - {}", event.id, event.date, event.event_type, notes)
                            }
                            None => println!("[{}] {} {}", event.id, event.date, event.event_type),
                        }
                    }
                }
            }

            EventCommands::Delete { id } => {
                if store.delete_event(&id) {
                    println!("Event deleted.");
                } else {
                    println!("Event {id} not found.");
                }
            }
        },

        Commands::Stats => {
            let apps = store.applications();
            println!("Total applications: {}", apps.len());
            println!("Active (open pipeline): {}", views::active(apps).len());

            let distribution = views::status_distribution(apps);
            if !distribution.is_empty() {
                println!("\nBy status:");
                for (status, count) in &distribution {
                    println!("  {:<20} {}", status.to_string(), count);
                }
            }

            let metrics = views::success_rate_metrics(apps);
            println!("\nSuccess rates:");
            println!(
                "  Application -> interview  {:>5.0}%",
                metrics.application_to_interview * 100.0
            );
            println!(
                "  Interview -> offer        {:>5.0}%",
                metrics.interview_to_offer * 100.0
            );
            println!(
                "  Overall offer rate        {:>5.0}%",
                metrics.overall_offer * 100.0
            );
        }

        Commands::Calendar { month, year } => {
            let now = chrono::Local::now();
            let month = month.unwrap_or_else(|| now.month());
            let year = year.unwrap_or_else(|| now.year());
            if !(1..=12).contains(&month) {
                bail!("Month must be 1-12");
            }

            let buckets = views::calendar_month(store.applications(), store.events(), year, month);
            if buckets.is_empty() {
                println!("Nothing scheduled for {year}-{month:02}.");
            } else {
                println!("{year}-{month:02}");
                for (date, entries) in &buckets {
                    println!("  {}", date.format("%Y-%m-%d (%a)"));
                    for entry in entries {
                        let tag = match entry.kind {
                            views::CalendarKind::Application => "applied",
                            views::CalendarKind::Interview => "interview",
                            views::CalendarKind::Outcome => "outcome",
                        };
                        println!("    [{tag}] {}", entry.title);
                    }
                }
            }
        }

        Commands::Workflow { status } => match status {
            Some(status) => {
                let status: ApplicationStatus = status.parse()?;
                if is_terminal(status) {
                    println!("{status} is terminal.");
                } else {
                    let names: Vec<&str> = next_possible_statuses(status)
                        .iter()
                        .map(|s| s.as_str())
                        .collect();
                    println!("{status} -> {}", names.join(", "));
                }
            }
            None => {
                // The pipeline graph as drawn on the dashboard; offer
                // decisions are queried per status.
                for node in &WORKFLOW_NODES {
                    let targets = outgoing_labels(node.id);
                    if targets.is_empty() {
                        println!("{:<20} (end)", node.label);
                    } else {
                        println!("{:<20} -> {}", node.label, targets.join(", "));
                    }
                }
            }
        },

        Commands::Profile { command } => match command {
            ProfileCommands::Show => {
                let profile = store.profile();
                if *profile == Profile::default() {
                    println!("No profile saved.");
                } else {
                    if let Some(name) = &profile.name {
                        println!("Name: {name}");
                    }
                    if let Some(email) = &profile.email {
                        println!("Email: {email}");
                    }
                    if let Some(title) = &profile.title {
                        println!("Title: {title}");
                    }
                    if let Some(location) = &profile.location {
                        println!("Location: {location}");
                    }
                    if let Some(bio) = &profile.bio {
                        println!("Bio: {bio}");
                    }
                }
            }

            ProfileCommands::Set { name, email, title, location, bio } => {
                let mut profile = store.profile().clone();
                if name.is_some() {
                    profile.name = name;
                }
                if email.is_some() {
                    profile.email = email;
                }
                if title.is_some() {
                    profile.title = title;
                }
                if location.is_some() {
                    profile.location = location;
                }
                if bio.is_some() {
                    profile.bio = bio;
                }
                store.set_profile(profile);
                println!("Profile saved.");
            }
        },

        Commands::Browse => {
            jobtrail::tui::run_browse(&mut store)?;
        }

        Commands::Path => {
            println!("{}", data_dir.display());
        }
    }

    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => bail!("Invalid date '{}' (expected yyyy-MM-dd)", s),
    }
}

/// Cuts on char boundaries; company and position names are arbitrary input
/// and byte slicing would panic mid-character.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_strings() {
        assert_eq!(truncate("Acme Inc", 23), "Acme Inc");
        assert_eq!(truncate("exactly-eight", 13), "exactly-eight");
    }

    #[test]
    fn test_truncate_cuts_multibyte_names_on_char_boundary() {
        let name = "aaaaaaaaaaaaaaaaaaaé responsable dev";
        let cut = truncate(name, 23);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 23);
        assert_eq!(cut, "aaaaaaaaaaaaaaaaaaaé...");

        let accents = "Société Générale d'Informatique Appliquée";
        let cut = truncate(accents, 18);
        assert_eq!(cut.chars().count(), 18);
    }
}
