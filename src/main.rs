//! Terrain CLI
//!
//! Event briefs and the scouting pipeline from the terminal.
//!
//! Run with: cargo run -- brief "Pre-seed mixer" --host="Hustle Fund"

use anyhow::Result;
use chrono::{Local, NaiveDate};
use terrain_brief::{
    brief::BriefEngine,
    calendar,
    config::{self, BriefConfig},
    hosts,
    pipeline::{self, EventFilter, FieldNote, NewEvent},
    session::TerrainSession,
    signals::HttpSignalSource,
    store::SqliteStore,
    types::*,
    DATA_UNAVAILABLE,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = r#"terrain - event intelligence for venture scouting

USAGE:
    terrain brief <event name> --host=<host> [--json]
    terrain hosts
    terrain resolve <host>
    terrain events [--filter=all|<status>|<type>] [--past]
    terrain calendar <event id>
    terrain add-event <name> [--date=YYYY-MM-DD] [--time=7pm] [--location=..] [--host=..] [--type=Dinner]
    terrain status <event id> <Going|Maybe|Pass>
    terrain contacts
    terrain field-note <event id> [--name=..] [--fund=..] [--title=..] [--insight=..] [--follow-up=..] [--notes=..]
    terrain edit-contact <contact id> [--name=..] [--title=..] [--fund=..] [--stage=..] [--how-met=..] [--notes=..]
    terrain contact-status <contact id> <status>
    terrain delete-contact <contact id>
    terrain intel [--search=..] [--category=..]
    terrain add-intel <title> [--category=..] [--summary=..] [--source=..]
    terrain edit-intel <intel id> [--title=..] [--category=..] [--summary=..] [--source=..]
    terrain delete-intel <intel id>
    terrain stats

ENVIRONMENT:
    PRECOGNITION_API             signal backend (default https://yc-scout.onrender.com)
    TERRAIN_FETCH_TIMEOUT_SECS   per-feed timeout (default 5)
    TERRAIN_FETCH_POLICY         abort | best-effort (default abort)
    TERRAIN_MAX_POINTS           cap on brief points (default none)
    TERRAIN_DATA_DIR             where terrain.db lives
    RUST_LOG                     log filter (default warn)"#;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<()> {
    let Some(command) = args.get(1) else {
        println!("{}", USAGE);
        return Ok(());
    };
    let rest = &args[2..];

    match command.as_str() {
        "brief" => {
            let event_name = positional(rest).join(" ");
            let host = flag(rest, "--host");
            let json_output = rest.iter().any(|a| a == "--json");
            run_brief(&event_name, host.as_deref(), json_output).await
        }
        "hosts" => run_hosts(),
        "resolve" => run_resolve(&positional(rest).join(" ")),
        "events" => run_events(rest),
        "calendar" => run_calendar(&required_id(rest, "calendar <event id>")?),
        "add-event" => run_add_event(rest),
        "status" => {
            let pos = positional(rest);
            let (Some(id), Some(status)) = (pos.first(), pos.get(1)) else {
                return Err(anyhow::anyhow!("Usage: status <event id> <Going|Maybe|Pass>"));
            };
            let status = EventStatus::parse(status)
                .ok_or_else(|| anyhow::anyhow!("Unknown status {:?}", status))?;
            run_status(id, status).await
        }
        "contacts" => run_contacts(),
        "field-note" => {
            let id = positional(rest)
                .first()
                .map(|s| s.to_string())
                .ok_or_else(|| anyhow::anyhow!("Usage: field-note <event id> [--name=..]"))?;
            run_field_note(&id, rest)
        }
        "edit-contact" => run_edit_contact(&required_id(rest, "edit-contact <contact id>")?, rest),
        "contact-status" => {
            let pos = positional(rest);
            let (Some(id), Some(status)) = (pos.first(), pos.get(1)) else {
                return Err(anyhow::anyhow!("Usage: contact-status <contact id> <status>"));
            };
            let status = ContactStatus::parse(&pos[1..].join(" "))
                .ok_or_else(|| anyhow::anyhow!("Unknown contact status {:?}", status))?;
            pipeline::set_contact_status(&open_store()?, id, status)?;
            println!("Contact {} marked {}", id, status.name());
            Ok(())
        }
        "delete-contact" => {
            let id = required_id(rest, "delete-contact <contact id>")?;
            pipeline::delete_contact(&open_store()?, &id)?;
            println!("Contact {} deleted", id);
            Ok(())
        }
        "intel" => run_intel(rest),
        "add-intel" => run_add_intel(rest),
        "edit-intel" => run_edit_intel(&required_id(rest, "edit-intel <intel id>")?, rest),
        "delete-intel" => {
            let id = required_id(rest, "delete-intel <intel id>")?;
            pipeline::delete_intel(&open_store()?, &id)?;
            println!("Entry removed.");
            Ok(())
        }
        "stats" => run_stats(),
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => Err(anyhow::anyhow!("Unknown command {:?}\n\n{}", other, USAGE)),
    }
}

/// Value of `--name=value`
fn flag(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    args.iter()
        .find_map(|a| a.strip_prefix(prefix.as_str()))
        .map(|v| v.to_string())
}

fn positional(args: &[String]) -> Vec<&str> {
    args.iter()
        .filter(|a| !a.starts_with("--"))
        .map(|a| a.as_str())
        .collect()
}

fn required_id(args: &[String], usage: &str) -> Result<String> {
    positional(args)
        .first()
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("Usage: {}", usage))
}

fn category_flag(args: &[String]) -> Result<Option<IntelCategory>> {
    flag(args, "--category")
        .map(|c| IntelCategory::parse(&c).ok_or_else(|| anyhow::anyhow!("Unknown category {:?}", c)))
        .transpose()
}

fn open_store() -> Result<SqliteStore> {
    let data_dir = config::get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let db_path = data_dir.join("terrain.db");
    tracing::debug!("Using database at {:?}", db_path);
    SqliteStore::open(&db_path)
}

fn engine() -> BriefEngine<'static, HttpSignalSource> {
    let config = BriefConfig::from_env();
    let source = HttpSignalSource::new(&config.api_url);
    BriefEngine::new(source, config)
}

fn print_points(points: &[String]) {
    for (i, point) in points.iter().enumerate() {
        let mut lines = point.lines();
        if let Some(first) = lines.next() {
            println!("{:>2}. {}", i + 1, first);
        }
        for line in lines {
            println!("    {}", line);
        }
    }
}

async fn run_brief(event_name: &str, host: Option<&str>, json_output: bool) -> Result<()> {
    if event_name.is_empty() {
        return Err(anyhow::anyhow!("Usage: brief <event name> --host=<host>"));
    }
    let engine = engine();

    if json_output {
        let output = match engine.report(event_name, host).await {
            Ok(report) => serde_json::to_value(&report)?,
            Err(e) => serde_json::json!({
                "brief": Brief::new(event_name, host, vec![DATA_UNAVAILABLE.to_string()]),
                "error": format!("{:#}", e),
            }),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Brief: {}{}", event_name, host.map(|h| format!(" ({})", h)).unwrap_or_default());
    println!();
    print_points(&engine.generate_brief(event_name, host).await);
    Ok(())
}

fn run_hosts() -> Result<()> {
    for (key, profile) in hosts::profiles() {
        let topics = if profile.topics.is_empty() {
            "-".to_string()
        } else {
            profile.topics.join(", ")
        };
        println!(
            "{:<20} {:<28} {:<24} topics: {}",
            key, profile.general_partner, profile.investment_stage, topics
        );
    }
    Ok(())
}

fn run_resolve(host: &str) -> Result<()> {
    match hosts::resolve_host(Some(host)) {
        Some(profile) => println!("{}", serde_json::to_string_pretty(profile)?),
        None => println!("No profile matches {:?}", host),
    }
    Ok(())
}

fn run_events(rest: &[String]) -> Result<()> {
    let filter = match flag(rest, "--filter") {
        Some(f) => EventFilter::parse(&f).ok_or_else(|| anyhow::anyhow!("Unknown filter {:?}", f))?,
        None => EventFilter::All,
    };
    let store = open_store()?;
    let events = pipeline::filter_events(&pipeline::list_events(&store)?, filter);
    if events.is_empty() {
        println!("No events yet. Add one with `terrain add-event`.");
        return Ok(());
    }

    let (upcoming, past) = pipeline::split_by_date(events, Local::now().date_naive());
    print_events(&upcoming);
    if rest.iter().any(|a| a == "--past") && !past.is_empty() {
        println!();
        println!("Past events");
        print_events(&past);
    }
    Ok(())
}

fn print_events(events: &[Event]) {
    for event in events {
        println!(
            "{}  {:<10} {:<6} {}{}",
            event.id,
            event.date.map(|d| d.to_string()).unwrap_or_else(|| "TBD".to_string()),
            event.status.name(),
            event.name,
            event.host.as_ref().map(|h| format!(" · {}", h)).unwrap_or_default()
        );
    }
}

fn run_calendar(event_id: &str) -> Result<()> {
    let store = open_store()?;
    let event = pipeline::get_event(&store, event_id)?
        .ok_or_else(|| anyhow::anyhow!("No event with id {}", event_id))?;
    let url = calendar::gcal_url(&event)
        .ok_or_else(|| anyhow::anyhow!("Event {} has no date to put on a calendar", event.name))?;
    println!("{}", url);
    Ok(())
}

fn run_add_event(rest: &[String]) -> Result<()> {
    let store = open_store()?;
    let date = flag(rest, "--date")
        .map(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d"))
        .transpose()
        .map_err(|e| anyhow::anyhow!("Invalid --date: {}", e))?;
    let event_type = match flag(rest, "--type") {
        Some(t) => Some(EventType::parse(&t).ok_or_else(|| anyhow::anyhow!("Unknown event type {:?}", t))?),
        None => None,
    };

    let event = pipeline::add_event(
        &store,
        NewEvent {
            name: positional(rest).join(" "),
            date,
            time: flag(rest, "--time"),
            location: flag(rest, "--location"),
            host: flag(rest, "--host"),
            event_type,
            goal: flag(rest, "--goal"),
            notes: flag(rest, "--notes"),
            source_url: flag(rest, "--url"),
            ..Default::default()
        },
    )?;
    println!("Added event {} ({})", event.name, event.id);
    Ok(())
}

async fn run_status(id: &str, status: EventStatus) -> Result<()> {
    let mut session = TerrainSession::new(open_store()?, engine());
    let brief = session.set_event_status(id, status).await?;
    println!("Event {} marked {}", id, status.name());
    if let Some(points) = brief {
        println!();
        print_points(&points);
    }
    Ok(())
}

fn run_contacts() -> Result<()> {
    let store = open_store()?;
    for contact in pipeline::list_contacts(&store)? {
        println!(
            "{}  {:<24} {:<20} {}",
            contact.id,
            contact.name,
            contact.fund.unwrap_or_default(),
            contact.status.name()
        );
    }
    Ok(())
}

fn run_edit_contact(id: &str, rest: &[String]) -> Result<()> {
    let store = open_store()?;
    let mut contact = pipeline::get_contact(&store, id)?
        .ok_or_else(|| anyhow::anyhow!("No contact with id {}", id))?;

    if let Some(name) = flag(rest, "--name") {
        contact.name = name;
    }
    for (field, value) in [
        ("--title", &mut contact.title),
        ("--fund", &mut contact.fund),
        ("--stage", &mut contact.stage),
        ("--how-met", &mut contact.how_met),
        ("--notes", &mut contact.notes),
    ] {
        if let Some(v) = flag(rest, field) {
            *value = Some(v);
        }
    }

    let contact = pipeline::update_contact(&store, contact)?;
    println!("Contact updated: {} ({})", contact.name, contact.id);
    Ok(())
}

fn run_field_note(event_id: &str, rest: &[String]) -> Result<()> {
    let store = open_store()?;
    let event = pipeline::get_event(&store, event_id)?
        .ok_or_else(|| anyhow::anyhow!("No event with id {}", event_id))?;

    let contact = pipeline::add_field_note(
        &store,
        &event,
        FieldNote {
            name: flag(rest, "--name"),
            fund: flag(rest, "--fund"),
            title: flag(rest, "--title"),
            insight: flag(rest, "--insight"),
            follow_up: flag(rest, "--follow-up"),
            notes: flag(rest, "--notes"),
        },
    )?;
    println!("Contact added to Network: {} ({})", contact.name, contact.id);
    Ok(())
}

fn run_intel(rest: &[String]) -> Result<()> {
    let store = open_store()?;
    let notes = pipeline::list_intel(&store)?;

    let counts: Vec<String> = pipeline::intel_counts(&notes)
        .into_iter()
        .map(|(category, n)| format!("{} {}", category.name(), n))
        .collect();
    println!("All {} · {}", notes.len(), counts.join(" · "));
    println!();

    let search = flag(rest, "--search").unwrap_or_default();
    for note in pipeline::search_intel(&notes, category_flag(rest)?, &search) {
        println!(
            "{}  [{}] {}{}",
            note.id,
            note.category.name(),
            note.title,
            note.summary.map(|s| format!(" — {}", s)).unwrap_or_default()
        );
    }
    Ok(())
}

fn run_add_intel(rest: &[String]) -> Result<()> {
    let store = open_store()?;
    let note = pipeline::add_intel(
        &store,
        IntelNote {
            id: String::new(),
            title: positional(rest).join(" "),
            category: category_flag(rest)?.unwrap_or_default(),
            summary: flag(rest, "--summary"),
            source: flag(rest, "--source"),
        },
    )?;
    println!("Entry saved ({})", note.id);
    Ok(())
}

fn run_edit_intel(id: &str, rest: &[String]) -> Result<()> {
    let store = open_store()?;
    let mut note = pipeline::get_intel(&store, id)?
        .ok_or_else(|| anyhow::anyhow!("No intel entry with id {}", id))?;

    if let Some(title) = flag(rest, "--title") {
        note.title = title;
    }
    if let Some(category) = category_flag(rest)? {
        note.category = category;
    }
    if let Some(summary) = flag(rest, "--summary") {
        note.summary = Some(summary);
    }
    if let Some(source) = flag(rest, "--source") {
        note.source = Some(source);
    }

    pipeline::update_intel(&store, note)?;
    println!("Entry updated ({})", id);
    Ok(())
}

fn run_stats() -> Result<()> {
    let store = open_store()?;
    let today = Local::now().date_naive();
    let events = pipeline::event_stats(&pipeline::list_events(&store)?, today);
    let contacts = pipeline::contact_stats(&pipeline::list_contacts(&store)?);

    println!("Events:   {} upcoming, {} going, {} this week", events.upcoming, events.going, events.this_week);
    println!(
        "Contacts: {} total, {} active, {} meetings, {}% response rate",
        contacts.total, contacts.active_conversations, contacts.meetings, contacts.response_rate
    );
    Ok(())
}
