use chrono::Utc;
use clap::Subcommand;
use serde::Deserialize;
use std::path::PathBuf;
use timetable_core::{
    ingest_values, summarize_by_subject, CatalogDb, CatalogSource, Config, HttpCatalog, IngestReport,
};

use super::{load_session, print_offerings};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Replace the catalog with records from a JSON file
    Import {
        /// Array of offerings, or an object with a "courses" array
        file: PathBuf,
        /// Print the ingestion report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Download the catalog from the configured service
    Fetch {
        /// Refresh even if the cached catalog is still fresh
        #[arg(long)]
        force: bool,
        /// Override catalog.base_url
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List every cached offering
    List {
        #[arg(long)]
        json: bool,
    },
    /// Search by course name, staff or id
    Search {
        query: String,
        /// Ask the catalog service instead of the local cache
        #[arg(long)]
        remote: bool,
        #[arg(long)]
        json: bool,
    },
    /// One summary line per subject
    Subjects {
        #[arg(long)]
        json: bool,
    },
    /// Offerings with this id or course name
    Show {
        id: String,
        /// Ask the catalog service for the subject's offerings
        #[arg(long)]
        remote: bool,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Payload { courses: Vec<serde_json::Value> },
    Records(Vec<serde_json::Value>),
}

fn print_report(report: &IngestReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!(
        "{} offerings accepted, {} rejected",
        report.accepted.len(),
        report.rejected.len()
    );
    for rejected in &report.rejected {
        println!(
            "  rejected {}: {}",
            rejected.unique_id.as_deref().unwrap_or("<unknown>"),
            rejected.reason
        );
    }
    for found in &report.inconsistencies {
        println!(
            "  note: offerings of {} disagree (names {:?}, credits {:?})",
            found.course_name, found.display_names, found.credits
        );
    }
    Ok(())
}

/// Store an accepted catalog in the session snapshot and the cache.
fn store_catalog(report: &IngestReport) -> Result<(), Box<dyn std::error::Error>> {
    let (store, mut session) = load_session()?;
    let mut db = CatalogDb::open()?;
    let missing = session.store_catalog(report.accepted.clone(), Utc::now(), &store, &mut db)?;
    if !missing.is_empty() {
        eprintln!(
            "warning: selected offerings no longer in the catalog: {}",
            missing.join(", ")
        );
    }
    Ok(())
}

fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

fn remote_client(config: &Config, url: Option<String>) -> Result<HttpCatalog, Box<dyn std::error::Error>> {
    let base = url.unwrap_or_else(|| config.catalog.base_url.clone());
    Ok(HttpCatalog::new(&base)?)
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CatalogAction::Import { file, json } => {
            let content = std::fs::read_to_string(&file)?;
            let records = match serde_json::from_str::<ImportFile>(&content)? {
                ImportFile::Payload { courses } => courses,
                ImportFile::Records(records) => records,
            };
            let report = ingest_values(records);
            store_catalog(&report)?;
            print_report(&report, json)?;
        }
        CatalogAction::Fetch { force, url, json } => {
            let config = Config::load_or_default();
            let (_, session) = load_session()?;
            if !force && !session.is_stale(Utc::now(), config.catalog.refresh_interval_min) {
                if let Some(at) = session.fetched_at() {
                    println!("catalog is up to date (fetched {}); use --force to refresh", at.to_rfc3339());
                }
                return Ok(());
            }
            let client = remote_client(&config, url)?;
            let report = runtime()?.block_on(client.fetch_catalog())?;
            store_catalog(&report)?;
            print_report(&report, json)?;
        }
        CatalogAction::List { json } => {
            let db = CatalogDb::open()?;
            print_offerings(&db.list_all()?, json)?;
        }
        CatalogAction::Search { query, remote, json } => {
            let found = if remote {
                let client = remote_client(&Config::load_or_default(), None)?;
                runtime()?.block_on(client.search(&query))?.accepted
            } else {
                CatalogDb::open()?.search(&query)?
            };
            print_offerings(&found, json)?;
        }
        CatalogAction::Subjects { json } => {
            let summaries = summarize_by_subject(&CatalogDb::open()?.list_all()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for s in &summaries {
                    println!(
                        "{:<10} {} | {} cr | {} offering(s)",
                        s.course_name, s.display_name, s.credits, s.total_courses
                    );
                }
            }
        }
        CatalogAction::Show { id, remote, json } => {
            let found = if remote {
                let client = remote_client(&Config::load_or_default(), None)?;
                runtime()?.block_on(client.by_subject(&id))?.accepted
            } else {
                CatalogDb::open()?.find_by_unique_id_or_name(&id)?
            };
            if found.is_empty() {
                return Err(format!("no offering matches: {id}").into());
            }
            print_offerings(&found, json)?;
        }
    }
    Ok(())
}
