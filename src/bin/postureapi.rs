//! Posture management API CLI binary.
//!
//! A command-line interface for interacting with the posture management API.

use clap::Parser;
use postureapi::cli::{page_request, Cli, Command, Entity};
use postureapi::{
    ClientConfig, Collector, Create, Credential, Delete, Get, List, Page, PageRequest,
    PostureClient, PostureError, PrettyPrint, Profile, Scan, ScanSummary, Scope, Validation,
    ValidationRequest,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match build_client(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            if matches!(e, PostureError::ConfigMissing(_)) {
                eprintln!("Hint: Set POSTURE_API_KEY environment variable");
            }
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_client(cli: &Cli) -> postureapi::Result<PostureClient> {
    let mut config = ClientConfig::from_env()?;
    if let Some(ref account_id) = cli.account_id {
        config = config.with_account_id(account_id.as_str());
    }
    PostureClient::new(config)
}

async fn run(client: &PostureClient, cli: Cli) -> postureapi::Result<()> {
    match cli.command {
        Command::Get { entity, id } => handle_get(client, entity, id, cli.json).await,
        Command::List {
            entity,
            offset,
            limit,
            filters,
            all,
        } => {
            let request = page_request(offset, limit, &filters)?;
            handle_list(client, entity, request, all, cli.json).await
        }
        Command::Delete { entity, id } => handle_delete(client, entity, id).await,
        Command::Validate {
            scope_id,
            profile_id,
            group_profile_id,
            name,
        } => {
            let request = ValidationRequest {
                group_profile_id,
                name,
                ..ValidationRequest::new(scope_id, profile_id)
            };
            let validation = Validation::create(client, request).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&validation)?);
            } else {
                let status = if validation.result { "queued" } else { "rejected" };
                match validation.message {
                    Some(message) => println!("Validation {status}: {message}"),
                    None => println!("Validation {status}"),
                }
            }
            Ok(())
        }
    }
}

async fn handle_get(
    client: &PostureClient,
    entity: Entity,
    id: String,
    json: bool,
) -> postureapi::Result<()> {
    match entity {
        Entity::Credential => output_single(&Credential::get(client, id).await?, json),
        Entity::Collector => output_single(&Collector::get(client, id).await?, json),
        Entity::Scope => output_single(&Scope::get(client, id).await?, json),
        Entity::Profile => output_single(&Profile::get(client, id).await?, json),
        Entity::Summary => output_single(&ScanSummary::get(client, id).await?, json),
        Entity::Scan => {
            eprintln!("Hint: Use 'postureapi get summary <scan-id>'");
            Err(PostureError::InvalidRequest(
                "latest scans can only be listed".to_string(),
            ))
        }
    }
}

async fn handle_list(
    client: &PostureClient,
    entity: Entity,
    request: PageRequest,
    all: bool,
    json: bool,
) -> postureapi::Result<()> {
    match entity {
        Entity::Credential => {
            list(client, request, all, json, |c: &Credential| CredentialRow::from(c)).await
        }
        Entity::Collector => {
            list(client, request, all, json, |c: &Collector| CollectorRow::from(c)).await
        }
        Entity::Scope => list(client, request, all, json, |s: &Scope| ScopeRow::from(s)).await,
        Entity::Profile => {
            list(client, request, all, json, |p: &Profile| ProfileRow::from(p)).await
        }
        Entity::Scan => list(client, request, all, json, |s: &Scan| ScanRow::from(s)).await,
        Entity::Summary => {
            list(client, request, all, json, |s: &ScanSummary| SummaryRow::from(s)).await
        }
    }
}

async fn handle_delete(
    client: &PostureClient,
    entity: Entity,
    id: String,
) -> postureapi::Result<()> {
    match entity {
        Entity::Credential => Credential::delete(client, id.clone()).await?,
        Entity::Collector => Collector::delete(client, id.clone()).await?,
        Entity::Scope => Scope::delete(client, id.clone()).await?,
        _ => {
            return Err(PostureError::InvalidRequest(
                "only credentials, collectors and scopes can be deleted".to_string(),
            ));
        }
    }
    println!("Deleted {entity:?} {id}");
    Ok(())
}

async fn list<T, R, F>(
    client: &PostureClient,
    request: PageRequest,
    all: bool,
    json: bool,
    to_row: F,
) -> postureapi::Result<()>
where
    T: List + Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if all {
        let items = T::list_all(client, request).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&items)?);
        } else {
            let rows: Vec<R> = items.iter().map(to_row).collect();
            println!("{}", Table::new(rows));
            println!("\n{} items", items.len());
        }
    } else {
        let page = T::fetch_page(client, &request).await?;
        output_page(&page, json, to_row)?;
    }
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> postureapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Page<T>, json: bool, to_row: F) -> postureapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(&page.items)?);
    } else {
        let rows: Vec<R> = page.items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        let total = page
            .total_count
            .map(|t| format!(" of {t}"))
            .unwrap_or_default();
        match page.next_offset {
            Some(next) => println!("\n{} items{total} (next: --offset {next})", page.len()),
            None => println!("\n{} items{total} (end)", page.len()),
        }
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct CredentialRow {
    id: String,
    name: String,
    #[tabled(rename = "type")]
    credential_type: String,
    enabled: bool,
}

impl From<&Credential> for CredentialRow {
    fn from(c: &Credential) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            credential_type: c.credential_type.to_string(),
            enabled: c.enabled,
        }
    }
}

#[derive(Tabled)]
struct CollectorRow {
    id: String,
    name: String,
    status: String,
}

impl From<&Collector> for CollectorRow {
    fn from(c: &Collector) -> Self {
        Self {
            id: c.id.clone(),
            name: c.label().to_string(),
            status: c.status.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct ScopeRow {
    id: String,
    name: String,
    environment: String,
}

impl From<&Scope> for ScopeRow {
    fn from(s: &Scope) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            environment: s
                .credential_type
                .map(|e| e.to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct ProfileRow {
    id: String,
    name: String,
    #[tabled(rename = "type")]
    profile_type: String,
    controls: String,
}

impl From<&Profile> for ProfileRow {
    fn from(p: &Profile) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            profile_type: p.profile_type.map(|t| t.to_string()).unwrap_or_default(),
            controls: p.no_of_controls.map(|n| n.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct ScanRow {
    scan: String,
    scope: String,
    profile: String,
    passed: String,
}

impl From<&Scan> for ScanRow {
    fn from(s: &Scan) -> Self {
        Self {
            scan: s.scan_id.clone(),
            scope: s.scope_name.clone().unwrap_or_else(|| s.scope_id.clone()),
            profile: s.profile_name.clone().unwrap_or_else(|| s.profile_id.clone()),
            passed: s
                .result
                .as_ref()
                .and_then(|r| r.controls_pass_rate())
                .map(|rate| format!("{rate:.1}%"))
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    scan: String,
    name: String,
    status: String,
}

impl From<&ScanSummary> for SummaryRow {
    fn from(s: &ScanSummary) -> Self {
        Self {
            scan: s.scan_id.clone(),
            name: s.scan_name.clone().unwrap_or_default(),
            status: s.status.map(|st| format!("{st:?}")).unwrap_or_default(),
        }
    }
}
