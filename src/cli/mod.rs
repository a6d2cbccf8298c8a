//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! postureapi binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::error::{PostureError, Result};
use crate::pagination::PageRequest;

/// Posture management API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "postureapi", about = "Posture management API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Account ID sent with every request.
    #[arg(long, global = true, env = "POSTURE_ACCOUNT_ID")]
    pub account_id: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The entity ID (scan ID for summaries).
        id: String,
    },

    /// List entities with optional filtering and pagination.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Offset of the first item.
        #[arg(long)]
        offset: Option<u64>,

        /// Number of items per page.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,

        /// Filter as key=value; repeatable.
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        /// Follow the next links and print every page.
        #[arg(long)]
        all: bool,
    },

    /// Delete an entity.
    Delete {
        /// The type of entity to delete.
        entity: Entity,

        /// The entity ID.
        id: String,
    },

    /// Validate a scope against a profile.
    Validate {
        /// Scope to scan.
        #[arg(long)]
        scope_id: String,

        /// Profile to validate against.
        #[arg(long)]
        profile_id: String,

        /// Group profile to validate against.
        #[arg(long)]
        group_profile_id: Option<String>,

        /// Name for the resulting scan.
        #[arg(long)]
        name: Option<String>,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A credential used by collectors.
    #[value(alias = "credentials")]
    Credential,
    /// A fact collector.
    #[value(alias = "collectors")]
    Collector,
    /// A set of resources to validate.
    #[value(alias = "scopes")]
    Scope,
    /// A set of controls.
    #[value(alias = "profiles")]
    Profile,
    /// The latest scan of a scope/profile pair.
    #[value(alias = "scans")]
    Scan,
    /// A scan summary.
    #[value(alias = "summaries")]
    Summary,
}

/// Build a [`PageRequest`] from the `list` arguments.
///
/// # Errors
///
/// Returns [`PostureError::InvalidRequest`] for a filter without `=` or with
/// an empty key.
pub fn page_request(
    offset: Option<u64>,
    limit: Option<u32>,
    filters: &[String],
) -> Result<PageRequest> {
    let mut request = PageRequest {
        offset,
        limit,
        ..Default::default()
    };

    for filter in filters {
        let (key, value) = filter
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| {
                PostureError::InvalidRequest(format!(
                    "filter '{filter}' must look like key=value"
                ))
            })?;
        request = request.with_filter(key, value);
    }

    Ok(request)
}
