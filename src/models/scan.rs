//! Scan, scan summary and validation models.
//!
//! A validation request starts a scan of a scope against a profile. Finished
//! scans show up in the latest-scans list and as per-scan summaries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{entity_path, PostureClient};
use crate::error::Result;
use crate::pagination::{fetch_collection, Collection, Page, PageRequest};
use crate::traits::{Create, Get, List};

const VALIDATIONS_PATH: &str = "scans/validations";
const LATEST_SCANS_PATH: &str = "scans/validations/latest_scans";
const SUMMARIES_PATH: &str = "scans/validations/summaries";

/// The most recent scan of a scope/profile pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    pub scan_id: String,

    #[serde(default)]
    pub scan_name: Option<String>,

    pub scope_id: String,
    #[serde(default)]
    pub scope_name: Option<String>,

    pub profile_id: String,
    #[serde(default)]
    pub profile_name: Option<String>,
    #[serde(default)]
    pub profile_type: Option<String>,

    #[serde(default)]
    pub group_profile_id: Option<String>,
    #[serde(default)]
    pub group_profile_name: Option<String>,

    #[serde(default)]
    pub report_run_by: Option<String>,

    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub result: Option<ScanResult>,
}

/// Goal and control counts of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(default)]
    pub goals_pass_count: u32,
    #[serde(default)]
    pub goals_fail_count: u32,
    #[serde(default)]
    pub goals_unable_to_perform_count: u32,
    #[serde(default)]
    pub goals_not_applicable_count: u32,
    #[serde(default)]
    pub goals_total_count: u32,
    #[serde(default)]
    pub controls_pass_count: u32,
    #[serde(default)]
    pub controls_fail_count: u32,
    #[serde(default)]
    pub controls_unable_to_perform_count: u32,
    #[serde(default)]
    pub controls_not_applicable_count: u32,
    #[serde(default)]
    pub controls_total_count: u32,
}

impl ScanResult {
    /// Share of applicable controls that passed, in percent.
    ///
    /// `None` when no control was applicable.
    pub fn controls_pass_rate(&self) -> Option<f64> {
        let applicable = self
            .controls_total_count
            .saturating_sub(self.controls_not_applicable_count);
        if applicable == 0 {
            return None;
        }
        Some(f64::from(self.controls_pass_count) * 100.0 / f64::from(applicable))
    }
}

/// State of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Summary of one validation scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub scan_id: String,

    #[serde(default)]
    pub scan_name: Option<String>,

    #[serde(default)]
    pub scope_id: Option<String>,
    #[serde(default)]
    pub scope_name: Option<String>,

    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub profile_name: Option<String>,

    #[serde(default)]
    pub status: Option<ScanStatus>,

    #[serde(default)]
    pub report_run_by: Option<String>,

    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub result: Option<ScanResult>,
}

impl ScanSummary {
    /// Whether the scan has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            Some(ScanStatus::Completed) | Some(ScanStatus::Failed)
        )
    }
}

/// Request to validate a scope against a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub scope_id: String,

    pub profile_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_profile_id: Option<String>,

    /// Name for the resulting scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ValidationRequest {
    /// Validate `scope_id` against `profile_id`.
    pub fn new(scope_id: impl Into<String>, profile_id: impl Into<String>) -> Self {
        Self {
            scope_id: scope_id.into(),
            profile_id: profile_id.into(),
            group_profile_id: None,
            name: None,
        }
    }
}

/// Acknowledgement of a validation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    /// Whether the scan was queued.
    pub result: bool,

    #[serde(default)]
    pub message: Option<String>,
}

/// API response wrapper for the latest scans list.
#[derive(Debug, Deserialize)]
struct LatestScanList {
    #[serde(flatten)]
    collection: Collection,
    latest_scans: Vec<Scan>,
}

/// API response wrapper for the scan summaries list.
#[derive(Debug, Deserialize)]
struct ScanSummaryList {
    #[serde(flatten)]
    collection: Collection,
    summaries: Vec<ScanSummary>,
}

#[async_trait]
impl List for Scan {
    #[tracing::instrument(skip(client))]
    async fn fetch_page(client: &PostureClient, request: &PageRequest) -> Result<Page<Self>> {
        let data: LatestScanList = fetch_collection(client, LATEST_SCANS_PATH, request).await?;
        data.collection.into_page(data.latest_scans)
    }
}

#[async_trait]
impl Get for ScanSummary {
    type Id = String; // Scan ID

    #[tracing::instrument(skip(client))]
    async fn get(client: &PostureClient, scan_id: String) -> Result<Self> {
        let path = format!("{}/summary", entity_path(VALIDATIONS_PATH, &scan_id)?);
        let response = client.get(&path).await?;
        PostureClient::decode(response).await
    }
}

/// Summaries are filtered with the `scope_id` and `profile_id` filters.
#[async_trait]
impl List for ScanSummary {
    #[tracing::instrument(skip(client))]
    async fn fetch_page(client: &PostureClient, request: &PageRequest) -> Result<Page<Self>> {
        let data: ScanSummaryList = fetch_collection(client, SUMMARIES_PATH, request).await?;
        data.collection.into_page(data.summaries)
    }
}

#[async_trait]
impl Create for Validation {
    type Params = ValidationRequest;
    type Output = Self;

    #[tracing::instrument(skip(client))]
    async fn create(client: &PostureClient, params: Self::Params) -> Result<Self> {
        let response = client.post(VALIDATIONS_PATH, &params).await?;
        PostureClient::decode(response).await
    }
}
