//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{TimeZone, Utc};

use crate::{
    Collector, Credential, CredentialPurpose, CredentialType, EnvironmentType, Profile,
    ProfileType, Scan, ScanResult, ScanStatus, ScanSummary, Scope,
};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Credential Fixtures
    // =========================================================================

    /// Create a minimal credential with required fields only.
    pub fn minimal_credential(id: &str, name: &str) -> Credential {
        Credential {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            credential_type: CredentialType::UsernamePassword,
            enabled: true,
            purpose: None,
            display_fields: None,
            created_by: None,
            created_at: None,
            updated_by: None,
            updated_at: None,
        }
    }

    /// Create a cloud account credential.
    pub fn cloud_credential(id: &str, name: &str, credential_type: CredentialType) -> Credential {
        let mut credential = Self::minimal_credential(id, name);
        credential.credential_type = credential_type;
        credential.purpose = Some(CredentialPurpose::DiscoveryFactCollection);
        credential.display_fields = Some(serde_json::json!({ "api_key": "****" }));
        credential.created_at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).single();
        credential
    }

    // =========================================================================
    // Collector Fixtures
    // =========================================================================

    /// Create a minimal collector.
    pub fn minimal_collector(id: &str, name: &str) -> Collector {
        Collector {
            id: id.to_string(),
            name: name.to_string(),
            display_name: None,
            description: None,
            status: Some("ready_to_install".to_string()),
            status_description: None,
            collector_type: Some("managed".to_string()),
            enabled: true,
            is_public: true,
            use_private_endpoint: false,
            managed_by: Some("ibm".to_string()),
            hostname: None,
            collector_version: None,
            failure_count: 0,
            last_heartbeat: None,
            created_by: None,
            created_at: None,
            updated_by: None,
            updated_at: None,
        }
    }

    /// Create a collector that is up and reporting.
    pub fn active_collector(id: &str, name: &str, hostname: &str) -> Collector {
        let mut collector = Self::minimal_collector(id, name);
        collector.status = Some("active".to_string());
        collector.hostname = Some(hostname.to_string());
        collector.last_heartbeat = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single();
        collector
    }

    // =========================================================================
    // Scope Fixtures
    // =========================================================================

    /// Create a scope bound to a credential and collectors.
    pub fn scope(id: &str, name: &str, credential_id: &str, collector_ids: &[&str]) -> Scope {
        Scope {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            uuid: None,
            partner_uuid: None,
            credential_id: Some(credential_id.to_string()),
            credential_type: Some(EnvironmentType::Ibm),
            collector_ids: collector_ids.iter().map(|c| c.to_string()).collect(),
            created_by: None,
            modified_by: None,
            created_at: None,
            modified_at: None,
        }
    }

    // =========================================================================
    // Profile Fixtures
    // =========================================================================

    /// Create a predefined profile.
    pub fn profile(id: &str, name: &str, controls: u32) -> Profile {
        Profile {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            version: Some(1),
            profile_type: Some(ProfileType::Predefined),
            base_profile: None,
            no_of_controls: Some(controls),
            enabled: true,
            created_by: None,
            modified_by: None,
            created_at: None,
            updated_at: None,
        }
    }

    // =========================================================================
    // Scan Fixtures
    // =========================================================================

    /// Create a scan result with the given control counts.
    pub fn scan_result(pass: u32, fail: u32) -> ScanResult {
        ScanResult {
            controls_pass_count: pass,
            controls_fail_count: fail,
            controls_total_count: pass + fail,
            ..Default::default()
        }
    }

    /// Create a finished latest scan.
    pub fn latest_scan(scan_id: &str, scope_id: &str, profile_id: &str) -> Scan {
        Scan {
            scan_id: scan_id.to_string(),
            scan_name: Some(format!("scan-{scan_id}")),
            scope_id: scope_id.to_string(),
            scope_name: None,
            profile_id: profile_id.to_string(),
            profile_name: None,
            profile_type: None,
            group_profile_id: None,
            group_profile_name: None,
            report_run_by: Some("controller".to_string()),
            start_time: Utc.with_ymd_and_hms(2024, 6, 2, 3, 0, 0).single(),
            end_time: Utc.with_ymd_and_hms(2024, 6, 2, 3, 20, 0).single(),
            result: Some(Self::scan_result(8, 2)),
        }
    }

    /// Create a scan summary.
    pub fn summary(
        scan_id: &str,
        scope_id: &str,
        profile_id: &str,
        status: ScanStatus,
    ) -> ScanSummary {
        ScanSummary {
            scan_id: scan_id.to_string(),
            scan_name: Some(format!("scan-{scan_id}")),
            scope_id: Some(scope_id.to_string()),
            scope_name: None,
            profile_id: Some(profile_id.to_string()),
            profile_name: None,
            status: Some(status),
            report_run_by: None,
            start_time: None,
            end_time: None,
            result: (status == ScanStatus::Completed).then(|| Self::scan_result(8, 2)),
        }
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// Create a default set of test data for common scenarios.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario with related entities.
pub struct DefaultScenario {
    pub credentials: Vec<Credential>,
    pub collectors: Vec<Collector>,
    pub scopes: Vec<Scope>,
    pub profiles: Vec<Profile>,
    pub latest_scans: Vec<Scan>,
    pub summaries: Vec<ScanSummary>,
}

impl DefaultScenario {
    fn new() -> Self {
        let credentials = vec![
            Fixtures::cloud_credential("1", "prod-account", CredentialType::IbmCloud),
            Fixtures::cloud_credential("2", "aws-audit", CredentialType::AwsCloud),
            Fixtures::minimal_credential("3", "datacenter-ssh"),
        ];

        let collectors = vec![
            Fixtures::active_collector("11", "collector-east", "east.example.com"),
            Fixtures::minimal_collector("12", "collector-west"),
        ];

        let scopes = vec![
            Fixtures::scope("21", "Production", "1", &["11"]),
            Fixtures::scope("22", "Staging", "1", &["11"]),
            Fixtures::scope("23", "Datacenter", "3", &["12"]),
        ];

        let profiles = vec![
            Fixtures::profile("31", "CIS Benchmark", 120),
            Fixtures::profile("32", "NIST 800-53", 310),
        ];

        let latest_scans = vec![
            Fixtures::latest_scan("41", "21", "31"),
            Fixtures::latest_scan("42", "22", "31"),
        ];

        let summaries = vec![
            Fixtures::summary("41", "21", "31", ScanStatus::Completed),
            Fixtures::summary("42", "22", "31", ScanStatus::Completed),
            Fixtures::summary("43", "21", "32", ScanStatus::InProgress),
        ];

        Self {
            credentials,
            collectors,
            scopes,
            profiles,
            latest_scans,
            summaries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_credential() {
        let credential = Fixtures::minimal_credential("1", "Test");
        assert_eq!(credential.id, "1");
        assert_eq!(credential.name, "Test");
        assert!(credential.enabled);
    }

    #[test]
    fn test_summary_result_only_when_completed() {
        let done = Fixtures::summary("1", "2", "3", ScanStatus::Completed);
        assert!(done.result.is_some());

        let running = Fixtures::summary("1", "2", "3", ScanStatus::InProgress);
        assert!(running.result.is_none());
    }

    #[test]
    fn test_default_scenario() {
        let scenario = Fixtures::default_scenario();
        assert_eq!(scenario.credentials.len(), 3);
        assert!(!scenario.collectors.is_empty());
        assert!(!scenario.scopes.is_empty());
        assert!(!scenario.profiles.is_empty());
        assert!(!scenario.latest_scans.is_empty());
        assert!(!scenario.summaries.is_empty());
    }
}
