//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use chrono::{DateTime, Utc};

use crate::{Collector, Credential, Profile, Scan, ScanResult, ScanSummary, Scope};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn header(title: String) -> Vec<String> {
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

fn push_result(lines: &mut Vec<String>, result: &ScanResult) {
    lines.push(format!(
        "Controls:       {} pass, {} fail, {} unable, {} n/a ({} total)",
        result.controls_pass_count,
        result.controls_fail_count,
        result.controls_unable_to_perform_count,
        result.controls_not_applicable_count,
        result.controls_total_count
    ));
    if let Some(rate) = result.controls_pass_rate() {
        lines.push(format!("Pass Rate:      {rate:.1}%"));
    }
}

impl PrettyPrint for Credential {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Credential: {}", self.id));
        lines.push(format!("Name:           {}", self.name));
        lines.push(format!("Type:           {}", self.credential_type));
        lines.push(format!(
            "Enabled:        {}",
            if self.enabled { "yes" } else { "no" }
        ));

        if let Some(ref description) = self.description {
            lines.push(format!("Description:    {}", description));
        }

        if let Some(ref updated) = self.updated_at {
            lines.push(format!("Updated:        {}", timestamp(updated)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Collector {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Collector: {}", self.id));
        lines.push(format!("Name:           {}", self.label()));

        if let Some(ref status) = self.status {
            lines.push(format!("Status:         {}", status));
        }

        if let Some(ref hostname) = self.hostname {
            lines.push(format!("Host:           {}", hostname));
        }

        if let Some(ref heartbeat) = self.last_heartbeat {
            lines.push(format!("Last Heartbeat: {}", timestamp(heartbeat)));
        }

        if self.failure_count > 0 {
            lines.push(format!("Failures:       {}", self.failure_count));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Scope {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Scope: {}", self.id));
        lines.push(format!("Name:           {}", self.name));

        if let Some(ref env) = self.credential_type {
            lines.push(format!("Environment:    {}", env));
        }

        if let Some(ref credential) = self.credential_id {
            lines.push(format!("Credential:     {}", credential));
        }

        if !self.collector_ids.is_empty() {
            lines.push(format!("Collectors:     {}", self.collector_ids.join(", ")));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Profile {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Profile: {}", self.id));
        lines.push(format!("Name:           {}", self.name));

        if let Some(ref profile_type) = self.profile_type {
            lines.push(format!("Type:           {}", profile_type));
        }

        if let Some(controls) = self.no_of_controls {
            lines.push(format!("Controls:       {}", controls));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Scan {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Scan: {}", self.scan_id));
        lines.push(format!(
            "Scope:          {}",
            self.scope_name.as_deref().unwrap_or(&self.scope_id)
        ));
        lines.push(format!(
            "Profile:        {}",
            self.profile_name.as_deref().unwrap_or(&self.profile_id)
        ));

        if let Some(ref end) = self.end_time {
            lines.push(format!("Finished:       {}", timestamp(end)));
        }

        if let Some(ref result) = self.result {
            push_result(&mut lines, result);
        }

        lines.join("\n")
    }
}

impl PrettyPrint for ScanSummary {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Scan Summary: {}", self.scan_id));

        if let Some(ref name) = self.scan_name {
            lines.push(format!("Name:           {}", name));
        }

        if let Some(status) = self.status {
            lines.push(format!("Status:         {:?}", status));
        }

        if let Some(ref start) = self.start_time {
            lines.push(format!("Started:        {}", timestamp(start)));
        }

        if let Some(ref result) = self.result {
            push_result(&mut lines, result);
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_pretty_print_format() {
        let scope: Scope = serde_json::from_value(serde_json::json!({
            "id": "3",
            "name": "Production",
            "credential_type": "ibm",
            "collector_ids": ["12", "13"]
        }))
        .unwrap();

        let output = scope.pretty_print();
        assert!(output.starts_with("Scope: 3"));
        assert!(output.contains("Production"));
        assert!(output.contains("12, 13"));
    }

    #[test]
    fn test_scan_pretty_print_pass_rate() {
        let scan: Scan = serde_json::from_value(serde_json::json!({
            "scan_id": "262",
            "scope_id": "3",
            "profile_id": "48",
            "result": {
                "controls_pass_count": 3,
                "controls_total_count": 4
            }
        }))
        .unwrap();

        let output = scan.pretty_print();
        assert!(output.contains("Pass Rate:      75.0%"));
        // Falls back to IDs without names
        assert!(output.contains("Scope:          3"));
    }
}
