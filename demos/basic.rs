//! Basic example demonstrating the posture management API client.
//!
//! Run with:
//! ```
//! POSTURE_API_KEY=your-key cargo run --example basic
//! ```

use futures::TryStreamExt;
use postureapi::{Get, List, PageRequest, PostureClient, Profile, ScanSummary, Scope};

#[tokio::main]
async fn main() -> postureapi::Result<()> {
    tracing_subscriber::fmt::init();

    let client = PostureClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // One page of scopes
    println!("\n--- Scopes (first page) ---");
    let page = Scope::fetch_page(&client, &PageRequest::new().with_limit(10)).await?;
    println!(
        "Showing {} of {:?} scopes",
        page.len(),
        page.total_count
    );
    for scope in &page {
        println!("  {} - {}", scope.id, scope.name);
    }
    if let Some(next) = page.next_offset {
        println!("  (more from offset {next})");
    }

    // Every predefined profile, streamed page by page
    println!("\n--- Predefined profiles ---");
    let profiles = Profile::paginate(&client, PageRequest::new().with_limit(25)).items();
    futures::pin_mut!(profiles);
    while let Some(profile) = profiles.try_next().await? {
        if profile.is_predefined() {
            println!("  {} ({:?} controls)", profile.name, profile.no_of_controls);
        }
    }

    // Summaries of the first scope's scans
    if let Some(scope) = page.items.first() {
        println!("\n--- Summaries for scope {} ---", scope.id);
        let request = PageRequest::new().with_filter("scope_id", scope.id.as_str());
        for summary in ScanSummary::list_all(&client, request).await? {
            let detail = ScanSummary::get(&client, summary.scan_id.clone()).await?;
            let rate = detail
                .result
                .as_ref()
                .and_then(|r| r.controls_pass_rate())
                .map(|r| format!("{r:.1}%"))
                .unwrap_or_else(|| "-".to_string());
            println!("  {} {:?} pass rate {}", detail.scan_id, detail.status, rate);
        }
    }

    Ok(())
}
