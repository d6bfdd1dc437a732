mod common;

use std::sync::Arc;

use common::test_config;
use common::wiremock_helpers::{
    mock_enrichment_server, mock_error_server, mock_html_page, mock_timeout_server,
};
use companyprofiler::enrichment::EnrichmentClient;
use companyprofiler::profile::{Origin, ProfileField};
use companyprofiler::reconcile::{MemoryStore, Reconciler, SharedReconciler};
use companyprofiler::trigger::{run_collection, PassOptions, SourceOutcome};
use serde_json::json;

const PAGE: &str = r#"
<html>
<head><title>Custom Fabrication | Acme Widgets</title></head>
<body>
    <p>Reach us at (555) 867-5309.</p>
    <footer><address>742 Evergreen Terrace, Springfield, IL 62704</address></footer>
</body>
</html>
"#;

fn reconciler_for(domain: &str) -> SharedReconciler {
    SharedReconciler::new(
        domain,
        Reconciler::for_website(domain),
        Arc::new(MemoryStore::default()),
    )
}

// DNS is skipped in these passes; there is no mock seam for a real resolver.
fn two_source_options() -> PassOptions {
    PassOptions {
        domain_signal: false,
        enrichment: true,
        scrape: true,
    }
}

/// A 404 from the enrichment service must not abort the scrape: its
/// candidates still land and the pass does not report empty-handed.
#[tokio::test]
async fn test_failed_enrichment_does_not_abort_other_sources() {
    let page = mock_html_page(PAGE).await;
    let enrichment = mock_error_server(404).await;

    let mut config = test_config();
    config.scrape.base_url = Some(page.uri());

    let client = EnrichmentClient::with_base_url(&enrichment.uri(), 5).unwrap();
    let reconciler = reconciler_for("acmewidgets.com");

    let report = run_collection(
        "acmewidgets.com",
        &config,
        &reconciler,
        &client,
        two_source_options(),
    )
    .await;

    assert!(matches!(report.enrichment_outcome, SourceOutcome::Failed(_)));
    assert_eq!(report.scrape_outcome, SourceOutcome::Succeeded);
    assert!(!report.no_automatic_data());

    let (profile, provenance) = reconciler.snapshot().await;
    assert_eq!(profile.name.as_deref(), Some("Acme Widgets"));
    assert_eq!(profile.phone.as_deref(), Some("(555) 867-5309"));
    assert_eq!(profile.address.city.as_deref(), Some("Springfield"));
    assert_eq!(
        provenance.get(&ProfileField::Phone).unwrap().origin,
        Origin::ScrapeSuggested
    );
}

/// A scrape that exceeds its time budget is a permanent failure for the
/// pass, contributes nothing, and leaves the enrichment result intact.
#[tokio::test]
async fn test_timed_out_scrape_is_permanent_failure_for_pass() {
    let slow = mock_timeout_server(3_000).await;
    let enrichment = mock_enrichment_server(
        "acmewidgets.com",
        json!({"name": "Acme Widgets Inc", "industry": "Manufacturing"}),
    )
    .await;

    let mut config = test_config();
    config.scrape.base_url = Some(slow.uri());
    config.scrape.timeout_secs = 1;

    let client = EnrichmentClient::with_base_url(&enrichment.uri(), 5).unwrap();
    let reconciler = reconciler_for("acmewidgets.com");

    let report = run_collection(
        "acmewidgets.com",
        &config,
        &reconciler,
        &client,
        two_source_options(),
    )
    .await;

    assert!(matches!(report.scrape_outcome, SourceOutcome::Failed(_)));
    assert_eq!(report.enrichment_outcome, SourceOutcome::Succeeded);
    assert!(!report.no_automatic_data());

    let (profile, provenance) = reconciler.snapshot().await;
    assert_eq!(profile.name.as_deref(), Some("Acme Widgets Inc"));
    assert_eq!(profile.industry.as_deref(), Some("manufacturing"));
    // Nothing from the scrape reached the profile
    assert_eq!(profile.phone, None);
    assert!(provenance.get(&ProfileField::Phone).is_none());
}

/// Both remaining sources failing still only zeroes their candidates; the
/// report carries both failure reasons.
#[tokio::test]
async fn test_all_running_sources_failing_contributes_nothing() {
    let down = mock_error_server(503).await;
    let enrichment = mock_error_server(500).await;

    let mut config = test_config();
    config.scrape.base_url = Some(down.uri());

    let client = EnrichmentClient::with_base_url(&enrichment.uri(), 5).unwrap();
    let reconciler = reconciler_for("acmewidgets.com");

    let report = run_collection(
        "acmewidgets.com",
        &config,
        &reconciler,
        &client,
        two_source_options(),
    )
    .await;

    assert!(matches!(report.scrape_outcome, SourceOutcome::Failed(_)));
    assert!(matches!(report.enrichment_outcome, SourceOutcome::Failed(_)));
    assert_eq!(report.accepted_candidates, 0);

    let (profile, _) = reconciler.snapshot().await;
    assert_eq!(profile.name, None);
    assert_eq!(profile.phone, None);
}
