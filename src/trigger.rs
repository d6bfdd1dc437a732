//! Trigger policy and collection orchestration
//!
//! `Idle -> Collecting -> Reconciled`. Collection fires once, automatically,
//! the first time a domain becomes known; re-entering after `Reconciled`
//! re-triggers only if the domain itself changed. While collecting, the three
//! upstream lookups run concurrently and each completion feeds the
//! reconciliation engine independently; the pass is over once all three have
//! succeeded or permanently failed.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::domain_signal::{self, DomainSignal};
use crate::domain_utils;
use crate::enrichment::EnrichmentClient;
use crate::profile::{Candidate, CandidateSource, ProfileField};
use crate::reconcile::SharedReconciler;
use crate::scrape;

/// Collection lifecycle for one assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionState {
    #[default]
    Idle,
    Collecting,
    Reconciled,
}

/// Decides when a collection pass may fire. Replaces ad hoc "already ran"
/// flags with an explicit three-state machine keyed on the observed domain.
#[derive(Debug, Default)]
pub struct TriggerPolicy {
    state: CollectionState,
    domain: Option<String>,
}

impl TriggerPolicy {
    pub fn new() -> Self {
        TriggerPolicy::default()
    }

    pub fn state(&self) -> CollectionState {
        self.state
    }

    /// A domain became known (or the operator re-entered the step). Returns
    /// true when a collection pass should start, and transitions to
    /// `Collecting` when it does.
    pub fn observe_domain(&mut self, domain: &str) -> bool {
        let normalized = domain_utils::normalize_domain(domain);
        if normalized.is_empty() {
            return false;
        }

        let fire = match self.state {
            CollectionState::Idle => true,
            CollectionState::Collecting => false,
            CollectionState::Reconciled => self.domain.as_deref() != Some(normalized.as_str()),
        };

        if fire {
            debug!("Trigger: starting collection for {}", normalized);
            self.domain = Some(normalized);
            self.state = CollectionState::Collecting;
        }
        fire
    }

    /// All three sources reached a terminal outcome.
    pub fn mark_reconciled(&mut self) {
        self.state = CollectionState::Reconciled;
    }
}

/// Terminal outcome of one upstream source within a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Succeeded,
    Failed(String),
    Skipped,
}

impl SourceOutcome {
    fn failed(&self) -> bool {
        matches!(self, SourceOutcome::Failed(_))
    }
}

/// Which sources run in a pass. All on by default; the CLI can skip sources.
#[derive(Debug, Clone, Copy)]
pub struct PassOptions {
    pub domain_signal: bool,
    pub enrichment: bool,
    pub scrape: bool,
}

impl Default for PassOptions {
    fn default() -> Self {
        PassOptions {
            domain_signal: true,
            enrichment: true,
            scrape: true,
        }
    }
}

/// What one collection pass produced, for display and logging. Field values
/// themselves live in the profile by the time this is returned.
#[derive(Debug)]
pub struct CollectionReport {
    pub domain: String,
    pub domain_signal: Option<DomainSignal>,
    pub domain_signal_outcome: SourceOutcome,
    pub enrichment_outcome: SourceOutcome,
    pub scrape_outcome: SourceOutcome,
    pub accepted_candidates: usize,
}

impl CollectionReport {
    /// The only operator-visible failure: every source failed or timed out.
    pub fn no_automatic_data(&self) -> bool {
        self.domain_signal_outcome.failed()
            && self.enrichment_outcome.failed()
            && self.scrape_outcome.failed()
    }
}

/// Run one collection pass: the three lookups concurrently, each completion
/// feeding the reconciler as it arrives. A failing or timed-out source
/// contributes zero candidates and never aborts the other two.
pub async fn run_collection(
    domain: &str,
    config: &AppConfig,
    reconciler: &SharedReconciler,
    enrichment_client: &EnrichmentClient,
    options: PassOptions,
) -> CollectionReport {
    let domain = domain_utils::normalize_domain(domain);
    info!("Collection pass starting for {}", domain);

    reconciler.begin_pass().await;
    let scrape_timeout = Duration::from_secs(config.scrape.timeout_secs);

    let domain_task = async {
        if !options.domain_signal {
            return (None, SourceOutcome::Skipped, 0);
        }
        match domain_signal::collect(&domain, config).await {
            Ok(signal) => {
                let accepted = reconciler
                    .apply_batch(domain_signal_candidates(&signal))
                    .await;
                (Some(signal), SourceOutcome::Succeeded, accepted)
            }
            Err(e) => {
                warn!("Domain signal collection failed for {}: {}", domain, e);
                (None, SourceOutcome::Failed(e.to_string()), 0)
            }
        }
    };

    let enrichment_task = async {
        if !options.enrichment {
            return (SourceOutcome::Skipped, 0);
        }
        match enrichment_client.by_domain(&domain).await {
            Ok(facts) => {
                let accepted = reconciler.apply_batch(facts.to_candidates()).await;
                (SourceOutcome::Succeeded, accepted)
            }
            Err(e) => {
                warn!("Enrichment lookup failed for {}: {}", domain, e);
                (SourceOutcome::Failed(e.to_string()), 0)
            }
        }
    };

    let scrape_task = async {
        if !options.scrape {
            return (SourceOutcome::Skipped, 0);
        }
        // The remote page fetch is the least predictable lookup; a timed-out
        // scrape is a permanent failure for this pass.
        match tokio::time::timeout(scrape_timeout, scrape::scrape_domain(&domain, config)).await {
            Ok(Ok(result)) => {
                let accepted = reconciler.apply_batch(result.candidates).await;
                (SourceOutcome::Succeeded, accepted)
            }
            Ok(Err(e)) => {
                warn!("Scrape failed for {}: {}", domain, e);
                (SourceOutcome::Failed(e.to_string()), 0)
            }
            Err(_) => {
                warn!("Scrape timed out for {} after {:?}", domain, scrape_timeout);
                (SourceOutcome::Failed("timed out".to_string()), 0)
            }
        }
    };

    let ((signal, domain_outcome, domain_accepted), (enrichment_outcome, enrichment_accepted), (scrape_outcome, scrape_accepted)) =
        tokio::join!(domain_task, enrichment_task, scrape_task);

    let report = CollectionReport {
        domain,
        domain_signal: signal,
        domain_signal_outcome: domain_outcome,
        enrichment_outcome,
        scrape_outcome,
        accepted_candidates: domain_accepted + enrichment_accepted + scrape_accepted,
    };

    if report.no_automatic_data() {
        info!(
            "No automatic data could be found for {}",
            report.domain
        );
    } else {
        info!(
            "Collection pass for {} accepted {} candidates",
            report.domain, report.accepted_candidates
        );
    }

    report
}

/// Candidates a domain signal contributes: only the domain-derived fallback
/// company name. The rest of the snapshot (MX, providers, dates, tech stack)
/// is display data, not profile fields.
pub fn domain_signal_candidates(signal: &DomainSignal) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    if let Some(name) = domain_utils::name_from_domain(&signal.domain) {
        candidates.push(Candidate::new(
            ProfileField::Name,
            name,
            CandidateSource::DomainSignal,
        ));
    }
    candidates
}

/// Convenience wrapper the (external) wizard step calls: consults the trigger
/// policy, runs the pass if it fires, and marks the policy reconciled after.
pub async fn trigger_collection(
    policy: &mut TriggerPolicy,
    domain: &str,
    config: &AppConfig,
    reconciler: &SharedReconciler,
    enrichment_client: &EnrichmentClient,
    options: PassOptions,
) -> Option<CollectionReport> {
    if !policy.observe_domain(domain) {
        debug!("Trigger: collection not re-fired for {}", domain);
        return None;
    }

    let report = run_collection(domain, config, reconciler, enrichment_client, options).await;
    policy.mark_reconciled();
    Some(report)
}

// Late results: lookups spawned with an Arc'd SharedReconciler keep feeding
// candidates after the operator navigates away; apply_batch is idempotent and
// user-edited fields stay untouched, so late application is always safe.
pub fn spawn_late_application(
    reconciler: SharedReconciler,
    candidates: Vec<Candidate>,
) -> tokio::task::JoinHandle<usize> {
    tokio::spawn(async move { reconciler.apply_batch(candidates).await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_trigger_fires_once_on_first_domain() {
        let mut policy = TriggerPolicy::new();
        assert_eq!(policy.state(), CollectionState::Idle);

        assert!(policy.observe_domain("acme.com"));
        assert_eq!(policy.state(), CollectionState::Collecting);

        // Re-entering while collecting does not re-fire
        assert!(!policy.observe_domain("acme.com"));
    }

    #[test]
    fn test_trigger_does_not_refire_after_reconciled_same_domain() {
        let mut policy = TriggerPolicy::new();
        assert!(policy.observe_domain("acme.com"));
        policy.mark_reconciled();
        assert_eq!(policy.state(), CollectionState::Reconciled);

        assert!(!policy.observe_domain("acme.com"));
        assert!(!policy.observe_domain("https://www.acme.com/"));
    }

    #[test]
    fn test_trigger_refires_when_domain_changes() {
        let mut policy = TriggerPolicy::new();
        assert!(policy.observe_domain("acme.com"));
        policy.mark_reconciled();

        assert!(policy.observe_domain("other.com"));
        assert_eq!(policy.state(), CollectionState::Collecting);
    }

    #[test]
    fn test_trigger_ignores_empty_domain() {
        let mut policy = TriggerPolicy::new();
        assert!(!policy.observe_domain(""));
        assert!(!policy.observe_domain("   "));
        assert_eq!(policy.state(), CollectionState::Idle);
    }

    #[test]
    fn test_domain_signal_candidates_name_only() {
        let signal = DomainSignal {
            domain: "acmewidgets.com".to_string(),
            mx_records: vec!["aspmx.l.google.com".to_string()],
            tech_stack: BTreeSet::new(),
            ..Default::default()
        };
        let candidates = domain_signal_candidates(&signal);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].field, ProfileField::Name);
        assert_eq!(candidates[0].value, "Acmewidgets");
        assert_eq!(candidates[0].source, CandidateSource::DomainSignal);
    }

    #[test]
    fn test_report_no_automatic_data() {
        let failed = || SourceOutcome::Failed("x".to_string());
        let report = CollectionReport {
            domain: "acme.com".to_string(),
            domain_signal: None,
            domain_signal_outcome: failed(),
            enrichment_outcome: failed(),
            scrape_outcome: failed(),
            accepted_candidates: 0,
        };
        assert!(report.no_automatic_data());

        let partial = CollectionReport {
            scrape_outcome: SourceOutcome::Succeeded,
            ..report
        };
        assert!(!partial.no_automatic_data());
    }
}
