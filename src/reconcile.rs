//! Reconciliation engine
//!
//! The only mutator of `CompanyProfile` and its provenance. Candidates from
//! the three sources flow through `apply_batch`; the UI flows through
//! `suggest` and `record_user_edit`. Nothing else writes profile fields.
//!
//! Acceptance rules, per candidate:
//! - field provenance `UserEdited`: drop, no-op.
//! - field empty, or current value equals the stored `last_suggested_value`
//!   (operator has not diverged from the last auto-fill): accept.
//! - field diverged but never user-edited (two automatic sources disagreed
//!   before the operator looked): accept, last writer wins among automatic
//!   sources.
//!
//! Within one batch, sources competing for the same field apply in precedence
//! order (enrichment > scrape > domain), so the high-precedence value lands
//! last and wins. The engine is pure and deterministic: same profile + same
//! ordered candidate list, same result. It performs no I/O itself.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain_utils;
use crate::profile::{
    Candidate, CompanyProfile, FieldProvenance, Origin, ProfileField, ProvenanceMap,
};

/// What the engine did with one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Accepted,
    /// Field is operator-owned; automatic sources may not touch it.
    DroppedUserEdited,
    /// Candidate value was empty after trimming.
    DroppedEmptyValue,
    /// A higher-precedence source already filled the field in this pass.
    DroppedLowerPrecedence,
}

/// Pure reconciliation state: the profile plus per-field provenance.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    profile: CompanyProfile,
    provenance: ProvenanceMap,
    /// Current collection pass. Completions of the same pass compete under
    /// source precedence; a new pass restores last-writer-wins.
    pass_epoch: u64,
}

impl Reconciler {
    pub fn new(profile: CompanyProfile, provenance: ProvenanceMap) -> Self {
        Reconciler {
            profile,
            provenance,
            pass_epoch: 0,
        }
    }

    pub fn for_website(website: &str) -> Self {
        Self::new(CompanyProfile::for_website(website), ProvenanceMap::new())
    }

    /// Start a new collection pass. Batches applied until the next call
    /// compete under in-pass source precedence.
    pub fn begin_pass(&mut self) -> u64 {
        self.pass_epoch += 1;
        self.pass_epoch
    }

    pub fn profile(&self) -> &CompanyProfile {
        &self.profile
    }

    pub fn provenance(&self) -> &ProvenanceMap {
        &self.provenance
    }

    /// Apply one batch of candidates. Candidates are ordered by source
    /// precedence before applying so that, within the batch, a competing
    /// higher-precedence source lands last and wins the field.
    pub fn apply_batch(&mut self, mut candidates: Vec<Candidate>) -> usize {
        candidates.sort_by_key(|c| c.source.precedence());

        let mut accepted = 0;
        for candidate in &candidates {
            if self.apply_candidate(candidate) == ApplyOutcome::Accepted {
                accepted += 1;
            }
        }
        accepted
    }

    /// Apply a single candidate under the acceptance rules. Idempotent:
    /// applying the same candidate twice equals applying it once.
    pub fn apply_candidate(&mut self, candidate: &Candidate) -> ApplyOutcome {
        let value = candidate.value.trim();
        if value.is_empty() {
            return ApplyOutcome::DroppedEmptyValue;
        }
        // Compare against what the field will actually store
        let value = match candidate.field {
            ProfileField::Website => domain_utils::qualify_website(value),
            _ => value.to_string(),
        };

        let current = self.profile.get(candidate.field).map(str::to_string);
        let entry = self.provenance.entry(candidate.field).or_default();

        if entry.origin == Origin::UserEdited {
            debug!(
                "Dropping {} candidate for {}: field is user-edited",
                candidate.source, candidate.field
            );
            return ApplyOutcome::DroppedUserEdited;
        }

        // In-pass precedence: when a higher-precedence source already filled
        // this field during the current pass and the value is undiverged, a
        // lower-precedence completion arriving later does not overwrite it.
        let undiverged = current.is_some() && current == entry.last_suggested_value;
        if undiverged && entry.accepted_pass == Some(self.pass_epoch) {
            if let Some(held) = entry.origin.source_precedence() {
                if held > candidate.source.precedence() {
                    debug!(
                        "Dropping {} candidate for {}: outranked within this pass",
                        candidate.source, candidate.field
                    );
                    return ApplyOutcome::DroppedLowerPrecedence;
                }
            }
        }

        // Either the field is empty, it still holds the last auto-fill, or it
        // diverged without a user edit. All three accept: no user input has
        // claimed the field yet.
        self.profile.set(candidate.field, value.clone());
        entry.origin = Origin::from(candidate.source);
        entry.last_suggested_value = Some(value);
        entry.accepted_at = Some(Utc::now());
        entry.accepted_pass = Some(self.pass_epoch);

        debug!(
            "Accepted {} candidate for {}: {}",
            candidate.source, candidate.field, candidate.value
        );
        ApplyOutcome::Accepted
    }

    /// Single-candidate entry point for the UI's "suggest a value" path.
    pub fn suggest(&mut self, candidate: Candidate) -> ApplyOutcome {
        self.apply_candidate(&candidate)
    }

    /// The operator typed into a field by hand. The field becomes
    /// operator-owned and automatic sources may never overwrite it again.
    ///
    /// An empty edit clears the field but keeps it operator-owned, except for
    /// the name, which never goes back to empty once a source contributed one.
    pub fn record_user_edit(&mut self, field: ProfileField, value: &str) {
        let value = value.trim();

        if value.is_empty() {
            if field == ProfileField::Name && self.profile.name.is_some() {
                debug!("Ignoring empty user edit for name");
                return;
            }
            let entry = self.provenance.entry(field).or_default();
            entry.origin = Origin::UserEdited;
            entry.accepted_at = Some(Utc::now());
            self.clear_field(field);
            return;
        }

        self.profile.set(field, value.to_string());
        let entry = self.provenance.entry(field).or_default();
        entry.origin = Origin::UserEdited;
        entry.accepted_at = Some(Utc::now());
    }

    fn clear_field(&mut self, field: ProfileField) {
        match field {
            ProfileField::Name => self.profile.name = None,
            ProfileField::Website => self.profile.website = None,
            ProfileField::Industry => self.profile.industry = None,
            ProfileField::EmployeeCountBucket => self.profile.employee_count_bucket = None,
            ProfileField::Phone => self.profile.phone = None,
            ProfileField::StreetAddress => self.profile.address.street_address = None,
            ProfileField::City => self.profile.address.city = None,
            ProfileField::State => self.profile.address.state = None,
            ProfileField::PostalCode => self.profile.address.postal_code = None,
            ProfileField::Country => self.profile.address.country = None,
            ProfileField::LegacyAddress => self.profile.legacy_address = None,
        }
    }

    /// Provenance for one field, if any source or the operator has touched it.
    pub fn provenance_for(&self, field: ProfileField) -> Option<&FieldProvenance> {
        self.provenance.get(&field)
    }
}

/// Persistence boundary. The engine writes the full current profile after
/// each applied batch, never a diff, and assumes nothing about store
/// consistency between writes.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load(&self, company_id: &str) -> Option<(CompanyProfile, ProvenanceMap)>;
    async fn save(&self, company_id: &str, profile: &CompanyProfile, provenance: &ProvenanceMap);
}

/// In-memory store used by tests and the CLI.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, (CompanyProfile, ProvenanceMap)>>,
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn load(&self, company_id: &str) -> Option<(CompanyProfile, ProvenanceMap)> {
        self.records.lock().await.get(company_id).cloned()
    }

    async fn save(&self, company_id: &str, profile: &CompanyProfile, provenance: &ProvenanceMap) {
        self.records
            .lock()
            .await
            .insert(company_id.to_string(), (profile.clone(), provenance.clone()));
    }
}

/// Serialized single-writer handle around a `Reconciler`. Candidates arrive
/// from concurrent lookup completions; every apply goes through one lock so
/// provenance updates cannot be lost.
#[derive(Clone)]
pub struct SharedReconciler {
    company_id: String,
    inner: Arc<Mutex<Reconciler>>,
    store: Arc<dyn ProfileStore>,
}

impl SharedReconciler {
    pub fn new(company_id: &str, reconciler: Reconciler, store: Arc<dyn ProfileStore>) -> Self {
        SharedReconciler {
            company_id: company_id.to_string(),
            inner: Arc::new(Mutex::new(reconciler)),
            store,
        }
    }

    /// Start a new collection pass on the underlying engine.
    pub async fn begin_pass(&self) -> u64 {
        self.inner.lock().await.begin_pass()
    }

    /// Apply a batch and persist the full resulting profile. Returns the
    /// number of accepted candidates.
    pub async fn apply_batch(&self, candidates: Vec<Candidate>) -> usize {
        let mut guard = self.inner.lock().await;
        let accepted = guard.apply_batch(candidates);
        self.store
            .save(&self.company_id, guard.profile(), guard.provenance())
            .await;
        accepted
    }

    pub async fn suggest(&self, candidate: Candidate) -> ApplyOutcome {
        let mut guard = self.inner.lock().await;
        let outcome = guard.suggest(candidate);
        self.store
            .save(&self.company_id, guard.profile(), guard.provenance())
            .await;
        outcome
    }

    pub async fn record_user_edit(&self, field: ProfileField, value: &str) {
        let mut guard = self.inner.lock().await;
        guard.record_user_edit(field, value);
        self.store
            .save(&self.company_id, guard.profile(), guard.provenance())
            .await;
    }

    pub async fn snapshot(&self) -> (CompanyProfile, ProvenanceMap) {
        let guard = self.inner.lock().await;
        (guard.profile().clone(), guard.provenance().clone())
    }
}
