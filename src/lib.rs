// Allow dead code for public API functions that may not be used internally
// but are part of the library's exposed interface
#![allow(dead_code)]

pub mod cli;
pub mod config;
pub mod domain_signal;
pub mod domain_utils;
pub mod enrichment;
pub mod profile;
pub mod reconcile;
pub mod scrape;
pub mod trigger;

pub use profile::{Candidate, CandidateSource, CompanyProfile, FieldProvenance, Origin, ProfileField};
pub use reconcile::{ApplyOutcome, MemoryStore, ProfileStore, Reconciler, SharedReconciler};
pub use trigger::{CollectionState, TriggerPolicy};
