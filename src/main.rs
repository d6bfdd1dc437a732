use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod domain_signal;
mod domain_utils;
mod enrichment;
mod profile;
mod reconcile;
mod scrape;
mod trigger;

use cli::Cli;
use config::{AppConfig, ConfigError};
use enrichment::EnrichmentClient;
use profile::{CompanyProfile, ProfileField, ProvenanceMap};
use reconcile::{MemoryStore, Reconciler, SharedReconciler};
use trigger::{CollectionReport, PassOptions, TriggerPolicy};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.init {
        let path = AppConfig::create_default_config()?;
        println!("Created default configuration at {}", path.display());
        return Ok(());
    }

    let config = load_config()?;

    let domain = cli.domain.as_deref().map(domain_utils::normalize_domain);
    if let Some(d) = &domain {
        if !domain_utils::is_valid_domain(d) {
            return Err(anyhow!("'{}' does not look like a valid domain", d));
        }
    }
    let subject = domain
        .clone()
        .or_else(|| cli.company_name.clone())
        .ok_or_else(|| {
            anyhow!("Nothing to profile. Use --domain <domain> and/or --company-name <name> (or --init).")
        })?;

    let store = Arc::new(MemoryStore::default());
    let initial = match &domain {
        Some(d) => Reconciler::for_website(d),
        None => Reconciler::default(),
    };
    let reconciler = SharedReconciler::new(&subject, initial, store);
    let enrichment_client = EnrichmentClient::from_config(&config)
        .map_err(|e| anyhow!("Failed to build enrichment client: {}", e))?;

    // Domain-keyed sources only run when a domain is known; a name-only
    // invocation goes straight to the by-name enrichment lookup.
    let report = match &domain {
        Some(d) => {
            let options = PassOptions {
                domain_signal: !cli.skip_domain_signal,
                // Name-based lookup replaces the default by-domain enrichment
                enrichment: !cli.skip_enrichment && cli.company_name.is_none(),
                scrape: !cli.skip_scrape,
            };
            let mut policy = TriggerPolicy::new();
            Some(
                trigger::trigger_collection(
                    &mut policy,
                    d,
                    &config,
                    &reconciler,
                    &enrichment_client,
                    options,
                )
                .await
                .ok_or_else(|| anyhow!("Collection did not trigger for {}", d))?,
            )
        }
        None => None,
    };

    if let Some(name) = &cli.company_name {
        if !cli.skip_enrichment {
            match enrichment_client.by_name(name, cli.location.as_deref()).await {
                Ok(facts) => {
                    reconciler.apply_batch(facts.to_candidates()).await;
                }
                Err(e) => eprintln!("Enrichment by name failed: {}", e),
            }
        }
    }

    let (profile, provenance) = reconciler.snapshot().await;

    match cli.output_format.as_str() {
        "json" => print_json(&profile, &provenance, report.as_ref())?,
        "text" => print_text(&profile, &provenance, &subject, report.as_ref()),
        other => return Err(anyhow!("Unknown output format '{}'", other)),
    }

    Ok(())
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "companyprofiler=info",
        1 => "companyprofiler=debug",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config() -> Result<AppConfig> {
    match AppConfig::load() {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            if let Some(path) = AppConfig::prompt_create_config()? {
                println!("Created default configuration at {}", path.display());
                return Ok(AppConfig::load()?);
            }
            // Non-interactive or declined: run on the embedded defaults
            Ok(AppConfig::embedded_default()?)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_json(
    profile: &CompanyProfile,
    provenance: &ProvenanceMap,
    report: Option<&CollectionReport>,
) -> Result<()> {
    let out = serde_json::json!({
        "profile": profile,
        "provenance": provenance
            .iter()
            .map(|(field, p)| (field.to_string(), p))
            .collect::<std::collections::BTreeMap<_, _>>(),
        "domain_signal": report.and_then(|r| r.domain_signal.as_ref()),
        "no_automatic_data": report.map(|r| r.no_automatic_data()).unwrap_or(false),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn print_text(
    profile: &CompanyProfile,
    provenance: &ProvenanceMap,
    subject: &str,
    report: Option<&CollectionReport>,
) {
    if report.map(|r| r.no_automatic_data()).unwrap_or(false) {
        println!("No automatic data could be found for {}.", subject);
        return;
    }

    println!("Company profile for {}", subject);
    println!("--------------------------------------------");

    let fields = [
        ProfileField::Name,
        ProfileField::Website,
        ProfileField::Industry,
        ProfileField::EmployeeCountBucket,
        ProfileField::Phone,
        ProfileField::StreetAddress,
        ProfileField::City,
        ProfileField::State,
        ProfileField::PostalCode,
        ProfileField::Country,
    ];
    for field in fields {
        if let Some(value) = profile.get(field) {
            let origin = provenance
                .get(&field)
                .map(|p| format!("{:?}", p.origin))
                .unwrap_or_else(|| "Unset".to_string());
            println!("{:<22} {}  [{}]", format!("{}:", field), value, origin);
        }
    }

    if let Some(signal) = report.and_then(|r| r.domain_signal.as_ref()) {
        println!();
        println!("Domain signal");
        println!("--------------------------------------------");
        if let Some(date) = signal.registration_date {
            println!("registered:            {}", date);
        }
        if let Some(expiry) = signal.ssl_expiry {
            println!("ssl expires:           {}", expiry.date_naive());
        }
        if !signal.mx_records.is_empty() {
            println!("mx records:            {}", signal.mx_records.join(", "));
        }
        if let Some(mail) = &signal.inferred_mail_provider {
            println!("mail provider:         {}", mail);
        }
        if let Some(hosting) = &signal.hosting_provider {
            println!("hosting provider:      {}", hosting);
        }
        if !signal.tech_stack.is_empty() {
            println!(
                "tech stack:            {}",
                signal.tech_stack.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }
    }
}
