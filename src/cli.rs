use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "companyprofiler")]
#[command(about = "Builds a reviewable company profile from DNS signals, enrichment lookups and website scraping")]
#[command(version)]
pub struct Cli {
    /// Create default configuration file at ./config/companyprofiler.toml
    #[arg(long)]
    pub init: bool,

    /// Domain of the prospect company to profile
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Company name for an enrichment lookup by name instead of by domain
    #[arg(long)]
    pub company_name: Option<String>,

    /// Location hint for the name-based enrichment lookup
    #[arg(long)]
    pub location: Option<String>,

    /// Output format: 'text' (default) or 'json'
    #[arg(short = 'f', long, default_value = "text")]
    pub output_format: String,

    /// Skip the passive domain/DNS signal collection
    #[arg(long)]
    pub skip_domain_signal: bool,

    /// Skip the enrichment service lookup
    #[arg(long)]
    pub skip_enrichment: bool,

    /// Skip the website scrape
    #[arg(long)]
    pub skip_scrape: bool,

    /// Verbose logging (use -v for DEBUG in this crate, -vv everywhere)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
