use clap::{Args, Parser, Subcommand};
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "faview")]
#[command(about = "Fetch and view regions of remote indexed FASTA files")]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, env = "FAVIEW_HTTP_TIMEOUT", default_value = "30", global = true)]
    pub http_timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the browser viewer
    Serve(ServeArgs),
    /// Print residues for regions as FASTA records
    Fetch(FetchArgs),
    /// List the sequences in a FASTA index
    Sequences(SequencesArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long, env = "FAVIEW_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "FAVIEW_PORT", default_value = "8080")]
    pub port: u16,

    /// FASTA URL shown when the viewer starts
    #[arg(
        long,
        env = "FAVIEW_URL",
        default_value = "https://jbrowse.org/genomes/hg19/fasta/hg19.fa.gz"
    )]
    pub url: String,

    /// Regions shown when the viewer starts, one per line
    #[arg(long, env = "FAVIEW_LOCATIONS", default_value = "1:1-100")]
    pub locations: String,

    /// Enable CORS for all origins
    #[arg(long, env = "FAVIEW_CORS")]
    pub cors: bool,
}

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// FASTA file URL or path; `.gz` selects the bgzip reader
    pub url: String,

    /// Regions as name:start-end; read from stdin when omitted
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SequencesArgs {
    /// FASTA file URL or path
    pub url: String,

    /// Print JSON instead of tab-separated text
    #[arg(long)]
    pub json: bool,
}

impl Config {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }
}

impl ServeArgs {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
