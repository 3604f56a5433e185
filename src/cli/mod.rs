pub mod commands;

use crate::config::{CredentialSource, DEFAULT_LISTEN_ADDR, DEFAULT_SCRAPE_TIMEOUT_SECS};
use crate::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kube-usage-metrics")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Per-namespace CPU and memory usage from the Kubernetes metrics API", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        env = "KUBE_USAGE_KUBECONFIG",
        help = "Path to a kubeconfig file (default: KUBECONFIG, ~/.kube/config, then in-cluster)"
    )]
    pub kubeconfig: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "KUBE_USAGE_CONTEXT",
        help = "Context to use from --kubeconfig"
    )]
    pub context: Option<String>,

    #[arg(
        long,
        global = true,
        env = "KUBE_USAGE_IN_CLUSTER",
        help = "Use the pod's service account credentials"
    )]
    pub in_cluster: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn credential_source(&self) -> Result<CredentialSource> {
        CredentialSource::from_flags(
            self.kubeconfig.clone(),
            self.context.clone(),
            self.in_cluster,
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Print per-namespace usage once and exit")]
    Report,
    #[command(about = "Serve per-namespace usage as Prometheus metrics")]
    Serve {
        #[arg(
            short,
            long,
            env = "KUBE_USAGE_LISTEN",
            default_value = DEFAULT_LISTEN_ADDR,
            help = "Address to listen on"
        )]
        listen: String,

        #[arg(
            long,
            env = "KUBE_USAGE_SCRAPE_TIMEOUT",
            default_value_t = DEFAULT_SCRAPE_TIMEOUT_SECS,
            help = "Seconds a scrape may wait for the metrics API"
        )]
        scrape_timeout: u64,

        #[arg(
            long,
            env = "KUBE_USAGE_LOG_SAMPLES",
            help = "Also log every sample served on /metrics"
        )]
        log_samples: bool,
    },
}
