mod commands;
mod utils;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ncflow_cloud_ncloud::{Config, NcloudProvider, Site};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ncflow")]
#[command(
    about = "Provision NAVER CLOUD PLATFORM networks and track them in a local state file",
    long_about = None
)]
struct Cli {
    /// Project directory holding `.ncflow/state.json`
    #[arg(long, global = true, env = "NCFLOW_PROJECT", default_value = ".")]
    project: PathBuf,
    /// NCloud site: public, gov or fin
    #[arg(long, global = true, env = "NCLOUD_SITE")]
    site: Option<Site>,
    /// Show debug logs, including API requests and responses
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage VPCs
    #[command(subcommand)]
    Vpc(VpcCommands),
    /// Manage NAT gateways
    #[command(subcommand)]
    NatGateway(NatGatewayCommands),
    /// List regions
    Regions {
        /// Only the region with this code (e.g. KR)
        #[arg(long)]
        code: Option<String>,
        /// List VPC platform regions
        #[arg(long)]
        support_vpc: bool,
        /// Also write the regions to this file as JSON
        #[arg(long)]
        output_file: Option<PathBuf>,
    },
    /// List zones of a region
    Zones {
        /// Region code (defaults to NCLOUD_REGION)
        #[arg(long)]
        region: Option<String>,
        /// Also write the zones to this file as JSON
        #[arg(long)]
        output_file: Option<PathBuf>,
    },
    /// List resources recorded in the state file
    State,
    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub(crate) enum VpcCommands {
    /// Create a VPC and wait until it is running
    Create {
        /// Local name the VPC is recorded under
        key: String,
        /// IPv4 CIDR block, /16 to /28 (e.g. 10.0.0.0/16)
        #[arg(long)]
        cidr: String,
        /// VPC name (assigned by NCloud when omitted)
        #[arg(long)]
        name: Option<String>,
    },
    /// Refresh and show a recorded VPC
    Show {
        /// Local name of the VPC
        key: String,
    },
    /// Delete a recorded VPC and wait until it is terminated
    Delete {
        /// Local name of the VPC
        key: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum NatGatewayCommands {
    /// Create a NAT gateway and wait until it is running
    Create {
        /// Local name the NAT gateway is recorded under
        key: String,
        /// VPC the gateway belongs to
        #[arg(long)]
        vpc_no: String,
        /// Zone code (e.g. KR-1)
        #[arg(long)]
        zone: String,
        /// NAT gateway name (assigned by NCloud when omitted)
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Refresh and show a recorded NAT gateway
    Show {
        /// Local name of the NAT gateway
        key: String,
    },
    /// Delete a recorded NAT gateway and wait until it is terminated
    Delete {
        /// Local name of the NAT gateway
        key: String,
    },
    /// Look up any NAT gateway by its instance number
    Lookup {
        /// NAT gateway instance number
        nat_gateway_no: String,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // No credentials needed
    match cli.command {
        Commands::Version => {
            println!("ncflow {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::State => {
            return commands::state::handle(&cli.project).await;
        }
        _ => {}
    }

    let mut config = Config::from_env().context("Failed to load NCloud configuration")?;
    if let Some(site) = cli.site {
        config = config.with_site(site);
    }
    tracing::debug!(?config, "Loaded configuration");
    let provider = NcloudProvider::new(&config)?;

    match cli.command {
        Commands::Vpc(cmd) => {
            commands::vpc::handle(cmd, &provider, &cli.project).await?;
        }
        Commands::NatGateway(cmd) => {
            commands::nat_gateway::handle(cmd, &provider, &cli.project).await?;
        }
        Commands::Regions {
            code,
            support_vpc,
            output_file,
        } => {
            commands::data::handle_regions(&provider, code, support_vpc, output_file).await?;
        }
        Commands::Zones {
            region,
            output_file,
        } => {
            commands::data::handle_zones(&provider, region, output_file).await?;
        }
        Commands::State | Commands::Version => {
            unreachable!("handled before configuration loading");
        }
    }

    Ok(())
}
