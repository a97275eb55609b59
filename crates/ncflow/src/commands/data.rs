use crate::utils;
use colored::Colorize;
use ncflow_cloud::DataSource;
use ncflow_cloud_ncloud::{NcloudProvider, RegionsQuery, ZonesQuery};
use std::path::PathBuf;

pub async fn handle_regions(
    provider: &NcloudProvider,
    code: Option<String>,
    support_vpc: bool,
    output_file: Option<PathBuf>,
) -> anyhow::Result<()> {
    let query = RegionsQuery {
        code,
        support_vpc,
        output_file,
    };
    let output = provider.regions().read(&query).await?;

    utils::print_json(&output.regions)?;
    if let Some(path) = &query.output_file {
        println!("  ✓ Wrote {}", path.display().to_string().cyan());
    }
    Ok(())
}

pub async fn handle_zones(
    provider: &NcloudProvider,
    region: Option<String>,
    output_file: Option<PathBuf>,
) -> anyhow::Result<()> {
    let query = ZonesQuery {
        region,
        output_file,
    };
    let output = provider.zones().read(&query).await?;

    utils::print_json(&output.zones)?;
    if let Some(path) = &query.output_file {
        println!("  ✓ Wrote {}", path.display().to_string().cyan());
    }
    Ok(())
}
