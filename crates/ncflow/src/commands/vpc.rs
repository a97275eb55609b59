use crate::VpcCommands;
use crate::utils::{self, Session};
use colored::Colorize;
use ncflow_cloud::{create_record, destroy_record, refresh_record};
use ncflow_cloud_ncloud::{NcloudProvider, VpcArgs, VpcRecord};
use std::path::Path;

pub async fn handle(
    cmd: VpcCommands,
    provider: &NcloudProvider,
    project_root: &Path,
) -> anyhow::Result<()> {
    match cmd {
        VpcCommands::Create { key, cidr, name } => {
            let args = VpcArgs {
                name,
                ipv4_cidr_block: cidr,
            };
            args.validate()?;

            println!("{}", format!("Creating VPC '{}'...", key).blue().bold());
            let mut session = Session::open(project_root).await?;
            let result = create_record(&provider.vpc(), &mut session.state, &key, &args).await;
            session.close().await?;

            let record = result?;
            println!("  ✓ {}", "VPC is running".green());
            print_record(&record);
        }
        VpcCommands::Show { key } => {
            let mut session = Session::open(project_root).await?;
            let result = refresh_record(&provider.vpc(), &mut session.state, &key).await;
            session.close().await?;

            match result? {
                Some(record) => {
                    println!("{}", format!("VPC '{}'", key).bold());
                    print_record(&record);
                }
                None => {
                    println!("  ℹ VPC '{}' is not tracked or no longer exists", key);
                }
            }
        }
        VpcCommands::Delete { key } => {
            println!("{}", format!("Deleting VPC '{}'...", key).yellow().bold());
            let mut session = Session::open(project_root).await?;
            let result = destroy_record(&provider.vpc(), &mut session.state, &key).await;
            session.close().await?;

            if result? {
                println!("  ✓ {}", "VPC terminated".green());
            } else {
                println!("  ℹ VPC '{}' is not tracked", key);
            }
        }
    }
    Ok(())
}

fn print_record(record: &VpcRecord) {
    utils::print_field("vpc_no", Some(record.vpc_no.as_str()));
    utils::print_field("name", record.name.as_deref());
    utils::print_field("ipv4_cidr_block", record.ipv4_cidr_block.as_deref());
    utils::print_field(
        "default_network_acl_no",
        record.default_network_acl_no.as_deref(),
    );
    utils::print_status(&record.status);
}
