use crate::NatGatewayCommands;
use crate::utils::{self, Session};
use colored::Colorize;
use ncflow_cloud::{DataSource, create_record, destroy_record, refresh_record};
use ncflow_cloud_ncloud::{NatGatewayArgs, NatGatewayQuery, NatGatewayRecord, NcloudProvider};
use std::path::Path;

pub async fn handle(
    cmd: NatGatewayCommands,
    provider: &NcloudProvider,
    project_root: &Path,
) -> anyhow::Result<()> {
    match cmd {
        NatGatewayCommands::Create {
            key,
            vpc_no,
            zone,
            name,
            description,
        } => {
            let args = NatGatewayArgs {
                name,
                description,
                vpc_no,
                zone,
            };
            args.validate()?;

            println!(
                "{}",
                format!("Creating NAT gateway '{}'...", key).blue().bold()
            );
            let mut session = Session::open(project_root).await?;
            let result =
                create_record(&provider.nat_gateway(), &mut session.state, &key, &args).await;
            session.close().await?;

            let record = result?;
            println!("  ✓ {}", "NAT gateway is running".green());
            print_record(&record);
        }
        NatGatewayCommands::Show { key } => {
            let mut session = Session::open(project_root).await?;
            let result = refresh_record(&provider.nat_gateway(), &mut session.state, &key).await;
            session.close().await?;

            match result? {
                Some(record) => {
                    println!("{}", format!("NAT gateway '{}'", key).bold());
                    print_record(&record);
                }
                None => {
                    println!(
                        "  ℹ NAT gateway '{}' is not tracked or no longer exists",
                        key
                    );
                }
            }
        }
        NatGatewayCommands::Delete { key } => {
            println!(
                "{}",
                format!("Deleting NAT gateway '{}'...", key).yellow().bold()
            );
            let mut session = Session::open(project_root).await?;
            let result = destroy_record(&provider.nat_gateway(), &mut session.state, &key).await;
            session.close().await?;

            if result? {
                println!("  ✓ {}", "NAT gateway terminated".green());
            } else {
                println!("  ℹ NAT gateway '{}' is not tracked", key);
            }
        }
        NatGatewayCommands::Lookup { nat_gateway_no } => {
            let record = provider
                .nat_gateway_lookup()
                .read(&NatGatewayQuery { nat_gateway_no })
                .await?;
            utils::print_json(&record)?;
        }
    }
    Ok(())
}

fn print_record(record: &NatGatewayRecord) {
    utils::print_field("nat_gateway_no", Some(record.nat_gateway_no.as_str()));
    utils::print_field("name", record.name.as_deref());
    utils::print_field("description", record.description.as_deref());
    utils::print_field("public_ip", record.public_ip.as_deref());
    utils::print_field("vpc_no", record.vpc_no.as_deref());
    utils::print_field("zone", record.zone.as_deref());
    utils::print_status(&record.status);
}
