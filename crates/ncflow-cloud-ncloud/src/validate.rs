//! Argument validation applied before any API call

use crate::error::{NcloudError, Result};
use ipnet::Ipv4Net;
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

static INSTANCE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9-]*[a-z0-9]$").expect("instance name pattern is valid")
});

const INSTANCE_NAME_LEN: RangeInclusive<usize> = 3..=30;

/// VPC CIDR prefix lengths accepted by NCloud
pub const VPC_CIDR_PREFIX: RangeInclusive<u8> = 16..=28;

pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Lowercase letters, digits and hyphens; starts with a letter and ends
/// with a letter or digit; 3 to 30 characters.
pub fn instance_name(field: &str, value: &str) -> Result<()> {
    if !INSTANCE_NAME_LEN.contains(&value.chars().count()) {
        return Err(NcloudError::invalid(
            field,
            format!(
                "must be between {} and {} characters, got `{}`",
                INSTANCE_NAME_LEN.start(),
                INSTANCE_NAME_LEN.end(),
                value
            ),
        ));
    }
    if !INSTANCE_NAME.is_match(value) {
        return Err(NcloudError::invalid(
            field,
            format!(
                "`{}` must consist of lowercase letters, digits and hyphens, \
                 start with a letter and end with a letter or digit",
                value
            ),
        ));
    }
    Ok(())
}

/// An IPv4 network address (host bits zero) with a prefix in `prefix`
pub fn cidr_network(field: &str, value: &str, prefix: RangeInclusive<u8>) -> Result<Ipv4Net> {
    let net: Ipv4Net = value
        .parse()
        .map_err(|_| NcloudError::invalid(field, format!("`{}` is not a valid IPv4 CIDR", value)))?;

    if net.network() != net.addr() {
        return Err(NcloudError::invalid(
            field,
            format!("`{}` is not a network address (expected {})", value, net.trunc()),
        ));
    }
    if !prefix.contains(&net.prefix_len()) {
        return Err(NcloudError::invalid(
            field,
            format!(
                "prefix /{} is outside /{}../{}",
                net.prefix_len(),
                prefix.start(),
                prefix.end()
            ),
        ));
    }
    Ok(net)
}

pub fn max_len(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(NcloudError::invalid(
            field,
            format!("must be at most {} characters, got {}", max, len),
        ));
    }
    Ok(())
}

pub fn not_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NcloudError::invalid(field, "must not be empty"));
    }
    Ok(())
}
