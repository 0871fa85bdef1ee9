// Operand validation performed before request construction, never by the builder.
use crate::core::error::{Error, ErrorKind};
use crate::core::request::Operation;

pub const IPV4_PREFIX_MAX: u32 = 32;
pub const IPV6_PREFIX_MAX: u32 = 128;

/// Colon heuristic: every textual IPv6 form contains one, no IPv4 form does.
pub fn is_ipv6_literal(ip: &str) -> bool {
    ip.contains(':')
}

pub fn check_address(ip: &str, prefix_len: u32) -> Result<(), Error> {
    if ip.is_empty() {
        return Err(Error::new(ErrorKind::Usage).with_message("ip must not be empty"));
    }
    let max = if is_ipv6_literal(ip) {
        IPV6_PREFIX_MAX
    } else {
        IPV4_PREFIX_MAX
    };
    if prefix_len > max {
        return Err(Error::new(ErrorKind::Usage)
            .with_message(format!("prefix_len {prefix_len} out of range (0..={max})")));
    }
    Ok(())
}

pub fn check_operation(op: &Operation) -> Result<(), Error> {
    match op {
        Operation::AddIp { ip, prefix_len } => {
            check_address(ip, *prefix_len)?;
            if *prefix_len == 0 {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("adding an address requires prefix_len >= 1")
                    .with_hint("A /0 address breaks local routing; use del-ip to clean one up."));
            }
            Ok(())
        }
        Operation::DelIp { ip, prefix_len } => check_address(ip, *prefix_len),
        Operation::SetIpv4Static { ip, prefix_len, .. } => {
            if ip.is_empty() || is_ipv6_literal(ip) {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("set_ipv4_static requires an IPv4 literal"));
            }
            if *prefix_len == 0 || *prefix_len > IPV4_PREFIX_MAX {
                return Err(Error::new(ErrorKind::Usage).with_message(format!(
                    "prefix_len {prefix_len} out of range (1..={IPV4_PREFIX_MAX})"
                )));
            }
            Ok(())
        }
        Operation::SetIpv4Dhcp { .. } => Ok(()),
    }
}
