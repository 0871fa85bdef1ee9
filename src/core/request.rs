//! Purpose: Compose apply-request documents for the tool library.
//! Exports: `Operation`, `build_apply_request`, `ABI_VERSION`.
//! Role: The only writer of request JSON; emits byte-exact fixed-shape documents.
//! Invariants: Every request wraps exactly one operation in the versioned envelope.
//! Invariants: An unsupplied gateway omits the key entirely, it is never `null`.

use crate::core::buffer::ByteBuf;
use crate::core::error::Error;

pub const ABI_VERSION: u32 = 1;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Operation {
    AddIp {
        ip: String,
        prefix_len: u32,
    },
    DelIp {
        ip: String,
        prefix_len: u32,
    },
    SetIpv4Static {
        ip: String,
        prefix_len: u32,
        gateway: Option<String>,
    },
    SetIpv4Dhcp {
        enable: bool,
    },
}

impl Operation {
    pub fn op_name(&self) -> &'static str {
        match self {
            Operation::AddIp { .. } => "add_ip",
            Operation::DelIp { .. } => "del_ip",
            Operation::SetIpv4Static { .. } => "set_ipv4_static",
            Operation::SetIpv4Dhcp { .. } => "set_ipv4_dhcp",
        }
    }
}

/// Builds the single-operation apply document targeting `if_index`.
pub fn build_apply_request(if_index: u32, op: &Operation) -> Result<ByteBuf, Error> {
    let mut buf = ByteBuf::new();
    buf.append_fmt(format_args!(
        "{{\"abi\":{ABI_VERSION},\"target\":{{\"if_index\":{if_index}}},\"ops\":["
    ))?;
    append_op(&mut buf, op)?;
    buf.append_bytes(b"]}")?;
    Ok(buf)
}

fn append_op(buf: &mut ByteBuf, op: &Operation) -> Result<(), Error> {
    match op {
        Operation::AddIp { ip, prefix_len } | Operation::DelIp { ip, prefix_len } => {
            buf.append_fmt(format_args!("{{\"op\":\"{}\",\"ip\":", op.op_name()))?;
            append_json_string(buf, ip)?;
            buf.append_fmt(format_args!(",\"prefix_len\":{prefix_len}}}"))
        }
        Operation::SetIpv4Static {
            ip,
            prefix_len,
            gateway,
        } => {
            buf.append_bytes(b"{\"op\":\"set_ipv4_static\",\"ip\":")?;
            append_json_string(buf, ip)?;
            buf.append_fmt(format_args!(",\"prefix_len\":{prefix_len}"))?;
            if let Some(gateway) = gateway {
                buf.append_bytes(b",\"gateway\":")?;
                append_json_string(buf, gateway)?;
            }
            buf.append_bytes(b"}")
        }
        Operation::SetIpv4Dhcp { enable } => buf.append_fmt(format_args!(
            "{{\"op\":\"set_ipv4_dhcp\",\"enable\":{enable}}}"
        )),
    }
}

/// Appends `value` as a quoted JSON string. Operands come from console input,
/// so quotes, backslashes, and control bytes must not leak through unescaped.
fn append_json_string(buf: &mut ByteBuf, value: &str) -> Result<(), Error> {
    buf.append_bytes(b"\"")?;
    for c in value.chars() {
        match c {
            '"' => buf.append_bytes(b"\\\"")?,
            '\\' => buf.append_bytes(b"\\\\")?,
            '\n' => buf.append_bytes(b"\\n")?,
            '\r' => buf.append_bytes(b"\\r")?,
            '\t' => buf.append_bytes(b"\\t")?,
            '\u{8}' => buf.append_bytes(b"\\b")?,
            '\u{c}' => buf.append_bytes(b"\\f")?,
            c if (c as u32) < 0x20 => {
                buf.append_fmt(format_args!("\\u{:04x}", c as u32))?;
            }
            c => {
                let mut utf8 = [0u8; 4];
                buf.append_bytes(c.encode_utf8(&mut utf8).as_bytes())?;
            }
        }
    }
    buf.append_bytes(b"\"")
}
