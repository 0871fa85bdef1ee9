//! Purpose: Schema-specific extractors for list and apply responses.
//! Exports: `InterfaceRecord`, `AddressEntry`, `ApplyReport`, `OpResult`, parse entrypoints.
//! Role: Best-effort reader for the two response shapes the tool library emits.
//! Invariants: Extraction never fails a whole document; broken fields read as absent.
//! Invariants: Decoded sequences are bounded; overlong input truncates silently.

use crate::core::scan::{Cursor, find_key, find_object_end};

pub const MAX_INTERFACES: usize = 64;
pub const MAX_ADDRESSES: usize = 64;
pub const MAX_RESULTS: usize = 64;

const NAME_MAX: usize = 128;
const IP_MAX: usize = 96;
const CODE_MAX: usize = 64;
const MESSAGE_MAX: usize = 256;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InterfaceRecord {
    pub if_index: u32,
    pub name: String,
    pub ipv4: Vec<AddressEntry>,
    pub ipv6: Vec<AddressEntry>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AddressEntry {
    pub ip: String,
    pub prefix_len: u32,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ApplyReport {
    pub ok: bool,
    pub results: Vec<OpResult>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OpResult {
    pub i: u32,
    pub ok: bool,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Decodes a list response into interface records, in document order.
///
/// A missing or malformed `items` array yields an empty list. Entries past
/// `MAX_INTERFACES` are dropped, not an error.
pub fn parse_interface_list(bytes: &[u8]) -> Vec<InterfaceRecord> {
    let Some(offset) = find_key(bytes, "items") else {
        return Vec::new();
    };
    let mut records = Vec::new();
    for_each_array_object(bytes, offset, MAX_INTERFACES, |entry| {
        records.push(parse_interface_entry(entry));
    });
    records
}

fn parse_interface_entry(entry: &[u8]) -> InterfaceRecord {
    let mut record = InterfaceRecord::default();
    if let Some(offset) = find_key(entry, "if_index") {
        if let Some(value) = Cursor::at(entry, offset).parse_u32() {
            record.if_index = value;
        }
    }
    if let Some(offset) = find_key(entry, "name") {
        if let Some(name) = Cursor::at(entry, offset).parse_string(NAME_MAX) {
            record.name = name;
        }
    }
    record.ipv4 = parse_address_array(entry, "ipv4");
    record.ipv6 = parse_address_array(entry, "ipv6");
    record
}

/// Decodes the `key` address array inside one interface object span.
///
/// Entries whose `ip` decodes empty (including `null`) are dropped without
/// counting toward the `MAX_ADDRESSES` bound's truncation output.
pub fn parse_address_array(span: &[u8], key: &str) -> Vec<AddressEntry> {
    let Some(offset) = find_key(span, key) else {
        return Vec::new();
    };
    let mut entries = Vec::new();
    for_each_array_object(span, offset, MAX_ADDRESSES, |entry| {
        let ip = find_key(entry, "ip")
            .and_then(|o| Cursor::at(entry, o).parse_optional_string(IP_MAX))
            .unwrap_or_default();
        if ip.is_empty() {
            return;
        }
        let prefix_len = find_key(entry, "prefix_len")
            .and_then(|o| Cursor::at(entry, o).parse_u32())
            .unwrap_or(0);
        entries.push(AddressEntry { ip, prefix_len });
    });
    entries
}

/// Decodes an apply response. A response without a `results` key is a
/// degenerate success: zero results, only the top-level `ok` is meaningful.
pub fn parse_apply_response(bytes: &[u8]) -> ApplyReport {
    let ok = find_key(bytes, "ok")
        .and_then(|o| Cursor::at(bytes, o).parse_bool())
        .unwrap_or(false);
    let mut report = ApplyReport {
        ok,
        results: Vec::new(),
    };
    let Some(offset) = find_key(bytes, "results") else {
        return report;
    };
    let results = &mut report.results;
    for_each_array_object(bytes, offset, MAX_RESULTS, |entry| {
        let i = find_key(entry, "i")
            .and_then(|o| Cursor::at(entry, o).parse_u32())
            .unwrap_or(0);
        let step_ok = find_key(entry, "ok")
            .and_then(|o| Cursor::at(entry, o).parse_bool())
            .unwrap_or(false);
        let mut code = None;
        let mut message = None;
        if !step_ok {
            if let Some(err_span) = error_object_span(entry) {
                code = decode_error_code(err_span);
                message = find_key(err_span, "message")
                    .and_then(|o| Cursor::at(err_span, o).parse_optional_string(MESSAGE_MAX))
                    .filter(|text| !text.is_empty());
            }
        }
        results.push(OpResult {
            i,
            ok: step_ok,
            code,
            message,
        });
    });
    report
}

fn error_object_span(entry: &[u8]) -> Option<&[u8]> {
    let offset = find_key(entry, "error")?;
    let mut cursor = Cursor::at(entry, offset);
    cursor.skip_ws();
    let start = cursor.pos();
    let end = find_object_end(entry, start)?;
    Some(&entry[start..=end])
}

/// The `code` field is a string in current responses, but older tool builds
/// emitted a bare integer; those render to their decimal text form.
fn decode_error_code(span: &[u8]) -> Option<String> {
    let offset = find_key(span, "code")?;
    if let Some(code) = Cursor::at(span, offset).parse_optional_string(CODE_MAX) {
        if !code.is_empty() {
            return Some(code);
        }
    }
    Cursor::at(span, offset).parse_u32().map(|v| v.to_string())
}

/// Walks the array value that starts at `offset` (just past a key's colon),
/// invoking `visit` with each brace-balanced object span, up to `max` spans.
///
/// Non-object tokens between entries are skipped one byte at a time; a
/// truncated entry ends the walk without failing what was already visited.
fn for_each_array_object(span: &[u8], offset: usize, max: usize, mut visit: impl FnMut(&[u8])) {
    let mut cursor = Cursor::at(span, offset);
    cursor.skip_ws();
    let mut pos = cursor.pos();
    if span.get(pos) != Some(&b'[') {
        return;
    }
    pos += 1;
    let mut seen = 0usize;
    while pos < span.len() && seen < max {
        let mut cursor = Cursor::at(span, pos);
        cursor.skip_ws();
        pos = cursor.pos();
        match span.get(pos) {
            None | Some(b']') => break,
            Some(b'{') => {}
            Some(_) => {
                pos += 1;
                continue;
            }
        }
        let Some(end) = find_object_end(span, pos) else {
            break;
        };
        visit(&span[pos..=end]);
        seen += 1;
        pos = end + 1;
    }
}
