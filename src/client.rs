//! Purpose: Session-level client over the tool boundary.
//! Exports: `NetifClient`, `ApplyOutcome`, `DEFAULT_SAVE_PATH`.
//! Role: Owns the cached last list-response; every round-trip goes through here.
//! Invariants: The cache is replaced only by a successful, non-empty refresh.
//! Invariants: Operations are validated before request construction.

use std::fs;
use std::path::Path;

use crate::core::error::{Error, ErrorKind};
use crate::core::extract::{
    ApplyReport, InterfaceRecord, parse_apply_response, parse_interface_list,
};
use crate::core::request::{Operation, build_apply_request};
use crate::core::validate::check_operation;
use crate::ffi::NetifTool;

pub const DEFAULT_SAVE_PATH: &str = "netif_list.json";

pub struct NetifClient<T> {
    tool: T,
    last_raw: Option<Vec<u8>>,
}

#[derive(Debug)]
pub struct ApplyOutcome {
    pub status: i32,
    pub raw: Vec<u8>,
    pub report: ApplyReport,
}

impl<T: NetifTool> NetifClient<T> {
    pub fn new(tool: T) -> Self {
        Self {
            tool,
            last_raw: None,
        }
    }

    /// Fetches a fresh list-response, replacing the cached snapshot on success.
    pub fn refresh(&mut self) -> Result<Vec<InterfaceRecord>, Error> {
        let reply = self.tool.list_json()?;
        if reply.body.is_empty() {
            return Err(Error::new(ErrorKind::Boundary)
                .with_message("tool returned no list data")
                .with_status(reply.status));
        }
        let records = parse_interface_list(&reply.body);
        self.last_raw = Some(reply.body);
        Ok(records)
    }

    pub fn last_raw(&self) -> Option<&[u8]> {
        self.last_raw.as_deref()
    }

    pub fn has_cache(&self) -> bool {
        self.last_raw.is_some()
    }

    /// Re-decodes the cached snapshot; empty when nothing was fetched yet.
    pub fn cached_interfaces(&self) -> Vec<InterfaceRecord> {
        self.last_raw
            .as_deref()
            .map(parse_interface_list)
            .unwrap_or_default()
    }

    /// Validates, builds, and round-trips one operation against `if_index`.
    pub fn apply(&self, if_index: u32, op: &Operation) -> Result<ApplyOutcome, Error> {
        check_operation(op)?;
        let request = build_apply_request(if_index, op)?;
        let reply = self.tool.apply_json(request.as_bytes())?;
        let report = parse_apply_response(&reply.body);
        Ok(ApplyOutcome {
            status: reply.status,
            raw: reply.body,
            report,
        })
    }

    /// Writes the raw cached list-response plus a trailing newline.
    pub fn save_last(&self, path: &Path) -> Result<(), Error> {
        let Some(raw) = self.last_raw.as_deref() else {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("no cached list response to save")
                .with_hint("Refresh the interface list first."));
        };
        let mut bytes = Vec::with_capacity(raw.len() + 1);
        bytes.extend_from_slice(raw);
        bytes.push(b'\n');
        fs::write(path, bytes).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to save list response")
                .with_path(path)
                .with_source(err)
        })
    }

    /// Resolves a user-entered token against the cached list: a list ordinal,
    /// an `if_index`, or an interface name, in that order.
    pub fn resolve_interface(&self, token: &str) -> Option<u32> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        let rows = self.cached_interfaces();
        if let Ok(value) = token.parse::<u32>() {
            if value != 0 && (value as usize) < rows.len() {
                return Some(rows[value as usize].if_index);
            }
            if rows.iter().any(|row| row.if_index == value) {
                return Some(value);
            }
            return None;
        }
        rows.iter()
            .find(|row| row.name == token)
            .map(|row| row.if_index)
    }
}
