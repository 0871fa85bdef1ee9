// Human-readable rendering of interface rows and apply summaries.
use std::io::{self, Write};

use netifctl::client::ApplyOutcome;
use netifctl::core::extract::{AddressEntry, ApplyReport, InterfaceRecord};

pub fn interface_rows(records: &[InterfaceRecord]) -> String {
    let mut out = String::new();
    for (ordinal, record) in records.iter().enumerate() {
        let name = if record.name.is_empty() {
            "(no name)"
        } else {
            record.name.as_str()
        };
        out.push_str(&format!(
            "[{ordinal}] if_index={}  name={name}\n",
            record.if_index
        ));
        out.push_str(&format!("    IPv4={}\n", address_list(&record.ipv4)));
        out.push_str(&format!("    IPv6={}\n", address_list(&record.ipv6)));
    }
    out
}

fn address_list(entries: &[AddressEntry]) -> String {
    if entries.is_empty() {
        return "-".to_string();
    }
    entries
        .iter()
        .map(|entry| format!("{}/{}", entry.ip, entry.prefix_len))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn apply_summary(report: &ApplyReport) -> String {
    let mut out = String::new();
    out.push_str("---- apply summary ----\n");
    out.push_str(&format!(
        "overall: {}\n",
        if report.ok { "ok" } else { "failed" }
    ));
    for step in &report.results {
        if step.ok {
            out.push_str(&format!("- step {}: ok\n", step.i));
            continue;
        }
        match &step.code {
            Some(code) => {
                out.push_str(&format!(
                    "- step {}: failed ({}): {}\n",
                    step.i,
                    describe_code(code),
                    step.message.as_deref().unwrap_or("(no details)")
                ));
                if let Some(hint) = hint_for_code(code) {
                    out.push_str(&format!("  hint: {hint}\n"));
                }
            }
            None => out.push_str(&format!("- step {}: failed\n", step.i)),
        }
    }
    out.push_str("-----------------------\n");
    out
}

/// Prints the raw response followed by the rendered summary, the way an
/// operator wants to read an apply round-trip.
pub fn print_apply_outcome(outcome: &ApplyOutcome) {
    if !outcome.raw.is_empty() {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(&outcome.raw);
        let _ = stdout.write_all(b"\n");
    }
    print!("{}", apply_summary(&outcome.report));
}

/// Known boundary error codes render as short phrases; unknown codes pass through.
pub fn describe_code(code: &str) -> &str {
    match code {
        "Ok" => "ok",
        "InvalidArgument" => "invalid argument",
        "NotFound" => "not found",
        "Unsupported" => "unsupported",
        "PermissionDenied" => "permission denied",
        "SystemError" => "system error",
        other => other,
    }
}

pub fn hint_for_code(code: &str) -> Option<&'static str> {
    match code {
        "PermissionDenied" => Some("Modifying interfaces on Linux usually needs sudo/root."),
        "Unsupported" => {
            Some("DHCP control on Linux depends on NetworkManager/systemd-networkd.")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_summary, describe_code, interface_rows};
    use netifctl::core::extract::{AddressEntry, ApplyReport, InterfaceRecord, OpResult};

    #[test]
    fn rows_show_ordinals_and_addresses() {
        let records = vec![InterfaceRecord {
            if_index: 2,
            name: "eth0".to_string(),
            ipv4: vec![AddressEntry {
                ip: "10.0.0.2".to_string(),
                prefix_len: 24,
            }],
            ipv6: vec![],
        }];
        let text = interface_rows(&records);
        assert!(text.contains("[0] if_index=2  name=eth0"));
        assert!(text.contains("IPv4=10.0.0.2/24"));
        assert!(text.contains("IPv6=-"));
    }

    #[test]
    fn nameless_interfaces_get_a_placeholder() {
        let records = vec![InterfaceRecord {
            if_index: 9,
            ..Default::default()
        }];
        assert!(interface_rows(&records).contains("name=(no name)"));
    }

    #[test]
    fn summary_explains_failed_steps() {
        let report = ApplyReport {
            ok: false,
            results: vec![OpResult {
                i: 0,
                ok: false,
                code: Some("PermissionDenied".to_string()),
                message: Some("denied".to_string()),
            }],
        };
        let text = apply_summary(&report);
        assert!(text.contains("overall: failed"));
        assert!(text.contains("- step 0: failed (permission denied): denied"));
        assert!(text.contains("hint:"));
    }

    #[test]
    fn summary_handles_bare_failures() {
        let report = ApplyReport {
            ok: true,
            results: vec![
                OpResult {
                    i: 0,
                    ok: true,
                    code: None,
                    message: None,
                },
                OpResult {
                    i: 1,
                    ok: false,
                    code: None,
                    message: None,
                },
            ],
        };
        let text = apply_summary(&report);
        assert!(text.contains("- step 0: ok"));
        assert!(text.contains("- step 1: failed\n"));
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(describe_code("WeirdCode"), "WeirdCode");
        assert_eq!(describe_code("PermissionDenied"), "permission denied");
    }
}
