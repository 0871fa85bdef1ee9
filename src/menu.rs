//! Purpose: Interactive menu loop for a netifctl session.
//! Role: Console driver; prompts go to stderr, results to stdout.
//! Invariants: Operation failures are reported and the loop continues.
//! Invariants: One foreign call is in flight at a time; input blocks between them.
use std::io::{self, Write};
use std::path::Path;

use netifctl::client::{DEFAULT_SAVE_PATH, NetifClient};
use netifctl::core::error::Error;
use netifctl::core::request::Operation;
use netifctl::ffi::NetifTool;

use crate::render;

const MENU: &str = "\n=== netifctl interface manager ===\n\
1) refresh and show all interfaces\n\
2) save last list response to a file\n\
3) add an address to an interface\n\
4) delete an address from an interface (/0 allowed for cleanup)\n\
5) replace interface IPv4 with a static address\n\
6) set IPv4 DHCP on/off\n\
0) quit\n> ";

pub fn run<T: NetifTool>(client: &mut NetifClient<T>) -> Result<(), Error> {
    loop {
        let Some(choice) = prompt_line(MENU) else {
            break;
        };
        match choice.trim() {
            "0" => break,
            "1" => report(refresh_and_show(client)),
            "2" => report(save_last(client)),
            "3" => report(add_or_del(client, true)),
            "4" => report(add_or_del(client, false)),
            "5" => report(set_static(client)),
            "6" => report(set_dhcp(client)),
            "" => {}
            other => eprintln!("unknown choice: {other}"),
        }
    }
    Ok(())
}

fn report(result: Result<(), Error>) {
    if let Err(err) = result {
        eprintln!("error: {err}");
        if let Some(hint) = err.hint() {
            eprintln!("hint: {hint}");
        }
    }
}

/// Prompts on stderr and reads one line from stdin; `None` on EOF or error.
fn prompt_line(prompt: &str) -> Option<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

fn refresh_and_show<T: NetifTool>(client: &mut NetifClient<T>) -> Result<(), Error> {
    let records = client.refresh()?;
    print!("{}", render::interface_rows(&records));
    Ok(())
}

fn save_last<T: NetifTool>(client: &NetifClient<T>) -> Result<(), Error> {
    if !client.has_cache() {
        eprintln!("no cached list response; run 1) first");
        return Ok(());
    }
    let Some(line) = prompt_line(&format!("output path (default: {DEFAULT_SAVE_PATH}): ")) else {
        return Ok(());
    };
    let path = if line.is_empty() {
        DEFAULT_SAVE_PATH
    } else {
        line.as_str()
    };
    client.save_last(Path::new(path))?;
    eprintln!("saved: {path}");
    Ok(())
}

/// Shows the cached rows and resolves the operator's selection. The cache is
/// required: selection against a stale or absent listing is refused.
fn ask_interface<T: NetifTool>(client: &NetifClient<T>) -> Option<u32> {
    let rows = client.cached_interfaces();
    if rows.is_empty() {
        eprintln!("no cached interface list; run 1) first");
        return None;
    }
    eprintln!("known interfaces:");
    for (ordinal, row) in rows.iter().enumerate() {
        let name = if row.name.is_empty() {
            "(no name)"
        } else {
            row.name.as_str()
        };
        eprintln!("  [{ordinal}] if_index={}  name={name}", row.if_index);
    }
    let line = prompt_line("interface (if_index, list ordinal, or name): ")?;
    match client.resolve_interface(&line) {
        Some(if_index) => Some(if_index),
        None => {
            eprintln!("unknown interface: {line}");
            None
        }
    }
}

fn ask_prefix(prompt: &str) -> Option<u32> {
    let line = prompt_line(prompt)?;
    match line.trim().parse::<u32>() {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("prefix_len must be a number");
            None
        }
    }
}

fn add_or_del<T: NetifTool>(client: &NetifClient<T>, add: bool) -> Result<(), Error> {
    let Some(if_index) = ask_interface(client) else {
        return Ok(());
    };
    let Some(ip) = prompt_line("ip (e.g. 10.0.0.2 or fe80::1): ") else {
        return Ok(());
    };
    let Some(prefix_len) = ask_prefix("prefix_len (IPv4 0..=32, IPv6 0..=128): ") else {
        return Ok(());
    };
    let op = if add {
        Operation::AddIp { ip, prefix_len }
    } else {
        Operation::DelIp { ip, prefix_len }
    };
    let outcome = client.apply(if_index, &op)?;
    render::print_apply_outcome(&outcome);
    Ok(())
}

fn set_static<T: NetifTool>(client: &NetifClient<T>) -> Result<(), Error> {
    let Some(if_index) = ask_interface(client) else {
        return Ok(());
    };
    let Some(ip) = prompt_line("IPv4 address (e.g. 192.168.1.10): ") else {
        return Ok(());
    };
    let Some(prefix_len) = ask_prefix("prefix_len (1..=32, e.g. 24): ") else {
        return Ok(());
    };
    let Some(gateway) = prompt_line("gateway (optional, empty to skip): ") else {
        return Ok(());
    };
    let gateway = if gateway.is_empty() {
        None
    } else {
        Some(gateway)
    };
    let op = Operation::SetIpv4Static {
        ip,
        prefix_len,
        gateway,
    };
    let outcome = client.apply(if_index, &op)?;
    render::print_apply_outcome(&outcome);
    Ok(())
}

fn set_dhcp<T: NetifTool>(client: &NetifClient<T>) -> Result<(), Error> {
    let Some(if_index) = ask_interface(client) else {
        return Ok(());
    };
    let Some(line) = prompt_line("enable DHCP? (1=on, 0=off): ") else {
        return Ok(());
    };
    let enable = match line.trim() {
        "1" => true,
        "0" => false,
        other => {
            eprintln!("expected 1 or 0, got: {other}");
            return Ok(());
        }
    };
    let outcome = client.apply(if_index, &Operation::SetIpv4Dhcp { enable })?;
    render::print_apply_outcome(&outcome);
    Ok(())
}
