//! Purpose: `netifctl` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, loads the tool library, runs commands.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `core::error::to_exit_code`.
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::aot::Shell;
use serde_json::json;
use tracing_subscriber::EnvFilter;

mod menu;
mod render;

use netifctl::client::NetifClient;
use netifctl::core::error::{Error, ErrorKind, to_exit_code};
use netifctl::core::request::Operation;
use netifctl::ffi::NetifTool;
use netifctl::ffi::loader::ToolLibrary;

#[derive(Parser)]
#[command(
    name = "netifctl",
    version,
    about = "Console client for the loadable network-interface tool library",
    help_template = r#"{about-with-newline}
{before-help}USAGE
  {usage}

COMMANDS
{subcommands}

OPTIONS
{options}

{after-help}
"#,
    after_help = r#"EXAMPLES
  $ netifctl list
  $ netifctl add-ip eth0 10.0.0.2 24
  $ netifctl set-static 2 192.168.1.10 24 --gateway 192.168.1.1
  $ netifctl                          # interactive menu
"#
)]
struct Cli {
    /// Explicit path to the tool library (otherwise NETIFCTL_LIB, then the
    /// default search path)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    lib: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive menu (default when no command is given)
    Menu,
    /// Fetch and display all interfaces
    List {
        /// Print the raw response document instead of rendered rows
        #[arg(long)]
        raw: bool,
        /// Also save the raw response (plus a trailing newline) to this path
        #[arg(long, value_hint = ValueHint::FilePath)]
        save: Option<PathBuf>,
    },
    /// Add an address to an interface
    AddIp {
        /// Interface: if_index or name
        iface: String,
        ip: String,
        prefix_len: u32,
    },
    /// Delete an address from an interface (/0 allowed for cleanup)
    DelIp {
        /// Interface: if_index or name
        iface: String,
        ip: String,
        prefix_len: u32,
    },
    /// Replace the interface IPv4 configuration with one static address
    SetStatic {
        /// Interface: if_index or name
        iface: String,
        ip: String,
        prefix_len: u32,
        #[arg(long)]
        gateway: Option<String>,
    },
    /// Turn IPv4 DHCP on or off
    SetDhcp {
        /// Interface: if_index or name
        iface: String,
        #[arg(value_enum)]
        state: DhcpState,
    },
    /// Generate shell completions
    Completion { shell: Shell },
}

#[derive(Clone, Copy, ValueEnum)]
enum DhcpState {
    On,
    Off,
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(()) => 0,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<(), Error> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Menu);

    if let Command::Completion { shell } = command {
        let mut cmd = Cli::command();
        clap_complete::aot::generate(shell, &mut cmd, "netifctl", &mut io::stdout());
        return Ok(());
    }

    let library = ToolLibrary::open(cli.lib.as_deref())?;
    tracing::debug!(path = %library.path().display(), "using tool library");
    let mut client = NetifClient::new(library);
    dispatch(command, &mut client)
}

fn dispatch<T: NetifTool>(command: Command, client: &mut NetifClient<T>) -> Result<(), Error> {
    match command {
        Command::Menu => menu::run(client),
        Command::List { raw, save } => {
            let records = client.refresh()?;
            if raw {
                let mut stdout = io::stdout();
                if let Some(bytes) = client.last_raw() {
                    stdout.write_all(bytes).map_err(io_error)?;
                    stdout.write_all(b"\n").map_err(io_error)?;
                }
            } else {
                print!("{}", render::interface_rows(&records));
            }
            if let Some(path) = save {
                client.save_last(&path)?;
                eprintln!("saved: {}", path.display());
            }
            Ok(())
        }
        Command::AddIp {
            iface,
            ip,
            prefix_len,
        } => apply_op(client, &iface, Operation::AddIp { ip, prefix_len }),
        Command::DelIp {
            iface,
            ip,
            prefix_len,
        } => apply_op(client, &iface, Operation::DelIp { ip, prefix_len }),
        Command::SetStatic {
            iface,
            ip,
            prefix_len,
            gateway,
        } => apply_op(
            client,
            &iface,
            Operation::SetIpv4Static {
                ip,
                prefix_len,
                gateway,
            },
        ),
        Command::SetDhcp { iface, state } => apply_op(
            client,
            &iface,
            Operation::SetIpv4Dhcp {
                enable: matches!(state, DhcpState::On),
            },
        ),
        Command::Completion { .. } => Ok(()),
    }
}

fn apply_op<T: NetifTool>(
    client: &mut NetifClient<T>,
    iface: &str,
    op: Operation,
) -> Result<(), Error> {
    let if_index = resolve_iface(client, iface)?;
    let outcome = client.apply(if_index, &op)?;
    render::print_apply_outcome(&outcome);
    if outcome.report.ok {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::Boundary)
            .with_message("one or more operations failed")
            .with_status(outcome.status))
    }
}

/// A bare nonzero number is taken as the if_index directly; anything else is
/// resolved by name against a fresh listing.
fn resolve_iface<T: NetifTool>(client: &mut NetifClient<T>, token: &str) -> Result<u32, Error> {
    if let Ok(value) = token.trim().parse::<u32>() {
        if value != 0 {
            return Ok(value);
        }
    }
    client.refresh()?;
    client.resolve_interface(token).ok_or_else(|| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("unknown interface: {token}"))
            .with_hint("Use `netifctl list` to see interfaces.")
    })
}

fn io_error(err: io::Error) -> Error {
    Error::new(ErrorKind::Io)
        .with_message("failed to write output")
        .with_source(err)
}

fn emit_error(err: &Error) {
    let payload = json!({
        "error": {
            "kind": format!("{:?}", err.kind()),
            "message": err.message().unwrap_or(""),
            "hint": err.hint(),
            "status": err.status(),
        }
    });
    eprintln!("{payload}");
}
