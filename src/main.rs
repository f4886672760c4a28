//! Interactive entry point for rtelnet
//!
//! Thin wrapper around the library: collects connection settings and
//! credentials, drives login, then forwards command lines typed on stdin
//! to the remote host. Fatal client errors terminate the process with
//! status 1; recoverable ones are printed and the loop continues.

use std::io::{self, BufRead, Write as IoWrite};
use std::process;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use rtelnet::config::SessionProfile;
use rtelnet::debug::{DebugEvent, DebugSink};
use rtelnet::{ClientError, TcpTransport, TelnetClient, DEFAULT_PORT};

/// Renders debug events the way the protocol log reads: the sender's
/// label, the raw payload, then one line per decoded IAC sequence.
struct ConsolePrinter;

impl DebugSink for ConsolePrinter {
    fn emit(&mut self, event: &DebugEvent) {
        println!("{}: {}", event.label, event.payload.escape_ascii());
        for cmd in &event.commands {
            match cmd.command {
                Some(c) => println!("IAC {} {}", c.name(), cmd.option),
                None => println!("Unknown IAC encountered!"),
            }
        }
        println!();
    }
}

fn usage() {
    eprintln!("Usage: rtelnet [OPTIONS] <host>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -p, --port <port>       Remote port (default {DEFAULT_PORT})");
    eprintln!("  -u, --user <name>       Username for login");
    eprintln!("  -t, --timeout <secs>    Socket timeout in seconds");
    eprintln!("      --profile <name>    Load a saved session profile");
    eprintln!("  -d, --debug             Print the client/server byte stream");
}

fn parse_args() -> Result<SessionProfile> {
    let args: Vec<String> = std::env::args().collect();
    let mut profile = SessionProfile::default();
    let mut have_host = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                let value = args.get(i + 1).context("--port requires a value")?;
                profile.port = value
                    .parse::<u16>()
                    .with_context(|| format!("invalid port: {value}"))?;
                i += 1;
            }
            "--user" | "-u" => {
                let value = args.get(i + 1).context("--user requires a value")?;
                profile.username = Some(value.clone());
                i += 1;
            }
            "--timeout" | "-t" => {
                let value = args.get(i + 1).context("--timeout requires a value")?;
                profile.timeout_secs = Some(
                    value
                        .parse::<u64>()
                        .with_context(|| format!("invalid timeout: {value}"))?,
                );
                i += 1;
            }
            "--profile" => {
                let name = args.get(i + 1).context("--profile requires a name")?;
                profile = SessionProfile::load(name)
                    .with_context(|| format!("unable to load profile `{name}`"))?;
                have_host = !profile.host.is_empty();
                i += 1;
            }
            "--debug" | "-d" => profile.debug = true,
            "--help" => {
                usage();
                process::exit(0);
            }
            other if !other.starts_with('-') => {
                profile.host = other.to_string();
                have_host = true;
            }
            other => bail!("unknown option: {other}"),
        }
        i += 1;
    }

    if !have_host {
        usage();
        bail!("no host given");
    }
    Ok(profile)
}

fn prompt_line(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn run() -> Result<()> {
    let profile = parse_args()?;
    let timeout = profile.timeout_secs.map(Duration::from_secs);

    let transport = TcpTransport::connect(&profile.host, profile.port, timeout)?;
    let mut client = TelnetClient::new(transport);
    if profile.debug {
        client.set_debug_sink(Box::new(ConsolePrinter));
        println!("DEBUG MODE ON\n");
    }

    let mut username = match profile.username {
        Some(ref name) => name.clone(),
        None => prompt_line("Enter username: ")?,
    };
    let mut password = prompt_line("Enter password: ")?;

    // Bad credentials are recoverable: re-prompt instead of bailing out
    while let Err(e) = client.login(&username, &password) {
        if e.is_fatal() {
            return Err(e.into());
        }
        eprintln!("[-] {e}");
        username = prompt_line("Enter username: ")?;
        password = prompt_line("Enter password: ")?;
    }
    println!("[+] Logged in as {username}");

    let stdin = io::stdin();
    loop {
        print!("rtelnet> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if command == "exit" || command == "quit" {
            break;
        }

        match client.write(command) {
            Ok(output) => {
                print!("{}", String::from_utf8_lossy(&output));
            }
            Err(e @ ClientError::Session(_)) => eprintln!("[-] {e}"),
            Err(e) => return Err(e.into()),
        }
    }

    client.close()?;
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("[-] {e:#}");
        process::exit(1);
    }
}
