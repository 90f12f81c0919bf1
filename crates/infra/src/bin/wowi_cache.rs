//! Cache snapshot tool for OPENWOWI.
//!
//! Run with: `wowi-cache <command>`
//!
//! Settings come from the environment (a `.env` file is honored) or from an
//! `openwowi.toml`/`openwowi.json` next to the working directory.
//!
//! This is a CLI tool, so `println!` and `eprintln!` are used for user-facing
//! output; diagnostics go through `tracing`.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use openwowi_domain::CacheSlot;
use openwowi_infra::{config, WowiClient};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let result = match args.first().map(String::as_str) {
        Some("slots") => {
            list_slots();
            Ok(())
        }
        Some("snapshot") => run_snapshot(&args[1..]),
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown command: {unknown}");
            eprintln!();
            print_help();
            Err(anyhow!("Unknown command"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Command failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("OPENWOWI cache tool");
    println!();
    println!("USAGE:");
    println!("    wowi-cache <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    slots                   List cache slot names");
    println!("    snapshot <slot> <file>  Fetch every record of a slot and write it to <file>");
    println!("    help                    Show this help message");
}

fn list_slots() {
    for slot in CacheSlot::ALL {
        println!("{slot}");
    }
}

/// Log in, build one cache slot and persist it.
fn run_snapshot(args: &[String]) -> anyhow::Result<()> {
    let [slot, file] = args else {
        return Err(anyhow!("usage: wowi-cache snapshot <slot> <file>"));
    };
    let slot: CacheSlot = slot.parse()?;
    let path = PathBuf::from(file);

    let settings = config::load().context("failed to load OPENWOWI settings")?;
    let mut client = WowiClient::connect(&settings).context("failed to connect")?;

    let count = client.build_slot(slot).with_context(|| format!("failed to fetch {slot}"))?;
    client
        .persist_cache(slot, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("==> {count} {slot} written to {}", path.display());
    Ok(())
}
