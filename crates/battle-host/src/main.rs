//! battle-host: run one battle voting session from the command line.
//!
//! Usage:
//!   battle-host [--descriptor battle.json] [--config session.json]
//!               [--pick <participant id>] [--reaction <reaction id>]
//!
//! Prints every session event as a JSON line and exits once the session
//! requests to close.

use std::path::PathBuf;
use std::process;

use tracing::error;
use tracing_subscriber::EnvFilter;

use battle_core::commands::VoteCommand;
use battle_core::config::SessionConfig;
use battle_core::enums::Side;
use battle_core::error::BattleError;
use battle_core::reactions;
use battle_core::types::{BattleDescriptor, Participant};
use battle_host::spawn_session;

/// Flags that take a value.
const VALUE_FLAGS: [&str; 4] = ["--descriptor", "--config", "--pick", "--reaction"];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args
        .iter()
        .any(|a| matches!(a.as_str(), "help" | "--help" | "-h"))
    {
        print_usage();
        return;
    }

    let args = &args[1..];
    if let Err(message) = check_flags(args) {
        eprintln!("Error: {message}");
        print_usage();
        process::exit(1);
    }

    if let Err(err) = run(args) {
        error!(%err, "battle session failed");
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "battle-host: run a head-to-head battle vote\n\
         \n\
           --descriptor <path>  Battle descriptor JSON (default: built-in demo battle)\n\
           --config <path>      Session config JSON (default: 2000 ms close delay, 45/55 tally)\n\
           --pick <id>          Participant id to vote for (default: first participant)\n\
           --reaction <id>      Reaction to attach (default: {})\n\
         \n\
         Reactions:\n{}",
        reactions::default_reaction().id,
        reactions::all()
            .map(|r| format!("  {:<8} weight {}\n", r.id, r.display_weight))
            .collect::<String>()
    );
}

/// Every argument must be a known flag followed by its value.
fn check_flags(args: &[String]) -> Result<(), String> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if !VALUE_FLAGS.contains(&arg.as_str()) {
            return Err(format!("unknown argument: {arg}"));
        }
        match iter.next() {
            Some(value) if !value.starts_with("--") => {}
            _ => return Err(format!("{arg} <value> is missing its value")),
        }
    }
    Ok(())
}

fn parse_flag<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|pair| pair[0] == flag)
        .map(|pair| pair[1].as_str())
}

fn demo_descriptor() -> Result<BattleDescriptor, BattleError> {
    BattleDescriptor::new(
        vec![
            Participant::new("ava", "Ava"),
            Participant::new("ben", "Ben"),
        ],
        "Golden mic",
        "02:00:00",
    )
}

fn run(args: &[String]) -> Result<(), BattleError> {
    let descriptor = match parse_flag(args, "--descriptor") {
        Some(path) => {
            let json = std::fs::read_to_string(PathBuf::from(path))?;
            BattleDescriptor::from_json_str(&json)?
        }
        None => demo_descriptor()?,
    };
    let config = match parse_flag(args, "--config") {
        Some(path) => SessionConfig::load_from_file(&PathBuf::from(path))?,
        None => SessionConfig::default(),
    };

    let pick = parse_flag(args, "--pick")
        .map(str::to_string)
        .unwrap_or_else(|| descriptor.participant(Side::A).id.clone());
    let reaction = parse_flag(args, "--reaction")
        .unwrap_or(reactions::default_reaction().id)
        .to_string();

    let handle = spawn_session(descriptor, config)?;
    handle.send(VoteCommand::SelectParticipant {
        participant_id: pick,
    })?;
    handle.send(VoteCommand::SelectReaction {
        reaction_id: reaction,
    })?;
    handle.send(VoteCommand::SubmitVote)?;

    handle.wait_for_close(|event| {
        println!("{}", serde_json::to_string(event)?);
        Ok(())
    })
}
