//! Command line driver for `RedBlackSet<i64>`.
//!
//! Arguments are processed left to right against a single set:
//!
//! * `N` inserts `N`
//! * `r N` removes `N`
//! * `f N` checks whether `N` is present
//! * `d N` writes a dot dump to `<N in hex>.dot`
//!
//! The log level is read from the `RBSET_LOG` environment variable and defaults to `warn`.

#[macro_use]
extern crate log;
extern crate rbset;
extern crate simplelog;

use rbset::red_black_tree::RedBlackSet;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::str::FromStr;

const LOG_LEVEL_VAR: &str = "RBSET_LOG";

#[derive(Debug, PartialEq)]
enum Command {
    Insert(i64),
    Remove(i64),
    Find(i64),
    Dump(i64),
}

fn parse_commands<I>(args: I) -> Vec<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut commands = Vec::new();
    let mut args = args.into_iter().peekable();

    while let Some(arg) = args.next() {
        let command: fn(i64) -> Command = match arg.as_str() {
            "r" => Command::Remove,
            "f" => Command::Find,
            "d" => Command::Dump,
            _ => {
                match arg.parse() {
                    Ok(value) => commands.push(Command::Insert(value)),
                    Err(err) => warn!("ignoring argument {:?}: {}", arg, err),
                }
                continue;
            },
        };

        // An operator whose operand does not parse is dropped and the operand is reconsidered
        // as an argument of its own.
        let operand = args.peek().and_then(|next| next.parse().ok());
        match operand {
            Some(value) => {
                args.next();
                commands.push(command(value));
            },
            None => warn!("ignoring argument {:?}: missing numeric operand", arg),
        }
    }

    commands
}

fn run(set: &mut RedBlackSet<i64>, command: &Command) -> String {
    match *command {
        Command::Insert(value) => {
            let outcome = match set.insert(value) {
                Ok(true) => "inserted",
                Ok(false) => "duplicate",
                Err(_) => "allocation failure",
            };
            format!("insert({}) = {}", value, outcome)
        },
        Command::Remove(value) => {
            let outcome = match set.remove(&value) {
                Some(_) => "removed",
                None => "not found",
            };
            format!("remove({}) = {}", value, outcome)
        },
        Command::Find(value) => format!("find({}) = {}", value, set.contains(&value)),
        Command::Dump(value) => {
            let path = format!("{:x}.dot", value);
            match set.dump_to_file(&path) {
                Ok(()) => format!("dump({}) = {}", value, path),
                Err(err) => format!("dump({}) = failed: {}", value, err),
            }
        },
    }
}

fn log_level() -> LevelFilter {
    match env::var(LOG_LEVEL_VAR) {
        Ok(level) => LevelFilter::from_str(&level).unwrap_or(LevelFilter::Warn),
        Err(_) => LevelFilter::Warn,
    }
}

fn main() {
    if let Err(err) = TermLogger::init(
        log_level(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("failed to initialise logging: {}", err);
    }

    let mut set = RedBlackSet::new();
    for command in parse_commands(env::args().skip(1)) {
        println!("{}", run(&mut set, &command));
    }
    info!("exiting with {} values", set.len());
}
