use std::process::ExitCode;

use dfa_builder::{automaton::MAX_SEARCH_DEPTH, prelude::*};

use itertools::Itertools;
use owo_colors::OwoColorize;
use tracing::{debug, error, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

fn file_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .help("file containing the automaton")
}

fn cli() -> clap::Command {
    Command::new("dfa")
        .about("Deterministic finite automata: check, run and enumerate automata stored in files")
        .subcommand_required(true)
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .global(true)
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("fail on malformed content instead of skipping it"),
        )
        .subcommand(
            Command::new("check")
                .about("prints the transition table and reports whether the automaton is usable")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("eval")
                .about("runs the given words and prints the visited states")
                .arg(file_arg())
                .arg(Arg::new("words").num_args(1..).required(true)),
        )
        .subcommand(
            Command::new("words")
                .about("lists the shortest accepted words")
                .arg(file_arg())
                .arg(
                    Arg::new("count")
                        .short('n')
                        .value_parser(value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    Arg::new("depth")
                        .long("depth")
                        .value_parser(value_parser!(usize))
                        .help("maximal length of the explored words"),
                ),
        )
        .subcommand(
            Command::new("dot")
                .about("prints the automaton in graphviz DOT format")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("demo")
                .about("writes an example automaton accepting the words over {a, b} ending in ab")
                .arg(file_arg()),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let Ok(Some(verbosity)) = matches.try_get_one::<String>("verbosity") else {
        return;
    };

    let level = match verbosity.as_str() {
        "trace" => filter::LevelFilter::TRACE,
        "debug" => filter::LevelFilter::DEBUG,
        _ => filter::LevelFilter::INFO,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn demo_automaton() -> Automaton {
    Automaton::builder()
        .with_edges([
            ("q0", 'a', "q1"),
            ("q0", 'b', "q0"),
            ("q1", 'a', "q1"),
            ("q1", 'b', "q2"),
            ("q2", 'a', "q1"),
            ("q2", 'b', "q0"),
        ])
        .with_initial("q0")
        .with_finals(["q2"])
        .into_automaton()
}

fn load(matches: &ArgMatches, mode: ParseMode) -> Result<Automaton, PersistError> {
    let file = matches
        .get_one::<String>("file")
        .map(String::as_str)
        .unwrap_or_default();
    debug!("loading automaton from {file}");
    Automaton::load(file, mode)
}

fn check(dfa: &Automaton) -> bool {
    println!("{}", dfa.colored_transition_table());
    if dfa.is_valid() {
        println!("{}", "automaton is valid".green());
    } else {
        println!(
            "{}",
            "automaton is not valid: it needs symbols, states, an initial state and final states"
                .red()
        );
    }
    let missing = dfa.missing_transitions();
    if !missing.is_empty() {
        println!(
            "{} missing transitions: {}",
            missing.len(),
            missing
                .iter()
                .map(|(state, symbol)| format!("({state}, {symbol})"))
                .join(", ")
        );
    }
    dfa.is_valid()
}

fn run(matches: &ArgMatches) -> Result<bool, PersistError> {
    let mode = if matches.get_flag("strict") {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };

    match matches.subcommand() {
        Some(("check", sub)) => Ok(check(&load(sub, mode)?)),
        Some(("eval", sub)) => {
            let dfa = load(sub, mode)?;
            for word in sub.get_many::<String>("words").into_iter().flatten() {
                let evaluation = dfa.evaluate(word);
                let verdict = if evaluation.is_accepted() {
                    "ACCEPTED".green().to_string()
                } else {
                    "REJECTED".red().to_string()
                };
                println!("{word:?}: {verdict} {}", evaluation.message());
                if let Some(trace) = evaluation.trace() {
                    println!("  path: {trace}");
                }
            }
            Ok(true)
        }
        Some(("words", sub)) => {
            let dfa = load(sub, mode)?;
            let count = sub.get_one::<usize>("count").copied().unwrap_or(10);
            let depth = sub
                .get_one::<usize>("depth")
                .copied()
                .unwrap_or(MAX_SEARCH_DEPTH);
            if !dfa.is_valid() {
                println!("{}", "automaton is not valid, no words are accepted".red());
                return Ok(false);
            }
            let start = std::time::Instant::now();
            let words = dfa
                .accepted_words()
                .with_max_depth(depth)
                .take(count)
                .sorted()
                .collect_vec();
            info!(
                "found {} words in {}µs",
                words.len(),
                start.elapsed().as_micros()
            );
            for word in words {
                println!("{word}");
            }
            Ok(true)
        }
        Some(("dot", sub)) => {
            println!("{}", load(sub, mode)?.dot_representation());
            Ok(true)
        }
        Some(("demo", sub)) => {
            let file = sub
                .get_one::<String>("file")
                .map(String::as_str)
                .unwrap_or_default();
            demo_automaton().save(file)?;
            info!("wrote example automaton to {file}");
            Ok(true)
        }
        _ => unreachable!(),
    }
}

pub fn main() -> ExitCode {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            eprintln!("{}", e.red());
            ExitCode::FAILURE
        }
    }
}
