use poker_round::config::Chips;
use poker_round::cards::join_cards;
use poker_round::deck::Deck;
use poker_round::round::{Dests, Round};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "usage: poker-round [--blind N] [--button N] [--stacks N,N,...] [--seed N] [--pov N] [--fen SNAPSHOT]

Reads one command per line from stdin: deal [cards], check, call N, raise M-R, fold,
phase, showdown, win, share [a-b-...]. `deal` without cards draws from a seeded deck.";

struct Options {
    blind: Chips,
    button: usize,
    stacks: Vec<Chips>,
    seed: u64,
    pov: Option<usize>,
    fen: Option<String>,
}

fn parse_args() -> Result<Options, String> {
    let mut opts = Options { blind: 10, button: 1, stacks: vec![1000, 1000], seed: 0, pov: None, fen: None };
    let mut args = std::env::args().skip(1);
    while let Some(flag) = args.next() {
        if flag == "-h" || flag == "--help" {
            return Err(USAGE.to_string());
        }
        let value = args.next().ok_or_else(|| format!("{flag} needs a value\n{USAGE}"))?;
        let bad = |_: std::num::ParseIntError| format!("invalid value for {flag}: {value}");
        match flag.as_str() {
            "--blind" => opts.blind = value.parse().map_err(bad)?,
            "--button" => opts.button = value.parse().map_err(bad)?,
            "--seed" => opts.seed = value.parse().map_err(bad)?,
            "--pov" => opts.pov = Some(value.parse().map_err(bad)?),
            "--stacks" => {
                opts.stacks = value
                    .split(',')
                    .map(|s| s.trim().parse())
                    .collect::<Result<_, _>>()
                    .map_err(bad)?;
            }
            "--fen" => opts.fen = Some(value),
            _ => return Err(format!("unknown flag {flag}\n{USAGE}")),
        }
    }
    Ok(opts)
}

fn print_state(out: &mut impl Write, round: &Round, pov: Option<usize>) -> io::Result<()> {
    match pov.map(|seat| round.pov(seat)) {
        Some(Ok(view)) => writeln!(out, "{view}")?,
        Some(Err(e)) => writeln!(out, "! {e}")?,
        None => writeln!(out, "{round}")?,
    }
    writeln!(out, "> {}", round.dests())
}

fn main() -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(io::stderr))
        .init();

    let opts = match parse_args() {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };
    let started = match &opts.fen {
        Some(fen) => fen.parse::<Round>().map_err(|e| e.to_string()),
        None => Round::new(opts.blind, opts.button, &opts.stacks).map_err(|e| e.to_string()),
    };
    let mut round = match started {
        Ok(round) => round,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };
    info!(version = poker_round::VERSION, seed = opts.seed, "table open");

    let mut deck = Deck::standard();
    deck.shuffle_seeded(opts.seed);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_state(&mut out, &round, opts.pov)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let command = match (line, round.dests()) {
            ("deal", Dests::Deal(n)) => format!("deal {}", join_cards(&deck.draw_n(2 * n + 5))),
            _ => line.to_string(),
        };
        match round.act(&command) {
            Ok(events) => {
                let shown = match opts.pov {
                    Some(seat) => events.pov(seat),
                    None => events.log(),
                };
                for event in shown {
                    writeln!(out, "  {event}")?;
                }
                if let Some(ms) = events.time_left() {
                    writeln!(out, "  ~ {ms}ms to act")?;
                }
            }
            Err(e) => {
                warn!(%e, command = %command, "rejected");
                writeln!(out, "! {e}")?;
            }
        }
        print_state(&mut out, &round, opts.pov)?;
        if round.dests() == Dests::Fin {
            break;
        }
    }
    Ok(())
}
