// Standalone replay tool for checking Battlesnake debug logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all turns
//   --turns <turn1,turn2>  Replay specific turns (comma-separated)
//   --verbose              Show detailed output for each turn
//   --config <path>        Path to Snake.toml (default: Snake.toml)

use std::env;
use std::process;

use space_aware_snake::config::Config;
use space_aware_snake::replay::ReplayEngine;

fn print_usage() {
    eprintln!("Battlesnake Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all turns in the log");
    eprintln!("  --turns <T1,T2,...>     Replay specific turns (comma-separated)");
    eprintln!("  --verbose               Show detailed output for each turn");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all turns");
    eprintln!("  replay battlesnake_debug.jsonl --all");
    eprintln!();
    eprintln!("  # Replay specific turns");
    eprintln!("  replay battlesnake_debug.jsonl --turns 5,10,15");
}

fn parse_turns(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<i32>()
                .map_err(|e| format!("Invalid turn number '{}': {}", t, e))
        })
        .collect()
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;
    let mut turns: Option<Vec<i32>> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => {
                turns = None;
            }
            "--turns" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --turns requires an argument");
                    process::exit(1);
                }
                match parse_turns(&args[i + 1]) {
                    Ok(t) => turns = Some(t),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--verbose" => {
                verbose = true;
            }
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires an argument");
                    process::exit(1);
                }
                config_path = args[i + 1].clone();
                i += 1;
            }
            other => {
                eprintln!("Error: Unknown option '{}'", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: {} - using hardcoded defaults", e);
        Config::default_hardcoded()
    });

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let replaying_all = turns.is_none();
    let results = match turns {
        Some(turn_numbers) => match engine.replay_turns(&entries, &turn_numbers) {
            Ok(results) => results,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => engine.replay_all(&entries),
    };

    engine.print_report(&results);

    let stats = engine.generate_stats(&results);
    // Entries that failed validation are dropped from `results`
    let skipped = replaying_all && results.len() < entries.len();
    if stats.mismatches > 0 || skipped {
        process::exit(1);
    }
}
