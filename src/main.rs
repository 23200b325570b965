//! Picobot GA CLI - evolve a room-covering rule program.

use picobot_genetics::ga::{self, ConsoleReporter};
use rand::Rng;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <popsize> <generations> [seed]", args[0]);
        eprintln!();
        eprintln!("Evolve Picobot programs with a truncation-selection GA.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  popsize      Population size (positive integer)");
        eprintln!("  generations  Number of generations to run");
        eprintln!("  seed         RNG seed (default: random)");
        std::process::exit(1);
    }

    let pop_size: usize = args[1].parse().unwrap_or_else(|e| {
        eprintln!("Invalid popsize {:?}: {}", args[1], e);
        std::process::exit(1);
    });
    let num_gens: usize = args[2].parse().unwrap_or_else(|e| {
        eprintln!("Invalid generations {:?}: {}", args[2], e);
        std::process::exit(1);
    });
    if pop_size == 0 {
        eprintln!("popsize must be positive");
        std::process::exit(1);
    }
    let seed: u64 = match args.get(3) {
        Some(s) => s.parse().unwrap_or_else(|e| {
            eprintln!("Invalid seed {s:?}: {e}");
            std::process::exit(1);
        }),
        None => rand::rng().random(),
    };

    let best = ga::evolve(pop_size, num_gens, seed, &mut ConsoleReporter);

    println!("Best Picobot program: ");
    println!("{best}");
}
