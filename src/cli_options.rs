/*
cli_options.rs

Copyright 2025 Hervé Quatremain

This file is part of Sporepath.

Sporepath is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Sporepath is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Sporepath. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Process command-line options.
//!
//! These options are intended for developers tuning the level generator.
//! Sporepath generates random levels and prints them with their solution, either as "ASCII art"
//! that can be copied to the predefined levels in `src/generator/fallback.rs`, or as JSON.
//!
//! # Examples
//!
//! Generate two levels with rivers and dirt, from a fixed seed:
//!
//! ```text
//! $ sporepath -c 2 -e rivers,dirt --seed 42
//! ```
//!
//! Generate ten levels with custom settings and print statistics:
//!
//! ```text
//! $ cat settings.json
//! { "bramble_chance": 0.2, "solver_iterations": 50000 }
//! $ sporepath -c 10 --config settings.json -s
//! ```

use clap::Parser;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use sporepath::generator::config::{GeneratorConfig, WorldElement, WorldElements};
use sporepath::generator::fallback::fallback_level;
use sporepath::generator::level::Level;
use sporepath::generator::level_generator::LevelGenerator;

const COPYRIGHT_NOTICE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nCopyright 2025 Hervé Quatremain\nLicense GPL-3.0-or-later"
);

/// Build random Sporepath levels for developers.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// Number of levels to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Seed for the random generator. A random seed is used when not set
    #[arg(long)]
    seed: Option<u64>,

    /// World elements to enable, separated by commas
    #[arg(value_enum, short, long, value_delimiter = ',')]
    elements: Vec<WorldElement>,

    /// JSON file with generator settings. Missing settings keep their default values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the levels as JSON
    #[arg(short, long, default_value_t = false)]
    json: bool,

    /// Print some statistics after generating the levels
    #[arg(short, long, default_value_t = false)]
    summary: bool,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

/// Load the generator settings.
fn load_config(path: Option<&PathBuf>) -> Result<GeneratorConfig, String> {
    let Some(path) = path else {
        return Ok(GeneratorConfig::default());
    };
    let json: String =
        fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    GeneratorConfig::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
}

/// Print a level and its solution.
fn print_level(level: &Level, json: bool) -> Result<(), String> {
    if json {
        let s: String = serde_json::to_string_pretty(level).map_err(|e| e.to_string())?;
        println!("{s}");
        return Ok(());
    }

    print!("{}", level.to_ascii());
    if let Some(solution) = level.solution() {
        let stops: Vec<String> = solution.iter().map(|p| p.to_string()).collect();
        println!("solution: {}", stops.join(" "));
    }
    println!();
    Ok(())
}

/// Parse and process command-line options.
pub fn run() -> ExitCode {
    let args: Args = Args::parse();

    if args.debug {
        println!("DEBUG");
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    let config: GeneratorConfig = match load_config(args.config.as_ref()) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {msg}");
            return ExitCode::from(1);
        }
    };
    let elements: WorldElements = args.elements.iter().copied().collect();
    let seed: u64 = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng: Pcg64 = Pcg64::seed_from_u64(seed);
    debug!("Seed = {seed}  Elements = {elements:?}");

    let mut attempts: usize = 0;
    let mut iterations: usize = 0;
    let mut fallbacks: usize = 0;

    for i in 0..args.count {
        debug!("Level {i}");

        let mut generator = LevelGenerator::new(&config, &elements, &mut rng);
        let generated: Option<Level> = generator.generate();
        attempts += generator.stats.attempts;
        iterations += generator.stats.iterations;

        let level: Level = match generated {
            Some(level) => level,
            None => {
                // The generator gave up, use a predefined level instead
                fallbacks += 1;
                eprintln!("Level {i}: generation failed, using a predefined level");
                match fallback_level(&mut rng) {
                    Some(level) => level,
                    None => {
                        eprintln!("Error: no predefined level available");
                        return ExitCode::from(1);
                    }
                }
            }
        };
        if let Err(msg) = print_level(&level, args.json) {
            eprintln!("Error: {msg}");
            return ExitCode::from(1);
        }
    }

    // Print some stats
    if args.summary {
        let count: usize = args.count.max(1);
        println!(
            "
              seed = {seed}
          attempts = {attempts}
  average attempts = {}
average iterations = {}
         fallbacks = {fallbacks}",
            attempts as f32 / count as f32,
            iterations / count,
        );
    }
    ExitCode::SUCCESS
}
