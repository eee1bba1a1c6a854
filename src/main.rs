//! PCS space CLI - Parse a PCS file and sample valid configurations.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use pcs_space::{
    compute::{GenomeRng, ParameterTree, RepairEngine, parse},
    schema::RepairConfig,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let dump_json = args.iter().any(|a| a == "--json");
    let positional: Vec<&String> = args[1..].iter().filter(|a| !a.starts_with("--")).collect();
    let Some(pcs_path) = positional.first().map(PathBuf::from) else {
        print_usage(&args[0]);
        std::process::exit(1);
    };
    let samples: usize = positional
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    // Load parameter space
    let specification = parse(&pcs_path).unwrap_or_else(|e| {
        eprintln!("Error reading parameter space: {}", e);
        std::process::exit(1);
    });

    if dump_json {
        let json = serde_json::to_string_pretty(&specification).unwrap_or_else(|e| {
            eprintln!("Error serializing parameter space: {}", e);
            std::process::exit(1);
        });
        println!("{}", json);
        return;
    }

    // Load or create repair configuration
    let config_path = pcs_path.with_extension("repair.json");
    let config: RepairConfig = if config_path.exists() {
        let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
            eprintln!("Error reading repair config: {}", e);
            std::process::exit(1);
        });
        serde_json::from_str(&config_str).unwrap_or_else(|e| {
            eprintln!("Error parsing repair config: {}", e);
            std::process::exit(1);
        })
    } else {
        RepairConfig::default()
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid repair config: {}", e);
        std::process::exit(1);
    }

    println!("PCS Parameter Space");
    println!("===================");
    println!("File: {}", pcs_path.display());
    let parameters = specification.parameters();
    println!(
        "Parameters: {} ({} categorical, {} logarithmic)",
        parameters.len(),
        parameters.iter().filter(|p| p.domain.is_categorical()).count(),
        parameters.iter().filter(|p| p.domain.is_logarithmic()).count()
    );
    println!(
        "Conditional parameters: {}",
        specification.activity_conditions().len()
    );
    println!(
        "Forbidden combinations: {}",
        specification.forbidden_combinations().len()
    );
    println!("Max repair attempts: {}", config.max_repair_attempts);
    println!("Samples: {}", samples);
    println!();

    for parameter in specification.parameters() {
        println!("  {} {}", parameter.identifier, parameter.domain);
    }
    println!();

    let tree = ParameterTree::from_specification(&specification);
    let engine = RepairEngine::new(&specification, &tree, &config);

    let mut rng = match config.random_seed {
        Some(seed) => GenomeRng::new(seed),
        None => GenomeRng::random(),
    }
    .with_mutation(config.mutation);
    let mut randomizer = GenomeRng::new(rng.next_seed());

    println!("Sampling...");
    let start = Instant::now();
    let mut repaired = 0;
    let mut failed = 0;

    for i in 0..samples {
        let mut genome = rng.random_genome(&tree);
        let was_valid = engine.is_valid(&genome);

        match engine.make_valid(&mut genome, &mut rng, &mut randomizer) {
            Ok(()) => {
                if !was_valid {
                    repaired += 1;
                }
                let active = specification.extract_active_parameters(genome.genes());
                println!(
                    "  {:>4}: {} ({} active)",
                    i + 1,
                    genome,
                    active.len()
                );
            }
            Err(e) => {
                failed += 1;
                eprintln!("  {:>4}: {}", i + 1, e);
            }
        }
    }

    let elapsed = start.elapsed();

    println!();
    println!("Repaired: {}", repaired);
    println!("Failed: {}", failed);
    println!("Time: {:.3}s", elapsed.as_secs_f32());

    if failed > 0 {
        std::process::exit(2);
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <space.pcs> [samples] [--json]", program);
    eprintln!();
    eprintln!("Parse a PCS parameter space and sample valid configurations.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  space.pcs  Path to parameter configuration space file");
    eprintln!("  samples    Number of configurations to sample (default: 10)");
    eprintln!("  --json     Print the parsed parameter space as JSON and exit");
    eprintln!();
    eprintln!("Repair settings are read from space.repair.json if present.");
    eprintln!("Example repair configuration is generated with --example flag.");
}

fn print_example_config() {
    let config = RepairConfig::default();

    match serde_json::to_string_pretty(&config) {
        Ok(json) => {
            println!("Example repair configuration (space.repair.json):");
            println!("{}", json);
        }
        Err(e) => {
            eprintln!("Error serializing example config: {}", e);
            std::process::exit(1);
        }
    }
}
