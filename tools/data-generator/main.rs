use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::json;
use shiji::data::{ReferenceSnapshot, ReferenceTable};
use shiji::forms::creative_version::{BLOCK_SOURCE, CREATIVE_SOURCE};
use std::fs;

const INITIALS: [&str; 6] = ["AB", "CD", "JD", "MK", "SL", "TR"];
const CATEGORIES: [&str; 5] = ["Color", "Format", "Layout", "Texture", "Typography"];
const PARAMETERS: [&str; 7] = ["Angle", "Hue", "Ratio", "Size", "Spacing", "Tone", "Weight"];

/// A CLI tool to generate reference snapshots for the shiji form
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_reference.json")]
    output: String,

    /// The minimum number of block records to generate
    #[arg(long, default_value_t = 1)]
    min: usize,

    /// The maximum number of block records to generate
    #[arg(long, default_value_t = 30)]
    max: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.min > cli.max {
        eprintln!(
            "Error: --min ({}) cannot be greater than --max ({})",
            cli.min, cli.max
        );
        std::process::exit(1);
    }

    println!(
        "Generating reference data (block records: {} to {})...",
        cli.min, cli.max
    );

    let snapshot = ReferenceSnapshot::default()
        .with_table(CREATIVE_SOURCE, generate_creative_table(&mut rng))
        .with_table(BLOCK_SOURCE, generate_block_table(&mut rng, cli.min, cli.max));

    let json_output = serde_json::to_string_pretty(&snapshot)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved reference data to '{}'",
        cli.output
    );

    Ok(())
}

/// Picks `count` entries from `pool`, repeats allowed, so choice lists carry duplicates.
fn pick(rng: &mut ThreadRng, pool: &[&str], count: usize) -> Vec<String> {
    (0..count)
        .map(|_| pool[rng.random_range(0..pool.len())].to_string())
        .collect()
}

fn generate_creative_table(rng: &mut ThreadRng) -> ReferenceTable {
    let count = rng.random_range(1..=INITIALS.len());
    let mut table = ReferenceTable::default();
    table
        .choices
        .insert("Created By".to_string(), pick(rng, &INITIALS, count));
    println!("-> Generated {} 'Created By' choice(s).", count);
    table
}

fn generate_block_table(rng: &mut ThreadRng, min: usize, max: usize) -> ReferenceTable {
    let category_count = rng.random_range(1..=CATEGORIES.len() * 2);
    let mut table = ReferenceTable::default().with_attribute("Parameter");
    table
        .choices
        .insert("Category".to_string(), pick(rng, &CATEGORIES, category_count));

    let records = rng.random_range(min..=max);
    for i in 0..records {
        // Roughly one record in ten has no parameter yet.
        let fields = if rng.random_bool(0.1) {
            json!({"Block": "Visual"})
        } else {
            json!({
                "Block": "Visual",
                "Parameter": PARAMETERS[rng.random_range(0..PARAMETERS.len())],
            })
        };
        table = table.with_record(&format!("blk{:04}", i + 1), fields);
    }
    println!(
        "-> Generated {} category choice(s) and {} block record(s).",
        category_count, records
    );
    table
}
