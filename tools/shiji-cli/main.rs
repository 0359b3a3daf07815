use clap::Parser;
use shiji::forms::creative_version;
use shiji::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Builds the creative-version form from reference data and optionally dry-runs a dispatch
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the reference snapshot JSON file
    reference_path: String,

    /// Optional path to a form state JSON file
    state_path: Option<String>,

    /// Optional path to a settings JSON file
    #[arg(short, long)]
    config: Option<String>,

    /// Selected record id; repeat for several records
    #[arg(short, long = "record")]
    records: Vec<String>,

    /// Dispatch against a simulated endpoint and report status transitions
    #[arg(short, long)]
    dispatch: bool,

    /// Make the simulated remote run fail with this message
    #[arg(long)]
    fail_with: Option<String>,

    /// Print the synthesized JSON Schema
    #[arg(long)]
    schema: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. Loading ---
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load settings: {}", e))),
        None => Settings::default(),
    };
    let snapshot = ReferenceSnapshot::from_file(&cli.reference_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load reference data: {}", e)));
    let state = match &cli.state_path {
        Some(path) => FormState::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load form state: {}", e))),
        None => FormState::new(),
    };

    // --- 2. Schema synthesis ---
    let mut form = FormSession::mount(creative_version(), &snapshot.catalog())
        .unwrap_or_else(|e| exit_with_error(&format!("Form configuration error: {}", e)));
    form.replace_state(state);

    println!("Form '{}' mounted with {} fields", form.definition().name, form.schema().len());
    if cli.schema {
        let pretty = serde_json::to_string_pretty(&form.schema().to_json_schema())
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to render schema: {}", e)));
        println!("\n--- JSON Schema ---\n{}", pretty);
    }

    // --- 3. Visibility ---
    println!("\n--- Visibility ---");
    println!("{}", TraceFormatter::format_all(&form.explain()));
    println!("Shown fields: {}", form.visibility().shown_fields().join(", "));

    // --- 4. Validation ---
    println!("\n--- Validation ---");
    if form.validation().is_valid() {
        println!("  -> No issues");
    } else {
        for issue in form.validation() {
            println!("  -> {}", issue);
        }
    }
    println!(
        "Submission {} ({} record(s) selected)",
        if form.can_submit(&cli.records) { "allowed" } else { "blocked" },
        cli.records.len()
    );

    // --- 5. Dispatch ---
    if cli.dispatch {
        let mut endpoint = SimulatedEndpoint::new(3);
        if let Some(message) = &cli.fail_with {
            endpoint = endpoint.failing(message);
        }
        let mut dispatcher = Dispatcher::new(Arc::new(endpoint), settings.dispatcher.clone());

        let id = form
            .submit(&mut dispatcher, &cli.records)
            .unwrap_or_else(|e| exit_with_error(&format!("Dispatch refused: {}", e)));
        println!("\n--- Dispatch ---");
        println!("Invocation {} created ({})", id, InvocationStatus::Pending);

        while !dispatcher.tracker().is_settled() {
            match dispatcher.next_update().await {
                Some(UpdateOutcome::Applied { to, .. }) => println!("  -> {}", to),
                Some(UpdateOutcome::Abandoned(_)) => println!("  -> no final status, gave up"),
                Some(_) => {}
                None => break,
            }
        }
        if let Some(invocation) = dispatcher.tracker().get(id) {
            if let Some(error) = invocation.error() {
                println!("  -> Error: {}", error);
            }
        }
    }

    println!("\nTotal Execution: {:?}", total_start.elapsed());
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
