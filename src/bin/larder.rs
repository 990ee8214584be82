//! larder - signature cache CLI
//!
//! Thin request/response wrapper over [`MealEngine`](larder::MealEngine):
//! build signatures, look up and store cached meals, score templates, and
//! produce deterministic fallbacks.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use larder::config::Config;
use larder::{Meal, MealSlot, ResultSource, SignatureInput};

/// Larder signature cache CLI
#[derive(Parser)]
#[command(name = "larder")]
#[command(version = larder::PKG_VERSION)]
#[command(about = "Ingredient-signature cache and template matcher")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "LARDER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// A meal request on the command line.
#[derive(ClapArgs)]
struct Request {
    /// Ingredient names
    ingredients: Vec<String>,
    /// Meal slot: breakfast, lunch, dinner or snack
    #[arg(short, long)]
    slot: String,
    /// Cooking method as `ingredient=method` (repeatable)
    #[arg(short, long = "method")]
    methods: Vec<String>,
}

impl Request {
    fn into_input(self) -> larder::Result<SignatureInput> {
        let slot: MealSlot = self.slot.parse()?;
        let mut input = SignatureInput::new(slot, self.ingredients);
        for entry in self.methods {
            let (ingredient, method) = entry.split_once('=').ok_or_else(|| {
                larder::LarderError::InvalidInput(format!(
                    "method must be ingredient=method, got '{entry}'"
                ))
            })?;
            input = input.with_method(ingredient, method);
        }
        Ok(input)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the canonical signature and its hash
    Signature(Request),

    /// Look a request up in both cache tiers
    Lookup(Request),

    /// Cache a meal payload (JSON array of meals) for a request
    Store {
        #[command(flatten)]
        request: Request,
        /// File containing the JSON payload
        #[arg(short, long)]
        payload: PathBuf,
        /// Payload source: ai, catalog or template
        #[arg(long, default_value = "ai")]
        source: String,
    },

    /// Score catalog templates against a request
    Matches {
        #[command(flatten)]
        request: Request,
        /// Maximum matches (default: from config)
        #[arg(long)]
        max: Option<usize>,
    },

    /// Print the deterministic fallback meal for a request
    Fallback(Request),

    /// Resolve a request through cache, templates and fallback
    Resolve(Request),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;
    let engine = config.engine_builder().await?.build()?;

    match args.command {
        Command::Signature(request) => {
            let input = request.into_input()?;
            let signature = engine.signature(&input);
            println!("signature: {signature}");
            println!("hash:      {}", signature.hash_key());
        }
        Command::Lookup(request) => {
            let input = request.into_input()?;
            match engine.lookup(&input).await {
                Some(hit) => {
                    eprintln!("hit ({}, source {})", hit.tier.as_str(), hit.source);
                    println!("{}", serde_json::to_string_pretty(&hit.meals)?);
                }
                None => println!("miss"),
            }
        }
        Command::Store {
            request,
            payload,
            source,
        } => {
            let input = request.into_input()?;
            let source: ResultSource = source.parse()?;
            let content = std::fs::read_to_string(&payload)?;
            let meals: Vec<Meal> = serde_json::from_str(&content)?;
            let outcome = engine.store(&input, meals, source).await;
            println!("{}", outcome.as_str());
        }
        Command::Matches { request, max } => {
            let input = request.into_input()?;
            let max = max.unwrap_or(engine.matcher().config().max_results);
            let matches = engine.find_matches(&input, max);
            if matches.is_empty() {
                println!("no matches");
            }
            for m in matches {
                println!(
                    "{:.3}  {:<8}  {}",
                    m.score,
                    m.match_type.as_str(),
                    m.template.id
                );
            }
        }
        Command::Fallback(request) => {
            let input = request.into_input()?;
            let meal = engine.deterministic_fallback(input.slot, &input.ingredients);
            println!("{}", serde_json::to_string_pretty(&meal)?);
        }
        Command::Resolve(request) => {
            let input = request.into_input()?;
            let resolution = engine.resolve(&input).await;
            eprintln!("origin: {}", resolution.origin.as_str());
            println!("{}", serde_json::to_string_pretty(&resolution.meals)?);
        }
    }

    Ok(())
}
