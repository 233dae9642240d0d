use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use entity_core::persist::load_models;
use entity_core::score::ResolverScore;
use entity_core::validation::{has_errors, validate};
use entity_core::{translate_text, ResolutionRequest};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "modeler")]
#[command(about = "Inspect entity resolution models and search bar queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate search bar text into resolution input JSON
    Translate {
        /// Query text, e.g. 'first_name:Allie "202-555-1234"'
        #[arg(long)]
        query: String,
        /// Print the full resolution request for this entity type
        #[arg(long)]
        entity_type: Option<String>,
        /// Restrict the request to these indices (repeatable)
        #[arg(long = "index")]
        indices: Vec<String>,
    },
    /// Print each resolver's confidence score and match strength
    Score {
        /// Model file or directory of model files
        #[arg(long)]
        model: PathBuf,
        /// Only score this resolver
        #[arg(long)]
        resolver: Option<String>,
    },
    /// Lint models; exits non-zero when any error is found
    Validate {
        /// Model file or directory of model files
        #[arg(long)]
        model: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Translate { query, entity_type, indices } => translate(&query, entity_type, indices),
        Commands::Score { model, resolver } => score(&model, resolver.as_deref()),
        Commands::Validate { model } => lint(&model),
    }
}

fn translate(query: &str, entity_type: Option<String>, indices: Vec<String>) -> Result<()> {
    let input = match translate_text(query) {
        Ok(input) => input,
        Err(err) => bail!("{}: {}", err.body().error, err),
    };
    let json = match entity_type {
        Some(entity_type) => {
            let scope = (!indices.is_empty()).then_some(indices);
            serde_json::to_string_pretty(&ResolutionRequest::new(entity_type, input, scope))?
        }
        None => serde_json::to_string_pretty(&input)?,
    };
    println!("{json}");
    Ok(())
}

/// One table row: `<model>  <resolver>  <score>  <band>`.
fn score_line(model: &str, resolver: &str, score: &ResolverScore) -> String {
    match (score.score, score.strength) {
        (Some(value), Some(strength)) => format!("{model}\t{resolver}\t{value:.8}\t{strength}"),
        _ => format!("{model}\t{resolver}\t-\t-"),
    }
}

fn score(path: &Path, only: Option<&str>) -> Result<()> {
    let models = load_models(path)?;
    let mut printed = 0usize;
    for named in &models {
        for (name, resolver) in &named.model.resolvers {
            if only.is_some_and(|r| r != name.as_str()) {
                continue;
            }
            let score = ResolverScore::evaluate(resolver, &named.model.attributes);
            println!("{}", score_line(&named.name, name, &score));
            printed += 1;
        }
    }
    if let Some(r) = only {
        if printed == 0 {
            bail!("no resolver named {r:?}");
        }
    }
    tracing::info!(models = models.len(), resolvers = printed, "scored resolvers");
    Ok(())
}

fn lint(path: &Path) -> Result<()> {
    let models = load_models(path)?;
    let mut failed = 0usize;
    for named in &models {
        let findings = validate(&named.model);
        for f in &findings {
            let level = serde_json::to_value(f.level)?;
            let section = serde_json::to_value(f.section)?;
            println!(
                "{}\t{}\t{}/{}\t{}",
                named.name,
                level.as_str().unwrap_or_default(),
                section.as_str().unwrap_or_default(),
                f.name,
                f.message
            );
        }
        if has_errors(&findings) {
            failed += 1;
        }
    }
    if failed > 0 {
        bail!("{failed} of {} models failed validation", models.len());
    }
    Ok(())
}
