use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cypher_builder::config::{BuildConfig, LabelOperator};
use cypher_builder::document::QueryDocument;
use cypher_builder::build;

/// cypher-builder - compile a YAML query document into Cypher and parameters
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML query document (pattern, where, return)
    document: PathBuf,

    /// YAML build configuration (prefix, label_operator, extra_params)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Prefix for generated names, overrides config and environment
    #[arg(long)]
    prefix: Option<String>,

    /// Separator between labels of a node (":" or "&")
    #[arg(long)]
    label_operator: Option<LabelOperator>,

    /// Print the parameter map on a single line
    #[arg(long)]
    compact: bool,
}

impl Cli {
    fn build_config(&self) -> anyhow::Result<BuildConfig> {
        let mut config = match &self.config {
            Some(path) => BuildConfig::from_yaml_file(path)
                .with_context(|| format!("Configuration error in {}", path.display()))?,
            None => BuildConfig::from_env().context("Configuration error")?,
        };
        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if let Some(label_operator) = self.label_operator {
            config.label_operator = label_operator;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    // Defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.build_config()?;

    let document = QueryDocument::from_yaml_file(&cli.document)
        .with_context(|| format!("Failed to load {}", cli.document.display()))?;
    let query = document.to_query()?;
    let result = build(&query, &config)?;

    log::info!(
        "Compiled {} into {} parameter(s)",
        cli.document.display(),
        result.params.len()
    );

    println!("{}", result.cypher);
    let params = if cli.compact {
        serde_json::to_string(&result.params)?
    } else {
        serde_json::to_string_pretty(&result.params)?
    };
    println!("{}", params);
    Ok(())
}
