//! Smart Search CLI - search, suggest and filter over JSON record files

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use smartsearch::{
    apply_filters, AdvancedFilters, DateRange, EngineConfig, JsonFileStore, PriceRange,
    SearchHistory, SearchOptions, SmartSearch, DEFAULT_MAX_SUGGESTIONS,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "smartsearch")]
#[command(
    author,
    version,
    about = "Smart Search - fuzzy, synonym-aware search over JSON records"
)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (.yaml, .yml or .json)
    #[arg(long, short = 'c', env = "SMARTSEARCH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// History file path (default: <data dir>/smartsearch/history.json)
    #[arg(long, env = "SMARTSEARCH_HISTORY", global = true)]
    history_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank records against a query
    Search {
        /// Search query
        query: String,

        /// Records file (JSON array or .jsonl)
        #[arg(long, short = 'r')]
        records: PathBuf,

        /// Fields to search, in priority order (default: config fields, then "name")
        #[arg(long = "field", short = 'f')]
        fields: Vec<String>,

        /// Minimum score threshold (0.0-1.0)
        #[arg(long)]
        threshold: Option<f64>,

        /// Maximum number of results
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// Disable synonym matching
        #[arg(long)]
        no_synonyms: bool,

        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,

        /// Do not record the query in history
        #[arg(long)]
        no_history: bool,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output format (text, json)
        #[arg(long, short = 'o', default_value = "text")]
        format: String,
    },

    /// Suggest completions for a partial query
    Suggest {
        /// Partial query (at least 2 characters)
        query: String,

        /// Records file (JSON array or .jsonl)
        #[arg(long, short = 'r')]
        records: PathBuf,

        /// Fields to draw suggestions from
        #[arg(long = "field", short = 'f')]
        fields: Vec<String>,

        /// Maximum number of suggestions
        #[arg(long, short = 'n', default_value_t = DEFAULT_MAX_SUGGESTIONS)]
        max: usize,

        /// Output format (text, json)
        #[arg(long, short = 'o', default_value = "text")]
        format: String,
    },

    /// Print the records matching advanced filters
    Filter {
        /// Records file (JSON array or .jsonl)
        #[arg(long, short = 'r')]
        records: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output format (text, json)
        #[arg(long, short = 'o', default_value = "text")]
        format: String,
    },

    /// Show or clear recent searches
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List recent searches, most recent first
    List {
        /// Output format (text, json)
        #[arg(long, short = 'o', default_value = "text")]
        format: String,
    },

    /// Forget all recent searches
    Clear,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Only records with this category_id
    #[arg(long)]
    category: Option<String>,

    /// Only records with this subcategory_id
    #[arg(long)]
    subcategory: Option<String>,

    /// Minimum price (inclusive)
    #[arg(long)]
    min_price: Option<f64>,

    /// Maximum price (inclusive)
    #[arg(long)]
    max_price: Option<f64>,

    /// Only records with this status
    #[arg(long)]
    status: Option<String>,

    /// Records created on or after this date (ISO 8601, e.g., 2025-01-01)
    #[arg(long)]
    from_date: Option<String>,

    /// Records created on or before this date (ISO 8601, e.g., 2025-12-31)
    #[arg(long)]
    to_date: Option<String>,

    /// Records tagged with any of these tags
    #[arg(long = "tag")]
    tags: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    // Get history path
    let history_path = cli
        .history_file
        .unwrap_or_else(smartsearch::default_history_path);

    match cli.command {
        Commands::Search {
            query,
            records,
            fields,
            threshold,
            limit,
            no_synonyms,
            case_sensitive,
            no_history,
            filters,
            format,
        } => {
            let mut options = config.search.clone();
            options.fields = resolve_fields(fields, &config);
            if let Some(threshold) = threshold {
                options.threshold = threshold;
            }
            if let Some(limit) = limit {
                options.limit = limit;
            }
            options.include_synonyms = options.include_synonyms && !no_synonyms;
            options.case_sensitive = options.case_sensitive || case_sensitive;

            let history = if no_history {
                None
            } else {
                Some(&history_path)
            };
            cmd_search(&config, &query, &records, &options, &filters, history, &format)
        }
        Commands::Suggest {
            query,
            records,
            fields,
            max,
            format,
        } => cmd_suggest(&config, &query, &records, &resolve_fields(fields, &config), max, &format),
        Commands::Filter {
            records,
            filters,
            format,
        } => cmd_filter(&records, &filters, &format),
        Commands::History { action } => cmd_history(&config, &history_path, action),
    }
}

/// Fields from the command line, else the config, else `name`
fn resolve_fields(fields: Vec<String>, config: &EngineConfig) -> Vec<String> {
    if !fields.is_empty() {
        fields
    } else if !config.search.fields.is_empty() {
        config.search.fields.clone()
    } else {
        vec!["name".to_string()]
    }
}

fn open_history(config: &EngineConfig, path: &Path) -> Result<SearchHistory<JsonFileStore>> {
    let store = JsonFileStore::open(path)
        .with_context(|| format!("Failed to open history at {}", path.display()))?;
    Ok(SearchHistory::with_config(store, config.history.clone()))
}

fn load_records(path: &Path) -> Result<Vec<Value>> {
    smartsearch::load_records(path)
        .with_context(|| format!("Failed to load records from {}", path.display()))
}

/// Build library filters from command-line flags
fn build_filters(args: &FilterArgs) -> Result<AdvancedFilters> {
    let price_range = match (args.min_price, args.max_price) {
        (None, None) => None,
        (min, max) => Some(PriceRange {
            min: min.unwrap_or(f64::NEG_INFINITY),
            max: max.unwrap_or(f64::INFINITY),
        }),
    };

    let date_range = match (&args.from_date, &args.to_date) {
        (None, None) => None,
        (from, to) => {
            let start = match from {
                Some(s) => parse_date_arg(s, "--from-date")?,
                None => chrono::DateTime::<chrono::Utc>::MIN_UTC,
            };
            let end = match to {
                Some(s) => end_of_day(s, parse_date_arg(s, "--to-date")?),
                None => chrono::DateTime::<chrono::Utc>::MAX_UTC,
            };
            Some(DateRange { start, end })
        }
    };

    Ok(AdvancedFilters {
        category: args.category.clone(),
        subcategory: args.subcategory.clone(),
        price_range,
        status: args.status.clone(),
        date_range,
        tags: if args.tags.is_empty() {
            None
        } else {
            Some(args.tags.clone())
        },
    })
}

fn parse_date_arg(value: &str, flag: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    smartsearch::filter::parse_date(value)
        .with_context(|| format!("Invalid date for {}: '{}' (expected ISO 8601, e.g., 2025-01-31)", flag, value))
}

/// A bare `YYYY-MM-DD` upper bound covers the whole day
fn end_of_day(
    value: &str,
    parsed: chrono::DateTime<chrono::Utc>,
) -> chrono::DateTime<chrono::Utc> {
    if chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_ok() {
        parsed + chrono::Duration::days(1) - chrono::Duration::nanoseconds(1)
    } else {
        parsed
    }
}

/// Short label for a record in text output
fn record_label(record: &Value) -> String {
    match record.get("name").and_then(Value::as_str) {
        Some(name) => match record.get("id") {
            Some(id) => format!("[{}] {}", id, name),
            None => name.to_string(),
        },
        None => record.to_string(),
    }
}

fn cmd_search(
    config: &EngineConfig,
    query: &str,
    records_path: &Path,
    options: &SearchOptions,
    filter_args: &FilterArgs,
    history_path: Option<&PathBuf>,
    format: &str,
) -> Result<()> {
    options.validate()?;

    let records = load_records(records_path)?;
    let filters = build_filters(filter_args)?;
    let candidates = apply_filters(&records, &filters);

    let engine = SmartSearch::from_config(config);
    let results = engine.rank(&candidates, query, options);

    if let Some(path) = history_path {
        let mut history = open_history(config, path)?;
        if let Err(e) = history.add(query) {
            tracing::warn!("Could not record search history: {}", e);
        }
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        if results.is_empty() {
            println!("No results found for '{}'", query);
            return Ok(());
        }

        println!("Found {} results for '{}':\n", results.len(), query);
        for (i, result) in results.iter().enumerate() {
            println!(
                "{}. {} (score: {:.3})",
                i + 1,
                record_label(result.record),
                result.score
            );
            println!("   {}: {}", result.best_field, result.highlighted_text);
            if result.matched_fields.len() > 1 {
                println!("   matched: {}", result.matched_fields.join(", "));
            }
            println!();
        }
    }

    Ok(())
}

fn cmd_suggest(
    config: &EngineConfig,
    query: &str,
    records_path: &Path,
    fields: &[String],
    max: usize,
    format: &str,
) -> Result<()> {
    let records = load_records(records_path)?;
    let engine = SmartSearch::from_config(config);
    let suggestions = engine.suggest(&records, query, fields, max);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    } else if suggestions.is_empty() {
        println!("No suggestions for '{}'", query);
    } else {
        for suggestion in suggestions {
            println!("{}", suggestion);
        }
    }

    Ok(())
}

fn cmd_filter(records_path: &Path, filter_args: &FilterArgs, format: &str) -> Result<()> {
    let records = load_records(records_path)?;
    let filters = build_filters(filter_args)?;
    if filters.is_empty() {
        tracing::info!("No filters given; printing every record");
    }
    let kept = apply_filters(&records, &filters);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&kept)?);
    } else {
        println!("{} of {} records match:\n", kept.len(), records.len());
        for record in kept {
            println!("  {}", record_label(record));
        }
    }

    Ok(())
}

fn cmd_history(config: &EngineConfig, history_path: &Path, action: HistoryAction) -> Result<()> {
    let mut history = open_history(config, history_path)?;

    match action {
        HistoryAction::List { format } => {
            let entries = history.get_history();
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No recent searches.");
            } else {
                for (i, entry) in entries.iter().enumerate() {
                    println!("{:>2}. {}", i + 1, entry);
                }
            }
        }
        HistoryAction::Clear => {
            history.clear()?;
            println!("Search history cleared.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fields_precedence() {
        let mut config = EngineConfig::default();
        assert_eq!(resolve_fields(vec![], &config), vec!["name"]);

        config.search.fields = vec!["title".to_string()];
        assert_eq!(resolve_fields(vec![], &config), vec!["title"]);
        assert_eq!(
            resolve_fields(vec!["description".to_string()], &config),
            vec!["description"]
        );
    }

    #[test]
    fn test_build_filters_open_ended_price() {
        let args = FilterArgs {
            min_price: Some(10.0),
            ..Default::default()
        };
        let filters = build_filters(&args).unwrap();
        let range = filters.price_range.unwrap();
        assert_eq!(range.min, 10.0);
        assert!(range.max.is_infinite());
    }

    #[test]
    fn test_build_filters_whole_day_upper_bound() {
        let args = FilterArgs {
            to_date: Some("2025-01-31".to_string()),
            ..Default::default()
        };
        let filters = build_filters(&args).unwrap();
        let end = filters.date_range.unwrap().end;
        assert_eq!(end.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-01-31 23:59:59");
    }

    #[test]
    fn test_build_filters_rejects_bad_date() {
        let args = FilterArgs {
            from_date: Some("last tuesday".to_string()),
            ..Default::default()
        };
        assert!(build_filters(&args).is_err());
    }

    #[test]
    fn test_build_filters_empty() {
        let filters = build_filters(&FilterArgs::default()).unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_record_label() {
        let record = serde_json::json!({"id": 4, "name": "Basmati Rice"});
        assert_eq!(record_label(&record), "[4] Basmati Rice");
        let record = serde_json::json!({"title": "x"});
        assert_eq!(record_label(&record), r#"{"title":"x"}"#);
    }
}
