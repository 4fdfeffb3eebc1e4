use clap::{Parser, Subcommand};
use price_scout::analyzer::SimilarityRanker;
use price_scout::config::{AppConfig, load_config};
use price_scout::live::{CachedLiveSource, LiveScraper, LiveSource};
use price_scout::model::{ComparisonReport, SimilarReport};
use price_scout::search::{CatalogExpander, SearchOrchestrator, build_report};
use price_scout::source::SourceAggregator;
use price_scout::source::registry::redirect_url;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "price-scout")]
#[command(about = "Compare product prices across marketplaces")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Directory holding <platform>_products.json catalogs
    #[arg(short, long)]
    datasets_dir: Option<PathBuf>,

    /// Try live marketplace scraping before the datasets
    #[arg(long)]
    live: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a product and compare prices
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,

        /// Spell-correct and expand the query with related keywords
        #[arg(long, conflicts_with = "platform")]
        smart: bool,

        /// Restrict the dataset search to one platform
        #[arg(short, long)]
        platform: Option<String>,
    },

    /// List and compare every product in a category
    Category { name: String },

    /// Autocomplete product names
    Suggest {
        partial: String,

        #[arg(short, long, default_value_t = 10)]
        max: usize,
    },

    /// Print the storefront search URL for a product
    Redirect { platform: String, product: String },

    /// Find catalog products similar to a named product
    Similar {
        product: String,

        /// Platform of the named product when several platforms list it
        #[arg(short, long)]
        platform: Option<String>,

        /// Only show related products that cost less
        #[arg(long)]
        cheaper: bool,

        #[arg(short, long, default_value_t = 10)]
        max: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries JSON only.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {}", panic_info);
    }));

    let cli = Cli::parse();

    let mut config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Using default configuration ({}: {})", cli.config.display(), e);
            AppConfig::default()
        }
    };
    if let Some(dir) = cli.datasets_dir {
        config.datasets_dir = dir;
    }
    if cli.live {
        config.live.enabled = true;
    }

    let aggregator = Arc::new(SourceAggregator::from_config(&config));
    let orchestrator = build_orchestrator(aggregator.clone(), &config);

    match cli.command {
        Commands::Search {
            query,
            smart,
            platform,
        } => {
            let query = query.join(" ");
            let report = match platform {
                Some(platform) => {
                    let listings = orchestrator.search_on(&query, &platform).await;
                    build_report(&query, &listings)
                }
                None if smart => {
                    let expander = CatalogExpander::from_catalog(&aggregator.all_products());
                    orchestrator
                        .with_expander(Arc::new(expander))
                        .compare_query(&query, true)
                        .await
                }
                None => orchestrator.compare_query(&query, false).await,
            };
            print_report(&report)
        }
        Commands::Category { name } => {
            let listings = orchestrator.browse_category(&name).await;
            print_report(&build_report(&name, &listings))
        }
        Commands::Suggest { partial, max } => {
            let expander = CatalogExpander::from_catalog(&aggregator.all_products());
            print_json(&expander.suggest(&partial, max))
        }
        Commands::Redirect { platform, product } => match redirect_url(&platform, &product) {
            Some(url) => {
                println!("{url}");
                ExitCode::SUCCESS
            }
            None => {
                error!("Platform {} not supported yet", platform);
                ExitCode::FAILURE
            }
        },
        Commands::Similar {
            product,
            platform,
            cheaper,
            max,
        } => {
            let catalog = aggregator.all_products();
            let ranker = SimilarityRanker::new(&catalog);
            let Some(found) = ranker.find(&product, platform.as_deref()) else {
                error!("Product '{}' not found in the catalog", product);
                return ExitCode::FAILURE;
            };
            let similar_products = if cheaper {
                ranker.cheaper_alternatives(found, max)
            } else {
                ranker.similar(found, max)
            };
            print_json(&SimilarReport {
                product: found.clone(),
                similar_products,
            })
        }
    }
}

fn build_orchestrator(aggregator: Arc<SourceAggregator>, config: &AppConfig) -> SearchOrchestrator {
    let orchestrator = SearchOrchestrator::new(aggregator, config);
    if !config.live.enabled {
        return orchestrator;
    }

    match LiveScraper::new(&config.live) {
        Ok(scraper) => {
            info!("Live scraping enabled");
            let live: Arc<dyn LiveSource> = if config.live.cache_ttl_seconds > 0 {
                Arc::new(CachedLiveSource::new(scraper, config.live.cache_ttl_seconds))
            } else {
                Arc::new(scraper)
            };
            orchestrator.with_live(live)
        }
        Err(e) => {
            warn!("Live scraping not available: {}", e);
            orchestrator
        }
    }
}

fn print_report(report: &ComparisonReport) -> ExitCode {
    if report.results.is_empty() {
        info!("No products found matching '{}'", report.query);
    }
    print_json(report)
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn smart_and_platform_are_exclusive() {
        let both = Cli::try_parse_from(["price-scout", "search", "milk", "--smart", "--platform", "zepto"]);
        assert!(both.is_err());

        let smart = Cli::try_parse_from(["price-scout", "search", "amul", "milk", "--smart"]).unwrap();
        assert!(matches!(smart.command, Commands::Search { smart: true, platform: None, .. }));

        let similar = Cli::try_parse_from(["price-scout", "similar", "Amul Milk 1L", "--cheaper"]).unwrap();
        assert!(matches!(similar.command, Commands::Similar { cheaper: true, max: 10, .. }));
    }
}
