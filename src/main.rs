//! NBA playoff headline CLI
//!
//! Scrape historical playoff box scores, then generate a headline for a
//! new game by retargeting the headline of the most similar archived game.

use clap::{Parser, Subcommand};
use headliner::{Config, Result};

#[derive(Parser)]
#[command(name = "headliner")]
#[command(about = "NBA playoff headlines from historical box scores", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Data management commands
    Data {
        #[command(subcommand)]
        action: DataCommands,
    },
    /// Generate a headline for a game
    Generate {
        /// ESPN game id of the target game
        #[arg(long)]
        game_id: i64,
        /// Also print the template the headline was adapted from
        #[arg(long)]
        show_template: bool,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Initialize a new project with default config
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum DataCommands {
    /// Discover playoff game ids from team schedule pages
    Ids {
        /// First postseason year to walk
        #[arg(long)]
        start_year: Option<u16>,
        /// Last postseason year to walk
        #[arg(long)]
        end_year: Option<u16>,
    },
    /// Fetch box scores for discovered games not yet stored
    Sync {
        /// Stop after this many games
        #[arg(long)]
        limit: Option<usize>,
        /// Cache directory for HTML files
        #[arg(long)]
        cache: Option<String>,
        /// Use only cached files (no network requests)
        #[arg(long)]
        offline: bool,
    },
    /// Show database status
    Status,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Data { action } => match action {
            DataCommands::Ids {
                start_year,
                end_year,
            } => commands::data_ids(&config, start_year, end_year),
            DataCommands::Sync {
                limit,
                cache,
                offline,
            } => commands::data_sync(&config, limit, cache, offline),
            DataCommands::Status => commands::data_status(&config),
        },
        Commands::Generate {
            game_id,
            show_template,
            format,
        } => commands::generate(&config, game_id, show_template, format),
        Commands::Init { force } => commands::init(&cli.config, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use headliner::data::scrapers::{BoxScoreScraper, ScheduleScraper};
    use headliner::data::Database;
    use headliner::generate::HeadlineGenerator;
    use headliner::{GameId, HeadlinerError};

    pub fn init(config_path: &str, force: bool) -> Result<()> {
        if std::path::Path::new(config_path).exists() && !force {
            return Err(HeadlinerError::Config(format!(
                "{} already exists. Pass --force to overwrite.",
                config_path
            )));
        }

        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("data")?;
        println!("Created data/ directory");

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Run 'headliner data ids' to discover playoff games");
        println!("  3. Run 'headliner data sync' to fetch their box scores");
        println!("  4. Run 'headliner generate --game-id <ID>' to write a headline");

        Ok(())
    }

    pub fn data_ids(
        config: &Config,
        start_year: Option<u16>,
        end_year: Option<u16>,
    ) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        let scraper = ScheduleScraper::new();

        let current_year: u16 = chrono::Utc::now()
            .format("%Y")
            .to_string()
            .parse()
            .unwrap_or(2026);
        let start = start_year.unwrap_or(config.scrape.start_year);
        let end = end_year
            .or(config.scrape.end_year)
            .unwrap_or(current_year);

        println!("Discovering playoff games for {} through {}...", start, end);
        let mut discovered = 0;
        for year in start..=end {
            let ids = scraper.fetch_season(year)?;
            let inserted = db.insert_schedule_ids(year, &ids)?;
            discovered += inserted;
            println!("  {}: {} home games ({} new)", year, ids.len(), inserted);
        }

        println!("Discovered {} new game ids", discovered);
        Ok(())
    }

    pub fn data_sync(
        config: &Config,
        limit: Option<usize>,
        cache: Option<String>,
        offline: bool,
    ) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;

        let mut scraper = BoxScoreScraper::new();
        if let Some(dir) = cache.or_else(|| config.data.cache_dir.clone()) {
            println!("Using cache directory: {}", dir);
            scraper = scraper.with_cache(&dir);
        }
        if offline {
            println!("Offline mode: using cached files only");
            scraper = scraper.offline_only(true);
        }

        let mut pending = db.pending_ids()?;
        if let Some(limit) = limit {
            pending.truncate(limit);
        }
        if pending.is_empty() {
            println!("Nothing to sync. Run 'headliner data ids' to discover games.");
            return Ok(());
        }

        println!("Syncing {} games...", pending.len());
        let mut stored = 0;
        let mut skipped = 0;
        for game_id in pending {
            match scraper.fetch_game(game_id) {
                Ok(record) => {
                    db.upsert_game(game_id, &record)?;
                    stored += 1;
                }
                Err(HeadlinerError::Acquisition { game_id, message }) => {
                    log::warn!("Skipping game {}: {}", game_id, message);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        println!("Stored {} games ({} skipped)", stored, skipped);
        Ok(())
    }

    pub fn data_status(config: &Config) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        let stats = db.get_stats()?;

        println!("Database Status");
        println!("───────────────────────────────");
        println!("  Path:      {}", config.data.database_path);
        println!("  Games:     {}", stats.game_count);
        println!("  Scheduled: {}", stats.schedule_count);
        println!("  Pending:   {}", stats.pending_count);

        Ok(())
    }

    pub fn generate(
        config: &Config,
        game_id: i64,
        show_template: bool,
        format: OutputFormat,
    ) -> Result<()> {
        let game_id = GameId(game_id);
        let db = Database::open(&config.data.database_path)?;

        // Target from the store, falling back to a live fetch
        let target = match db.get_game(game_id)? {
            Some(record) => record,
            None => {
                log::info!("Game {} not stored, fetching from ESPN", game_id);
                let mut scraper = BoxScoreScraper::new();
                if let Some(dir) = &config.data.cache_dir {
                    scraper = scraper.with_cache(dir);
                }
                scraper.fetch_game(game_id)?
            }
        };

        let generator = HeadlineGenerator::new(db)?;
        let result = generator.generate(&target)?;

        match format {
            OutputFormat::Table => {
                println!("{}", result.headline);
                if show_template {
                    println!();
                    println!("Template game:     {}", result.template_game_id);
                    println!("Template headline: {}", result.template_headline);
                    println!("Distance:          {:.4}", result.distance);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }

        Ok(())
    }
}
