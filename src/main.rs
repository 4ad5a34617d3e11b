// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wordbridge::alignment::{AlignmentTable, Matcher, MatchQuery, TextFragment};
use wordbridge::alignment::geometry::word_at_with_padding;
use wordbridge::alignment::paragraph::find_best_paragraph;
use wordbridge::app_config::{self, Config};
use wordbridge::dictionary::{DictionaryStore, SqliteDictionary};
use wordbridge::providers::alignment_files::AlignmentDirectory;
use wordbridge::providers::http::ServiceClient;
use wordbridge::providers::AlignmentSource;
use wordbridge::session::ReaderSession;
use wordbridge::text::similarity;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the bigram similarity of two strings
    Similarity {
        a: String,
        b: String,
    },

    /// Locate a word of a source text inside its translation
    Locate {
        /// Word as it appears in the source text
        #[arg(short, long)]
        word: String,

        /// Known translation of the word, searched for instead of the word itself
        #[arg(long)]
        translated: Option<String>,

        /// File with the source text
        #[arg(long)]
        source_file: PathBuf,

        /// File with the translated text
        #[arg(long)]
        target_file: PathBuf,
    },

    /// Find the alignment table paragraph matching a context
    Paragraph {
        /// Text around the word
        #[arg(long)]
        context: String,

        /// Alignment table JSON file
        #[arg(long)]
        table: PathBuf,
    },

    /// Resolve the word under a point of a page
    WordAt {
        /// JSON file with the page's text fragments
        #[arg(long)]
        fragments: PathBuf,

        #[arg(short, long, allow_negative_numbers = true)]
        x: f64,

        #[arg(short, long, allow_negative_numbers = true)]
        y: f64,
    },

    /// Build an alignment table from two parallel texts
    Prepare {
        /// File with the source text, paragraphs separated by blank lines
        #[arg(long)]
        source_file: PathBuf,

        /// File with the translated text
        #[arg(long)]
        target_file: PathBuf,

        /// Where to write the table
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Translate a word the way a click in the reader does
    Lookup {
        #[arg(short, long)]
        word: String,

        /// File with the text surrounding the word
        #[arg(long)]
        context_file: PathBuf,

        /// File with an existing translation of the page
        #[arg(long)]
        page_file: Option<PathBuf>,

        /// Document whose alignment table should be used
        #[arg(long)]
        document: Option<String>,

        /// Read alignment tables from this directory instead of the service
        #[arg(long, requires = "document")]
        alignment_dir: Option<PathBuf>,

        /// Save the result to the dictionary
        #[arg(long)]
        save: bool,
    },

    /// Manage saved words
    Dictionary {
        #[command(subcommand)]
        action: DictionaryAction,
    },

    /// Generate shell completions for wordbridge
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum DictionaryAction {
    /// List saved words, newest first
    List,
    /// Remove a saved word by ID
    Remove { id: i64 },
}

/// wordbridge - click-to-translate support for document readers
#[derive(Parser, Debug)]
#[command(name = "wordbridge")]
#[command(version)]
#[command(about = "Locate and translate words across parallel texts")]
#[command(long_about = "wordbridge resolves clicked words on a rendered page and finds their translation
in a page translation, a paragraph alignment table or a translation service.

EXAMPLES:
    wordbridge similarity night nacht
    wordbridge locate -w Paris --source-file page.en.txt --target-file page.ru.txt
    wordbridge prepare --source-file book.en.txt --target-file book.ru.txt -o book.json
    wordbridge lookup -w bank --context-file sentence.txt --save
    wordbridge completions bash > wordbridge.bash

CONFIGURATION:
    Configuration is stored in wordbridge.json by default. If the config file
    doesn't exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "wordbridge.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger accepts everything; log::set_max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "wordbridge", &mut std::io::stdout());
            Ok(())
        }
        Commands::Similarity { a, b } => {
            println!("{:.4}", similarity(&a, &b));
            Ok(())
        }
        Commands::Locate { word, translated, source_file, target_file } => {
            let config = load_config(&cli.config, cli.log_level.is_some())?;
            let source = read_text(&source_file)?;
            let target = read_text(&target_file)?;

            let matcher = Matcher::new(config.matching.match_settings());
            let mut query = MatchQuery::new(&word, &source);
            if let Some(translated) = translated.as_deref() {
                query = query.with_target_word(translated);
            }

            print_json(&matcher.locate_query(&query, &target))
        }
        Commands::Paragraph { context, table } => {
            let config = load_config(&cli.config, cli.log_level.is_some())?;
            let table = AlignmentTable::from_json(&read_text(&table)?)?;
            let best = find_best_paragraph(&context, table.entries(), config.matching.paragraph_min_score);
            print_json(&best)
        }
        Commands::WordAt { fragments, x, y } => {
            let config = load_config(&cli.config, cli.log_level.is_some())?;
            let fragments: Vec<TextFragment> = serde_json::from_str(&read_text(&fragments)?)
                .context("Failed to parse fragments file")?;
            print_json(&word_at_with_padding(&fragments, x, y, config.matching.hit_padding))
        }
        Commands::Prepare { source_file, target_file, output } => {
            let table = AlignmentTable::from_parallel_texts(&read_text(&source_file)?, &read_text(&target_file)?);
            if table.is_empty() {
                return Err(anyhow!("No paragraphs could be paired"));
            }
            std::fs::write(&output, table.to_json()?)
                .with_context(|| format!("Failed to write alignment table: {}", output.display()))?;
            info!("Wrote {} aligned paragraphs to {}", table.len(), output.display());
            Ok(())
        }
        Commands::Lookup { word, context_file, page_file, document, alignment_dir, save } => {
            let config = load_config(&cli.config, cli.log_level.is_some())?;
            run_lookup(&config, LookupArgs {
                word,
                context: read_text(&context_file)?,
                page_translation: page_file.as_deref().map(read_text).transpose()?,
                document,
                alignment_dir,
                save,
            })
            .await
        }
        Commands::Dictionary { action } => {
            let config = load_config(&cli.config, cli.log_level.is_some())?;
            let dictionary = SqliteDictionary::open(config.dictionary_path()?)?;
            match action {
                DictionaryAction::List => print_json(&dictionary.list_entries().await?),
                DictionaryAction::Remove { id } => {
                    if dictionary.remove_entry(id).await? {
                        info!("Removed entry {}", id);
                    } else {
                        warn!("No entry with id {}", id);
                    }
                    Ok(())
                }
            }
        }
    }
}

struct LookupArgs {
    word: String,
    context: String,
    page_translation: Option<String>,
    document: Option<String>,
    alignment_dir: Option<PathBuf>,
    save: bool,
}

async fn run_lookup(config: &Config, args: LookupArgs) -> Result<()> {
    let client = Arc::new(ServiceClient::from_config(&config.service));

    let mut session = ReaderSession::from_config(config, client.clone())?;

    let alignment_source: Arc<dyn AlignmentSource> = match &args.alignment_dir {
        Some(dir) => Arc::new(AlignmentDirectory::new(dir)),
        None => client,
    };
    session = session.with_alignment_source(alignment_source);

    if args.save || config.dictionary.database_path.is_some() {
        session = session.with_dictionary(Arc::new(SqliteDictionary::open(config.dictionary_path()?)?));
    }

    session.load_page(vec![TextFragment::sanitized(&args.context, 0.0, 0.0, 0.0, 0.0)]);
    if let Some(translation) = args.page_translation {
        session.set_page_translation(translation);
    }

    if let Some(document) = &args.document {
        let available = session.load_alignment(document).await;
        debug!("Alignment table for '{}' available: {}", document, available);
    }

    let context = session.page_source_text();
    let Some(lookup) = session.lookup_word(&args.word, &context).await? else {
        warn!("'{}' is not a word that can be translated", args.word);
        return Ok(());
    };

    if args.save {
        let entry = session.save_word(&lookup, Some(&context)).await?;
        info!("Saved '{}' as entry {}", entry.word, entry.id);
    }

    print_json(&lookup)
}

/// Load the configuration, creating a default file when none exists
fn load_config(path: &Path, log_level_overridden: bool) -> Result<Config> {
    let config = if path.exists() {
        Config::load(path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        config
    };

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if !log_level_overridden {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
