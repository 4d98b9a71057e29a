use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use podgrid::{
    Command, Config, Derived, DisplayCount, GENRES, GenreFilter, HELP, NoopReporter, Podcast,
    ProgressEvent, ProgressReporter, ReqwestClient, Session, SharedProgressReporter, SortOption,
    Status, Updated, ViewState, genre_names,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static MORE: Emoji<'_, '_> = Emoji("⏬ ", "[+] ");
static EMPTY: Emoji<'_, '_> = Emoji("🕳️  ", "[-] ");

/// Browse a podcast directory: search, filter by genre, sort and page
#[derive(Parser, Debug)]
#[command(name = "podgrid")]
#[command(about = "Browse a podcast directory: search, filter by genre, sort and page")]
#[command(version)]
struct Args {
    /// Catalogue URL or path to a local JSON file (defaults to the configured API)
    source: Option<String>,

    /// Only show podcasts whose title contains this text
    #[arg(short, long, default_value = "")]
    search: String,

    /// Ordering: a-z, z-a, most-recent or oldest
    #[arg(short = 'o', long, default_value = "a-z")]
    sort: String,

    /// Genre id to restrict to, or "all"
    #[arg(short, long, default_value = "all")]
    genre: String,

    /// Number of podcasts to show
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Keep running and accept commands (search, sort, genre, more, ...)
    #[arg(short, long)]
    interactive: bool,

    /// Path to a config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Quiet mode - suppress the loading spinner
    #[arg(short, long)]
    quiet: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Progress reporter showing a spinner while the catalogue loads
struct SpinnerReporter {
    bar: ProgressBar,
}

impl SpinnerReporter {
    fn new() -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self { bar }
    }
}

impl ProgressReporter for SpinnerReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FetchingCatalog { url } => {
                self.bar
                    .set_message(format!("{SEARCH}Loading podcasts from {}", url.cyan()));
            }

            ProgressEvent::ParsingCatalog { source } => {
                self.bar
                    .set_message(format!("{HEADPHONES}Reading {}", source.cyan()));
            }

            ProgressEvent::CatalogLoaded { .. } | ProgressEvent::CatalogFailed { .. } => {
                self.bar.finish_and_clear();
            }
        }
    }
}

fn init_logging(args: &Args, config: &Config) {
    let fallback = if args.verbose {
        "debug"
    } else {
        config.log_level()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback));
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    if let Err(e) = tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
    {
        eprintln!("{WARNING}Failed to initialise logging: {e}");
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let kept: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

fn format_updated(updated: &Updated) -> String {
    match updated {
        Updated::Parsed(dt) => dt.format("%-d %b %Y").to_string(),
        Updated::Malformed(_) => "unknown".to_string(),
    }
}

fn describe_view(view: &ViewState) -> String {
    let genre = match &view.genre {
        GenreFilter::All => "all".to_string(),
        GenreFilter::Genre(id) => podgrid::genre_name(*id)
            .map(String::from)
            .unwrap_or_else(|| format!("#{id}")),
        GenreFilter::Unparseable(raw) => format!("'{raw}'"),
    };

    let mut parts = vec![
        format!("sort {}", view.sort.to_string().cyan()),
        format!("genre {}", genre.cyan()),
    ];
    if !view.search_term.is_empty() {
        parts.push(format!("search \"{}\"", view.search_term.cyan()));
    }
    parts.join(" • ")
}

fn render_card(index: usize, podcast: &Podcast) {
    let genres = genre_names(&podcast.genres);
    let seasons = match podcast.seasons {
        Some(1) => "1 season".to_string(),
        Some(n) => format!("{n} seasons"),
        None => "seasons unknown".to_string(),
    };

    println!(
        "{:>4}. {}",
        (index + 1).to_string().dimmed(),
        truncate_title(&podcast.title, 60).bold()
    );
    println!(
        "      {} • {} • Updated {}",
        seasons.dimmed(),
        if genres.is_empty() {
            "no genre".dimmed().to_string()
        } else {
            genres.join(", ").yellow().to_string()
        },
        format_updated(&podcast.updated).dimmed()
    );
}

fn render(session: &Session, derived: &Derived<'_>, interactive: bool) {
    match session.status(derived) {
        Status::Loading => println!("{SEARCH}Loading podcasts..."),

        Status::Failed(error) => println!(
            "{FAILURE}{} {}",
            "Failed to fetch podcasts:".red().bold(),
            error.red()
        ),

        Status::Empty => println!("{EMPTY}No podcasts found matching your criteria."),

        Status::Results => {
            println!(
                "{HEADPHONES}Showing {} of {} podcasts ({})\n",
                derived.visible.len().to_string().green().bold(),
                derived.total.to_string().cyan(),
                describe_view(session.view())
            );

            for (index, podcast) in derived.visible.iter().enumerate() {
                render_card(index, podcast);
            }

            if !derived.malformed.is_empty() {
                println!(
                    "\n{WARNING}{} podcast(s) have an unreadable date, ranked as oldest",
                    derived.malformed.len().to_string().yellow()
                );
            }

            if derived.has_more {
                let remaining = derived.total - derived.visible.len();
                let hint = if interactive {
                    "press enter or type 'more'"
                } else {
                    "use --count to show more"
                };
                println!(
                    "\n{MORE}{} more available ({})",
                    remaining.to_string().cyan(),
                    hint.dimmed()
                );
            }
        }
    }
}

fn print_genres() {
    for genre in GENRES {
        println!("  {:>2}  {}", genre.id.to_string().cyan(), genre.name);
    }
}

fn print_help() {
    for (usage, description) in HELP {
        println!("  {:<38} {}", usage.cyan(), description.dimmed());
    }
}

async fn run_interactive(session: &mut Session) -> Result<()> {
    println!("{}", "Type 'help' for commands.".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".magenta().bold());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{FAILURE}{}", e.to_string().red());
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => print_help(),
            Command::Genres => print_genres(),
            command => {
                session.apply(&command);
                println!();
                let derived = session.derive();
                render(session, &derived, true);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    init_logging(&args, &config);

    let initial_count = match args.count {
        Some(count) => DisplayCount::new(count).context("--count must be positive")?,
        None => config.page_size(),
    };

    let view = ViewState::new(initial_count, config.paging())
        .with_search_term(args.search.clone())
        .with_sort(SortOption::from_key(&args.sort))
        .with_genre(GenreFilter::from_key(&args.genre));

    let source = args
        .source
        .clone()
        .unwrap_or_else(|| config.api_url().to_string());

    let client = ReqwestClient::with_timeout(config.request_timeout())
        .context("Failed to create HTTP client")?;

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(SpinnerReporter::new())
    };

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "podgrid".bold().magenta(),
            "- Podcast Directory".dimmed()
        );
    }

    let mut session = Session::start(client, source, reporter, view, config.load_more_step());
    session.wait().await;

    let derived = session.derive();
    render(&session, &derived, args.interactive);

    if args.interactive {
        run_interactive(&mut session).await?;
    } else if session.error().is_some() {
        std::process::exit(1);
    }

    Ok(())
}
