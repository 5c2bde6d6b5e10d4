//! Photo Categorizer - keyboard driven photo sorting
//!
//! Shows the images of an input directory one at a time and moves each into
//! the category folder bound to the key the user presses.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use photo_categorizer::{
    CategoryRegistry, Cli, Config, FileQueue, Session, SessionStats, Strings, TuiApp,
};
use std::path::{Path, PathBuf};
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// CLI Output Module
mod cli_output {
    //! Colored output for the non-interactive commands and the final summary

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;
    use unicode_width::UnicodeWidthStr;

    /// CLI theme colors
    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    const WIDTH: usize = 60;

    pub fn print_separator() {
        let _ = stdout().execute(Print(&format!("{}\n", "─".repeat(WIDTH))));
    }

    /// Print a centered title
    pub fn print_title(title: &str) {
        let padding = WIDTH.saturating_sub(title.width()) / 2;
        let left_pad = " ".repeat(padding.saturating_sub(1));

        let _ = stdout().execute(Print(&format!(
            "{}{} {}{}\n",
            left_pad,
            "╔".bold().stylize(),
            title.bold().stylize(),
            "╗".bold().stylize(),
        )));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_warning(msg: &str) {
        let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_hint(msg: &str) {
        let _ = stdout().execute(Print(style("→ ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_key_value(key: &str, value: &str, value_color: Option<Color>) {
        let key_styled = style(key).with(CliTheme::HINT);
        let value_styled = match value_color {
            Some(color) => style(value).with(color),
            None => style(value).bold(),
        };
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(key_styled));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(value_styled));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_stat(key: &str, value: &str, color: Color) {
        print_key_value(key, value, Some(color));
    }

    /// One key binding: `[a] animals/birds`
    pub fn print_binding(key: &str, label: &str, color: Color) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(format!("[{}]", key)).with(color).bold()));
        let _ = stdout().execute(Print(format!(" {}\n", label)));
    }

    /// One queue entry with its companions
    pub fn print_item(index: usize, name: &str, companions: &str) {
        let _ = stdout().execute(Print(style(format!("  {:>4}. ", index)).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(style(name).italic()));
        if !companions.is_empty() {
            let _ = stdout().execute(Print(style(format!("  + {}", companions)).with(CliTheme::HINT)));
        }
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_log_path(label: &str, path: &str) {
        let _ = stdout().execute(Print("\n"));
        let _ = stdout().execute(Print(style("  📁 ").with(CliTheme::ACCENT)));
        let _ = stdout().execute(Print(style(format!("{} ", label)).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", path)));
    }

    pub fn print_blank() {
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.init_config {
        return init_config(path);
    }

    // `verbose` in the config file also sets the log level
    let (config, config_source) = load_config(&cli)?;

    let log_path = get_log_path(&cli);
    let _guard = setup_logging(&cli, config.verbose, &log_path)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Photo Categorizer starting"
    );
    match config_source {
        Some(ref path) => info!(config_file = %path.display(), "Configuration loaded from file"),
        None => info!("No configuration file, using defaults"),
    }
    if config.verbose {
        info!(?config, "Configuration loaded");
    }
    info!(log_file = %log_path.display(), "Log file location");

    if !config.input_dir.is_dir() {
        error!(input_dir = %config.input_dir.display(), "Input directory does not exist");
        anyhow::bail!(
            "{} {}",
            Strings::input_dir_not_exist(),
            config.input_dir.display()
        );
    }

    if cli.list {
        return list(&config);
    }

    run_session(config, &log_path)
}

/// Write the commented sample configuration
fn init_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::sample_config())?;
    cli_output::print_hint(&format!(
        "{} {}",
        Strings::config_written(),
        path.display()
    ));
    Ok(())
}

/// Run the interactive review and print the summary afterwards
fn run_session(config: Config, log_path: &Path) -> Result<()> {
    let dry_run = config.dry_run;
    let session = Session::new(config)?;

    let app = TuiApp::new(session, Some(log_path.to_path_buf()));
    let stats = match app.run() {
        Ok(stats) => stats,
        Err(e) => {
            error!(error = %e, "Terminal UI failed");
            return Err(e.into());
        }
    };

    info!(
        committed = stats.total_committed(),
        failures = stats.failures,
        skipped = stats.skipped,
        unresolved = stats.unresolved,
        "Session complete"
    );

    print_summary(&stats, dry_run, log_path);
    Ok(())
}

fn print_summary(stats: &SessionStats, dry_run: bool, log_path: &Path) {
    use cli_output::*;

    print_separator();
    print_title(Strings::session_complete());
    print_separator();

    print_blank();
    print_stat(
        Strings::stat_committed(),
        &stats.total_committed().to_string(),
        CliTheme::SUCCESS,
    );
    for (category, count) in &stats.committed {
        print_key_value(&format!("  {}", category), &count.to_string(), None);
    }
    print_stat(Strings::stat_skipped(), &stats.skipped.to_string(), CliTheme::WARNING);
    print_stat(Strings::stat_unresolved(), &stats.unresolved.to_string(), CliTheme::ACCENT);
    print_stat(Strings::stat_failed(), &stats.failures.to_string(), CliTheme::ERROR);
    print_blank();

    if dry_run {
        print_separator();
        print_warning(Strings::dry_run_notice());
    }

    print_separator();
    print_log_path(Strings::log_saved_to(), &log_path.display().to_string());
}

/// Print the key map and the queue without starting a session
fn list(config: &Config) -> Result<()> {
    use cli_output::*;

    config.validate()?;
    let registry = CategoryRegistry::from_config(config)?;
    let queue = FileQueue::scan(config)?;

    print_separator();
    print_title(Strings::app_title());
    print_key_value(
        Strings::input_dir_label(),
        &config.input_dir.display().to_string(),
        None,
    );
    print_key_value(
        Strings::output_dir_label(),
        &config.output_dir.display().to_string(),
        None,
    );
    print_blank();

    print_separator();
    print_hint(Strings::key_map());
    print_blank();
    if registry.entries().iter().all(|mapping| mapping.trash) {
        print_warning(Strings::no_categories_warning());
    }
    for mapping in registry.entries() {
        let label = if mapping.trash {
            format!("{} {}", mapping.path.label(), Strings::trash_suffix())
        } else {
            mapping.path.label()
        };
        print_binding(&mapping.key.to_string(), &label, CliTheme::SUCCESS);
    }
    print_blank();
    for (control, key) in config.keybinds.bindings() {
        print_binding(&key.to_string(), Strings::control_label(control), CliTheme::ACCENT);
    }
    print_blank();

    print_separator();
    print_hint(&format!("{} ({})", Strings::queue(), queue.len()));
    print_blank();
    if queue.is_empty() {
        print_warning(Strings::queue_empty());
    }
    for (i, item) in queue.items().iter().enumerate() {
        let companions: Vec<String> = item
            .companions()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        print_item(i + 1, &item.file_name(), &companions.join(", "));
    }
    print_blank();

    if config.dry_run {
        print_warning(Strings::dry_run_notice());
    }

    info!(items = queue.len(), categories = registry.len(), "Listed key map and queue");
    Ok(())
}

/// Log file under `Log/`, named after the config file when one was given
fn get_log_path(cli: &Cli) -> PathBuf {
    let log_dir = PathBuf::from("Log");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    if let Some(config_name) = cli.config_name() {
        log_dir
            .join(&config_name)
            .join(format!("{}_{}.log", config_name, timestamp))
    } else if cli.list {
        log_dir.join(format!("List_{}.log", timestamp))
    } else {
        log_dir.join(format!("Session_{}.log", timestamp))
    }
}

/// Resolve config path - `sorting` finds `sorting.toml`
fn resolve_config_path(config_path: &Path) -> PathBuf {
    if config_path.exists() {
        return config_path.to_path_buf();
    }

    if config_path.extension().is_none() {
        let with_extension = config_path.with_extension("toml");
        if with_extension.exists() {
            return with_extension;
        }
    }

    config_path.to_path_buf()
}

/// Load the config file (explicit, `./config.toml`, or defaults) and apply
/// CLI overrides. Also returns the file that was read, if any.
fn load_config(cli: &Cli) -> Result<(Config, Option<PathBuf>)> {
    let source = match cli.config {
        Some(ref config_path) => Some(resolve_config_path(config_path)),
        None => Some(PathBuf::from("config.toml")).filter(|p| p.is_file()),
    };

    let file_config = match source {
        Some(ref path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    Ok((cli.merge_with_config(file_config), source))
}

fn log_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Setup logging: a file under `Log/`, plus stderr when the UI is not running
fn setup_logging(cli: &Cli, verbose: bool, log_path: &Path) -> Result<WorkerGuard> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level(verbose).into())
        .from_env_lossy();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    // The terminal belongs to the UI during a session
    let console = cli
        .list
        .then(|| fmt::layer().with_writer(std::io::stderr));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(console);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .init();
    }

    Ok(guard)
}
