//! phi - configuration-driven text editor

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use log::{debug, info, LevelFilter};

use phi::syntax::LanguageRegistry;
use phi::terminal::{Terminal, TerminalEvents};
use phi::{App, CommandRegistry, Config, EditorError, MainLoop, Result};

#[derive(Parser, Debug)]
#[command(
    name = "phi",
    version,
    about = "phi - configuration-driven text editor",
    after_help = "Shortcuts come from the [commands] section of the config file.\n\
                  Ctrl+Q quits. Logs go to phi.log next to the config file."
)]
struct Cli {
    /// Use FILE instead of ~/.phi-editor/config.toml
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (repeat for more detail)
    #[arg(short = 'v', action = ArgAction::Count)]
    verbosity: u8,

    /// Files to open, each in its own panel side by side
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.or_else(Config::config_path).ok_or_else(|| {
        EditorError::Message("cannot locate home directory; pass --config <path>".to_string())
    })?;
    init_logging(&config_path, cli.verbosity);

    let config = Config::load(&config_path);
    let registry = LanguageRegistry::from_config(&config);
    let (commands, _) = CommandRegistry::from_config(&config);
    info!(
        "{} languages, {} shortcuts, {} configuration warnings",
        registry.list_languages().len(),
        commands.len(),
        config.warnings().len() + registry.warnings().len()
    );
    for (shortcut, action) in commands.bindings() {
        debug!("{} -> {}", shortcut, action);
    }

    let mut app = App::with_files(&cli.files, &registry, &config);

    // Initialize terminal
    let mut terminal = Terminal::new().map_err(|e| EditorError::RenderContext(e.to_string()))?;
    let mut events = TerminalEvents::new();

    let drawn = MainLoop::new(commands, config.render.clone()).run(&mut app, &mut events, &mut terminal)?;
    info!("exiting after {} frames", drawn);

    Ok(())
}

/// Send log output to `phi.log` next to the config file
///
/// The terminal is in raw mode on the alternate screen, so stderr is not an
/// option. Logging stays off if the file cannot be created. `PHI_LOG`
/// overrides the level picked by `-v`.
fn init_logging(config_path: &Path, verbosity: u8) {
    let dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    if fs::create_dir_all(dir).is_err() {
        return;
    }
    let Ok(file) = File::create(dir.join("phi.log")) else {
        return;
    };

    env_logger::Builder::new()
        .filter_level(log_level(verbosity))
        .parse_env("PHI_LOG")
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn log_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
