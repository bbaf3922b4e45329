//! Cosmic MdEdit - A split-pane Markdown editor with live preview
//!
//! Entry point for the application. Handles CLI argument parsing,
//! logging initialization, and application bootstrap. `--export` converts
//! a file to HTML without opening a window.

#[cfg(feature = "gui")]
mod app;
#[cfg(feature = "gui")]
mod menu;
#[cfg(feature = "gui")]
mod message;
#[cfg(feature = "gui")]
mod ui;

use anyhow::{bail, Context};
use cosmic_mdedit::config::Config;
use cosmic_mdedit::file_handler::{load_text, DropItem};
use cosmic_mdedit::markdown::{export::export_html, Converter};
use cosmic_mdedit::theme::Theme;
use std::path::PathBuf;

/// Application name for logging
const APP_NAME: &str = "cosmic-mdedit";

/// What the command line asked for
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Open the editor, optionally with a file
    Run(Option<PathBuf>),
    /// Convert `input` to a themed HTML page at `output`
    Export {
        input: PathBuf,
        output: PathBuf,
        dark: bool,
    },
    Help,
    Version,
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    match command {
        Command::Help => print_help(),
        Command::Version => print_version(),
        Command::Export {
            input,
            output,
            dark,
        } => export(&input, &output, dark)?,
        Command::Run(file) => run(file)?,
    }

    Ok(())
}

/// Initialize the logging system
fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,cosmic_mdedit=debug");
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();
}

/// Parse command line arguments, program name excluded
fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut file = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--version" => return Ok(Command::Version),
            "--export" => {
                let (Some(input), Some(output)) = (args.get(i + 1), args.get(i + 2)) else {
                    bail!("--export requires an input and an output path");
                };
                let dark = match args.get(i + 3).map(String::as_str) {
                    Some("--dark") => true,
                    Some(extra) => bail!("Unexpected argument after --export: {}", extra),
                    None => false,
                };
                return Ok(Command::Export {
                    input: PathBuf::from(input),
                    output: PathBuf::from(output),
                    dark,
                });
            }
            arg if arg.starts_with('-') => bail!("Unknown option: {}", arg),
            arg => {
                if file.is_some() {
                    bail!("Only one file can be opened at a time");
                }
                file = Some(startup_path(arg)?);
            }
        }
        i += 1;
    }

    Ok(Command::Run(file))
}

/// Launchers may pass `file://` URIs instead of paths
fn startup_path(arg: &str) -> anyhow::Result<PathBuf> {
    if !arg.contains("://") {
        return Ok(PathBuf::from(arg));
    }
    match DropItem::from_uri_line(arg).and_then(|item| item.local_path()) {
        Some(path) => Ok(path),
        None => bail!("Only local files can be opened: {}", arg),
    }
}

/// Convert a file without starting the GUI
fn export(input: &std::path::Path, output: &std::path::Path, dark: bool) -> anyhow::Result<()> {
    let markdown =
        load_text(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let theme = Theme::from_night_mode(dark);

    export_html(&Converter::default(), &markdown, theme, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Exported: {}", output.display());
    Ok(())
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load configuration, using defaults: {}", e);
            Config::default()
        }
    }
}

#[cfg(feature = "gui")]
fn run(file: Option<PathBuf>) -> anyhow::Result<()> {
    use cosmic_mdedit::config::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};

    log::info!("Starting Cosmic MdEdit");

    let config = load_config();
    let (width, height) = config.ui.window_size;

    let settings = cosmic::app::Settings::default()
        .size(cosmic::iced::Size::new(width as f32, height as f32))
        .size_limits(
            cosmic::iced::Limits::NONE
                .min_width(MIN_WINDOW_WIDTH as f32)
                .min_height(MIN_WINDOW_HEIGHT as f32),
        );

    cosmic::app::run::<app::MdEdit>(settings, app::Flags { file, config })
        .context("Failed to run the application")
}

#[cfg(not(feature = "gui"))]
fn run(_file: Option<PathBuf>) -> anyhow::Result<()> {
    // Still validates the settings file so a broken one is reported
    let _ = load_config();
    bail!("{} was built without GUI support; rebuild with --features gui or use --export", APP_NAME)
}

/// Print help message
fn print_help() {
    println!(
        r#"Cosmic MdEdit - A split-pane Markdown editor with live preview

USAGE:
    {name} [OPTIONS] [FILE]
    {name} --export INPUT OUTPUT [--dark]

OPTIONS:
    -h, --help          Show this help message
    -v, --version       Show version information
    --export            Convert INPUT to a themed HTML page and exit
    --dark              Use the night theme for --export

KEYBOARD SHORTCUTS:
    Ctrl+N              New file
    Ctrl+O              Open file
    Ctrl+S              Save file
    Ctrl+Shift+S        Save as
    Ctrl+Shift+E        Export HTML
    Ctrl+B              Bold
    Ctrl+I              Italic
    Ctrl+V              Paste text or image
    Ctrl+Shift+D        Toggle night mode
    Ctrl+] / Ctrl+[     Grow editor / preview pane
    F5                  Refresh preview
    Ctrl+Q              Quit
"#,
        name = APP_NAME
    );
}

/// Print version information
fn print_version() {
    println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_runs_empty() {
        assert_eq!(parse_args(&[]).unwrap(), Command::Run(None));
    }

    #[test]
    fn test_single_file() {
        assert_eq!(
            parse_args(&args(&["notes.md"])).unwrap(),
            Command::Run(Some(PathBuf::from("notes.md")))
        );
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse_args(&args(&["--help"])).unwrap(), Command::Help);
        assert_eq!(parse_args(&args(&["-v"])).unwrap(), Command::Version);
    }

    #[test]
    fn test_export_with_dark() {
        assert_eq!(
            parse_args(&args(&["--export", "a.md", "a.html", "--dark"])).unwrap(),
            Command::Export {
                input: PathBuf::from("a.md"),
                output: PathBuf::from("a.html"),
                dark: true,
            }
        );
    }

    #[test]
    fn test_export_missing_output() {
        assert!(parse_args(&args(&["--export", "a.md"])).is_err());
    }

    #[test]
    fn test_unknown_option() {
        assert!(parse_args(&args(&["--frobnicate"])).is_err());
    }

    #[test]
    fn test_file_uri_argument() {
        assert_eq!(
            parse_args(&args(&["file:///home/u/My%20Notes.md"])).unwrap(),
            Command::Run(Some(PathBuf::from("/home/u/My Notes.md")))
        );
        assert!(parse_args(&args(&["https://example.com/a.md"])).is_err());
    }

    #[test]
    fn test_two_files_rejected() {
        assert!(parse_args(&args(&["a.md", "b.md"])).is_err());
    }
}
