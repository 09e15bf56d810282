//! Terminal reader that speaks PowerPoint slide text with word highlighting.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use commands::Command;
use deck_core::{
    Document, EngineEvent, PacedEngine, PlaybackController, PlaybackState, ReaderConfig,
    SlideOrder, SpeechEngine,
};
use deck_pptx::PptxParser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

/// Words shown either side of the highlighted word.
const WINDOW_RADIUS: usize = 6;

/// Read a PowerPoint deck aloud with word highlighting.
#[derive(Parser, Debug)]
#[command(name = "deck-reader")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file (.pptx)
    input: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Speaking rate multiplier (default: 1.0)
    #[arg(short, long)]
    rate: Option<f32>,

    /// Voice number to start with (see the `voices` command)
    #[arg(long)]
    voice: Option<usize>,

    /// Words skipped by rewind and fast-forward (default: 10)
    #[arg(long)]
    step: Option<usize>,

    /// Milliseconds per word at rate 1.0
    #[arg(long)]
    word_ms: Option<u64>,

    /// Order in which slides are read
    #[arg(long, value_enum)]
    slide_order: Option<OrderArg>,

    /// Print the extracted text and exit
    #[arg(short, long)]
    print: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    /// Archive entry order
    Discovery,
    /// Order listed in presentation.xml
    Presentation,
}

impl From<OrderArg> for SlideOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Discovery => SlideOrder::Discovery,
            OrderArg::Presentation => SlideOrder::Presentation,
        }
    }
}

/// Everything the main loop reacts to, in arrival order.
enum AppEvent {
    Input(Command),
    InvalidInput(String),
    InputClosed,
    Engine(EngineEvent),
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = build_config(&args)?;

    if args.verbose {
        eprintln!("Processing: {}", args.input.display());
    }

    let document = PptxParser::new()
        .with_slide_order(config.slide_order)
        .open(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    if args.verbose {
        eprintln!("  Extracted {} words", document.word_count());
    }

    if args.print {
        println!("{}", document.words().join(" "));
        return Ok(());
    }

    run(document, &config, &args)
}

/// Merge the configuration file with command-line overrides.
fn build_config(args: &Args) -> Result<ReaderConfig> {
    let mut config = match &args.config {
        Some(path) => ReaderConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => ReaderConfig::default(),
    };

    if let Some(rate) = args.rate {
        config.default_rate = rate;
    }
    if let Some(step) = args.step {
        config.step_words = step;
    }
    if let Some(word_ms) = args.word_ms {
        config.word_interval_ms = word_ms;
    }
    if let Some(order) = args.slide_order {
        config.slide_order = order.into();
    }

    config.validate()?;
    Ok(config)
}

/// Run the interactive reader until the user quits.
fn run(document: Document, config: &ReaderConfig, args: &Args) -> Result<()> {
    let (tx, rx) = mpsc::channel();

    let engine_tx = tx.clone();
    let engine = PacedEngine::new(Duration::from_millis(config.word_interval_ms), move |event| {
        let _ = engine_tx.send(AppEvent::Engine(event));
    });

    let mut controller = PlaybackController::new(engine, document, config);
    if let Some(voice) = args.voice {
        controller.set_voice(voice)?;
    }

    spawn_input_reader(tx)?;

    println!("{}", controller.renderer().render());
    println!();
    print_voices(&controller);
    println!("{} words loaded. Type `help` for commands.", controller.document().word_count());

    let mut input_closed = false;
    for event in rx {
        match event {
            AppEvent::Engine(event) => {
                if controller.handle_event(event) {
                    show_position(&controller);
                }
            }
            AppEvent::Input(Command::Quit) => break,
            AppEvent::Input(command) => handle_command(&mut controller, &command),
            AppEvent::InvalidInput(message) => eprintln!("{}", message),
            AppEvent::InputClosed => {
                log::debug!("Input closed; finishing playback");
                input_closed = true;
            }
        }

        // Piped input ends before playback does; exit once reading stops.
        if input_closed && controller.state() != PlaybackState::Playing {
            break;
        }
    }

    controller.stop();
    Ok(())
}

fn handle_command<E: SpeechEngine>(controller: &mut PlaybackController<E>, command: &Command) {
    if let Err(e) = commands::apply(controller, command) {
        eprintln!("{:#}", e);
        return;
    }

    match command {
        Command::Voices => print_voices(controller),
        Command::Text => println!("{}", controller.renderer().render()),
        Command::Help => println!("{}", commands::HELP),
        Command::Rate(_) => println!("Rate: {}", controller.rate()),
        _ => show_position(controller),
    }
}

/// Forward stdin lines to the main loop as commands.
fn spawn_input_reader(tx: Sender<AppEvent>) -> Result<()> {
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let event = match line {
                    Ok(line) => match commands::parse(&line) {
                        Ok(Some(command)) => AppEvent::Input(command),
                        Ok(None) => continue,
                        Err(e) => AppEvent::InvalidInput(format!("{:#}", e)),
                    },
                    Err(e) => {
                        log::warn!("Failed to read input: {}", e);
                        break;
                    }
                };
                if tx.send(event).is_err() {
                    return;
                }
            }
            let _ = tx.send(AppEvent::InputClosed);
        })
        .context("Failed to start input reader")?;
    Ok(())
}

fn show_position<E: SpeechEngine>(controller: &PlaybackController<E>) {
    let position = controller.position();
    let line = format!(
        "[{:>5}/{}] {:<7} {}",
        position,
        controller.document().word_count(),
        format!("{:?}", controller.state()),
        controller.renderer().window(position, WINDOW_RADIUS)
    );

    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{}", line);
    let _ = stdout.flush();
}

fn print_voices<E: SpeechEngine>(controller: &PlaybackController<E>) {
    let voices = controller.voices();
    if voices.voices().is_empty() {
        println!("No voices available");
        return;
    }

    println!("Voices:");
    for (index, label) in voices.labels().iter().enumerate() {
        let marker = if voices.selected_index() == Some(index) {
            "*"
        } else {
            " "
        };
        println!(" {} {}: {}", marker, index, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        let args = Args::try_parse_from([
            "deck-reader",
            "deck.pptx",
            "--rate",
            "1.5",
            "--slide-order",
            "presentation",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("deck.pptx"));
        assert_eq!(args.rate, Some(1.5));

        let config = build_config(&args).unwrap();
        assert_eq!(config.default_rate, 1.5);
        assert_eq!(config.slide_order, SlideOrder::Presentation);
        assert_eq!(config.step_words, 10);
    }

    #[test]
    fn test_rejects_bad_rate_flag() {
        let args = Args::try_parse_from(["deck-reader", "deck.pptx", "--rate", "0"]).unwrap();
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_text_file_is_rejected_before_reading() {
        let result = PptxParser::new().open(std::path::Path::new("deck.txt"));
        assert!(matches!(result, Err(deck_core::Error::UnsupportedFormat(_))));
    }
}
