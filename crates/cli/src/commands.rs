//! Interactive transport commands.

use anyhow::{anyhow, bail, Context, Result};
use deck_core::{PlaybackController, SpeechEngine};

/// A line typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Stop,
    Rewind,
    Forward,
    Seek(usize),
    Rate(f32),
    Voice(usize),
    Voices,
    Where,
    Text,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  play | p          start or resume reading
  pause             pause reading
  stop | s          stop and return to the first word
  rewind | rw       jump back and read from there
  forward | ff      jump forward and read from there
  seek N            read from word N
  rate R            set the speaking rate
  voice N           select voice N (see `voices`)
  voices            list voices
  where             show the current word
  text              show the whole document
  help              show this help
  quit | q          exit";

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let mut parts = line.split_whitespace();
    let Some(name) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();

    let command = match name.to_ascii_lowercase().as_str() {
        "play" | "p" => Command::Play,
        "pause" => Command::Pause,
        "stop" | "s" => Command::Stop,
        "rewind" | "rw" => Command::Rewind,
        "forward" | "ff" => Command::Forward,
        "seek" => Command::Seek(
            required(arg, "seek")?
                .parse()
                .context("seek expects a word index")?,
        ),
        "rate" => Command::Rate(
            required(arg, "rate")?
                .parse()
                .context("rate expects a number")?,
        ),
        "voice" => Command::Voice(
            required(arg, "voice")?
                .parse()
                .context("voice expects a voice number")?,
        ),
        "voices" => Command::Voices,
        "where" => Command::Where,
        "text" => Command::Text,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => bail!("Unknown command '{}'; type `help` for a list", other),
    };

    Ok(Some(command))
}

fn required<'a>(arg: Option<&'a str>, command: &str) -> Result<&'a str> {
    arg.ok_or_else(|| anyhow!("{} needs an argument", command))
}

/// Apply a transport command to the controller.
///
/// Display-only commands (`voices`, `where`, `text`, `help`, `quit`) are
/// left to the caller.
pub fn apply<E: SpeechEngine>(controller: &mut PlaybackController<E>, command: &Command) -> Result<()> {
    match *command {
        Command::Play => controller.play(),
        Command::Pause => controller.pause(),
        Command::Stop => controller.stop(),
        Command::Rewind => controller.rewind(),
        Command::Forward => controller.fast_forward(),
        Command::Seek(index) => {
            let count = controller.document().word_count();
            if index >= count {
                bail!("Word {} is out of range; the document has {} words", index, count);
            }
            controller.seek(index);
        }
        Command::Rate(rate) => controller.set_rate(rate)?,
        Command::Voice(index) => controller.set_voice(index)?,
        Command::Voices => controller.refresh_voices(),
        Command::Where | Command::Text | Command::Help | Command::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Document, PacedEngine, PlaybackState, ReaderConfig};
    use std::time::Duration;

    fn controller() -> PlaybackController<PacedEngine> {
        let engine = PacedEngine::new(Duration::from_secs(60), |_| {});
        PlaybackController::new(
            engine,
            Document::from_text("Hello world from slides"),
            &ReaderConfig::default(),
        )
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("play").unwrap(), Some(Command::Play));
        assert_eq!(parse("  FF ").unwrap(), Some(Command::Forward));
        assert_eq!(parse("rw").unwrap(), Some(Command::Rewind));
        assert_eq!(parse("q").unwrap(), Some(Command::Quit));
        assert_eq!(parse("text").unwrap(), Some(Command::Text));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse("seek 12").unwrap(), Some(Command::Seek(12)));
        assert_eq!(parse("rate 1.5").unwrap(), Some(Command::Rate(1.5)));
        assert_eq!(parse("voice 2").unwrap(), Some(Command::Voice(2)));
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("seek").is_err());
        assert!(parse("seek minus").is_err());
        assert!(parse("rate fast").is_err());
        assert!(parse("dance").is_err());
    }

    #[test]
    fn test_apply_transport() {
        let mut c = controller();
        apply(&mut c, &Command::Seek(2)).unwrap();
        assert_eq!(c.position(), 2);
        assert_eq!(c.state(), PlaybackState::Playing);

        apply(&mut c, &Command::Rewind).unwrap();
        assert_eq!(c.position(), 0);

        apply(&mut c, &Command::Forward).unwrap();
        assert_eq!(c.position(), 4);

        apply(&mut c, &Command::Stop).unwrap();
        assert_eq!(c.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let mut c = controller();
        assert!(apply(&mut c, &Command::Seek(4)).is_err());
        assert!(apply(&mut c, &Command::Rate(50.0)).is_err());
        assert!(apply(&mut c, &Command::Voice(9)).is_err());
        assert_eq!(c.state(), PlaybackState::Idle);
    }
}
