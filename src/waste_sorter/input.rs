use crate::library::logger::interface::Logger;
use crate::waste_sorter::core::Event;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Maps one line of user input to an event.
///
/// `file <path>`, `camera`, `capture`, `reset`, `quit`.
pub fn parse_command(line: &str) -> Option<Event> {
    let line = line.trim();
    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (line, ""),
    };

    match (command, argument) {
        ("file", path) if !path.is_empty() => Some(Event::FileChosen(PathBuf::from(path))),
        ("camera", "") => Some(Event::CameraPressed),
        ("capture", "") => Some(Event::CapturePressed),
        ("reset", "") => Some(Event::ResetPressed),
        ("quit", "") | ("exit", "") => Some(Event::Shutdown),
        _ => None,
    }
}

/// Reads commands from stdin until EOF, which is treated as `quit`.
pub fn spawn_stdin_reader(event_sender: Sender<Event>, logger: Arc<dyn Logger + Send + Sync>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    let _ = logger.error(&format!("Failed to read input: {}", e));
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Some(event) => {
                    if event_sender.send(event).is_err() {
                        return;
                    }
                }
                None => {
                    let _ = logger.info(&format!(
                        "Unknown command '{}'. Use: file <path> | camera | capture | reset | quit",
                        line.trim()
                    ));
                }
            }
        }
        let _ = event_sender.send(Event::Shutdown);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert!(matches!(
            parse_command("file  photos/bottle 1.jpg "),
            Some(Event::FileChosen(path)) if path == PathBuf::from("photos/bottle 1.jpg")
        ));
        assert!(matches!(parse_command("camera"), Some(Event::CameraPressed)));
        assert!(matches!(parse_command(" capture\n"), Some(Event::CapturePressed)));
        assert!(matches!(parse_command("reset"), Some(Event::ResetPressed)));
        assert!(matches!(parse_command("quit"), Some(Event::Shutdown)));
    }

    #[test]
    fn test_rejects_malformed_commands() {
        assert!(parse_command("file").is_none());
        assert!(parse_command("camera now").is_none());
        assert!(parse_command("dance").is_none());
    }
}
