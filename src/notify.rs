//! Blocking user-facing notifications (the page's alert box).

/// Receives every message the user must acknowledge.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Prints notifications to stdout; used by the headless binary.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, message: &str) {
        println!("🔔 {}", message);
    }
}

/// Keeps notifications in order of arrival.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub messages: Vec<String>,
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
