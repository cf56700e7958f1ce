use tracing::warn;

/// Blocking, user-visible alerts
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Prints alerts to stderr so they stand apart from the dashboard on stdout
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        warn!("Alert shown: {}", message);
        eprintln!("⚠️  {}", message);
    }
}

#[cfg(test)]
pub mod testing {
    use super::Notifier;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    pub struct RecordingNotifier {
        pub alerts: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNotifier {
        pub fn messages(&self) -> Vec<String> {
            self.alerts.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }
}
