//! Presentation-layer notification contract
//!
//! The engine never renders anything itself; toasts and redirects go
//! through this narrow seam. The daemon binary logs them, tests record
//! them, a UI host would surface them.

use tracing::info;

/// Outward-facing notification sink
pub trait Notifier: Send + Sync {
    /// Show a toast-style message to the user
    fn toast(&self, message: &str);

    /// Navigate the user to a route (e.g. the sign-in page)
    fn redirect(&self, route: &str);
}

/// Notifier that logs via tracing, used by the headless daemon
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn toast(&self, message: &str) {
        info!(toast = %message, "notification");
    }

    fn redirect(&self, route: &str) {
        info!(route = %route, "redirect requested");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording notifier shared by coordinator and poller tests

    use super::Notifier;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingNotifier {
        pub toasts: Mutex<Vec<String>>,
        pub redirects: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn toasts(&self) -> Vec<String> {
            self.toasts.lock().unwrap().clone()
        }

        pub fn redirects(&self) -> Vec<String> {
            self.redirects.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn toast(&self, message: &str) {
            self.toasts.lock().unwrap().push(message.to_string());
        }

        fn redirect(&self, route: &str) {
            self.redirects.lock().unwrap().push(route.to_string());
        }
    }
}
