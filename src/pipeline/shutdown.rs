//! User interruption handling.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative stop flag, checked by the batch runner between routes.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    flag: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the flag when the process receives Ctrl-C. A second Ctrl-C
    /// exits immediately without persisting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn listen_for_ctrl_c(&self) {
        let shutdown = self.clone();
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("Unable to listen for Ctrl-C: {}", e);
                    return;
                }
                if shutdown.trigger() {
                    log::error!("Second interrupt received, exiting without saving");
                    std::process::exit(130);
                }
                log::warn!(
                    "Interrupt received, stopping after the current route \
                     (press Ctrl-C again to quit immediately)"
                );
            }
        });
    }

    /// Set the flag. Returns whether it was already set.
    pub fn trigger(&self) -> bool {
        self.flag.swap(true, Ordering::SeqCst)
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let shutdown = Shutdown::new();
        let handle = shutdown.clone();
        assert!(!shutdown.is_triggered());
        handle.trigger();
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn test_trigger_reports_repeat() {
        let shutdown = Shutdown::new();
        assert!(!shutdown.trigger());
        assert!(shutdown.clone().trigger());
        assert!(shutdown.is_triggered());
    }
}
