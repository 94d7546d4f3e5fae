use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use signal_hook::consts::TERM_SIGNALS;
use xdg_core::termination::TerminationCondition;

/// Stops the search once the process receives SIGINT, SIGTERM or SIGQUIT, so that the solutions
/// found so far are still printed.
#[derive(Clone, Debug)]
pub(crate) struct OsSignal {
    interrupted: Arc<AtomicBool>,
}

impl OsSignal {
    pub(crate) fn install() -> std::io::Result<Self> {
        let interrupted = Arc::new(AtomicBool::new(false));
        for &signal in TERM_SIGNALS {
            let _ = signal_hook::flag::register(signal, Arc::clone(&interrupted))?;
        }
        Ok(Self { interrupted })
    }
}

impl TerminationCondition for OsSignal {
    fn should_stop(&mut self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }
}
