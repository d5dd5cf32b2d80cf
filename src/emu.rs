//! Host-side run control.

/// Run-control state owned by the embedder and polled between ticks.
///
/// The core never touches this; it exists so a host loop has one explicit
/// object for stop/pause decisions instead of process-wide flags. A paused
/// context parks the loop without losing machine state.
#[derive(Debug, Clone)]
pub struct EmuContext {
    pub running: bool,
    pub paused: bool,
    pub ticks: u64,
}

impl EmuContext {
    pub fn new() -> Self {
        EmuContext {
            running: true,
            paused: false,
            ticks: 0,
        }
    }
}

impl Default for EmuContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_fresh_context_is_running_and_unpaused() {
        let context = EmuContext::new();
        assert!(context.running);
        assert!(!context.paused);
        assert_eq!(context.ticks, 0);
    }
}
