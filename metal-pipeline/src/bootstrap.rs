use crate::{PipelineError, Result};
use std::sync::atomic::{AtomicBool, Ordering};

static CONTEXT_CLAIMED: AtomicBool = AtomicBool::new(false);

/// Claims the process-wide GPU context slot. Only the first call succeeds: a process owns exactly
/// one device/command queue pair for its whole lifetime.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) fn claim_process_context() -> Result<()> {
    CONTEXT_CLAIMED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .map(|_| ())
        .map_err(|_| PipelineError::AlreadyBootstrapped)
}
