//! Per-run session state.
//!
//! One [`Session`] lives for the duration of a single top-level command and
//! is threaded through every task it composes. Nothing here is global.

use tracing::debug;

use crate::domain::{GateVerdict, VersionRequirement};
use crate::error::PlugsmithResult;

#[derive(Debug, Default, Clone)]
pub struct Session {
    version_shown: bool,
    own_version_notified: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the version gate against `requirement`.
    ///
    /// Returns `Ok(None)` once a non-fatal verdict has already been produced
    /// in this session. A fatal mismatch is returned as an error every time
    /// and never marks the message as shown.
    pub fn check_required_version(
        &mut self,
        requirement: &VersionRequirement,
    ) -> PlugsmithResult<Option<GateVerdict>> {
        if self.version_shown {
            debug!("version message already shown this session");
            return Ok(None);
        }
        let verdict = requirement.verdict()?;
        self.version_shown = true;
        Ok(Some(verdict))
    }

    pub fn version_shown(&self) -> bool {
        self.version_shown
    }

    /// Let the next gate check report again.
    pub fn reset_version_shown(&mut self) {
        self.version_shown = false;
    }

    /// `true` the first time it is called in this session.
    pub fn notify_own_version_once(&mut self) -> bool {
        !std::mem::replace(&mut self.own_version_notified, true)
    }
}
