//! Crisis-mode controller.
//!
//! A two-state switch deciding whether new reports are queued locally or
//! geocoded and synced immediately. The flag is read at the moment of each
//! submission, so toggling mid-form changes where the next submit lands.
//! The controller never touches the report store itself.

/// Presentation derived from the flag: toggle button text, status line,
/// and whether the sync button is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrisisStatus {
    pub button_label: &'static str,
    pub status_line: &'static str,
    pub sync_visible: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrisisMode {
    active: bool,
}

impl CrisisMode {
    /// Starts inactive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the flag and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn status(&self) -> CrisisStatus {
        if self.active {
            CrisisStatus {
                button_label: "Deactivate Crisis Mode",
                status_line: "Offline Mode: Reports will be saved locally.",
                sync_visible: true,
            }
        } else {
            CrisisStatus {
                button_label: "Activate Crisis Mode",
                status_line: "",
                sync_visible: false,
            }
        }
    }
}
