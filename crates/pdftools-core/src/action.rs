//! Busy state of an action control

/// Label and enabled flag of a button that starts a tool operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionControl {
    label: String,
    busy_label: String,
    enabled: bool,
    saved_label: Option<String>,
}

impl ActionControl {
    pub fn new(label: impl Into<String>, busy_label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            busy_label: busy_label.into(),
            enabled: true,
            saved_label: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_busy(&self) -> bool {
        self.saved_label.is_some()
    }

    /// Disable and show the busy label. Returns false if already busy.
    pub fn begin(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        let original = std::mem::replace(&mut self.label, self.busy_label.clone());
        self.saved_label = Some(original);
        self.enabled = false;
        true
    }

    /// Re-enable with the label saved by [`begin`](Self::begin).
    pub fn finish(&mut self) {
        if let Some(original) = self.saved_label.take() {
            self.label = original;
            self.enabled = true;
        }
    }
}
