use crate::host::StatusSink;

/// What the status item should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText {
    pub text: String,
    pub tooltip: String,
    /// Render with warning styling.
    pub warning: bool,
}

impl StatusText {
    pub fn for_total(count: usize) -> Self {
        if count > 0 {
            let plural = if count == 1 { "" } else { "s" };
            Self {
                text: format!("{count} conflict{plural}"),
                tooltip: format!(
                    "{count} unresolved merge conflict{plural} in workspace. Click for details."
                ),
                warning: true,
            }
        } else {
            Self {
                text: "No conflicts".into(),
                tooltip: "No merge conflicts found".into(),
                warning: false,
            }
        }
    }
}

/// Status item that shows the workspace-wide conflict total.
pub struct StatusBar {
    sink: Box<dyn StatusSink>,
    enabled: bool,
}

impl StatusBar {
    pub fn new(sink: Box<dyn StatusSink>, enabled: bool) -> Self {
        let mut bar = Self { sink, enabled: true };
        bar.set_enabled(enabled);
        bar
    }

    /// Disabling hides the item at once; enabling takes effect on the next update.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.sink.hide();
        }
    }

    pub fn update(&mut self, total: usize) {
        if !self.enabled {
            return;
        }
        self.sink.update(&StatusText::for_total(total));
    }
}
