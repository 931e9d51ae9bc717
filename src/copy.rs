pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";
pub const ERROR_LABEL: &str = "Error";
pub const COPIED_CLASS: &str = "copied";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyPath {
    Clipboard,
    Fallback,
}

impl CopyPath {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clipboard => "clipboard",
            Self::Fallback => "exec_command",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(CopyPath),
    Failed,
}

/// Label state of a code block's copy button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CopyButtonState {
    #[default]
    Idle,
    Confirming,
    Failed,
}

impl CopyButtonState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => COPY_LABEL,
            Self::Confirming => COPIED_LABEL,
            Self::Failed => ERROR_LABEL,
        }
    }

    pub fn marked_copied(self) -> bool {
        matches!(self, Self::Confirming)
    }

    pub fn after(self, outcome: CopyOutcome) -> Self {
        match outcome {
            CopyOutcome::Copied(_) => Self::Confirming,
            CopyOutcome::Failed => Self::Failed,
        }
    }

    /// Applied when the feedback delay elapses. A failure label is terminal.
    pub fn restored(self) -> Self {
        match self {
            Self::Confirming => Self::Idle,
            other => other,
        }
    }

    pub fn needs_restore(self) -> bool {
        matches!(self, Self::Confirming)
    }
}
