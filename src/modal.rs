//! Lifecycle of the expanded code modal.

pub const ACTIVE_CLASS: &str = "active";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalPhase {
    /// Inserted, waiting one frame before the `active` class goes on.
    Opening,
    Open,
    /// `active` removed; the node goes away once the close delay elapses.
    Closing,
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseTrigger {
    Button,
    Backdrop,
    Escape,
}

impl CloseTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Backdrop => "backdrop",
            Self::Escape => "escape",
        }
    }
}

impl ModalPhase {
    pub fn activate(self) -> Self {
        match self {
            Self::Opening => Self::Open,
            other => other,
        }
    }

    pub fn request_close(self) -> Self {
        match self {
            Self::Opening | Self::Open => Self::Closing,
            other => other,
        }
    }

    pub fn finish(self) -> Self {
        match self {
            Self::Closing => Self::Closed,
            other => other,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Close triggers (Escape included) only listen while this holds.
    pub fn accepts_close(self) -> bool {
        matches!(self, Self::Opening | Self::Open)
    }
}

pub fn is_escape_key(key: &str) -> bool {
    key == "Escape"
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalAction {
    Activate,
    Close(CloseTrigger),
    Finish,
}

/// Phase plus the trigger that started closing, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModalState {
    pub phase: ModalPhase,
    pub trigger: Option<CloseTrigger>,
}

impl ModalState {
    pub fn opening() -> Self {
        Self {
            phase: ModalPhase::Opening,
            trigger: None,
        }
    }

    /// Late close requests keep the first trigger.
    pub fn apply(self, action: ModalAction) -> Self {
        match action {
            ModalAction::Activate => Self {
                phase: self.phase.activate(),
                ..self
            },
            ModalAction::Close(trigger) if self.phase.accepts_close() => Self {
                phase: self.phase.request_close(),
                trigger: Some(trigger),
            },
            ModalAction::Close(_) => self,
            ModalAction::Finish => Self {
                phase: self.phase.finish(),
                ..self
            },
        }
    }

    /// Delay before `Finish` is due, present only while closing.
    pub fn removal_delay_ms(self, close_delay_ms: u32) -> Option<u32> {
        (self.phase == ModalPhase::Closing).then_some(close_delay_ms)
    }

    pub fn in_document(self) -> bool {
        self.phase != ModalPhase::Closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_then_close_walks_every_phase() {
        let phase = ModalPhase::Opening;
        assert!(!phase.is_active());

        let phase = phase.activate();
        assert_eq!(phase, ModalPhase::Open);
        assert!(phase.is_active());

        let phase = phase.request_close();
        assert_eq!(phase, ModalPhase::Closing);
        assert!(!phase.is_active());
        assert!(!phase.accepts_close());

        assert_eq!(phase.finish(), ModalPhase::Closed);
    }

    #[test]
    fn close_before_first_frame_never_activates() {
        let phase = ModalPhase::Opening.request_close();
        assert_eq!(phase.activate(), ModalPhase::Closing);
    }

    #[test]
    fn repeated_close_requests_are_ignored() {
        let closing = ModalPhase::Open.request_close();
        assert_eq!(closing.request_close(), ModalPhase::Closing);
        assert_eq!(ModalPhase::Closed.request_close(), ModalPhase::Closed);
    }

    #[test]
    fn finish_only_applies_while_closing() {
        assert_eq!(ModalPhase::Open.finish(), ModalPhase::Open);
    }

    /// Drives a modal through timed actions, scheduling `Finish` the way the
    /// component does when it enters the closing phase.
    struct Timeline {
        state: ModalState,
        close_delay_ms: u32,
        pending: Vec<(u64, ModalAction)>,
    }

    impl Timeline {
        fn new(close_delay_ms: u32) -> Self {
            Self {
                state: ModalState::opening(),
                close_delay_ms,
                pending: Vec::new(),
            }
        }

        fn at(&mut self, now_ms: u64, action: ModalAction) {
            self.pending.push((now_ms, action));
        }

        fn advance_to(&mut self, now_ms: u64) {
            loop {
                self.pending.sort_by_key(|(due, _)| *due);
                let Some(position) = self.pending.iter().position(|(due, _)| *due <= now_ms) else {
                    return;
                };
                let (due, action) = self.pending.remove(position);

                let before = self.state;
                self.state = before.apply(action);
                let already_closing = before.removal_delay_ms(self.close_delay_ms).is_some();
                if let Some(delay) = self.state.removal_delay_ms(self.close_delay_ms) {
                    if !already_closing {
                        self.pending.push((due + u64::from(delay), ModalAction::Finish));
                    }
                }
            }
        }
    }

    #[test]
    fn modal_leaves_the_document_once_the_close_delay_elapses() {
        let mut timeline = Timeline::new(300);
        timeline.at(16, ModalAction::Activate);
        timeline.at(1_000, ModalAction::Close(CloseTrigger::Escape));

        timeline.advance_to(500);
        assert!(timeline.state.phase.is_active());

        timeline.advance_to(1_299);
        assert_eq!(timeline.state.phase, ModalPhase::Closing);
        assert!(timeline.state.in_document());

        timeline.advance_to(1_300);
        assert!(!timeline.state.in_document());
        assert_eq!(timeline.state.trigger, Some(CloseTrigger::Escape));
    }

    #[test]
    fn repeated_triggers_do_not_postpone_removal() {
        let mut timeline = Timeline::new(300);
        timeline.at(16, ModalAction::Activate);
        timeline.at(100, ModalAction::Close(CloseTrigger::Button));
        timeline.at(250, ModalAction::Close(CloseTrigger::Backdrop));
        timeline.at(350, ModalAction::Close(CloseTrigger::Escape));

        timeline.advance_to(400);
        assert!(!timeline.state.in_document());
        assert_eq!(timeline.state.trigger, Some(CloseTrigger::Button));
        assert!(timeline.pending.is_empty());
    }

    #[test]
    fn removal_delay_is_only_reported_while_closing() {
        let state = ModalState::opening();
        assert_eq!(state.removal_delay_ms(300), None);

        let closing = state.apply(ModalAction::Close(CloseTrigger::Backdrop));
        assert_eq!(closing.removal_delay_ms(300), Some(300));
        assert_eq!(closing.apply(ModalAction::Finish).removal_delay_ms(300), None);
    }

    #[test]
    fn escape_key_detection() {
        assert!(is_escape_key("Escape"));
        assert!(!is_escape_key("Esc"));
        assert!(!is_escape_key("Enter"));
    }
}
