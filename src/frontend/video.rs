use super::dom;
use super::{Feature, MountOutcome};
use crate::error::EnhanceError;
use crate::logging::{log_event, LogLevel};
use gloo::events::EventListener;
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, HtmlMediaElement};

const CONTAINER_SELECTOR: &str = ".profile-container";
const VIDEO_SELECTOR: &str = ".profile-video";

pub struct VideoHover {
    document: Document,
    listeners: Vec<EventListener>,
}

impl VideoHover {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            listeners: Vec::new(),
        }
    }
}

impl Feature for VideoHover {
    fn name(&self) -> &'static str {
        "video"
    }

    fn mount(&mut self) -> Result<MountOutcome, EnhanceError> {
        let container = self.document.query_selector(CONTAINER_SELECTOR)?;
        let video = self
            .document
            .query_selector(VIDEO_SELECTOR)?
            .and_then(|element| element.dyn_into::<HtmlMediaElement>().ok());
        let (Some(container), Some(video)) = (container, video) else {
            return Ok(MountOutcome::Skipped("no profile video"));
        };

        play(&video, "autoplay");

        let paused = video.clone();
        self.listeners.push(EventListener::new(&container, "mouseenter", move |_| {
            let _ = paused.pause();
        }));
        self.listeners.push(EventListener::new(&container, "mouseleave", move |_| {
            play(&video, "resume");
        }));

        Ok(MountOutcome::Attached { targets: 1 })
    }

    fn unmount(&mut self) {
        self.listeners.clear();
    }
}

/// Autoplay policies reject `play()` routinely; that is logged, never surfaced.
fn play(video: &HtmlMediaElement, phase: &'static str) {
    match video.play() {
        Ok(promise) => spawn_local(async move {
            if let Err(error) = JsFuture::from(promise).await {
                log_rejection(phase, &dom::describe(&error));
            }
        }),
        Err(error) => log_rejection(phase, &dom::describe(&error)),
    }
}

fn log_rejection(phase: &str, error: &str) {
    log_event(
        LogLevel::Info,
        "video_play_rejected",
        json!({ "phase": phase, "error": error }),
    );
}
