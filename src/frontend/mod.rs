mod clipboard;
mod code_toolbar;
mod cursor;
mod dom;
mod magnetic;
mod modal;
mod toc;
mod toggles;
mod video;

use crate::config::{EnhanceConfig, CONFIG_ELEMENT_ID};
use crate::error::EnhanceError;
use crate::logging::{self, log_event, LogLevel};
use crate::prefs::Preferences;
use code_toolbar::CodeToolbar;
use gloo::events::EventListener;
use cursor::CursorRenderer;
use magnetic::MagneticLinks;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use toc::FloatingToc;
use toggles::{BrowserStore, CursorToggle, ThemeToggle};
use video::VideoHover;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::Document;

pub enum MountOutcome {
    Attached { targets: usize },
    Skipped(&'static str),
}

/// A page behavior that can be attached to and detached from the document.
pub trait Feature {
    fn name(&self) -> &'static str;
    fn mount(&mut self) -> Result<MountOutcome, EnhanceError>;
    fn unmount(&mut self);
}

struct Enhancer {
    features: Vec<Box<dyn Feature>>,
}

thread_local! {
    static ENHANCER: RefCell<Option<Enhancer>> = const { RefCell::new(None) };
}

impl Enhancer {
    fn mount() -> Result<Self, EnhanceError> {
        let document = dom::document()?;
        let body = dom::body(&document)?;
        let config = Rc::new(load_config(&document));
        logging::set_min_level(config.log_level);

        let flags = config.features;
        let mut enhancer = Self {
            features: Vec::new(),
        };

        if flags.video {
            enhancer.attach(VideoHover::new(document.clone()));
        }

        let mut cursor = None;
        if flags.cursor {
            let mut renderer =
                CursorRenderer::new(document.clone(), body.clone(), config.follower_smoothing);
            if mount_feature(&mut renderer) {
                cursor = renderer.handle();
                enhancer.features.push(Box::new(renderer));
            }
        }

        if flags.magnetic {
            enhancer.attach(MagneticLinks::new(
                document.clone(),
                config.magnetic_strength,
                cursor.clone(),
            ));
        }

        if flags.code_toolbar {
            enhancer.attach(CodeToolbar::new(
                document.clone(),
                body.clone(),
                config.clone(),
                cursor.clone(),
            ));
        }

        let prefs = Rc::new(Preferences::new(
            BrowserStore::open(),
            config.storage_keys.clone(),
        ));
        if flags.theme_toggle {
            enhancer.attach(ThemeToggle::new(document.clone(), body.clone(), prefs.clone()));
        }
        if flags.cursor_toggle {
            enhancer.attach(CursorToggle::new(document.clone(), body.clone(), prefs));
        }

        if flags.toc {
            enhancer.attach(FloatingToc::new(document, body, cursor));
        }

        let mounted: Vec<&str> = enhancer.features.iter().map(|feature| feature.name()).collect();
        log_event(LogLevel::Info, "enhance_mounted", json!({ "features": mounted }));
        Ok(enhancer)
    }

    fn attach(&mut self, mut feature: impl Feature + 'static) {
        if mount_feature(&mut feature) {
            self.features.push(Box::new(feature));
        }
    }

    fn unmount(&mut self) {
        for feature in self.features.iter_mut().rev() {
            feature.unmount();
        }
        self.features.clear();
    }
}

/// A failing feature is rolled back and logged; the rest of the page still mounts.
fn mount_feature(feature: &mut dyn Feature) -> bool {
    match feature.mount() {
        Ok(MountOutcome::Attached { targets }) => {
            log_event(
                LogLevel::Debug,
                "feature_mounted",
                json!({ "feature": feature.name(), "targets": targets }),
            );
            true
        }
        Ok(MountOutcome::Skipped(reason)) => {
            feature.unmount();
            log_event(
                LogLevel::Info,
                "feature_skipped",
                json!({ "feature": feature.name(), "reason": reason }),
            );
            false
        }
        Err(error) => {
            feature.unmount();
            log_event(
                LogLevel::Error,
                "feature_failed",
                json!({ "feature": feature.name(), "error": error.to_string() }),
            );
            false
        }
    }
}

fn load_config(document: &Document) -> EnhanceConfig {
    let Some(source) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return EnhanceConfig::default();
    };

    EnhanceConfig::from_json(&source).unwrap_or_else(|error| {
        log_event(
            LogLevel::Warn,
            "config_invalid",
            json!({ "error": error.to_string() }),
        );
        EnhanceConfig::default()
    })
}

fn install_panic_hook() {
    static SET_HOOK: Once = Once::new();
    SET_HOOK.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            log_event(LogLevel::Error, "panic", json!({ "message": info.to_string() }));
        }));
    });
}

fn start() {
    match Enhancer::mount() {
        Ok(enhancer) => ENHANCER.with(|slot| *slot.borrow_mut() = Some(enhancer)),
        Err(error) => log_event(
            LogLevel::Error,
            "enhance_failed",
            json!({ "error": error.to_string() }),
        ),
    }
}

/// Detaches every feature and removes the injected elements.
#[wasm_bindgen]
pub fn teardown() {
    let enhancer = ENHANCER.with(|slot| slot.borrow_mut().take());
    if let Some(mut enhancer) = enhancer {
        enhancer.unmount();
    }
}

pub fn run() {
    install_panic_hook();

    let document = match dom::document() {
        Ok(document) => document,
        Err(error) => {
            log_event(
                LogLevel::Error,
                "enhance_failed",
                json!({ "error": error.to_string() }),
            );
            return;
        }
    };

    if document.ready_state() != "loading" {
        start();
        return;
    }

    // Registered for the page lifetime; the handler runs at most once.
    EventListener::once(&document, "DOMContentLoaded", move |_| start()).forget();
}
