use super::clipboard::copy_text;
use super::cursor::CursorHandle;
use super::dom;
use super::modal::open_code_modal;
use super::{Feature, MountOutcome};
use crate::config::EnhanceConfig;
use crate::copy::{CopyButtonState, CopyOutcome, COPIED_CLASS, COPY_LABEL};
use crate::error::EnhanceError;
use crate::logging::{log_event, LogLevel};
use crate::schedule::TaskSlots;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlElement};

const EXPAND_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="14" height="14" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><polyline points="15 3 21 3 21 9"></polyline><polyline points="9 21 3 21 3 15"></polyline><line x1="21" y1="3" x2="14" y2="10"></line><line x1="3" y1="21" x2="10" y2="14"></line></svg>"#;

const WRAPPER_STYLE: [(&str, &str); 8] = [
    ("position", "absolute"),
    ("top", "0.5rem"),
    ("right", "0.5rem"),
    ("display", "flex"),
    ("gap", "0.5rem"),
    ("opacity", "0"),
    ("transition", "opacity 0.2s"),
    ("z-index", "1"),
];

type RestoreSlots = Rc<RefCell<TaskSlots<usize, Timeout>>>;

pub struct CodeToolbar {
    document: Document,
    body: HtmlElement,
    config: Rc<EnhanceConfig>,
    cursor: Option<CursorHandle>,
    wrappers: Vec<HtmlElement>,
    listeners: Vec<EventListener>,
    restores: RestoreSlots,
}

impl CodeToolbar {
    pub fn new(
        document: Document,
        body: HtmlElement,
        config: Rc<EnhanceConfig>,
        cursor: Option<CursorHandle>,
    ) -> Self {
        Self {
            document,
            body,
            config,
            cursor,
            wrappers: Vec::new(),
            listeners: Vec::new(),
            restores: Rc::default(),
        }
    }

    fn attach(&mut self, index: usize, pre: &Element) -> Result<(), EnhanceError> {
        let wrapper: HtmlElement = dom::create(&self.document, "div", "code-toolbar")?;
        for (property, value) in WRAPPER_STYLE {
            dom::set_style(&wrapper, property, value);
        }
        pre.append_child(&wrapper)?;
        self.wrappers.push(wrapper.clone());

        let expand: HtmlElement = dom::create(&self.document, "button", "expand-btn")?;
        expand.set_inner_html(EXPAND_ICON);
        expand.set_title("Expand Code");
        dom::set_style(&expand, "position", "static");
        wrapper.append_child(&expand)?;

        let copy: HtmlElement = dom::create(&self.document, "button", "copy-btn")?;
        copy.set_text_content(Some(COPY_LABEL));
        dom::set_style(&copy, "position", "static");
        wrapper.append_child(&copy)?;

        let shown = wrapper.clone();
        self.listeners.push(EventListener::new(pre, "mouseenter", move |_| {
            dom::set_style(&shown, "opacity", "1");
        }));
        self.listeners.push(EventListener::new(pre, "mouseleave", move |_| {
            dom::set_style(&wrapper, "opacity", "0");
        }));

        let on_copy = self.copy_listener(index, pre.clone(), copy);
        let on_expand = self.expand_listener(pre.clone(), &expand);
        self.listeners.extend([on_copy, on_expand]);
        Ok(())
    }

    fn copy_listener(&self, index: usize, pre: Element, button: HtmlElement) -> EventListener {
        let document = self.document.clone();
        let body = self.body.clone();
        let restores = self.restores.clone();
        let feedback_ms = self.config.copy_feedback_ms;
        let state = Rc::new(Cell::new(CopyButtonState::default()));
        let target = button.clone();

        EventListener::new(&target, "click", move |_| {
            let Some(text) = code_text(&pre) else {
                return;
            };

            let document = document.clone();
            let body = body.clone();
            let restores = restores.clone();
            let state = state.clone();
            let button = button.clone();
            spawn_local(async move {
                let outcome = copy_text(&document, &body, &text).await;
                if restores.borrow().is_closed() {
                    return;
                }
                if let CopyOutcome::Copied(path) = outcome {
                    log_event(
                        LogLevel::Debug,
                        "code_copied",
                        json!({
                            "block": index,
                            "path": path.as_str(),
                            "chars": text.chars().count(),
                        }),
                    );
                }
                let next = state.get().after(outcome);
                state.set(next);
                show_copy_state(&button, next);

                if !next.needs_restore() {
                    restores.borrow_mut().cancel(&index);
                    return;
                }

                let restore_state = state.clone();
                let restore_button = button.clone();
                let timeout = Timeout::new(feedback_ms, move || {
                    let restored = restore_state.get().restored();
                    restore_state.set(restored);
                    show_copy_state(&restore_button, restored);
                });
                restores.borrow_mut().schedule(index, timeout);
            });
        })
    }

    fn expand_listener(&self, pre: Element, button: &HtmlElement) -> EventListener {
        let document = self.document.clone();
        let body = self.body.clone();
        let cursor = self.cursor.clone();
        let close_delay_ms = self.config.modal_close_ms;

        EventListener::new(button, "click", move |_| {
            let Some(code) = pre.query_selector("code").ok().flatten() else {
                return;
            };

            if let Err(error) =
                open_code_modal(&document, &body, code.inner_html(), close_delay_ms, cursor.clone())
            {
                log_event(
                    LogLevel::Error,
                    "modal_open_failed",
                    json!({ "error": error.to_string() }),
                );
            }
        })
    }
}

impl Feature for CodeToolbar {
    fn name(&self) -> &'static str {
        "code_toolbar"
    }

    fn mount(&mut self) -> Result<MountOutcome, EnhanceError> {
        self.restores.borrow_mut().reopen();
        let blocks = dom::query_all(&self.document, "pre")?;
        for (index, pre) in blocks.iter().enumerate() {
            self.attach(index, pre)?;
        }

        Ok(MountOutcome::Attached {
            targets: blocks.len(),
        })
    }

    fn unmount(&mut self) {
        self.restores.borrow_mut().close();
        self.listeners.clear();
        for wrapper in self.wrappers.drain(..) {
            wrapper.remove();
        }
    }
}

/// Rendered text of the block's `code` element, as the reader sees it.
fn code_text(pre: &Element) -> Option<String> {
    let code = pre.query_selector("code").ok().flatten()?;
    match code.dyn_ref::<HtmlElement>() {
        Some(code) => Some(code.inner_text()),
        None => code.text_content(),
    }
}

fn show_copy_state(button: &HtmlElement, state: CopyButtonState) {
    button.set_text_content(Some(state.label()));
    let _ = button
        .class_list()
        .toggle_with_force(COPIED_CLASS, state.marked_copied());
}
