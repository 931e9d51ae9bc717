use super::cursor::CursorHandle;
use super::dom;
use crate::error::EnhanceError;
use crate::logging::{log_event, LogLevel};
use crate::modal::{is_escape_key, CloseTrigger, ModalAction, ModalState, ACTIVE_CLASS};
use gloo::events::EventListener;
use gloo::render::request_animation_frame;
use gloo::timers::callback::Timeout;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent, MouseEvent};
use yew::prelude::*;
use yew::AppHandle;

const MODAL_HOST_CLASS: &str = "code-modal-root";

impl Reducible for ModalState {
    type Action = ModalAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = self.apply(action);
        if next == *self {
            self
        } else {
            Rc::new(next)
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct CodeModalProps {
    pub code_html: AttrValue,
    pub close_delay_ms: u32,
    #[prop_or_default]
    pub cursor: Option<CursorHandle>,
    pub on_closed: Callback<()>,
}

#[function_component(CodeModal)]
fn code_modal(props: &CodeModalProps) -> Html {
    let state = use_reducer(ModalState::opening);
    let overlay_ref = use_node_ref();
    let body_hovered = use_mut_ref(|| false);
    let phase = state.phase;

    {
        let state = state.clone();
        use_effect_with((), move |_| {
            let frame = request_animation_frame(move |_timestamp| {
                state.dispatch(ModalAction::Activate);
            });
            move || drop(frame)
        });
    }

    {
        let state = state.clone();
        use_effect_with(phase.accepts_close(), move |listening| {
            let listener = listening
                .then(|| dom::document().ok())
                .flatten()
                .map(|document| {
                    EventListener::new(&document, "keydown", move |event: &Event| {
                        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                            return;
                        };
                        if is_escape_key(&event.key()) {
                            state.dispatch(ModalAction::Close(CloseTrigger::Escape));
                        }
                    })
                });
            move || drop(listener)
        });
    }

    {
        let state = state.clone();
        let on_closed = props.on_closed.clone();
        let delay_ms = props.close_delay_ms;
        let trigger = state.trigger;
        use_effect_with(state.removal_delay_ms(delay_ms), move |removal| {
            let timer = removal.map(|delay| {
                log_event(
                    LogLevel::Info,
                    "modal_closed",
                    json!({ "trigger": trigger.map(CloseTrigger::as_str) }),
                );
                let finished = state.clone();
                Timeout::new(delay, move || {
                    finished.dispatch(ModalAction::Finish);
                    on_closed.emit(());
                })
            });
            move || drop(timer)
        });
    }

    {
        let cursor = props.cursor.clone();
        let body_hovered = body_hovered.clone();
        use_effect_with((), move |_| {
            move || {
                if *body_hovered.borrow() {
                    if let Some(cursor) = &cursor {
                        cursor.leave_suppressed();
                    }
                }
            }
        });
    }

    let on_close_click = {
        let state = state.clone();
        Callback::from(move |_: MouseEvent| state.dispatch(ModalAction::Close(CloseTrigger::Button)))
    };

    let on_overlay_click = {
        let state = state.clone();
        let overlay_ref = overlay_ref.clone();
        Callback::from(move |event: MouseEvent| {
            let target = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok());
            if target.is_some() && target == overlay_ref.cast::<Element>() {
                state.dispatch(ModalAction::Close(CloseTrigger::Backdrop));
            }
        })
    };

    let on_body_enter = {
        let cursor = props.cursor.clone();
        let body_hovered = body_hovered.clone();
        Callback::from(move |_: MouseEvent| {
            if body_hovered.replace(true) {
                return;
            }
            if let Some(cursor) = &cursor {
                cursor.enter_suppressed();
            }
        })
    };

    let on_body_leave = {
        let cursor = props.cursor.clone();
        Callback::from(move |_: MouseEvent| {
            if !body_hovered.replace(false) {
                return;
            }
            if let Some(cursor) = &cursor {
                cursor.leave_suppressed();
            }
        })
    };

    if !state.in_document() {
        return html! {};
    }

    html! {
        <div
            ref={overlay_ref}
            class={classes!("code-modal-overlay", phase.is_active().then_some(ACTIVE_CLASS))}
            onclick={on_overlay_click}
        >
            <div class="code-modal-content" role="dialog" aria-modal="true">
                <div class="code-modal-header">
                    <button class="code-modal-close" type="button" aria-label="Close" onclick={on_close_click}>
                        <svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                            <line x1="18" y1="6" x2="6" y2="18"></line>
                            <line x1="6" y1="6" x2="18" y2="18"></line>
                        </svg>
                    </button>
                </div>
                <div class="code-modal-body markdown-body" onmouseenter={on_body_enter} onmouseleave={on_body_leave}>
                    <div class="codehilite">
                        <pre><code>{ Html::from_html_unchecked(props.code_html.clone()) }</code></pre>
                    </div>
                </div>
            </div>
        </div>
    }
}

/// Mounts a modal showing `code_html` in its own host under `body`. The host
/// and its app are torn down once the close transition has elapsed.
pub fn open_code_modal(
    document: &Document,
    body: &HtmlElement,
    code_html: String,
    close_delay_ms: u32,
    cursor: Option<CursorHandle>,
) -> Result<(), EnhanceError> {
    let host: Element = dom::create(document, "div", MODAL_HOST_CLASS)?;
    body.append_child(&host)?;

    let app: Rc<RefCell<Option<AppHandle<CodeModal>>>> = Rc::default();
    let on_closed = {
        let app = app.clone();
        let host = host.clone();
        Callback::from(move |_| {
            let app = app.clone();
            let host = host.clone();
            spawn_local(async move {
                let handle = app.borrow_mut().take();
                if let Some(handle) = handle {
                    handle.destroy();
                }
                host.remove();
            });
        })
    };

    let bytes = code_html.len();
    let handle = yew::Renderer::<CodeModal>::with_root_and_props(
        host,
        CodeModalProps {
            code_html: AttrValue::from(code_html),
            close_delay_ms,
            cursor,
            on_closed,
        },
    )
    .render();
    *app.borrow_mut() = Some(handle);

    log_event(LogLevel::Info, "modal_opened", json!({ "bytes": bytes }));
    Ok(())
}
