use super::cursor::CursorHandle;
use super::dom;
use super::{Feature, MountOutcome};
use crate::error::EnhanceError;
use crate::logging::{log_event, LogLevel};
use crate::motion::{toc_hover_box, Point, Rect};
use crate::toc::{
    panel_open_after, plan_entries, skip_reason, HeadingInfo, HeadingLevel, PanelClick, TocEntry,
    TOC_HEADING_SELECTOR,
};
use gloo::events::EventListener;
use serde_json::json;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, MouseEvent, Node};
use yew::prelude::*;
use yew::AppHandle;

const CONTENT_SELECTOR: &str = ".markdown-body";
const TOC_HOST_CLASS: &str = "toc-root";

#[derive(Clone, Copy, Default, PartialEq)]
struct HoverBox {
    rect: Rect,
    visible: bool,
}

impl HoverBox {
    fn style(self) -> String {
        format!(
            "width: {:.2}px; height: {:.2}px; top: {:.2}px; left: {:.2}px; opacity: {};",
            self.rect.width,
            self.rect.height,
            self.rect.top,
            self.rect.left,
            if self.visible { 1 } else { 0 }
        )
    }
}

#[derive(Clone, Copy, Default, PartialEq)]
struct PanelState {
    open: bool,
}

impl Reducible for PanelState {
    type Action = PanelClick;

    fn reduce(self: Rc<Self>, click: Self::Action) -> Rc<Self> {
        Rc::new(Self {
            open: panel_open_after(self.open, click),
        })
    }
}

#[derive(Properties, PartialEq)]
pub struct TocPanelProps {
    pub entries: Vec<TocEntry>,
    #[prop_or_default]
    pub cursor: Option<CursorHandle>,
}

#[function_component(TocPanel)]
fn toc_panel(props: &TocPanelProps) -> Html {
    let panel = use_reducer_eq(PanelState::default);
    let hover_box = use_state_eq(HoverBox::default);
    let container_ref = use_node_ref();
    let dropdown_ref = use_node_ref();

    {
        let panel = panel.clone();
        let container_ref = container_ref.clone();
        use_effect_with((), move |_| {
            let listener = dom::document().ok().map(|document| {
                EventListener::new(&document, "click", move |event: &Event| {
                    let target = event
                        .target()
                        .and_then(|target| target.dyn_into::<Node>().ok());
                    let inside = container_ref
                        .cast::<Element>()
                        .is_some_and(|container| container.contains(target.as_ref()));
                    panel.dispatch(PanelClick::from_containment(inside));
                })
            });
            move || drop(listener)
        });
    }

    let on_toggle = {
        let panel = panel.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            panel.dispatch(PanelClick::Toggle);
        })
    };

    let on_link_click = {
        let panel = panel.clone();
        Callback::from(move |_: MouseEvent| panel.dispatch(PanelClick::Link))
    };

    let on_link_enter = {
        let hover_box = hover_box.clone();
        let dropdown_ref = dropdown_ref.clone();
        let cursor = props.cursor.clone();
        Callback::from(move |event: MouseEvent| {
            let link = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok());
            let (Some(link), Some(dropdown)) = (link, dropdown_ref.cast::<Element>()) else {
                return;
            };

            let scroll = Point::new(
                f64::from(dropdown.scroll_left()),
                f64::from(dropdown.scroll_top()),
            );
            hover_box.set(HoverBox {
                rect: toc_hover_box(dom::rect_of(&link), dom::rect_of(&dropdown), scroll),
                visible: true,
            });
            if let Some(cursor) = &cursor {
                cursor.hide_follower();
            }
        })
    };

    let on_link_leave = {
        let hover_box = hover_box.clone();
        let cursor = props.cursor.clone();
        Callback::from(move |_: MouseEvent| {
            hover_box.set(HoverBox {
                visible: false,
                ..*hover_box
            });
            if let Some(cursor) = &cursor {
                cursor.show_follower();
            }
        })
    };

    html! {
        <div ref={container_ref} class={classes!("toc-container", panel.open.then_some("active"))}>
            <div
                class="toc-toggle"
                role="button"
                aria-label="Table of contents"
                aria-expanded={panel.open.to_string()}
                onclick={on_toggle}
            >
                <svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                    <line x1="8" y1="6" x2="21" y2="6"></line>
                    <line x1="8" y1="12" x2="21" y2="12"></line>
                    <line x1="8" y1="18" x2="21" y2="18"></line>
                    <line x1="3" y1="6" x2="3.01" y2="6"></line>
                    <line x1="3" y1="12" x2="3.01" y2="12"></line>
                    <line x1="3" y1="18" x2="3.01" y2="18"></line>
                </svg>
            </div>
            <div ref={dropdown_ref} class="toc-dropdown">
                <div class="toc-title">{"Table of Contents"}</div>
                <div class="toc-hover-box" style={hover_box.style()}></div>
                <ul class="toc-list">
                    { for props.entries.iter().map(|entry| html! {
                        <li key={entry.scan_index.to_string()}>
                            <a
                                class={classes!("toc-link", entry.level.class_name())}
                                href={entry.href()}
                                onclick={on_link_click.clone()}
                                onmouseenter={on_link_enter.clone()}
                                onmouseleave={on_link_leave.clone()}
                            >
                                {entry.label.clone()}
                            </a>
                        </li>
                    }) }
                </ul>
            </div>
        </div>
    }
}

pub struct FloatingToc {
    document: Document,
    body: HtmlElement,
    cursor: Option<CursorHandle>,
    host: Option<Element>,
    app: Option<AppHandle<TocPanel>>,
}

impl FloatingToc {
    pub fn new(document: Document, body: HtmlElement, cursor: Option<CursorHandle>) -> Self {
        Self {
            document,
            body,
            cursor,
            host: None,
            app: None,
        }
    }
}

impl Feature for FloatingToc {
    fn name(&self) -> &'static str {
        "toc"
    }

    fn mount(&mut self) -> Result<MountOutcome, EnhanceError> {
        let content = self.document.query_selector(CONTENT_SELECTOR)?;
        let headings = match &content {
            Some(content) => dom::query_all_within(content, TOC_HEADING_SELECTOR)?,
            None => Vec::new(),
        };
        if let Some(reason) = skip_reason(content.is_some(), headings.len()) {
            return Ok(MountOutcome::Skipped(reason));
        }

        let scanned: Vec<HeadingInfo> = headings
            .iter()
            .map(|heading| HeadingInfo {
                level: HeadingLevel::from_tag_name(&heading.tag_name()).unwrap_or(HeadingLevel::H3),
                id: Some(heading.id()),
                text: heading.text_content().unwrap_or_default(),
            })
            .collect();

        let entries = plan_entries(&scanned);
        for entry in entries.iter().filter(|entry| entry.assigned_id) {
            headings[entry.scan_index].set_id(&entry.id);
        }

        let host: Element = dom::create(&self.document, "div", TOC_HOST_CLASS)?;
        self.body.append_child(&host)?;
        self.host = Some(host.clone());

        log_event(
            LogLevel::Debug,
            "toc_built",
            json!({ "headings": headings.len(), "entries": entries.len() }),
        );

        let targets = entries.len();
        self.app = Some(
            yew::Renderer::<TocPanel>::with_root_and_props(
                host,
                TocPanelProps {
                    entries,
                    cursor: self.cursor.clone(),
                },
            )
            .render(),
        );

        Ok(MountOutcome::Attached { targets })
    }

    fn unmount(&mut self) {
        if let Some(app) = self.app.take() {
            app.destroy();
        }
        if let Some(host) = self.host.take() {
            host.remove();
        }
    }
}
