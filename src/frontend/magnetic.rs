use super::cursor::CursorHandle;
use super::dom;
use super::{Feature, MountOutcome};
use crate::error::EnhanceError;
use crate::motion::{magnetic_offset, translate_css, Point};
use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, MouseEvent};

const MAGNETIC_SELECTOR: &str = "a:not(.dock-item):not(.post-card), .magnetic-btn";
const HOVER_BOX_CLASS: &str = "hover-box";
const RESTING_TRANSFORM: &str = "translate(0, 0)";

pub struct MagneticLinks {
    document: Document,
    strength: f64,
    cursor: Option<CursorHandle>,
    boxes: Vec<HtmlElement>,
    listeners: Vec<EventListener>,
}

impl MagneticLinks {
    pub fn new(document: Document, strength: f64, cursor: Option<CursorHandle>) -> Self {
        Self {
            document,
            strength,
            cursor,
            boxes: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

impl Feature for MagneticLinks {
    fn name(&self) -> &'static str {
        "magnetic"
    }

    fn mount(&mut self) -> Result<MountOutcome, EnhanceError> {
        let targets = dom::query_all(&self.document, MAGNETIC_SELECTOR)?;

        for target in &targets {
            let hover_box: HtmlElement = dom::create(&self.document, "span", HOVER_BOX_CLASS)?;
            target.append_child(&hover_box)?;
            self.boxes.push(hover_box.clone());

            let cursor = self.cursor.clone();
            let entered_box = hover_box.clone();
            self.listeners.push(EventListener::new(target, "mouseenter", move |_| {
                dom::set_style(&entered_box, "opacity", "1");
                if let Some(cursor) = &cursor {
                    cursor.hide_follower();
                }
            }));

            let strength = self.strength;
            let element = target.clone();
            let moving_box = hover_box.clone();
            self.listeners.push(EventListener::new(target, "mousemove", move |event: &Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let pointer = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
                let offset = magnetic_offset(dom::rect_of(&element), pointer, strength);
                dom::set_style(&moving_box, "transform", &translate_css(offset));
                dom::set_style(&moving_box, "opacity", "1");
            }));

            let cursor = self.cursor.clone();
            self.listeners.push(EventListener::new(target, "mouseleave", move |_| {
                dom::set_style(&hover_box, "transform", RESTING_TRANSFORM);
                dom::set_style(&hover_box, "opacity", "0");
                if let Some(cursor) = &cursor {
                    cursor.show_follower();
                }
            }));
        }

        Ok(MountOutcome::Attached {
            targets: targets.len(),
        })
    }

    fn unmount(&mut self) {
        self.listeners.clear();
        for hover_box in self.boxes.drain(..) {
            hover_box.remove();
        }
    }
}
