use crate::error::EnhanceError;
use crate::motion::Rect;
use gloo::render::{request_animation_frame, AnimationFrame};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

pub fn window() -> Result<Window, EnhanceError> {
    web_sys::window().ok_or(EnhanceError::MissingWindow)
}

pub fn document() -> Result<Document, EnhanceError> {
    window()?.document().ok_or(EnhanceError::MissingDocument)
}

pub fn body(document: &Document) -> Result<HtmlElement, EnhanceError> {
    document.body().ok_or(EnhanceError::MissingBody)
}

pub fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, EnhanceError> {
    Ok(elements(document.query_selector_all(selector)?))
}

pub fn query_all_within(root: &Element, selector: &str) -> Result<Vec<Element>, EnhanceError> {
    Ok(elements(root.query_selector_all(selector)?))
}

pub fn create<T: JsCast>(document: &Document, tag: &str, class: &str) -> Result<T, EnhanceError> {
    let element = document.create_element(tag)?;
    if !class.is_empty() {
        element.set_class_name(class);
    }
    element
        .dyn_into::<T>()
        .map_err(|_| EnhanceError::Dom(format!("<{tag}> has an unexpected type")))
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

pub fn rect_of(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

pub fn describe(value: &JsValue) -> String {
    EnhanceError::from(value.clone()).to_string()
}

/// Per-frame callback that reschedules itself until stopped or dropped.
pub struct AnimationLoop {
    frame: Rc<RefCell<Option<AnimationFrame>>>,
}

impl AnimationLoop {
    pub fn start<F>(tick: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let frame = Rc::new(RefCell::new(None));
        schedule_frame(Rc::downgrade(&frame), tick);
        Self { frame }
    }

    pub fn stop(&self) {
        self.frame.borrow_mut().take();
    }
}

fn schedule_frame<F>(slot: Weak<RefCell<Option<AnimationFrame>>>, mut tick: F)
where
    F: FnMut() + 'static,
{
    let Some(frame) = slot.upgrade() else {
        return;
    };
    let handle = request_animation_frame(move |_timestamp| {
        tick();
        schedule_frame(slot, tick);
    });
    *frame.borrow_mut() = Some(handle);
}
