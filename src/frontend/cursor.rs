use super::dom::{self, AnimationLoop};
use super::{Feature, MountOutcome};
use crate::error::EnhanceError;
use crate::motion::{CursorVisibility, FollowerState, Point};
use gloo::events::EventListener;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, MouseEvent};

const CURSOR_CLASS: &str = "cursor";
const FOLLOWER_CLASS: &str = "cursor-follower";
const SUPPRESS_BODY_CLASS: &str = "modal-hover";
const SUPPRESS_SELECTOR: &str = "pre, code, [data-cursor-suppress]";

struct CursorElements {
    dot: HtmlElement,
    follower: HtmlElement,
    body: HtmlElement,
    visibility: Cell<CursorVisibility>,
}

/// Shared access to the injected dot and follower.
#[derive(Clone)]
pub struct CursorHandle {
    inner: Rc<CursorElements>,
}

impl PartialEq for CursorHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl CursorHandle {
    fn new(dot: HtmlElement, follower: HtmlElement, body: HtmlElement) -> Self {
        let handle = Self {
            inner: Rc::new(CursorElements {
                dot,
                follower,
                body,
                visibility: Cell::new(CursorVisibility::default()),
            }),
        };
        handle.render(CursorVisibility::default());
        handle
    }

    fn update(&self, change: impl FnOnce(&mut CursorVisibility)) {
        let mut visibility = self.inner.visibility.get();
        change(&mut visibility);
        self.inner.visibility.set(visibility);
        self.render(visibility);
    }

    fn render(&self, visibility: CursorVisibility) {
        dom::set_style(&self.inner.dot, "opacity", visibility.dot_opacity());
        dom::set_style(&self.inner.follower, "opacity", visibility.follower_opacity());
        let _ = self
            .inner
            .body
            .class_list()
            .toggle_with_force(SUPPRESS_BODY_CLASS, visibility.suppressed());
    }

    fn reveal(&self) {
        self.update(CursorVisibility::reveal);
    }

    pub fn enter_suppressed(&self) {
        self.update(CursorVisibility::enter_suppressed);
    }

    pub fn leave_suppressed(&self) {
        self.update(CursorVisibility::leave_suppressed);
    }

    pub fn hide_follower(&self) {
        self.update(|visibility| visibility.set_follower_hidden(true));
    }

    pub fn show_follower(&self) {
        self.update(|visibility| visibility.set_follower_hidden(false));
    }

    fn place_dot(&self, point: Point) {
        place(&self.inner.dot, point);
    }

    fn place_follower(&self, point: Point) {
        place(&self.inner.follower, point);
    }

    fn remove(&self) {
        self.inner.dot.remove();
        self.inner.follower.remove();
        let _ = self.inner.body.class_list().remove_1(SUPPRESS_BODY_CLASS);
    }
}

fn place(element: &HtmlElement, point: Point) {
    dom::set_style(element, "left", &format!("{}px", point.x));
    dom::set_style(element, "top", &format!("{}px", point.y));
}

pub struct CursorRenderer {
    document: Document,
    body: HtmlElement,
    smoothing: f64,
    handle: Option<CursorHandle>,
    listeners: Vec<EventListener>,
    animation: Option<AnimationLoop>,
}

impl CursorRenderer {
    pub fn new(document: Document, body: HtmlElement, smoothing: f64) -> Self {
        Self {
            document,
            body,
            smoothing,
            handle: None,
            listeners: Vec::new(),
            animation: None,
        }
    }

    pub fn handle(&self) -> Option<CursorHandle> {
        self.handle.clone()
    }
}

impl Feature for CursorRenderer {
    fn name(&self) -> &'static str {
        "cursor"
    }

    fn mount(&mut self) -> Result<MountOutcome, EnhanceError> {
        let dot: HtmlElement = dom::create(&self.document, "div", CURSOR_CLASS)?;
        let follower: HtmlElement = dom::create(&self.document, "div", FOLLOWER_CLASS)?;
        self.body.append_child(&dot)?;
        self.body.append_child(&follower)?;

        let handle = CursorHandle::new(dot, follower, self.body.clone());
        self.handle = Some(handle.clone());
        let state = Rc::new(RefCell::new(FollowerState::new(self.smoothing)));

        {
            let handle = handle.clone();
            let state = state.clone();
            self.listeners.push(EventListener::new(
                &self.document,
                "mousemove",
                move |event: &Event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let pointer = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));

                    let first_move = state.borrow_mut().pointer_moved(pointer.x, pointer.y);
                    if first_move {
                        handle.reveal();
                        handle.place_follower(state.borrow().current());
                    }
                    handle.place_dot(pointer);
                },
            ));
        }

        let regions = dom::query_all(&self.document, SUPPRESS_SELECTOR)?;
        for region in &regions {
            let on_enter = handle.clone();
            self.listeners.push(EventListener::new(region, "mouseenter", move |_| {
                on_enter.enter_suppressed();
            }));
            let on_leave = handle.clone();
            self.listeners.push(EventListener::new(region, "mouseleave", move |_| {
                on_leave.leave_suppressed();
            }));
        }

        self.animation = Some(AnimationLoop::start(move || {
            let current = state.borrow_mut().tick();
            handle.place_follower(current);
        }));

        Ok(MountOutcome::Attached {
            targets: regions.len(),
        })
    }

    fn unmount(&mut self) {
        if let Some(animation) = self.animation.take() {
            animation.stop();
        }
        self.listeners.clear();
        if let Some(handle) = self.handle.take() {
            handle.remove();
        }
    }
}
