use super::dom;
use super::{Feature, MountOutcome};
use crate::error::EnhanceError;
use crate::prefs::{
    CursorStyle, PreferenceStore, Preferences, Theme, LIGHT_THEME_CLASS, NATIVE_CURSOR_CLASS,
};
use gloo::events::EventListener;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Storage};

const THEME_TOGGLE_ID: &str = "theme-toggle";
const CURSOR_TOGGLE_ID: &str = "cursor-toggle";

pub struct BrowserStore {
    storage: Option<Storage>,
}

impl BrowserStore {
    pub fn open() -> Self {
        Self {
            storage: web_sys::window().and_then(|w| w.local_storage().ok().flatten()),
        }
    }
}

impl PreferenceStore for BrowserStore {
    fn read(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(key);
        }
    }
}

pub type SharedPreferences = Rc<Preferences<BrowserStore>>;

pub struct ThemeToggle {
    document: Document,
    body: HtmlElement,
    prefs: SharedPreferences,
    listener: Option<EventListener>,
}

impl ThemeToggle {
    pub fn new(document: Document, body: HtmlElement, prefs: SharedPreferences) -> Self {
        Self {
            document,
            body,
            prefs,
            listener: None,
        }
    }
}

impl Feature for ThemeToggle {
    fn name(&self) -> &'static str {
        "theme_toggle"
    }

    fn mount(&mut self) -> Result<MountOutcome, EnhanceError> {
        let theme = Rc::new(Cell::new(self.prefs.theme()));
        apply_theme(&self.body, None, None, theme.get());

        let Some(control) = self.document.get_element_by_id(THEME_TOGGLE_ID) else {
            return Ok(MountOutcome::Skipped("no #theme-toggle"));
        };
        let sun = icon(&control, ".sun-icon")?;
        let moon = icon(&control, ".moon-icon")?;
        apply_theme(&self.body, sun.as_ref(), moon.as_ref(), theme.get());

        let body = self.body.clone();
        let prefs = self.prefs.clone();
        self.listener = Some(EventListener::new(&control, "click", move |_| {
            let next = theme.get().toggled();
            theme.set(next);
            apply_theme(&body, sun.as_ref(), moon.as_ref(), next);
            prefs.set_theme(next);
        }));

        Ok(MountOutcome::Attached { targets: 1 })
    }

    fn unmount(&mut self) {
        self.listener = None;
    }
}

fn icon(control: &Element, selector: &str) -> Result<Option<HtmlElement>, EnhanceError> {
    Ok(control
        .query_selector(selector)?
        .and_then(|element| element.dyn_into::<HtmlElement>().ok()))
}

fn apply_theme(body: &HtmlElement, sun: Option<&HtmlElement>, moon: Option<&HtmlElement>, theme: Theme) {
    let _ = body
        .class_list()
        .toggle_with_force(LIGHT_THEME_CLASS, theme.body_class_present());

    let display = theme.icon_display();
    if let Some(sun) = sun {
        dom::set_style(sun, "display", display.sun);
    }
    if let Some(moon) = moon {
        dom::set_style(moon, "display", display.moon);
    }
}

pub struct CursorToggle {
    document: Document,
    body: HtmlElement,
    prefs: SharedPreferences,
    listener: Option<EventListener>,
}

impl CursorToggle {
    pub fn new(document: Document, body: HtmlElement, prefs: SharedPreferences) -> Self {
        Self {
            document,
            body,
            prefs,
            listener: None,
        }
    }
}

impl Feature for CursorToggle {
    fn name(&self) -> &'static str {
        "cursor_toggle"
    }

    fn mount(&mut self) -> Result<MountOutcome, EnhanceError> {
        let style = Rc::new(Cell::new(self.prefs.cursor_style()));
        apply_cursor_style(&self.body, style.get());

        let Some(control) = self.document.get_element_by_id(CURSOR_TOGGLE_ID) else {
            return Ok(MountOutcome::Skipped("no #cursor-toggle"));
        };

        let body = self.body.clone();
        let prefs = self.prefs.clone();
        self.listener = Some(EventListener::new(&control, "click", move |_| {
            let next = style.get().toggled();
            style.set(next);
            apply_cursor_style(&body, next);
            prefs.set_cursor_style(next);
        }));

        Ok(MountOutcome::Attached { targets: 1 })
    }

    fn unmount(&mut self) {
        self.listener = None;
    }
}

fn apply_cursor_style(body: &HtmlElement, style: CursorStyle) {
    let _ = body
        .class_list()
        .toggle_with_force(NATIVE_CURSOR_CLASS, style.body_class_present());
}
