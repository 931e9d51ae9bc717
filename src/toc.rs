//! Table-of-contents planning over the scanned heading set.

pub const TOC_HEADING_SELECTOR: &str = "h2, h3";
const SELF_HEADING: &str = "table of contents";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadingLevel {
    H2,
    H3,
}

impl HeadingLevel {
    pub fn from_tag_name(tag: &str) -> Option<Self> {
        if tag.eq_ignore_ascii_case("h2") {
            Some(Self::H2)
        } else if tag.eq_ignore_ascii_case("h3") {
            Some(Self::H3)
        } else {
            None
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Self::H2 => "h2",
            Self::H3 => "h3",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadingInfo {
    pub level: HeadingLevel,
    pub id: Option<String>,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Position of the heading in the original scan.
    pub scan_index: usize,
    pub id: String,
    /// Set when `id` was synthesized and must be written back to the heading.
    pub assigned_id: bool,
    pub label: String,
    pub level: HeadingLevel,
}

impl TocEntry {
    pub fn href(&self) -> String {
        format!("#{}", self.id)
    }
}

pub fn is_self_heading(text: &str) -> bool {
    text.trim().to_lowercase() == SELF_HEADING
}

pub fn synthetic_id(scan_index: usize) -> String {
    format!("heading-{scan_index}")
}

/// Builds entries in document order. Excluded headings still consume their
/// scan index, so synthetic ids never shift.
pub fn plan_entries(headings: &[HeadingInfo]) -> Vec<TocEntry> {
    headings
        .iter()
        .enumerate()
        .filter(|(_, heading)| !is_self_heading(&heading.text))
        .map(|(scan_index, heading)| {
            let existing = heading.id.as_deref().filter(|id| !id.is_empty());
            TocEntry {
                scan_index,
                id: existing
                    .map(str::to_string)
                    .unwrap_or_else(|| synthetic_id(scan_index)),
                assigned_id: existing.is_none(),
                label: heading.text.clone(),
                level: heading.level,
            }
        })
        .collect()
}

/// Reason to leave the page without a panel: no content region, or a region
/// without any `h2`/`h3`. Excluded headings still count as scanned.
pub fn skip_reason(content_found: bool, scanned_headings: usize) -> Option<&'static str> {
    if !content_found {
        Some("no content region")
    } else if scanned_headings == 0 {
        Some("no headings")
    } else {
        None
    }
}

/// Where a click landed relative to the floating panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelClick {
    Toggle,
    Link,
    /// Inside the panel but not on the toggle or a link.
    Inside,
    Outside,
}

impl PanelClick {
    pub fn from_containment(inside: bool) -> Self {
        if inside {
            Self::Inside
        } else {
            Self::Outside
        }
    }
}

pub fn panel_open_after(open: bool, click: PanelClick) -> bool {
    match click {
        PanelClick::Toggle => !open,
        PanelClick::Link | PanelClick::Outside => false,
        PanelClick::Inside => open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: HeadingLevel, id: Option<&str>, text: &str) -> HeadingInfo {
        HeadingInfo {
            level,
            id: id.map(str::to_string),
            text: text.to_string(),
        }
    }

    fn ids(entries: &[TocEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.id.as_str()).collect()
    }

    #[test]
    fn missing_ids_are_positional_and_not_deduplicated() {
        let headings = vec![
            heading(HeadingLevel::H2, None, "Intro"),
            heading(HeadingLevel::H2, None, "Setup"),
            heading(HeadingLevel::H3, None, "Intro"),
        ];

        let entries = plan_entries(&headings);
        assert_eq!(ids(&entries), vec!["heading-0", "heading-1", "heading-2"]);
        assert!(entries.iter().all(|entry| entry.assigned_id));
        assert_eq!(entries[2].level.class_name(), "h3");
        assert_eq!(entries[1].href(), "#heading-1");
    }

    #[test]
    fn self_heading_is_skipped_but_keeps_its_index() {
        let headings = vec![
            heading(HeadingLevel::H2, None, "Table of Contents"),
            heading(HeadingLevel::H2, None, "\n TABLE OF CONTENTS \t"),
            heading(HeadingLevel::H2, None, "Usage"),
            heading(HeadingLevel::H3, None, "Flags"),
        ];

        let entries = plan_entries(&headings);
        assert_eq!(ids(&entries), vec!["heading-2", "heading-3"]);
        assert_eq!(entries[0].scan_index, 2);
        assert_eq!(entries[0].label, "Usage");
    }

    #[test]
    fn existing_ids_are_kept() {
        let headings = vec![
            heading(HeadingLevel::H2, Some("install"), "Install"),
            heading(HeadingLevel::H2, Some(""), "Configure"),
        ];

        let entries = plan_entries(&headings);
        assert_eq!(ids(&entries), vec!["install", "heading-1"]);
        assert!(!entries[0].assigned_id);
        assert!(entries[1].assigned_id);
    }

    #[test]
    fn empty_scan_plans_nothing() {
        assert!(plan_entries(&[]).is_empty());
    }

    #[test]
    fn heading_level_from_tag_name() {
        assert_eq!(HeadingLevel::from_tag_name("H2"), Some(HeadingLevel::H2));
        assert_eq!(HeadingLevel::from_tag_name("h3"), Some(HeadingLevel::H3));
        assert_eq!(HeadingLevel::from_tag_name("H4"), None);
    }

    #[test]
    fn page_without_headings_gets_no_panel() {
        assert_eq!(skip_reason(true, 0), Some("no headings"));
        assert_eq!(skip_reason(false, 0), Some("no content region"));
        assert_eq!(skip_reason(true, 1), None);
    }

    #[test]
    fn a_lone_self_heading_still_builds_an_empty_panel() {
        let headings = vec![heading(HeadingLevel::H2, None, "Table of Contents")];
        assert_eq!(skip_reason(true, headings.len()), None);
        assert!(plan_entries(&headings).is_empty());
    }

    #[test]
    fn outside_click_closes_and_inside_click_keeps_state() {
        assert!(!panel_open_after(true, PanelClick::from_containment(false)));
        assert!(panel_open_after(true, PanelClick::from_containment(true)));
        assert!(!panel_open_after(false, PanelClick::Inside));
    }

    #[test]
    fn toggle_flips_and_link_closes() {
        let open = panel_open_after(false, PanelClick::Toggle);
        assert!(open);
        assert!(!panel_open_after(open, PanelClick::Toggle));
        assert!(!panel_open_after(open, PanelClick::Link));
    }

    #[test]
    fn link_click_bubbling_to_the_document_leaves_the_panel_closed() {
        let after_link = panel_open_after(true, PanelClick::Link);
        assert!(!panel_open_after(after_link, PanelClick::from_containment(true)));
    }
}
