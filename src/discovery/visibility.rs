use crate::dom::{NodeId, Page};

/// Rendered with a non-empty box and not hidden by style.
pub fn is_visible(page: &Page, element: NodeId) -> bool {
    page.is_visible(element)
}

/// Controls hidden from assistive tech or removed from the tab order are
/// treated as honeypots.
pub fn is_honeypot(page: &Page, element: NodeId) -> bool {
    page.attr(element, "aria-hidden") == Some("true")
        || page.attr(element, "tabindex").map(str::trim) == Some("-1")
}

pub fn is_fillable(page: &Page, element: NodeId) -> bool {
    is_visible(page, element) && !is_honeypot(page, element)
}
