use tracing::debug;

use crate::dom::{NodeId, Page, Selector};

const NAVIGATION_SELECTOR: &str =
    "button, input[type=submit], input[type=button], [role=button], a[role=button]";

/// Text a user would read on the control: its rendered text, else the
/// `value` of an input button, else its `aria-label`.
pub fn control_text(page: &Page, element: NodeId) -> String {
    let text = page.inner_text(element);
    if !text.trim().is_empty() {
        return text.trim().to_string();
    }
    if page.tag(element) == Some("input") {
        let value = page.value(element);
        if !value.trim().is_empty() {
            return value.trim().to_string();
        }
    }
    page.attr(element, "aria-label")
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// First visible, enabled control in `container` whose text mentions a
/// forward keyword and none of the stop keywords.
pub fn find_next_control(
    page: &Page,
    container: NodeId,
    next_keywords: &[String],
    stop_keywords: &[String],
) -> Option<NodeId> {
    let selector = match Selector::parse(NAVIGATION_SELECTOR) {
        Ok(selector) => selector,
        Err(err) => {
            debug!(error = %err, "Navigation selector rejected");
            return None;
        }
    };

    page.query_selector_all(container, &selector)
        .into_iter()
        .filter(|el| page.is_visible(*el) && !page.is_disabled(*el))
        .find(|el| {
            let text = control_text(page, *el).to_lowercase();
            let forward = next_keywords.iter().any(|k| text.contains(&k.to_lowercase()));
            let stops = stop_keywords.iter().any(|k| text.contains(&k.to_lowercase()));
            forward && !stops
        })
}
