use crate::dom::node::NodeId;
use crate::dom::page::Page;

/// The subset of computed style the engine reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComputedStyle {
    pub display: Option<String>,
    pub visibility: Option<String>,
    pub opacity: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub top: Option<f64>,
    pub left: Option<f64>,
}

impl ComputedStyle {
    pub fn parse_inline(style: &str) -> Self {
        let mut out = Self::default();
        for declaration in style.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let value = value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_ascii_lowercase();
            match property.trim().to_ascii_lowercase().as_str() {
                "display" => out.display = Some(value),
                "visibility" => out.visibility = Some(value),
                "opacity" => out.opacity = value.parse().ok(),
                "width" => out.width = parse_length(&value),
                "height" => out.height = parse_length(&value),
                "top" | "margin-top" => out.top = parse_length(&value),
                "left" | "margin-left" => out.left = parse_length(&value),
                _ => {}
            }
        }
        out
    }

    pub fn hides_subtree(&self) -> bool {
        self.display.as_deref() == Some("none")
    }
}

fn parse_length(value: &str) -> Option<f64> {
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Page {
    /// Style declared on the element itself (inline `style` plus `hidden`).
    pub fn computed_style(&self, node: NodeId) -> ComputedStyle {
        let Some(el) = self.element(node) else {
            return ComputedStyle::default();
        };
        let mut style = el
            .attr("style")
            .map(ComputedStyle::parse_inline)
            .unwrap_or_default();
        if el.attr("hidden").is_some() && style.display.is_none() {
            style.display = Some("none".to_string());
        }
        if el.input_type().as_deref() == Some("hidden") {
            style.display = Some("none".to_string());
        }
        style
    }

    fn composed_ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = vec![node];
        let mut current = node;
        while let Some(parent) = self.composed_parent(current) {
            out.push(parent);
            current = parent;
        }
        out
    }

    /// `false` when the node or any flattened-tree ancestor is
    /// `display:none`, or the node is detached.
    pub fn is_rendered(&self, node: NodeId) -> bool {
        self.is_connected(node)
            && self
                .composed_ancestors(node)
                .into_iter()
                .all(|n| !self.computed_style(n).hides_subtree())
    }

    /// Inherited `visibility`: the nearest explicit declaration wins.
    pub fn effective_visibility(&self, node: NodeId) -> String {
        self.composed_ancestors(node)
            .into_iter()
            .find_map(|n| self.computed_style(n).visibility)
            .unwrap_or_else(|| "visible".to_string())
    }

    pub fn effective_opacity(&self, node: NodeId) -> f64 {
        self.composed_ancestors(node)
            .into_iter()
            .filter_map(|n| self.computed_style(n).opacity)
            .product()
    }

    /// Synthetic layout box: explicit `width`/`height` or per-control
    /// defaults, offset by the accumulated `top`/`left` of the element and
    /// its ancestors. Unrendered nodes get an empty box.
    pub fn bounding_rect(&self, node: NodeId) -> Rect {
        if !self.is_rendered(node) {
            return Rect::default();
        }
        let style = self.computed_style(node);
        let (default_width, default_height) = self.default_size(node);

        let mut top = 0.0;
        let mut left = 0.0;
        for ancestor in self.composed_ancestors(node) {
            let s = self.computed_style(ancestor);
            top += s.top.unwrap_or(0.0);
            left += s.left.unwrap_or(0.0);
        }

        Rect {
            top,
            left,
            width: style.width.unwrap_or(default_width),
            height: style.height.unwrap_or(default_height),
        }
    }

    fn default_size(&self, node: NodeId) -> (f64, f64) {
        let Some(el) = self.element(node) else {
            return (0.0, 0.0);
        };
        match el.tag.as_str() {
            "input" => match el.input_type().as_deref() {
                Some("checkbox" | "radio") => (13.0, 13.0),
                Some("hidden") => (0.0, 0.0),
                _ => (200.0, 24.0),
            },
            "textarea" => (300.0, 60.0),
            "select" => (200.0, 24.0),
            "button" => (80.0, 28.0),
            "option" | "br" | "script" | "style" | "template" | "head" | "meta" | "link" => {
                (0.0, 0.0)
            }
            _ => (300.0, 24.0),
        }
    }

    /// Visibility test applied during discovery: rendered, not
    /// `visibility:hidden|collapse`, non-zero opacity and a non-empty box.
    pub fn is_visible(&self, node: NodeId) -> bool {
        if !self.is_rendered(node) {
            return false;
        }
        if matches!(self.effective_visibility(node).as_str(), "hidden" | "collapse") {
            return false;
        }
        if self.effective_opacity(node) <= 0.0 {
            return false;
        }
        !self.bounding_rect(node).is_empty()
    }
}
