use std::collections::{BTreeMap, HashMap};
use std::fmt;

use url::Url;

use crate::dom::error::DomError;
use crate::dom::events::{EventRecord, ListenerEntry, ValueInterceptor};
use crate::dom::node::{ElementData, FrameContent, Node, NodeId, NodeKind};
use crate::dom::selector::Selector;
use crate::dom::transfer::FileBlob;

// ============================================================================
// Page: arena DOM for one top-level browsing context
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

/// The page the engine reads and mutates.
///
/// Nodes live in a single arena shared by the top-level document, every
/// attached shadow root and every same-origin frame document, so a `NodeId`
/// is unique across all of them. The engine never assumes it is the only
/// writer: page listeners run synchronously inside `dispatch_event` and may
/// rewrite or remove anything.
pub struct Page {
    pub(super) nodes: Vec<Node>,
    pub(super) document: NodeId,
    pub(super) url: Url,
    pub(super) viewport: Viewport,
    pub(super) active_element: Option<NodeId>,
    pub(super) listeners: Vec<ListenerEntry>,
    pub(super) value_interceptors: HashMap<NodeId, ValueInterceptor>,
    pub(super) event_log: Vec<EventRecord>,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.url.as_str())
            .field("nodes", &self.nodes.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Page {
    pub fn new(url: &str) -> Result<Self, DomError> {
        let parsed = Url::parse(url).map_err(|source| DomError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let origin = parsed.origin().ascii_serialization();
        let root = Node::new(NodeKind::Document { origin, owner: None }, None, true);

        Ok(Self {
            nodes: vec![root],
            document: NodeId(0),
            url: parsed,
            viewport: Viewport::default(),
            active_element: None,
            listeners: Vec::new(),
            value_interceptors: HashMap::new(),
            event_log: Vec::new(),
        })
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Same-document navigation (`history.pushState`): `url` is resolved
    /// against the current URL and must keep the page's origin.
    pub fn push_state(&mut self, url: &str) -> Result<(), DomError> {
        let next = self.url.join(url).map_err(|source| DomError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        if next.origin() != self.url.origin() {
            return Err(DomError::CrossOrigin {
                origin: next.origin().ascii_serialization(),
            });
        }
        self.url = next;
        Ok(())
    }

    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ------------------------------------------------------------------
    // Tree construction
    // ------------------------------------------------------------------

    fn push_node(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let connected = parent
            .and_then(|p| self.nodes.get(p.0))
            .map(|p| p.connected)
            .unwrap_or(true);
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind, parent, connected));
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: BTreeMap<String, String>,
    ) -> NodeId {
        self.push_node(NodeKind::Element(ElementData::new(tag, attrs)), Some(parent))
    }

    /// Convenience for building pages in code: `attrs` as `(name, value)` pairs.
    pub fn append(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect();
        self.append_element(parent, tag, attrs)
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_node(NodeKind::Text(text.to_string()), Some(parent))
    }

    /// Attach an open shadow root to `host` and return the root.
    pub fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, DomError> {
        if self.element(host).ok_or(DomError::NotAnElement(host))?.shadow_root.is_some() {
            return Err(DomError::ShadowRootExists(host));
        }

        let connected = self.is_connected(host);
        let root = NodeId(self.nodes.len());
        self.nodes
            .push(Node::new(NodeKind::ShadowRoot { host }, None, connected));
        if let Some(el) = self.element_mut(host) {
            el.shadow_root = Some(root);
        }
        Ok(root)
    }

    /// Create an empty document for a same-origin frame owned by `iframe`.
    pub fn attach_frame_document(&mut self, iframe: NodeId) -> Result<NodeId, DomError> {
        self.element(iframe).ok_or(DomError::NotAnElement(iframe))?;

        let connected = self.is_connected(iframe);
        let origin = self.origin();
        let root = NodeId(self.nodes.len());
        self.nodes.push(Node::new(
            NodeKind::Document {
                origin,
                owner: Some(iframe),
            },
            None,
            connected,
        ));
        if let Some(el) = self.element_mut(iframe) {
            el.frame = Some(FrameContent::SameOrigin(root));
        }
        Ok(root)
    }

    pub fn attach_cross_origin_frame(&mut self, iframe: NodeId, origin: &str) -> Result<(), DomError> {
        let el = self.element_mut(iframe).ok_or(DomError::NotAnElement(iframe))?;
        el.frame = Some(FrameContent::CrossOrigin {
            origin: origin.to_string(),
        });
        Ok(())
    }

    /// Detach `node` from its parent; the whole subtree becomes invalid.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes.get(node.0).and_then(|n| n.parent) {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.parent = None;
        }
        self.mark_disconnected(node);
        if self.active_element.is_some_and(|a| !self.is_connected(a)) {
            self.active_element = None;
        }
    }

    fn mark_disconnected(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let Some(n) = self.nodes.get_mut(current.0) else {
                continue;
            };
            n.connected = false;
            stack.extend(n.children.iter().copied());
            if let NodeKind::Element(el) = &n.kind {
                if let Some(shadow) = el.shadow_root {
                    stack.push(shadow);
                }
                if let Some(FrameContent::SameOrigin(doc)) = &el.frame {
                    stack.push(*doc);
                }
            }
        }
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).is_some_and(|n| n.connected)
    }

    pub fn ensure_connected(&self, node: NodeId) -> Result<(), DomError> {
        if self.is_connected(node) {
            Ok(())
        } else {
            Err(DomError::Detached(node))
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_checked(&mut self, node: NodeId) -> Result<&mut ElementData, DomError> {
        self.ensure_connected(node)?;
        self.element_mut(node).ok_or(DomError::NotAnElement(node))
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attr(name)
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let el = self.element_checked(node)?;
        el.attrs.insert(name.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Result<(), DomError> {
        let el = self.element_checked(node)?;
        el.attrs.remove(name);
        Ok(())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|p| self.is_element(*p))
    }

    /// Parent in the flattened tree: shadow roots resolve to their host and
    /// frame documents to their `<iframe>` element.
    pub fn composed_parent(&self, node: NodeId) -> Option<NodeId> {
        let n = self.nodes.get(node.0)?;
        if let Some(p) = n.parent {
            return Some(p);
        }
        match &n.kind {
            NodeKind::ShadowRoot { host } => Some(*host),
            NodeKind::Document { owner, .. } => *owner,
            _ => None,
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    /// Document or shadow root containing `node`.
    pub fn root_of(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    pub fn shadow_host(&self, root: NodeId) -> Option<NodeId> {
        match self.nodes.get(root.0)?.kind {
            NodeKind::ShadowRoot { host } => Some(host),
            _ => None,
        }
    }

    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.element(host)?.shadow_root
    }

    /// Content document of an `<iframe>`. Cross-origin frames are a
    /// security error, frames without content yield `None`.
    pub fn frame_document(&self, iframe: NodeId) -> Result<Option<NodeId>, DomError> {
        match self.element(iframe).and_then(|el| el.frame.as_ref()) {
            Some(FrameContent::SameOrigin(doc)) => Ok(Some(*doc)),
            Some(FrameContent::CrossOrigin { origin }) => Err(DomError::CrossOrigin {
                origin: origin.clone(),
            }),
            None => Ok(None),
        }
    }

    /// Pre-order descendants of `root` (exclusive). Like `querySelectorAll`,
    /// this does not enter shadow roots or frame documents.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub fn descendant_elements(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|n| self.is_element(*n))
            .collect()
    }

    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// Nearest inclusive ancestor element (same root) satisfying `pred`.
    pub fn closest(&self, node: NodeId, pred: impl Fn(&ElementData) -> bool) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if let Some(el) = self.element(n) {
                if pred(el) {
                    return Some(n);
                }
            }
            current = self.parent(n);
        }
        None
    }

    pub fn closest_tag(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        self.closest(node, |el| el.tag == tag)
    }

    pub fn get_element_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.descendants(root)
            .into_iter()
            .find(|n| self.attr(*n, "id") == Some(id))
    }

    pub fn find_first_tag(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|n| self.tag(*n) == Some(tag))
    }

    pub fn elements_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|n| self.tag(*n) == Some(tag))
            .collect()
    }

    pub fn query_selector_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendant_elements(root)
            .into_iter()
            .filter(|n| selector.matches(self, *n))
            .collect()
    }

    pub fn query_selector(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendant_elements(root)
            .into_iter()
            .find(|n| selector.matches(self, *n))
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    pub fn text_content(&self, node: NodeId) -> String {
        self.text_content_excluding(node, None)
    }

    /// Text of `node`'s subtree with the subtree of `excluded` left out.
    pub fn text_content_excluding(&self, node: NodeId, excluded: Option<NodeId>) -> String {
        let mut out = String::new();
        self.collect_text(node, excluded, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, excluded: Option<NodeId>, out: &mut String) {
        if Some(node) == excluded {
            return;
        }
        let Some(n) = self.nodes.get(node.0) else {
            return;
        };
        if let NodeKind::Text(text) = &n.kind {
            out.push_str(text);
            return;
        }
        for child in &n.children {
            self.collect_text(*child, excluded, out);
        }
    }

    /// Rendered text: skips scripts, styles, templates and hidden subtrees,
    /// and separates element boundaries with spaces.
    pub fn inner_text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_rendered_text(node, &mut out);
        out
    }

    fn collect_rendered_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.nodes.get(node.0) else {
            return;
        };
        match &n.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(el) => {
                if matches!(el.tag.as_str(), "script" | "style" | "template" | "noscript") {
                    return;
                }
                if self.computed_style(node).hides_subtree() {
                    return;
                }
                out.push(' ');
                for child in &n.children {
                    self.collect_rendered_text(*child, out);
                }
                out.push(' ');
            }
            _ => {
                for child in &n.children {
                    self.collect_rendered_text(*child, out);
                }
            }
        }
    }

    /// Replace all children of `node` with a single text node.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        self.ensure_connected(node)?;
        let children: Vec<NodeId> = self.children(node).to_vec();
        for child in children {
            self.remove(child);
        }
        if !text.is_empty() {
            self.append_text(node, text);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Form state
    // ------------------------------------------------------------------

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.has_attr(node, "disabled") || self.attr(node, "aria-disabled") == Some("true")
    }

    /// Current `value` property. For `<select>` this is the value of the
    /// first selected option.
    pub fn value(&self, node: NodeId) -> String {
        match self.tag(node) {
            Some("select") => self
                .options(node)
                .into_iter()
                .find(|o| self.is_selected(*o))
                .map(|o| self.option_value(o))
                .unwrap_or_default(),
            Some(_) => self
                .element(node)
                .map(|el| el.value.clone())
                .unwrap_or_default(),
            None => String::new(),
        }
    }

    /// Write the value through the element's own setter, bypassing any
    /// page-installed property interceptor.
    pub fn set_value_native(&mut self, node: NodeId, value: &str) -> Result<(), DomError> {
        if self.tag(node) == Some("select") {
            self.ensure_connected(node)?;
            let target = self
                .options(node)
                .into_iter()
                .find(|o| self.option_value(*o) == value);
            for option in self.options(node) {
                let selected = Some(option) == target;
                if let Some(el) = self.element_mut(option) {
                    el.selected = selected;
                }
            }
            return Ok(());
        }

        let el = self.element_checked(node)?;
        el.value = value.to_string();
        Ok(())
    }

    /// Plain `element.value = v` assignment: goes through an interceptor when
    /// the page installed one for this element.
    pub fn set_value_property(&mut self, node: NodeId, value: &str) -> Result<(), DomError> {
        self.ensure_connected(node)?;
        match self.value_interceptors.get(&node).cloned() {
            Some(interceptor) => {
                interceptor(self, node, value);
                Ok(())
            }
            None => self.set_value_native(node, value),
        }
    }

    pub fn checked(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|el| el.checked)
    }

    /// Set the `checked` property. Checking a radio unchecks its group peers.
    pub fn set_checked(&mut self, node: NodeId, checked: bool) -> Result<(), DomError> {
        let is_radio = self.element_checked(node)?.input_type().as_deref() == Some("radio");
        if checked && is_radio {
            for peer in self.radio_group(node) {
                if let Some(el) = self.element_mut(peer) {
                    el.checked = false;
                }
            }
        }
        if let Some(el) = self.element_mut(node) {
            el.checked = checked;
        }
        Ok(())
    }

    pub fn form_owner(&self, node: NodeId) -> Option<NodeId> {
        self.closest_tag(node, "form")
    }

    /// Radio inputs sharing `node`'s name inside the same form (or the same
    /// root when there is no form), `node` included.
    pub fn radio_group(&self, node: NodeId) -> Vec<NodeId> {
        let Some(name) = self.attr(node, "name").filter(|n| !n.is_empty()) else {
            return vec![node];
        };
        let scope = self
            .form_owner(node)
            .unwrap_or_else(|| self.root_of(node));
        self.descendants(scope)
            .into_iter()
            .filter(|n| {
                self.element(*n).is_some_and(|el| {
                    el.input_type().as_deref() == Some("radio") && el.attr("name") == Some(name)
                }) && self.form_owner(*n) == self.form_owner(node)
            })
            .collect()
    }

    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|n| self.tag(*n) == Some("option"))
            .collect()
    }

    pub fn option_value(&self, option: NodeId) -> String {
        match self.attr(option, "value") {
            Some(v) => v.to_string(),
            None => collapse_whitespace(&self.text_content(option)),
        }
    }

    pub fn option_label(&self, option: NodeId) -> String {
        match self.attr(option, "label").filter(|l| !l.trim().is_empty()) {
            Some(l) => collapse_whitespace(l),
            None => collapse_whitespace(&self.text_content(option)),
        }
    }

    pub fn is_selected(&self, option: NodeId) -> bool {
        self.element(option).is_some_and(|el| el.selected)
    }

    pub fn is_multiple(&self, select: NodeId) -> bool {
        self.has_attr(select, "multiple")
    }

    pub fn owning_select(&self, option: NodeId) -> Option<NodeId> {
        self.closest_tag(option, "select")
    }

    /// Set an option's `selected` flag. In a single-select, selecting one
    /// option clears the others.
    pub fn set_selected(&mut self, option: NodeId, selected: bool) -> Result<(), DomError> {
        self.element_checked(option)?;
        if let Some(select) = self.owning_select(option) {
            if selected && !self.is_multiple(select) {
                for other in self.options(select) {
                    if let Some(el) = self.element_mut(other) {
                        el.selected = false;
                    }
                }
            }
        }
        if let Some(el) = self.element_mut(option) {
            el.selected = selected;
        }
        Ok(())
    }

    pub fn files(&self, node: NodeId) -> &[FileBlob] {
        self.element(node)
            .map(|el| el.files.as_slice())
            .unwrap_or(&[])
    }

    pub fn set_files(&mut self, node: NodeId, files: Vec<FileBlob>) -> Result<(), DomError> {
        let el = self.element_checked(node)?;
        el.value = files
            .first()
            .map(|f| format!("C:\\fakepath\\{}", f.name))
            .unwrap_or_default();
        el.files = files;
        Ok(())
    }

    /// Browser defaults a page script would observe right after parsing:
    /// textarea values come from their text, and single-selects without an
    /// explicit selection select their first option.
    pub fn apply_default_form_state(&mut self, root: NodeId) {
        for node in self.descendants(root) {
            match self.tag(node) {
                Some("textarea") => {
                    let text = self.text_content(node);
                    if let Some(el) = self.element_mut(node) {
                        el.value = text;
                    }
                }
                Some("select") if !self.is_multiple(node) => {
                    let options = self.options(node);
                    if !options.iter().any(|o| self.is_selected(*o)) {
                        if let Some(el) = options.first().and_then(|o| self.element_mut(*o)) {
                            el.selected = true;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    // ------------------------------------------------------------------
    // Focus & viewport
    // ------------------------------------------------------------------

    pub fn focus(&mut self, node: NodeId) -> Result<(), DomError> {
        self.element_checked(node)?;
        self.active_element = Some(node);
        Ok(())
    }

    pub fn blur(&mut self, node: NodeId) {
        if self.active_element == Some(node) {
            self.active_element = None;
        }
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn is_fully_in_viewport(&self, node: NodeId) -> bool {
        let rect = self.bounding_rect(node);
        let vp = self.viewport;
        rect.top >= vp.scroll_y
            && rect.left >= vp.scroll_x
            && rect.top + rect.height <= vp.scroll_y + vp.height
            && rect.left + rect.width <= vp.scroll_x + vp.width
    }

    pub fn scroll_into_view(&mut self, node: NodeId) -> Result<(), DomError> {
        self.ensure_connected(node)?;
        let rect = self.bounding_rect(node);
        self.viewport.scroll_y = rect.top.max(0.0);
        self.viewport.scroll_x = if rect.left + rect.width > self.viewport.width {
            rect.left.max(0.0)
        } else {
            0.0
        };
        Ok(())
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
