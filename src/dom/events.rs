use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::dom::error::DomError;
use crate::dom::node::{NodeId, NodeKind};
use crate::dom::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Focus,
    Blur,
    Input,
    Change,
    Click,
    MouseDown,
    MouseUp,
    KeyDown,
    KeyUp,
    Submit,
}

impl EventType {
    pub fn name(self) -> &'static str {
        match self {
            EventType::Focus => "focus",
            EventType::Blur => "blur",
            EventType::Input => "input",
            EventType::Change => "change",
            EventType::Click => "click",
            EventType::MouseDown => "mousedown",
            EventType::MouseUp => "mouseup",
            EventType::KeyDown => "keydown",
            EventType::KeyUp => "keyup",
            EventType::Submit => "submit",
        }
    }

    /// Native `focus`/`blur` do not bubble; the engine's synthetic copies do.
    pub fn bubbles_natively(self) -> bool {
        !matches!(self, EventType::Focus | EventType::Blur)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dispatched event. Listeners only get a shared reference, so the
/// cancellation flags use interior mutability.
#[derive(Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: NodeId,
    pub bubbles: bool,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    pub fn new(event_type: EventType, target: NodeId, bubbles: bool) -> Self {
        Self {
            event_type,
            target,
            bubbles,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }
}

pub type Listener = Rc<dyn Fn(&mut Page, &Event)>;

/// Page-installed replacement for an element's `value` setter.
pub type ValueInterceptor = Rc<dyn Fn(&mut Page, NodeId, &str)>;

pub(crate) struct ListenerEntry {
    pub(crate) target: NodeId,
    pub(crate) event_type: EventType,
    pub(crate) listener: Listener,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub target: NodeId,
    pub event_type: EventType,
    pub bubbles: bool,
}

impl Page {
    pub fn add_event_listener(
        &mut self,
        target: NodeId,
        event_type: EventType,
        listener: impl Fn(&mut Page, &Event) + 'static,
    ) {
        self.listeners.push(ListenerEntry {
            target,
            event_type,
            listener: Rc::new(listener),
        });
    }

    pub fn intercept_value(
        &mut self,
        target: NodeId,
        interceptor: impl Fn(&mut Page, NodeId, &str) + 'static,
    ) {
        self.value_interceptors.insert(target, Rc::new(interceptor));
    }

    /// Target, then its ancestors, crossing shadow boundaries to the host.
    /// Frame documents are a separate event scope.
    fn event_path(&self, target: NodeId) -> Vec<NodeId> {
        let mut path = vec![target];
        let mut current = target;
        loop {
            let next = match self.parent(current) {
                Some(p) => Some(p),
                None => match self.node(current).map(|n| n.kind()) {
                    Some(NodeKind::ShadowRoot { host }) => Some(*host),
                    _ => None,
                },
            };
            match next {
                Some(n) => {
                    path.push(n);
                    current = n;
                }
                None => break,
            }
        }
        path
    }

    /// Dispatch a synthetic event and run matching listeners synchronously.
    /// Returns `false` when a listener called `prevent_default`.
    pub fn dispatch_event(
        &mut self,
        target: NodeId,
        event_type: EventType,
        bubbles: bool,
    ) -> Result<bool, DomError> {
        self.ensure_connected(target)?;

        self.event_log.push(EventRecord {
            target,
            event_type,
            bubbles,
        });

        let event = Event::new(event_type, target, bubbles);
        let path = if bubbles {
            self.event_path(target)
        } else {
            vec![target]
        };

        for node in path {
            let listeners: Vec<Listener> = self
                .listeners
                .iter()
                .filter(|l| l.target == node && l.event_type == event_type)
                .map(|l| Rc::clone(&l.listener))
                .collect();

            for listener in listeners {
                listener(self, &event);
            }

            if event.propagation_stopped.get() {
                break;
            }
        }

        Ok(!event.default_prevented())
    }

    /// Simulated user click including the browser's activation behavior.
    /// Returns `false` when the click was cancelled by a listener.
    pub fn click(&mut self, target: NodeId) -> Result<bool, DomError> {
        self.ensure_connected(target)?;
        if self.is_disabled(target) {
            return Ok(false);
        }

        let input_type = self.element(target).and_then(|el| el.input_type());
        let before = self.checked(target);

        // Checkable inputs flip state before listeners run, like browsers do.
        match input_type.as_deref() {
            Some("checkbox") => self.set_checked(target, !before)?,
            Some("radio") => {
                if !before {
                    self.set_checked(target, true)?;
                }
            }
            _ => {}
        }

        let not_cancelled = self.dispatch_event(target, EventType::Click, true)?;

        if matches!(input_type.as_deref(), Some("checkbox") | Some("radio")) {
            if !not_cancelled {
                if self.is_connected(target) {
                    self.set_checked(target, before)?;
                }
                return Ok(false);
            }
            if self.is_connected(target) && self.checked(target) != before {
                self.dispatch_event(target, EventType::Input, true)?;
                self.dispatch_event(target, EventType::Change, true)?;
            }
            return Ok(true);
        }

        if !not_cancelled || !self.is_connected(target) {
            return Ok(not_cancelled);
        }

        let tag = self.tag(target).map(str::to_string);
        match tag.as_deref() {
            Some("label") => {
                if let Some(control) = self.labeled_control(target) {
                    self.click(control)?;
                }
            }
            Some("button") => {
                let kind = self.attr(target, "type").unwrap_or("submit").to_ascii_lowercase();
                if kind == "submit" {
                    self.submit_owner(target)?;
                }
            }
            Some("input") if input_type.as_deref() == Some("submit") => {
                self.submit_owner(target)?;
            }
            _ => {}
        }

        Ok(true)
    }

    fn submit_owner(&mut self, control: NodeId) -> Result<(), DomError> {
        if let Some(form) = self.form_owner(control) {
            self.dispatch_event(form, EventType::Submit, true)?;
        }
        Ok(())
    }

    /// The control a `<label>` activates: its `for` target in the same root,
    /// else its first labelable descendant.
    pub fn labeled_control(&self, label: NodeId) -> Option<NodeId> {
        if let Some(id) = self.attr(label, "for") {
            return self.get_element_by_id(self.root_of(label), id);
        }
        self.descendant_elements(label).into_iter().find(|n| {
            matches!(self.tag(*n), Some("input" | "select" | "textarea" | "button"))
                && self.element(*n).and_then(|el| el.input_type()).as_deref() != Some("hidden")
        })
    }

    pub fn event_log(&self) -> &[EventRecord] {
        &self.event_log
    }

    pub fn events_for(&self, target: NodeId) -> Vec<EventType> {
        self.event_log
            .iter()
            .filter(|r| r.target == target)
            .map(|r| r.event_type)
            .collect()
    }

    pub fn clear_event_log(&mut self) {
        self.event_log.clear();
    }
}
