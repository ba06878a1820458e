use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Node};
use tracing::debug;
use url::Url;

use crate::dom::error::DomError;
use crate::dom::node::NodeId;
use crate::dom::page::Page;

enum Piece<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
}

/// Parse an HTML document served from `url` into a `Page`.
///
/// Declarative shadow roots (`<template shadowrootmode="open">`) are attached
/// to their parent element, `<iframe srcdoc>` content becomes a same-origin
/// frame document, and `<iframe src>` pointing at another origin becomes an
/// inaccessible cross-origin frame.
pub fn parse_html(html: &str, url: &str) -> Result<Page, DomError> {
    let mut page = Page::new(url)?;
    let document = Html::parse_document(html);
    let root = page.document();

    convert_element(&mut page, root, document.root_element());
    page.apply_default_form_state(root);

    debug!(url, nodes = page.node_count(), "Parsed HTML page");
    Ok(page)
}

fn pieces(element: ElementRef<'_>) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    for child in element.children() {
        match child.value() {
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    out.push(Piece::Element(el));
                }
            }
            Node::Text(text) => {
                let content: &str = text;
                out.push(Piece::Text(content));
            }
            // Template contents may sit behind a fragment node.
            Node::Fragment => {
                for inner in child.children() {
                    match inner.value() {
                        Node::Element(_) => {
                            if let Some(el) = ElementRef::wrap(inner) {
                                out.push(Piece::Element(el));
                            }
                        }
                        Node::Text(text) => {
                            let content: &str = text;
                            out.push(Piece::Text(content));
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    out
}

fn convert_children(page: &mut Page, parent: NodeId, element: ElementRef<'_>) {
    for piece in pieces(element) {
        match piece {
            Piece::Element(el) => convert_element(page, parent, el),
            Piece::Text(text) => {
                page.append_text(parent, text);
            }
        }
    }
}

fn convert_element(page: &mut Page, parent: NodeId, element: ElementRef<'_>) {
    let tag = element.value().name().to_ascii_lowercase();
    let attrs: BTreeMap<String, String> = element
        .value()
        .attrs()
        .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
        .collect();

    if tag == "template" && is_open_shadow_template(&attrs) && page.is_element(parent) {
        match page.attach_shadow(parent) {
            Ok(shadow) => {
                convert_children(page, shadow, element);
                page.apply_default_form_state(shadow);
            }
            Err(err) => debug!(error = %err, "Ignoring declarative shadow root"),
        }
        return;
    }

    let node = page.append_element(parent, &tag, attrs);

    if tag == "iframe" {
        attach_frame(page, node);
        return;
    }

    convert_children(page, node, element);
}

fn is_open_shadow_template(attrs: &BTreeMap<String, String>) -> bool {
    ["shadowrootmode", "shadowroot"]
        .iter()
        .any(|name| attrs.get(*name).is_some_and(|mode| mode.eq_ignore_ascii_case("open")))
}

fn attach_frame(page: &mut Page, iframe: NodeId) {
    if let Some(srcdoc) = page.attr(iframe, "srcdoc").map(str::to_string) {
        let Ok(frame_root) = page.attach_frame_document(iframe) else {
            return;
        };
        let frame_html = Html::parse_document(&srcdoc);
        convert_element(page, frame_root, frame_html.root_element());
        page.apply_default_form_state(frame_root);
        return;
    }

    let Some(src) = page.attr(iframe, "src").map(str::to_string) else {
        return;
    };
    let Ok(resolved) = page.url().join(&src).or_else(|_| Url::parse(&src)) else {
        return;
    };
    let frame_origin = resolved.origin().ascii_serialization();
    if frame_origin != page.origin() {
        if let Err(err) = page.attach_cross_origin_frame(iframe, &frame_origin) {
            debug!(error = %err, "Could not attach cross-origin frame");
        }
    }
}
