use crate::dom::error::DomError;
use crate::dom::node::NodeId;
use crate::dom::page::Page;

// ============================================================================
// Selector: the CSS subset used by platform step containers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
    Prefix(String),
    Suffix(String),
    Word(String),
}

#[derive(Debug, Clone, PartialEq)]
struct AttrTest {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Combinator {
    Descendant,
    Child,
}

/// One complex selector, stored right-to-left: `parts[0]` is the subject.
#[derive(Debug, Clone, PartialEq)]
struct Complex {
    parts: Vec<(Compound, Option<Combinator>)>,
}

/// A parsed selector list (`a, b > c, .d[e]`).
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    alternatives: Vec<Complex>,
    source: String,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let alternatives = source
            .split(',')
            .map(|part| parse_complex(part.trim(), source))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            alternatives,
            source: source.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, page: &Page, node: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(page, node))
    }
}

fn parse_complex(text: &str, full: &str) -> Result<Complex, DomError> {
    if text.is_empty() {
        return Err(DomError::InvalidSelector(full.to_string()));
    }

    let mut parts: Vec<(Compound, Option<Combinator>)> = Vec::new();
    let mut pending: Option<Combinator> = None;
    let spaced = text.replace('>', " > ");
    for token in spaced.split_whitespace() {
        if token == ">" {
            if parts.is_empty() {
                return Err(DomError::InvalidSelector(full.to_string()));
            }
            pending = Some(Combinator::Child);
            continue;
        }
        let compound = parse_compound(token).ok_or_else(|| DomError::InvalidSelector(full.to_string()))?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push((compound, combinator));
    }
    if pending.is_some() || parts.is_empty() {
        return Err(DomError::InvalidSelector(full.to_string()));
    }

    // Subject first; each entry keeps the combinator to the compound on its left.
    parts.reverse();
    Ok(Complex { parts })
}

fn parse_compound(token: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let chars: Vec<char> = token.chars().collect();
    let mut i = 0;

    let read_ident = |start: usize| -> (String, usize) {
        let mut end = start;
        while end < chars.len() && (chars[end].is_alphanumeric() || matches!(chars[end], '-' | '_')) {
            end += 1;
        }
        (chars[start..end].iter().collect(), end)
    };

    if i < chars.len() && chars[i] == '*' {
        i += 1;
    } else if i < chars.len() && chars[i].is_alphabetic() {
        let (tag, end) = read_ident(i);
        compound.tag = Some(tag.to_ascii_lowercase());
        i = end;
    }

    while i < chars.len() {
        match chars[i] {
            '#' => {
                let (id, end) = read_ident(i + 1);
                if id.is_empty() {
                    return None;
                }
                compound.id = Some(id);
                i = end;
            }
            '.' => {
                let (class, end) = read_ident(i + 1);
                if class.is_empty() {
                    return None;
                }
                compound.classes.push(class);
                i = end;
            }
            '[' => {
                let close = chars[i..].iter().position(|c| *c == ']')? + i;
                let body: String = chars[i + 1..close].iter().collect();
                compound.attrs.push(parse_attr(&body)?);
                i = close + 1;
            }
            _ => return None,
        }
    }
    Some(compound)
}

fn parse_attr(body: &str) -> Option<AttrTest> {
    let unquote = |v: &str| v.trim().trim_matches(|c| c == '"' || c == '\'').to_string();

    for (symbol, build) in [
        ("*=", AttrOp::Contains as fn(String) -> AttrOp),
        ("^=", AttrOp::Prefix),
        ("$=", AttrOp::Suffix),
        ("~=", AttrOp::Word),
    ] {
        if let Some((name, value)) = body.split_once(symbol) {
            return Some(AttrTest {
                name: name.trim().to_ascii_lowercase(),
                op: build(unquote(value)),
            });
        }
    }
    if let Some((name, value)) = body.split_once('=') {
        return Some(AttrTest {
            name: name.trim().to_ascii_lowercase(),
            op: AttrOp::Equals(unquote(value)),
        });
    }
    let name = body.trim().to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }
    Some(AttrTest {
        name,
        op: AttrOp::Exists,
    })
}

impl Compound {
    fn matches(&self, page: &Page, node: NodeId) -> bool {
        let Some(el) = page.element(node) else {
            return false;
        };
        if self.tag.as_ref().is_some_and(|t| *t != el.tag) {
            return false;
        }
        if self.id.as_deref().is_some_and(|id| el.attr("id") != Some(id)) {
            return false;
        }
        let classes = el.classes();
        if !self.classes.iter().all(|c| classes.contains(c)) {
            return false;
        }
        self.attrs.iter().all(|test| {
            let Some(actual) = el.attr(&test.name) else {
                return false;
            };
            match &test.op {
                AttrOp::Exists => true,
                AttrOp::Equals(v) => actual == v,
                AttrOp::Contains(v) => actual.contains(v.as_str()),
                AttrOp::Prefix(v) => actual.starts_with(v.as_str()),
                AttrOp::Suffix(v) => actual.ends_with(v.as_str()),
                AttrOp::Word(v) => actual.split_whitespace().any(|w| w == v),
            }
        })
    }
}

impl Complex {
    fn matches(&self, page: &Page, node: NodeId) -> bool {
        self.match_from(page, node, 0)
    }

    fn match_from(&self, page: &Page, node: NodeId, index: usize) -> bool {
        let (compound, link) = &self.parts[index];
        if !compound.matches(page, node) {
            return false;
        }
        let Some(link) = link else {
            return true;
        };
        match link {
            Combinator::Child => page
                .parent_element(node)
                .is_some_and(|p| self.match_from(page, p, index + 1)),
            Combinator::Descendant => {
                let mut current = page.parent_element(node);
                while let Some(ancestor) = current {
                    if self.match_from(page, ancestor, index + 1) {
                        return true;
                    }
                    current = page.parent_element(ancestor);
                }
                false
            }
        }
    }
}
