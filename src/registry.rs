//! Element-name to renderer mapping used for essay bodies.
//!
//! The table is fixed at compile time. Names without an entry render
//! through [`default_element`].

use build_html::escape_html;

/// An element with its attributes, as handed over by the body walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            attributes: vec![],
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.push((key.to_owned(), value.to_owned()));
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Renders an element around its already-rendered children.
pub type Renderer = fn(&Element, &str) -> String;

pub const COMPONENTS: &[(&str, Renderer)] = &[
    ("img", image),
    ("figure", figure),
    ("figcaption", caption),
    ("h1", heading),
    ("h2", heading),
    ("h3", heading),
    ("h4", heading),
    ("h5", heading),
    ("h6", heading),
    ("a", link),
];

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Clone, Copy, Debug)]
pub struct Registry {
    components: &'static [(&'static str, Renderer)],
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(COMPONENTS)
    }
}

impl Registry {
    pub const fn new(components: &'static [(&'static str, Renderer)]) -> Self {
        Self { components }
    }

    pub fn get(&self, name: &str) -> Option<Renderer> {
        self.components
            .iter()
            .find(|(component, _)| *component == name)
            .map(|(_, renderer)| *renderer)
    }

    pub fn render(&self, element: &Element, children: &str) -> String {
        self.get(&element.name).unwrap_or(default_element)(element, children)
    }
}

fn attributes_html(attributes: &[(String, String)], class: Option<&str>) -> String {
    let mut out = String::new();
    let mut class_written = false;

    for (key, value) in attributes {
        if key == "class" || key == "className" {
            let merged = match class {
                Some(class) => format!("{} {}", class, value),
                None => value.to_owned(),
            };
            out.push_str(&format!(" class=\"{}\"", escape_html(&merged)));
            class_written = true;
        } else {
            out.push_str(&format!(" {}=\"{}\"", key, escape_html(value)));
        }
    }

    if let (false, Some(class)) = (class_written, class) {
        out.push_str(&format!(" class=\"{}\"", class));
    }

    out
}

fn wrap(element: &Element, children: &str, class: Option<&str>) -> String {
    let attributes = attributes_html(&element.attributes, class);

    if VOID.contains(&element.name.as_str()) {
        format!("<{}{}>", element.name, attributes)
    } else {
        format!("<{name}{}>{}</{name}>", attributes, children, name = element.name)
    }
}

/// Plain rendering for names the registry does not map.
pub fn default_element(element: &Element, children: &str) -> String {
    wrap(element, children, None)
}

fn image(element: &Element, _children: &str) -> String {
    wrap(element, "", Some("image"))
}

fn figure(element: &Element, children: &str) -> String {
    wrap(element, children, Some("figure"))
}

fn caption(element: &Element, children: &str) -> String {
    wrap(element, children, Some("caption"))
}

fn heading(element: &Element, children: &str) -> String {
    match element.attribute("id") {
        Some(id) => {
            let anchor = format!(
                "<a class=\"anchor\" href=\"#{}\" aria-hidden=\"true\"></a>",
                escape_html(id)
            );
            wrap(element, &format!("{}{}", anchor, children), None)
        }
        None => wrap(element, children, None),
    }
}

fn link(element: &Element, children: &str) -> String {
    wrap(element, children, Some("link"))
}
