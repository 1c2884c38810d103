//! Turns an MDX body into HTML.
//!
//! Parsing is left to the `markdown` crate. Every construct of the resulting
//! tree is mapped to an element name and rendered through the [`Registry`].

use std::collections::HashMap;

use build_html::escape_html;
use lazy_static::lazy_static;
use markdown::mdast::{self, AttributeContent, AttributeValue, Node};
use syntect::{highlighting::ThemeSet, parsing::SyntaxSet};

use crate::{
    registry::{Element, Registry},
    slug::slugify,
};

const CODE_THEME: &str = "InspiredGitHub";

lazy_static! {
    static ref SYNTAXES: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEMES: ThemeSet = ThemeSet::load_defaults();
}

pub fn parse_options() -> markdown::ParseOptions {
    markdown::ParseOptions {
        constructs: markdown::Constructs {
            code_indented: false,
            gfm_autolink_literal: true,
            gfm_footnote_definition: true,
            gfm_label_start_footnote: true,
            gfm_strikethrough: true,
            gfm_table: true,
            gfm_task_list_item: true,
            mdx_esm: true,
            mdx_expression_flow: true,
            mdx_expression_text: true,
            mdx_jsx_flow: true,
            mdx_jsx_text: true,
            html_flow: false,
            html_text: false,
            ..markdown::Constructs::default()
        },
        // ESM is only recognized with a parser hook. Module code is dropped
        // unrendered, so every block is accepted as is.
        mdx_esm_parse: Some(Box::new(|_: &str| markdown::MdxSignal::Ok)),
        ..markdown::ParseOptions::default()
    }
}

/// Renders an MDX body (without frontmatter) to HTML.
pub fn render_body(source: &str, registry: &Registry) -> anyhow::Result<String> {
    let tree = markdown::to_mdast(source, &parse_options())
        .map_err(|err| anyhow::anyhow!("Could not parse body: {}", err))?;

    let mut renderer = BodyRenderer::new(registry);
    renderer.collect_definitions(&tree);

    let mut out = String::new();
    renderer.render(&tree, &mut out)?;
    renderer.finish(&mut out);

    Ok(out)
}

struct Definition {
    url: String,
    title: Option<String>,
}

struct BodyRenderer<'a> {
    registry: &'a Registry,
    definitions: HashMap<String, Definition>,
    heading_ids: HashMap<String, usize>,
    footnote_order: Vec<String>,
    footnotes: HashMap<String, String>,
}

impl<'a> BodyRenderer<'a> {
    fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            definitions: HashMap::new(),
            heading_ids: HashMap::new(),
            footnote_order: vec![],
            footnotes: HashMap::new(),
        }
    }

    fn collect_definitions(&mut self, node: &Node) {
        if let Node::Definition(definition) = node {
            self.definitions
                .entry(definition.identifier.clone())
                .or_insert(Definition {
                    url: definition.url.clone(),
                    title: definition.title.clone(),
                });
        }

        if let Some(children) = children_of(node) {
            for child in children {
                self.collect_definitions(child);
            }
        }
    }

    fn element(&self, element: Element, children: &str, out: &mut String) {
        out.push_str(&self.registry.render(&element, children));
    }

    fn children(&mut self, children: &[Node]) -> anyhow::Result<String> {
        let mut out = String::new();
        for child in children {
            self.render(child, &mut out)?;
        }
        Ok(out)
    }

    fn simple(&mut self, name: &str, children: &[Node], out: &mut String) -> anyhow::Result<()> {
        let inner = self.children(children)?;
        self.element(Element::new(name), &inner, out);
        Ok(())
    }

    /// Unique id for a heading. Suffixes count up until unused, so a
    /// suffixed id never collides with a later heading's own slug.
    fn heading_id(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base.push_str("heading");
        }

        let mut id = base.clone();
        while self.heading_ids.contains_key(&id) {
            let count = self.heading_ids.entry(base.clone()).or_insert(0);
            *count += 1;
            id = format!("{}-{}", base, count);
        }
        self.heading_ids.insert(id.clone(), 0);

        id
    }

    fn render(&mut self, node: &Node, out: &mut String) -> anyhow::Result<()> {
        match node {
            Node::Root(root) => out.push_str(&self.children(&root.children)?),
            Node::Text(text) => out.push_str(&escape_html(&text.value)),
            Node::Paragraph(paragraph) => self.simple("p", &paragraph.children, out)?,
            Node::Emphasis(emphasis) => self.simple("em", &emphasis.children, out)?,
            Node::Strong(strong) => self.simple("strong", &strong.children, out)?,
            Node::Delete(delete) => self.simple("del", &delete.children, out)?,
            Node::Blockquote(quote) => self.simple("blockquote", &quote.children, out)?,
            Node::InlineCode(code) => {
                self.element(Element::new("code"), &escape_html(&code.value), out)
            }
            Node::Break(_) => self.element(Element::new("br"), "", out),
            Node::ThematicBreak(_) => self.element(Element::new("hr"), "", out),
            Node::Heading(heading) => {
                let id = self.heading_id(&text_content(&heading.children));
                let inner = self.children(&heading.children)?;
                let name = format!("h{}", heading.depth);
                self.element(Element::new(&name).with_attribute("id", &id), &inner, out);
            }
            Node::Link(link) => {
                let inner = self.children(&link.children)?;
                self.element(anchor(&link.url, link.title.as_deref()), &inner, out);
            }
            Node::LinkReference(reference) => {
                let inner = self.children(&reference.children)?;
                match self.definitions.get(&reference.identifier) {
                    Some(definition) => self.element(
                        anchor(&definition.url, definition.title.as_deref()),
                        &inner,
                        out,
                    ),
                    None => {
                        log::warn!(
                            "Undefined link reference [{}]",
                            reference.label.as_deref().unwrap_or(&reference.identifier)
                        );
                        out.push_str(&inner);
                    }
                }
            }
            Node::Image(image) => {
                self.element(picture(&image.url, &image.alt, image.title.as_deref()), "", out)
            }
            Node::ImageReference(reference) => match self.definitions.get(&reference.identifier) {
                Some(definition) => self.element(
                    picture(&definition.url, &reference.alt, definition.title.as_deref()),
                    "",
                    out,
                ),
                None => out.push_str(&escape_html(&reference.alt)),
            },
            Node::Definition(_) => {}
            Node::List(list) => self.list(list, out)?,
            Node::ListItem(item) => self.list_item(item, false, out)?,
            Node::Code(code) => out.push_str(&highlight(&code.value, code.lang.as_deref())?),
            Node::Html(html) => out.push_str(&html.value),
            Node::Table(table) => self.table(table, out)?,
            Node::TableRow(_) | Node::TableCell(_) => {}
            Node::FootnoteReference(reference) => self.footnote_reference(&reference.identifier, out),
            Node::FootnoteDefinition(definition) => {
                let inner = self.children(&definition.children)?;
                self.footnotes.insert(definition.identifier.clone(), inner);
            }
            Node::MdxJsxFlowElement(element) => {
                self.jsx(element.name.as_deref(), &element.attributes, &element.children, out)?
            }
            Node::MdxJsxTextElement(element) => {
                self.jsx(element.name.as_deref(), &element.attributes, &element.children, out)?
            }
            Node::MdxjsEsm(esm) => log::debug!("Dropping MDX module code: {}", esm.value),
            Node::MdxFlowExpression(expression) => {
                log::debug!("Dropping MDX expression: {{{}}}", expression.value)
            }
            Node::MdxTextExpression(expression) => {
                log::debug!("Dropping MDX expression: {{{}}}", expression.value)
            }
            Node::Yaml(_) | Node::Toml(_) => {}
            _ => log::warn!("Unhandled body construct: {:?}", node),
        }

        Ok(())
    }

    fn list(&mut self, list: &mdast::List, out: &mut String) -> anyhow::Result<()> {
        let mut inner = String::new();
        for child in &list.children {
            match child {
                Node::ListItem(item) => self.list_item(item, !list.spread, &mut inner)?,
                other => self.render(other, &mut inner)?,
            }
        }

        let element = match (list.ordered, list.start) {
            (true, Some(start)) if start != 1 => {
                Element::new("ol").with_attribute("start", &start.to_string())
            }
            (true, _) => Element::new("ol"),
            (false, _) => Element::new("ul"),
        };
        self.element(element, &inner, out);

        Ok(())
    }

    /// Paragraphs of tight lists are rendered without `<p>`.
    fn list_item(&mut self, item: &mdast::ListItem, tight: bool, out: &mut String) -> anyhow::Result<()> {
        let mut inner = String::new();

        if let Some(checked) = item.checked {
            inner.push_str(if checked {
                "<input type=\"checkbox\" disabled checked> "
            } else {
                "<input type=\"checkbox\" disabled> "
            });
        }

        for child in &item.children {
            match child {
                Node::Paragraph(paragraph) if tight => {
                    inner.push_str(&self.children(&paragraph.children)?)
                }
                other => self.render(other, &mut inner)?,
            }
        }

        let element = match item.checked {
            Some(_) => Element::new("li").with_attribute("class", "task-list-item"),
            None => Element::new("li"),
        };
        self.element(element, &inner, out);

        Ok(())
    }

    fn table(&mut self, table: &mdast::Table, out: &mut String) -> anyhow::Result<()> {
        let mut head = String::new();
        let mut body = String::new();

        for (index, row) in table.children.iter().enumerate() {
            let Node::TableRow(row) = row else { continue };
            let cell_name = if index == 0 { "th" } else { "td" };

            let mut cells = String::new();
            for (column, cell) in row.children.iter().enumerate() {
                let Node::TableCell(cell) = cell else { continue };
                let inner = self.children(&cell.children)?;

                let element = match table.align.get(column) {
                    Some(mdast::AlignKind::Left) => Element::new(cell_name).with_attribute("align", "left"),
                    Some(mdast::AlignKind::Right) => Element::new(cell_name).with_attribute("align", "right"),
                    Some(mdast::AlignKind::Center) => Element::new(cell_name).with_attribute("align", "center"),
                    _ => Element::new(cell_name),
                };
                self.element(element, &inner, &mut cells);
            }

            let target = if index == 0 { &mut head } else { &mut body };
            self.element(Element::new("tr"), &cells, target);
        }

        let mut inner = String::new();
        self.element(Element::new("thead"), &head, &mut inner);
        if !body.is_empty() {
            self.element(Element::new("tbody"), &body, &mut inner);
        }
        self.element(Element::new("table"), &inner, out);

        Ok(())
    }

    fn footnote_reference(&mut self, identifier: &str, out: &mut String) {
        let ordinal = match self.footnote_order.iter().position(|id| id == identifier) {
            Some(index) => index + 1,
            None => {
                self.footnote_order.push(identifier.to_owned());
                self.footnote_order.len()
            }
        };
        let id = slugify(identifier);

        out.push_str(&format!(
            "<sup><a href=\"#fn-{id}\" id=\"fnref-{id}\">{}</a></sup>",
            ordinal
        ));
    }

    fn jsx(
        &mut self,
        name: Option<&str>,
        attributes: &[AttributeContent],
        children: &[Node],
        out: &mut String,
    ) -> anyhow::Result<()> {
        let inner = self.children(children)?;

        // <>...</>
        let Some(name) = name else {
            out.push_str(&inner);
            return Ok(());
        };

        let mut element = Element::new(name);
        for attribute in attributes {
            match attribute {
                AttributeContent::Property(property) => match &property.value {
                    Some(AttributeValue::Literal(value)) => {
                        element = element.with_attribute(&property.name, value)
                    }
                    None => element = element.with_attribute(&property.name, ""),
                    Some(AttributeValue::Expression(expression)) => log::debug!(
                        "Dropping expression attribute {}={{{}}} on <{}>",
                        property.name,
                        expression.value,
                        name
                    ),
                },
                AttributeContent::Expression(_) => {
                    log::debug!("Dropping spread attribute on <{}>", name)
                }
            }
        }

        self.element(element, &inner, out);
        Ok(())
    }

    /// Appends the footnote section, in order of first reference.
    fn finish(&mut self, out: &mut String) {
        if self.footnote_order.is_empty() {
            return;
        }

        out.push_str("<section class=\"footnotes\"><ol>");
        for identifier in &self.footnote_order {
            let id = slugify(identifier);
            let content = self.footnotes.get(identifier).map(String::as_str).unwrap_or("");
            out.push_str(&format!(
                "<li id=\"fn-{id}\">{} <a href=\"#fnref-{id}\" class=\"footnote-back\">↩</a></li>",
                content
            ));
        }
        out.push_str("</ol></section>");
    }
}

fn anchor(url: &str, title: Option<&str>) -> Element {
    let element = Element::new("a").with_attribute("href", url);
    match title {
        Some(title) => element.with_attribute("title", title),
        None => element,
    }
}

fn picture(url: &str, alt: &str, title: Option<&str>) -> Element {
    let element = Element::new("img")
        .with_attribute("src", url)
        .with_attribute("alt", alt);
    match title {
        Some(title) => element.with_attribute("title", title),
        None => element,
    }
}

fn children_of(node: &Node) -> Option<&Vec<Node>> {
    match node {
        Node::Root(node) => Some(&node.children),
        Node::Blockquote(node) => Some(&node.children),
        Node::List(node) => Some(&node.children),
        Node::ListItem(node) => Some(&node.children),
        Node::FootnoteDefinition(node) => Some(&node.children),
        Node::MdxJsxFlowElement(node) => Some(&node.children),
        _ => None,
    }
}

fn text_content(children: &[Node]) -> String {
    let mut text = String::new();

    for child in children {
        match child {
            Node::Text(node) => text.push_str(&node.value),
            Node::InlineCode(node) => text.push_str(&node.value),
            Node::Emphasis(node) => text.push_str(&text_content(&node.children)),
            Node::Strong(node) => text.push_str(&text_content(&node.children)),
            Node::Delete(node) => text.push_str(&text_content(&node.children)),
            Node::Link(node) => text.push_str(&text_content(&node.children)),
            Node::LinkReference(node) => text.push_str(&text_content(&node.children)),
            Node::MdxJsxTextElement(node) => text.push_str(&text_content(&node.children)),
            _ => {}
        }
    }

    text
}

fn highlight(code: &str, lang: Option<&str>) -> anyhow::Result<String> {
    let syntax = lang
        .and_then(|lang| SYNTAXES.find_syntax_by_token(lang))
        .unwrap_or_else(|| SYNTAXES.find_syntax_plain_text());

    match THEMES.themes.get(CODE_THEME) {
        Some(theme) => Ok(syntect::html::highlighted_html_for_string(
            code, &SYNTAXES, syntax, theme,
        )?),
        None => Ok(format!("<pre><code>{}</code></pre>", escape_html(code))),
    }
}

#[cfg(test)]
mod test {
    use crate::{body::render_body, registry::Registry};

    fn render(source: &str) -> String {
        render_body(source, &Registry::default()).unwrap()
    }

    #[test]
    fn paragraph_and_inline() {
        assert_eq!(
            render("Hola *mundo* y **React** con `<div>`"),
            "<p>Hola <em>mundo</em> y <strong>React</strong> con <code>&lt;div&gt;</code></p>"
        );
    }

    #[test]
    fn headings_get_ids() {
        let html = render("## ¿Qué es JSX?\n\n## ¿Qué es JSX?");
        assert!(html.contains(r##"<h2 id="que-es-jsx"><a class="anchor" href="#que-es-jsx""##));
        assert!(html.contains(r#"<h2 id="que-es-jsx-1">"#));
    }

    #[test]
    fn heading_ids_never_collide() {
        let html = render("## Foo 1\n\n## Foo\n\n## Foo");
        assert_eq!(html.matches(r#"id="foo-1""#).count(), 1);
        assert!(html.contains(r#"<h2 id="foo">"#));
        assert!(html.contains(r#"<h2 id="foo-2">"#));
    }

    #[test]
    fn links_and_images_use_registry() {
        let html = render("[ZEIT](https://zeit.co) ![Logo](/static/logo.png)");
        assert!(html.contains(r#"<a href="https://zeit.co" class="link">ZEIT</a>"#));
        assert!(html.contains(r#"<img src="/static/logo.png" alt="Logo" class="image">"#));
    }

    #[test]
    fn reference_links() {
        let html = render("[docs][react]\n\n[react]: https://reactjs.org \"React\"");
        assert!(html.contains(r#"<a href="https://reactjs.org" title="React" class="link">docs</a>"#));
    }

    #[test]
    fn jsx_figure() {
        let html = render(
            "<figure>\n  <img src=\"/static/a.png\" alt=\"A\" />\n  <figcaption>Caption</figcaption>\n</figure>",
        );
        assert!(html.starts_with(r#"<figure class="figure">"#));
        assert!(html.contains(r#"<img src="/static/a.png" alt="A" class="image">"#));
        assert!(html.contains(r#"<figcaption class="caption">"#));
        assert!(html.contains("Caption"));
        assert!(html.ends_with("</figure>"));
    }

    #[test]
    fn unmapped_jsx_falls_back() {
        let html = render("<aside data-kind=\"note\">\n\nCareful\n\n</aside>");
        assert_eq!(html, r#"<aside data-kind="note"><p>Careful</p></aside>"#);
    }

    #[test]
    fn esm_dropped() {
        let html = render("import Chart from './chart'\n\nText");
        assert_eq!(html, "<p>Text</p>");

        let html = render("export const meta = {a: 1}\n\n# Title");
        assert!(!html.contains("export"));
        assert!(html.contains("Title</h1>"));
    }

    #[test]
    fn tight_and_task_lists() {
        assert_eq!(render("- a\n- b"), "<ul><li>a</li><li>b</li></ul>");
        assert_eq!(render("3. a\n4. b"), r#"<ol start="3"><li>a</li><li>b</li></ol>"#);
        assert!(render("- [x] done").contains(r#"<li class="task-list-item"><input type="checkbox" disabled checked> done</li>"#));
    }

    #[test]
    fn code_highlighted() {
        let html = render("```rust\nfn main() {}\n```");
        assert!(html.starts_with("<pre"));
        assert!(html.contains("main"));
        assert!(!html.contains("```"));
    }

    #[test]
    fn footnotes() {
        let html = render("Claim[^1].\n\n[^1]: Source.");
        assert!(html.contains(r##"<sup><a href="#fn-1" id="fnref-1">1</a></sup>"##));
        assert!(html.contains(r#"<section class="footnotes"><ol><li id="fn-1"><p>Source.</p>"#));
    }

    #[test]
    fn table() {
        let html = render("| a | b |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            html,
            r#"<table><thead><tr><th align="left">a</th><th align="right">b</th></tr></thead><tbody><tr><td align="left">1</td><td align="right">2</td></tr></tbody></table>"#
        );
    }
}
