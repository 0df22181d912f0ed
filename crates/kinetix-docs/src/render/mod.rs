//! Display tree for documentation pages
//!
//! Pages are turned into a flat sequence of [`DisplayNode`]s: headers,
//! rich text, highlighted code blocks, fixed-column tables and method
//! detail boxes. The HTML emitter in [`html`] is one consumer; anything
//! that can draw these nodes can present the documentation.

pub mod html;

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::anchor::Anchor;
use crate::content::{Badge, MethodRecord, PageRecord, Status};
use crate::highlight::Highlighter;
use crate::registry::Registry;
use crate::sidebar::{METHODS_LABEL, PROPERTIES_LABEL};

pub use html::{HtmlRenderer, SidebarLinks};

/// Table layouts with their fixed column titles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Methods,
    Properties,
    Signals,
    Constants,
}

impl TableKind {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Methods => &["Return", "Name", "Parameters", "Description"],
            TableKind::Properties => &["Type", "Name", "Default", "Description"],
            TableKind::Signals => &["Name", "Parameters", "Description"],
            TableKind::Constants => &["Name", "Value", "Description"],
        }
    }
}

/// Content of one table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Plain text, escaped on output
    Text { class: &'static str, text: String },
    /// Member name linking to its detail entry
    Link { anchor: Anchor, text: String },
    /// Member name that is itself a navigation target
    Target { anchor: Anchor, text: String },
    /// Rich text description followed by status badges
    Description { html: String, badges: Vec<Badge> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub kind: TableKind,
    pub rows: Vec<Vec<Cell>>,
}

/// Expanded entry for one method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDetail {
    pub anchor: Anchor,
    pub ret: String,
    pub name: String,
    pub params: String,
    pub badges: Vec<Badge>,
    pub desc: String,
    pub details: Option<String>,
    /// Highlighted example markup, one per snippet
    pub examples: Vec<String>,
}

/// One element of a rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNode {
    PageHeader {
        anchor: Anchor,
        crumb: String,
        title: String,
        inherits: Option<String>,
    },
    /// Trusted rich text, `class` names the container
    RichText { class: &'static str, html: String },
    /// Highlighted code with an optional heading
    CodeBlock {
        title: Option<String>,
        markup: String,
    },
    /// Section heading, observed by the scroll-spy when anchored
    Heading {
        anchor: Option<Anchor>,
        title: String,
    },
    Table(Table),
    Rule,
    MethodDetail(MethodDetail),
}

/// A page's nodes in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub id: String,
    pub nodes: Vec<DisplayNode>,
}

impl PageView {
    /// Anchors of every heading the scroll-spy observes on this page
    pub fn observed_anchors(&self) -> impl Iterator<Item = &Anchor> {
        self.nodes.iter().filter_map(|node| match node {
            DisplayNode::PageHeader { anchor, .. } => Some(anchor),
            DisplayNode::Heading {
                anchor: Some(anchor),
                ..
            } => Some(anchor),
            _ => None,
        })
    }
}

/// Builds page views, highlighting code against a symbol index
#[derive(Debug, Clone, Copy)]
pub struct PageRenderer<'a> {
    highlighter: Highlighter<'a>,
}

impl<'a> PageRenderer<'a> {
    pub fn new(highlighter: Highlighter<'a>) -> Self {
        Self { highlighter }
    }

    /// Every page of the registry in canonical order
    pub fn render_all(&self, registry: &Registry) -> Vec<PageView> {
        registry
            .sorted_keys()
            .into_iter()
            .filter_map(|id| registry.get(id).map(|page| self.render_page(id, page)))
            .collect()
    }

    pub fn render_page(&self, id: &str, page: &PageRecord) -> PageView {
        let mut nodes = vec![DisplayNode::PageHeader {
            anchor: Anchor::page(id),
            crumb: page.category.to_string(),
            title: page.title.clone(),
            inherits: page.inherits.clone(),
        }];

        if !page.description.is_empty() {
            nodes.push(DisplayNode::RichText {
                class: "description",
                html: self.highlight_code_blocks(&page.description),
            });
        }

        if let Some(example) = &page.example {
            nodes.push(DisplayNode::CodeBlock {
                title: Some("Example".to_string()),
                markup: self.highlighter.highlight(example.trim()),
            });
        }

        for group in &page.groups {
            nodes.push(DisplayNode::Heading {
                anchor: Some(Anchor::section(id, &group.title)),
                title: group.title.clone(),
            });
            if let Some(description) = &group.description {
                nodes.push(DisplayNode::RichText {
                    class: "group-description",
                    html: description.clone(),
                });
            }
            if !group.methods.is_empty() {
                nodes.push(DisplayNode::Table(method_table(id, &group.methods)));
            }
        }

        if !page.methods.is_empty() {
            nodes.push(heading(id, METHODS_LABEL));
            nodes.push(DisplayNode::Table(method_table(id, &page.methods)));
        }

        if !page.properties.is_empty() {
            nodes.push(heading(id, PROPERTIES_LABEL));
            let rows = page
                .properties
                .iter()
                .map(|p| {
                    vec![
                        Cell::Text {
                            class: "type",
                            text: p.ty.clone(),
                        },
                        Cell::Target {
                            anchor: Anchor::member(id, &p.name),
                            text: p.name.clone(),
                        },
                        Cell::Text {
                            class: "code",
                            text: p.default.clone(),
                        },
                        description(id, &p.name, &p.desc, &p.status),
                    ]
                })
                .collect();
            nodes.push(DisplayNode::Table(Table {
                kind: TableKind::Properties,
                rows,
            }));
        }

        if !page.signals.is_empty() {
            nodes.push(heading(id, "Signals"));
            let rows = page
                .signals
                .iter()
                .map(|s| {
                    vec![
                        Cell::Target {
                            anchor: Anchor::member(id, &s.name),
                            text: s.name.clone(),
                        },
                        Cell::Text {
                            class: "code",
                            text: s.params.clone(),
                        },
                        description(id, &s.name, &s.desc, &s.status),
                    ]
                })
                .collect();
            nodes.push(DisplayNode::Table(Table {
                kind: TableKind::Signals,
                rows,
            }));
        }

        if !page.constants.is_empty() {
            nodes.push(heading(id, "Constants"));
            let rows = page
                .constants
                .iter()
                .map(|c| {
                    vec![
                        Cell::Target {
                            anchor: Anchor::member(id, &c.name),
                            text: c.name.clone(),
                        },
                        Cell::Text {
                            class: "code",
                            text: c.value.clone(),
                        },
                        Cell::Description {
                            html: c.desc.clone(),
                            badges: Vec::new(),
                        },
                    ]
                })
                .collect();
            nodes.push(DisplayNode::Table(Table {
                kind: TableKind::Constants,
                rows,
            }));
        }

        let mut methods = page.all_methods().peekable();
        if methods.peek().is_some() {
            nodes.push(DisplayNode::Rule);
            nodes.push(DisplayNode::Heading {
                anchor: None,
                title: "Method Details".to_string(),
            });
            for method in methods {
                nodes.push(DisplayNode::MethodDetail(self.method_detail(id, method)));
            }
        }

        PageView {
            id: id.to_string(),
            nodes,
        }
    }

    fn method_detail(&self, id: &str, method: &MethodRecord) -> MethodDetail {
        MethodDetail {
            anchor: Anchor::member(id, &method.name),
            ret: method.ret.clone(),
            name: method.name.clone(),
            params: method.params.clone(),
            badges: badges(id, &method.name, &method.status),
            desc: method.desc.clone(),
            details: method.details.clone(),
            examples: method
                .example
                .iter()
                .map(|example| self.highlighter.highlight(example))
                .collect(),
        }
    }

    /// Re-highlight `<pre><code>` blocks embedded in rich text
    ///
    /// The block content is reduced to its text (tags dropped, entities
    /// decoded) before highlighting, so links are added against the index.
    pub fn highlight_code_blocks(&self, rich_text: &str) -> String {
        code_block_pattern()
            .replace_all(rich_text, |caps: &Captures<'_>| {
                let code = html::unescape_html(&strip_tags(&caps["code"]));
                format!(
                    "{}{}{}",
                    &caps["open"],
                    self.highlighter.highlight(&code),
                    &caps["close"]
                )
            })
            .into_owned()
    }
}

fn code_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)(?P<open><pre[^>]*>\s*<code[^>]*>)(?P<code>.*?)(?P<close></code>\s*</pre>)")
            .expect("code block pattern is a valid regex")
    })
}

fn strip_tags(html: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is a valid regex"))
        .replace_all(html, "")
        .into_owned()
}

fn heading(id: &str, title: &str) -> DisplayNode {
    DisplayNode::Heading {
        anchor: Some(Anchor::section(id, title)),
        title: title.to_string(),
    }
}

fn method_table(id: &str, methods: &[MethodRecord]) -> Table {
    let rows = methods
        .iter()
        .map(|m| {
            vec![
                Cell::Text {
                    class: "type",
                    text: m.ret.clone(),
                },
                Cell::Link {
                    anchor: Anchor::member(id, &m.name),
                    text: m.name.clone(),
                },
                Cell::Text {
                    class: "code",
                    text: m.params.clone(),
                },
                description(id, &m.name, &m.desc, &m.status),
            ]
        })
        .collect();
    Table {
        kind: TableKind::Methods,
        rows,
    }
}

fn description(page: &str, member: &str, desc: &str, status: &Status) -> Cell {
    Cell::Description {
        html: desc.to_string(),
        badges: badges(page, member, status),
    }
}

fn badges(page: &str, member: &str, status: &Status) -> Vec<Badge> {
    if status.is_contradictory() {
        tracing::warn!(page, member, ?status, "contradictory status markers, rendering all");
    }
    status.badges()
}
