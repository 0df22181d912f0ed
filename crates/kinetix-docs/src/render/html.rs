//! HTML emission for the display tree, the sidebar and the changelog

use std::fmt::{self, Write};

use super::{Cell, DisplayNode, MethodDetail, PageView, Table};
use crate::anchor::Anchor;
use crate::changelog::Changelog;
use crate::content::Badge;
use crate::sidebar::{CategoryNode, PageEntry, SidebarTree};

/// Escape text for use in element content and attribute values
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Decode the entities produced by [`escape_html`] plus `&#39;`
pub fn unescape_html(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Run a writer against a fresh string
fn collect(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut output = String::new();
    // Writing into a String cannot fail
    let _ = write(&mut output);
    output
}

/// Where sidebar links point
///
/// A single-page view links in-page fragments. A multi-file site prefixes
/// documentation anchors with the file holding them and sends the changelog
/// link to its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarLinks<'a> {
    /// Prepended to every page and section href, e.g. `index.html`
    pub page_base: &'a str,
    /// Target of the changelog link
    pub changelog_href: &'a str,
}

impl SidebarLinks<'static> {
    /// Every target lives in the current document
    pub const IN_PAGE: SidebarLinks<'static> = SidebarLinks {
        page_base: "",
        changelog_href: "#changelog",
    };
}

impl SidebarLinks<'_> {
    fn anchor_href(&self, anchor: &Anchor) -> String {
        format!("{}{}", self.page_base, anchor.href())
    }
}

/// Renders documentation views to HTML
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// A whole page view wrapped in its section
    pub fn page(view: &PageView) -> String {
        collect(|output| Self::write_page(output, view))
    }

    /// The documentation flow: every page followed by a divider
    pub fn pages(views: &[PageView]) -> String {
        collect(|output| {
            for view in views {
                Self::write_page(output, view)?;
            }
            Ok(())
        })
    }

    /// The changelog view
    pub fn changelog(changelog: &Changelog) -> String {
        collect(|output| Self::write_changelog(output, changelog))
    }

    /// The navigation tree with its current presentation flags
    pub fn sidebar(tree: &SidebarTree) -> String {
        Self::sidebar_with_links(tree, SidebarLinks::IN_PAGE)
    }

    /// The navigation tree with links resolved against `links`
    pub fn sidebar_with_links(tree: &SidebarTree, links: SidebarLinks<'_>) -> String {
        collect(|output| Self::write_sidebar(output, tree, links))
    }

    /// A standalone document around prepared sidebar and content markup
    pub fn document(title: &str, sidebar: &str, content: &str) -> String {
        collect(|output| {
            writeln!(output, "<!DOCTYPE html>")?;
            writeln!(output, "<html lang=\"en\">")?;
            writeln!(output, "<head>")?;
            writeln!(output, "  <meta charset=\"UTF-8\">")?;
            writeln!(
                output,
                "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
            )?;
            writeln!(output, "  <title>{}</title>", escape_html(title))?;
            Self::write_styles(output)?;
            writeln!(output, "</head>")?;
            writeln!(output, "<body>")?;
            writeln!(output, "<nav class=\"sidebar\">")?;
            writeln!(output, "  <div class=\"sidebar-header\">")?;
            writeln!(output, "    <h2>{}</h2>", escape_html(title))?;
            writeln!(output, "  </div>")?;
            output.push_str(sidebar);
            writeln!(output, "</nav>")?;
            writeln!(output, "<main id=\"content\" class=\"content\">")?;
            output.push_str(content);
            writeln!(output, "</main>")?;
            writeln!(output, "</body>")?;
            writeln!(output, "</html>")
        })
    }

    fn write_page(output: &mut String, view: &PageView) -> fmt::Result {
        writeln!(output, "<section class=\"doc-section\">")?;
        for node in &view.nodes {
            Self::write_node(output, node)?;
        }
        writeln!(output, "</section>")?;
        writeln!(output, "<div class=\"section-divider\"></div>")
    }

    fn write_node(output: &mut String, node: &DisplayNode) -> fmt::Result {
        match node {
            DisplayNode::PageHeader {
                anchor,
                crumb,
                title,
                inherits,
            } => {
                writeln!(output, "<div class=\"page-header\" id=\"{}\">", escape_html(&anchor.to_string()))?;
                writeln!(output, "  <div class=\"crumb\">{}</div>", escape_html(crumb))?;
                writeln!(output, "  <h1>{}</h1>", escape_html(title))?;
                if let Some(parent) = inherits {
                    writeln!(
                        output,
                        "  <div class=\"inherits\">Inherits: <a href=\"#{}\">{}</a></div>",
                        escape_html(&parent.to_lowercase()),
                        escape_html(parent)
                    )?;
                }
                writeln!(output, "</div>")
            }
            DisplayNode::RichText { class, html } => {
                writeln!(output, "<div class=\"{class}\">{html}</div>")
            }
            DisplayNode::CodeBlock { title, markup } => {
                if let Some(title) = title {
                    writeln!(output, "<h3>{}</h3>", escape_html(title))?;
                }
                writeln!(output, "<pre><code>{markup}</code></pre>")
            }
            DisplayNode::Heading { anchor, title } => match anchor {
                Some(anchor) => writeln!(
                    output,
                    "<h2 id=\"{}\">{}</h2>",
                    escape_html(&anchor.to_string()),
                    escape_html(title)
                ),
                None => writeln!(output, "<h2>{}</h2>", escape_html(title)),
            },
            DisplayNode::Table(table) => Self::write_table(output, table),
            DisplayNode::Rule => writeln!(output, "<hr>"),
            DisplayNode::MethodDetail(detail) => Self::write_method_detail(output, detail),
        }
    }

    fn write_table(output: &mut String, table: &Table) -> fmt::Result {
        writeln!(output, "<table class=\"api-table\">")?;
        write!(output, "  <thead><tr>")?;
        for column in table.kind.columns() {
            write!(output, "<th>{column}</th>")?;
        }
        writeln!(output, "</tr></thead>")?;
        writeln!(output, "  <tbody>")?;
        for row in &table.rows {
            write!(output, "    <tr>")?;
            for cell in row {
                Self::write_cell(output, cell)?;
            }
            writeln!(output, "</tr>")?;
        }
        writeln!(output, "  </tbody>")?;
        writeln!(output, "</table>")
    }

    fn write_cell(output: &mut String, cell: &Cell) -> fmt::Result {
        match cell {
            Cell::Text { class, text } => {
                write!(output, "<td class=\"{class}\">{}</td>", escape_html(text))
            }
            Cell::Link { anchor, text } => write!(
                output,
                "<td class=\"method-link\"><a href=\"{}\">{}</a></td>",
                escape_html(&anchor.href()),
                escape_html(text)
            ),
            Cell::Target { anchor, text } => write!(
                output,
                "<td class=\"prop-name\"><span id=\"{}\">{}</span></td>",
                escape_html(&anchor.to_string()),
                escape_html(text)
            ),
            Cell::Description { html, badges } => {
                write!(output, "<td>{html}")?;
                if !badges.is_empty() {
                    write!(output, "<div class=\"version-info-footer\">")?;
                    Self::write_badges(output, badges)?;
                    write!(output, "</div>")?;
                }
                write!(output, "</td>")
            }
        }
    }

    fn write_badges(output: &mut String, badges: &[Badge]) -> fmt::Result {
        for (i, badge) in badges.iter().enumerate() {
            if i > 0 {
                output.push(' ');
            }
            write!(
                output,
                "<span class=\"{}\">{}</span>",
                badge.css_class(),
                escape_html(&badge.label())
            )?;
        }
        Ok(())
    }

    fn write_method_detail(output: &mut String, detail: &MethodDetail) -> fmt::Result {
        writeln!(
            output,
            "<details class=\"method-accordion\" id=\"{}\">",
            escape_html(&detail.anchor.to_string())
        )?;
        writeln!(output, "  <summary class=\"detail-header method-signature-header\">")?;
        writeln!(
            output,
            "    <div class=\"signature-left\"><span class=\"type\">{}</span> <span class=\"method-name\">{}</span> <span class=\"params\">{}</span></div>",
            escape_html(&detail.ret),
            escape_html(&detail.name),
            escape_html(&detail.params)
        )?;
        write!(output, "    <div class=\"signature-right\">")?;
        Self::write_badges(output, &detail.badges)?;
        writeln!(output, "</div>")?;
        writeln!(output, "  </summary>")?;
        writeln!(output, "  <div class=\"detail-body\">")?;
        writeln!(output, "    <p>{}</p>", detail.desc)?;
        if let Some(details) = &detail.details {
            writeln!(
                output,
                "    <p class=\"method-technical-details\"><strong>Technical:</strong> {details}</p>"
            )?;
        }
        for example in &detail.examples {
            writeln!(output, "    <pre><code class=\"language-kix\">{example}</code></pre>")?;
        }
        writeln!(output, "  </div>")?;
        writeln!(output, "</details>")
    }

    fn write_changelog(output: &mut String, changelog: &Changelog) -> fmt::Result {
        writeln!(output, "<h1>Changelog</h1>")?;
        if changelog.is_empty() {
            return writeln!(output, "<p>No changelog data found.</p>");
        }
        for entry in changelog.entries() {
            writeln!(output, "<div class=\"changelog-entry\">")?;
            match entry.parsed_date() {
                Some(date) => writeln!(
                    output,
                    "  <h2>{} (<time datetime=\"{}\">{}</time>)</h2>",
                    escape_html(&entry.version),
                    date.format("%Y-%m-%d"),
                    escape_html(&entry.date)
                )?,
                None => writeln!(output, "  <h2>{}</h2>", escape_html(&entry.heading()))?,
            }
            writeln!(output, "  <ul>")?;
            for change in &entry.changes {
                writeln!(output, "    <li>{change}</li>")?;
            }
            writeln!(output, "  </ul>")?;
            writeln!(output, "</div>")?;
        }
        Ok(())
    }

    fn write_sidebar(output: &mut String, tree: &SidebarTree, links: SidebarLinks<'_>) -> fmt::Result {
        writeln!(output, "<div id=\"nav-tree\">")?;
        for root in &tree.roots {
            Self::write_category(output, root, 1, links)?;
        }
        writeln!(output, "</div>")?;
        writeln!(
            output,
            "<a href=\"{}\" class=\"sidebar-link-changelog{}\">Changelog</a>",
            escape_html(links.changelog_href),
            if tree.changelog_active { " active" } else { "" }
        )
    }

    fn write_category(
        output: &mut String,
        node: &CategoryNode,
        depth: usize,
        links: SidebarLinks<'_>,
    ) -> fmt::Result {
        let indent = "  ".repeat(depth);
        writeln!(
            output,
            "{indent}<details class=\"nav-category\"{}{}>",
            if node.state.expanded { " open" } else { "" },
            if node.state.visible { "" } else { " hidden" }
        )?;
        writeln!(output, "{indent}  <summary>{}</summary>", escape_html(&node.name))?;
        for page in &node.pages {
            Self::write_page_entry(output, page, depth + 1, links)?;
        }
        for child in &node.children {
            Self::write_category(output, child, depth + 1, links)?;
        }
        writeln!(output, "{indent}</details>")
    }

    fn write_page_entry(
        output: &mut String,
        page: &PageEntry,
        depth: usize,
        links: SidebarLinks<'_>,
    ) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let active = |flag: bool| if flag { " active" } else { "" };

        writeln!(
            output,
            "{indent}<details class=\"nav-page\"{}{}>",
            if page.state.expanded { " open" } else { "" },
            if page.state.visible { "" } else { " hidden" }
        )?;
        writeln!(
            output,
            "{indent}  <summary class=\"nav-page-header\"><a href=\"{}\" class=\"nav-page-link{}\">{}</a></summary>",
            escape_html(&links.anchor_href(&page.anchor())),
            active(page.active),
            escape_html(&page.title)
        )?;
        for section in &page.sections {
            writeln!(
                output,
                "{indent}  <a href=\"{}\" class=\"nav-sub-item{}\">{}</a>",
                escape_html(&links.anchor_href(&section.anchor)),
                active(section.active),
                escape_html(&section.label)
            )?;
        }
        writeln!(output, "{indent}</details>")
    }

    fn write_styles(output: &mut String) -> fmt::Result {
        writeln!(output, "<style>")?;
        writeln!(
            output,
            r#"
:root {{
  --bg: #1a1a2e;
  --text: #eaeaea;
  --accent: #7b68ee;
  --code-bg: #0d1117;
  --sidebar-bg: #0f0f23;
  --border: #333;
}}

body {{
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
  background: var(--bg);
  color: var(--text);
  line-height: 1.6;
  display: flex;
  margin: 0;
}}

.sidebar {{
  width: 280px;
  background: var(--sidebar-bg);
  height: 100vh;
  position: fixed;
  overflow-y: auto;
  border-right: 1px solid var(--border);
  padding: 1rem;
}}

.sidebar a {{ color: var(--text); text-decoration: none; display: block; }}
.sidebar a.active {{ color: var(--accent); font-weight: 600; }}
.nav-sub-item {{ padding-left: 1rem; font-size: 0.9em; }}
.content {{ margin-left: 320px; padding: 2rem; max-width: 960px; }}
.crumb {{ color: #888; font-size: 0.85rem; }}
.api-table {{ border-collapse: collapse; width: 100%; margin: 1rem 0; }}
.api-table th, .api-table td {{ border-bottom: 1px solid var(--border); padding: 0.4rem; text-align: left; }}
pre {{ background: var(--code-bg); padding: 1rem; border-radius: 4px; overflow-x: auto; }}
code {{ font-family: 'Fira Code', 'Consolas', monospace; font-size: 0.9em; }}
.version-badge {{ border-radius: 3px; padding: 0 0.3rem; font-size: 0.75rem; }}
.version-badge.not-implemented {{ background: #5c2b2b; }}
.version-badge.since {{ background: #2b5c3a; }}
.version-badge.deprecated {{ background: #5c4f2b; }}
.code-link {{ text-decoration: none; }}
.code-link:hover {{ text-decoration: underline; }}
.token-string {{ color: #a5d6a7; }}
.token-comment {{ color: #6a737d; font-style: italic; }}
.token-macro {{ color: #f78c6c; }}
.token-number {{ color: #f9a825; }}
.token-library {{ color: #4fc3f7; }}
.token-keyword-control {{ color: #c792ea; }}
.token-keyword {{ color: #82aaff; }}
.token-type {{ color: #ffcb6b; }}
.token-function {{ color: #82b1ff; }}
.token-variable {{ color: #eeffff; }}
.token-punctuation {{ color: #89ddff; }}
.token-operator {{ color: #89ddff; }}
.token-bracket-round-0, .token-bracket-square-0, .token-bracket-curly-0 {{ color: #ffd700; }}
.token-bracket-round-1, .token-bracket-square-1, .token-bracket-curly-1 {{ color: #da70d6; }}
.token-bracket-round-2, .token-bracket-square-2, .token-bracket-curly-2 {{ color: #179fff; }}
"#
        )?;
        writeln!(output, "</style>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;
    use crate::changelog::ChangelogEntry;
    use crate::content::{MethodRecord, PageRecord, Status};
    use crate::highlight::Highlighter;
    use crate::render::PageRenderer;
    use crate::symbols::SymbolIndex;
    use crate::testutil;

    #[test]
    fn test_escape_roundtrip() {
        let raw = "a < b && \"c\" > d";
        assert_eq!(escape_html(raw), "a &lt; b &amp;&amp; &quot;c&quot; &gt; d");
        assert_eq!(unescape_html(&escape_html(raw)), raw);
        assert_eq!(unescape_html("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_page_html() {
        let mut page = PageRecord::new("Vector3", "Libraries/Math").with_method(
            MethodRecord::new("dot", "float", "(other: Vector3)")
                .with_desc("Dot product")
                .with_example(vec!["a.dot(b)".to_string(), "b.dot(a)".to_string()])
                .with_status(Status {
                    implemented: Some("v0.0.1".to_string()),
                    ..Status::default()
                }),
        );
        page.inherits = Some("Object".to_string());

        let index = SymbolIndex::new();
        let view = PageRenderer::new(Highlighter::new(&index)).render_page("vector3", &page);
        let html = HtmlRenderer::page(&view);

        assert!(html.contains("<div class=\"page-header\" id=\"vector3\">"));
        assert!(html.contains("Inherits: <a href=\"#object\">Object</a>"));
        assert!(html.contains("<h2 id=\"vector3:methods\">Methods</h2>"));
        assert!(html.contains("<th>Return</th><th>Name</th><th>Parameters</th><th>Description</th>"));
        assert!(html.contains("<a href=\"#vector3:dot\">dot</a>"));
        assert!(html.contains("(other: Vector3)"));
        assert!(html.contains("<span class=\"version-badge since\">Implemented</span>"));
        assert!(html.contains("<details class=\"method-accordion\" id=\"vector3:dot\">"));
        assert_eq!(html.matches("language-kix").count(), 2);
    }

    #[test]
    fn test_changelog_html() {
        assert_eq!(
            HtmlRenderer::changelog(&Changelog::new()),
            "<h1>Changelog</h1>\n<p>No changelog data found.</p>\n"
        );

        let log: Changelog = vec![ChangelogEntry::new("v0.0.2", "2026-02-17").with_change("<b>Shell</b>")]
            .into_iter()
            .collect();
        let html = HtmlRenderer::changelog(&log);
        assert!(html.contains("v0.0.2 (<time datetime=\"2026-02-17\">2026-02-17</time>)"));
        assert!(html.contains("<li><b>Shell</b></li>"));
    }

    #[test]
    fn test_sidebar_flags() {
        let registry = testutil::math_registry();
        let mut tree = SidebarTree::build(&registry);
        tree.activate(&Anchor::member("math", "methods"));
        let html = HtmlRenderer::sidebar(&tree);

        assert!(html.contains("<details class=\"nav-page\" open>"));
        assert!(html.contains("<a href=\"#math:methods\" class=\"nav-sub-item active\">Methods</a>"));
        assert!(html.contains("class=\"sidebar-link-changelog\""));
    }

    #[test]
    fn test_in_page_changelog_link_matches_fragment() {
        assert_eq!(
            SidebarLinks::IN_PAGE.changelog_href,
            format!("#{}", crate::anchor::CHANGELOG_FRAGMENT)
        );
    }

    #[test]
    fn test_sidebar_links_across_files() {
        let registry = testutil::math_registry();
        let tree = SidebarTree::build(&registry);
        let html = HtmlRenderer::sidebar_with_links(
            &tree,
            SidebarLinks {
                page_base: "index.html",
                changelog_href: "changelog.html",
            },
        );

        assert!(html.contains("<a href=\"index.html#math\" class=\"nav-page-link\">Math</a>"));
        assert!(html.contains("<a href=\"index.html#math:methods\" class=\"nav-sub-item\">Methods</a>"));
        assert!(html.contains("<a href=\"changelog.html\" class=\"sidebar-link-changelog\">"));
    }

    #[test]
    fn test_document_wraps_parts() {
        let html = HtmlRenderer::document("Docs & More", "<p>nav</p>", "<p>body</p>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Docs &amp; More</title>"));
        assert!(html.contains("<p>nav</p>"));
        assert!(html.contains("<main id=\"content\" class=\"content\">\n<p>body</p>"));
    }
}
