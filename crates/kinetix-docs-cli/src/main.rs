//! Kinetix Docs CLI - build and inspect the Kinetix language reference

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use kinetix_docs::config::CONFIG_FILE;
use kinetix_docs::sidebar::{CategoryNode, NodeState, PageEntry};
use kinetix_docs::{Corpus, DocBrowser, SidebarTree, SiteConfig, ViewCommand};

#[derive(Parser)]
#[command(name = "kinetix-docs")]
#[command(version = kinetix_docs::VERSION)]
#[command(about = "Build and inspect the Kinetix documentation", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the documentation as a static site
    Build {
        /// Site configuration file (defaults to ./docs.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory of content files
        #[arg(long)]
        content: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Site title
        #[arg(long)]
        title: Option<String>,

        /// Open the generated index in a browser
        #[arg(long)]
        open: bool,
    },

    /// Print page ids in canonical order
    Keys {
        /// Directory of content files
        #[arg(long)]
        content: Option<PathBuf>,
    },

    /// Print the sidebar tree, optionally filtered
    Tree {
        /// Directory of content files
        #[arg(long)]
        content: Option<PathBuf>,

        /// Search query applied before printing
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Highlight code against the content's symbol index
    Highlight {
        /// Source file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Directory of content files
        #[arg(long)]
        content: Option<PathBuf>,
    },

    /// Show the effect of navigating to a fragment
    Navigate {
        /// Fragment such as `math:sqrt` or `#changelog`
        fragment: String,

        /// Directory of content files
        #[arg(long)]
        content: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            config,
            content,
            output,
            title,
            open,
        } => {
            let mut site = site_config(config.as_deref())?;
            if let Some(content) = content {
                site.content = content;
            }
            if let Some(output) = output {
                site.output = output;
            }
            if let Some(title) = title {
                site.title = title;
            }
            build_site(&site, open)?;
        }

        Commands::Keys { content } => {
            let browser = load_browser(content)?;
            for key in browser.sorted_keys() {
                println!("{key}");
            }
        }

        Commands::Tree { content, query } => {
            let mut browser = load_browser(content)?;
            if let Some(query) = query {
                let summary = browser.on_search_query_changed(&query);
                println!(
                    "{} page(s) in {} categor{} match '{}'",
                    summary.visible_pages,
                    summary.visible_categories,
                    if summary.visible_categories == 1 { "y" } else { "ies" },
                    query
                );
            }
            print!("{}", format_tree(browser.sidebar()));
        }

        Commands::Highlight { file, content } => {
            let browser = load_browser(content)?;
            let code = read_source(file.as_deref())?;
            println!("{}", browser.highlight(&code));
        }

        Commands::Navigate { fragment, content } => {
            let mut browser = load_browser(content)?;
            let commands = browser.on_fragment_changed(&fragment);
            if commands.is_empty() {
                println!("No target for '{fragment}'");
            }
            for command in &commands {
                println!("{}", describe_command(command));
            }
            print!("{}", format_tree(browser.sidebar()));
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve the site configuration
///
/// An explicit path must exist. Otherwise `./docs.toml` is used, then the
/// per-user file, then the defaults.
fn site_config(explicit: Option<&Path>) -> Result<SiteConfig> {
    if let Some(path) = explicit {
        return SiteConfig::load(path)
            .with_context(|| format!("Failed to load configuration '{}'", path.display()));
    }

    let local = PathBuf::from(CONFIG_FILE);
    let path = match SiteConfig::user_config_path() {
        Some(user) if !local.exists() && user.exists() => user,
        _ => local,
    };
    SiteConfig::load_or_default(&path)
        .with_context(|| format!("Failed to load configuration '{}'", path.display()))
}

fn load_corpus(config: &SiteConfig) -> Result<Corpus> {
    let mut corpus = Corpus::load_dir(&config.content)
        .with_context(|| format!("Failed to load content from '{}'", config.content.display()))?;
    if let Some(changelog) = &config.changelog {
        corpus
            .load_changelog(changelog)
            .with_context(|| format!("Failed to load changelog '{}'", changelog.display()))?;
    }
    Ok(corpus)
}

/// Load the browser for the inspection commands
fn load_browser(content: Option<PathBuf>) -> Result<DocBrowser> {
    let mut config = site_config(None)?;
    if let Some(content) = content {
        config.content = content;
    }
    Ok(DocBrowser::from_corpus(load_corpus(&config)?))
}

fn build_site(config: &SiteConfig, open: bool) -> Result<()> {
    let browser = DocBrowser::from_corpus(load_corpus(config)?);
    let written = browser
        .write_site(config)
        .with_context(|| format!("Failed to write site to '{}'", config.output.display()))?;

    for path in &written {
        println!("Generated: {}", path.display());
    }

    if open {
        if let Some(index) = written.first() {
            if let Err(e) = open_in_browser(index) {
                eprintln!("Warning: Could not open browser: {e}");
            }
        }
    }

    println!(
        "\nDocumentation for {} page(s) generated in: {}",
        browser.registry().len(),
        config.output.display()
    );
    Ok(())
}

fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        None => {
            let mut code = String::new();
            std::io::stdin()
                .read_to_string(&mut code)
                .context("Failed to read stdin")?;
            Ok(code)
        }
    }
}

/// Open a file in the default browser
fn open_in_browser(path: &Path) -> Result<()> {
    let url = format!("file://{}", path.canonicalize()?.display());

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(&url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(&url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &url])
            .spawn()?;
    }

    Ok(())
}

fn describe_command(command: &ViewCommand) -> String {
    match command {
        ViewCommand::ShowChangelog => "show changelog".to_string(),
        ViewCommand::RestoreDocumentation => "restore documentation".to_string(),
        ViewCommand::ScrollTo { selector, behavior } => {
            format!("scroll to {selector} ({behavior:?})")
        }
        ViewCommand::RevealSidebarLink { anchor } => format!("reveal sidebar link #{anchor}"),
    }
}

/// Render the sidebar as an indented outline
///
/// `+` marks an expanded node, `-` a collapsed one, `*` the active link.
/// Hidden nodes are listed with a trailing `(hidden)`.
fn format_tree(tree: &SidebarTree) -> String {
    let mut output = String::new();
    for root in &tree.roots {
        format_category(&mut output, root, 0);
    }
    output.push_str(if tree.changelog_active {
        "* Changelog\n"
    } else {
        "  Changelog\n"
    });
    output
}

fn format_category(output: &mut String, node: &CategoryNode, depth: usize) {
    output.push_str(&format!(
        "{}{} {}/{}\n",
        "  ".repeat(depth),
        marker(node.state),
        node.name,
        hidden(node.state)
    ));
    for page in &node.pages {
        format_page(output, page, depth + 1);
    }
    for child in &node.children {
        format_category(output, child, depth + 1);
    }
}

fn format_page(output: &mut String, page: &PageEntry, depth: usize) {
    let indent = "  ".repeat(depth);
    output.push_str(&format!(
        "{indent}{} {}{} [{}]{}\n",
        marker(page.state),
        if page.active { "*" } else { "" },
        page.title,
        page.id,
        hidden(page.state)
    ));
    for section in &page.sections {
        output.push_str(&format!(
            "{indent}    {}{} #{}\n",
            if section.active { "*" } else { "" },
            section.label,
            section.anchor
        ));
    }
}

fn marker(state: NodeState) -> char {
    if state.expanded {
        '+'
    } else {
        '-'
    }
}

fn hidden(state: NodeState) -> &'static str {
    if state.visible {
        ""
    } else {
        " (hidden)"
    }
}
