//! tabnav - print the tab order of an HTML file
//!
//! Elements with `data-tabnav-root` are roots (the `<body>` when there are
//! none), `data-tabnav-uncontrolled` marks uncontrolled regions and
//! `data-tabnav-default` default targets. A `data-tabnav` attribute may hold
//! a full JSON node config.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tabnav_core::{
    ContextResolver, FindOptions, FindOutput, Found, Modalizers, Navigator, NavigatorConfig,
    ScopeRegistry,
};
use tabnav_dom::{Document, NodeId};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "tabnav", about = "Print the keyboard tab order of an HTML file")]
struct Args {
    /// HTML file to load
    file: PathBuf,

    /// Walk in Shift+Tab order
    #[arg(long)]
    backward: bool,

    /// Id of the container to search (defaults to <body>)
    #[arg(long)]
    container: Option<String>,

    /// Include tabindex="-1" elements
    #[arg(long)]
    programmatic: bool,

    /// Restrict to the modal with this id and treat it as active
    #[arg(long)]
    modal: Option<String>,

    /// Navigator config as JSON, e.g. '{"parent_mode": "light"}'
    #[arg(long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let html = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let document = tabnav_html::HtmlParser::new()
        .parse_with_url(&html, &format!("file://{}", args.file.display()))
        .context("failed to parse HTML")?;

    let mut registry =
        ScopeRegistry::from_document(&document).context("failed to read data-tabnav attributes")?;
    let body = document.body().context("document has no <body>")?;
    if !has_root(&registry, &document) {
        tracing::info!("No data-tabnav-root, using <body>");
        registry.add_root(body);
    }

    let config = match &args.config {
        Some(json) => NavigatorConfig::from_json(json)?,
        None => NavigatorConfig::default(),
    };

    let mut modalizers = Modalizers::new();
    if let Some(id) = &args.modal {
        modalizers.activate(id.clone());
    }

    let container = match &args.container {
        Some(id) => document
            .get_element_by_id(id)
            .with_context(|| format!("no element with id {id:?}"))?,
        None => body,
    };

    let navigator = Navigator::new(&document, &registry)
        .with_modalizer(&modalizers)
        .with_config(config);

    let order = tab_order(&navigator, container, &args);
    for (index, node) in order.iter().enumerate() {
        println!("{:>3}  {}", index + 1, describe(&document, *node));
    }

    if let Found::DefaultAction = first_step(&navigator, container, &args) {
        println!("note: first Tab enters an uncontrolled region");
    }

    Ok(())
}

fn has_root(registry: &ScopeRegistry, document: &Document) -> bool {
    let tree = document.tree();
    tree.shadow_including_descendants(tree.root())
        .into_iter()
        .any(|node| registry.config(node).is_some_and(|c| c.root))
}

fn options<'o>(container: NodeId, args: &Args) -> FindOptions<'o> {
    let options = FindOptions::new(container)
        .backward(args.backward)
        .programmatic(args.programmatic);
    match &args.modal {
        Some(id) => options.modalizer(id.clone()),
        None => options,
    }
}

/// Repeated Tab presses from the container edge
fn tab_order(navigator: &Navigator<'_>, container: NodeId, args: &Args) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut current = None;
    loop {
        let mut opts = options(container, args);
        if let Some(node) = current {
            opts = opts.current(node);
        }
        let mut out = FindOutput::default();
        match navigator.find_element(opts, &mut out) {
            Found::Element(node) if !order.contains(&node) => {
                order.push(node);
                current = Some(node);
            }
            _ => break,
        }
    }
    order
}

fn first_step(navigator: &Navigator<'_>, container: NodeId, args: &Args) -> Found {
    navigator.find_element(options(container, args), &mut FindOutput::default())
}

fn describe(document: &Document, node: NodeId) -> String {
    let tree = document.tree();
    let tag = tree.tag(node).unwrap_or("?");
    let mut label = format!("<{tag}");
    if let Some(id) = tree.attr(node, "id") {
        label.push_str(&format!(" id=\"{id}\""));
    }
    label.push('>');
    let text = tree.text_content(node);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !text.is_empty() {
        label.push(' ');
        label.push_str(&text);
    }
    if tree.containing_shadow_root(node).is_some() {
        label.push_str("  (shadow)");
    }
    label
}
