//! # Bluebook Main Entry Point
//!
//! Headless client over the collection engine: open a collection from the
//! remote store, optionally import/export a file, and print the tree.

use anyhow::{Context, Result};
use bluebook::cmd_args::CommandLineArgs;
use bluebook::collection::tree;
use bluebook::{config, HttpGateway, Node, Outcome, Session};

/// Initialize tracing with a configurable log level (stderr, so piped
/// output stays clean).
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let level =
        std::env::var(config::LOG_LEVEL_ENV_VAR).unwrap_or_else(|_| default_level.to_string());
    let filter = tracing_subscriber::EnvFilter::try_new(&level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CommandLineArgs::parse();
    init_tracing(args.verbose());

    let base_url = args
        .server()
        .map(str::to_string)
        .unwrap_or_else(config::get_api_base_url);
    tracing::debug!(%base_url, "connecting to persistence backend");

    let gateway = HttpGateway::new(base_url).with_token(config::get_api_token());
    let mut session = Session::new(Box::new(gateway));

    match args.collection() {
        Some(id) => {
            session.refresh_collections().await?;
            session.load_collection(id).await?;
        }
        None => {
            session.initialize().await?;
        }
    }

    if let Some(path) = args.import() {
        let payload = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        // Headless run: there is no one to ask, so confirmations proceed.
        match session.import(&payload)? {
            Outcome::ConfirmationRequired(pending) => {
                session.proceed(pending).await?;
            }
            Outcome::Completed(_) => {}
        }
        println!("Imported {}", path.display());
    }

    print_collection(&session, args.filter().unwrap_or_default());

    if let Some(path) = args.export() {
        if session.is_dirty() {
            tracing::warn!("unsaved draft edits are not part of the export");
        }
        std::fs::write(path, session.export())
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Exported to {}", path.display());
    }

    Ok(())
}

/// Print the collection the way the sidebar shows it: folders as groups,
/// requests with their method, non-matching nodes filtered out.
fn print_collection(session: &Session, filter: &str) {
    let collection = session.collection();
    println!("{}", collection.name);
    if !collection.description.is_empty() {
        println!("  {}", collection.description);
    }

    if collection.items.is_empty() {
        println!("  (collection is empty)");
        return;
    }
    print_items(&collection.items, 1, filter);
}

fn print_items(items: &[Node], depth: usize, filter: &str) {
    for node in items {
        if !tree::matches_filter(node, filter) {
            continue;
        }
        let indent = "  ".repeat(depth);
        match node {
            Node::Folder(folder) => {
                println!("{indent}{}/", folder.name);
                print_items(&folder.items, depth + 1, filter);
            }
            Node::Request(request) => {
                println!("{indent}[{}] {}  {}", request.method, request.name, request.url)
            }
        }
    }
}
