//! Basic browsing example
//!
//! This example shows how to:
//! - Build a catalog tree from the configuration
//! - Walk the scaffolding down to a month folder
//! - Resolve a movie by identifier and read a lazy property

use cinetmdb::TmdbClient;
use cinetree::{CatalogTree, ResourceKind, TreeSettings};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== CineTree - basic browsing ===\n");

    let catalog = Arc::new(TmdbClient::from_config()?);
    let (tree, mut events) = CatalogTree::new(catalog, TreeSettings::default()).await;

    println!("--- Root categories ---");
    for category in tree.get_children("/").await? {
        println!("  {} -> {}", category.id, category.path);
    }

    println!("\n--- Listing /movies/2024/2024-01 ---");
    let movies = tree.get_children("/movies/2024/2024-01").await?;
    println!("{} movie(s) released that month", movies.len());

    for movie in movies.iter().take(5) {
        println!("  {} ({})", movie.name, movie.path);
    }

    if let Some(first) = movies.first() {
        println!("\n--- Details of {} ---", first.name);

        let tagline = tree.get_property(&first.id, "en", "tagline").await?;
        if let Some(tagline) = tagline.first() {
            println!("  Tagline: {}", tagline);
        }

        let runtime = tree.get_property(&first.id, "en", "runtime").await?;
        if let Some(runtime) = runtime.first() {
            println!("  Runtime: {} min", runtime);
        }

        println!("  Credits:");
        for credit in tree.get_children(&first.path).await?.iter().take(5) {
            println!("    {} ({})", credit.name, credit.kind);
        }
    }

    println!("\n--- Searching for 'beekeeper' ---");
    for path in tree.search(ResourceKind::Movie, "beekeeper").await? {
        println!("  {}", path);
    }

    println!("\n--- Cache statistics ---");
    let stats = tree.cache().stats().await;
    println!("Records: {}", stats.data_count);
    println!("Lists: {}", stats.lists_count);
    println!("Total: {} entries", stats.total_count());

    println!("\n--- Indexing events emitted so far ---");
    while let Ok(event) = events.try_recv() {
        println!("  {} ({}) at {}", event.id, event.kind, event.path);
    }

    Ok(())
}
