//! Basic usage example
//!
//! This example walks through one reading session:
//! - Saving a few items
//! - Asking the three lanes what to read next
//! - Reading, reflecting on and deciding an item
//! - Checking stats and streak

use readlane::{
    LocalStorage, NewItem, SourceData, Storage, TrackerBuilder, TrackerConfig, Verdict,
};
use std::sync::Arc;
use tokio_stream::StreamExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("=== Readlane: Basic Usage Example ===\n");

    let storage_dir = std::env::temp_dir().join("readlane-basic-usage");
    let storage = LocalStorage::new(storage_dir.clone()).await?;
    let tracker = TrackerBuilder::new(Arc::new(storage))
        .with_config(TrackerConfig::new().with_recent_verdict_limit(3))
        .build()?;

    println!("✓ Tracker ready, storing in {}", storage_dir.display());

    let mut events = tracker.subscribe();
    tokio::spawn(async move {
        while let Some(event) = events.next().await {
            println!("  ⚡ {}", event.key);
        }
    });

    println!("\nSaving items...");
    let saved = [
        ("Attention is all you need", 45, vec!["AI", "Research"]),
        ("Kubernetes in five minutes", 5, vec!["DevOps"]),
        ("Writing a Rust parser", 20, vec!["Rust"]),
        ("Prompting tips", 8, vec!["AI"]),
    ];
    let mut ids = Vec::new();
    for (title, minutes, tags) in saved {
        let item = tracker
            .add_item(
                NewItem::new(title, SourceData::link(format!("https://example.com/{}", ids.len())))
                    .with_estimated_minutes(minutes)
                    .with_tags(tags),
            )
            .await?;
        println!("  → Saved \"{}\"", item.title);
        ids.push(item.id);
    }

    let next = tracker.next_up(None).await?;
    println!("\nNext up ({} queued):", next.total_queued);
    for pick in next.picks() {
        println!("  {:?}: {} ({})", pick.kind, pick.item.title, pick.reason);
    }

    if let Some(pick) = next.oldest {
        let id = pick.item.id;
        tracker.mark_read(&id).await?;
        tracker
            .save_takeaway(&id, "Self-attention replaces recurrence")
            .await?;
        tracker.submit_verdict(&id, Verdict::Keep).await?;
        println!("\n✓ Kept \"{}\"", pick.item.title);
    }

    let ai = tracker.next_up(Some("AI")).await?;
    println!("\nNext up in AI ({} queued):", ai.total_queued);
    for pick in ai.picks() {
        println!("  {:?}: {}", pick.kind, pick.item.title);
    }

    let scored = tracker.recalculate_priorities().await?;
    println!("\n✓ Rescored {} items", scored);

    let stats = tracker.stats().await?;
    println!(
        "\nStats: kept {}, discarded {}, revisited {}, streak {} (longest {})",
        stats.total_kept,
        stats.total_discarded,
        stats.total_revisited,
        stats.streak.current,
        stats.streak.longest
    );

    tracker.storage().clear_all().await?;
    println!("\n=== Example completed ===");

    Ok(())
}
