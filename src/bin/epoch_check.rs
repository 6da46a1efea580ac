//! Epoch diagnostics - verify window math and block resolution
//!
//! Run with: cargo run --bin epoch-check
//!
//! Prints the most recently completed epoch window, then (when a resolver
//! key is configured) the block range it maps to on every network.

use chrono::Utc;
use farmscope::blocks::BlockResolver;
use farmscope::chains::Chain;
use farmscope::epoch::EpochWindow;

#[tokio::main]
async fn main() {
    println!();
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║               FARMSCOPE EPOCH DIAGNOSTICS                  ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    // Load .env
    dotenvy::dotenv().ok();

    let now = Utc::now();
    let window = EpochWindow::completed(now);

    println!("Probe time:    {}", now.to_rfc3339());
    println!("Epoch window:  {}", window);
    println!(
        "Window length: {} hours",
        (window.end - window.start).num_hours()
    );
    println!();

    let api_key = std::env::var("MORALIS_API_KEY").ok();
    if api_key.is_none() {
        println!("⚠️  MORALIS_API_KEY not set - skipping block resolution");
        return;
    }

    let resolver = match BlockResolver::new(api_key) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to build block resolver: {}", e);
            return;
        }
    };

    for chain in Chain::all() {
        match resolver.resolve_window(chain, &window).await {
            Ok(range) => println!("  {:<10} → blocks {}", chain.to_string(), range),
            Err(e) => println!("  {:<10} → ✗ {}", chain.to_string(), e),
        }
    }
}
