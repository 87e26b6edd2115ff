//! Warm the cache against the live PokeAPI, then serve a batch from it.
//!
//! ```text
//! RUST_LOG=info cargo run --example warm_and_fetch
//! ```

use pokecache::{
    backend::InMemoryBackend, error::Result, CacheStrategy, CacheWarmer, ClientConfig,
    PokeApiClient, PokemonService, WarmerConfig,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .ok();

    println!("\n=== pokecache - Warm and Fetch ===\n");

    // 1. Build the upstream client and the service
    println!("1. Connecting to PokeAPI...");
    let config = ClientConfig::default().with_timeout(Duration::from_secs(5));
    let client = Arc::new(PokeApiClient::new(config)?);
    println!("   ✓ Upstream: {}\n", client.base_url());

    let backend = InMemoryBackend::new();
    let service = PokemonService::new(backend.clone(), client);

    // 2. One warm pass over the first dozen
    println!("2. Running one warm pass (ids 1..=12):");
    let warmer = CacheWarmer::new(
        service.clone(),
        WarmerConfig::default()
            .with_ids(1..=12)
            .with_politeness_delay(Duration::from_millis(50)),
    );
    let report = warmer.run_once().await;
    println!(
        "   ✓ {} loaded, {} failed of {}\n",
        report.loaded, report.failed, report.attempted
    );

    // 3. Batch served from cache
    println!("3. Fetching batch (offset 0, limit 10):");
    let started = Instant::now();
    for pokemon in service.get_batch(0, 10).await {
        println!(
            "   #{:<4} {:<12} {:<8} {}",
            pokemon.id,
            pokemon.name,
            pokemon.region,
            pokemon.types.join("/")
        );
    }
    println!("   ✓ Served in {:?}\n", started.elapsed());

    // 4. Cache only
    println!("4. Fresh strategy (cache only) for id 151:");
    match service.get_by_id_with(151, CacheStrategy::Fresh).await {
        Ok(pokemon) => println!("   ✓ Cached: {}\n", pokemon.name),
        Err(e) => println!("   ✓ {} (not warmed, no upstream fallback)\n", e),
    }

    // 5. Scheduled warmer, stopped right away
    println!("5. Starting and stopping the background warmer...");
    let handle = CacheWarmer::new(service.clone(), WarmerConfig::default()).spawn();
    handle.shutdown().await;
    println!("   ✓ Warmer stopped before its first pass\n");

    backend.log_stats();
    let stats = backend.stats();
    println!(
        "=== {} entries, {} bytes cached ===\n",
        stats.total_entries, stats.total_bytes
    );

    Ok(())
}
