//! Turn cache demo.
//!
//! Wires the caches from the environment and formats dates through a
//! zone-cached and a memory-cached formatter across a few turns.
//!
//! ```text
//! RUST_LOG=memocache=debug cargo run --example turn_cache
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use memocache::{
    Cache, CacheKeyBuilder, CacheKind, CacheModule, CacheRegistry, Config, KeySource, Memoizer,
    TurnZone,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Formats dates, counting how often it actually does the work.
struct DateFormatter {
    locale: &'static str,
    formatted: AtomicUsize,
    memo: Memoizer,
}

impl KeySource for DateFormatter {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        builder.push_display(self.locale);
    }
}

impl DateFormatter {
    fn new(locale: &'static str, memo: Memoizer) -> Self {
        Self {
            locale,
            formatted: AtomicUsize::new(0),
            memo,
        }
    }

    fn format(&self, date: &DateTime<Utc>, pattern: &str) -> String {
        self.memo.get_or_compute(self, &(date, pattern), || {
            self.formatted.fetch_add(1, Ordering::SeqCst);
            date.format(pattern).to_string()
        })
    }

    fn formatted(&self) -> usize {
        self.formatted.load(Ordering::SeqCst)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("memocache=debug,turn_cache=info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config);

    let registry = CacheRegistry::global();
    let zone = TurnZone::new();
    let module = CacheModule::install(&config, registry, Arc::new(zone.clone()))?;

    let zone_formatter = DateFormatter::new("en-US", Memoizer::install(CacheKind::Zone, registry));
    let memory_formatter =
        DateFormatter::new("en-US", Memoizer::install(CacheKind::Memory, registry));

    let date = Utc
        .with_ymd_and_hms(2024, 5, 17, 9, 30, 0)
        .single()
        .ok_or_else(|| anyhow::anyhow!("invalid demo date"))?;

    for turn in 1..=3 {
        zone.run_async(async {
            for _ in 0..4 {
                zone_formatter.format(&date, "%Y-%m-%d %H:%M");
                memory_formatter.format(&date, "%Y-%m-%d %H:%M");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        })
        .await;

        info!(
            "Turn {}: zone formatter ran {} times, memory formatter ran {} times",
            turn,
            zone_formatter.formatted(),
            memory_formatter.formatted()
        );
    }

    if let Some(memory) = &module.memory {
        info!("Memory cache holds {} entries", memory.size());
    }
    info!("Completed {} turns", zone.turn_count());

    Ok(())
}
