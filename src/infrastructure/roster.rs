//! # Base Roster
//!
//! The fixed roster of fifteen market makers and the simulated data source
//! that serves it.
//!
//! # Examples
//!
//! ```
//! use mm_monitor::infrastructure::roster::base_roster;
//!
//! let roster = base_roster();
//! assert_eq!(roster.len(), 15);
//! assert_eq!(roster[0].name(), "Equilibrium");
//! ```

use crate::domain::entities::market_maker::{MakerMetrics, MakerProfile, MarketMakerBaseline};
use crate::domain::value_objects::enums::MakerStatus;
use crate::infrastructure::data_source::{MetricsSource, SourceError, SourceResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Builds a baseline from metrics in the order pairs, spread, volume,
/// inventory, pnl, uptime, latency, execution speed, success rate, capacity.
fn maker(
    name: &str,
    m: [f64; 10],
    status: MakerStatus,
    profile: MakerProfile,
) -> MarketMakerBaseline {
    let [
        pairs,
        spread,
        volume_m,
        inventory_m,
        pnl_k,
        uptime_pct,
        latency_ms,
        execution_speed_s,
        success_rate_pct,
        volume_capacity_m,
    ] = m;
    MarketMakerBaseline::new(
        name,
        MakerMetrics {
            pairs: pairs as u32,
            spread,
            volume_m,
            inventory_m,
            pnl_k,
            uptime_pct,
            latency_ms,
            execution_speed_s,
            success_rate_pct,
            volume_capacity_m,
        },
        status,
        profile,
    )
}

/// Returns the base roster in display order.
#[must_use]
pub fn base_roster() -> Vec<MarketMakerBaseline> {
    vec![
        maker(
            "Equilibrium",
            [277.0, 19.3, 1.05, 2.1, 45.2, 99.8, 2.3, 1.8, 98.7, 5.2],
            MakerStatus::Active,
            MakerProfile::new("Singapore", 2021, 25, ["DeFi", "Yield Farming", "Liquidity Mining"])
                .with_description("Leading market maker specializing in DeFi protocols"),
        ),
        maker(
            "OnlyDegens",
            [169.0, 25.6, 4.07, 3.2, 78.9, 99.5, 1.8, 0.9, 97.2, 8.5],
            MakerStatus::Active,
            MakerProfile::new("New York", 2020, 18, ["Meme Coins", "High-Frequency Trading", "Social Trading"])
                .with_description("High-frequency trading specialist with meme coin expertise"),
        ),
        maker(
            "Arken",
            [142.0, 18.9, 2.33, 1.8, 32.1, 98.9, 3.1, 2.4, 96.1, 3.8],
            MakerStatus::Warning,
            MakerProfile::new("London", 2019, 32, ["Institutional Trading", "Risk Management", "Compliance"])
                .with_description("Institutional-grade market maker with traditional finance background"),
        ),
        maker(
            "Hexagon",
            [98.0, 22.1, 1.89, 1.2, 28.4, 99.2, 2.7, 1.6, 98.9, 2.5],
            MakerStatus::Active,
            MakerProfile::new("Tokyo", 2022, 12, ["Algorithmic Trading", "Mathematical Models", "Quantitative Analysis"])
                .with_description("Geometric trading algorithms with mathematical precision"),
        ),
        maker(
            "Astro",
            [76.0, 20.5, 3.21, 2.8, 67.3, 99.9, 1.5, 0.7, 99.2, 4.2],
            MakerStatus::Active,
            MakerProfile::new("San Francisco", 2021, 20, ["AI Trading", "Machine Learning", "Advanced Analytics"])
                .with_description("Space-age technology meets cryptocurrency market making"),
        ),
        maker(
            "CryptoFlow",
            [203.0, 16.7, 5.42, 4.1, 92.5, 99.7, 1.2, 0.5, 99.5, 12.8],
            MakerStatus::Active,
            MakerProfile::new("Zurich", 2020, 28, ["Cross-Chain Trading", "Liquidity Provision", "Market Making"])
                .with_description("Top-tier market maker with exceptional liquidity provision"),
        ),
        maker(
            "TradeMaster",
            [156.0, 21.4, 2.87, 2.3, 41.7, 99.1, 2.8, 1.2, 97.8, 4.8],
            MakerStatus::Active,
            MakerProfile::new("Hong Kong", 2018, 22, ["Traditional Finance", "Options Trading", "Portfolio Management"])
                .with_description("Master traders with decades of financial market experience"),
        ),
        maker(
            "LiquidityPro",
            [189.0, 17.8, 3.65, 3.7, 58.3, 99.6, 1.9, 0.8, 98.3, 7.2],
            MakerStatus::Active,
            MakerProfile::new("Dubai", 2021, 24, ["Liquidity Mining", "Staking", "Yield Optimization"])
                .with_description("Professional liquidity providers with institutional backing"),
        ),
        maker(
            "MarketKing",
            [134.0, 23.2, 1.98, 1.5, 25.9, 98.7, 3.5, 2.1, 95.4, 2.8],
            MakerStatus::Warning,
            MakerProfile::new("Miami", 2023, 8, ["Emerging Markets", "Startup Tokens", "Community Building"])
                .with_description("Emerging market maker with ambitious growth plans"),
        ),
        maker(
            "BitTrader",
            [167.0, 19.6, 2.54, 2.9, 36.8, 99.4, 2.1, 1.1, 98.1, 4.1],
            MakerStatus::Active,
            MakerProfile::new("Austin", 2020, 15, ["Bitcoin", "Blockchain Technology", "Cryptocurrency Trading"])
                .with_description("Bitcoin-focused market maker with deep blockchain expertise"),
        ),
        maker(
            "CoinMaker",
            [145.0, 20.8, 3.12, 2.6, 49.1, 99.3, 2.4, 1.4, 97.5, 5.3],
            MakerStatus::Active,
            MakerProfile::new("Seoul", 2021, 19, ["Altcoins", "Token Analysis", "Market Research"])
                .with_description("Multi-coin specialist with comprehensive altcoin coverage"),
        ),
        maker(
            "DigitalFlow",
            [178.0, 18.2, 4.28, 3.4, 73.6, 99.8, 1.6, 0.6, 99.1, 8.9],
            MakerStatus::Active,
            MakerProfile::new("Berlin", 2020, 26, ["Digital Assets", "Web3", "Decentralized Finance"])
                .with_description("Digital-first market maker with cutting-edge technology"),
        ),
        maker(
            "TokenMaster",
            [112.0, 24.1, 1.76, 1.8, 22.4, 98.5, 3.2, 2.8, 94.7, 2.2],
            MakerStatus::Warning,
            MakerProfile::new("Toronto", 2022, 10, ["New Listings", "Token Launches", "Early Stage Trading"])
                .with_description("Token-focused market maker specializing in new listings"),
        ),
        maker(
            "BlockChainPro",
            [198.0, 17.5, 3.89, 3.8, 81.2, 99.7, 1.4, 0.4, 99.3, 9.1],
            MakerStatus::Active,
            MakerProfile::new("Amsterdam", 2019, 30, ["Blockchain Infrastructure", "Enterprise Solutions", "Smart Contracts"])
                .with_description("Blockchain infrastructure experts with enterprise solutions"),
        ),
        maker(
            "CryptoElite",
            [165.0, 19.7, 2.96, 2.7, 44.5, 99.2, 2.2, 1.3, 98.6, 4.7],
            MakerStatus::Active,
            MakerProfile::new("Monaco", 2021, 16, ["Premium Trading", "VIP Services", "Exclusive Access"])
                .with_description("Elite cryptocurrency traders with premium service offerings"),
        ),
    ]
}

/// [`MetricsSource`] serving a fixed roster.
///
/// Availability can be toggled to exercise the fallback path.
#[derive(Debug, Clone)]
pub struct SimulatedMetricsSource {
    roster: Arc<Vec<MarketMakerBaseline>>,
    available: Arc<AtomicBool>,
    fetches: Arc<AtomicU64>,
}

impl SimulatedMetricsSource {
    /// Creates a source over `roster`.
    #[must_use]
    pub fn new(roster: Vec<MarketMakerBaseline>) -> Self {
        Self {
            roster: Arc::new(roster),
            available: Arc::new(AtomicBool::new(true)),
            fetches: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates a source over [`base_roster`].
    #[must_use]
    pub fn with_base_roster() -> Self {
        Self::new(base_roster())
    }

    /// Makes subsequent fetches succeed or fail.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of fetch attempts so far.
    #[must_use]
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedMetricsSource {
    fn default() -> Self {
        Self::with_base_roster()
    }
}

#[async_trait]
impl MetricsSource for SimulatedMetricsSource {
    async fn fetch_entity_metrics(&self) -> SourceResult<Vec<MarketMakerBaseline>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.available.load(Ordering::SeqCst) {
            return Err(SourceError::unavailable("simulated outage"));
        }
        if self.roster.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(self.roster.as_ref().clone())
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
