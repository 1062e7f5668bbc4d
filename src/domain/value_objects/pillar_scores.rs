//! # Pillar Scores
//!
//! The six per-pillar scores of one rating pass.
//!
//! Every score is kept inside `[0, 1]`: constructors clamp out-of-range input
//! and map non-finite input to `0.0`.
//!
//! # Examples
//!
//! ```
//! use mm_monitor::domain::value_objects::enums::Pillar;
//! use mm_monitor::domain::value_objects::pillar_scores::PillarScores;
//!
//! let scores = PillarScores::new(1.2, 0.9, 0.8, 0.8, 0.9, f64::NAN);
//! assert_eq!(scores.get(Pillar::Reputation), 1.0);
//! assert_eq!(scores.get(Pillar::Defi), 0.0);
//! ```

use crate::domain::value_objects::enums::Pillar;
use serde::{Deserialize, Serialize};

/// Scores for the six pillars, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarScores {
    reputation: f64,
    balance_sheet: f64,
    communication: f64,
    pricing: f64,
    technology: f64,
    defi: f64,
}

impl PillarScores {
    /// Creates scores in canonical pillar order, clamping each into `[0, 1]`.
    #[must_use]
    pub fn new(
        reputation: f64,
        balance_sheet: f64,
        communication: f64,
        pricing: f64,
        technology: f64,
        defi: f64,
    ) -> Self {
        Self {
            reputation: clamp_unit(reputation),
            balance_sheet: clamp_unit(balance_sheet),
            communication: clamp_unit(communication),
            pricing: clamp_unit(pricing),
            technology: clamp_unit(technology),
            defi: clamp_unit(defi),
        }
    }

    /// Builds scores from `(pillar, score)` pairs.
    ///
    /// A missing pillar is a caller defect: debug builds assert, release
    /// builds score it `0.0`. Later duplicates overwrite earlier ones.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Pillar, f64)>,
    {
        let mut values: [Option<f64>; 6] = [None; 6];
        for (pillar, score) in entries {
            if let Some(slot) = values.get_mut(pillar as usize) {
                *slot = Some(score);
            }
        }
        debug_assert!(
            values.iter().all(Option::is_some),
            "pillar scores must cover all six pillars"
        );
        let [r, b, c, p, t, d] = values.map(|v| v.unwrap_or(0.0));
        Self::new(r, b, c, p, t, d)
    }

    /// Returns the score of one pillar.
    #[must_use]
    pub const fn get(&self, pillar: Pillar) -> f64 {
        match pillar {
            Pillar::Reputation => self.reputation,
            Pillar::BalanceSheet => self.balance_sheet,
            Pillar::Communication => self.communication,
            Pillar::Pricing => self.pricing,
            Pillar::Technology => self.technology,
            Pillar::Defi => self.defi,
        }
    }

    /// Returns `(pillar, score)` pairs in canonical order.
    #[must_use]
    pub fn entries(&self) -> [(Pillar, f64); 6] {
        Pillar::ALL.map(|p| (p, self.get(p)))
    }

    /// Returns the arithmetic mean of the six scores.
    #[must_use]
    pub fn mean(&self) -> f64 {
        (self.reputation
            + self.balance_sheet
            + self.communication
            + self.pricing
            + self.technology
            + self.defi)
            / 6.0
    }

    /// Reputation score.
    #[inline]
    #[must_use]
    pub const fn reputation(&self) -> f64 {
        self.reputation
    }

    /// Balance sheet score.
    #[inline]
    #[must_use]
    pub const fn balance_sheet(&self) -> f64 {
        self.balance_sheet
    }

    /// Communication score.
    #[inline]
    #[must_use]
    pub const fn communication(&self) -> f64 {
        self.communication
    }

    /// Pricing score.
    #[inline]
    #[must_use]
    pub const fn pricing(&self) -> f64 {
        self.pricing
    }

    /// Technology score.
    #[inline]
    #[must_use]
    pub const fn technology(&self) -> f64 {
        self.technology
    }

    /// DeFi integration score.
    #[inline]
    #[must_use]
    pub const fn defi(&self) -> f64 {
        self.defi
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_out_of_range() {
        let scores = PillarScores::new(-0.5, 2.0, 0.5, f64::INFINITY, 0.3, 0.4);
        assert_eq!(scores.reputation(), 0.0);
        assert_eq!(scores.balance_sheet(), 1.0);
        assert_eq!(scores.pricing(), 0.0);
    }

    #[test]
    fn mean_of_example_scores() {
        let scores = PillarScores::new(0.96, 0.92, 0.85, 0.82, 0.93, 0.81);
        assert!((scores.mean() - 0.881_666).abs() < 1e-5);
    }

    #[test]
    fn from_entries_is_order_insensitive() {
        let forward = PillarScores::from_entries(Pillar::ALL.map(|p| (p, 0.1 * (p as u8 + 1) as f64)));
        let mut reversed = Pillar::ALL.map(|p| (p, 0.1 * (p as u8 + 1) as f64));
        reversed.reverse();
        assert_eq!(forward, PillarScores::from_entries(reversed));
        assert_eq!(forward.get(Pillar::Pricing), 0.4);
    }

    #[test]
    fn entries_follow_canonical_order() {
        let scores = PillarScores::new(0.1, 0.2, 0.3, 0.4, 0.5, 0.6);
        let pillars: Vec<Pillar> = scores.entries().iter().map(|(p, _)| *p).collect();
        assert_eq!(pillars, Pillar::ALL.to_vec());
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn from_entries_defaults_missing_to_zero() {
        let scores = PillarScores::from_entries([(Pillar::Reputation, 0.9)]);
        assert_eq!(scores.reputation(), 0.9);
        assert_eq!(scores.defi(), 0.0);
    }
}
