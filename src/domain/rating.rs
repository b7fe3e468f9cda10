//! # Building Energy Rating classification
//!
//! Maps an energy value (kWh/m²/yr) onto the 15 ordinal BER labels and onto
//! the coarser three-way band. Bins are open on the left and closed on the
//! right, so a value sitting exactly on a breakpoint belongs to the better
//! label: `(-inf, 25]` is `A1`, `25.0` rates `A1` and `25.001` rates `A2`.
//!
//! Every `f64` maps to exactly one label. `NaN` compares false against every
//! breakpoint and therefore lands in the last label (`G` / `E-G`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// Ordinal BER label, declared from best to worst
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum BerRating {
    A1,
    A2,
    A3,
    B1,
    B2,
    B3,
    C1,
    C2,
    C3,
    D1,
    D2,
    E1,
    E2,
    F,
    G,
}

/// Right-closed upper edge of every label except `G`, in declaration order
const RATING_UPPER_BOUNDS: [(f64, BerRating); 14] = [
    (25.0, BerRating::A1),
    (50.0, BerRating::A2),
    (75.0, BerRating::A3),
    (100.0, BerRating::B1),
    (125.0, BerRating::B2),
    (150.0, BerRating::B3),
    (175.0, BerRating::C1),
    (200.0, BerRating::C2),
    (225.0, BerRating::C3),
    (260.0, BerRating::D1),
    (300.0, BerRating::D2),
    (340.0, BerRating::E1),
    (380.0, BerRating::E2),
    (450.0, BerRating::F),
];

impl BerRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            BerRating::A1 => "A1",
            BerRating::A2 => "A2",
            BerRating::A3 => "A3",
            BerRating::B1 => "B1",
            BerRating::B2 => "B2",
            BerRating::B3 => "B3",
            BerRating::C1 => "C1",
            BerRating::C2 => "C2",
            BerRating::C3 => "C3",
            BerRating::D1 => "D1",
            BerRating::D2 => "D2",
            BerRating::E1 => "E1",
            BerRating::E2 => "E2",
            BerRating::F => "F",
            BerRating::G => "G",
        }
    }

    /// Letter grade (`'A'`..=`'G'`)
    pub fn letter(&self) -> char {
        self.as_str().chars().next().unwrap_or('G')
    }

    /// Coarse band this label belongs to
    pub fn band(&self) -> BerBand {
        match self.letter() {
            'A' | 'B' => BerBand::AB,
            'C' | 'D' => BerBand::CD,
            _ => BerBand::EG,
        }
    }
}

impl fmt::Display for BerRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse three-way BER band
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum BerBand {
    #[serde(rename = "A-B")]
    AB,
    #[serde(rename = "C-D")]
    CD,
    #[serde(rename = "E-G")]
    EG,
}

impl BerBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            BerBand::AB => "A-B",
            BerBand::CD => "C-D",
            BerBand::EG => "E-G",
        }
    }
}

impl fmt::Display for BerBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BerBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A-B" | "AB" => Ok(BerBand::AB),
            "C-D" | "CD" => Ok(BerBand::CD),
            "E-G" | "EG" => Ok(BerBand::EG),
            _ => Err(format!("Unknown BER band: {} (expected A-B, C-D or E-G)", s)),
        }
    }
}

/// Map an energy value to its BER label
pub fn classify_rating(value: f64) -> BerRating {
    RATING_UPPER_BOUNDS
        .iter()
        .find(|(upper, _)| value <= *upper)
        .map(|(_, rating)| *rating)
        .unwrap_or(BerRating::G)
}

/// Map an energy value to its BER band: (-inf,150] A-B, (150,300] C-D, above E-G
pub fn classify_band(value: f64) -> BerBand {
    if value <= 150.0 {
        BerBand::AB
    } else if value <= 300.0 {
        BerBand::CD
    } else {
        BerBand::EG
    }
}

/// Count of dwellings per label.
///
/// Every label is present, zero counts included, and iteration follows label
/// rank (best first) so tables render in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Breakdown<L: Ord> {
    counts: BTreeMap<L, usize>,
}

impl<L> Breakdown<L>
where
    L: Ord + Copy + IntoEnumIterator,
{
    pub fn from_labels(labels: impl IntoIterator<Item = L>) -> Self {
        let mut counts: BTreeMap<L, usize> = L::iter().map(|label| (label, 0)).collect();
        for label in labels {
            *counts.entry(label).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, label: L) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (L, usize)> + '_ {
        self.counts.iter().map(|(label, count)| (*label, *count))
    }
}

/// Rating counts for a series of energy values
pub fn rating_breakdown(values: &[f64]) -> Breakdown<BerRating> {
    Breakdown::from_labels(values.iter().copied().map(classify_rating))
}

/// Band counts for a series of energy values
pub fn band_breakdown(values: &[f64]) -> Breakdown<BerBand> {
    Breakdown::from_labels(values.iter().copied().map(classify_band))
}
