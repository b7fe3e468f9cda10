//! Output tables for the presentation layer: the cost table and the pre/post
//! rating and band breakdowns, rendered as markdown or JSON.

use super::cost::CostBounds;
use super::orchestrator::ComponentOutcome;
use crate::domain::{BerBand, BerRating, Breakdown, FabricComponent, RetrofitPolicies};
use crate::error::DataQualityError;
use serde::Serialize;
use std::fmt::Write as _;
use strum::IntoEnumIterator;

const COST_CAVEAT: &str = "> **Caveat:** The default values for the upper|lower cost estimates are \
derived from the [`TABULA`](https://energyaction.ie/projects/tabula.php) project which ran from \
2009 - 2012.";

/// One row of the cost table (M€)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostRow {
    pub label: String,
    #[serde(rename = "Lowest Likely Cost [M€]")]
    pub lower_millions: f64,
    #[serde(rename = "Highest Likely Cost [M€]")]
    pub upper_millions: f64,
}

/// Wall, Roof, Window and Total rows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CostTable {
    rows: Vec<CostRow>,
}

impl CostTable {
    pub fn from_outcomes(outcomes: &[ComponentOutcome]) -> Self {
        let mut rows: Vec<CostRow> = outcomes
            .iter()
            .map(|outcome| CostRow {
                label: outcome.component.label().to_string(),
                lower_millions: outcome.costs.lower_millions,
                upper_millions: outcome.costs.upper_millions,
            })
            .collect();
        let total: CostBounds = outcomes.iter().map(|outcome| outcome.costs).sum();
        rows.push(CostRow {
            label: "Total".to_string(),
            lower_millions: total.lower_millions,
            upper_millions: total.upper_millions,
        });
        Self { rows }
    }

    pub fn rows(&self) -> &[CostRow] {
        &self.rows
    }

    pub fn row(&self, label: &str) -> Option<&CostRow> {
        self.rows.iter().find(|row| row.label == label)
    }

    pub fn total(&self) -> Option<&CostRow> {
        self.row("Total")
    }
}

/// Pre- and post-retrofit counts for the same label set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownComparison<L: Ord> {
    pub pre: Breakdown<L>,
    pub post: Breakdown<L>,
}

impl<L> BreakdownComparison<L>
where
    L: Ord + Copy + IntoEnumIterator,
{
    /// (label, pre count, post count) in label rank order
    pub fn rows(&self) -> Vec<(L, usize, usize)> {
        L::iter()
            .map(|label| (label, self.pre.count(label), self.post.count(label)))
            .collect()
    }
}

/// Everything a presentation layer needs, without the per-dwelling series
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary<'a> {
    pub dwellings: usize,
    pub retrofitted: Vec<(FabricComponent, usize)>,
    pub costs: &'a CostTable,
    pub ratings: &'a BreakdownComparison<BerRating>,
    pub bands: &'a BreakdownComparison<BerBand>,
    pub data_quality: &'a [DataQualityError],
}

pub(crate) fn render_markdown(
    summary: &ReportSummary<'_>,
    policies: &RetrofitPolicies,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "## Costs\n");
    let _ = writeln!(out, "{}\n", COST_CAVEAT);
    let _ = writeln!(
        out,
        "| | Lowest Likely Cost [M€] | Highest Likely Cost [M€] |"
    );
    let _ = writeln!(out, "|---|---:|---:|");
    for row in summary.costs.rows() {
        let _ = writeln!(
            out,
            "| {} | {:.4} | {:.4} |",
            row.label, row.lower_millions, row.upper_millions
        );
    }
    let _ = writeln!(out);
    for (component, policy) in policies.iter() {
        let (lower, upper) = policy.typical_cost_range();
        let _ = writeln!(
            out,
            "- {}: {:.0}€ - {:.0}€ for a typical {} area of {}m²",
            component.label(),
            lower,
            upper,
            component,
            policy.typical_area
        );
    }

    let _ = writeln!(out, "\n## Retrofits\n");
    let _ = writeln!(out, "| Component | Dwellings retrofitted |");
    let _ = writeln!(out, "|---|---:|");
    for (component, count) in &summary.retrofitted {
        let _ = writeln!(out, "| {} | {} of {} |", component.label(), count, summary.dwellings);
    }

    let _ = writeln!(out, "\n## BER Ratings\n");
    write_breakdown(&mut out, "Rating", &summary.ratings.rows());
    let _ = writeln!(out, "\n## BER Bands\n");
    write_breakdown(&mut out, "Band", &summary.bands.rows());

    if !summary.data_quality.is_empty() {
        let _ = writeln!(out, "\n## Data Quality\n");
        for issue in summary.data_quality {
            let _ = writeln!(out, "- {}", issue);
        }
    }
    out
}

fn write_breakdown<L: std::fmt::Display>(out: &mut String, header: &str, rows: &[(L, usize, usize)]) {
    let _ = writeln!(out, "| {} | Pre | Post |", header);
    let _ = writeln!(out, "|---|---:|---:|");
    for (label, pre, post) in rows {
        let _ = writeln!(out, "| {} | {} | {} |", label, pre, post);
    }
}
