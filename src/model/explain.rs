//! Feature attribution results and their terminal rendering.

use std::{cmp::Ordering, io::Write};

use serde::Serialize;

const BAR_WIDTH: usize = 24;

/// Contribution of one feature to a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub feature: String,
    pub value: f64,
    pub contribution: f64,
}

/// Explanation of one prediction in the model's output space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribution {
    pub base_value: f64,
    pub contributions: Vec<Contribution>,
}

impl Attribution {
    /// Contributions by descending magnitude; equal magnitudes keep schema order.
    pub fn ranked(&self) -> Vec<&Contribution> {
        let mut ranked: Vec<&Contribution> = self.contributions.iter().collect();
        ranked.sort_by(|a, b| {
            b.contribution
                .abs()
                .partial_cmp(&a.contribution.abs())
                .unwrap_or(Ordering::Equal)
        });
        ranked
    }

    /// Keep the `k` strongest contributions, ranked.
    pub fn top(&self, k: usize) -> Vec<&Contribution> {
        let mut ranked = self.ranked();
        ranked.truncate(k);
        ranked
    }
}

/// Draw the top `k` contributions as a horizontal bar chart.
pub fn render<W: Write>(attribution: &Attribution, k: usize, out: &mut W) -> std::io::Result<()> {
    let top = attribution.top(k);
    let label_width = top.iter().map(|c| c.feature.len()).max().unwrap_or(0);
    let largest = top
        .first()
        .map(|c| c.contribution.abs())
        .filter(|m| *m > 0.0)
        .unwrap_or(1.0);
    for item in top {
        let length = ((item.contribution.abs() / largest) * BAR_WIDTH as f64).round() as usize;
        let glyph = if item.contribution >= 0.0 { '+' } else { '-' };
        let bar: String = std::iter::repeat(glyph).take(length).collect();
        writeln!(
            out,
            "  {:<label_width$}  {:<BAR_WIDTH$}  {:+.3}  (value {})",
            item.feature, bar, item.contribution, item.value
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribution() -> Attribution {
        let contribution = |feature: &str, contribution: f64| Contribution {
            feature: feature.into(),
            value: 1.0,
            contribution,
        };
        Attribution {
            base_value: 0.0,
            contributions: vec![
                contribution("pulse", 0.2),
                contribution("Partus", -0.8),
                contribution("Abortus", 0.2),
                contribution("body_height", 0.0),
            ],
        }
    }

    #[test]
    fn ranking_is_by_magnitude_and_stable() {
        let attribution = attribution();
        let names: Vec<&str> = attribution
            .ranked()
            .into_iter()
            .map(|c| c.feature.as_str())
            .collect();
        assert_eq!(names, ["Partus", "pulse", "Abortus", "body_height"]);
    }

    #[test]
    fn render_scales_bars_to_largest_contribution() {
        let mut out = Vec::new();
        render(&attribution(), 2, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(&"-".repeat(BAR_WIDTH)));
        assert!(lines[0].contains("-0.800"));
        assert!(lines[1].contains(&"+".repeat(6)));
        assert!(lines[1].contains("+0.200"));
    }
}
