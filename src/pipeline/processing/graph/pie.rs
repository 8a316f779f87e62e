use std::f64::consts::TAU;

use serde::Serialize;

use crate::types::Stance;

/// One stance's share of a full turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub stance: Stance,
    pub color: &'static str,
    pub count: f64,
    /// Radians, measured from angle 0
    pub start_angle: f64,
    pub sweep: f64,
}

impl PieSlice {
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }
}

/// Slice angles for the three stance counts, in support/neutral/opposition order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn from_counts(apoio: f64, neutralidade: f64, oposicao: f64) -> Self {
        let counts = [apoio, neutralidade, oposicao];
        let total = zero_safe_total(&counts);

        let mut start_angle = 0.0;
        let slices = Stance::ORDER
            .iter()
            .zip(counts)
            .map(|(&stance, count)| {
                let sweep = count / total * TAU;
                let slice = PieSlice {
                    stance,
                    color: stance.color(),
                    count,
                    start_angle,
                    sweep,
                };
                start_angle += sweep;
                slice
            })
            .collect();

        Self { slices }
    }

    /// Sum of the counts, or 1 when they sum to 0
    pub fn total(&self) -> f64 {
        let counts: Vec<f64> = self.slices.iter().map(|s| s.count).collect();
        zero_safe_total(&counts)
    }

    pub fn slice(&self, stance: Stance) -> Option<&PieSlice> {
        self.slices.iter().find(|s| s.stance == stance)
    }

    /// Share of each stance in percent, same order as the slices
    pub fn percentages(&self) -> Vec<(Stance, f64)> {
        let total = self.total();
        self.slices
            .iter()
            .map(|s| (s.stance, s.count / total * 100.0))
            .collect()
    }
}

fn zero_safe_total(counts: &[f64]) -> f64 {
    let sum: f64 = counts.iter().sum();
    if sum == 0.0 {
        1.0
    } else {
        sum
    }
}

/// `75.0%`
pub fn format_percentage(percent: f64) -> String {
    format!("{:.1}%", percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_follow_counts_in_fixed_order() {
        let pie = PieChart::from_counts(3.0, 1.0, 0.0);
        let sweeps: Vec<f64> = pie.slices.iter().map(|s| s.sweep).collect();
        assert_eq!(sweeps, vec![0.75 * TAU, 0.25 * TAU, 0.0]);

        let sum: f64 = sweeps.iter().sum();
        assert!((sum - TAU).abs() < 1e-12);

        assert_eq!(pie.slices[0].start_angle, 0.0);
        assert_eq!(pie.slices[1].start_angle, pie.slices[0].end_angle());
        assert_eq!(pie.slices[2].end_angle(), pie.slices[1].end_angle());
    }

    #[test]
    fn fixed_stance_colors() {
        let pie = PieChart::from_counts(1.0, 1.0, 1.0);
        let colors: Vec<&str> = pie.slices.iter().map(|s| s.color).collect();
        assert_eq!(colors, vec!["#00FF66", "#FFD43B", "#FF3B30"]);
    }

    #[test]
    fn all_zero_counts_give_empty_slices() {
        let pie = PieChart::from_counts(0.0, 0.0, 0.0);
        assert_eq!(pie.total(), 1.0);
        assert!(pie.slices.iter().all(|s| s.sweep == 0.0));
        assert!(pie.percentages().iter().all(|(_, p)| *p == 0.0));
    }

    #[test]
    fn percentages_render_with_one_decimal() {
        let pie = PieChart::from_counts(3.0, 1.0, 0.0);
        let rendered: Vec<String> = pie
            .percentages()
            .into_iter()
            .map(|(_, p)| format_percentage(p))
            .collect();
        assert_eq!(rendered, vec!["75.0%", "25.0%", "0.0%"]);
        assert_eq!(format_percentage(100.0 / 3.0), "33.3%");
    }

    #[test]
    fn slice_lookup_by_stance() {
        let pie = PieChart::from_counts(2.0, 0.0, 2.0);
        assert_eq!(pie.slice(Stance::Opposition).unwrap().sweep, TAU / 2.0);
    }
}
