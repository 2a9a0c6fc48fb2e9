//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, BAR_COLOR, PALETTE};
pub use renderer::{RenderError, StaticChartRenderer};

use std::collections::BTreeMap;

/// Turn keyed totals into labelled chart points, keeping key order.
pub fn chart_points<V: Copy + Into<f64>>(
    totals: &BTreeMap<i64, V>,
    label: impl Fn(i64) -> String,
) -> Vec<(String, f64)> {
    totals
        .iter()
        .map(|(&k, &v)| (label(k), v.into()))
        .collect()
}

/// Same as [`chart_points`] for integer totals.
pub fn count_points(
    totals: &BTreeMap<i64, i64>,
    label: impl Fn(i64) -> String,
) -> Vec<(String, f64)> {
    totals
        .iter()
        .map(|(&k, &v)| (label(k), v as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_points_keep_key_order() {
        let totals = BTreeMap::from([(3, 30), (1, 10), (2, 20)]);
        let points = count_points(&totals, |k| format!("S{}", k));
        assert_eq!(
            points,
            vec![
                ("S1".to_string(), 10.0),
                ("S2".to_string(), 20.0),
                ("S3".to_string(), 30.0)
            ]
        );
    }

    #[test]
    fn test_chart_points_for_shares() {
        let shares = BTreeMap::from([(8, 60.5f64), (7, 39.5)]);
        let points = chart_points(&shares, |k| k.to_string());
        assert_eq!(points[0], ("7".to_string(), 39.5));
        assert_eq!(points[1], ("8".to_string(), 60.5));
    }
}
