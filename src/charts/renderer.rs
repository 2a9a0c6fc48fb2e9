//! Static Chart Renderer
//! Writes the dashboard's rental charts as PNG files with plotters.
//!
//! Layout of every image:
//! 1. Caption centered on top
//! 2. Category axis at the bottom, value axis on the left
//! 3. Bars (or a marked line) in data order

use crate::charts::count_points;
use crate::report::DashboardSnapshot;
use plotters::prelude::*;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const BAR: RGBColor = RGBColor(114, 188, 212);
const LINE: RGBColor = RGBColor(52, 152, 219);
const IMAGE_SIZE: (u32, u32) = (1200, 700);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing error: {0}")]
    Draw(String),
}

fn draw_err<E: Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the season and month charts of a snapshot into `dir`.
    /// Returns the written files.
    pub fn export_snapshot(
        snapshot: &DashboardSnapshot,
        dir: &Path,
        season_label: impl Fn(i64) -> String,
        month_label: impl Fn(i64) -> String,
    ) -> Result<Vec<PathBuf>, RenderError> {
        let season = count_points(&snapshot.season_total, season_label);
        let month = count_points(&snapshot.month_registered, month_label);

        let charts = [
            (
                "season_total_bar.png",
                "Rentals per season",
                "Season",
                "Rentals",
                &season,
                false,
            ),
            (
                "season_total_line.png",
                "Rentals per season",
                "Season",
                "Rentals",
                &season,
                true,
            ),
            (
                "month_registered_bar.png",
                "Registered users per month",
                "Month",
                "Registered users",
                &month,
                false,
            ),
            (
                "month_registered_line.png",
                "Registered users per month",
                "Month",
                "Registered users",
                &month,
                true,
            ),
        ];

        let mut written = Vec::with_capacity(charts.len());
        for (file, title, x_desc, y_desc, data, as_line) in charts {
            let path = dir.join(file);
            if as_line {
                Self::render_line_chart(&path, title, x_desc, y_desc, data)?;
            } else {
                Self::render_bar_chart(&path, title, x_desc, y_desc, data)?;
            }
            written.push(path);
        }

        info!(dir = %dir.display(), files = written.len(), "exported chart images");
        Ok(written)
    }

    fn y_max(data: &[(String, f64)]) -> f64 {
        let max = data.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    /// Bar chart with one bar per labelled value.
    pub fn render_bar_chart(
        path: &Path,
        title: &str,
        x_desc: &str,
        y_desc: &str,
        data: &[(String, f64)],
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, IMAGE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let n = data.len().max(1);
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 32))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d((0usize..n).into_segmented(), 0f64..Self::y_max(data))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => {
                    data.get(*i).map(|(l, _)| l.clone()).unwrap_or_default()
                }
                _ => String::new(),
            })
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR.filled())
                    .margin(15)
                    .data(data.iter().enumerate().map(|(i, (_, v))| (i, *v))),
            )
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Line chart with a circle marker on every point.
    pub fn render_line_chart(
        path: &Path,
        title: &str,
        x_desc: &str,
        y_desc: &str,
        data: &[(String, f64)],
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, IMAGE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let last = data.len().saturating_sub(1).max(1) as f64;
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 32))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(-0.5f64..last + 0.5, 0f64..Self::y_max(data))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .x_labels(data.len().max(2))
            .x_label_formatter(&|v| {
                if (v - v.round()).abs() > 1e-6 || *v < 0.0 {
                    return String::new();
                }
                data.get(v.round() as usize)
                    .map(|(l, _)| l.clone())
                    .unwrap_or_default()
            })
            .draw()
            .map_err(draw_err)?;

        let points: Vec<(f64, f64)> = data
            .iter()
            .enumerate()
            .map(|(i, (_, v))| (i as f64, *v))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), LINE.stroke_width(3)))
            .map_err(draw_err)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 6, LINE.filled())),
            )
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_max_has_headroom() {
        let data = vec![("a".to_string(), 10.0), ("b".to_string(), 20.0)];
        assert!((StaticChartRenderer::y_max(&data) - 22.0).abs() < 1e-9);
        assert_eq!(StaticChartRenderer::y_max(&[]), 1.0);
    }
}
