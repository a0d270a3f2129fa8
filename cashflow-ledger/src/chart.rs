//! Monthly line chart: spend, income and net cashflow per month.

use cashflow_core::MonthlySummary;
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{LedgerError, Result};

const SIZE: (u32, u32) = (1800, 800);

/// Named y-values, one per month, in chart order.
pub fn chart_series(summaries: &[MonthlySummary]) -> Vec<(&'static str, Vec<f64>)> {
    let values = |f: fn(&MonthlySummary) -> Decimal| -> Vec<f64> {
        summaries
            .iter()
            .map(|s| f(s).to_f64().unwrap_or_default())
            .collect()
    };
    vec![
        ("Spend", values(|s| s.spend)),
        ("Income", values(|s| s.income)),
        ("Net cashflow", values(|s| s.net_cashflow)),
    ]
}

/// Y range covering every value and zero, padded by 10%.
pub fn value_bounds(series: &[(&str, Vec<f64>)]) -> (f64, f64) {
    let (lo, hi) = series
        .iter()
        .flat_map(|(_, v)| v.iter().copied())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = ((hi - lo) * 0.1).max(1.0);
    (lo - pad, hi + pad)
}

pub fn plot_monthly(summaries: &[MonthlySummary], path: &Path) -> Result<()> {
    if summaries.is_empty() {
        return Err(LedgerError::EmptyReport);
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(LedgerError::io("create", dir))?;
    }

    render(summaries, path).map_err(|e| LedgerError::Chart {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    info!(chart = %path.display(), months = summaries.len(), "wrote monthly chart");
    Ok(())
}

fn render(summaries: &[MonthlySummary], path: &Path) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let months: Vec<&str> = summaries.iter().map(|s| s.month.as_str()).collect();
    let series = chart_series(summaries);
    let (lo, hi) = value_bounds(&series);
    let last = (months.len() as i32 - 1).max(1);

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Monthly cashflow", ("sans-serif", 36))
        .margin(30)
        .x_label_area_size(90)
        .y_label_area_size(100)
        .build_cartesian_2d(0..last, lo..hi)?;

    let label = |i: &i32| {
        usize::try_from(*i)
            .ok()
            .and_then(|i| months.get(i))
            .map(|m| m.to_string())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_labels(months.len().max(2))
        .x_label_formatter(&label)
        .x_label_style(("sans-serif", 16))
        .y_desc("USD")
        .draw()?;

    chart.draw_series(LineSeries::new(
        [(0, 0.0), (last, 0.0)],
        BLACK.mix(0.3).stroke_width(1),
    ))?;

    let colors = [RED, GREEN, BLUE];
    for ((name, values), color) in series.iter().zip(colors) {
        let points: Vec<(i32, f64)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as i32, *v))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(3)))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
        chart.draw_series(points.iter().map(|p| Circle::new(*p, 5, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
