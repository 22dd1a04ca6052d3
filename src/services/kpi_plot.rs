use std::path::Path;

use clap::ValueEnum;
use plotters::prelude::*;
use thiserror::Error;

use crate::domain::kpi::DerivedSeries;
use crate::services::kpi_engine::{compute_kpis, period_labels};
use crate::services::normalizer::normalize_all;
use crate::services::row_source::{RowSourceError, load_raw_rows_from_file};

#[derive(Error, Debug)]
pub enum KpiPlotError {
    #[error("failed to load rows: {0}")]
    ReadRows(#[from] RowSourceError),
    #[error("no periods to plot")]
    EmptyRows,
    #[error("failed to render kpi chart: {0}")]
    Plot(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartKind {
    Production,
    Collections,
    NewPatientsVsGoal,
    CollectionRatio,
    CancellationRate,
    NoShowRate,
    NetGrowth,
    TreatmentAcceptance,
    FillRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: &'static str,
    pub color: RGBColor,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: &'static str,
    pub style: ChartStyle,
    pub datasets: Vec<Dataset>,
}

fn dataset(label: &'static str, color: RGBColor, data: &[f64]) -> Dataset {
    Dataset {
        label,
        color,
        data: data.to_vec(),
    }
}

fn pct_dataset(label: &'static str, color: RGBColor, data: &[i64]) -> Dataset {
    Dataset {
        label,
        color,
        data: data.iter().map(|value| *value as f64).collect(),
    }
}

const BLUE: RGBColor = RGBColor(37, 99, 235);
const RED: RGBColor = RGBColor(239, 68, 68);
const GREEN: RGBColor = RGBColor(22, 163, 74);
const AMBER: RGBColor = RGBColor(245, 158, 11);
const LIME: RGBColor = RGBColor(34, 197, 94);
const GREY: RGBColor = RGBColor(163, 163, 163);
const PURPLE: RGBColor = RGBColor(147, 51, 234);
const ROSE: RGBColor = RGBColor(225, 29, 72);
const SKY: RGBColor = RGBColor(14, 165, 233);
const LIGHT_BLUE: RGBColor = RGBColor(59, 130, 246);
const EMERALD: RGBColor = RGBColor(16, 185, 129);

/// Which series a chart shows, with its title and style.
pub fn chart_spec(kind: ChartKind, series: &DerivedSeries) -> ChartSpec {
    let (title, style, datasets) = match kind {
        ChartKind::Production => (
            "Production",
            ChartStyle::Bar,
            vec![
                dataset("General", BLUE, &series.production_general),
                dataset("ORTHO", RED, &series.production_ortho),
            ],
        ),
        ChartKind::Collections => (
            "Collections",
            ChartStyle::Bar,
            vec![
                dataset("General", GREEN, &series.collections_general),
                dataset("ORTHO", AMBER, &series.collections_ortho),
            ],
        ),
        ChartKind::NewPatientsVsGoal => (
            "New Patients vs Goal",
            ChartStyle::Line,
            vec![
                dataset("New Patients", LIME, &series.new_patients),
                dataset("Goal", GREY, &series.new_patient_goal),
            ],
        ),
        ChartKind::CollectionRatio => (
            "Collection Ratio",
            ChartStyle::Line,
            vec![pct_dataset("Ratio %", PURPLE, &series.collection_ratio_pct)],
        ),
        ChartKind::CancellationRate => (
            "Cancellation Rate",
            ChartStyle::Line,
            vec![pct_dataset("Cancelled %", ROSE, &series.cancellation_rate_pct)],
        ),
        ChartKind::NoShowRate => (
            "No-Show Rate",
            ChartStyle::Line,
            vec![pct_dataset("No-Show %", SKY, &series.no_show_rate_pct)],
        ),
        ChartKind::NetGrowth => (
            "Net Patient Growth",
            ChartStyle::Line,
            vec![
                dataset("Net", LIME, &series.net_patient_growth),
                dataset("Goal", GREY, &series.new_patient_goal),
            ],
        ),
        ChartKind::TreatmentAcceptance => (
            "Treatment Acceptance",
            ChartStyle::Line,
            vec![pct_dataset("Acceptance %", LIGHT_BLUE, &series.treatment_acceptance_pct)],
        ),
        ChartKind::FillRate => (
            "Fill Rate",
            ChartStyle::Line,
            vec![pct_dataset("Fill Rate %", EMERALD, &series.fill_rate_pct)],
        ),
    };
    ChartSpec {
        title,
        style,
        datasets,
    }
}

/// Value range covering every dataset, always including zero.
pub fn y_range(datasets: &[Dataset]) -> (f64, f64) {
    let values = datasets.iter().flat_map(|set| set.data.iter().copied());
    let (min, max) = values.fold((0.0_f64, 0.0_f64), |(min, max), value| {
        (min.min(value), max.max(value))
    });
    let span = (max - min).max(1.0);
    let low = if min < 0.0 { min - span * 0.1 } else { 0.0 };
    (low, max + span * 0.1)
}

pub fn plot_kpi_chart_from_file(
    input_path: &str,
    output_path: &str,
    kind: ChartKind,
) -> Result<(), KpiPlotError> {
    let rows = normalize_all(&load_raw_rows_from_file(input_path)?);
    if rows.is_empty() {
        return Err(KpiPlotError::EmptyRows);
    }
    let labels = period_labels(&rows);
    let spec = chart_spec(kind, &compute_kpis(&rows).series);
    render_chart_png(Path::new(output_path), &labels, &spec)
}

fn render_chart_png(output_path: &Path, labels: &[String], spec: &ChartSpec) -> Result<(), KpiPlotError> {
    let periods = labels.len();
    if periods == 0 {
        return Ok(());
    }
    let (y_low, y_high) = y_range(&spec.datasets);

    let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| KpiPlotError::Plot(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(spec.title, ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(80)
        .build_cartesian_2d(0.0..periods as f64, y_low..y_high)
        .map_err(|e| KpiPlotError::Plot(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Period")
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .x_labels(periods.min(12).max(1))
        .x_label_formatter(&|value| {
            if *value < 0.0 {
                return String::new();
            }
            labels.get(*value as usize).cloned().unwrap_or_default()
        })
        .draw()
        .map_err(|e| KpiPlotError::Plot(e.to_string()))?;

    let group_width = 0.8 / spec.datasets.len().max(1) as f64;
    for (set_idx, set) in spec.datasets.iter().enumerate() {
        let color = set.color;
        match spec.style {
            ChartStyle::Bar => {
                let style = ShapeStyle::from(&color).filled();
                chart
                    .draw_series(set.data.iter().enumerate().map(|(idx, value)| {
                        let left = idx as f64 + 0.1 + set_idx as f64 * group_width;
                        Rectangle::new([(left, 0.0), (left + group_width, *value)], style)
                    }))
                    .map_err(|e| KpiPlotError::Plot(e.to_string()))?
                    .label(set.label)
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
            }
            ChartStyle::Line => {
                chart
                    .draw_series(LineSeries::new(
                        set.data
                            .iter()
                            .enumerate()
                            .map(|(idx, value)| (idx as f64 + 0.5, *value)),
                        color.stroke_width(2),
                    ))
                    .map_err(|e| KpiPlotError::Plot(e.to_string()))?
                    .label(set.label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], color));
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| KpiPlotError::Plot(e.to_string()))?;

    root.present()
        .map_err(|e| KpiPlotError::Plot(e.to_string()))?;
    Ok(())
}
