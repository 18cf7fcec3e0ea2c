//! Figure composition for the demand-forecast chart

use chrono::Datelike;

use super::{ForecastSeries, HistoricalSeries};
use crate::figure::{
    date_to_day, Annotation, Axis, AxisKind, BandLayer, Color, Figure, HAlign, Layer,
    LegendPosition, LineLayer, LineStyle, VLineLayer,
};

const HISTORICAL_BLUE: Color = Color::new(0x2E, 0x86, 0xAB);
const FORECAST_RED: Color = Color::new(0xE9, 0x4F, 0x37);
const MARKER_GREY: Color = Color::new(0x66, 0x66, 0x66);

/// 14×7in at 150dpi
const WIDTH: u32 = 2100;
const HEIGHT: u32 = 1050;

/// Compose the forecast figure: historical line, dashed forecast line,
/// shaded confidence band, end-of-history marker and fixed annotations.
pub fn forecast_figure(history: &HistoricalSeries, forecast: &ForecastSeries) -> Figure {
    let historical_points: Vec<(f64, f64)> = history
        .points
        .iter()
        .map(|p| (date_to_day(p.date), p.value))
        .collect();
    let forecast_points: Vec<(f64, f64)> = forecast
        .points
        .iter()
        .map(|p| (date_to_day(p.date), p.predicted))
        .collect();
    let lower: Vec<(f64, f64)> = forecast
        .points
        .iter()
        .map(|p| (date_to_day(p.date), p.lower))
        .collect();
    let upper: Vec<(f64, f64)> = forecast
        .points
        .iter()
        .map(|p| (date_to_day(p.date), p.upper))
        .collect();

    let mut layers = vec![
        Layer::Band(BandLayer {
            label: Some("95% Confidence Interval".to_string()),
            color: FORECAST_RED,
            opacity: 0.2,
            lower,
            upper,
        }),
        Layer::Line(LineLayer {
            label: Some("Historical Sales (Electronics)".to_string()),
            style: LineStyle {
                color: HISTORICAL_BLUE,
                width: 3,
                dash: None,
            },
            points: historical_points,
        }),
        Layer::Line(LineLayer {
            label: Some("Forecast".to_string()),
            style: LineStyle {
                color: FORECAST_RED,
                width: 3,
                dash: Some((10, 6)),
            },
            points: forecast_points,
        }),
    ];

    // Divider between observed and predicted months
    if let Some(last) = history.last_date() {
        layers.push(Layer::VLine(VLineLayer {
            x: date_to_day(last),
            style: LineStyle {
                color: MARKER_GREY,
                width: 2,
                dash: Some((3, 5)),
            },
        }));
    }

    // Flag the holiday peak on each historical December
    for point in history.points.iter().filter(|p| p.date.month() == 12) {
        layers.push(Layer::Annotation(Annotation {
            text: "Holiday\nPeak".to_string(),
            x: date_to_day(point.date),
            y: point.value,
            offset: (0, -80),
            color: MARKER_GREY,
            size: 16,
            bold: false,
            align: HAlign::Center,
        }));
    }

    // Call out the final predicted peak with its band width
    if let Some(peak) = forecast.points.last() {
        layers.push(Layer::Annotation(Annotation {
            text: format!(
                "Predicted Peak:\n£{:.0}k ± £{:.0}k",
                peak.predicted.round(),
                peak.half_width().floor()
            ),
            x: date_to_day(peak.date),
            y: peak.predicted,
            offset: (-150, -140),
            color: FORECAST_RED,
            size: 20,
            bold: true,
            align: HAlign::Center,
        }));
    }

    Figure {
        title: "Time-Series Sales Forecast: Electronics Category".to_string(),
        subtitle: Some("Predictive Analysis for Holiday Demand Planning".to_string()),
        width: WIDTH,
        height: HEIGHT,
        x_axis: Axis {
            label: "Date".to_string(),
            range: None,
            kind: AxisKind::Date,
        },
        y_axis: Axis {
            label: "Sales (£000s)".to_string(),
            range: Some((40.0, 280.0)),
            kind: AxisKind::Linear,
        },
        layers,
        legend_entries: Vec::new(),
        legend: LegendPosition::UpperLeft,
    }
}
