//! Plotters rendering sink
//!
//! Consumes the neutral figure representation and exports PNG bytes.
//! Drawing happens in an in-memory RGB buffer; the `image` crate encodes
//! the final PNG. The chart shape is chosen from the axis kinds: a date
//! x-axis gives the time-series layout, a category y-axis gives the
//! horizontal bar layout.

use chrono::{Duration, NaiveDate};
use plotters::coord::ranged1d::SegmentValue;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::Color as _;
use plotters::style::FontStyle;

use crate::error::DashboardError;
use crate::figure::{
    Annotation, AxisKind, Color, Figure, HAlign, Layer, LegendPosition, LineStyle,
};

const AXIS_GREY: RGBColor = RGBColor(120, 120, 120);
const GRID_GREY: RGBColor = RGBColor(225, 225, 225);
const LABEL_GREY: RGBColor = RGBColor(70, 70, 70);

/// Render a figure to PNG bytes at its configured pixel size
pub fn render_png(figure: &Figure) -> Result<Vec<u8>, DashboardError> {
    let (width, height) = (figure.width, figure.height);
    if width == 0 || height == 0 {
        return Err(DashboardError::render("figure has zero pixel size"));
    }

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(figure, &root)?;
        root.present().map_err(render_err)?;
    }

    let img = image::RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| DashboardError::render("bitmap buffer size mismatch"))?;
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(render_err)?;
    Ok(png)
}

fn render_err<E: std::fmt::Display>(err: E) -> DashboardError {
    DashboardError::render(err.to_string())
}

fn to_rgb(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn shape_style(style: &LineStyle) -> ShapeStyle {
    ShapeStyle::from(&to_rgb(style.color)).stroke_width(style.width)
}

fn legend_position(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
    }
}

fn annotation_font(annotation: &Annotation) -> TextStyle<'static> {
    let mut font = ("sans-serif", annotation.size as i32).into_font();
    if annotation.bold {
        font = font.style(FontStyle::Bold);
    }
    let hpos = match annotation.align {
        HAlign::Left => HPos::Left,
        HAlign::Center => HPos::Center,
    };
    font.color(&to_rgb(annotation.color))
        .pos(Pos::new(hpos, VPos::Center))
}

/// Per-line pixel offsets for stacked annotation text
fn annotation_lines(annotation: &Annotation) -> Vec<(String, (i32, i32))> {
    let line_height = annotation.size as i32 + 6;
    annotation
        .text
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let dy = annotation.offset.1 + i as i32 * line_height;
            (line.to_string(), (annotation.offset.0, dy))
        })
        .collect()
}

fn date_from_day(day: f64) -> Result<NaiveDate, DashboardError> {
    NaiveDate::from_num_days_from_ce_opt(day.round() as i32)
        .ok_or_else(|| DashboardError::invariant(format!("day number {day} is out of range")))
}

fn draw_figure(
    figure: &Figure,
    root: &DrawingArea<BitMapBackend, Shift>,
) -> Result<(), DashboardError> {
    root.fill(&WHITE).map_err(render_err)?;

    let mut area = root.clone();
    area = area
        .titled(
            &figure.title,
            ("sans-serif", 34)
                .into_font()
                .style(FontStyle::Bold)
                .color(&BLACK),
        )
        .map_err(render_err)?;
    if let Some(subtitle) = &figure.subtitle {
        area = area
            .titled(subtitle, ("sans-serif", 24).into_font().color(&LABEL_GREY))
            .map_err(render_err)?;
    }

    match (&figure.x_axis.kind, &figure.y_axis.kind) {
        (_, AxisKind::Category(names)) => draw_bar_chart(figure, names, &area),
        (AxisKind::Date, AxisKind::Linear) => draw_time_chart(figure, &area),
        (x, y) => Err(DashboardError::render(format!(
            "unsupported axis combination: {x:?} x, {y:?} y"
        ))),
    }
}

/// Extent of all x coordinates across the figure's layers
fn x_extent(figure: &Figure) -> Result<(f64, f64), DashboardError> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut track = |x: f64| {
        min = min.min(x);
        max = max.max(x);
    };
    for layer in &figure.layers {
        match layer {
            Layer::Line(line) => line.points.iter().for_each(|(x, _)| track(*x)),
            Layer::Band(band) => {
                band.lower.iter().for_each(|(x, _)| track(*x));
                band.upper.iter().for_each(|(x, _)| track(*x));
            }
            Layer::VLine(vline) => track(vline.x),
            _ => {}
        }
    }
    if min.is_finite() && max.is_finite() {
        Ok((min, max))
    } else {
        Err(DashboardError::invariant("figure contains no x data"))
    }
}

/// Extent of all y coordinates, used when no fixed y range is set
fn y_extent(figure: &Figure) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut track = |y: f64| {
        min = min.min(y);
        max = max.max(y);
    };
    for layer in &figure.layers {
        match layer {
            Layer::Line(line) => line.points.iter().for_each(|(_, y)| track(*y)),
            Layer::Band(band) => {
                band.lower.iter().for_each(|(_, y)| track(*y));
                band.upper.iter().for_each(|(_, y)| track(*y));
            }
            _ => {}
        }
    }
    if !(min.is_finite() && max.is_finite()) {
        return (0.0, 1.0);
    }
    let padding = ((max - min) * 0.1).max(1.0);
    (min - padding, max + padding)
}

fn draw_time_chart(
    figure: &Figure,
    area: &DrawingArea<BitMapBackend, Shift>,
) -> Result<(), DashboardError> {
    let (x_min, x_max) = x_extent(figure)?;
    let x_start = date_from_day(x_min)? - Duration::days(20);
    let x_end = date_from_day(x_max)? + Duration::days(20);
    let (y_min, y_max) = figure.y_axis.range.unwrap_or_else(|| y_extent(figure));

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_start..x_end, y_min..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(&figure.x_axis.label)
        .y_desc(&figure.y_axis.label)
        .x_labels(8)
        .y_labels(10)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y").to_string())
        .axis_style(ShapeStyle::from(&AXIS_GREY).stroke_width(1))
        .light_line_style(ShapeStyle::from(&GRID_GREY).stroke_width(1))
        .bold_line_style(ShapeStyle::from(&RGBColor(205, 205, 205)).stroke_width(1))
        .x_label_style(("sans-serif", 20).into_font().color(&LABEL_GREY))
        .y_label_style(("sans-serif", 20).into_font().color(&LABEL_GREY))
        .draw()
        .map_err(render_err)?;

    for layer in &figure.layers {
        match layer {
            Layer::Line(line) => {
                let mut points = Vec::with_capacity(line.points.len());
                for &(x, y) in &line.points {
                    points.push((date_from_day(x)?, y));
                }
                let style = shape_style(&line.style);
                let color = to_rgb(line.style.color);
                let anno = match line.style.dash {
                    Some((size, spacing)) => chart
                        .draw_series(DashedLineSeries::new(points, size, spacing, style))
                        .map_err(render_err)?,
                    None => chart
                        .draw_series(LineSeries::new(points, style))
                        .map_err(render_err)?,
                };
                if let Some(label) = &line.label {
                    let width = line.style.width;
                    anno.label(label).legend(move |(x, y)| {
                        PathElement::new(
                            vec![(x, y), (x + 24, y)],
                            ShapeStyle::from(&color).stroke_width(width),
                        )
                    });
                }
            }
            Layer::Band(band) => {
                if band.lower.len() != band.upper.len() {
                    return Err(DashboardError::invariant(format!(
                        "band bounds disagree: {} lower vs {} upper",
                        band.lower.len(),
                        band.upper.len()
                    )));
                }
                let mut polygon = Vec::with_capacity(band.lower.len() + band.upper.len());
                for &(x, y) in &band.upper {
                    polygon.push((date_from_day(x)?, y));
                }
                for &(x, y) in band.lower.iter().rev() {
                    polygon.push((date_from_day(x)?, y));
                }
                let fill = to_rgb(band.color).mix(band.opacity);
                let anno = chart
                    .draw_series(std::iter::once(Polygon::new(polygon, fill.filled())))
                    .map_err(render_err)?;
                if let Some(label) = &band.label {
                    anno.label(label).legend(move |(x, y)| {
                        Rectangle::new([(x, y - 7), (x + 24, y + 7)], fill.filled())
                    });
                }
            }
            Layer::VLine(vline) => {
                let x = date_from_day(vline.x)?;
                let points = vec![(x, y_min), (x, y_max)];
                let style = shape_style(&vline.style);
                match vline.style.dash {
                    Some((size, spacing)) => {
                        chart
                            .draw_series(DashedLineSeries::new(points, size, spacing, style))
                            .map_err(render_err)?;
                    }
                    None => {
                        chart
                            .draw_series(LineSeries::new(points, style))
                            .map_err(render_err)?;
                    }
                }
            }
            Layer::Annotation(annotation) => {
                let at = (date_from_day(annotation.x)?, annotation.y);
                let style = annotation_font(annotation);
                for (line, offset) in annotation_lines(annotation) {
                    let element = EmptyElement::at(at) + Text::new(line, offset, style.clone());
                    chart.plotting_area().draw(&element).map_err(render_err)?;
                }
            }
            Layer::HBars(_) => {
                return Err(DashboardError::render(
                    "bar layer requires a category axis",
                ));
            }
        }
    }

    chart
        .configure_series_labels()
        .position(legend_position(figure.legend))
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK.mix(0.4))
        .label_font(("sans-serif", 20).into_font().color(&BLACK))
        .draw()
        .map_err(render_err)?;

    Ok(())
}

fn draw_bar_chart(
    figure: &Figure,
    names: &[String],
    area: &DrawingArea<BitMapBackend, Shift>,
) -> Result<(), DashboardError> {
    let n = names.len();
    let max_value = figure
        .layers
        .iter()
        .filter_map(|l| match l {
            Layer::HBars(layer) => layer
                .bars
                .iter()
                .map(|b| b.value)
                .fold(None, |acc: Option<f64>, v| {
                    Some(acc.map_or(v, |a| a.max(v)))
                }),
            _ => None,
        })
        .fold(0.0f64, f64::max);
    let (x_min, x_max) = figure
        .x_axis
        .range
        .unwrap_or((0.0, (max_value * 1.15).max(1.0)));

    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(330)
        .build_cartesian_2d(x_min..x_max, (0..n).into_segmented())
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(&figure.x_axis.label)
        .y_desc(&figure.y_axis.label)
        .y_labels(n.max(1))
        .y_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) if *i < names.len() => {
                names[*i].clone()
            }
            _ => String::new(),
        })
        .axis_style(ShapeStyle::from(&AXIS_GREY).stroke_width(1))
        .light_line_style(ShapeStyle::from(&GRID_GREY).stroke_width(1))
        .x_label_style(("sans-serif", 20).into_font().color(&LABEL_GREY))
        .y_label_style(("sans-serif", 20).into_font().color(&LABEL_GREY))
        .draw()
        .map_err(render_err)?;

    for layer in &figure.layers {
        match layer {
            Layer::HBars(bar_layer) => {
                if bar_layer.bars.len() != n {
                    return Err(DashboardError::invariant(format!(
                        "{} bars for {} categories",
                        bar_layer.bars.len(),
                        n
                    )));
                }
                chart
                    .draw_series(bar_layer.bars.iter().enumerate().map(|(i, bar)| {
                        let mut rect = Rectangle::new(
                            [
                                (0.0, SegmentValue::Exact(i)),
                                (bar.value, SegmentValue::Exact(i + 1)),
                            ],
                            to_rgb(bar.color).filled(),
                        );
                        rect.set_margin(8, 8, 0, 0);
                        rect
                    }))
                    .map_err(render_err)?;

                let outer_style = ("sans-serif", 20)
                    .into_font()
                    .style(FontStyle::Bold)
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Left, VPos::Center));
                chart
                    .draw_series(bar_layer.bars.iter().enumerate().map(|(i, bar)| {
                        Text::new(
                            bar.outer_label.clone(),
                            (bar.value + 0.8, SegmentValue::CenterOf(i)),
                            outer_style.clone(),
                        )
                    }))
                    .map_err(render_err)?;

                let inner_style = ("sans-serif", 16)
                    .into_font()
                    .color(&WHITE)
                    .pos(Pos::new(HPos::Right, VPos::Center));
                chart
                    .draw_series(bar_layer.bars.iter().enumerate().filter_map(|(i, bar)| {
                        // Skip bars too short to hold the label
                        let label = bar.inner_label.as_ref()?;
                        if bar.value < 5.0 {
                            return None;
                        }
                        Some(Text::new(
                            label.clone(),
                            (bar.value - 0.8, SegmentValue::CenterOf(i)),
                            inner_style.clone(),
                        ))
                    }))
                    .map_err(render_err)?;
            }
            Layer::VLine(vline) => {
                let points = vec![
                    (vline.x, SegmentValue::Exact(0)),
                    (vline.x, SegmentValue::Exact(n)),
                ];
                let style = shape_style(&vline.style);
                match vline.style.dash {
                    Some((size, spacing)) => {
                        chart
                            .draw_series(DashedLineSeries::new(points, size, spacing, style))
                            .map_err(render_err)?;
                    }
                    None => {
                        chart
                            .draw_series(LineSeries::new(points, style))
                            .map_err(render_err)?;
                    }
                }
            }
            Layer::Annotation(annotation) => {
                let row = (annotation.y.round().max(0.0) as usize).min(n.saturating_sub(1));
                let at = (annotation.x, SegmentValue::CenterOf(row));
                let style = annotation_font(annotation);
                for (line, offset) in annotation_lines(annotation) {
                    let element =
                        EmptyElement::at(at.clone()) + Text::new(line, offset, style.clone());
                    chart.plotting_area().draw(&element).map_err(render_err)?;
                }
            }
            other => {
                return Err(DashboardError::render(format!(
                    "layer {other:?} is not supported on a category axis"
                )));
            }
        }
    }

    for entry in &figure.legend_entries {
        let color = to_rgb(entry.color);
        chart
            .draw_series(std::iter::empty::<Rectangle<(f64, SegmentValue<usize>)>>())
            .map_err(render_err)?
            .label(&entry.label)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 7), (x + 18, y + 7)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .position(legend_position(figure.legend))
        .background_style(&WHITE.mix(0.9))
        .border_style(&BLACK.mix(0.4))
        .label_font(("sans-serif", 18).into_font().color(&BLACK))
        .draw()
        .map_err(render_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::churn::{churn_figure, ChurnTable};
    use crate::figure::{Axis, BandLayer, LegendPosition};
    use crate::forecast::{forecast_figure, ForecastTemplate};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_forecast_figure_renders_png() {
        let (history, forecast) = ForecastTemplate::new().generate().expect("generation failed");
        let png = render_png(&forecast_figure(&history, &forecast)).expect("render failed");
        assert!(png.len() > PNG_SIGNATURE.len());
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_churn_figure_renders_png() {
        let ranked = ChurnTable::new().ranked().expect("ranking failed");
        let png = render_png(&churn_figure(&ranked)).expect("render failed");
        assert!(png.len() > PNG_SIGNATURE.len());
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_band_length_mismatch_is_invariant_violation() {
        let figure = Figure {
            title: "broken".to_string(),
            subtitle: None,
            width: 400,
            height: 300,
            x_axis: Axis {
                label: String::new(),
                range: None,
                kind: AxisKind::Date,
            },
            y_axis: Axis {
                label: String::new(),
                range: Some((0.0, 10.0)),
                kind: AxisKind::Linear,
            },
            layers: vec![Layer::Band(BandLayer {
                label: None,
                color: Color::new(0, 0, 0),
                opacity: 0.2,
                lower: vec![(737000.0, 1.0), (737030.0, 1.0)],
                upper: vec![(737000.0, 2.0)],
            })],
            legend_entries: Vec::new(),
            legend: LegendPosition::UpperLeft,
        };

        let result = render_png(&figure);
        assert!(matches!(
            result,
            Err(DashboardError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_bar_count_mismatch_is_invariant_violation() {
        let ranked = ChurnTable::new().ranked().expect("ranking failed");
        let mut figure = churn_figure(&ranked);
        if let AxisKind::Category(names) = &mut figure.y_axis.kind {
            names.pop();
        }

        let result = render_png(&figure);
        assert!(matches!(
            result,
            Err(DashboardError::InvariantViolation(_))
        ));
    }
}
