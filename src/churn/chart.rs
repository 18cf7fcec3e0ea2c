//! Figure composition for the churn diagnostic chart

use super::{ChurnFactor, RiskTier, OVERALL_CHURN_RATE_PCT};
use crate::figure::{
    Annotation, Axis, AxisKind, Bar, BarLayer, Color, Figure, HAlign, Layer, LegendEntry,
    LegendPosition, LineStyle, VLineLayer,
};

const HIGH_RED: Color = Color::new(0xE9, 0x4F, 0x37);
const MEDIUM_ORANGE: Color = Color::new(0xF3, 0x92, 0x37);
const LOW_MEDIUM_YELLOW: Color = Color::new(0xF9, 0xC8, 0x46);
const LOW_GREEN: Color = Color::new(0x2E, 0x8B, 0x57);
const MARKER_DARK: Color = Color::new(0x33, 0x33, 0x33);

/// 12×8in at 150dpi
const WIDTH: u32 = 1800;
const HEIGHT: u32 = 1200;

fn tier_color(tier: RiskTier) -> Color {
    match tier {
        RiskTier::High => HIGH_RED,
        RiskTier::Medium => MEDIUM_ORANGE,
        RiskTier::LowMedium => LOW_MEDIUM_YELLOW,
        RiskTier::Low => LOW_GREEN,
    }
}

/// Group digits with thousands separators ("3875" -> "3,875")
fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.chars().rev().collect()
}

/// Compose the churn figure: one tier-colored horizontal bar per ranked
/// factor, the overall-rate reference line and the four-tier legend.
/// `ranked` must already be sorted ascending by churn rate.
pub fn churn_figure(ranked: &[ChurnFactor]) -> Figure {
    let names: Vec<String> = ranked.iter().map(|f| f.name.clone()).collect();

    let bars: Vec<Bar> = ranked
        .iter()
        .map(|f| Bar {
            value: f.churn_rate,
            color: tier_color(f.risk_tier()),
            outer_label: format!("{:.1}%", f.churn_rate),
            inner_label: Some(format!("n={}", group_thousands(f.sample_size))),
        })
        .collect();

    let layers = vec![
        Layer::HBars(BarLayer { bars }),
        Layer::VLine(VLineLayer {
            x: OVERALL_CHURN_RATE_PCT,
            style: LineStyle {
                color: MARKER_DARK,
                width: 2,
                dash: Some((8, 5)),
            },
        }),
        Layer::Annotation(Annotation {
            text: format!("Overall: {OVERALL_CHURN_RATE_PCT}%"),
            x: OVERALL_CHURN_RATE_PCT + 0.5,
            y: (ranked.len().saturating_sub(1)) as f64,
            offset: (0, 0),
            color: MARKER_DARK,
            size: 18,
            bold: true,
            align: HAlign::Left,
        }),
    ];

    let legend_entries = [RiskTier::High, RiskTier::Medium, RiskTier::LowMedium, RiskTier::Low]
        .into_iter()
        .map(|tier| LegendEntry {
            label: tier.label().to_string(),
            color: tier_color(tier),
        })
        .collect();

    Figure {
        title: "Diagnostic Analysis: Customer Churn Rate by Segment".to_string(),
        subtitle: Some("Identifying Key Drivers of 15% Churn Increase".to_string()),
        width: WIDTH,
        height: HEIGHT,
        x_axis: Axis {
            label: "Churn Rate (%)".to_string(),
            range: Some((0.0, 52.0)),
            kind: AxisKind::Linear,
        },
        y_axis: Axis {
            label: String::new(),
            range: None,
            kind: AxisKind::Category(names),
        },
        layers,
        legend_entries,
        legend: LegendPosition::LowerRight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::churn::ChurnTable;

    fn sample_figure() -> Figure {
        let ranked = ChurnTable::new().ranked().expect("ranking failed");
        churn_figure(&ranked)
    }

    #[test]
    fn test_bars_follow_ranked_order() {
        let figure = sample_figure();

        let bars = figure
            .layers
            .iter()
            .find_map(|l| match l {
                Layer::HBars(layer) => Some(&layer.bars),
                _ => None,
            })
            .expect("bar layer missing");
        assert_eq!(bars.len(), 12);
        for pair in bars.windows(2) {
            assert!(pair[0].value <= pair[1].value);
        }

        // Categories line up with bars
        match &figure.y_axis.kind {
            AxisKind::Category(names) => {
                assert_eq!(names.len(), bars.len());
                assert_eq!(names[0], "2-year contract");
                assert_eq!(names[11], "Month-to-month contract");
            }
            other => panic!("expected category axis, got {other:?}"),
        }
    }

    #[test]
    fn test_bar_colors_and_labels() {
        let figure = sample_figure();
        let bars = figure
            .layers
            .iter()
            .find_map(|l| match l {
                Layer::HBars(layer) => Some(&layer.bars),
                _ => None,
            })
            .expect("bar layer missing");

        // Lowest rate is low risk, highest is high risk
        assert_eq!(bars[0].color, LOW_GREEN);
        assert_eq!(bars[11].color, HIGH_RED);
        assert_eq!(bars[11].outer_label, "42.7%");
        assert_eq!(bars[11].inner_label.as_deref(), Some("n=3,875"));
    }

    #[test]
    fn test_reference_line_and_legend() {
        let figure = sample_figure();

        let vline = figure
            .layers
            .iter()
            .find_map(|l| match l {
                Layer::VLine(v) => Some(v),
                _ => None,
            })
            .expect("reference line missing");
        assert_eq!(vline.x, OVERALL_CHURN_RATE_PCT);

        assert_eq!(figure.legend_entries.len(), 4);
        assert_eq!(figure.legend_entries[0].label, "High Risk (≥30%)");
        assert_eq!(figure.legend, LegendPosition::LowerRight);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(892), "892");
        assert_eq!(group_thousands(3875), "3,875");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
