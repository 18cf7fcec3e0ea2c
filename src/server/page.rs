//! Static HTML page composer
//!
//! Produces a single self-contained document with both chart images
//! inlined as base64 data URIs. No external assets.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Compose the dashboard page around the two rendered PNG payloads
pub fn render_page(forecast_png: &[u8], churn_png: &[u8]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Data Analysis Visualisations</title>
    <style>
        body {{ font-family: 'Segoe UI', sans-serif; background: linear-gradient(135deg, #1a1a2e, #16213e); min-height: 100vh; padding: 40px 20px; margin: 0; }}
        .container {{ max-width: 1400px; margin: 0 auto; }}
        h1 {{ color: white; text-align: center; margin-bottom: 40px; }}
        .chart-section {{ background: white; border-radius: 16px; padding: 30px; margin-bottom: 40px; box-shadow: 0 20px 60px rgba(0,0,0,0.3); }}
        .chart-title {{ font-size: 1.4rem; color: #333; margin-bottom: 20px; }}
        img {{ max-width: 100%; border-radius: 8px; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Data Analysis Visualisations</h1>
        <section class="chart-section">
            <h2 class="chart-title">Scenario 1: Retail Holiday Demand Forecasting</h2>
            <img src="data:image/png;base64,{forecast_chart}" alt="Sales forecast chart">
        </section>
        <section class="chart-section">
            <h2 class="chart-title">Scenario 2: Telecom Customer Churn Analysis</h2>
            <img src="data:image/png;base64,{churn_chart}" alt="Churn diagnostic chart">
        </section>
    </div>
</body>
</html>
"#,
        forecast_chart = STANDARD.encode(forecast_png),
        churn_chart = STANDARD.encode(churn_png),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_embeds_both_payloads() {
        let page = render_page(b"first-image", b"second-image");

        assert_eq!(page.matches("data:image/png;base64,").count(), 2);
        assert!(page.contains(&STANDARD.encode(b"first-image")));
        assert!(page.contains(&STANDARD.encode(b"second-image")));
        assert!(page.starts_with("<!DOCTYPE html>"));
    }
}
