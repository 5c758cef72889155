//! SVG rendering for the PnL time series and the correlation heatmap.

use chrono::NaiveDate;

use crate::domain::aggregate::Summary;
use crate::domain::correlation::CorrelationMatrix;

pub const CHART_WIDTH: f64 = 1120.0;
pub const CHART_HEIGHT: f64 = 480.0;
pub const MARGIN_TOP: f64 = 50.0;
pub const MARGIN_RIGHT: f64 = 190.0;
pub const MARGIN_BOTTOM: f64 = 90.0;
pub const MARGIN_LEFT: f64 = 90.0;

const HEATMAP_CELL: f64 = 120.0;
const HEATMAP_MARGIN_LEFT: f64 = 140.0;
const HEATMAP_MARGIN_TOP: f64 = 60.0;
const HEATMAP_MARGIN_BOTTOM: f64 = 120.0;
const HEATMAP_LEGEND: f64 = 90.0;

/// Series colours, cycled by category index.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn svg_open(width: f64, height: f64, title: &str) -> String {
    let mut svg = format!(
        r##"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" font-family="sans-serif">"##,
        w = width,
        h = height
    );
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"28\" text-anchor=\"middle\" font-size=\"16\" fill=\"#222\">{}</text>\n",
        width / 2.0,
        escape_xml(title)
    ));
    svg
}

/// Axis lines plus x/y axis labels for a plot area.
pub fn svg_axes(width: f64, height: f64, x_label: &str, y_label: &str) -> String {
    let mut svg = String::new();
    let bottom = height - MARGIN_BOTTOM;
    svg.push_str(&format!(
        "  <line x1=\"{l}\" y1=\"{t}\" x2=\"{l}\" y2=\"{b}\" stroke=\"#444\" stroke-width=\"1\"/>\n",
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = bottom
    ));
    svg.push_str(&format!(
        "  <line x1=\"{l}\" y1=\"{b}\" x2=\"{r}\" y2=\"{b}\" stroke=\"#444\" stroke-width=\"1\"/>\n",
        l = MARGIN_LEFT,
        b = bottom,
        r = width - MARGIN_RIGHT
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"13\" fill=\"#222\">{}</text>\n",
        MARGIN_LEFT + (width - MARGIN_LEFT - MARGIN_RIGHT) / 2.0,
        height - 15.0,
        escape_xml(x_label)
    ));
    svg.push_str(&format!(
        "  <text x=\"20\" y=\"{y}\" text-anchor=\"middle\" font-size=\"13\" fill=\"#222\" transform=\"rotate(-90 20 {y})\">{label}</text>\n",
        y = MARGIN_TOP + (height - MARGIN_TOP - MARGIN_BOTTOM) / 2.0,
        label = escape_xml(y_label)
    ));
    svg
}

/// Five evenly spaced y-axis ticks with grid lines between `min` and `max`.
pub fn svg_y_ticks(width: f64, height: f64, min: f64, max: f64) -> String {
    let plot_height = height - MARGIN_TOP - MARGIN_BOTTOM;
    let mut svg = String::new();
    for i in 0..=4 {
        let frac = i as f64 / 4.0;
        let value = min + (max - min) * frac;
        let y = height - MARGIN_BOTTOM - frac * plot_height;
        svg.push_str(&format!(
            "  <line x1=\"{}\" y1=\"{y:.1}\" x2=\"{}\" y2=\"{y:.1}\" stroke=\"#eee\" stroke-width=\"1\"/>\n",
            MARGIN_LEFT,
            width - MARGIN_RIGHT,
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            MARGIN_LEFT - 6.0,
            y + 3.0,
            fmt_tick(value)
        ));
    }
    svg
}

pub fn fmt_tick(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{:.0}", value)
    } else if value.abs() >= 10.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Value range padded so a flat series still gets a visible band.
pub fn padded_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let pad = ((max - min) * 0.05).max(if max == min { 1.0 } else { 0.0 });
    Some((min - pad, max + pad))
}

/// Legend box listing `entries` with their palette colours.
pub fn svg_legend(width: f64, title: &str, entries: &[&str]) -> String {
    let x = width - MARGIN_RIGHT + 20.0;
    let mut svg = format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"12\" font-weight=\"bold\" fill=\"#222\">{}</text>\n",
        x,
        MARGIN_TOP + 10.0,
        escape_xml(title)
    );
    for (i, entry) in entries.iter().enumerate() {
        let y = MARGIN_TOP + 30.0 + i as f64 * 20.0;
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"12\" height=\"12\" fill=\"{}\"/>\n",
            x,
            y - 10.0,
            palette_color(i)
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"#222\">{}</text>\n",
            x + 18.0,
            y,
            escape_xml(entry)
        ));
    }
    svg
}

/// Line chart of summed PnL per date, one line per classification.
///
/// Returns an empty string when the summary has no rows.
pub fn generate_pnl_timeline_svg(summary: &Summary) -> String {
    if summary.records.is_empty() {
        return String::new();
    }

    let classes = summary.classifications();
    let first_date = summary.records.iter().map(|r| r.date).min();
    let last_date = summary.records.iter().map(|r| r.date).max();
    let (Some(first_date), Some(last_date)) = (first_date, last_date) else {
        return String::new();
    };
    let Some((min_pnl, max_pnl)) = padded_range(summary.records.iter().map(|r| r.closed_pnl))
    else {
        return String::new();
    };

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let span_days = (last_date - first_date).num_days().max(1) as f64;

    let x_scale = |d: NaiveDate| -> f64 {
        let offset = (d - first_date).num_days() as f64;
        if first_date == last_date {
            MARGIN_LEFT + plot_width / 2.0
        } else {
            MARGIN_LEFT + offset / span_days * plot_width
        }
    };
    let y_scale =
        |v: f64| -> f64 { MARGIN_TOP + plot_height - (v - min_pnl) / (max_pnl - min_pnl) * plot_height };

    let mut svg = svg_open(
        CHART_WIDTH,
        CHART_HEIGHT,
        "Total Trader PnL Over Time by Market Sentiment",
    );
    svg.push_str(&svg_y_ticks(CHART_WIDTH, CHART_HEIGHT, min_pnl, max_pnl));
    svg.push_str(&svg_axes(CHART_WIDTH, CHART_HEIGHT, "Date", "Total Closed PnL"));

    for (i, class) in classes.iter().enumerate() {
        let mut points: Vec<(NaiveDate, f64)> = summary
            .records
            .iter()
            .filter(|r| r.classification == *class)
            .map(|r| (r.date, r.closed_pnl))
            .collect();
        points.sort_by_key(|p| p.0);

        let mut path_data = String::new();
        for (j, (date, pnl)) in points.iter().enumerate() {
            let cmd = if j == 0 { "M" } else { " L" };
            path_data.push_str(&format!("{} {:.1} {:.1}", cmd, x_scale(*date), y_scale(*pnl)));
        }
        svg.push_str(&format!(
            "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>\n",
            path_data,
            palette_color(i)
        ));
        if points.len() == 1 {
            let (date, pnl) = points[0];
            svg.push_str(&format!(
                "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"{}\"/>\n",
                x_scale(date),
                y_scale(pnl),
                palette_color(i)
            ));
        }
    }

    // Date ticks, rotated 45 degrees.
    let mut dates: Vec<NaiveDate> = summary.records.iter().map(|r| r.date).collect();
    dates.sort();
    dates.dedup();
    let step = (dates.len() / 8).max(1);
    for date in dates.iter().step_by(step) {
        let x = x_scale(*date);
        let y = CHART_HEIGHT - MARGIN_BOTTOM + 14.0;
        svg.push_str(&format!(
            "  <text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\" transform=\"rotate(-45 {x:.1} {y:.1})\">{}</text>\n",
            date.format("%Y-%m-%d")
        ));
    }

    svg.push_str(&svg_legend(CHART_WIDTH, "Market Sentiment", &classes));
    svg.push_str("</svg>\n");
    svg
}

/// Diverging blue-white-red colour for a coefficient in [-1, 1].
pub fn coolwarm(value: f64) -> String {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 {
        (COLD, MID, v + 1.0)
    } else {
        (MID, WARM, v)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        lerp(from.0, to.0),
        lerp(from.1, to.1),
        lerp(from.2, to.2)
    )
}

/// Annotated heatmap of a correlation matrix.
///
/// Returns an empty string for an empty matrix.
pub fn generate_heatmap_svg(matrix: &CorrelationMatrix) -> String {
    if matrix.is_empty() {
        return String::new();
    }

    let n = matrix.len() as f64;
    let width = HEATMAP_MARGIN_LEFT + n * HEATMAP_CELL + HEATMAP_LEGEND;
    let height = HEATMAP_MARGIN_TOP + n * HEATMAP_CELL + HEATMAP_MARGIN_BOTTOM;

    let mut svg = svg_open(
        width,
        height,
        "Correlation between PnL, Leverage, and Sentiment",
    );

    for (i, row) in matrix.values.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            let x = HEATMAP_MARGIN_LEFT + j as f64 * HEATMAP_CELL;
            let y = HEATMAP_MARGIN_TOP + i as f64 * HEATMAP_CELL;
            let (fill, text) = match value {
                Some(v) => (coolwarm(*v), format!("{:.2}", v)),
                None => ("#ffffff".to_string(), "NaN".to_string()),
            };
            svg.push_str(&format!(
                "  <rect x=\"{x}\" y=\"{y}\" width=\"{c}\" height=\"{c}\" fill=\"{fill}\" stroke=\"white\"/>\n",
                c = HEATMAP_CELL
            ));
            svg.push_str(&format!(
                "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"14\" fill=\"#111\">{}</text>\n",
                x + HEATMAP_CELL / 2.0,
                y + HEATMAP_CELL / 2.0 + 5.0,
                text
            ));
        }
    }

    for (i, label) in matrix.labels.iter().enumerate() {
        let center = i as f64 * HEATMAP_CELL + HEATMAP_CELL / 2.0;
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"12\" fill=\"#222\">{}</text>\n",
            HEATMAP_MARGIN_LEFT - 8.0,
            HEATMAP_MARGIN_TOP + center + 4.0,
            escape_xml(label)
        ));
        let x = HEATMAP_MARGIN_LEFT + center;
        let y = HEATMAP_MARGIN_TOP + n * HEATMAP_CELL + 16.0;
        svg.push_str(&format!(
            "  <text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"end\" font-size=\"12\" fill=\"#222\" transform=\"rotate(-45 {x:.1} {y:.1})\">{}</text>\n",
            escape_xml(label)
        ));
    }

    // Colour bar from +1 (top) to -1 (bottom).
    let bar_x = HEATMAP_MARGIN_LEFT + n * HEATMAP_CELL + 25.0;
    let bar_height = n * HEATMAP_CELL;
    let steps = 20;
    for s in 0..steps {
        let v = 1.0 - 2.0 * (s as f64 + 0.5) / steps as f64;
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{:.1}\" width=\"16\" height=\"{:.1}\" fill=\"{}\"/>\n",
            bar_x,
            HEATMAP_MARGIN_TOP + s as f64 * bar_height / steps as f64,
            bar_height / steps as f64 + 0.5,
            coolwarm(v)
        ));
    }
    for (label, frac) in [("1.0", 0.0), ("0.0", 0.5), ("-1.0", 1.0)] {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            bar_x + 20.0,
            HEATMAP_MARGIN_TOP + frac * bar_height + 4.0,
            label
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregate::SummaryRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(d: NaiveDate, class: &str, pnl: f64) -> SummaryRecord {
        SummaryRecord {
            date: d,
            classification: class.to_string(),
            closed_pnl: pnl,
            leverage: None,
        }
    }

    fn summary(records: Vec<SummaryRecord>) -> Summary {
        Summary {
            classification_column: "classification".into(),
            pnl_column: "Closed PnL".into(),
            leverage_column: None,
            records,
        }
    }

    #[test]
    fn timeline_empty_summary() {
        assert!(generate_pnl_timeline_svg(&summary(vec![])).is_empty());
    }

    #[test]
    fn timeline_one_path_per_class() {
        let svg = generate_pnl_timeline_svg(&summary(vec![
            record(date(2023, 2, 1), "Fear", 10.0),
            record(date(2023, 2, 1), "Greed", -5.0),
            record(date(2023, 2, 2), "Fear", 20.0),
            record(date(2023, 2, 3), "Greed", 7.0),
        ]));
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("Total Trader PnL Over Time by Market Sentiment"));
        assert!(svg.contains("Market Sentiment"));
        assert!(svg.contains("2023-02-01"));
    }

    #[test]
    fn timeline_single_point_is_marked() {
        let svg = generate_pnl_timeline_svg(&summary(vec![record(date(2023, 2, 1), "Greed", 100.0)]));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn labels_are_escaped() {
        let svg = generate_pnl_timeline_svg(&summary(vec![record(date(2023, 2, 1), "Fear & <Greed>", 1.0)]));
        assert!(svg.contains("Fear &amp; &lt;Greed&gt;"));
    }

    #[test]
    fn coolwarm_endpoints() {
        assert_eq!(coolwarm(-1.0), "#3b4cc0");
        assert_eq!(coolwarm(0.0), "#dddddd");
        assert_eq!(coolwarm(1.0), "#b40426");
        assert_eq!(coolwarm(5.0), coolwarm(1.0));
    }

    #[test]
    fn heatmap_annotates_cells() {
        let matrix = CorrelationMatrix {
            labels: vec!["Closed PnL".into(), "Sentiment_Num".into()],
            values: vec![vec![Some(1.0), Some(-0.25)], vec![Some(-0.25), None]],
        };
        let svg = generate_heatmap_svg(&matrix);
        assert!(svg.contains("Correlation between PnL, Leverage, and Sentiment"));
        assert!(svg.contains(">1.00<"));
        assert!(svg.contains(">-0.25<"));
        assert!(svg.contains(">NaN<"));
    }

    #[test]
    fn heatmap_empty_matrix() {
        let matrix = CorrelationMatrix {
            labels: vec![],
            values: vec![],
        };
        assert!(generate_heatmap_svg(&matrix).is_empty());
    }

    #[test]
    fn padded_range_handles_flat_values() {
        assert_eq!(padded_range([3.0, 3.0].into_iter()), Some((2.0, 4.0)));
        assert_eq!(padded_range(std::iter::empty()), None);
    }
}
