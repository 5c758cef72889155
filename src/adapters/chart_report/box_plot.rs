//! Box plots of a numeric column grouped by classification.

use super::chart_svg::{
    CHART_HEIGHT, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP, escape_xml,
    padded_range, palette_color, svg_axes, svg_open, svg_y_ticks,
};

const BOX_CHART_WIDTH: f64 = 860.0;
const WHISKER_IQR: f64 = 1.5;

/// Quartiles, whiskers and outliers of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub category: String,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest value within 1.5 IQR below `q1`.
    pub whisker_low: f64,
    /// Highest value within 1.5 IQR above `q3`.
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Linear-interpolation percentile of sorted data, `p` in [0, 1].
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

impl BoxStats {
    /// `None` for an empty sample.
    pub fn compute(category: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 0.25);
        let median = percentile(&sorted, 0.5);
        let q3 = percentile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let (inside, outliers): (Vec<f64>, Vec<f64>) = sorted
            .iter()
            .partition(|v| **v >= low_fence && **v <= high_fence);
        let whisker_low = inside.first().copied().unwrap_or(q1);
        let whisker_high = inside.last().copied().unwrap_or(q3);

        Some(Self {
            category: category.to_string(),
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// Group `(category, value)` pairs in order of first category appearance.
/// Pairs missing either side are dropped.
pub fn group_by_category<'a>(
    pairs: impl Iterator<Item = (Option<&'a str>, Option<f64>)>,
) -> Vec<(String, Vec<f64>)> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for (category, value) in pairs {
        let (Some(category), Some(value)) = (category, value) else {
            continue;
        };
        match groups.iter_mut().find(|(c, _)| c == category) {
            Some((_, values)) => values.push(value),
            None => groups.push((category.to_string(), vec![value])),
        }
    }
    groups
}

/// Render one box per category. Returns an empty string when there is no
/// data to draw.
pub fn generate_box_plot_svg(
    title: &str,
    x_label: &str,
    y_label: &str,
    groups: &[(String, Vec<f64>)],
) -> String {
    let stats: Vec<BoxStats> = groups
        .iter()
        .filter_map(|(c, v)| BoxStats::compute(c, v))
        .collect();
    if stats.is_empty() {
        return String::new();
    }

    let Some((min, max)) = padded_range(
        groups.iter().flat_map(|(_, values)| values.iter().copied()),
    ) else {
        return String::new();
    };

    let width = BOX_CHART_WIDTH;
    let plot_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let slot = plot_width / stats.len() as f64;
    let box_width = slot * 0.6;
    let y_scale = |v: f64| -> f64 { MARGIN_TOP + plot_height - (v - min) / (max - min) * plot_height };

    let mut svg = svg_open(width, CHART_HEIGHT, title);
    svg.push_str(&svg_y_ticks(width, CHART_HEIGHT, min, max));
    svg.push_str(&svg_axes(width, CHART_HEIGHT, x_label, y_label));

    for (i, s) in stats.iter().enumerate() {
        let center = MARGIN_LEFT + slot * (i as f64 + 0.5);
        let left = center - box_width / 2.0;
        let color = palette_color(i);

        // Whiskers
        svg.push_str(&format!(
            "  <line x1=\"{c:.1}\" y1=\"{:.1}\" x2=\"{c:.1}\" y2=\"{:.1}\" stroke=\"#444\" stroke-width=\"1\"/>\n",
            y_scale(s.whisker_high),
            y_scale(s.q3),
            c = center
        ));
        svg.push_str(&format!(
            "  <line x1=\"{c:.1}\" y1=\"{:.1}\" x2=\"{c:.1}\" y2=\"{:.1}\" stroke=\"#444\" stroke-width=\"1\"/>\n",
            y_scale(s.q1),
            y_scale(s.whisker_low),
            c = center
        ));
        for cap in [s.whisker_low, s.whisker_high] {
            svg.push_str(&format!(
                "  <line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#444\" stroke-width=\"1\"/>\n",
                center - box_width / 4.0,
                center + box_width / 4.0,
                y = y_scale(cap)
            ));
        }

        // Box and median
        let top = y_scale(s.q3);
        let bottom = y_scale(s.q1);
        svg.push_str(&format!(
            "  <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\" fill-opacity=\"0.8\" stroke=\"#444\"/>\n",
            left,
            top,
            box_width,
            (bottom - top).max(1.0),
            color
        ));
        svg.push_str(&format!(
            "  <line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#222\" stroke-width=\"2\"/>\n",
            left,
            left + box_width,
            y = y_scale(s.median)
        ));

        for outlier in &s.outliers {
            svg.push_str(&format!(
                "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"2.5\" fill=\"none\" stroke=\"#444\"/>\n",
                center,
                y_scale(*outlier)
            ));
        }

        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"11\" fill=\"#222\">{}</text>\n",
            center,
            CHART_HEIGHT - MARGIN_BOTTOM + 18.0,
            escape_xml(&s.category)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}
