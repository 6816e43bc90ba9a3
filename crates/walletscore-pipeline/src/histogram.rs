//! Score distribution chart, rendered as a standalone SVG document.
//!
//! Ten bins of width 100 cover `[0, 1000]`; a score of exactly 1000 lands in
//! the last bin. The chart carries per-bin counts, dashed mean and median
//! markers, and a Gaussian kernel-density curve scaled to bin counts.

use std::fmt::{self, Write as _};

use walletscore_core::constants::{HISTOGRAM_BINS, HISTOGRAM_BIN_WIDTH, SCORE_MAX, SCORE_MIN};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
/// Points on the density curve.
const KDE_POINTS: usize = 200;

/// Binned score distribution plus summary statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub counts: [u64; HISTOGRAM_BINS],
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// `(score, expected wallets per bin)` along `[0, 1000]`. Empty when the
    /// scores have fewer than two distinct values.
    pub density: Vec<(f64, f64)>,
}

/// Bin holding `score`. Out-of-range values clamp to the first or last bin.
pub fn bin_index(score: f64) -> usize {
    if !(score > SCORE_MIN) {
        return 0;
    }
    ((score / HISTOGRAM_BIN_WIDTH) as usize).min(HISTOGRAM_BINS - 1)
}

impl Histogram {
    pub fn from_scores(scores: &[f64]) -> Self {
        let mut counts = [0u64; HISTOGRAM_BINS];
        for &s in scores {
            counts[bin_index(s)] += 1;
        }

        let mut sorted = scores.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            counts,
            mean: mean(&sorted),
            median: median(&sorted),
            density: kde_curve(&sorted),
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Render as an SVG document.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

fn mean(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    Some(sorted.iter().sum::<f64>() / sorted.len() as f64)
}

fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

/// Gaussian KDE with Scott's-rule bandwidth (`std * n^(-1/5)`, sample std),
/// scaled so the curve is comparable to bin counts.
fn kde_curve(sorted: &[f64]) -> Vec<(f64, f64)> {
    let n = sorted.len();
    let distinct = sorted.windows(2).any(|w| w[0] != w[1]);
    if n < 2 || !distinct {
        return Vec::new();
    }

    let nf = n as f64;
    let mu = sorted.iter().sum::<f64>() / nf;
    let var = sorted.iter().map(|s| (s - mu).powi(2)).sum::<f64>() / (nf - 1.0);
    let bandwidth = var.sqrt() * nf.powf(-0.2);
    if !(bandwidth > 0.0 && bandwidth.is_finite()) {
        return Vec::new();
    }

    let norm = 1.0 / (bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let scale = nf * HISTOGRAM_BIN_WIDTH;
    let step = (SCORE_MAX - SCORE_MIN) / (KDE_POINTS - 1) as f64;

    (0..KDE_POINTS)
        .map(|i| {
            let x = SCORE_MIN + step * i as f64;
            let density = sorted
                .iter()
                .map(|s| {
                    let u = (x - s) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum::<f64>()
                * norm
                / nf;
            (x, density * scale)
        })
        .collect()
}

struct Frame {
    y_max: f64,
}

impl Frame {
    fn plot_w() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_h() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x(&self, score: f64) -> f64 {
        MARGIN_LEFT + (score - SCORE_MIN) / (SCORE_MAX - SCORE_MIN) * Self::plot_w()
    }

    fn y(&self, count: f64) -> f64 {
        MARGIN_TOP + Self::plot_h() * (1.0 - count / self.y_max)
    }
}

/// Smallest "nice" tick step giving at most ~8 ticks up to `max`.
fn tick_step(max: f64) -> f64 {
    let raw = max / 8.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude)
        .max(1.0)
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let peak_count = self.counts.iter().copied().max().unwrap_or(0) as f64;
        let peak_density = self.density.iter().map(|(_, d)| *d).fold(0.0, f64::max);
        let frame = Frame {
            y_max: (peak_count.max(peak_density) * 1.1).max(1.0),
        };
        let base_y = frame.y(0.0);
        let mut svg = String::new();

        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
        )?;
        writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            svg,
            r#"<text x="{}" y="28" text-anchor="middle" font-size="16">Credit Score Distribution</text>"#,
            WIDTH / 2.0
        )?;

        // Bars and their counts.
        let bar_w = frame.x(HISTOGRAM_BIN_WIDTH) - frame.x(0.0);
        for (i, &count) in self.counts.iter().enumerate() {
            let x = frame.x(i as f64 * HISTOGRAM_BIN_WIDTH);
            let y = frame.y(count as f64);
            writeln!(
                svg,
                r##"<rect x="{x:.2}" y="{y:.2}" width="{bar_w:.2}" height="{:.2}" fill="#4c72b0" fill-opacity="0.6" stroke="#2a3f66"/>"##,
                base_y - y
            )?;
            if count > 0 {
                writeln!(
                    svg,
                    r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{count}</text>"#,
                    x + bar_w / 2.0,
                    y - 4.0
                )?;
            }
        }

        if !self.density.is_empty() {
            let points: Vec<String> = self
                .density
                .iter()
                .map(|(s, d)| format!("{:.2},{:.2}", frame.x(*s), frame.y(*d)))
                .collect();
            writeln!(
                svg,
                r##"<polyline points="{}" fill="none" stroke="#2a3f66" stroke-width="2"/>"##,
                points.join(" ")
            )?;
        }

        for (label, value, color, dy) in [
            ("Mean", self.mean, "#c44e52", 14.0),
            ("Median", self.median, "#55a868", 28.0),
        ] {
            let Some(v) = value else { continue };
            let x = frame.x(v.clamp(SCORE_MIN, SCORE_MAX));
            writeln!(
                svg,
                r#"<line x1="{x:.2}" y1="{MARGIN_TOP}" x2="{x:.2}" y2="{base_y:.2}" stroke="{color}" stroke-width="2" stroke-dasharray="6,4"/>"#
            )?;
            writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" fill="{color}">{label}: {v:.1}</text>"#,
                x + 4.0,
                MARGIN_TOP + dy
            )?;
        }

        // Axes.
        let right = frame.x(SCORE_MAX);
        writeln!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{base_y:.2}" x2="{right:.2}" y2="{base_y:.2}" stroke="black"/>"#
        )?;
        writeln!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{base_y:.2}" stroke="black"/>"#
        )?;
        for i in 0..=HISTOGRAM_BINS {
            let score = i as f64 * HISTOGRAM_BIN_WIDTH;
            let x = frame.x(score);
            writeln!(
                svg,
                r#"<line x1="{x:.2}" y1="{base_y:.2}" x2="{x:.2}" y2="{:.2}" stroke="black"/>"#,
                base_y + 5.0
            )?;
            writeln!(
                svg,
                r#"<text x="{x:.2}" y="{:.2}" text-anchor="middle">{score}</text>"#,
                base_y + 18.0
            )?;
        }
        let step = tick_step(frame.y_max);
        let mut tick = 0.0;
        while tick <= frame.y_max {
            let y = frame.y(tick);
            writeln!(
                svg,
                r#"<line x1="{:.2}" y1="{y:.2}" x2="{MARGIN_LEFT}" y2="{y:.2}" stroke="black"/>"#,
                MARGIN_LEFT - 5.0
            )?;
            writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="end">{tick}</text>"#,
                MARGIN_LEFT - 8.0,
                y + 4.0
            )?;
            tick += step;
        }

        writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">Credit Score</text>"#,
            MARGIN_LEFT + Frame::plot_w() / 2.0,
            HEIGHT - 15.0
        )?;
        writeln!(
            svg,
            r#"<text x="20" y="{:.2}" text-anchor="middle" transform="rotate(-90 20 {:.2})">Number of Wallets</text>"#,
            MARGIN_TOP + Frame::plot_h() / 2.0,
            MARGIN_TOP + Frame::plot_h() / 2.0
        )?;
        svg.push_str("</svg>\n");

        f.write_str(&svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bins_are_width_one_hundred() {
        assert_eq!(bin_index(0.0), 0);
        assert_eq!(bin_index(99.999), 0);
        assert_eq!(bin_index(100.0), 1);
        assert_eq!(bin_index(512.3), 5);
        assert_eq!(bin_index(999.9), 9);
    }

    #[test]
    fn top_score_lands_in_last_bin() {
        assert_eq!(bin_index(1000.0), 9);
    }

    #[test]
    fn counts_mean_median() {
        let h = Histogram::from_scores(&[0.0, 150.0, 150.0, 1000.0]);
        assert_eq!(h.counts, [1, 2, 0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(h.total(), 4);
        assert_eq!(h.mean, Some(325.0));
        assert_eq!(h.median, Some(150.0));
    }

    #[test]
    fn odd_median() {
        let h = Histogram::from_scores(&[900.0, 100.0, 500.0]);
        assert_eq!(h.median, Some(500.0));
    }

    #[test]
    fn empty_scores() {
        let h = Histogram::from_scores(&[]);
        assert_eq!(h.total(), 0);
        assert_eq!(h.mean, None);
        assert_eq!(h.median, None);
        assert!(h.density.is_empty());
        let svg = h.to_svg();
        assert!(svg.contains("Credit Score Distribution"));
        assert!(!svg.contains("Mean:"));
    }

    #[test]
    fn single_distinct_value_has_no_density() {
        let h = Histogram::from_scores(&[400.0, 400.0, 400.0]);
        assert!(h.density.is_empty());
        assert!(!h.to_svg().contains("<polyline"));
    }

    #[test]
    fn density_integrates_to_roughly_the_population() {
        let scores: Vec<f64> = (0..200).map(|i| 300.0 + (i % 40) as f64 * 10.0).collect();
        let h = Histogram::from_scores(&scores);
        assert_eq!(h.density.len(), KDE_POINTS);
        let step = 1000.0 / (KDE_POINTS - 1) as f64;
        // Expected wallets per bin, integrated over score, divided by bin width.
        let area: f64 = h.density.iter().map(|(_, d)| d * step).sum::<f64>() / HISTOGRAM_BIN_WIDTH;
        assert!((area - 200.0).abs() < 10.0, "area = {area}");
    }

    #[test]
    fn svg_has_chart_furniture() {
        let h = Histogram::from_scores(&[120.0, 480.0, 510.0, 530.0, 990.0]);
        let svg = h.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Credit Score</text>"));
        assert!(svg.contains("Number of Wallets"));
        assert!(svg.contains("Mean: 526.0"));
        assert!(svg.contains("Median: 510.0"));
        assert!(svg.contains("stroke-dasharray"));
        assert!(svg.contains(">1000</text>"));
        assert!(svg.contains(">2</text>"));
    }

    #[test]
    fn tick_steps_are_round() {
        assert_eq!(tick_step(1.1), 1.0);
        assert_eq!(tick_step(11.0), 2.0);
        assert_eq!(tick_step(330.0), 50.0);
    }

    proptest! {
        #[test]
        fn every_score_is_counted(scores in prop::collection::vec(0.0f64..=1000.0, 0..300)) {
            let h = Histogram::from_scores(&scores);
            prop_assert_eq!(h.total(), scores.len() as u64);
        }
    }
}
