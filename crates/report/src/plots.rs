use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;
use std::path::Path;
use tracing::info;

use ingest::Label;

use crate::stats::{DatasetStats, WordCountSummary, density_histogram};

pub const FAKE_COLOR: RGBColor = RGBColor(0xFF, 0x6B, 0x6B);
pub const REAL_COLOR: RGBColor = RGBColor(0x4E, 0xCD, 0xC4);

pub const HISTOGRAM_BINS: usize = 50;
/// Upper end of the length axis.
pub const LENGTH_CLIP: f64 = 20_000.0;

pub fn label_color(label: Label) -> RGBColor {
    match label {
        Label::Fake => FAKE_COLOR,
        Label::Real => REAL_COLOR,
    }
}

/// The 2x2 analysis figure: label pie, length histogram, subject bars and
/// the word-count table.
pub fn generate_report(stats: &DatasetStats, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let root = BitMapBackend::new(path, (1500, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Fake News Dataset Analysis", ("sans-serif", 32))?;

    let panels = root.split_evenly((2, 2));
    draw_label_pie(&panels[0], stats, true)?;
    draw_length_histogram(&panels[1], stats)?;
    draw_subject_bars(&panels[2], stats, true)?;
    draw_word_count_table(&panels[3], stats)?;

    root.present()?;
    info!(path = %path.display(), "Saved analysis figure");
    Ok(())
}

/// Label distribution as a bare SVG pie, for inline use in HTML.
pub fn label_pie_svg(stats: &DatasetStats, size: (u32, u32)) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_label_pie(&root, stats, false)?;
        root.present()?;
    }
    Ok(svg)
}

/// Top-subject grouped bars as a bare SVG, for inline use in HTML.
pub fn subject_bars_svg(stats: &DatasetStats, size: (u32, u32)) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_subject_bars(&root, stats, false)?;
        root.present()?;
    }
    Ok(svg)
}

fn draw_label_pie<DB>(area: &DrawingArea<DB, Shift>, stats: &DatasetStats, with_text: bool) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let titled;
    let area = if with_text {
        titled = area.titled("Fake vs Real News Distribution", ("sans-serif", 22))?;
        &titled
    } else {
        area
    };

    let total = stats.total as f64;
    if total == 0.0 {
        return Ok(());
    }

    let (w, h) = area.dim_in_pixel();
    let center = (w as f64 / 2.0, h as f64 / 2.0);
    let radius = w.min(h) as f64 * 0.38;
    let point = |angle: f64, r: f64| {
        (
            (center.0 + r * angle.cos()).round() as i32,
            (center.1 - r * angle.sin()).round() as i32,
        )
    };

    // Counter-clockwise from twelve o'clock.
    let mut start = PI / 2.0;
    for label in Label::ALL {
        let count = stats.count(label);
        if count == 0 {
            continue;
        }
        let fraction = count as f64 / total;
        let sweep = fraction * 2.0 * PI;
        let steps = ((fraction * 120.0).ceil() as usize).max(2);

        let mut points = vec![point(0.0, 0.0)];
        points.extend((0..=steps).map(|i| point(start + sweep * i as f64 / steps as f64, radius)));
        area.draw(&Polygon::new(points, label_color(label).filled()))?;

        if with_text {
            let mid = start + sweep / 2.0;
            let centered = Pos::new(HPos::Center, VPos::Center);
            area.draw(&Text::new(
                format!("{:.1}%", fraction * 100.0),
                point(mid, radius * 0.6),
                ("sans-serif", 18).into_font().color(&BLACK).pos(centered),
            ))?;
            area.draw(&Text::new(
                label.as_str(),
                point(mid, radius * 1.15),
                ("sans-serif", 18).into_font().color(&BLACK).pos(centered),
            ))?;
        }
        start += sweep;
    }

    Ok(())
}

fn draw_length_histogram<DB>(area: &DrawingArea<DB, Shift>, stats: &DatasetStats) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let histograms: Vec<(Label, Vec<_>)> = stats
        .labels
        .iter()
        .map(|s| (s.label, density_histogram(&s.text_lengths, HISTOGRAM_BINS)))
        .collect();

    let max_density = histograms
        .iter()
        .flat_map(|(_, bins)| bins.iter())
        .filter(|b| b.start < LENGTH_CLIP)
        .map(|b| b.density)
        .fold(0.0f64, f64::max);
    let y_max = if max_density > 0.0 { max_density * 1.1 } else { 1e-3 };

    let mut chart = ChartBuilder::on(area)
        .caption("Article Length Distribution by Label", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..LENGTH_CLIP, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Article Length (characters)")
        .y_desc("Density")
        .y_label_formatter(&|y: &f64| format!("{:.1e}", y))
        .draw()?;

    for (label, bins) in histograms {
        let color = label_color(label);
        chart
            .draw_series(bins.into_iter().filter(|b| b.start < LENGTH_CLIP).map(move |b| {
                Rectangle::new(
                    [(b.start.max(0.0), 0.0), (b.end.min(LENGTH_CLIP), b.density)],
                    color.mix(0.5).filled(),
                )
            }))?
            .label(label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn draw_subject_bars<DB>(area: &DrawingArea<DB, Shift>, stats: &DatasetStats, with_text: bool) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let subjects = &stats.subjects;
    let n = subjects.len().max(1);
    let y_max = subjects
        .iter()
        .map(|r| r.fake.max(r.real))
        .max()
        .unwrap_or(0)
        .max(1) as f64
        * 1.1;

    let mut builder = ChartBuilder::on(area);
    builder.margin(10);
    if with_text {
        builder
            .caption("Top 10 Subjects by Label", ("sans-serif", 22))
            .x_label_area_size(60)
            .y_label_area_size(60);
    }
    let mut chart = builder.build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

    if with_text {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|x: &f64| {
                let i = x.round();
                if (x - i).abs() > 1e-6 || i < 0.0 {
                    return String::new();
                }
                subjects
                    .get(i as usize)
                    .map(|r| r.subject.clone())
                    .unwrap_or_default()
            })
            .x_desc("Subject")
            .y_desc("Count")
            .draw()?;
    }

    for (i, row) in subjects.iter().enumerate() {
        let x = i as f64;
        chart.draw_series([
            Rectangle::new([(x - 0.4, 0.0), (x, row.fake as f64)], FAKE_COLOR.filled()),
            Rectangle::new([(x, 0.0), (x + 0.4, row.real as f64)], REAL_COLOR.filled()),
        ])?;
    }

    Ok(())
}

/// Rows of the word-count table: statistic name, FAKE value, REAL value.
pub fn word_count_rows(stats: &DatasetStats) -> Vec<[String; 3]> {
    let cell = |label: Label, pick: fn(&WordCountSummary) -> Option<f64>| {
        stats
            .label(label)
            .and_then(|s| s.word_counts.as_ref())
            .and_then(pick)
            .map_or_else(|| "-".to_string(), |v| format!("{:.1}", v))
    };

    let rows: [(&str, fn(&WordCountSummary) -> Option<f64>); 4] = [
        ("mean", |s| Some(s.mean)),
        ("std", |s| s.std),
        ("min", |s| Some(s.min as f64)),
        ("max", |s| Some(s.max as f64)),
    ];

    rows.iter()
        .map(|(name, pick)| [name.to_string(), cell(Label::Fake, *pick), cell(Label::Real, *pick)])
        .collect()
}

fn draw_word_count_table<DB>(area: &DrawingArea<DB, Shift>, stats: &DatasetStats) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = area.titled("Word Count Statistics", ("sans-serif", 22))?;
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);

    let columns = [w * 3 / 10, w / 2, w * 7 / 10];
    let row_height = 40;
    let top = h / 2 - row_height * 5 / 2;

    let header = [String::new(), Label::Fake.to_string(), Label::Real.to_string()];
    let mut rows = vec![header];
    rows.extend(word_count_rows(stats));

    let centered = Pos::new(HPos::Center, VPos::Center);
    for (r, row) in rows.iter().enumerate() {
        let y = top + r as i32 * row_height + row_height / 2;
        for (c, text) in row.iter().enumerate() {
            area.draw(&Text::new(
                text.clone(),
                (columns[c], y),
                ("sans-serif", 18).into_font().color(&BLACK).pos(centered),
            ))?;
        }
        let line_y = top + (r as i32 + 1) * row_height;
        area.draw(&PathElement::new(
            vec![(columns[0] - w / 10, line_y), (columns[2] + w / 10, line_y)],
            BLACK.mix(0.3),
        ))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingest::CleanArticle;

    fn article(label: Label, subject: &str, words: usize) -> CleanArticle {
        CleanArticle {
            id: String::new(),
            title: String::new(),
            text: String::new(),
            subject: subject.to_string(),
            date: "Unknown".to_string(),
            label,
            clean_title: String::new(),
            clean_text: String::new(),
            clean_date: "Unknown".to_string(),
            text_length: words * 6,
            word_count: words,
        }
    }

    fn stats() -> DatasetStats {
        DatasetStats::from_articles(&[
            article(Label::Fake, "News", 100),
            article(Label::Fake, "politics", 300),
            article(Label::Real, "worldnews", 200),
        ])
    }

    #[test]
    fn test_word_count_rows() {
        let rows = word_count_rows(&stats());
        assert_eq!(rows[0], ["mean".to_string(), "200.0".to_string(), "200.0".to_string()]);
        // One REAL row has no sample deviation.
        assert_eq!(rows[1][2], "-");
        assert_eq!(rows[3][1], "300.0");
    }

    #[test]
    fn test_pie_svg_uses_label_colors() {
        let svg = label_pie_svg(&stats(), (300, 300)).unwrap().to_uppercase();
        assert!(svg.contains("<SVG"));
        assert!(svg.contains("#FF6B6B"));
        assert!(svg.contains("#4ECDC4"));
    }

    #[test]
    fn test_empty_dataset_svgs() {
        let empty = DatasetStats::from_articles(&[]);
        assert!(label_pie_svg(&empty, (200, 200)).unwrap().contains("<svg"));
        assert!(subject_bars_svg(&empty, (200, 200)).unwrap().contains("<svg"));
    }
}
