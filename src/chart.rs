use crate::recency::RecentPost;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::error::Error;
use std::path::Path;

/// Most-negative day offset still shown on the chart.
pub const DEFAULT_CUTOFF: i64 = -30;

/// Mood flips from "Nice!" to "UH OH!" at this many days since posting.
pub const MOOD_THRESHOLD: i64 = 14;

pub const NICE: &str = "Nice!";
pub const UH_OH: &str = "UH OH!";

// Canvas is 12x2.5 units at 100 dpi, with the right-hand strip reserved
// for the days-since-posting callout.
const WIDTH: u32 = 1200;
const HEIGHT: u32 = 250;
const PLOT_WIDTH: i32 = 950;

const ANNOTATION_X_OFFSET: i64 = 2;
const ANNOTATION_Y_STEP: f64 = 0.2;
const HEADROOM_BASE: f64 = 0.3;
const HEADROOM_PER_BUCKET: f64 = 0.2;

/// One stacked label above the line: every title sharing an offset, joined
/// with `"\n+\n"`, plus the point its arrow targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub offset: i64,
    pub count: usize,
    pub text: String,
    pub anchor: (f64, f64),
}

/// Everything the renderer draws, computed as plain data so the layout can
/// be tested without a drawing backend.
#[derive(Debug, Clone)]
pub struct ChartLayout {
    pub cutoff: i64,
    pub counts: Vec<(i64, usize)>,
    pub max_count: usize,
    pub y_limit: f64,
    pub annotations: Vec<Annotation>,
    pub days_since: String,
    pub mood: &'static str,
}

impl ChartLayout {
    pub fn new(recent: &[RecentPost], cutoff: i64) -> Self {
        // Dense histogram over every integer offset in [cutoff, 0).
        let counts: Vec<(i64, usize)> = (cutoff..0)
            .map(|x| (x, recent.iter().filter(|p| p.offset == x).count()))
            .collect();
        let max_count = counts.iter().map(|&(_, c)| c).max().unwrap_or(0);
        let buckets = counts.iter().filter(|&&(_, c)| c > 0).count();
        let y_limit = max_count as f64 + HEADROOM_BASE + HEADROOM_PER_BUCKET * buckets as f64;

        let mut annotations = Vec::with_capacity(buckets);
        let mut stack_y = max_count as f64 + HEADROOM_PER_BUCKET * buckets as f64 + 0.2;
        for &(offset, count) in &counts {
            if count == 0 {
                continue;
            }
            let titles: Vec<&str> = recent
                .iter()
                .filter(|p| p.offset == offset)
                .map(|p| p.title.as_str())
                .collect();
            annotations.push(Annotation {
                offset,
                count,
                text: titles.join("\n+\n"),
                anchor: ((offset + ANNOTATION_X_OFFSET) as f64, stack_y),
            });
            stack_y -= ANNOTATION_Y_STEP;
        }

        // Most recent kept post drives the callout; with nothing kept the
        // best claim is "more than the window".
        let (days_since, days) = match recent.last() {
            Some(post) => (post.offset.abs().to_string(), post.offset.abs()),
            None => (format!("+{}", cutoff.abs()), cutoff.abs()),
        };
        let mood = if days < MOOD_THRESHOLD { NICE } else { UH_OH };

        ChartLayout {
            cutoff,
            counts,
            max_count,
            y_limit,
            annotations,
            days_since,
            mood,
        }
    }
}

/// Draw the layout to a PNG at `out`: wobbly line over the offset window,
/// stacked title annotations, and the days-since-posting callout panel.
pub fn render(layout: &ChartLayout, out: &Path) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(out, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let (plot, panel) = root.split_horizontally(PLOT_WIDTH);

    let mut chart = ChartBuilder::on(&plot)
        .caption(
            "WELCOME TO THE BLOG!",
            FontDesc::new(FontFamily::SansSerif, 22.0, FontStyle::Bold),
        )
        .margin(10)
        .x_label_area_size(32)
        .y_label_area_size(40)
        .build_cartesian_2d(layout.cutoff as f64..0.0, 0.0..layout.y_limit)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Days ago...")
        .y_desc("Number of posts")
        .x_label_formatter(&|x| format!("{}", *x as i64))
        .y_labels(layout.max_count + 1)
        .y_label_formatter(&|y| {
            if y.fract().abs() < f64::EPSILON {
                format!("{}", *y as i64)
            } else {
                String::new()
            }
        })
        .draw()?;

    chart.draw_series(LineSeries::new(
        wobbled_series(&layout.counts),
        BLACK.stroke_width(2),
    ))?;

    let area = chart.plotting_area();
    let line_step = layout.y_limit / 16.0;
    for ann in &layout.annotations {
        let (ax, ay) = ann.anchor;
        area.draw(&PathElement::new(
            vec![(ax, ay), (ann.offset as f64, ay), (ann.offset as f64, ann.count as f64)],
            &BLACK,
        ))?;
        for (i, line) in ann.text.lines().enumerate() {
            area.draw(&Text::new(
                line,
                (ax, ay - i as f64 * line_step),
                ("sans-serif", 12),
            ))?;
        }
    }

    draw_callout(&panel, layout)?;
    root.present()?;
    Ok(())
}

/// The right-hand strip: label, boxed day count in large type, and the
/// mood string beneath.
fn draw_callout<DB: DrawingBackend>(
    panel: &DrawingArea<DB, plotters::coord::Shift>,
    layout: &ChartLayout,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    panel.draw(&Text::new(
        "Days since posting...",
        (24, 64),
        ("sans-serif", 15),
    ))?;

    let box_width = 28 + 16 * layout.days_since.len() as i32;
    panel.draw(&Rectangle::new(
        [(24, 96), (24 + box_width, 152)],
        BLACK.stroke_width(1),
    ))?;
    panel.draw(&Text::new(
        layout.days_since.as_str(),
        (38, 110),
        ("sans-serif", 30),
    ))?;

    panel.draw(&Text::new(layout.mood, (34, 180), ("sans-serif", 18)))?;
    Ok(())
}

/// Subdivide each segment and nudge the interpolated points with a
/// hash-seeded jitter, keeping the published header's hand-drawn look while
/// staying deterministic for a given histogram.
fn wobbled_series(counts: &[(i64, usize)]) -> Vec<(f64, f64)> {
    const SUBDIVISIONS: u32 = 4;
    let mut points = Vec::with_capacity(counts.len() * SUBDIVISIONS as usize);
    for pair in counts.windows(2) {
        let (x0, y0) = (pair[0].0 as f64, pair[0].1 as f64);
        let (x1, y1) = (pair[1].0 as f64, pair[1].1 as f64);
        for step in 0..SUBDIVISIONS {
            let t = f64::from(step) / f64::from(SUBDIVISIONS);
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            points.push((x, (y + jitter(pair[0].0, step)).max(0.0)));
        }
    }
    if let Some(&(x, y)) = counts.last() {
        points.push((x as f64, y as f64));
    }
    points
}

// djb2 over the segment coordinates; amplitude is a couple of pixels.
fn jitter(offset: i64, step: u32) -> f64 {
    let mut h: u64 = 5381;
    for b in format!("{offset}:{step}").bytes() {
        h = h.wrapping_shl(5).wrapping_add(h) ^ u64::from(b);
    }
    ((h % 9) as f64 - 4.0) / 200.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recent(posts: &[(&str, i64)]) -> Vec<RecentPost> {
        posts
            .iter()
            .map(|&(title, offset)| RecentPost {
                title: title.to_string(),
                offset,
            })
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_histogram_is_dense_over_window() {
        let layout = ChartLayout::new(&recent(&[("Alpha", -8), ("Beta", -4)]), -30);
        assert_eq!(layout.counts.len(), 30);
        assert_eq!(layout.counts.first(), Some(&(-30, 0)));
        assert_eq!(layout.counts.last(), Some(&(-1, 0)));
        for &(offset, count) in &layout.counts {
            match offset {
                -8 | -4 => assert_eq!(count, 1),
                _ => assert_eq!(count, 0),
            }
        }
    }

    #[test]
    fn test_max_count_floors_at_zero_when_empty() {
        let layout = ChartLayout::new(&[], -30);
        assert_eq!(layout.max_count, 0);
        assert!(approx(layout.y_limit, HEADROOM_BASE));
        assert!(layout.annotations.is_empty());
    }

    #[test]
    fn test_y_limit_padding_counts_nonzero_buckets() {
        let layout = ChartLayout::new(&recent(&[("A", -8), ("B", -4), ("C", -4)]), -30);
        // max 2, two nonzero buckets: 2 + 0.3 + 0.2 * 2
        assert!(approx(layout.y_limit, 2.7));
    }

    #[test]
    fn test_annotations_stack_descending_in_window_order() {
        let layout = ChartLayout::new(&recent(&[("Old", -20), ("New", -5)]), -30);
        assert_eq!(layout.annotations.len(), 2);
        assert_eq!(layout.annotations[0].offset, -20);
        assert_eq!(layout.annotations[1].offset, -5);
        // max 1, two buckets: first anchor y = 1 + 0.2 * 2 + 0.2
        assert!(approx(layout.annotations[0].anchor.1, 1.6));
        assert!(approx(layout.annotations[1].anchor.1, 1.4));
        assert!(approx(layout.annotations[0].anchor.0, -18.0));
    }

    #[test]
    fn test_shared_offset_titles_joined() {
        let layout = ChartLayout::new(&recent(&[("First", -4), ("Second", -4)]), -30);
        assert_eq!(layout.annotations.len(), 1);
        assert_eq!(layout.annotations[0].count, 2);
        assert_eq!(layout.annotations[0].text, "First\n+\nSecond");
    }

    #[test]
    fn test_callout_mood_threshold() {
        let nice = ChartLayout::new(&recent(&[("A", -10)]), -30);
        assert_eq!(nice.days_since, "10");
        assert_eq!(nice.mood, NICE);

        let uh_oh = ChartLayout::new(&recent(&[("A", -20)]), -30);
        assert_eq!(uh_oh.days_since, "20");
        assert_eq!(uh_oh.mood, UH_OH);

        let boundary = ChartLayout::new(&recent(&[("A", -14)]), -30);
        assert_eq!(boundary.mood, UH_OH);

        let just_under = ChartLayout::new(&recent(&[("A", -13)]), -30);
        assert_eq!(just_under.mood, NICE);
    }

    #[test]
    fn test_callout_uses_most_recent_kept_post() {
        let layout = ChartLayout::new(&recent(&[("Old", -20), ("New", -4)]), -30);
        assert_eq!(layout.days_since, "4");
        assert_eq!(layout.mood, NICE);
    }

    #[test]
    fn test_empty_layout_reports_beyond_window() {
        let layout = ChartLayout::new(&[], -30);
        assert_eq!(layout.days_since, "+30");
        assert_eq!(layout.mood, UH_OH);
    }

    #[test]
    fn test_worked_example_end_to_end_layout() {
        // Posts on 2024-01-01 and 2024-01-05 seen from 2024-01-10: raw
        // offsets -9 and -5, adjusted to -8 and -4.
        let layout = ChartLayout::new(&recent(&[("Alpha", -8), ("Beta", -4)]), -30);
        let nonzero: Vec<(i64, usize)> = layout
            .counts
            .iter()
            .copied()
            .filter(|&(_, c)| c > 0)
            .collect();
        assert_eq!(nonzero, vec![(-8, 1), (-4, 1)]);
        assert_eq!(layout.annotations[0].text, "Alpha");
        assert_eq!(layout.annotations[1].text, "Beta");
        assert_eq!(layout.days_since, "4");
        assert_eq!(layout.mood, NICE);
    }

    #[test]
    fn test_wobbled_series_tracks_the_data() {
        let counts = vec![(-3_i64, 0_usize), (-2, 1), (-1, 0)];
        let points = wobbled_series(&counts);
        // 4 subdivisions per segment plus the closing point.
        assert_eq!(points.len(), 9);
        assert!(approx(points[0].0, -3.0));
        assert_eq!(points.last(), Some(&(-1.0, 0.0)));
        for &(_, y) in &points {
            assert!(y >= 0.0);
            assert!(y <= 1.1);
        }
    }

    #[test]
    fn test_jitter_is_deterministic_and_bounded() {
        assert_eq!(jitter(-5, 2), jitter(-5, 2));
        for offset in -30..0 {
            for step in 0..4 {
                assert!(jitter(offset, step).abs() <= 0.02 + 1e-9);
            }
        }
    }
}
