use std::error::Error;
use std::ops::Range;
use std::path::{Path, PathBuf};

use cylinder_histories::{Contribution, MotionReduction, SeriesStyle, TimeHistory};
use plotters::prelude::*;

/// Pixel size of one motion's figure.
const FIGURE_SIZE: (u32, u32) = (3200, 800);
/// Dash length and gap for dashed series, in pixels.
const DASH: (u32, u32) = (10, 6);

/// Quantity shown in one panel of a motion's figure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    /// Y-component of the force.
    YForce,
    /// Work integrand.
    Work,
    /// Mass in the domain.
    Mass,
    /// Mass conservation error.
    MassError,
}

impl Panel {
    /// Panels in left-to-right order.
    pub const ALL: [Panel; 4] = [Panel::YForce, Panel::Work, Panel::Mass, Panel::MassError];

    /// Label of the vertical axis.
    #[must_use]
    pub fn y_label(self) -> &'static str {
        match self {
            Panel::YForce => "Force-Y",
            Panel::Work => "Work integrand",
            Panel::Mass => "Mass",
            Panel::MassError => "Mass error",
        }
    }

    /// The series of `history` shown in this panel.
    #[must_use]
    pub fn series(self, history: &TimeHistory) -> &[f64] {
        match self {
            Panel::YForce => &history.y_force,
            Panel::Work => &history.work,
            Panel::Mass => &history.mass,
            Panel::MassError => &history.mass_error,
        }
    }
}

/// File a motion's figure is written to, e.g. `Cylinder_M1_Histories.png`.
#[must_use]
pub fn figure_path(dir: &Path, geometry: &str, reduction: &MotionReduction) -> PathBuf {
    dir.join(format!("{geometry}_{}_Histories.png", reduction.motion))
}

/// Horizontal range shared by all panels.
///
/// Fixed to the motion's canonical time domain when it has one; otherwise the
/// span of the plotted data.
#[must_use]
pub fn time_range(reduction: &MotionReduction) -> Range<f64> {
    if let Some(end) = reduction.motion.canonical_end_time() {
        return 0.0..end;
    }
    let times = reduction
        .contributions()
        .flat_map(|contribution| contribution.history.time.iter().copied());
    padded_range(times, 0.0)
}

/// Vertical range of one panel, padded so curves do not touch the frame.
#[must_use]
pub fn value_range(contributions: &[&Contribution], panel: Panel) -> Range<f64> {
    let values = contributions
        .iter()
        .flat_map(|contribution| panel.series(&contribution.history).iter().copied());
    padded_range(values, 0.05)
}

/// Finite extent of `values` widened by `pad` of its span, or `0..1` when
/// there is nothing to show. Flat data is widened by one unit either side.
fn padded_range(values: impl Iterator<Item = f64>, pad: f64) -> Range<f64> {
    let (min, max) = values
        .filter(|value| value.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
            (lo.min(value), hi.max(value))
        });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let span = max - min;
    if span <= f64::EPSILON * max.abs().max(1.0) {
        return (min - 1.0)..(max + 1.0);
    }
    (min - pad * span)..(max + pad * span)
}

/// Plotters colour for a group's style.
fn rgb_colour(style: SeriesStyle) -> RGBColor {
    let (red, green, blue) = style.rgb;
    RGBColor(red, green, blue)
}

/// Rasterize one motion's four-panel comparison figure to `path`.
///
/// # Errors
///
/// Returns the drawing backend's error when the figure cannot be rendered or
/// written.
pub fn save_figure(reduction: &MotionReduction, path: &Path) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((1, Panel::ALL.len()));

    let contributions: Vec<&Contribution> = reduction.contributions().collect();
    let x_range = time_range(reduction);

    for (area, panel) in areas.iter().zip(Panel::ALL) {
        let mut chart = ChartBuilder::on(area)
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(x_range.clone(), value_range(&contributions, panel))?;

        chart
            .configure_mesh()
            .x_desc("Time")
            .y_desc(panel.y_label())
            .draw()?;

        for contribution in &contributions {
            let colour = rgb_colour(contribution.style);
            let points: Vec<(f64, f64)> = contribution
                .history
                .time
                .iter()
                .copied()
                .zip(panel.series(&contribution.history).iter().copied())
                .collect();
            let line = colour.stroke_width(2);
            let drawn = if contribution.style.dashed {
                chart.draw_series(DashedLineSeries::new(points, DASH.0, DASH.1, line))?
            } else {
                chart.draw_series(LineSeries::new(points, line))?
            };
            drawn
                .label(contribution.label())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour));
        }

        if !contributions.is_empty() {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }
    }

    root.present()?;
    Ok(())
}
