//! Geometry of the moisture trend chart, precomputed for the template.

use plantwatch_domain::history::HistoryPoint;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 240.0;
const PADDING: f64 = 30.0;

/// Horizontal grid line with its axis label.
pub struct GridLine {
    pub y: String,
    pub label: u32,
}

/// One plotted sample.
pub struct Dot {
    pub x: String,
    pub y: String,
    pub time: String,
    pub value: f64,
}

/// SVG coordinates of the chart, y axis fixed to 0-100 %.
pub struct Chart {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub right: f64,
    pub label_y: f64,
    pub grid: Vec<GridLine>,
    /// `x,y` pairs for the `<polyline>`.
    pub polyline: String,
    pub dots: Vec<Dot>,
    pub first_time: String,
    /// Empty for a single point.
    pub last_time: String,
}

impl Chart {
    /// Lay out `points`, oldest first. `None` when there is nothing to plot.
    #[allow(clippy::cast_precision_loss)]
    pub fn plot(points: &[HistoryPoint]) -> Option<Self> {
        let first = points.first()?;
        let inner_width = WIDTH - 2.0 * PADDING;
        let x = |index: usize| {
            if points.len() == 1 {
                PADDING + inner_width / 2.0
            } else {
                PADDING + inner_width * index as f64 / (points.len() - 1) as f64
            }
        };

        let dots: Vec<Dot> = points
            .iter()
            .enumerate()
            .map(|(i, point)| Dot {
                x: format!("{:.1}", x(i)),
                y: format!("{:.1}", scale(point.value)),
                time: point.time.clone(),
                value: point.value,
            })
            .collect();
        let polyline = dots
            .iter()
            .map(|dot| format!("{},{}", dot.x, dot.y))
            .collect::<Vec<_>>()
            .join(" ");
        let last_time = match points {
            [_, .., last] => last.time.clone(),
            _ => String::new(),
        };

        Some(Self {
            width: WIDTH,
            height: HEIGHT,
            left: PADDING,
            right: WIDTH - PADDING,
            label_y: HEIGHT - 8.0,
            grid: [0, 50, 100]
                .into_iter()
                .map(|label| GridLine {
                    y: format!("{:.1}", scale(f64::from(label))),
                    label,
                })
                .collect(),
            polyline,
            dots,
            first_time: first.time.clone(),
            last_time,
        })
    }
}

fn scale(value: f64) -> f64 {
    let inner_height = HEIGHT - 2.0 * PADDING;
    PADDING + inner_height * (1.0 - value.clamp(0.0, 100.0) / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(time: &str, value: f64) -> HistoryPoint {
        HistoryPoint {
            time: time.to_string(),
            value,
        }
    }

    #[test]
    fn should_plot_nothing_for_empty_history() {
        assert!(Chart::plot(&[]).is_none());
    }

    #[test]
    fn should_plot_values_on_fixed_scale() {
        let chart = Chart::plot(&[point("10:00", 100.0), point("10:01", 0.0)]).unwrap();
        assert_eq!(chart.polyline, "30.0,30.0 570.0,210.0");
        assert_eq!(chart.first_time, "10:00");
        assert_eq!(chart.last_time, "10:01");
        assert_eq!(chart.grid.len(), 3);
        assert_eq!(chart.grid[1].y, "120.0");
    }

    #[test]
    fn should_center_and_clamp_single_point() {
        let chart = Chart::plot(&[point("a", 150.0)]).unwrap();
        assert_eq!(chart.polyline, "300.0,30.0");
        assert!(chart.last_time.is_empty());
    }
}
