// Front-end independent chart descriptions.
//
// Page renderers produce these; the terminal front end turns them into
// widgets.

use serde::Serialize;

/// One named point series (one player).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// Least-squares line `y = slope * x + intercept` over `[x_min, x_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trendline {
    pub slope: f64,
    pub intercept: f64,
    pub x_min: f64,
    pub x_max: f64,
}

impl Trendline {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// The two end points of the line.
    pub fn endpoints(&self) -> [(f64, f64); 2] {
        [(self.x_min, self.at(self.x_min)), (self.x_max, self.at(self.x_max))]
    }
}

/// Ordinary least-squares fit over every point.
///
/// Returns `None` with fewer than two points or when all x values are equal.
pub fn ols<'a, I>(points: I) -> Option<Trendline>
where
    I: IntoIterator<Item = &'a (f64, f64)>,
{
    let pts: Vec<(f64, f64)> = points.into_iter().copied().collect();
    if pts.len() < 2 {
        return None;
    }
    let n = pts.len() as f64;
    let mean_x = pts.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pts.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = pts.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if sxx.abs() < 1e-12 {
        return None;
    }
    let sxy: f64 = pts.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum();
    let slope = sxy / sxx;
    let (x_min, x_max) = pts
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.0), hi.max(p.0))
        });
    Some(Trendline {
        slope,
        intercept: mean_y - slope * mean_x,
        x_min,
        x_max,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub trendline: Option<Trendline>,
}

/// A bar plus the extra fields shown next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub details: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Bars in display order.
    pub bars: Vec<Bar>,
    /// Decimal places used when printing values.
    pub decimals: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Chart {
    Line(LineChart),
    Scatter(ScatterChart),
    Bar(BarChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Line(c) => &c.title,
            Chart::Scatter(c) => &c.title,
            Chart::Bar(c) => &c.title,
        }
    }

    /// Bounds `(x_min, x_max, y_min, y_max)` over every point, or `None` for
    /// an empty chart.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let series = match self {
            Chart::Line(c) => &c.series,
            Chart::Scatter(c) => &c.series,
            Chart::Bar(c) => {
                let max = c.bars.iter().map(|b| b.value).fold(f64::NEG_INFINITY, f64::max);
                let min = c.bars.iter().map(|b| b.value).fold(f64::INFINITY, f64::min);
                if c.bars.is_empty() {
                    return None;
                }
                return Some((0.0, c.bars.len() as f64, min.min(0.0), max));
            }
        };
        let mut points = series.iter().flat_map(|s| s.points.iter()).peekable();
        points.peek()?;
        Some(points.fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(x0, x1, y0, y1), (x, y)| (x0.min(*x), x1.max(*x), y0.min(*y), y1.max(*y)),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
