use std::f64::consts::PI;

use crate::config::Thresholds;
use crate::model::ChainSlice;

/// Min-max volume normalization mapped onto marker areas.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeScale {
    /// `None` when there were no volumes at all.
    bounds: Option<(f64, f64)>,
    marker_scale: f64,
}

impl VolumeScale {
    pub fn from_volumes(volumes: impl IntoIterator<Item = u64>, marker_scale: f64) -> Self {
        let bounds = volumes.into_iter().fold(None, |acc: Option<(f64, f64)>, v| {
            let v = v as f64;
            Some(match acc {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            })
        });
        VolumeScale {
            bounds,
            marker_scale,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Observed `(min, max)`, or `(0, 0)` when empty.
    pub fn bounds(&self) -> (f64, f64) {
        self.bounds.unwrap_or((0.0, 0.0))
    }

    pub fn range(&self) -> f64 {
        let (lo, hi) = self.bounds();
        hi - lo
    }

    /// Marker area in points^2: `marker_scale * (v - min) / (max - min)`.
    ///
    /// A zero range (every volume equal) maps to the full marker scale.
    pub fn marker_area(&self, volume: f64) -> f64 {
        let Some((lo, hi)) = self.bounds else {
            return 0.0;
        };
        let range = hi - lo;
        if range <= 0.0 {
            return self.marker_scale;
        }
        (self.marker_scale * (volume - lo) / range).max(0.0)
    }

    /// Radius of a circle whose area is [`marker_area`](Self::marker_area).
    pub fn marker_radius(&self, volume: f64) -> f64 {
        (self.marker_area(volume) / PI).sqrt()
    }

    /// `n` volumes evenly spaced over `[min + 1, max]` for the size legend.
    pub fn legend_samples(&self, n: usize) -> Vec<f64> {
        let Some((lo, hi)) = self.bounds else {
            return Vec::new();
        };
        let start = if lo + 1.0 <= hi { lo + 1.0 } else { lo };
        match n {
            0 => Vec::new(),
            1 => vec![hi],
            _ => (0..n)
                .map(|i| start + (hi - start) * i as f64 / (n - 1) as f64)
                .collect(),
        }
    }
}

/// Axis ranges and marker sizing for one chart.
#[derive(Debug, Clone)]
pub struct ChartLayout {
    pub current_price: f64,
    pub strike_range: (f64, f64),
    pub premium_range: (f64, f64),
    pub volume: VolumeScale,
    pub legend_samples: Vec<f64>,
    pub legend_range: (f64, f64),
}

impl ChartLayout {
    pub fn new(slice: &ChainSlice, thresholds: &Thresholds) -> Self {
        let quotes = || slice.calls.iter().chain(slice.puts.iter());
        let price = slice.current_price;

        let strikes = quotes().map(|q| q.strike()).chain(std::iter::once(price));
        let strike_range = padded(min_max(strikes).unwrap_or((price, price)), 0.05, price * 0.1);

        let max_premium = quotes().map(|q| q.last()).fold(0.0, f64::max);
        let premium_range = if max_premium > 0.0 {
            (0.0, max_premium * 1.1)
        } else {
            (0.0, 1.0)
        };

        let volume = VolumeScale::from_volumes(slice.volumes(), thresholds.marker_scale);
        let legend_samples = volume.legend_samples(thresholds.volume_granularity);
        let (lo, hi) = volume.bounds();
        let margin = if volume.range() > 0.0 {
            volume.range() / thresholds.volume_granularity as f64
        } else {
            1.0
        };
        let legend_range = (lo - margin, hi + margin);

        ChartLayout {
            current_price: price,
            strike_range,
            premium_range,
            volume,
            legend_samples,
            legend_range,
        }
    }
}

/// Label for a strike tick on the percentage axis.
///
/// `"0"` at the current price, otherwise `(tick - price) / price * 100` to one decimal.
pub fn percent_tick_label(tick: f64, price: f64) -> String {
    let change = (tick - price) / price;
    if change == 0.0 {
        "0".to_string()
    } else {
        format!("{:.1}", change * 100.0)
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        None => Some((v, v)),
    })
}

/// Widen `(lo, hi)` by `frac` of its span, or by `fallback` on each side when the span is zero.
fn padded((lo, hi): (f64, f64), frac: f64, fallback: f64) -> (f64, f64) {
    let pad = if hi > lo { (hi - lo) * frac } else { fallback.max(1.0) };
    (lo - pad, hi + pad)
}
