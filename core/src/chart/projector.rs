use crate::math::interp::{InterpHelper, SPAN_EPSILON};
use crate::prelude::ChartPoint;
use serde::{Deserialize, Serialize};

/// Target area in screen space, anchored at its bottom-left corner.
///
/// `height` grows upwards from `bottom`; surfaces whose y axis points down
/// pass the bottom edge as `bottom` and a negative height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRect {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl ProjectionRect {
    pub fn new(left: f32, bottom: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    /// Rect for a y-down surface whose top-left corner is at (`x`, `y`).
    pub fn y_down(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y + height, width, -height)
    }
}

/// One axis label: `position` is the fraction along the axis in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub position: f32,
    pub value: f32,
}

pub struct ChartProjector;

impl ChartProjector {
    /// Maps data points into `rect`. The x domain is the series' own first
    /// and last x; the y domain is the declared `[value_min, value_max]`,
    /// without clamping. Fewer than two points yield no geometry.
    pub fn project(
        points: &[ChartPoint],
        value_min: f32,
        value_max: f32,
        rect: ProjectionRect,
    ) -> Vec<ChartPoint> {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Vec::new();
        };
        if points.len() < 2 {
            return Vec::new();
        }

        let x_span = (last.x - first.x).max(SPAN_EPSILON);
        points
            .iter()
            .map(|p| {
                let tx = (p.x - first.x) / x_span;
                let ty = InterpHelper::normalize(p.y, value_min, value_max);
                ChartPoint::new(rect.left + tx * rect.width, rect.bottom + ty * rect.height)
            })
            .collect()
    }

    /// `count` labels spread evenly across `[value_min, value_max]`.
    /// Counts below two produce no ticks.
    pub fn axis_ticks(value_min: f32, value_max: f32, count: usize) -> Vec<AxisTick> {
        if count < 2 {
            return Vec::new();
        }
        (0..count)
            .map(|i| {
                let position = i as f32 / (count - 1) as f32;
                AxisTick {
                    position,
                    value: InterpHelper::lerp(value_min, value_max, position),
                }
            })
            .collect()
    }

    /// Time-axis labels spanning the first and last x of the series.
    pub fn time_ticks(points: &[ChartPoint], count: usize) -> Vec<AxisTick> {
        match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() >= 2 => {
                Self::axis_ticks(first.x, last.x, count)
            }
            _ => Vec::new(),
        }
    }
}
