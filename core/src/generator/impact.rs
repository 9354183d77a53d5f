use crate::generator::profile::ImpactSpec;
use crate::session::Channel;
use ndarray::Array2;

/// Applies one anomaly's triangular perturbation around `frame`, clamping
/// every touched value into its channel range. Calls for overlapping events
/// accumulate in call order.
pub fn apply_impact(channels: &mut Array2<f32>, frame: usize, impact: &ImpactSpec) {
    let frame_count = channels.ncols();
    if frame_count == 0 || frame >= frame_count {
        return;
    }

    let window = impact.half_window;
    let first = frame.saturating_sub(window);
    let last = (frame + window).min(frame_count - 1);

    for i in first..=last {
        let weight = if window == 0 {
            1.0
        } else {
            1.0 - i.abs_diff(frame) as f32 / window as f32
        };
        for channel in Channel::ALL {
            let delta = impact.deltas[channel.index()] * impact.severity * weight;
            let cell = &mut channels[[channel.index(), i]];
            *cell = channel.clamp(*cell + delta);
        }
    }
}
