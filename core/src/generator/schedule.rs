use crate::generator::profile::{Profile, SchedulePolicy};
use crate::session::AnomalyEvent;
use rand::seq::SliceRandom;
use rand::Rng;

/// Reason used when a profile offers no candidate text.
pub const FALLBACK_REASON: &str = "An irregular pattern was detected.";

/// Places the profile's anomaly events for a session of `frame_count` frames.
/// The result is strictly increasing and never reaches into the profile's
/// trailing margin.
pub fn build_schedule<R: Rng + ?Sized>(
    profile: &Profile,
    frame_count: usize,
    rng: &mut R,
) -> Vec<AnomalyEvent> {
    let mut events = Vec::new();

    match &profile.schedule {
        SchedulePolicy::Spaced {
            count,
            start_frame,
            spacing,
            tail_margin,
        } => {
            let limit = frame_count.saturating_sub(*tail_margin);
            let count = rng.gen_range(count.clone());
            let mut last = *start_frame;
            for _ in 0..count {
                let frame = last + rng.gen_range(spacing.clone()).max(1);
                if frame >= limit {
                    break;
                }
                events.push(AnomalyEvent::new(frame, pick_reason(profile.reasons, rng)));
                last = frame;
            }
        }
        SchedulePolicy::Clustered {
            count,
            start_frame,
            step,
            window_end,
            tail_margin,
        } => {
            let limit = (*window_end).min(frame_count.saturating_sub(*tail_margin));
            let count = rng.gen_range(count.clone());
            let mut last: Option<usize> = None;
            for n in 0..count {
                let frame = start_frame + n * rng.gen_range(step.clone());
                if frame >= limit {
                    break;
                }
                // a short step after a long one can land on or before the
                // previous event
                if last.is_some_and(|prev| frame <= prev) {
                    continue;
                }
                events.push(AnomalyEvent::new(frame, pick_reason(profile.reasons, rng)));
                last = Some(frame);
            }
        }
        SchedulePolicy::Paired {
            first,
            min_gap,
            tail_margin,
        } => {
            let limit = frame_count.saturating_sub(*tail_margin);
            let first_frame = rng.gen_range(first.clone());
            if first_frame >= limit {
                return events;
            }
            events.push(AnomalyEvent::new(first_frame, slot_reason(profile.reasons, 0)));

            let earliest = first_frame + (*min_gap).max(1);
            if earliest < limit {
                let second = rng.gen_range(earliest..limit);
                events.push(AnomalyEvent::new(second, slot_reason(profile.reasons, 1)));
            }
        }
    }

    events
}

fn pick_reason<R: Rng + ?Sized>(reasons: &[&str], rng: &mut R) -> String {
    reasons.choose(rng).copied().unwrap_or(FALLBACK_REASON).to_string()
}

fn slot_reason(reasons: &[&str], slot: usize) -> String {
    reasons
        .get(slot)
        .or_else(|| reasons.last())
        .copied()
        .unwrap_or(FALLBACK_REASON)
        .to_string()
}
