pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f32>() / samples.len() as f32
    }

    /// Minimum and maximum of a series, `None` when empty.
    pub fn extent(samples: &[f32]) -> Option<(f32, f32)> {
        let first = *samples.first()?;
        Some(
            samples
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_sequence_is_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
        assert_eq!(StatsHelper::mean(&[2.0, 4.0]), 3.0);
    }

    #[test]
    fn extent_tracks_min_and_max() {
        assert_eq!(StatsHelper::extent(&[]), None);
        assert_eq!(StatsHelper::extent(&[3.0, -1.0, 7.5]), Some((-1.0, 7.5)));
    }
}
