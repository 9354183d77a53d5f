use crate::generator::profile::{Profile, ProfileId};

/// Ordered set of offered profiles with a cycling cursor.
#[derive(Debug, Clone)]
pub struct ProfileSelector {
    profiles: Vec<ProfileId>,
    current: usize,
}

impl ProfileSelector {
    pub fn new(profiles: Vec<ProfileId>) -> Self {
        Self {
            profiles,
            current: 0,
        }
    }

    /// Moves to the next profile, wrapping at the end.
    pub fn cycle(&mut self) -> Option<ProfileId> {
        if self.profiles.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.profiles.len();
        self.active_id()
    }

    /// Selects `id` if it is offered; returns whether it was.
    pub fn select(&mut self, id: ProfileId) -> bool {
        match self.profiles.iter().position(|p| *p == id) {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    pub fn active_id(&self) -> Option<ProfileId> {
        self.profiles.get(self.current).copied()
    }

    pub fn active(&self) -> Option<Profile> {
        self.active_id().map(ProfileId::profile)
    }

    /// Letter of the active slot ("A" for the first offered profile).
    pub fn key(&self) -> char {
        (b'A' + (self.current % 26) as u8) as char
    }
}

impl Default for ProfileSelector {
    fn default() -> Self {
        Self::new(ProfileId::ALL.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_cycles_and_wraps() {
        let mut selector = ProfileSelector::default();
        assert_eq!(selector.active_id(), Some(ProfileId::Baseline));
        assert_eq!(selector.key(), 'A');
        assert_eq!(selector.cycle(), Some(ProfileId::Fatigued));
        assert_eq!(selector.cycle(), Some(ProfileId::HighPerformer));
        assert_eq!(selector.key(), 'C');
        assert_eq!(selector.cycle(), Some(ProfileId::Baseline));
    }

    #[test]
    fn empty_selector_has_no_active_profile() {
        let mut selector = ProfileSelector::new(Vec::new());
        assert!(selector.active().is_none());
        assert!(selector.cycle().is_none());
        assert!(!selector.select(ProfileId::Baseline));
    }

    #[test]
    fn select_jumps_to_offered_profile() {
        let mut selector = ProfileSelector::new(vec![ProfileId::Fatigued, ProfileId::HighPerformer]);
        assert!(selector.select(ProfileId::HighPerformer));
        assert_eq!(selector.key(), 'B');
        assert!(!selector.select(ProfileId::Baseline));
        assert_eq!(selector.active().map(|p| p.name), Some("High Performer Model"));
    }
}
