use crate::models::ApplicationStatus;

/// Transient query parameters for list views. `None` on a dropdown filter
/// means "all". Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub search_term: String,
    pub status_filter: Option<ApplicationStatus>,
    pub location_filter: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
    }

    pub fn set_status_filter(&mut self, status: Option<ApplicationStatus>) {
        self.status_filter = status;
    }

    pub fn set_location_filter(&mut self, location: Option<String>) {
        self.location_filter = location;
    }

    /// Back to defaults: empty search, all statuses, all locations.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty()
            || self.status_filter.is_some()
            || self.location_filter.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_all_three_fields() {
        let mut filter = FilterState::new();
        filter.set_search_term("react");
        filter.set_status_filter(Some(ApplicationStatus::Offer));
        filter.set_location_filter(Some("Remote".to_string()));
        assert!(filter.is_active());

        filter.clear();
        assert_eq!(filter, FilterState::default());
        assert!(!filter.is_active());
    }
}
