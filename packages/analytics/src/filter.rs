//! Date-range and activity filtering.

use avy_dashboard_incident_models::{Incident, IncidentFilter};

/// Returns the incidents whose date lies in the filter's inclusive range and
/// whose primary activity is one of the allowed activities.
///
/// An empty activity set or an inverted range yields an empty result. The
/// input is never modified and the output preserves input order.
#[must_use]
pub fn filter_incidents<'a>(incidents: &'a [Incident], filter: &IncidentFilter) -> Vec<&'a Incident> {
    if filter.activities.is_empty() || filter.range.is_empty() {
        return Vec::new();
    }

    incidents.iter().filter(|i| filter.matches(i)).collect()
}
