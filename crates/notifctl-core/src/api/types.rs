//! Wire types for the notifications and integrations REST APIs.

use notifctl_types::{EventType, Facet};
use serde::Deserialize;

/// `GET /notifications/eventTypes` response.
#[derive(Debug, Deserialize)]
pub(crate) struct EventTypesResponse {
    pub data: Vec<EventTypeRecord>,
    pub meta: Meta,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Meta {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventTypeRecord {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub application: ApplicationRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationRecord {
    pub display_name: String,
}

impl EventTypeRecord {
    pub fn into_event_type(self, bundle_display_name: &str) -> EventType {
        EventType {
            id: self.id,
            name: self.name,
            display_name: self.display_name,
            application_display_name: self.application.display_name,
            bundle_display_name: bundle_display_name.to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
        }
    }
}

/// `GET /notifications/facets/bundles` response.
pub(crate) type BundleFacetsResponse = Vec<Facet>;

/// `GET /endpoints/{id}` response (only the fields we read).
#[derive(Debug, Deserialize)]
pub(crate) struct EndpointResponse {
    #[serde(default)]
    pub event_types_group_by_bundles_and_applications: Option<Vec<BundleGroup>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BundleGroup {
    pub display_name: String,
    #[serde(default)]
    pub applications: Vec<ApplicationGroup>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationGroup {
    pub display_name: String,
    #[serde(default)]
    pub event_types: Vec<GroupedEventType>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupedEventType {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl EndpointResponse {
    /// Flattens the bundle/application grouping into event types.
    pub fn into_event_types(self) -> Vec<EventType> {
        self.event_types_group_by_bundles_and_applications
            .unwrap_or_default()
            .into_iter()
            .flat_map(|bundle| {
                let bundle_name = bundle.display_name;
                bundle.applications.into_iter().flat_map(move |app| {
                    let bundle_name = bundle_name.clone();
                    let app_name = app.display_name;
                    app.event_types.into_iter().map(move |event| EventType {
                        id: event.id,
                        name: event.name,
                        display_name: event.display_name,
                        application_display_name: app_name.clone(),
                        bundle_display_name: bundle_name.clone(),
                        description: event.description.filter(|d| !d.trim().is_empty()),
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_event_type_record_maps_application_and_bundle() {
        let record: EventTypeRecord = serde_json::from_value(json!({
            "id": "e1",
            "name": "new-recommendation",
            "display_name": "New recommendation",
            "description": "",
            "application_id": "a1",
            "application": {"id": "a1", "name": "advisor", "display_name": "Advisor", "bundle_id": "b1"}
        }))
        .unwrap();
        let event = record.into_event_type("Red Hat Enterprise Linux");
        assert_eq!(event.application_display_name, "Advisor");
        assert_eq!(event.bundle_display_name, "Red Hat Enterprise Linux");
        assert_eq!(event.description, None);
    }

    #[test]
    fn test_endpoint_groups_flatten_across_bundles() {
        let response: EndpointResponse = serde_json::from_value(json!({
            "id": "ep1",
            "name": "my webhook",
            "event_types_group_by_bundles_and_applications": [
                {
                    "id": "b1",
                    "display_name": "Red Hat Enterprise Linux",
                    "applications": [
                        {"id": "a1", "display_name": "Advisor", "event_types": [
                            {"id": "e1", "display_name": "New recommendation"},
                            {"id": "e2", "display_name": "Resolved recommendation"}
                        ]}
                    ]
                },
                {
                    "id": "b2",
                    "display_name": "OpenShift",
                    "applications": [
                        {"id": "a2", "display_name": "Cluster Manager", "event_types": [
                            {"id": "e3", "display_name": "Cluster update"}
                        ]}
                    ]
                }
            ]
        }))
        .unwrap();

        let events = response.into_event_types();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].bundle_display_name, "OpenShift");
        assert_eq!(events[2].application_display_name, "Cluster Manager");
    }

    #[test]
    fn test_endpoint_without_grouping_has_no_event_types() {
        let response: EndpointResponse = serde_json::from_value(json!({"id": "ep1"})).unwrap();
        assert!(response.into_event_types().is_empty());
    }
}
