//! View types passed to Askama templates.
//!
//! Handlers build these from store models so templates only see
//! preformatted strings and flags.

use chrono::{DateTime, Utc};
use statuspage_core::models::{Component, ComponentGroup, Incident, Maintenance, Metric};
use statuspage_store::StatusStore;

use crate::flash::{Flash, FlashLevel};

fn format_ts(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[derive(Debug, Clone)]
pub struct FlashView {
    pub message: String,
    pub level: &'static str,
}

impl FlashView {
    pub fn from_flash(flash: Flash) -> Self {
        Self {
            level: match flash.level {
                FlashLevel::Success => "success",
                FlashLevel::Error => "error",
            },
            message: flash.message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComponentView {
    pub name: String,
    pub status_label: &'static str,
    pub operational: bool,
}

impl ComponentView {
    pub fn from_component(component: &Component) -> Self {
        Self {
            name: component.name.clone(),
            status_label: component.status.label(),
            operational: component.status
                == statuspage_core::models::ComponentStatus::Operational,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GroupView {
    pub name: String,
    pub components: Vec<ComponentView>,
}

impl GroupView {
    pub fn from_group(group: &ComponentGroup, store: &StatusStore) -> Self {
        Self {
            name: group.name.clone(),
            components: store
                .components_for_group(group.id)
                .iter()
                .map(ComponentView::from_component)
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IncidentView {
    pub title: String,
    pub status_label: &'static str,
    pub created: String,
}

impl IncidentView {
    pub fn from_incident(incident: &Incident) -> Self {
        Self {
            title: incident.title.clone(),
            status_label: incident.status.label(),
            created: format_ts(incident.created),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaintenanceView {
    pub title: String,
    pub status_label: &'static str,
    pub scheduled_at: String,
}

impl MaintenanceView {
    pub fn from_maintenance(maintenance: &Maintenance) -> Self {
        Self {
            title: maintenance.title.clone(),
            status_label: maintenance.status.label(),
            scheduled_at: format_ts(maintenance.scheduled_at),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricRowView {
    pub id: String,
    pub title: String,
    pub status_label: &'static str,
    pub visibility: bool,
    pub expand: bool,
}

impl MetricRowView {
    pub fn from_metric(metric: &Metric) -> Self {
        Self {
            id: metric.id.to_string(),
            title: metric.title.clone(),
            status_label: metric.status.label(),
            visibility: metric.visibility,
            expand: metric.expand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statuspage_core::models::{IncidentImpact, IncidentStatus};
    use uuid::Uuid;

    #[test]
    fn incident_view_carries_status_label() {
        let now = Utc::now();
        let incident = Incident {
            id: Uuid::new_v4(),
            title: "API errors".to_string(),
            status: IncidentStatus::Identified,
            impact: IncidentImpact::Major,
            visibility: true,
            created: now,
            last_updated: now,
        };
        let view = IncidentView::from_incident(&incident);
        assert_eq!(view.status_label, "Identified");
        assert!(view.created.ends_with("UTC"));
    }
}
