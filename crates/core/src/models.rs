//! Status page domain types — components, incidents, maintenances,
//! metrics, and subscribers.
//!
//! Status fields are closed enums; `Resolved` and `Completed` are the
//! terminal values the dashboard counts hinge on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Components ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Operational,
    DegradedPerformance,
    PartialOutage,
    MajorOutage,
    UnderMaintenance,
}

impl ComponentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ComponentStatus::Operational => "Operational",
            ComponentStatus::DegradedPerformance => "Degraded Performance",
            ComponentStatus::PartialOutage => "Partial Outage",
            ComponentStatus::MajorOutage => "Major Outage",
            ComponentStatus::UnderMaintenance => "Under Maintenance",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentGroup {
    pub id: Uuid,
    pub name: String,
    pub visibility: bool,
    pub order: u32,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    pub status: ComponentStatus,
    pub visibility: bool,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

// ─── Incidents ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Investigating,
    Identified,
    Monitoring,
    Resolved,
}

impl IncidentStatus {
    /// Resolved is the terminal state; everything else counts as open.
    pub fn is_open(&self) -> bool {
        !matches!(self, IncidentStatus::Resolved)
    }

    pub fn label(&self) -> &'static str {
        match self {
            IncidentStatus::Investigating => "Investigating",
            IncidentStatus::Identified => "Identified",
            IncidentStatus::Monitoring => "Monitoring",
            IncidentStatus::Resolved => "Resolved",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncidentImpact {
    None,
    Minor,
    Major,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: Uuid,
    pub title: String,
    pub status: IncidentStatus,
    pub impact: IncidentImpact,
    pub visibility: bool,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

// ─── Maintenances ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl MaintenanceStatus {
    /// Completed is the terminal state; everything else counts as open.
    pub fn is_open(&self) -> bool {
        !matches!(self, MaintenanceStatus::Completed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "Scheduled",
            MaintenanceStatus::InProgress => "In Progress",
            MaintenanceStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maintenance {
    pub id: Uuid,
    pub title: String,
    pub status: MaintenanceStatus,
    pub scheduled_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub visibility: bool,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

// ─── Metrics ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Enabled,
    Disabled,
    Suspended,
}

impl MetricStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MetricStatus::Enabled => "Enabled",
            MetricStatus::Disabled => "Disabled",
            MetricStatus::Suspended => "Suspended",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub id: Uuid,
    pub title: String,
    pub status: MetricStatus,
    pub visibility: bool,
    pub expand: bool,
    pub created: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

// ─── Subscribers ───────────────────────────────────────────────────────────

/// A notification subscriber. The management key is an opaque capability
/// token (not the primary key) that grants self-service access to the
/// verify / manage / unsubscribe flows without a login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub management_key: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created: DateTime<Utc>,
}

impl Subscriber {
    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_are_not_open() {
        assert!(!IncidentStatus::Resolved.is_open());
        assert!(IncidentStatus::Investigating.is_open());
        assert!(IncidentStatus::Monitoring.is_open());
        assert!(!MaintenanceStatus::Completed.is_open());
        assert!(MaintenanceStatus::Scheduled.is_open());
    }

    #[test]
    fn statuses_serialize_snake_case() {
        let json = serde_json::to_string(&IncidentStatus::Investigating).unwrap();
        assert_eq!(json, "\"investigating\"");
        let json = serde_json::to_string(&ComponentStatus::DegradedPerformance).unwrap();
        assert_eq!(json, "\"degraded_performance\"");
    }
}
