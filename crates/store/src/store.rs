//! Thread-safe in-memory store for component groups, components,
//! incidents, maintenances, metrics, and subscribers.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use statuspage_core::models::*;
use tracing::info;
use uuid::Uuid;

use crate::keys::generate_management_key;

/// Outcome of a verify attempt against a management key.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOutcome {
    /// The subscriber was unverified; `email_verified_at` is now set.
    Verified(Subscriber),
    /// The subscriber was already verified; nothing changed.
    AlreadyVerified,
    /// No subscriber matches the key.
    NotFound,
}

pub struct StatusStore {
    component_groups: DashMap<Uuid, ComponentGroup>,
    components: DashMap<Uuid, Component>,
    incidents: DashMap<Uuid, Incident>,
    maintenances: DashMap<Uuid, Maintenance>,
    metrics: DashMap<Uuid, Metric>,
    subscribers: DashMap<Uuid, Subscriber>,
    /// Management key -> subscriber id index.
    subscriber_keys: DashMap<String, Uuid>,
}

impl StatusStore {
    /// An empty store, for tests and for deployments that load real data.
    pub fn empty() -> Self {
        Self {
            component_groups: DashMap::new(),
            components: DashMap::new(),
            incidents: DashMap::new(),
            maintenances: DashMap::new(),
            metrics: DashMap::new(),
            subscribers: DashMap::new(),
            subscriber_keys: DashMap::new(),
        }
    }

    /// A store pre-populated with demo data for development.
    pub fn new() -> Self {
        info!("Status store initialized (in-memory, development mode)");
        let store = Self::empty();
        store.seed_demo_data();
        store
    }

    // ─── Component groups ──────────────────────────────────────────────────

    pub fn upsert_component_group(&self, group: ComponentGroup) {
        self.component_groups.insert(group.id, group);
    }

    pub fn upsert_component(&self, component: Component) {
        self.components.insert(component.id, component);
    }

    /// Groups with the visibility flag set, in display order.
    pub fn visible_component_groups(&self) -> Vec<ComponentGroup> {
        let mut groups: Vec<ComponentGroup> = self
            .component_groups
            .iter()
            .filter(|r| r.value().visibility)
            .map(|r| r.value().clone())
            .collect();
        groups.sort_by_key(|g| g.order);
        groups
    }

    /// Visible components of a group, alphabetical.
    pub fn components_for_group(&self, group_id: Uuid) -> Vec<Component> {
        let mut components: Vec<Component> = self
            .components
            .iter()
            .filter(|r| r.value().group_id == group_id && r.value().visibility)
            .map(|r| r.value().clone())
            .collect();
        components.sort_by(|a, b| a.name.cmp(&b.name));
        components
    }

    /// True when every visible component is operational.
    pub fn all_operational(&self) -> bool {
        self.components
            .iter()
            .filter(|r| r.value().visibility)
            .all(|r| r.value().status == ComponentStatus::Operational)
    }

    // ─── Incidents ─────────────────────────────────────────────────────────

    pub fn upsert_incident(&self, incident: Incident) {
        self.incidents.insert(incident.id, incident);
    }

    /// Incidents with a non-terminal status, newest first. `public_only`
    /// additionally filters on the visibility flag.
    pub fn open_incidents(&self, public_only: bool) -> Vec<Incident> {
        let mut incidents: Vec<Incident> = self
            .incidents
            .iter()
            .filter(|r| r.value().status.is_open() && (!public_only || r.value().visibility))
            .map(|r| r.value().clone())
            .collect();
        incidents.sort_by(|a, b| b.created.cmp(&a.created));
        incidents
    }

    /// Resolved incidents, newest first, with the same visibility rule.
    pub fn resolved_incidents(&self, public_only: bool) -> Vec<Incident> {
        let mut incidents: Vec<Incident> = self
            .incidents
            .iter()
            .filter(|r| {
                r.value().status == IncidentStatus::Resolved
                    && (!public_only || r.value().visibility)
            })
            .map(|r| r.value().clone())
            .collect();
        incidents.sort_by(|a, b| b.created.cmp(&a.created));
        incidents
    }

    // ─── Maintenances ──────────────────────────────────────────────────────

    pub fn upsert_maintenance(&self, maintenance: Maintenance) {
        self.maintenances.insert(maintenance.id, maintenance);
    }

    /// Maintenances with a non-terminal status.
    pub fn open_maintenances(&self) -> Vec<Maintenance> {
        let mut maintenances: Vec<Maintenance> = self
            .maintenances
            .iter()
            .filter(|r| r.value().status.is_open())
            .map(|r| r.value().clone())
            .collect();
        maintenances.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
        maintenances
    }

    /// Open maintenances whose scheduled time has not passed yet.
    pub fn upcoming_maintenances(&self, now: DateTime<Utc>) -> Vec<Maintenance> {
        let mut maintenances: Vec<Maintenance> = self
            .maintenances
            .iter()
            .filter(|r| r.value().status.is_open() && r.value().scheduled_at >= now)
            .map(|r| r.value().clone())
            .collect();
        maintenances.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
        maintenances
    }

    // ─── Metrics ───────────────────────────────────────────────────────────

    pub fn upsert_metric(&self, metric: Metric) {
        self.metrics.insert(metric.id, metric);
    }

    pub fn list_metrics(&self) -> Vec<Metric> {
        let mut metrics: Vec<Metric> = self.metrics.iter().map(|r| r.value().clone()).collect();
        metrics.sort_by(|a, b| b.created.cmp(&a.created));
        metrics
    }

    // ─── Subscribers ───────────────────────────────────────────────────────

    /// Insert an unverified subscriber with a fresh management key.
    pub fn create_subscriber(&self, email: String) -> Subscriber {
        let subscriber = Subscriber {
            id: Uuid::new_v4(),
            email,
            management_key: generate_management_key(),
            email_verified_at: None,
            created: Utc::now(),
        };
        self.subscriber_keys
            .insert(subscriber.management_key.clone(), subscriber.id);
        self.subscribers.insert(subscriber.id, subscriber.clone());
        subscriber
    }

    pub fn subscriber_by_management_key(&self, key: &str) -> Option<Subscriber> {
        let id = *self.subscriber_keys.get(key)?.value();
        self.subscribers.get(&id).map(|r| r.value().clone())
    }

    /// Set `email_verified_at` if and only if it is still unset.
    pub fn verify_subscriber(&self, key: &str) -> VerifyOutcome {
        let Some(id) = self.subscriber_keys.get(key).map(|r| *r.value()) else {
            return VerifyOutcome::NotFound;
        };
        match self.subscribers.get_mut(&id) {
            Some(mut entry) => {
                let subscriber = entry.value_mut();
                if subscriber.email_verified_at.is_some() {
                    VerifyOutcome::AlreadyVerified
                } else {
                    subscriber.email_verified_at = Some(Utc::now());
                    VerifyOutcome::Verified(subscriber.clone())
                }
            }
            None => VerifyOutcome::NotFound,
        }
    }

    /// Remove the subscriber addressed by the key. Returns false when the
    /// key matches nothing.
    pub fn delete_subscriber(&self, key: &str) -> bool {
        let Some((_, id)) = self.subscriber_keys.remove(key) else {
            return false;
        };
        self.subscribers.remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ─── Seed data ─────────────────────────────────────────────────────────

    fn seed_demo_data(&self) {
        let now = Utc::now();

        let groups = [
            ("Core Services", 1, true),
            ("Infrastructure", 2, true),
            ("Internal Tooling", 3, false),
        ];
        let mut group_ids = Vec::new();
        for (name, order, visibility) in groups {
            let group = ComponentGroup {
                id: Uuid::new_v4(),
                name: name.to_string(),
                visibility,
                order,
                created: now,
            };
            group_ids.push(group.id);
            self.component_groups.insert(group.id, group);
        }

        let components = [
            ("Website", group_ids[0], ComponentStatus::Operational),
            ("API", group_ids[0], ComponentStatus::Operational),
            ("Database Cluster", group_ids[1], ComponentStatus::Operational),
            ("CDN", group_ids[1], ComponentStatus::Operational),
        ];
        for (name, group_id, status) in components {
            let component = Component {
                id: Uuid::new_v4(),
                group_id,
                name: name.to_string(),
                status,
                visibility: true,
                created: now,
                last_updated: now,
            };
            self.components.insert(component.id, component);
        }

        let incident = Incident {
            id: Uuid::new_v4(),
            title: "Elevated error rates on the API".to_string(),
            status: IncidentStatus::Monitoring,
            impact: IncidentImpact::Minor,
            visibility: true,
            created: now - chrono::Duration::hours(2),
            last_updated: now,
        };
        self.incidents.insert(incident.id, incident);

        let maintenance = Maintenance {
            id: Uuid::new_v4(),
            title: "Database failover exercise".to_string(),
            status: MaintenanceStatus::Scheduled,
            scheduled_at: now + chrono::Duration::days(3),
            end_at: now + chrono::Duration::days(3) + chrono::Duration::hours(2),
            visibility: true,
            created: now,
            last_updated: now,
        };
        self.maintenances.insert(maintenance.id, maintenance);

        let metrics = [
            ("API p99 latency", MetricStatus::Enabled, true, true),
            ("Request throughput", MetricStatus::Enabled, true, false),
            ("Queue depth", MetricStatus::Suspended, false, false),
        ];
        for (title, status, visibility, expand) in metrics {
            let metric = Metric {
                id: Uuid::new_v4(),
                title: title.to_string(),
                status,
                visibility,
                expand,
                created: now,
                last_updated: now,
            };
            self.metrics.insert(metric.id, metric);
        }
    }
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn incident(status: IncidentStatus, visibility: bool) -> Incident {
        let now = Utc::now();
        Incident {
            id: Uuid::new_v4(),
            title: "incident".to_string(),
            status,
            impact: IncidentImpact::Minor,
            visibility,
            created: now,
            last_updated: now,
        }
    }

    fn maintenance(status: MaintenanceStatus, scheduled_at: DateTime<Utc>) -> Maintenance {
        let now = Utc::now();
        Maintenance {
            id: Uuid::new_v4(),
            title: "maintenance".to_string(),
            status,
            scheduled_at,
            end_at: scheduled_at + Duration::hours(1),
            visibility: true,
            created: now,
            last_updated: now,
        }
    }

    #[test]
    fn open_incidents_excludes_resolved() {
        let store = StatusStore::empty();
        store.upsert_incident(incident(IncidentStatus::Investigating, true));
        store.upsert_incident(incident(IncidentStatus::Monitoring, true));
        store.upsert_incident(incident(IncidentStatus::Resolved, true));

        assert_eq!(store.open_incidents(false).len(), 2);
        assert_eq!(store.resolved_incidents(false).len(), 1);
    }

    #[test]
    fn public_queries_respect_visibility() {
        let store = StatusStore::empty();
        store.upsert_incident(incident(IncidentStatus::Investigating, true));
        store.upsert_incident(incident(IncidentStatus::Investigating, false));

        assert_eq!(store.open_incidents(true).len(), 1);
        assert_eq!(store.open_incidents(false).len(), 2);
    }

    #[test]
    fn upcoming_maintenances_window() {
        let store = StatusStore::empty();
        let now = Utc::now();
        store.upsert_maintenance(maintenance(MaintenanceStatus::Scheduled, now + Duration::days(1)));
        store.upsert_maintenance(maintenance(MaintenanceStatus::Scheduled, now - Duration::days(1)));
        store.upsert_maintenance(maintenance(MaintenanceStatus::Completed, now + Duration::days(1)));

        assert_eq!(store.open_maintenances().len(), 2);
        assert_eq!(store.upcoming_maintenances(now).len(), 1);
    }

    #[test]
    fn verify_sets_timestamp_exactly_once() {
        let store = StatusStore::empty();
        let subscriber = store.create_subscriber("ops@example.com".to_string());
        assert!(!subscriber.is_verified());

        let outcome = store.verify_subscriber(&subscriber.management_key);
        let verified_at = match outcome {
            VerifyOutcome::Verified(s) => s.email_verified_at.unwrap(),
            other => panic!("expected Verified, got {:?}", other),
        };

        // Second attempt must not move the timestamp
        assert_eq!(
            store.verify_subscriber(&subscriber.management_key),
            VerifyOutcome::AlreadyVerified
        );
        let unchanged = store
            .subscriber_by_management_key(&subscriber.management_key)
            .unwrap();
        assert_eq!(unchanged.email_verified_at, Some(verified_at));
    }

    #[test]
    fn verify_unknown_key_is_not_found() {
        let store = StatusStore::empty();
        assert_eq!(store.verify_subscriber("no-such-key"), VerifyOutcome::NotFound);
    }

    #[test]
    fn delete_removes_key_lookup() {
        let store = StatusStore::empty();
        let subscriber = store.create_subscriber("ops@example.com".to_string());

        assert!(store.delete_subscriber(&subscriber.management_key));
        assert!(store
            .subscriber_by_management_key(&subscriber.management_key)
            .is_none());
        assert_eq!(store.subscriber_count(), 0);
        // Deleting again is a no-op
        assert!(!store.delete_subscriber(&subscriber.management_key));
    }

    #[test]
    fn seeded_store_has_visible_groups() {
        let store = StatusStore::new();
        let groups = store.visible_component_groups();
        assert!(!groups.is_empty());
        for group in &groups {
            assert!(group.visibility);
        }
        // Orders are ascending
        for pair in groups.windows(2) {
            assert!(pair[0].order <= pair[1].order);
        }
    }
}
