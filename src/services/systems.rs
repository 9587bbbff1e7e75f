//! Systems status page.
//!
//! Telemetry figures are fixed placeholders; only the API server and database
//! entries follow the live store connectivity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::clock;

/// Health below this threshold counts as a warning.
const WARNING_HEALTH: u8 = 90;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    Online,
    Offline,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub status: SystemStatus,
    pub health: u8,
    pub cpu: u8,
    pub memory: u8,
    pub storage: u8,
    pub uptime: String,
    pub location: &'static str,
    pub last_maintenance: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemsStats {
    pub systems_online: String,
    pub warnings: usize,
    pub avg_uptime: &'static str,
    pub response_time: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SystemsData {
    pub systems: Vec<SystemInfo>,
    pub stats: SystemsStats,
}

/// Static description of one monitored system.
struct SystemSpec {
    id: &'static str,
    name: &'static str,
    kind: &'static str,
    /// Follows store connectivity instead of always reporting online.
    store_backed: bool,
    health: u8,
    cpu: u8,
    memory: u8,
    storage: u8,
    uptime_days: u32,
    location: &'static str,
    maintenance_days_ago: i64,
}

const SYSTEMS: [SystemSpec; 6] = [
    SystemSpec {
        id: "SYS-001",
        name: "API SERVER",
        kind: "API Server",
        store_backed: true,
        health: 98,
        cpu: 45,
        memory: 67,
        storage: 34,
        uptime_days: 247,
        location: "US East",
        maintenance_days_ago: 30,
    },
    SystemSpec {
        id: "SYS-002",
        name: "DATABASE CLUSTER",
        kind: "Database",
        store_backed: true,
        health: 95,
        cpu: 72,
        memory: 84,
        storage: 78,
        uptime_days: 189,
        location: "US East",
        maintenance_days_ago: 15,
    },
    SystemSpec {
        id: "SYS-003",
        name: "AUTHENTICATION SERVICE",
        kind: "Authentication",
        store_backed: false,
        health: 97,
        cpu: 23,
        memory: 45,
        storage: 12,
        uptime_days: 156,
        location: "US West",
        maintenance_days_ago: 45,
    },
    SystemSpec {
        id: "SYS-004",
        name: "WEBSOCKET SERVER",
        kind: "Real-time",
        store_backed: false,
        health: 92,
        cpu: 38,
        memory: 52,
        storage: 23,
        uptime_days: 203,
        location: "US Central",
        maintenance_days_ago: 20,
    },
    SystemSpec {
        id: "SYS-005",
        name: "FILE STORAGE",
        kind: "Storage",
        store_backed: false,
        health: 89,
        cpu: 15,
        memory: 28,
        storage: 65,
        uptime_days: 180,
        location: "US East",
        maintenance_days_ago: 7,
    },
    SystemSpec {
        id: "SYS-006",
        name: "AI PROCESSING ENGINE",
        kind: "AI Service",
        store_backed: false,
        health: 94,
        cpu: 89,
        memory: 76,
        storage: 45,
        uptime_days: 134,
        location: "US West",
        maintenance_days_ago: 35,
    },
];

impl SystemSpec {
    fn snapshot(&self, store_connected: bool, now: DateTime<Utc>) -> SystemInfo {
        let online = store_connected || !self.store_backed;
        SystemInfo {
            id: self.id,
            name: self.name,
            kind: self.kind,
            status: if online {
                SystemStatus::Online
            } else {
                SystemStatus::Offline
            },
            health: if online { self.health } else { 0 },
            cpu: self.cpu,
            memory: self.memory,
            storage: self.storage,
            uptime: format!("{} days", if online { self.uptime_days } else { 0 }),
            location: self.location,
            last_maintenance: clock::iso_date_days_ago(now, self.maintenance_days_ago),
        }
    }
}

/// Assemble the systems payload for the given store connectivity.
pub fn systems_status(store_connected: bool, now: DateTime<Utc>) -> SystemsData {
    let systems: Vec<SystemInfo> = SYSTEMS
        .iter()
        .map(|spec| spec.snapshot(store_connected, now))
        .collect();

    let online = systems
        .iter()
        .filter(|s| s.status == SystemStatus::Online)
        .count();
    let stats = SystemsStats {
        systems_online: format!("{online}/{}", systems.len()),
        warnings: systems.iter().filter(|s| s.health < WARNING_HEALTH).count(),
        avg_uptime: "99.9%",
        response_time: if store_connected { "45ms" } else { "N/A" },
    };

    SystemsData { systems, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn connected_store_reports_all_online() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap();
        let data = systems_status(true, now);
        assert_eq!(data.systems.len(), 6);
        assert_eq!(
            data.stats,
            SystemsStats {
                systems_online: "6/6".to_string(),
                warnings: 1,
                avg_uptime: "99.9%",
                response_time: "45ms",
            }
        );
        assert_eq!(data.systems[0].uptime, "247 days");
        assert_eq!(data.systems[0].last_maintenance, "2025-05-11");
    }

    #[test]
    fn disconnected_store_takes_api_and_database_offline() {
        let data = systems_status(false, Utc::now());
        assert_eq!(data.systems[0].status, SystemStatus::Offline);
        assert_eq!(data.systems[1].status, SystemStatus::Offline);
        assert_eq!(data.systems[1].health, 0);
        assert_eq!(data.systems[1].uptime, "0 days");
        assert_eq!(data.systems[2].status, SystemStatus::Online);
        assert_eq!(data.stats.systems_online, "4/6");
        assert_eq!(data.stats.warnings, 3);
        assert_eq!(data.stats.response_time, "N/A");
    }

    #[test]
    fn system_info_uses_type_key() {
        let data = systems_status(true, Utc::now());
        let json = serde_json::to_value(&data.systems[3]).unwrap();
        assert_eq!(json["type"], "Real-time");
        assert_eq!(json["status"], "online");
        assert!(json["lastMaintenance"].is_string());
    }
}
