//! Communication: tickets, comments, assignments and the ticket catalogs

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::mapping::{
    deserialize_normalized, normalize_keys, null_to_default, opt_timestamp, FromRecord,
};
use crate::Result;

/// `{Id, Code}` reference used for ticket priority, status and source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRef {
    pub id: Option<i64>,
    pub code: Option<String>,
}

/// Comment attached to a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketComment {
    pub id: i64,
    pub created_at: DateTime<FixedOffset>,
    pub content: String,
    pub user_name: String,
}

/// Link between a ticket and a domain entity (use unit, person, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketAssignment {
    pub id: i64,
    pub assignment_entity_id: i64,
    pub assignment_entity_code: String,
    pub entity_id: i64,
}

/// Ticket as returned by `CommunicationRead/Ticket`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub id_num: Option<String>,
    pub time_received: Option<DateTime<FixedOffset>>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub department_id: Option<i64>,
    pub user_id: Option<i64>,
    pub priority: Option<TicketRef>,
    pub status: Option<TicketRef>,
    pub source: Option<TicketRef>,
    pub comments: Vec<TicketComment>,
    pub main_assignment: Option<TicketAssignment>,
    pub assignments: Vec<TicketAssignment>,
}

/// Wire shape of a ticket before sub-items are validated one by one.
#[derive(Deserialize)]
struct RawTicket {
    id: i64,
    id_num: Option<String>,
    #[serde(default, deserialize_with = "opt_timestamp")]
    time_received: Option<DateTime<FixedOffset>>,
    subject: Option<String>,
    content: Option<String>,
    department_id: Option<i64>,
    user_id: Option<i64>,
    priority: Option<TicketRef>,
    status: Option<TicketRef>,
    source: Option<TicketRef>,
    #[serde(default, deserialize_with = "null_to_default")]
    comments: Vec<Value>,
    main_assignment: Option<Value>,
    #[serde(default, deserialize_with = "null_to_default")]
    assignment: Vec<Value>,
}

#[derive(Deserialize)]
struct RawComment {
    id: i64,
    #[serde(deserialize_with = "opt_timestamp")]
    created_at: Option<DateTime<FixedOffset>>,
    content: String,
    user_name: String,
}

#[derive(Deserialize)]
struct RawAssignmentEntity {
    id: i64,
    code: String,
}

#[derive(Deserialize)]
struct RawAssignment {
    id: i64,
    assignment_entity: RawAssignmentEntity,
    entity_id: i64,
}

fn map_comment(ticket_id: i64, raw: Value) -> Option<TicketComment> {
    match serde_json::from_value::<RawComment>(raw) {
        Ok(RawComment { id, created_at: Some(created_at), content, user_name }) => {
            Some(TicketComment { id, created_at, content, user_name })
        }
        Ok(RawComment { id, .. }) => {
            warn!(ticket_id, comment_id = id, "skipping ticket comment without creation time");
            None
        }
        Err(e) => {
            warn!(ticket_id, error = %e, "skipping malformed ticket comment");
            None
        }
    }
}

fn map_assignment(ticket_id: i64, raw: Value) -> Option<TicketAssignment> {
    match serde_json::from_value::<RawAssignment>(raw) {
        Ok(a) => Some(TicketAssignment {
            id: a.id,
            assignment_entity_id: a.assignment_entity.id,
            assignment_entity_code: a.assignment_entity.code,
            entity_id: a.entity_id,
        }),
        Err(e) => {
            warn!(ticket_id, error = %e, "skipping malformed ticket assignment");
            None
        }
    }
}

impl FromRecord for Ticket {
    /// Comments and assignments missing a field are logged and dropped; the
    /// rest of the ticket is still returned.
    fn from_record(record: &Value) -> Result<Self> {
        let raw: RawTicket = deserialize_normalized(record)?;
        let ticket_id = raw.id;

        Ok(Self {
            id: raw.id,
            id_num: raw.id_num,
            time_received: raw.time_received,
            subject: raw.subject,
            content: raw.content,
            department_id: raw.department_id,
            user_id: raw.user_id,
            priority: raw.priority,
            status: raw.status,
            source: raw.source,
            comments: raw.comments.into_iter().filter_map(|c| map_comment(ticket_id, c)).collect(),
            main_assignment: raw.main_assignment.and_then(|a| map_assignment(ticket_id, a)),
            assignments: raw
                .assignment
                .into_iter()
                .filter_map(|a| map_assignment(ticket_id, a))
                .collect(),
        })
    }
}

/// Entity reference used when creating a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityAssignment {
    pub assignment_entity_id: i64,
    pub entity_id: i64,
}

/// Request body of `CommunicationEdit/Ticket`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewTicket {
    pub subject: String,
    pub content: String,
    pub source_id: i64,
    pub priority_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Serialized as `null` when absent.
    pub main_entity_assignment: Option<EntityAssignment>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub entity_assignments: Vec<EntityAssignment>,
}

impl NewTicket {
    /// Default priority id for new tickets.
    pub const DEFAULT_PRIORITY_ID: i64 = 1;

    /// Minimal ticket with default priority and no assignments.
    pub fn new(subject: impl Into<String>, content: impl Into<String>, source_id: i64) -> Self {
        Self {
            subject: subject.into(),
            content: content.into(),
            source_id,
            priority_id: Self::DEFAULT_PRIORITY_ID,
            department_id: None,
            user_id: None,
            main_entity_assignment: None,
            entity_assignments: Vec::new(),
        }
    }

    /// Attach the ticket to a main entity.
    #[must_use]
    pub const fn with_main_assignment(mut self, assignment: EntityAssignment) -> Self {
        self.main_entity_assignment = Some(assignment);
        self
    }

    /// Attach an additional entity.
    #[must_use]
    pub fn with_assignment(mut self, assignment: EntityAssignment) -> Self {
        self.entity_assignments.push(assignment);
        self
    }
}

/// Bidirectional id/code lookup for one ticket catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMap {
    pub by_id: BTreeMap<i64, String>,
    pub by_code: BTreeMap<String, i64>,
}

impl CatalogMap {
    /// Build from raw `{Id, Code}` catalog records. Entries lacking either
    /// key are skipped.
    pub fn from_records(catalog: &str, records: &[Value]) -> Self {
        let mut map = Self::default();
        for record in records {
            let normalized = normalize_keys(record);
            let id = normalized.get("id").and_then(Value::as_i64);
            let code = normalized.get("code").and_then(Value::as_str);
            match (id, code) {
                (Some(id), Some(code)) => {
                    map.by_id.insert(id, code.to_string());
                    map.by_code.insert(code.to_string(), id);
                }
                _ => warn!(catalog, "skipping catalog entry without Id/Code"),
            }
        }
        map
    }

    /// Code for an id.
    pub fn code(&self, id: i64) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Id for a code.
    pub fn id(&self, code: &str) -> Option<i64> {
        self.by_code.get(code).copied()
    }
}

/// The four ticket catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationCatalog {
    pub assignment_entities: CatalogMap,
    pub priorities: CatalogMap,
    pub sources: CatalogMap,
    pub statuses: CatalogMap,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::map_record;

    fn ticket_record() -> Value {
        json!({
            "Id": 900,
            "IdNum": "T-900",
            "TimeReceived": "2024-02-10T09:15:00.250+0100",
            "Subject": "Heizung defekt",
            "Priority": {"Id": 2, "Code": "hoch"},
            "Status": {"Id": 1, "Code": "offen"},
            "Comments": [
                {"Id": 1, "CreatedAt": "2024-02-10T10:00:00+0100", "Content": "Techniker informiert", "UserName": "mk"},
                {"Id": 2, "CreatedAt": "2024-02-10T11:00:00+0100", "Content": "ohne Benutzer"}
            ],
            "MainAssignment": {"Id": 5, "AssignmentEntity": {"Id": 3, "Code": "UseUnit"}, "EntityId": 1001},
            "Assignment": [
                {"Id": 6, "AssignmentEntity": {"Id": 4, "Code": "Person"}, "EntityId": 501},
                {"Id": 7, "EntityId": 502}
            ]
        })
    }

    #[test]
    fn malformed_sub_items_are_skipped() {
        let ticket: Ticket = map_record(&ticket_record()).unwrap();

        assert_eq!(ticket.comments.len(), 1);
        assert_eq!(ticket.comments[0].user_name, "mk");
        assert_eq!(ticket.assignments.len(), 1);
        assert_eq!(ticket.assignments[0].assignment_entity_code, "Person");
        assert_eq!(ticket.main_assignment.as_ref().map(|a| a.entity_id), Some(1001));
        assert_eq!(ticket.priority.and_then(|p| p.code).as_deref(), Some("hoch"));
    }

    #[test]
    fn time_received_parses_with_fraction() {
        let ticket: Ticket = map_record(&ticket_record()).unwrap();
        let received = ticket.time_received.unwrap();
        assert_eq!(received.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn ticket_mapping_is_repeatable() {
        let record = ticket_record();
        assert_eq!(map_record::<Ticket>(&record).unwrap(), map_record::<Ticket>(&record).unwrap());
    }

    #[test]
    fn new_ticket_body_uses_wire_names() {
        let body = serde_json::to_value(
            NewTicket::new("Wasserschaden", "Keller nass", 2)
                .with_assignment(EntityAssignment { assignment_entity_id: 3, entity_id: 1001 }),
        )
        .unwrap();

        assert_eq!(body["Subject"], "Wasserschaden");
        assert_eq!(body["PriorityId"], 1);
        assert!(body["MainEntityAssignment"].is_null());
        assert!(body.get("DepartmentId").is_none());
        assert_eq!(body["EntityAssignments"][0]["AssignmentEntityId"], 3);
    }

    #[test]
    fn catalog_map_works_both_ways() {
        let map = CatalogMap::from_records(
            "priority",
            &[json!({"Id": 1, "Code": "normal"}), json!({"Id": 2, "Code": "hoch"}), json!({"Id": 3})],
        );
        assert_eq!(map.code(2), Some("hoch"));
        assert_eq!(map.id("normal"), Some(1));
        assert_eq!(map.by_id.len(), 2);
    }
}
