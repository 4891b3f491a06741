use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Owning client (tenant) of a mirrored record. Validated non-empty and
/// bounded; never mutated once a mirror row exists.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: String) -> Option<Self> {
        if id.is_empty() || id.len() > 100 {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ClientId {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string()).ok_or_else(|| anyhow::anyhow!("Invalid client ID"))
    }
}

/// The record collections Hostware exposes and Ovation mirrors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum EntityKind {
    Campaign,
    Chat,
    Member,
    Discount,
}

/// A single typed value in the diffable projection of a mirrored record.
///
/// Equality is by value: dates compare by instant, floats by `total_cmp`
/// (so a projection re-read from storage still compares equal).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b) == std::cmp::Ordering::Equal,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            _ => false,
        }
    }
}

/// The diffable projection of a mirrored record, keyed by field name.
/// Ordered so that serialized forms are stable.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Auxiliary untyped key/values carried on a mirror row. Merged, never
/// replaced, on update.
pub type Metadata = HashMap<String, serde_json::Value>;

/// A locally mirrored Hostware record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorEntity {
    /// Assigned by the store on insert; immutable.
    pub local_id: Uuid,
    pub client_id: ClientId,
    pub kind: EntityKind,
    /// Remote identifier. `Some` and immutable once linked; rows created
    /// through the CRUD surface may be unlinked.
    pub external_ref: Option<String>,
    pub fields: FieldMap,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    /// Stamped by reconciler-driven mutations, insert included; `None` only
    /// for rows that have never been synced.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Insert draft for a mirror row. The store assigns `local_id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMirrorEntity {
    pub client_id: ClientId,
    pub kind: EntityKind,
    pub external_ref: Option<String>,
    pub fields: FieldMap,
    pub metadata: Metadata,
}

/// What the gateway client needs to reach Hostware on behalf of one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteScope {
    pub venue_code: String,
    pub api_key: String,
}
