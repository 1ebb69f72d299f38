use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Student record, keyed by `regNo`.
///
/// Import files carry whatever columns the college exports (name, year,
/// section, ...); those are kept untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub reg_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcm_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /students`: one student, or an array for bulk import.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StudentPayload {
    Many(Vec<Student>),
    One(Box<Student>),
}
