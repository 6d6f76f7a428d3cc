use serde::{Deserialize, Serialize};

use crate::repos::ProfileRow;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i64,
    pub account_id: i64,
    pub managed_by_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub screen_name: String,
}

impl From<ProfileRow> for ProfileResponse {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            account_id: row.account_id,
            managed_by_id: row.managed_by_id,
            first_name: row.first_name,
            last_name: row.last_name,
            screen_name: row.screen_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignCoManagerRequest {
    pub manager_id: Option<i64>,
}

impl AssignCoManagerRequest {
    pub fn validate(&self) -> Result<i64, &'static str> {
        match self.manager_id {
            Some(id) if id > 0 => Ok(id),
            _ => Err("managerId is required"),
        }
    }
}
