//! Plant domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Plant joined with its category name
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Plant {
    pub id: i32,
    pub category_id: Option<i32>,
    pub category_name: Option<String>, // Joined from category table
    pub name: String,
    pub last_media_changed: Option<DateTime<Utc>>,
    pub code: Option<String>,
    pub location: Option<String>,
    pub pot_description: Option<String>,
    pub watering_frequency: Option<String>,
    pub notes: Option<String>,
    pub photo_path: Option<String>,
}

/// Raw `plant` row as returned by DELETE ... RETURNING *
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlantRecord {
    pub id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub last_media_changed: Option<DateTime<Utc>>,
    pub code: Option<String>,
    pub location: Option<String>,
    pub pot_description: Option<String>,
    pub watering_frequency: Option<String>,
    pub notes: Option<String>,
    pub photo_path: Option<String>,
}

/// Create / update plant request (full replacement)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PlantRequest {
    pub category_id: Option<i32>,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    #[validate(length(min = 1, max = 255, message = "Plant name is required"))]
    pub name: String,
    pub last_media_changed: Option<DateTime<Utc>>,
    pub code: Option<String>,
    pub location: Option<String>,
    pub pot_description: Option<String>,
    pub watering_frequency: Option<String>,
    pub notes: Option<String>,
    pub photo_path: Option<String>,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeletedPlantResponse {
    pub message: String,
    #[serde(rename = "deletedPlant")]
    pub deleted_plant: PlantRecord,
}
