//! EPA emissions test records, keyed to vehicles by `epa_id`

use serde::{Deserialize, Serialize};

use fe_srm::{FieldDescriptor, Relational, SqlValue, Timestamp};

use super::parse::{parse_float, parse_int};

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionsInfo {
    #[serde(skip)]
    pub id: i64,
    pub updated: Timestamp,
    pub emission_std_code: String,
    pub emission_std_txt: String,
    pub engine_family_id: String,
    /// Links the emissions record to its vehicle record.
    #[serde(skip)]
    pub epa_id: i64,
    pub f1_smog_rating: f64, // EPA 1..10 smog rating for fuel 1
    pub f2_smog_rating: f64,
    pub sales_area: i64,
    pub smartway_score: i64,
}

impl EmissionsInfo {
    pub fn from_raw(raw: &RawEmissionsInfo) -> Self {
        EmissionsInfo {
            id: 0,
            updated: Timestamp::default(),
            emission_std_code: raw.emission_std_code.clone(),
            emission_std_txt: raw.emission_std_txt.clone(),
            engine_family_id: raw.engine_family_id.clone(),
            epa_id: parse_int(&raw.epa_id),
            f1_smog_rating: parse_float(&raw.f1_smog_rating),
            f2_smog_rating: parse_float(&raw.f2_smog_rating),
            sales_area: parse_int(&raw.sales_area),
            smartway_score: parse_int(&raw.smartway_score),
        }
    }
}

impl Relational for EmissionsInfo {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        static FIELDS: &[FieldDescriptor<EmissionsInfo>] = &[
            FieldDescriptor::int("id", |e: &EmissionsInfo| SqlValue::Int(e.id), |e, x| e.id = x.into_int())
                .primary_key(),
            FieldDescriptor::timestamp(
                "updated",
                |e: &EmissionsInfo| SqlValue::Timestamp(e.updated.0),
                |e, x| e.updated = x.into_timestamp(),
            )
            .auto_set(),
            FieldDescriptor::text(
                "emission_std_code",
                |e| SqlValue::Text(e.emission_std_code.clone()),
                |e, x| e.emission_std_code = x.into_text(),
            ),
            FieldDescriptor::text(
                "emission_std_txt",
                |e| SqlValue::Text(e.emission_std_txt.clone()),
                |e, x| e.emission_std_txt = x.into_text(),
            ),
            FieldDescriptor::text(
                "engine_family_id",
                |e| SqlValue::Text(e.engine_family_id.clone()),
                |e, x| e.engine_family_id = x.into_text(),
            ),
            FieldDescriptor::int("epa_id", |e| SqlValue::Int(e.epa_id), |e, x| {
                e.epa_id = x.into_int()
            }),
            FieldDescriptor::float(
                "f1_smog_rating",
                |e| SqlValue::Float(e.f1_smog_rating),
                |e, x| e.f1_smog_rating = x.into_float(),
            ),
            FieldDescriptor::float(
                "f2_smog_rating",
                |e| SqlValue::Float(e.f2_smog_rating),
                |e, x| e.f2_smog_rating = x.into_float(),
            ),
            FieldDescriptor::int(
                "sales_area",
                |e| SqlValue::Int(e.sales_area),
                |e, x| e.sales_area = x.into_int(),
            ),
            FieldDescriptor::int(
                "smartway_score",
                |e| SqlValue::Int(e.smartway_score),
                |e, x| e.smartway_score = x.into_int(),
            ),
        ];
        FIELDS
    }
}

/// Collection wrapper matching the feed's emissions document root.
#[derive(Debug, Default, Deserialize)]
pub struct RawEmissionsReport {
    #[serde(rename = "emissionsInfo", default)]
    pub emissions: Vec<RawEmissionsInfo>,
}

/// All-string mirror of one `<emissionsInfo>` element.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawEmissionsInfo {
    #[serde(rename = "standard")]
    pub emission_std_code: String,
    #[serde(rename = "stdText")]
    pub emission_std_txt: String,
    #[serde(rename = "efid")]
    pub engine_family_id: String,
    #[serde(rename = "id")]
    pub epa_id: String,
    #[serde(rename = "score")]
    pub f1_smog_rating: String,
    #[serde(rename = "scoreAlt")]
    pub f2_smog_rating: String,
    #[serde(rename = "salesArea")]
    pub sales_area: String,
    #[serde(rename = "smartwayScore")]
    pub smartway_score: String,
}
