//! Record types and the [`SObject`] trait.
//!
//! Any serde-capable struct becomes usable with the record operations by
//! implementing [`SObject`], which ties the Rust type to its API object name.
//! [`SystemFields`] carries the platform-managed columns shared by every
//! object and is meant to be embedded with `#[serde(flatten)]`.

use crate::datetime::SfDateTime;
use serde::{Deserialize, Serialize};

/// Binds a record struct to its object type on the platform.
///
/// ```rust,ignore
/// #[derive(Serialize, Deserialize)]
/// struct Invoice__c {
///     #[serde(flatten)]
///     system: SystemFields,
///     #[serde(rename = "Reference__c")]
///     reference: String,
/// }
///
/// impl SObject for Invoice__c {
///     fn api_name() -> &'static str {
///         "Invoice__c"
///     }
///
///     fn external_id_field() -> Option<&'static str> {
///         Some("Reference__c")
///     }
/// }
/// ```
pub trait SObject {
    /// API name of the object type, e.g. `"Account"` or `"Invoice__c"`.
    fn api_name() -> &'static str
    where
        Self: Sized;

    /// Field used for external-id addressing. Most objects have none, so the
    /// default returns `None` and the external-id operations refuse to run.
    fn external_id_field() -> Option<&'static str>
    where
        Self: Sized,
    {
        None
    }
}

/// The `attributes` envelope present on records returned by queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordAttributes {
    #[serde(rename = "type", default)]
    pub sobject_type: String,
    #[serde(default)]
    pub url: String,
}

/// Platform-managed columns shared by standard and custom objects.
///
/// Empty strings and `None` values are dropped on serialization, so a
/// freshly constructed record produces a clean insert payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<RecordAttributes>,

    #[serde(rename = "Id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "Name", default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "IsDeleted", default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,

    #[serde(
        rename = "CreatedDate",
        default,
        with = "crate::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_date: Option<SfDateTime>,
    #[serde(rename = "CreatedById", default, skip_serializing_if = "String::is_empty")]
    pub created_by_id: String,
    #[serde(
        rename = "LastModifiedDate",
        default,
        with = "crate::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified_date: Option<SfDateTime>,
    #[serde(
        rename = "LastModifiedById",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub last_modified_by_id: String,
    #[serde(
        rename = "SystemModstamp",
        default,
        with = "crate::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub system_modstamp: Option<SfDateTime>,
}

/// Result of an insert.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SaveResult {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<SaveError>,
}

/// Result of an upsert by external id.
///
/// `created` distinguishes the two outcomes: a new record was inserted, or
/// an existing one matched the external id and was updated. In the update
/// case the platform sends no body, so `id` is empty.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpsertResult {
    #[serde(default)]
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub errors: Vec<SaveError>,
}

/// Field-level error attached to a save result.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SaveError {
    #[serde(rename = "statusCode", default)]
    pub status_code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub fields: Vec<String>,
}

// ===== Standard objects =====

/// The standard Account object, limited to commonly used fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Account {
    #[serde(flatten)]
    pub system: SystemFields,

    #[serde(rename = "BillingStreet", default, skip_serializing_if = "String::is_empty")]
    pub billing_street: String,
    #[serde(rename = "BillingCity", default, skip_serializing_if = "String::is_empty")]
    pub billing_city: String,
    #[serde(rename = "BillingState", default, skip_serializing_if = "String::is_empty")]
    pub billing_state: String,
    #[serde(
        rename = "BillingPostalCode",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub billing_postal_code: String,
    #[serde(
        rename = "BillingCountry",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub billing_country: String,
}

impl SObject for Account {
    fn api_name() -> &'static str {
        "Account"
    }
}

/// The standard Lead object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lead {
    #[serde(flatten)]
    pub system: SystemFields,

    #[serde(rename = "Company", default, skip_serializing_if = "String::is_empty")]
    pub company: String,
    #[serde(rename = "FirstName", default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(rename = "LastName", default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(rename = "Email", default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(rename = "Status", default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(rename = "OwnerId", default, skip_serializing_if = "String::is_empty")]
    pub owner_id: String,
    #[serde(rename = "IsConverted", default, skip_serializing_if = "Option::is_none")]
    pub is_converted: Option<bool>,
    #[serde(
        rename = "ConvertedDate",
        default,
        with = "crate::datetime::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub converted_date: Option<SfDateTime>,
}

impl SObject for Lead {
    fn api_name() -> &'static str {
        "Lead"
    }
}

/// The standard User object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub system: SystemFields,

    #[serde(rename = "Username", default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(rename = "Alias", default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(rename = "Email", default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(rename = "FirstName", default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(rename = "LastName", default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(
        rename = "CommunityNickname",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub community_nickname: String,
    #[serde(rename = "ProfileId", default, skip_serializing_if = "String::is_empty")]
    pub profile_id: String,
    #[serde(
        rename = "EmailEncodingKey",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub email_encoding_key: String,
    #[serde(
        rename = "LanguageLocaleKey",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub language_locale_key: String,
    #[serde(
        rename = "LocaleSidKey",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub locale_sid_key: String,
    #[serde(
        rename = "TimeZoneSidKey",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub time_zone_sid_key: String,
    #[serde(
        rename = "SmallPhotoUrl",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub small_photo_url: String,
    #[serde(
        rename = "FullPhotoUrl",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub full_photo_url: String,
}

impl SObject for User {
    fn api_name() -> &'static str {
        "User"
    }
}
