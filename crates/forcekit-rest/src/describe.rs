//! Object and field metadata types.
//!
//! These mirror the payloads of the global describe listing and the per-object
//! describe endpoint. The full field list drives "select all fields" query
//! generation, since SOQL has no wildcard.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of the global object listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeGlobalResult {
    /// Character encoding (e.g. "UTF-8").
    #[serde(default)]
    pub encoding: String,

    /// Maximum number of records per composite batch for this org.
    #[serde(rename = "maxBatchSize", default)]
    pub max_batch_size: i64,

    /// Per-object metadata entries.
    #[serde(default)]
    pub sobjects: Vec<SObjectMeta>,
}

/// Summary metadata for one object type, as returned by the global listing.
///
/// The `urls` map carries the object's endpoint set, including the
/// collection path, the describe path and the row template used for
/// record-by-id operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SObjectMeta {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "labelPlural", default)]
    pub label_plural: String,
    #[serde(rename = "keyPrefix", default)]
    pub key_prefix: Option<String>,
    #[serde(default)]
    pub urls: HashMap<String, String>,

    #[serde(default)]
    pub custom: bool,
    #[serde(rename = "customSetting", default)]
    pub custom_setting: bool,
    #[serde(default)]
    pub createable: bool,
    #[serde(default)]
    pub updateable: bool,
    #[serde(default)]
    pub deletable: bool,
    #[serde(default)]
    pub undeletable: bool,
    #[serde(default)]
    pub queryable: bool,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub retrieveable: bool,
    #[serde(default)]
    pub layoutable: bool,
    #[serde(default)]
    pub activateable: bool,
    #[serde(default)]
    pub mergeable: bool,
    #[serde(default)]
    pub replicateable: bool,
    #[serde(default)]
    pub triggerable: bool,
    #[serde(rename = "feedEnabled", default)]
    pub feed_enabled: bool,
    #[serde(rename = "deprecatedAndHidden", default)]
    pub deprecated_and_hidden: bool,
}

/// Full metadata for one object type, as returned by its describe endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SObjectDescribe {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "labelPlural", default)]
    pub label_plural: String,
    #[serde(rename = "keyPrefix", default)]
    pub key_prefix: Option<String>,
    #[serde(default)]
    pub urls: HashMap<String, String>,
    #[serde(default)]
    pub fields: Vec<FieldDescribe>,
    #[serde(rename = "recordTypeInfos", default)]
    pub record_type_infos: Vec<RecordTypeInfo>,
    #[serde(rename = "childRelationships", default)]
    pub child_relationships: Vec<ChildRelationship>,

    #[serde(default)]
    pub custom: bool,
    #[serde(rename = "customSetting", default)]
    pub custom_setting: bool,
    #[serde(default)]
    pub createable: bool,
    #[serde(default)]
    pub updateable: bool,
    #[serde(default)]
    pub deletable: bool,
    #[serde(default)]
    pub undeletable: bool,
    #[serde(default)]
    pub queryable: bool,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub retrieveable: bool,
    #[serde(default)]
    pub layoutable: bool,
    #[serde(rename = "compactLayoutable", default)]
    pub compact_layoutable: bool,
    #[serde(rename = "searchLayoutable", default)]
    pub search_layoutable: bool,
    #[serde(rename = "lookupLayoutable", default)]
    pub lookup_layoutable: bool,
    #[serde(default)]
    pub listviewable: bool,
    #[serde(default)]
    pub activateable: bool,
    #[serde(default)]
    pub mergeable: bool,
    #[serde(default)]
    pub replicateable: bool,
    #[serde(default)]
    pub triggerable: bool,
    #[serde(rename = "feedEnabled", default)]
    pub feed_enabled: bool,
    #[serde(rename = "deprecatedAndHidden", default)]
    pub deprecated_and_hidden: bool,

    /// Comma-joined list of every selectable field name, computed locally
    /// after the describe fetch. Geolocation compound fields are left out
    /// because a flat SOQL projection cannot select them.
    #[serde(skip)]
    pub all_fields: String,
}

impl SObjectDescribe {
    /// Recompute `all_fields` from the current field list.
    pub(crate) fn precompute_all_fields(&mut self) {
        let names: Vec<&str> = self
            .fields
            .iter()
            .filter(|field| field.field_type != "location")
            .map(|field| field.name.as_str())
            .collect();
        self.all_fields = names.join(", ");
    }

    /// Look up a field's metadata by API name.
    pub fn field(&self, name: &str) -> Option<&FieldDescribe> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Metadata for a single field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDescribe {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(rename = "soapType", default)]
    pub soap_type: String,

    #[serde(default)]
    pub length: i64,
    #[serde(rename = "byteLength", default)]
    pub byte_length: i64,
    #[serde(default)]
    pub precision: i64,
    #[serde(default)]
    pub scale: i64,
    #[serde(default)]
    pub digits: i64,

    #[serde(default)]
    pub custom: bool,
    #[serde(default)]
    pub createable: bool,
    #[serde(default)]
    pub updateable: bool,
    #[serde(default)]
    pub nillable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub groupable: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub calculated: bool,
    #[serde(rename = "caseSensitive", default)]
    pub case_sensitive: bool,
    #[serde(rename = "nameField", default)]
    pub name_field: bool,
    #[serde(rename = "namePointing", default)]
    pub name_pointing: bool,
    #[serde(rename = "autoNumber", default)]
    pub auto_number: bool,
    #[serde(rename = "externalId", default)]
    pub external_id: bool,
    #[serde(rename = "idLookup", default)]
    pub id_lookup: bool,
    #[serde(rename = "htmlFormatted", default)]
    pub html_formatted: bool,
    #[serde(rename = "defaultedOnCreate", default)]
    pub defaulted_on_create: bool,
    #[serde(rename = "dependentPicklist", default)]
    pub dependent_picklist: bool,
    #[serde(rename = "restrictedPicklist", default)]
    pub restricted_picklist: bool,
    #[serde(default)]
    pub permissionable: bool,
    #[serde(rename = "writeRequiresMasterRead", default)]
    pub write_requires_master_read: bool,
    #[serde(rename = "displayLocationInDecimal", default)]
    pub display_location_in_decimal: bool,
    #[serde(rename = "cascadeDelete", default)]
    pub cascade_delete: bool,
    #[serde(rename = "restrictedDelete", default)]
    pub restricted_delete: bool,
    #[serde(rename = "deprecatedAndHidden", default)]
    pub deprecated_and_hidden: bool,

    #[serde(rename = "defaultValue", default)]
    pub default_value: Option<serde_json::Value>,
    #[serde(rename = "defaultValueFormula", default)]
    pub default_value_formula: Option<String>,
    #[serde(rename = "calculatedFormula", default)]
    pub calculated_formula: Option<String>,
    #[serde(rename = "inlineHelpText", default)]
    pub inline_help_text: Option<String>,
    #[serde(rename = "controllerName", default)]
    pub controller_name: Option<String>,

    #[serde(rename = "referenceTo", default)]
    pub reference_to: Vec<String>,
    #[serde(rename = "relationshipName", default)]
    pub relationship_name: Option<String>,
    #[serde(rename = "relationshipOrder", default)]
    pub relationship_order: Option<i64>,

    #[serde(rename = "picklistValues", default)]
    pub picklist_values: Vec<PicklistValue>,
}

/// One admissible value of a picklist field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PicklistValue {
    pub value: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub active: bool,
    #[serde(rename = "defaultValue", default)]
    pub default_value: bool,
    #[serde(rename = "validFor", default)]
    pub valid_for: Option<String>,
}

/// Record type metadata for an object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordTypeInfo {
    pub name: String,
    #[serde(rename = "recordTypeId", default)]
    pub record_type_id: String,
    #[serde(default)]
    pub available: bool,
    #[serde(rename = "defaultRecordTypeMapping", default)]
    pub default_record_type_mapping: bool,
    #[serde(default)]
    pub urls: HashMap<String, String>,
}

/// A child relationship hanging off an object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChildRelationship {
    pub field: String,
    #[serde(rename = "childSObject", default)]
    pub child_sobject: String,
    #[serde(rename = "relationshipName", default)]
    pub relationship_name: Option<String>,
    #[serde(rename = "cascadeDelete", default)]
    pub cascade_delete: bool,
    #[serde(rename = "restrictedDelete", default)]
    pub restricted_delete: bool,
    #[serde(rename = "deprecatedAndHidden", default)]
    pub deprecated_and_hidden: bool,
}
