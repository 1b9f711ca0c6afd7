//! Normalisation of free-form service content.
//!
//! Service and draft content is stored as a JSON object. Fields that are
//! backed by real columns (ids, status, supplier and framework references,
//! timestamps) are never stored inside that object, whatever clients send.

use serde_json::{Map, Value};

/// Free-form service content keyed by question id.
pub type ServiceData = Map<String, Value>;

/// Keys that belong to columns or are derived on output.
pub const COLUMN_FIELDS: &[&str] = &[
    "id",
    "serviceId",
    "supplierId",
    "supplierName",
    "frameworkSlug",
    "frameworkName",
    "frameworkFramework",
    "frameworkStatus",
    "lot",
    "lotSlug",
    "lotName",
    "status",
    "createdAt",
    "updatedAt",
    "links",
];

/// Removes column-backed keys.
pub fn drop_column_fields(data: &mut ServiceData) {
    for key in COLUMN_FIELDS {
        data.remove(*key);
    }
}

/// Trims strings and list items, dropping list items left empty.
pub fn strip_whitespace(data: &mut ServiceData) {
    for value in data.values_mut() {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    *s = trimmed.to_string();
                }
            }
            Value::Array(items) => {
                items.retain_mut(|item| match item {
                    Value::String(s) => {
                        let trimmed = s.trim().to_string();
                        *s = trimmed;
                        !s.is_empty()
                    }
                    _ => true,
                });
            }
            _ => {}
        }
    }
}

/// Removes keys whose value is `null`.
pub fn purge_nulls(data: &mut ServiceData) {
    data.retain(|_, value| !value.is_null());
}

/// Applies a client update to existing content.
///
/// Column fields are ignored, `null` deletes a key, and whitespace is
/// normalised on the result.
pub fn merge_update(existing: &ServiceData, update: &ServiceData) -> ServiceData {
    let mut merged = existing.clone();
    for (key, value) in update {
        merged.insert(key.clone(), value.clone());
    }
    drop_column_fields(&mut merged);
    purge_nulls(&mut merged);
    strip_whitespace(&mut merged);
    merged
}

/// Prepares a full document supplied by a client (imports, new drafts).
pub fn normalise(mut data: ServiceData) -> ServiceData {
    drop_column_fields(&mut data);
    purge_nulls(&mut data);
    strip_whitespace(&mut data);
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn map(value: Value) -> ServiceData {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn strips_strings_and_list_items() {
        let mut data = map(json!({
            "serviceSummary": "    A new summary with   space    ",
            "serviceFeatures": ["    ", "    A feature   with space    ", "", "    A second feature with space   "],
            "minimumContractPeriod": 3,
        }));
        strip_whitespace(&mut data);
        assert_eq!(data["serviceSummary"], json!("A new summary with   space"));
        assert_eq!(
            data["serviceFeatures"],
            json!(["A feature   with space", "A second feature with space"])
        );
        assert_eq!(data["minimumContractPeriod"], json!(3));
    }

    #[test]
    fn merge_deletes_null_keys_and_keeps_the_rest() {
        let existing = map(json!({"serviceName": "Name", "serviceSummary": "Summary"}));
        let update = map(json!({"serviceSummary": null, "serviceBenefits": [" a "]}));
        let merged = merge_update(&existing, &update);
        assert_eq!(merged, map(json!({"serviceName": "Name", "serviceBenefits": ["a"]})));
    }

    #[test]
    fn merge_ignores_column_fields() {
        let existing = map(json!({"serviceName": "Name"}));
        let update = map(json!({"id": "123", "status": "published", "supplierName": "x", "links": {}}));
        assert_eq!(merge_update(&existing, &update), existing);
    }

    #[test]
    fn normalise_drops_columns_and_nulls() {
        let data = normalise(map(json!({"id": "1", "createdAt": "x", "a": null, "b": " b "})));
        assert_eq!(data, map(json!({"b": "b"})));
    }

    proptest! {
        #[test]
        fn stripped_strings_have_no_outer_whitespace(s in "\\PC*") {
            let mut data = ServiceData::new();
            data.insert("field".to_string(), Value::String(s));
            strip_whitespace(&mut data);
            let out = data["field"].as_str().unwrap();
            prop_assert_eq!(out, out.trim());
        }

        #[test]
        fn stripped_lists_never_contain_blank_items(items in proptest::collection::vec("[ a-z]{0,6}", 0..8)) {
            let mut data = ServiceData::new();
            data.insert("list".to_string(), json!(items));
            strip_whitespace(&mut data);
            for item in data["list"].as_array().unwrap() {
                let item = item.as_str().unwrap();
                prop_assert!(!item.is_empty());
                prop_assert_eq!(item, item.trim());
            }
        }

        #[test]
        fn merge_never_keeps_nulls(keys in proptest::collection::vec("[a-z]{1,5}", 0..6)) {
            let existing = ServiceData::new();
            let update: ServiceData = keys.into_iter().map(|k| (k, Value::Null)).collect();
            prop_assert!(merge_update(&existing, &update).is_empty());
        }
    }
}
