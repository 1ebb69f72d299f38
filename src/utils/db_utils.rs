use crate::store::{Filter, Patch};

/// ===============================
/// SQL fragment plus its bind values
/// ===============================
///
/// Every bind is a string: JSON paths, JSON-encoded values, or raw ids. Values
/// go through `CAST(? AS JSON)` so strings, numbers and booleans compare with
/// JSON semantics.
#[derive(Debug, Default, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub values: Vec<String>,
}

/// `$."field"`, the JSON path MySQL expects for a top-level key.
pub fn json_path(field: &str) -> String {
    format!("$.\"{}\"", field.replace('"', "\\\""))
}

/// ===============================
/// Build the WHERE tail for a filter
/// ===============================
///
/// Returns clauses starting with ` AND`, meant to follow `collection = ?`.
pub fn build_where(filter: &Filter) -> SqlFragment {
    let mut fragment = SqlFragment::default();

    if let Some(id) = filter.id() {
        fragment.sql.push_str(" AND doc_id = ?");
        fragment.values.push(id.to_string());
    }

    for (field, value) in filter.fields() {
        fragment
            .sql
            .push_str(" AND JSON_EXTRACT(body, ?) = CAST(? AS JSON)");
        fragment.values.push(json_path(field));
        fragment.values.push(value.to_string());
    }

    fragment
}

/// ===============================
/// Build the SET expression for a patch
/// ===============================
pub fn build_patch(patch: &Patch) -> SqlFragment {
    let mut fragment = SqlFragment {
        sql: String::from("body = JSON_SET(body"),
        values: Vec::new(),
    };

    for (field, value) in patch.iter() {
        fragment.sql.push_str(", ?, CAST(? AS JSON)");
        fragment.values.push(json_path(field));
        fragment.values.push(value.to_string());
    }

    fragment.sql.push(')');
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_adds_no_clauses() {
        assert_eq!(build_where(&Filter::all()), SqlFragment::default());
    }

    #[test]
    fn filter_compiles_to_json_equality() {
        let fragment = build_where(&Filter::by_id("abc").eq("dept", "CSC"));
        assert_eq!(
            fragment.sql,
            " AND doc_id = ? AND JSON_EXTRACT(body, ?) = CAST(? AS JSON)"
        );
        assert_eq!(
            fragment.values,
            vec!["abc".to_string(), "$.\"dept\"".to_string(), "\"CSC\"".to_string()]
        );
    }

    #[test]
    fn patch_compiles_to_json_set() {
        let fragment = build_patch(&Patch::new().set("status", "Rejected").set("count", 2));
        assert_eq!(
            fragment.sql,
            "body = JSON_SET(body, ?, CAST(? AS JSON), ?, CAST(? AS JSON))"
        );
        assert_eq!(
            fragment.values,
            vec![
                "$.\"count\"".to_string(),
                "2".to_string(),
                "$.\"status\"".to_string(),
                "\"Rejected\"".to_string(),
            ]
        );
    }
}
