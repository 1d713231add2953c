use crate::prelude::graphql::*;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// A raw service response, before it is normalized into a result tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(field_defaults(setter(into)))]
pub struct Response {
    /// The response data.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    #[builder(default)]
    pub data: Value,

    /// The optional graphql errors encountered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub errors: Vec<Error>,

    /// The optional graphql extensions.
    #[serde(default, skip_serializing_if = "Object::is_empty")]
    #[builder(default)]
    pub extensions: Object,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serde_json_bytes::json as bjson;

    #[test]
    fn test_response() {
        let result = serde_json::from_str::<Response>(
            json!({
              "errors": [
                {
                  "message": "Name for character with ID 1002 could not be fetched.",
                  "locations": [{ "line": 6, "column": 7 }],
                  "path": ["hero", "heroFriends", 1, "name"]
                }
              ],
              "data": {
                "hero": {
                  "name": "R2-D2",
                  "heroFriends": [
                    { "id": "1000", "name": "Luke Skywalker" },
                    { "id": "1002", "name": null },
                    { "id": "1003", "name": "Leia Organa" }
                  ]
                }
              }
            })
            .to_string()
            .as_str(),
        );
        assert_eq!(
            result.unwrap(),
            Response::builder()
                .data(bjson!({
                  "hero": {
                    "name": "R2-D2",
                    "heroFriends": [
                      { "id": "1000", "name": "Luke Skywalker" },
                      { "id": "1002", "name": null },
                      { "id": "1003", "name": "Leia Organa" }
                    ]
                  }
                }))
                .errors(vec![Error {
                    message: "Name for character with ID 1002 could not be fetched."
                        .to_string(),
                    locations: vec![Location { line: 6, column: 7 }],
                    path: Some(Path::from("hero/heroFriends/1/name")),
                    extensions: Default::default(),
                }])
                .build()
        );
    }

    #[test]
    fn test_empty_response() {
        let result = serde_json::from_str::<Response>("{}").unwrap();
        assert_eq!(result, Response::builder().build());
        assert!(result.data.is_null());
    }
}
