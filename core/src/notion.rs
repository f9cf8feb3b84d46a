use std::{collections::HashMap, sync::Arc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CountsError;


/// Authenticated client for one database's query endpoint.
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    token: Arc<String>,
    query_url: Arc<String>,
    version: Arc<String>,
}

impl NotionClient {
    pub fn new_w_client(client: reqwest::Client, api_url: &str, version: &str, token: &str, database_id: &str) -> Self {
        let query_url = format!("{}/v1/databases/{}/query", api_url.trim_end_matches('/'), database_id);
        Self {
            client,
            token: Arc::new(token.to_string()),
            query_url: Arc::new(query_url),
            version: Arc::new(version.to_string()),
        }
    }

    /// One page of the database. Any non-2xx answer becomes `CountsError::Upstream`
    /// carrying the status and the raw body text. Transport errors are stripped of
    /// the request URL, which embeds the database id.
    pub async fn query(&self, page_size: usize, start_cursor: Option<&str>) -> Result<QueryResponse, CountsError> {
        let body = QueryRequest { page_size, start_cursor };

        let res = self.client.post(self.query_url.as_str())
            .bearer_auth(self.token.as_str())
            .header("Notion-Version", self.version.as_str())
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(CountsError::Upstream { status: status.as_u16(), body });
        }

        let bytes = res.bytes().await.map_err(reqwest::Error::without_url)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}


#[derive(Serialize, Debug, Clone)]
struct QueryRequest<'a> {
    page_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<&'a str>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct QueryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Page>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Page {
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: HashMap<String, PropertyValue>,
}

/// Only the two shapes a status can take are kept; every other field is ignored.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct PropertyValue {
    #[serde(default)]
    pub status: Option<NamedOption>,
    #[serde(default)]
    pub select: Option<NamedOption>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct NamedOption {
    #[serde(default)]
    pub name: Option<String>,
}

// explicit nulls are treated like missing fields
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_absent_cursor() {
        let first = serde_json::to_value(QueryRequest { page_size: 100, start_cursor: None }).unwrap();
        let next = serde_json::to_value(QueryRequest { page_size: 100, start_cursor: Some("abc") }).unwrap();

        assert_eq!(first, serde_json::json!({ "page_size": 100 }));
        assert_eq!(next, serde_json::json!({ "page_size": 100, "start_cursor": "abc" }));
    }

    #[test]
    fn decodes_both_property_shapes() {
        let raw = serde_json::json!({
            "object": "list",
            "results": [
                { "id": "1", "properties": { "Status": { "id": "x", "type": "status", "status": { "id": "s", "name": "Queue", "color": "red" } } } },
                { "id": "2", "properties": { "Status": { "type": "select", "select": { "name": "Blocked" } } } },
                { "id": "3", "properties": { "Status": { "type": "select", "select": null } } }
            ],
            "has_more": true,
            "next_cursor": "c2"
        });
        let res: QueryResponse = serde_json::from_value(raw).unwrap();

        assert_eq!(res.results.len(), 3);
        assert!(res.has_more);
        assert_eq!(res.next_cursor.as_deref(), Some("c2"));

        let props: Vec<&PropertyValue> = res.results.iter().map(|p| &p.properties["Status"]).collect();
        assert_eq!(props[0].status.as_ref().and_then(|o| o.name.as_deref()), Some("Queue"));
        assert_eq!(props[1].select.as_ref().and_then(|o| o.name.as_deref()), Some("Blocked"));
        assert!(props[2].select.is_none());
    }

    #[test]
    fn missing_fields_default() {
        let res: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(res.results.is_empty());
        assert!(!res.has_more);
        assert!(res.next_cursor.is_none());

        let res: QueryResponse = serde_json::from_str(
            r#"{"results": null, "has_more": null, "next_cursor": null}"#
        ).unwrap();
        assert!(res.results.is_empty());
        assert!(!res.has_more);
    }
}
