//! PostgREST-compatible remote store (the hosted Supabase REST API).

use super::{
    AccountQuery, AccountRow, AlertStore, InsertedAlert, NewAlert, ACCOUNTS_TABLE, ALERTS_TABLE,
};
use crate::error::{SeedError, SeedResult};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Url;

const REST_PREFIX: &str = "rest/v1/";
const ACCOUNT_COLUMNS: &str = "stripe_account_id,status";

pub struct RestStore {
    client: Client,
    base_url: Url,
}

impl RestStore {
    /// Build the client. No request is sent until the first query.
    pub fn connect(url: &str, service_key: &str) -> SeedResult<Self> {
        let base_url = rest_base(url)?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(service_key)
            .map_err(|e| SeedError::Connectivity(format!("invalid service key header: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {service_key}"))
            .map_err(|e| SeedError::Connectivity(format!("invalid authorization header: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SeedError::Connectivity(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    fn table_url(&self, table: &str) -> SeedResult<Url> {
        self.base_url
            .join(table)
            .map_err(|e| SeedError::Connectivity(format!("cannot build URL for {table}: {e}")))
    }
}

impl AlertStore for RestStore {
    fn select_accounts(&self, query: &AccountQuery) -> SeedResult<Vec<AccountRow>> {
        let query_err = |cause: String| SeedError::Query { table: ACCOUNTS_TABLE, cause };

        let url = self.table_url(ACCOUNTS_TABLE)?;
        let response = self
            .client
            .get(url)
            .query(&account_query_params(query))
            .send()
            .map_err(|e| query_err(e.to_string()))?;
        let body = success_body(response).map_err(query_err)?;
        serde_json::from_str(&body).map_err(|e| query_err(format!("unexpected response body: {e}")))
    }

    fn insert_alert(&self, alert: &NewAlert) -> SeedResult<Vec<InsertedAlert>> {
        let insert_err = |cause: String| SeedError::Insert { table: ALERTS_TABLE, cause };

        let url = self.table_url(ALERTS_TABLE)?;
        let response = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(alert)
            .send()
            .map_err(|e| insert_err(e.to_string()))?;
        let body = success_body(response).map_err(insert_err)?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&body)
            .map_err(|e| insert_err(format!("unexpected response body: {e}")))
    }
}

/// `https://x.supabase.co` -> `https://x.supabase.co/rest/v1/`
fn rest_base(url: &str) -> SeedResult<Url> {
    let mut root = url.trim_end_matches('/').to_string();
    root.push('/');
    Url::parse(&root)
        .and_then(|u| u.join(REST_PREFIX))
        .map_err(|e| SeedError::Connectivity(format!("invalid store URL {url:?}: {e}")))
}

/// PostgREST query-string filters for an account read.
pub(crate) fn account_query_params(query: &AccountQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("select", ACCOUNT_COLUMNS.to_string())];
    if let Some(status) = &query.status {
        params.push(("status", format!("eq.{status}")));
    }
    if let Some(ids) = &query.ids {
        let quoted: Vec<String> = ids.iter().map(|id| quote_in_value(id)).collect();
        params.push(("stripe_account_id", format!("in.({})", quoted.join(","))));
    }
    params
}

/// Double-quote a value for a PostgREST `in.(...)` list so commas,
/// parentheses and spaces inside an id survive.
fn quote_in_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn success_body(response: Response) -> Result<String, String> {
    let status = response.status();
    let body = response.text().map_err(|e| e.to_string())?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(format!("HTTP {status}: {body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligible_query_without_whitelist() {
        let params = account_query_params(&AccountQuery::eligible(&[]));
        assert_eq!(
            params,
            vec![
                ("select", "stripe_account_id,status".to_string()),
                ("status", "eq.active".to_string()),
            ]
        );
    }

    #[test]
    fn eligible_query_with_whitelist() {
        let whitelist = vec!["acct_1".to_string(), " acct_2".to_string()];
        let params = account_query_params(&AccountQuery::eligible(&whitelist));
        assert_eq!(params[1], ("status", "eq.active".to_string()));
        assert_eq!(
            params[2],
            ("stripe_account_id", "in.(\"acct_1\",\" acct_2\")".to_string())
        );
    }

    #[test]
    fn base_url_gains_rest_prefix() {
        let base = rest_base("https://example.supabase.co").unwrap();
        assert_eq!(base.as_str(), "https://example.supabase.co/rest/v1/");
        let base = rest_base("https://example.supabase.co/").unwrap();
        assert_eq!(
            base.join("alerts").unwrap().as_str(),
            "https://example.supabase.co/rest/v1/alerts"
        );
    }

    #[test]
    fn bad_url_is_a_connectivity_error() {
        let err = RestStore::connect("not a url", "key").err().expect("should fail");
        assert!(matches!(err, SeedError::Connectivity(_)), "got {err:?}");
    }
}
