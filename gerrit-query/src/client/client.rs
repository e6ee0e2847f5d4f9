use std::hash::{Hash, Hasher};

use log::{debug, error, trace};
use serde_json::{Map, Value};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::options::{build_query_url, QueryOptions};
use crate::response::parse_change_array;

use super::http_trait::HttpClient;
use super::ureq_impl::UreqClient;

/// One matched change as returned by Gerrit, kept as an untyped JSON object.
pub type ChangeRecord = Map<String, Value>;

const STATUS_OK: u16 = 200;
const STATUS_BAD_REQUEST: u16 = 400;
const STATUS_UNAUTHORIZED: u16 = 401;
const STATUS_NOT_FOUND: u16 = 404;

/// Client for the Gerrit "query changes" REST endpoint.
///
/// Generic over the HTTP client implementation, allowing consumers to provide
/// their own HTTP client by implementing the `HttpClient` trait. The client
/// holds no mutable state; every call issues one independent request.
#[derive(Clone, Debug)]
pub struct QueryClient<H: HttpClient = UreqClient> {
    http_client: H,
    config: ClientConfig,
    base_url: String,
}

impl QueryClient<UreqClient> {
    /// Create a client using the bundled ureq transport with default settings.
    pub fn with_ureq(config: ClientConfig) -> Result<Self> {
        Self::new(config, UreqClient::new())
    }
}

impl<H: HttpClient> QueryClient<H> {
    /// Create a new query client with a custom HTTP client implementation.
    ///
    /// # Arguments
    /// * `config` - Base URL, optional proxy and credential of the Gerrit server
    /// * `http_client` - HTTP client implementation
    pub fn new(config: ClientConfig, http_client: H) -> Result<Self> {
        Url::parse(config.base_url())?;

        // the endpoint path starts with a slash, drop the one from the base url
        let base_url = config
            .base_url()
            .strip_suffix('/')
            .unwrap_or(config.base_url())
            .to_string();

        Ok(QueryClient {
            http_client,
            config,
            base_url,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The URL that a query with these options is sent to.
    pub fn query_url(&self, query: &str, options: &QueryOptions) -> String {
        build_query_url(&self.base_url, query, options)
    }

    /// Run the query with [`QueryOptions::default`] and return the changes as JSON objects.
    pub fn query(&self, query: &str) -> Result<Vec<ChangeRecord>> {
        self.query_as_objects(query, QueryOptions::default())
    }

    /// Run the query and return the changes as JSON objects, in server order.
    ///
    /// # Errors
    /// Besides the request errors of [`QueryClient::query_as_json_strings`],
    /// fails with [`Error::NotAnObject`] if an element of the result array is
    /// not a JSON object.
    pub fn query_as_objects(
        &self,
        query: &str,
        options: QueryOptions,
    ) -> Result<Vec<ChangeRecord>> {
        let mut changes = Vec::new();
        self.run_query(query, &options, |index, value| match value {
            Value::Object(change) => {
                changes.push(change);
                Ok(())
            }
            _ => Err(Error::NotAnObject { index }),
        })?;
        Ok(changes)
    }

    /// Run the query with [`QueryOptions::default`] and return the changes as JSON strings.
    pub fn query_json(&self, query: &str) -> Result<Vec<String>> {
        self.query_as_json_strings(query, QueryOptions::default())
    }

    /// Run the query and return every result element serialized as compact JSON.
    ///
    /// # Errors
    /// * [`Error::Query`] if Gerrit rejects the query (HTTP 400)
    /// * a connection error for 401, 404, any other non-200 status or a transport failure
    /// * a parse error if the body is not `)]}'` followed by a JSON array
    pub fn query_as_json_strings(&self, query: &str, options: QueryOptions) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        self.run_query(query, &options, |_, value| {
            lines.push(serde_json::to_string(&value)?);
            Ok(())
        })?;
        Ok(lines)
    }

    /// Current revision and its files for every matched change.
    pub fn query_files(&self, query: &str) -> Result<Vec<ChangeRecord>> {
        self.query_as_objects(query, QueryOptions::files())
    }

    /// Current revision for every matched change.
    pub fn query_current_patch_sets(&self, query: &str) -> Result<Vec<ChangeRecord>> {
        self.query_as_objects(query, QueryOptions::current_patch_sets())
    }

    fn run_query<F>(&self, query: &str, options: &QueryOptions, mut visitor: F) -> Result<()>
    where
        F: FnMut(usize, Value) -> Result<()>,
    {
        let url = self.query_url(query, options);
        debug!("sending: {}", url);

        let response = self.http_client.get(&url, self.config.credential())?;
        debug!("Status received: {}", response.status_line);

        match response.status {
            STATUS_OK => trace!("Body received: {}", response.body),
            STATUS_BAD_REQUEST => {
                error!("{}: Bad request (400)", self.base_url);
                return Err(Error::Query { url });
            }
            STATUS_UNAUTHORIZED => {
                error!("Unable to authenticate to \"{}\"", self.base_url);
                return Err(Error::Unauthorized {
                    base_url: self.base_url.clone(),
                });
            }
            STATUS_NOT_FOUND => {
                error!("\"{}\": Could not be found! (404)", self.base_url);
                return Err(Error::NotFound {
                    base_url: self.base_url.clone(),
                });
            }
            status => {
                error!(
                    "Error connecting to \"{}\"! ({})",
                    self.base_url, status
                );
                return Err(Error::Status {
                    base_url: self.base_url.clone(),
                    status,
                });
            }
        }

        for (index, value) in parse_change_array(&response.body)?.into_iter().enumerate() {
            visitor(index, value)?;
        }
        Ok(())
    }
}

impl<H: HttpClient> PartialEq for QueryClient<H> {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
    }
}

impl<H: HttpClient> Eq for QueryClient<H> {}

impl<H: HttpClient> Hash for QueryClient<H> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.config.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::client::HttpResponse;
    use crate::config::Credential;
    use crate::error::ErrorKind;

    const TWO_CHANGES: &str = ")]}'\n[{\"Id\":\"value1\"},{\"Id\":\"value2\"}]";

    /// Returns a canned response and records every request it sees.
    #[derive(Clone, Debug)]
    struct FakeHttpClient {
        status: u16,
        body: String,
        requests: Arc<Mutex<Vec<(String, Credential)>>>,
    }

    impl FakeHttpClient {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }
    }

    impl HttpClient for FakeHttpClient {
        fn get(&self, url: &str, credential: &Credential) -> Result<HttpResponse> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), credential.clone()));
            Ok(HttpResponse {
                status: self.status,
                status_line: format!("HTTP/1.1 {}", self.status),
                body: self.body.clone(),
            })
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::new(
            "http://localhost:8020",
            Credential::new("user123", "password123"),
        )
    }

    fn fake_client(status: u16, body: &str) -> (QueryClient<FakeHttpClient>, FakeHttpClient) {
        let http = FakeHttpClient::new(status, body);
        (QueryClient::new(config(), http.clone()).unwrap(), http)
    }

    #[test]
    fn test_objects_in_server_order() {
        let (client, _) = fake_client(200, TWO_CHANGES);
        let changes = client
            .query_as_objects("x", QueryOptions::default())
            .unwrap();

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0]["Id"], "value1");
        assert_eq!(changes[1]["Id"], "value2");
    }

    #[test]
    fn test_json_strings() {
        let (client, _) = fake_client(200, TWO_CHANGES);
        let lines = client.query_json("x").unwrap();
        assert_eq!(lines, vec![r#"{"Id":"value1"}"#, r#"{"Id":"value2"}"#]);
    }

    #[test]
    fn test_request_url_and_credential() {
        let (client, http) = fake_client(200, ")]}'\n []");
        client
            .query_as_objects("limit:1", QueryOptions::none().with_messages(true))
            .unwrap();
        client.query("limit:1").unwrap();
        client.query_files("limit:1").unwrap();
        client.query_current_patch_sets("limit:1").unwrap();

        assert_eq!(
            http.urls(),
            vec![
                "http://localhost:8020/a/changes/?q=limit%3A1&o=MESSAGES",
                "http://localhost:8020/a/changes/?q=limit%3A1&o=ALL_REVISIONS&o=CURRENT_REVISION",
                "http://localhost:8020/a/changes/?q=limit%3A1&o=CURRENT_REVISION&o=CURRENT_FILES",
                "http://localhost:8020/a/changes/?q=limit%3A1&o=CURRENT_REVISION",
            ]
        );
        let requests = http.requests.lock().unwrap();
        assert!(requests
            .iter()
            .all(|(_, cred)| cred == &Credential::new("user123", "password123")));
    }

    #[test]
    fn test_trailing_slash_on_base_url() {
        let config = ClientConfig::new("http://localhost:8020/", Credential::new("u", "p"));
        let client = QueryClient::new(config, FakeHttpClient::new(200, "")).unwrap();
        assert_eq!(
            client.query_url("test", &QueryOptions::none()),
            "http://localhost:8020/a/changes/?q=test"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::new("not a url", Credential::new("u", "p"));
        let err = QueryClient::new(config, FakeHttpClient::new(200, "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_status_mapping() {
        let body = ")]}'\n[{\"Id\":\"value1\"}]";

        let (ok, _) = fake_client(200, body);
        assert!(ok.query("x").is_ok());

        let (bad_request, _) = fake_client(400, body);
        match bad_request.query("x").unwrap_err() {
            Error::Query { url } => assert_eq!(
                url,
                "http://localhost:8020/a/changes/?q=x&o=ALL_REVISIONS&o=CURRENT_REVISION"
            ),
            e => panic!("expected query error, got {e:?}"),
        }

        let (unauthorized, _) = fake_client(401, body);
        let err = unauthorized.query("x").unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
        assert!(err.is_connection_error());

        let (not_found, _) = fake_client(404, body);
        let err = not_found.query_json("x").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert!(err.is_connection_error());

        let (other, _) = fake_client(501, body);
        let err = other.query("x").unwrap_err();
        assert!(matches!(err, Error::Status { status: 501, .. }));
        assert!(err.is_connection_error());
    }

    #[test]
    fn test_key_order_follows_server() {
        let change = r#"{"id":"p~master~I1","project":"p","branch":"master","_number":7}"#;
        let (client, _) = fake_client(200, &format!(")]}}'\n[{change}]"));

        assert_eq!(client.query_json("x").unwrap(), vec![change]);

        let changes = client.query("x").unwrap();
        let keys: Vec<&str> = changes[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "project", "branch", "_number"]);
    }

    #[test]
    fn test_non_object_element() {
        let (client, _) = fake_client(200, ")]}'\n[{\"Id\":\"value1\"},42]");

        let err = client.query("x").unwrap_err();
        assert!(matches!(err, Error::NotAnObject { index: 1 }));

        // strings accept any element
        assert_eq!(
            client.query_json("x").unwrap(),
            vec![r#"{"Id":"value1"}"#, "42"]
        );
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let (client, _) = fake_client(200, "[{\"Id\":\"value1\"}]");
        assert_eq!(client.query("x").unwrap_err().kind(), ErrorKind::Parse);

        let (client, _) = fake_client(200, ")]}'\n[{\"Id\":");
        assert_eq!(client.query("x").unwrap_err().kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_equality_follows_config() {
        let (a, _) = fake_client(200, "");
        let (b, _) = fake_client(500, "other");
        assert_eq!(a, b);

        let proxied = QueryClient::new(
            config().with_proxy("http://proxy:3128"),
            FakeHttpClient::new(200, ""),
        )
        .unwrap();
        assert_ne!(a, proxied);
    }
}
