// # GoDaddy Registrar Client
//
// This crate provides the GoDaddy implementation of the `Registrar` trait
// used by the GDNS lifecycle controller.
//
// ## Behaviour
//
// - One HTTP request per trait call; nothing is retried or cached
// - HTTP timeout configured (30 seconds)
// - Registrar error bodies (`{"code": ..., "message": ...}`) are kept as
//   structured `RegistrarError`s so callers can match on the code
// - Dry-run mode performs reads but skips the record write
//
// ## Security Requirements
//
// - The API secret NEVER appears in logs or Debug output
// - Credentials are provided by the caller, usually from the environment
//
// ## API Reference
//
// - Get domain: GET `/v1/domains/{domain}`
// - List records: GET `/v1/domains/{domain}/records`
// - Replace records: PUT `/v1/domains/{domain}/records`
//
// Requests authenticate with `Authorization: sso-key {key}:{secret}` and are
// scoped to a sub-account with the `X-Shopper-Id` header.

use async_trait::async_trait;
use gdns_core::config::RegistrarConfig;
use gdns_core::record::DomainRecord;
use gdns_core::traits::{Domain, Registrar};
use gdns_core::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Header selecting the sub-account a request acts for
const SHOPPER_ID_HEADER: &str = "X-Shopper-Id";

/// Environment variable selecting dry-run mode
pub const MODE_ENV_VAR: &str = "GDNS_MODE";

/// Error body returned by the GoDaddy API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// GoDaddy domains API client
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the client will:
/// - Perform all GET requests (domain lookup, record listing)
/// - Log the intended PUT payload
/// - **NOT** actually replace the record set
pub struct GoDaddyClient {
    /// API key
    api_key: String,

    /// API secret
    /// ⚠️ NEVER log this value
    api_secret: String,

    /// API base URL, without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip PUT updates
    dry_run: bool,
}

// Custom Debug implementation that hides the API secret
impl std::fmt::Debug for GoDaddyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoDaddyClient")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl GoDaddyClient {
    /// Create a new GoDaddy client
    ///
    /// Fails with a configuration error if the credentials are empty or the
    /// HTTP client cannot be built.
    pub fn new(config: &RegistrarConfig, dry_run: bool) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            dry_run,
        })
    }

    /// Create a client in live mode
    pub fn new_live(config: &RegistrarConfig) -> Result<Self> {
        Self::new(config, false)
    }

    /// Create a client in dry-run mode
    pub fn new_dry_run(config: &RegistrarConfig) -> Result<Self> {
        Self::new(config, true)
    }

    /// Create a client, reading dry-run mode from `GDNS_MODE`
    pub fn from_config(config: &RegistrarConfig) -> Result<Self> {
        let dry_run = is_dry_run_mode(&std::env::var(MODE_ENV_VAR).unwrap_or_default());

        if dry_run {
            tracing::warn!("GoDaddy client running in DRY-RUN mode - no changes will be made");
        }

        Self::new(config, dry_run)
    }

    /// Whether record writes are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn domain_url(&self, domain: &str) -> String {
        format!("{}/v1/domains/{}", self.base_url, domain)
    }

    fn records_url(&self, domain: &str) -> String {
        format!("{}/v1/domains/{}/records", self.base_url, domain)
    }

    /// Attach authentication and sub-account headers
    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        customer: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let request = request
            .header(
                "Authorization",
                format!("sso-key {}:{}", self.api_key, self.api_secret),
            )
            .header("Accept", "application/json");

        match customer {
            Some(customer) => request.header(SHOPPER_ID_HEADER, customer),
            None => request,
        }
    }

    /// Send a request and turn a non-success status into an error
    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        Err(error_from_response(status.as_u16(), &body, what))
    }
}

/// Whether a `GDNS_MODE` value selects dry-run mode
pub fn is_dry_run_mode(mode: &str) -> bool {
    mode.eq_ignore_ascii_case("dry-run")
}

/// Map a failed API response to an error
///
/// Authentication failures and unknown resources get their own variants;
/// everything else keeps the registrar's code and message.
fn error_from_response(status: u16, body: &str, what: &str) -> Error {
    match status {
        401 | 403 => Error::auth(format!(
            "Authentication failed: invalid API key/secret or insufficient permissions. Status: {}",
            status
        )),
        404 => Error::not_found(format!("{} not found", what)),
        _ => match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) if !parsed.code.is_empty() => {
                Error::registrar(status, parsed.code, parsed.message)
            }
            _ => Error::registrar(status, "UNKNOWN", body.trim()),
        },
    }
}

#[async_trait]
impl Registrar for GoDaddyClient {
    /// ```http
    /// GET /v1/domains/{domain}
    /// ```
    async fn resolve_domain(&self, customer: Option<&str>, domain: &str) -> Result<Domain> {
        let url = self.domain_url(domain);
        tracing::debug!("GET {}", url);

        let response = self
            .send(
                self.authorize(self.client.get(&url), customer),
                &format!("Domain {}", domain),
            )
            .await?;

        response
            .json::<Domain>()
            .await
            .map_err(|e| Error::http(format!("Failed to parse domain response: {}", e)))
    }

    /// ```http
    /// GET /v1/domains/{domain}/records
    /// ```
    async fn fetch_records(
        &self,
        customer: Option<&str>,
        domain: &str,
    ) -> Result<Vec<DomainRecord>> {
        let url = self.records_url(domain);
        tracing::debug!("GET {}", url);

        let response = self
            .send(
                self.authorize(self.client.get(&url), customer),
                &format!("Records of {}", domain),
            )
            .await?;

        response
            .json::<Vec<DomainRecord>>()
            .await
            .map_err(|e| Error::http(format!("Failed to parse records response: {}", e)))
    }

    /// ```http
    /// PUT /v1/domains/{domain}/records
    /// [{"type": "A", "name": "@", "data": "1.2.3.4", "ttl": 3600, "priority": 0}, ...]
    /// ```
    async fn write_records(
        &self,
        customer: Option<&str>,
        domain: &str,
        records: &[DomainRecord],
    ) -> Result<()> {
        let url = self.records_url(domain);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                serde_json::to_string(records)?
            );
            return Ok(());
        }

        tracing::debug!("PUT {} ({} records)", url, records.len());
        self.send(
            self.authorize(self.client.put(&url), customer).json(records),
            &format!("Domain {}", domain),
        )
        .await?;

        Ok(())
    }

    fn registrar_name(&self) -> &'static str {
        "godaddy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdns_core::record::{new_a_record, new_ns_record};

    fn config() -> RegistrarConfig {
        RegistrarConfig::new("key_123", "secret_value_456")
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(matches!(
            GoDaddyClient::new_live(&RegistrarConfig::new("", "secret")),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GoDaddyClient::new_live(&RegistrarConfig::new("key", "")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_dry_run_mode() {
        let dry = GoDaddyClient::new_dry_run(&config()).unwrap();
        let live = GoDaddyClient::new_live(&config()).unwrap();

        assert!(dry.is_dry_run(), "Dry-run client should have dry_run=true");
        assert!(!live.is_dry_run(), "Live client should have dry_run=false");
    }

    #[test]
    fn test_dry_run_mode_parsing() {
        assert!(is_dry_run_mode("dry-run"));
        assert!(is_dry_run_mode("DRY-RUN"));
        assert!(!is_dry_run_mode(""));
        assert!(!is_dry_run_mode("live"));
    }

    #[test]
    fn test_registrar_name() {
        let client = GoDaddyClient::new_live(&config()).unwrap();
        assert_eq!(client.registrar_name(), "godaddy");
    }

    #[test]
    fn test_api_secret_not_exposed_in_debug() {
        let client = GoDaddyClient::new_live(&config()).unwrap();

        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("secret_value_456"));
        assert!(debug_str.contains("GoDaddyClient"));
        assert!(debug_str.contains("<REDACTED>"));
    }

    #[test]
    fn test_urls_use_configured_base() {
        let client =
            GoDaddyClient::new_live(&config().with_base_url("https://api.ote-godaddy.com/"))
                .unwrap();

        assert_eq!(
            client.domain_url("example.com"),
            "https://api.ote-godaddy.com/v1/domains/example.com"
        );
        assert_eq!(
            client.records_url("example.com"),
            "https://api.ote-godaddy.com/v1/domains/example.com/records"
        );
    }

    #[test]
    fn test_error_body_keeps_code() {
        let err = error_from_response(
            422,
            r#"{"code":"FAILED_NAME_SERVER_VALIDATION","message":"Unable to update nameservers"}"#,
            "Domain example.com",
        );
        assert!(err.is_nameserver_validation());

        let err = error_from_response(
            422,
            r#"{"code":"INVALID_BODY","message":"FAILED_NAME_SERVER_VALIDATION"}"#,
            "Domain example.com",
        );
        assert!(!err.is_nameserver_validation());
        match err {
            Error::Registrar(inner) => assert_eq!(inner.code, "INVALID_BODY"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_status_mapping() {
        assert!(matches!(
            error_from_response(401, "", "Domain example.com"),
            Error::Authentication(_)
        ));
        assert!(matches!(
            error_from_response(403, "{}", "Domain example.com"),
            Error::Authentication(_)
        ));
        assert!(matches!(
            error_from_response(404, "", "Domain example.com"),
            Error::NotFound(_)
        ));

        match error_from_response(502, "Bad Gateway\n", "Domain example.com") {
            Error::Registrar(inner) => {
                assert_eq!(inner.status, 502);
                assert_eq!(inner.code, "UNKNOWN");
                assert_eq!(inner.message, "Bad Gateway");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dry_run_write_makes_no_request() {
        // Unroutable endpoint: any real request would fail
        let client =
            GoDaddyClient::new_dry_run(&config().with_base_url("http://127.0.0.1:9")).unwrap();

        let records = vec![
            new_a_record("1.2.3.4").unwrap(),
            new_ns_record("ns1.example.com").unwrap(),
        ];

        client
            .write_records(Some("cust-1"), "example.com", &records)
            .await
            .expect("dry-run write succeeds without network");
    }

    #[test]
    fn test_records_payload_shape() {
        let records = vec![new_a_record("1.2.3.4").unwrap()];
        let payload = serde_json::to_value(&records).unwrap();

        assert_eq!(
            payload,
            serde_json::json!([
                { "type": "A", "name": "@", "data": "1.2.3.4", "ttl": 3600, "priority": 0 }
            ])
        );
    }
}
