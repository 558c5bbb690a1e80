//! Read-only S3 access for the daily report, signed with AWS Signature V4.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::time::Duration;
use url::Url;

use crate::ports::{ReportStore, StorageError};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";
/// SHA-256 of an empty body.
const EMPTY_PAYLOAD_HASH: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

#[derive(Debug, Clone)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

#[derive(Clone)]
pub struct S3ReportStore {
    client: Client,
    endpoint: Url,
    bucket: String,
    region: String,
    credentials: S3Credentials,
}

impl S3ReportStore {
    /// `endpoint` defaults to the regional AWS endpoint; path-style
    /// addressing is used so that any S3-compatible store works.
    pub fn new(
        bucket: String,
        region: String,
        endpoint: Option<String>,
        credentials: S3Credentials,
    ) -> Result<Self, StorageError> {
        let endpoint = endpoint.unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", region));
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| StorageError::InvalidLocation(format!("{}: {}", endpoint, e)))?;
        if endpoint.host_str().is_none() {
            return Err(StorageError::InvalidLocation(format!(
                "{}: missing host",
                endpoint
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Ok(Self {
            client,
            endpoint,
            bucket,
            region,
            credentials,
        })
    }

    fn object_path(&self, key: &str) -> String {
        let encoded: Vec<String> = key
            .trim_start_matches('/')
            .split('/')
            .map(uri_encode)
            .collect();
        format!(
            "{}/{}/{}",
            self.endpoint.path().trim_end_matches('/'),
            uri_encode(&self.bucket),
            encoded.join("/")
        )
    }

    fn host(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    /// Headers for a signed GET of `path` at `now`.
    fn signed_headers(
        &self,
        path: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<(&'static str, String)>, StorageError> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let host = self.host();

        let canonical_request = format!(
            "GET\n{path}\n\nhost:{host}\nx-amz-content-sha256:{payload}\nx-amz-date:{amz_date}\n\n{signed}\n{payload}",
            path = path,
            host = host,
            payload = EMPTY_PAYLOAD_HASH,
            amz_date = amz_date,
            signed = SIGNED_HEADERS,
        );
        let scope = format!("{}/{}/{}/aws4_request", date, self.region, SERVICE);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let key = signing_key(
            &self.credentials.secret_access_key,
            &date,
            &self.region,
            SERVICE,
        )?;
        let signature = hex::encode(hmac(&key, string_to_sign.as_bytes())?);

        Ok(vec![
            ("host", host),
            ("x-amz-content-sha256", EMPTY_PAYLOAD_HASH.to_string()),
            ("x-amz-date", amz_date),
            (
                "authorization",
                format!(
                    "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                    ALGORITHM, self.credentials.access_key_id, scope, SIGNED_HEADERS, signature
                ),
            ),
        ])
    }
}

#[async_trait]
impl ReportStore for S3ReportStore {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(key);
        let mut url = self.endpoint.clone();
        url.set_path(&path);

        let mut request = self.client.get(url);
        for (name, value) in self.signed_headers(&path, Utc::now())? {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, StorageError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| StorageError::Signing(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// SigV4 signing key for one day, region and service.
fn signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, StorageError> {
    let k_date = hmac(format!("AWS4{}", secret).as_bytes(), date.as_bytes())?;
    let k_region = hmac(&k_date, region.as_bytes())?;
    let k_service = hmac(&k_region, service.as_bytes())?;
    hmac(&k_service, b"aws4_request")
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn uri_encode(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
