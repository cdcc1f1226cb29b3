//! HTTP fetcher implementation
//!
//! This module owns every request a mirror run makes:
//! - Building the shared HTTP client
//! - HEAD probes for entry classification
//! - GET requests for listing pages, including gzip decoding
//! - HEAD/GET requests for file transfer, with byte-range support
//!
//! Configured credentials are applied uniformly to each request. The client
//! performs no automatic decompression: classification reads the raw
//! `Content-Encoding` header, and transfers must receive bytes that match
//! the advertised content length. Listing requests advertise gzip and decode
//! the body here; transfer requests ask for identity encoding.

use crate::config::AuthConfig;
use crate::{FetchError, FetchResult};
use flate2::read::GzDecoder;
use reqwest::header::{
    HeaderName, ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, RANGE,
};
use reqwest::{redirect::Policy, Client, Method, RequestBuilder, Response};
use std::io::Read;
use std::time::Duration;

/// Bound for metadata requests: probes, listing pages, size checks.
///
/// Streaming transfer GETs carry no total deadline so a large file on a slow
/// link is never cut off mid-stream; they are bounded by the connect timeout
/// and by the per-chunk deadline in the transfer module.
const METADATA_TIMEOUT: Duration = Duration::from_secs(30);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Headers of interest from a classification HEAD probe
///
/// Fields are `None` when the server omitted the header, which classification
/// treats differently from a header that is present but non-matching.
#[derive(Debug, Clone, Default)]
pub struct ProbeInfo {
    /// Content-Encoding header value, if sent
    pub content_encoding: Option<String>,
    /// Content-Type header value, if sent
    pub content_type: Option<String>,
}

/// Issues every HTTP request for a mirror run
///
/// Wraps a shared `reqwest::Client` together with the optional basic-auth
/// credentials so that authentication and encoding headers are applied
/// consistently across probes, listings, and transfers.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    auth: Option<AuthConfig>,
}

impl Fetcher {
    /// Builds a fetcher with a freshly configured HTTP client
    ///
    /// # Arguments
    ///
    /// * `auth` - Credentials applied to every request, if any
    ///
    /// # Returns
    ///
    /// * `Ok(Fetcher)` - Successfully built fetcher
    /// * `Err(reqwest::Error)` - Failed to build the underlying client
    pub fn new(auth: Option<AuthConfig>) -> Result<Self, reqwest::Error> {
        let user_agent = format!("dirmirror/{}", env!("CARGO_PKG_VERSION"));

        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(Policy::limited(10))
            .build()?;

        Ok(Self { client, auth })
    }

    /// Sends the classification HEAD probe for a URL
    ///
    /// Advertises gzip so the server reveals whether it would compress the
    /// response; an autoindex page comes back as compressed HTML.
    ///
    /// # Returns
    ///
    /// * `Ok(ProbeInfo)` - 2xx response; headers of interest, where present
    /// * `Err(FetchError)` - Non-2xx status or transport failure
    pub async fn head_probe(&self, url: &str) -> FetchResult<ProbeInfo> {
        let response = self
            .request(Method::HEAD, url)
            .header(ACCEPT_ENCODING, "gzip")
            .timeout(METADATA_TIMEOUT)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(ProbeInfo {
            content_encoding: header_value(&response, CONTENT_ENCODING),
            content_type: header_value(&response, CONTENT_TYPE),
        })
    }

    /// Fetches a listing page and returns its HTML
    ///
    /// The body is gunzipped here when the server compressed it, so callers
    /// always see plain HTML.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Decoded page body
    /// * `Err(FetchError)` - Non-2xx status, transport failure, or an
    ///   undecodable body
    pub async fn fetch_listing(&self, url: &str) -> FetchResult<String> {
        let response = self
            .request(Method::GET, url)
            .header(ACCEPT_ENCODING, "gzip")
            .timeout(METADATA_TIMEOUT)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let compressed = header_value(&response, CONTENT_ENCODING)
            .map(|encoding| encoding.contains("gzip"))
            .unwrap_or(false);

        let body = response.bytes().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        if compressed {
            let mut decoder = GzDecoder::new(body.as_ref());
            let mut html = String::new();
            decoder
                .read_to_string(&mut html)
                .map_err(|e| FetchError::Decode {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(html)
        } else {
            Ok(String::from_utf8_lossy(&body).into_owned())
        }
    }

    /// Checks a file URL for reachability and reports its total size
    ///
    /// Asks for identity encoding so the reported length matches the bytes a
    /// transfer will stream.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Content-Length, or 0 when the server does not report one
    /// * `Err(FetchError)` - Non-2xx status or transport failure
    pub async fn head_size(&self, url: &str) -> FetchResult<u64> {
        let response = self
            .request(Method::HEAD, url)
            .header(ACCEPT_ENCODING, "identity")
            .timeout(METADATA_TIMEOUT)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(content_length(&response))
    }

    /// Opens the streaming GET for a file transfer
    ///
    /// A nonzero `offset` adds a `Range` header from that byte. The response
    /// is returned unread so the caller can inspect the status code (206
    /// versus 200 decides how resumed streams are accounted) and stream the
    /// body chunkwise.
    ///
    /// # Returns
    ///
    /// * `Ok(Response)` - 2xx response ready for streaming
    /// * `Err(FetchError)` - Non-2xx status or transport failure
    pub async fn get_file(&self, url: &str, offset: u64) -> FetchResult<Response> {
        let mut builder = self
            .request(Method::GET, url)
            .header(ACCEPT_ENCODING, "identity");

        if offset > 0 {
            builder = builder.header(RANGE, format!("bytes={}-", offset));
        }

        let response = builder.send().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(auth) = &self.auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }
        builder
    }
}

fn header_value(response: &Response, name: HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

fn content_length(response: &Response) -> u64 {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}
