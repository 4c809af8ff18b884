//! Client for the proxy's actor system endpoint.

use std::time::Duration;

use bridge_core::protocol::{RegistrationRequest, RegistrationResponse, Status};
use prost::Message;

use crate::http::OCTET_STREAM;

pub const SYSTEM_PATH: &str = "/api/v1/system";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors talking to the proxy.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("proxy request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("proxy answered HTTP {0}")]
    HttpStatus(u16),

    #[error("undecodable proxy response: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("proxy rejected registration: {0}")]
    Rejected(String),
}

/// Registers this host's actors with the proxy.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn system_url(&self) -> String {
        format!("{}{}", self.base_url, SYSTEM_PATH)
    }

    /// Post the registration request and check the proxy accepted it.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationResponse, ProxyError> {
        let response = self
            .client
            .post(self.system_url())
            .header(reqwest::header::CONTENT_TYPE, OCTET_STREAM)
            .body(request.encode_to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProxyError::HttpStatus(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let registration = RegistrationResponse::decode(body)?;
        check_accepted(&registration)?;
        Ok(registration)
    }
}

fn check_accepted(response: &RegistrationResponse) -> Result<(), ProxyError> {
    match &response.status {
        Some(status) if status.status() == Status::Ok => Ok(()),
        Some(status) => Err(ProxyError::Rejected(status.message.clone())),
        None => Err(ProxyError::Rejected("missing status".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::protocol::RequestStatus;

    #[test]
    fn test_system_url_ignores_trailing_slash() {
        let client = ProxyClient::new("http://127.0.0.1:9001/").unwrap();
        assert_eq!(client.system_url(), "http://127.0.0.1:9001/api/v1/system");
    }

    #[test]
    fn test_registration_status() {
        let accepted = RegistrationResponse {
            status: Some(RequestStatus {
                status: Status::Ok as i32,
                message: String::new(),
            }),
            proxy_info: None,
        };
        assert!(check_accepted(&accepted).is_ok());

        let rejected = RegistrationResponse {
            status: Some(RequestStatus {
                status: Status::Error as i32,
                message: "bad actor".into(),
            }),
            proxy_info: None,
        };
        assert!(matches!(check_accepted(&rejected), Err(ProxyError::Rejected(m)) if m == "bad actor"));
        assert!(check_accepted(&RegistrationResponse::default()).is_err());
    }
}
