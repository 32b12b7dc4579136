use lakekeeper_domain::{BootstrapOptions, ServerInfo};
use reqwest::Method;
use tracing::{debug, instrument};

use crate::errors::{ClientError, Response};
use crate::http::{RequestOption, Transport, NO_PAYLOAD};

/// `GET /info` and `POST /bootstrap`
#[derive(Debug, Clone, Copy)]
pub struct ServerService<'a> {
    transport: &'a Transport,
}

impl<'a> ServerService<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    #[instrument(skip(self, options))]
    pub async fn info(&self, options: &[RequestOption]) -> Result<(ServerInfo, Response), ClientError> {
        self.transport.request(Method::GET, "info", NO_PAYLOAD, options).await
    }

    /// Bootstrap the catalog
    ///
    /// A catalog that is already bootstrapped counts as success; the response
    /// of the rejected call is returned.
    #[instrument(skip(self, options))]
    pub async fn bootstrap(
        &self,
        opts: &BootstrapOptions,
        options: &[RequestOption],
    ) -> Result<Response, ClientError> {
        match self.transport.request_discard(Method::POST, "bootstrap", Some(opts), options).await {
            Err(ClientError::Api(api)) if api.is_already_bootstrapped() => {
                debug!("catalog already bootstrapped");
                Ok(api.response)
            }
            other => other,
        }
    }
}
