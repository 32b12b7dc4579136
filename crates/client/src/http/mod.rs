//! HTTP transport
//!
//! [`Transport`] builds, authenticates, sends and retries requests against
//! `<base>/management/v1`. `POST`, `PUT` and `PATCH` payloads travel as a
//! JSON body; `GET` and `DELETE` payloads become the query string.

pub mod options;
pub mod query;
pub mod retry;
pub mod transport;

pub use options::{
    with_cancellation, with_check_retry, with_context, with_header, with_project_id,
    with_query_param, with_timeout, RequestContext, RequestOption, RequestParts,
};
pub use retry::{default_check_retry, AttemptOutcome, CheckRetryFn, RetryPolicy};
pub use transport::{
    is_success, management_base_url, ErrorHandlerFn, Transport, API_VERSION_PATH,
    DEFAULT_USER_AGENT, NO_PAYLOAD,
};
