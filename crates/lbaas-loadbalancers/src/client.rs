//! Asynchronous load balancer client.

use crate::models::{CreateOpts, ListOpts, UpdateOpts};
use crate::results::{
    CreateResult, DeleteResult, GetResult, GetStatusesResult, LoadBalancerPage, UpdateResult,
};
use crate::urls::{collection_url, resource_url, status_url};
use crate::Result;
use lbaas_core::body::build_request_body;
use lbaas_core::client::ClientConfig;
use lbaas_core::config::LbaasClientConfig;
use lbaas_core::{ApiResult, Pager, RequestOpts, ServiceClient, ServiceClientBuilder};
use serde_json::Value;

const USER_AGENT: &str = concat!("lbaas-loadbalancers/", env!("CARGO_PKG_VERSION"));

const ENVELOPE: &str = "loadbalancer";

const UPDATE_OK_CODES: &[u16] = &[200, 202];

/// Anything that can render itself as a load balancer list query.
pub trait ListQuery {
    /// Query string including the leading `?`, or empty.
    fn to_list_query(&self) -> Result<String>;
}

/// Anything that can render itself as a load balancer create body.
pub trait CreateBody {
    /// Body of the form `{"loadbalancer": {...}}`.
    fn to_create_body(&self) -> Result<Value>;
}

/// Anything that can render itself as a load balancer update body.
pub trait UpdateBody {
    /// Body of the form `{"loadbalancer": {...}}`.
    fn to_update_body(&self) -> Result<Value>;
}

impl ListQuery for ListOpts {
    fn to_list_query(&self) -> Result<String> {
        Ok(self.to_query_params().to_query_string())
    }
}

impl CreateBody for CreateOpts {
    fn to_create_body(&self) -> Result<Value> {
        build_request_body(self, ENVELOPE)
    }
}

impl UpdateBody for UpdateOpts {
    fn to_update_body(&self) -> Result<Value> {
        build_request_body(self, ENVELOPE)
    }
}

/// Builder for [`LoadBalancerClient`].
#[derive(Debug, Clone)]
pub struct LoadBalancerClientBuilder {
    inner: ServiceClientBuilder,
}

impl LoadBalancerClientBuilder {
    /// Create a builder for the networking endpoint, e.g. `https://host:9696/v2.0/`.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self> {
        let builder = ServiceClientBuilder::new(endpoint)?.with_user_agent(USER_AGENT);
        Ok(Self { inner: builder })
    }

    /// Create a builder from a validated configuration.
    pub fn from_config(config: &LbaasClientConfig) -> Result<Self> {
        let builder = ServiceClientBuilder::from_config(config)?.with_user_agent(USER_AGENT);
        Ok(Self { inner: builder })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Configure an X-Auth-Token header.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_token(token);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<LoadBalancerClient> {
        let inner = self.inner.build()?;
        Ok(LoadBalancerClient { inner })
    }
}

/// Asynchronous client for the load balancer resource.
#[derive(Clone, Debug)]
pub struct LoadBalancerClient {
    inner: ServiceClient,
}

impl LoadBalancerClient {
    /// Construct a client directly from the endpoint URL.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self> {
        LoadBalancerClientBuilder::new(endpoint)?.build()
    }

    /// Wrap an existing transport.
    #[must_use]
    pub const fn from_service_client(inner: ServiceClient) -> Self {
        Self { inner }
    }

    /// The underlying transport.
    #[must_use]
    pub const fn service_client(&self) -> &ServiceClient {
        &self.inner
    }

    /// List load balancers, optionally filtered.
    ///
    /// Nothing is fetched until the returned pager is advanced. A filter that
    /// fails to encode is reported by the pager without any request.
    #[must_use]
    pub fn list(&self, opts: Option<&dyn ListQuery>) -> Pager<LoadBalancerPage> {
        let mut url = collection_url(&self.inner);
        if let Some(opts) = opts {
            match opts.to_list_query() {
                Ok(query) => url.push_str(&query),
                Err(err) => return Pager::from_error(&self.inner, err, LoadBalancerPage::new),
            }
        }
        Pager::new(&self.inner, url, LoadBalancerPage::new)
    }

    /// Create a load balancer.
    pub async fn create(&self, opts: &(impl CreateBody + ?Sized)) -> CreateResult {
        let body = match opts.to_create_body() {
            Ok(body) => body,
            Err(err) => return ApiResult::from_error(err),
        };
        ApiResult::from_outcome(
            self.inner
                .post(&collection_url(&self.inner), &body, RequestOpts::new())
                .await,
        )
    }

    /// Fetch a load balancer by ID.
    pub async fn get(&self, id: &str) -> GetResult {
        ApiResult::from_outcome(
            self.inner
                .get(&resource_url(&self.inner, id), RequestOpts::new())
                .await,
        )
    }

    /// Update a load balancer. A 202 answer means the change was accepted
    /// and is still being provisioned.
    pub async fn update(&self, id: &str, opts: &(impl UpdateBody + ?Sized)) -> UpdateResult {
        let body = match opts.to_update_body() {
            Ok(body) => body,
            Err(err) => return ApiResult::from_error(err),
        };
        ApiResult::from_outcome(
            self.inner
                .put(
                    &resource_url(&self.inner, id),
                    &body,
                    RequestOpts::new().with_ok_codes(UPDATE_OK_CODES),
                )
                .await,
        )
    }

    /// Delete a load balancer.
    pub async fn delete(&self, id: &str) -> DeleteResult {
        ApiResult::from_outcome(
            self.inner
                .delete(&resource_url(&self.inner, id), RequestOpts::new())
                .await,
        )
    }

    /// Fetch the status tree of a load balancer.
    pub async fn get_statuses(&self, id: &str) -> GetStatusesResult {
        ApiResult::from_outcome(
            self.inner
                .get(&status_url(&self.inner, id), RequestOpts::new())
                .await,
        )
    }
}
