//! Result envelopes and the collection page type.

use crate::models::{LoadBalancer, StatusTree};
use crate::Result;
use lbaas_core::pagination::{LinkedPageBase, Page, PageResult};
use lbaas_core::result::{extract_into, ApiResult, ResponsePayload};
use serde_json::Value;

/// Outcome of creating a load balancer.
pub type CreateResult = ApiResult<LoadBalancer>;

/// Outcome of fetching a load balancer.
pub type GetResult = ApiResult<LoadBalancer>;

/// Outcome of updating a load balancer.
pub type UpdateResult = ApiResult<LoadBalancer>;

/// Outcome of deleting a load balancer; carries no payload.
pub type DeleteResult = ApiResult<()>;

/// Outcome of fetching a load balancer's status tree.
pub type GetStatusesResult = ApiResult<StatusTree>;

impl ResponsePayload for LoadBalancer {
    fn from_body(body: Option<Value>) -> Result<Self> {
        extract_into(body, "loadbalancer")
    }
}

impl ResponsePayload for StatusTree {
    fn from_body(body: Option<Value>) -> Result<Self> {
        extract_into(body, "statuses")
    }
}

/// One page of the load balancer collection.
#[derive(Debug, Clone)]
pub struct LoadBalancerPage {
    base: LinkedPageBase,
}

impl LoadBalancerPage {
    /// Wrap a fetched page.
    #[must_use]
    pub const fn new(result: PageResult) -> Self {
        Self {
            base: LinkedPageBase::new(result),
        }
    }

    /// The raw page.
    #[must_use]
    pub const fn result(&self) -> &PageResult {
        &self.base.result
    }
}

impl Page for LoadBalancerPage {
    type Item = LoadBalancer;

    fn items(&self) -> Result<Vec<LoadBalancer>> {
        self.base.items_at("loadbalancers")
    }

    fn next_page_url(&self) -> Result<Option<String>> {
        self.base.next_url_from_links("loadbalancers_links")
    }
}

/// Decode the load balancers on a page.
pub fn extract_load_balancers(page: &LoadBalancerPage) -> Result<Vec<LoadBalancer>> {
    page.items()
}
