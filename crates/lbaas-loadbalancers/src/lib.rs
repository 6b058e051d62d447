//! Load balancer bindings for the OpenStack LBaaS v2 / Octavia API.
//!
//! Provides typed option structs, response models and an asynchronous
//! client for the `lbaas/loadbalancers` resource.

#![deny(missing_docs)]

pub mod client;
pub mod models;
pub mod results;
pub mod urls;

pub use client::{
    CreateBody, ListQuery, LoadBalancerClient, LoadBalancerClientBuilder, UpdateBody,
};
pub use models::{
    CreateOpts, ListOpts, LoadBalancer, OperatingStatus, ProvisioningStatus, SortDirection,
    StatusTree, UpdateOpts,
};
pub use results::{
    extract_load_balancers, CreateResult, DeleteResult, GetResult, GetStatusesResult,
    LoadBalancerPage, UpdateResult,
};

/// Convenient result alias that reuses the shared LBaaS error type.
pub type Result<T> = lbaas_core::Result<T>;
