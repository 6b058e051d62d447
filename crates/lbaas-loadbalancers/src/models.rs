//! Load balancer option types and response models.

use lbaas_core::query::QueryParams;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Direction applied to `sort_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filtering, sorting and paging of the load balancer collection.
///
/// Every field maps to one query parameter of the same name; `None` fields
/// are left out of the query.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListOpts {
    /// Filter by description.
    pub description: Option<String>,
    /// Filter by administrative state.
    pub admin_state_up: Option<bool>,
    /// Filter by owning tenant.
    pub tenant_id: Option<String>,
    /// Filter by provisioning status, e.g. `ACTIVE`.
    pub provisioning_status: Option<String>,
    /// Filter by VIP address.
    pub vip_address: Option<String>,
    /// Filter by VIP port.
    pub vip_port_id: Option<String>,
    /// Filter by VIP subnet.
    pub vip_subnet_id: Option<String>,
    /// Filter by load balancer ID.
    pub id: Option<String>,
    /// Filter by operating status, e.g. `ONLINE`.
    pub operating_status: Option<String>,
    /// Filter by name.
    pub name: Option<String>,
    /// Filter by flavor.
    pub flavor: Option<String>,
    /// Filter by provider.
    pub provider: Option<String>,
    /// Page size.
    pub limit: Option<u32>,
    /// ID of the last item of the previous page.
    pub marker: Option<String>,
    /// Attribute to sort by.
    pub sort_key: Option<String>,
    /// Sort direction.
    pub sort_dir: Option<SortDirection>,
}

impl ListOpts {
    /// Collect the set fields as query parameters.
    #[must_use]
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("description", self.description.as_ref());
        params.push_opt("admin_state_up", self.admin_state_up);
        params.push_opt("tenant_id", self.tenant_id.as_ref());
        params.push_opt("provisioning_status", self.provisioning_status.as_ref());
        params.push_opt("vip_address", self.vip_address.as_ref());
        params.push_opt("vip_port_id", self.vip_port_id.as_ref());
        params.push_opt("vip_subnet_id", self.vip_subnet_id.as_ref());
        params.push_opt("id", self.id.as_ref());
        params.push_opt("operating_status", self.operating_status.as_ref());
        params.push_opt("name", self.name.as_ref());
        params.push_opt("flavor", self.flavor.as_ref());
        params.push_opt("provider", self.provider.as_ref());
        params.push_opt("limit", self.limit);
        params.push_opt("marker", self.marker.as_ref());
        params.push_opt("sort_key", self.sort_key.as_ref());
        params.push_opt("sort_dir", self.sort_dir);
        params
    }
}

/// Options for creating a load balancer.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct CreateOpts {
    /// Human-readable name, not necessarily unique.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Subnet to allocate the VIP on. Required.
    #[validate(length(min = 1, message = "vip_subnet_id is required"))]
    pub vip_subnet_id: String,
    /// Owning tenant; only admins may name a tenant other than their own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Fixed VIP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip_address: Option<String>,
    /// Administrative state, `true` is UP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
    /// Flavor UUID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
    /// Provider name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl CreateOpts {
    /// Options with only the required subnet set.
    #[must_use]
    pub fn new(vip_subnet_id: impl Into<String>) -> Self {
        Self {
            vip_subnet_id: vip_subnet_id.into(),
            ..Self::default()
        }
    }
}

/// Options for updating a load balancer. Unset fields are left unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct UpdateOpts {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New administrative state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_state_up: Option<bool>,
}

/// Provisioning state of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProvisioningStatus {
    /// Fully provisioned.
    Active,
    /// Being created.
    PendingCreate,
    /// Being updated.
    PendingUpdate,
    /// Being deleted.
    PendingDelete,
    /// Deleted.
    Deleted,
    /// Provisioning failed.
    Error,
    /// A value this crate does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ProvisioningStatus {
    /// Whether an asynchronous change is still in progress.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(
            self,
            Self::PendingCreate | Self::PendingUpdate | Self::PendingDelete
        )
    }
}

/// Observed operating state of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatingStatus {
    /// Operating normally.
    Online,
    /// Administratively down or not yet serving.
    Offline,
    /// Some members are failing.
    Degraded,
    /// Failed.
    Error,
    /// No health monitor configured.
    NoMonitor,
    /// Draining connections.
    Draining,
    /// A value this crate does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Reference to a child resource by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Child resource ID.
    pub id: String,
}

/// A load balancer as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    /// Load balancer ID.
    pub id: String,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Owning tenant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// VIP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vip_address: Option<String>,
    /// VIP port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vip_port_id: Option<String>,
    /// VIP subnet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vip_subnet_id: Option<String>,
    /// Administrative state.
    #[serde(default)]
    pub admin_state_up: bool,
    /// Provisioning status.
    #[serde(default)]
    pub provisioning_status: ProvisioningStatus,
    /// Operating status.
    #[serde(default)]
    pub operating_status: OperatingStatus,
    /// Flavor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
    /// Provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Attached listeners.
    #[serde(default)]
    pub listeners: Vec<ResourceRef>,
    /// Attached pools.
    #[serde(default)]
    pub pools: Vec<ResourceRef>,
}

/// Status tree of a load balancer and everything attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTree {
    /// Root of the tree.
    pub loadbalancer: LoadBalancerStatus,
}

impl StatusTree {
    /// Whether any node in the tree is still provisioning.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        let lb = &self.loadbalancer;
        lb.provisioning_status.is_pending()
            || lb.listeners.iter().any(|listener| {
                listener.provisioning_status.is_pending()
                    || listener.pools.iter().any(|pool| {
                        pool.provisioning_status.is_pending()
                            || pool
                                .health_monitor
                                .as_ref()
                                .is_some_and(|hm| hm.provisioning_status.is_pending())
                            || pool
                                .members
                                .iter()
                                .any(|member| member.provisioning_status.is_pending())
                    })
            })
    }
}

/// Load balancer node of a [`StatusTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancerStatus {
    /// Load balancer ID.
    pub id: String,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Provisioning status.
    #[serde(default)]
    pub provisioning_status: ProvisioningStatus,
    /// Operating status.
    #[serde(default)]
    pub operating_status: OperatingStatus,
    /// Listener nodes.
    #[serde(default)]
    pub listeners: Vec<ListenerStatus>,
}

/// Listener node of a [`StatusTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenerStatus {
    /// Listener ID.
    pub id: String,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Provisioning status.
    #[serde(default)]
    pub provisioning_status: ProvisioningStatus,
    /// Operating status.
    #[serde(default)]
    pub operating_status: OperatingStatus,
    /// Pool nodes.
    #[serde(default)]
    pub pools: Vec<PoolStatus>,
}

/// Pool node of a [`StatusTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Pool ID.
    pub id: String,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Provisioning status.
    #[serde(default)]
    pub provisioning_status: ProvisioningStatus,
    /// Operating status.
    #[serde(default)]
    pub operating_status: OperatingStatus,
    /// Health monitor, if one is configured.
    #[serde(
        rename = "healthmonitor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub health_monitor: Option<HealthMonitorStatus>,
    /// Member nodes.
    #[serde(default)]
    pub members: Vec<MemberStatus>,
}

/// Health monitor node of a [`StatusTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMonitorStatus {
    /// Health monitor ID.
    pub id: String,
    /// Probe type, e.g. `HTTP`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub monitor_type: Option<String>,
    /// Provisioning status.
    #[serde(default)]
    pub provisioning_status: ProvisioningStatus,
}

/// Member node of a [`StatusTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberStatus {
    /// Member ID.
    pub id: String,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Member address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Member port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_port: Option<u16>,
    /// Provisioning status.
    #[serde(default)]
    pub provisioning_status: ProvisioningStatus,
    /// Operating status.
    #[serde(default)]
    pub operating_status: OperatingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_opts_query_contains_only_set_fields() {
        let opts = ListOpts {
            name: Some("lb1".into()),
            limit: Some(10),
            ..ListOpts::default()
        };

        let pairs = opts.to_query_params().into_pairs();
        assert_eq!(
            pairs,
            vec![("name", "lb1".to_string()), ("limit", "10".to_string())]
        );
    }

    #[test]
    fn list_opts_false_flag_is_sent() {
        let opts = ListOpts {
            admin_state_up: Some(false),
            sort_dir: Some(SortDirection::Desc),
            sort_key: Some("name".into()),
            ..ListOpts::default()
        };

        assert_eq!(
            opts.to_query_params().to_query_string(),
            "?admin_state_up=false&sort_key=name&sort_dir=desc"
        );
    }

    #[test]
    fn list_opts_every_field_has_one_wire_name() {
        let opts = ListOpts {
            description: Some("d".into()),
            admin_state_up: Some(true),
            tenant_id: Some("t".into()),
            provisioning_status: Some("ACTIVE".into()),
            vip_address: Some("10.0.0.5".into()),
            vip_port_id: Some("p".into()),
            vip_subnet_id: Some("s".into()),
            id: Some("i".into()),
            operating_status: Some("ONLINE".into()),
            name: Some("n".into()),
            flavor: Some("f".into()),
            provider: Some("octavia".into()),
            limit: Some(5),
            marker: Some("m".into()),
            sort_key: Some("k".into()),
            sort_dir: Some(SortDirection::Asc),
        };

        let keys: Vec<&str> = opts
            .to_query_params()
            .into_pairs()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec![
                "description",
                "admin_state_up",
                "tenant_id",
                "provisioning_status",
                "vip_address",
                "vip_port_id",
                "vip_subnet_id",
                "id",
                "operating_status",
                "name",
                "flavor",
                "provider",
                "limit",
                "marker",
                "sort_key",
                "sort_dir",
            ]
        );
    }

    #[test]
    fn create_opts_serializes_only_set_fields() {
        let opts = CreateOpts {
            admin_state_up: Some(false),
            ..CreateOpts::new("sub-1")
        };
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({"vip_subnet_id": "sub-1", "admin_state_up": false})
        );
    }

    #[test]
    fn create_opts_requires_subnet() {
        assert!(CreateOpts::default().validate().is_err());
        assert!(CreateOpts::new("sub-1").validate().is_ok());
    }

    #[test]
    fn unknown_statuses_decode_to_unknown() {
        let status: ProvisioningStatus = serde_json::from_value(json!("PENDING_CREATE")).unwrap();
        assert_eq!(status, ProvisioningStatus::PendingCreate);
        assert!(status.is_pending());

        let status: ProvisioningStatus = serde_json::from_value(json!("MIGRATING")).unwrap();
        assert_eq!(status, ProvisioningStatus::Unknown);

        let status: OperatingStatus = serde_json::from_value(json!("NO_MONITOR")).unwrap();
        assert_eq!(status, OperatingStatus::NoMonitor);
    }

    #[test]
    fn load_balancer_tolerates_sparse_payloads() {
        let lb: LoadBalancer = serde_json::from_value(json!({
            "id": "lb-1",
            "flavor": null
        }))
        .unwrap();
        assert_eq!(lb.id, "lb-1");
        assert!(lb.name.is_empty());
        assert!(lb.flavor.is_none());
        assert_eq!(lb.provisioning_status, ProvisioningStatus::Unknown);
        assert!(lb.listeners.is_empty());
    }
}
