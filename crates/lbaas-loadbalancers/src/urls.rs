//! URL builders for the load balancer resource.

use lbaas_core::ServiceClient;

const ROOT_PATH: &str = "lbaas";
const RESOURCE_PATH: &str = "loadbalancers";
const STATUS_PATH: &str = "statuses";

/// `<endpoint>lbaas/loadbalancers`
#[must_use]
pub fn collection_url(client: &ServiceClient) -> String {
    client.service_url(&[ROOT_PATH, RESOURCE_PATH])
}

/// `<endpoint>lbaas/loadbalancers/<id>`
#[must_use]
pub fn resource_url(client: &ServiceClient, id: &str) -> String {
    client.service_url(&[ROOT_PATH, RESOURCE_PATH, id])
}

/// `<endpoint>lbaas/loadbalancers/<id>/statuses`
#[must_use]
pub fn status_url(client: &ServiceClient, id: &str) -> String {
    client.service_url(&[ROOT_PATH, RESOURCE_PATH, id, STATUS_PATH])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ServiceClient {
        ServiceClient::new("https://network.example.com/v2.0/").unwrap()
    }

    #[test]
    fn builds_resource_paths() {
        let client = client();
        assert_eq!(
            collection_url(&client),
            "https://network.example.com/v2.0/lbaas/loadbalancers"
        );
        assert_eq!(
            resource_url(&client, "abc"),
            "https://network.example.com/v2.0/lbaas/loadbalancers/abc"
        );
        assert_eq!(
            status_url(&client, "abc"),
            "https://network.example.com/v2.0/lbaas/loadbalancers/abc/statuses"
        );
    }
}
