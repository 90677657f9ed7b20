//! Shared scaffolding: a mock org with working discovery endpoints, plus the
//! record type the flows exchange with it.

use std::sync::Once;

use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use forcekit::rest::{RestClient, SObject, SystemFields};
use forcekit::{ForceClient, Session};

pub const TOKEN: &str = "00Dxx0000001gPL!AQsAQHarness";

static TRACING: Once = Once::new();

/// Wire the test binary into `RUST_LOG` once; later calls are no-ops.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Custom object the flows revolve around. Carries an external id so the
/// upsert paths are exercisable.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Shipment {
    #[serde(flatten)]
    pub system: SystemFields,

    #[serde(rename = "Tracking__c", default, skip_serializing_if = "String::is_empty")]
    pub tracking: String,
    #[serde(rename = "Depot__c", default, skip_serializing_if = "String::is_empty")]
    pub depot: String,
}

impl SObject for Shipment {
    fn api_name() -> &'static str {
        "Shipment__c"
    }

    fn external_id_field() -> Option<&'static str> {
        Some("Tracking__c")
    }
}

fn object_entry(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "label": name,
        "labelPlural": format!("{}s", name),
        "keyPrefix": "001",
        "queryable": true,
        "createable": true,
        "updateable": true,
        "deletable": true,
        "urls": {
            "sobject": format!("/services/data/v62.0/sobjects/{}", name),
            "describe": format!("/services/data/v62.0/sobjects/{}/describe", name),
            "rowTemplate": format!("/services/data/v62.0/sobjects/{}/{{ID}}", name)
        }
    })
}

/// Mount the two discovery endpoints [`RestClient::connect`] depends on:
/// the resource index and the global object listing.
pub async fn mount_discovery(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/services/data/v62.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "limits": "/services/data/v62.0/limits",
            "query": "/services/data/v62.0/query",
            "queryAll": "/services/data/v62.0/queryAll",
            "search": "/services/data/v62.0/search",
            "sobjects": "/services/data/v62.0/sobjects",
            "composite": "/services/data/v62.0/composite"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/sobjects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "encoding": "UTF-8",
            "maxBatchSize": 200,
            "sobjects": [object_entry("Account"), object_entry("Shipment__c")]
        })))
        .mount(server)
        .await;
}

/// A REST client connected to the mock org with a pre-established session.
pub async fn connected_rest(server: &MockServer) -> RestClient {
    init_tracing();
    mount_discovery(server).await;

    let client = ForceClient::from_session(Session::new(server.uri(), TOKEN)).unwrap();
    RestClient::connect(client).await.unwrap()
}

/// Body the token endpoint answers grants with.
pub fn token_body(instance: &str, token: &str) -> serde_json::Value {
    json!({
        "access_token": token,
        "instance_url": instance,
        "id": "https://login.salesforce.com/id/00D/005",
        "token_type": "Bearer",
        "issued_at": "1718000000000",
        "signature": "sig=="
    })
}
