//! Bulk API flows: the job lifecycle from creation to per-record results.

use std::sync::atomic::{AtomicU32, Ordering};

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use forcekit::bulk::{BulkOperation, CreateJobRequest, JobState};
use forcekit::rest::RestClient;
use forcekit::{BulkClient, ForceClient, Session};

use super::common::{self, Shipment, TOKEN};

const JOB_ID: &str = "750D0000000077";

fn job_body(state: &str) -> serde_json::Value {
    json!({
        "apiVersion": 62.0,
        "concurrencyMode": "Parallel",
        "contentType": "JSON",
        "id": JOB_ID,
        "object": "Shipment__c",
        "operation": "insert",
        "state": state
    })
}

fn bulk_client(server: &MockServer) -> BulkClient {
    common::init_tracing();
    let client = ForceClient::from_session(Session::new(server.uri(), TOKEN)).unwrap();
    BulkClient::new(client)
}

#[tokio::test]
async fn test_job_lifecycle_through_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/async/62.0/job"))
        .and(body_json(json!({
            "object": "Shipment__c",
            "operation": "insert",
            "contentType": "JSON"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(job_body("Open")))
        .expect(1)
        .mount(&server)
        .await;

    // Each batch submission is acknowledged with its own id.
    let submissions = AtomicU32::new(0);
    Mock::given(method("POST"))
        .and(path(format!("/services/async/62.0/job/{}/batch", JOB_ID)))
        .respond_with(move |_: &wiremock::Request| {
            let n = submissions.fetch_add(1, Ordering::SeqCst);
            ResponseTemplate::new(201).set_body_json(json!({
                "id": format!("751D000000000{}", n + 1),
                "jobId": JOB_ID,
                "state": "Queued"
            }))
        })
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/services/async/62.0/job/{}", JOB_ID)))
        .and(body_json(json!({"state": "Closed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_body("Closed")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/services/async/62.0/job/{}", JOB_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": JOB_ID,
            "object": "Shipment__c",
            "operation": "insert",
            "state": "JobComplete",
            "numberBatchesCompleted": 2,
            "numberBatchesTotal": 2,
            "numberRecordsProcessed": 3,
            "numberRecordsFailed": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/services/async/62.0/job/{}/batch", JOB_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchInfo": [
                {"id": "751D0000000001", "jobId": JOB_ID, "state": "Completed",
                 "numberRecordsProcessed": 2},
                {"id": "751D0000000002", "jobId": JOB_ID, "state": "Completed",
                 "numberRecordsProcessed": 1, "numberRecordsFailed": 1}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/services/async/62.0/job/{}/batch/751D0000000002/result",
            JOB_ID
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a00xx0000000031", "success": true, "created": true, "errors": []},
            {"id": "", "success": false, "created": false, "errors": [
                {"fields": ["Tracking__c"], "message": "duplicate value found",
                 "statusCode": "DUPLICATE_VALUE"}
            ]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let bulk = bulk_client(&server);
    let mut job = bulk
        .create_job(CreateJobRequest::new("Shipment__c", BulkOperation::Insert))
        .await
        .unwrap();
    assert_eq!(job.state(), JobState::Open);

    let first = vec![
        Shipment {
            tracking: "TRK-1".into(),
            ..Default::default()
        },
        Shipment {
            tracking: "TRK-2".into(),
            ..Default::default()
        },
    ];
    let second = vec![Shipment {
        tracking: "TRK-3".into(),
        ..Default::default()
    }];

    let batch_a = job.add_batch(&first).await.unwrap();
    let batch_b = job.add_batch(&second).await.unwrap();
    assert_ne!(batch_a.id, batch_b.id);

    job.close().await.unwrap();
    assert_eq!(job.state(), JobState::Closed);

    let info = job.refresh().await.unwrap();
    assert!(info.state.is_terminal());
    assert_eq!(info.number_records_processed, 3);
    assert_eq!(info.number_records_failed, 1);

    let batches = job.batches().await.unwrap();
    assert_eq!(batches.len(), 2);
    assert!(batches.iter().all(|b| b.state.is_finished()));

    let ids = job.batch_record_ids("751D0000000002", false).await.unwrap();
    assert_eq!(ids, vec!["a00xx0000000031"]);
}

#[tokio::test]
async fn test_abort_blocks_further_batches() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/async/62.0/job"))
        .respond_with(ResponseTemplate::new(201).set_body_json(job_body("Open")))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("/services/async/62.0/job/{}", JOB_ID)))
        .and(body_json(json!({"state": "Aborted"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_body("Aborted")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/services/async/62.0/job/{}/batch", JOB_ID)))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let bulk = bulk_client(&server);
    let mut job = bulk
        .create_job(CreateJobRequest::new("Shipment__c", BulkOperation::Insert))
        .await
        .unwrap();

    job.abort().await.unwrap();
    assert_eq!(job.state(), JobState::Aborted);

    let rejected = vec![Shipment::default()];
    let err = job.add_batch(&rejected).await.unwrap_err();
    assert!(err.to_string().contains("must be Open"));
}

#[tokio::test]
async fn test_bulk_results_feed_rest_lookups() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/services/async/62.0/job/{}", JOB_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": JOB_ID,
            "object": "Shipment__c",
            "operation": "insert",
            "state": "JobComplete"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!(
            "/services/async/62.0/job/{}/batch/751D0000000009/result",
            JOB_ID
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a00xx0000000042", "success": true, "created": true, "errors": []}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/sobjects/Shipment__c/a00xx0000000042"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "a00xx0000000042",
            "Name": "SHP-0042",
            "Tracking__c": "TRK-42"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // One session drives both surfaces.
    common::init_tracing();
    let client = ForceClient::from_session(Session::new(server.uri(), TOKEN)).unwrap();
    let bulk = BulkClient::new(client.clone());
    common::mount_discovery(&server).await;
    let rest = RestClient::connect(client).await.unwrap();

    let job = bulk.job(JOB_ID).await.unwrap();
    assert!(job.state().is_terminal());

    let ids = job.batch_record_ids("751D0000000009", false).await.unwrap();
    assert_eq!(ids.len(), 1);

    let shipment: Shipment = rest.get_record(&ids[0], &[]).await.unwrap();
    assert_eq!(shipment.system.name, "SHP-0042");
    assert_eq!(shipment.tracking, "TRK-42");
}
