//! REST API flows: discovery, CRUD, query, upsert, composite, change tracking.

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use forcekit::rest::{CompositeRequest, CompositeSubrequest};

use super::common::{self, Shipment};

#[tokio::test]
async fn test_record_lifecycle_round_trip() {
    let server = MockServer::start().await;
    let rest = common::connected_rest(&server).await;

    Mock::given(method("POST"))
        .and(path("/services/data/v62.0/sobjects/Shipment__c"))
        .and(body_json(json!({"Tracking__c": "TRK-100", "Depot__c": "Oslo"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "a00xx0000000001",
            "success": true,
            "errors": []
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/sobjects/Shipment__c/a00xx0000000001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "attributes": {
                "type": "Shipment__c",
                "url": "/services/data/v62.0/sobjects/Shipment__c/a00xx0000000001"
            },
            "Id": "a00xx0000000001",
            "Name": "SHP-0001",
            "Tracking__c": "TRK-100",
            "Depot__c": "Oslo",
            "CreatedDate": "2024-03-01T10:00:00.000+0000"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/services/data/v62.0/sobjects/Shipment__c/a00xx0000000001"))
        .and(body_json(json!({"Depot__c": "Bergen"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/services/data/v62.0/sobjects/Shipment__c/a00xx0000000001"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let new_shipment = Shipment {
        tracking: "TRK-100".into(),
        depot: "Oslo".into(),
        ..Default::default()
    };
    let saved = rest.insert_record(&new_shipment).await.unwrap();
    assert!(saved.success);
    assert_eq!(saved.id, "a00xx0000000001");

    let fetched: Shipment = rest.get_record(&saved.id, &[]).await.unwrap();
    assert_eq!(fetched.system.name, "SHP-0001");
    assert_eq!(fetched.tracking, "TRK-100");
    assert!(fetched.system.created_date.is_some());

    let moved = Shipment {
        depot: "Bergen".into(),
        ..Default::default()
    };
    rest.update_record(&saved.id, &moved).await.unwrap();

    rest.delete_record::<Shipment>(&saved.id).await.unwrap();
}

#[tokio::test]
async fn test_query_pages_follow_next_records_url() {
    let server = MockServer::start().await;
    let rest = common::connected_rest(&server).await;

    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/query"))
        .and(query_param("q", "SELECT Id, Name FROM Shipment__c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 3,
            "done": false,
            "nextRecordsUrl": "/services/data/v62.0/query/01gxx-2000",
            "records": [
                {"Id": "a00xx01", "Name": "SHP-0001"},
                {"Id": "a00xx02", "Name": "SHP-0002"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/query/01gxx-2000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 3,
            "done": true,
            "records": [{"Id": "a00xx03", "Name": "SHP-0003"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut page = rest
        .query::<serde_json::Value>("SELECT Id, Name FROM Shipment__c")
        .await
        .unwrap();
    let mut names: Vec<String> = Vec::new();

    loop {
        for record in &page.records {
            names.push(record["Name"].as_str().unwrap_or_default().to_string());
        }
        match page.next_records_url.as_deref() {
            Some(next) if !page.done => page = rest.query_next(next).await.unwrap(),
            _ => break,
        }
    }

    assert_eq!(names, vec!["SHP-0001", "SHP-0002", "SHP-0003"]);
    assert_eq!(page.total_size, 3);
}

#[tokio::test]
async fn test_upsert_transitions_from_created_to_updated() {
    let server = MockServer::start().await;
    let rest = common::connected_rest(&server).await;

    // First upsert creates (201 with a body), the second updates in place
    // (204 without one).
    Mock::given(method("PATCH"))
        .and(path("/services/data/v62.0/sobjects/Shipment__c/Tracking__c/TRK-9"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "a00xx0000000009",
            "success": true,
            "created": true,
            "errors": []
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/services/data/v62.0/sobjects/Shipment__c/Tracking__c/TRK-9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let shipment = Shipment {
        depot: "Oslo".into(),
        ..Default::default()
    };

    let first = rest
        .upsert_record_by_external_id("TRK-9", &shipment)
        .await
        .unwrap();
    assert!(first.created);
    assert_eq!(first.id, "a00xx0000000009");

    let second = rest
        .upsert_record_by_external_id("TRK-9", &shipment)
        .await
        .unwrap();
    assert!(second.success);
    assert!(!second.created);
    assert!(second.id.is_empty());
}

#[tokio::test]
async fn test_soql_built_from_describe_metadata() {
    let server = MockServer::start().await;
    let rest = common::connected_rest(&server).await;

    // One describe serves both query builds; geolocation compound fields
    // stay out of the projection.
    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/sobjects/Shipment__c/describe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Shipment__c",
            "label": "Shipment",
            "labelPlural": "Shipments",
            "queryable": true,
            "fields": [
                {"name": "Id", "type": "id", "soapType": "tns:ID"},
                {"name": "Name", "type": "string", "soapType": "xsd:string", "length": 80},
                {"name": "Tracking__c", "type": "string", "soapType": "xsd:string", "length": 40},
                {"name": "Route__c", "type": "location", "soapType": "urn:location"}
            ],
            "urls": {
                "sobject": "/services/data/v62.0/sobjects/Shipment__c",
                "describe": "/services/data/v62.0/sobjects/Shipment__c/describe"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let soql = rest
        .build_query_all_fields::<Shipment>(&["Depot__c = 'Oslo'"])
        .await
        .unwrap();
    assert_eq!(
        soql,
        "SELECT Id, Name, Tracking__c FROM Shipment__c WHERE Depot__c = 'Oslo'"
    );

    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/query"))
        .and(query_param("q", soql.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": 1,
            "done": true,
            "records": [{"Id": "a00xx01", "Name": "SHP-0001", "Tracking__c": "TRK-1"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = rest.query::<Shipment>(&soql).await.unwrap();
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].tracking, "TRK-1");

    // Second build reuses the cached describe; the expect(1) above verifies.
    let again = rest.build_query_all_fields::<Shipment>(&[]).await.unwrap();
    assert_eq!(again, "SELECT Id, Name, Tracking__c FROM Shipment__c");
}

#[tokio::test]
async fn test_error_payloads_decode_into_api_errors() {
    let server = MockServer::start().await;
    let rest = common::connected_rest(&server).await;

    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/query"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!([{
            "message": "unexpected token: FORM",
            "errorCode": "MALFORMED_QUERY"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let err = rest
        .query::<serde_json::Value>("SELECT Id FORM Shipment__c")
        .await
        .unwrap_err();

    let api = err.api_errors().expect("expected a structured API error");
    assert!(api.contains_code("MALFORMED_QUERY"));
    assert!(!api.is_session_expired());
    assert!(err.to_string().contains("unexpected token: FORM"));
}

#[tokio::test]
async fn test_composite_executes_dependent_subrequests() {
    let server = MockServer::start().await;
    let rest = common::connected_rest(&server).await;

    Mock::given(method("POST"))
        .and(path("/services/data/v62.0/composite"))
        .and(body_json(json!({
            "allOrNone": true,
            "compositeRequest": [
                {
                    "method": "POST",
                    "url": "/services/data/v62.0/sobjects/Shipment__c",
                    "referenceId": "newShipment",
                    "body": {"Tracking__c": "TRK-55"}
                },
                {
                    "method": "GET",
                    "url": "/services/data/v62.0/sobjects/Shipment__c/@{newShipment.id}",
                    "referenceId": "readBack"
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "compositeResponse": [
                {
                    "body": {"id": "a00xx0000000055", "success": true, "errors": []},
                    "httpStatusCode": 201,
                    "referenceId": "newShipment"
                },
                {
                    "body": {"Id": "a00xx0000000055", "Tracking__c": "TRK-55"},
                    "httpStatusCode": 200,
                    "referenceId": "readBack"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = CompositeRequest::new(true);
    request
        .add(
            CompositeSubrequest::new(
                "POST",
                "/services/data/v62.0/sobjects/Shipment__c",
                "newShipment",
            )
            .with_body(json!({"Tracking__c": "TRK-55"})),
        )
        .add(CompositeSubrequest::new(
            "GET",
            "/services/data/v62.0/sobjects/Shipment__c/@{newShipment.id}",
            "readBack",
        ));

    let response = rest.composite(&request).await.unwrap();

    let created = response.by_reference("newShipment").unwrap();
    assert!(created.is_success());
    assert_eq!(created.body["id"], "a00xx0000000055");

    let read_back = response.by_reference("readBack").unwrap();
    assert_eq!(read_back.body["Tracking__c"], "TRK-55");
}

#[tokio::test]
async fn test_updated_records_window() {
    let server = MockServer::start().await;
    let rest = common::connected_rest(&server).await;

    Mock::given(method("GET"))
        .and(path("/services/data/v62.0/sobjects/Shipment__c/updated/"))
        .and(query_param("start", "2024-03-01T00:00:00Z"))
        .and(query_param("end", "2024-03-08T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ids": ["a00xx01", "a00xx02"],
            "latestDateCovered": "2024-03-07T21:30:00.000+0000"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap();

    let updated = rest
        .updated_records::<Shipment>(start, end)
        .await
        .unwrap();

    assert_eq!(updated.ids, vec!["a00xx01", "a00xx02"]);
    assert_eq!(
        updated.latest_date_covered.as_datetime(),
        Utc.with_ymd_and_hms(2024, 3, 7, 21, 30, 0).unwrap()
    );
}
