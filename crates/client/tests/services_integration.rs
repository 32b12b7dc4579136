//! Integration tests for the service surface

use std::time::Duration;

use lakekeeper_client::model::{
    CreateProjectOptions, CreateWarehouseOptions, DeleteProfile, DeleteWarehouseOptions,
    ListRolesOptions, ListUsersOptions, ProvisionUserOptions, RenameOptions, S3StorageProfile,
    StorageCredential, UpdateDeleteProfileOptions, UpdateRoleOptions, UserType,
};
use lakekeeper_client::{is_conflict, is_not_found, ClientError, LakekeeperClient, NoAuth};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> LakekeeperClient {
    LakekeeperClient::builder(server.uri(), NoAuth)
        .retry_wait(Duration::ZERO, Duration::ZERO)
        .build()
        .await
        .expect("client")
}

fn warehouse_body(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "project-id": "prj_id",
        "name": "name",
        "protected": false,
        "status": "active",
        "storage-profile": {
            "type": "s3",
            "bucket": "test-bucket",
            "region": "us-west-1",
            "sts-enabled": false
        },
        "delete-profile": {"type": "soft", "expired-seconds": 3600}
    })
}

fn role_body(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "project-id": "prj",
        "name": format!("role-{id}"),
        "created-at": "2025-01-10T08:00:00Z"
    })
}

#[tokio::test]
async fn test_delete_warehouse_with_force_and_project() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/management/v1/warehouse/wh-1"))
        .and(query_param("force", "true"))
        .and(header("x-project-id", "prj_id"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let opts = DeleteWarehouseOptions { force: true, project_id: Some("prj_id".into()) };
    let response = client.warehouse().delete("wh-1", &opts, &[]).await.expect("deleted");
    assert_eq!(response.status.as_u16(), 204);
}

#[tokio::test]
async fn test_create_warehouse_fetches_stored_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/management/v1/warehouse"))
        .and(header("x-project-id", "prj_id"))
        .and(body_json(json!({
            "warehouse-name": "name",
            "project-id": "prj_id",
            "storage-profile": {
                "type": "s3",
                "bucket": "test-bucket",
                "region": "us-west-1",
                "sts-enabled": false
            },
            "storage-credential": {
                "type": "s3",
                "credential-type": "access-key",
                "aws-access-key-id": "keyid",
                "aws-secret-access-key": "secretkey"
            },
            "delete-profile": {"type": "soft", "expired-seconds": 3600}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"warehouse-id": "wh-9"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/management/v1/warehouse/wh-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(warehouse_body("wh-9")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let opts = CreateWarehouseOptions::new("name", S3StorageProfile::new("test-bucket", "us-west-1"))
        .with_project_id("prj_id")
        .with_storage_credential(StorageCredential::s3_access_key("keyid", "secretkey"))
        .with_delete_profile(DeleteProfile::soft(3600));

    let (warehouse, _) = client.warehouse().create(&opts, &[]).await.expect("created");
    assert_eq!(warehouse.id, "wh-9");
    assert!(warehouse.is_active());
    assert_eq!(warehouse.delete_profile, Some(DeleteProfile::soft(3600)));
}

#[tokio::test]
async fn test_create_warehouse_validates_before_sending() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    let profile = S3StorageProfile::new("test", "us-west-1");
    let mut opts = CreateWarehouseOptions::new("name", profile);
    if let lakekeeper_client::model::StorageProfile::S3(s3) = &mut opts.storage_profile {
        s3.sts_enabled = true;
    }

    let err = client.warehouse().create(&opts, &[]).await.unwrap_err();
    let ClientError::Validation(errors) = err else { panic!("expected validation error") };
    assert!(errors.has_field("storage-profile.sts-role-arn"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_set_protection_posts_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/management/v1/warehouse/wh-1/protection"))
        .and(body_json(json!({"protected": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"protected": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let (status, _) = client.warehouse().set_protection("wh-1", true, None, &[]).await.unwrap();
    assert!(status.protected);
}

#[tokio::test]
async fn test_protected_delete_surfaces_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/management/v1/warehouse/wh-1"))
        .and(query_param("force", "false"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {"message": "Warehouse is protected", "type": "ProtectedWarehouse", "code": 409}
        })))
        .mount(&server)
        .await;

    let client = client(&server).await;
    let err = client.warehouse().delete("wh-1", &DeleteWarehouseOptions::default(), &[]).await.unwrap_err();
    assert!(is_conflict(&err));
    assert!(!is_not_found(&err));
}

#[tokio::test]
async fn test_warehouse_lifecycle_endpoints() {
    let server = MockServer::start().await;
    for action in ["activate", "deactivate"] {
        Mock::given(method("POST"))
            .and(path(format!("/management/v1/warehouse/wh-1/{action}")))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/management/v1/warehouse/wh-1/rename"))
        .and(body_json(json!({"new-name": "lake"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/management/v1/warehouse/wh-1/delete-profile"))
        .and(body_json(json!({"delete-profile": {"type": "hard"}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let warehouses = client.warehouse();
    warehouses.deactivate("wh-1", None, &[]).await.unwrap();
    warehouses.activate("wh-1", None, &[]).await.unwrap();
    warehouses.rename("wh-1", &RenameOptions::new("lake"), None, &[]).await.unwrap();
    warehouses
        .update_delete_profile(
            "wh-1",
            &UpdateDeleteProfileOptions { delete_profile: DeleteProfile::hard() },
            None,
            &[],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_project_then_get() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/management/v1/project"))
        .and(body_json(json!({"project-name": "analytics"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"project-id": "prj-2"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/management/v1/project"))
        .and(header("x-project-id", "prj-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"project-id": "prj-2", "project-name": "analytics"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let (project, _) = client.project().create(&CreateProjectOptions::new("analytics"), &[]).await.unwrap();
    assert_eq!(project.id, "prj-2");
    assert_eq!(project.name, "analytics");
}

#[tokio::test]
async fn test_project_rename_and_delete_use_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/management/v1/project/rename"))
        .and(header("x-project-id", "prj"))
        .and(body_json(json!({"new-name": "renamed"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/management/v1/project"))
        .and(header("x-project-id", "prj"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/management/v1/project-list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [{"project-id": "prj", "project-name": "renamed"}]
        })))
        .mount(&server)
        .await;

    let client = client(&server).await;
    client.project().rename("prj", &RenameOptions::new("renamed"), &[]).await.unwrap();
    let (projects, _) = client.project().list(&[]).await.unwrap();
    assert_eq!(projects.len(), 1);
    client.project().delete("prj", &[]).await.unwrap();
}

#[tokio::test]
async fn test_list_roles_follows_page_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/management/v1/role"))
        .and(query_param("page-token", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"roles": [role_body("3")]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/management/v1/role"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "roles": [role_body("1"), role_body("2")],
            "next-page-token": "p2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let opts = ListRolesOptions { project_id: Some("prj".into()), ..Default::default() };
    let (roles, _) = client.role().list(&opts, &[]).await.unwrap();
    let ids: Vec<_> = roles.iter().map(|role| role.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|req| req.headers.get("x-project-id").is_some()));
}

#[tokio::test]
async fn test_list_roles_stops_on_repeated_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/management/v1/role"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "roles": [role_body("1")],
            "next-page-token": "same"
        })))
        .mount(&server)
        .await;

    let client = client(&server).await;
    let err = client.role().list(&ListRolesOptions::default(), &[]).await.unwrap_err();
    assert!(matches!(err, ClientError::Usage(_)));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_role_project_header_uses_project_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/management/v1/role/r-1"))
        .and(header("x-project-id", "prj"))
        .respond_with(ResponseTemplate::new(200).set_body_json(role_body("r-1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/management/v1/role/r-1"))
        .and(header("x-project-id", "prj"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    client.role().get("r-1", Some("prj"), &[]).await.unwrap();
    client.role().delete("r-1", Some("prj"), &[]).await.unwrap();
}

#[tokio::test]
async fn test_role_usage_errors() {
    let server = MockServer::start().await;
    let client = client(&server).await;

    let update = UpdateRoleOptions { name: "x".into(), description: None, project_id: None };
    assert!(matches!(client.role().update("", &update, &[]).await, Err(ClientError::Usage(_))));

    let create = lakekeeper_client::model::CreateRoleOptions::new("");
    assert!(matches!(client.role().create(&create, &[]).await, Err(ClientError::Usage(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_user_endpoints() {
    let server = MockServer::start().await;
    let user = json!({
        "id": "oidc~peter",
        "name": "Peter",
        "user-type": "human",
        "created-at": "2025-01-10T08:00:00Z",
        "last-updated-with": "create-endpoint"
    });
    Mock::given(method("GET"))
        .and(path("/management/v1/whoami"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user.clone()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/management/v1/user"))
        .and(body_json(json!({"user-type": "human"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(user.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/management/v1/user/oidc~peter"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "User not found", "type": "UserNotFound", "code": 404}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/management/v1/user"))
        .and(query_param("name", "Pe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": [user]})))
        .mount(&server)
        .await;

    let client = client(&server).await;
    let (me, _) = client.user().whoami(&[]).await.unwrap();
    assert_eq!(me.id, "oidc~peter");

    let provision = ProvisionUserOptions { user_type: Some(UserType::Human), ..Default::default() };
    client.user().provision(&provision, &[]).await.unwrap();

    let err = client.user().get("oidc~peter", &[]).await.unwrap_err();
    assert!(err.is_not_found());

    let opts = ListUsersOptions { name: Some("Pe".into()), ..Default::default() };
    let (users, _) = client.user().list(&opts, &[]).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_undecodable_response_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/management/v1/default-project"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = client(&server).await;
    let err = client.project().get_default(&[]).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}
