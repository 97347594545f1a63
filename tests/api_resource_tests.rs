//! 植物与分类 API 集成测试

use axum::http::StatusCode;
use plant_service::auth::{Identity, JwtService};
use serde_json::json;
use serial_test::serial;

mod common;
use common::{
    body_json, create_test_app, create_test_config, lazy_pool, send_json, send_raw, setup_test_db,
};

#[tokio::test]
async fn test_protected_resources_require_token() {
    let mut config = create_test_config();
    config.security.protect_resources = true;
    let app = create_test_app(config.clone(), lazy_pool(&config));

    for uri in ["/plants", "/plants/1", "/categories", "/categories/1"] {
        let response = send_json(&app, "GET", uri, None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "GET {}", uri);
    }

    let response = send_json(&app, "POST", "/api/upload-image", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // 健康检查始终公开
    let response = send_json(&app, "GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_plant_without_name_rejected() {
    let config = create_test_config();
    let app = create_test_app(config.clone(), lazy_pool(&config));

    let response = send_json(&app, "POST", "/plants", Some(json!({"code": "MON-01"})), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Plant name is required");
}

#[tokio::test]
async fn test_protected_resources_accept_valid_token() {
    let mut config = create_test_config();
    config.security.protect_resources = true;
    let app = create_test_app(config.clone(), lazy_pool(&config));

    let token = JwtService::new(common::TEST_JWT_SECRET, 300)
        .unwrap()
        .issue(&Identity {
            id: 1,
            username: "fern".to_string(),
        })
        .unwrap();

    // 通过认证后由处理器校验请求体，未触达数据库
    let response = send_json(&app, "POST", "/plants", Some(json!({})), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Plant name is required");

    let response = send_json(&app, "GET", "/plants/1", None, Some("bad-token")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_plant_with_null_name_rejected() {
    let config = create_test_config();
    let app = create_test_app(config.clone(), lazy_pool(&config));

    let response = send_json(&app, "POST", "/plants", Some(json!({"name": null})), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Plant name is required");
}

#[tokio::test]
async fn test_wrongly_typed_body_rejected_as_bad_request() {
    let config = create_test_config();
    let app = create_test_app(config.clone(), lazy_pool(&config));

    let response = send_json(
        &app,
        "POST",
        "/plants",
        Some(json!({"name": "Aloe", "category_id": "succulents"})),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], 400);
    assert!(json["error"]["message"].is_string());
}

#[tokio::test]
async fn test_malformed_category_body_rejected() {
    let config = create_test_config();
    let app = create_test_app(config.clone(), lazy_pool(&config));

    let response = send_raw(&app, "POST", "/categories", Some("application/json"), "{name").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Malformed JSON body");
}

#[tokio::test]
async fn test_non_numeric_id_rejected() {
    let config = create_test_config();
    let app = create_test_app(config.clone(), lazy_pool(&config));

    for (method, uri) in [
        ("GET", "/plants/abc"),
        ("DELETE", "/plants/abc"),
        ("GET", "/categories/abc"),
    ] {
        let response = send_json(&app, method, uri, None, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{} {}", method, uri);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], 400);
    }
}

#[tokio::test]
async fn test_create_category_without_name_rejected() {
    let config = create_test_config();
    let app = create_test_app(config.clone(), lazy_pool(&config));

    let response = send_json(&app, "POST", "/categories", Some(json!({})), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Category name is required");
}

// ===== 需要数据库 =====

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_plant_lifecycle() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let app = create_test_app(config, pool);

    let response = send_json(
        &app,
        "POST",
        "/categories",
        Some(json!({"name": "Aroids", "description": "Climbing tropicals"})),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let category = body_json(response).await;
    let category_id = category["id"].as_i64().unwrap();

    // 创建
    let response = send_json(
        &app,
        "POST",
        "/plants",
        Some(json!({
            "name": "Monstera",
            "category_id": category_id,
            "code": "MON-01",
            "location": "Living room",
            "watering_frequency": "weekly"
        })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let plant_id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Monstera");
    assert_eq!(created["category_name"], "Aroids");

    // 读取
    let uri = format!("/plants/{}", plant_id);
    let response = send_json(&app, "GET", &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched, created);

    // 全量替换：未提供的字段被清空
    let response = send_json(
        &app,
        "PUT",
        &uri,
        Some(json!({"name": "Monstera deliciosa", "category_id": category_id})),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Monstera deliciosa");
    assert_eq!(updated["category_name"], "Aroids");
    assert!(updated["code"].is_null());
    assert!(updated["location"].is_null());

    let response = send_json(&app, "GET", &uri, None, None).await;
    assert_eq!(body_json(response).await, updated);

    // 列表
    let response = send_json(&app, "GET", "/plants", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    // 删除
    let response = send_json(&app, "DELETE", &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = body_json(response).await;
    assert_eq!(deleted["message"], "Plant deleted successfully");
    assert_eq!(deleted["deletedPlant"]["id"].as_i64(), Some(plant_id));

    let response = send_json(&app, "GET", &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Plant not found");
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_missing_rows_return_not_found() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let app = create_test_app(config, pool);

    for (method, uri) in [
        ("GET", "/plants/9999"),
        ("DELETE", "/plants/9999"),
        ("GET", "/categories/9999"),
        ("DELETE", "/categories/9999"),
    ] {
        let response = send_json(&app, method, uri, None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
    }

    let response = send_json(
        &app,
        "PUT",
        "/plants/9999",
        Some(json!({"name": "Ghost"})),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send_json(
        &app,
        "PUT",
        "/categories/9999",
        Some(json!({"name": "Ghost"})),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_category_constraints() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let app = create_test_app(config, pool);

    let body = json!({"name": "Succulents"});
    let response = send_json(&app, "POST", "/categories", Some(body.clone()), None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let category_id = body_json(response).await["id"].as_i64().unwrap();

    // 名称唯一
    let response = send_json(&app, "POST", "/categories", Some(body), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Category name already exists");

    // 改名为已存在的名称
    let response = send_json(&app, "POST", "/categories", Some(json!({"name": "Cacti"})), None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let cacti_id = body_json(response).await["id"].as_i64().unwrap();

    let response = send_json(
        &app,
        "PUT",
        &format!("/categories/{}", cacti_id),
        Some(json!({"name": "Succulents"})),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Category name already exists");

    // 不存在的分类
    let response = send_json(
        &app,
        "POST",
        "/plants",
        Some(json!({"name": "Aloe", "category_id": 9999})),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Category does not exist");

    // 仍被引用的分类不能删除
    let response = send_json(
        &app,
        "POST",
        "/plants",
        Some(json!({"name": "Aloe", "category_id": category_id})),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let uri = format!("/categories/{}", category_id);
    let response = send_json(&app, "DELETE", &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Category is still in use by plants");

    // 分类按名称排序
    send_json(&app, "POST", "/categories", Some(json!({"name": "Aroids"})), None).await;
    let response = send_json(&app, "GET", "/categories", None, None).await;
    let names: Vec<String> = body_json(response)
        .await
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Aroids", "Cacti", "Succulents"]);
}

#[tokio::test]
#[serial]
#[ignore = "requires PostgreSQL (TEST_DATABASE_URL)"]
async fn test_readiness_with_database() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let app = create_test_app(config, pool);

    let response = send_json(&app, "GET", "/ready", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["ready"], true);
    assert_eq!(json["checks"][0]["name"], "database");
}
