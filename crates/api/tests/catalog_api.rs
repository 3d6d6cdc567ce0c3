//! HTTP-level integration tests for categories, genres and titles.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete, get, patch_json, post_json, test_config, user_with_token,
};
use critiq_api::auth::jwt::generate_access_token;
use critiq_db::models::user::CreateUser;
use critiq_db::repositories::UserRepo;
use sqlx::PgPool;

async fn create_category(pool: &PgPool, token: &str, name: &str, slug: &str) -> StatusCode {
    post_json(
        build_test_app(pool.clone()),
        "/api/v1/categories",
        serde_json::json!({"name": name, "slug": slug}),
        token,
    )
    .await
    .status()
}

async fn create_genre(pool: &PgPool, token: &str, name: &str, slug: &str) -> StatusCode {
    post_json(
        build_test_app(pool.clone()),
        "/api/v1/genres",
        serde_json::json!({"name": name, "slug": slug}),
        token,
    )
    .await
    .status()
}

// ---------------------------------------------------------------------------
// Categories and genres
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn catalog_writes_require_admin(pool: PgPool) {
    let (_, alice) = user_with_token(&pool, "alice", "user").await;
    let (_, moderator) = user_with_token(&pool, "mia", "moderator").await;

    assert_eq!(
        create_category(&pool, &alice, "Films", "films").await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        create_genre(&pool, &moderator, "Drama", "drama").await,
        StatusCode::FORBIDDEN
    );

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/titles",
        serde_json::json!({"name": "Solaris", "year": 1972}),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_comes_from_the_account_not_the_token(pool: PgPool) {
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            username: "demoted".to_string(),
            email: "demoted@example.com".to_string(),
            role: None,
        },
    )
    .await
    .unwrap();
    let stale_admin = generate_access_token(user.id, "admin", &test_config().jwt).unwrap();

    assert_eq!(
        create_category(&pool, &stale_admin, "Films", "films").await,
        StatusCode::FORBIDDEN
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_create_list_and_delete(pool: PgPool) {
    let (_, admin) = user_with_token(&pool, "root", "admin").await;

    assert_eq!(
        create_category(&pool, &admin, "Films", "films").await,
        StatusCode::CREATED
    );
    assert_eq!(
        create_category(&pool, &admin, "Books", "books").await,
        StatusCode::CREATED
    );

    let json = body_json(get(build_test_app(pool.clone()), "/api/v1/categories").await).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["slug"], "books");
    assert!(data[0].get("id").is_none());

    let response = delete(build_test_app(pool.clone()), "/api/v1/categories/films", &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(build_test_app(pool.clone()), "/api/v1/categories/films", &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn slug_rules_are_enforced(pool: PgPool) {
    let (_, admin) = user_with_token(&pool, "root", "admin").await;

    assert_eq!(
        create_genre(&pool, &admin, "Sci-Fi", "sci fi!").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        create_genre(&pool, &admin, "Sci-Fi", &"s".repeat(51)).await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        create_genre(&pool, &admin, "Sci-Fi", "sci-fi").await,
        StatusCode::CREATED
    );
    assert_eq!(
        create_genre(&pool, &admin, "Science Fiction", "sci-fi").await,
        StatusCode::CONFLICT
    );
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn title_resolves_category_and_genres(pool: PgPool) {
    let (_, admin) = user_with_token(&pool, "root", "admin").await;
    create_category(&pool, &admin, "Films", "films").await;
    create_genre(&pool, &admin, "Drama", "drama").await;
    create_genre(&pool, &admin, "Sci-Fi", "sci-fi").await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/titles",
        serde_json::json!({
            "name": "Solaris",
            "year": 1972,
            "description": "A station above an ocean.",
            "category": "films",
            "genre": ["drama", "sci-fi", "drama"],
        }),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["category"]["slug"], "films");
    assert_eq!(data["genre"].as_array().unwrap().len(), 2);
    assert!(data["rating"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_genre_or_category_is_rejected(pool: PgPool) {
    let (_, admin) = user_with_token(&pool, "root", "admin").await;
    create_genre(&pool, &admin, "Drama", "drama").await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/titles",
        serde_json::json!({"name": "X", "year": 2000, "genre": ["drama", "western"]}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("western"));

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/titles",
        serde_json::json!({"name": "X", "year": 2000, "category": "nope"}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn future_year_is_rejected(pool: PgPool) {
    let (_, admin) = user_with_token(&pool, "root", "admin").await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/titles",
        serde_json::json!({"name": "Tomorrow", "year": 9999}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_category_keeps_titles(pool: PgPool) {
    let (_, admin) = user_with_token(&pool, "root", "admin").await;
    create_category(&pool, &admin, "Films", "films").await;

    let created = body_json(
        post_json(
            build_test_app(pool.clone()),
            "/api/v1/titles",
            serde_json::json!({"name": "Stalker", "year": 1979, "category": "films"}),
            &admin,
        )
        .await,
    )
    .await;
    let title_id = created["data"]["id"].as_i64().unwrap();

    delete(build_test_app(pool.clone()), "/api/v1/categories/films", &admin).await;

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/titles/{title_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["category"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn title_list_filters(pool: PgPool) {
    let (_, admin) = user_with_token(&pool, "root", "admin").await;
    create_category(&pool, &admin, "Films", "films").await;
    create_genre(&pool, &admin, "Drama", "drama").await;

    for body in [
        serde_json::json!({"name": "Solaris", "year": 1972, "category": "films", "genre": ["drama"]}),
        serde_json::json!({"name": "Stalker", "year": 1979, "category": "films"}),
        serde_json::json!({"name": "War and Peace", "year": 1869}),
    ] {
        let response = post_json(build_test_app(pool.clone()), "/api/v1/titles", body, &admin).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let count = |json: serde_json::Value| json["data"].as_array().unwrap().len();

    let all = body_json(get(build_test_app(pool.clone()), "/api/v1/titles").await).await;
    assert_eq!(count(all), 3);

    let films = body_json(get(build_test_app(pool.clone()), "/api/v1/titles?category=films").await).await;
    assert_eq!(count(films), 2);

    let drama = body_json(get(build_test_app(pool.clone()), "/api/v1/titles?genre=drama").await).await;
    assert_eq!(count(drama), 1);

    let by_name = body_json(get(build_test_app(pool.clone()), "/api/v1/titles?name=sta").await).await;
    assert_eq!(count(by_name), 1);

    let by_year = body_json(get(build_test_app(pool.clone()), "/api/v1/titles?year=1869").await).await;
    assert_eq!(count(by_year), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn title_partial_update(pool: PgPool) {
    let (_, admin) = user_with_token(&pool, "root", "admin").await;
    create_genre(&pool, &admin, "Drama", "drama").await;
    create_genre(&pool, &admin, "War", "war").await;

    let created = body_json(
        post_json(
            build_test_app(pool.clone()),
            "/api/v1/titles",
            serde_json::json!({"name": "Come and See", "year": 1985, "genre": ["drama"]}),
            &admin,
        )
        .await,
    )
    .await;
    let title_id = created["data"]["id"].as_i64().unwrap();

    let response = patch_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/titles/{title_id}"),
        serde_json::json!({"genre": ["war"]}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Come and See");
    assert_eq!(json["data"]["year"], 1985);
    let genres = json["data"]["genre"].as_array().unwrap();
    assert_eq!(genres.len(), 1);
    assert_eq!(genres[0]["slug"], "war");

    let response = patch_json(
        build_test_app(pool.clone()),
        "/api/v1/titles/999999",
        serde_json::json!({"name": "Nothing"}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn title_update_null_clears_category_and_description(pool: PgPool) {
    let (_, admin) = user_with_token(&pool, "root", "admin").await;
    create_category(&pool, &admin, "Films", "films").await;

    let created = body_json(
        post_json(
            build_test_app(pool.clone()),
            "/api/v1/titles",
            serde_json::json!({
                "name": "Stalker",
                "year": 1979,
                "description": "Three men walk into the Zone.",
                "category": "films",
            }),
            &admin,
        )
        .await,
    )
    .await;
    let title_id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/titles/{title_id}");

    // Keys left out keep their values.
    let response = patch_json(
        build_test_app(pool.clone()),
        &uri,
        serde_json::json!({"year": 1980}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["category"]["slug"], "films");
    assert_eq!(json["data"]["description"], "Three men walk into the Zone.");

    let response = patch_json(
        build_test_app(pool.clone()),
        &uri,
        serde_json::json!({"category": null, "description": null}),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["category"].is_null());
    assert!(json["data"]["description"].is_null());
    assert_eq!(json["data"]["year"], 1980);

    let fetched = body_json(get(build_test_app(pool.clone()), &uri).await).await;
    assert!(fetched["data"]["category"].is_null());
}
