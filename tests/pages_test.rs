// Server-rendered page tests that need no database

use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
};
use pawtag_backend::handlers::pages::{edit_page, fallback_redirect, landing, EditPageQuery};

#[tokio::test]
async fn landing_page_renders() {
    let Html(body) = landing().await;
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("PawTag"));
}

#[tokio::test]
async fn edit_page_without_id_redirects_home() {
    let response = edit_page(Query(EditPageQuery { id: None }))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn edit_page_with_invalid_id_redirects_home() {
    let response = edit_page(Query(EditPageQuery {
        id: Some("../etc/passwd".to_string()),
    }))
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn edit_page_with_valid_id_renders_form() {
    let response = edit_page(Query(EditPageQuery {
        id: Some("042".to_string()),
    }))
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_paths_redirect_home() {
    let response = fallback_redirect().await.into_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
}
