use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::{ChatChannel, UserRole};
use crate::repositories;
use crate::services::personas::Persona;
use crate::test_support;

const CS101_ANSWER: &str = "```json\n{\n  \"course_code\": \"cs101\",\n  \"course_name\": \"Introduction to Computer Science\",\n  \"description\": \"Algorithms, data and programs.\"\n}\n```";

#[tokio::test]
async fn ask_reconciles_course_info_by_code() {
    let ctx = test_support::setup_test_context().await;
    let user =
        test_support::insert_user(ctx.state.db(), "deniz", "deniz-pass", UserRole::Student).await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());

    ctx.generator.push(CS101_ANSWER);
    ctx.generator.push(
        r#"{"course_code": "CS101", "course_name": "Intro to CS", "description": ""}"#,
    );

    for question in ["What is CS101?", "Tell me the name of CS101 again"] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/dashboard/ask",
                Some(&token),
                Some(json!({ "question": question })),
            ))
            .await
            .expect("ask");
        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["course_info"]["course_code"], "CS101");
        assert_eq!(body["ai_message"]["course_info_id"], body["course_info"]["id"]);
    }

    let courses = repositories::course_infos::list_for_user(ctx.state.db(), &user.id)
        .await
        .expect("list courses");
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].course_name, "Intro to CS");
    assert_eq!(courses[0].description, "Algorithms, data and programs.");

    let requests = ctx.generator.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|request| request.persona == Persona::CourseLookup));
    assert!(requests[1].prompt.starts_with("User: What is CS101?\nAi: "));
    assert!(requests[1].prompt.ends_with("User: Tell me the name of CS101 again\nAI:"));
}

#[tokio::test]
async fn off_topic_answer_stores_chat_but_no_course() {
    let ctx = test_support::setup_test_context().await;
    let user =
        test_support::insert_user(ctx.state.db(), "ece", "ece-pass-1", UserRole::Student).await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());
    ctx.generator.push("```json\n{}\n```");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/dashboard/ask",
            Some(&token),
            Some(json!({"question": "How is the weather?"})),
        ))
        .await
        .expect("ask");
    let body = test_support::read_json(response).await;
    assert!(body["course_info"].is_null(), "response: {body}");

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/dashboard", Some(&token), None))
        .await
        .expect("dashboard");
    let body = test_support::read_json(response).await;
    assert_eq!(body["course_infos"], json!([]));
    assert_eq!(body["recent_messages"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["recent_messages"][0]["sender"], "user");
    assert_eq!(body["recent_messages"][1]["sender"], "ai");
}

#[tokio::test]
async fn over_long_course_code_is_answered_without_course() {
    let ctx = test_support::setup_test_context().await;
    let user =
        test_support::insert_user(ctx.state.db(), "arda", "arda-pass-1", UserRole::Student).await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());
    let answer = json!({
        "course_code": "X".repeat(80),
        "course_name": "Unbounded Studies",
        "description": "A code no catalogue would accept."
    });
    ctx.generator.push(&answer.to_string());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/dashboard/ask",
            Some(&token),
            Some(json!({"question": "Tell me about the long course"})),
        ))
        .await
        .expect("ask");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert!(body["course_info"].is_null(), "response: {body}");
    assert!(body["ai_message"]["course_info_id"].is_null());

    let infos = repositories::course_infos::list_for_user(ctx.state.db(), &user.id)
        .await
        .expect("list course infos");
    assert!(infos.is_empty());
}

#[tokio::test]
async fn failed_ai_call_returns_bad_gateway_and_stores_nothing() {
    let ctx = test_support::setup_test_context().await;
    let user =
        test_support::insert_user(ctx.state.db(), "kaan", "kaan-pass-1", UserRole::Student).await;
    let token = test_support::bearer_token(&user.id, ctx.state.settings());
    ctx.generator.push_error("upstream timeout");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/dashboard/ask",
            Some(&token),
            Some(json!({"question": "What is MATH201?"})),
        ))
        .await
        .expect("ask");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let history = repositories::chat_messages::list_recent(
        ctx.state.db(),
        &user.id,
        Some(ChatChannel::CourseLookup),
        10,
    )
    .await
    .expect("history");
    assert!(history.is_empty());
}
