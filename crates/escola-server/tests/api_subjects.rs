mod common;

use axum::http::StatusCode;
use common::{send, setup_app};
use escola_db::get_subject;
use serde_json::json;

#[tokio::test]
async fn test_subject_crud_cycle() {
    let (app, gateway) = setup_app();

    let (status, body) = send(
        &app,
        "POST",
        "/disciplina",
        Some(json!({"nome": "Matemática", "aulas": 60})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/disciplina/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": id, "nome": "Matemática", "aulas": 60}));

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/disciplina/{id}"),
        Some(json!({"nome": "Matemática I", "aulas": 64})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stored = get_subject(&gateway, id).unwrap().unwrap();
    assert_eq!(stored.nome, "Matemática I");
    assert_eq!(stored.aulas, 64);

    let (status, body) = send(&app, "DELETE", &format!("/disciplina/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows_affected"], 1);
    assert_eq!(get_subject(&gateway, id).unwrap(), None);
}

#[tokio::test]
async fn test_list_subjects_skips_deleted() {
    let (app, _gateway) = setup_app();

    let mut ids = Vec::new();
    for (nome, aulas) in [("Física", 40), ("Química", 40), ("Biologia", 30)] {
        let (_, body) = send(
            &app,
            "POST",
            "/disciplina",
            Some(json!({"nome": nome, "aulas": aulas})),
        )
        .await;
        ids.push(body["id"].as_i64().unwrap());
    }

    send(&app, "DELETE", &format!("/disciplina/{}", ids[1]), None).await;

    let (status, body) = send(&app, "GET", "/disciplina", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, vec![ids[0], ids[2]]);
}

#[tokio::test]
async fn test_missing_subject_routes_are_not_found() {
    let (app, _gateway) = setup_app();

    let (status, _) = send(&app, "GET", "/disciplina/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        "/disciplina/77",
        Some(json!({"nome": "Nada", "aulas": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/disciplina/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
