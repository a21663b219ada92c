//! Handler-level tests over the actix service.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use rust_xlsxwriter::Workbook;

use procuracao_server::procuracao::handlers;
use procuracao_server::state::AppState;

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .service(web::scope("/api").configure(handlers::config)),
        )
        .await
    };
}

fn complete_record() -> serde_json::Value {
    serde_json::json!({
        "obra": "Edifício X",
        "procurador1_nome": "Maria Silva",
        "procurador1_cpf": "123.456.789-00",
        "conta_corrente": "1000-5",
        "data_solicitacao": "2024-01-10"
    })
}

#[actix_web::test]
async fn test_generate_without_selection_conflicts() {
    let state = web::Data::new(AppState::ephemeral());
    let app = test_app!(state);
    let req = test::TestRequest::post()
        .uri("/api/procuracoes/generate/docx")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_select_then_generate_docx() {
    let state = web::Data::new(AppState::ephemeral());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/procuracoes/select")
        .set_json(complete_record())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/procuracoes/generate/docx")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("procuracao_edificio_x_"));

    let body = test::read_body(resp).await;
    assert_eq!(&body[..4], b"PK\x03\x04");

    // A successful render lands in the history.
    assert_eq!(state.history.read().items().len(), 1);
}

#[actix_web::test]
async fn test_incomplete_record_requires_force() {
    let state = web::Data::new(AppState::ephemeral());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/procuracoes/select")
        .set_json(serde_json::json!({ "obra": "Edifício X" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/procuracoes/generate/docx")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    // Refused generation leaves no history entry behind.
    assert!(state.history.read().items().is_empty());

    let req = test::TestRequest::post()
        .uri("/api/procuracoes/generate/docx-abnt?force=true")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.history.read().items().len(), 1);
}

#[actix_web::test]
async fn test_unknown_format_is_not_found() {
    let state = web::Data::new(AppState::ephemeral());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/procuracoes/select")
        .set_json(complete_record())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/procuracoes/generate/odt")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_preview_reflects_selected_record() {
    let state = web::Data::new(AppState::ephemeral());
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/procuracoes/preview")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/procuracoes/select")
        .set_json(complete_record())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/procuracoes/preview")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["titulo"], "PROCURAÇÃO");
    assert_eq!(body["fechamento"], "Belo Horizonte, 10 de janeiro de 2024.");
    assert!(body["texto"].as_str().unwrap().contains("MARIA SILVA"));
}

#[actix_web::test]
async fn test_mailto_resolves_first_available_email() {
    let state = web::Data::new(AppState::ephemeral());
    let app = test_app!(state);

    let mut record = complete_record();
    record["procurador2_email"] = serde_json::json!("joao@example.com");
    let req = test::TestRequest::post()
        .uri("/api/procuracoes/select")
        .set_json(record)
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/procuracoes/mailto")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["recipient"], "joao@example.com");
    assert_eq!(body["subject"], "Procuração - Obra Edifício X");
}

#[actix_web::test]
async fn test_upload_parses_and_selects_first_row() {
    let state = web::Data::new(AppState::ephemeral());
    let app = test_app!(state);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 3, "Obra").unwrap();
    worksheet.write_string(1, 3, "Edifício Y").unwrap();
    worksheet.write_string(1, 4, "Ana Prado").unwrap();
    let xlsx = workbook.save_to_buffer().unwrap();

    let boundary = "----procuracao-test-boundary";
    let mut payload = Vec::new();
    payload.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"respostas.xlsx\"\r\nContent-Type: \
             application/vnd.openxmlformats-officedocument.spreadsheetml.sheet\r\n\r\n"
        )
        .as_bytes(),
    );
    payload.extend_from_slice(&xlsx);
    payload.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let req = test::TestRequest::post()
        .uri("/api/procuracoes/upload")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["file_name"], "respostas.xlsx");
    assert_eq!(body["documentos"].as_array().unwrap().len(), 1);
    assert_eq!(body["documentos"][0]["obra"], "Edifício Y");
    assert_eq!(body["validacao"]["valid"], false);

    // The parsed set stays available for re-selection.
    let req = test::TestRequest::get().uri("/api/procuracoes").to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_failed_upload_keeps_previous_selection() {
    let state = web::Data::new(AppState::ephemeral());
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/procuracoes/select")
        .set_json(complete_record())
        .to_request();
    test::call_service(&app, req).await;

    let boundary = "----procuracao-test-boundary";
    let mut payload = Vec::new();
    payload.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"quebrada.xlsx\"\r\n\r\n"
        )
        .as_bytes(),
    );
    payload.extend_from_slice(b"this is not a spreadsheet");
    payload.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let req = test::TestRequest::post()
        .uri("/api/procuracoes/upload")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The previous selection survives the failed upload.
    let req = test::TestRequest::get()
        .uri("/api/procuracoes/selected")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["record"]["obra"], "Edifício X");
}
