//! HTTP handlers driving the procuração pipeline.
//!
//! Upload or manual selection feeds the single selected-record slot, the
//! validator reports completeness, and the generate endpoints stream the
//! rendered file back with a derived filename. Generation with an incomplete
//! record requires the explicit `force` override.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::mailto::{mailto_link, MailtoLink};
use super::models::Procuracao;
use super::spreadsheet::parse_spreadsheet;
use crate::docgen::{compose, render_abnt_docx, render_docx, render_pdf, validate, ValidationStatus};
use crate::history::HistoryItem;
use crate::state::{run_correction, AppState};
use crate::ErrorResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = "respostas_formulario.xlsx")]
    pub file_name: String,
    pub documentos: Vec<Procuracao>,
    pub validacao: ValidationStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SelectedResponse {
    pub record: Option<Procuracao>,
    pub correcting: bool,
    pub validacao: ValidationStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PreviewResponse {
    pub titulo: String,
    pub texto: String,
    pub fechamento: String,
    pub data_formatada: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub analise: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    pub force: Option<bool>,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Procuração",
    post,
    path = "/procuracoes/upload",
    responses(
        (status = 200, description = "Spreadsheet parsed; first record selected", body = UploadResponse),
        (status = 400, description = "Empty upload or unreadable spreadsheet", body = ErrorResponse)
    )
)]
pub async fn upload_spreadsheet(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> impl Responder {
    let mut field = match payload.next().await {
        Some(Ok(field)) => field,
        Some(Err(e)) => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::bad_request(&format!("Upload inválido: {e}")));
        }
        None => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::bad_request("Nenhum arquivo enviado."));
        }
    };

    let file_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(sanitize_filename::sanitize)
        .unwrap_or_else(|| "planilha.xlsx".to_string());

    let mut bytes: Vec<u8> = Vec::new();
    while let Some(chunk) = field.next().await {
        match chunk {
            Ok(data) => bytes.extend_from_slice(&data),
            Err(e) => {
                return HttpResponse::BadRequest()
                    .json(ErrorResponse::bad_request(&format!("Upload inválido: {e}")));
            }
        }
    }

    // Parse before touching any held state, so a bad upload leaves the
    // previous selection and history untouched.
    let documentos = match parse_spreadsheet(&bytes) {
        Ok(docs) => docs,
        Err(e) => {
            log::warn!("falha ao processar planilha {file_name}: {e}");
            return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string()));
        }
    };

    log::info!(
        "planilha {file_name} processada: {} documento(s)",
        documentos.len()
    );

    let first = documentos[0].clone();
    *data.parsed.write() = documentos.clone();
    let token = data.set_selected(Some(first.clone()));
    tokio::spawn(run_correction(
        data.clone().into_inner(),
        first.clone(),
        token,
    ));

    HttpResponse::Ok().json(UploadResponse {
        file_name,
        validacao: validate(Some(&first)),
        documentos,
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Procuração",
    get,
    path = "/procuracoes",
    responses(
        (status = 200, description = "Records parsed from the last upload", body = [Procuracao])
    )
)]
pub async fn list_parsed(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(data.parsed.read().clone())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Procuração",
    post,
    path = "/procuracoes/select",
    request_body = Procuracao,
    responses(
        (status = 200, description = "Record selected; correction running in background", body = SelectedResponse)
    )
)]
pub async fn select_record(
    req: web::Json<Procuracao>,
    data: web::Data<AppState>,
) -> impl Responder {
    let record = req.into_inner();
    let token = data.set_selected(Some(record.clone()));
    tokio::spawn(run_correction(
        data.clone().into_inner(),
        record.clone(),
        token,
    ));

    HttpResponse::Ok().json(SelectedResponse {
        validacao: validate(Some(&record)),
        correcting: true,
        record: Some(record),
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Procuração",
    get,
    path = "/procuracoes/selected",
    responses(
        (status = 200, description = "Effective record (corrected variant when available)", body = SelectedResponse)
    )
)]
pub async fn get_selected(data: web::Data<AppState>) -> impl Responder {
    let slot = data.selected.read();
    let record = slot.effective().cloned();
    HttpResponse::Ok().json(SelectedResponse {
        validacao: validate(record.as_ref()),
        correcting: slot.correcting,
        record,
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Procuração",
    get,
    path = "/procuracoes/preview",
    responses(
        (status = 200, description = "Composed deed text", body = PreviewResponse),
        (status = 404, description = "No record selected", body = ErrorResponse)
    )
)]
pub async fn preview(data: web::Data<AppState>) -> impl Responder {
    let record = data.selected.read().effective().cloned();
    let Some(record) = record else {
        return HttpResponse::NotFound()
            .json(ErrorResponse::not_found("Aguardando dados para validação."));
    };
    let composed = compose(&record);
    HttpResponse::Ok().json(PreviewResponse {
        titulo: composed.title.clone(),
        texto: composed.body_text(),
        fechamento: composed.closing.clone(),
        data_formatada: composed.formatted_date,
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Procuração",
    post,
    path = "/procuracoes/generate/{formato}",
    params(
        ("formato" = String, Path, description = "docx | docx-abnt | pdf"),
        ("force" = Option<bool>, Query, description = "Generate even with missing required fields")
    ),
    responses(
        (status = 200, description = "Rendered document bytes with attachment filename"),
        (status = 404, description = "Unknown format", body = ErrorResponse),
        (status = 409, description = "No record selected", body = ErrorResponse),
        (status = 422, description = "Missing required fields and not forced", body = ErrorResponse),
        (status = 500, description = "Renderer failed", body = ErrorResponse)
    )
)]
pub async fn generate_document(
    path: web::Path<String>,
    query: web::Query<GenerateQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let formato = path.into_inner();
    let record = data.selected.read().effective().cloned();
    let Some(record) = record else {
        return HttpResponse::Conflict()
            .json(ErrorResponse::new("NoSelection", "Aguardando dados para validação."));
    };

    let status = validate(Some(&record));
    if !status.valid && !query.force.unwrap_or(false) {
        return HttpResponse::UnprocessableEntity()
            .json(ErrorResponse::new("ValidationWarning", &status.message));
    }

    let rendered = match formato.as_str() {
        "docx" => render_docx(&record),
        "docx-abnt" => render_abnt_docx(&record),
        "pdf" => render_pdf(&record),
        _ => {
            return HttpResponse::NotFound().json(ErrorResponse::not_found(
                "Formato desconhecido. Use docx, docx-abnt ou pdf.",
            ));
        }
    };

    match rendered {
        Ok(doc) => {
            data.history
                .write()
                .record(HistoryItem::new(doc.filename.clone(), record));
            HttpResponse::Ok()
                .content_type(doc.mime)
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", doc.filename),
                ))
                .body(doc.bytes)
        }
        Err(e) => {
            log::error!("falha ao gerar {formato}: {e}");
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Procuração",
    post,
    path = "/procuracoes/analyze",
    responses(
        (status = 200, description = "Advisory review of the selected record", body = AnalyzeResponse),
        (status = 409, description = "No record selected", body = ErrorResponse)
    )
)]
pub async fn analyze_record(data: web::Data<AppState>) -> impl Responder {
    let record = data.selected.read().effective().cloned();
    let Some(record) = record else {
        return HttpResponse::Conflict()
            .json(ErrorResponse::new("NoSelection", "Aguardando dados para validação."));
    };

    let analise = match data.corrector.analyze(&record).await {
        Ok(text) => text,
        Err(e) => {
            log::warn!("análise com IA indisponível: {e}");
            format!("Erro ao contatar a API de IA: {e}")
        }
    };
    HttpResponse::Ok().json(AnalyzeResponse { analise })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Procuração",
    get,
    path = "/procuracoes/mailto",
    responses(
        (status = 200, description = "Prepared mailto link", body = MailtoLink),
        (status = 409, description = "No record selected", body = ErrorResponse)
    )
)]
pub async fn mailto(data: web::Data<AppState>) -> impl Responder {
    let record = data.selected.read().effective().cloned();
    let Some(record) = record else {
        return HttpResponse::Conflict()
            .json(ErrorResponse::new("NoSelection", "Aguardando dados para validação."));
    };
    HttpResponse::Ok().json(mailto_link(&record))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Histórico",
    get,
    path = "/history",
    responses(
        (status = 200, description = "Generation history, newest first", body = [HistoryItem])
    )
)]
pub async fn list_history(data: web::Data<AppState>) -> impl Responder {
    let history = data.history.read();
    HttpResponse::Ok().json(history.items().to_vec())
}

/// Register the procuração routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/procuracoes/upload").route(web::post().to(upload_spreadsheet)))
        .service(web::resource("/procuracoes").route(web::get().to(list_parsed)))
        .service(web::resource("/procuracoes/select").route(web::post().to(select_record)))
        .service(web::resource("/procuracoes/selected").route(web::get().to(get_selected)))
        .service(web::resource("/procuracoes/preview").route(web::get().to(preview)))
        .service(
            web::resource("/procuracoes/generate/{formato}")
                .route(web::post().to(generate_document)),
        )
        .service(web::resource("/procuracoes/analyze").route(web::post().to(analyze_record)))
        .service(web::resource("/procuracoes/mailto").route(web::get().to(mailto)))
        .service(web::resource("/history").route(web::get().to(list_history)));
}
