use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod ai;
pub mod docgen;
pub mod history;
pub mod procuracao;
pub mod state;

pub use crate::state::AppState;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

pub async fn run() -> std::io::Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::procuracao::handlers::upload_spreadsheet,
            crate::procuracao::handlers::list_parsed,
            crate::procuracao::handlers::select_record,
            crate::procuracao::handlers::get_selected,
            crate::procuracao::handlers::preview,
            crate::procuracao::handlers::generate_document,
            crate::procuracao::handlers::analyze_record,
            crate::procuracao::handlers::mailto,
            crate::procuracao::handlers::list_history
        ),
        components(
            schemas(
                procuracao::models::Procuracao,
                procuracao::handlers::UploadResponse,
                procuracao::handlers::SelectedResponse,
                procuracao::handlers::PreviewResponse,
                procuracao::handlers::AnalyzeResponse,
                procuracao::mailto::MailtoLink,
                docgen::validation::ValidationStatus,
                history::HistoryItem,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Procuração", description = "Spreadsheet intake, validation and document generation."),
            (name = "Histórico", description = "Generation history endpoints.")
        ),
        servers(
            (url = "http://127.0.0.1:8080", description = "Localhost server")
        )
    )]
    struct ApiDoc;

    let app_state = web::Data::new(AppState::from_env());

    let prometheus = PrometheusMetricsBuilder::new("procuracao_server")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");

    let bind_addr =
        std::env::var("PROCURACAO_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://127.0.0.1:8080")
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(web::scope("/api").configure(procuracao::handlers::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
