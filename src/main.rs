#[actix_web::main]
async fn main() -> std::io::Result<()> {
    procuracao_server::run().await
}
