use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use chrono::Utc;
use log::info;

use vote_ledger::api::{self, AppState};
use vote_ledger::config::Config;
use vote_ledger::seed::seed_sample_elections;
use vote_ledger::service::VotingService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    let mut service = VotingService::in_memory();
    if config.seed_sample_elections {
        seed_sample_elections(&mut service, Utc::now())
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    }
    info!("genesis block {}", service.chain().latest().hash());

    let state = web::Data::new(AppState::new(service));

    info!("listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(api::configure)
    })
    .bind(config.bind_addr())?
    .run()
    .await
}
