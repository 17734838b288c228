use actix_web::web::{self, Data, FormConfig, JsonConfig, PathConfig, QueryConfig, ServiceConfig};
use actix_web::{App, HttpServer, ResponseError};
use tracing::info;

pub mod campaign;
pub mod config;
pub mod database;
mod entities;
pub mod employee;
pub mod error;
pub mod event;
pub mod launch;
pub mod metrics;
pub mod typedid;

pub use config::Config;
pub use error::Error;

use crate::database::{Database, SeaOrmDatabase};
use crate::launch::deliver::{DryRunMailSender, HttpMailSender};
use crate::launch::generate::{OpenAiLureGenerator, UnconfiguredLureGenerator};
use crate::launch::{LaunchContext, LureGenerator, MailSender};

pub fn routes(cfg: &mut ServiceConfig) {
    cfg.service(campaign::endpoints::create_campaign)
        .service(campaign::endpoints::get_campaigns)
        .service(campaign::endpoints::get_campaign_by_id)
        .service(campaign::endpoints::update_campaign_status)
        .service(employee::endpoints::create_employee)
        .service(employee::endpoints::get_employees)
        .service(event::endpoints::track_open)
        .service(event::endpoints::track_click)
        .service(event::endpoints::track_submitted)
        .service(event::endpoints::track_reported)
        .service(event::endpoints::track_downloaded)
        .service(event::endpoints::get_events)
        .service(metrics::endpoints::get_metrics)
        .service(metrics::endpoints::get_metrics_for_campaign)
        .service(launch::endpoints::launch_campaign);
}

/// Extractor error handlers, shared by the server and the test harness so
/// malformed payloads produce the same error envelope everywhere.
pub fn extractor_config(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| Error::InvalidJson(err).into()))
        .app_data(PathConfig::default().error_handler(|err, _req| Error::InvalidPath(err).into()))
        .app_data(FormConfig::default().error_handler(|err, _req| Error::InvalidForm(err).into()))
        .app_data(
            QueryConfig::default().error_handler(|err, _req| Error::InvalidQuery(err).into()),
        );
}

pub async fn run(config: Config) -> Result<(), Error> {
    info!("connecting to db: {}", config.database_url);
    let db = SeaOrmDatabase::connect(&config.database_url).await?;

    let generator: Box<dyn LureGenerator> = match &config.openai_api_key {
        Some(api_key) => Box::new(OpenAiLureGenerator::new(
            api_key.clone(),
            config.model.clone(),
        )),
        None => {
            info!("no generation model configured, launches will be rejected");
            Box::new(UnconfiguredLureGenerator)
        }
    };

    let mailer: Box<dyn MailSender> = match &config.mail_api_url {
        Some(api_url) => Box::new(HttpMailSender::new(
            api_url.clone(),
            config.mail_api_token.clone(),
        )),
        None => {
            info!("no mail API configured, deliveries will be logged only");
            Box::new(DryRunMailSender)
        }
    };

    let launch_context = Data::new(LaunchContext {
        generator,
        mailer,
        base_url: config.base_url.clone(),
        send_delay: config.send_delay,
    });

    let bind_addr = config.bind_addr.clone();
    info!("listening on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .configure(extractor_config)
            .app_data(Data::new(Box::new(db.clone()) as Box<dyn Database>))
            .app_data(launch_context.clone())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(routes)
            .default_service(web::to(|| async { Error::PathNotFound.error_response() }))
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
