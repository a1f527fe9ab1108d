use dotenv::dotenv;
use handlebars::Handlebars;
use log::*;

use std::sync::Arc;

mod admin;
mod api_models;
mod dao;
mod models;
mod routes;
mod settings;
mod templates;
mod visibility;

use crate::dao::{Dao, MemoryDao, PgDao};
use crate::settings::Settings;

/**
 * Struct for carrying application state into tide request handlers
 */
#[derive(Clone)]
pub struct AppState {
    pub dao: Arc<dyn Dao>,
    pub templates: Arc<Handlebars<'static>>,
}

/**
 * Connect to PostgreSQL when configured, otherwise fall back to keeping
 * everything in memory
 */
async fn create_dao(settings: &Settings) -> Result<Arc<dyn Dao>, sqlx::Error> {
    match &settings.database_url {
        Some(database_url) => {
            let dao = PgDao::connect(database_url, settings.pool_size).await?;
            dao.migrate().await?;
            Ok(Arc::new(dao))
        }
        None => {
            warn!("DATABASE_URL is not set, questions will only be kept in memory");
            Ok(Arc::new(MemoryDao::new()))
        }
    }
}

/**
 * Wire up every route against the given state
 */
pub fn build_app(state: AppState) -> tide::Server<AppState> {
    let mut app = tide::with_state(state);
    app.at("/").get(tide::Redirect::new("/polls"));
    app.at("/polls").get(routes::polls::index);
    app.at("/polls/:id").get(routes::polls::detail);
    app.at("/polls/:id/results").get(routes::polls::results);
    app.at("/polls/:id/vote").post(routes::polls::vote);

    app.at("/admin").get(routes::admin::registry);
    app.at("/admin/polls/questions")
        .get(routes::admin::change_list)
        .put(routes::admin::create);
    app.at("/admin/polls/questions/:id")
        .get(routes::admin::get)
        .delete(routes::admin::delete);
    app.at("/admin/polls/questions/:id/choices")
        .put(routes::admin::add_choice);
    app
}

#[async_std::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv().ok();
    pretty_env_logger::init();

    let settings = Settings::from_env();
    debug!(
        "Starting with listen address {} and a pool of {} connections",
        settings.listen_addr, settings.pool_size
    );

    let templates = match templates::registry() {
        Ok(templates) => templates,
        Err(err) => {
            error!("Could not compile templates! {:?}", err);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, err));
        }
    };

    match create_dao(&settings).await {
        Ok(dao) => {
            let state = AppState {
                dao,
                templates: Arc::new(templates),
            };
            let app = build_app(state);
            info!("Listening on {}", settings.listen_addr);
            app.listen(settings.listen_addr).await?;
            Ok(())
        }
        Err(err) => {
            error!("Could not initialize storage! {:?}", err);
            Err(std::io::Error::new(std::io::ErrorKind::Other, err))
        }
    }
}
