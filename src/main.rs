#[macro_use]
extern crate rocket;

use log::info;
use rocket::fairing::AdHoc;
use std::env;

use snake_planner::bot::Bot;
use snake_planner::config::Config;

mod handler;

#[launch]
fn rocket() -> _ {
    // Lots of web hosting services expect you to bind to the port specified by the `PORT`
    // environment variable. However, Rocket looks at the `ROCKET_PORT` environment variable.
    // If we find a value for `PORT`, we set `ROCKET_PORT` to that value.
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead. `BATTLESNAKE_LOG_LEVEL` is accepted as an alias.
    if env::var("RUST_LOG").is_err() {
        let level = env::var("BATTLESNAKE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        env::set_var("RUST_LOG", level.to_lowercase());
    }

    env_logger::init();

    info!("Starting Battlesnake Server...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    let bot = Bot::new(config);

    rocket::build()
        .manage(bot)
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "battlesnake/github/snake-planner");
            })
        }))
        .mount(
            "/",
            routes![
                handler::index,
                handler::ping,
                handler::start,
                handler::get_move,
                handler::end
            ],
        )
}
