use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use havenstay_api::db;
use havenstay_api::middleware;
use havenstay_api::models::account::UserRole;
use havenstay_api::routes;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/health", web::get().to(|| async { "OK" }))
            .app_data(web::Data::new(client.clone()))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(routes::health::health_check))
                    // Public routes
                    .service(
                        web::scope("/auth")
                            .route("/signup", web::post().to(routes::account::signup))
                            .route("/signin", web::post().to(routes::account::signin))
                            .service(
                                web::scope("").wrap(middleware::auth::AuthMiddleware).route(
                                    "/session",
                                    web::get().to(routes::account::user_session),
                                ),
                            ),
                    )
                    .service(
                        web::scope("/properties")
                            .route("", web::get().to(routes::property::get_properties))
                            .route(
                                "/{id}/rooms",
                                web::get().to(routes::room::get_property_rooms),
                            )
                            .route("/{id}", web::get().to(routes::property::get_by_id))
                            // Tenant routes
                            .service(
                                web::scope("")
                                    .wrap(middleware::role_auth::RequireRole::new(UserRole::Tenant))
                                    .wrap(middleware::auth::AuthMiddleware)
                                    .route("", web::post().to(routes::property::create_property))
                                    .route(
                                        "/{id}",
                                        web::put().to(routes::property::update_property),
                                    )
                                    .route(
                                        "/{id}",
                                        web::delete().to(routes::property::delete_property),
                                    ),
                            ),
                    )
                    .service(
                        web::scope("/rooms")
                            .route(
                                "/{id}/peak-season-rates",
                                web::get().to(routes::peak_season_rate::get_room_rates),
                            )
                            .route("/{id}", web::get().to(routes::room::get_by_id))
                            .service(
                                web::scope("")
                                    .wrap(middleware::role_auth::RequireRole::new(UserRole::Tenant))
                                    .wrap(middleware::auth::AuthMiddleware)
                                    .route("", web::post().to(routes::room::create_room))
                                    .route("/{id}", web::put().to(routes::room::update_room))
                                    .route("/{id}", web::delete().to(routes::room::delete_room)),
                            ),
                    )
                    .service(
                        web::scope("/peak-season-rates")
                            .wrap(middleware::role_auth::RequireRole::new(UserRole::Tenant))
                            .wrap(middleware::auth::AuthMiddleware)
                            .route("", web::post().to(routes::peak_season_rate::create_rate))
                            .route(
                                "/{id}",
                                web::put().to(routes::peak_season_rate::update_rate),
                            )
                            .route(
                                "/{id}",
                                web::delete().to(routes::peak_season_rate::delete_rate),
                            ),
                    )
                    .service(
                        web::scope("/transactions")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route("/quote", web::post().to(routes::transaction::quote))
                            .route("", web::post().to(routes::transaction::create_transaction))
                            .route(
                                "",
                                web::get().to(routes::transaction::get_my_transactions),
                            )
                            .route(
                                "/{id}/status",
                                web::put().to(routes::transaction::update_status),
                            )
                            .route("/{id}", web::get().to(routes::transaction::get_by_id)),
                    )
                    .service(
                        web::scope("/tenant")
                            .wrap(middleware::role_auth::RequireRole::new(UserRole::Tenant))
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(
                                "/transactions",
                                web::get().to(routes::transaction::get_tenant_transactions),
                            )
                            .route(
                                "/reports/overview",
                                web::get().to(routes::report::overview),
                            )
                            .route("/reports/monthly", web::get().to(routes::report::monthly)),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
