use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, Responder};
use tokio::time::{sleep, Duration};

pub struct TestApp;

impl TestApp {
    pub async fn new() -> Self {
        Self
    }

    /// Mirrors the real route table with mock handlers so route shapes and
    /// guard behavior can be asserted without a database.
    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .route("/", web::get().to(|| async { "Havenstay API is running" }))
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health_check))
                    .service(
                        web::scope("/auth")
                            .route("/signup", web::post().to(signup))
                            .route("/signin", web::post().to(signin))
                            .route("/session", web::get().to(unauthorized_handler)),
                    )
                    .service(
                        web::scope("/properties")
                            .route("", web::get().to(list_properties))
                            .route("", web::post().to(unauthorized_handler))
                            .route("/{id}/rooms", web::get().to(empty_list))
                            .route("/{id}", web::get().to(not_found))
                            .route("/{id}", web::put().to(unauthorized_handler))
                            .route("/{id}", web::delete().to(unauthorized_handler)),
                    )
                    .service(
                        web::scope("/rooms")
                            .route("", web::post().to(unauthorized_handler))
                            .route("/{id}/peak-season-rates", web::get().to(empty_list))
                            .route("/{id}", web::get().to(not_found))
                            .route("/{id}", web::put().to(unauthorized_handler))
                            .route("/{id}", web::delete().to(unauthorized_handler)),
                    )
                    .service(
                        web::scope("/peak-season-rates")
                            .route("", web::post().to(unauthorized_handler))
                            .route("/{id}", web::put().to(unauthorized_handler))
                            .route("/{id}", web::delete().to(unauthorized_handler)),
                    )
                    .service(
                        web::scope("/transactions")
                            .route("/quote", web::post().to(unauthorized_handler))
                            .route("", web::post().to(unauthorized_handler))
                            .route("", web::get().to(unauthorized_handler))
                            .route("/{id}/status", web::put().to(unauthorized_handler))
                            .route("/{id}", web::get().to(unauthorized_handler)),
                    )
                    .service(
                        web::scope("/tenant")
                            .route("/transactions", web::get().to(unauthorized_handler))
                            .route("/reports/overview", web::get().to(unauthorized_handler))
                            .route("/reports/monthly", web::get().to(unauthorized_handler)),
                    ),
            )
    }
}

// Mock handler functions for testing
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}

async fn list_properties() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "data": [],
        "meta": { "page": 1, "take": 10, "total": 0 }
    }))
}

async fn empty_list() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!([]))
}

async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({"error": "Not found"}))
}

async fn signup() -> impl Responder {
    HttpResponse::BadRequest().json(serde_json::json!({"error": "Invalid input"}))
}

async fn signin() -> impl Responder {
    HttpResponse::Unauthorized().json(serde_json::json!({"error": "Invalid credentials"}))
}

async fn unauthorized_handler() -> impl Responder {
    HttpResponse::Unauthorized().json(serde_json::json!({"error": "Unauthorized"}))
}

pub fn get_test_user_id() -> String {
    "test_user_123".to_string()
}

pub fn get_test_email() -> String {
    "test@example.com".to_string()
}

pub async fn wait_for_server_ready(port: u16) {
    for _ in 0..30 {
        if let Ok(_) = reqwest::get(&format!("http://localhost:{}/health", port)).await {
            return;
        }
        sleep(Duration::from_millis(100)).await;
    }
    panic!("Server failed to start within timeout");
}
