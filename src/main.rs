// src/main.rs

use anyhow::Context;
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG manda; sem ele, "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = build_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {}", config.bind_addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}

fn build_router(app_state: AppState) -> Router {
    let charge_routes = Router::new()
        .route("/",
               get(handlers::charges::list_charges)
               .post(handlers::charges::create_charge)
        )
        .route("/summary", get(handlers::charges::get_charge_summary))
        .route("/{id}",
               put(handlers::charges::update_charge)
               .delete(handlers::charges::delete_charge)
        );

    let billing_routes = Router::new()
        .route("/billing/preview", post(handlers::billing::preview_bill))
        .route("/orders/bill", post(handlers::billing::bill_order));

    let menu_routes = Router::new()
        .route("/categories",
               get(handlers::menu::list_categories)
               .post(handlers::menu::create_category)
        )
        .route("/categories/tree", get(handlers::menu::get_category_tree))
        .route("/categories/options", get(handlers::menu::get_category_options))
        .route("/categories/{id}", delete(handlers::menu::delete_category))
        .route("/items",
               get(handlers::menu::list_items)
               .post(handlers::menu::create_item)
        )
        .route("/statistics", get(handlers::menu::get_statistics));

    // Tudo abaixo de /api exige JWT, exceto o health check
    let protected = Router::new()
        .nest("/charges", charge_routes)
        .nest("/menu", menu_routes)
        .merge(billing_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{auth::Claims, rbac::Role};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "segredo-de-teste";

    // Pool preguiçoso: nenhuma destas rotas chega a tocar no banco
    fn test_app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/rasoi_test")
            .unwrap();
        build_router(AppState::with_pool(pool, SECRET.to_string()).unwrap())
    }

    fn bearer(role: Role) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            merchant_id: Uuid::new_v4(),
            role,
            iat: now as usize,
            exp: (now + 3600) as usize,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();
        format!("Bearer {}", token)
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_route_without_token_is_unauthorized() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/charges").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn staff_cannot_manage_charges() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/charges")
            .header(header::AUTHORIZATION, bearer(Role::Staff))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Gorjeta","kind":"OPTIONAL","calculationType":"FIXED","amount":10}"#))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn negative_bill_is_rejected_in_requested_language() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/billing/preview")
            .header(header::AUTHORIZATION, bearer(Role::Staff))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT_LANGUAGE, "pt-BR")
            .body(Body::from(r#"{"totalBill":-5}"#))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Um ou mais campos são inválidos.");
        assert!(body["details"].is_object());
    }

    #[tokio::test]
    async fn huge_amounts_get_bad_request_instead_of_crashing() {
        let bodies = [
            ("/api/billing/preview", r#"{"totalBill":1e28}"#),
            (
                "/api/orders/bill",
                r#"{"items":[{"name":"Chai","quantity":2147483647,"price":20}]}"#,
            ),
            (
                "/api/orders/bill",
                r#"{"items":[{"name":"Chai","quantity":1,"price":1e27}]}"#,
            ),
        ];

        for (uri, body) in bodies {
            let request = Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::AUTHORIZATION, bearer(Role::Staff))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap();

            let response = test_app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{} {}", uri, body);
        }
    }
}
