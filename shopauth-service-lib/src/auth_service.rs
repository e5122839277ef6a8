use axum::{
    http::{HeaderValue, Method},
    routing::post,
    Router,
};
use shopauth_adapters::http::{
    routes::{forgot_password, login, logout, reset_password, signup, verify_token},
    AppState,
};
use shopauth_core::{AccountStore, EmailClient, PasswordHasher, Role};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::telemetry::{make_span_with_request_id, on_request, on_response};

/// Main authentication service that provides all auth-related routes.
///
/// The shopper surface is mounted at the root and the administrator
/// surface under `/admin`; both run the same handler set against the
/// same store pair, differing only in the role baked into their state.
pub struct AuthService {
    router: Router,
}

impl AuthService {
    pub fn new<S, H, E>(state: AppState<S, H, E>) -> Self
    where
        S: AccountStore + Clone + 'static,
        H: PasswordHasher + Clone + 'static,
        E: EmailClient + Clone + 'static,
    {
        let user_routes = role_routes(state.with_role(Role::User));
        let admin_routes = role_routes(state.with_role(Role::Admin));

        let router = Router::new()
            .merge(user_routes)
            .nest("/admin", admin_routes);

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert into a router that can be served or nested elsewhere.
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub fn as_router(mut self, allowed_origins: Option<Vec<HeaderValue>>) -> Router {
        if let Some(origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::list(origins));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the auth service as a standalone server.
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<Vec<HeaderValue>>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_router(allowed_origins);

        tracing::info!("Auth service listening on {}", listener.local_addr()?);

        axum::serve(listener, router).await
    }
}

fn role_routes<S, H, E>(state: AppState<S, H, E>) -> Router
where
    S: AccountStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    Router::new()
        .route("/signup", post(signup::<S, H, E>))
        .route("/login", post(login::<S, H, E>))
        .route("/logout", post(logout::<S, H, E>))
        .route("/verify-token", post(verify_token::<S, H, E>))
        .route("/forgot-password", post(forgot_password::<S, H, E>))
        .route("/reset-password/{token}", post(reset_password::<S, H, E>))
        .with_state(state)
}
