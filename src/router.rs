use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use uuid::Uuid;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{AuthScope, ServerConfig};
use crate::database::models::Entity;
use crate::database::store::Relation;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::ResourceService;
use crate::state::AppState;

/// Builds the complete HTTP application.
pub fn app(state: AppState, server: &ServerConfig) -> Router {
    let router = routes(state)
        .layer(RequestBodyLimitLayer::new(server.max_request_size_bytes));

    let router = if server.enable_cors {
        router.layer(cors_layer(&server.cors_origins))
    } else {
        router
    };

    let router = if server.enable_request_logging {
        router.layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
    } else {
        router
    };

    // Outermost: every request gets an id before tracing sees it, and the id is
    // echoed on the response.
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(RandomRequestId))
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

/// Random v4 UUID for every request that arrives without an `x-request-id`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomRequestId;

impl MakeRequestId for RandomRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().hyphenated().to_string();
        id.parse().ok().map(RequestId::new)
    }
}

/// Route table without the global layers.
pub fn routes(state: AppState) -> Router {
    let protect_all = state.auth_scope == AuthScope::All;

    let login: Router = Router::new()
        .route("/login", post(public::login))
        .with_state(state.auth.clone());
    let health: Router = Router::new()
        .route("/health", get(public::health))
        .with_state(state.database.clone());
    let whoami: Router = Router::new().route("/auth/whoami", get(protected::whoami));

    Router::new()
        .merge(login)
        .merge(health)
        .merge(gate(&state, true, whoami))
        .merge(gate(&state, protect_all, resource_routes("/students", state.students.clone())))
        .merge(gate(&state, protect_all, resource_routes("/courses", state.courses.clone())))
        .merge(gate(&state, protect_all, resource_routes("/professors", state.professors.clone())))
        .merge(gate(&state, protect_all, resource_routes("/grades", state.grades.clone())))
        .merge(gate(&state, true, resource_routes("/enrollments", state.enrollments.clone())))
}

/// Puts every route already in `router` behind token verification.
fn gate(state: &AppState, protected: bool, router: Router) -> Router {
    if protected {
        router.route_layer(from_fn_with_state(state.auth.tokens.clone(), jwt_auth_middleware))
    } else {
        router
    }
}

/// Collection, item and relation routes for one entity under `base`.
pub fn resource_routes<T: Entity>(base: &str, service: ResourceService<T>) -> Router {
    use protected::resource;

    let mut router = Router::new()
        .route(base, get(resource::list::<T>).post(resource::create::<T>))
        .route(
            &format!("{}/:id", base),
            get(resource::show::<T>)
                .put(resource::update::<T>)
                .delete(resource::delete::<T>),
        );

    for relation in T::RELATIONS {
        let handler: MethodRouter<ResourceService<T>> = match relation {
            Relation::Student => get(resource::by_student::<T>),
            Relation::Course => get(resource::by_course::<T>),
            Relation::Professor => get(resource::by_professor::<T>),
        };
        router = router.route(&format!("{}/{}/:id", base, relation.path_segment()), handler);
    }

    router.with_state(service)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, StorageBackend};
    use crate::database::Database;
    use axum::body::Body;
    use axum::http::{header, Request as HttpRequest, StatusCode};
    use tower::ServiceExt;

    fn state(scope: AuthScope) -> AppState {
        let mut config = AppConfig::development();
        config.database.backend = StorageBackend::Memory;
        config.security.auth_scope = scope;
        AppState::from_config(&config, Database::Memory).unwrap()
    }

    fn get(uri: &str) -> HttpRequest<Body> {
        HttpRequest::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn enrollments_scope_gates_only_enrollments() {
        let app = routes(state(AuthScope::Enrollments));

        let res = app.clone().oneshot(get("/enrollments")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app.clone().oneshot(get("/enrollments/course/1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app.oneshot(get("/grades")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn all_scope_gates_every_resource() {
        let app = routes(state(AuthScope::All));

        for uri in ["/students", "/courses/1", "/professors", "/grades/professor/2"] {
            let res = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }

        let res = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn valid_token_passes_the_gate() {
        let state = state(AuthScope::All);
        let token = state.auth.tokens.issue_token("test").unwrap();
        let app = routes(state);

        let req = HttpRequest::builder()
            .uri("/students")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[test]
    fn request_ids_are_fresh_uuids() {
        let request = get("/students");
        let mut make = RandomRequestId;

        let first = make.make_request_id(&request).unwrap();
        let second = make.make_request_id(&request).unwrap();

        let first = first.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(first).is_ok());
        assert_ne!(first, second.header_value().to_str().unwrap());
    }

    #[tokio::test]
    async fn relation_routes_follow_entity_relations() {
        let app = routes(state(AuthScope::Enrollments));

        let res = app.clone().oneshot(get("/grades/professor/1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app.oneshot(get("/students/course/1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
