//! CORS policy for a single credentialed origin.

use actix_cors::Cors;
use actix_web::http::{Method, Uri, header};

const MAX_AGE_SECONDS: usize = 3600;

/// Check that `origin` parses as an absolute URI before any worker starts.
pub fn validate_origin(origin: &str) -> Result<(), String> {
    match origin.parse::<Uri>() {
        Ok(uri) if uri.scheme().is_some() && uri.host().is_some() => Ok(()),
        _ => Err(format!("CORS_ALLOWED_ORIGIN is not a valid origin: {origin}")),
    }
}

/// Build the CORS middleware allowing `origin` with credentials.
///
/// Preflights from any other origin are rejected with 400.
pub fn cors_policy(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .supports_credentials()
        .allowed_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(MAX_AGE_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    const ORIGIN: &str = "http://localhost:3000";

    #[actix_web::test]
    async fn test_preflight_from_allowed_origin() {
        let app = test::init_service(
            App::new()
                .wrap(cors_policy(ORIGIN))
                .route("/posts", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::with_uri("/posts")
            .method(Method::OPTIONS)
            .insert_header((header::ORIGIN, ORIGIN))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PUT"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert!(res.status().is_success());
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            ORIGIN
        );
        assert_eq!(
            res.headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }

    #[actix_web::test]
    async fn test_regular_response_carries_credentials_header() {
        let app = test::init_service(
            App::new()
                .wrap(cors_policy(ORIGIN))
                .route("/posts", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/posts")
            .insert_header((header::ORIGIN, ORIGIN))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert!(res.status().is_success());
        assert_eq!(
            res.headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
        let vary = res.headers().get(header::VARY).unwrap().to_str().unwrap();
        assert!(vary.contains("Origin"));
    }

    #[actix_web::test]
    async fn test_preflight_from_foreign_origin_is_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(cors_policy(ORIGIN))
                .route("/posts", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::with_uri("/posts")
            .method(Method::OPTIONS)
            .insert_header((header::ORIGIN, "http://evil.test"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
            .to_request();
        let status = match test::try_call_service(&app, req).await {
            Ok(res) => res.status(),
            Err(err) => err.as_response_error().status_code(),
        };

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[::core::prelude::v1::test]
    fn test_validate_origin() {
        assert!(validate_origin(ORIGIN).is_ok());
        assert!(validate_origin("https://blog.example.com").is_ok());
        assert!(validate_origin("not an origin").is_err());
        assert!(validate_origin("").is_err());
    }
}
