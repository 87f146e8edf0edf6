use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use wayfarer::config::{EnvironmentConfig, StorageBackend};
use wayfarer::database::seed::seed;
use wayfarer::models::NewBus;
use wayfarer::repositories::InMemoryStore;
use wayfarer::{create_app, AppState};

struct TestApp {
    router: Router,
    state: AppState,
    admin_token: String,
}

impl TestApp {
    async fn new() -> Self {
        let config = EnvironmentConfig {
            environment: "test".to_string(),
            storage_backend: StorageBackend::Memory,
            ..EnvironmentConfig::default()
        };
        let state = AppState::in_memory(InMemoryStore::new(), config);
        seed(&state).await.unwrap();

        let router = create_app(state.clone());
        let mut app = Self {
            router,
            state,
            admin_token: String::new(),
        };

        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/auth/signin",
                None,
                Some(json!({ "email": "admin@wayfarer.com", "password": "admin123" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_admin"], true);
        app.admin_token = body["data"]["token"].as_str().unwrap().to_string();
        app
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Registra un usuario y devuelve (user_id, token)
    async fn signup(&self, email: &str) -> (i64, String) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(json!({
                    "email": email,
                    "first_name": "Jane",
                    "last_name": "Rider",
                    "password": "secret-pass"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        (
            body["data"]["user_id"].as_i64().unwrap(),
            body["data"]["token"].as_str().unwrap().to_string(),
        )
    }

    async fn bus_with_capacity(&self, plate: &str, capacity: i32) -> i32 {
        self.state
            .buses
            .create(NewBus {
                number_plate: plate.to_string(),
                capacity,
                ..NewBus::sample()
            })
            .await
            .unwrap()
            .id
    }

    async fn create_trip(&self, bus_id: i32, origin: &str, destination: &str) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/trips",
                Some(&self.admin_token),
                Some(json!({
                    "bus_id": bus_id,
                    "origin": origin,
                    "destination": destination,
                    "trip_date": "2026-12-20",
                    "fare": 1500.5
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["data"]["status"], "active");
        body["data"]["trip_id"].as_i64().unwrap()
    }

    async fn book(&self, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, "/api/v1/bookings", Some(token), Some(body))
            .await
    }
}

#[tokio::test]
async fn test_welcome_and_unknown_route() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["message"], "Welcome to WayFarer API");
    assert_eq!(body["data"]["version"], "v1");

    let (status, body) = app.send(Method::GET, "/api/v1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "WayFarer API v1");

    let (status, body) = app.send(Method::GET, "/non-existent-route", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_signup_and_signin_rules() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({ "email": "x@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "All fields are required (email, first_name, last_name, password)"
    );

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({
                "email": "not-an-email",
                "first_name": "A",
                "last_name": "B",
                "password": "pw"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.signup("jane@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({
                "email": "jane@example.com",
                "first_name": "Jane",
                "last_name": "Again",
                "password": "other"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User with this email already exists");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/signin",
            None,
            Some(json!({ "email": "jane@example.com", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/signin",
            None,
            Some(json!({ "email": "jane@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email and password are required");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/signin",
            None,
            Some(json!({ "email": "jane@example.com", "password": "secret-pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_admin"], false);
}

#[tokio::test]
async fn test_bookings_require_valid_token() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/v1/bookings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided. Please sign in.");

    let (status, body) = app
        .send(Method::GET, "/api/v1/bookings", Some("not.a.token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token. Please sign in again.");
}

#[tokio::test]
async fn test_trip_administration() {
    let app = TestApp::new().await;
    let (_, token) = app.signup("rider@example.com").await;

    let trip_body = json!({
        "bus_id": 1,
        "origin": "Nairobi",
        "destination": "Mombasa",
        "trip_date": "2026-12-20",
        "fare": 1500
    });

    let (status, body) = app
        .send(Method::POST, "/api/v1/trips", Some(&token), Some(trip_body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied. Admin only.");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/trips",
            Some(&app.admin_token),
            Some(json!({ "bus_id": 1, "origin": "Nairobi" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "All fields are required (bus_id, origin, destination, trip_date, fare)"
    );

    let mut unknown_bus = trip_body.clone();
    unknown_bus["bus_id"] = json!(999);
    let (status, body) = app
        .send(Method::POST, "/api/v1/trips", Some(&app.admin_token), Some(unknown_bus))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Bus not found");

    let mombasa = app.create_trip(1, "Nairobi", "Mombasa").await;
    app.create_trip(1, "Nairobi", "Kisumu").await;

    let (status, body) = app
        .send(Method::GET, "/api/v1/trips?destination=mombasa", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let trips = body["data"].as_array().unwrap();
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0]["trip_id"], mombasa);

    let (status, _) = app
        .send(Method::PATCH, &format!("/api/v1/trips/{}", mombasa), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/api/v1/trips/{}", mombasa);
    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&app.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Trip cancelled successfully");

    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&app.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Trip is already cancelled");

    let (status, body) = app
        .send(Method::PATCH, "/api/v1/trips/4242", Some(&app.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Trip not found");
}

#[tokio::test]
async fn test_auto_assigned_seats_are_sequential() {
    let app = TestApp::new().await;
    let trip_id = app.create_trip(1, "Nairobi", "Nakuru").await;

    for (expected, email) in [(1, "a@example.com"), (2, "b@example.com"), (3, "c@example.com")] {
        let (user_id, token) = app.signup(email).await;
        let (status, body) = app.book(&token, json!({ "trip_id": trip_id })).await;

        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["data"]["seat_number"], expected);
        assert_eq!(body["data"]["user_id"], user_id);
        assert_eq!(body["data"]["trip_id"], trip_id);
        assert_eq!(body["data"]["bus_id"], 1);
        assert_eq!(body["data"]["trip_date"], "2026-12-20");
        assert_eq!(body["data"]["email"], email);
        assert_eq!(body["data"]["first_name"], "Jane");
    }
}

#[tokio::test]
async fn test_booking_validation_errors() {
    let app = TestApp::new().await;
    let trip_id = app.create_trip(1, "Nairobi", "Eldoret").await;
    let (_, token) = app.signup("rider@example.com").await;

    let (status, body) = app.book(&token, json!({ "seat_number": 3 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "trip_id is required");

    let (status, body) = app.book(&token, json!({ "trip_id": 9999 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Trip not found");

    let (status, body) = app
        .book(&token, json!({ "trip_id": trip_id, "seat_number": 37 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No seats available on this trip");

    let (status, _) = app
        .book(&token, json!({ "trip_id": trip_id, "seat_number": 12 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    for again in [json!({ "trip_id": trip_id }), json!({ "trip_id": trip_id, "seat_number": 13 })] {
        let (status, body) = app.book(&token, again).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "You have already booked this trip");
    }

    let (_, other) = app.signup("other@example.com").await;
    let (status, body) = app
        .book(&other, json!({ "trip_id": trip_id, "seat_number": 12 }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Seat 12 is already taken");
}

#[tokio::test]
async fn test_cancelled_trip_rejects_new_bookings() {
    let app = TestApp::new().await;
    let trip_id = app.create_trip(1, "Nairobi", "Malindi").await;
    let (_, early) = app.signup("early@example.com").await;
    let (_, late) = app.signup("late@example.com").await;

    let (status, _) = app.book(&early, json!({ "trip_id": trip_id })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/trips/{}", trip_id),
            Some(&app.admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.book(&late, json!({ "trip_id": trip_id })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Trip has been cancelled");

    // La reserva previa no se invalida
    let (status, body) = app.send(Method::GET, "/api/v1/bookings", Some(&early), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_booking_permissions() {
    let app = TestApp::new().await;
    let trip_id = app.create_trip(1, "Nairobi", "Naivasha").await;
    let (_, owner) = app.signup("owner@example.com").await;
    let (_, stranger) = app.signup("stranger@example.com").await;

    let (_, body) = app.book(&owner, json!({ "trip_id": trip_id })).await;
    let first = body["data"]["booking_id"].as_i64().unwrap();

    let uri = format!("/api/v1/bookings/{}", first);
    let (status, body) = app.send(Method::DELETE, &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You can only delete your own bookings");

    let (status, body) = app.send(Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Booking deleted successfully");

    let (status, body) = app.send(Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Booking not found");

    let (_, body) = app.book(&stranger, json!({ "trip_id": trip_id })).await;
    let second = body["data"]["booking_id"].as_i64().unwrap();
    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/v1/bookings/{}", second),
            Some(&app.admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_single_seat_is_reused_after_delete() {
    let app = TestApp::new().await;
    let bus_id = app.bus_with_capacity("KBZ 001X", 1).await;
    let trip_id = app.create_trip(bus_id, "Thika", "Nyeri").await;
    let (_, a) = app.signup("a@example.com").await;
    let (_, b) = app.signup("b@example.com").await;

    let (status, body) = app.book(&a, json!({ "trip_id": trip_id })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["seat_number"], 1);
    let booking_id = body["data"]["booking_id"].as_i64().unwrap();

    let (status, body) = app.book(&b, json!({ "trip_id": trip_id })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No seats available on this trip");

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/v1/bookings/{}", booking_id),
            Some(&a),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.book(&b, json!({ "trip_id": trip_id })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["seat_number"], 1);
}

#[tokio::test]
async fn test_booking_visibility() {
    let app = TestApp::new().await;
    let trip_id = app.create_trip(1, "Nairobi", "Kitale").await;
    let (_, owner) = app.signup("owner@example.com").await;
    let (_, other) = app.signup("other@example.com").await;

    let (_, body) = app.book(&owner, json!({ "trip_id": trip_id })).await;
    let booking_id = body["data"]["booking_id"].clone();

    let (status, body) = app.send(Method::GET, "/api/v1/bookings", Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    let mine = body["data"].as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["booking_id"], booking_id);
    assert_eq!(mine[0]["origin"], "Nairobi");
    assert_eq!(mine[0]["destination"], "Kitale");

    let (status, body) = app.send(Method::GET, "/api/v1/bookings", Some(&other), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    app.book(&other, json!({ "trip_id": trip_id })).await;
    let (_, body) = app
        .send(Method::GET, "/api/v1/bookings", Some(&app.admin_token), None)
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_for_the_same_seat() {
    let app = TestApp::new().await;
    let trip_id = app.create_trip(1, "Nairobi", "Garissa").await;

    let mut tokens = Vec::new();
    for i in 0..6 {
        tokens.push(app.signup(&format!("racer{}@example.com", i)).await.1);
    }

    let handles: Vec<_> = tokens
        .into_iter()
        .map(|token| {
            let router = app.router.clone();
            tokio::spawn(async move {
                let request = Request::builder()
                    .method(Method::POST)
                    .uri("/api/v1/bookings")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "trip_id": trip_id, "seat_number": 5 }).to_string(),
                    ))
                    .unwrap();
                let response = router.oneshot(request).await.unwrap();
                let status = response.status();
                let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
                (status, serde_json::from_slice::<Value>(&bytes).unwrap())
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        match status {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => assert_eq!(body["error"], "Seat 5 is already taken"),
            other => panic!("unexpected status {}: {}", other, body),
        }
    }
    assert_eq!(created, 1);

    let (_, body) = app
        .send(Method::GET, "/api/v1/bookings", Some(&app.admin_token), None)
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreadable_bodies_get_error_envelope() {
    let app = TestApp::new().await;
    let trip_id = app.create_trip(1, "Nairobi", "Voi").await;
    let (_, token) = app.signup("typo@example.com").await;

    let (status, body) = app
        .book(&token, json!({ "trip_id": trip_id.to_string() }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

    // Body JSON válido pero sin content-type
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/bookings")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(json!({ "trip_id": trip_id }).to_string()))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/signin",
            None,
            Some(json!({ "email": 42, "password": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/trips",
            Some(&app.admin_token),
            Some(json!({ "bus_id": "uno", "origin": "A", "destination": "B" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    // Nada quedó reservado
    let (_, body) = app.send(Method::GET, "/api/v1/bookings", Some(&token), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_zero_values_count_as_missing() {
    let app = TestApp::new().await;
    let trip_id = app.create_trip(1, "Nairobi", "Kericho").await;
    let (_, first) = app.signup("first@example.com").await;
    let (_, second) = app.signup("second@example.com").await;

    let (status, body) = app.book(&first, json!({ "trip_id": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "trip_id is required");

    let (status, body) = app
        .book(&first, json!({ "trip_id": trip_id, "seat_number": 0 }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["seat_number"], 1);

    let (status, body) = app
        .book(&second, json!({ "trip_id": trip_id, "seat_number": -2 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No seats available on this trip");
}
