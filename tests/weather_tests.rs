//! Weather endpoint integration tests.

use actix_web::{http::StatusCode, test};
use async_trait::async_trait;
use city_weather_api::{
    AppState, ProviderError, Settings, WeatherProvider, WeatherResult, create_app,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

/// Provider stub that records every call and replays a canned answer
struct StubProvider {
    calls: AtomicUsize,
    cities: Mutex<Vec<String>>,
    answer: fn(&str) -> Result<WeatherResult, ProviderError>,
}

impl StubProvider {
    fn new(answer: fn(&str) -> Result<WeatherResult, ProviderError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            cities: Mutex::new(Vec::new()),
            answer,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn fetch(&self, city: &str) -> Result<WeatherResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.cities.lock().unwrap().push(city.to_string());
        (self.answer)(city)
    }
}

fn london(_city: &str) -> Result<WeatherResult, ProviderError> {
    Ok(WeatherResult::new("London, UK", 18, "Cloudy"))
}

fn state_with(provider: Arc<StubProvider>) -> AppState {
    AppState::with_provider(&Settings::default(), provider).expect("Failed to build app state")
}

async fn read_json(resp: actix_web::dev::ServiceResponse) -> serde_json::Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("Failed to parse response as JSON")
}

#[actix_web::test]
async fn test_weather_success_body() {
    let provider = StubProvider::new(london);
    let app = test::init_service(create_app(state_with(provider.clone()))).await;

    let req = test::TestRequest::get().uri("/weather/london").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("x-cache").unwrap(), "MISS");
    assert_eq!(
        read_json(resp).await,
        serde_json::json!({
            "city": "London, UK",
            "temperatureC": 18,
            "temperatureF": 64,
            "summary": "Cloudy"
        })
    );
    assert_eq!(*provider.cities.lock().unwrap(), vec!["london".to_string()]);
}

#[actix_web::test]
async fn test_second_request_is_a_cache_hit() {
    let provider = StubProvider::new(london);
    let app = test::init_service(create_app(state_with(provider.clone()))).await;

    let first = test::call_service(
        &app,
        test::TestRequest::get().uri("/weather/London").to_request(),
    )
    .await;
    assert_eq!(first.headers().get("x-cache").unwrap(), "MISS");
    let first_body = read_json(first).await;

    let second = test::call_service(
        &app,
        test::TestRequest::get().uri("/weather/%20LONDON%20").to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.headers().get("x-cache").unwrap(), "HIT");
    assert_eq!(read_json(second).await, first_body);

    assert_eq!(provider.calls(), 1, "cache hit must not call the provider");
}

#[actix_web::test]
async fn test_path_is_url_decoded() {
    fn echo(city: &str) -> Result<WeatherResult, ProviderError> {
        Ok(WeatherResult::new(city, 25, "Sunny"))
    }

    let provider = StubProvider::new(echo);
    let app = test::init_service(create_app(state_with(provider.clone()))).await;

    let req = test::TestRequest::get()
        .uri("/weather/S%C3%A3o%20Paulo")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let json = read_json(resp).await;
    assert_eq!(json["city"], "São Paulo");
    assert_eq!(*provider.cities.lock().unwrap(), vec!["São Paulo".to_string()]);
}

#[actix_web::test]
async fn test_blank_city_is_bad_request() {
    let provider = StubProvider::new(london);
    let app = test::init_service(create_app(state_with(provider.clone()))).await;

    for uri in ["/weather/%20%20%20", "/weather/", "/weather"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
        let json = read_json(resp).await;
        assert_eq!(json["error"], "Invalid Input");
        assert!(json["message"].is_string());
    }

    assert_eq!(provider.calls(), 0);
}

#[actix_web::test]
async fn test_no_data_is_not_found() {
    let provider = StubProvider::new(|_| Err(ProviderError::NoData));
    let app = test::init_service(create_app(state_with(provider))).await;

    let req = test::TestRequest::get().uri("/weather/Atlantis").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = read_json(resp).await;
    assert_eq!(json["error"], "NotFound");
    assert_eq!(json["message"], "No weather data found for 'Atlantis'.");
}

#[actix_web::test]
async fn test_upstream_status_is_bad_gateway() {
    let provider = StubProvider::new(|_| Err(ProviderError::BadStatus(500)));
    let app = test::init_service(create_app(state_with(provider.clone()))).await;

    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/weather/Berlin").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let json = read_json(resp).await;
        assert_eq!(json["error"], "UpstreamWeatherError");
        assert!(!json["message"].as_str().unwrap().contains("500"));
    }

    // Failures are never cached
    assert_eq!(provider.calls(), 2);
}

#[actix_web::test]
async fn test_misconfigured_provider_is_bad_gateway() {
    let provider = StubProvider::new(|_| {
        Err(ProviderError::Misconfigured(
            "base URL and API key are required".to_string(),
        ))
    });
    let app = test::init_service(create_app(state_with(provider))).await;

    let req = test::TestRequest::get().uri("/weather/Paris").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = test::read_body(resp).await;
    let body_str = std::str::from_utf8(&body).unwrap();
    assert!(!body_str.contains("API key"), "internal detail leaked: {body_str}");
}

#[actix_web::test]
async fn test_weather_is_rate_limited() {
    let mut settings = Settings::default();
    settings.rate_limit.requests = 2;
    let provider = StubProvider::new(london);
    let state = AppState::with_provider(&settings, provider.clone()).unwrap();
    let app = test::init_service(create_app(state)).await;

    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/weather/london").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/weather/london").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = resp
        .headers()
        .get("retry-after")
        .expect("Retry-After header should be present")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));

    let json = read_json(resp).await;
    assert_eq!(json["error"], "TooManyRequests");
    assert_eq!(json["message"], "Rate limit exceeded. Try again later.");

    // The rejected request never reached the service
    assert_eq!(provider.calls(), 1);
}

#[actix_web::test]
async fn test_state_is_shared_between_app_instances() {
    // Each actix worker builds its own App from a clone of the same state
    let provider = StubProvider::new(london);
    let state = state_with(provider.clone());
    let worker_a = test::init_service(create_app(state.clone())).await;
    let worker_b = test::init_service(create_app(state.clone())).await;

    let resp = test::call_service(
        &worker_a,
        test::TestRequest::get().uri("/weather/london").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &worker_b,
        test::TestRequest::get().uri("/weather/london").to_request(),
    )
    .await;
    assert_eq!(resp.headers().get("x-cache").unwrap(), "HIT");
    assert_eq!(provider.calls(), 1);
    assert_eq!(state.cache().len(), 1);
}
