//! Smoke and API checks
//!
//! Each check is a short request-then-assert sequence. Checks are
//! independent of each other and may run concurrently.

use std::fmt;

use clap::ValueEnum;
use serde_json::json;

use super::assertions::{check_assertions, Assertion, AssertionResult};
use super::data::{travel_date, unique_email};
use crate::client::{ApiBackend, ApiResponse};
use crate::config::{Credentials, HarnessConfig};
use crate::errors::TripmockError;
use crate::mock::RequestOptions;

/// Credentials used against the mock when none are configured
const MOCK_CUSTOMER_EMAIL: &str = "customer@example.com";
const MOCK_CUSTOMER_PASSWORD: &str = "Customer#2024";

/// Two years out keeps booking checks independent of the calendar
const FAR_FUTURE_DAYS: i64 = 730;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Project {
    Smoke,
    Api,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Project::Smoke => write!(f, "smoke"),
            Project::Api => write!(f, "api"),
        }
    }
}

/// Which projects to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ProjectFilter {
    Smoke,
    Api,
    #[default]
    All,
}

impl ProjectFilter {
    pub fn includes(&self, project: Project) -> bool {
        match self {
            ProjectFilter::All => true,
            ProjectFilter::Smoke => project == Project::Smoke,
            ProjectFilter::Api => project == Project::Api,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckId {
    Health,
    ToursListing,
    TourDetail,
    TourUnknown,
    UnregisteredPaths,
    SignUpNew,
    SignUpDuplicate,
    SignUpWeakPassword,
    SignInValid,
    SignInWrongPassword,
    BookingFuture,
    BookingPast,
    BookingMissingFields,
}

impl CheckId {
    pub const ALL: [CheckId; 13] = [
        CheckId::Health,
        CheckId::ToursListing,
        CheckId::TourDetail,
        CheckId::TourUnknown,
        CheckId::UnregisteredPaths,
        CheckId::SignUpNew,
        CheckId::SignUpDuplicate,
        CheckId::SignUpWeakPassword,
        CheckId::SignInValid,
        CheckId::SignInWrongPassword,
        CheckId::BookingFuture,
        CheckId::BookingPast,
        CheckId::BookingMissingFields,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CheckId::Health => "health is ok",
            CheckId::ToursListing => "available tours are listed",
            CheckId::TourDetail => "tour detail is returned",
            CheckId::TourUnknown => "unknown tour is 404",
            CheckId::UnregisteredPaths => "unregistered paths are 404",
            CheckId::SignUpNew => "sign-up creates an account",
            CheckId::SignUpDuplicate => "duplicate sign-up is rejected",
            CheckId::SignUpWeakPassword => "weak password sign-up is rejected",
            CheckId::SignInValid => "sign-in returns a session token",
            CheckId::SignInWrongPassword => "sign-in with wrong password fails",
            CheckId::BookingFuture => "future booking is created",
            CheckId::BookingPast => "past booking is rejected",
            CheckId::BookingMissingFields => "booking without fields is rejected",
        }
    }

    pub fn project(&self) -> Project {
        match self {
            CheckId::Health
            | CheckId::ToursListing
            | CheckId::TourDetail
            | CheckId::TourUnknown
            | CheckId::UnregisteredPaths => Project::Smoke,
            _ => Project::Api,
        }
    }

    pub fn selected(filter: ProjectFilter) -> Vec<CheckId> {
        Self::ALL.into_iter().filter(|id| filter.includes(id.project())).collect()
    }
}

/// What a check produced
#[derive(Debug, Clone)]
pub enum Verdict {
    Ran(Vec<AssertionResult>),
    Skipped(String),
}

/// Shared, read-only state for checks
#[derive(Debug, Clone)]
pub struct CheckContext {
    pub backend: ApiBackend,
    pub config: HarnessConfig,
}

impl CheckContext {
    pub fn new(backend: ApiBackend, config: HarnessConfig) -> Self {
        Self { backend, config }
    }

    pub fn from_config(config: HarnessConfig) -> Result<Self, TripmockError> {
        Ok(Self::new(ApiBackend::from_config(&config)?, config))
    }

    /// Configured customer, or a stand-in account when talking to the mock
    pub fn customer(&self) -> Credentials {
        if self.config.customer.is_complete() || !self.backend.is_mock() {
            self.config.customer.clone()
        } else {
            Credentials::new(MOCK_CUSTOMER_EMAIL, MOCK_CUSTOMER_PASSWORD)
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<ApiResponse, TripmockError> {
        let body = json!({
            "email": credentials.email,
            "password": credentials.password.as_str(),
        });
        self.backend.post("/auth/sign-in", RequestOptions::json(body)).await
    }
}

/// Run a single check
pub async fn run_check(id: CheckId, ctx: &CheckContext) -> Result<Verdict, TripmockError> {
    let backend = &ctx.backend;
    let none = RequestOptions::new;

    let results = match id {
        CheckId::Health => {
            let response = backend.get("/health", none()).await?;
            check_assertions(&[Assertion::status(&[200]), Assertion::equals("status", "ok")], &response)
        }
        CheckId::ToursListing => {
            let response = backend.get("/tours/available", none()).await?;
            check_assertions(
                &[
                    Assertion::status(&[200]),
                    Assertion::length("tours", 2),
                    Assertion::any_element("tours", "id", "T-0001"),
                    Assertion::any_element("tours", "id", "T-0002"),
                ],
                &response,
            )
        }
        CheckId::TourDetail => {
            let response = backend.get("/tours/T-0001", none()).await?;
            check_assertions(&[Assertion::status(&[200]), Assertion::equals("id", "T-0001")], &response)
        }
        CheckId::TourUnknown => {
            let response = backend.get("/tours/unknown-id", none()).await?;
            check_assertions(&[Assertion::status(&[404])], &response)
        }
        CheckId::UnregisteredPaths => {
            let get = backend.get("/unregistered/path", none()).await?;
            let post = backend.post("/unregistered/path", RequestOptions::json(json!({}))).await?;
            let mut results = check_assertions(&[Assertion::status(&[404])], &get);
            results.extend(check_assertions(&[Assertion::status(&[404])], &post));
            results
        }
        CheckId::SignUpNew => {
            let body = json!({
                "email": unique_email("qa-signup"),
                "password": "Str0ng!Passw0rd",
                "firstName": "Quinn",
                "lastName": "Tester",
            });
            let response = backend.post("/auth/sign-up", RequestOptions::json(body)).await?;
            check_assertions(&[Assertion::status(&[201]), Assertion::truthy("message")], &response)
        }
        CheckId::SignUpDuplicate => {
            // Against the mock the marker alone triggers 409; against the
            // real service the first call registers the address.
            let body = json!({
                "email": unique_email("exists"),
                "password": "Str0ng!Passw0rd",
                "firstName": "Quinn",
                "lastName": "Tester",
            });
            backend.post("/auth/sign-up", RequestOptions::json(body.clone())).await?;
            let response = backend.post("/auth/sign-up", RequestOptions::json(body)).await?;
            check_assertions(&[Assertion::status(&[409]), Assertion::truthy("message")], &response)
        }
        CheckId::SignUpWeakPassword => {
            if backend.is_mock() {
                return Ok(Verdict::Skipped("mock does not validate password strength".to_string()));
            }
            let body = json!({
                "email": unique_email("qa-weak"),
                "password": "123",
                "firstName": "Quinn",
                "lastName": "Tester",
            });
            let response = backend.post("/auth/sign-up", RequestOptions::json(body)).await?;
            check_assertions(&[Assertion::status(&[422])], &response)
        }
        CheckId::SignInValid => {
            let customer = ctx.customer();
            let response = ctx.sign_in(&customer).await?;
            let mut assertions = vec![
                Assertion::status(&[200]),
                Assertion::truthy("idToken"),
                Assertion::equals("role", "CUSTOMER"),
            ];
            if backend.is_mock() {
                assertions.push(Assertion::equals("idToken", "mock-id-token"));
                assertions.push(Assertion::equals("email", customer.email.as_str()));
            }
            check_assertions(&assertions, &response)
        }
        CheckId::SignInWrongPassword => {
            let customer = Credentials::new(&ctx.customer().email, "wrong-pass");
            let response = ctx.sign_in(&customer).await?;
            check_assertions(&[Assertion::status(&[400, 401])], &response)
        }
        CheckId::BookingFuture => {
            book(ctx, travel_date(FAR_FUTURE_DAYS), &[Assertion::status(&[201]), Assertion::truthy("bookingId")]).await?
        }
        CheckId::BookingPast => {
            book(
                ctx,
                travel_date(-365),
                &[
                    Assertion::status(&[400]),
                    Assertion::equals("message", "Travel date cannot be in the past"),
                ],
            )
            .await?
        }
        CheckId::BookingMissingFields => {
            let response = backend.post("/bookings", RequestOptions::json(json!({}))).await?;
            let mut assertions = vec![Assertion::status(&[400])];
            if backend.is_mock() {
                assertions.push(Assertion::equals("message", "Bad request"));
            }
            check_assertions(&assertions, &response)
        }
    };

    Ok(Verdict::Ran(results))
}

/// Sign in, then post a booking for `T-0001` with the session token
async fn book(
    ctx: &CheckContext,
    date: String,
    assertions: &[Assertion],
) -> Result<Vec<AssertionResult>, TripmockError> {
    let sign_in = ctx.sign_in(&ctx.customer()).await?;
    let token = match sign_in.body().get("idToken").and_then(|t| t.as_str()) {
        Some(token) if sign_in.status() == 200 => token.to_string(),
        _ => {
            return Ok(vec![AssertionResult::fail(
                "sign-in",
                &format!("Could not obtain a session token (status {})", sign_in.status()),
            )])
        }
    };

    let body = json!({ "tourId": "T-0001", "travelDate": date, "travelers": 2 });
    let response = ctx
        .backend
        .post("/bookings", RequestOptions::json(body).bearer(&token))
        .await?;
    Ok(check_assertions(assertions, &response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockResponder;

    fn mock_ctx() -> CheckContext {
        CheckContext::new(ApiBackend::Mock(MockResponder::new()), HarnessConfig::default())
    }

    #[test]
    fn test_selection() {
        assert_eq!(CheckId::selected(ProjectFilter::Smoke).len(), 5);
        assert_eq!(CheckId::selected(ProjectFilter::Api).len(), 8);
        assert_eq!(CheckId::selected(ProjectFilter::All).len(), CheckId::ALL.len());
    }

    #[test]
    fn test_mock_customer_fallback() {
        let ctx = mock_ctx();
        assert_eq!(ctx.customer().email, MOCK_CUSTOMER_EMAIL);

        let mut config = HarnessConfig::default();
        config.customer = Credentials::new("qa@example.com", "pw");
        let ctx = CheckContext::new(ApiBackend::Mock(MockResponder::new()), config);
        assert_eq!(ctx.customer().email, "qa@example.com");
    }

    #[tokio::test]
    async fn test_every_check_passes_against_mock() {
        let ctx = mock_ctx();
        for id in CheckId::ALL {
            match run_check(id, &ctx).await.unwrap() {
                Verdict::Ran(results) => {
                    assert!(results.iter().all(|r| r.passed), "{}: {:?}", id.name(), results)
                }
                Verdict::Skipped(_) => assert_eq!(id, CheckId::SignUpWeakPassword),
            }
        }
    }
}
