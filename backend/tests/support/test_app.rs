//! In-memory application harness shared by the HTTP integration suites.
//!
//! Every request builds a fresh service from the same [`AppDependencies`], so
//! accounts and lists persist across calls and session cookies stay valid.

use std::sync::Arc;

use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::http::Method;
use actix_web::{rt::System, test as actix_test, web};
use lister::domain::TRACE_ID_HEADER;
use lister::inbound::http::health::HealthState;
use lister::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use lister::outbound::security::Argon2PasswordHasher;
use lister::server::{AppDependencies, build_app, in_memory_state};
use serde_json::{Value, json};

/// Outcome of a single request.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
    pub cookie: Option<Cookie<'static>>,
    pub trace_id: Option<String>,
}

/// Request description accepted by [`TestApp::send`].
pub struct Call<'a> {
    pub method: Method,
    pub path: &'a str,
    pub payload: Option<Value>,
    pub cookie: Option<&'a Cookie<'static>>,
}

impl<'a> Call<'a> {
    pub fn new(method: Method, path: &'a str) -> Self {
        Self {
            method,
            path,
            payload: None,
            cookie: None,
        }
    }

    pub fn json(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn cookie(mut self, cookie: Option<&'a Cookie<'static>>) -> Self {
        self.cookie = cookie;
        self
    }
}

#[derive(Clone)]
pub struct TestApp {
    deps: AppDependencies,
}

impl TestApp {
    pub fn new() -> Self {
        let hasher =
            Argon2PasswordHasher::with_params(8 * 1024, 1, 1).expect("argon2 test parameters");
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        Self {
            deps: AppDependencies {
                health_state,
                http_state: web::Data::new(in_memory_state(Arc::new(hasher))),
                session: SessionSettings {
                    key: Key::generate(),
                    cookie_secure: false,
                    same_site: SameSite::Strict,
                },
            },
        }
    }

    pub async fn send(&self, call: Call<'_>) -> Reply {
        let app = actix_test::init_service(build_app(self.deps.clone())).await;
        let mut req = actix_test::TestRequest::default()
            .method(call.method)
            .uri(call.path);
        if let Some(payload) = call.payload {
            req = req.set_json(payload);
        }
        if let Some(cookie) = call.cookie {
            req = req.cookie(cookie.clone());
        }

        let res = actix_test::call_service(&app, req.to_request()).await;
        let status = res.status().as_u16();
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
            .map(|cookie| cookie.into_owned());
        let trace_id = res
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = actix_test::read_body(res).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        Reply {
            status,
            body,
            cookie,
            trace_id,
        }
    }

    /// Run [`TestApp::send`] on a throwaway actix system.
    pub fn send_blocking(&self, call: Call<'_>) -> Reply {
        System::new().block_on(self.send(call))
    }

    /// Register `first Tester` as `first@example.com` and return the cookie.
    pub async fn sign_up(&self, first: &str) -> Cookie<'static> {
        let email = format!("{first}@example.com");
        let reply = self
            .send(Call::new(Method::POST, "/api/user/register").json(json!({
                "firstName": first,
                "lastName": "Tester",
                "email": email,
                "password": "long-enough",
                "passwordVerify": "long-enough",
            })))
            .await;
        assert_eq!(reply.status, 200, "register {first}: {}", reply.body);
        reply.cookie.expect("session cookie")
    }

    /// Create a draft and publish it, returning the list id.
    pub async fn publish(&self, cookie: &Cookie<'static>, name: &str, items: &[&str]) -> Reply {
        let created = self
            .send(Call::new(Method::POST, "/api/top5list").cookie(Some(cookie)))
            .await;
        assert_eq!(created.status, 201, "create draft: {}", created.body);
        let id = created.body["top5List"]["_id"]
            .as_str()
            .expect("list id")
            .to_owned();
        self.send(
            Call::new(Method::PUT, &format!("/api/top5list/publish/{id}"))
                .json(json!({ "name": name, "items": items }))
                .cookie(Some(cookie)),
        )
        .await
    }

    /// Community list named `name`, if any.
    pub async fn community(&self, name: &str) -> Option<Value> {
        let reply = self
            .send(Call::new(Method::GET, "/api/top5list/community"))
            .await;
        assert_eq!(reply.status, 200);
        reply.body["idNamePairs"]
            .as_array()
            .expect("community pairs")
            .iter()
            .find(|list| list["name"] == name)
            .cloned()
    }
}
