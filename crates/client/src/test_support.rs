//! In-process fake of the API used by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use trialsync_core::resource::{
    canonical_reason, Envelope, Method, ResourceId, Transport, TransportError, TransportRequest,
};

use crate::repository::IdGenerator;

enum Failure {
    Envelope { status: u16, message: String },
    Status(u16),
    Network(String),
}

/// Keeps collections of JSON items and answers like the real API.
///
/// Scripted failures are consumed one per request, before routing.
pub(crate) struct FakeBackend {
    prefix: String,
    collections: Mutex<HashMap<String, Vec<Value>>>,
    failures: Mutex<VecDeque<Failure>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::with_prefix("/api")
    }

    pub(crate) fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            collections: Mutex::new(HashMap::new()),
            failures: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) async fn seed(&self, resource: &str, item: Value) {
        self.collections
            .lock()
            .await
            .entry(resource.to_string())
            .or_default()
            .push(item);
    }

    pub(crate) async fn fail_with_envelope(&self, status: u16, message: &str, times: usize) {
        let mut failures = self.failures.lock().await;
        for _ in 0..times {
            failures.push_back(Failure::Envelope {
                status,
                message: message.to_string(),
            });
        }
    }

    pub(crate) async fn fail_with_status(&self, status: u16, times: usize) {
        let mut failures = self.failures.lock().await;
        for _ in 0..times {
            failures.push_back(Failure::Status(status));
        }
    }

    pub(crate) async fn fail_with_network(&self, message: &str, times: usize) {
        let mut failures = self.failures.lock().await;
        for _ in 0..times {
            failures.push_back(Failure::Network(message.to_string()));
        }
    }

    pub(crate) async fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().await.clone()
    }

    pub(crate) async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    fn route(
        &self,
        collections: &mut HashMap<String, Vec<Value>>,
        request: &TransportRequest,
    ) -> Envelope<Value> {
        let (path, query) = match request.url.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (request.url.as_str(), None),
        };
        let rest = path
            .strip_prefix(self.prefix.as_str())
            .unwrap_or(path)
            .trim_start_matches('/');
        let (resource, id) = match rest.split_once('/') {
            Some((resource, id)) => (resource, Some(id)),
            None => (rest, None),
        };
        let items = collections.entry(resource.to_string()).or_default();

        match (request.method, id) {
            (Method::Get, None) => match query {
                Some(query) => search(items, query),
                None => Envelope::success(200, Value::Array(items.clone())),
            },
            (Method::Get, Some(id)) => match items.iter().find(|item| has_id(item, id)) {
                Some(item) => Envelope::success(200, item.clone()),
                None => Envelope::error(404, format!("{resource} {id} not found")),
            },
            (Method::Put, Some(id)) => {
                let body = request.body.clone().unwrap_or(Value::Null);
                items.retain(|item| !has_id(item, id));
                items.push(body.clone());
                Envelope::success(201, body)
            }
            (Method::Patch, Some(id)) => match items.iter().position(|item| has_id(item, id)) {
                Some(index) => {
                    if let (Some(Value::Object(target)), Some(Value::Object(changes))) =
                        (items.get_mut(index), request.body.as_ref())
                    {
                        for (field, value) in changes {
                            target.insert(field.clone(), value.clone());
                        }
                    }
                    Envelope::success(200, items[index].clone())
                }
                None => Envelope::error(404, format!("{resource} {id} not found")),
            },
            (Method::Delete, Some(id)) => {
                let before = items.len();
                items.retain(|item| !has_id(item, id));
                if items.len() < before {
                    Envelope::success(200, Value::Null)
                } else {
                    Envelope::error(404, format!("{resource} {id} not found"))
                }
            }
            _ => Envelope::error(405, "Method not allowed"),
        }
    }
}

fn has_id(item: &Value, id: &str) -> bool {
    match item.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Equality filtering plus pagination; an empty result answers 404.
fn search(items: &[Value], query: &str) -> Envelope<Value> {
    let params: Vec<(String, String)> = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.replace('+', " ")))
        .collect();
    let param = |name: &str| {
        params
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.parse::<usize>().ok())
    };
    let page = param("page").unwrap_or(1).max(1);
    let limit = param("limit").unwrap_or(10).max(1);

    let matching: Vec<&Value> = items
        .iter()
        .filter(|item| {
            params
                .iter()
                .filter(|(k, _)| k != "page" && k != "limit")
                .all(|(k, v)| item.get(k).map(text).as_deref() == Some(v.as_str()))
        })
        .collect();

    if matching.is_empty() {
        return Envelope::error(404, "No matching records");
    }

    let page_items: Vec<Value> = matching
        .iter()
        .skip((page - 1) * limit)
        .take(limit)
        .map(|item| (*item).clone())
        .collect();
    Envelope::success(
        200,
        json!({
            "items": page_items,
            "total": matching.len(),
            "page": page,
            "limit": limit,
        }),
    )
}

#[async_trait]
impl Transport for FakeBackend {
    async fn request(&self, request: TransportRequest) -> Result<Envelope<Value>, TransportError> {
        self.requests.lock().await.push(request.clone());

        if let Some(failure) = self.failures.lock().await.pop_front() {
            return match failure {
                Failure::Envelope { status, message } => Ok(Envelope::error(status, message)),
                Failure::Status(status) => Err(TransportError::Status {
                    status_code: status,
                    status_message: canonical_reason(status).to_string(),
                    message: None,
                }),
                Failure::Network(message) => Err(TransportError::Network(message)),
            };
        }

        let mut collections = self.collections.lock().await;
        Ok(self.route(&mut collections, &request))
    }
}

/// Generates `"<prefix>1"`, `"<prefix>2"`, ...
pub(crate) fn sequential_ids(prefix: &'static str) -> IdGenerator {
    let counter = Arc::new(AtomicUsize::new(0));
    Arc::new(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        ResourceId::from(format!("{prefix}{n}"))
    })
}
