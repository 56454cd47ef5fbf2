mod update;

use actix_http::body::to_bytes;
use actix_web::{
    http::{self, StatusCode, header},
    test::TestRequest,
};
use anyhow::Context;
use serde_json::{Value, json};
use stockroom_test_context::{TestUser, call::CallService};

pub fn authed(request: TestRequest, user: &TestUser) -> TestRequest {
    request.insert_header((
        header::AUTHORIZATION,
        format!("Bearer {}", user.token),
    ))
}

pub struct CreateResponse {
    pub id: String,
}

/// Builder for create requests.
pub struct Create<'a> {
    user: &'a TestUser,
    name: String,
    category: Option<String>,
    status: Option<&'static str>,
    depreciation: Option<&'static str>,
    assigned_to: Option<String>,
    attributes: Vec<Value>,
    expected_status: StatusCode,
}

impl<'a> Create<'a> {
    pub fn new(user: &'a TestUser, name: impl Into<String>) -> Self {
        Self {
            user,
            name: name.into(),
            category: None,
            status: None,
            depreciation: None,
            assigned_to: None,
            attributes: vec![],
            expected_status: StatusCode::CREATED,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn status(mut self, status: &'static str) -> Self {
        self.status = Some(status);
        self
    }

    pub fn depreciation(mut self, depreciation: &'static str) -> Self {
        self.depreciation = Some(depreciation);
        self
    }

    pub fn assigned_to(mut self, user: &TestUser) -> Self {
        self.assigned_to = Some(user.id.to_string());
        self
    }

    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push(json!({"name": name, "value": value}));
        self
    }

    pub fn expect_status(mut self, status: StatusCode) -> Self {
        self.expected_status = status;
        self
    }

    pub async fn execute(
        self,
        app: &impl CallService,
    ) -> anyhow::Result<Option<CreateResponse>> {
        let mut request_body = json!({"name": &self.name});
        if let Some(category) = &self.category {
            request_body["category"] = json!(category);
        }
        if let Some(status) = self.status {
            request_body["status"] = json!(status);
        }
        if let Some(depreciation) = self.depreciation {
            request_body["depreciation"] = json!(depreciation);
        }
        if let Some(assigned_to) = &self.assigned_to {
            request_body["assigned_to"] = json!(assigned_to);
        }
        if !self.attributes.is_empty() {
            request_body["attributes"] = json!(self.attributes);
        }

        let request = authed(TestRequest::post().uri("/api/v1/asset"), self.user)
            .set_json(request_body);

        let response = app.call_service(request.to_request()).await;
        assert_eq!(response.status(), self.expected_status);

        if !self.expected_status.is_success() {
            return Ok(None);
        }

        let location = response
            .headers()
            .get(&http::header::LOCATION)
            .context("location must be present")?
            .to_str()
            .context("location must be a string")?
            .to_string();

        let body = to_bytes(response.into_body()).await.expect("must decode");
        let body: Value = serde_json::from_slice(&body)?;
        let id = body["id"].as_str().context("must be a string")?.to_string();

        assert_eq!(
            location,
            format!("/api/v1/asset/{id}"),
            "must return a relative URL to the asset"
        );

        Ok(Some(CreateResponse { id }))
    }
}

/// Builder for update requests.
pub struct Update<'a> {
    user: &'a TestUser,
    id: String,
    name: String,
    category: Option<String>,
    status: Option<&'static str>,
    depreciation: Option<&'static str>,
    assigned_to: Option<String>,
    attributes: Vec<Value>,
    expected_status: StatusCode,
}

impl<'a> Update<'a> {
    pub fn new(user: &'a TestUser, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user,
            id: id.into(),
            name: name.into(),
            category: None,
            status: None,
            depreciation: None,
            assigned_to: None,
            attributes: vec![],
            expected_status: StatusCode::NO_CONTENT,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn status(mut self, status: &'static str) -> Self {
        self.status = Some(status);
        self
    }

    pub fn depreciation(mut self, depreciation: &'static str) -> Self {
        self.depreciation = Some(depreciation);
        self
    }

    pub fn assigned_to(mut self, user: &TestUser) -> Self {
        self.assigned_to = Some(user.id.to_string());
        self
    }

    /// Add a raw attribute row, inline-form style.
    pub fn attribute_row(mut self, row: Value) -> Self {
        self.attributes.push(row);
        self
    }

    pub fn expect_status(mut self, status: StatusCode) -> Self {
        self.expected_status = status;
        self
    }

    pub async fn execute(self, app: &impl CallService) -> anyhow::Result<()> {
        let mut request_body = json!({"name": &self.name});
        if let Some(category) = &self.category {
            request_body["category"] = json!(category);
        }
        if let Some(status) = self.status {
            request_body["status"] = json!(status);
        }
        if let Some(depreciation) = self.depreciation {
            request_body["depreciation"] = json!(depreciation);
        }
        if let Some(assigned_to) = &self.assigned_to {
            request_body["assigned_to"] = json!(assigned_to);
        }
        if !self.attributes.is_empty() {
            request_body["attributes"] = json!(self.attributes);
        }

        let request = authed(
            TestRequest::put().uri(&format!("/api/v1/asset/{}", self.id)),
            self.user,
        )
        .set_json(request_body);

        let response = app.call_service(request.to_request()).await;
        assert_eq!(response.status(), self.expected_status);

        Ok(())
    }
}

/// Fetch an asset's detail page, asserting success.
pub async fn get_asset(app: &impl CallService, user: &TestUser, id: &str) -> Value {
    let response = app
        .call_service(
            authed(
                TestRequest::get().uri(&format!("/api/v1/asset/{id}")),
                user,
            )
            .to_request(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body()).await.expect("must decode");
    serde_json::from_slice(&body).expect("must be JSON")
}

/// List assets and return their names, in response order.
pub async fn list_names(
    app: &impl CallService,
    user: &TestUser,
    query: &str,
) -> Vec<String> {
    let uri = match query.is_empty() {
        true => "/api/v1/asset".to_string(),
        false => format!("/api/v1/asset?{query}"),
    };

    let response = app
        .call_service(authed(TestRequest::get().uri(&uri), user).to_request())
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body()).await.expect("must decode");
    let body: Value = serde_json::from_slice(&body).expect("must be JSON");

    body["items"]
        .as_array()
        .expect("items must be an array")
        .iter()
        .map(|item| item["name"].as_str().expect("must be a string").to_string())
        .collect()
}

/// The attribute multiset of an asset detail body, sorted for comparison.
pub fn attribute_pairs(body: &Value) -> Vec<(String, String)> {
    let mut pairs: Vec<_> = body["attributes"]
        .as_array()
        .expect("attributes must be an array")
        .iter()
        .map(|attribute| {
            (
                attribute["name"].as_str().expect("must be a string").to_string(),
                attribute["value"].as_str().expect("must be a string").to_string(),
            )
        })
        .collect();
    pairs.sort();
    pairs
}
