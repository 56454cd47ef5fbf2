use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
};
use serde::de::DeserializeOwned;

/// Call an actix service under test.
#[allow(async_fn_in_trait)]
pub trait CallService {
    type Body: MessageBody;

    async fn call_service(&self, request: Request) -> ServiceResponse<Self::Body>;

    async fn call_and_read_body_json<T: DeserializeOwned>(&self, request: Request) -> T;
}

impl<S, B> CallService for S
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    type Body = B;

    async fn call_service(&self, request: Request) -> ServiceResponse<B> {
        actix_web::test::call_service(self, request).await
    }

    async fn call_and_read_body_json<T: DeserializeOwned>(&self, request: Request) -> T {
        let response = self.call_service(request).await;
        actix_web::test::read_body_json(response).await
    }
}
