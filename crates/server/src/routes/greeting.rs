use axum::{body::Bytes, extract::Query};
use serde::Deserialize;
use service::greeting::{greeting_message, resolve_name};
use tracing::info;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GreetingQuery {
    /// The **Name** parameter
    pub name: Option<String>,
}

#[utoipa::path(
    get, path = "/api/Run", tag = "name",
    params(GreetingQuery),
    responses((status = 200, description = "The OK response", body = String, content_type = "text/plain"))
)]
pub async fn run(Query(q): Query<GreetingQuery>, body: Bytes) -> String {
    info!("greeting endpoint processed a request");
    let name = resolve_name(q.name, &body);
    greeting_message(name.as_deref())
}
