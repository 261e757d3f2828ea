use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserDoc {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::greeting::run,
        crate::routes::users::create_user,
        crate::routes::users::get_user,
        crate::routes::users::get_all_users,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,
    ),
    components(schemas(HealthResponse, UserDoc)),
    tags(
        (name = "health"),
        (name = "name"),
        (name = "Users")
    )
)]
pub struct ApiDoc;
