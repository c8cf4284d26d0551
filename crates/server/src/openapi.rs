use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ServiceBaseDoc {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ServiceDoc {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    /// RFC 3339 timestamp
    pub deployed_at: Option<String>,
    pub ip_address: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct TeamDoc {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// `a.b.c.d/n`
    pub cidr: String,
    pub services: Vec<ServiceDoc>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(ToSchema)]
pub struct DefaultServiceDoc { pub label: String, pub description: String }

#[derive(ToSchema)]
pub struct CreateTeamRequestDoc {
    /// Catalog service ids
    pub services: Vec<u64>,
    pub name: String,
    pub description: Option<String>,
    pub cidr: String,
}

#[derive(ToSchema)]
pub struct FieldIssueDoc { pub field: String, pub rule: String, pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub detail: Option<String>,
    pub issues: Option<Vec<FieldIssueDoc>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::teams::list_teams,
        crate::routes::teams::create_team,
        crate::routes::teams::get_team,
        crate::routes::teams::delete_team,
        crate::routes::teams::list_services,
        crate::routes::teams::list_default_services,
    ),
    components(
        schemas(
            HealthResponse,
            ServiceBaseDoc,
            ServiceDoc,
            TeamDoc,
            DefaultServiceDoc,
            CreateTeamRequestDoc,
            FieldIssueDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "teams"),
        (name = "services")
    )
)]
pub struct ApiDoc;
