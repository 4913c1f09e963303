use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "WasteTrack API",
        version = "1.0.0",
        description = r#"
Back-office API for a scrap and waste aggregation business: godowns and
collection points, material collections, stock transfers, sales, expenses,
and a small fleet (vehicles, drivers, trips).

All endpoints except `/health` and `/api/v1/auth/login` require a bearer
token:

```
Authorization: Bearer <your-jwt-token>
```
"#
    ),
    paths(
        crate::handlers::users::login,
        crate::handlers::users::provision_user,
        crate::handlers::inventory::list_inventory,
        crate::handlers::inventory::get_level,
        crate::handlers::inventory::adjust_inventory,
        crate::handlers::collections::record_collection,
        crate::handlers::collections::list_collections,
        crate::handlers::sales::record_sale,
        crate::handlers::sales::list_sales,
        crate::handlers::transfers::transfer_stock,
        crate::handlers::transfers::list_transfers,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::users::LoginRequest,
        crate::handlers::users::LoginResponse,
        crate::handlers::users::ProvisionUserRequest,
        crate::handlers::inventory::AdjustInventoryRequest,
        crate::handlers::collections::RecordCollectionRequest,
        crate::handlers::sales::RecordSaleRequest,
        crate::handlers::transfers::TransferStockRequest,
    )),
    tags(
        (name = "auth", description = "Login and token issuance"),
        (name = "users", description = "Account provisioning"),
        (name = "inventory", description = "On-hand stock by location and material"),
        (name = "collections", description = "Material intake from suppliers"),
        (name = "sales", description = "Outbound sales against stock"),
        (name = "transfers", description = "Stock movement between locations"),
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
