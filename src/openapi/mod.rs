use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Henhouse API",
        version = "0.1.0",
        description = r#"
# Henhouse API

Backend for a small poultry farm.

- **Inventory**: feed, medicine and chicken stock with a movement ledger
- **Purchases and usage**: stock in from vendors, feed and medicine out to the flock
- **Orders**: chicken sales from `pending` to `delivered`, or `cancelled`
- **Ledger**: invoices and expenses issued alongside every sale, purchase and wage payment
- **Payroll**: staff attendance and monthly wages

## Authentication

Every farm endpoint requires a bearer token from `POST /api/v1/auth/sign-in`:

```
Authorization: Bearer <token>
```

## Errors

Failures return an `ErrorResponse` with the request id echoed from `x-request-id`.
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers((url = "http://localhost:8080", description = "Local development")),
    tags(
        (name = "auth", description = "Accounts and tokens"),
        (name = "inventory", description = "Stock items and their movement ledger"),
        (name = "alerts", description = "Low stock and expiry warnings"),
        (name = "purchases", description = "Stock bought from vendors"),
        (name = "usage", description = "Feed and medicine consumed"),
        (name = "orders", description = "Chicken sales"),
        (name = "ledger", description = "Invoices, expenses and reconciliation"),
        (name = "employees", description = "Staff, attendance and payroll"),
        (name = "prices", description = "Chicken price catalogue"),
        (name = "reports", description = "Dashboard figures"),
        (name = "health", description = "Liveness and readiness")
    ),
    paths(
        crate::auth::sign_up_handler,
        crate::auth::sign_in_handler,
        crate::auth::me_handler,
        crate::handlers::health::liveness,
        crate::handlers::health::status,
        crate::handlers::inventory::list_inventory,
        crate::handlers::inventory::create_inventory,
        crate::handlers::inventory::get_inventory,
        crate::handlers::inventory::update_inventory,
        crate::handlers::inventory::adjust_inventory,
        crate::handlers::inventory::list_movements,
        crate::handlers::alerts::list_alerts,
        crate::handlers::purchases::record_purchase,
        crate::handlers::purchases::list_purchases,
        crate::handlers::purchases::get_purchase,
        crate::handlers::usage::record_usage,
        crate::handlers::usage::list_usage,
        crate::handlers::usage::get_usage,
        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::cancel_order,
        crate::handlers::orders::order_history,
        crate::handlers::ledger::list_documents,
        crate::handlers::ledger::get_document,
        crate::handlers::ledger::reconcile,
        crate::handlers::employees::create_employee,
        crate::handlers::employees::list_employees,
        crate::handlers::employees::get_employee,
        crate::handlers::employees::deactivate_employee,
        crate::handlers::employees::mark_attendance,
        crate::handlers::employees::list_attendance,
        crate::handlers::employees::compute_payroll,
        crate::handlers::employees::pay_wages,
        crate::handlers::prices::list_prices,
        crate::handlers::prices::set_price,
        crate::handlers::prices::get_price,
        crate::handlers::reports::dashboard,
    ),
    components(schemas(crate::errors::ErrorResponse, crate::ResponseMeta)),
    modifiers(&BearerAuth)
)]
pub struct ApiDocV1;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDocV1::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_farm_paths_and_bearer_scheme() {
        let json = serde_json::to_string(&ApiDocV1::openapi()).unwrap();
        assert!(json.contains("Henhouse API"));
        assert!(json.contains("/api/v1/orders/{id}/cancel"));
        assert!(json.contains("/api/v1/ledger/reconciliation"));
        assert!(json.contains("bearer_auth"));
    }
}
