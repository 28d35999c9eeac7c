// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Administrator role - full access to the marketplace back office
pub const ROLE_ADMIN: &str = "ADMIN";

/// Product manager role - curates the catalog (categories, listings)
pub const ROLE_PRODUCT_MANAGER: &str = "PRODUCT_MANAGER";

/// Roles allowed to create, update and delete categories
pub const CATALOG_MANAGER_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_PRODUCT_MANAGER];
