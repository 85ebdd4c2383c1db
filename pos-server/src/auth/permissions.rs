//! Permission Definitions
//!
//! Role→permission mapping kept as data.
//!
//! ## 设计原则
//! - 登录即可使用基础读操作，细粒度权限只拦高风险动作
//! - 角色是权限模板：签发令牌时展开成权限列表写入 claims
//! - `admin` 角色由 `CurrentUser::is_admin` 直接放行，列表仅用于展示

/// 已知角色
pub const ROLES: &[&str] = &["admin", "manager", "cashier", "staff"];

/// 管理员权限：全量列表 (角色本身也会被 `is_admin` 直接放行)
pub const ADMIN_PERMISSIONS: &[&str] = &[
    "product:view",
    "product:create",
    "product:edit",
    "product:delete",
    "order:view",
    "order:create",
    "order:cancel",
    "order:refund",
    "inventory:view",
    "inventory:manage",
    "member:view",
    "member:manage",
    "report:view",
    "report:export",
    "config:view",
    "config:manage",
    "system:admin",
];

/// 经理权限：除删商品、会员管理、系统配置外的全部操作
pub const MANAGER_PERMISSIONS: &[&str] = &[
    "product:view",
    "product:create",
    "product:edit",
    "order:view",
    "order:create",
    "order:cancel",
    "order:refund",
    "inventory:view",
    "inventory:manage",
    "member:view",
    "report:view",
    "report:export",
    "config:view",
];

/// 收银员权限：开单和查询
pub const CASHIER_PERMISSIONS: &[&str] = &[
    "product:view",
    "order:view",
    "order:create",
    "inventory:view",
    "member:view",
];

/// 普通员工权限：只读
pub const STAFF_PERMISSIONS: &[&str] = &["product:view", "order:view", "inventory:view"];

/// Get permissions for a role name
pub fn get_role_permissions(role: &str) -> Vec<String> {
    let perms: &[&str] = match role {
        "admin" => ADMIN_PERMISSIONS,
        "manager" => MANAGER_PERMISSIONS,
        "cashier" => CASHIER_PERMISSIONS,
        "staff" => STAFF_PERMISSIONS,
        _ => &[],
    };
    perms.iter().map(|s| s.to_string()).collect()
}

/// Validate if a role name is known
pub fn is_valid_role(role: &str) -> bool {
    ROLES.contains(&role)
}
