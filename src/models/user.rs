use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    pub id: i32,
    pub email: String,
    pub name: String,
}

/// Admin users index. User management is not implemented, so the list is always empty.
#[derive(Debug, Default, Serialize)]
pub struct AdminUsersView {
    pub users: Vec<AdminUser>,
}
