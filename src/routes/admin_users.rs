use axum::Json;

use crate::models::AdminUsersView;

pub async fn index() -> Json<AdminUsersView> {
    Json(AdminUsersView::default())
}
