use axum::extract::State;
use axum::Json;
use playtime_wechat::AccessToken;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/token
///
/// The process-wide access token, fetched only when the cached one is stale.
pub async fn get_token(State(state): State<AppState>) -> AppResult<Json<DataResponse<AccessToken>>> {
    let token = state.tokens.get_token().await?;
    Ok(Json(DataResponse { data: token }))
}
