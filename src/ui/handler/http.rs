//! HTTP API endpoint handlers (the chat facade).

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};

use crate::{
    domain::{RoomId, UserId, UserProfile},
    infrastructure::dto::http::{
        CreateRoomRequest, MessageDto, MessageListDto, MessagePageQuery, RoomDto,
        SendMessageRequest, SuccessDto, UnreadCountDto,
    },
    ui::{error::ApiError, state::AppState},
    usecase::{
        ChatError, CreateRoomUseCase, JoinRoomUseCase, LeaveRoomUseCase, ListMessagesUseCase,
        ListRoomsUseCase, RoomDetailUseCase, SendMessageUseCase, UnreadCountUseCase,
    },
};

/// Header carrying the session-resolved caller id.
const USER_ID_HEADER: &str = "x-user-id";

/// Resolve the caller identity from the request headers through the user
/// directory. Every chat operation runs this first.
async fn resolve_caller(state: &AppState, headers: &HeaderMap) -> Result<UserProfile, ApiError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(ChatError::Unauthorized)?;
    let user_id = UserId::new(raw.to_string()).map_err(|_| ChatError::Unauthorized)?;
    state
        .users
        .find_user(&user_id)
        .await
        .map_err(ChatError::from)?
        .ok_or_else(|| ChatError::Unauthorized.into())
}

/// Parse a path segment into a RoomId; malformed ids are a validation
/// failure, not a 404.
fn parse_room_id(raw: String) -> Result<RoomId, ApiError> {
    RoomId::new(raw).map_err(|e| ChatError::Validation(e.to_string()).into())
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the caller's rooms, enriched
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoomDto>>, ApiError> {
    let caller = resolve_caller(&state, &headers).await?;
    let usecase = ListRoomsUseCase::new(
        state.rooms.clone(),
        state.memberships.clone(),
        state.messages.clone(),
        state.users.clone(),
    );
    let rooms = usecase.execute(&caller.id).await?;
    Ok(Json(rooms))
}

/// Create a room; the caller becomes its first admin member
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomDto>), ApiError> {
    let caller = resolve_caller(&state, &headers).await?;
    let usecase = CreateRoomUseCase::new(state.rooms.clone(), state.memberships.clone());
    let room = usecase.execute(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// Get one room, enriched
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDto>, ApiError> {
    let caller = resolve_caller(&state, &headers).await?;
    let room_id = parse_room_id(room_id)?;
    let usecase = RoomDetailUseCase::new(
        state.rooms.clone(),
        state.memberships.clone(),
        state.messages.clone(),
        state.users.clone(),
    );
    let room = usecase.execute(&caller.id, &room_id).await?;
    Ok(Json(room))
}

/// Get one page of a room's messages; marks the room read for the caller
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
    Query(query): Query<MessagePageQuery>,
) -> Result<Json<MessageListDto>, ApiError> {
    let caller = resolve_caller(&state, &headers).await?;
    let room_id = parse_room_id(room_id)?;
    let usecase = ListMessagesUseCase::new(
        state.rooms.clone(),
        state.memberships.clone(),
        state.messages.clone(),
        state.users.clone(),
    );
    let page = usecase
        .execute(&caller.id, &room_id, query.page, query.limit)
        .await?;
    Ok(Json(page))
}

/// Send a message to a room
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageDto>), ApiError> {
    let caller = resolve_caller(&state, &headers).await?;
    let room_id = parse_room_id(room_id)?;
    let usecase = SendMessageUseCase::new(
        state.rooms.clone(),
        state.memberships.clone(),
        state.messages.clone(),
        state.users.clone(),
        state.gateway.clone(),
    );
    let message = usecase.execute(&caller, &room_id, request).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Get the caller's unread count for a room
pub async fn get_unread_count(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
) -> Result<Json<UnreadCountDto>, ApiError> {
    let caller = resolve_caller(&state, &headers).await?;
    let room_id = parse_room_id(room_id)?;
    let usecase = UnreadCountUseCase::new(
        state.rooms.clone(),
        state.memberships.clone(),
        state.messages.clone(),
    );
    let unread = usecase.execute(&caller.id, &room_id).await?;
    Ok(Json(unread))
}

/// Join a room
pub async fn join_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
) -> Result<Json<SuccessDto>, ApiError> {
    let caller = resolve_caller(&state, &headers).await?;
    let room_id = parse_room_id(room_id)?;
    let usecase = JoinRoomUseCase::new(
        state.rooms.clone(),
        state.memberships.clone(),
        state.room_locks.clone(),
    );
    usecase.execute(&caller.id, &room_id).await?;
    tracing::info!("User '{}' joined room '{}'", caller.id, room_id);
    Ok(Json(SuccessDto { success: true }))
}

/// Leave a room (soft leave)
pub async fn leave_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(room_id): Path<String>,
) -> Result<Json<SuccessDto>, ApiError> {
    let caller = resolve_caller(&state, &headers).await?;
    let room_id = parse_room_id(room_id)?;
    let usecase = LeaveRoomUseCase::new(state.memberships.clone(), state.room_locks.clone());
    usecase.execute(&caller.id, &room_id).await?;
    tracing::info!("User '{}' left room '{}'", caller.id, room_id);
    Ok(Json(SuccessDto { success: true }))
}
