use axum::{Json, extract::State, http::StatusCode};

use super::run_blocking;
use crate::db::models::{ItemId, ListId, TodoItem, TodoList};
use crate::middleware::auth::Authenticated;
use crate::middleware::extract::{ApiJson, ApiPath};
use crate::types::requests::{CreateItemPayload, ListPayload, UpdateItemPayload};
use crate::{HubError, router::HubState};

pub async fn list_all(
    State(state): State<HubState>,
    auth: Authenticated,
) -> Result<Json<Vec<TodoList>>, HubError> {
    let todos = state.todos.clone();
    let lists = run_blocking(move || todos.get_all_lists(auth.caller)).await?;
    Ok(Json(lists))
}

pub async fn create_list(
    State(state): State<HubState>,
    auth: Authenticated,
    ApiJson(body): ApiJson<ListPayload>,
) -> Result<(StatusCode, Json<TodoList>), HubError> {
    let todos = state.todos.clone();
    let list = run_blocking(move || todos.create_list(&body.name, auth.caller.user_id)).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

pub async fn get_list(
    State(state): State<HubState>,
    auth: Authenticated,
    ApiPath(id): ApiPath<ListId>,
) -> Result<Json<TodoList>, HubError> {
    let todos = state.todos.clone();
    let list = run_blocking(move || todos.get_list(id, auth.caller)).await?;
    Ok(Json(list))
}

pub async fn update_list(
    State(state): State<HubState>,
    auth: Authenticated,
    ApiPath(id): ApiPath<ListId>,
    ApiJson(body): ApiJson<ListPayload>,
) -> Result<Json<TodoList>, HubError> {
    let todos = state.todos.clone();
    let list = run_blocking(move || todos.update_list(id, &body.name, auth.caller)).await?;
    Ok(Json(list))
}

pub async fn delete_list(
    State(state): State<HubState>,
    auth: Authenticated,
    ApiPath(id): ApiPath<ListId>,
) -> Result<StatusCode, HubError> {
    let todos = state.todos.clone();
    run_blocking(move || todos.delete_list(id, auth.caller)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_item(
    State(state): State<HubState>,
    auth: Authenticated,
    ApiPath(list_id): ApiPath<ListId>,
    ApiJson(body): ApiJson<CreateItemPayload>,
) -> Result<(StatusCode, Json<TodoItem>), HubError> {
    let todos = state.todos.clone();
    let item =
        run_blocking(move || todos.create_item(list_id, &body.content, auth.caller)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<HubState>,
    auth: Authenticated,
    ApiPath((list_id, item_id)): ApiPath<(ListId, ItemId)>,
    ApiJson(body): ApiJson<UpdateItemPayload>,
) -> Result<Json<TodoItem>, HubError> {
    let todos = state.todos.clone();
    let item = run_blocking(move || {
        todos.update_item(
            list_id,
            item_id,
            &body.content,
            body.is_completed,
            auth.caller,
        )
    })
    .await?;
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<HubState>,
    auth: Authenticated,
    ApiPath((list_id, item_id)): ApiPath<(ListId, ItemId)>,
) -> Result<StatusCode, HubError> {
    let todos = state.todos.clone();
    run_blocking(move || todos.delete_item(list_id, item_id, auth.caller)).await?;
    Ok(StatusCode::NO_CONTENT)
}
