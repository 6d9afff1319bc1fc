//! In-memory implementation of the remote todo API.
//!
//! Ids are assigned sequentially from 1, so `0` is never handed out. The
//! `/faults` endpoint lets tests make any operation answer 500 to exercise
//! the client's failure paths.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<u64>,
}

/// Operations forced to fail with 500.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Faults {
    pub list: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

#[derive(Debug)]
pub struct Store {
    next_id: u64,
    todos: BTreeMap<u64, Todo>,
    faults: Faults,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 1,
            todos: BTreeMap::new(),
            faults: Faults::default(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, &'static str);

const INJECTED: Failure = (StatusCode::INTERNAL_SERVER_ERROR, "injected failure");

pub fn app() -> Router {
    app_with_db(Db::default())
}

/// Router over a caller-owned store, for tests that need to inspect it.
pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", patch(update_todo).delete(delete_todo))
        .route("/faults", get(get_faults).put(set_faults))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock todo api listening");
    }
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>, Query(query): Query<ListQuery>) -> Result<Json<Vec<Todo>>, Failure> {
    let store = db.read().await;
    if store.faults.list {
        return Err(INJECTED);
    }
    let todos = store
        .todos
        .values()
        .filter(|todo| query.user_id.is_none_or(|user_id| todo.user_id == user_id))
        .cloned()
        .collect();
    Ok(Json(todos))
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), Failure> {
    let mut store = db.write().await;
    if store.faults.create {
        return Err(INJECTED);
    }
    let title = input.title.trim();
    if title.is_empty() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "title must not be empty"));
    }
    let todo = Todo {
        id: store.next_id,
        user_id: input.user_id,
        title: title.to_string(),
        completed: input.completed,
    };
    store.next_id += 1;
    store.todos.insert(todo.id, todo.clone());
    debug!(id = todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, Failure> {
    let mut store = db.write().await;
    if store.faults.update {
        return Err(INJECTED);
    }
    let todo = store.todos.get_mut(&id).ok_or((StatusCode::NOT_FOUND, "todo not found"))?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    debug!(id, "todo updated");
    Ok(Json(todo.clone()))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    if store.faults.delete {
        return Err(INJECTED);
    }
    store
        .todos
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or((StatusCode::NOT_FOUND, "todo not found"))
}

async fn get_faults(State(db): State<Db>) -> Json<Faults> {
    Json(db.read().await.faults)
}

async fn set_faults(State(db): State<Db>, Json(faults): Json<Faults>) -> Json<Faults> {
    info!(?faults, "fault injection updated");
    db.write().await.faults = faults;
    Json(faults)
}
