//! Session behaviour over real HTTP and over tokio's paused clock.
//!
//! Network tests run the mock server on the test runtime and let ureq talk to
//! it from the blocking pool. Timer tests never touch the network so the
//! paused clock can auto-advance freely.

use std::time::Duration;

use todo_core::{App, ErrorMessage, Filter, TodoClient, TodoId};
use todo_host::{Command, Config, ConfigError, Event, Focus, Session, Transport};
use tokio::time::Instant;

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

fn session_for(base_url: &str, user_id: u64) -> Session {
    let app = App::new(TodoClient::new(base_url, user_id));
    Session::new(app, Transport::new(Duration::from_secs(5)))
}

/// A session whose server is never contacted.
fn offline_session() -> Session {
    session_for("http://127.0.0.1:9", 1)
}

fn run(session: &mut Session, line: &str) {
    let command: Command = line.parse().unwrap();
    session.dispatch(|app| command.apply(app));
}

#[tokio::test]
async fn full_session_against_mock_server() {
    let base_url = start_server().await;
    let mut session = session_for(&base_url, 8);

    session.start();
    session.settle().await;
    assert!(session.app().items().is_empty());
    assert_eq!(session.focus(), Some(Focus::NewTodo));

    run(&mut session, "add milk");
    assert!(session.app().placeholder().is_some());
    session.settle().await;
    run(&mut session, "add bread");
    session.settle().await;
    run(&mut session, "add eggs");
    session.settle().await;

    let ids: Vec<TodoId> = session.app().items().iter().map(|todo| todo.id).collect();
    assert_eq!(ids.len(), 3);
    assert!(session.app().placeholder().is_none());

    run(&mut session, &format!("toggle {}", ids[0]));
    run(&mut session, &format!("rename {} sourdough", ids[1]));
    session.settle().await;
    assert!(session.app().items()[0].completed);
    assert_eq!(session.app().items()[1].title, "sourdough");

    run(&mut session, &format!("edit {}", ids[2]));
    assert_eq!(session.focus(), Some(Focus::TitleField(ids[2])));
    run(&mut session, &format!("type {} ", ids[2]));
    run(&mut session, &format!("save {}", ids[2]));
    session.settle().await;
    assert_eq!(session.app().items().len(), 2);

    run(&mut session, "clear");
    session.settle().await;
    assert_eq!(session.app().items().len(), 1);
    assert_eq!(session.app().items()[0].title, "sourdough");

    run(&mut session, "filter completed");
    assert_eq!(session.app().filter(), Filter::Completed);
    assert!(session.app().view().items.is_empty());
    assert_eq!(session.app().error(), None);

    session.shutdown();
}

#[tokio::test]
async fn unreachable_server_surfaces_load_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut session = session_for(&format!("http://{addr}"), 1);
    session.start();
    session.settle().await;
    assert_eq!(session.app().error(), Some(ErrorMessage::LoadTodos));
    assert!(session.app().items().is_empty());
}

#[tokio::test(start_paused = true)]
async fn banner_clears_three_seconds_after_the_latest_error() {
    let mut session = offline_session();

    let first = Instant::now();
    run(&mut session, "submit");
    assert_eq!(session.app().error(), Some(ErrorMessage::EmptyTitle));

    tokio::time::sleep(Duration::from_secs(2)).await;
    let second = Instant::now();
    run(&mut session, "add   ");
    assert_eq!(session.app().error(), Some(ErrorMessage::EmptyTitle));

    // Only the restarted timer fires; the first one was aborted.
    let event = session.next_event().await.unwrap();
    assert!(matches!(event, Event::DismissElapsed(_)));
    assert!(second.elapsed() >= Duration::from_secs(3));
    assert!(first.elapsed() >= Duration::from_secs(5));

    session.handle(event);
    assert_eq!(session.app().error(), None);
    assert!(session.app().view().notification.hidden);
}

#[tokio::test(start_paused = true)]
async fn dismiss_cancels_the_countdown() {
    let mut session = offline_session();
    run(&mut session, "submit");
    run(&mut session, "dismiss");
    assert_eq!(session.app().error(), None);

    let waited = tokio::time::timeout(Duration::from_secs(10), session.next_event()).await;
    assert!(waited.is_err(), "no timer should fire after dismissal");
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_a_pending_countdown() {
    let mut session = offline_session();
    run(&mut session, "submit");
    session.shutdown();

    let waited = tokio::time::timeout(Duration::from_secs(10), session.next_event()).await;
    assert!(waited.is_err());
    assert_eq!(session.app().error(), Some(ErrorMessage::EmptyTitle));
}

#[test]
fn session_requires_a_user_id() {
    let config = Config {
        base_url: "http://127.0.0.1:3000".to_string(),
        user_id: 0,
        dismiss_after_ms: 3000,
        request_timeout_ms: 1000,
    };
    assert_eq!(Session::from_config(&config).unwrap_err(), ConfigError::MissingUserId);
}
