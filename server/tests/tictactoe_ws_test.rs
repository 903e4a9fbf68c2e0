use std::net::SocketAddr;
use std::time::Duration;

use common::games::tictactoe::{Board, GameEvent, Player, SessionUpdate, TicTacToeSettings};
use futures_util::{SinkExt, StreamExt};
use irg_site_server::site_config::SiteConfig;
use irg_site_server::web_server::{WebServerState, build_router};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

async fn start_site() -> SocketAddr {
    common::logger::init_logger(Some("test".to_string()));
    let config = SiteConfig {
        tictactoe: TicTacToeSettings {
            easy_think_delay_ms: 5,
            unbeatable_think_delay_ms: 5,
            win_pause_ms: 5,
            draw_pause_ms: 5,
            ..TicTacToeSettings::default()
        },
        ..SiteConfig::default()
    };
    let state = WebServerState::from_config(&config).unwrap();
    let app = build_router(state, &std::env::temp_dir());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(site: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{}/ws/tictactoe", site))
        .await
        .unwrap();
    client
}

async fn next_update(client: &mut Client) -> SessionUpdate {
    loop {
        let message = tokio::time::timeout(WAIT, client.next())
            .await
            .expect("timed out waiting for update")
            .expect("socket closed")
            .unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn send_text(client: &mut Client, text: &str) {
    client.send(Message::text(text)).await.unwrap();
}

#[tokio::test]
async fn test_new_socket_receives_initial_snapshot() {
    let site = start_site().await;
    let mut client = connect(site).await;

    let update = next_update(&mut client).await;
    assert!(update.events.is_empty());
    assert_eq!(update.snapshot.board, Board::new());
    assert_eq!(update.snapshot.current_player, Player::X);
    assert_eq!(update.snapshot.status, "Your turn (X)");
}

#[tokio::test]
async fn test_select_cell_is_answered_by_computer() {
    let site = start_site().await;
    let mut client = connect(site).await;
    next_update(&mut client).await;

    send_text(&mut client, r#"{"command":"select_cell","index":0}"#).await;
    let update = next_update(&mut client).await;
    assert_eq!(update.events[0], GameEvent::CellMarked { index: 0, player: Player::X });
    assert!(update.snapshot.computer_to_move);

    let update = next_update(&mut client).await;
    assert_eq!(update.events[0], GameEvent::CellMarked { index: 4, player: Player::O });
    assert_eq!(update.snapshot.status, "Your turn (X)");
}

#[tokio::test]
async fn test_malformed_commands_are_skipped() {
    let site = start_site().await;
    let mut client = connect(site).await;
    next_update(&mut client).await;

    send_text(&mut client, "not json at all").await;
    send_text(&mut client, r#"{"command":"undo"}"#).await;
    send_text(&mut client, r#"{"command":"select_cell","index":8}"#).await;

    let update = next_update(&mut client).await;
    assert_eq!(update.events[0], GameEvent::CellMarked { index: 8, player: Player::X });
}

#[tokio::test]
async fn test_close_ends_the_session() {
    let site = start_site().await;
    let mut client = connect(site).await;
    next_update(&mut client).await;

    client.send(Message::Close(None)).await.unwrap();
    let drained = tokio::time::timeout(WAIT, async {
        while let Some(Ok(message)) = client.next().await {
            if let Message::Text(_) = message {
                panic!("no updates expected after close");
            }
        }
    })
    .await;
    assert!(drained.is_ok(), "socket stayed open after close");
}
