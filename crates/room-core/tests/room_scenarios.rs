// crates/room-core/tests/room_scenarios.rs
//
// Drives the room through the text codec, the way the server does.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use room_core::{
    EventKind, InboundEvent, NewsEndpoint, NewsError, NewsLookup, NewsResponse, NewsSearch, NoMap,
    OutboundEvent, Recipient, Room, RoomDescription, RoomIdentity,
};
use room_protocol::{decode_inbound, encode_outbound};
use url::Url;

/// Search stub that replays one canned JSON body.
struct CannedSearch(&'static str);

#[async_trait]
impl NewsSearch for CannedSearch {
    async fn fetch(&self, _url: &Url) -> Result<NewsResponse, NewsError> {
        serde_json::from_str(self.0).map_err(|e| NewsError::InvalidResponse(e.to_string()))
    }
}

async fn room_with_news(body: &'static str) -> Room {
    let news = NewsLookup::new(
        Arc::new(CannedSearch(body)),
        NewsEndpoint::default(),
        Duration::from_secs(1),
    );
    Room::start(
        RoomIdentity::Generated,
        RoomDescription::default(),
        Arc::new(NoMap),
        news,
    )
    .await
}

async fn room() -> Room {
    room_with_news(r#"{"result":{"docs":[]}}"#).await
}

async fn run_line(room: &Room, line: &str) -> Vec<OutboundEvent> {
    match decode_inbound(line) {
        Ok(frame) => room.handle(frame.event).await,
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn hello_sends_location_then_greeting() {
    let room = room().await;
    let out = run_line(&room, r#"roomHello,r1,{"username":"Ann","userId":"u1","version":2}"#).await;

    assert_eq!(out.len(), 2);
    assert_eq!(out[0], OutboundEvent::location("u1", room.description()));
    assert_eq!(
        out[1],
        OutboundEvent::broadcast_with_personal("Ann is here", "u1", "Welcome!")
    );
    assert_eq!(out[1].recipient(), Recipient::All);
}

#[tokio::test]
async fn username_is_taken_from_each_event() {
    let room = room().await;
    room.handle(InboundEvent::new(EventKind::Hello, "u1", "Ann")).await;
    let out = room.handle(InboundEvent::new(EventKind::Goodbye, "u1", "Annie")).await;

    assert_eq!(
        out,
        vec![OutboundEvent::broadcast_with_personal("Annie has gone", "u1", "Bye!")]
    );
}

#[tokio::test]
async fn join_is_location_only() {
    let room = room().await;
    let out = run_line(&room, r#"roomJoin,r1,{"username":"Ann","userId":"u1","version":2}"#).await;

    assert_eq!(out, vec![OutboundEvent::location("u1", room.description())]);
}

#[tokio::test]
async fn part_and_unknown_are_silent() {
    let room = room().await;

    assert!(run_line(&room, r#"roomPart,r1,{"username":"Ann","userId":"u1"}"#)
        .await
        .is_empty());
    assert!(run_line(&room, r#"roomWhatever,r1,{"username":"Ann","userId":"u1"}"#)
        .await
        .is_empty());
    assert!(run_line(&room, r#"roomHello,r1,{"username":"Ann"}"#)
        .await
        .is_empty());
    assert!(run_line(&room, "not a frame at all").await.is_empty());
}

#[tokio::test]
async fn chat_echo_and_empty_chat() {
    let room = room().await;

    let out = run_line(
        &room,
        r#"room,r1,{"username":"Ann","userId":"u1","content":"hello everyone"}"#,
    )
    .await;
    assert_eq!(out, vec![OutboundEvent::chat("Ann", "hello everyone")]);

    let out = run_line(&room, r#"room,r1,{"username":"Ann","userId":"u1","content":""}"#).await;
    assert!(out.is_empty());

    let out = run_line(&room, r#"room,r1,{"username":"Ann","userId":"u1"}"#).await;
    assert!(out.is_empty());
}

#[tokio::test]
async fn commands_through_the_handler() {
    let room = room().await;

    let out = room.handle(InboundEvent::chat("u1", "Ann", "/go")).await;
    assert_eq!(
        out,
        vec![OutboundEvent::directed(
            "u1",
            "You didn't say which way you wanted to go."
        )]
    );

    let out = room.handle(InboundEvent::chat("u1", "Ann", "/go up")).await;
    assert_eq!(
        out,
        vec![OutboundEvent::directed(
            "u1",
            "There isn't a door in that direction (up)"
        )]
    );

    let out = room.handle(InboundEvent::chat("u1", "Ann", "/go north")).await;
    assert_eq!(
        out,
        vec![OutboundEvent::exit_granted("u1", "n", "You head North")]
    );

    let out = room.handle(InboundEvent::chat("u1", "Ann", "/dance")).await;
    assert_eq!(
        out,
        vec![OutboundEvent::directed(
            "u1",
            "This room is a basic model. It doesn't understand `/dance`"
        )]
    );
}

#[tokio::test]
async fn news_usage_error_is_broadcast() {
    let room = room().await;
    let out = room.handle(InboundEvent::chat("u1", "Ann", "/news")).await;

    assert_eq!(
        out,
        vec![OutboundEvent::broadcast(
            "The '/news' command expects a company name after it."
        )]
    );
    assert_eq!(out[0].recipient(), Recipient::All);
}

#[tokio::test]
async fn news_with_empty_docs_reports_query() {
    let room = room().await;
    let out = room.handle(InboundEvent::chat("u1", "Ann", "/news IBM")).await;

    let OutboundEvent::BroadcastChat { text, .. } = &out[0] else {
        panic!("expected a broadcast, got {out:?}");
    };
    assert!(text.starts_with("Watson news response to Ann:\n "));
    assert!(text.contains("problem with this query:"));
    assert!(text.contains("type%3Dcompany"));
}

#[tokio::test]
async fn news_results_are_listed() {
    let room = room_with_news(
        r#"{"result":{"docs":[
            {"source":{"enriched":{"url":{"title":"IBM up","url":"http://n/1"}}}},
            {"source":{"enriched":{"url":{"title":"IBM down"}}}}
        ]}}"#,
    )
    .await;
    let out = room.handle(InboundEvent::chat("u1", "Ann", "/news ibm")).await;

    assert_eq!(
        out,
        vec![OutboundEvent::broadcast(
            "Watson news response to Ann:\n [IBM up](http://n/1)  \n[IBM down](not available)  \n"
        )]
    );
}

#[tokio::test]
async fn every_output_encodes() {
    let room = room().await;
    let lines = [
        r#"roomHello,r1,{"username":"Ann","userId":"u1","version":2}"#,
        r#"room,r1,{"username":"Ann","userId":"u1","content":"hi"}"#,
        r#"room,r1,{"username":"Ann","userId":"u1","content":"/ping there"}"#,
        r#"room,r1,{"username":"Ann","userId":"u1","content":"/look"}"#,
        r#"room,r1,{"username":"Ann","userId":"u1","content":"/go east"}"#,
        r#"roomGoodbye,r1,{"username":"Ann","userId":"u1"}"#,
    ];

    let mut frames = Vec::new();
    for (bookmark, line) in lines.iter().enumerate() {
        for out in run_line(&room, line).await {
            frames.push(encode_outbound(&out, bookmark as u64).unwrap());
        }
    }

    let targets: Vec<&str> = frames
        .iter()
        .map(|f| f.split(',').next().unwrap_or_default())
        .collect();
    assert_eq!(
        targets,
        vec![
            "player",
            "player",
            "player",
            "player",
            "player",
            "playerLocation",
            "player"
        ]
    );
}
