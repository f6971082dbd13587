//! Integration tests: two sessions sharing a topic through a line relay
//! on localhost, plus the public codec contract.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use scrawl_core::{
    ChannelEvent, Color, Connection, DrawingContext, Message, Point, Recorder, Rejection,
    canvas::Stroke, decode, encode,
};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_util::codec::{Framed, LinesCodec};

// ── Helpers ──────────────────────────────────────────────────────

/// A minimal topic relay: every line from any client goes to every
/// client, the sender included.
async fn spawn_relay() -> (String, broadcast::Sender<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (tx, _) = broadcast::channel::<String>(64);

    let topic = tx.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let tx = topic.clone();
            let mut rx = tx.subscribe();
            tokio::spawn(async move {
                let (mut sink, mut lines) = Framed::new(stream, LinesCodec::new()).split();
                loop {
                    tokio::select! {
                        line = lines.next() => match line {
                            Some(Ok(line)) => { let _ = tx.send(line); }
                            _ => break,
                        },
                        out = rx.recv() => match out {
                            Ok(line) => {
                                if sink.send(line).await.is_err() {
                                    break;
                                }
                            }
                            Err(_) => break,
                        },
                    }
                }
            });
        }
    });

    (addr, tx)
}

async fn wait_for_subscribers(topic: &broadcast::Sender<String>, n: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while topic.receiver_count() < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("relay did not accept all clients");
}

async fn next_event(conn: &mut Connection) -> ChannelEvent {
    tokio::time::timeout(Duration::from_secs(5), conn.recv())
        .await
        .expect("timeout")
        .expect("connection event queue closed")
}

/// A mounted session whose recorder starts empty.
fn session() -> DrawingContext<Recorder> {
    let mut ctx = DrawingContext::default();
    ctx.mount(Recorder::new());
    ctx.surface_mut().unwrap().reset();
    ctx
}

async fn open(ctx: &mut DrawingContext<Recorder>, conn: &mut Connection) {
    let ev = next_event(conn).await;
    assert!(matches!(ev, ChannelEvent::Open(_)));
    ctx.handle(ev);
    assert!(ctx.is_connected());
}

// ── End-to-end ───────────────────────────────────────────────────

#[tokio::test]
async fn test_stroke_reaches_peer() {
    let (addr, topic) = spawn_relay().await;

    let mut conn_a = Connection::connect(&addr).await.unwrap();
    let mut conn_b = Connection::connect(&addr).await.unwrap();
    let observer = TcpStream::connect(&addr).await.unwrap();
    let mut observer = Framed::new(observer, LinesCodec::new());
    wait_for_subscribers(&topic, 3).await;

    let mut a = session();
    let mut b = session();
    open(&mut a, &mut conn_a).await;
    open(&mut b, &mut conn_b).await;

    a.press(Point::new(10.0, 10.0));
    a.drag_to(Point::new(20.5, 15.25)).unwrap();

    let expected = Stroke {
        color: Color::BLACK,
        width: 15.0,
        from: Point::new(10.0, 10.0),
        to: Point::new(20.5, 15.3),
    };
    assert_eq!(a.surface().unwrap().strokes(), vec![expected]);

    // Exact wire text.
    let line = tokio::time::timeout(Duration::from_secs(5), observer.next())
        .await
        .expect("timeout")
        .unwrap()
        .unwrap();
    assert_eq!(line, "L #000000 10.0 10.0 20.5 15.3");

    // B draws the identical stroke.
    let ev = next_event(&mut conn_b).await;
    assert!(matches!(ev, ChannelEvent::Frame(Ok(Message::Line { .. }))));
    b.handle(ev);
    assert_eq!(b.surface().unwrap().strokes(), vec![expected]);
}

#[tokio::test]
async fn test_clear_is_applied_on_echo() {
    let (addr, topic) = spawn_relay().await;

    let mut conn_a = Connection::connect(&addr).await.unwrap();
    let mut conn_b = Connection::connect(&addr).await.unwrap();
    wait_for_subscribers(&topic, 2).await;

    let mut a = session();
    let mut b = session();
    open(&mut a, &mut conn_a).await;
    open(&mut b, &mut conn_b).await;

    b.receive_text("L #ff0000 0 0 50 50");
    assert!(a.request_clear());
    assert_eq!(a.surface().unwrap().clears(), 0);

    for (ctx, conn) in [(&mut a, &mut conn_a), (&mut b, &mut conn_b)] {
        let ev = next_event(conn).await;
        assert!(matches!(ev, ChannelEvent::Frame(Ok(Message::Clear))));
        ctx.handle(ev);
        assert_eq!(ctx.surface().unwrap().clears(), 1);
    }
}

#[tokio::test]
async fn test_malformed_peer_line_keeps_channel_open() {
    let (addr, topic) = spawn_relay().await;

    let mut conn_b = Connection::connect(&addr).await.unwrap();
    let rogue = TcpStream::connect(&addr).await.unwrap();
    let mut rogue = Framed::new(rogue, LinesCodec::new());
    wait_for_subscribers(&topic, 2).await;

    let mut b = session();
    open(&mut b, &mut conn_b).await;

    rogue.send("L #FF0000 0 0 1 1").await.unwrap();
    rogue.send("C").await.unwrap();

    let ev = next_event(&mut conn_b).await;
    assert!(matches!(
        ev,
        ChannelEvent::Frame(Err(Rejection::InvalidColor(_)))
    ));
    b.handle(ev);
    assert!(b.surface().unwrap().ops().is_empty());
    assert!(b.is_connected());

    let ev = next_event(&mut conn_b).await;
    b.handle(ev);
    assert_eq!(b.surface().unwrap().clears(), 1);
}

#[tokio::test]
async fn test_close_stops_broadcast() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        // Accept and hang up straight away.
        let (stream, _) = listener.accept().await.unwrap();
        drop(stream);
    });

    let mut conn = Connection::connect(&addr).await.unwrap();
    let mut ctx = session();
    open(&mut ctx, &mut conn).await;

    let ev = next_event(&mut conn).await;
    assert!(matches!(ev, ChannelEvent::Close));
    ctx.handle(ev);
    assert!(!ctx.is_connected());

    assert!(!ctx.request_clear());
    ctx.press(Point::new(0.0, 0.0));
    assert!(ctx.drag_to(Point::new(4.0, 4.0)).is_some());
    assert_eq!(ctx.surface().unwrap().strokes().len(), 1);
}

// ── Codec contract ───────────────────────────────────────────────

#[test]
fn test_roundtrip_modulo_rounding() {
    let messages = [
        Message::Clear,
        Message::line(Color::ORANGE, Point::new(0.0, 0.0), Point::new(4999.96, 0.04)),
        Message::line(Color::rgb(1, 2, 3), Point::new(-12.345, 7.75), Point::new(7.75, -12.345)),
    ];
    for m in messages {
        let once = decode(&encode(&m)).unwrap();
        assert_eq!(once, m.quantized());
        let twice = decode(&encode(&once)).unwrap();
        assert_eq!(twice, once);
    }
}

#[test]
fn test_rejections_never_panic() {
    for text in [
        "",
        "X",
        "L #zzzzzz 0 0 1 1",
        "L #ff0000 a 0 1 1",
        "L #ff0000 0 0 1",
        "L #FF0000 0 0 1 1",
        "C C",
        "\u{0}",
    ] {
        assert!(decode(text).is_err(), "{text:?}");
    }
}

#[test]
fn test_move_without_press_sends_nothing() {
    let mut ctx = session();
    let (outbound, mut rx) = scrawl_core::Outbound::channel();
    ctx.channel_opened(outbound);

    assert!(ctx.drag_to(Point::new(3.0, 3.0)).is_none());
    assert!(ctx.surface().unwrap().strokes().is_empty());
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_clear_without_channel() {
    let mut ctx = session();
    assert!(!ctx.request_clear());
}
