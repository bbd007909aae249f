//! Transport session and the client event loop
//!
//! One WebSocket connection, one logical task. Inbound frames, the latency
//! probe timer, input sampling and render ticks are multiplexed through a
//! single `select!` loop; handlers run to completion, so session state
//! needs no locking. A closed or errored channel is terminal: probing and
//! input forwarding stop, rendering keeps showing the last snapshot.

use crate::input::InputRelay;
use crate::rendering::Projector;
use crate::session::{ConnectionStatus, Session};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use macroquad::input::{is_key_pressed, KeyCode};
use shared::{decode, encode, ClientMessage};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::interval;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// What the reader task forwards to the event loop.
enum Inbound {
    Frame(String),
    Closed,
}

pub struct Client {
    sink: Option<WsSink>,
    inbound: mpsc::UnboundedReceiver<Inbound>,
    session: Session,
    relay: InputRelay,
    projector: Projector,
    epoch: Instant,
}

impl Client {
    /// Opens the connection and registers the display name. A connection
    /// that never opens is not fatal: the client comes up with an error
    /// status and the render loop surfaces it.
    pub async fn connect(server_addr: &str, name: &str, width: i32, height: i32) -> Self {
        let epoch = Instant::now();
        let mut session = Session::new(name);
        let (tx, rx) = mpsc::unbounded_channel();

        let url = format!("ws://{}/ws", server_addr);
        info!("Connecting to {}", url);
        let sink = match connect_async(url.as_str()).await {
            Ok((ws, _response)) => {
                let (sink, stream) = ws.split();
                tokio::spawn(read_loop(stream, tx));
                session.set_status(ConnectionStatus::Connected);
                Some(sink)
            }
            Err(e) => {
                error!("connection failed: {}", e);
                session.set_status(ConnectionStatus::Error);
                None
            }
        };

        let mut client = Client {
            sink,
            inbound: rx,
            session,
            relay: InputRelay::new(),
            projector: Projector::new(width, height, epoch),
            epoch,
        };

        // Name registration is the precondition for being admitted to a
        // match; the server confirms through client_id / game_state.
        client
            .send(ClientMessage::SetName {
                name: name.to_string(),
            })
            .await;
        client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_connected(&self) -> bool {
        self.sink.is_some()
    }

    /// Monotonic microseconds since the client started.
    fn now_us(&self) -> u64 {
        self.epoch.elapsed().as_micros() as u64
    }

    /// Fire-and-forget transmit. On a closed channel the frame is dropped;
    /// callers must not assume delivery.
    async fn send(&mut self, message: ClientMessage) {
        let Some(sink) = self.sink.as_mut() else {
            debug!("send dropped, channel closed");
            return;
        };
        let frame = match encode(&message) {
            Ok(frame) => frame,
            Err(e) => {
                error!("encode failed: {}", e);
                return;
            }
        };
        if let Err(e) = sink.send(Message::Text(frame)).await {
            warn!("send failed: {}", e);
            self.mark_disconnected();
        }
    }

    fn mark_disconnected(&mut self) {
        if self.sink.take().is_some() {
            info!("Disconnected from server");
        }
        self.session.set_status(ConnectionStatus::Disconnected);
    }

    /// Boundary classification: parse, apply, or count-and-drop.
    fn handle_frame(&mut self, frame: &str) {
        match decode(frame) {
            Ok(message) => {
                let outcome = self.session.apply(message, self.now_us());
                debug!("inbound frame: {:?}", outcome);
            }
            Err(e) => {
                warn!("dropping unrecognized frame: {}", e);
                self.session.note_rejected();
            }
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut probe_interval = interval(Duration::from_millis(1000));
        let mut input_interval = interval(Duration::from_millis(16));
        let mut render_interval = interval(Duration::from_millis(16));

        loop {
            // Resolve the next event first, then act on it; handlers run to
            // completion before the next event is considered.
            let event = tokio::select! {
                inbound = self.inbound.recv(), if self.sink.is_some() => LoopEvent::Inbound(inbound),
                _ = probe_interval.tick(), if self.sink.is_some() => LoopEvent::ProbeTick,
                _ = input_interval.tick() => LoopEvent::InputTick,
                _ = render_interval.tick() => LoopEvent::RenderTick,
            };

            match event {
                LoopEvent::Inbound(Some(Inbound::Frame(frame))) => self.handle_frame(&frame),
                LoopEvent::Inbound(Some(Inbound::Closed)) | LoopEvent::Inbound(None) => {
                    self.mark_disconnected()
                }

                LoopEvent::ProbeTick => {
                    let probe = self.session.start_probe(self.now_us());
                    self.send(probe).await;
                }

                LoopEvent::InputTick => {
                    if is_key_pressed(KeyCode::Escape) {
                        info!("Exiting");
                        return Ok(());
                    }
                    if self.sink.is_some() {
                        if let Some(message) =
                            self.relay.sample(self.session.role(), self.now_us())
                        {
                            self.send(message).await;
                        }
                    }
                }

                LoopEvent::RenderTick => {
                    self.projector
                        .draw_frame(&self.session, Instant::now(), wall_clock_ms());
                }
            }
        }
    }
}

enum LoopEvent {
    Inbound(Option<Inbound>),
    ProbeTick,
    InputTick,
    RenderTick,
}

async fn read_loop(mut stream: SplitStream<WsStream>, tx: mpsc::UnboundedSender<Inbound>) {
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if tx.send(Inbound::Frame(text)).is_err() {
                    return;
                }
            }
            Ok(Message::Close(_)) => break,
            // Binary and low-level control frames are not part of the protocol.
            Ok(_) => {}
            Err(e) => {
                warn!("websocket error: {}", e);
                break;
            }
        }
    }
    let _ = tx.send(Inbound::Closed);
}

/// Wall-clock milliseconds, the time base the server uses for `startTime`.
fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as u64
}
