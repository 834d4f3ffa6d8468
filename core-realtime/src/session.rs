//! Real-time update session
//!
//! One worker task per signed-in user owns the socket, the keep-alive timer
//! and the synthetic feed. The [`RealtimeHandle`] talks to it over a command
//! channel and observes its [`ConnectionState`] through a watch channel.
//!
//! ```text
//!  Disconnected ──start──> Connecting ──open + auth──> Live
//!       ^                      │                        │
//!       │                      └──failure──> MockActive <┘ error / abnormal close
//!       └──────────── normal close (1000) ───────────────┘
//! ```
//!
//! Mock mode is sticky: once the live path has failed, the session stays on
//! the synthetic feed until it is shut down.

use crate::dispatch::{dispatch, Viewer};
use crate::error::{RealtimeError, Result};
use crate::feed;
use crate::message::UpdateEnvelope;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::realtime::{CloseCode, RealtimeConnection, RealtimeTransport, SocketFrame};
use bridge_traits::Clock;
use chrono::SecondsFormat;
use core_auth::TokenStore;
use core_runtime::config::{CoreConfig, FeedSettings};
use core_runtime::events::{
    ConnectionState, CoreEvent, EventBus, EventSeverity, RealtimeEvent, UiEffect,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, instrument, warn};

/// Reason sent with the close frame on shutdown.
pub const SESSION_ENDED: &str = "Session ended";

/// An open-and-authenticate attempt in flight.
type Dial = BoxFuture<'static, BridgeResult<Box<dyn RealtimeConnection>>>;

/// Everything needed to run a session, taken from [`CoreConfig`].
pub struct RealtimeSession {
    ws_url: String,
    keep_alive: Duration,
    connect_timeout: Duration,
    feed: FeedSettings,
    transport: Option<Arc<dyn RealtimeTransport>>,
    tokens: TokenStore,
    events: EventBus,
    clock: Arc<dyn Clock>,
}

impl RealtimeSession {
    pub fn new(config: &CoreConfig, tokens: TokenStore, events: EventBus) -> Self {
        Self {
            ws_url: config.ws_url.trim_end_matches('/').to_string(),
            keep_alive: config.keep_alive_interval,
            connect_timeout: config.connect_timeout,
            feed: config.realtime_feed,
            transport: config.realtime_transport.clone(),
            tokens,
            events,
            clock: config.clock.clone(),
        }
    }

    /// Spawns the session worker for `viewer`.
    ///
    /// With `mock_mode` set the worker never opens a socket and goes straight
    /// to the synthetic feed.
    pub fn start(self, viewer: Viewer, mock_mode: bool) -> RealtimeHandle {
        let (commands, inbox) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let mock_mode = Arc::new(AtomicBool::new(mock_mode));

        let worker = Worker {
            url: format!("{}/ws/{}", self.ws_url, viewer.user_id),
            session: self,
            viewer,
            mock_mode: mock_mode.clone(),
            state: state_tx,
            connection: None,
            dialing: None,
            keep_alive: None,
            feed_timer: None,
        };
        tokio::spawn(worker.run(inbox));

        RealtimeHandle {
            commands,
            state: state_rx,
            mock_mode,
        }
    }
}

impl std::fmt::Debug for RealtimeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeSession")
            .field("ws_url", &self.ws_url)
            .field("keep_alive", &self.keep_alive)
            .field("connect_timeout", &self.connect_timeout)
            .field("feed", &self.feed)
            .field("has_transport", &self.transport.is_some())
            .finish()
    }
}

enum Command {
    Send {
        text: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Visibility(bool),
    Reconnect,
    Shutdown(oneshot::Sender<()>),
}

/// Control surface of a running session.
///
/// Dropping the handle ends the session the same way
/// [`shutdown`](RealtimeHandle::shutdown) does, without waiting for it.
#[derive(Debug)]
pub struct RealtimeHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ConnectionState>,
    mock_mode: Arc<AtomicBool>,
}

impl RealtimeHandle {
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// A receiver that observes every state transition.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub fn is_mock_mode(&self) -> bool {
        self.mock_mode.load(Ordering::SeqCst)
    }

    /// True while updates are flowing, live or synthetic.
    pub fn is_connected(&self) -> bool {
        self.is_mock_mode() || self.state() == ConnectionState::Live
    }

    /// Sends `message` as JSON over the live socket.
    ///
    /// # Errors
    ///
    /// [`RealtimeError::NotConnected`] unless the session is live.
    pub async fn send<T: Serialize>(&self, message: &T) -> Result<()> {
        let text =
            serde_json::to_string(message).map_err(|e| RealtimeError::Encode(e.to_string()))?;
        let (reply, answer) = oneshot::channel();

        self.commands
            .send(Command::Send { text, reply })
            .map_err(|_| RealtimeError::NotConnected)?;
        answer.await.unwrap_or(Err(RealtimeError::NotConnected))
    }

    /// Host visibility changed. Becoming visible reconnects a session that
    /// dropped back to `Disconnected`.
    pub fn visibility_changed(&self, visible: bool) {
        let _ = self.commands.send(Command::Visibility(visible));
    }

    /// Opens a new socket unless updates are already flowing.
    pub fn reconnect(&self) {
        let _ = self.commands.send(Command::Reconnect);
    }

    /// Stops timers, closes the socket with a normal close and waits for the
    /// worker to finish. Idempotent.
    pub async fn shutdown(&self) {
        let (ack, done) = oneshot::channel();
        if self.commands.send(Command::Shutdown(ack)).is_ok() {
            let _ = done.await;
        }
    }
}

struct Worker {
    session: RealtimeSession,
    viewer: Viewer,
    url: String,
    mock_mode: Arc<AtomicBool>,
    state: watch::Sender<ConnectionState>,
    connection: Option<Box<dyn RealtimeConnection>>,
    dialing: Option<Dial>,
    keep_alive: Option<Interval>,
    feed_timer: Option<Interval>,
}

impl Worker {
    #[instrument(skip_all, fields(user_id = %self.viewer.user_id))]
    async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Command>) {
        self.connect();

        loop {
            tokio::select! {
                dialed = next_dial(&mut self.dialing) => self.on_dialed(dialed),
                frame = next_frame(&mut self.connection) => self.on_frame(frame).await,
                _ = next_tick(&mut self.keep_alive) => self.ping().await,
                _ = next_tick(&mut self.feed_timer) => self.feed_tick(),
                command = inbox.recv() => match command {
                    Some(Command::Shutdown(ack)) => {
                        self.shutdown().await;
                        let _ = ack.send(());
                        break;
                    }
                    Some(command) => self.on_command(command).await,
                    None => {
                        debug!("Handle dropped; ending session");
                        self.shutdown().await;
                        break;
                    }
                },
            }
        }

        // Late commands get NotConnected through their dropped reply channels
        inbox.close();
    }

    /// Enters `Connecting`. A live attempt is parked in `dialing` so the
    /// command inbox stays responsive while it is pending.
    fn connect(&mut self) {
        self.set_state(ConnectionState::Connecting);

        if self.mock_mode.load(Ordering::SeqCst) {
            info!("Using mock real-time updates");
            self.start_feed();
            return;
        }

        let Some(transport) = self.session.transport.clone() else {
            self.fall_back("no real-time transport configured");
            return;
        };

        let url = self.url.clone();
        let tokens = self.session.tokens.clone();
        let viewer = self.viewer.clone();
        let limit = self.session.connect_timeout;

        let dial = async move {
            let attempt = async {
                let mut connection = transport.connect(&url).await?;
                authenticate(&tokens, &viewer, &mut *connection).await?;
                Ok::<_, BridgeError>(connection)
            };
            match time::timeout(limit, attempt).await {
                Ok(result) => result,
                Err(_) => Err(BridgeError::Timeout(limit.as_millis() as u64)),
            }
        };
        self.dialing = Some(dial.boxed());
    }

    fn on_dialed(&mut self, dialed: BridgeResult<Box<dyn RealtimeConnection>>) {
        self.dialing = None;

        match dialed {
            Ok(connection) => {
                self.connection = Some(connection);
                self.keep_alive = Some(ticker(self.session.keep_alive));
                info!(url = %self.url, "WebSocket connected");
                self.set_state(ConnectionState::Live);
            }
            Err(e) => {
                error!(url = %self.url, error = %e, "Failed to open WebSocket connection");
                self.fall_back(&e.to_string());
            }
        }
    }

    async fn on_frame(&mut self, frame: Option<BridgeResult<SocketFrame>>) {
        match frame {
            Some(Ok(SocketFrame::Text(text))) => self.on_text(&text),
            Some(Ok(SocketFrame::Close { code, reason })) => {
                info!(code, reason = %reason, "WebSocket disconnected");
                if code == CloseCode::NORMAL {
                    self.drop_connection();
                    self.set_state(ConnectionState::Disconnected);
                } else {
                    self.fall_back(&format!("closed with code {code}"));
                }
            }
            Some(Err(e)) => {
                error!(error = %e, "WebSocket error");
                self.fall_back(&e.to_string());
            }
            None => {
                info!(code = CloseCode::ABNORMAL, "WebSocket stream ended");
                self.fall_back("stream ended without a close frame");
            }
        }
    }

    fn on_text(&self, text: &str) {
        match UpdateEnvelope::decode(text) {
            Ok(envelope) => self.deliver(&envelope),
            Err(e) => {
                error!(error = %e, "Failed to parse WebSocket message");
                self.emit(CoreEvent::Realtime(RealtimeEvent::MessageDropped {
                    reason: e.to_string(),
                }));
            }
        }
    }

    fn deliver(&self, envelope: &UpdateEnvelope) {
        info!(
            kind = envelope.event.kind(),
            timestamp = envelope.timestamp.as_deref().unwrap_or_default(),
            "Real-time update received"
        );

        for effect in dispatch(&envelope.event, &self.viewer) {
            if let UiEffect::Log { level, message } = &effect {
                match level {
                    EventSeverity::Error => error!("{message}"),
                    EventSeverity::Warning => warn!("{message}"),
                    EventSeverity::Info => info!("{message}"),
                    EventSeverity::Debug => debug!("{message}"),
                }
            }
            self.emit(CoreEvent::Ui(effect));
        }
    }

    async fn ping(&mut self) {
        let ping = json!({
            "type": "ping",
            "timestamp": self.session.clock.now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });

        let Some(connection) = self.connection.as_mut() else {
            return;
        };
        if let Err(e) = connection.send_text(&ping.to_string()).await {
            error!(error = %e, "Keep-alive ping failed");
            self.fall_back(&e.to_string());
        }
    }

    fn feed_tick(&self) {
        if let Some(update) = feed::draw(self.session.feed.probability, self.session.clock.as_ref())
        {
            self.deliver(&update);
        }
    }

    async fn on_command(&mut self, command: Command) {
        match command {
            Command::Send { text, reply } => {
                let result = self.send_text(&text).await;
                let _ = reply.send(result);
            }
            Command::Visibility(true) => {
                let idle = self.current() == ConnectionState::Disconnected;
                if !self.mock_mode.load(Ordering::SeqCst) && idle {
                    debug!("Visible again; reconnecting");
                    self.connect();
                }
            }
            Command::Visibility(false) => debug!("Host hidden; keeping session open"),
            Command::Reconnect => match self.current() {
                ConnectionState::Disconnected => self.connect(),
                state => debug!(%state, "Reconnect ignored"),
            },
            // Handled by the run loop
            Command::Shutdown(_) => {}
        }
    }

    async fn send_text(&mut self, text: &str) -> Result<()> {
        let live = self.current() == ConnectionState::Live;
        match self.connection.as_mut() {
            Some(connection) if live => {
                connection.send_text(text).await.map_err(RealtimeError::from)
            }
            _ => {
                warn!("WebSocket not connected, cannot send message");
                Err(RealtimeError::NotConnected)
            }
        }
    }

    async fn shutdown(&mut self) {
        if self.dialing.take().is_some() {
            debug!("Abandoning pending WebSocket connection");
        }
        self.feed_timer = None;
        self.keep_alive = None;

        if let Some(mut connection) = self.connection.take() {
            if let Err(e) = connection.close(CloseCode::NORMAL, SESSION_ENDED).await {
                warn!(error = %e, "Failed to close WebSocket cleanly");
            }
        }

        self.set_state(ConnectionState::Disconnected);
        info!("Real-time session ended");
    }

    /// Switches to the synthetic feed for the rest of the session.
    fn fall_back(&mut self, reason: &str) {
        warn!(reason, "WebSocket connection failed, falling back to mock updates");
        self.drop_connection();
        self.mock_mode.store(true, Ordering::SeqCst);
        self.start_feed();
    }

    fn start_feed(&mut self) {
        self.feed_timer = Some(ticker(self.session.feed.interval));
        debug!(
            interval_ms = self.session.feed.interval.as_millis() as u64,
            probability = self.session.feed.probability,
            "Mock real-time feed started"
        );
        self.set_state(ConnectionState::MockActive);
    }

    fn drop_connection(&mut self) {
        self.connection = None;
        self.keep_alive = None;
    }

    fn current(&self) -> ConnectionState {
        *self.state.borrow()
    }

    fn set_state(&self, to: ConnectionState) {
        let from = self.state.send_replace(to);
        if from != to {
            debug!(%from, %to, "Real-time state changed");
            self.emit(CoreEvent::Realtime(RealtimeEvent::StateChanged { from, to }));
        }
    }

    fn emit(&self, event: CoreEvent) {
        // No subscribers is fine
        let _ = self.session.events.emit(event);
    }
}

/// Sends the `auth` message that must open every live socket.
async fn authenticate(
    tokens: &TokenStore,
    viewer: &Viewer,
    connection: &mut dyn RealtimeConnection,
) -> BridgeResult<()> {
    let token = match tokens.load().await {
        Ok(token) => token,
        Err(e) => {
            warn!(error = %e, "Could not read auth token for WebSocket");
            None
        }
    };

    let auth = json!({
        "type": "auth",
        "token": token,
        "userId": viewer.user_id,
        "role": viewer.role,
    });
    connection.send_text(&auth.to_string()).await
}

fn ticker(period: Duration) -> Interval {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn next_dial(dial: &mut Option<Dial>) -> BridgeResult<Box<dyn RealtimeConnection>> {
    match dial {
        Some(dial) => dial.as_mut().await,
        None => std::future::pending().await,
    }
}

async fn next_frame(
    connection: &mut Option<Box<dyn RealtimeConnection>>,
) -> Option<BridgeResult<SocketFrame>> {
    match connection {
        Some(connection) => connection.recv().await,
        None => std::future::pending().await,
    }
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}
