use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::game::rules::{parse_promotion, parse_square};
use crate::game::utils::parse_piece_code;
use crate::game::Candidate;
use crate::models::{AppState, ClientMessage, ServerMessage};
use crate::sync::{exchange, ClientSession, SyncCompletion, SyncReply, SyncTicket};
use crate::view::BoardWidget;

/// Board widget calls collected while the session runs, sent afterwards
#[derive(Default)]
struct SocketBoard {
    outbox: Vec<ServerMessage>,
}

impl BoardWidget for SocketBoard {
    fn set_position(&mut self, fen: &str) {
        self.outbox.push(ServerMessage::position(fen));
    }

    fn reset_to_start(&mut self) {
        self.outbox.push(ServerMessage::reset());
    }

    fn snapback(&mut self, from: &str, to: &str) {
        self.outbox.push(ServerMessage::snapback(from, to));
    }
}

/// WebSocket handler for one browser board
///
/// Each connection owns its session; the actor's single thread is the only
/// place the session is touched.
pub struct ChessWebSocket {
    pub id: String,
    pub app_state: web::Data<AppState>,
    session: ClientSession,
    in_flight: Option<SpawnHandle>,
}

impl ChessWebSocket {
    pub fn new(app_state: web::Data<AppState>) -> Self {
        let session = ClientSession::new(
            app_state.config.default_depth,
            app_state.config.display,
        );
        Self {
            id: Uuid::new_v4().to_string(),
            app_state,
            session,
            in_flight: None,
        }
    }
}

impl Actor for ChessWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("WebSocket connection started: {}", self.id);
        self.send(ctx, &ServerMessage::position(&self.session.state().position()));
        self.send_view(ctx);
    }

    fn stopping(&mut self, ctx: &mut Self::Context) -> Running {
        if let Some(handle) = self.in_flight.take() {
            ctx.cancel_future(handle);
        }
        info!("WebSocket connection closed: {}", self.id);
        Running::Stop
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ChessWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Text(text)) => {
                debug!("Received text message: {}", text);
                match serde_json::from_str::<ClientMessage>(text.as_ref()) {
                    Ok(client_msg) => self.handle_message(client_msg, ctx),
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        let reply = ServerMessage::error(format!("Invalid message format: {}", e));
                        self.send(ctx, &reply);
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                self.send(ctx, &ServerMessage::error("Binary messages are not supported"));
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

impl ChessWebSocket {
    fn send(&self, ctx: &mut ws::WebsocketContext<Self>, message: &ServerMessage) {
        match serde_json::to_string(message) {
            Ok(text) => ctx.text(text),
            Err(e) => warn!("Failed to serialize {} message: {}", message.message_type, e),
        }
    }

    fn send_view(&self, ctx: &mut ws::WebsocketContext<Self>) {
        self.send(ctx, &ServerMessage::view(self.session.display()));
    }

    fn flush(&self, board: SocketBoard, ctx: &mut ws::WebsocketContext<Self>) {
        for message in &board.outbox {
            self.send(ctx, message);
        }
    }

    pub fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match msg {
            ClientMessage::Pickup { square, piece } => self.handle_pickup(&square, &piece, ctx),
            ClientMessage::Drop {
                from,
                to,
                promotion,
            } => self.handle_drop(&from, &to, promotion.as_deref(), ctx),
            ClientMessage::SnapEnd => {
                let mut board = SocketBoard::default();
                self.session.snap_end(&mut board);
                self.flush(board, ctx);
            }
            ClientMessage::SetDepth { depth } => {
                let depth = self.session.set_depth(depth);
                info!("Connection {} set depth to {}", self.id, depth);
                self.send_view(ctx);
            }
            ClientMessage::Reset => self.handle_reset(ctx),
            ClientMessage::Retry => {
                if let Some(ticket) = self.session.retry() {
                    self.start_sync(ticket, ctx);
                }
                self.send_view(ctx);
            }
        }
    }

    fn handle_pickup(&mut self, square: &str, piece: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let color = parse_piece_code(piece).map(|(color, _)| color).or_else(|| {
            parse_square(square).and_then(|sq| self.session.state().board().color_on(sq))
        });
        let allowed = color.is_some_and(|color| self.session.can_pick_up(color));
        debug!("Pickup {} on {}: {}", piece, square, allowed);
        self.send(ctx, &ServerMessage::pickup(allowed));
    }

    fn handle_drop(
        &mut self,
        from: &str,
        to: &str,
        promotion: Option<&str>,
        ctx: &mut ws::WebsocketContext<Self>,
    ) {
        let (Some(from_square), Some(to_square)) = (parse_square(from), parse_square(to)) else {
            warn!("Drop with invalid squares: {} -> {}", from, to);
            self.send(ctx, &ServerMessage::snapback(from, to));
            return;
        };

        let candidate = Candidate {
            from: from_square,
            to: to_square,
            promotion: promotion.and_then(parse_promotion),
        };

        let mut board = SocketBoard::default();
        let outcome = self.session.drop_piece(candidate, &mut board);
        self.flush(board, ctx);

        if let Ok(ticket) = outcome {
            self.send_view(ctx);
            self.start_sync(ticket, ctx);
        }
    }

    fn handle_reset(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        if let Some(handle) = self.in_flight.take() {
            ctx.cancel_future(handle);
        }
        let mut board = SocketBoard::default();
        self.session.reset(&mut board);
        self.flush(board, ctx);
        self.send_view(ctx);
    }

    /// Run one exchange on the actor. A newer exchange cancels the older
    /// future; the session token check covers replies that already settled.
    fn start_sync(&mut self, ticket: SyncTicket, ctx: &mut ws::WebsocketContext<Self>) {
        if let Some(handle) = self.in_flight.take() {
            ctx.cancel_future(handle);
        }
        let service = self.app_state.analysis.clone();
        let handle = ctx.spawn(
            exchange(service, ticket)
                .into_actor(self)
                .map(|reply, act, ctx| act.finish_sync(reply, ctx)),
        );
        self.in_flight = Some(handle);
    }

    fn finish_sync(&mut self, reply: SyncReply, ctx: &mut ws::WebsocketContext<Self>) {
        let token = reply.token;
        let mut board = SocketBoard::default();
        match self.session.complete(reply, &mut board) {
            SyncCompletion::Stale => {
                debug!("Connection {} ignored stale session {}", self.id, token);
                return;
            }
            SyncCompletion::Failed(e) => {
                info!("Connection {} session {} failed: {}", self.id, token, e);
            }
            SyncCompletion::Reconciled(_) => {
                info!("Connection {} session {} reconciled", self.id, token);
            }
        }
        self.in_flight = None;
        self.flush(board, ctx);
        self.send_view(ctx);
    }
}

// WebSocket connection handler
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let ws = ChessWebSocket::new(app_state);
    info!("New WebSocket connection: {}", ws.id);
    ws::start(ws, &req, stream)
}
