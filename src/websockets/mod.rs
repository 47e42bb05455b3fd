// Public API
pub use handler::{game_socket, WebsocketReceiveHandler};
pub use messages::{MessageType, WebSocketMessage};
pub use socket::{Connection, GameSocket, MessageHandler, SocketError};
pub use subscriber::WebSocketGameSubscriber;

// Internal modules
mod handler;
mod messages;
mod socket;
mod subscriber;
