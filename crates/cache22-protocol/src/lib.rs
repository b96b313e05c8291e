//! Line protocol for Cache22.
//!
//! A client sends one request per line, `COMMAND [ARG1 [ARG2...]]`, and the
//! server answers with free text followed by a `> ` prompt. Commands are
//! looked up case-sensitively in a fixed dispatch table.
//!
//! [`Session`] holds the per-connection state and turns a request line into
//! a [`Reply`]; it does no I/O, so the serving loop owns the socket and
//! decides when to stop based on [`Flow`].

pub mod command;
pub mod error;
mod handlers;
pub mod request;
pub mod session;

pub use command::{find_command, CommandSpec, Flow, Handler, COMMANDS};
pub use error::{CommandError, CommandResult};
pub use request::{Assignment, Request, MAX_REQUEST_LEN};
pub use session::{Reply, Session, Status, BANNER, HELP_HINT, PROMPT};
