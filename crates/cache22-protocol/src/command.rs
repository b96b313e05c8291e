use crate::error::CommandResult;
use crate::handlers;
use crate::request::Request;
use crate::session::Session;

/// What the serving loop should do after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Close this connection once the reply is written.
    Quit,
}

/// A command handler. Writes its reply into the buffer; an `Err` is
/// rendered by the session as an `ERROR:` line.
pub type Handler = fn(&mut Session, &Request, &mut Vec<u8>) -> CommandResult<Flow>;

/// One row of the dispatch table.
pub struct CommandSpec {
    /// Matched case-sensitively against the first token.
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: Handler,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .finish()
    }
}

/// The fixed dispatch table.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "hello",
        usage: "hello <name>",
        summary: "Greet the server",
        handler: handlers::hello,
    },
    CommandSpec {
        name: "GET",
        usage: "GET <path> <key>",
        summary: "Read the value stored under a key",
        handler: handlers::get,
    },
    CommandSpec {
        name: "PUT",
        usage: "PUT <path> <key>=<value>",
        summary: "Create or update a key, creating the path as needed",
        handler: handlers::put,
    },
    CommandSpec {
        name: "CD",
        usage: "CD <path>",
        summary: "Check that a path exists",
        handler: handlers::cd,
    },
    CommandSpec {
        name: "LS",
        usage: "LS [<path>]",
        summary: "List the keys under a path (default /)",
        handler: handlers::ls,
    },
    CommandSpec {
        name: "QUIT",
        usage: "QUIT",
        summary: "Disconnect",
        handler: handlers::quit,
    },
    CommandSpec {
        name: "PRINT_TREE",
        usage: "PRINT_TREE",
        summary: "Dump every path and key",
        handler: handlers::print_tree,
    },
    CommandSpec {
        name: "HELP",
        usage: "HELP",
        summary: "Show this list",
        handler: handlers::help,
    },
];

/// Find the handler for `name`.
pub fn find_command(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}
