use bytes::Bytes;
use cache22_store::NamespaceHandle;
use tracing::debug;

use crate::command::{find_command, Flow};
use crate::error::CommandError;
use crate::request::Request;

/// Written after every reply.
pub const PROMPT: &[u8] = b"> ";

/// First line a client sees.
pub const BANNER: &str = "100 Connected to Cache22 server.\n";

/// Second line a client sees.
pub const HELP_HINT: &str = "Type 'HELP' for commands, 'QUIT' to disconnect.\n";

/// Whether the command succeeded. Only used for logging; the client learns
/// the outcome from the reply text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

/// Everything produced by one request.
#[derive(Clone, Debug)]
pub struct Reply {
    /// Reply text, prompt included.
    pub bytes: Bytes,
    pub flow: Flow,
    pub status: Status,
}

/// Protocol state for one connection.
///
/// Owns the connection's namespace handle; each request is parsed,
/// dispatched and answered synchronously.
#[derive(Debug)]
pub struct Session {
    namespace: NamespaceHandle,
    requests: u64,
}

impl Session {
    pub fn new(namespace: NamespaceHandle) -> Self {
        Self {
            namespace,
            requests: 0,
        }
    }

    pub fn namespace(&self) -> &NamespaceHandle {
        &self.namespace
    }

    pub fn namespace_mut(&mut self) -> &mut NamespaceHandle {
        &mut self.namespace
    }

    /// Requests handled so far, blank lines included.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Banner, help hint and the first prompt.
    pub fn greeting(&self) -> Bytes {
        let mut out = Vec::with_capacity(BANNER.len() + HELP_HINT.len() + PROMPT.len());
        out.extend_from_slice(BANNER.as_bytes());
        out.extend_from_slice(HELP_HINT.as_bytes());
        out.extend_from_slice(PROMPT);
        Bytes::from(out)
    }

    /// Parse and run one request line.
    pub fn handle(&mut self, line: &[u8]) -> Reply {
        self.requests += 1;
        let request = Request::parse(line);
        let mut out = Vec::new();

        if request.is_blank() {
            write_error(&mut out, &CommandError::EmptyCommand);
            out.extend_from_slice(PROMPT);
            return Reply {
                bytes: Bytes::from(out),
                flow: Flow::Continue,
                status: Status::Failure,
            };
        }

        let (status, flow) = match find_command(&request.command) {
            Some(spec) => match (spec.handler)(self, &request, &mut out) {
                Ok(flow) => (Status::Success, flow),
                Err(err) => {
                    write_error(&mut out, &err);
                    (Status::Failure, Flow::Continue)
                }
            },
            None => {
                let err = CommandError::UnknownCommand(request.command.clone());
                write_error(&mut out, &err);
                (Status::Failure, Flow::Continue)
            }
        };
        debug!(command = %request.command, ?status, ?flow, "request handled");

        out.extend_from_slice(PROMPT);
        Reply {
            bytes: Bytes::from(out),
            flow,
            status,
        }
    }
}

fn write_error(out: &mut Vec<u8>, err: &CommandError) {
    out.extend_from_slice(format!("ERROR: {err}\n").as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache22_store::{IsolationMode, Limits, Lookup, Namespace};

    fn session() -> Session {
        Session::new(NamespaceHandle::default())
    }

    fn run(session: &mut Session, line: &str) -> String {
        let reply = session.handle(line.as_bytes());
        String::from_utf8(reply.bytes.to_vec()).unwrap()
    }

    // -----------------------------------------------------------------------
    // Framing
    // -----------------------------------------------------------------------

    #[test]
    fn greeting_ends_with_prompt() {
        let greeting = session().greeting();
        assert!(greeting.starts_with(b"100 Connected to Cache22 server.\n"));
        assert!(greeting.ends_with(b"> "));
    }

    #[test]
    fn blank_line_reprompts() {
        let mut s = session();
        let reply = s.handle(b"\r\n");
        assert_eq!(reply.bytes.as_ref(), b"ERROR: Please enter a command.\n> ");
        assert_eq!(reply.status, Status::Failure);
        assert_eq!(reply.flow, Flow::Continue);
    }

    #[test]
    fn unknown_command() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "FROB /a\n"),
            "ERROR: Unknown command 'FROB'. Type QUIT to exit.\n> "
        );
        // Case matters.
        let reply = run(&mut s, "get /a k\n");
        assert!(reply.starts_with("ERROR: Unknown command 'get'"));
    }

    #[test]
    fn every_reply_ends_with_prompt() {
        let mut s = session();
        let lines = [
            "hello x",
            "GET",
            "PUT /a k=v",
            "CD /nope",
            "LS",
            "PRINT_TREE",
            "HELP",
            "QUIT",
        ];
        for line in lines {
            assert!(run(&mut s, line).ends_with("> "), "{line}");
        }
        assert_eq!(s.requests(), 8);
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    #[test]
    fn hello_echoes_first_argument() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "hello world ignored\n"),
            "Server: Hello 'world'!\n> "
        );
        assert_eq!(run(&mut s, "hello\n"), "Server: Hello ''!\n> ");
    }

    #[test]
    fn put_then_get() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "PUT /a/b k=v1\n"),
            "OK: Key 'k' created in path '/a/b'.\n> "
        );
        assert_eq!(run(&mut s, "GET /a/b k\n"), "VALUE: v1\n> ");
    }

    #[test]
    fn put_twice_updates() {
        let mut s = session();
        run(&mut s, "PUT /a/b k=v1\n");
        assert_eq!(
            run(&mut s, "PUT /a/b k=v2\n"),
            "OK: Key 'k' updated in path '/a/b'.\n> "
        );
        assert_eq!(run(&mut s, "GET /a/b k\n"), "VALUE: v2\n> ");
        assert_eq!(s.namespace().read(|ns| ns.leaf_count()), 1);
    }

    #[test]
    fn put_value_keeps_equals_and_spaces() {
        let mut s = session();
        run(&mut s, "PUT /cfg url=a=b c\r\n");
        assert_eq!(run(&mut s, "GET /cfg url\n"), "VALUE: a=b c\n> ");
    }

    #[test]
    fn get_errors() {
        let mut s = session();
        run(&mut s, "PUT /a/b k=v\n");
        assert_eq!(
            run(&mut s, "GET /a/b nosuch\n"),
            "ERROR: Key 'nosuch' not found in path '/a/b'.\n> "
        );
        assert_eq!(
            run(&mut s, "GET /a/b\n"),
            "ERROR: GET command requires a path and a key. Usage: GET <path> <key>\n> "
        );
    }

    #[test]
    fn repeated_get_is_stable() {
        let mut s = session();
        run(&mut s, "PUT /a k=v\n");
        let first = run(&mut s, "GET /a k\n");
        let second = run(&mut s, "GET /a k\n");
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_put_is_rejected_without_side_effects() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "PUT /a/b novalue\n"),
            "ERROR: PUT value must be in key=value format.\n> "
        );
        assert_eq!(
            run(&mut s, "PUT /a/b =v\n"),
            "ERROR: Key or Value cannot be empty in PUT command.\n> "
        );
        assert_eq!(
            run(&mut s, "PUT /a/b\n"),
            "ERROR: PUT command requires a path and a key=value pair. Usage: PUT <path> <key>=<value>\n> "
        );
        assert_eq!(
            s.namespace().read(|ns| (ns.node_count(), ns.leaf_count())),
            (1, 0)
        );
    }

    #[test]
    fn distinct_invalid_paths_do_not_share_a_node() {
        let mut s = session();
        let first = s.handle(b"PUT /\xff k=one\n");
        let second = s.handle(b"PUT /\xfe k=two\n");
        for reply in [&first, &second] {
            assert_eq!(
                reply.bytes.as_ref(),
                b"ERROR: Path and key must be valid UTF-8.\n> "
            );
            assert_eq!(reply.status, Status::Failure);
        }
        assert_eq!(
            s.namespace().read(|ns| (ns.node_count(), ns.leaf_count())),
            (1, 0)
        );
    }

    const INVALID_UTF8: &[u8] = b"ERROR: Path and key must be valid UTF-8.";

    #[test]
    fn distinct_invalid_keys_do_not_share_a_leaf() {
        let mut s = session();
        let first = s.handle(b"PUT /x \xff=one\n");
        let second = s.handle(b"PUT /x \xfe=two\n");
        assert!(first.bytes.starts_with(INVALID_UTF8));
        assert!(second.bytes.starts_with(INVALID_UTF8));
        assert_eq!(s.namespace().read(|ns| ns.leaf_count()), 0);

        let lines = [
            &b"GET /\xff k\n"[..],
            b"GET /x \xff\n",
            b"CD /\xff\n",
            b"LS /\xff\n",
        ];
        for line in lines {
            let reply = s.handle(line);
            assert!(reply.bytes.starts_with(INVALID_UTF8));
        }
    }

    #[test]
    fn utf8_paths_and_keys_round_trip() {
        let mut s = session();
        assert_eq!(
            run(&mut s, "PUT /café clé=v\n"),
            "OK: Key 'clé' created in path '/café'.\n> "
        );
        assert_eq!(run(&mut s, "GET /café clé\n"), "VALUE: v\n> ");
    }

    #[test]
    fn hello_echoes_raw_bytes() {
        let mut s = session();
        let reply = s.handle(b"hello \xff\n");
        assert_eq!(reply.bytes.as_ref(), b"Server: Hello '\xff'!\n> ");
    }

    #[test]
    fn print_tree_keeps_the_separator_for_root_leaves() {
        let mut s = session();
        run(&mut s, "PUT / top=1\n");
        let out = run(&mut s, "PRINT_TREE\n");
        assert!(out.contains("\n/\n  //top ->'1'\n"), "{out}");
    }

    #[test]
    fn put_reports_capacity_errors() {
        let limits = Limits {
            max_nodes: 2,
            ..Limits::default()
        };
        let ns = Namespace::with_config(Lookup::Indexed, limits);
        let mut s = Session::new(NamespaceHandle::new(ns, IsolationMode::Snapshot));
        let reply = run(&mut s, "PUT /a/b k=v\n");
        let expected = "ERROR: Failed to allocate memory for path node '/a/b'";
        assert!(reply.starts_with(expected), "{reply}");
        // The first segment stays.
        assert!(run(&mut s, "CD /a\n").starts_with("OK:"));
    }

    #[test]
    fn cd_reports_without_changing_anything() {
        let mut s = session();
        run(&mut s, "PUT /a/b k=v\n");
        assert_eq!(
            run(&mut s, "CD /a/b\n"),
            "OK: Changed context to node '/a/b' (not persistent per client yet).\n> "
        );
        assert_eq!(
            run(&mut s, "CD /zzz\n"),
            "ERROR: Path '/zzz' not found.\n> "
        );
        assert_eq!(
            run(&mut s, "CD\n"),
            "ERROR: CD command requires a path. Usage: CD <path>\n> "
        );
        // Still relative to nothing: LS with no path lists the root.
        assert!(run(&mut s, "LS\n").starts_with("Listing contents of '/':"));
    }

    #[test]
    fn ls_lists_leaves_in_order() {
        let mut s = session();
        run(&mut s, "PUT /a/b k1=v1\n");
        run(&mut s, "PUT /a/b k2=v2\n");
        assert_eq!(
            run(&mut s, "LS /a/b\n"),
            "Listing contents of '/a/b':\n  L: k1 -> 'v1'\n  L: k2 -> 'v2'\n> "
        );
        assert_eq!(
            run(&mut s, "LS /a\n"),
            "Listing contents of '/a':\n (No leaves found)\n> "
        );
        assert_eq!(
            run(&mut s, "LS /nope\n"),
            "ERROR: Path '/nope' not found.\n> "
        );
    }

    #[test]
    fn quit_says_goodbye_and_stops() {
        let mut s = session();
        let reply = s.handle(b"QUIT\n");
        assert_eq!(reply.bytes.as_ref(), b"Server: Goodbye!\n> ");
        assert_eq!(reply.flow, Flow::Quit);
        assert_eq!(reply.status, Status::Success);
    }

    #[test]
    fn print_tree_wraps_the_dump() {
        let mut s = session();
        run(&mut s, "PUT /Users/login pushkar=abs77301aa\n");
        let out = run(&mut s, "PRINT_TREE\n");
        let expected = "\
Server: Printing entire tree to your client (debug output)...
/
  /Users
    /Users/login
      /Users/login/pushkar ->'abs77301aa'
Server: Tree print complete.
> ";
        assert_eq!(out, expected);
    }

    #[test]
    fn help_lists_every_command() {
        let mut s = session();
        let out = run(&mut s, "HELP\n");
        for name in ["hello", "GET", "PUT", "CD", "LS", "QUIT", "PRINT_TREE"] {
            assert!(out.contains(name), "missing {name}");
        }
    }

    #[test]
    fn binary_values_pass_through() {
        let mut s = session();
        let mut line = b"PUT /bin k=".to_vec();
        line.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        line.push(b'\n');
        s.handle(&line);
        let reply = s.handle(b"GET /bin k\n");
        assert_eq!(reply.bytes.as_ref(), b"VALUE: \xde\xad\xbe\xef\n> ");
    }
}
