//! The per-connection read, dispatch and reply loop.

use std::io::ErrorKind;
use std::net::SocketAddr;

use cache22_protocol::{Flow, Session, MAX_REQUEST_LEN};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

/// How a connection ended without an I/O error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Closed {
    /// The client closed its side.
    Eof,
    /// The client sent `QUIT`.
    Quit,
}

/// Run one client to completion and log the outcome.
///
/// Errors end only this connection.
pub async fn serve_connection<S>(stream: S, peer: SocketAddr, mut session: Session)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    info!(peer = %peer, "client connected");
    match run(stream, &mut session).await {
        Ok(closed) => info!(
            peer = %peer,
            requests = session.requests(),
            reason = ?closed,
            "client disconnected"
        ),
        Err(e) => warn!(
            peer = %peer,
            requests = session.requests(),
            error = %e,
            "connection closed on I/O error"
        ),
    }
}

/// Send the greeting, then answer requests until EOF or `QUIT`.
///
/// Each read takes at most [`MAX_REQUEST_LEN`] bytes and stops early at a
/// newline; the rest of a longer line is read as the next request.
pub async fn run<S>(stream: S, session: &mut Session) -> std::io::Result<Closed>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut line = Vec::with_capacity(MAX_REQUEST_LEN);

    writer.write_all(&session.greeting()).await?;

    loop {
        let read = (&mut reader)
            .take(MAX_REQUEST_LEN as u64)
            .read_until(b'\n', &mut line)
            .await;
        match read {
            Ok(0) if line.is_empty() => return Ok(Closed::Eof),
            Ok(_) => {}
            // Bytes read before the interruption stay in `line`.
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }

        let reply = session.handle(&line);
        line.clear();
        writer.write_all(&reply.bytes).await?;
        if reply.flow == Flow::Quit {
            writer.shutdown().await?;
            return Ok(Closed::Quit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache22_store::NamespaceHandle;
    use tokio::io::duplex;

    async fn read_until_prompt<R: AsyncRead + Unpin>(r: &mut R) -> String {
        let mut buf = Vec::new();
        let mut byte = [0u8; 1];
        while !buf.ends_with(b"> ") {
            let n = r.read(&mut byte).await.unwrap();
            assert!(
                n > 0,
                "stream closed before prompt: {:?}",
                String::from_utf8_lossy(&buf)
            );
            buf.push(byte[0]);
        }
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn greeting_then_quit() {
        let (mut client, server) = duplex(4096);
        let task = tokio::spawn(async move {
            let mut session = Session::new(NamespaceHandle::default());
            run(server, &mut session).await
        });

        let greeting = read_until_prompt(&mut client).await;
        assert!(greeting.starts_with("100 Connected to Cache22 server.\n"));

        client.write_all(b"QUIT\n").await.unwrap();
        assert_eq!(read_until_prompt(&mut client).await, "Server: Goodbye!\n> ");
        assert_eq!(task.await.unwrap().unwrap(), Closed::Quit);
    }

    #[tokio::test]
    async fn eof_is_graceful() {
        let (mut client, server) = duplex(4096);
        let task = tokio::spawn(async move {
            let mut session = Session::new(NamespaceHandle::default());
            run(server, &mut session).await
        });
        read_until_prompt(&mut client).await;
        drop(client);
        assert_eq!(task.await.unwrap().unwrap(), Closed::Eof);
    }

    #[tokio::test]
    async fn last_line_without_newline_is_answered() {
        let (mut client, server) = duplex(4096);
        let task = tokio::spawn(async move {
            let mut session = Session::new(NamespaceHandle::default());
            run(server, &mut session).await
        });
        read_until_prompt(&mut client).await;
        client.write_all(b"hello there").await.unwrap();
        client.shutdown().await.unwrap();
        assert_eq!(
            read_until_prompt(&mut client).await,
            "Server: Hello 'there'!\n> "
        );
        assert_eq!(task.await.unwrap().unwrap(), Closed::Eof);
    }

    #[tokio::test]
    async fn long_line_is_split_into_requests() {
        let (mut client, server) = duplex(4096);
        let task = tokio::spawn(async move {
            let mut session = Session::new(NamespaceHandle::default());
            let closed = run(server, &mut session).await;
            (closed, session.requests())
        });
        read_until_prompt(&mut client).await;

        // 255 bytes of the first request, then "QUIT\n" as the second.
        let mut line = b"hello ".to_vec();
        line.resize(MAX_REQUEST_LEN, b'x');
        line.extend_from_slice(b"QUIT\n");
        client.write_all(&line).await.unwrap();

        let first = read_until_prompt(&mut client).await;
        assert!(first.starts_with("Server: Hello 'xxx"));
        assert_eq!(read_until_prompt(&mut client).await, "Server: Goodbye!\n> ");

        let (closed, requests) = task.await.unwrap();
        assert_eq!(closed.unwrap(), Closed::Quit);
        assert_eq!(requests, 2);
    }
}
