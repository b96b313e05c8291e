//! Handlers for the dispatch table in [`crate::command`].

use cache22_store::{path, render_tree, PutOutcome};

use crate::command::{Flow, COMMANDS};
use crate::error::{CommandError, CommandResult};
use crate::request::{Assignment, Request};
use crate::session::Session;

fn line(out: &mut Vec<u8>, text: &str) {
    out.extend_from_slice(text.as_bytes());
    out.push(b'\n');
}

pub(crate) fn hello(_: &mut Session, req: &Request, out: &mut Vec<u8>) -> CommandResult<Flow> {
    out.extend_from_slice(b"Server: Hello '");
    out.extend_from_slice(&req.arg1);
    out.extend_from_slice(b"'!\n");
    Ok(Flow::Continue)
}

pub(crate) fn get(session: &mut Session, req: &Request, out: &mut Vec<u8>) -> CommandResult<Flow> {
    if req.arg1.is_empty() || req.arg2.is_empty() {
        return Err(CommandError::GetUsage);
    }
    let (path, key) = (req.path()?, req.key()?);
    let value = session
        .namespace()
        .read(|ns| ns.lookup(path, key).cloned())
        .ok_or_else(|| CommandError::KeyNotFound {
            key: key.to_string(),
            path: path.to_string(),
        })?;

    out.extend_from_slice(b"VALUE: ");
    out.extend_from_slice(&value);
    out.push(b'\n');
    Ok(Flow::Continue)
}

pub(crate) fn put(session: &mut Session, req: &Request, out: &mut Vec<u8>) -> CommandResult<Flow> {
    if req.arg1.is_empty() || req.arg2.is_empty() {
        return Err(CommandError::PutUsage);
    }
    let path = req.path()?;
    let assignment = Assignment::parse(&req.arg2)?;
    let summary = session
        .namespace_mut()
        .write(|ns| ns.put(path, &assignment.key, &assignment.value))?;

    let verb = match summary.outcome {
        PutOutcome::Created => "created",
        PutOutcome::Updated => "updated",
    };
    let (key, path) = (&summary.key, &summary.path);
    line(out, &format!("OK: Key '{key}' {verb} in path '{path}'."));
    Ok(Flow::Continue)
}

/// Reports whether the path exists. Nothing about the connection changes.
pub(crate) fn cd(session: &mut Session, req: &Request, out: &mut Vec<u8>) -> CommandResult<Flow> {
    if req.arg1.is_empty() {
        return Err(CommandError::CdUsage);
    }
    let path = req.path()?;
    let found = session
        .namespace()
        .read(|ns| ns.find_node(path).map(|n| n.path().to_string()))
        .ok_or_else(|| CommandError::PathNotFound(path.to_string()))?;

    line(
        out,
        &format!("OK: Changed context to node '{found}' (not persistent per client yet)."),
    );
    Ok(Flow::Continue)
}

/// Lists leaves only; child nodes are not enumerated.
pub(crate) fn ls(session: &mut Session, req: &Request, out: &mut Vec<u8>) -> CommandResult<Flow> {
    let target = if req.arg1.is_empty() {
        path::ROOT_PATH
    } else {
        req.path()?
    };

    session.namespace().read(|ns| -> CommandResult<Flow> {
        let node = ns
            .find_node(target)
            .ok_or_else(|| CommandError::PathNotFound(target.to_string()))?;

        line(out, &format!("Listing contents of '{}':", node.path()));
        if node.leaves().is_empty() {
            line(out, " (No leaves found)");
        }
        for leaf in node.leaves() {
            out.extend_from_slice(format!("  L: {} -> '", leaf.key()).as_bytes());
            out.extend_from_slice(leaf.value());
            out.extend_from_slice(b"'\n");
        }
        Ok(Flow::Continue)
    })
}

pub(crate) fn quit(_: &mut Session, _: &Request, out: &mut Vec<u8>) -> CommandResult<Flow> {
    line(out, "Server: Goodbye!");
    Ok(Flow::Quit)
}

pub(crate) fn print_tree(
    session: &mut Session,
    _: &Request,
    out: &mut Vec<u8>,
) -> CommandResult<Flow> {
    line(
        out,
        "Server: Printing entire tree to your client (debug output)...",
    );
    session.namespace().read(|ns| render_tree(ns, out));
    line(out, "Server: Tree print complete.");
    Ok(Flow::Continue)
}

pub(crate) fn help(_: &mut Session, _: &Request, out: &mut Vec<u8>) -> CommandResult<Flow> {
    line(out, "Commands:");
    let width = COMMANDS.iter().map(|c| c.usage.len()).max().unwrap_or(0);
    for spec in COMMANDS {
        line(out, &format!("  {:<width$}  {}", spec.usage, spec.summary));
    }
    Ok(Flow::Continue)
}
