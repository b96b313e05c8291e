use crate::error::{CommandError, CommandResult};

/// Longest request the server reads in one go, in bytes.
///
/// A longer line is not rejected: whatever does not fit is read as the
/// next request.
pub const MAX_REQUEST_LEN: usize = 255;

/// One tokenized request line: `COMMAND [ARG1 [ARG2...]]`.
///
/// `command` and `arg1` are whitespace-delimited tokens. `arg2` is the rest
/// of the line after the whitespace that follows `arg1`, up to but not
/// including the first `\n` or `\r`; embedded whitespace is kept. Missing
/// fields are empty.
///
/// Arguments stay raw bytes. A path or key is only turned into text by
/// [`Request::path`] and [`Request::key`], which refuse invalid UTF-8 so
/// that two different byte strings never name the same entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Request {
    pub command: String,
    pub arg1: Vec<u8>,
    pub arg2: Vec<u8>,
}

/// Whitespace as the C locale defines it.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn skip_space(input: &[u8]) -> &[u8] {
    let start = input
        .iter()
        .position(|b| !is_space(*b))
        .unwrap_or(input.len());
    &input[start..]
}

/// Split off the leading token; returns `(token, rest)`.
fn token(input: &[u8]) -> (&[u8], &[u8]) {
    let input = skip_space(input);
    let end = input
        .iter()
        .position(|b| is_space(*b))
        .unwrap_or(input.len());
    input.split_at(end)
}

impl Request {
    /// Tokenize at most [`MAX_REQUEST_LEN`] bytes of `line`.
    pub fn parse(line: &[u8]) -> Self {
        let line = &line[..line.len().min(MAX_REQUEST_LEN)];

        let (command, rest) = token(line);
        let (arg1, rest) = token(rest);
        let rest = skip_space(rest);
        let end = rest
            .iter()
            .position(|b| *b == b'\n' || *b == b'\r')
            .unwrap_or(rest.len());

        Self {
            command: String::from_utf8_lossy(command).into_owned(),
            arg1: arg1.to_vec(),
            arg2: rest[..end].to_vec(),
        }
    }

    /// `true` for a line with no command at all.
    pub fn is_blank(&self) -> bool {
        self.command.is_empty()
    }

    /// `arg1` as a path.
    pub fn path(&self) -> CommandResult<&str> {
        std::str::from_utf8(&self.arg1).map_err(|_| CommandError::InvalidUtf8)
    }

    /// `arg2` as a key, for commands that take one.
    pub fn key(&self) -> CommandResult<&str> {
        std::str::from_utf8(&self.arg2).map_err(|_| CommandError::InvalidUtf8)
    }
}

/// A `key=value` payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: Vec<u8>,
}

impl Assignment {
    /// Split on the first `=`. The key cannot contain `=`; the value can.
    ///
    /// # Examples
    ///
    /// ```
    /// use cache22_protocol::Assignment;
    ///
    /// let a = Assignment::parse(b"token=a=b").unwrap();
    /// assert_eq!(a.key, "token");
    /// assert_eq!(a.value, b"a=b");
    /// assert!(Assignment::parse(b"novalue").is_err());
    /// ```
    pub fn parse(payload: &[u8]) -> CommandResult<Self> {
        let split = payload
            .iter()
            .position(|b| *b == b'=')
            .ok_or(CommandError::MissingDelimiter)?;
        let (key, value) = (&payload[..split], &payload[split + 1..]);
        if key.is_empty() || value.is_empty() {
            return Err(CommandError::EmptyKeyOrValue);
        }
        let key = std::str::from_utf8(key).map_err(|_| CommandError::InvalidUtf8)?;
        Ok(Self {
            key: key.to_string(),
            value: value.to_vec(),
        })
    }
}
