//! Adafruit IO "create data" request over any byte stream
//!
//! Only the single call the monitor needs is implemented: append one value
//! to a feed with `POST /api/v2/{username}/feeds/{feed}/data`. The connection
//! itself belongs to the caller, which must wrap it in TLS: the account key
//! travels in a header.

use core::fmt::Write as _;

use embedded_io_async::{Error as _, Read, Write};
use log::{debug, warn};

use super::{FeedKey, UploadError};

/// Adafruit IO REST host
pub const AIO_HOST: &str = "io.adafruit.com";

/// HTTPS port
pub const AIO_PORT: u16 = 443;

/// Room for `{"value":}` around the longest `f32` rendering
const BODY_CAPACITY: usize = 64;

/// Longest status line inspected when parsing a response
const STATUS_LINE_CAPACITY: usize = 64;

/// Credentials for one Adafruit IO account
#[derive(Debug, Clone, Copy)]
pub struct AdafruitIoRequest<'a> {
    pub username: &'a str,
    pub key: &'a str,
}

impl<'a> AdafruitIoRequest<'a> {
    pub const fn new(username: &'a str, key: &'a str) -> Self {
        Self { username, key }
    }

    /// Write the request for appending `value` to `feed`
    pub async fn write<W: Write>(
        &self,
        conn: &mut W,
        feed: &FeedKey,
        value: f32,
    ) -> Result<(), UploadError> {
        if !value.is_finite() {
            return Err(UploadError::NonFiniteValue);
        }

        let mut body = heapless::String::<BODY_CAPACITY>::new();
        write!(body, "{{\"value\":{}}}", value).map_err(|_| UploadError::ValueTooLong)?;

        let mut content_length = heapless::String::<8>::new();
        let _ = write!(content_length, "{}", body.len());

        let parts: [&str; 15] = [
            "POST /api/v2/",
            self.username,
            "/feeds/",
            feed.as_str(),
            "/data HTTP/1.1\r\nHost: ",
            AIO_HOST,
            "\r\nX-AIO-Key: ",
            self.key,
            "\r\nContent-Type: application/json\r\n",
            "Content-Length: ",
            content_length.as_str(),
            "\r\n",
            "Connection: close\r\n",
            "\r\n",
            body.as_str(),
        ];

        for part in parts {
            conn.write_all(part.as_bytes()).await.map_err(|e| {
                warn!("Uplink write failed: {:?}", e.kind());
                UploadError::Connection("write failed")
            })?;
        }
        conn.flush().await.map_err(|e| {
            warn!("Uplink flush failed: {:?}", e.kind());
            UploadError::Connection("flush failed")
        })?;

        debug!("Sent {} to feed {}", body.as_str(), feed);
        Ok(())
    }

    /// Write the request, read the response status and map it to a result
    pub async fn send<C: Read + Write>(
        &self,
        conn: &mut C,
        feed: &FeedKey,
        value: f32,
    ) -> Result<(), UploadError> {
        self.write(conn, feed, value).await?;
        match read_status(conn).await? {
            200..=299 => Ok(()),
            code => Err(UploadError::Status(code)),
        }
    }
}

/// Read and parse an HTTP status line such as `HTTP/1.1 200 OK`
pub async fn read_status<R: Read>(conn: &mut R) -> Result<u16, UploadError> {
    let mut line = [0u8; STATUS_LINE_CAPACITY];
    let mut filled = 0;

    while filled < line.len() && !line[..filled].contains(&b'\n') {
        let n = conn.read(&mut line[filled..]).await.map_err(|e| {
            warn!("Uplink read failed: {:?}", e.kind());
            UploadError::Connection("read failed")
        })?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    let text = core::str::from_utf8(&line[..filled]).map_err(|_| UploadError::MalformedResponse)?;
    let mut fields = text.split_ascii_whitespace();

    match (fields.next(), fields.next()) {
        (Some(version), Some(code)) if version.starts_with("HTTP/") => code
            .parse::<u16>()
            .map_err(|_| UploadError::MalformedResponse),
        _ => Err(UploadError::MalformedResponse),
    }
}
