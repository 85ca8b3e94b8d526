//! Adafruit IO uploads over TLS on an `embassy-net` TCP socket
//!
//! The session is encrypted but the server certificate is not checked.

use co2_sparkline::uplink::{AIO_HOST, AIO_PORT, AdafruitIoRequest, FeedKey, UploadError, Uploader};
use embassy_net::Stack;
use embassy_net::dns::DnsQueryType;
use embassy_net::tcp::TcpSocket;
use embassy_time::Duration;
use embedded_tls::{Aes128GcmSha256, TlsConfig, TlsConnection, TlsContext, UnsecureProvider};
use esp_hal::rng::Trng;
use log::warn;
use static_cell::StaticCell;

const SOCKET_BUFFER_LEN: usize = 1024;
const SOCKET_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest TLS record a server may send
const TLS_READ_BUFFER_LEN: usize = 16640;
const TLS_WRITE_BUFFER_LEN: usize = 4096;

/// Record buffers for the uploader's TLS session
pub struct TlsBuffers {
    read: &'static mut [u8],
    write: &'static mut [u8],
}

impl TlsBuffers {
    /// Takes the static record buffers. Panics if called twice.
    pub fn take() -> Self {
        static READ: StaticCell<[u8; TLS_READ_BUFFER_LEN]> = StaticCell::new();
        static WRITE: StaticCell<[u8; TLS_WRITE_BUFFER_LEN]> = StaticCell::new();
        Self {
            read: READ.init([0; TLS_READ_BUFFER_LEN]),
            write: WRITE.init([0; TLS_WRITE_BUFFER_LEN]),
        }
    }
}

/// One short-lived TLS connection per upload
pub struct TcpUploader<'d> {
    stack: Stack<'d>,
    request: AdafruitIoRequest<'d>,
    rng: Trng,
    tls: TlsBuffers,
    rx: [u8; SOCKET_BUFFER_LEN],
    tx: [u8; SOCKET_BUFFER_LEN],
}

impl<'d> TcpUploader<'d> {
    pub fn new(
        stack: Stack<'d>,
        request: AdafruitIoRequest<'d>,
        rng: Trng,
        tls: TlsBuffers,
    ) -> Self {
        Self {
            stack,
            request,
            rng,
            tls,
            rx: [0; SOCKET_BUFFER_LEN],
            tx: [0; SOCKET_BUFFER_LEN],
        }
    }
}

impl Uploader for TcpUploader<'_> {
    async fn upload(&mut self, feed: &FeedKey, value: f32) -> Result<(), UploadError> {
        let addresses = self
            .stack
            .dns_query(AIO_HOST, DnsQueryType::A)
            .await
            .map_err(|e| {
                warn!("DNS lookup for {} failed: {:?}", AIO_HOST, e);
                UploadError::Connection("dns lookup failed")
            })?;
        let address = addresses
            .first()
            .copied()
            .ok_or(UploadError::Connection("no address for host"))?;

        let mut socket = TcpSocket::new(self.stack, &mut self.rx, &mut self.tx);
        socket.set_timeout(Some(SOCKET_TIMEOUT));
        socket.connect((address, AIO_PORT)).await.map_err(|e| {
            warn!("Connecting to {} failed: {:?}", AIO_HOST, e);
            UploadError::Connection("connect failed")
        })?;

        let config = TlsConfig::new()
            .with_server_name(AIO_HOST)
            .enable_rsa_signatures();
        let mut tls: TlsConnection<'_, _, Aes128GcmSha256> =
            TlsConnection::new(&mut socket, &mut *self.tls.read, &mut *self.tls.write);

        let result = match tls
            .open(TlsContext::new(
                &config,
                UnsecureProvider::new::<Aes128GcmSha256>(&mut self.rng),
            ))
            .await
        {
            Ok(()) => self.request.send(&mut tls, feed, value).await,
            Err(e) => {
                warn!("TLS handshake with {} failed: {:?}", AIO_HOST, e);
                Err(UploadError::Connection("tls handshake failed"))
            }
        };

        if let Err((_, e)) = tls.close().await {
            warn!("Closing TLS session failed: {:?}", e);
        }
        socket.close();
        result
    }
}
