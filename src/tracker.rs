//! Poll-driven pose tracker.
//!
//! Owns the receive socket and all pose state for one tracking session.
//! Each [`PoseTracker::poll`] waits at most the configured timeout for a
//! datagram, and either applies a full update or leaves state untouched.
//!
//! A session ends on [`PoseTracker::close`], on drop, or on a fatal socket
//! error. Polling a closed tracker returns [`IoError::Closed`].

use std::collections::HashMap;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::{debug, error, info, warn};

use crate::config::TrackerConfig;
use crate::decoder::decode;
use crate::error::{DecodeError, IoError};
use crate::frame::DecodedFrame;
use crate::pose::{AbsolutePose, ObjectPose, OriginPose, Pose, RelativePose};

/// Result of one poll.
#[derive(Debug)]
pub enum PollOutcome {
    /// Nothing arrived within the timeout.
    NoData,
    /// A frame was decoded; carries the new relative pose.
    Updated(RelativePose),
    /// A datagram arrived but could not be decoded. State is unchanged.
    DecodeFailed(DecodeError),
    /// The socket is unusable. The tracker is now closed.
    SocketError(IoError),
}

/// Where the tracker is in its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    /// Bound, waiting for the first frame.
    OriginUnset,
    /// Bound, origin latched.
    OriginSet,
    /// Socket released. Terminal.
    Closed,
}

/// Receives motion-capture frames and tracks one object's pose relative to
/// its takeoff point.
pub struct PoseTracker {
    socket: Option<UdpSocket>,
    local_addr: SocketAddr,
    recv_buf: Vec<u8>,
    origin: Option<OriginPose>,
    last_absolute: AbsolutePose,
    last_relative: RelativePose,
    last_frame_number: Option<u32>,
    objects: HashMap<String, ObjectPose>,
    frame_count: u64,
}

impl PoseTracker {
    /// Bind with default timeout and buffer settings.
    ///
    /// `bind_addr` may be an IP literal or a host name; a name is resolved
    /// and the first address that binds is used.
    pub fn new(bind_addr: &str, port: u16) -> Result<Self, IoError> {
        Self::with_config(&TrackerConfig {
            bind_addr: bind_addr.to_string(),
            port,
            ..TrackerConfig::default()
        })
    }

    /// Bind according to `config`.
    pub fn with_config(config: &TrackerConfig) -> Result<Self, IoError> {
        let invalid = || IoError::InvalidAddress {
            addr: config.bind_addr.clone(),
        };
        let addrs: Vec<SocketAddr> = (config.bind_addr.as_str(), config.port)
            .to_socket_addrs()
            .map_err(|_| invalid())?
            .collect();
        if addrs.is_empty() {
            return Err(invalid());
        }
        let socket = UdpSocket::bind(&addrs[..]).map_err(|source| IoError::BindFailed {
            addr: format!("{}:{}", config.bind_addr, config.port),
            source,
        })?;
        Self::from_socket(socket, config)
    }

    /// Wrap an already bound socket. Address fields of `config` are ignored.
    pub fn from_socket(socket: UdpSocket, config: &TrackerConfig) -> Result<Self, IoError> {
        let local_addr = socket.local_addr().map_err(|source| IoError::BindFailed {
            addr: "<unbound>".to_string(),
            source,
        })?;
        let setup = |source: io::Error| IoError::BindFailed {
            addr: local_addr.to_string(),
            source,
        };
        match config.poll_timeout() {
            Some(timeout) => {
                socket.set_nonblocking(false).map_err(setup)?;
                socket.set_read_timeout(Some(timeout)).map_err(setup)?;
            }
            None => socket.set_nonblocking(true).map_err(setup)?,
        }

        info!(addr = %local_addr, timeout_ms = config.poll_timeout_ms, "Listening for motion-capture frames");

        Ok(Self {
            socket: Some(socket),
            local_addr,
            recv_buf: vec![0u8; config.effective_buffer_len()],
            origin: None,
            last_absolute: Pose::ZERO,
            last_relative: Pose::ZERO,
            last_frame_number: None,
            objects: HashMap::new(),
            frame_count: 0,
        })
    }

    /// Check the socket once and apply any frame that arrived.
    pub fn poll(&mut self) -> PollOutcome {
        let Some(socket) = self.socket.as_ref() else {
            return PollOutcome::SocketError(IoError::Closed);
        };

        let len = match socket.recv_from(&mut self.recv_buf) {
            Ok((len, _src)) => len,
            Err(e) if is_no_data(&e) => return PollOutcome::NoData,
            Err(source) => {
                error!(addr = %self.local_addr, error = %source, "Socket unusable, closing tracker");
                self.close();
                return PollOutcome::SocketError(IoError::ReceiveFailed { source });
            }
        };

        let decoded = decode(&self.recv_buf[..len]);
        self.finish(decoded, len)
    }

    /// Decode and apply one datagram without touching the socket.
    ///
    /// Outcomes match [`poll`](Self::poll); a closed tracker rejects the
    /// datagram with [`IoError::Closed`].
    pub fn handle_datagram(&mut self, data: &[u8]) -> PollOutcome {
        if self.is_closed() {
            return PollOutcome::SocketError(IoError::Closed);
        }
        self.finish(decode(data), data.len())
    }

    fn finish(&mut self, decoded: Result<DecodedFrame, DecodeError>, len: usize) -> PollOutcome {
        match decoded {
            Ok(frame) => PollOutcome::Updated(self.apply(&frame)),
            Err(e) => {
                warn!(len, error = %e, "Dropping undecodable frame");
                PollOutcome::DecodeFailed(e)
            }
        }
    }

    fn apply(&mut self, frame: &DecodedFrame) -> RelativePose {
        let item = frame.primary();
        let absolute = Pose::from_item(item);

        let origin = *self.origin.get_or_insert_with(|| {
            info!(
                x = absolute.x,
                y = absolute.y,
                z = absolute.z,
                yaw = absolute.yaw,
                "Takeoff origin captured"
            );
            absolute
        });

        self.last_absolute = absolute;
        self.last_relative = absolute.relative_to(&origin);
        self.last_frame_number = Some(frame.frame_number());
        self.frame_count += 1;
        self.objects.insert(item.name.clone(), ObjectPose::from(item));

        let rel = &self.last_relative;
        debug!(
            frame = frame.frame_number(),
            object = %item.name,
            "Position [cm]: {:+3.4}, {:+3.4}, {:+3.4}  Attitude [deg]: {:+3.4}, {:+3.4}, {:+3.4}",
            rel.x, rel.y, rel.z, rel.roll, rel.pitch, rel.yaw
        );

        self.last_relative
    }

    /// Last computed relative pose; zero before the first frame.
    pub fn current_relative_pose(&self) -> RelativePose {
        self.last_relative
    }

    pub fn last_absolute(&self) -> AbsolutePose {
        self.last_absolute
    }

    pub fn origin(&self) -> Option<OriginPose> {
        self.origin
    }

    /// Number of frames successfully applied.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn last_frame_number(&self) -> Option<u32> {
        self.last_frame_number
    }

    /// Last raw sample seen for `name`.
    pub fn object(&self, name: &str) -> Option<&ObjectPose> {
        self.objects.get(name)
    }

    pub fn objects(&self) -> &HashMap<String, ObjectPose> {
        &self.objects
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn phase(&self) -> TrackerPhase {
        match (&self.socket, &self.origin) {
            (None, _) => TrackerPhase::Closed,
            (Some(_), None) => TrackerPhase::OriginUnset,
            (Some(_), Some(_)) => TrackerPhase::OriginSet,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.socket.is_none()
    }

    /// Release the socket. Later calls are no-ops.
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            info!(addr = %self.local_addr, frames = self.frame_count, "Tracker closed");
        }
    }
}

impl Drop for PoseTracker {
    fn drop(&mut self) {
        self.close();
    }
}

fn is_no_data(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}
