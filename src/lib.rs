//! Vicon motion-capture receiver.
//!
//! Decodes the tracking system's fixed 160-byte UDP frames and tracks a
//! drone's pose relative to its takeoff point:
//!
//! - [`decode`]: pure byte-buffer to [`DecodedFrame`] transform
//! - [`PoseTracker`]: owns the receive socket, polls it with a bounded wait
//!   and maintains origin/absolute/relative poses
//!
//! # Example
//!
//! ```no_run
//! use vicon_receiver::{PollOutcome, PoseTracker};
//!
//! let mut tracker = PoseTracker::new("0.0.0.0", 51001)?;
//! loop {
//!     match tracker.poll() {
//!         PollOutcome::Updated(rel) => println!("x={:+.2} cm yaw={:+.2} deg", rel.x, rel.yaw),
//!         PollOutcome::NoData | PollOutcome::DecodeFailed(_) => {}
//!         PollOutcome::SocketError(e) => return Err(e),
//!     }
//! }
//! # Ok::<(), vicon_receiver::IoError>(())
//! ```

mod config;
mod decoder;
mod error;
mod frame;
mod pose;
mod tracker;

pub use config::{ConfigError, TrackerConfig};
pub use decoder::{decode, decode_name};
pub use error::{DecodeError, IoError};
pub use frame::{DecodedFrame, FrameHeader, ItemRecord, Vec3, FRAME_LEN, ITEMS_PER_FRAME, NAME_LEN};
pub use pose::{AbsolutePose, ObjectPose, OriginPose, Pose, RelativePose, TRANSLATION_SCALE};
pub use tracker::{PollOutcome, PoseTracker, TrackerPhase};
