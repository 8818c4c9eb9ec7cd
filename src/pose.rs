//! Pose types and unit conversion.

use std::ops::Sub;

use serde::Serialize;

use crate::frame::ItemRecord;

/// Source translation units (mm) to centimetres.
pub const TRANSLATION_SCALE: f64 = 0.1;

/// Position in centimetres and attitude in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

/// Pose in the tracking system's frame.
pub type AbsolutePose = Pose;

/// Takeoff reference, latched from the first decoded frame.
pub type OriginPose = Pose;

/// Offset from the origin, component-wise.
pub type RelativePose = Pose;

impl Pose {
    pub const ZERO: Pose = Pose {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        pitch: 0.0,
        roll: 0.0,
        yaw: 0.0,
    };

    /// Convert a raw item sample.
    ///
    /// Roll is rotation about x, pitch about y, yaw about z.
    pub fn from_item(item: &ItemRecord) -> Self {
        Self {
            x: item.translation.x * TRANSLATION_SCALE,
            y: item.translation.y * TRANSLATION_SCALE,
            z: item.translation.z * TRANSLATION_SCALE,
            pitch: item.rotation.y.to_degrees(),
            roll: item.rotation.x.to_degrees(),
            yaw: item.rotation.z.to_degrees(),
        }
    }

    /// `self - origin`.
    pub fn relative_to(&self, origin: &Pose) -> RelativePose {
        *self - *origin
    }
}

impl Sub for Pose {
    type Output = Pose;

    fn sub(self, rhs: Pose) -> Pose {
        Pose {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
            pitch: self.pitch - rhs.pitch,
            roll: self.roll - rhs.roll,
            yaw: self.yaw - rhs.yaw,
        }
    }
}

/// Last raw sample of a named object, as stored in the object table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ObjectPose {
    pub pos_x: f64,
    pub pos_y: f64,
    pub pos_z: f64,
    pub rot_x: f64,
    pub rot_y: f64,
    pub rot_z: f64,
}

impl From<&ItemRecord> for ObjectPose {
    fn from(item: &ItemRecord) -> Self {
        Self {
            pos_x: item.translation.x,
            pos_y: item.translation.y,
            pos_z: item.translation.z,
            rot_x: item.rotation.x,
            rot_y: item.rotation.y,
            rot_z: item.rotation.z,
        }
    }
}
