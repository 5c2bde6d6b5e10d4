//! Rotation state and EXIF orientation arithmetic

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pending clockwise rotation of an image under review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Half,
    Clockwise270,
}

impl Rotation {
    /// Build from degrees; any multiple of 90 (including negatives) is accepted
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        Some(match degrees.rem_euclid(360) {
            0 => Rotation::None,
            90 => Rotation::Clockwise90,
            180 => Rotation::Half,
            _ => Rotation::Clockwise270,
        })
    }

    /// Clockwise degrees in `0..360`
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Half => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Rotation::None
    }

    /// Combine with a further rotation
    pub fn then(self, other: Rotation) -> Rotation {
        Self::from_degrees(i32::from(self.degrees()) + i32::from(other.degrees()))
            .unwrap_or_default()
    }

    pub fn rotate_clockwise(self) -> Rotation {
        self.then(Rotation::Clockwise90)
    }

    pub fn rotate_counterclockwise(self) -> Rotation {
        self.then(Rotation::Clockwise270)
    }

    /// Whether width and height trade places
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(i32::from(value))
            .ok_or_else(|| format!("{} is not a multiple of 90 degrees", value))
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// EXIF orientation: an optional horizontal mirror followed by a clockwise rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    pub mirrored: bool,
    pub rotation: Rotation,
}

impl Orientation {
    pub const NORMAL: Orientation = Orientation {
        mirrored: false,
        rotation: Rotation::None,
    };

    /// Decode the EXIF Orientation tag value (1-8)
    pub fn from_exif(value: u32) -> Option<Self> {
        let (mirrored, rotation) = match value {
            1 => (false, Rotation::None),
            2 => (true, Rotation::None),
            3 => (false, Rotation::Half),
            4 => (true, Rotation::Half),
            5 => (true, Rotation::Clockwise270),
            6 => (false, Rotation::Clockwise90),
            7 => (true, Rotation::Clockwise90),
            8 => (false, Rotation::Clockwise270),
            _ => return None,
        };
        Some(Self { mirrored, rotation })
    }

    /// Encode as the EXIF Orientation tag value (1-8)
    pub fn to_exif(&self) -> u16 {
        match (self.mirrored, self.rotation) {
            (false, Rotation::None) => 1,
            (true, Rotation::None) => 2,
            (false, Rotation::Half) => 3,
            (true, Rotation::Half) => 4,
            (true, Rotation::Clockwise270) => 5,
            (false, Rotation::Clockwise90) => 6,
            (true, Rotation::Clockwise90) => 7,
            (false, Rotation::Clockwise270) => 8,
        }
    }

    /// Orientation after the displayed image is turned further clockwise
    pub fn rotated(self, rotation: Rotation) -> Self {
        Self {
            mirrored: self.mirrored,
            rotation: self.rotation.then(rotation),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mirrored {
            write!(f, "mirrored, {}", self.rotation)
        } else {
            write!(f, "{}", self.rotation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_steps() {
        let r = Rotation::None.rotate_clockwise();
        assert_eq!(r, Rotation::Clockwise90);
        assert_eq!(r.rotate_clockwise().rotate_clockwise().rotate_clockwise(), Rotation::None);
        assert_eq!(Rotation::None.rotate_counterclockwise(), Rotation::Clockwise270);
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Clockwise270));
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::Clockwise90));
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn test_exif_values_cover_all_eight() {
        for value in 1..=8u32 {
            let orientation = Orientation::from_exif(value).unwrap();
            assert_eq!(u32::from(orientation.to_exif()), value);
        }
        assert!(Orientation::from_exif(0).is_none());
        assert!(Orientation::from_exif(9).is_none());
    }

    #[test]
    fn test_rotating_orientation() {
        let normal = Orientation::NORMAL;
        assert_eq!(normal.rotated(Rotation::Clockwise90).to_exif(), 6);
        assert_eq!(normal.rotated(Rotation::Half).to_exif(), 3);
        assert_eq!(normal.rotated(Rotation::Clockwise270).to_exif(), 8);

        // Already rotated 90 clockwise, turn another 90
        let six = Orientation::from_exif(6).unwrap();
        assert_eq!(six.rotated(Rotation::Clockwise90).to_exif(), 3);
        assert_eq!(six.rotated(Rotation::Clockwise270).to_exif(), 1);

        // The mirror flag survives rotation
        let two = Orientation::from_exif(2).unwrap();
        assert_eq!(two.rotated(Rotation::Clockwise90).to_exif(), 7);
        assert_eq!(two.rotated(Rotation::Clockwise270).to_exif(), 5);
    }

    #[test]
    fn test_rotation_serde_as_degrees() {
        let json = serde_json::to_string(&Rotation::Clockwise270).unwrap();
        assert_eq!(json, "270");
        let back: Rotation = serde_json::from_str("90").unwrap();
        assert_eq!(back, Rotation::Clockwise90);
        assert!(serde_json::from_str::<Rotation>("45").is_err());
    }
}
