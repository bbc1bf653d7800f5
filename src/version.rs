use ash::vk;
use std::fmt::{Display, Formatter};

/// Packed Vulkan version split into its components. The variant field is always zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const V1_0_0: Version = Version::new(1, 0, 0);
    pub const V1_1_0: Version = Version::new(1, 1, 0);
    pub const V1_2_0: Version = Version::new(1, 2, 0);
    pub const V1_3_0: Version = Version::new(1, 3, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl From<Version> for u32 {
    fn from(version: Version) -> Self {
        vk::make_api_version(0, version.major, version.minor, version.patch)
    }
}

impl From<u32> for Version {
    fn from(version: u32) -> Self {
        Self {
            major: vk::api_version_major(version),
            minor: vk::api_version_minor(version),
            patch: vk::api_version_patch(version),
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_like_vulkan() {
        assert_eq!(u32::from(Version::V1_0_0), vk::API_VERSION_1_0);
        assert_eq!(u32::from(Version::V1_3_0), vk::API_VERSION_1_3);
        assert_eq!(Version::from(vk::API_VERSION_1_2), Version::V1_2_0);
    }

    #[test]
    fn displays_dotted() {
        assert_eq!(Version::new(1, 2, 197).to_string(), "1.2.197");
    }

    #[test]
    fn orders_by_component() {
        assert!(Version::V1_0_0 < Version::V1_1_0);
        assert!(Version::new(1, 1, 9) < Version::V1_2_0);
    }
}
