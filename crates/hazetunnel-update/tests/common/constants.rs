//! Shared constants for test infrastructure

pub const COMPONENT: &str = "hazetunnel-api";

pub const VERSION_1_0_0: &str = "1.0.0";
pub const VERSION_1_1_0: &str = "1.1.0";
pub const VERSION_1_2_0: &str = "1.2.0";
pub const VERSION_2_0_0: &str = "2.0.0";

// All fixtures target linux/amd64 regardless of the host
pub const TEST_OS: &str = "linux";
pub const TEST_ARCH: &str = "x86_64";

pub const ARTIFACT_V1_0_0: &str = "hazetunnel-api-v1.0.0-linux-amd64.so";
pub const ARTIFACT_V1_1_0: &str = "hazetunnel-api-v1.1.0-linux-amd64.so";
pub const ARTIFACT_V1_2_0: &str = "hazetunnel-api-v1.2.0-linux-amd64.so";
pub const ARTIFACT_V2_0_0: &str = "hazetunnel-api-v2.0.0-linux-amd64.so";
pub const ARTIFACT_V2_0_0_ARM: &str = "hazetunnel-api-v2.0.0-linux-arm64.so";
pub const ARTIFACT_V2_0_0_MAC: &str = "hazetunnel-api-v2.0.0-darwin-amd64.dylib";
pub const ARTIFACT_V2_0_0_WIN: &str = "hazetunnel-api-v2.0.0-windows-amd64.dll";

pub const FAKE_LIBRARY_CONTENT: &[u8] = b"fake shared library content for testing";

/// SHA256 of [`FAKE_LIBRARY_CONTENT`]
pub fn fake_library_checksum() -> String {
    use sha2::{Digest, Sha256};
    format!("{:x}", Sha256::digest(FAKE_LIBRARY_CONTENT))
}

/// Path on the mock server where `file_name` is served
pub fn download_path(file_name: &str) -> String {
    format!("/download/{}", file_name)
}
