//! # Filename Module
//!
//! Tells user-named files apart from camera-generated ones
//! (`IMG_1234.jpg`, `DSC_0001.NEF`, ...).

use regex::Regex;
use std::sync::LazyLock;

/// Prefixes cameras and phones put on files they name themselves
pub const CAMERA_PREFIXES: [&str; 6] = ["IMG_", "DSC_", "DSCN", "P_", "PHOTO_", "VID_"];

static CAMERA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = CAMERA_PREFIXES.iter().map(|p| regex::escape(p)).collect();
    Regex::new(&format!("(?i)^(?:{})", alternatives.join("|")))
        .expect("camera prefix pattern is a valid regex")
});

/// Returns `true` if the filename looks like a user-chosen original.
///
/// Empty filenames count as original.
pub fn is_original(filename: &str) -> bool {
    !CAMERA_PATTERN.is_match(filename)
}
