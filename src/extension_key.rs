//! Extension key derivation.
//!
//! An entry's extension key is the part of its name after the final `.`,
//! without the dot. Entries whose key is empty are grouped under a
//! configurable fallback folder instead of a folder with an empty name.

use std::ffi::OsStr;

/// Default folder name for entries without an extension.
pub const DEFAULT_NO_EXTENSION_DIR: &str = "no_extension";

/// Derives the extension key of an entry name.
///
/// Returns an empty string when the name has no `.`, ends with `.`, or only
/// has leading dots (hidden files such as `.bashrc` or `..bashrc`).
///
/// ```
/// use extsort::extension_key::extension_key;
///
/// assert_eq!(extension_key("photo.JPG", false), "JPG");
/// assert_eq!(extension_key("archive.tar.gz", false), "gz");
/// assert_eq!(extension_key("README", false), "");
/// ```
pub fn extension_key(name: &str, lowercase: bool) -> String {
    let key = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.trim_start_matches('.').is_empty() => ext,
        _ => "",
    };

    if lowercase {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

/// Same as [`extension_key`] for raw file names; non-UTF-8 bytes are replaced.
pub fn extension_key_os(name: &OsStr, lowercase: bool) -> String {
    extension_key(&name.to_string_lossy(), lowercase)
}

/// Maps an extension key to the folder it is grouped under.
pub fn folder_for_key<'a>(key: &'a str, no_extension_dir: &'a str) -> &'a str {
    if key.is_empty() { no_extension_dir } else { key }
}
