//! Archives embedded at build time
//!
//! `build.rs` generates the `BUNDLED_ARCHIVES` table from
//! `assets/bundled/*.zip`.

/// An archive compiled into the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundledArchive<'a> {
    /// File name, ending in `.zip`
    pub name: &'a str,
    pub bytes: &'a [u8],
}

include!(concat!(env!("OUT_DIR"), "/bundled_archives.rs"));
