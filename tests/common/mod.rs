#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bzip2::Compression;
use bzip2::write::BzEncoder;

/// Archive URL used by fixtures; never fetched.
pub const FIXTURE_URL: &str = "https://fixtures.invalid/allocine/data.tar.bz2";

/// Build a tar stream with one regular file per `(path, body)` pair, in order.
pub fn tar_bytes(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, body) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, *body)
            .expect("failed appending tar member");
    }
    builder.into_inner().expect("failed finishing tar stream")
}

/// Write a `tar.bz2` archive holding `members` under `dir`.
pub fn write_bz2_archive(dir: &Path, members: &[(&str, &[u8])]) -> PathBuf {
    let mut encoder = BzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&tar_bytes(members))
        .expect("failed compressing tar stream");
    let path = dir.join("data.tar.bz2");
    fs::write(&path, encoder.finish().expect("failed finishing bzip2 stream"))
        .expect("failed writing archive");
    path
}

/// One JSON line in the source format.
pub fn review_line(review: &str, polarity: i64) -> String {
    format!("{}\n", serde_json::json!({"review": review, "polarity": polarity}))
}
