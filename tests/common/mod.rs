// tests/common/mod.rs
//! Shared fixture helpers for conversion tests

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;

/// Header every valid fixture starts with.
pub const HEADER: &str = "project\nversion\t0.95\nprojName\tdemo\nrate\t44100\n";

/// Send tracing output to the test harness; run with
/// `RUST_LOG=debug cargo test -- --nocapture` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Write a legacy project file with `body` between the header and the
/// project close marker.
pub fn write_project(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("song.swp");
    fs::write(&path, format!("{HEADER}{body}end project\n")).unwrap();
    path
}

/// Create a block file the directory resolver will find.
pub fn write_block(data_dir: &Path, id: &str) {
    fs::create_dir_all(data_dir).unwrap();
    fs::write(data_dir.join(format!("{id}.swb")), b"\0\0\0\0").unwrap();
}

/// One wavetrack with two clips; the second clip references `block007`.
pub fn two_clip_track() -> String {
    concat!(
        "wavetrack\n",
        "name\tvocals\n",
        "channel\t0\n",
        "linked\t0\n",
        "offset\t0.0\n",
        "rate\t44100\n",
        "clip\n",
        "offset\t0.0\n",
        "format\t131073\n",
        "block\n",
        "file\tblock001\n",
        "start\t000000000000\n",
        "len\t262144\n",
        "end block\n",
        "end clip\n",
        "clip\n",
        "offset\t5,5\n",
        "format\t131073\n",
        "block\n",
        "file\tblock007\n",
        "start\t0\n",
        "len\t131072\n",
        "end block\n",
        "end clip\n",
        "end wavetrack\n",
    )
    .to_string()
}

/// Names of the files directly inside `dir`, sorted.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// All elements of an XML document in document order, with their
/// attributes.
pub fn elements(xml: &str) -> Vec<(String, Vec<(String, String)>)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut out = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Start(e) | Event::Empty(e) => {
                let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                let attrs = e
                    .attributes()
                    .map(|attr| {
                        let attr = attr.unwrap();
                        (
                            String::from_utf8(attr.key.as_ref().to_vec()).unwrap(),
                            attr.unescape_value().unwrap().into_owned(),
                        )
                    })
                    .collect();
                out.push((name, attrs));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    out
}

/// Attribute value from an `elements()` entry.
pub fn attr_of<'a>(element: &'a (String, Vec<(String, String)>), name: &str) -> Option<&'a str> {
    element
        .1
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}
