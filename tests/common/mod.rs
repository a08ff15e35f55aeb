//! Fixture packages built in memory with `zip::ZipWriter`.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub const MIMETYPE: &str = "application/vnd.oasis.opendocument.text";

pub const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0"><manifest:file-entry manifest:media-type="application/vnd.oasis.opendocument.text" manifest:full-path="/"/><manifest:file-entry manifest:media-type="text/xml" manifest:full-path="content.xml"/></manifest:manifest>"#;

pub const CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" office:version="1.2"><office:automatic-styles/><office:body><office:text><text:h text:style-name="Heading_20_1" text:outline-level="1">Test document</text:h><text:p text:style-name="Standard">This sentence serves for test purposes.</text:p><text:p text:style-name="Standard"/><table:table table:name="Table1"><table:table-row><table:table-cell><text:p>Cell &amp; value</text:p></table:table-cell></table:table-row></table:table></office:text></office:body></office:document-content>"#;

pub const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-styles xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"><office:styles/></office:document-styles>"#;

pub const META: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-meta xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:dc="http://purl.org/dc/elements/1.1/"><office:meta><dc:title>Fixture</dc:title><dc:creator>Jane Roe</dc:creator></office:meta></office:document-meta>"#;

pub const SETTINGS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-settings xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"><office:settings/></office:document-settings>"#;

pub const PICTURES: [&str; 3] = [
    "Pictures/100_A.gif",
    "Pictures/100_B.gif",
    "Pictures/200_C.png",
];

pub fn fixture_time() -> DateTime {
    DateTime::from_date_and_time(2008, 3, 14, 10, 20, 30).unwrap()
}

fn options(method: CompressionMethod) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(method)
        .last_modified_time(fixture_time())
}

/// A text document with all reserved members, three pictures and a thumbnail.
pub fn fixture_odt() -> Vec<u8> {
    fixture_odt_with(&[])
}

/// The fixture package with `extra` members appended as given.
pub fn fixture_odt_with(extra: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file("mimetype", options(CompressionMethod::Stored))
        .unwrap();
    zip.write_all(MIMETYPE.as_bytes()).unwrap();

    let members = [
        ("META-INF/manifest.xml", MANIFEST),
        ("content.xml", CONTENT),
        ("styles.xml", STYLES),
        ("meta.xml", META),
        ("settings.xml", SETTINGS),
    ];
    for (name, data) in members {
        zip.start_file(name, options(CompressionMethod::Deflated))
            .unwrap();
        zip.write_all(data.as_bytes()).unwrap();
    }
    for name in PICTURES {
        zip.start_file(name, options(CompressionMethod::Deflated))
            .unwrap();
        zip.write_all(name.as_bytes()).unwrap();
    }
    zip.start_file(
        "Thumbnails/thumbnail.png",
        options(CompressionMethod::Deflated),
    )
    .unwrap();
    zip.write_all(b"\x89PNG").unwrap();
    for (name, data) in extra {
        zip.start_file(*name, options(CompressionMethod::Deflated))
            .unwrap();
        zip.write_all(data).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// Writes the fixture into `dir` and returns its path.
pub fn write_fixture(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, fixture_odt()).unwrap();
    path
}
