//! Reading and writing ODF zip packages.
//!
//! [`load`] turns an archive into a [`Document`]; [`dump`] writes one back.
//! The `mimetype` member always comes first and is never compressed, entry
//! timestamps survive the round trip, and zero-length entries are stored
//! rather than deflated.

use crate::document::{ComponentKind, Document, Timestamp, MIMETYPE_PATH};
use crate::{error::Error, Result};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Loads the ODF package at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::Read(ZipError::Io(e)))?;
    let mut document = load_from(BufReader::new(file))?;
    document.set_source(path.to_path_buf());
    debug!(
        "Loaded {} ({} additional entries)",
        path.display(),
        document.additional().len()
    );
    Ok(document)
}

/// Loads an ODF package held in memory.
pub fn loads(bytes: &[u8]) -> Result<Document> {
    load_from(Cursor::new(bytes))
}

/// Loads an ODF package from any seekable reader.
pub fn load_from<R: Read + Seek>(reader: R) -> Result<Document> {
    let mut archive = ZipArchive::new(reader).map_err(Error::Read)?;
    let mut document = Document::default();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(Error::Read)?;
        let name = entry.name().to_string();
        let timestamp = entry.last_modified();

        // The declared size is archive-controlled; let the buffer grow with the data.
        let mut data = Vec::new();
        if !entry.is_dir() {
            entry
                .read_to_end(&mut data)
                .map_err(|e| Error::Read(ZipError::Io(e)))?;
        }
        drop(entry);

        document.insert_entry(&name, data, timestamp)?;
    }

    Ok(document)
}

/// Writes `document` to `path`.
///
/// The archive is assembled in a temporary file next to `path` and renamed
/// over it once complete, so an existing file at `path` is either fully
/// replaced or left as it was.
pub fn dump<P: AsRef<Path>>(document: &Document, path: P) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(Error::Write)?;
    dump_to(document, temp.as_file_mut())?;
    temp.as_file().sync_all().map_err(Error::Write)?;
    temp.persist(path).map_err(|e| Error::Write(e.error))?;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Serializes `document` into an in-memory archive.
pub fn dumps(document: &Document) -> Result<Vec<u8>> {
    Ok(dump_to(document, Cursor::new(Vec::new()))?.into_inner())
}

/// Serializes `document` into `writer` and hands the writer back.
pub fn dump_to<W: Write + Seek>(document: &Document, writer: W) -> Result<W> {
    let mut zip = ZipWriter::new(writer);

    let mimetype = document.mimetype().as_bytes();
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(timestamp_for(document, MIMETYPE_PATH));
    zip.start_file(MIMETYPE_PATH, options).map_err(write_error)?;
    zip.write_all(mimetype).map_err(Error::Write)?;

    for kind in ComponentKind::ALL {
        let data = document.component_string(kind);
        write_file(&mut zip, document, kind.path(), data.as_bytes())?;
    }

    for (name, data) in document.additional() {
        if name.ends_with('/') {
            let options =
                SimpleFileOptions::default().last_modified_time(timestamp_for(document, name));
            zip.add_directory(name.as_str(), options)
                .map_err(write_error)?;
        } else {
            write_file(&mut zip, document, name, data)?;
        }
    }

    zip.finish().map_err(write_error)
}

fn write_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    document: &Document,
    name: &str,
    data: &[u8],
) -> Result<()> {
    let method = if data.is_empty() {
        CompressionMethod::Stored
    } else {
        CompressionMethod::Deflated
    };
    let options = SimpleFileOptions::default()
        .compression_method(method)
        .last_modified_time(timestamp_for(document, name));
    zip.start_file(name, options).map_err(write_error)?;
    zip.write_all(data).map_err(Error::Write)
}

fn timestamp_for(document: &Document, name: &str) -> Timestamp {
    document.timestamp(name).unwrap_or_else(|| {
        debug!("No timestamp recorded for {}, using the zip epoch", name);
        Timestamp::default()
    })
}

fn write_error(e: ZipError) -> Error {
    Error::Write(e.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MIMETYPE: &str = "application/vnd.oasis.opendocument.text";
    const CONTENT: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<office:document-content><office:body><office:text><text:p>Hi</text:p></office:text></office:body></office:document-content>";

    fn sample() -> Document {
        let stamp = Timestamp::from_date_and_time(2021, 6, 7, 8, 9, 10).unwrap();
        let mut doc = Document::new(MIMETYPE).with_component(ComponentKind::Content, CONTENT);
        doc.set_timestamp(MIMETYPE_PATH, stamp);
        doc.set_timestamp("content.xml", stamp);
        doc.insert_entry("Pictures/a.png", vec![1, 2, 3], Some(stamp))
            .unwrap();
        doc.insert_entry("Configurations2/", Vec::new(), Some(stamp))
            .unwrap();
        doc
    }

    #[test]
    fn test_round_trip_preserves_entries() {
        let doc = sample();
        let loaded = loads(&dumps(&doc).unwrap()).unwrap();
        assert_eq!(loaded.mimetype(), MIMETYPE);
        assert_eq!(
            loaded.component_string(ComponentKind::Content),
            doc.component_string(ComponentKind::Content)
        );
        assert_eq!(loaded.additional(), doc.additional());
        assert_eq!(
            loaded.timestamp("content.xml"),
            doc.timestamp("content.xml")
        );
    }

    #[test]
    fn test_entry_layout() {
        let bytes = dumps(&sample()).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(names.len(), 8);

        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), MIMETYPE_PATH);
        assert_eq!(first.compression(), CompressionMethod::Stored);
        drop(first);

        let styles = archive.by_name("styles.xml").unwrap();
        assert_eq!(styles.size(), 0);
        assert_eq!(styles.compression(), CompressionMethod::Stored);
        drop(styles);

        let content = archive.by_name("content.xml").unwrap();
        assert_eq!(content.compression(), CompressionMethod::Deflated);
        drop(content);

        assert!(archive.by_name("Configurations2/").unwrap().is_dir());
    }

    #[test]
    fn test_missing_timestamp_uses_zip_epoch() {
        let bytes = dumps(&Document::new(MIMETYPE)).unwrap();
        let loaded = loads(&bytes).unwrap();
        assert_eq!(loaded.timestamp("meta.xml"), Some(Timestamp::default()));
    }

    #[test]
    fn test_forged_entry_size_does_not_abort() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("Pictures/big.png", options).unwrap();
        zip.write_all(b"tiny").unwrap();
        let mut bytes = zip.finish().unwrap().into_inner();

        // Uncompressed size field of the central directory header.
        let header = bytes
            .windows(4)
            .rposition(|w| w == b"PK\x01\x02")
            .unwrap();
        bytes[header + 24..header + 28].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());

        match loads(&bytes) {
            Ok(doc) => assert_eq!(doc.additional()["Pictures/big.png"], b"tiny"),
            Err(e) => assert!(matches!(e, Error::Read(_)), "unexpected error: {e}"),
        }
    }

    #[test]
    fn test_not_a_zip_is_a_read_error() {
        assert!(matches!(loads(b"plain text"), Err(Error::Read(_))));
        assert!(matches!(
            load("/nonexistent/dir/file.odt"),
            Err(Error::Read(_))
        ));
    }
}
