//! Uploaded file handles and the checks run against them

use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::naming::get_extension;

/// Uploads at or above this many bytes are rejected
pub const SIZE_LIMIT: u64 = 5_400_000;

/// Extensions accepted as open document formats
pub const OPEN_DOCUMENT_EXTENSIONS: [&str; 5] = [".pdf", ".pda", ".odt", ".ods", ".odp"];

/// Anything an upload can be read from
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// A file posted with a form answer
///
/// Checks read from the handle and always rewind it afterwards, so the same
/// handle can be probed several times and then stored.
pub struct UploadedFile {
    filename: String,
    reader: Box<dyn ReadSeek>,
}

impl UploadedFile {
    /// Wrap any seekable reader
    pub fn from_reader(filename: impl Into<String>, reader: impl ReadSeek + 'static) -> Self {
        Self {
            filename: filename.into(),
            reader: Box::new(reader),
        }
    }

    /// Create an upload from in-memory contents
    pub fn from_bytes(filename: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self::from_reader(filename, Cursor::new(contents.into()))
    }

    /// Open a file on disk; the upload is named after the file
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = std::fs::File::open(path)?;
        Ok(Self::from_reader(filename, file))
    }

    /// Client-supplied file name
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Lower-cased extension of the file name, including the dot
    pub fn extension(&self) -> String {
        get_extension(&self.filename)
    }

    /// Move the read position back to the start
    pub fn rewind(&mut self) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(0)).map(|_| ())
    }
}

impl Read for UploadedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Seek for UploadedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.reader.seek(pos)
    }
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

/// Count up to `limit` bytes from the current position, then rewind
fn probe(file: &mut UploadedFile, limit: u64) -> io::Result<u64> {
    let read = io::copy(&mut file.by_ref().take(limit), &mut io::sink());
    let rewound = file.rewind();
    let read = read?;
    rewound?;
    Ok(read)
}

/// Whether the upload has at least one byte
pub fn file_is_not_empty(file: &mut UploadedFile) -> io::Result<bool> {
    Ok(probe(file, 1)? > 0)
}

/// Whether the upload is smaller than [`SIZE_LIMIT`]
pub fn file_is_less_than_5mb(file: &mut UploadedFile) -> io::Result<bool> {
    Ok(probe(file, SIZE_LIMIT)? < SIZE_LIMIT)
}

/// Whether the file name has an open document extension (case-insensitive)
pub fn file_is_open_document_format(file: &UploadedFile) -> bool {
    OPEN_DOCUMENT_EXTENSIONS.contains(&file.extension().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty_rewinds() {
        let mut file = UploadedFile::from_bytes("a.pdf", "hello");
        assert!(file_is_not_empty(&mut file).unwrap());

        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "hello");
    }

    #[test]
    fn test_empty_file() {
        let mut file = UploadedFile::from_bytes("a.pdf", Vec::<u8>::new());
        assert!(!file_is_not_empty(&mut file).unwrap());
    }

    #[test]
    fn test_size_limit() {
        let mut small = UploadedFile::from_bytes("a.pdf", vec![b'*'; 5_399_999]);
        assert!(file_is_less_than_5mb(&mut small).unwrap());
        assert_eq!(small.stream_position().unwrap(), 0);

        let mut exact = UploadedFile::from_bytes("a.pdf", vec![b'*'; 5_400_000]);
        assert!(!file_is_less_than_5mb(&mut exact).unwrap());

        let mut large = UploadedFile::from_bytes("a.pdf", vec![b'*'; 5_400_001]);
        assert!(!file_is_less_than_5mb(&mut large).unwrap());
        assert_eq!(large.stream_position().unwrap(), 0);
    }

    #[test]
    fn test_open_document_format() {
        for name in ["a.pdf", "a.PDF", "b.odt", "c.Ods", "d.odp", "e.pda"] {
            assert!(
                file_is_open_document_format(&UploadedFile::from_bytes(name, "x")),
                "{} should be accepted",
                name
            );
        }
        for name in ["a.txt", "a.docx", "pdf", ".pdf"] {
            assert!(
                !file_is_open_document_format(&UploadedFile::from_bytes(name, "x")),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_open_uses_file_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pricing.pdf");
        std::fs::write(&path, "contents").unwrap();

        let mut file = UploadedFile::open(&path).unwrap();
        assert_eq!(file.filename(), "pricing.pdf");
        assert!(file_is_not_empty(&mut file).unwrap());
    }
}
