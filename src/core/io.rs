//! Input opening
//!
//! Junction tables and annotation files may be plain, gzip or bzip2
//! compressed. Large plain files are memory mapped.

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;

/// Read buffer for files and decoders (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Plain files at least this large are memory mapped (100MB)
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    Plain,
    Gzip,
    Bzip2,
}

/// Compression of `path`, from its extension or else its leading bytes
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("gz") => return Ok(CompressionFormat::Gzip),
        Some("bz2") => return Ok(CompressionFormat::Bzip2),
        _ => {}
    }

    let mut head = Vec::with_capacity(BZIP2_MAGIC.len());
    File::open(path)?
        .take(BZIP2_MAGIC.len() as u64)
        .read_to_end(&mut head)?;

    Ok(if head.starts_with(GZIP_MAGIC) {
        CompressionFormat::Gzip
    } else if head.starts_with(BZIP2_MAGIC) {
        CompressionFormat::Bzip2
    } else {
        CompressionFormat::Plain
    })
}

/// Buffered reader over a plain, mapped or compressed input file
pub enum SmartReader {
    Buffered(BufReader<File>),
    Mapped(Cursor<Mmap>),
    Gzip(BufReader<MultiGzDecoder<File>>),
    Bzip2(BufReader<MultiBzDecoder<File>>),
}

impl SmartReader {
    /// Open a file, picking decompression and buffering from its content
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let format = detect_compression(path)?;
        let file = File::open(path)?;

        let reader = match format {
            CompressionFormat::Gzip => {
                SmartReader::Gzip(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, MultiGzDecoder::new(file)))
            }
            CompressionFormat::Bzip2 => {
                SmartReader::Bzip2(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, MultiBzDecoder::new(file)))
            }
            CompressionFormat::Plain if file.metadata()?.len() >= MMAP_THRESHOLD => {
                // SAFETY: inputs are read-only for the lifetime of a run
                let mmap = unsafe { Mmap::map(&file)? };
                SmartReader::Mapped(Cursor::new(mmap))
            }
            CompressionFormat::Plain => SmartReader::Buffered(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)),
        };
        log::debug!("Opened {} ({:?})", path.display(), format);
        Ok(reader)
    }

    fn inner(&mut self) -> &mut dyn BufRead {
        match self {
            SmartReader::Buffered(r) => r,
            SmartReader::Mapped(r) => r,
            SmartReader::Gzip(r) => r,
            SmartReader::Bzip2(r) => r,
        }
    }
}

impl Read for SmartReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner().read(buf)
    }
}

impl BufRead for SmartReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner().fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner().consume(amt)
    }
}

/// Line reader that reuses one buffer across lines
pub struct ByteLineIterator<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: BufRead> ByteLineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Next line without its `\n` / `\r\n` terminator
    pub fn next_line(&mut self) -> Option<io::Result<&[u8]>> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                let mut len = self.buffer.len();
                if self.buffer[..len].ends_with(b"\n") {
                    len -= 1;
                }
                if self.buffer[..len].ends_with(b"\r") {
                    len -= 1;
                }
                Some(Ok(&self.buffer[..len]))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn read_all(reader: SmartReader) -> io::Result<Vec<String>> {
        reader.lines().collect()
    }

    #[test]
    fn test_plain_file() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        writeln!(temp, "line1\nline2")?;
        temp.flush()?;

        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Plain);
        let reader = SmartReader::open(temp.path())?;
        assert!(matches!(reader, SmartReader::Buffered(_)));
        assert_eq!(read_all(reader)?, vec!["line1", "line2"]);
        Ok(())
    }

    #[test]
    fn test_gzip_detected_by_magic() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"junction_id\tchrom\n")?;
        temp.write_all(&encoder.finish()?)?;
        temp.flush()?;

        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Gzip);
        let reader = SmartReader::open(temp.path())?;
        assert_eq!(read_all(reader)?, vec!["junction_id\tchrom"]);
        Ok(())
    }

    #[test]
    fn test_short_file_is_plain() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(b"B")?;
        temp.flush()?;
        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Plain);
        Ok(())
    }

    #[test]
    fn test_byte_line_iterator() -> io::Result<()> {
        let data: &[u8] = b"line1\r\nline2\nline3";
        let mut iter = ByteLineIterator::new(BufReader::new(data));

        assert_eq!(iter.next_line().unwrap()?, b"line1");
        assert_eq!(iter.next_line().unwrap()?, b"line2");
        assert_eq!(iter.next_line().unwrap()?, b"line3");
        assert!(iter.next_line().is_none());
        Ok(())
    }
}
