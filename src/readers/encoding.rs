use crate::error::Result;
use encoding_rs::WINDOWS_1252;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Decode bytes written in the exports' legacy single-byte charset.
///
/// A UTF-8 or UTF-16 BOM takes precedence, so re-encoded mirrors still decode.
pub fn decode_legacy(bytes: &[u8]) -> String {
    let (text, _encoding, had_errors) = WINDOWS_1252.decode(bytes);
    if had_errors {
        tracing::debug!("Replacement characters inserted while decoding");
    }
    text.into_owned()
}

/// Read the first `count` lines of a file, decoded, without line terminators.
///
/// The lines are decoded as one block so a BOM on the first line governs
/// all of them.
pub fn read_leading_lines(path: &Path, count: usize) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();

    for _ in 0..count {
        if reader.read_until(b'\n', &mut bytes)? == 0 {
            break;
        }
    }

    Ok(decode_legacy(&bytes)
        .lines()
        .take(count)
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect())
}

/// Read a whole file, decoded
pub fn read_decoded(path: &Path) -> Result<String> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    Ok(decode_legacy(&bytes))
}

/// Slice of `text` after its first `count` lines
pub fn skip_lines(text: &str, count: usize) -> &str {
    let mut rest = text;
    for _ in 0..count {
        match rest.find('\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return "",
        }
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_decode_windows_1252() {
        // "ESTAÇÃO" in Windows-1252
        let bytes = [0x45, 0x53, 0x54, 0x41, 0xC7, 0xC3, 0x4F];
        assert_eq!(decode_legacy(&bytes), "ESTAÇÃO");
    }

    #[test]
    fn test_decode_utf8_with_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("REGIÃO".as_bytes());
        assert_eq!(decode_legacy(&bytes), "REGIÃO");
    }

    #[test]
    fn test_read_leading_lines() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"one\r\ntwo\r\nthree\r\nfour\r\n")?;

        let lines = read_leading_lines(file.path(), 3)?;
        assert_eq!(lines, vec!["one", "two", "three"]);

        let lines = read_leading_lines(file.path(), 10)?;
        assert_eq!(lines.len(), 4);
        Ok(())
    }

    #[test]
    fn test_read_leading_lines_utf8_with_bom() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(&[0xEF, 0xBB, 0xBF])?;
        file.write_all("REGIÃO:;NE\r\nUF:;SE\r\nESTAÇÃO:;ARACAJU\r\n".as_bytes())?;

        let lines = read_leading_lines(file.path(), 3)?;
        assert_eq!(lines, vec!["REGIÃO:;NE", "UF:;SE", "ESTAÇÃO:;ARACAJU"]);
        Ok(())
    }

    #[test]
    fn test_read_leading_lines_keeps_windows_1252() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"UF:;SE\r\nESTA\xC7\xC3O:;ARACAJU\r\n")?;

        let lines = read_leading_lines(file.path(), 2)?;
        assert_eq!(lines[1], "ESTAÇÃO:;ARACAJU");
        Ok(())
    }

    #[test]
    fn test_skip_lines() {
        assert_eq!(skip_lines("a\nb\nc\n", 2), "c\n");
        assert_eq!(skip_lines("a\r\nb\r\nc", 1), "b\r\nc");
        assert_eq!(skip_lines("a\nb", 5), "");
        assert_eq!(skip_lines("a\nb", 0), "a\nb");
    }
}
