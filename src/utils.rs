use std::fs::{self, File};
use std::io;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use sha2::{Digest, Sha256};

use crate::error::{DirdiffError, Result};

const SNIFF_LEN: usize = 4096;

pub fn parse_size(s: &str) -> u64 {
    let s = s.trim().to_lowercase();
    let units = [
        ("gib", 1024u64.pow(3)),
        ("mib", 1024u64.pow(2)),
        ("kib", 1024),
        ("gb", 1000u64.pow(3)),
        ("mb", 1000u64.pow(2)),
        ("kb", 1000),
        ("g", 1000u64.pow(3)),
        ("m", 1000u64.pow(2)),
        ("k", 1000),
        ("b", 1),
    ];

    for (unit, mult) in units {
        if let Some(num) = s.strip_suffix(unit) {
            if let Ok(val) = num.trim().parse::<f64>() {
                return (val * mult as f64) as u64;
            }
        }
    }
    s.parse().unwrap_or(0)
}

/// NUL bytes or a non-UTF-8 prefix mark content as binary. Empty is text.
pub fn is_probably_binary(bytes: &[u8]) -> bool {
    let slice = &bytes[..bytes.len().min(SNIFF_LEN)];
    if slice.is_empty() {
        return false;
    }
    if slice.contains(&0) {
        return true;
    }
    match std::str::from_utf8(slice) {
        Ok(_) => false,
        // A multi-byte char cut by the sniff window is still text.
        Err(e) => e.error_len().is_some() || slice.len() == bytes.len(),
    }
}

pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| DirdiffError::ContentRead {
        path: path.to_path_buf(),
        source,
    })
}

/// UTF-8 when valid, otherwise Windows-1252.
pub fn decode_text_best_effort(bytes: Vec<u8>, normalize_eol: bool) -> String {
    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let (res, _, _) = WINDOWS_1252.decode(e.as_bytes());
            res.into_owned()
        }
    };

    if normalize_eol {
        content.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        content
    }
}

pub fn hash_file(path: &Path) -> Result<String> {
    let content_err = |source| DirdiffError::ContentRead {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(content_err)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(content_err)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Exact byte equality of two files.
pub fn file_bytes_equal(p1: &Path, p2: &Path) -> Result<bool> {
    if p1 == p2 {
        // Still read it so an unreadable file surfaces as an error.
        hash_file(p1)?;
        return Ok(true);
    }
    let len1 = fs::metadata(p1).map(|m| m.len());
    let len2 = fs::metadata(p2).map(|m| m.len());
    if let (Ok(a), Ok(b)) = (len1, len2) {
        if a != b {
            return Ok(false);
        }
    }
    Ok(hash_file(p1)? == hash_file(p2)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("5MB", 5_000_000)]
    #[case("512kib", 524_288)]
    #[case("1.5k", 1_500)]
    #[case("102400", 102_400)]
    #[case(" 2 GiB ", 2 * 1024 * 1024 * 1024)]
    #[case("7b", 7)]
    #[case("garbage", 0)]
    fn parses_sizes(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(parse_size(input), expected);
    }

    #[test]
    fn binary_sniffing() {
        assert!(!is_probably_binary(b""));
        assert!(!is_probably_binary("héllo\n".as_bytes()));
        assert!(is_probably_binary(b"ab\0cd"));
        assert!(is_probably_binary(&[0xff, 0xfe, 0x41]));
    }

    #[test]
    fn multibyte_char_across_sniff_window_is_text() {
        let mut bytes = vec![b'a'; SNIFF_LEN - 1];
        bytes.extend_from_slice("é".as_bytes());
        assert!(!is_probably_binary(&bytes));
    }

    #[test]
    fn decodes_latin1_fallback_and_normalizes_eol() {
        assert_eq!(decode_text_best_effort(vec![b'c', 0xe9], false), "cé");
        assert_eq!(
            decode_text_best_effort(b"a\r\nb\rc\n".to_vec(), true),
            "a\nb\nc\n"
        );
        assert_eq!(decode_text_best_effort(b"a\r\n".to_vec(), false), "a\r\n");
    }

    #[test]
    fn byte_equality() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let c = dir.path().join("c");
        fs::write(&a, "same").unwrap();
        fs::write(&b, "same").unwrap();
        fs::write(&c, "diff").unwrap();

        assert!(file_bytes_equal(&a, &b).unwrap());
        assert!(!file_bytes_equal(&a, &c).unwrap());
        assert!(file_bytes_equal(&a, &a).unwrap());
        assert!(file_bytes_equal(&a, &dir.path().join("missing")).is_err());
    }
}
