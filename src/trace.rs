use std::{
    fmt, fs,
    io::{self, Read},
    path::Path,
    sync::Arc,
};

use serde::{Serialize, Serializer};
use xz2::read::XzDecoder;

use crate::error::{Result, SimError};

pub const DEFAULT_DELIMITER: &str = ",";

/// An opaque page identifier. Pages are compared by their token text only.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Page(Arc<str>);

impl Page {
    pub fn new(token: &str) -> Self {
        Page(Arc::from(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Page {
    fn from(token: &str) -> Self {
        Page::new(token)
    }
}

impl Serialize for Page {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Splits `text` on `delim`, trimming each token and dropping empty ones.
///
/// Never fails: input with no tokens yields an empty sequence, which the
/// simulator accepts as a degenerate run.
pub fn parse(text: &str, delim: &str) -> Vec<Page> {
    text.split(delim)
        .map(str::trim)
        .filter(|tok| !tok.is_empty())
        .map(Page::new)
        .collect()
}

/// Rejects a delimiter that would split the input into single characters.
pub fn check_delimiter(delim: &str) -> Result<&str> {
    if delim.is_empty() {
        return Err(SimError::InvalidDelimiter);
    }
    Ok(delim)
}

/// Like [`parse`] but rejects an empty delimiter and input that contains no
/// page tokens.
pub fn parse_nonempty(text: &str, delim: &str) -> Result<Vec<Page>> {
    let pages = parse(text, check_delimiter(delim)?);
    if pages.is_empty() {
        return Err(SimError::EmptyReferenceString);
    }
    Ok(pages)
}

/// Reads a reference string from `path`. Files ending in `.xz` are decompressed.
pub fn read(path: &Path, delim: &str) -> Result<Vec<Page>> {
    check_delimiter(delim)?;
    let io_err = |source: io::Error| SimError::Io {
        path: path.to_path_buf(),
        source,
    };
    let stream = fs::File::open(path).map_err(io_err)?;

    let mut text = String::new();
    if path.extension().is_some_and(|ext| ext == "xz") {
        XzDecoder::new(stream)
            .read_to_string(&mut text)
            .map_err(io_err)?;
    } else {
        io::BufReader::new(stream)
            .read_to_string(&mut text)
            .map_err(io_err)?;
    }

    // Newline separated files are accepted alongside the delimiter.
    let text = text.replace(['\r', '\n'], delim);
    tracing::debug!(path = %path.display(), bytes = text.len(), "read reference file");
    parse_nonempty(&text, delim)
}

/// Generates `len` references drawn uniformly from pages `0..n_pages`.
pub fn random(len: usize, n_pages: i64, seed: Option<u64>) -> Result<Vec<Page>> {
    let n_pages = match usize::try_from(n_pages) {
        Ok(n) if n > 0 => n,
        _ => return Err(SimError::InvalidPageCount(n_pages)),
    };
    let mut rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    Ok((0..len)
        .map(|_| Page::new(&rng.usize(0..n_pages).to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pages: &[Page]) -> Vec<&str> {
        pages.iter().map(Page::as_str).collect()
    }

    #[test]
    fn parse_trims_and_drops_empty_tokens() {
        let pages = parse(" 7, 0 ,,1,  ,2 ", ",");
        assert_eq!(tokens(&pages), ["7", "0", "1", "2"]);
    }

    #[test]
    fn parse_keeps_opaque_tokens() {
        let pages = parse("a;b;a;0x10", ";");
        assert_eq!(tokens(&pages), ["a", "b", "a", "0x10"]);
        assert_eq!(pages[0], pages[2]);
    }

    #[test]
    fn parse_of_blank_input_is_empty() {
        assert!(parse(" , ,", ",").is_empty());
        assert!(matches!(
            parse_nonempty("", ","),
            Err(SimError::EmptyReferenceString)
        ));
    }

    #[test]
    fn empty_delimiter_is_rejected() {
        assert!(matches!(
            parse_nonempty("10,20", ""),
            Err(SimError::InvalidDelimiter)
        ));
        assert!(matches!(
            read(Path::new("/definitely/not/here.txt"), ""),
            Err(SimError::InvalidDelimiter)
        ));
        assert_eq!(check_delimiter(";").unwrap(), ";");
    }

    #[test]
    fn read_plain_file_with_newlines() {
        let path = std::env::temp_dir().join(format!("page_sim_refs_{}.txt", std::process::id()));
        fs::write(&path, "1,2\n3\r\n4,\n").unwrap();
        let pages = read(&path, ",").unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(tokens(&pages), ["1", "2", "3", "4"]);
    }

    #[test]
    fn read_xz_file() {
        use std::io::Write;

        let path = std::env::temp_dir().join(format!("page_sim_refs_{}.txt.xz", std::process::id()));
        let mut enc = xz2::write::XzEncoder::new(Vec::new(), 6);
        enc.write_all(b"5,6,5").unwrap();
        fs::write(&path, enc.finish().unwrap()).unwrap();
        let pages = read(&path, ",").unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(tokens(&pages), ["5", "6", "5"]);
    }

    #[test]
    fn read_missing_file_reports_path() {
        let err = read(Path::new("/definitely/not/here.txt"), ",").unwrap_err();
        assert!(matches!(err, SimError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn random_is_seeded_and_bounded() {
        let a = random(50, 4, Some(42)).unwrap();
        let b = random(50, 4, Some(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert!(a
            .iter()
            .all(|p| p.as_str().parse::<usize>().is_ok_and(|n| n < 4)));
    }

    #[test]
    fn random_needs_at_least_one_page() {
        assert!(matches!(random(5, 0, Some(1)), Err(SimError::InvalidPageCount(0))));
        assert!(matches!(random(5, -3, None), Err(SimError::InvalidPageCount(-3))));
        assert_eq!(random(3, 1, None).unwrap(), parse("0,0,0", ","));
    }
}
