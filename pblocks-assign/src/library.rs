//! Protein Block reference library.
//!
//! A library maps single-character block labels to prototype dihedral
//! windows of [`WINDOW_SIZE`] angles. The canonical set of 16 blocks
//! (`a`..`p`, de Brevern et al., 2000) ships as [`PB_DEFINITIONS`] and is
//! loaded with the same text parser as user-supplied libraries.

use pblocks_core::{ContentAddressable, PbError, Result, Summarizable};
use sha2::{Digest, Sha256};

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Number of dihedral angles in a Protein Block window.
pub const WINDOW_SIZE: usize = 8;

/// Label emitted for residues that cannot be classified. Reserved: no
/// library block may use it.
pub const UNASSIGNED: char = 'Z';

/// Canonical Protein Block prototypes, one block per line.
///
/// Columns are `psi(i-2) phi(i-1) psi(i-1) phi(i) psi(i) phi(i+1) psi(i+1) phi(i+2)`.
pub const PB_DEFINITIONS: &str = "
#PB psi(n-2) phi(n-1) psi(n-1) phi(n) psi(n) phi(n+1) psi(n+1) phi(n+2)
a  41.14   75.53  13.92  -99.80  131.88  -96.27  122.08  -99.68
b 108.24  -90.12 119.54  -92.21  -18.06 -128.93  147.04  -99.90
c -11.61 -105.66  94.81 -106.09  133.56 -106.93  135.97 -100.63
d 141.98 -112.79 132.20 -114.79  140.11 -111.05  139.54 -103.16
e 133.25 -112.37 137.64 -108.13  133.00  -87.30  120.54   77.40
f 116.40 -105.53 129.32  -96.68  140.72  -74.19  -26.65  -94.51
g   0.40  -81.83   4.91 -100.59   85.50  -71.65  130.78   84.98
h 119.14 -102.58 130.83  -67.91  121.55   76.25   -2.95  -90.88
i 130.68  -56.92 119.26   77.85   10.42  -99.43  141.40  -98.01
j 114.32 -121.47 118.14   82.88 -150.05  -83.81   23.35  -85.82
k 117.16  -95.41 140.40  -59.35  -29.23  -72.39  -25.08  -76.16
l 139.20  -55.96 -32.70  -68.51  -26.09  -74.44  -22.60  -71.74
m -39.62  -64.73 -39.52  -65.54  -38.88  -66.89  -37.76  -70.19
n -35.34  -65.03 -38.12  -66.34  -29.51  -89.10   -2.91   77.90
o -45.29  -67.44 -27.72  -87.27    5.13   77.49   30.71  -93.23
p -27.09  -86.14   0.30   59.85   21.51  -96.30  132.67  -92.91
";

/// One reference block: a label and its prototype dihedral window.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProteinBlock {
    pub label: char,
    pub angles: [f64; WINDOW_SIZE],
}

/// An immutable set of Protein Block prototypes, kept in ascending label
/// order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceLibrary {
    blocks: Vec<ProteinBlock>,
}

impl ReferenceLibrary {
    /// The canonical 16-block library.
    pub fn canonical() -> Result<Self> {
        Self::parse(PB_DEFINITIONS)
    }

    /// Parse a library from `<label> <angle_1> ... <angle_k>` lines.
    ///
    /// Blank lines and lines containing `#` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PbError::Definition`] when the definitions are unusable for
    /// classification: entries with differing numbers of angles, an arity
    /// other than [`WINDOW_SIZE`], a label that is not a single character,
    /// the reserved label [`UNASSIGNED`], duplicated labels, unparseable or
    /// non-finite angles, or no entries at all.
    ///
    /// ```
    /// use pblocks_assign::ReferenceLibrary;
    ///
    /// let lib = ReferenceLibrary::parse("a 0 0 0 0 0 0 0 0\nb 10 10 10 10 10 10 10 10\n").unwrap();
    /// assert_eq!(lib.len(), 2);
    /// assert!(ReferenceLibrary::parse("a 0 0 0 0 0 0 0 0\nb 10 10 10\n").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut blocks: Vec<ProteinBlock> = Vec::new();
        let mut arity: Option<(char, usize)> = None;

        for (lineno, line) in text.lines().enumerate() {
            if line.contains('#') || line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let Some(token) = fields.next() else {
                continue;
            };
            let label = parse_label(token, lineno + 1)?;

            let values = fields
                .map(|f| {
                    f.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| {
                            PbError::Definition(format!(
                                "line {}: bad angle {:?} for block '{}'",
                                lineno + 1,
                                f,
                                label
                            ))
                        })
                })
                .collect::<Result<Vec<f64>>>()?;

            match arity {
                None => arity = Some((label, values.len())),
                Some((first, k)) if k != values.len() => {
                    return Err(PbError::Definition(format!(
                        "block '{}' has {} angles but block '{}' has {}",
                        label,
                        values.len(),
                        first,
                        k
                    )));
                }
                Some(_) => {}
            }

            let angles: [f64; WINDOW_SIZE] = values.as_slice().try_into().map_err(|_| {
                PbError::Definition(format!(
                    "block '{}' has {} angles, expected {}",
                    label,
                    values.len(),
                    WINDOW_SIZE
                ))
            })?;

            if blocks.iter().any(|b| b.label == label) {
                return Err(PbError::Definition(format!(
                    "block '{}' is defined more than once",
                    label
                )));
            }
            blocks.push(ProteinBlock { label, angles });
        }

        if blocks.is_empty() {
            return Err(PbError::Definition("no Protein Block definitions found".into()));
        }
        blocks.sort_by_key(|b| b.label);

        let library = Self { blocks };
        log::info!(
            "read PB definitions: {} PBs x {} angles",
            library.len(),
            WINDOW_SIZE
        );
        log::debug!("PB library hash {}", library.content_hash());
        Ok(library)
    }

    /// Read and parse a definitions file.
    #[cfg(feature = "std")]
    pub fn from_file(path: impl AsRef<::std::path::Path>) -> Result<Self> {
        let text = ::std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false for a successfully parsed library.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of angles per block.
    pub fn arity(&self) -> usize {
        WINDOW_SIZE
    }

    /// Prototype angles of a block.
    pub fn get(&self, label: char) -> Option<&[f64; WINDOW_SIZE]> {
        self.blocks
            .iter()
            .find(|b| b.label == label)
            .map(|b| &b.angles)
    }

    /// Blocks in ascending label order.
    pub fn blocks(&self) -> &[ProteinBlock] {
        &self.blocks
    }

    /// Block labels in ascending order.
    pub fn labels(&self) -> impl Iterator<Item = char> + '_ {
        self.blocks.iter().map(|b| b.label)
    }
}

fn parse_label(token: &str, lineno: usize) -> Result<char> {
    let mut chars = token.chars();
    let label = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(PbError::Definition(format!(
                "line {}: block label {:?} must be a single character",
                lineno, token
            )))
        }
    };
    if label == UNASSIGNED {
        return Err(PbError::Definition(format!(
            "line {}: label '{}' is reserved for unassigned residues",
            lineno, UNASSIGNED
        )));
    }
    Ok(label)
}

impl Summarizable for ReferenceLibrary {
    fn summary(&self) -> String {
        let labels: String = self.labels().collect();
        format!(
            "PB library: {} block(s) x {} angles [{}]",
            self.len(),
            WINDOW_SIZE,
            labels
        )
    }
}

impl ContentAddressable for ReferenceLibrary {
    fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for block in &self.blocks {
            let mut buf = [0u8; 4];
            hasher.update(block.label.encode_utf8(&mut buf).as_bytes());
            for a in &block.angles {
                hasher.update(a.to_le_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn canonical_library_has_sixteen_blocks() {
        let lib = ReferenceLibrary::canonical().unwrap();
        assert_eq!(lib.len(), 16);
        assert_eq!(lib.arity(), 8);
        let labels: String = lib.labels().collect();
        assert_eq!(labels, "abcdefghijklmnop");
        assert_eq!(
            lib.get('m').unwrap(),
            &[-39.62, -64.73, -39.52, -65.54, -38.88, -66.89, -37.76, -70.19]
        );
        assert!(lib.get('Z').is_none());
    }

    #[test]
    fn canonical_angles_are_in_range() {
        let lib = ReferenceLibrary::canonical().unwrap();
        for block in lib.blocks() {
            for a in &block.angles {
                assert!((-180.0..=180.0).contains(a), "{} {}", block.label, a);
            }
        }
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let text = "\n# header\n\n   \nb 1 2 3 4 5 6 7 8 # trailing comment\na 0 0 0 0 0 0 0 0\n";
        let lib = ReferenceLibrary::parse(text).unwrap();
        // The 'b' line contains '#', so it is skipped entirely.
        assert_eq!(lib.len(), 1);
        assert!(lib.get('a').is_some());
    }

    #[test]
    fn blocks_sorted_by_label() {
        let lib = ReferenceLibrary::parse("q 1 1 1 1 1 1 1 1\nc 2 2 2 2 2 2 2 2\n").unwrap();
        let labels: String = lib.labels().collect();
        assert_eq!(labels, "cq");
    }

    #[test]
    fn arity_mismatch_rejected() {
        let err = ReferenceLibrary::parse("a 0 0 0 0 0 0 0 0\nb 1 2 3 4 5 6 7\n").unwrap_err();
        assert!(matches!(err, PbError::Definition(_)));
        assert!(err.to_string().contains("'b' has 7 angles"));
    }

    #[test]
    fn uniform_wrong_arity_rejected() {
        let err = ReferenceLibrary::parse("a 0 0 0\nb 1 1 1\n").unwrap_err();
        assert!(matches!(err, PbError::Definition(_)));
        assert!(err.to_string().contains("expected 8"));
    }

    #[test]
    fn bad_number_rejected() {
        assert!(ReferenceLibrary::parse("a 0 0 0 x 0 0 0 0\n").is_err());
        assert!(ReferenceLibrary::parse("a 0 0 0 NaN 0 0 0 0\n").is_err());
        assert!(ReferenceLibrary::parse("a 0 0 0 inf 0 0 0 0\n").is_err());
    }

    #[test]
    fn bad_labels_rejected() {
        assert!(ReferenceLibrary::parse("ab 0 0 0 0 0 0 0 0\n").is_err());
        assert!(ReferenceLibrary::parse("Z 0 0 0 0 0 0 0 0\n").is_err());
        assert!(ReferenceLibrary::parse("a 0 0 0 0 0 0 0 0\na 1 1 1 1 1 1 1 1\n").is_err());
    }

    #[test]
    fn empty_library_rejected() {
        assert!(ReferenceLibrary::parse("").is_err());
        assert!(ReferenceLibrary::parse("# only comments\n\n").is_err());
    }

    #[cfg(feature = "std")]
    #[test]
    fn from_missing_file_is_io_error() {
        let err = ReferenceLibrary::from_file("/nonexistent/pb.txt").unwrap_err();
        assert!(matches!(err, PbError::Io(_)));
    }

    #[test]
    fn summary_and_hash() {
        let lib = ReferenceLibrary::canonical().unwrap();
        assert!(lib.summary().contains("16 block(s)"));
        let hash = lib.content_hash();
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, ReferenceLibrary::canonical().unwrap().content_hash());

        let other = ReferenceLibrary::parse("a 0 0 0 0 0 0 0 0\n").unwrap();
        assert_ne!(hash, other.content_hash());
    }

    #[test]
    fn shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReferenceLibrary>();
    }
}
