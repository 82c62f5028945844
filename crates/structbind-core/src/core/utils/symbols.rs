use phf::{Set, phf_set};

static GAP_SYMBOLS: Set<char> = phf_set! { '-', '.', ' ' };

static NUCLEOTIDE_SYMBOLS: Set<char> = phf_set! {
    'A', 'C', 'G', 'T', 'U', 'N', 'a', 'c', 'g', 't', 'u', 'n',
};

pub fn is_gap(symbol: char) -> bool {
    GAP_SYMBOLS.contains(&symbol)
}

/// Returns `true` when every non-gap symbol in `residues` is a nucleotide code.
///
/// An all-gap or empty row is not considered nucleotide.
pub fn looks_like_nucleotide(residues: &str) -> bool {
    let mut seen_residue = false;
    for symbol in residues.chars().filter(|c| !is_gap(*c)) {
        if !NUCLEOTIDE_SYMBOLS.contains(&symbol) {
            return false;
        }
        seen_residue = true;
    }
    seen_residue
}

/// A chain code is blank when it is empty or consists only of whitespace.
pub fn is_blank_chain(chain: &str) -> bool {
    chain.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_gap_recognizes_all_gap_symbols() {
        assert!(is_gap('-'));
        assert!(is_gap('.'));
        assert!(is_gap(' '));
    }

    #[test]
    fn is_gap_rejects_residue_codes() {
        assert!(!is_gap('A'));
        assert!(!is_gap('x'));
        assert!(!is_gap('*'));
    }

    #[test]
    fn looks_like_nucleotide_ignores_gaps() {
        assert!(looks_like_nucleotide("AC-GU..t"));
    }

    #[test]
    fn looks_like_nucleotide_rejects_protein_rows() {
        assert!(!looks_like_nucleotide("MKLVA"));
    }

    #[test]
    fn looks_like_nucleotide_rejects_empty_rows() {
        assert!(!looks_like_nucleotide(""));
        assert!(!looks_like_nucleotide("---"));
    }

    #[test]
    fn is_blank_chain_handles_whitespace() {
        assert!(is_blank_chain(""));
        assert!(is_blank_chain(" "));
        assert!(!is_blank_chain("A"));
    }
}
