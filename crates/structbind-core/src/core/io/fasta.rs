use crate::core::models::alignment::Alignment;
use crate::core::models::sequence::AlignedSequence;
use bio::io::fasta;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid header in record {record}: {kind}")]
    Header {
        record: usize,
        kind: FastaHeaderErrorKind,
    },
    #[error("Alignment contains no sequences")]
    Empty,
}

#[derive(Debug, Error)]
pub enum FastaHeaderErrorKind {
    #[error("Header has no sequence name")]
    EmptyName,
    #[error("Invalid residue range suffix '{0}'")]
    InvalidRange(String),
}

/// Reader for aligned FASTA files.
///
/// Gap symbols are kept as-is so each record becomes one alignment row. A record id of the
/// form `name/start-end` sets the sequence position of the row's first residue.
pub struct FastaFile;

impl FastaFile {
    pub fn read_from(reader: impl Read) -> Result<Alignment, FastaError> {
        let mut alignment = Alignment::new();

        for (index, record) in fasta::Reader::new(reader).records().enumerate() {
            let record = record?;
            let (name, start) = parse_id(record.id(), index + 1)?;
            let residues = String::from_utf8_lossy(record.seq());
            alignment.add_sequence(AlignedSequence::new(name, &residues).with_start(start));
        }

        if alignment.is_empty() {
            return Err(FastaError::Empty);
        }
        Ok(alignment)
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Alignment, FastaError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }
}

fn parse_id(id: &str, record: usize) -> Result<(&str, usize), FastaError> {
    if id.is_empty() {
        return Err(FastaError::Header {
            record,
            kind: FastaHeaderErrorKind::EmptyName,
        });
    }

    let Some((base, range)) = id.rsplit_once('/') else {
        return Ok((id, 1));
    };
    let start = range
        .split_once('-')
        .and_then(|(start, end)| {
            let start: usize = start.parse().ok()?;
            let end: usize = end.parse().ok()?;
            (start >= 1 && start <= end).then_some(start)
        })
        .ok_or_else(|| FastaError::Header {
            record,
            kind: FastaHeaderErrorKind::InvalidRange(range.to_string()),
        })?;
    Ok((base, start))
}
