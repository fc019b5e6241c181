//! Genome codec - random generation, decoding into build commands, replication
//!
//! A genome is a flat byte sequence. Bytes at or above `0xF0` are control bytes
//! that open a gene; the data bytes after them are fed to that gene's reader
//! until the next control byte. Decoding is total: any byte sequence decodes,
//! unknown genes are skipped and an empty genome simply builds nothing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::TankConfig;
use crate::constants::genes;

/// Immutable genetic encoding of a body
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genome(Vec<u8>);

impl Genome {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex form, two characters per byte
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Parse the hex form produced by [`Genome::to_hex`]
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() % 2 != 0 || !hex.is_ascii() {
            return None;
        }
        (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
            .collect::<Option<Vec<u8>>>()
            .map(Self)
    }
}

impl From<Vec<u8>> for Genome {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Kinds of gene recognized by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneKind {
    Size,
    Spike,
}

impl GeneKind {
    /// Look up the gene opened by a control byte
    pub fn from_control(byte: u8) -> Option<Self> {
        match byte {
            genes::SIZE => Some(GeneKind::Size),
            genes::SPIKE => Some(GeneKind::Spike),
            _ => None,
        }
    }
}

/// One spike requested by the genome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpikeCommand {
    /// Position around the body in turns, taken from where the gene sits in the genome
    pub angle: f64,
    pub length: u32,
}

/// Build instructions decoded from a genome
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Commands {
    pub mass: u32,
    pub spikes: Vec<SpikeCommand>,
}

/// Decoder state: which gene is consuming data bytes
enum Reader {
    Noop,
    Size,
    Spike { index: usize, bits: u32 },
}

impl Reader {
    fn open(kind: Option<GeneKind>, commands: &mut Commands, byte_index: usize, genome_len: usize) -> Self {
        match kind {
            Some(GeneKind::Size) => Reader::Size,
            Some(GeneKind::Spike) => {
                commands.spikes.push(SpikeCommand {
                    angle: byte_index as f64 / genome_len as f64,
                    length: 0,
                });
                Reader::Spike {
                    index: commands.spikes.len() - 1,
                    bits: 0,
                }
            }
            None => Reader::Noop,
        }
    }

    fn feed(&mut self, commands: &mut Commands, byte: u8) {
        match self {
            Reader::Noop => {}
            Reader::Size => commands.mass += byte.count_ones(),
            Reader::Spike { index, bits } => {
                *bits += byte.count_ones();
                if let Some(spike) = commands.spikes.get_mut(*index) {
                    spike.length = *bits / genes::BITS_PER_SPIKE_LENGTH;
                }
            }
        }
    }
}

/// Generate a random genome sized by the configured gene statistics
pub fn create_genome(config: &TankConfig, rng: &mut impl Rng) -> Genome {
    let gene_count = rng.gen_range(1..=config.average_gene_count.saturating_mul(2).max(1));
    let max_gene_size = config.average_gene_size.saturating_mul(2).max(1);
    let mut bytes = Vec::new();

    for _ in 0..gene_count {
        bytes.push(genes::CONTROL_THRESHOLD + rng.gen_range(0..genes::KNOWN_KINDS));
        let size = rng.gen_range(1..=max_gene_size);
        bytes.extend((0..size).map(|_| rng.gen_range(0..=genes::MAX_DATA_BYTE)));
    }

    Genome(bytes)
}

/// Decode a genome into build commands in a single left-to-right pass
pub fn read_genome(genome: &Genome) -> Commands {
    let mut commands = Commands::default();
    let mut reader = Reader::Noop;
    let len = genome.len();

    for (index, &byte) in genome.bytes().iter().enumerate() {
        if byte >= genes::CONTROL_THRESHOLD {
            reader = Reader::open(GeneKind::from_control(byte), &mut commands, index, len);
        } else {
            reader.feed(&mut commands, byte);
        }
    }

    commands
}

/// Copy a genome for a child. Currently an exact copy; this is where mutation would go.
pub fn replicate_genome(genome: &Genome) -> Genome {
    genome.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::seeded_rng;

    fn mass_of(bytes: &[u8]) -> u32 {
        read_genome(&Genome::new(bytes.to_vec())).mass
    }

    #[test]
    fn test_size_gene_popcount() {
        assert_eq!(mass_of(&[0xF0, 0b1010_1010, 0b0000_1111]), 8);
        assert_eq!(mass_of(&[0xF0, 0, 0]), 0);
        assert_eq!(mass_of(&[0xF0, 0b1110_0000, 0xF0, 0b0000_0111]), 6);
    }

    #[test]
    fn test_adjacent_control_bytes() {
        let commands = read_genome(&Genome::new(vec![0xF0, 0xF1, 0b1010_1010]));
        assert_eq!(commands.mass, 0);
        assert_eq!(commands.spikes.len(), 1);
        assert_eq!(commands.spikes[0].length, 2);
        assert!((commands.spikes[0].angle - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_spike_length_uses_two_bits_per_unit() {
        // 7 bits -> length 3
        let commands = read_genome(&Genome::new(vec![0xF1, 0b0111_0000, 0b0000_1111]));
        assert_eq!(commands.spikes[0].length, 3);
        assert_eq!(commands.spikes[0].angle, 0.0);
    }

    #[test]
    fn test_unknown_and_degenerate_genomes() {
        assert_eq!(read_genome(&Genome::default()), Commands::default());
        // Data before any control byte, and data under an unknown gene, are skipped
        assert_eq!(mass_of(&[0b1111, 0xF7, 0b1111, 0xFF]), 0);
        // Trailing control byte with no data
        let commands = read_genome(&Genome::new(vec![0xF0, 0b1, 0xF1]));
        assert_eq!(commands.mass, 1);
        assert_eq!(commands.spikes[0].length, 0);
    }

    #[test]
    fn test_every_byte_sequence_decodes() {
        let mut rng = seeded_rng(3);
        for _ in 0..200 {
            let len = rng.gen_range(0..64);
            let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let commands = read_genome(&Genome::new(bytes.clone()));
            let size_bits: u32 = bytes.iter().filter(|b| **b < 0xF0).map(|b| b.count_ones()).sum();
            assert!(commands.mass <= size_bits);
        }
    }

    #[test]
    fn test_created_genome_shape() {
        let config = TankConfig::default();
        let mut rng = seeded_rng(11);
        for _ in 0..20 {
            let genome = create_genome(&config, &mut rng);
            assert!(genome.bytes()[0] >= 0xF0);
            assert!(genome.len() >= 2);
            let genes = genome.bytes().iter().filter(|b| **b >= 0xF0).count() as u32;
            assert!(genes >= 1 && genes <= 2 * config.average_gene_count);
            assert!(genome
                .bytes()
                .iter()
                .filter(|b| **b >= 0xF0)
                .all(|b| GeneKind::from_control(*b).is_some()));
        }
    }

    #[test]
    fn test_degenerate_gene_averages_still_create_a_gene() {
        let config = TankConfig {
            average_gene_count: 0,
            average_gene_size: 0,
            ..Default::default()
        };
        let genome = create_genome(&config, &mut seeded_rng(3));
        assert_eq!(genome.len(), 2);
        assert!(GeneKind::from_control(genome.bytes()[0]).is_some());
    }

    #[test]
    fn test_replicate_and_hex() {
        let genome = Genome::new(vec![0xF0, 0x0A, 0xF1, 0x7F]);
        assert_eq!(replicate_genome(&genome), genome);
        assert_eq!(genome.to_hex(), "f00af17f");
        assert_eq!(Genome::from_hex("f00af17f"), Some(genome));
        assert_eq!(Genome::from_hex("f0a"), None);
        assert_eq!(Genome::from_hex("zz"), None);
    }
}
