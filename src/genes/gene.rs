use super::{Probability, SpeciesId};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::OnceLock;

/// One node of a creature's program.
///
/// A creature is simply the root gene of a tree. Composite variants own
/// their children, so a subtree has exactly one owner at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "geneType")]
pub enum Gene {
    Branch {
        probability: Probability,
        left: Option<Box<Gene>>,
        right: Option<Box<Gene>>,
    },
    Chop {
        probability: Probability,
    },
    Copy {
        probability: Probability,
    },
    Get {
        template: Option<Box<Gene>>,
    },
    Merge,
    Mutate {
        probability: Probability,
    },
    Put,
    Sequence {
        genes: Vec<Gene>,
    },
}

/// Variant tag of a gene, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    Branch,
    Chop,
    Copy,
    Get,
    Merge,
    Mutate,
    Put,
    Sequence,
}

impl Opcode {
    pub const ALL: [Opcode; 8] = [
        Opcode::Branch,
        Opcode::Chop,
        Opcode::Copy,
        Opcode::Get,
        Opcode::Merge,
        Opcode::Mutate,
        Opcode::Put,
        Opcode::Sequence,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Branch => "Branch",
            Opcode::Chop => "Chop",
            Opcode::Copy => "Copy",
            Opcode::Get => "Get",
            Opcode::Merge => "Merge",
            Opcode::Mutate => "Mutate",
            Opcode::Put => "Put",
            Opcode::Sequence => "Sequence",
        }
    }

    /// A default instance: even probabilities, no children, no template.
    pub fn bare(self) -> Gene {
        match self {
            Opcode::Branch => Gene::branch(Probability::EVEN, None, None),
            Opcode::Chop => Gene::Chop { probability: Probability::EVEN },
            Opcode::Copy => Gene::Copy { probability: Probability::EVEN },
            Opcode::Get => Gene::Get { template: None },
            Opcode::Merge => Gene::Merge,
            Opcode::Mutate => Gene::Mutate { probability: Probability::EVEN },
            Opcode::Put => Gene::Put,
            Opcode::Sequence => Gene::Sequence { genes: Vec::new() },
        }
    }

    /// Fingerprint of the bare instance, computed once per process.
    pub fn canonical_id(self) -> SpeciesId {
        static IDS: OnceLock<[SpeciesId; 8]> = OnceLock::new();
        IDS.get_or_init(|| Opcode::ALL.map(|opcode| opcode.bare().species_id()))[self as usize]
    }
}

impl Gene {
    pub fn branch(probability: Probability, left: Option<Gene>, right: Option<Gene>) -> Self {
        Gene::Branch {
            probability,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    pub fn get(template: Option<Gene>) -> Self {
        Gene::Get {
            template: template.map(Box::new),
        }
    }

    pub fn sequence(genes: Vec<Gene>) -> Self {
        Gene::Sequence { genes }
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Gene::Branch { .. } => Opcode::Branch,
            Gene::Chop { .. } => Opcode::Chop,
            Gene::Copy { .. } => Opcode::Copy,
            Gene::Get { .. } => Opcode::Get,
            Gene::Merge => Opcode::Merge,
            Gene::Mutate { .. } => Opcode::Mutate,
            Gene::Put => Opcode::Put,
            Gene::Sequence { .. } => Opcode::Sequence,
        }
    }

    /// Structural fingerprint: a CRC-32 of the canonical JSON encoding with
    /// every probability written as `null`.
    pub fn species_id(&self) -> SpeciesId {
        let encoded = serde_json::to_vec(&Shape(self)).unwrap_or_default();
        SpeciesId::from_hash(crc32fast::hash(&encoded))
    }

    /// Number of genes in the tree rooted here, templates included.
    pub fn count_genes(&self) -> usize {
        1 + match self {
            Gene::Branch { left, right, .. } => {
                left.as_deref().map_or(0, Gene::count_genes)
                    + right.as_deref().map_or(0, Gene::count_genes)
            }
            Gene::Get { template } => template.as_deref().map_or(0, Gene::count_genes),
            Gene::Sequence { genes } => genes.iter().map(Gene::count_genes).sum(),
            Gene::Chop { .. } | Gene::Copy { .. } | Gene::Merge | Gene::Mutate { .. } | Gene::Put => 0,
        }
    }

    /// Number of levels in the tree rooted here; a lone gene has depth 1.
    pub fn depth(&self) -> usize {
        1 + match self {
            Gene::Branch { left, right, .. } => left
                .as_deref()
                .map_or(0, Gene::depth)
                .max(right.as_deref().map_or(0, Gene::depth)),
            Gene::Get { template } => template.as_deref().map_or(0, Gene::depth),
            Gene::Sequence { genes } => genes.iter().map(Gene::depth).max().unwrap_or(0),
            Gene::Chop { .. } | Gene::Copy { .. } | Gene::Merge | Gene::Mutate { .. } | Gene::Put => 0,
        }
    }
}

/// Serialization view used for fingerprinting.
struct Shape<'a>(&'a Gene);

impl Serialize for Shape<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let gene = self.0;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("geneType", gene.opcode().name())?;
        match gene {
            Gene::Branch { left, right, .. } => {
                map.serialize_entry("probability", &())?;
                map.serialize_entry("left", &left.as_deref().map(Shape))?;
                map.serialize_entry("right", &right.as_deref().map(Shape))?;
            }
            Gene::Chop { .. } | Gene::Copy { .. } | Gene::Mutate { .. } => {
                map.serialize_entry("probability", &())?;
            }
            Gene::Get { template } => {
                map.serialize_entry("template", &template.as_deref().map(Shape))?;
            }
            Gene::Sequence { genes } => {
                let items: Vec<Shape<'_>> = genes.iter().map(Shape).collect();
                map.serialize_entry("genes", &items)?;
            }
            Gene::Merge | Gene::Put => {}
        }
        map.end()
    }
}
