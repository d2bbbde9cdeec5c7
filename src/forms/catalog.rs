use std::fmt;
use std::str::FromStr;

use strsim::levenshtein;

/// Entities that have a wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Condominium,
    Block,
    Unit,
    Resident,
    Organization,
    Contact,
    Vehicle,
    Invoice,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Condominium,
        EntityKind::Block,
        EntityKind::Unit,
        EntityKind::Resident,
        EntityKind::Organization,
        EntityKind::Contact,
        EntityKind::Vehicle,
        EntityKind::Invoice,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Condominium => "condominium",
            EntityKind::Block => "block",
            EntityKind::Unit => "unit",
            EntityKind::Resident => "resident",
            EntityKind::Organization => "organization",
            EntityKind::Contact => "contact",
            EntityKind::Vehicle => "vehicle",
            EntityKind::Invoice => "invoice",
        }
    }

    /// API collection name.
    pub fn resource(self) -> &'static str {
        match self {
            EntityKind::Condominium => "condominiums",
            EntityKind::Block => "blocks",
            EntityKind::Unit => "units",
            EntityKind::Resident => "residents",
            EntityKind::Organization => "organizations",
            EntityKind::Contact => "contacts",
            EntityKind::Vehicle => "vehicles",
            EntityKind::Invoice => "invoices",
        }
    }

    /// Closest known name within an edit distance of three.
    pub fn suggest(input: &str) -> Option<&'static str> {
        let input = input.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .map(|kind| (levenshtein(kind.name(), &input), kind.name()))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= 3)
            .map(|(_, name)| name)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEntity {
    pub input: String,
    pub suggestion: Option<&'static str>,
}

impl fmt::Display for UnknownEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown entity `{}`.", self.input)?;
        if let Some(suggestion) = self.suggestion {
            write!(f, " Suggestion: `{}`?", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for UnknownEntity {}

impl FromStr for EntityKind {
    type Err = UnknownEntity;

    /// Accepts the singular name or the API collection, in any case.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized || kind.resource() == normalized)
            .ok_or_else(|| UnknownEntity {
                input: input.trim().to_string(),
                suggestion: Self::suggest(input),
            })
    }
}
