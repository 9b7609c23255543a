use crate::results::Listing;

/// Optional listing attributes that are read from unlabeled detail text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Mileage,
    Interior,
    Engine,
    Transmission,
    Mpg,
    DriveTrain,
    Exterior,
    BedLength,
}

impl Field {
    /// JSON name of the field in the output file
    pub fn name(&self) -> &'static str {
        match self {
            Field::Mileage => "mileage",
            Field::Interior => "interior",
            Field::Engine => "engine",
            Field::Transmission => "transmission",
            Field::Mpg => "mpg",
            Field::DriveTrain => "drive_train",
            Field::Exterior => "exterior",
            Field::BedLength => "bed_length",
        }
    }

    /// Mutable access to the matching slot of a listing
    pub fn slot<'a>(&self, listing: &'a mut Listing) -> &'a mut String {
        match self {
            Field::Mileage => &mut listing.mileage,
            Field::Interior => &mut listing.interior,
            Field::Engine => &mut listing.engine,
            Field::Transmission => &mut listing.transmission,
            Field::Mpg => &mut listing.mpg,
            Field::DriveTrain => &mut listing.drive_train,
            Field::Exterior => &mut listing.exterior,
            Field::BedLength => &mut listing.bed_length,
        }
    }
}

/// How a rule looks for its needle inside a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Needle {
    /// Case-sensitive substring
    Exact(&'static str),
    /// Substring compared without regard to ASCII case
    AnyCase(&'static str),
}

impl Needle {
    pub fn is_in(&self, fragment: &str) -> bool {
        match self {
            Needle::Exact(needle) => fragment.contains(needle),
            Needle::AnyCase(needle) => fragment
                .to_ascii_lowercase()
                .contains(&needle.to_ascii_lowercase()),
        }
    }
}

/// A single (predicate, field) pair
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub needle: Needle,
    pub field: Field,
}

/// Rule table in evaluation order
///
/// The drive-train rule ignores case because the site writes both
/// "4-wheel drive" and "All-Wheel Drive".
pub const DEFAULT_RULES: &[Rule] = &[
    Rule {
        needle: Needle::Exact("miles"),
        field: Field::Mileage,
    },
    Rule {
        needle: Needle::Exact("Interior"),
        field: Field::Interior,
    },
    Rule {
        needle: Needle::Exact("Engine"),
        field: Field::Engine,
    },
    Rule {
        needle: Needle::Exact("Transmission"),
        field: Field::Transmission,
    },
    Rule {
        needle: Needle::Exact("Highway"),
        field: Field::Mpg,
    },
    Rule {
        needle: Needle::AnyCase("drive"),
        field: Field::DriveTrain,
    },
    Rule {
        needle: Needle::Exact("Exterior"),
        field: Field::Exterior,
    },
    Rule {
        needle: Needle::Exact("Bed Length"),
        field: Field::BedLength,
    },
];

/// Routes free-text detail fragments to listing fields
///
/// Rules are not mutually exclusive: a fragment is written into every
/// field whose rule matches it. When two fragments hit the same field the
/// later one wins.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl Classifier {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Every field the fragment matches, in rule order
    pub fn classify(&self, fragment: &str) -> Vec<Field> {
        self.rules
            .iter()
            .filter(|rule| rule.needle.is_in(fragment))
            .map(|rule| rule.field)
            .collect()
    }

    /// Classify a fragment and store its full text in each matching field.
    ///
    /// Returns the number of fields written.
    pub fn apply(&self, listing: &mut Listing, fragment: &str) -> usize {
        let fields = self.classify(fragment);
        if fields.is_empty() {
            ::log::trace!("Discarding unclassified detail: {:?}", fragment);
            return 0;
        }

        for field in &fields {
            ::log::trace!("Detail {:?} -> {}", fragment, field.name());
            *field.slot(listing) = fragment.to_string();
        }
        fields.len()
    }
}
