// ********* Error structures ***********

use std::error::Error;
use std::fmt::Display;

/// Problems with the shape of the input: the columns that are expected by the
/// layout do not line up with the columns that the source provides.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SchemaError {
    /// The matching rule of a category did not select any column of the header.
    UnresolvedCategory { category: String, rule: MatchRule },
    /// A column that is explicitly required (identifier, projection) is absent.
    MissingColumn { column: String },
    /// The same column name appears twice in the header.
    DuplicateColumn { column: String },
    /// A data row does not have as many fields as the header.
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A new column does not have as many values as the table has rows.
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },
    /// A numeric operation was requested on a column that still holds text.
    NotNumeric { column: String },
    /// Text rows cannot be appended once a column holds numbers.
    NotText { column: String },
}

/// Errors that prevent the profile from being computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ProfileError {
    /// A cell could not be read as a number, after placeholder substitution
    /// and decimal separator normalization.
    /// `row` is the 0-based index of the data row (the header is not counted).
    Parse {
        column: String,
        row: usize,
        value: String,
    },
    Schema(SchemaError),
}

impl Error for SchemaError {}

impl Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::UnresolvedCategory { category, rule } => write!(
                f,
                "category {:?} did not match any column (rule: {})",
                category, rule
            ),
            SchemaError::MissingColumn { column } => write!(f, "missing column {:?}", column),
            SchemaError::DuplicateColumn { column } => {
                write!(f, "column {:?} appears more than once", column)
            }
            SchemaError::RowLength {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} fields, expected {}",
                row, found, expected
            ),
            SchemaError::ColumnLength {
                column,
                expected,
                found,
            } => write!(
                f,
                "column {:?} has {} values, expected {}",
                column, found, expected
            ),
            SchemaError::NotNumeric { column } => {
                write!(f, "column {:?} has not been converted to numbers", column)
            }
            SchemaError::NotText { column } => {
                write!(f, "column {:?} already holds numbers", column)
            }
        }
    }
}

// The schema message is part of the display, so it is not reported again as
// a source.
impl Error for ProfileError {}

impl Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileError::Parse { column, row, value } => write!(
                f,
                "ParseError: could not read {:?} as a number (column {:?}, row {})",
                value, column, row
            ),
            ProfileError::Schema(e) => write!(f, "SchemaError: {}", e),
        }
    }
}

impl From<SchemaError> for ProfileError {
    fn from(e: SchemaError) -> Self {
        ProfileError::Schema(e)
    }
}

// ********* Configuration **********

/// The literal used by the statistics office for a cell without data.
pub const PLACEHOLDER_TOKEN: &str = "-";

/// What to do with a placeholder (or empty) cell in a numeric column.
///
/// The source does not distinguish an unreported value from a true zero.
/// `TreatAsZero` keeps that conflation, the two other modes make it visible.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MissingValuePolicy {
    TreatAsZero,
    /// The placeholder is a parse error.
    Reject,
    /// The placeholder becomes NaN, which then flows through the sums and shares.
    PropagateAsUndefined,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ProfileRules {
    pub missing_value_policy: MissingValuePolicy,
}

impl ProfileRules {
    pub const DEFAULT_RULES: ProfileRules = ProfileRules {
        missing_value_policy: MissingValuePolicy::TreatAsZero,
    };
}

/// How the columns of a category are found in the source header.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum MatchRule {
    /// The column name is exactly this string.
    Exact(String),
    /// The column name ends with this string. Case and diacritics matter.
    Suffix(String),
}

impl MatchRule {
    pub fn matches(&self, column_name: &str) -> bool {
        match self {
            MatchRule::Exact(s) => column_name == s,
            MatchRule::Suffix(s) => column_name.ends_with(s.as_str()),
        }
    }
}

impl Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchRule::Exact(s) => write!(f, "exact {:?}", s),
            MatchRule::Suffix(s) => write!(f, "suffix {:?}", s),
        }
    }
}

/// A semantic group of source columns. All the matched columns are summed
/// into a new column called `name`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Category {
    pub name: String,
    pub rule: MatchRule,
}

impl Category {
    pub fn suffix(label: &str) -> Category {
        Category {
            name: label.to_string(),
            rule: MatchRule::Suffix(label.to_string()),
        }
    }

    pub fn exact(name: &str, column: &str) -> Category {
        Category {
            name: name.to_string(),
            rule: MatchRule::Exact(column.to_string()),
        }
    }
}

/// A row-wise sum of already aggregated categories.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SumSpec {
    pub name: String,
    pub inputs: Vec<String>,
}

/// A row-wise quotient `numerator / denominator`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ShareSpec {
    pub name: String,
    pub numerator: String,
    pub denominator: String,
}

impl ShareSpec {
    pub fn new(name: &str, numerator: &str, denominator: &str) -> ShareSpec {
        ShareSpec {
            name: name.to_string(),
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        }
    }
}

/// The declarative description of the whole profile: which source columns
/// form which category, what gets summed and divided, and what is written out.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ProfileLayout {
    /// Administrative identifiers, copied as text.
    pub identifiers: Vec<String>,
    pub categories: Vec<Category>,
    /// Evaluated in order, after all the categories.
    pub sums: Vec<SumSpec>,
    /// Evaluated in order, after all the sums.
    pub shares: Vec<ShareSpec>,
    pub output_columns: Vec<String>,
}

pub const ORIGIN_GROUPS: [&str; 12] = [
    "Danmark",
    "Nordiske lande",
    "Tyrkiet",
    "Tidligere Jugoslavien",
    "Gamle EU-lande",
    "Nye EU-lande",
    "Øvrige Europa",
    "Afrika",
    "Nordamerika",
    "Syd- og Mellemamerika",
    "Asien og Oceanien",
    "Uoplyst",
];

pub const IDENTIFIERS: [&str; 5] = [
    "Gruppe",
    "ValgstedId",
    "KredsNr",
    "StorKredsNr",
    "LandsdelsNr",
];

pub const INCOME_PREFIX: &str = "FV2022 - Husstandsindkomster fordelt på afstemningsområder_";
pub const CAR_PREFIX: &str = "FV2022 - Husstandes bilrådighed fordelt på afstemningsområder_";

pub const TOTAL_POPULATION: &str = "total_population";
pub const TOTAL_HOUSEHOLDS: &str = "total_households";

/// (category name, column label after the prefix, share name)
/// The labels are copied from the statistics office export, including the
/// inconsistent trailing periods.
pub const INCOME_BRACKETS: [(&str, &str, &str); 8] = [
    (
        "income_under100k",
        "Under 100.000 kr.",
        "households_share_income_under100k",
    ),
    (
        "income_100-149.9k",
        "100.000 - 149.999 kr",
        "households_share_income_100-149.9k",
    ),
    (
        "income_150-199.9k",
        "150.000 - 199.999 kr.",
        "households_share_income_150-199.9k",
    ),
    (
        "income_200-299.9k",
        "200.000 - 299.999 kr.",
        "households_share_income_200-299.9k",
    ),
    (
        "income_300-399.9k",
        "300.000 - 399.999 kr.",
        "households_share_income_300-399.9k",
    ),
    (
        "income_400-499.9k",
        "400.000 - 499.999 kr.",
        "households_share_income_400-499.9k",
    ),
    (
        "income_500-749.9k",
        "500.000 - 749.999 kr.",
        "households_share_income_500-749.9k",
    ),
    (
        "income_750-k",
        "750.000 kr.-",
        "households_share_income_750-k",
    ),
];

pub const HOUSEHOLDS_LABEL: &str = "Antal husstande i alt";

pub const CAR_CLASSES: [(&str, &str, &str); 3] = [
    (
        "households_1car",
        "Husstande med 1 bil",
        "share_households_1car",
    ),
    (
        "households_2pluscar",
        "Husstande med 2 eller flere biler",
        "share_households_2pluscar",
    ),
    (
        "households_nocar",
        "Husstande uden bil",
        "share_households_nocar",
    ),
];

impl ProfileLayout {
    /// The layout of the 2022 general election (FV2022) area statistics.
    pub fn fv2022() -> ProfileLayout {
        let mut categories: Vec<Category> = ORIGIN_GROUPS
            .iter()
            .map(|label| Category::suffix(label))
            .collect();
        for (name, label, _) in INCOME_BRACKETS.iter() {
            categories.push(Category::exact(name, &format!("{}{}", INCOME_PREFIX, label)));
        }
        categories.push(Category::exact(
            TOTAL_HOUSEHOLDS,
            &format!("{}{}", INCOME_PREFIX, HOUSEHOLDS_LABEL),
        ));
        for (name, label, _) in CAR_CLASSES.iter() {
            categories.push(Category::exact(name, &format!("{}{}", CAR_PREFIX, label)));
        }

        let sums = vec![SumSpec {
            name: TOTAL_POPULATION.to_string(),
            inputs: ORIGIN_GROUPS.iter().map(|s| s.to_string()).collect(),
        }];

        let income_shares = INCOME_BRACKETS
            .iter()
            .map(|(name, _, share)| ShareSpec::new(share, name, TOTAL_HOUSEHOLDS));
        let car_shares = CAR_CLASSES
            .iter()
            .map(|(name, _, share)| ShareSpec::new(share, name, TOTAL_HOUSEHOLDS));
        let shares: Vec<ShareSpec> = income_shares.chain(car_shares).collect();

        let mut output_columns: Vec<String> = IDENTIFIERS.iter().map(|s| s.to_string()).collect();
        output_columns.extend(ORIGIN_GROUPS.iter().map(|s| s.to_string()));
        output_columns.push(TOTAL_POPULATION.to_string());
        output_columns.extend(INCOME_BRACKETS.iter().map(|(_, _, share)| share.to_string()));
        output_columns.push(TOTAL_HOUSEHOLDS.to_string());
        output_columns.extend(CAR_CLASSES.iter().map(|(_, _, share)| share.to_string()));

        ProfileLayout {
            identifiers: IDENTIFIERS.iter().map(|s| s.to_string()).collect(),
            categories,
            sums,
            shares,
            output_columns,
        }
    }

    /// Replaces the projection, keeping everything else.
    pub fn with_output_columns(self, columns: &[String]) -> ProfileLayout {
        ProfileLayout {
            output_columns: columns.to_vec(),
            ..self
        }
    }
}
