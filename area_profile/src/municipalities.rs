use std::collections::BTreeMap;

/// Display names of municipalities, keyed by their 3-digit code.
///
/// Read-only once built. The pipeline itself does not use it; it is handed to
/// the reporting code that needs readable names.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct MunicipalityTable {
    names: BTreeMap<u16, String>,
}

const CAPITAL_REGION: [(u16, &str); 28] = [
    (101, "København"),
    (147, "Frederiksberg"),
    (155, "Dragør"),
    (185, "Tårnby"),
    (165, "Albertslund"),
    (151, "Ballerup"),
    (153, "Brøndby"),
    (157, "Gentofte"),
    (159, "Gladsaxe"),
    (161, "Glostrup"),
    (163, "Herlev"),
    (167, "Hvidovre"),
    (169, "Høje-Taastrup"),
    (183, "Ishøj"),
    (173, "Lyngby-Taarbæk"),
    (175, "Rødovre"),
    (187, "Vallensbæk"),
    (201, "Allerød"),
    (240, "Egedal"),
    (210, "Fredensborg"),
    (250, "Frederikssund"),
    (190, "Furesø"),
    (270, "Gribskov"),
    (260, "Halsnæs"),
    (217, "Helsingør"),
    (219, "Hillerød"),
    (223, "Hørsholm"),
    (230, "Rudersdal"),
];

impl MunicipalityTable {
    /// The municipalities of the Capital Region (Region Hovedstaden).
    pub fn capital_region() -> MunicipalityTable {
        MunicipalityTable::from_pairs(&CAPITAL_REGION)
    }

    /// Later entries win over earlier ones with the same code.
    /// Names are trimmed.
    pub fn from_pairs(pairs: &[(u16, &str)]) -> MunicipalityTable {
        MunicipalityTable {
            names: pairs
                .iter()
                .map(|(code, name)| (*code, name.trim().to_string()))
                .collect(),
        }
    }

    pub fn name(&self, code: u16) -> Option<&str> {
        self.names.get(&code).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All the entries, by increasing code.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &str)> {
        self.names.iter().map(|(c, n)| (*c, n.as_str()))
    }
}
