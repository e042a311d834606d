//! Outlet classification by publication name.
//!
//! Both classifiers consult a table of known outlets first and fall back to
//! keyword heuristics on the lowercased name. They never fail.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::types::{OutletType, Region};

lazy_static! {
    static ref OUTLET_TYPES: HashMap<&'static str, OutletType> = {
        use OutletType::*;
        let mut m = HashMap::new();
        for name in [
            "Bloomberg",
            "Reuters",
            "The Wall Street Journal",
            "CNBC",
            "The New York Times",
            "The Washington Post",
            "BBC News",
            "CNN",
            "The Guardian",
            "Financial Times",
            "Forbes",
            "Business Insider",
            "TechCrunch",
            "The Verge",
            "Wired",
            "Ars Technica",
            "Engadget",
            "The Information",
            "Fortune",
            "Inc.",
        ] {
            m.insert(name, NationalBusinessTech);
        }
        for name in [
            "CleanTechnica",
            "Electrek",
            "Restaurant Dive",
            "Restaurant Business",
            "Nation's Restaurant News",
            "American Banker",
            "Finextra",
            "Robotics and Automation News",
            "The Robot Report",
            "GreenBiz",
            "Utility Dive",
            "Energy Storage News",
            "HousingWire",
            "National Mortgage News",
            "Mortgage Professional America",
            "BankingDive",
            "Automation World",
        ] {
            m.insert(name, TradeSpecialist);
        }
        for name in [
            "The Boston Globe",
            "San Francisco Chronicle",
            "Chicago Tribune",
            "Los Angeles Times",
            "The Dallas Morning News",
            "The Seattle Times",
        ] {
            m.insert(name, Regional);
        }
        for name in ["Substack", "The Hustle", "Morning Brew", "Axios", "Semafor"] {
            m.insert(name, Newsletter);
        }
        m
    };

    static ref OUTLET_REGIONS: HashMap<&'static str, Region> = {
        use Region::*;
        let mut m = HashMap::new();
        for name in [
            "Bloomberg",
            "CNBC",
            "The New York Times",
            "The Washington Post",
            "The Wall Street Journal",
            "Forbes",
            "Fortune",
            "Business Insider",
            "TechCrunch",
            "The Verge",
            "Wired",
            "Ars Technica",
            "Engadget",
            "The Information",
            "Inc.",
            "CNN",
            "Los Angeles Times",
            "San Francisco Chronicle",
            "Chicago Tribune",
            "The Boston Globe",
            "The Dallas Morning News",
            "The Seattle Times",
            "CleanTechnica",
            "Electrek",
            "Restaurant Dive",
            "Restaurant Business",
            "Nation's Restaurant News",
            "American Banker",
            "The Robot Report",
            "HousingWire",
            "National Mortgage News",
            "Mortgage Professional America",
            "BankingDive",
            "Automation World",
            "Axios",
            "Morning Brew",
            "The Hustle",
            "Semafor",
            "Utility Dive",
            "GreenBiz",
        ] {
            m.insert(name, Us);
        }
        for name in ["The Guardian", "BBC News", "Financial Times", "Finextra"] {
            m.insert(name, Uk);
        }
        for name in ["Robotics and Automation News", "Energy Storage News"] {
            m.insert(name, Eu);
        }
        for name in ["Reuters", "Substack"] {
            m.insert(name, Global);
        }
        m
    };
}

pub fn classify_outlet(outlet: &str) -> OutletType {
    if let Some(kind) = OUTLET_TYPES.get(outlet) {
        return *kind;
    }

    let lower = outlet.to_lowercase();
    if lower.contains("substack") || lower.contains("newsletter") {
        OutletType::Newsletter
    } else if lower.contains("dive") || lower.contains("trade") || lower.contains("journal of") {
        OutletType::TradeSpecialist
    } else if lower.contains("times") || lower.contains("herald") || lower.contains("tribune") {
        OutletType::Regional
    } else {
        OutletType::NationalBusinessTech
    }
}

pub fn classify_region(outlet: &str) -> Region {
    if let Some(region) = OUTLET_REGIONS.get(outlet) {
        return *region;
    }

    let lower = outlet.to_lowercase();
    if lower.contains("uk") || lower.contains("british") || lower.contains("london") {
        Region::Uk
    } else if lower.contains("europe") || lower.contains("eu") {
        Region::Eu
    } else {
        Region::Us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_outlets_match_table() {
        for (name, kind) in OUTLET_TYPES.iter() {
            assert_eq!(classify_outlet(name), *kind, "{name}");
            assert_eq!(classify_outlet(name), classify_outlet(name));
        }
        for (name, region) in OUTLET_REGIONS.iter() {
            assert_eq!(classify_region(name), *region, "{name}");
        }
    }

    #[test]
    fn test_table_wins_over_heuristics() {
        // "Times" would be regional by keyword, but the table says national.
        assert_eq!(classify_outlet("The New York Times"), OutletType::NationalBusinessTech);
        assert_eq!(classify_outlet("Utility Dive"), OutletType::TradeSpecialist);
        assert_eq!(classify_region("Reuters"), Region::Global);
    }

    #[test]
    fn test_outlet_heuristics() {
        assert_eq!(classify_outlet("Grocery Dive"), OutletType::TradeSpecialist);
        assert_eq!(classify_outlet("Plastics Trade Weekly"), OutletType::TradeSpecialist);
        assert_eq!(classify_outlet("The Journal of Commerce"), OutletType::TradeSpecialist);
        assert_eq!(classify_outlet("Miami Herald"), OutletType::Regional);
        assert_eq!(classify_outlet("Tampa Bay Times"), OutletType::Regional);
        assert_eq!(classify_outlet("Deseret Tribune"), OutletType::Regional);
        assert_eq!(classify_outlet("climate.substack.com"), OutletType::Newsletter);
        assert_eq!(classify_outlet("The Fintech Newsletter"), OutletType::Newsletter);
        assert_eq!(classify_outlet("Gizmodo"), OutletType::NationalBusinessTech);
        assert_eq!(classify_outlet(""), OutletType::NationalBusinessTech);
    }

    #[test]
    fn test_region_heuristics() {
        assert_eq!(classify_region("London Evening Standard"), Region::Uk);
        assert_eq!(classify_region("British Retail Weekly"), Region::Uk);
        assert_eq!(classify_region("Euronews"), Region::Eu);
        assert_eq!(classify_region("Gizmodo"), Region::Us);
    }
}
