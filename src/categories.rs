//! Wikidata classes harvested by default.
//!
//! Each entry pairs a human label (stored in `type_label`) with the class used in
//! the instance-of filter. Order is the harvest order.

/// One harvestable class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Label written to `websites.type_label`
    pub label: &'static str,
    /// Prefixed entity id, e.g. `wd:Q783794`
    pub entity: &'static str,
}

const fn category(label: &'static str, entity: &'static str) -> Category {
    Category { label, entity }
}

pub const CATEGORIES: &[Category] = &[
    // General & organisational
    category("Business", "wd:Q4830453"),
    category("Company", "wd:Q783794"),
    category("Public company", "wd:Q891723"),
    category("Private company", "wd:Q5621421"),
    category("musical group", "wd:Q215380"),
    category("Multinational corporation", "wd:Q161726"),
    category("State‑owned enterprise", "wd:Q270791"),
    category("Holding company", "wd:Q219577"),
    category("Conglomerate Category", "wd:Q7050751"),
    category("Conglomerate", "wd:Q778575"),
    category("Nonprofit organization", "wd:Q163740"),
    category("Brand", "wd:Q431289"),
    category("Organisation", "wd:Q43229"),
    // Retail & consumption
    category("Shop", "wd:Q213441"),
    category("Supermarket", "wd:Q180846"),
    category("Supermarket chain", "wd:Q18043413"),
    category("Retail chain", "wd:Q507619"),
    category("E‑commerce company", "wd:Q484847"),
    category("Mobile application", "wd:Q620615"),
    category("Loyalty programme", "wd:Q1426546"),
    category("Shopping mall", "wd:Q31374404"),
    category("shopping center", "wd:Q11315"),
    category("Restaurant", "wd:Q11707"),
    category("Restaurant chain", "wd:Q18534542"),
    category("Fast-food restaurant chain", "wd:Q18509232"),
    category("Café", "wd:Q30022"),
    category("Bar", "wd:Q187456"),
    category("Pub", "wd:Q212198"),
    // Finance & insurance
    category("Bank", "wd:Q22687"),
    category("Investment bank", "wd:Q319845"),
    category("Insurance company", "wd:Q2143354"),
    category("Investment company", "wd:Q1752459"),
    // Technology & telecoms
    category("Technology company", "wd:Q18388277"),
    category("service on Internet", "wd:Q1668024"),
    category("software company", "wd:Q1058914"),
    category("record label", "wd:Q18127"),
    category("media company", "wd:Q1331793"),
    category("Telecommunications company", "wd:Q2401749"),
    // Manufacturing & industry
    category("Automotive manufacturer", "wd:Q786820"),
    category("Aerospace manufacturer", "wd:Q936518"),
    category("Pharmaceutical company", "wd:Q19644607"),
    category("Mining company", "wd:Q2990216"),
    // Energy & utilities
    category("Energy company", "wd:Q1341478"),
    category("Oil company", "wd:Q14941854"),
    category("Electric utility", "wd:Q1326624"),
    // Transport & travel
    category("Airline", "wd:Q46970"),
    // Media & entertainment
    category("film production company", "wd:Q1762059"),
    category("Entertainment company", "wd:Q20739124"),
    category("broadcaster", "wd:Q15265344"),
    // Institutions / misc.
    category("Educational institution", "wd:Q2385804"),
    category("University", "wd:Q3918"),
    category("School", "wd:Q3914"),
    category("Hospital", "wd:Q16917"),
    category("Museum", "wd:Q33506"),
    category("Library", "wd:Q7075"),
    category("Government agency", "wd:Q327333"),
    category("Political party", "wd:Q7278"),
    category("Trade union", "wd:Q49780"),
    category("Website", "wd:Q35127"),
    category("Social media platform", "wd:Q202833"),
    category("Online database", "wd:Q7094076"),
    category("Company register", "wd:Q1394657"),
    category("Business directory", "wd:Q897682"),
    category("Yellow Pages", "wd:Q934552"),
    // Legal-sector
    category("Law firm", "wd:Q613142"),
    category("Bar Association", "wd:Q1865205"),
    category("International Bar Association", "wd:Q763532"),
    category("Legal Bar", "wd:Q17015569"),
    category("barrister", "wd:Q808967"),
];

// Some stored labels use U+2011 (non-breaking hyphen); operators type '-'.
fn fold_label(label: &str) -> String {
    label.trim().replace('\u{2011}', "-").to_ascii_lowercase()
}

/// Looks up a category by label, ignoring ASCII case and hyphen style.
pub fn find(label: &str) -> Option<&'static Category> {
    let wanted = fold_label(label);
    CATEGORIES.iter().find(|c| fold_label(c.label) == wanted)
}
