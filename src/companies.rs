use anyhow::{anyhow, Result};

/// Companies the report service knows about, kept in byte-wise sorted order.
pub const CATALOG: &[&str] = &[
    "AbbVie Inc.",
    "Alphabet Inc.",
    "Amazon.com Inc.",
    "Apple Inc.",
    "Berkshire Hathaway Inc.",
    "Chevron Corporation",
    "Coca-Cola Company",
    "Exxon Mobil Corporation",
    "JPMorgan Chase & Co.",
    "Johnson & Johnson",
    "Mastercard Incorporated",
    "Merck & Co. Inc.",
    "Microsoft Corporation",
    "NVIDIA Corporation",
    "Netflix Inc.",
    "PepsiCo Inc.",
    "Procter & Gamble Company",
    "The Home Depot Inc.",
    "UnitedHealth Group Incorporated",
    "Visa Inc.",
    "Walmart Inc.",
];

/// Exact match first, then a case-insensitive one.
pub fn lookup(name: &str) -> Option<&'static str> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    CATALOG
        .iter()
        .copied()
        .find(|c| *c == name)
        .or_else(|| CATALOG.iter().copied().find(|c| c.eq_ignore_ascii_case(name)))
}

pub fn resolve(name: &str) -> Result<&'static str> {
    lookup(name).ok_or_else(|| {
        anyhow!("unknown company: {name:?} (run `finreport companies` for the list)")
    })
}

/// Interactive picker. `Ok(None)` when the user backs out.
pub fn pick() -> Result<Option<&'static str>> {
    let choice = dialoguer::Select::new()
        .with_prompt("Select company")
        .items(CATALOG)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|i| CATALOG[i]))
}
